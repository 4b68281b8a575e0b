use std::borrow::Cow;
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use anyhow::Context;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::{DateTime, NaiveDate, NaiveDateTime};

use super::model::{
    CATEGORY_COLUMN, DATE_COLUMN, REQUIRED_NUMERIC_COLUMNS, RecordTable, SalesRecord,
};
use crate::error::{UploadError, UploadResult};

// ---------------------------------------------------------------------------
// Upload payload
// ---------------------------------------------------------------------------

/// How the bytes of a [`FilePayload`] are encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadEncoding {
    /// The file contents as-is.
    Raw,
    /// Base64 text, as carried by a `data:` URL.
    Base64,
}

/// A single uploaded file before decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePayload {
    pub name: Option<String>,
    pub bytes: Vec<u8>,
    pub encoding: PayloadEncoding,
}

impl FilePayload {
    pub fn raw(name: Option<String>, bytes: Vec<u8>) -> Self {
        FilePayload {
            name,
            bytes,
            encoding: PayloadEncoding::Raw,
        }
    }

    /// Parse a browser-style data URL: `data:text/csv;base64,<content>`.
    ///
    /// A data URL without the `;base64` marker carries its content verbatim.
    pub fn from_data_url(url: &str) -> UploadResult<Self> {
        let url = url.trim();
        let (header, content) = url
            .split_once(',')
            .ok_or_else(|| UploadError::Decode("data URL has no ',' separator".into()))?;
        let media = header
            .strip_prefix("data:")
            .ok_or_else(|| UploadError::Decode("payload is not a data URL".into()))?;

        let encoding = if media.ends_with(";base64") {
            PayloadEncoding::Base64
        } else {
            PayloadEncoding::Raw
        };
        Ok(FilePayload {
            name: None,
            bytes: content.as_bytes().to_vec(),
            encoding,
        })
    }

    /// Name to show in status messages.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("upload")
    }
}

/// Read a file from disk into a raw payload.
pub fn read_payload(path: &Path) -> anyhow::Result<FilePayload> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned());
    Ok(FilePayload::raw(name, bytes))
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Turn an upload into a validated record table.
///
/// `None` (nothing uploaded yet) produces no table. Any failure is reported
/// as a whole; a partially parsed table is never returned.
pub fn load_payload(payload: Option<&FilePayload>) -> UploadResult<Option<RecordTable>> {
    let Some(payload) = payload else {
        return Ok(None);
    };
    let text = decode_text(payload)?;
    parse_csv(&text).map(Some)
}

fn decode_text(payload: &FilePayload) -> UploadResult<String> {
    let bytes: Cow<[u8]> = match payload.encoding {
        PayloadEncoding::Raw => Cow::Borrowed(payload.bytes.as_slice()),
        PayloadEncoding::Base64 => Cow::Owned(
            STANDARD
                .decode(payload.bytes.trim_ascii())
                .map_err(|e| UploadError::Decode(format!("invalid base64: {e}")))?,
        ),
    };
    let text = std::str::from_utf8(&bytes)
        .map_err(|e| UploadError::Decode(format!("file is not UTF-8 text: {e}")))?;
    Ok(text.strip_prefix('\u{feff}').unwrap_or(text).to_string())
}

// ---------------------------------------------------------------------------
// CSV parsing and validation
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, comma-separated.
///
/// Must contain `date`, `category`, `revenue`, `expenses`, `profit` and
/// `sales_volume`. Other columns are kept when every non-blank cell is a
/// number and dropped otherwise.
pub fn parse_csv(text: &str) -> UploadResult<RecordTable> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();
    if headers.iter().all(|h| h.is_empty()) {
        return Err(UploadError::Parse("file has no header row".into()));
    }

    let mut seen = HashSet::new();
    if let Some(dup) = headers.iter().find(|h| !seen.insert(h.as_str())) {
        return Err(UploadError::Schema(format!("duplicate column '{dup}'")));
    }

    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| UploadError::Schema(format!("missing required column '{name}'")))
    };
    let date_idx = column(DATE_COLUMN)?;
    let category_idx = column(CATEGORY_COLUMN)?;
    let numeric_idx = [
        column(REQUIRED_NUMERIC_COLUMNS[0])?,
        column(REQUIRED_NUMERIC_COLUMNS[1])?,
        column(REQUIRED_NUMERIC_COLUMNS[2])?,
        column(REQUIRED_NUMERIC_COLUMNS[3])?,
    ];

    let rows = reader
        .records()
        .collect::<Result<Vec<csv::StringRecord>, csv::Error>>()?;

    // Extra columns survive only if every non-blank cell is numeric.
    let (extra_idx, dropped): (Vec<usize>, Vec<usize>) = (0..headers.len())
        .filter(|i| *i != date_idx && *i != category_idx && !numeric_idx.contains(i))
        .partition(|&i| {
            rows.iter().all(|row| {
                let cell = row.get(i).unwrap_or("").trim();
                is_missing(cell) || parse_finite(cell).is_some()
            })
        });
    for i in dropped {
        log::debug!("Dropping non-numeric column '{}'", headers[i]);
    }

    let numeric_columns: Vec<String> = (0..headers.len())
        .filter(|i| numeric_idx.contains(i) || extra_idx.contains(i))
        .map(|i| headers[i].clone())
        .collect();

    let mut records = Vec::with_capacity(rows.len());
    for (row_no, row) in rows.iter().enumerate() {
        let row_no = row_no + 1;
        let cell = |i: usize| row.get(i).unwrap_or("");

        let raw_date = cell(date_idx);
        let date = parse_date(raw_date).ok_or_else(|| {
            UploadError::Schema(format!("row {row_no}: '{raw_date}' is not a valid date"))
        })?;

        let category = Some(cell(category_idx))
            .filter(|c| !c.is_empty())
            .map(str::to_string);

        let [revenue, expenses, profit, sales_volume] = [0, 1, 2, 3].map(|k| {
            parse_required_number(cell(numeric_idx[k]), row_no, REQUIRED_NUMERIC_COLUMNS[k])
        });

        let extras: BTreeMap<String, Option<f64>> = extra_idx
            .iter()
            .map(|&i| (headers[i].clone(), parse_finite(cell(i).trim())))
            .collect();

        records.push(SalesRecord {
            date,
            category,
            revenue: revenue?,
            expenses: expenses?,
            profit: profit?,
            sales_volume: sales_volume?,
            extras,
        });
    }

    Ok(RecordTable::new(records, numeric_columns))
}

/// Blank and `NaN` cells both mean "no value".
fn is_missing(cell: &str) -> bool {
    cell.is_empty() || cell.eq_ignore_ascii_case("nan")
}

/// `f64::from_str` also accepts `NaN` and `inf`; sums only take finite values.
fn parse_finite(cell: &str) -> Option<f64> {
    cell.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_required_number(raw: &str, row: usize, col: &str) -> UploadResult<f64> {
    let s = raw.trim();
    if is_missing(s) {
        return Err(UploadError::Schema(format!("row {row}: '{col}' is blank")));
    }
    parse_finite(s).ok_or_else(|| {
        UploadError::Schema(format!("row {row}: '{col}' value '{s}' is not a finite number"))
    })
}

// ---------------------------------------------------------------------------
// Dates
// ---------------------------------------------------------------------------

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d.%m.%Y"];

/// Parse a `date` cell. Offsets in RFC 3339 values are dropped, keeping the
/// wall-clock time.
pub fn parse_date(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}
