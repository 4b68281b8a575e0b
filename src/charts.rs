use chrono::{Datelike, NaiveDate};

use crate::config::DashboardConfig;
use crate::data::model::{AggregatedTable, EXPENSES_COLUMN, REVENUE_COLUMN};

/// Shown in the table region until a file is loaded.
pub const UPLOAD_PROMPT: &str = "Upload CSV file to display data";

/// Shown in the table region when a file is loaded but the filter leaves no
/// buckets.
pub const NO_DATA_PROMPT: &str = "No data for the current selection";

// ---------------------------------------------------------------------------
// Chart descriptions
// ---------------------------------------------------------------------------
//
// Everything here is plain data derived from an `AggregatedTable`; drawing
// lives in `ui::plot` and `ui::table`.

/// Map a bucket date onto the plot's x axis.
pub fn date_to_x(date: NaiveDate) -> f64 {
    date.num_days_from_ce() as f64
}

/// Inverse of [`date_to_x`], for axis labels.
pub fn x_to_date(x: f64) -> Option<NaiveDate> {
    if !x.is_finite() || x.abs() > i32::MAX as f64 {
        return None;
    }
    NaiveDate::from_num_days_from_ce_opt(x.round() as i32)
}

/// Bucket label used by the pie chart and the table.
pub fn format_bucket(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Format a summed value for display; integral values drop the `.0`.
pub fn format_number(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{v}")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: String,
    /// `[x, y]` pairs ordered by x.
    pub points: Vec<[f64; 2]>,
}

/// Revenue and expenses per bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct LineChart {
    pub title: &'static str,
    pub series: Vec<Series>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    pub label: String,
    pub value: f64,
    /// Fraction of the whole pie, in `(0, 1]`.
    pub share: f64,
}

/// Expenses per bucket, one slice each.
#[derive(Debug, Clone, PartialEq)]
pub struct PieChart {
    pub title: &'static str,
    pub slices: Vec<PieSlice>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

impl HistogramBin {
    pub fn center(&self) -> f64 {
        (self.start + self.end) / 2.0
    }

    pub fn width(&self) -> f64 {
        self.end - self.start
    }
}

/// Distribution of per-bucket profit.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub title: &'static str,
    pub bins: Vec<HistogramBin>,
}

/// Profit against sales volume, one point per bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterChart {
    pub title: &'static str,
    pub points: Vec<[f64; 2]>,
}

/// The table region: a prompt when there is nothing to show, otherwise a
/// header plus at least one row.
#[derive(Debug, Clone, PartialEq)]
pub enum TableView {
    Placeholder(String),
    Rows {
        header: Vec<String>,
        rows: Vec<Vec<String>>,
    },
}

// ---------------------------------------------------------------------------
// DashboardView – all five display artifacts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub line: LineChart,
    pub pie: PieChart,
    pub histogram: Histogram,
    pub scatter: ScatterChart,
    pub table: TableView,
}

impl DashboardView {
    /// Build every artifact from the aggregated table. `None` means no file
    /// is loaded: empty charts and the upload prompt. A loaded table with no
    /// buckets also gets empty charts and a placeholder, never a bare header.
    pub fn build(table: Option<&AggregatedTable>, config: &DashboardConfig) -> Self {
        let Some(table) = table else {
            return Self::empty(UPLOAD_PROMPT);
        };
        if table.is_empty() {
            return Self::empty(NO_DATA_PROMPT);
        }

        let rows = &table.rows;
        let dates: Vec<NaiveDate> = rows.iter().map(|r| r.bucket).collect();
        let revenue: Vec<f64> = rows.iter().map(|r| r.revenue).collect();
        let expenses: Vec<f64> = rows.iter().map(|r| r.expenses).collect();
        let profit: Vec<f64> = rows.iter().map(|r| r.profit).collect();
        let volume: Vec<f64> = rows.iter().map(|r| r.sales_volume).collect();

        let line = line_chart(&[
            series(REVENUE_COLUMN, &dates, &revenue),
            series(EXPENSES_COLUMN, &dates, &expenses),
        ]);

        let pie_input: Vec<(String, f64)> = dates
            .iter()
            .zip(&expenses)
            .map(|(d, v)| (format_bucket(*d), *v))
            .collect();

        let scatter_input: Vec<[f64; 2]> =
            volume.iter().zip(&profit).map(|(&x, &y)| [x, y]).collect();

        DashboardView {
            line,
            pie: pie_chart(&pie_input),
            histogram: histogram(&profit, config.histogram_bins),
            scatter: scatter_chart(&scatter_input),
            table: table_view(table),
        }
    }

    fn empty(prompt: &str) -> Self {
        DashboardView {
            line: line_chart(&[]),
            pie: pie_chart(&[]),
            histogram: histogram(&[], None),
            scatter: scatter_chart(&[]),
            table: TableView::Placeholder(prompt.to_string()),
        }
    }

    /// True when no chart carries data.
    pub fn charts_empty(&self) -> bool {
        self.line.series.is_empty()
            && self.pie.slices.is_empty()
            && self.histogram.bins.is_empty()
            && self.scatter.points.is_empty()
    }
}

fn series(name: &str, dates: &[NaiveDate], values: &[f64]) -> Series {
    Series {
        name: name.to_string(),
        points: dates
            .iter()
            .zip(values)
            .map(|(d, v)| [date_to_x(*d), *v])
            .collect(),
    }
}

fn line_chart(series: &[Series]) -> LineChart {
    LineChart {
        title: "Revenue and expenses over time",
        series: series.to_vec(),
    }
}

/// Slices without a positive value have no area and are left out.
fn pie_chart(values: &[(String, f64)]) -> PieChart {
    let total: f64 = values.iter().map(|(_, v)| *v).filter(|v| *v > 0.0).sum();
    let slices = values
        .iter()
        .filter(|(_, v)| *v > 0.0)
        .map(|(label, v)| PieSlice {
            label: label.clone(),
            value: *v,
            share: v / total,
        })
        .collect();
    PieChart {
        title: "Expense structure",
        slices,
    }
}

/// Bin count picked by Sturges' rule.
fn auto_bin_count(n: usize) -> usize {
    (n as f64).log2().ceil() as usize + 1
}

fn histogram(values: &[f64], fixed_bins: Option<usize>) -> Histogram {
    let title = "Profit distribution";
    let values: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if values.is_empty() {
        return Histogram { title, bins: Vec::new() };
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if (max - min).abs() < f64::EPSILON {
        return Histogram {
            title,
            bins: vec![HistogramBin {
                start: min - 0.5,
                end: min + 0.5,
                count: values.len(),
            }],
        };
    }

    let n_bins = fixed_bins
        .filter(|b| *b > 0)
        .unwrap_or_else(|| auto_bin_count(values.len()));
    let width = (max - min) / n_bins as f64;
    let mut bins: Vec<HistogramBin> = (0..n_bins)
        .map(|i| HistogramBin {
            start: min + i as f64 * width,
            end: min + (i + 1) as f64 * width,
            count: 0,
        })
        .collect();
    for v in &values {
        let idx = (((v - min) / width).floor() as usize).min(n_bins - 1);
        bins[idx].count += 1;
    }
    Histogram { title, bins }
}

fn scatter_chart(points: &[[f64; 2]]) -> ScatterChart {
    ScatterChart {
        title: "Profit vs sales volume",
        points: points.to_vec(),
    }
}

fn table_view(table: &AggregatedTable) -> TableView {
    let rows = table
        .rows
        .iter()
        .map(|row| {
            std::iter::once(format_bucket(row.bucket))
                .chain(
                    table
                        .columns
                        .iter()
                        .map(|c| row.value(c).map(format_number).unwrap_or_default()),
                )
                .collect()
        })
        .collect();
    TableView::Rows {
        header: table.header(),
        rows,
    }
}
