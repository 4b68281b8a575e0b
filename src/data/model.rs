use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::{Datelike, Months, NaiveDate, NaiveDateTime};

// ---------------------------------------------------------------------------
// Column names
// ---------------------------------------------------------------------------

pub const DATE_COLUMN: &str = "date";
pub const CATEGORY_COLUMN: &str = "category";
pub const REVENUE_COLUMN: &str = "revenue";
pub const EXPENSES_COLUMN: &str = "expenses";
pub const PROFIT_COLUMN: &str = "profit";
pub const SALES_VOLUME_COLUMN: &str = "sales_volume";

/// Numeric columns every upload must carry.
pub const REQUIRED_NUMERIC_COLUMNS: [&str; 4] = [
    REVENUE_COLUMN,
    EXPENSES_COLUMN,
    PROFIT_COLUMN,
    SALES_VOLUME_COLUMN,
];

// ---------------------------------------------------------------------------
// Period – the resampling granularity
// ---------------------------------------------------------------------------

/// Calendar granularity used to bucket records before summing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Period {
    #[default]
    Monthly,
    Quarterly,
    Yearly,
}

impl Period {
    pub const ALL: [Period; 3] = [Period::Monthly, Period::Quarterly, Period::Yearly];

    pub fn label(self) -> &'static str {
        match self {
            Period::Monthly => "Monthly",
            Period::Quarterly => "Quarterly",
            Period::Yearly => "Yearly",
        }
    }

    fn months(self) -> u32 {
        match self {
            Period::Monthly => 1,
            Period::Quarterly => 3,
            Period::Yearly => 12,
        }
    }

    /// First day of the bucket containing `at`.
    pub fn bucket_start(self, at: NaiveDateTime) -> NaiveDate {
        let date = at.date();
        let month = match self {
            Period::Monthly => date.month(),
            Period::Quarterly => (date.month0() / 3) * 3 + 1,
            Period::Yearly => 1,
        };
        NaiveDate::from_ymd_opt(date.year(), month, 1).unwrap_or(date)
    }

    /// Start of the bucket following the one starting at `start`.
    pub fn next_bucket(self, start: NaiveDate) -> Option<NaiveDate> {
        start.checked_add_months(Months::new(self.months()))
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// SalesRecord – one row of the uploaded CSV
// ---------------------------------------------------------------------------

/// One validated row of the uploaded file.
#[derive(Debug, Clone, PartialEq)]
pub struct SalesRecord {
    pub date: NaiveDateTime,
    /// `None` when the cell was blank.
    pub category: Option<String>,
    pub revenue: f64,
    pub expenses: f64,
    pub profit: f64,
    pub sales_volume: f64,
    /// Additional numeric columns: column_name → value (`None` for a blank cell).
    pub extras: BTreeMap<String, Option<f64>>,
}

impl SalesRecord {
    /// Value of a numeric column by name.
    pub fn numeric(&self, column: &str) -> Option<f64> {
        match column {
            REVENUE_COLUMN => Some(self.revenue),
            EXPENSES_COLUMN => Some(self.expenses),
            PROFIT_COLUMN => Some(self.profit),
            SALES_VOLUME_COLUMN => Some(self.sales_volume),
            other => self.extras.get(other).copied().flatten(),
        }
    }
}

// ---------------------------------------------------------------------------
// RecordTable – the complete loaded upload
// ---------------------------------------------------------------------------

/// The parsed upload with pre-computed column information.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordTable {
    /// All records in file order.
    pub records: Vec<SalesRecord>,
    /// Summable columns in header order (required and extra).
    pub numeric_columns: Vec<String>,
    /// Sorted distinct non-null categories.
    pub categories: BTreeSet<String>,
}

impl RecordTable {
    /// Build the category index from the loaded records.
    pub fn new(records: Vec<SalesRecord>, numeric_columns: Vec<String>) -> Self {
        let categories = records
            .iter()
            .filter_map(|r| r.category.clone())
            .collect();
        RecordTable {
            records,
            numeric_columns,
            categories,
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Options for the category selector.
    pub fn category_options(&self) -> Vec<String> {
        self.categories.iter().cloned().collect()
    }
}

// ---------------------------------------------------------------------------
// Filter selection
// ---------------------------------------------------------------------------

/// The two user-chosen parameters driving aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterSelection {
    /// `None` (or empty) means every category.
    pub category: Option<String>,
    pub period: Period,
}

impl FilterSelection {
    /// The category to match, if the filter is active.
    pub fn active_category(&self) -> Option<&str> {
        self.category.as_deref().filter(|c| !c.is_empty())
    }
}

// ---------------------------------------------------------------------------
// AggregatedTable – the bucketed sums that drive every chart
// ---------------------------------------------------------------------------

/// Sums of every numeric column within one bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedRow {
    /// First day of the bucket.
    pub bucket: NaiveDate,
    pub revenue: f64,
    pub expenses: f64,
    pub profit: f64,
    pub sales_volume: f64,
    pub extras: BTreeMap<String, f64>,
}

impl AggregatedRow {
    /// An all-zero row for `bucket` carrying the given extra columns.
    pub fn zeroed(bucket: NaiveDate, extra_columns: &[String]) -> Self {
        AggregatedRow {
            bucket,
            revenue: 0.0,
            expenses: 0.0,
            profit: 0.0,
            sales_volume: 0.0,
            extras: extra_columns.iter().map(|c| (c.clone(), 0.0)).collect(),
        }
    }

    /// Add one record's values into this bucket.
    pub fn accumulate(&mut self, record: &SalesRecord) {
        self.revenue += record.revenue;
        self.expenses += record.expenses;
        self.profit += record.profit;
        self.sales_volume += record.sales_volume;
        for (col, sum) in self.extras.iter_mut() {
            if let Some(v) = record.numeric(col) {
                *sum += v;
            }
        }
    }

    /// Summed value of a numeric column by name.
    pub fn value(&self, column: &str) -> Option<f64> {
        match column {
            REVENUE_COLUMN => Some(self.revenue),
            EXPENSES_COLUMN => Some(self.expenses),
            PROFIT_COLUMN => Some(self.profit),
            SALES_VOLUME_COLUMN => Some(self.sales_volume),
            other => self.extras.get(other).copied(),
        }
    }
}

/// Bucketed, summed view of a record table.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedTable {
    pub period: Period,
    /// Numeric columns in natural order (the `date` column is implicit).
    pub columns: Vec<String>,
    /// Rows ordered by ascending bucket start.
    pub rows: Vec<AggregatedRow>,
}

impl AggregatedTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Column headers as displayed: `date` followed by the numeric columns.
    pub fn header(&self) -> Vec<String> {
        std::iter::once(DATE_COLUMN.to_string())
            .chain(self.columns.iter().cloned())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(13, 30, 0)
            .unwrap()
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_bucket_start() {
        assert_eq!(Period::Monthly.bucket_start(at(2024, 2, 29)), ymd(2024, 2, 1));
        assert_eq!(Period::Quarterly.bucket_start(at(2024, 6, 30)), ymd(2024, 4, 1));
        assert_eq!(Period::Quarterly.bucket_start(at(2024, 10, 1)), ymd(2024, 10, 1));
        assert_eq!(Period::Yearly.bucket_start(at(2023, 12, 31)), ymd(2023, 1, 1));
    }

    #[test]
    fn test_next_bucket_rolls_over_year() {
        assert_eq!(Period::Monthly.next_bucket(ymd(2023, 12, 1)), Some(ymd(2024, 1, 1)));
        assert_eq!(Period::Quarterly.next_bucket(ymd(2023, 10, 1)), Some(ymd(2024, 1, 1)));
        assert_eq!(Period::Yearly.next_bucket(ymd(2023, 1, 1)), Some(ymd(2024, 1, 1)));
    }

    #[test]
    fn test_default_period_is_monthly() {
        assert_eq!(Period::default(), Period::Monthly);
        assert_eq!(FilterSelection::default().period, Period::Monthly);
    }

    #[test]
    fn test_empty_category_is_no_filter() {
        let sel = FilterSelection {
            category: Some(String::new()),
            period: Period::Monthly,
        };
        assert_eq!(sel.active_category(), None);
    }

    #[test]
    fn test_category_options_sorted_without_nulls() {
        let rec = |cat: Option<&str>| SalesRecord {
            date: at(2024, 1, 1),
            category: cat.map(str::to_string),
            revenue: 0.0,
            expenses: 0.0,
            profit: 0.0,
            sales_volume: 0.0,
            extras: BTreeMap::new(),
        };
        let table = RecordTable::new(
            vec![rec(Some("Toys")), rec(None), rec(Some("Food")), rec(Some("Toys"))],
            Vec::new(),
        );
        assert_eq!(table.category_options(), vec!["Food", "Toys"]);
    }
}
