use std::collections::BTreeMap;

use chrono::NaiveDate;

use super::model::{
    AggregatedRow, AggregatedTable, FilterSelection, REQUIRED_NUMERIC_COLUMNS, RecordTable,
    SalesRecord,
};

// ---------------------------------------------------------------------------
// Category filter
// ---------------------------------------------------------------------------

/// Return the records that pass the category filter.
///
/// A record passes when:
/// * No category is selected (or the selection is empty) → passes
/// * The record's category equals the selection exactly → passes
/// * The record has no category → fails whenever a filter is active
pub fn filtered_records<'a>(
    table: &'a RecordTable,
    selection: &FilterSelection,
) -> Vec<&'a SalesRecord> {
    match selection.active_category() {
        None => table.records.iter().collect(),
        Some(wanted) => table
            .records
            .iter()
            .filter(|r| r.category.as_deref() == Some(wanted))
            .collect(),
    }
}

// ---------------------------------------------------------------------------
// Resample + sum
// ---------------------------------------------------------------------------

/// Filter by category, bucket by calendar period and sum every numeric column.
///
/// Buckets are keyed by their first day and returned in ascending order.
/// Buckets between the first and last populated one are present with zero
/// sums, so the time axis has no holes. An empty selection yields zero rows.
pub fn aggregate(table: &RecordTable, selection: &FilterSelection) -> AggregatedTable {
    let period = selection.period;
    let extra_columns: Vec<String> = table
        .numeric_columns
        .iter()
        .filter(|c| !REQUIRED_NUMERIC_COLUMNS.contains(&c.as_str()))
        .cloned()
        .collect();

    let mut buckets: BTreeMap<NaiveDate, AggregatedRow> = BTreeMap::new();
    for record in filtered_records(table, selection) {
        let start = period.bucket_start(record.date);
        buckets
            .entry(start)
            .or_insert_with(|| AggregatedRow::zeroed(start, &extra_columns))
            .accumulate(record);
    }

    let mut rows = Vec::with_capacity(buckets.len());
    if let (Some(&first), Some(&last)) = (buckets.keys().next(), buckets.keys().next_back()) {
        let mut cursor = Some(first);
        while let Some(start) = cursor.filter(|s| *s <= last) {
            let row = buckets
                .remove(&start)
                .unwrap_or_else(|| AggregatedRow::zeroed(start, &extra_columns));
            rows.push(row);
            cursor = period.next_bucket(start);
        }
    }

    log::debug!(
        "Aggregated {} records into {} {} buckets (category: {:?})",
        table.len(),
        rows.len(),
        period,
        selection.active_category()
    );

    AggregatedTable {
        period,
        columns: table.numeric_columns.clone(),
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::parse_csv;
    use crate::data::model::Period;

    const HEADER: &str = "date,category,revenue,expenses,profit,sales_volume";

    fn table(rows: &[&str]) -> RecordTable {
        let mut text = format!("{HEADER}\n");
        for row in rows {
            text.push_str(row);
            text.push('\n');
        }
        parse_csv(&text).unwrap()
    }

    fn select(category: Option<&str>, period: Period) -> FilterSelection {
        FilterSelection {
            category: category.map(str::to_string),
            period,
        }
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_two_january_rows_sum_to_one_bucket() {
        let t = table(&["2024-01-15,A,100,40,60,10", "2024-01-20,A,50,10,40,5"]);
        let agg = aggregate(&t, &select(None, Period::Monthly));
        assert_eq!(agg.len(), 1);
        let row = &agg.rows[0];
        assert_eq!(row.bucket, ymd(2024, 1, 1));
        assert_eq!(row.revenue, 150.0);
        assert_eq!(row.expenses, 50.0);
        assert_eq!(row.profit, 100.0);
        assert_eq!(row.sales_volume, 15.0);
        assert_eq!(
            agg.header(),
            vec!["date", "revenue", "expenses", "profit", "sales_volume"]
        );
    }

    #[test]
    fn test_category_filter_is_exact_match() {
        let t = table(&[
            "2024-01-15,A,100,40,60,10",
            "2024-01-16,AB,1,1,1,1",
            "2024-01-17,,7,7,7,7",
        ]);
        let agg = aggregate(&t, &select(Some("A"), Period::Monthly));
        assert_eq!(agg.rows[0].revenue, 100.0);

        let all = aggregate(&t, &select(Some(""), Period::Monthly));
        assert_eq!(all.rows[0].revenue, 108.0);
    }

    #[test]
    fn test_unknown_category_yields_empty_table() {
        let t = table(&["2024-01-15,A,100,40,60,10"]);
        let agg = aggregate(&t, &select(Some("Garden"), Period::Quarterly));
        assert!(agg.is_empty());
        assert_eq!(agg.period, Period::Quarterly);
    }

    #[test]
    fn test_buckets_strictly_increasing_for_every_period() {
        let t = table(&[
            "2024-11-03,A,1,1,1,1",
            "2023-02-10,B,1,1,1,1",
            "2024-02-01,A,1,1,1,1",
            "2023-12-31,B,1,1,1,1",
            "2024-02-29,A,1,1,1,1",
        ]);
        for period in Period::ALL {
            let agg = aggregate(&t, &select(None, period));
            assert!(!agg.is_empty());
            for pair in agg.rows.windows(2) {
                assert!(pair[0].bucket < pair[1].bucket, "{period}: {pair:?}");
            }
            let total: f64 = agg.rows.iter().map(|r| r.revenue).sum();
            assert_eq!(total, 5.0, "{period}");
        }
    }

    #[test]
    fn test_gaps_are_zero_filled() {
        let t = table(&["2024-01-15,A,10,1,9,1", "2024-04-02,A,20,2,18,2"]);
        let agg = aggregate(&t, &select(None, Period::Monthly));
        let buckets: Vec<NaiveDate> = agg.rows.iter().map(|r| r.bucket).collect();
        assert_eq!(
            buckets,
            vec![ymd(2024, 1, 1), ymd(2024, 2, 1), ymd(2024, 3, 1), ymd(2024, 4, 1)]
        );
        assert_eq!(agg.rows[1].revenue, 0.0);
        assert_eq!(agg.rows[2].profit, 0.0);

        let quarterly = aggregate(&t, &select(None, Period::Quarterly));
        assert_eq!(quarterly.len(), 2);
        assert_eq!(quarterly.rows[1].bucket, ymd(2024, 4, 1));
    }

    #[test]
    fn test_yearly_buckets() {
        let t = table(&["2022-06-01,A,1,0,1,1", "2024-06-01,A,2,0,2,1"]);
        let agg = aggregate(&t, &select(None, Period::Yearly));
        let buckets: Vec<NaiveDate> = agg.rows.iter().map(|r| r.bucket).collect();
        assert_eq!(buckets, vec![ymd(2022, 1, 1), ymd(2023, 1, 1), ymd(2024, 1, 1)]);
    }

    #[test]
    fn test_extra_numeric_columns_are_summed() {
        let t = parse_csv(
            "date,category,revenue,expenses,profit,sales_volume,stock_level\n\
             2024-01-01,A,1,1,0,1,5\n\
             2024-01-09,A,1,1,0,1,\n\
             2024-01-14,A,1,1,0,1,NaN\n\
             2024-01-20,A,1,1,0,1,2.5\n",
        )
        .unwrap();
        let agg = aggregate(&t, &select(None, Period::Monthly));
        // Blank and NaN cells are skipped, not propagated.
        assert_eq!(agg.rows[0].value("stock_level"), Some(7.5));
        assert_eq!(agg.header().last().map(String::as_str), Some("stock_level"));
    }

    #[test]
    fn test_single_bucket_aggregation_is_idempotent() {
        let t = table(&[
            "2024-07-02,A,100,40,60,10",
            "2024-08-20,B,50,10,40,5",
            "2024-09-30,A,5,1,4,1",
        ]);
        let selection = select(None, Period::Quarterly);
        let once = aggregate(&t, &selection);
        assert_eq!(once.len(), 1);

        // Feed the aggregated rows back in as records.
        let records = once
            .rows
            .iter()
            .map(|r| SalesRecord {
                date: r.bucket.and_hms_opt(0, 0, 0).unwrap(),
                category: None,
                revenue: r.revenue,
                expenses: r.expenses,
                profit: r.profit,
                sales_volume: r.sales_volume,
                extras: BTreeMap::new(),
            })
            .collect();
        let again = aggregate(&RecordTable::new(records, t.numeric_columns.clone()), &selection);
        assert_eq!(again, once);
    }

    #[test]
    fn test_aggregate_does_not_mutate_input() {
        let t = table(&["2024-01-15,A,100,40,60,10"]);
        let before = t.clone();
        let _ = aggregate(&t, &select(Some("A"), Period::Yearly));
        assert_eq!(t, before);
    }
}
