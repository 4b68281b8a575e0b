use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Days, Months, NaiveDate};
use serde::Serialize;

/// One CSV row, in the column order the dashboard expects.
#[derive(Serialize)]
struct SampleRow {
    date: String,
    category: &'static str,
    revenue: i64,
    expenses: i64,
    profit: i64,
    sales_volume: u32,
    stock_level: u32,
}

/// Category name, base monthly revenue, cost ratio, average unit price.
const CATEGORIES: [(&str, f64, f64, f64); 3] = [
    ("Electronics", 4200.0, 0.72, 120.0),
    ("Groceries", 2600.0, 0.81, 9.0),
    ("Clothing", 1800.0, 0.64, 35.0),
];

const YEAR: i32 = 2024;
const MONTHS: u32 = 12;
const SEED: u64 = 42;
const DEFAULT_OUTPUT: &str = "assets/sample_retail.csv";

/// splitmix64: one word of state, enough for reproducible sample figures.
struct SplitMix(u64);

impl SplitMix {
    fn next_u64(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform value in `[lo, hi)` from the top 53 bits.
    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        let unit = (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64;
        lo + (hi - lo) * unit
    }

    fn below(&mut self, n: u64) -> u64 {
        self.next_u64() % n
    }
}

/// Holiday months sell more, the post-holiday months less.
fn seasonality(month: u32) -> f64 {
    match month {
        11 | 12 => 1.25,
        1 | 2 => 0.9,
        _ => 1.0,
    }
}

fn sample_row(
    rng: &mut SplitMix,
    month_start: NaiveDate,
    month: u32,
    spec: (&'static str, f64, f64, f64),
) -> SampleRow {
    let (category, base, cost_ratio, unit_price) = spec;
    let date = month_start + Days::new(rng.below(28));
    let revenue = (base * seasonality(month) * rng.uniform(0.9, 1.1)).round();
    let expenses = (revenue * cost_ratio * rng.uniform(0.95, 1.05)).round();
    SampleRow {
        date: date.format("%Y-%m-%d").to_string(),
        category,
        revenue: revenue as i64,
        expenses: expenses as i64,
        profit: (revenue - expenses) as i64,
        sales_volume: (revenue / unit_price).round() as u32,
        stock_level: 80 + rng.below(320) as u32,
    }
}

/// Writes the bundled sample dataset; an optional argument overrides the path.
fn main() -> Result<()> {
    let output = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));

    let mut rng = SplitMix(SEED);
    let first_month = NaiveDate::from_ymd_opt(YEAR, 1, 1).context("invalid start date")?;
    let mut writer = csv::Writer::from_path(&output)
        .with_context(|| format!("creating {}", output.display()))?;

    let mut rows = 0usize;
    for m in 0..MONTHS {
        let month_start = first_month
            .checked_add_months(Months::new(m))
            .context("date out of range")?;
        for spec in CATEGORIES {
            writer
                .serialize(sample_row(&mut rng, month_start, m + 1, spec))
                .context("writing CSV row")?;
            rows += 1;
        }
    }
    writer.flush().context("flushing CSV")?;

    println!(
        "Wrote {rows} rows ({MONTHS} months × {} categories) to {}",
        CATEGORIES.len(),
        output.display()
    );
    Ok(())
}
