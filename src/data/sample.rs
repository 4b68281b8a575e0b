use super::loader::FilePayload;

/// A year of monthly figures for three store categories, written by the
/// `generate_sample` binary.
const SAMPLE_CSV: &str = include_str!("../../assets/sample_retail.csv");

pub const SAMPLE_NAME: &str = "sample_retail.csv";

/// The built-in sample dataset, packaged like any other upload.
pub fn sample_payload() -> FilePayload {
    FilePayload::raw(Some(SAMPLE_NAME.to_string()), SAMPLE_CSV.as_bytes().to_vec())
}
