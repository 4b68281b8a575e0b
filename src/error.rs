use thiserror::Error;

/// Why an uploaded file could not become a record table.
///
/// Every variant leaves the previously loaded table untouched; the session
/// turns it into a status message.
#[derive(Error, Debug)]
pub enum UploadError {
    /// Payload is not valid base64, or the bytes are not UTF-8 text.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Text is not valid comma-separated data.
    #[error("CSV parse error: {0}")]
    Parse(String),

    /// A required column is missing or one of its values cannot be coerced.
    #[error("Schema error: {0}")]
    Schema(String),
}

impl From<csv::Error> for UploadError {
    fn from(err: csv::Error) -> Self {
        UploadError::Parse(err.to_string())
    }
}

impl UploadError {
    /// Short label for the status line.
    pub fn kind(&self) -> &'static str {
        match self {
            UploadError::Decode(_) => "decode",
            UploadError::Parse(_) => "parse",
            UploadError::Schema(_) => "schema",
        }
    }
}

pub type UploadResult<T> = std::result::Result<T, UploadError>;
