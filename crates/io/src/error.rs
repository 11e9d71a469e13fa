use thiserror::Error;

/// Failures while taking in export files.
///
/// Only `Read` is fatal to an intake run; the rest are turned into
/// warnings by the processor and the batch continues.
#[derive(Debug, Error)]
pub enum IntakeError {
    /// Bytes are not a readable zip archive.
    #[error("cannot decode archive {name}: {source}")]
    Decode {
        name: String,
        #[source]
        source: zip::result::ZipError,
    },

    /// Neither an archive nor a JSON file.
    #[error("unsupported file: {0}")]
    Unsupported(String),

    /// The source itself could not be read.
    #[error("cannot read {name}: {source}")]
    Read {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Export(#[from] ExportError),
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("export is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}
