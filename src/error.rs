//! Error types for the orgsheet library.

use crate::sheet::LogicalColumn;
use std::io;
use thiserror::Error;

/// Result type alias for orgsheet operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading, transforming or importing a sheet.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error reading ZIP archive.
    #[error("ZIP archive error: {0}")]
    ZipArchive(String),

    /// Error parsing XML content.
    #[error("XML parse error: {0}")]
    XmlParse(String),

    /// A cell or row reference that is malformed or outside the sheet grid.
    #[error("Invalid cell reference: {0}")]
    InvalidCellReference(String),

    /// A required workbook part is missing.
    #[error("Missing component: {0}")]
    MissingComponent(String),

    /// The active worksheet has no header row.
    #[error("Worksheet is missing header rows.")]
    MissingHeaderRows,

    /// A required logical column is absent from the header row.
    #[error("Missing required column: {}", .0.label())]
    MissingColumn(LogicalColumn),

    /// Missing or invalid run configuration.
    #[error("{0}")]
    Config(String),

    /// The remote endpoint rejected a batch.
    ///
    /// `committed` counts the records of earlier batches that were
    /// accepted before this one failed; they stay upserted.
    #[error("Insert failed ({status}): {body}")]
    RemoteWrite {
        status: u16,
        body: String,
        committed: usize,
    },

    /// Transport-level HTTP failure (connect, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(String),

    /// JSON serialization failure.
    #[error("Serialization error: {0}")]
    Serialize(String),
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::ZipArchive(err.to_string())
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::XmlParse(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialize(err.to_string())
    }
}

#[cfg(feature = "import")]
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Http(err.to_string())
    }
}
