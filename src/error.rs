//! Error type shared by the step builder, the XML layer and the orchestrator.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, InjectError>;

#[derive(Debug, Error)]
pub enum InjectError {
    #[error("failed to read spreadsheet {}: {source}", path.display())]
    Spreadsheet {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },

    #[error("spreadsheet {} contains no sheets", path.display())]
    NoSheets { path: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed XML at byte {position}: {message}")]
    Parse { position: u64, message: String },

    #[error("no testcase found in {}", path.display())]
    MissingTestcase { path: PathBuf },

    /// A cell value that has no text representation (row and column are 1-based)
    #[error("cell at row {row}, column {column} cannot be converted to text: {reason}")]
    Serialization {
        row: usize,
        column: usize,
        reason: String,
    },

    #[error("failed to render XML: {0}")]
    Render(String),

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
