//! Centralized error handling for datadeck.
//!
//! Errors are split by the blast radius they are allowed to have:
//!
//! - [`DerivationError`] fails a single view. The report pipeline records it and
//!   moves on to the next view.
//! - [`RenderError`] fails a single page (the chart backend could not encode an
//!   image, or a chart could not be read back from its table).
//! - [`AssemblyError`] fails the whole [`Document`](crate::document::Document).
//!   No partial document is ever returned as a success.
//!
//! [`DeckError`] wraps all of them together with the I/O and data-processing
//! failures raised at the ingestion and export boundaries, so callers can use
//! `?` throughout:
//!
//! ```no_run
//! use datadeck::error::{Result, ResultExt as _};
//!
//! fn read_recipe(path: &str) -> Result<String> {
//!     let content = std::fs::read_to_string(path).context("Failed to read report recipe")?;
//!     Ok(content)
//! }
//! ```

use crate::dataset::ColumnKind;
use std::fmt;

/// Main error type for datadeck operations.
#[derive(Debug)]
pub enum DeckError {
    /// I/O errors (file operations)
    Io(std::io::Error),

    /// Data processing errors (Polars, parsing, etc.)
    DataProcessing(String),

    /// The dataset violates its shape invariants
    InvalidDataset(String),

    /// A view could not be derived
    Derivation(DerivationError),

    /// A page could not be rendered
    Render(RenderError),

    /// The document could not be assembled
    Assembly(AssemblyError),

    /// Export of a table, image or document failed
    Export(String),

    /// Configuration errors
    Config(String),

    /// Generic error with context
    Other(String),
}

impl fmt::Display for DeckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::DataProcessing(msg) => write!(f, "Data processing error: {msg}"),
            Self::InvalidDataset(msg) => write!(f, "Invalid dataset: {msg}"),
            Self::Derivation(e) => write!(f, "View derivation failed: {e}"),
            Self::Render(e) => write!(f, "Page rendering failed: {e}"),
            Self::Assembly(e) => write!(f, "Document assembly failed: {e}"),
            Self::Export(msg) => write!(f, "Export error: {msg}"),
            Self::Config(msg) => write!(f, "Configuration error: {msg}"),
            Self::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for DeckError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Derivation(e) => Some(e),
            Self::Render(e) => Some(e),
            Self::Assembly(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for DeckError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<anyhow::Error> for DeckError {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(format!("{err:#}"))
    }
}

impl From<serde_json::Error> for DeckError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(format!("JSON error: {err}"))
    }
}

impl From<polars::error::PolarsError> for DeckError {
    fn from(err: polars::error::PolarsError) -> Self {
        Self::DataProcessing(err.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for DeckError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        Self::Export(format!("XLSX error: {err}"))
    }
}

impl From<DerivationError> for DeckError {
    fn from(err: DerivationError) -> Self {
        Self::Derivation(err)
    }
}

impl From<RenderError> for DeckError {
    fn from(err: RenderError) -> Self {
        Self::Render(err)
    }
}

impl From<AssemblyError> for DeckError {
    fn from(err: AssemblyError) -> Self {
        Self::Assembly(err)
    }
}

/// Why a single view could not be derived.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DerivationError {
    /// Too few columns or rows for the view kind. The view is skipped.
    InsufficientData { reason: String },

    /// The ordering key of a trend view mixes incomparable value types.
    UnsortableKey { column: String },

    /// The view references a column the dataset does not have.
    UnknownColumn(String),

    /// The referenced column has a kind the view cannot use.
    WrongColumnKind {
        column: String,
        expected: &'static str,
        found: ColumnKind,
    },
}

impl DerivationError {
    pub fn insufficient(reason: impl Into<String>) -> Self {
        Self::InsufficientData {
            reason: reason.into(),
        }
    }

    /// Stable snake_case tag, used in logs and failure listings.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::InsufficientData { .. } => "insufficient_data",
            Self::UnsortableKey { .. } => "unsortable_key",
            Self::UnknownColumn(_) => "unknown_column",
            Self::WrongColumnKind { .. } => "wrong_column_kind",
        }
    }
}

impl fmt::Display for DerivationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InsufficientData { reason } => write!(f, "Insufficient data: {reason}"),
            Self::UnsortableKey { column } => {
                write!(f, "Column '{column}' mixes incomparable values and cannot be sorted")
            }
            Self::UnknownColumn(column) => write!(f, "Column '{column}' does not exist"),
            Self::WrongColumnKind {
                column,
                expected,
                found,
            } => write!(f, "Column '{column}' must be {expected}, found {found}"),
        }
    }
}

impl std::error::Error for DerivationError {}

/// Why a single page could not be rendered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RenderError {
    /// The chart backend failed to produce an image.
    EncodingFailure(String),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EncodingFailure(msg) => write!(f, "Chart encoding failed: {msg}"),
        }
    }
}

impl std::error::Error for RenderError {}

/// Why a document could not be finalized.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AssemblyError {
    /// No pages were supplied.
    Empty,

    /// A page has no title, image or table.
    BlankPage { index: usize },
}

impl fmt::Display for AssemblyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "a document needs at least one page"),
            Self::BlankPage { index } => {
                write!(f, "page {} has no title, image or table", index + 1)
            }
        }
    }
}

impl std::error::Error for AssemblyError {}

/// Result type alias for datadeck operations.
pub type Result<T> = std::result::Result<T, DeckError>;

/// Extension trait to add context to results.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, msg: impl Into<String>) -> Result<T>;

    /// Add context using a closure (lazy evaluation).
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<DeckError>,
{
    fn context(self, msg: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let err: DeckError = e.into();
            DeckError::Other(format!("{}: {}", msg.into(), err))
        })
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let err: DeckError = e.into();
            DeckError::Other(format!("{}: {}", f(), err))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DeckError::DataProcessing("column not found".to_owned());
        assert_eq!(err.to_string(), "Data processing error: column not found");
    }

    #[test]
    fn test_derivation_reason_tags() {
        let err = DerivationError::UnsortableKey {
            column: "when".to_owned(),
        };
        assert_eq!(err.reason(), "unsortable_key");
        assert_eq!(
            DerivationError::insufficient("insufficient columns").to_string(),
            "Insufficient data: insufficient columns"
        );
    }

    #[test]
    fn test_assembly_error_wraps() {
        let err: DeckError = AssemblyError::BlankPage { index: 2 }.into();
        assert_eq!(
            err.to_string(),
            "Document assembly failed: page 3 has no title, image or table"
        );
    }

    #[test]
    fn test_result_context() {
        let result: std::result::Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "file.csv",
        ));

        let result: Result<()> = result.context("Failed to read file");
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to read file")
        );
    }
}
