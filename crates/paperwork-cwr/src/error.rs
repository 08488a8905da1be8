//! Export error types.

use thiserror::Error;

/// Errors that can occur while producing a registration file.
///
/// Incomplete data is never an error: missing work codes, names,
/// registrant codes and odd shares are encoded as blanks or zeros.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The requested composition does not exist in the store.
    #[error("composition not found: {id}")]
    NotFound { id: String },

    /// The composition has no title to register under.
    #[error("composition {id} has no title")]
    MissingTitle { id: String },

    /// The catalog store failed.
    #[error("store error: {0}")]
    Store(#[from] paperwork_core::Error),
}

impl ExportError {
    /// Returns `true` when the request itself cannot be satisfied and
    /// should be reported to the user rather than retried.
    pub fn is_precondition(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::MissingTitle { .. })
    }
}

/// Convenience alias for export results.
pub type ExportResult<T> = std::result::Result<T, ExportError>;
