//! Shared error type for configuration and primitive validation.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant where configuration problems can surface.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    /// A configuration field failed validation.  `field` is the dotted path
    /// (`horizon.horizon_periods`) so the user can find it in the document.
    #[error("invalid configuration field `{field}`: {reason}")]
    InvalidField { field: String, reason: String },

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CoreError {
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        CoreError::InvalidField { field: field.into(), reason: reason.into() }
    }
}

/// Shorthand result type for all `rh-*` crates.
pub type CoreResult<T> = Result<T, CoreError>;
