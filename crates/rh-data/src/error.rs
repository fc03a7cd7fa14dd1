use thiserror::Error;

#[derive(Debug, Error)]
pub enum DataError {
    #[error("stratum {0:?} is defined more than once")]
    DuplicateStratum(String),

    #[error("{table} references unknown stratum {id:?}")]
    UnknownStratum { id: String, table: &'static str },

    #[error("invalid {what}: {reason}")]
    InvalidValue { what: String, reason: String },

    #[error("data parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DataError {
    pub(crate) fn invalid(what: impl Into<String>, reason: impl Into<String>) -> Self {
        DataError::InvalidValue { what: what.into(), reason: reason.into() }
    }
}

pub type DataResult<T> = Result<T, DataError>;
