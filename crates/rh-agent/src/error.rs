use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReactorError {
    #[error("unknown agent behavior {0:?}")]
    UnknownReactor(String),

    #[error("invalid agent parameter `{name}`: {reason}")]
    InvalidParam { name: String, reason: String },

    /// The reactor could not produce a response.
    #[error("reactor failed: {0}")]
    Failed(String),

    #[error("could not run agent command `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source:  std::io::Error,
    },

    #[error("agent command `{command}` exited with {status}: {stderr}")]
    ExitStatus { command: String, status: String, stderr: String },

    #[error("malformed agent response from `{command}`: {source}")]
    Response {
        command: String,
        #[source]
        source:  serde_json::Error,
    },
}

impl ReactorError {
    pub(crate) fn param(name: impl Into<String>, reason: impl Into<String>) -> Self {
        ReactorError::InvalidParam { name: name.into(), reason: reason.into() }
    }
}

pub type ReactorResult<T> = Result<T, ReactorError>;
