use thiserror::Error;

/// Rejection of a single query parameter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParamError {
    /// Value could not be parsed as an integer.
    #[error("query parameter `{name}` must be an integer, got `{value}`")]
    Malformed {
        /// Parameter name as looked up (e.g. `"sizeKb"`).
        name: &'static str,
        /// Raw value as received.
        value: String,
    },
}

/// Canonical error type for workload dispatch.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// Caller supplied an unusable parameter.
    #[error(transparent)]
    InvalidParam(#[from] ParamError),

    /// Filesystem failure inside the I/O simulator.
    #[error("I/O error while {context}: {source}")]
    Io {
        /// What the simulator was doing when it failed.
        context: &'static str,
        /// Underlying OS error.
        source: std::io::Error,
    },

    /// A blocking workload task panicked or was cancelled.
    #[error("workload task failed: {0}")]
    Task(String),
}

impl ProbeError {
    /// Creates an `Io` variant.
    #[must_use]
    pub fn io(context: &'static str, source: std::io::Error) -> Self {
        Self::Io { context, source }
    }

    /// Whether the caller is at fault (maps to a 4xx at the HTTP edge).
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidParam(_))
    }
}

impl From<tokio::task::JoinError> for ProbeError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Task(err.to_string())
    }
}

/// Convenient result alias for probe operations.
pub type ProbeResult<T> = Result<T, ProbeError>;
