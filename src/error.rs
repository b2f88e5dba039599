pub type SimanimResult<T> = Result<T, SimanimError>;

#[derive(thiserror::Error, Debug)]
pub enum SimanimError {
    /// Bad arguments or contract violations, reported before any I/O.
    #[error("validation error: {0}")]
    Validation(String),

    /// Malformed or missing timestamp/snapshot data. Fatal for the run.
    #[error("data error: {0}")]
    Data(String),

    /// External encoder invocation failed.
    #[error("encoding error: {0}")]
    Encoding(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SimanimError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn data(msg: impl Into<String>) -> Self {
        Self::Data(msg.into())
    }

    pub fn encoding(msg: impl Into<String>) -> Self {
        Self::Encoding(msg.into())
    }
}
