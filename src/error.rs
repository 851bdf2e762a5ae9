use thiserror::Error;

/// Errors raised by dataset construction, classification and record loading.
#[derive(Debug, Error)]
pub enum Error {
    /// A caller-supplied value violates a dataset or classifier invariant,
    /// e.g. an empty feature vector or a feature width mismatch.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed record input: {0}")]
    Csv(#[from] csv::Error),
}

impl Error {
    pub(crate) fn invalid_input(msg: impl Into<String>) -> Self {
        Error::InvalidInput(msg.into())
    }

    /// Feature width mismatch against an established width.
    pub(crate) fn width_mismatch(expected: usize, found: usize) -> Self {
        Error::InvalidInput(format!(
            "feature count {} is inconsistent with established feature count {}",
            found, expected
        ))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
