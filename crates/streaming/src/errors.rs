use thiserror::Error;

pub type Result<T> = std::result::Result<T, FeedError>;

#[derive(Error, Debug)]
pub enum FeedError {
    #[error("fetch error {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("upstream HTTP {0}")]
    Status(u16),

    #[error("feed payload too large ({0} bytes)")]
    TooLarge(usize),

    #[error("IO error {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error {0}")]
    Parse(#[from] serde_json::Error),

    #[error("feed document has no states array")]
    MissingStates,
}

impl FeedError {
    /// True for failures of the body rather than of the transport.
    pub fn is_parse(&self) -> bool {
        matches!(self, FeedError::Parse(_) | FeedError::MissingStates)
    }
}

/// Why a single state tuple was rejected at the decode boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TupleError {
    #[error("state is not an array")]
    NotAnArray,

    #[error("unexpected state arity {0}")]
    Arity(usize),

    #[error("field {index} ({name}) has the wrong type")]
    Field { index: usize, name: &'static str },
}
