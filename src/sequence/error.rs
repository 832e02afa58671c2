use thiserror::Error;

pub type Result<T> = std::result::Result<T, StoreError>;

/// Failures raised by region and ordinal queries.
///
/// Loading an index never produces one of these: it reports through a
/// boolean instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("index not loaded")]
    IndexNotLoaded,

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("could not find valid sequence: {0}")]
    SequenceNotFound(String),

    /// The index resolved the request but returned no bases.
    #[error("empty query result on {name}:{start}-{end}")]
    EmptyResult { name: String, start: i64, end: i64 },
}
