use thiserror::Error;

/// The puller cannot produce the next batch.
#[derive(Debug, Error)]
pub enum PullError {
    /// The source cannot be reached or opened.
    #[error("source unavailable: {0}")]
    Unavailable(String),

    #[error("failed to read from source: {0}")]
    Io(#[from] std::io::Error),

    /// The source produced data the puller cannot decode.
    #[error("malformed record: {0}")]
    Malformed(String),

    #[error("pull failed: {0}")]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

/// The pusher cannot write a batch.
#[derive(Debug, Error)]
pub enum PushError {
    /// The destination cannot be reached or opened.
    #[error("destination unavailable: {0}")]
    Unavailable(String),

    #[error("failed to write to destination: {0}")]
    Io(#[from] std::io::Error),

    /// The destination refused the data.
    #[error("destination rejected batch: {0}")]
    Rejected(String),

    #[error("push failed: {0}")]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

/// A transform step rejected a batch.
#[derive(Debug, Error)]
pub enum TransformError {
    #[error("invalid record: {0}")]
    InvalidRecord(String),

    #[error("transform failed: {0}")]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

/// A before/after task failed.
#[derive(Debug, Error)]
pub enum TaskError {
    #[error("{0}")]
    Failed(String),

    #[error("task I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("task failed: {0}")]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

/// Any failure that terminates a migrator's streaming loop. The executor
/// propagates these unmodified; there is no local recovery.
#[derive(Debug, Error)]
pub enum ExecuteError {
    #[error(transparent)]
    Pull(#[from] PullError),

    #[error(transparent)]
    Transform(#[from] TransformError),

    #[error(transparent)]
    Push(#[from] PushError),
}

/// Errors raised while building a registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("migration '{name}' is already registered")]
    DuplicateName { name: String },
}
