//! Data source load errors.
//!
//! Load and decode failures are fatal to process startup: they are
//! reported once with the underlying cause and never retried.

/// Error raised while loading a data source document.
#[derive(Debug, thiserror::Error)]
pub enum DataSourceError {
    /// The document could not be read from disk.
    #[error("open database: {0}")]
    Io(#[from] std::io::Error),

    /// The document is not a JSON object of string keys.
    #[error("decoding database: {0}")]
    Decode(#[from] serde_json::Error),
}
