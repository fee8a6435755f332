//! Crate-wide error types.
//!
//! The art request path itself is infallible by contract: a song whose art
//! cannot be resolved simply keeps the placeholder. These types cover the
//! fallible edges around it (store I/O, HTTP client construction and
//! transfers, cache setup).

/// Crate-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors from the fallible edges of the art cache.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Image encode/decode error
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// HTTP transfer or client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// The background worker could not be started
    #[error("Failed to start art worker: {0}")]
    WorkerSpawn(std::io::Error),
}

impl Error {
    /// Create a config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}
