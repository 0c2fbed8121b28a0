//! Core error types for the tiered cache.

use thiserror::Error;

/// Boxed error returned by external value producers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Error type for every fallible cache operation.
///
/// # Error Categories
///
/// | Category | Variants | Recovery Strategy |
/// |----------|----------|-------------------|
/// | Configuration | ConfigError | Fix configuration |
/// | Capacity | EntryTooLarge | Shrink value or raise max_bytes |
/// | Collaborator | ProducerError | Retry the warmup for that input |
/// | Runtime | RuntimeUnavailable | Construct inside a tokio runtime |
/// | Internal | InvariantViolation | Bug; state is repaired, report it |
/// | Infrastructure | IoError | Retry or fix path |
#[derive(Debug, Error)]
pub enum CacheError {
    /// Configuration invalid or missing required fields.
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// A single entry exceeds the byte budget of the cache it targets.
    #[error("Entry size {size} bytes exceeds max_bytes {max} bytes")]
    EntryTooLarge { size: usize, max: usize },

    /// External value producer failed for one logical input.
    #[error("Producer failed for input '{input}': {source}")]
    ProducerError {
        input: String,
        #[source]
        source: BoxError,
    },

    /// Background work was requested outside a tokio runtime.
    #[error("Runtime unavailable: {message}")]
    RuntimeUnavailable { message: String },

    /// Internal invariant was found broken and repaired.
    #[error("Invariant violation: {message}")]
    InvariantViolation { message: String },

    /// File I/O error (config files).
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl CacheError {
    /// Shorthand for building a [`CacheError::ConfigError`].
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// True for configuration rejections.
    #[must_use]
    pub fn is_config_error(&self) -> bool {
        matches!(self, Self::ConfigError { .. })
    }

    /// True when retrying the same call may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ProducerError { .. } | Self::IoError(_))
    }
}

/// Result type alias for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;
