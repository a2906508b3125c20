//! Error types for store implementations and construction.
//!
//! These errors never cross the coordinator boundary: `TieredCache` converts
//! every tier failure into a cache miss (see `coordinator`). They exist so
//! store implementations can propagate failures with `?` and so construction
//! problems (bad pool config, runtime build failure) stay visible.

use std::fmt;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by cache stores and constructors.
#[derive(Debug)]
pub enum Error {
    /// A tier is unreachable or rejected an operation (network failure,
    /// pool exhaustion, protocol error).
    BackendError(String),

    /// A value could not be encoded for the distributed tier.
    SerializationError(String),

    /// Invalid configuration (bad URL, pool build failure, runtime build
    /// failure).
    ConfigError(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BackendError(msg) => write!(f, "cache backend error: {}", msg),
            Error::SerializationError(msg) => write!(f, "serialization error: {}", msg),
            Error::ConfigError(msg) => write!(f, "configuration error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::BackendError("connection refused".to_string());
        assert_eq!(err.to_string(), "cache backend error: connection refused");

        let err = Error::SerializationError("bad value".to_string());
        assert_eq!(err.to_string(), "serialization error: bad value");

        let err = Error::ConfigError("empty url".to_string());
        assert_eq!(err.to_string(), "configuration error: empty url");
    }
}
