use thiserror::Error;

/// Errors returned by the cart/order backend.
///
/// The pages never show these to the user verbatim; every variant collapses
/// into the same generic alert or error status.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ApiError {
    #[error("Session token rejected")]
    Unauthorized,
    #[error("Request rejected: {0}")]
    Rejected(String),
    #[error("Server error: {0}")]
    Server(String),
    #[error("Backend unavailable: {0}")]
    Unavailable(String),
}

/// Errors from talking to a page service through its client.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PageError {
    #[error("Page service closed")]
    Closed,
    #[error("Page service dropped the request")]
    Dropped,
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid {key} value {value:?}: {reason}")]
    Invalid {
        key: String,
        value: String,
        reason: String,
    },
}
