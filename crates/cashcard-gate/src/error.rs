//! Error types for the Authorization Gate

use thiserror::Error;

/// Result type for Authorization Gate operations
pub type Result<T> = std::result::Result<T, GateError>;

/// Errors that can occur while authenticating a request
#[derive(Error, Debug)]
pub enum GateError {
    /// No `Authorization` header on the request
    #[error("Missing credentials")]
    MissingCredentials,

    /// Header or credential payload could not be decoded
    #[error("Invalid credential format: {0}")]
    InvalidFormat(String),

    /// Scheme is not one the gate understands
    #[error("Unsupported authentication scheme: {0}")]
    UnsupportedScheme(String),

    /// Scheme is understood but no handler is registered for it
    #[error("No handler registered for scheme: {0}")]
    NoHandler(String),

    /// Username is not in the directory
    #[error("Unknown user")]
    UnknownUser,

    /// Password does not match
    #[error("Bad password")]
    BadPassword,

    /// Account exists but is switched off
    #[error("User account disabled")]
    Disabled,

    /// Directory entry is malformed
    #[error("Invalid user definition: {0}")]
    InvalidUser(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<base64::DecodeError> for GateError {
    fn from(err: base64::DecodeError) -> Self {
        GateError::InvalidFormat(format!("Invalid base64 encoding: {}", err))
    }
}

impl From<std::string::FromUtf8Error> for GateError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        GateError::InvalidFormat(format!("Credentials are not UTF-8: {}", err))
    }
}

impl From<serde_json::Error> for GateError {
    fn from(err: serde_json::Error) -> Self {
        GateError::InvalidUser(err.to_string())
    }
}
