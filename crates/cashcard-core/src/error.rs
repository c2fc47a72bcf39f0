//! Error types for the CashCard domain

use thiserror::Error;

/// Result type alias using CoreError
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors raised while validating domain input
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// Amount is NaN or infinite
    #[error("Invalid amount: {0}")]
    InvalidAmount(f64),

    /// Page index is not a non-negative integer
    #[error("Invalid page index: {0}")]
    InvalidPage(String),

    /// Page size is not a positive integer
    #[error("Invalid page size: {0}")]
    InvalidPageSize(String),

    /// Sort property is not one of the sortable columns
    #[error("Unknown sort property: {0}")]
    UnknownSortField(String),
}
