//! Commerce error types.

use thiserror::Error;

/// Errors that can occur while building catalog requests.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommerceError {
    /// Page size must be positive.
    #[error("Invalid page size: {0}")]
    InvalidPageSize(u32),

    /// Quantity cannot be sent to the purchase service.
    #[error("Invalid quantity for {item_id}: {qty}")]
    InvalidQuantity { item_id: String, qty: u32 },

    /// A purchase needs at least one line.
    #[error("Purchase has no lines")]
    EmptyPurchase,

    /// Serialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for CommerceError {
    fn from(e: serde_json::Error) -> Self {
        CommerceError::SerializationError(e.to_string())
    }
}
