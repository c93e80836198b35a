//! Checkout module.
//!
//! Contains the purchase request submitted to the purchase service.

mod purchase;

pub use purchase::{PurchaseLine, PurchaseRequest};
