//! Widget error types.

use catalog_commerce::CommerceError;
use thiserror::Error;

/// Errors raised while building a controller.
///
/// Remote failures never surface here; they are folded into widget state
/// and notifications instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WidgetError {
    /// Configuration rejected at startup.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Domain error.
    #[error(transparent)]
    Commerce(#[from] CommerceError),
}
