//! Remote call failures.

use std::fmt;

use serde::Serialize;

use crate::dependency::Dependency;

/// Message used when a failure carries nothing presentable.
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// Structured error body returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, serde::Deserialize)]
pub struct ErrorBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// An opaque failure of a remote collaborator.
///
/// The core never branches on its contents; it only records it or turns it
/// into a user message via [`RemoteError::user_message`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RemoteError {
    /// Which dependency failed.
    pub dependency: Dependency,
    /// HTTP-like status, when the transport reports one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    /// Structured backend body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<ErrorBody>,
    /// Generic message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Anything else the transport attached.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl RemoteError {
    /// Create an error with no payload.
    pub fn new(dependency: Dependency) -> Self {
        Self {
            dependency,
            status: None,
            body: None,
            message: None,
            details: None,
        }
    }

    /// Create an error carrying a structured backend message.
    pub fn backend(dependency: Dependency, message: impl Into<String>) -> Self {
        Self::new(dependency).with_body_message(message)
    }

    /// Create an error carrying a generic message.
    pub fn message(dependency: Dependency, message: impl Into<String>) -> Self {
        Self::new(dependency).with_message(message)
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_body_message(mut self, message: impl Into<String>) -> Self {
        self.body = Some(ErrorBody {
            message: Some(message.into()),
        });
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Best-effort message for the user.
    ///
    /// Precedence: structured body message, then generic message, then the
    /// whole error serialized as JSON.
    pub fn user_message(&self) -> String {
        let body_message = self.body.as_ref().and_then(|b| b.message.as_deref());
        if let Some(msg) = body_message.filter(|m| !m.trim().is_empty()) {
            return msg.to_string();
        }
        if let Some(msg) = self.message.as_deref().filter(|m| !m.trim().is_empty()) {
            return msg.to_string();
        }
        serde_json::to_string(self).unwrap_or_else(|_| UNKNOWN_ERROR.to_string())
    }
}

impl fmt::Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} call failed", self.dependency)?;
        if let Some(status) = self.status {
            write!(f, " ({})", status)?;
        }
        write!(f, ": {}", self.user_message())
    }
}

impl std::error::Error for RemoteError {}

impl From<serde_json::Error> for RemoteError {
    fn from(e: serde_json::Error) -> Self {
        RemoteError::message(Dependency::Custom("serialization"), e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_message_wins() {
        let err = RemoteError::backend(Dependency::Purchase, "Insufficient stock")
            .with_message("Bad Request");
        assert_eq!(err.user_message(), "Insufficient stock");
    }

    #[test]
    fn test_generic_message_second() {
        let err = RemoteError::message(Dependency::Purchase, "Network down");
        assert_eq!(err.user_message(), "Network down");

        let blank_body = RemoteError::message(Dependency::Purchase, "Network down")
            .with_body_message("  ");
        assert_eq!(blank_body.user_message(), "Network down");
    }

    #[test]
    fn test_serialized_fallback() {
        let err = RemoteError::new(Dependency::Purchase)
            .with_status(500)
            .with_details(serde_json::json!({"code": "E42"}));
        let msg = err.user_message();
        let parsed: serde_json::Value = serde_json::from_str(&msg).unwrap();
        assert_eq!(parsed["dependency"], "purchase");
        assert_eq!(parsed["status"], 500);
        assert_eq!(parsed["details"]["code"], "E42");
    }

    #[test]
    fn test_display() {
        let err = RemoteError::message(Dependency::Search, "boom").with_status(503);
        assert_eq!(err.to_string(), "search call failed (503): boom");
    }
}
