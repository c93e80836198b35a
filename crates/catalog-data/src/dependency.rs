//! Dependency tagging for semantic categorization.

use serde::Serialize;

/// Remote dependencies the widget talks to.
///
/// Tags travel with every [`RemoteError`](crate::RemoteError) and log line
/// so failures can be attributed without inspecting the error payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Dependency {
    /// Catalog search.
    Search,
    /// Purchase submission.
    Purchase,
    /// Picklist options for a record type.
    Options,
    /// Image refresh job.
    Images,
    /// Account header lookup.
    Account,
    /// Custom dependency with name.
    Custom(&'static str),
}

impl Dependency {
    /// Whether a failure of this dependency must be shown to the user.
    ///
    /// Search failures surface through the result store, purchase failures
    /// through a notification; the rest are logged only.
    pub fn is_user_facing(&self) -> bool {
        matches!(self, Self::Search | Self::Purchase)
    }

    /// Get the name of this dependency.
    pub fn name(&self) -> &str {
        match self {
            Self::Search => "search",
            Self::Purchase => "purchase",
            Self::Options => "options",
            Self::Images => "images",
            Self::Account => "account",
            Self::Custom(name) => name,
        }
    }
}

impl std::fmt::Display for Dependency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
