//! Account and user context supplied by the host page.

use catalog_commerce::{AccountId, UserId};
use serde::{Deserialize, Serialize};

/// Account summary shown above the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountHeader {
    pub account_id: Option<AccountId>,
    pub name: Option<String>,
    pub number: Option<String>,
    pub industry: Option<String>,
}

/// The signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub user_id: UserId,
    #[serde(default)]
    pub is_manager: bool,
}
