//! Navigation descriptors and the navigation sink.

use std::collections::BTreeMap;

use catalog_commerce::{AccountId, PurchaseId};
use serde::{Deserialize, Serialize};

/// Page-state key carrying the account id when the catalog is opened from
/// an account page.
pub const ACCOUNT_STATE_KEY: &str = "c__accountId";

/// Navigation item hosting the catalog.
pub const PURCHASE_PAGE: &str = "Purchase_Page1";

/// Record kinds the widget navigates to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectKind {
    Item,
    Purchase,
    Account,
}

impl ObjectKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectKind::Item => "item",
            ObjectKind::Purchase => "purchase",
            ObjectKind::Account => "account",
        }
    }
}

/// What to do on the destination page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageAction {
    View,
    New,
    Edit,
}

/// Destination descriptor handed to the [`NavigationSink`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NavigationTarget {
    /// A single record.
    RecordPage {
        object: ObjectKind,
        record_id: String,
        action: PageAction,
    },
    /// An object-level page (e.g. new-record form).
    ObjectPage { object: ObjectKind, action: PageAction },
    /// A custom navigation item with page state.
    NavItemPage {
        api_name: String,
        state: BTreeMap<String, String>,
    },
}

impl NavigationTarget {
    /// Detail view of a freshly created purchase.
    pub fn purchase_record(purchase_id: &PurchaseId) -> Self {
        NavigationTarget::RecordPage {
            object: ObjectKind::Purchase,
            record_id: purchase_id.to_string(),
            action: PageAction::View,
        }
    }

    /// New-item form.
    pub fn new_item() -> Self {
        NavigationTarget::ObjectPage {
            object: ObjectKind::Item,
            action: PageAction::New,
        }
    }

    /// The catalog page, opened on behalf of `account_id`.
    pub fn purchase_page(account_id: &AccountId) -> Self {
        let mut state = BTreeMap::new();
        state.insert(ACCOUNT_STATE_KEY.to_string(), account_id.to_string());
        NavigationTarget::NavItemPage {
            api_name: PURCHASE_PAGE.to_string(),
            state,
        }
    }
}

/// Current page reference as reported by the host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageReference {
    #[serde(default)]
    pub state: BTreeMap<String, String>,
}

impl PageReference {
    /// Page reference whose state carries `account_id`.
    pub fn for_account(account_id: &AccountId) -> Self {
        let mut state = BTreeMap::new();
        state.insert(ACCOUNT_STATE_KEY.to_string(), account_id.to_string());
        Self { state }
    }

    /// Account id carried in the page state, if any.
    pub fn account_id(&self) -> Option<AccountId> {
        self.state
            .get(ACCOUNT_STATE_KEY)
            .map(|id| AccountId::new(id.as_str()))
            .filter(|id| !id.is_blank())
    }
}

/// Performs page transitions. Fire-and-forget.
pub trait NavigationSink: Send + Sync {
    fn navigate(&self, target: NavigationTarget);
}
