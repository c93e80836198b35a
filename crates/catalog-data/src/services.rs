//! Remote services consumed by the widget.
//!
//! Every call is async and returns `Result<_, RemoteError>`. Timeouts and
//! retries are the implementor's concern; the widget applies none.

use async_trait::async_trait;
use catalog_commerce::{
    AccountId, Item, OptionField, PicklistOption, PurchaseId, PurchaseRequest, RecordTypeId,
    SearchRequest,
};

use crate::account::AccountHeader;
use crate::error::RemoteError;

/// Catalog search.
#[async_trait]
pub trait SearchService: Send + Sync {
    /// Run a search and return one page of items.
    async fn search(&self, request: &SearchRequest) -> Result<Vec<Item>, RemoteError>;
}

/// Purchase submission.
#[async_trait]
pub trait PurchaseService: Send + Sync {
    /// Create a purchase and return its id.
    async fn checkout(&self, request: &PurchaseRequest) -> Result<PurchaseId, RemoteError>;
}

/// Picklist options keyed by record type.
#[async_trait]
pub trait OptionService: Send + Sync {
    /// Options of `field` for the given record type.
    async fn options_for(
        &self,
        record_type: &RecordTypeId,
        field: OptionField,
    ) -> Result<Vec<PicklistOption>, RemoteError>;
}

/// Backend job that refreshes item images.
#[async_trait]
pub trait ImageRefresher: Send + Sync {
    async fn refresh_images(&self) -> Result<(), RemoteError>;
}

/// Account header lookup.
#[async_trait]
pub trait AccountDirectory: Send + Sync {
    async fn account_header(&self, account_id: &AccountId) -> Result<AccountHeader, RemoteError>;
}
