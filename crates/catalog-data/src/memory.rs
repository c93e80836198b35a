//! In-memory collaborators (for development/testing).
//!
//! Each one records the calls it receives so callers can assert on what
//! the widget sent, and can be scripted with latency or failures.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use catalog_commerce::{
    AccountId, Item, OptionField, PicklistOption, PurchaseId, PurchaseRequest, RecordTypeId,
    SearchRequest,
};

use crate::account::AccountHeader;
use crate::dependency::Dependency;
use crate::error::RemoteError;
use crate::navigation::{NavigationSink, NavigationTarget};
use crate::notify::{Notification, NotificationSink};
use crate::services::{AccountDirectory, ImageRefresher, OptionService, PurchaseService, SearchService};

fn locked<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Catalog search over a fixed item list.
///
/// Types and families match when the set is empty or contains the item's
/// code; the search key is a case-insensitive substring of the name.
#[derive(Default)]
pub struct InMemoryCatalog {
    items: Vec<Item>,
    requests: Mutex<Vec<SearchRequest>>,
    latency: Mutex<VecDeque<Duration>>,
    failure: Mutex<Option<RemoteError>>,
}

impl InMemoryCatalog {
    pub fn new(items: Vec<Item>) -> Self {
        Self {
            items,
            ..Self::default()
        }
    }

    /// Delay the next not-yet-received search by `delay`. Delays are
    /// consumed one per call, in call order.
    pub fn queue_latency(&self, delay: Duration) {
        locked(&self.latency).push_back(delay);
    }

    /// Fail every search until [`InMemoryCatalog::recover`] is called.
    pub fn fail_with(&self, error: RemoteError) {
        *locked(&self.failure) = Some(error);
    }

    pub fn recover(&self) {
        *locked(&self.failure) = None;
    }

    /// Requests received so far, in call order.
    pub fn requests(&self) -> Vec<SearchRequest> {
        locked(&self.requests).clone()
    }

    pub fn call_count(&self) -> usize {
        locked(&self.requests).len()
    }

    fn matches(item: &Item, request: &SearchRequest) -> bool {
        let in_set = |set: &[String], code: &Option<String>| {
            set.is_empty() || code.as_ref().is_some_and(|c| set.contains(c))
        };
        let key = request.search_key.trim().to_lowercase();
        in_set(request.types.as_slice(), &item.item_type)
            && in_set(request.families.as_slice(), &item.family)
            && (key.is_empty() || item.name.to_lowercase().contains(&key))
    }
}

#[async_trait]
impl SearchService for InMemoryCatalog {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<Item>, RemoteError> {
        locked(&self.requests).push(request.clone());

        let delay = locked(&self.latency).pop_front();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(error) = locked(&self.failure).clone() {
            return Err(error);
        }

        Ok(self
            .items
            .iter()
            .filter(|item| Self::matches(item, request))
            .skip(request.offset as usize)
            .take(request.limit as usize)
            .cloned()
            .collect())
    }
}

/// Purchase service that records requests and replays scripted outcomes.
///
/// Without a scripted outcome each call succeeds with a sequential id.
#[derive(Default)]
pub struct RecordingPurchases {
    requests: Mutex<Vec<PurchaseRequest>>,
    outcomes: Mutex<VecDeque<Result<PurchaseId, RemoteError>>>,
    latency: Mutex<Option<Duration>>,
}

impl RecordingPurchases {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the outcome of the next call.
    pub fn push_outcome(&self, outcome: Result<PurchaseId, RemoteError>) {
        locked(&self.outcomes).push_back(outcome);
    }

    /// Delay every call.
    pub fn set_latency(&self, delay: Duration) {
        *locked(&self.latency) = Some(delay);
    }

    pub fn requests(&self) -> Vec<PurchaseRequest> {
        locked(&self.requests).clone()
    }

    pub fn call_count(&self) -> usize {
        locked(&self.requests).len()
    }
}

#[async_trait]
impl PurchaseService for RecordingPurchases {
    async fn checkout(&self, request: &PurchaseRequest) -> Result<PurchaseId, RemoteError> {
        let call = {
            let mut requests = locked(&self.requests);
            requests.push(request.clone());
            requests.len()
        };

        let delay = *locked(&self.latency);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let scripted = locked(&self.outcomes).pop_front();
        scripted.unwrap_or_else(|| Ok(PurchaseId::new(format!("PUR-{:04}", call))))
    }
}

/// Picklist options from a fixed table.
#[derive(Default)]
pub struct StaticOptions {
    options: HashMap<(RecordTypeId, OptionField), Vec<PicklistOption>>,
    failing: Mutex<HashSet<OptionField>>,
    latency: Mutex<HashMap<RecordTypeId, Duration>>,
    field_latency: Mutex<HashMap<OptionField, Duration>>,
    calls: Mutex<Vec<(RecordTypeId, OptionField)>>,
}

impl StaticOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the options of `field` for `record_type`.
    pub fn with_options(
        mut self,
        record_type: impl Into<RecordTypeId>,
        field: OptionField,
        options: Vec<PicklistOption>,
    ) -> Self {
        self.options.insert((record_type.into(), field), options);
        self
    }

    /// Delay every call for `record_type`.
    pub fn with_latency(self, record_type: impl Into<RecordTypeId>, delay: Duration) -> Self {
        locked(&self.latency).insert(record_type.into(), delay);
        self
    }

    /// Delay every call for `field`, whatever the record type.
    pub fn with_field_latency(self, field: OptionField, delay: Duration) -> Self {
        locked(&self.field_latency).insert(field, delay);
        self
    }

    /// Make calls for `field` fail.
    pub fn fail_field(&self, field: OptionField) {
        locked(&self.failing).insert(field);
    }

    pub fn heal_field(&self, field: OptionField) {
        locked(&self.failing).remove(&field);
    }

    pub fn calls(&self) -> Vec<(RecordTypeId, OptionField)> {
        locked(&self.calls).clone()
    }
}

#[async_trait]
impl OptionService for StaticOptions {
    async fn options_for(
        &self,
        record_type: &RecordTypeId,
        field: OptionField,
    ) -> Result<Vec<PicklistOption>, RemoteError> {
        locked(&self.calls).push((record_type.clone(), field));

        let by_type = locked(&self.latency).get(record_type).copied();
        let by_field = locked(&self.field_latency).get(&field).copied();
        if let Some(delay) = by_type.max(by_field) {
            tokio::time::sleep(delay).await;
        }

        if locked(&self.failing).contains(&field) {
            return Err(RemoteError::message(
                Dependency::Options,
                format!("picklist {} unavailable", field),
            ));
        }

        Ok(self
            .options
            .get(&(record_type.clone(), field))
            .cloned()
            .unwrap_or_default())
    }
}

/// Image refresher that counts calls and can be told to fail.
#[derive(Default)]
pub struct CountingImageRefresher {
    calls: AtomicUsize,
    failure: Mutex<Option<RemoteError>>,
}

impl CountingImageRefresher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_with(&self, error: RemoteError) {
        *locked(&self.failure) = Some(error);
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageRefresher for CountingImageRefresher {
    async fn refresh_images(&self) -> Result<(), RemoteError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match locked(&self.failure).clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

/// Account headers from a fixed table.
#[derive(Default)]
pub struct StaticAccounts {
    headers: HashMap<AccountId, AccountHeader>,
}

impl StaticAccounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_account(mut self, header: AccountHeader) -> Self {
        if let Some(id) = header.account_id.clone() {
            self.headers.insert(id, header);
        }
        self
    }
}

#[async_trait]
impl AccountDirectory for StaticAccounts {
    async fn account_header(&self, account_id: &AccountId) -> Result<AccountHeader, RemoteError> {
        self.headers.get(account_id).cloned().ok_or_else(|| {
            RemoteError::message(Dependency::Account, format!("account {} not found", account_id))
                .with_status(404)
        })
    }
}

/// Navigation sink that records every target.
#[derive(Default)]
pub struct RecordingNavigator {
    targets: Mutex<Vec<NavigationTarget>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn targets(&self) -> Vec<NavigationTarget> {
        locked(&self.targets).clone()
    }
}

impl NavigationSink for RecordingNavigator {
    fn navigate(&self, target: NavigationTarget) {
        locked(&self.targets).push(target);
    }
}

/// Notification sink that records every notification.
#[derive(Default)]
pub struct RecordingNotifier {
    notifications: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        locked(&self.notifications).clone()
    }

    pub fn last(&self) -> Option<Notification> {
        locked(&self.notifications).last().cloned()
    }
}

impl NotificationSink for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        locked(&self.notifications).push(notification);
    }
}
