//! The catalog controller.
//!
//! `CatalogController` is the single entry point a host drives: it takes
//! user events and context signals, updates [`WidgetState`] through one
//! path per operation, and talks to the remote collaborators.
//!
//! All fetching methods spawn Tokio tasks and must be called from within
//! a runtime.

use std::sync::{Arc, Mutex};

use catalog_commerce::{
    AccountId, CartOp, CartOutcome, FetchMode, Filter, FilterChange, Item, ItemId, RecordTypeId,
    SearchRequest,
};
use catalog_data::{
    AccountDirectory, AccountHeader, ImageRefresher, NavigationSink, NavigationTarget,
    NotificationSink, OptionService, PageReference, PurchaseService, SearchService, UserProfile,
};
use tracing::{debug, info, warn};

use crate::checkout::{CheckoutOrchestrator, CheckoutOutcome};
use crate::config::WidgetConfig;
use crate::error::WidgetError;
use crate::lock;
use crate::options::{DependentOptionResolver, OptionRefresh};
use crate::scheduler::{FetchScheduler, PendingFetch};
use crate::state::{WidgetState, WidgetView};
use crate::store::FetchOutcome;

/// Remote services and host sinks the controller works with.
#[derive(Clone)]
pub struct Collaborators {
    pub search: Arc<dyn SearchService>,
    pub purchases: Arc<dyn PurchaseService>,
    pub options: Arc<dyn OptionService>,
    pub navigator: Arc<dyn NavigationSink>,
    pub notifier: Arc<dyn NotificationSink>,
    pub images: Option<Arc<dyn ImageRefresher>>,
    pub accounts: Option<Arc<dyn AccountDirectory>>,
}

impl Collaborators {
    pub fn new(
        search: Arc<dyn SearchService>,
        purchases: Arc<dyn PurchaseService>,
        options: Arc<dyn OptionService>,
        navigator: Arc<dyn NavigationSink>,
        notifier: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            search,
            purchases,
            options,
            navigator,
            notifier,
            images: None,
            accounts: None,
        }
    }

    pub fn with_images(mut self, images: Arc<dyn ImageRefresher>) -> Self {
        self.images = Some(images);
        self
    }

    pub fn with_accounts(mut self, accounts: Arc<dyn AccountDirectory>) -> Self {
        self.accounts = Some(accounts);
        self
    }
}

/// Fetches started by [`CatalogController::connect`].
#[derive(Debug)]
pub struct Connection {
    /// The initial unfiltered search.
    pub initial: PendingFetch,
    /// Image refresh followed by a second search, when enabled.
    pub image_refresh: Option<PendingFetch>,
}

struct Inner {
    config: WidgetConfig,
    state: Mutex<WidgetState>,
    scheduler: FetchScheduler,
    options: DependentOptionResolver,
    checkout: CheckoutOrchestrator,
    search: Arc<dyn SearchService>,
    navigator: Arc<dyn NavigationSink>,
    images: Option<Arc<dyn ImageRefresher>>,
    accounts: Option<Arc<dyn AccountDirectory>>,
}

/// Client-side state controller for the catalog widget.
///
/// Cheap to clone; clones share state.
#[derive(Clone)]
pub struct CatalogController {
    inner: Arc<Inner>,
}

impl CatalogController {
    pub fn new(config: WidgetConfig, collaborators: Collaborators) -> Result<Self, WidgetError> {
        config.validate()?;
        let filter = Filter::new(config.page_size)?;
        let Collaborators {
            search,
            purchases,
            options,
            navigator,
            notifier,
            images,
            accounts,
        } = collaborators;

        let inner = Inner {
            scheduler: FetchScheduler::new(config.debounce()),
            state: Mutex::new(WidgetState::new(filter)),
            options: DependentOptionResolver::new(options),
            checkout: CheckoutOrchestrator::new(purchases, notifier, navigator.clone()),
            search,
            navigator,
            images,
            accounts,
            config,
        };
        Ok(Self {
            inner: Arc::new(inner),
        })
    }

    pub fn config(&self) -> &WidgetConfig {
        &self.inner.config
    }

    /// Load the first page, then run the image refresher if enabled.
    pub fn connect(&self) -> Connection {
        info!(page_size = self.inner.config.page_size, "catalog connected");
        let initial = self.inner.scheduler.immediate(run_fetch(self.inner.clone()));

        let image_refresh = match &self.inner.images {
            Some(images) if self.inner.config.refresh_images_on_connect => {
                let images = images.clone();
                let inner = self.inner.clone();
                Some(PendingFetch::spawn(async move {
                    match images.refresh_images().await {
                        Ok(()) => {
                            debug!("images refreshed");
                            run_fetch(inner).await
                        }
                        Err(err) => {
                            warn!(error = %err, dependency = %err.dependency, "image refresh failed");
                            FetchOutcome::Skipped
                        }
                    }
                }))
            }
            _ => None,
        };

        Connection {
            initial,
            image_refresh,
        }
    }

    // -- filter -----------------------------------------------------------

    /// Apply a filter change and schedule the search it calls for.
    pub fn apply_filter(&self, change: FilterChange) -> PendingFetch {
        let kind = change.kind();
        let mode = lock(&self.inner.state).filter.apply(change);
        debug!(change = kind, mode = ?mode, "filter changed");

        let inner = self.inner.clone();
        match mode {
            FetchMode::Debounced => self.inner.scheduler.debounce(move || run_fetch(inner)),
            FetchMode::Immediate => self.inner.scheduler.immediate(run_fetch(inner)),
        }
    }

    pub fn set_search_key(&self, search_key: impl Into<String>) -> PendingFetch {
        self.apply_filter(FilterChange::SearchKey(search_key.into()))
    }

    pub fn set_types(&self, types: Vec<String>) -> PendingFetch {
        self.apply_filter(FilterChange::Types(types))
    }

    pub fn set_families(&self, families: Vec<String>) -> PendingFetch {
        self.apply_filter(FilterChange::Families(families))
    }

    pub fn set_page_size(&self, limit: u32) -> PendingFetch {
        self.apply_filter(FilterChange::Limit(limit))
    }

    pub fn next_page(&self) -> PendingFetch {
        let change = lock(&self.inner.state).filter.next_page();
        self.apply_filter(change)
    }

    pub fn previous_page(&self) -> PendingFetch {
        let change = lock(&self.inner.state).filter.previous_page();
        self.apply_filter(change)
    }

    pub fn filter(&self) -> Filter {
        lock(&self.inner.state).filter.clone()
    }

    /// The request the current filter maps to.
    pub fn search_request(&self) -> SearchRequest {
        SearchRequest::from_filter(&lock(&self.inner.state).filter)
    }

    // -- results ----------------------------------------------------------

    pub fn items(&self) -> Vec<Item> {
        lock(&self.inner.state).results.items().to_vec()
    }

    /// User-facing message of the last committed search failure.
    pub fn last_error(&self) -> Option<String> {
        lock(&self.inner.state)
            .results
            .error()
            .map(|err| err.user_message())
    }

    // -- cart -------------------------------------------------------------

    pub fn apply_cart(&self, op: CartOp) -> CartOutcome {
        let kind = op.kind();
        let mut state = lock(&self.inner.state);
        let outcome = state.apply_cart(op);
        debug!(op = kind, outcome = ?outcome, count = state.cart.count(), "cart updated");
        outcome
    }

    /// Add one unit of an item from the current result page.
    pub fn add_to_cart(&self, item_id: impl Into<ItemId>) -> CartOutcome {
        self.apply_cart(CartOp::Add(item_id.into()))
    }

    pub fn increment(&self, item_id: impl Into<ItemId>) -> CartOutcome {
        self.apply_cart(CartOp::Increment(item_id.into()))
    }

    pub fn decrement(&self, item_id: impl Into<ItemId>) -> CartOutcome {
        self.apply_cart(CartOp::Decrement(item_id.into()))
    }

    pub fn cart_count(&self) -> u64 {
        lock(&self.inner.state).cart.count()
    }

    pub fn cart_label(&self) -> String {
        lock(&self.inner.state).cart.label()
    }

    /// Open or close the cart drawer; returns the new state.
    pub fn toggle_cart(&self) -> bool {
        let mut state = lock(&self.inner.state);
        state.cart_open = !state.cart_open;
        state.cart_open
    }

    // -- details ----------------------------------------------------------

    /// Show an item from the current page. Unknown ids are ignored.
    pub fn open_details(&self, item_id: impl Into<ItemId>) -> bool {
        let item_id = item_id.into();
        let mut state = lock(&self.inner.state);
        if state.results.find(&item_id).is_none() {
            debug!(item_id = %item_id, "details requested for unknown item");
            return false;
        }
        state.details = Some(item_id);
        true
    }

    pub fn close_details(&self) {
        lock(&self.inner.state).details = None;
    }

    pub fn details_item(&self) -> Option<Item> {
        lock(&self.inner.state).details_item().cloned()
    }

    // -- checkout ---------------------------------------------------------

    pub async fn checkout(&self) -> CheckoutOutcome {
        self.inner.checkout.checkout(&self.inner.state).await
    }

    pub fn checkout_in_flight(&self) -> bool {
        self.inner.checkout.in_flight()
    }

    /// Navigate to the new-item form.
    pub fn create_item(&self) {
        self.inner.navigator.navigate(NavigationTarget::new_item());
    }

    // -- context signals --------------------------------------------------

    /// Account reported by the host. Loads the account header when an
    /// [`AccountDirectory`] is configured.
    pub async fn on_account_resolved(&self, account_id: Option<AccountId>) -> Option<AccountHeader> {
        let account_id = account_id.filter(|id| !id.is_blank());
        {
            let mut state = lock(&self.inner.state);
            if state.account == account_id && state.account_header.is_some() {
                return state.account_header.clone();
            }
            if state.account != account_id {
                info!(account_id = ?account_id.as_ref().map(AccountId::as_str), "account context changed");
            }
            state.account = account_id.clone();
            state.account_header = None;
        }

        let (Some(account_id), Some(accounts)) = (account_id, self.inner.accounts.clone()) else {
            return None;
        };
        match accounts.account_header(&account_id).await {
            Ok(header) => {
                let mut state = lock(&self.inner.state);
                if state.account.as_ref() != Some(&account_id) {
                    debug!(account_id = %account_id, "account changed while loading header");
                    return None;
                }
                state.account_header = Some(header.clone());
                Some(header)
            }
            Err(err) => {
                warn!(account_id = %account_id, error = %err, "account header unavailable");
                None
            }
        }
    }

    /// Record id of the hosting record page.
    pub async fn on_record_id(&self, record_id: Option<String>) -> Option<AccountHeader> {
        self.on_account_resolved(record_id.map(AccountId::new)).await
    }

    /// Page reference of the hosting page. Only a reference that carries
    /// an account changes the account context.
    pub async fn on_page_reference(&self, page: &PageReference) -> Option<AccountHeader> {
        match page.account_id() {
            Some(account_id) => self.on_account_resolved(Some(account_id)).await,
            None => None,
        }
    }

    /// Record type resolved by the host; drives the dependent option lists.
    pub async fn on_record_type_resolved(&self, record_type: Option<RecordTypeId>) -> OptionRefresh {
        self.inner.options.resolve(record_type).await
    }

    pub fn on_user_resolved(&self, user: UserProfile) {
        debug!(user_id = %user.user_id, is_manager = user.is_manager, "user resolved");
        lock(&self.inner.state).user = Some(user);
    }

    pub fn account_id(&self) -> Option<AccountId> {
        lock(&self.inner.state).account.clone()
    }

    pub fn is_manager(&self) -> bool {
        lock(&self.inner.state).is_manager()
    }

    // -- view -------------------------------------------------------------

    pub fn state(&self) -> WidgetState {
        lock(&self.inner.state).clone()
    }

    pub fn view(&self) -> WidgetView {
        let options = self.inner.options.snapshot();
        let in_flight = self.inner.checkout.in_flight();
        let state = lock(&self.inner.state);
        WidgetView::build(&state, options, &self.inner.config.placeholder_image, in_flight)
    }
}

/// Issue one search for the current filter and commit its result.
async fn run_fetch(inner: Arc<Inner>) -> FetchOutcome {
    let (seq, request) = {
        let state = lock(&inner.state);
        (inner.scheduler.issue(), SearchRequest::from_filter(&state.filter))
    };
    debug!(
        seq,
        search_key = %request.search_key,
        limit = request.limit,
        offset = request.offset,
        "search issued"
    );

    let result = inner.search.search(&request).await;

    let mut state = lock(&inner.state);
    let outcome = state.results.commit(seq, inner.scheduler.latest(), result);
    match &outcome {
        FetchOutcome::Committed { items, .. } => debug!(seq, count = *items, "search committed"),
        FetchOutcome::Failed { .. } => {
            if let Some(err) = state.results.error() {
                warn!(seq, dependency = %err.dependency, error = %err, "search failed");
            }
        }
        FetchOutcome::Discarded { latest, .. } => {
            debug!(seq, latest = *latest, "stale search result discarded")
        }
        FetchOutcome::Cancelled | FetchOutcome::Skipped => {}
    }
    outcome
}
