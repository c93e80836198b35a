//! Controller scenarios against in-memory collaborators.

use std::sync::Arc;
use std::time::Duration;

use catalog_commerce::{
    AccountId, CartOutcome, Item, ItemId, OptionField, PicklistOption, PurchaseId, RecordTypeId,
    UserId,
};
use catalog_data::memory::{
    CountingImageRefresher, InMemoryCatalog, RecordingNavigator, RecordingNotifier,
    RecordingPurchases, StaticAccounts, StaticOptions,
};
use catalog_data::{
    AccountHeader, Dependency, NavigationTarget, Notification, PageReference, RemoteError,
    Severity, UserProfile,
};
use catalog_widget::observability::init_test_logging;
use catalog_widget::{
    CatalogController, CheckoutOutcome, Collaborators, FetchOutcome, OptionRefresh, WidgetConfig,
};
use tokio::time::Instant;

fn items() -> Vec<Item> {
    vec![
        Item::new("A", "Anvil").with_type("Tool").with_family("Forge"),
        Item::new("B", "Bolt").with_type("Part").with_family("Fastener"),
        Item::new("C", "Chisel")
            .with_type("Tool")
            .with_family("Hand")
            .with_image("https://img.example/chisel.png"),
        Item::new("D", "Drill").with_type("Tool").with_family("Power"),
    ]
}

struct Harness {
    controller: CatalogController,
    catalog: Arc<InMemoryCatalog>,
    purchases: Arc<RecordingPurchases>,
    options: Arc<StaticOptions>,
    navigator: Arc<RecordingNavigator>,
    notifier: Arc<RecordingNotifier>,
}

impl Harness {
    fn new() -> Self {
        Self::build(WidgetConfig::default(), |c| c)
    }

    fn build(config: WidgetConfig, extra: impl FnOnce(Collaborators) -> Collaborators) -> Self {
        init_test_logging();
        let catalog = Arc::new(InMemoryCatalog::new(items()));
        let purchases = Arc::new(RecordingPurchases::new());
        let options = Arc::new(
            StaticOptions::new()
                .with_options(
                    "012A",
                    OptionField::Type,
                    vec![
                        PicklistOption::new("Tool", "Tool"),
                        PicklistOption::new("Part", "Part"),
                    ],
                )
                .with_options(
                    "012A",
                    OptionField::Family,
                    vec![PicklistOption::new("Forge", "Forge")],
                ),
        );
        let navigator = Arc::new(RecordingNavigator::new());
        let notifier = Arc::new(RecordingNotifier::new());

        let collaborators = extra(Collaborators::new(
            catalog.clone(),
            purchases.clone(),
            options.clone(),
            navigator.clone(),
            notifier.clone(),
        ));
        let controller = CatalogController::new(config, collaborators).unwrap();
        Self {
            controller,
            catalog,
            purchases,
            options,
            navigator,
            notifier,
        }
    }

    async fn loaded() -> Self {
        let harness = Self::new();
        let outcome = harness.controller.connect().initial.outcome().await;
        assert!(matches!(outcome, FetchOutcome::Committed { items: 4, .. }));
        harness
    }

    /// Let spawned tasks run until `done` holds.
    async fn settle(&self, done: impl Fn(&Self) -> bool) {
        for _ in 0..100 {
            if done(self) {
                return;
            }
            tokio::task::yield_now().await;
        }
        panic!("condition not reached");
    }
}

fn ids(items: &[Item]) -> Vec<&str> {
    items.iter().map(|i| i.id.as_str()).collect()
}

// -- fetching ---------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn test_two_inputs_inside_window_issue_one_search() {
    let h = Harness::loaded().await;

    let first = h.controller.set_search_key("an");
    tokio::time::advance(Duration::from_millis(100)).await;
    let second = h.controller.set_search_key("anv");

    assert_eq!(first.outcome().await, FetchOutcome::Cancelled);
    assert!(matches!(second.outcome().await, FetchOutcome::Committed { items: 1, .. }));

    let requests = h.catalog.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[1].search_key, "anv");
    assert_eq!(ids(&h.controller.items()), vec!["A"]);
}

#[tokio::test(start_paused = true)]
async fn test_search_waits_for_quiescence() {
    let h = Harness::loaded().await;

    let pending = h.controller.set_search_key("bo");
    tokio::time::advance(Duration::from_millis(299)).await;
    assert_eq!(h.catalog.call_count(), 1);

    tokio::time::advance(Duration::from_millis(1)).await;
    pending.outcome().await;
    assert_eq!(h.catalog.call_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_structured_changes_fetch_immediately() {
    let h = Harness::loaded().await;
    let start = Instant::now();

    let outcome = h.controller.set_types(vec!["Tool".into()]).outcome().await;
    assert!(matches!(outcome, FetchOutcome::Committed { items: 3, .. }));

    let outcome = h.controller.set_families(vec!["Hand".into()]).outcome().await;
    assert!(matches!(outcome, FetchOutcome::Committed { items: 1, .. }));

    assert!(start.elapsed() < Duration::from_millis(300));
    assert_eq!(ids(&h.controller.items()), vec!["C"]);
}

#[tokio::test(start_paused = true)]
async fn test_structured_change_drops_pending_text_search() {
    let h = Harness::loaded().await;

    let typed = h.controller.set_search_key("dr");
    let picked = h.controller.set_types(vec!["Tool".into()]);

    assert!(picked.outcome().await.is_committed());
    assert_eq!(typed.outcome().await, FetchOutcome::Cancelled);
    // The immediate fetch already carried the typed key.
    assert_eq!(h.catalog.requests()[1].search_key, "dr");
    assert_eq!(ids(&h.controller.items()), vec!["D"]);
}

#[tokio::test(start_paused = true)]
async fn test_out_of_order_completion_commits_latest() {
    let h = Harness::new();
    h.catalog.queue_latency(Duration::from_millis(200));
    h.catalog.queue_latency(Duration::from_millis(50));

    let f1 = h.controller.set_types(vec!["Tool".into()]);
    h.settle(|h| h.catalog.call_count() == 1).await;
    let f2 = h.controller.set_types(vec!["Part".into()]);

    let f2 = f2.outcome().await;
    assert!(matches!(f2, FetchOutcome::Committed { items: 1, .. }));
    let f1 = f1.outcome().await;
    assert!(matches!(f1, FetchOutcome::Discarded { .. }));

    assert_eq!(ids(&h.controller.items()), vec!["B"]);
}

#[tokio::test(start_paused = true)]
async fn test_older_fetch_finishing_first_is_still_discarded() {
    let h = Harness::new();
    h.catalog.queue_latency(Duration::from_millis(10));
    h.catalog.queue_latency(Duration::from_millis(100));

    let f1 = h.controller.set_types(vec!["Tool".into()]);
    h.settle(|h| h.catalog.call_count() == 1).await;
    let f2 = h.controller.set_types(vec!["Part".into()]);

    assert!(matches!(f1.outcome().await, FetchOutcome::Discarded { .. }));
    assert!(h.controller.items().is_empty());

    assert!(f2.outcome().await.is_committed());
    assert_eq!(ids(&h.controller.items()), vec!["B"]);
}

#[tokio::test(start_paused = true)]
async fn test_search_failure_clears_results_then_recovers() {
    let h = Harness::loaded().await;
    h.catalog
        .fail_with(RemoteError::backend(Dependency::Search, "Search is down"));

    let outcome = h.controller.set_types(vec!["Tool".into()]).outcome().await;
    assert!(matches!(outcome, FetchOutcome::Failed { .. }));
    assert!(h.controller.items().is_empty());
    assert_eq!(h.controller.last_error().as_deref(), Some("Search is down"));
    // No automatic retry.
    assert_eq!(h.catalog.call_count(), 2);

    h.catalog.recover();
    h.controller.set_types(vec![]).outcome().await;
    assert_eq!(h.controller.items().len(), 4);
    assert_eq!(h.controller.last_error(), None);
}

#[tokio::test(start_paused = true)]
async fn test_paging_moves_offset_by_limit() {
    let h = Harness::build(WidgetConfig::default().with_page_size(2), |c| c);
    h.controller.connect().initial.outcome().await;
    assert_eq!(ids(&h.controller.items()), vec!["A", "B"]);

    h.controller.next_page().outcome().await;
    assert_eq!(h.controller.filter().offset(), 2);
    assert_eq!(ids(&h.controller.items()), vec!["C", "D"]);

    h.controller.previous_page().outcome().await;
    h.controller.previous_page().outcome().await;
    assert_eq!(h.controller.filter().offset(), 0);

    h.controller.next_page().outcome().await;
    h.controller.set_search_key("").outcome().await;
    assert_eq!(h.controller.filter().offset(), 0);
    assert_eq!(h.catalog.requests().last().map(|r| r.offset), Some(0));
}

#[tokio::test(start_paused = true)]
async fn test_connect_refreshes_images_then_refetches() {
    let images = Arc::new(CountingImageRefresher::new());
    let refresher = images.clone();
    let h = Harness::build(WidgetConfig::default().with_image_refresh(true), move |c| {
        c.with_images(refresher)
    });

    let connection = h.controller.connect();
    assert!(connection.initial.outcome().await.is_committed());
    let refresh = connection.image_refresh.expect("image refresh enabled");
    assert!(refresh.outcome().await.is_committed());

    assert_eq!(images.call_count(), 1);
    assert_eq!(h.catalog.call_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_failed_image_refresh_skips_refetch() {
    let images = Arc::new(CountingImageRefresher::new());
    images.fail_with(RemoteError::message(Dependency::Images, "job queue full"));
    let refresher = images.clone();
    let h = Harness::build(WidgetConfig::default().with_image_refresh(true), move |c| {
        c.with_images(refresher)
    });

    let connection = h.controller.connect();
    connection.initial.outcome().await;
    let refresh = connection.image_refresh.expect("image refresh enabled");
    assert_eq!(refresh.outcome().await, FetchOutcome::Skipped);
    assert_eq!(h.catalog.call_count(), 1);
    assert_eq!(h.controller.items().len(), 4);
}

// -- cart -------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn test_cart_aggregates_from_current_page() {
    let h = Harness::loaded().await;

    assert_eq!(h.controller.cart_label(), "Cart");
    assert_eq!(h.controller.add_to_cart("A"), CartOutcome::Inserted);
    assert_eq!(h.controller.add_to_cart("B"), CartOutcome::Inserted);
    assert_eq!(h.controller.add_to_cart("A"), CartOutcome::Updated { qty: 2 });
    assert_eq!(h.controller.add_to_cart("Z"), CartOutcome::Ignored);

    let state = h.controller.state();
    let lines: Vec<(&str, u32)> = state
        .cart
        .lines()
        .iter()
        .map(|l| (l.item_id.as_str(), l.qty))
        .collect();
    assert_eq!(lines, vec![("A", 2), ("B", 1)]);
    assert_eq!(h.controller.cart_label(), "Cart (3)");

    assert_eq!(h.controller.decrement("B"), CartOutcome::Removed);
    assert_eq!(h.controller.decrement("B"), CartOutcome::Ignored);
    assert_eq!(h.controller.increment("B"), CartOutcome::Ignored);
    assert_eq!(h.controller.cart_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_cart_survives_filter_changes() {
    let h = Harness::loaded().await;
    h.controller.add_to_cart("B");

    h.controller.set_types(vec!["Tool".into()]).outcome().await;
    assert!(h.controller.items().iter().all(|i| i.id.as_str() != "B"));

    // Not on the page any more, but the line is still there.
    assert_eq!(h.controller.increment("B"), CartOutcome::Updated { qty: 2 });
    assert_eq!(h.controller.add_to_cart("B"), CartOutcome::Ignored);
    let line = h.controller.state().cart.line(&ItemId::new("B")).cloned().unwrap();
    assert_eq!(line.snapshot.name, "Bolt");
}

// -- checkout ---------------------------------------------------------------

async fn with_account_and_cart() -> Harness {
    let h = Harness::loaded().await;
    h.controller
        .on_account_resolved(Some(AccountId::new("001A")))
        .await;
    h.controller.add_to_cart("A");
    h.controller.add_to_cart("A");
    h.controller.add_to_cart("B");
    h
}

#[tokio::test(start_paused = true)]
async fn test_checkout_without_account_is_rejected() {
    let h = Harness::loaded().await;
    h.controller.add_to_cart("A");

    assert_eq!(h.controller.checkout().await, CheckoutOutcome::MissingAccount);
    assert_eq!(h.purchases.call_count(), 0);
    assert_eq!(
        h.notifier.last(),
        Some(Notification::error("Error", "Account not provided."))
    );
    assert_eq!(h.controller.cart_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_checkout_with_empty_cart_is_rejected() {
    let h = Harness::loaded().await;
    h.controller
        .on_account_resolved(Some(AccountId::new("001A")))
        .await;

    assert_eq!(h.controller.checkout().await, CheckoutOutcome::EmptyCart);
    assert_eq!(h.purchases.call_count(), 0);
    let notice = h.notifier.last().unwrap();
    assert_eq!(notice.severity, Severity::Info);
    assert_eq!(notice.title, "Info");
    assert_eq!(notice.message, "Cart is empty.");
}

#[tokio::test(start_paused = true)]
async fn test_checkout_success_clears_cart_and_navigates_once() {
    let h = with_account_and_cart().await;

    let outcome = h.controller.checkout().await;
    assert_eq!(
        outcome,
        CheckoutOutcome::Completed {
            purchase_id: PurchaseId::new("PUR-0001")
        }
    );

    let requests = h.purchases.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].account_id.as_str(), "001A");
    let lines: Vec<(&str, i32)> = requests[0]
        .lines
        .iter()
        .map(|l| (l.item_id.as_str(), l.qty))
        .collect();
    assert_eq!(lines, vec![("A", 2), ("B", 1)]);

    assert_eq!(h.controller.cart_count(), 0);
    assert_eq!(
        h.notifier.notifications(),
        vec![Notification::success("Success", "Purchase created")]
    );
    assert_eq!(
        h.navigator.targets(),
        vec![NavigationTarget::purchase_record(&PurchaseId::new("PUR-0001"))]
    );
    assert!(!h.controller.checkout_in_flight());
}

#[tokio::test(start_paused = true)]
async fn test_failed_checkout_keeps_cart_and_allows_retry() {
    let h = with_account_and_cart().await;
    h.purchases.push_outcome(Err(RemoteError::backend(
        Dependency::Purchase,
        "Credit limit exceeded",
    )));

    let outcome = h.controller.checkout().await;
    assert_eq!(
        outcome,
        CheckoutOutcome::Failed {
            message: "Credit limit exceeded".into()
        }
    );
    assert_eq!(h.controller.cart_count(), 3);
    assert!(h.navigator.targets().is_empty());
    assert_eq!(
        h.notifier.last(),
        Some(Notification::error("Checkout failed", "Credit limit exceeded"))
    );
    assert!(!h.controller.checkout_in_flight());

    assert!(matches!(
        h.controller.checkout().await,
        CheckoutOutcome::Completed { .. }
    ));
    assert_eq!(h.purchases.call_count(), 2);
    assert_eq!(h.controller.cart_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_checkout_failure_message_falls_back_to_generic() {
    let h = with_account_and_cart().await;
    h.purchases
        .push_outcome(Err(RemoteError::message(Dependency::Purchase, "Bad gateway")));

    let outcome = h.controller.checkout().await;
    assert_eq!(
        outcome,
        CheckoutOutcome::Failed {
            message: "Bad gateway".into()
        }
    );
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_checkout_is_single_flight() {
    let h = with_account_and_cart().await;
    h.purchases.set_latency(Duration::from_millis(100));

    let (first, second) = tokio::join!(h.controller.checkout(), h.controller.checkout());
    assert!(matches!(first, CheckoutOutcome::Completed { .. }));
    assert_eq!(second, CheckoutOutcome::AlreadyInFlight);
    assert_eq!(h.purchases.call_count(), 1);
    assert_eq!(h.navigator.targets().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_dropped_checkout_releases_permit() {
    let h = with_account_and_cart().await;
    h.purchases.set_latency(Duration::from_millis(100));

    let abandoned = tokio::time::timeout(Duration::from_millis(10), h.controller.checkout()).await;
    assert!(abandoned.is_err());
    assert!(!h.controller.checkout_in_flight());
    assert_eq!(h.controller.cart_count(), 3);
}

// -- context ----------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn test_options_wait_for_record_type() {
    let h = Harness::loaded().await;

    assert_eq!(
        h.controller.on_record_type_resolved(None).await,
        OptionRefresh::Pending
    );
    assert!(h.controller.view().options.type_options.is_empty());

    let refresh = h
        .controller
        .on_record_type_resolved(Some(RecordTypeId::new("012A")))
        .await;
    assert!(matches!(refresh, OptionRefresh::Fetched { ref failed, .. } if failed.is_empty()));

    let view = h.controller.view();
    assert_eq!(view.options.type_options.len(), 2);
    assert_eq!(view.options.family_options[0].value, "Forge");

    assert_eq!(
        h.controller
            .on_record_type_resolved(Some(RecordTypeId::new("012A")))
            .await,
        OptionRefresh::Unchanged
    );
    assert_eq!(h.options.calls().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_account_from_page_reference_loads_header() {
    let accounts = StaticAccounts::new().with_account(AccountHeader {
        account_id: Some(AccountId::new("001A")),
        name: Some("Acme".into()),
        number: Some("42".into()),
        industry: Some("Manufacturing".into()),
    });
    let h = Harness::build(WidgetConfig::default(), move |c| {
        c.with_accounts(Arc::new(accounts))
    });

    let header = h
        .controller
        .on_page_reference(&PageReference::for_account(&AccountId::new("001A")))
        .await;
    assert_eq!(header.and_then(|h| h.name).as_deref(), Some("Acme"));
    assert_eq!(h.controller.account_id(), Some(AccountId::new("001A")));

    // A page reference without an account leaves the context alone.
    h.controller.on_page_reference(&PageReference::default()).await;
    assert_eq!(h.controller.account_id(), Some(AccountId::new("001A")));
    assert!(h.controller.view().account_header.is_some());

    // Unknown accounts keep the context but have no header.
    let header = h.controller.on_record_id(Some("001Z".into())).await;
    assert!(header.is_none());
    assert_eq!(h.controller.account_id(), Some(AccountId::new("001Z")));
    assert!(h.controller.view().account_header.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_view_reflects_state() {
    let h = Harness::loaded().await;
    h.controller.on_user_resolved(UserProfile {
        user_id: UserId::new("005X"),
        is_manager: true,
    });
    h.controller.add_to_cart("C");
    assert!(h.controller.toggle_cart());
    assert!(h.controller.open_details("A"));
    assert!(!h.controller.open_details("Z"));

    let view = h.controller.view();
    assert!(view.is_manager);
    assert!(view.cart_open);
    assert_eq!(view.cart_label, "Cart (1)");
    assert_eq!(view.details.as_ref().map(|d| d.item.name.as_str()), Some("Anvil"));
    assert_eq!(
        view.details.as_ref().map(|d| d.display_image.as_str()),
        Some(h.controller.config().placeholder_image.as_str())
    );
    let chisel = view.items.iter().find(|c| c.item.id.as_str() == "C").unwrap();
    assert_eq!(chisel.display_image, "https://img.example/chisel.png");
    assert_eq!(chisel.in_cart, 1);

    let json = serde_json::to_value(&view).unwrap();
    assert_eq!(json["cartLabel"], "Cart (1)");
    assert_eq!(json["items"][0]["name"], "Anvil");

    h.controller.close_details();
    assert!(h.controller.details_item().is_none());
    assert!(!h.controller.toggle_cart());
}

#[tokio::test(start_paused = true)]
async fn test_create_item_navigates_to_new_form() {
    let h = Harness::new();
    h.controller.create_item();
    assert_eq!(h.navigator.targets(), vec![NavigationTarget::new_item()]);
}

#[test]
fn test_invalid_config_is_rejected() {
    let catalog = Arc::new(InMemoryCatalog::new(vec![]));
    let collaborators = Collaborators::new(
        catalog,
        Arc::new(RecordingPurchases::new()),
        Arc::new(StaticOptions::new()),
        Arc::new(RecordingNavigator::new()),
        Arc::new(RecordingNotifier::new()),
    );
    let result = CatalogController::new(WidgetConfig::default().with_page_size(0), collaborators);
    assert!(result.is_err());
}
