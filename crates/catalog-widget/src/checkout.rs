//! Checkout submission.
//!
//! At most one purchase submission is in flight at any time. The permit
//! is released when the submitting future completes or is dropped.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use catalog_commerce::{PurchaseId, PurchaseRequest};
use catalog_data::{NavigationSink, NavigationTarget, Notification, NotificationSink, PurchaseService};
use serde::Serialize;
use tracing::{debug, error, info};

use crate::lock;
use crate::state::WidgetState;

/// Result of a checkout attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CheckoutOutcome {
    /// No account context; nothing was sent.
    MissingAccount,
    /// Nothing to buy; nothing was sent.
    EmptyCart,
    /// Another submission is still running; nothing was sent.
    AlreadyInFlight,
    /// Purchase created.
    Completed { purchase_id: PurchaseId },
    /// The purchase service (or request building) failed; the cart is kept.
    Failed { message: String },
}

/// Single-slot in-flight guard.
#[derive(Debug, Default)]
pub struct InFlightGuard {
    busy: AtomicBool,
}

impl InFlightGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn try_acquire(&self) -> Option<InFlightPermit<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlightPermit { guard: self })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Held while a submission runs.
#[derive(Debug)]
pub struct InFlightPermit<'a> {
    guard: &'a InFlightGuard,
}

impl Drop for InFlightPermit<'_> {
    fn drop(&mut self) {
        self.guard.busy.store(false, Ordering::Release);
    }
}

/// Validates, submits and reports purchases.
pub struct CheckoutOrchestrator {
    purchases: Arc<dyn PurchaseService>,
    notifier: Arc<dyn NotificationSink>,
    navigator: Arc<dyn NavigationSink>,
    guard: InFlightGuard,
}

impl CheckoutOrchestrator {
    pub fn new(
        purchases: Arc<dyn PurchaseService>,
        notifier: Arc<dyn NotificationSink>,
        navigator: Arc<dyn NavigationSink>,
    ) -> Self {
        Self {
            purchases,
            notifier,
            navigator,
            guard: InFlightGuard::new(),
        }
    }

    pub fn in_flight(&self) -> bool {
        self.guard.is_busy()
    }

    /// Submit the cart in `state` as a purchase.
    ///
    /// Preconditions are checked in order: account, non-empty cart, no
    /// submission in flight. On success the cart is cleared, then the user
    /// is notified, then navigated to the new purchase.
    pub async fn checkout(&self, state: &Mutex<WidgetState>) -> CheckoutOutcome {
        // Notifications go out after the state lock is released; a sink may
        // read the controller synchronously.
        let prepared = {
            let state = lock(state);
            match state.account.clone() {
                None => Err((
                    CheckoutOutcome::MissingAccount,
                    Some(Notification::error("Error", "Account not provided.")),
                )),
                Some(_) if state.cart.is_empty() => Err((
                    CheckoutOutcome::EmptyCart,
                    Some(Notification::info("Info", "Cart is empty.")),
                )),
                Some(account_id) => match self.guard.try_acquire() {
                    None => Err((CheckoutOutcome::AlreadyInFlight, None)),
                    Some(permit) => match PurchaseRequest::from_cart(account_id, &state.cart) {
                        Ok(request) => Ok((permit, request)),
                        Err(err) => {
                            let message = err.to_string();
                            Err((
                                CheckoutOutcome::Failed {
                                    message: message.clone(),
                                },
                                Some(Notification::error("Checkout failed", message)),
                            ))
                        }
                    },
                },
            }
        };
        let (_permit, request) = match prepared {
            Ok(prepared) => prepared,
            Err((outcome, notification)) => {
                if outcome == CheckoutOutcome::AlreadyInFlight {
                    debug!("checkout already in flight");
                }
                if let Some(notification) = notification {
                    self.notifier.notify(notification);
                }
                return outcome;
            }
        };

        info!(
            account_id = %request.account_id,
            lines = request.lines.len(),
            units = request.total_units(),
            "submitting purchase"
        );

        match self.purchases.checkout(&request).await {
            Ok(purchase_id) => {
                lock(state).cart.clear();
                info!(purchase_id = %purchase_id, "purchase created");
                self.notifier
                    .notify(Notification::success("Success", "Purchase created"));
                self.navigator
                    .navigate(NavigationTarget::purchase_record(&purchase_id));
                CheckoutOutcome::Completed { purchase_id }
            }
            Err(err) => {
                error!(error = %err, "checkout failed");
                let message = err.user_message();
                self.notifier
                    .notify(Notification::error("Checkout failed", message.clone()));
                CheckoutOutcome::Failed { message }
            }
        }
    }
}
