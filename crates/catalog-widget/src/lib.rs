//! Client-side state controller for the item catalog widget.
//!
//! This crate provides:
//! - `CatalogController` - Filter, cart, checkout and context handling
//! - `FetchScheduler` - Debounced, sequence-guarded search issuing
//! - `CatalogResultStore` - Latest committed search result
//! - `DependentOptionResolver` - Picklists keyed by record type
//! - `CheckoutOrchestrator` - Single-flight purchase submission
//! - `WidgetConfig` - Tunables
//!
//! # Example
//!
//! ```rust,ignore
//! use catalog_widget::{CatalogController, Collaborators, WidgetConfig};
//!
//! let controller = CatalogController::new(WidgetConfig::default(), collaborators)?;
//! controller.connect().initial.outcome().await;
//! controller.set_search_key("anv");
//! controller.add_to_cart("a0B1");
//! let outcome = controller.checkout().await;
//! ```

use std::sync::{Mutex, MutexGuard, PoisonError};

mod checkout;
mod config;
mod controller;
mod error;
mod options;
mod scheduler;
mod state;
mod store;

pub mod observability;

pub use checkout::*;
pub use config::*;
pub use controller::*;
pub use error::*;
pub use options::*;
pub use scheduler::*;
pub use state::*;
pub use store::*;

/// Lock a mutex, recovering the data if a previous holder panicked.
/// Updates never leave the guarded state half-applied.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
