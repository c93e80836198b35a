//! Collaborator contracts consumed by the catalog widget.
//!
//! This crate provides:
//! - `SearchService`, `PurchaseService`, `OptionService` - Async remote calls
//! - `ImageRefresher`, `AccountDirectory` - Optional host collaborators
//! - `NavigationSink`, `NotificationSink` - Fire-and-forget outputs
//! - `RemoteError` - Opaque remote failure with message extraction
//! - `Dependency` - Semantic tags for remote dependencies
//! - `memory` - In-memory collaborators for tests and the CLI

mod account;
mod dependency;
mod error;
mod navigation;
mod notify;
mod services;

pub mod memory;

pub use account::*;
pub use dependency::*;
pub use error::*;
pub use navigation::*;
pub use notify::*;
pub use services::*;
