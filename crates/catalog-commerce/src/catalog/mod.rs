//! Catalog module.
//!
//! Contains item records as returned by the search service and the
//! picklist options used to filter them.

mod item;
mod options;

pub use item::{Item, ItemSnapshot};
pub use options::{OptionField, PicklistOption};
