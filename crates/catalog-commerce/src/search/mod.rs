//! Search module.
//!
//! Contains the filter state and the search request derived from it.

mod filter;
mod query;

pub use filter::{FetchMode, Filter, FilterChange, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
pub use query::SearchRequest;
