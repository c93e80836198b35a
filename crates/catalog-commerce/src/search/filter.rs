//! Filter state driving the remote search.

use crate::error::CommerceError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Default number of items requested per page.
pub const DEFAULT_PAGE_SIZE: u32 = 24;

/// Largest page size a filter will request.
pub const MAX_PAGE_SIZE: u32 = 200;

/// How a filter change should reach the search service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FetchMode {
    /// Wait for the quiescence window (free-text typing).
    Debounced,
    /// Fetch right away (structured facets, paging).
    Immediate,
}

/// A user-driven change to the filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterChange {
    /// Free-text search input.
    SearchKey(String),
    /// Selected type category codes.
    Types(Vec<String>),
    /// Selected family category codes.
    Families(Vec<String>),
    /// Page size.
    Limit(u32),
    /// Page offset.
    Offset(u32),
}

impl FilterChange {
    /// Short name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            FilterChange::SearchKey(_) => "search_key",
            FilterChange::Types(_) => "types",
            FilterChange::Families(_) => "families",
            FilterChange::Limit(_) => "limit",
            FilterChange::Offset(_) => "offset",
        }
    }
}

/// Current search filter.
///
/// Fields are only mutated through [`Filter::apply`], which keeps the
/// invariant that any change other than an offset change resets the
/// offset to zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    search_key: String,
    selected_types: BTreeSet<String>,
    selected_families: BTreeSet<String>,
    limit: u32,
    offset: u32,
}

impl Filter {
    /// Create an empty filter with the given page size.
    pub fn new(limit: u32) -> Result<Self, CommerceError> {
        if limit == 0 {
            return Err(CommerceError::InvalidPageSize(limit));
        }
        Ok(Self {
            search_key: String::new(),
            selected_types: BTreeSet::new(),
            selected_families: BTreeSet::new(),
            limit: limit.min(MAX_PAGE_SIZE),
            offset: 0,
        })
    }

    /// Apply a change and report how the resulting search should be issued.
    pub fn apply(&mut self, change: FilterChange) -> FetchMode {
        match change {
            FilterChange::SearchKey(key) => {
                self.search_key = key;
                self.offset = 0;
                FetchMode::Debounced
            }
            FilterChange::Types(types) => {
                self.selected_types = normalize(types);
                self.offset = 0;
                FetchMode::Immediate
            }
            FilterChange::Families(families) => {
                self.selected_families = normalize(families);
                self.offset = 0;
                FetchMode::Immediate
            }
            FilterChange::Limit(limit) => {
                self.limit = limit.clamp(1, MAX_PAGE_SIZE);
                self.offset = 0;
                FetchMode::Immediate
            }
            FilterChange::Offset(offset) => {
                self.offset = offset;
                FetchMode::Immediate
            }
        }
    }

    /// Offset change that moves one page forward.
    pub fn next_page(&self) -> FilterChange {
        FilterChange::Offset(self.offset.saturating_add(self.limit))
    }

    /// Offset change that moves one page back, stopping at zero.
    pub fn previous_page(&self) -> FilterChange {
        FilterChange::Offset(self.offset.saturating_sub(self.limit))
    }

    pub fn search_key(&self) -> &str {
        &self.search_key
    }

    pub fn selected_types(&self) -> &BTreeSet<String> {
        &self.selected_types
    }

    pub fn selected_families(&self) -> &BTreeSet<String> {
        &self.selected_families
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn offset(&self) -> u32 {
        self.offset
    }
}

impl Default for Filter {
    fn default() -> Self {
        Self {
            search_key: String::new(),
            selected_types: BTreeSet::new(),
            selected_families: BTreeSet::new(),
            limit: DEFAULT_PAGE_SIZE,
            offset: 0,
        }
    }
}

/// Drop blanks and duplicates from a facet selection.
fn normalize(codes: Vec<String>) -> BTreeSet<String> {
    codes
        .into_iter()
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .collect()
}
