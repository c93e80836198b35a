//! Search request builder.

use crate::search::Filter;
use serde::{Deserialize, Serialize};

/// Payload sent to the search service.
///
/// Built by [`SearchRequest::from_filter`], which is a pure function of the
/// filter: equal filters always produce equal (and hash-equal) requests.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    /// Selected type codes, sorted.
    pub types: Vec<String>,
    /// Selected family codes, sorted.
    pub families: Vec<String>,
    /// Free-text search key.
    pub search_key: String,
    /// Page size.
    #[serde(rename = "limitSize")]
    pub limit: u32,
    /// Page offset.
    #[serde(rename = "offsetSize")]
    pub offset: u32,
}

impl SearchRequest {
    /// Build the request for the current filter.
    pub fn from_filter(filter: &Filter) -> Self {
        Self {
            types: filter.selected_types().iter().cloned().collect(),
            families: filter.selected_families().iter().cloned().collect(),
            search_key: filter.search_key().to_string(),
            limit: filter.limit(),
            offset: filter.offset(),
        }
    }

    /// Whether the request carries no filtering at all.
    pub fn is_unfiltered(&self) -> bool {
        self.types.is_empty() && self.families.is_empty() && self.search_key.trim().is_empty()
    }
}

impl From<&Filter> for SearchRequest {
    fn from(filter: &Filter) -> Self {
        Self::from_filter(filter)
    }
}
