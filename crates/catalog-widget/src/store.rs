//! Committed search results.

use catalog_commerce::{Item, ItemId};
use catalog_data::RemoteError;
use serde::Serialize;

/// What happened to a fetch once it finished (or didn't).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum FetchOutcome {
    /// Items replaced the result store.
    Committed { seq: u64, items: usize },
    /// The search failed and the failure was recorded.
    Failed { seq: u64 },
    /// A newer fetch had been issued; the result was dropped.
    Discarded { seq: u64, latest: u64 },
    /// The fetch was aborted before it could finish, usually because a
    /// newer change replaced it during the debounce window.
    Cancelled,
    /// No fetch was issued.
    Skipped,
}

impl FetchOutcome {
    /// True if the store changed.
    pub fn is_committed(&self) -> bool {
        matches!(self, FetchOutcome::Committed { .. } | FetchOutcome::Failed { .. })
    }
}

/// The latest committed result page, or the latest committed failure.
///
/// A success clears any stored error; a failure clears the items, so the
/// store never shows items and an error at the same time.
#[derive(Debug, Clone, Default)]
pub struct CatalogResultStore {
    items: Vec<Item>,
    error: Option<RemoteError>,
    committed_seq: u64,
}

impl CatalogResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commit the result of fetch `seq` if it is still the latest issued.
    pub fn commit(
        &mut self,
        seq: u64,
        latest: u64,
        result: Result<Vec<Item>, RemoteError>,
    ) -> FetchOutcome {
        if seq != latest {
            return FetchOutcome::Discarded { seq, latest };
        }
        self.committed_seq = seq;
        match result {
            Ok(items) => {
                let count = items.len();
                self.items = items;
                self.error = None;
                FetchOutcome::Committed { seq, items: count }
            }
            Err(error) => {
                self.items.clear();
                self.error = Some(error);
                FetchOutcome::Failed { seq }
            }
        }
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn error(&self) -> Option<&RemoteError> {
        self.error.as_ref()
    }

    /// Sequence number of the last committed fetch; zero before any.
    pub fn committed_seq(&self) -> u64 {
        self.committed_seq
    }

    pub fn find(&self, item_id: &ItemId) -> Option<&Item> {
        self.items.iter().find(|item| &item.id == item_id)
    }
}
