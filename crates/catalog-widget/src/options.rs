//! Picklist options that depend on the host's record type.
//!
//! The record type arrives asynchronously and may change. Each field is
//! fetched independently; results are cached per `(record type, field)`,
//! and only the options of the current record type are ever exposed.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use catalog_commerce::{OptionField, PicklistOption, RecordTypeId};
use catalog_data::OptionService;
use futures::future::join_all;
use serde::Serialize;
use tracing::{debug, warn};

use crate::lock;

type OptionKey = (RecordTypeId, OptionField);

/// Options of every field for the current record type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionSets {
    pub type_options: Vec<PicklistOption>,
    pub family_options: Vec<PicklistOption>,
}

/// Result of reporting a record type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionRefresh {
    /// No record type yet; nothing fetched.
    Pending,
    /// Same record type as before with every field already held.
    Unchanged,
    /// Missing fields were requested.
    Fetched {
        loaded: Vec<OptionField>,
        failed: Vec<OptionField>,
    },
}

#[derive(Default)]
struct ResolverState {
    current: Option<RecordTypeId>,
    cache: HashMap<OptionKey, Vec<PicklistOption>>,
    in_flight: HashSet<OptionKey>,
}

/// Marks one `(record type, field)` as in flight until dropped, so a
/// cancelled `resolve` leaves the field free to be requested again.
struct FieldClaim<'a> {
    state: &'a Mutex<ResolverState>,
    key: OptionKey,
}

impl Drop for FieldClaim<'_> {
    fn drop(&mut self) {
        lock(self.state).in_flight.remove(&self.key);
    }
}

/// Fetches and holds the option lists for the current record type.
pub struct DependentOptionResolver {
    service: Arc<dyn OptionService>,
    state: Mutex<ResolverState>,
}

impl DependentOptionResolver {
    pub fn new(service: Arc<dyn OptionService>) -> Self {
        Self {
            service,
            state: Mutex::new(ResolverState::default()),
        }
    }

    /// The record type options are currently shown for.
    pub fn record_type(&self) -> Option<RecordTypeId> {
        lock(&self.state).current.clone()
    }

    /// Options of `field` for the current record type; empty until loaded.
    pub fn options(&self, field: OptionField) -> Vec<PicklistOption> {
        let state = lock(&self.state);
        state
            .current
            .as_ref()
            .and_then(|rt| state.cache.get(&(rt.clone(), field)))
            .cloned()
            .unwrap_or_default()
    }

    pub fn snapshot(&self) -> OptionSets {
        OptionSets {
            type_options: self.options(OptionField::Type),
            family_options: self.options(OptionField::Family),
        }
    }

    /// Report the host's record type.
    ///
    /// `None` means the host has not resolved one yet; the current lists are
    /// left as they are. Fields already held (or in flight) for the
    /// reported type are not requested again, so a field that failed
    /// earlier is retried on the next report.
    pub async fn resolve(&self, record_type: Option<RecordTypeId>) -> OptionRefresh {
        let Some(record_type) = record_type.filter(|rt| !rt.is_blank()) else {
            debug!("record type not resolved yet");
            return OptionRefresh::Pending;
        };

        let missing: Vec<OptionField> = {
            let mut state = lock(&self.state);
            if state.current.as_ref() != Some(&record_type) {
                debug!(record_type = %record_type, "record type changed");
                state.current = Some(record_type.clone());
            }
            let missing: Vec<OptionField> = OptionField::ALL
                .into_iter()
                .filter(|field| {
                    let key = (record_type.clone(), *field);
                    !state.cache.contains_key(&key) && !state.in_flight.contains(&key)
                })
                .collect();
            for field in &missing {
                state.in_flight.insert((record_type.clone(), *field));
            }
            missing
        };

        if missing.is_empty() {
            return OptionRefresh::Unchanged;
        }

        let claims: Vec<FieldClaim<'_>> = missing
            .iter()
            .map(|field| FieldClaim {
                state: &self.state,
                key: (record_type.clone(), *field),
            })
            .collect();

        // Each field is cached as soon as its own call returns.
        let fetches = claims.into_iter().map(|claim| async move {
            let (record_type, field) = claim.key.clone();
            match self.service.options_for(&record_type, field).await {
                Ok(options) => {
                    debug!(record_type = %record_type, field = %field, count = options.len(), "options loaded");
                    lock(&self.state).cache.insert(claim.key.clone(), options);
                    (field, true)
                }
                Err(error) => {
                    warn!(record_type = %record_type, field = %field, error = %error, "options unavailable");
                    (field, false)
                }
            }
        });

        let mut loaded = Vec::new();
        let mut failed = Vec::new();
        for (field, ok) in join_all(fetches).await {
            if ok {
                loaded.push(field);
            } else {
                failed.push(field);
            }
        }
        OptionRefresh::Fetched { loaded, failed }
    }
}
