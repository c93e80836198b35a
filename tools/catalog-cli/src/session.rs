//! A controller wired to in-memory services.

use std::sync::Arc;

use anyhow::{Context as _, Result};
use catalog_commerce::Item;
use catalog_data::memory::{
    CountingImageRefresher, InMemoryCatalog, RecordingNavigator, RecordingNotifier,
    RecordingPurchases, StaticOptions,
};
use catalog_widget::{CatalogController, Collaborators};

use crate::context::Context;
use crate::fixtures;

/// Controller plus handles on the services it talks to.
pub struct Session {
    pub controller: CatalogController,
    pub purchases: Arc<RecordingPurchases>,
    pub navigator: Arc<RecordingNavigator>,
    pub notifier: Arc<RecordingNotifier>,
}

impl Session {
    /// Build a session over the configured (or `catalog_override`) fixture.
    pub fn open(ctx: &Context, catalog_override: Option<&str>) -> Result<Self> {
        let items = match catalog_override.or(ctx.config.fixtures.catalog.as_deref()) {
            Some(path) => fixtures::load_items(&ctx.resolve_path(path))?,
            None => fixtures::sample_items(),
        };
        ctx.output.debug(&format!("Catalog holds {} items", items.len()));
        Self::with_items(ctx, items)
    }

    fn with_items(ctx: &Context, items: Vec<Item>) -> Result<Self> {
        let purchases = Arc::new(RecordingPurchases::new());
        let navigator = Arc::new(RecordingNavigator::new());
        let notifier = Arc::new(RecordingNotifier::new());

        let collaborators = Collaborators::new(
            Arc::new(InMemoryCatalog::new(items)),
            purchases.clone(),
            Arc::new(StaticOptions::new()),
            navigator.clone(),
            notifier.clone(),
        )
        .with_images(Arc::new(CountingImageRefresher::new()));

        let controller = CatalogController::new(ctx.config.widget.clone(), collaborators)
            .context("Invalid widget configuration")?;

        Ok(Self {
            controller,
            purchases,
            navigator,
            notifier,
        })
    }

    /// Load the first page (and refresh images, if configured).
    pub async fn connect(&self) {
        let connection = self.controller.connect();
        connection.initial.outcome().await;
        if let Some(refresh) = connection.image_refresh {
            refresh.outcome().await;
        }
    }
}
