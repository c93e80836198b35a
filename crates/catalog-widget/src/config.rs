//! Widget configuration.

use std::time::Duration;

use catalog_commerce::search::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use serde::{Deserialize, Serialize};

use crate::error::WidgetError;

/// Quiescence window for free-text search, in milliseconds.
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

/// Image shown for items without one.
pub const DEFAULT_PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/600x400?text=No+Image";

/// Tunables for a [`CatalogController`](crate::CatalogController).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    /// Debounce window for search-key changes.
    pub debounce_ms: u64,
    /// Items requested per page.
    pub page_size: u32,
    /// Fallback image URL.
    pub placeholder_image: String,
    /// Run the image refresher once the initial fetch is issued.
    pub refresh_images_on_connect: bool,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            page_size: DEFAULT_PAGE_SIZE,
            placeholder_image: DEFAULT_PLACEHOLDER_IMAGE.to_string(),
            refresh_images_on_connect: false,
        }
    }
}

impl WidgetConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn with_debounce(mut self, window: Duration) -> Self {
        self.debounce_ms = window.as_millis().try_into().unwrap_or(u64::MAX);
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_image_refresh(mut self, enabled: bool) -> Self {
        self.refresh_images_on_connect = enabled;
        self
    }

    /// Check the configuration before a controller is built from it.
    pub fn validate(&self) -> Result<(), WidgetError> {
        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(WidgetError::InvalidConfig(format!(
                "page_size must be between 1 and {}, got {}",
                MAX_PAGE_SIZE, self.page_size
            )));
        }
        if self.placeholder_image.trim().is_empty() {
            return Err(WidgetError::InvalidConfig(
                "placeholder_image must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
