//! CLI configuration.

use anyhow::{Context, Result};
use catalog_widget::WidgetConfig;
use serde::{Deserialize, Serialize};

/// CLI configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Controller tunables.
    #[serde(default)]
    pub widget: WidgetConfig,

    /// Fixture data the in-memory services serve.
    #[serde(default)]
    pub fixtures: FixtureConfig,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        let config: CliConfig = if path.ends_with(".json") {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path))?
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path))?
        };
        Ok(config)
    }

    /// Save config to a file.
    pub fn save(&self, path: &str) -> Result<()> {
        let content = if path.ends_with(".json") {
            serde_json::to_string_pretty(self)?
        } else {
            toml::to_string_pretty(self)?
        };

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path))
    }
}

/// Fixture locations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FixtureConfig {
    /// JSON file holding an array of items. The built-in sample catalog is
    /// used when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog: Option<String>,

    /// Account used by `checkout` when `--account` is not given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
}

/// Generate a default catalog.toml config file.
pub fn generate_default_config() -> String {
    let widget = WidgetConfig::default();
    format!(
        r#"# Catalog widget configuration

[widget]
debounce_ms = {debounce_ms}
page_size = {page_size}
placeholder_image = "{placeholder}"
refresh_images_on_connect = false

[fixtures]
# catalog = "items.json"
# account = "001000000000001"
"#,
        debounce_ms = widget.debounce_ms,
        page_size = widget.page_size,
        placeholder = widget.placeholder_image,
    )
}
