//! Fixture catalog served by the in-memory search service.

use std::path::Path;

use anyhow::{Context, Result};
use catalog_commerce::Item;

/// Load items from a JSON array file.
pub fn load_items(path: &Path) -> Result<Vec<Item>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse catalog: {}", path.display()))
}

/// Built-in sample catalog.
pub fn sample_items() -> Vec<Item> {
    vec![
        Item::new("a0B000000000001", "Anvil")
            .with_type("Tool")
            .with_family("Forge")
            .with_description("Cast steel, 50 kg"),
        Item::new("a0B000000000002", "Hex Bolt M8")
            .with_type("Part")
            .with_family("Fastener"),
        Item::new("a0B000000000003", "Cold Chisel")
            .with_type("Tool")
            .with_family("Hand")
            .with_image("https://images.example.com/chisel.png"),
        Item::new("a0B000000000004", "Cordless Drill")
            .with_type("Tool")
            .with_family("Power"),
        Item::new("a0B000000000005", "Wing Nut M8")
            .with_type("Part")
            .with_family("Fastener"),
        Item::new("a0B000000000006", "Bench Vise")
            .with_type("Tool")
            .with_family("Hand"),
    ]
}
