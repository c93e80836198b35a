//! Item records.

use crate::ids::ItemId;
use serde::{Deserialize, Serialize};

/// A catalog item as returned by the search service.
///
/// Items are immutable for the lifetime of a result page. The cart never
/// holds a live reference; it copies an [`ItemSnapshot`] at add time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Record identifier.
    pub id: ItemId,
    /// Display name.
    pub name: String,
    /// Long description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Category code for the "type" facet.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub item_type: Option<String>,
    /// Category code for the "family" facet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
}

impl Item {
    /// Create an item with only an id and a name.
    pub fn new(id: impl Into<ItemId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            image_url: None,
            item_type: None,
            family: None,
        }
    }

    /// Set the type category.
    pub fn with_type(mut self, item_type: impl Into<String>) -> Self {
        self.item_type = Some(item_type.into());
        self
    }

    /// Set the family category.
    pub fn with_family(mut self, family: impl Into<String>) -> Self {
        self.family = Some(family.into());
        self
    }

    /// Set the image URL.
    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Image URL to render, falling back to `placeholder` when the item has
    /// none or a blank one.
    pub fn image_or<'a>(&'a self, placeholder: &'a str) -> &'a str {
        match self.image_url.as_deref() {
            Some(url) if !url.trim().is_empty() => url,
            _ => placeholder,
        }
    }

    /// Copy the display fields into a snapshot.
    pub fn snapshot(&self) -> ItemSnapshot {
        ItemSnapshot {
            name: self.name.clone(),
            image_url: self.image_url.clone(),
            item_type: self.item_type.clone(),
            family: self.family.clone(),
        }
    }
}

/// Display fields of an item, frozen at the moment it entered the cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ItemSnapshot {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub item_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
}
