//! Picklist options for the filter facets.

use serde::{Deserialize, Serialize};

/// Facet fields whose options depend on the item record type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionField {
    /// The item "type" category.
    Type,
    /// The item "family" category.
    Family,
}

impl OptionField {
    /// All dependent fields, in display order.
    pub const ALL: [OptionField; 2] = [OptionField::Type, OptionField::Family];

    pub fn as_str(&self) -> &'static str {
        match self {
            OptionField::Type => "type",
            OptionField::Family => "family",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            OptionField::Type => "Type",
            OptionField::Family => "Family",
        }
    }
}

impl std::fmt::Display for OptionField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One selectable option.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PicklistOption {
    /// Label shown to the user.
    pub label: String,
    /// Category code sent in search requests.
    pub value: String,
}

impl PicklistOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}
