//! Catalog domain types and logic for the item catalog widget.
//!
//! This crate provides the pure, I/O-free half of the widget:
//!
//! - **Catalog**: Items, item snapshots, picklist options
//! - **Search**: Filter state and the search request it maps to
//! - **Cart**: Unique-by-item cart lines with quantity semantics
//! - **Checkout**: Purchase requests built from a cart
//!
//! # Example
//!
//! ```rust,ignore
//! use catalog_commerce::prelude::*;
//!
//! let mut filter = Filter::default();
//! filter.apply(FilterChange::Types(vec!["Hardware".into()]));
//! let request = SearchRequest::from_filter(&filter);
//!
//! let mut cart = Cart::new();
//! cart.apply(CartOp::Add(ItemId::new("a0B1")), &items);
//! println!("{}", cart.label());
//! ```

pub mod error;
pub mod ids;

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod search;

pub use cart::{Cart, CartLine, CartOp, CartOutcome, MAX_QUANTITY_PER_LINE};
pub use catalog::{Item, ItemSnapshot, OptionField, PicklistOption};
pub use checkout::{PurchaseLine, PurchaseRequest};
pub use error::CommerceError;
pub use ids::*;
pub use search::{
    FetchMode, Filter, FilterChange, SearchRequest, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::ids::*;

    // Catalog
    pub use crate::catalog::{Item, ItemSnapshot, OptionField, PicklistOption};

    // Cart
    pub use crate::cart::{Cart, CartLine, CartOp, CartOutcome, MAX_QUANTITY_PER_LINE};

    // Checkout
    pub use crate::checkout::{PurchaseLine, PurchaseRequest};

    // Search
    pub use crate::search::{
        FetchMode, Filter, FilterChange, SearchRequest, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
    };
}
