//! Widget state and the view rendered from it.

use catalog_commerce::{AccountId, Cart, CartLine, CartOp, CartOutcome, Filter, Item, ItemId};
use catalog_data::{AccountHeader, UserProfile};
use serde::Serialize;

use crate::options::OptionSets;
use crate::store::CatalogResultStore;

/// Everything the controller mutates. Guarded by a single mutex that is
/// never held across an await.
#[derive(Debug, Clone, Default)]
pub struct WidgetState {
    pub filter: Filter,
    pub results: CatalogResultStore,
    pub cart: Cart,
    pub account: Option<AccountId>,
    pub account_header: Option<AccountHeader>,
    pub user: Option<UserProfile>,
    pub cart_open: bool,
    pub details: Option<ItemId>,
}

impl WidgetState {
    pub fn new(filter: Filter) -> Self {
        Self {
            filter,
            ..Self::default()
        }
    }

    /// Apply a cart operation; `Add` resolves against the current page.
    pub fn apply_cart(&mut self, op: CartOp) -> CartOutcome {
        self.cart.apply(op, self.results.items())
    }

    /// The item open in the details panel, if it is still on the page.
    pub fn details_item(&self) -> Option<&Item> {
        self.details.as_ref().and_then(|id| self.results.find(id))
    }

    pub fn is_manager(&self) -> bool {
        self.user.as_ref().is_some_and(|u| u.is_manager)
    }
}

/// One item card as rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemCard {
    #[serde(flatten)]
    pub item: Item,
    /// Item image or the configured placeholder.
    pub display_image: String,
    /// Quantity of this item already in the cart.
    pub in_cart: u32,
}

/// Serializable snapshot of everything the widget renders.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetView {
    pub filter: Filter,
    pub items: Vec<ItemCard>,
    pub error: Option<String>,
    #[serde(flatten)]
    pub options: OptionSets,
    pub cart_lines: Vec<CartLine>,
    pub cart_count: u64,
    pub cart_label: String,
    pub cart_open: bool,
    pub details: Option<ItemCard>,
    pub account_id: Option<AccountId>,
    pub account_header: Option<AccountHeader>,
    pub is_manager: bool,
    pub checkout_in_flight: bool,
}

impl WidgetView {
    pub(crate) fn build(
        state: &WidgetState,
        options: OptionSets,
        placeholder: &str,
        checkout_in_flight: bool,
    ) -> Self {
        let card = |item: &Item| ItemCard {
            item: item.clone(),
            display_image: item.image_or(placeholder).to_string(),
            in_cart: state.cart.line(&item.id).map_or(0, |l| l.qty),
        };
        Self {
            filter: state.filter.clone(),
            items: state.results.items().iter().map(card).collect(),
            error: state.results.error().map(|e| e.user_message()),
            options,
            cart_lines: state.cart.lines().to_vec(),
            cart_count: state.cart.count(),
            cart_label: state.cart.label(),
            cart_open: state.cart_open,
            details: state.details_item().map(card),
            account_id: state.account.clone(),
            account_header: state.account_header.clone(),
            is_manager: state.is_manager(),
            checkout_in_flight,
        }
    }
}
