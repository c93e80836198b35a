//! Cart and cart line types.

use crate::catalog::{Item, ItemSnapshot};
use crate::ids::ItemId;
use serde::{Deserialize, Serialize};

/// Maximum quantity allowed per cart line.
pub const MAX_QUANTITY_PER_LINE: u32 = 9999;

/// A mutation requested by the cart controls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CartOp {
    /// Add one unit of an item from the current result page.
    Add(ItemId),
    /// Add one unit to an existing line.
    Increment(ItemId),
    /// Remove one unit from an existing line.
    Decrement(ItemId),
    /// Empty the cart.
    Clear,
}

impl CartOp {
    /// Short name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            CartOp::Add(_) => "add",
            CartOp::Increment(_) => "increment",
            CartOp::Decrement(_) => "decrement",
            CartOp::Clear => "clear",
        }
    }
}

/// What a [`CartOp`] did to the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CartOutcome {
    /// A new line was appended with quantity 1.
    Inserted,
    /// An existing line now holds `qty`.
    Updated { qty: u32 },
    /// The line reached zero and was removed.
    Removed,
    /// All lines were dropped.
    Cleared,
    /// Nothing changed (unknown id, missing line or quantity cap).
    Ignored,
}

impl CartOutcome {
    /// Whether the cart was modified.
    pub fn changed(&self) -> bool {
        !matches!(self, CartOutcome::Ignored)
    }
}

/// Shopping cart: one line per item, in insertion order.
///
/// A line's quantity is never observable as zero; a decrement that would
/// reach zero removes the line.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply an operation. `items` is the current result page, which `Add`
    /// resolves the item against.
    pub fn apply(&mut self, op: CartOp, items: &[Item]) -> CartOutcome {
        match op {
            CartOp::Add(id) => match items.iter().find(|i| i.id == id) {
                Some(item) => self.add(item),
                None => CartOutcome::Ignored,
            },
            CartOp::Increment(id) => self.increment(&id),
            CartOp::Decrement(id) => self.decrement(&id),
            CartOp::Clear => {
                self.clear();
                CartOutcome::Cleared
            }
        }
    }

    /// Add one unit of `item`, snapshotting its display fields if this is a
    /// new line.
    pub fn add(&mut self, item: &Item) -> CartOutcome {
        if self.position(&item.id).is_some() {
            return self.increment(&item.id);
        }
        self.lines.push(CartLine {
            item_id: item.id.clone(),
            qty: 1,
            snapshot: item.snapshot(),
        });
        CartOutcome::Inserted
    }

    /// Add one unit to an existing line.
    pub fn increment(&mut self, item_id: &ItemId) -> CartOutcome {
        let Some(line) = self.lines.iter_mut().find(|l| &l.item_id == item_id) else {
            return CartOutcome::Ignored;
        };
        if line.qty >= MAX_QUANTITY_PER_LINE {
            return CartOutcome::Ignored;
        }
        line.qty += 1;
        CartOutcome::Updated { qty: line.qty }
    }

    /// Remove one unit from an existing line, dropping the line at zero.
    pub fn decrement(&mut self, item_id: &ItemId) -> CartOutcome {
        let Some(idx) = self.position(item_id) else {
            return CartOutcome::Ignored;
        };
        let line = &mut self.lines[idx];
        if line.qty <= 1 {
            self.lines.remove(idx);
            CartOutcome::Removed
        } else {
            line.qty -= 1;
            CartOutcome::Updated { qty: line.qty }
        }
    }

    /// Clear all lines from the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Total item count (sum of quantities).
    pub fn count(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.qty)).sum()
    }

    /// Label for the cart button.
    pub fn label(&self) -> String {
        match self.count() {
            0 => "Cart".to_string(),
            n => format!("Cart ({})", n),
        }
    }

    /// Lines in insertion order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Get a line by item id.
    pub fn line(&self, item_id: &ItemId) -> Option<&CartLine> {
        self.lines.iter().find(|l| &l.item_id == item_id)
    }

    /// Check if cart is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    fn position(&self, item_id: &ItemId) -> Option<usize> {
        self.lines.iter().position(|l| &l.item_id == item_id)
    }
}

/// One aggregated cart entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    /// Item being purchased.
    pub item_id: ItemId,
    /// Quantity, always at least 1.
    pub qty: u32,
    /// Display fields captured when the line was created.
    pub snapshot: ItemSnapshot,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> Vec<Item> {
        vec![
            Item::new("A", "Anvil").with_type("Tool"),
            Item::new("B", "Bolt").with_type("Part"),
            Item::new("C", "Chisel").with_type("Tool"),
        ]
    }

    fn assert_invariants(cart: &Cart) {
        assert!(cart.lines().iter().all(|l| l.qty >= 1));
        let sum: u64 = cart.lines().iter().map(|l| l.qty as u64).sum();
        assert_eq!(cart.count(), sum);
        let mut ids: Vec<_> = cart.lines().iter().map(|l| l.item_id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), cart.lines().len());
    }

    #[test]
    fn test_cart_creation() {
        let cart = Cart::new();
        assert!(cart.is_empty());
        assert_eq!(cart.count(), 0);
        assert_eq!(cart.label(), "Cart");
    }

    #[test]
    fn test_add_item() {
        let mut cart = Cart::new();
        let outcome = cart.apply(CartOp::Add(ItemId::new("A")), &page());
        assert_eq!(outcome, CartOutcome::Inserted);
        assert_eq!(cart.count(), 1);
        assert_eq!(cart.label(), "Cart (1)");
    }

    #[test]
    fn test_add_same_item_increases_quantity() {
        let mut cart = Cart::new();
        let items = page();
        cart.apply(CartOp::Add(ItemId::new("A")), &items);
        let outcome = cart.apply(CartOp::Add(ItemId::new("A")), &items);

        assert_eq!(outcome, CartOutcome::Updated { qty: 2 });
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.count(), 2);
    }

    #[test]
    fn test_add_unknown_item_is_ignored() {
        let mut cart = Cart::new();
        let outcome = cart.apply(CartOp::Add(ItemId::new("Z")), &page());
        assert_eq!(outcome, CartOutcome::Ignored);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_snapshot_is_not_live() {
        let mut cart = Cart::new();
        let mut items = page();
        cart.apply(CartOp::Add(ItemId::new("A")), &items);

        items[0].name = "Renamed".to_string();
        cart.apply(CartOp::Add(ItemId::new("A")), &items);

        assert_eq!(cart.lines()[0].snapshot.name, "Anvil");
    }

    #[test]
    fn test_decrement_to_zero_removes_line() {
        let mut cart = Cart::new();
        cart.apply(CartOp::Add(ItemId::new("B")), &page());
        let outcome = cart.apply(CartOp::Decrement(ItemId::new("B")), &[]);
        assert_eq!(outcome, CartOutcome::Removed);
        assert!(cart.line(&ItemId::new("B")).is_none());
        assert!(cart.is_empty());
    }

    #[test]
    fn test_decrement_missing_is_noop() {
        let mut cart = Cart::new();
        cart.apply(CartOp::Add(ItemId::new("A")), &page());
        let before = cart.clone();
        assert_eq!(
            cart.apply(CartOp::Decrement(ItemId::new("Q")), &[]),
            CartOutcome::Ignored
        );
        assert_eq!(cart, before);
    }

    #[test]
    fn test_increment_requires_line() {
        let mut cart = Cart::new();
        assert_eq!(
            cart.apply(CartOp::Increment(ItemId::new("A")), &page()),
            CartOutcome::Ignored
        );
        assert!(cart.is_empty());
    }

    #[test]
    fn test_quantity_limit() {
        let mut cart = Cart::new();
        cart.apply(CartOp::Add(ItemId::new("A")), &page());
        for _ in 1..MAX_QUANTITY_PER_LINE {
            cart.increment(&ItemId::new("A"));
        }
        assert_eq!(cart.count(), MAX_QUANTITY_PER_LINE as u64);
        assert_eq!(cart.increment(&ItemId::new("A")), CartOutcome::Ignored);
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut cart = Cart::new();
        let items = page();
        for id in ["C", "A", "B", "A"] {
            cart.apply(CartOp::Add(ItemId::new(id)), &items);
        }
        let order: Vec<_> = cart.lines().iter().map(|l| l.item_id.as_str()).collect();
        assert_eq!(order, vec!["C", "A", "B"]);
    }

    #[test]
    fn test_invariants_hold_over_operation_sequences() {
        let items = page();
        let ids = ["A", "B", "C", "Z"];
        // Deterministic pseudo-random walk over ops and ids.
        let mut seed: u64 = 0x2545_f491_4f6c_dd1d;
        let mut cart = Cart::new();
        for _ in 0..2_000 {
            seed ^= seed << 13;
            seed ^= seed >> 7;
            seed ^= seed << 17;
            let id = ItemId::new(ids[(seed % 4) as usize]);
            let op = match (seed >> 8) % 3 {
                0 => CartOp::Add(id),
                1 => CartOp::Increment(id),
                _ => CartOp::Decrement(id),
            };
            cart.apply(op, &items);
            assert_invariants(&cart);
        }
    }

    #[test]
    fn test_clear() {
        let mut cart = Cart::new();
        cart.apply(CartOp::Add(ItemId::new("A")), &page());
        assert_eq!(cart.apply(CartOp::Clear, &[]), CartOutcome::Cleared);
        assert!(cart.is_empty());
        assert_eq!(cart.label(), "Cart");
    }
}
