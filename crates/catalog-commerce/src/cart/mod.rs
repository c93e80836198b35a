//! Shopping cart module.
//!
//! Contains the cart, its lines and the operations that mutate it.

mod cart;

pub use cart::{Cart, CartLine, CartOp, CartOutcome, MAX_QUANTITY_PER_LINE};
