//! Purchase request submitted at checkout.

use crate::cart::Cart;
use crate::error::CommerceError;
use crate::ids::{AccountId, ItemId};
use serde::{Deserialize, Serialize};

/// One `{itemId, qty}` line of a purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseLine {
    pub item_id: ItemId,
    pub qty: i32,
}

/// Request sent to the purchase service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseRequest {
    /// Account the purchase is attributed to.
    pub account_id: AccountId,
    /// Lines in cart order.
    pub lines: Vec<PurchaseLine>,
}

impl PurchaseRequest {
    /// Build a request from the cart, preserving line order.
    pub fn from_cart(account_id: AccountId, cart: &Cart) -> Result<Self, CommerceError> {
        if cart.is_empty() {
            return Err(CommerceError::EmptyPurchase);
        }

        let lines = cart
            .lines()
            .iter()
            .map(|line| {
                let qty = i32::try_from(line.qty).map_err(|_| CommerceError::InvalidQuantity {
                    item_id: line.item_id.to_string(),
                    qty: line.qty,
                })?;
                Ok(PurchaseLine {
                    item_id: line.item_id.clone(),
                    qty,
                })
            })
            .collect::<Result<Vec<_>, CommerceError>>()?;

        Ok(Self { account_id, lines })
    }

    /// Total units across all lines.
    pub fn total_units(&self) -> i64 {
        self.lines.iter().map(|l| i64::from(l.qty)).sum()
    }

    /// Serialize to the JSON payload logged before submission.
    pub fn to_json(&self) -> Result<String, CommerceError> {
        Ok(serde_json::to_string(self)?)
    }
}
