//! Cart Model
//!
//! A cart line exists in two identifier spaces. Lines of the server cart
//! carry a server-assigned `id`; guest cart lines have none and are keyed by
//! their product id. [`CartItem::line_id`] yields whichever id the owning
//! representation uses, and that is the id update/remove expect.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::product::ProductRef;

/// One cart line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    /// Server cart-item id (server cart only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub product: ProductRef,
    pub quantity: u32,
}

impl CartItem {
    /// Creates a guest cart line
    pub fn new(product: ProductRef, quantity: u32) -> Self {
        Self {
            id: None,
            product,
            quantity,
        }
    }

    /// Identifier to pass to update/remove for this line
    pub fn line_id(&self) -> i64 {
        self.id.unwrap_or(self.product.id)
    }

    /// quantity × unit price
    pub fn line_total(&self) -> Decimal {
        self.product.price * Decimal::from(self.quantity)
    }
}

/// Sum of quantities over all lines, saturating at `u32::MAX`
pub fn total_items(items: &[CartItem]) -> u32 {
    items
        .iter()
        .fold(0u32, |acc, item| acc.saturating_add(item.quantity))
}

/// Sum of quantity × unit price over all lines
pub fn total_price(items: &[CartItem]) -> Decimal {
    items.iter().map(CartItem::line_total).sum()
}

/// Cart as returned by `GET /cart/` and the cart mutation endpoints
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerCart {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub items: Vec<CartItem>,
    #[serde(default)]
    pub total_items: Option<u32>,
    #[serde(default)]
    pub total_price: Option<Decimal>,
}

/// Add to cart payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddToCartRequest {
    pub product_id: i64,
    pub quantity: u32,
}

/// Update cart item payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateCartItemRequest {
    pub quantity: u32,
}
