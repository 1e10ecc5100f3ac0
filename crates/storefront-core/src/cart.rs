use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::selection::StockNotice;

/// A line in the user's cart. The server owns the cart; this is the shape
/// sent when adding and received when listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product_id: String,
    pub sku: String,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistItem {
    pub product_id: String,
    pub sku: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonItem {
    pub product_id: String,
    pub sku: String,
}

/// Result of a successful add-to-cart validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddToCart {
    pub item: CartItem,
    /// Set when few units remain after this purchase.
    pub notice: Option<StockNotice>,
}

/// A cart item priced at the effective offer price of its variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    pub item: CartItem,
    pub unit_price: Decimal,
}

impl CartLine {
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.item.quantity)
    }
}

/// Sum of all line totals.
#[must_use]
pub fn cart_subtotal(lines: &[CartLine]) -> Decimal {
    lines.iter().map(CartLine::total).sum()
}
