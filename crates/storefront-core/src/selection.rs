//! Storefront variant selection and effective pricing.
//!
//! A shopper picks a color and a size; [`resolve_variant`] maps that pair to
//! at most one active variant, and the `effective_*` functions fall back from
//! variant-level values to product-level defaults. [`CartSelection`] holds
//! the selection state for one product page and enforces the quantity bounds.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::cart::{AddToCart, CartItem, CartLine, ComparisonItem, WishlistItem};
use crate::models::{same_label, Product, Variant};

/// Upper bound on the quantity a shopper can pick for one line.
pub const MAX_QUANTITY: u32 = 10;

/// Remaining stock below which a low-stock notice accompanies add-to-cart.
pub const LOW_STOCK_THRESHOLD: u32 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("please select a color and size")]
    NoVariantSelected,

    #[error("this variant is out of stock")]
    OutOfStock,

    #[error("not enough stock: requested {requested}, only {available} available")]
    NotEnoughStock { requested: u32, available: u32 },

    #[error("variant {label} has no SKU yet")]
    MissingSku { label: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockNotice {
    LowStock { remaining: u32 },
}

/// Resolves a color/size pair to an active variant, ignoring case.
///
/// When several active variants share the pair, the first in list order wins.
#[must_use]
pub fn resolve_variant<'a>(product: &'a Product, color: &str, size: &str) -> Option<&'a Variant> {
    product
        .active_variants()
        .find(|v| same_label(&v.color, color) && same_label(&v.size, size))
}

/// `variant.price`, falling back to the product base price.
#[must_use]
pub fn effective_price(product: &Product, variant: Option<&Variant>) -> Decimal {
    variant
        .and_then(|v| v.price)
        .unwrap_or(product.base_price)
}

/// `variant.offer_price`, then `variant.price`, then the product's base offer
/// price, then its base price.
#[must_use]
pub fn effective_offer_price(product: &Product, variant: Option<&Variant>) -> Decimal {
    variant
        .and_then(|v| v.offer_price.or(v.price))
        .or(product.base_offer_price)
        .unwrap_or(product.base_price)
}

/// Stock of the resolved variant, or 0 when nothing resolved.
#[must_use]
pub fn effective_stock(variant: Option<&Variant>) -> u32 {
    variant.map_or(0, |v| v.stock_quantity)
}

/// Selection state for one product page.
///
/// Invariant: `1 <= quantity <= max_quantity()` after every operation.
#[derive(Debug, Clone)]
pub struct CartSelection<'a> {
    product: &'a Product,
    color: Option<String>,
    size: Option<String>,
    quantity: u32,
}

impl<'a> CartSelection<'a> {
    /// Starts with the first available color and its first in-stock size.
    #[must_use]
    pub fn new(product: &'a Product) -> Self {
        let mut selection = Self {
            product,
            color: None,
            size: None,
            quantity: 1,
        };
        if let Some(color) = product.available_colors().first() {
            selection.select_color(color);
        }
        selection
    }

    #[must_use]
    pub fn product(&self) -> &'a Product {
        self.product
    }

    #[must_use]
    pub fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }

    #[must_use]
    pub fn size(&self) -> Option<&str> {
        self.size.as_deref()
    }

    #[must_use]
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Selects `color`, resets the size to the first size with stock for that
    /// color (or clears it), and resets the quantity.
    pub fn select_color(&mut self, color: &str) {
        self.color = Some(color.to_string());
        self.size = self
            .product
            .sizes_for_color(color)
            .into_iter()
            .find(|(_, stock)| *stock > 0)
            .map(|(size, _)| size.to_string());
        self.quantity = 1;
    }

    pub fn select_size(&mut self, size: &str) {
        self.size = Some(size.to_string());
        self.quantity = 1;
    }

    /// The active variant matching the current color and size, if any.
    #[must_use]
    pub fn resolved(&self) -> Option<&'a Variant> {
        let color = self.color.as_deref()?;
        let size = self.size.as_deref()?;
        resolve_variant(self.product, color, size)
    }

    #[must_use]
    pub fn effective_price(&self) -> Decimal {
        effective_price(self.product, self.resolved())
    }

    #[must_use]
    pub fn effective_offer_price(&self) -> Decimal {
        effective_offer_price(self.product, self.resolved())
    }

    #[must_use]
    pub fn effective_stock(&self) -> u32 {
        effective_stock(self.resolved())
    }

    /// Largest selectable quantity. Never below 1, so an out-of-stock
    /// selection still shows quantity 1 with purchase disabled.
    #[must_use]
    pub fn max_quantity(&self) -> u32 {
        MAX_QUANTITY.min(self.effective_stock()).max(1)
    }

    pub fn increment(&mut self) {
        self.set_quantity(self.quantity.saturating_add(1));
    }

    pub fn decrement(&mut self) {
        self.set_quantity(self.quantity.saturating_sub(1));
    }

    /// Sets the quantity, clamped into `[1, max_quantity()]`.
    pub fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity.clamp(1, self.max_quantity());
    }

    /// Whether add-to-cart and buy-now should be enabled.
    #[must_use]
    pub fn can_purchase(&self) -> bool {
        self.effective_stock() > 0
    }

    /// Validates the selection for adding to the cart.
    ///
    /// `already_in_cart` is the quantity of the same SKU the cart already
    /// holds; the combined amount must fit the variant's stock.
    ///
    /// # Errors
    ///
    /// - [`SelectionError::NoVariantSelected`] when color/size resolve to nothing.
    /// - [`SelectionError::OutOfStock`] when the variant has no stock.
    /// - [`SelectionError::NotEnoughStock`] when the request exceeds stock.
    /// - [`SelectionError::MissingSku`] when the variant has neither SKU nor id.
    pub fn add_to_cart(&self, already_in_cart: u32) -> Result<AddToCart, SelectionError> {
        let variant = self.resolved().ok_or(SelectionError::NoVariantSelected)?;
        let stock = variant.stock_quantity;
        if stock == 0 {
            return Err(SelectionError::OutOfStock);
        }

        let requested = self.quantity.saturating_add(already_in_cart);
        if requested > stock {
            return Err(SelectionError::NotEnoughStock {
                requested,
                available: stock.saturating_sub(already_in_cart),
            });
        }

        let remaining = stock - requested;
        let notice = (remaining < LOW_STOCK_THRESHOLD).then_some(StockNotice::LowStock { remaining });
        if notice.is_some() {
            tracing::debug!(
                product_id = %self.product.id,
                variant = %variant.label(),
                remaining,
                "low stock after add to cart"
            );
        }

        Ok(AddToCart {
            item: CartItem {
                product_id: self.product.id.clone(),
                sku: sku_of(variant)?,
                quantity: self.quantity,
            },
            notice,
        })
    }

    /// Validates the selection for immediate checkout and prices the line at
    /// the effective offer price.
    ///
    /// # Errors
    ///
    /// Same as [`CartSelection::add_to_cart`] with an empty cart.
    pub fn buy_now(&self) -> Result<CartLine, SelectionError> {
        let added = self.add_to_cart(0)?;
        Ok(CartLine {
            item: added.item,
            unit_price: self.effective_offer_price(),
        })
    }

    /// # Errors
    ///
    /// [`SelectionError::NoVariantSelected`] or [`SelectionError::MissingSku`].
    pub fn wishlist_item(&self) -> Result<WishlistItem, SelectionError> {
        let variant = self.resolved().ok_or(SelectionError::NoVariantSelected)?;
        Ok(WishlistItem {
            product_id: self.product.id.clone(),
            sku: sku_of(variant)?,
        })
    }

    /// # Errors
    ///
    /// [`SelectionError::NoVariantSelected`] or [`SelectionError::MissingSku`].
    pub fn comparison_item(&self) -> Result<ComparisonItem, SelectionError> {
        let variant = self.resolved().ok_or(SelectionError::NoVariantSelected)?;
        Ok(ComparisonItem {
            product_id: self.product.id.clone(),
            sku: sku_of(variant)?,
        })
    }
}

// Variants saved before SKUs existed are addressed by id.
fn sku_of(variant: &Variant) -> Result<String, SelectionError> {
    variant
        .sku
        .clone()
        .or_else(|| variant.id.clone())
        .ok_or_else(|| SelectionError::MissingSku {
            label: variant.label(),
        })
}

#[cfg(test)]
#[path = "selection_test.rs"]
mod tests;
