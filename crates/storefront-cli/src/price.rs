use std::path::Path;

use storefront_core::{CartSelection, Product, StockNotice};

use crate::input::read_document;

pub(crate) fn run_price(
    product_path: &Path,
    color: &str,
    size: &str,
    quantity: u32,
    in_cart: u32,
) -> anyhow::Result<()> {
    let product: Product = read_document(product_path)?;
    for line in price_report(&product, color, size, quantity, in_cart) {
        println!("{line}");
    }
    Ok(())
}

/// Renders the selection outcome as printable lines.
pub(crate) fn price_report(
    product: &Product,
    color: &str,
    size: &str,
    quantity: u32,
    in_cart: u32,
) -> Vec<String> {
    let mut selection = CartSelection::new(product);
    selection.select_color(color);
    selection.select_size(size);
    selection.set_quantity(quantity);

    let mut lines = vec![
        format!("product: {} ({})", product.name, product.id),
        format!(
            "variant: {}",
            selection
                .resolved()
                .map_or_else(|| "none".to_string(), storefront_core::Variant::label)
        ),
        format!("price: {}", selection.effective_price()),
        format!("offer price: {}", selection.effective_offer_price()),
        format!("stock: {}", selection.effective_stock()),
        format!("quantity: {} (max {})", selection.quantity(), selection.max_quantity()),
    ];

    if selection.quantity() != quantity {
        tracing::info!(requested = quantity, applied = selection.quantity(), "quantity clamped");
    }

    match selection.add_to_cart(in_cart) {
        Ok(added) => {
            lines.push(format!(
                "add to cart: ok ({} x {})",
                added.item.quantity, added.item.sku
            ));
            if let Some(StockNotice::LowStock { remaining }) = added.notice {
                lines.push(format!("hurry: only {remaining} left in stock"));
            }
        }
        Err(err) => lines.push(format!("add to cart: blocked ({err})")),
    }
    lines
}
