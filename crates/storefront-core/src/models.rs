use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A catalog product as returned by the backend, with its ordered variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Price used by any variant that does not override it.
    pub base_price: Decimal,
    /// Sale price used by any variant that sets neither `price` nor `offer_price`.
    #[serde(default)]
    pub base_offer_price: Option<Decimal>,
    #[serde(default)]
    pub return_policy: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub variants: Vec<Variant>,
}

impl Product {
    /// Variants that may be shown and sold. Only an explicit `is_active: false`
    /// hides a variant.
    pub fn active_variants(&self) -> impl Iterator<Item = &Variant> {
        self.variants.iter().filter(|v| v.is_active)
    }

    /// Distinct colors among active variants, in first-seen order.
    ///
    /// Colors differing only by case collapse to the first spelling seen.
    #[must_use]
    pub fn available_colors(&self) -> Vec<&str> {
        distinct_labels(self.active_variants().map(|v| v.color.as_str()))
    }

    /// Distinct sizes among active variants, in first-seen order.
    #[must_use]
    pub fn available_sizes(&self) -> Vec<&str> {
        distinct_labels(self.active_variants().map(|v| v.size.as_str()))
    }

    /// Sizes offered for `color` with the stock of the matching active variant.
    #[must_use]
    pub fn sizes_for_color(&self, color: &str) -> Vec<(&str, u32)> {
        self.active_variants()
            .filter(|v| same_label(&v.color, color))
            .map(|v| (v.size.as_str(), v.stock_quantity))
            .collect()
    }

    /// Sum of stock across active variants.
    #[must_use]
    pub fn total_stock(&self) -> u64 {
        self.active_variants()
            .map(|v| u64::from(v.stock_quantity))
            .sum()
    }
}

/// A purchasable color/size combination of a [`Product`].
///
/// `id` is `None` until the backend has persisted the variant; `sku` is
/// assigned by the backend and never generated here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variant {
    #[serde(default, alias = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub color: String,
    pub size: String,
    #[serde(default)]
    pub stock_quantity: u32,
    /// Overrides [`Product::base_price`] when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offer_price: Option<Decimal>,
    /// Hosted image URL. May temporarily hold a `data:` URL before upload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Only an explicit `false` deactivates; missing or `null` means active.
    #[serde(default = "default_active", deserialize_with = "active_unless_false")]
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
}

impl Variant {
    /// A new, unsaved variant with the given labels and stock.
    #[must_use]
    pub fn new(color: impl Into<String>, size: impl Into<String>, stock_quantity: u32) -> Self {
        Self {
            id: None,
            color: color.into(),
            size: size.into(),
            stock_quantity,
            price: None,
            offer_price: None,
            image: None,
            is_active: true,
            gender: None,
            sku: None,
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// `true` when this variant's color and size match `other`'s, ignoring case.
    #[must_use]
    pub fn same_combination(&self, other: &Variant) -> bool {
        same_label(&self.color, &other.color) && same_label(&self.size, &other.size)
    }

    /// `"color-size"` label used in user-facing messages.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{}-{}", self.color, self.size)
    }
}

fn default_active() -> bool {
    true
}

fn active_unless_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(true))
}

/// Case-insensitive comparison used for color and size labels.
pub(crate) fn same_label(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

fn distinct_labels<'a>(labels: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen: Vec<&str> = Vec::new();
    for label in labels {
        if label.is_empty() || seen.iter().any(|s| same_label(s, label)) {
            continue;
        }
        seen.push(label);
    }
    seen
}
