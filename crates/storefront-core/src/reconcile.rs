//! Diffing an edited variant list against the snapshot taken when the
//! product form was loaded.
//!
//! The plan says which backend calls a save needs: one delete per removed
//! variant, one update per changed variant, and a single bulk create for
//! everything new. Executing the plan lives in the client crate.

use std::collections::{HashMap, HashSet};

use crate::models::Variant;

/// A variant field that participates in change detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariantFieldName {
    Color,
    Size,
    StockQuantity,
    Price,
    OfferPrice,
    IsActive,
    Image,
    Gender,
}

impl std::fmt::Display for VariantFieldName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            VariantFieldName::Color => "color",
            VariantFieldName::Size => "size",
            VariantFieldName::StockQuantity => "stockQuantity",
            VariantFieldName::Price => "price",
            VariantFieldName::OfferPrice => "offerPrice",
            VariantFieldName::IsActive => "isActive",
            VariantFieldName::Image => "image",
            VariantFieldName::Gender => "gender",
        };
        f.write_str(name)
    }
}

/// Why a variant is in the update set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateReason {
    Changed(Vec<VariantFieldName>),
    /// The edited list carries an id the snapshot never had.
    NotInSnapshot,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariantUpdate {
    pub id: String,
    pub variant: Variant,
    pub reason: UpdateReason,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncPlan {
    /// Ids of snapshot variants missing from the edited list.
    pub deletions: Vec<String>,
    pub updates: Vec<VariantUpdate>,
    /// Unsaved variants, sent together in one bulk create.
    pub creations: Vec<Variant>,
}

impl SyncPlan {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.deletions.is_empty() && self.updates.is_empty() && self.creations.is_empty()
    }

    /// Number of backend calls the plan needs.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.deletions.len() + self.updates.len() + usize::from(!self.creations.is_empty())
    }
}

/// Fields that differ between the snapshot and the edited variant.
#[must_use]
pub fn changed_fields(original: &Variant, edited: &Variant) -> Vec<VariantFieldName> {
    let mut changed = Vec::new();
    // Case-sensitive: the backend stores labels as typed, so a recase is an edit.
    if original.color != edited.color {
        changed.push(VariantFieldName::Color);
    }
    if original.size != edited.size {
        changed.push(VariantFieldName::Size);
    }
    if original.stock_quantity != edited.stock_quantity {
        changed.push(VariantFieldName::StockQuantity);
    }
    if original.price != edited.price {
        changed.push(VariantFieldName::Price);
    }
    if original.offer_price != edited.offer_price {
        changed.push(VariantFieldName::OfferPrice);
    }
    if original.is_active != edited.is_active {
        changed.push(VariantFieldName::IsActive);
    }
    if original.image != edited.image {
        changed.push(VariantFieldName::Image);
    }
    if original.gender != edited.gender {
        changed.push(VariantFieldName::Gender);
    }
    changed
}

/// Partitions `edited` against `existing` into deletions, updates, and
/// creations. Order within each group follows the input lists.
#[must_use]
pub fn plan_variant_sync(existing: &[Variant], edited: &[Variant]) -> SyncPlan {
    let originals: HashMap<&str, &Variant> = existing
        .iter()
        .filter_map(|v| v.id.as_deref().map(|id| (id, v)))
        .collect();
    let kept: HashSet<&str> = edited.iter().filter_map(|v| v.id.as_deref()).collect();

    let deletions = existing
        .iter()
        .filter_map(|v| v.id.as_deref())
        .filter(|id| !kept.contains(id))
        .map(str::to_owned)
        .collect();

    let mut updates = Vec::new();
    let mut creations = Vec::new();
    for variant in edited {
        let Some(id) = variant.id.as_deref() else {
            creations.push(variant.clone());
            continue;
        };
        let reason = match originals.get(id) {
            Some(original) => {
                let changed = changed_fields(original, variant);
                if changed.is_empty() {
                    continue;
                }
                UpdateReason::Changed(changed)
            }
            None => {
                tracing::warn!(variant_id = id, "variant not in loaded snapshot, sending update");
                UpdateReason::NotInSnapshot
            }
        };
        updates.push(VariantUpdate {
            id: id.to_owned(),
            variant: variant.clone(),
            reason,
        });
    }

    SyncPlan {
        deletions,
        updates,
        creations,
    }
}

/// Per-variant reasons a bulk create was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantRejection {
    pub color: String,
    pub size: String,
    pub reasons: Vec<String>,
}

/// Renders rejections as `color-size: reason, reason; color-size: reason`.
#[must_use]
pub fn format_rejections(rejections: &[VariantRejection]) -> String {
    rejections
        .iter()
        .map(|r| format!("{}-{}: {}", r.color, r.size, r.reasons.join(", ")))
        .collect::<Vec<_>>()
        .join("; ")
}
