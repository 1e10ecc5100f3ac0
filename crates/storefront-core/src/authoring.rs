//! Admin-side variant authoring.
//!
//! [`VariantBuilder`] keeps the ordered list of variant drafts behind the
//! product form. Drafts loaded from the backend are keyed by their id; new
//! rows get a temporary key that lives only until the form is submitted.

use std::collections::HashSet;

use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Product, Variant};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthoringError {
    #[error("no variant at index {index} (list has {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("no removal is awaiting confirmation")]
    NoPendingRemoval,

    #[error("at least one variant is required")]
    NoVariants,

    #[error("variant {position} is missing a color")]
    MissingColor { position: usize },

    #[error("variant {position} is missing a size")]
    MissingSize { position: usize },
}

/// Identity of a draft row.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DraftKey {
    Persisted(String),
    Temporary(Uuid),
}

/// An image staged in the form but not yet on the media host.
#[derive(Clone, PartialEq, Eq)]
pub enum ImageInput {
    DataUrl(String),
    File {
        file_name: String,
        content_type: String,
        bytes: Vec<u8>,
    },
}

impl std::fmt::Debug for ImageInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImageInput::DataUrl(url) => f
                .debug_tuple("DataUrl")
                .field(&format_args!("{} bytes", url.len()))
                .finish(),
            ImageInput::File {
                file_name,
                content_type,
                bytes,
            } => f
                .debug_struct("File")
                .field("file_name", file_name)
                .field("content_type", content_type)
                .field("len", &bytes.len())
                .finish(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariantDraft {
    pub key: DraftKey,
    pub variant: Variant,
    /// Replaces `variant.image` once uploaded.
    pub pending_image: Option<ImageInput>,
}

impl VariantDraft {
    fn from_variant(variant: Variant) -> Self {
        let key = match &variant.id {
            Some(id) => DraftKey::Persisted(id.clone()),
            None => DraftKey::Temporary(Uuid::new_v4()),
        };
        Self {
            key,
            variant,
            pending_image: None,
        }
    }

    /// The image that must go to the media host before saving, if any.
    ///
    /// A staged file wins; otherwise an inline `data:` URL left in the image
    /// field also needs uploading.
    #[must_use]
    pub fn image_to_upload(&self) -> Option<ImageInput> {
        if let Some(pending) = &self.pending_image {
            return Some(pending.clone());
        }
        self.variant
            .image
            .as_deref()
            .filter(|image| image.starts_with("data:"))
            .map(|image| ImageInput::DataUrl(image.to_string()))
    }

    fn with_field(&self, field: VariantField) -> Self {
        let mut next = self.clone();
        let v = &mut next.variant;
        match field {
            VariantField::Color(color) => v.color = color,
            VariantField::Size(size) => v.size = size,
            VariantField::StockQuantity(stock) => v.stock_quantity = stock,
            VariantField::Price(price) => v.price = price,
            VariantField::OfferPrice(offer) => v.offer_price = offer,
            VariantField::IsActive(active) => v.is_active = active,
            VariantField::Gender(gender) => v.gender = gender,
            VariantField::Image(image) => {
                v.image = image;
                next.pending_image = None;
            }
        }
        next
    }
}

/// One editable field of a variant row.
#[derive(Debug, Clone, PartialEq)]
pub enum VariantField {
    Color(String),
    Size(String),
    StockQuantity(u32),
    Price(Option<Decimal>),
    OfferPrice(Option<Decimal>),
    IsActive(bool),
    Gender(Option<String>),
    Image(Option<String>),
}

/// Non-blocking warning raised when a color/size pair repeats.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateWarning {
    pub index: usize,
    pub duplicate_of: usize,
    pub label: String,
}

impl std::fmt::Display for DuplicateWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "variant {} duplicates {} (row {})",
            self.index + 1,
            self.label,
            self.duplicate_of + 1
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VariantSummary {
    pub total_stock: u64,
    pub color_count: usize,
    pub size_count: usize,
}

#[derive(Debug, Clone, Default)]
pub struct VariantBuilder {
    drafts: Vec<VariantDraft>,
    pending_removal: Option<DraftKey>,
}

impl VariantBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the builder with a product's saved variants.
    #[must_use]
    pub fn from_product(product: &Product) -> Self {
        Self::from_variants(product.variants.iter().cloned())
    }

    #[must_use]
    pub fn from_variants(variants: impl IntoIterator<Item = Variant>) -> Self {
        Self {
            drafts: variants.into_iter().map(VariantDraft::from_variant).collect(),
            pending_removal: None,
        }
    }

    #[must_use]
    pub fn drafts(&self) -> &[VariantDraft] {
        &self.drafts
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.drafts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.drafts.is_empty()
    }

    /// Appends an empty draft priced from the product's base prices and
    /// returns its index.
    pub fn add(&mut self, base_price: Decimal, base_offer_price: Option<Decimal>) -> usize {
        let mut variant = Variant::new("", "", 0);
        variant.price = Some(base_price);
        variant.offer_price = base_offer_price;
        self.drafts.push(VariantDraft {
            key: DraftKey::Temporary(Uuid::new_v4()),
            variant,
            pending_image: None,
        });
        self.pending_removal = None;
        self.drafts.len() - 1
    }

    /// Marks the draft at `index` for removal. Nothing is removed until
    /// [`VariantBuilder::confirm_removal`].
    ///
    /// # Errors
    ///
    /// [`AuthoringError::IndexOutOfRange`] for a bad index.
    pub fn request_removal(&mut self, index: usize) -> Result<&VariantDraft, AuthoringError> {
        let key = self.draft_at(index)?.key.clone();
        self.pending_removal = Some(key);
        Ok(&self.drafts[index])
    }

    /// Removes the draft marked by [`VariantBuilder::request_removal`].
    ///
    /// # Errors
    ///
    /// [`AuthoringError::NoPendingRemoval`] when nothing is marked, or the
    /// marked draft is gone.
    pub fn confirm_removal(&mut self) -> Result<VariantDraft, AuthoringError> {
        let key = self
            .pending_removal
            .take()
            .ok_or(AuthoringError::NoPendingRemoval)?;
        let index = self
            .drafts
            .iter()
            .position(|d| d.key == key)
            .ok_or(AuthoringError::NoPendingRemoval)?;
        Ok(self.drafts.remove(index))
    }

    pub fn cancel_removal(&mut self) {
        self.pending_removal = None;
    }

    #[must_use]
    pub fn pending_removal(&self) -> Option<&DraftKey> {
        self.pending_removal.as_ref()
    }

    /// Replaces the draft at `index` with a copy carrying the new field value.
    ///
    /// # Errors
    ///
    /// [`AuthoringError::IndexOutOfRange`] for a bad index.
    pub fn update_field(&mut self, index: usize, field: VariantField) -> Result<(), AuthoringError> {
        let updated = self.draft_at(index)?.with_field(field);
        self.drafts[index] = updated;
        Ok(())
    }

    /// Stages an image for upload on save.
    ///
    /// # Errors
    ///
    /// [`AuthoringError::IndexOutOfRange`] for a bad index.
    pub fn attach_image(&mut self, index: usize, image: ImageInput) -> Result<(), AuthoringError> {
        let mut updated = self.draft_at(index)?.clone();
        updated.pending_image = Some(image);
        self.drafts[index] = updated;
        Ok(())
    }

    /// Checks whether the draft at `index` repeats the color/size pair of an
    /// earlier or later draft. Intended for color/size blur; never blocks.
    /// Reporting the warning is left to the caller.
    #[must_use]
    pub fn check_duplicate(&self, index: usize) -> Option<DuplicateWarning> {
        let draft = self.drafts.get(index)?;
        let variant = &draft.variant;
        if variant.color.is_empty() || variant.size.is_empty() {
            return None;
        }
        let duplicate_of = self
            .drafts
            .iter()
            .enumerate()
            .find(|(i, other)| *i != index && other.variant.same_combination(variant))
            .map(|(i, _)| i)?;

        Some(DuplicateWarning {
            index,
            duplicate_of,
            label: variant.label(),
        })
    }

    /// Totals recomputed from the full list.
    #[must_use]
    pub fn summary(&self) -> VariantSummary {
        let mut colors = HashSet::new();
        let mut sizes = HashSet::new();
        let mut total_stock = 0u64;
        for draft in &self.drafts {
            let v = &draft.variant;
            total_stock += u64::from(v.stock_quantity);
            if !v.color.is_empty() {
                colors.insert(v.color.to_lowercase());
            }
            if !v.size.is_empty() {
                sizes.insert(v.size.to_lowercase());
            }
        }
        VariantSummary {
            total_stock,
            color_count: colors.len(),
            size_count: sizes.len(),
        }
    }

    /// Checks the list is submittable.
    ///
    /// # Errors
    ///
    /// [`AuthoringError::NoVariants`] for an empty list, or the first draft
    /// missing a color or size (1-based position).
    pub fn validate_for_submit(&self) -> Result<(), AuthoringError> {
        if self.drafts.is_empty() {
            return Err(AuthoringError::NoVariants);
        }
        for (i, draft) in self.drafts.iter().enumerate() {
            if draft.variant.color.trim().is_empty() {
                return Err(AuthoringError::MissingColor { position: i + 1 });
            }
            if draft.variant.size.trim().is_empty() {
                return Err(AuthoringError::MissingSize { position: i + 1 });
            }
        }
        Ok(())
    }

    /// Consumes the builder, yielding drafts for submission.
    #[must_use]
    pub fn into_drafts(self) -> Vec<VariantDraft> {
        self.drafts
    }

    fn draft_at(&self, index: usize) -> Result<&VariantDraft, AuthoringError> {
        self.drafts.get(index).ok_or(AuthoringError::IndexOutOfRange {
            index,
            len: self.drafts.len(),
        })
    }
}

#[cfg(test)]
#[path = "authoring_test.rs"]
mod tests;
