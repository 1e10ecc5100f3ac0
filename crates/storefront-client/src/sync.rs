//! Saving an edited variant list: upload staged images, diff against the
//! loaded snapshot, then issue the delete/update/create calls.
//!
//! Deletes and updates run one at a time and a failing call never stops its
//! siblings; every failure ends up in the [`SyncReport`].

use futures::future::try_join_all;
use serde::Deserialize;
use storefront_core::{
    format_rejections, plan_variant_sync, SyncPlan, Variant, VariantDraft, VariantRejection,
};

use crate::api::{MediaHost, VariantApi};
use crate::error::ClientError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOperation {
    Delete,
    Update,
    BulkCreate,
}

impl std::fmt::Display for SyncOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncOperation::Delete => write!(f, "delete"),
            SyncOperation::Update => write!(f, "update"),
            SyncOperation::BulkCreate => write!(f, "create"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncFailure {
    pub operation: SyncOperation,
    /// Variant id, or the `color-size` labels for a bulk create.
    pub target: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncReport {
    pub deleted: Vec<String>,
    pub updated: Vec<String>,
    pub created: Vec<Variant>,
    pub failures: Vec<SyncFailure>,
}

impl SyncReport {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// One notification line describing the outcome.
    #[must_use]
    pub fn summary(&self) -> String {
        let counts = format!(
            "{} deleted, {} updated, {} created",
            self.deleted.len(),
            self.updated.len(),
            self.created.len()
        );
        if self.failures.is_empty() {
            return format!("Variants saved: {counts}");
        }
        let failures = self
            .failures
            .iter()
            .map(|f| match f.operation {
                SyncOperation::BulkCreate => format!("create ({})", f.message),
                op => format!("{op} {}: {}", f.target, f.message),
            })
            .collect::<Vec<_>>()
            .join("; ");
        format!("Some variant changes failed ({counts}): {failures}")
    }
}

/// Uploads every staged image and writes the hosted URL into its variant.
///
/// Uploads run concurrently; the first failure aborts the save before any
/// variant call is made.
///
/// # Errors
///
/// The first upload error.
pub async fn upload_staged_images<M: MediaHost>(
    media: &M,
    drafts: Vec<VariantDraft>,
) -> Result<Vec<Variant>, ClientError> {
    try_join_all(drafts.into_iter().map(|draft| async move {
        let mut variant = draft.variant.clone();
        if let Some(image) = draft.image_to_upload() {
            let uploaded = media.upload(&image).await?;
            tracing::debug!(variant = %variant.label(), url = %uploaded.secure_url, "variant image hosted");
            variant.image = Some(uploaded.secure_url);
        }
        Ok::<_, ClientError>(variant)
    }))
    .await
}

/// Saves `drafts` for `product_id` against the `existing` snapshot taken
/// when the form loaded.
///
/// # Errors
///
/// Only image upload failures abort; per-variant call failures are reported
/// in the returned [`SyncReport`].
pub async fn sync_product_variants<A, M>(
    api: &A,
    media: &M,
    product_id: &str,
    existing: &[Variant],
    drafts: Vec<VariantDraft>,
) -> Result<SyncReport, ClientError>
where
    A: VariantApi,
    M: MediaHost,
{
    let edited = upload_staged_images(media, drafts).await?;
    let plan = plan_variant_sync(existing, &edited);
    tracing::info!(
        product_id,
        deletions = plan.deletions.len(),
        updates = plan.updates.len(),
        creations = plan.creations.len(),
        "syncing product variants"
    );
    Ok(apply_plan(api, product_id, plan).await)
}

/// Executes a [`SyncPlan`]: deletes, then updates, then one bulk create.
pub async fn apply_plan<A: VariantApi>(api: &A, product_id: &str, plan: SyncPlan) -> SyncReport {
    let mut report = SyncReport::default();

    for id in plan.deletions {
        match api.delete_variant(&id).await {
            Ok(()) => report.deleted.push(id),
            Err(err) => {
                tracing::warn!(variant_id = %id, error = %err, "variant delete failed");
                report.failures.push(SyncFailure {
                    operation: SyncOperation::Delete,
                    target: id,
                    message: err.user_message(),
                });
            }
        }
    }

    for update in plan.updates {
        match api.update_variant(&update.id, &update.variant).await {
            Ok(()) => report.updated.push(update.id),
            Err(err) => {
                tracing::warn!(variant_id = %update.id, error = %err, "variant update failed");
                report.failures.push(SyncFailure {
                    operation: SyncOperation::Update,
                    target: update.id,
                    message: err.user_message(),
                });
            }
        }
    }

    if !plan.creations.is_empty() {
        match api.bulk_create_variants(product_id, &plan.creations).await {
            Ok(created) => report.created = created,
            Err(err) => {
                tracing::warn!(product_id, error = %err, "bulk variant create failed");
                let target = plan
                    .creations
                    .iter()
                    .map(Variant::label)
                    .collect::<Vec<_>>()
                    .join(", ");
                report.failures.push(SyncFailure {
                    operation: SyncOperation::BulkCreate,
                    target,
                    message: bulk_create_message(&err, &plan.creations),
                });
            }
        }
    }

    report
}

#[derive(Debug, Deserialize)]
struct RejectionBody {
    #[serde(default)]
    errors: Vec<RejectionEntry>,
}

#[derive(Debug, Deserialize)]
struct RejectionEntry {
    color: String,
    size: String,
    #[serde(default)]
    reasons: Vec<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Compiles `color-size: reasons` for a failed bulk create.
///
/// Uses the backend's per-variant `errors` when present; otherwise every
/// submitted variant is listed with the overall error message.
fn bulk_create_message(err: &ClientError, submitted: &[Variant]) -> String {
    let from_body = match err {
        ClientError::Api {
            body: Some(body), ..
        } => serde_json::from_value::<RejectionBody>(body.clone())
            .map(|b| b.errors)
            .unwrap_or_default(),
        _ => Vec::new(),
    };

    let rejections: Vec<VariantRejection> = if from_body.is_empty() {
        let message = err.user_message();
        submitted
            .iter()
            .map(|v| VariantRejection {
                color: v.color.clone(),
                size: v.size.clone(),
                reasons: vec![message.clone()],
            })
            .collect()
    } else {
        from_body
            .into_iter()
            .map(|entry| {
                let mut reasons = entry.reasons;
                if reasons.is_empty() {
                    reasons.extend(entry.message);
                }
                VariantRejection {
                    color: entry.color,
                    size: entry.size,
                    reasons,
                }
            })
            .collect()
    };

    format_rejections(&rejections)
}
