//! Seams between the sync logic and the network.
//!
//! [`crate::StorefrontClient`] and [`crate::MediaClient`] implement these
//! over HTTP; tests substitute in-memory fakes.

use std::future::Future;

use serde::Deserialize;
use storefront_core::{ImageInput, Variant};

use crate::error::ClientError;

/// The `/variants` routes of the backend.
pub trait VariantApi {
    fn delete_variant(&self, id: &str) -> impl Future<Output = Result<(), ClientError>> + Send;

    fn update_variant(
        &self,
        id: &str,
        variant: &Variant,
    ) -> impl Future<Output = Result<(), ClientError>> + Send;

    /// Creates all `variants` for `product_id` in one request and returns
    /// them as saved (with ids and SKUs).
    fn bulk_create_variants(
        &self,
        product_id: &str,
        variants: &[Variant],
    ) -> impl Future<Output = Result<Vec<Variant>, ClientError>> + Send;
}

/// A hosted image.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UploadedMedia {
    pub secure_url: String,
    pub public_id: String,
}

/// Third-party media host accepting direct uploads.
pub trait MediaHost {
    fn upload(
        &self,
        image: &ImageInput,
    ) -> impl Future<Output = Result<UploadedMedia, ClientError>> + Send;
}
