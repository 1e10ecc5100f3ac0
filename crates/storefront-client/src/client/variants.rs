use reqwest::Method;
use serde::Deserialize;
use storefront_core::Variant;

use super::StorefrontClient;
use crate::api::VariantApi;
use crate::error::ClientError;

#[derive(Debug, Deserialize)]
struct BulkCreateResponse {
    #[serde(default)]
    variants: Vec<Variant>,
}

impl VariantApi for StorefrontClient {
    async fn delete_variant(&self, id: &str) -> Result<(), ClientError> {
        let url = self.endpoint(&["variants", id])?;
        self.execute(Method::DELETE, url, None).await?;
        tracing::debug!(variant_id = id, "variant deleted");
        Ok(())
    }

    async fn update_variant(&self, id: &str, variant: &Variant) -> Result<(), ClientError> {
        let url = self.endpoint(&["variants", id])?;
        let body = serde_json::to_value(variant).map_err(|e| ClientError::Deserialize {
            context: format!("variant {id} payload"),
            source: e,
        })?;
        self.execute(Method::PUT, url, Some(&body)).await?;
        tracing::debug!(variant_id = id, "variant updated");
        Ok(())
    }

    async fn bulk_create_variants(
        &self,
        product_id: &str,
        variants: &[Variant],
    ) -> Result<Vec<Variant>, ClientError> {
        let url = self.endpoint(&["variants", "bulk", product_id])?;
        let body = serde_json::json!({ "variants": variants });
        let text = self.execute(Method::POST, url, Some(&body)).await?;
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        let parsed: BulkCreateResponse =
            serde_json::from_str(&text).map_err(|e| ClientError::Deserialize {
                context: format!("bulk create response for product {product_id}"),
                source: e,
            })?;
        tracing::debug!(product_id, created = parsed.variants.len(), "variants created");
        Ok(parsed.variants)
    }
}
