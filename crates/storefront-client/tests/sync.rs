//! Tests for `sync_product_variants` using in-memory variant and media
//! fakes, so the ordering and failure-isolation rules can be checked without
//! a server.

use std::collections::HashSet;

use rust_decimal::Decimal;
use storefront_client::{
    sync_product_variants, ClientError, MediaHost, SyncOperation, UploadedMedia, VariantApi,
};
use storefront_core::{ImageInput, Variant, VariantBuilder, VariantField};
use tokio::sync::Mutex;

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Delete(String),
    Update(String, Variant),
    BulkCreate(String, Vec<Variant>),
}

#[derive(Default)]
struct FakeApi {
    calls: Mutex<Vec<Call>>,
    failing_ids: HashSet<String>,
    fail_bulk: bool,
}

impl FakeApi {
    fn failing(ids: &[&str]) -> Self {
        Self {
            failing_ids: ids.iter().map(|s| (*s).to_string()).collect(),
            ..Self::default()
        }
    }

    async fn calls(&self) -> Vec<Call> {
        self.calls.lock().await.clone()
    }

    fn rejection(&self, id: &str) -> Result<(), ClientError> {
        if self.failing_ids.contains(id) {
            return Err(ClientError::Api {
                status: 400,
                url: format!("http://api.test/variants/{id}"),
                message: format!("cannot change {id}"),
                body: None,
            });
        }
        Ok(())
    }
}

impl VariantApi for FakeApi {
    async fn delete_variant(&self, id: &str) -> Result<(), ClientError> {
        self.calls.lock().await.push(Call::Delete(id.to_string()));
        self.rejection(id)
    }

    async fn update_variant(&self, id: &str, variant: &Variant) -> Result<(), ClientError> {
        self.calls
            .lock()
            .await
            .push(Call::Update(id.to_string(), variant.clone()));
        self.rejection(id)
    }

    async fn bulk_create_variants(
        &self,
        product_id: &str,
        variants: &[Variant],
    ) -> Result<Vec<Variant>, ClientError> {
        self.calls
            .lock()
            .await
            .push(Call::BulkCreate(product_id.to_string(), variants.to_vec()));
        if self.fail_bulk {
            return Err(ClientError::Api {
                status: 422,
                url: "http://api.test/variants/bulk".to_string(),
                message: "Validation failed".to_string(),
                body: Some(serde_json::json!({
                    "errors": [{"color": "green", "size": "S", "reasons": ["price required"]}]
                })),
            });
        }
        Ok(variants
            .iter()
            .enumerate()
            .map(|(i, v)| v.clone().with_id(format!("new-{i}")))
            .collect())
    }
}

#[derive(Default)]
struct FakeMedia {
    uploads: Mutex<usize>,
    fail: bool,
}

impl MediaHost for FakeMedia {
    async fn upload(&self, image: &ImageInput) -> Result<UploadedMedia, ClientError> {
        let count = {
            let mut uploads = self.uploads.lock().await;
            *uploads += 1;
            *uploads
        };
        if self.fail {
            return Err(ClientError::Api {
                status: 400,
                url: "http://media.test/image/upload".to_string(),
                message: "Invalid image file".to_string(),
                body: None,
            });
        }
        let name = match image {
            ImageInput::DataUrl(_) => format!("inline-{count}"),
            ImageInput::File { file_name, .. } => file_name.clone(),
        };
        Ok(UploadedMedia {
            secure_url: format!("https://media.test/{name}"),
            public_id: name,
        })
    }
}

fn saved(id: &str, color: &str, size: &str) -> Variant {
    Variant::new(color, size, 1).with_id(id)
}

fn snapshot() -> Vec<Variant> {
    vec![saved("1", "red", "M"), saved("2", "blue", "L")]
}

/// Builds the edit from the scenario: stock of 1 changed, 2 removed, green/S added.
fn edited_builder() -> VariantBuilder {
    let mut builder = VariantBuilder::from_variants(snapshot());
    builder
        .update_field(0, VariantField::StockQuantity(5))
        .expect("row 0");
    builder.request_removal(1).expect("row 1");
    builder.confirm_removal().expect("pending removal");
    let index = builder.add(Decimal::from(100), None);
    builder
        .update_field(index, VariantField::Color("green".to_string()))
        .expect("new row");
    builder
        .update_field(index, VariantField::Size("S".to_string()))
        .expect("new row");
    builder
}

#[tokio::test]
async fn scenario_issues_one_delete_one_update_one_bulk_create() {
    let api = FakeApi::default();
    let media = FakeMedia::default();

    let report = sync_product_variants(&api, &media, "p1", &snapshot(), edited_builder().into_drafts())
        .await
        .expect("sync should run");

    let calls = api.calls().await;
    assert_eq!(calls.len(), 3, "calls: {calls:?}");
    assert_eq!(calls[0], Call::Delete("2".to_string()));
    assert!(matches!(&calls[1], Call::Update(id, v) if id == "1" && v.stock_quantity == 5));
    assert!(matches!(
        &calls[2],
        Call::BulkCreate(product, vs) if product == "p1" && vs.len() == 1 && vs[0].color == "green" && vs[0].id.is_none()
    ));

    assert!(report.is_success());
    assert_eq!(report.deleted, vec!["2".to_string()]);
    assert_eq!(report.updated, vec!["1".to_string()]);
    assert_eq!(report.created.len(), 1);
    assert_eq!(*media.uploads.lock().await, 0);
}

#[tokio::test]
async fn unchanged_list_makes_no_calls() {
    let api = FakeApi::default();
    let media = FakeMedia::default();
    let drafts = VariantBuilder::from_variants(snapshot()).into_drafts();

    let report = sync_product_variants(&api, &media, "p1", &snapshot(), drafts)
        .await
        .expect("sync should run");

    assert!(api.calls().await.is_empty());
    assert_eq!(report.summary(), "Variants saved: 0 deleted, 0 updated, 0 created");
}

#[tokio::test]
async fn one_failing_call_does_not_block_the_rest() {
    let api = FakeApi::failing(&["1", "3"]);
    let media = FakeMedia::default();
    let existing = vec![saved("1", "red", "M"), saved("2", "blue", "L"), saved("3", "red", "S")];

    let mut first = existing[0].clone();
    first.stock_quantity = 9;
    let mut second = existing[1].clone();
    second.is_active = false;
    let drafts = VariantBuilder::from_variants(vec![first, second]).into_drafts();

    let report = sync_product_variants(&api, &media, "p1", &existing, drafts)
        .await
        .expect("sync should run");

    assert_eq!(api.calls().await.len(), 3, "every call attempted");
    assert_eq!(report.updated, vec!["2".to_string()]);
    assert!(report.deleted.is_empty());
    assert_eq!(report.failures.len(), 2);
    assert_eq!(report.failures[0].operation, SyncOperation::Delete);
    assert_eq!(report.failures[0].target, "3");
    assert_eq!(report.failures[1].operation, SyncOperation::Update);
    assert_eq!(report.failures[1].message, "cannot change 1");
}

#[tokio::test]
async fn bulk_create_failure_is_summarised_per_variant() {
    let api = FakeApi {
        fail_bulk: true,
        ..FakeApi::default()
    };
    let media = FakeMedia::default();

    let report = sync_product_variants(&api, &media, "p1", &snapshot(), edited_builder().into_drafts())
        .await
        .expect("sync should run");

    assert_eq!(report.failures.len(), 1);
    let failure = &report.failures[0];
    assert_eq!(failure.operation, SyncOperation::BulkCreate);
    assert_eq!(failure.target, "green-S");
    assert_eq!(failure.message, "green-S: price required");
    assert!(report.summary().contains("create (green-S: price required)"));
}

#[tokio::test]
async fn staged_images_are_uploaded_before_diffing() {
    let api = FakeApi::default();
    let media = FakeMedia::default();

    let mut builder = VariantBuilder::from_variants(snapshot());
    builder
        .attach_image(
            0,
            ImageInput::File {
                file_name: "red-m.png".to_string(),
                content_type: "image/png".to_string(),
                bytes: vec![1, 2, 3],
            },
        )
        .expect("row 0");
    builder
        .update_field(
            1,
            VariantField::Image(Some("data:image/png;base64,AAAA".to_string())),
        )
        .expect("row 1");

    sync_product_variants(&api, &media, "p1", &snapshot(), builder.into_drafts())
        .await
        .expect("sync should run");

    assert_eq!(*media.uploads.lock().await, 2);
    let calls = api.calls().await;
    assert_eq!(calls.len(), 2);
    for call in calls {
        match call {
            Call::Update(id, v) if id == "1" => {
                assert_eq!(v.image.as_deref(), Some("https://media.test/red-m.png"));
            }
            Call::Update(id, v) if id == "2" => {
                let image = v.image.expect("image set");
                assert!(image.starts_with("https://media.test/inline-"), "{image}");
            }
            other => panic!("unexpected call: {other:?}"),
        }
    }
}

#[tokio::test]
async fn upload_failure_aborts_before_any_variant_call() {
    let api = FakeApi::default();
    let media = FakeMedia {
        fail: true,
        ..FakeMedia::default()
    };

    let mut builder = edited_builder();
    builder
        .attach_image(0, ImageInput::DataUrl("data:image/png;base64,AAAA".to_string()))
        .expect("row 0");

    let err = sync_product_variants(&api, &media, "p1", &snapshot(), builder.into_drafts())
        .await
        .unwrap_err();

    assert_eq!(err.user_message(), "Invalid image file");
    assert!(api.calls().await.is_empty());
}
