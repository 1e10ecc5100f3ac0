use std::path::Path;

use anyhow::Context;
use storefront_client::{sync_product_variants, MediaClient, SessionStore, StorefrontClient};
use storefront_core::{
    plan_variant_sync, AppConfig, PersistedSession, SyncPlan, UpdateReason, Variant,
    VariantBuilder,
};

use crate::input::read_document;

pub(crate) fn run_plan(existing_path: &Path, edited_path: &Path) -> anyhow::Result<()> {
    let existing: Vec<Variant> = read_document(existing_path)?;
    let edited: Vec<Variant> = read_document(edited_path)?;
    let plan = plan_variant_sync(&existing, &edited);
    for line in describe_plan(&plan) {
        println!("{line}");
    }
    Ok(())
}

pub(crate) fn describe_plan(plan: &SyncPlan) -> Vec<String> {
    if plan.is_empty() {
        return vec!["no changes".to_string()];
    }
    let mut lines = Vec::with_capacity(plan.call_count());
    for id in &plan.deletions {
        lines.push(format!("delete {id}"));
    }
    for update in &plan.updates {
        let why = match &update.reason {
            UpdateReason::Changed(fields) => fields
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", "),
            UpdateReason::NotInSnapshot => "not in loaded snapshot".to_string(),
        };
        lines.push(format!("update {} ({why})", update.id));
    }
    if !plan.creations.is_empty() {
        let labels = plan
            .creations
            .iter()
            .map(Variant::label)
            .collect::<Vec<_>>()
            .join(", ");
        lines.push(format!("create {} variant(s): {labels}", plan.creations.len()));
    }
    lines
}

pub(crate) async fn run_sync(
    config: &AppConfig,
    product_id: &str,
    existing_path: &Path,
    edited_path: &Path,
) -> anyhow::Result<()> {
    let existing: Vec<Variant> = read_document(existing_path)?;
    let edited: Vec<Variant> = read_document(edited_path)?;

    let builder = VariantBuilder::from_variants(edited);
    builder.validate_for_submit()?;
    for index in 0..builder.len() {
        if let Some(warning) = builder.check_duplicate(index) {
            tracing::warn!(index, duplicate_of = warning.duplicate_of, label = %warning.label, "duplicate variant");
            println!("warning: {warning}");
        }
    }

    let session = load_session(&config.session_path)?;
    if session.access_token().await.is_none() {
        anyhow::bail!("not logged in; run `storefront-cli session login` first");
    }
    let client = StorefrontClient::new(config, session.clone())?;
    let media = MediaClient::new(config)?;

    let report = sync_product_variants(&client, &media, product_id, &existing, builder.into_drafts())
        .await
        .map_err(|e| anyhow::anyhow!("variant sync aborted: {}", e.user_message()))?;

    // The client may have refreshed or dropped the token.
    let state = session.snapshot().await;
    crate::session::save_session(&config.session_path, &PersistedSession::from(&state))?;

    println!("{}", report.summary());
    if !report.is_success() {
        anyhow::bail!("{} variant change(s) failed", report.failures.len());
    }
    Ok(())
}

fn load_session(path: &Path) -> anyhow::Result<SessionStore> {
    let persisted = crate::session::load_session(path)
        .with_context(|| format!("failed to load session from {}", path.display()))?;
    Ok(SessionStore::new(persisted.into_state()))
}
