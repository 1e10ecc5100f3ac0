//! Reading product and variant fixtures from disk.

use std::path::Path;

use anyhow::Context;
use serde::de::DeserializeOwned;

/// Reads `path` as YAML when the extension is `.yaml`/`.yml`, JSON otherwise.
pub(crate) fn read_document<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse_document(path, &raw)
}

pub(crate) fn parse_document<T: DeserializeOwned>(path: &Path, raw: &str) -> anyhow::Result<T> {
    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));
    if is_yaml {
        serde_yaml::from_str(raw).with_context(|| format!("invalid YAML in {}", path.display()))
    } else {
        serde_json::from_str(raw).with_context(|| format!("invalid JSON in {}", path.display()))
    }
}
