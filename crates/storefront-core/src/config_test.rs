use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

/// Returns a map with all required env vars populated with valid defaults.
fn full_env<'a>() -> HashMap<&'a str, &'a str> {
    let mut m = HashMap::new();
    m.insert("STOREFRONT_API_URL", "https://api.shop.test/api/v1/");
    m.insert("STOREFRONT_MEDIA_URL", "https://media.shop.test/v1_1/demo");
    m
}

#[test]
fn parse_environment_known_values() {
    assert_eq!(
        parse_environment("development").unwrap(),
        Environment::Development
    );
    assert_eq!(parse_environment("test").unwrap(), Environment::Test);
    assert_eq!(
        parse_environment("production").unwrap(),
        Environment::Production
    );
}

#[test]
fn parse_environment_unknown_fails() {
    let err = parse_environment("staging").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "STOREFRONT_ENV"));
}

#[test]
fn build_app_config_fails_without_api_url() {
    let map: HashMap<&str, &str> = HashMap::new();
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "STOREFRONT_API_URL"),
        "expected MissingEnvVar(STOREFRONT_API_URL), got: {result:?}"
    );
}

#[test]
fn build_app_config_fails_without_media_url() {
    let mut map: HashMap<&str, &str> = HashMap::new();
    map.insert("STOREFRONT_API_URL", "https://api.shop.test");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "STOREFRONT_MEDIA_URL"),
        "expected MissingEnvVar(STOREFRONT_MEDIA_URL), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_non_http_api_url() {
    let mut map = full_env();
    map.insert("STOREFRONT_API_URL", "ftp://api.shop.test");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "STOREFRONT_API_URL"),
        "expected InvalidEnvVar(STOREFRONT_API_URL), got: {result:?}"
    );
}

#[test]
fn build_app_config_succeeds_with_defaults() {
    let map = full_env();
    let cfg = build_app_config(lookup_from_map(&map)).expect("config should build");
    assert_eq!(cfg.api_url, "https://api.shop.test/api/v1");
    assert_eq!(cfg.media_url, "https://media.shop.test/v1_1/demo");
    assert!(cfg.media_upload_preset.is_none());
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.request_timeout_secs, 30);
    assert_eq!(cfg.user_agent, "storefront/0.1");
    assert_eq!(
        cfg.session_path,
        std::path::PathBuf::from("./.storefront-session.json")
    );
}

#[test]
fn request_timeout_override_and_invalid() {
    let mut map = full_env();
    map.insert("STOREFRONT_REQUEST_TIMEOUT_SECS", "5");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.request_timeout_secs, 5);

    map.insert("STOREFRONT_REQUEST_TIMEOUT_SECS", "soon");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "STOREFRONT_REQUEST_TIMEOUT_SECS"),
        "expected InvalidEnvVar(STOREFRONT_REQUEST_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn empty_upload_preset_is_treated_as_absent() {
    let mut map = full_env();
    map.insert("STOREFRONT_MEDIA_UPLOAD_PRESET", "");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.media_upload_preset.is_none());

    map.insert("STOREFRONT_MEDIA_UPLOAD_PRESET", "storefront_unsigned");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.media_upload_preset.as_deref(), Some("storefront_unsigned"));
}

#[test]
fn debug_redacts_upload_preset() {
    let mut map = full_env();
    map.insert("STOREFRONT_MEDIA_UPLOAD_PRESET", "secret-preset");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let rendered = format!("{cfg:?}");
    assert!(!rendered.contains("secret-preset"));
}
