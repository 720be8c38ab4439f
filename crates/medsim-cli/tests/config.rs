use std::collections::HashMap;

use medsim_cli::config::{
    API_PREFIX_ENV, BACKEND_URL_ENV, ClientConfig, load_from, load_or_init_at, save_to,
};

#[test]
fn first_run_writes_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("com.medsim.cli").join("config.json");

    let config = load_or_init_at(&path).unwrap();

    assert!(path.exists());
    assert_eq!(config.backend_url, "http://localhost:8001");
    assert_eq!(config.api_prefix, "/api");
    assert_eq!(config.request_timeout_secs, 120);
    assert_eq!(load_from(&path).unwrap(), config);
}

#[test]
fn save_then_load_keeps_fields() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    let config = ClientConfig {
        backend_url: "https://sim.example.org".to_string(),
        color: false,
        request_timeout_secs: 30,
        ..ClientConfig::new()
    };

    save_to(&path, &config).unwrap();
    let loaded = load_from(&path).unwrap();

    assert_eq!(loaded, config);
    assert!(!path.with_extension("json.tmp").exists());
}

#[cfg(unix)]
#[test]
fn saved_config_is_private() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    save_to(&path, &ClientConfig::new()).unwrap();

    let mode = std::fs::metadata(&path).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}

#[test]
fn pre_versioned_config_is_migrated() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(
        &path,
        r#"{ "backend_url": "http://10.0.0.5:8001", "created_at": "2025-01-10T09:00:00Z" }"#,
    )
    .unwrap();

    let config = load_from(&path).unwrap();

    assert_eq!(config.config_version, 1);
    assert_eq!(config.backend_url, "http://10.0.0.5:8001");
    assert_eq!(config.api_prefix, "/api");
    assert_eq!(config.request_timeout_secs, 120);
    assert!(config.color);
}

#[test]
fn newer_config_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{ "config_version": 99 }"#).unwrap();

    let err = load_from(&path).unwrap_err();
    assert!(err.to_string().contains("newer than this build supports"));
}

#[test]
fn environment_overrides_apply() {
    let env: HashMap<&str, &str> = [
        (BACKEND_URL_ENV, "https://staging.example.org"),
        (API_PREFIX_ENV, "  "),
    ]
    .into_iter()
    .collect();

    let config =
        ClientConfig::new().with_env_overrides(|key| env.get(key).map(|v| v.to_string()));

    assert_eq!(config.backend_url, "https://staging.example.org");
    // Blank values are ignored.
    assert_eq!(config.api_prefix, "/api");

    let settings = config.api_settings();
    assert_eq!(settings.base_url, "https://staging.example.org");
    assert_eq!(settings.timeout.as_secs(), 120);
}
