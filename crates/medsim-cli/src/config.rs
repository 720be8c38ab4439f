use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use medsim_api::http::ApiSettings;

/// Current config version. Bump this when adding fields or changing shape.
/// Each bump requires a corresponding entry in [`migrate`].
const CURRENT_VERSION: u32 = 1;

pub const BACKEND_URL_ENV: &str = "MEDSIM_BACKEND_URL";
pub const API_PREFIX_ENV: &str = "MEDSIM_API_PREFIX";

const DEFAULT_BACKEND_URL: &str = "http://localhost:8001";
const DEFAULT_API_PREFIX: &str = "/api";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Schema version. Missing or 0 = pre-versioned config.
    #[serde(default)]
    pub config_version: u32,
    pub backend_url: String,
    /// Added in v1.
    pub api_prefix: String,
    /// Added in v1. Case generation can take well over a minute.
    pub request_timeout_secs: u64,
    /// Added in v1.
    pub color: bool,
    pub created_at: jiff::Timestamp,
}

impl ClientConfig {
    pub fn new() -> Self {
        Self {
            config_version: CURRENT_VERSION,
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            api_prefix: DEFAULT_API_PREFIX.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            color: true,
            created_at: jiff::Timestamp::now(),
        }
    }

    /// Apply `MEDSIM_BACKEND_URL` / `MEDSIM_API_PREFIX` as seen through
    /// `lookup`. Blank values are ignored. Overrides are never saved.
    pub fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = non_blank(BACKEND_URL_ENV) {
            tracing::debug!(%url, "backend URL overridden from environment");
            self.backend_url = url;
        }
        if let Some(prefix) = non_blank(API_PREFIX_ENV) {
            tracing::debug!(%prefix, "API prefix overridden from environment");
            self.api_prefix = prefix;
        }
        self
    }

    pub fn api_settings(&self) -> ApiSettings {
        ApiSettings {
            base_url: self.backend_url.clone(),
            api_prefix: self.api_prefix.clone(),
            timeout: Duration::from_secs(self.request_timeout_secs.max(1)),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn config_dir() -> eyre::Result<PathBuf> {
    let base = dirs::config_dir().ok_or_else(|| eyre::eyre!("no config directory found"))?;
    Ok(base.join("com.medsim.cli"))
}

pub fn config_path() -> eyre::Result<PathBuf> {
    Ok(config_dir()?.join("config.json"))
}

/// Load the user's config, writing defaults on first run.
pub fn load_or_init() -> eyre::Result<ClientConfig> {
    let path = config_path()?;
    load_or_init_at(&path)
}

pub fn load_or_init_at(path: &Path) -> eyre::Result<ClientConfig> {
    if path.exists() {
        return load_from(path);
    }
    let config = ClientConfig::new();
    save_to(path, &config)?;
    tracing::info!(path = %path.display(), "wrote default config");
    Ok(config)
}

pub fn load_from(path: &Path) -> eyre::Result<ClientConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("failed to read config at {}: {e}", path.display()))?;

    // Parse as raw JSON so we can run migrations before deserializing.
    let json: serde_json::Value = serde_json::from_str(&contents)?;
    let on_disk_version = json
        .get("config_version")
        .and_then(|v| v.as_u64())
        .unwrap_or(0) as u32;

    let migrated = migrate(json, on_disk_version)?;
    let config: ClientConfig = serde_json::from_value(migrated)?;
    Ok(config)
}

/// Run sequential migrations from `from_version` up to [`CURRENT_VERSION`].
///
/// Each migration is a pure transform on the raw JSON value.
fn migrate(mut json: serde_json::Value, from_version: u32) -> eyre::Result<serde_json::Value> {
    if from_version > CURRENT_VERSION {
        return Err(eyre::eyre!(
            "config_version {from_version} is newer than this build supports ({CURRENT_VERSION}). \
             Please update medsim."
        ));
    }

    // v0 → v1: the first configs held only backend_url and created_at.
    if from_version < 1 {
        let obj = json
            .as_object_mut()
            .ok_or_else(|| eyre::eyre!("config is not a JSON object"))?;
        obj.entry("backend_url")
            .or_insert(serde_json::Value::String(DEFAULT_BACKEND_URL.to_string()));
        obj.entry("api_prefix")
            .or_insert(serde_json::Value::String(DEFAULT_API_PREFIX.to_string()));
        obj.entry("request_timeout_secs")
            .or_insert(serde_json::Value::Number(DEFAULT_TIMEOUT_SECS.into()));
        obj.entry("color").or_insert(serde_json::Value::Bool(true));
        obj.entry("created_at")
            .or_insert(serde_json::Value::String(jiff::Timestamp::now().to_string()));
        obj.insert(
            "config_version".to_string(),
            serde_json::Value::Number(1.into()),
        );
        tracing::info!("migrated config v0 → v1 (added api_prefix, request_timeout_secs, color)");
    }

    Ok(json)
}

pub fn save_to(path: &Path, config: &ClientConfig) -> eyre::Result<()> {
    let dir = path
        .parent()
        .ok_or_else(|| eyre::eyre!("config path {} has no parent", path.display()))?;
    std::fs::create_dir_all(dir)?;

    // Always write the current version, regardless of what was loaded.
    let mut stamped = config.clone();
    stamped.config_version = CURRENT_VERSION;

    let json = serde_json::to_string_pretty(&stamped)?;

    // Write to a temp file then rename for atomicity
    let tmp_path = path.with_extension("json.tmp");
    std::fs::write(&tmp_path, json.as_bytes())?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&tmp_path, std::fs::Permissions::from_mode(0o600))?;
    }

    std::fs::rename(&tmp_path, path)?;

    tracing::info!(path = %path.display(), "config saved");
    Ok(())
}
