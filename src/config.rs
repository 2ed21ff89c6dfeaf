//! Application-level configuration: JSON file first, environment variables on top.

use std::{env, fs, io::ErrorKind, path::PathBuf, time::Duration};

use serde::Deserialize;
use tracing::{info, warn};

use crate::dao::faceit::{DEFAULT_FACEIT_BASE_URL, FaceitConfig};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "OVERLAY_HUB_CONFIG_PATH";
/// Sessions live one week unless configured otherwise.
const DEFAULT_SESSION_TTL_SECS: u64 = 7 * 24 * 60 * 60;

/// Which [`RecordStore`](crate::dao::record_store::RecordStore) backend to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Process-local maps; data is lost on restart.
    Memory,
    /// MongoDB collections.
    #[default]
    Mongo,
}

impl StoreBackend {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "memory" => Some(Self::Memory),
            "mongo" | "mongodb" => Some(Self::Mongo),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
/// HTTP listener and public URL settings.
pub struct ServerConfig {
    pub port: u16,
    /// Origin prepended to generated widget URLs, without trailing slash.
    pub public_base_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            public_base_url: "http://localhost:8080".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
/// Persistence backend settings.
pub struct StorageConfig {
    pub backend: StoreBackend,
    pub mongo_uri: Option<String>,
    pub mongo_db: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
/// FACEIT Data API settings.
pub struct FaceitSettings {
    pub base_url: String,
    pub api_key: Option<String>,
}

impl Default for FaceitSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_FACEIT_BASE_URL.into(),
            api_key: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
/// Session issuance settings.
pub struct AuthConfig {
    /// Shared secret expected in `X-Auth-Secret`; session issuance is refused when unset.
    pub secret: Option<String>,
    pub session_ttl_secs: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret: None,
            session_ttl_secs: DEFAULT_SESSION_TTL_SECS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
#[serde(default)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub faceit: FaceitSettings,
    pub auth: AuthConfig,
}

impl AppConfig {
    /// Load the configuration from disk (falling back to defaults), then apply environment overrides.
    pub fn load() -> Self {
        let mut config = Self::from_file();
        config.apply_overrides(|key| env::var(key).ok());
        info!(
            port = config.server.port,
            backend = ?config.storage.backend,
            public_base_url = %config.server.public_base_url,
            faceit_configured = config.faceit.api_key.is_some(),
            "configuration ready"
        );
        config
    }

    fn from_file() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<Self>(&contents) {
                Ok(config) => {
                    info!(path = %path.display(), "loaded configuration file");
                    config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// Overlay values found through `lookup` (normally the process environment).
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(raw) = lookup("PORT") {
            match raw.trim().parse() {
                Ok(port) => self.server.port = port,
                Err(err) => warn!(value = %raw, error = %err, "ignoring invalid PORT"),
            }
        }
        if let Some(url) = lookup("PUBLIC_BASE_URL") {
            self.server.public_base_url = url;
        }
        if let Some(raw) = lookup("STORE_BACKEND") {
            match StoreBackend::parse(&raw) {
                Some(backend) => self.storage.backend = backend,
                None => warn!(value = %raw, "ignoring unknown STORE_BACKEND"),
            }
        }
        if let Some(uri) = lookup("MONGO_URI") {
            self.storage.mongo_uri = Some(uri);
        }
        if let Some(db) = lookup("MONGO_DB") {
            self.storage.mongo_db = Some(db);
        }
        if let Some(key) = lookup("FACEIT_API_KEY") {
            self.faceit.api_key = Some(key);
        }
        if let Some(url) = lookup("FACEIT_API_BASE_URL") {
            self.faceit.base_url = url;
        }
        if let Some(secret) = lookup("AUTH_SECRET") {
            self.auth.secret = Some(secret);
        }
        if let Some(raw) = lookup("SESSION_TTL_SECS") {
            match raw.trim().parse() {
                Ok(ttl) => self.auth.session_ttl_secs = ttl,
                Err(err) => warn!(value = %raw, error = %err, "ignoring invalid SESSION_TTL_SECS"),
            }
        }

        let trimmed = self.server.public_base_url.trim_end_matches('/').len();
        self.server.public_base_url.truncate(trimmed);
    }

    /// Lifetime of an issued session token.
    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.auth.session_ttl_secs)
    }

    /// Settings handed to the FACEIT client.
    pub fn faceit_client_config(&self) -> FaceitConfig {
        FaceitConfig::new(self.faceit.base_url.clone(), self.faceit.api_key.clone())
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn partial_file_keeps_defaults_for_missing_sections() {
        let config: AppConfig = serde_json::from_str(
            r#"{"server": {"publicBaseUrl": "https://overlays.example.com"},
                "storage": {"backend": "memory"}}"#,
        )
        .unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.public_base_url, "https://overlays.example.com");
        assert_eq!(config.storage.backend, StoreBackend::Memory);
        assert_eq!(config.faceit.base_url, DEFAULT_FACEIT_BASE_URL);
        assert_eq!(config.session_ttl(), Duration::from_secs(DEFAULT_SESSION_TTL_SECS));
    }

    #[test]
    fn environment_overrides_file_values() {
        let mut config = AppConfig::default();
        config.apply_overrides(env_of(&[
            ("PORT", "9000"),
            ("PUBLIC_BASE_URL", "https://hub.example.com/"),
            ("STORE_BACKEND", "memory"),
            ("FACEIT_API_KEY", "key-123"),
            ("AUTH_SECRET", "bridge"),
            ("SESSION_TTL_SECS", "120"),
        ]));

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.public_base_url, "https://hub.example.com");
        assert_eq!(config.storage.backend, StoreBackend::Memory);
        assert_eq!(config.faceit.api_key.as_deref(), Some("key-123"));
        assert_eq!(config.auth.secret.as_deref(), Some("bridge"));
        assert_eq!(config.session_ttl(), Duration::from_secs(120));
    }

    #[test]
    fn invalid_or_blank_overrides_are_ignored() {
        let mut config = AppConfig::default();
        config.apply_overrides(env_of(&[
            ("PORT", "not-a-port"),
            ("STORE_BACKEND", "couch"),
            ("AUTH_SECRET", "  "),
        ]));

        assert_eq!(config, AppConfig::default());
    }
}
