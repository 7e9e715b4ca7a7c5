//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (HATENA_*)
//! 2. TOML config file (if HATENA_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::blog::UnknownDraftPolicy;

mod validation;

pub use validation::ConfigError;

/// Default Hatena Blog AtomPub host.
pub const DEFAULT_BASE_URL: &str = "https://blog.hatena.ne.jp";

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (HATENA_*)
/// 2. TOML config file (if HATENA_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Hatena account ID, also the Basic auth user name.
    ///
    /// Set via HATENA_ID environment variable.
    #[serde(default)]
    pub hatena_id: Option<String>,

    /// Blog domain, e.g. `example.hatenablog.com`.
    ///
    /// Set via HATENA_BLOG_ID environment variable.
    #[serde(default)]
    pub blog_id: Option<String>,

    /// AtomPub API key from the blog's advanced settings.
    ///
    /// Set via HATENA_API_KEY environment variable.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Directory holding one JSON file per cached entry.
    ///
    /// Set via HATENA_CACHE_DIR environment variable.
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,

    /// Days a cached entry stays fresh.
    ///
    /// Set via HATENA_CACHE_TTL_DAYS environment variable.
    #[serde(default = "default_cache_ttl_days")]
    pub cache_ttl_days: i64,

    /// AtomPub base URL.
    ///
    /// Set via HATENA_BASE_URL environment variable.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// User-Agent string for HTTP requests.
    ///
    /// Set via HATENA_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// HTTP request timeout in milliseconds.
    ///
    /// Set via HATENA_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// How listings treat entries whose draft status is not cached.
    ///
    /// Set via HATENA_UNKNOWN_DRAFT_POLICY environment variable (`published` or `draft`).
    #[serde(default)]
    pub unknown_draft_policy: UnknownDraftPolicy,

    /// Run a full sync at startup when the cache is empty.
    ///
    /// Set via HATENA_SYNC_ON_STARTUP environment variable.
    #[serde(default = "default_true")]
    pub sync_on_startup: bool,
}

/// Borrowed AtomPub credentials, all present and non-empty.
#[derive(Debug, Clone, Copy)]
pub struct Credentials<'a> {
    pub hatena_id: &'a str,
    pub blog_id: &'a str,
    pub api_key: &'a str,
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from("./.hatena-blog-cache")
}

fn default_cache_ttl_days() -> i64 {
    365
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.into()
}

fn default_user_agent() -> String {
    "mcp-hatena-blog/0.1".into()
}

fn default_timeout_ms() -> u64 {
    20_000
}

fn default_true() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            hatena_id: None,
            blog_id: None,
            api_key: None,
            cache_dir: default_cache_dir(),
            cache_ttl_days: default_cache_ttl_days(),
            base_url: default_base_url(),
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
            unknown_draft_policy: UnknownDraftPolicy::default(),
            sync_on_startup: true,
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Cache freshness window.
    pub fn cache_ttl(&self) -> chrono::Duration {
        chrono::Duration::days(self.cache_ttl_days)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `HATENA_` (`HATENA_ID` maps to `hatena_id`)
    /// 2. TOML file from `HATENA_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(Self::figment())
    }

    /// Build the layered figment without extracting it.
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("HATENA_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment.merge(
            Env::prefixed("HATENA_")
                .map(|key| {
                    let key = key.as_str().to_lowercase();
                    if key == "id" { "hatena_id".to_string().into() } else { key.into() }
                })
                .split("__"),
        )
    }

    fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// Check that all three AtomPub credentials are available (for deferred validation).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` naming the first absent or empty credential.
    pub fn require_credentials(&self) -> Result<Credentials<'_>, ConfigError> {
        fn present<'a>(value: &'a Option<String>, field: &str, var: &str) -> Result<&'a str, ConfigError> {
            value
                .as_deref()
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| ConfigError::Missing { field: field.into(), hint: format!("Set {var} environment variable") })
        }

        Ok(Credentials {
            hatena_id: present(&self.hatena_id, "hatena_id", "HATENA_ID")?,
            blog_id: present(&self.blog_id, "blog_id", "HATENA_BLOG_ID")?,
            api_key: present(&self.api_key, "api_key", "HATENA_API_KEY")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.cache_dir, PathBuf::from("./.hatena-blog-cache"));
        assert_eq!(config.cache_ttl_days, 365);
        assert_eq!(config.base_url, "https://blog.hatena.ne.jp");
        assert_eq!(config.user_agent, "mcp-hatena-blog/0.1");
        assert_eq!(config.timeout_ms, 20_000);
        assert_eq!(config.unknown_draft_policy, UnknownDraftPolicy::Published);
        assert!(config.sync_on_startup);
        assert!(config.hatena_id.is_none());
        assert!(config.blog_id.is_none());
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_timeout_duration() {
        let config = AppConfig::default();
        assert_eq!(config.timeout(), Duration::from_millis(20_000));
        assert_eq!(config.cache_ttl(), chrono::Duration::days(365));
    }

    #[test]
    fn test_require_credentials_missing() {
        let config = AppConfig { hatena_id: Some("alice".into()), ..Default::default() };
        let result = config.require_credentials();
        assert!(matches!(result, Err(ConfigError::Missing { field, .. }) if field == "blog_id"));
    }

    #[test]
    fn test_require_credentials_empty_counts_as_missing() {
        let config = AppConfig {
            hatena_id: Some("alice".into()),
            blog_id: Some("alice.hatenablog.com".into()),
            api_key: Some("  ".into()),
            ..Default::default()
        };
        let result = config.require_credentials();
        assert!(matches!(result, Err(ConfigError::Missing { field, .. }) if field == "api_key"));
    }

    #[test]
    fn test_require_credentials_present() {
        let config = AppConfig {
            hatena_id: Some("alice".into()),
            blog_id: Some("alice.hatenablog.com".into()),
            api_key: Some("secret".into()),
            ..Default::default()
        };
        let creds = config.require_credentials().unwrap();
        assert_eq!(creds.hatena_id, "alice");
        assert_eq!(creds.blog_id, "alice.hatenablog.com");
        assert_eq!(creds.api_key, "secret");
    }

    #[test]
    fn test_load_from_env() {
        Jail::expect_with(|jail| {
            jail.set_env("HATENA_ID", "alice");
            jail.set_env("HATENA_BLOG_ID", "alice.hatenablog.com");
            jail.set_env("HATENA_API_KEY", "secret");
            jail.set_env("HATENA_UNKNOWN_DRAFT_POLICY", "draft");
            jail.set_env("HATENA_CACHE_TTL_DAYS", "30");

            let config = AppConfig::load().map_err(|e| e.to_string())?;
            assert_eq!(config.hatena_id.as_deref(), Some("alice"));
            assert_eq!(config.blog_id.as_deref(), Some("alice.hatenablog.com"));
            assert_eq!(config.api_key.as_deref(), Some("secret"));
            assert_eq!(config.unknown_draft_policy, UnknownDraftPolicy::Draft);
            assert_eq!(config.cache_ttl_days, 30);
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_toml_file() {
        Jail::expect_with(|jail| {
            jail.create_file("hatena.toml", "blog_id = \"from-file\"\ntimeout_ms = 5000\n")?;
            jail.set_env("HATENA_CONFIG_FILE", "hatena.toml");
            jail.set_env("HATENA_BLOG_ID", "from-env");

            let config = AppConfig::load().map_err(|e| e.to_string())?;
            assert_eq!(config.blog_id.as_deref(), Some("from-env"));
            assert_eq!(config.timeout_ms, 5000);
            Ok(())
        });
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        Jail::expect_with(|jail| {
            jail.set_env("HATENA_TIMEOUT_MS", "10");
            assert!(matches!(AppConfig::load(), Err(ConfigError::Invalid { .. })));
            Ok(())
        });
    }
}
