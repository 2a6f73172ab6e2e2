use std::time::Duration;

use anyhow::{bail, Context, Result};

pub const DEFAULT_PUBLIC_BASE_URL: &str = "https://fastcv.com/r";

/// Where the session blobs are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    Redis { url: String },
}

/// Application configuration loaded from environment variables.
/// Startup fails if a variable is present but malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub storage: StorageBackend,
    /// Prefix of shareable résumé links; the résumé id is appended.
    pub public_base_url: String,
    /// Path or name of the `wkhtmltoimage` executable.
    pub rasterizer_bin: String,
    /// Simulated round-trip of the in-memory account directory.
    pub auth_latency: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let storage = match lookup("STORAGE_BACKEND").as_deref().unwrap_or("memory") {
            "memory" => StorageBackend::Memory,
            "redis" => StorageBackend::Redis {
                url: lookup("REDIS_URL")
                    .context("Required environment variable 'REDIS_URL' is not set")?,
            },
            other => bail!("STORAGE_BACKEND must be 'memory' or 'redis', got '{other}'"),
        };

        Ok(Config {
            port: lookup("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            storage,
            public_base_url: lookup("PUBLIC_BASE_URL")
                .unwrap_or_else(|| DEFAULT_PUBLIC_BASE_URL.to_string()),
            rasterizer_bin: lookup("RASTERIZER_BIN").unwrap_or_else(|| "wkhtmltoimage".to_string()),
            auth_latency: Duration::from_millis(
                lookup("AUTH_LATENCY_MS")
                    .unwrap_or_else(|| "1000".to_string())
                    .parse::<u64>()
                    .context("AUTH_LATENCY_MS must be a whole number of milliseconds")?,
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.storage, StorageBackend::Memory);
        assert_eq!(config.public_base_url, "https://fastcv.com/r");
        assert_eq!(config.rasterizer_bin, "wkhtmltoimage");
        assert_eq!(config.auth_latency, Duration::from_millis(1000));
    }

    #[test]
    fn test_redis_backend_requires_url() {
        let err = config_from(&[("STORAGE_BACKEND", "redis")]).unwrap_err();
        assert!(err.to_string().contains("REDIS_URL"));

        let config = config_from(&[
            ("STORAGE_BACKEND", "redis"),
            ("REDIS_URL", "redis://localhost:6379"),
        ])
        .unwrap();
        assert_eq!(
            config.storage,
            StorageBackend::Redis {
                url: "redis://localhost:6379".to_string()
            }
        );
    }

    #[test]
    fn test_unknown_backend_is_rejected() {
        assert!(config_from(&[("STORAGE_BACKEND", "sqlite")]).is_err());
    }

    #[test]
    fn test_malformed_numbers_are_rejected() {
        assert!(config_from(&[("PORT", "http")]).is_err());
        assert!(config_from(&[("AUTH_LATENCY_MS", "-5")]).is_err());
    }
}
