use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::api::DEFAULT_BODY_LIMIT;
use crate::storage::StorageConfig;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_STORE_TIMEOUT_MS: u64 = 5_000;
const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379/";
const DEFAULT_KEY_PREFIX: &str = "happy-thoughts";

/// Top-level application configuration loaded from file + environment.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub store: StoreSection,
    pub logging: LoggingSection,
}

impl AppConfig {
    /// Load configuration from disk and the process environment.
    pub fn load() -> Result<Self> {
        let config_path =
            env::var("HAPPY_THOUGHTS_CONFIG").unwrap_or_else(|_| "config.toml".to_string());
        let file = Some(PathBuf::from(config_path)).filter(|path| path.exists());

        Self::from_sources(file, env::vars())
    }

    /// Build configuration from an optional TOML file and a set of
    /// environment variables.
    ///
    /// Nested keys use a double underscore, e.g.
    /// `HAPPY_THOUGHTS_SERVER__BODY_LIMIT_BYTES`. The bare `PORT` and
    /// `REDIS_URL` variables are honoured as well and win over everything.
    pub fn from_sources<I>(file: Option<PathBuf>, vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let vars: config::Map<String, String> = vars.into_iter().collect();

        let mut builder = config::Config::builder();

        if let Some(path) = file {
            builder = builder.add_source(config::File::from(path));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("HAPPY_THOUGHTS")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .source(Some(vars.clone())),
        );

        let settings = builder.build()?;
        let mut config: Self = settings.try_deserialize()?;

        if let Some(port) = vars.get("PORT") {
            config.server.port = port
                .trim()
                .parse()
                .with_context(|| format!("invalid PORT value '{}'", port))?;
        }

        if let Some(url) = vars.get("REDIS_URL") {
            config.store.redis.get_or_insert_with(Default::default).url = url.clone();
        }

        if config.logging.level.trim().is_empty() {
            config.logging.level = "info".to_string();
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject values the server cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            bail!("server.port must be non-zero");
        }
        if self.server.body_limit_bytes == 0 {
            bail!("server.body_limit_bytes must be non-zero");
        }
        if self.store.timeout_ms == 0 {
            bail!("store.timeout_ms must be non-zero");
        }
        Ok(())
    }

    /// Resolve the storage backend configuration.
    pub fn storage_runtime(&self) -> Result<StorageConfig> {
        self.validate()?;
        self.store.to_runtime()
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub body_limit_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            body_limit_bytes: DEFAULT_BODY_LIMIT,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreSection {
    pub backend: StoreBackendKind,
    pub timeout_ms: u64,
    pub redis: Option<RedisStoreSection>,
}

impl StoreSection {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn to_runtime(&self) -> Result<StorageConfig> {
        match self.backend {
            StoreBackendKind::Memory => Ok(StorageConfig::Memory),
            StoreBackendKind::Redis => {
                let redis = self
                    .redis
                    .clone()
                    .context("store.redis configuration required when backend is 'redis'")?;

                if redis.url.trim().is_empty() {
                    bail!("store.redis.url must be specified");
                }
                let key_prefix = redis.key_prefix.trim();
                if key_prefix.is_empty() {
                    bail!("store.redis.key_prefix must be specified");
                }

                Ok(StorageConfig::Redis {
                    url: redis.url.trim().to_string(),
                    key_prefix: key_prefix.to_string(),
                })
            }
        }
    }
}

impl Default for StoreSection {
    fn default() -> Self {
        Self {
            backend: StoreBackendKind::Redis,
            timeout_ms: DEFAULT_STORE_TIMEOUT_MS,
            redis: Some(RedisStoreSection::default()),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackendKind {
    #[default]
    Redis,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RedisStoreSection {
    pub url: String,
    pub key_prefix: String,
}

impl Default for RedisStoreSection {
    fn default() -> Self {
        Self {
            url: DEFAULT_REDIS_URL.to_string(),
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct LoggingSection {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Json,
    Text,
}
