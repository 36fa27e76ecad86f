//! Server-side configuration, read from `/etc/likes/<name>.toml`.
//!
//! ```toml
//! listen = "127.0.0.1:8080"
//!
//! [storage]
//! data_dir = "/var/lib/likes"
//! db_path = "/fast/likes.redb"    # optional, defaults to {data_dir}/likes.redb
//!
//! [nonce]
//! secret = "change-me"
//! lifetime_secs = 86400
//!
//! [i18n]
//! locale = "de"
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context;
use likes_core::ServiceConfig;
use serde::Deserialize;

/// Directory holding named server configs.
const CONFIG_DIR: &str = "/etc/likes";

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Listen address. The `--listen` flag takes precedence.
    #[serde(default)]
    pub listen: Option<String>,

    pub storage: StorageConfig,

    pub nonce: NonceConfig,

    #[serde(default)]
    pub i18n: I18nConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub data_dir: String,

    #[serde(default)]
    pub db_path: Option<String>,
}

/// Anti-forgery token settings.
#[derive(Debug, Clone, Deserialize)]
pub struct NonceConfig {
    pub secret: String,

    #[serde(default = "default_lifetime_secs")]
    pub lifetime_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct I18nConfig {
    #[serde(default = "default_locale")]
    pub locale: String,

    /// Catalog directory. Defaults to `{data_dir}/i18n`.
    #[serde(default)]
    pub dir: Option<String>,
}

impl Default for I18nConfig {
    fn default() -> Self {
        Self {
            locale: default_locale(),
            dir: None,
        }
    }
}

fn default_lifetime_secs() -> u64 {
    86_400
}

fn default_locale() -> String {
    "en".to_string()
}

impl ServerConfig {
    /// Map a context name to its config file. Anything that looks like a
    /// path (contains `/` or `.`) is used as-is.
    pub fn resolve_path(name: &str) -> PathBuf {
        if name.contains('/') || name.contains('.') {
            PathBuf::from(name)
        } else {
            PathBuf::from(CONFIG_DIR).join(format!("{name}.toml"))
        }
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Paths and listen address for the service. `listen` overrides the
    /// configured address.
    pub fn service_config(&self, listen: Option<String>) -> ServiceConfig {
        let mut config = ServiceConfig {
            data_dir: Some(PathBuf::from(&self.storage.data_dir)),
            db_path: self.storage.db_path.as_ref().map(PathBuf::from),
            i18n_dir: self.i18n.dir.as_ref().map(PathBuf::from),
            ..Default::default()
        };
        if let Some(listen) = listen.or_else(|| self.listen.clone()) {
            config.listen = listen;
        }
        config
    }
}
