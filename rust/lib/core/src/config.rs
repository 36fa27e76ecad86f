use std::path::PathBuf;

/// Storage and listener configuration shared by the service binary and its
/// modules.
///
/// The binary fills this in from its config file; modules only ask it for
/// resolved paths.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Root directory for everything the service persists.
    pub data_dir: Option<PathBuf>,

    /// Path to the redb database file.
    /// Defaults to `{data_dir}/likes.redb` if not specified.
    pub db_path: Option<PathBuf>,

    /// Directory holding `{domain}.toml` translation catalogs.
    /// Defaults to `{data_dir}/i18n` if not specified.
    pub i18n_dir: Option<PathBuf>,

    /// Listen address for the HTTP server.
    pub listen: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            db_path: None,
            i18n_dir: None,
            listen: "0.0.0.0:8080".to_string(),
        }
    }
}

impl ServiceConfig {
    /// Resolve the redb database path, falling back to `{data_dir}/likes.redb`.
    pub fn resolve_db_path(&self) -> PathBuf {
        self.db_path
            .clone()
            .unwrap_or_else(|| self.resolve_data_subpath("likes.redb"))
    }

    /// Resolve the translations directory, falling back to `{data_dir}/i18n`.
    pub fn resolve_i18n_dir(&self) -> PathBuf {
        self.i18n_dir
            .clone()
            .unwrap_or_else(|| self.resolve_data_subpath("i18n"))
    }

    fn resolve_data_subpath(&self, name: &str) -> PathBuf {
        self.data_dir
            .as_ref()
            .map(|d| d.join(name))
            .unwrap_or_else(|| PathBuf::from(name))
    }
}
