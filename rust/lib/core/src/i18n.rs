//! I18nStore: synchronous, text-domain based string translation.
//!
//! Each module owns a text domain (`"likes"`) and registers one handler for
//! it. Lookups are by source string, like gettext msgids:
//!
//! ```ignore
//! let i18n = I18nStore::new("de");
//! i18n.handle("likes", Arc::new(catalog));
//! assert_eq!(i18n.translate("likes", "Like"), "Gefällt mir");
//! assert_eq!(i18n.translate("likes", "Unknown"), "Unknown");
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, warn};

use crate::ServiceError;

/// Locale every catalog falls back to.
pub const FALLBACK_LOCALE: &str = "en";

// ── I18nHandler trait ──

/// A translation handler for one text domain.
///
/// Returns `None` when it has no translation, in which case the store
/// returns the source text unchanged.
pub trait I18nHandler: Send + Sync + 'static {
    fn translate(&self, text: &str, locale: &str) -> Option<String>;
}

/// Convenience: closures implement I18nHandler.
impl<F> I18nHandler for F
where
    F: Fn(&str, &str) -> Option<String> + Send + Sync + 'static,
{
    fn translate(&self, text: &str, locale: &str) -> Option<String> {
        (self)(text, locale)
    }
}

// ── StaticCatalog ──

/// Table-driven handler: locale → {source text → translation}.
///
/// On disk a catalog is a TOML file with one table per locale:
///
/// ```toml
/// [de]
/// "Like" = "Gefällt mir"
/// "All Likes" = "Alle Likes"
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    locales: HashMap<String, HashMap<String, String>>,
}

impl StaticCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace one translation.
    pub fn insert(&mut self, locale: &str, text: &str, translation: &str) {
        self.locales
            .entry(locale.to_string())
            .or_default()
            .insert(text.to_string(), translation.to_string());
    }

    /// Parse a catalog from TOML source.
    pub fn from_toml(source: &str) -> Result<Self, ServiceError> {
        let locales: HashMap<String, HashMap<String, String>> = toml::from_str(source)
            .map_err(|e| ServiceError::Config(format!("invalid catalog: {e}")))?;
        Ok(Self { locales })
    }

    /// Number of locales with at least one entry.
    pub fn locale_count(&self) -> usize {
        self.locales.len()
    }
}

impl I18nHandler for StaticCatalog {
    fn translate(&self, text: &str, locale: &str) -> Option<String> {
        self.locales
            .get(locale)
            .and_then(|m| m.get(text))
            .or_else(|| self.locales.get(FALLBACK_LOCALE).and_then(|m| m.get(text)))
            .cloned()
    }
}

// ── I18nStore ──

/// Translation store keyed by text domain.
pub struct I18nStore {
    domains: RwLock<HashMap<String, Arc<dyn I18nHandler>>>,
    locale: RwLock<String>,
}

impl I18nStore {
    /// Create a new store with the given locale and no catalogs.
    pub fn new(locale: &str) -> Self {
        Self {
            domains: RwLock::new(HashMap::new()),
            locale: RwLock::new(locale.to_string()),
        }
    }

    /// Register the handler for a text domain, replacing any previous one.
    pub fn handle(&self, domain: &str, handler: Arc<dyn I18nHandler>) {
        self.domains
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(domain.to_string(), handler);
    }

    /// Translate `text` within `domain` for the current locale.
    ///
    /// Unknown domains and missing entries return `text` as-is.
    pub fn translate(&self, domain: &str, text: &str) -> String {
        let handler = {
            let domains = self.domains.read().unwrap_or_else(PoisonError::into_inner);
            domains.get(domain).cloned()
        };
        let locale = self.locale();
        handler
            .and_then(|h| h.translate(text, &locale))
            .unwrap_or_else(|| text.to_string())
    }

    /// Load every `{domain}.toml` file in `dir` as a [`StaticCatalog`].
    ///
    /// A missing directory is not an error. Returns the number of domains
    /// loaded.
    pub fn load_dir(&self, dir: &Path) -> Result<usize, ServiceError> {
        if !dir.is_dir() {
            debug!("i18n: catalog dir {:?} does not exist, skipping", dir);
            return Ok(0);
        }

        let entries = fs::read_dir(dir).map_err(|e| ServiceError::Config(e.to_string()))?;
        let mut count = 0;
        for entry in entries {
            let path = entry.map_err(|e| ServiceError::Config(e.to_string()))?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("toml") {
                continue;
            }
            let Some(domain) = path.file_stem().and_then(|s| s.to_str()) else {
                warn!("i18n: skipping catalog with non-UTF-8 name {:?}", path);
                continue;
            };
            let source =
                fs::read_to_string(&path).map_err(|e| ServiceError::Config(e.to_string()))?;
            let catalog = StaticCatalog::from_toml(&source)?;
            debug!(domain, locales = catalog.locale_count(), "i18n: loaded catalog");
            self.handle(domain, Arc::new(catalog));
            count += 1;
        }
        Ok(count)
    }

    /// Set the current locale.
    pub fn set_locale(&self, locale: &str) {
        *self.locale.write().unwrap_or_else(PoisonError::into_inner) = locale.to_string();
    }

    /// Get the current locale.
    pub fn locale(&self) -> String {
        self.locale.read().unwrap_or_else(PoisonError::into_inner).clone()
    }
}
