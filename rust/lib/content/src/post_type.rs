//! Record type registry.
//!
//! Modules declare the record types they own, with display labels and the
//! capabilities the host should expose for them (public pages, REST, an
//! archive listing under a stable rewrite slug, an editing meta box).

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use serde::Serialize;

use crate::record::Record;

/// Human-readable labels for a record type.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostTypeLabels {
    pub name: String,
    pub singular_name: String,
    pub add_new_item: String,
    pub view_item: String,
    pub view_items: String,
    pub all_items: String,
    pub search_items: String,
    pub not_found: String,
    pub not_found_in_trash: String,
}

/// Renders the editing panel for one record as an HTML fragment.
pub type MetaBoxRender = Arc<dyn Fn(&Record) -> String + Send + Sync>;

/// A custom metadata-entry panel shown on the record edit screen.
#[derive(Clone)]
pub struct MetaBox {
    pub id: String,
    pub title: String,
    pub render: MetaBoxRender,
}

impl std::fmt::Debug for MetaBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetaBox")
            .field("id", &self.id)
            .field("title", &self.title)
            .finish_non_exhaustive()
    }
}

/// Declared capabilities of a record type.
#[derive(Debug, Clone)]
pub struct PostTypeDefinition {
    pub name: String,
    pub labels: PostTypeLabels,
    pub public: bool,
    pub show_in_rest: bool,
    pub has_archive: bool,
    /// Base path for archive and single pages. Part of the public URL
    /// contract: changing it breaks existing links.
    pub rewrite_slug: String,
    pub menu_position: u32,
    pub menu_icon: String,
    /// Default editing widgets (title, editor, ...). Empty means none.
    pub supports: Vec<String>,
    pub meta_box: Option<MetaBox>,
}

/// Registry of record types, keyed by name.
#[derive(Default)]
pub struct PostTypeRegistry {
    types: RwLock<HashMap<String, Arc<PostTypeDefinition>>>,
}

impl PostTypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) a record type.
    pub fn register(&self, definition: PostTypeDefinition) {
        self.types
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(definition.name.clone(), Arc::new(definition));
    }

    pub fn get(&self, name: &str) -> Option<Arc<PostTypeDefinition>> {
        self.types
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    /// Look a type up by its rewrite slug.
    pub fn by_rewrite_slug(&self, slug: &str) -> Option<Arc<PostTypeDefinition>> {
        self.types
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .find(|t| t.rewrite_slug == slug)
            .cloned()
    }

    /// Registered type names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .types
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }
}
