//! Reference catalogs: ancestries, cultures, paths, items and skills.
//!
//! Catalog data is owned by whoever implements [`CatalogSource`]. The rest of
//! the crate only sees resolved [`CatalogEntry`] lists, and a catalog that
//! cannot be loaded is simply empty.

use crate::character::Slot;
use crate::settings::CreatorSettings;
use crate::skills::DEFAULT_SKILLS;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Tag that marks heroic path entries in mixed catalogs.
pub const PATH_TAG: &str = "path";

/// A read-only entry from a catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: String,
    pub name: String,
    /// Entry type as declared by the catalog (e.g. "ancestry", "path").
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub img: Option<String>,
    /// Identifier of the catalog this entry was loaded from.
    #[serde(default)]
    pub source: String,
    /// Everything else the catalog carries, copied verbatim into created items.
    #[serde(flatten)]
    pub fields: serde_json::Map<String, serde_json::Value>,
}

impl CatalogEntry {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: String::new(),
            tags: Vec::new(),
            img: None,
            source: String::new(),
            fields: serde_json::Map::new(),
        }
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    pub fn with_field(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.fields.insert(key.into(), value);
        self
    }

    /// Whether the entry's type, its tags or its `system.tags` carry `tag`.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.kind.eq_ignore_ascii_case(tag)
            || self.tags.iter().any(|t| t == tag)
            || self.system_tags().any(|t| t == tag)
    }

    fn system_tags(&self) -> impl Iterator<Item = &str> {
        self.fields
            .get("system")
            .and_then(|system| system.get("tags"))
            .and_then(serde_json::Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(serde_json::Value::as_str)
    }
}

/// Keep entries tagged with `tag`, or all entries if none are tagged.
///
/// An empty filtered result means the catalog does not use the tag at all,
/// so the full list is returned instead of nothing.
pub fn filter_by_tag(entries: &[CatalogEntry], tag: &str) -> Vec<CatalogEntry> {
    let matching: Vec<CatalogEntry> = entries
        .iter()
        .filter(|e| e.has_tag(tag))
        .cloned()
        .collect();

    if matching.is_empty() {
        entries.to_vec()
    } else {
        matching
    }
}

/// Find an entry by id.
pub fn find<'a>(entries: &'a [CatalogEntry], id: &str) -> Option<&'a CatalogEntry> {
    entries.iter().find(|e| e.id == id)
}

/// Something that can produce catalog entries by catalog id.
///
/// Implementations must not fail: an unknown, blank or broken catalog yields
/// an empty list.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn load(&self, catalog: &str) -> Vec<CatalogEntry>;
}

#[async_trait]
impl<T: CatalogSource + ?Sized> CatalogSource for Arc<T> {
    async fn load(&self, catalog: &str) -> Vec<CatalogEntry> {
        (**self).load(catalog).await
    }
}

/// Catalogs stored as `<dir>/<catalog>.json`, each a JSON array of entries.
#[derive(Debug, Clone)]
pub struct JsonCatalogDir {
    root: PathBuf,
}

impl JsonCatalogDir {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn path_for(&self, catalog: &str) -> PathBuf {
        self.root.join(format!("{catalog}.json"))
    }
}

#[async_trait]
impl CatalogSource for JsonCatalogDir {
    async fn load(&self, catalog: &str) -> Vec<CatalogEntry> {
        let catalog = catalog.trim();
        if catalog.is_empty() {
            return Vec::new();
        }

        let path = self.path_for(catalog);
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!(catalog, path = %path.display(), error = %e, "failed to read catalog");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<CatalogEntry>>(&content) {
            Ok(mut entries) => {
                for entry in &mut entries {
                    entry.source = catalog.to_string();
                }
                tracing::debug!(catalog, count = entries.len(), "loaded catalog");
                entries
            }
            Err(e) => {
                tracing::warn!(catalog, path = %path.display(), error = %e, "failed to parse catalog");
                Vec::new()
            }
        }
    }
}

/// Memoizes another source by catalog id.
///
/// Empty results are not cached, so a catalog that was missing can appear
/// on a later load.
pub struct CachedCatalog<S> {
    inner: S,
    cache: Mutex<HashMap<String, Vec<CatalogEntry>>>,
}

impl<S: CatalogSource> CachedCatalog<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Drop every cached catalog.
    pub async fn clear(&self) {
        self.cache.lock().await.clear();
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

#[async_trait]
impl<S: CatalogSource> CatalogSource for CachedCatalog<S> {
    async fn load(&self, catalog: &str) -> Vec<CatalogEntry> {
        if let Some(hit) = self.cache.lock().await.get(catalog) {
            return hit.clone();
        }

        let entries = self.inner.load(catalog).await;
        if !entries.is_empty() {
            self.cache
                .lock()
                .await
                .insert(catalog.to_string(), entries.clone());
        }
        entries
    }
}

/// Every catalog the wizard offers, resolved up front.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogSet {
    pub ancestries: Vec<CatalogEntry>,
    pub cultures: Vec<CatalogEntry>,
    pub heroic_paths: Vec<CatalogEntry>,
    pub radiant_paths: Vec<CatalogEntry>,
    pub items: Vec<CatalogEntry>,
    /// Skill names in display order.
    pub skills: Vec<String>,
}

impl CatalogSet {
    /// Load all catalogs named in `settings`.
    ///
    /// Heroic paths go through [`filter_by_tag`] with [`PATH_TAG`]. An empty
    /// skills catalog falls back to [`DEFAULT_SKILLS`].
    pub async fn load<S: CatalogSource + ?Sized>(source: &S, settings: &CreatorSettings) -> Self {
        let (ancestries, cultures, heroic, radiant_paths, items, skill_entries) = tokio::join!(
            source.load(&settings.ancestries_catalog),
            source.load(&settings.cultures_catalog),
            source.load(&settings.heroic_paths_catalog),
            source.load(&settings.radiant_paths_catalog),
            source.load(&settings.items_catalog),
            source.load(&settings.skills_catalog),
        );

        let skills = if skill_entries.is_empty() {
            DEFAULT_SKILLS.iter().map(|s| s.to_string()).collect()
        } else {
            skill_entries.into_iter().map(|e| e.name).collect()
        };

        Self {
            ancestries,
            cultures,
            heroic_paths: filter_by_tag(&heroic, PATH_TAG),
            radiant_paths,
            items,
            skills,
        }
    }

    /// The entries offered for `slot`.
    pub fn entries(&self, slot: Slot) -> &[CatalogEntry] {
        match slot {
            Slot::Ancestry => &self.ancestries,
            Slot::Culture => &self.cultures,
            Slot::HeroicPath => &self.heroic_paths,
            Slot::RadiantPath => &self.radiant_paths,
            Slot::Item => &self.items,
        }
    }
}
