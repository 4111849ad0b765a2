//! Testing utilities for the creator.
//!
//! This module provides in-memory collaborators for integration tests:
//! - `MemoryCatalog` serving fixed catalogs without touching disk
//! - `MemoryCharacterStore` recording applied builds
//! - Sample catalogs and settings describing a small Roshar setup

use crate::catalog::{CatalogEntry, CatalogSource};
use crate::character::{CharacterId, CharacterReader, CharacterRecord, PersistenceApplier};
use crate::finalize::FinalizedBuild;
use crate::persist::StoreError;
use crate::settings::CreatorSettings;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;

/// A catalog source backed by a map.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    catalogs: HashMap<String, Vec<CatalogEntry>>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a catalog. Entries are stamped with `name` as their source.
    pub fn with_catalog(mut self, name: &str, entries: Vec<CatalogEntry>) -> Self {
        let entries = entries
            .into_iter()
            .map(|e| e.with_source(name))
            .collect();
        self.catalogs.insert(name.to_string(), entries);
        self
    }
}

#[async_trait]
impl CatalogSource for MemoryCatalog {
    async fn load(&self, catalog: &str) -> Vec<CatalogEntry> {
        self.catalogs.get(catalog).cloned().unwrap_or_default()
    }
}

/// A character store held in memory.
#[derive(Default)]
pub struct MemoryCharacterStore {
    characters: Mutex<HashMap<CharacterId, CharacterRecord>>,
    applied: Mutex<Vec<FinalizedBuild>>,
}

impl MemoryCharacterStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, record: CharacterRecord) {
        self.characters.lock().await.insert(record.id, record);
    }

    pub async fn get(&self, id: CharacterId) -> Option<CharacterRecord> {
        self.characters.lock().await.get(&id).cloned()
    }

    /// Every build applied so far, oldest first.
    pub async fn applied(&self) -> Vec<FinalizedBuild> {
        self.applied.lock().await.clone()
    }
}

#[async_trait]
impl CharacterReader for MemoryCharacterStore {
    async fn read(&self, id: CharacterId) -> Result<Option<CharacterRecord>, StoreError> {
        Ok(self.get(id).await)
    }
}

#[async_trait]
impl PersistenceApplier for MemoryCharacterStore {
    async fn apply(&self, build: &FinalizedBuild) -> Result<CharacterId, StoreError> {
        let mut characters = self.characters.lock().await;
        let mut record = match build.identity.target {
            Some(id) => characters.get(&id).cloned().ok_or(StoreError::NotFound(id))?,
            None => CharacterRecord::new(build.identity.name.clone()),
        };
        record.apply(build);
        let id = record.id;
        characters.insert(id, record);
        self.applied.lock().await.push(build.clone());
        Ok(id)
    }
}

/// Settings matching [`sample_catalog`].
pub fn sample_settings() -> CreatorSettings {
    CreatorSettings::conventional()
}

/// A small catalog set: two ancestries, three cultures, a mixed heroic path
/// catalog, two radiant orders and a few items. The skills catalog is left
/// out so the default skill list applies.
pub fn sample_catalog() -> MemoryCatalog {
    MemoryCatalog::new()
        .with_catalog(
            "ancestries",
            vec![
                CatalogEntry::new("human", "Human").with_kind("ancestry"),
                CatalogEntry::new("singer", "Singer").with_kind("ancestry"),
            ],
        )
        .with_catalog(
            "cultures",
            vec![
                CatalogEntry::new("alethi", "Alethi").with_kind("culture"),
                CatalogEntry::new("veden", "Veden").with_kind("culture"),
                CatalogEntry::new("thaylen", "Thaylen").with_kind("culture"),
            ],
        )
        .with_catalog(
            "heroic-paths",
            vec![
                CatalogEntry::new("agent", "Agent").with_kind("path"),
                CatalogEntry::new("warrior", "Warrior").with_kind("path"),
                CatalogEntry::new("shard-training", "Shard Training").with_kind("talent"),
            ],
        )
        .with_catalog(
            "radiant-paths",
            vec![
                CatalogEntry::new("windrunner", "Windrunner").with_kind("path"),
                CatalogEntry::new("lightweaver", "Lightweaver").with_kind("path"),
            ],
        )
        .with_catalog(
            "items",
            vec![
                CatalogEntry::new("spear", "Spear")
                    .with_kind("weapon")
                    .with_field("system", serde_json::json!({"damage": "1d8"})),
                CatalogEntry::new("knife", "Knife").with_kind("weapon"),
                CatalogEntry::new("spheres", "Pouch of Spheres").with_kind("loot"),
            ],
        )
}

/// A stored character carrying one item the wizard did not create.
pub fn sample_character(name: &str) -> CharacterRecord {
    use crate::character::{ItemRecord, OwnedItem};

    let mut record = CharacterRecord::new(name);
    record.items.push(OwnedItem::new(ItemRecord {
        name: "Family Heirloom".to_string(),
        kind: "loot".to_string(),
        img: None,
        value: None,
        data: serde_json::Map::new(),
        provenance: None,
    }));
    record
}
