//! File-backed character storage.
//!
//! Each character lives in `<dir>/<id>.json`. Writes go to a temporary file
//! that is renamed over the original, so applying a build either lands
//! completely or not at all.

use crate::character::{CharacterId, CharacterReader, CharacterRecord, PersistenceApplier};
use crate::finalize::FinalizedBuild;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tokio::sync::Mutex;

/// Errors from character storage.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Character not found: {0}")]
    NotFound(CharacterId),
}

/// Short listing entry for a stored character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterSummary {
    pub id: CharacterId,
    pub name: String,
    pub item_count: usize,
}

/// Characters stored as JSON files in one directory.
pub struct JsonCharacterStore {
    root: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonCharacterStore {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path_for(&self, id: CharacterId) -> PathBuf {
        self.root.join(format!("{id}.json"))
    }

    /// Load a character, if it exists.
    pub async fn load(&self, id: CharacterId) -> Result<Option<CharacterRecord>, StoreError> {
        match fs::read_to_string(self.path_for(id)).await {
            Ok(content) => Ok(Some(serde_json::from_str(&content)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Write a character atomically.
    pub async fn save(&self, record: &CharacterRecord) -> Result<(), StoreError> {
        fs::create_dir_all(&self.root).await?;
        let content = serde_json::to_string_pretty(record)?;
        let path = self.path_for(record.id);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, content).await?;
        fs::rename(&tmp, &path).await?;
        tracing::debug!(id = %record.id, path = %path.display(), "saved character");
        Ok(())
    }

    /// List every stored character, sorted by name.
    ///
    /// Unreadable files are skipped with a warning.
    pub async fn list(&self) -> Result<Vec<CharacterSummary>, StoreError> {
        let mut summaries = Vec::new();
        let mut dir = match fs::read_dir(&self.root).await {
            Ok(d) => d,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(summaries),
            Err(e) => return Err(e.into()),
        };

        while let Some(entry) = dir.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let parsed = match fs::read_to_string(&path).await {
                Ok(content) => serde_json::from_str::<CharacterRecord>(&content).map_err(StoreError::from),
                Err(e) => Err(StoreError::from(e)),
            };
            match parsed {
                Ok(record) => summaries.push(CharacterSummary {
                    id: record.id,
                    name: record.name,
                    item_count: record.items.len(),
                }),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping unreadable character");
                }
            }
        }

        summaries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(summaries)
    }
}

#[async_trait]
impl CharacterReader for JsonCharacterStore {
    async fn read(&self, id: CharacterId) -> Result<Option<CharacterRecord>, StoreError> {
        self.load(id).await
    }
}

#[async_trait]
impl PersistenceApplier for JsonCharacterStore {
    async fn apply(&self, build: &FinalizedBuild) -> Result<CharacterId, StoreError> {
        let _guard = self.write_lock.lock().await;

        let mut record = match build.identity.target {
            Some(id) => self.load(id).await?.ok_or(StoreError::NotFound(id))?,
            None => CharacterRecord::new(build.identity.name.clone()),
        };
        record.apply(build);
        self.save(&record).await?;

        tracing::info!(
            id = %record.id,
            name = %record.name,
            created = build.create.len(),
            retracted = build.retract.len(),
            "applied build"
        );
        Ok(record.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::Attribute;
    use crate::finalize::{finalize, ItemTypes};
    use crate::selection::BuildSelection;

    #[tokio::test]
    async fn test_apply_creates_then_updates() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = JsonCharacterStore::new(dir.path().join("characters"));

        let mut selection = BuildSelection::default();
        selection.set_name("Navani");
        selection.set_attribute(Attribute::Intellect, 3);
        selection.set_skill("Crafting", 2);

        let build = finalize(&selection, None, &ItemTypes::default());
        let id = store.apply(&build).await.expect("apply");

        let stored = store.read(id).await.expect("read").expect("exists");
        assert_eq!(stored.name, "Navani");
        assert_eq!(stored.attribute(Attribute::Intellect), 3);
        assert_eq!(stored.items.len(), 1);

        selection.set_name("Navani Kholin");
        let update = finalize(&selection, Some(&stored), &ItemTypes::default());
        assert!(update.is_item_noop());
        let same = store.apply(&update).await.expect("apply update");
        assert_eq!(same, id);

        let stored = store.read(id).await.expect("read").expect("exists");
        assert_eq!(stored.name, "Navani Kholin");
        assert_eq!(stored.items.len(), 1);
    }

    #[tokio::test]
    async fn test_apply_missing_target_fails() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = JsonCharacterStore::new(dir.path());

        let mut selection = BuildSelection::default();
        let missing = CharacterId::new();
        selection.set_target(Some(missing));
        let build = finalize(&selection, None, &ItemTypes::default());

        assert!(matches!(
            store.apply(&build).await,
            Err(StoreError::NotFound(id)) if id == missing
        ));
    }

    #[tokio::test]
    async fn test_list_skips_garbage() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = JsonCharacterStore::new(dir.path());
        assert!(store.list().await.expect("list").is_empty());

        store
            .save(&CharacterRecord::new("Szeth"))
            .await
            .expect("save");
        store
            .save(&CharacterRecord::new("Adolin"))
            .await
            .expect("save");
        std::fs::write(dir.path().join("broken.json"), "{").expect("write");

        let names: Vec<String> = store
            .list()
            .await
            .expect("list")
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["Adolin".to_string(), "Szeth".to_string()]);
    }

    #[tokio::test]
    async fn test_missing_character_reads_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = JsonCharacterStore::new(dir.path());
        assert!(store.read(CharacterId::new()).await.expect("read").is_none());
    }
}
