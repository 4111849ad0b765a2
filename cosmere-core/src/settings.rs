//! Creator configuration: which catalogs feed each step and which item
//! types generated records use.

use crate::finalize::{ItemTypes, DEFAULT_EXPERTISE_ITEM_TYPE, DEFAULT_SKILL_ITEM_TYPE};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;

/// Errors from loading or saving settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// World-level creator settings.
///
/// Catalog fields name a catalog understood by the configured
/// [`CatalogSource`](crate::catalog::CatalogSource); blank means "not
/// configured" and yields an empty catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreatorSettings {
    pub ancestries_catalog: String,
    pub cultures_catalog: String,
    pub heroic_paths_catalog: String,
    pub radiant_paths_catalog: String,
    pub items_catalog: String,
    pub skills_catalog: String,
    pub expertise_catalog: String,
    pub skill_item_type: String,
    pub expertise_item_type: String,
}

impl Default for CreatorSettings {
    fn default() -> Self {
        Self {
            ancestries_catalog: String::new(),
            cultures_catalog: String::new(),
            heroic_paths_catalog: String::new(),
            radiant_paths_catalog: String::new(),
            items_catalog: String::new(),
            skills_catalog: String::new(),
            expertise_catalog: String::new(),
            skill_item_type: DEFAULT_SKILL_ITEM_TYPE.to_string(),
            expertise_item_type: DEFAULT_EXPERTISE_ITEM_TYPE.to_string(),
        }
    }
}

impl CreatorSettings {
    /// Settings pointing each step at a catalog of the same name, the layout
    /// used by a plain catalog directory.
    pub fn conventional() -> Self {
        Self {
            ancestries_catalog: "ancestries".to_string(),
            cultures_catalog: "cultures".to_string(),
            heroic_paths_catalog: "heroic-paths".to_string(),
            radiant_paths_catalog: "radiant-paths".to_string(),
            items_catalog: "items".to_string(),
            skills_catalog: "skills".to_string(),
            expertise_catalog: "expertise".to_string(),
            ..Self::default()
        }
    }

    /// Skill item type, falling back to the default when blank.
    pub fn skill_item_type(&self) -> &str {
        non_blank(&self.skill_item_type, DEFAULT_SKILL_ITEM_TYPE)
    }

    /// Expertise item type, falling back to the default when blank.
    pub fn expertise_item_type(&self) -> &str {
        non_blank(&self.expertise_item_type, DEFAULT_EXPERTISE_ITEM_TYPE)
    }

    pub fn item_types(&self) -> ItemTypes {
        ItemTypes {
            skill: self.skill_item_type().to_string(),
            expertise: self.expertise_item_type().to_string(),
        }
    }

    /// Load from a JSON file. A missing file yields the defaults.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        match fs::read_to_string(path).await {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "no settings file, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Save as pretty JSON.
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).await?;
        Ok(())
    }
}

fn non_blank<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() {
        fallback
    } else {
        value.trim()
    }
}

/// Filesystem locations, taken from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatorPaths {
    pub settings: PathBuf,
    pub catalog_dir: PathBuf,
    pub character_dir: PathBuf,
}

impl Default for CreatorPaths {
    fn default() -> Self {
        Self {
            settings: PathBuf::from("cosmere-settings.json"),
            catalog_dir: PathBuf::from("catalogs"),
            character_dir: PathBuf::from("characters"),
        }
    }
}

impl CreatorPaths {
    /// Read `COSMERE_SETTINGS`, `COSMERE_CATALOG_DIR` and
    /// `COSMERE_CHARACTER_DIR`, keeping defaults for unset variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let pick = |key: &str, fallback: PathBuf| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or(fallback)
        };
        Self {
            settings: pick("COSMERE_SETTINGS", defaults.settings),
            catalog_dir: pick("COSMERE_CATALOG_DIR", defaults.catalog_dir),
            character_dir: pick("COSMERE_CHARACTER_DIR", defaults.character_dir),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_blank_item_types_fall_back() {
        let settings = CreatorSettings {
            skill_item_type: "  ".to_string(),
            expertise_item_type: String::new(),
            ..CreatorSettings::default()
        };
        assert_eq!(settings.skill_item_type(), "skill");
        assert_eq!(settings.expertise_item_type(), "expertise");
        assert_eq!(settings.item_types(), ItemTypes::default());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings: CreatorSettings =
            serde_json::from_str(r#"{"cultures_catalog": "world.cultures"}"#).expect("parse");
        assert_eq!(settings.cultures_catalog, "world.cultures");
        assert_eq!(settings.skill_item_type, "skill");
        assert!(settings.ancestries_catalog.is_empty());
    }

    #[tokio::test]
    async fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().expect("tempdir");
        let settings = CreatorSettings::load(dir.path().join("nope.json"))
            .await
            .expect("load");
        assert_eq!(settings, CreatorSettings::default());
    }

    #[tokio::test]
    async fn test_save_and_load() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("settings.json");
        let settings = CreatorSettings::conventional();
        settings.save(&path).await.expect("save");
        let loaded = CreatorSettings::load(&path).await.expect("load");
        assert_eq!(loaded, settings);
    }

    #[tokio::test]
    async fn test_malformed_file_is_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "[").expect("write");
        assert!(matches!(
            CreatorSettings::load(&path).await,
            Err(SettingsError::Json(_))
        ));
    }

    #[test]
    fn test_paths_from_lookup() {
        let env: HashMap<&str, &str> = [("COSMERE_CATALOG_DIR", "/srv/catalogs"), ("COSMERE_SETTINGS", "")]
            .into_iter()
            .collect();
        let paths = CreatorPaths::from_lookup(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(paths.catalog_dir, PathBuf::from("/srv/catalogs"));
        assert_eq!(paths.settings, PathBuf::from("cosmere-settings.json"));
        assert_eq!(paths.character_dir, PathBuf::from("characters"));
    }
}
