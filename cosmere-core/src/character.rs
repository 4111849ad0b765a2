//! Stored character shape and the host-facing collaborator traits.

use crate::attributes::Attribute;
use crate::finalize::FinalizedBuild;
use crate::persist::StoreError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a stored character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CharacterId(pub Uuid);

impl CharacterId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CharacterId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CharacterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for CharacterId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

/// Unique identifier for an item embedded in a character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemId(pub Uuid);

impl ItemId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::new()
    }
}

/// The draft selection a catalog item was created for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    Ancestry,
    Culture,
    HeroicPath,
    RadiantPath,
    Item,
}

/// Marks an item as created by the wizard and records where it came from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provenance {
    pub created_by: bool,
    /// Skill and expertise items built from user input rather than a catalog.
    #[serde(default)]
    pub generated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_catalog: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
    /// Absent on records written before slots were tracked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slot: Option<Slot>,
}

impl Provenance {
    pub fn catalog(source_catalog: impl Into<String>, source_id: impl Into<String>) -> Self {
        Self {
            created_by: true,
            generated: false,
            source_catalog: Some(source_catalog.into()),
            source_id: Some(source_id.into()),
            slot: None,
        }
    }

    pub fn generated() -> Self {
        Self {
            created_by: true,
            generated: true,
            source_catalog: None,
            source_id: None,
            slot: None,
        }
    }

    pub fn with_slot(mut self, slot: Slot) -> Self {
        self.slot = Some(slot);
        self
    }
}

/// Item data to be created on a character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemRecord {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub img: Option<String>,
    /// Numeric rank for skill and expertise items. Kept as raw JSON so items
    /// from other tools load whatever they store here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
    /// Remaining catalog data, carried through untouched.
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub data: serde_json::Map<String, serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provenance: Option<Provenance>,
}

impl ItemRecord {
    /// `value` read as a whole number. Fractions are truncated; anything
    /// non-numeric reads as `None`.
    pub fn rank(&self) -> Option<i64> {
        let value = self.value.as_ref()?;
        value
            .as_i64()
            .or_else(|| value.as_u64().map(|v| i64::try_from(v).unwrap_or(i64::MAX)))
            .or_else(|| value.as_f64().map(|v| v as i64))
    }

    /// Whether the wizard created this item and may therefore replace it.
    pub fn is_wizard_owned(&self) -> bool {
        self.provenance.as_ref().is_some_and(|p| p.created_by)
    }
}

/// An item stored on a character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnedItem {
    pub id: ItemId,
    #[serde(flatten)]
    pub record: ItemRecord,
}

impl OwnedItem {
    pub fn new(record: ItemRecord) -> Self {
        Self {
            id: ItemId::new(),
            record,
        }
    }
}

/// A stored character as seen by the wizard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterRecord {
    pub id: CharacterId,
    pub name: String,
    #[serde(default = "default_actor_kind", rename = "type")]
    pub kind: String,
    /// Attribute values keyed by [`Attribute::key`]. Stored raw; the wizard
    /// normalizes them on prefill.
    #[serde(default)]
    pub attributes: BTreeMap<String, i32>,
    #[serde(default)]
    pub items: Vec<OwnedItem>,
    /// Fields the wizard does not manage, preserved across updates.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

fn default_actor_kind() -> String {
    "character".to_string()
}

impl CharacterRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: CharacterId::new(),
            name: name.into(),
            kind: default_actor_kind(),
            attributes: BTreeMap::new(),
            items: Vec::new(),
            extra: serde_json::Map::new(),
        }
    }

    pub fn attribute(&self, attribute: Attribute) -> i32 {
        self.attributes.get(attribute.key()).copied().unwrap_or(0)
    }

    pub fn item(&self, id: ItemId) -> Option<&OwnedItem> {
        self.items.iter().find(|i| i.id == id)
    }

    /// Apply a finalized build in place: identity update, retractions, then
    /// new items. Items outside the retract list are left untouched.
    pub fn apply(&mut self, build: &FinalizedBuild) {
        self.name = build.identity.name.clone();
        for (attribute, value) in &build.identity.attributes {
            self.attributes
                .insert(attribute.key().to_string(), i32::from(*value));
        }
        self.items.retain(|i| !build.retract.contains(&i.id));
        self.items
            .extend(build.create.iter().cloned().map(OwnedItem::new));
    }
}

/// Reads existing characters for prefill and deduplication.
#[async_trait]
pub trait CharacterReader: Send + Sync {
    async fn read(&self, id: CharacterId) -> Result<Option<CharacterRecord>, StoreError>;
}

/// Applies a finalized build to storage.
///
/// Implementations should apply the identity update, the retract list and
/// the create list as one unit so a failure cannot leave a half-built
/// character behind.
#[async_trait]
pub trait PersistenceApplier: Send + Sync {
    async fn apply(&self, build: &FinalizedBuild) -> Result<CharacterId, StoreError>;
}
