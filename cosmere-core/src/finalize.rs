//! Turning a draft into the records a persistence layer must write.
//!
//! [`finalize`] is pure. It compares the items the draft calls for with the
//! wizard-created items already on the character and emits only the
//! difference: records to create and item ids to retract. Items the wizard
//! did not create are never touched.

use crate::attributes::Attribute;
use crate::catalog::CatalogEntry;
use crate::character::{CharacterId, CharacterRecord, ItemId, ItemRecord, Provenance, Slot};
use crate::selection::BuildSelection;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};

/// Default item type for generated skill records.
pub const DEFAULT_SKILL_ITEM_TYPE: &str = "skill";

/// Default item type for generated expertise records.
pub const DEFAULT_EXPERTISE_ITEM_TYPE: &str = "expertise";

const SKILL_ICON: &str = "icons/svg/book.svg";
const EXPERTISE_ICON: &str = "icons/svg/target.svg";

/// Item types used for generated records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemTypes {
    pub skill: String,
    pub expertise: String,
}

impl Default for ItemTypes {
    fn default() -> Self {
        Self {
            skill: DEFAULT_SKILL_ITEM_TYPE.to_string(),
            expertise: DEFAULT_EXPERTISE_ITEM_TYPE.to_string(),
        }
    }
}

/// Core identity written to the character itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityUpdate {
    /// Existing character to update, or `None` to create one.
    pub target: Option<CharacterId>,
    pub name: String,
    pub attributes: Vec<(Attribute, u8)>,
}

/// The complete write plan for one submit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalizedBuild {
    pub identity: IdentityUpdate,
    /// Records to add to the character.
    pub create: Vec<ItemRecord>,
    /// Wizard-created items no longer called for.
    pub retract: Vec<ItemId>,
    /// Wizard-created items that already match and stay as they are.
    pub keep: Vec<ItemId>,
}

impl FinalizedBuild {
    /// Whether applying this build changes no items.
    pub fn is_item_noop(&self) -> bool {
        self.create.is_empty() && self.retract.is_empty()
    }
}

/// Identity used to match a computed record with a stored one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum RecordKey {
    Catalog {
        slot: Option<Slot>,
        catalog: String,
        id: String,
    },
    Generated {
        kind: String,
        name: String,
        value: Option<i64>,
    },
}

impl RecordKey {
    fn of(record: &ItemRecord) -> Option<RecordKey> {
        let provenance = record.provenance.as_ref().filter(|p| p.created_by)?;
        match (&provenance.source_catalog, &provenance.source_id) {
            (Some(catalog), Some(id)) if !provenance.generated => Some(RecordKey::Catalog {
                slot: provenance.slot,
                catalog: catalog.clone(),
                id: id.clone(),
            }),
            _ => Some(RecordKey::Generated {
                kind: record.kind.clone(),
                name: record.name.clone(),
                value: record.rank(),
            }),
        }
    }

    /// The same catalog key as written before slots were recorded.
    fn without_slot(&self) -> Option<RecordKey> {
        match self {
            RecordKey::Catalog {
                slot: Some(_),
                catalog,
                id,
            } => Some(RecordKey::Catalog {
                slot: None,
                catalog: catalog.clone(),
                id: id.clone(),
            }),
            _ => None,
        }
    }
}

fn catalog_record(entry: &CatalogEntry, slot: Slot) -> ItemRecord {
    ItemRecord {
        name: entry.name.clone(),
        kind: entry.kind.clone(),
        img: entry.img.clone(),
        value: None,
        data: entry.fields.clone(),
        provenance: Some(Provenance::catalog(&entry.source, &entry.id).with_slot(slot)),
    }
}

fn generated_record(name: &str, kind: &str, icon: &str, value: u8) -> ItemRecord {
    ItemRecord {
        name: name.to_string(),
        kind: kind.to_string(),
        img: Some(icon.to_string()),
        value: Some(serde_json::Value::from(value)),
        data: serde_json::Map::new(),
        provenance: Some(Provenance::generated()),
    }
}

/// Every item record the draft calls for, in creation order.
///
/// Catalog selections come first (ancestry, cultures, heroic path, radiant
/// path, items), then one record per trained skill, then one per filled
/// expertise slot. Entries without a source catalog are skipped since they
/// could never be matched again.
pub fn desired_records(selection: &BuildSelection, types: &ItemTypes) -> Vec<ItemRecord> {
    let mut catalog_entries: Vec<(Slot, &CatalogEntry)> = Vec::new();
    catalog_entries.extend(selection.ancestry().map(|e| (Slot::Ancestry, e)));
    catalog_entries.extend(selection.cultures().iter().map(|e| (Slot::Culture, e)));
    catalog_entries.extend(selection.heroic_path().map(|e| (Slot::HeroicPath, e)));
    catalog_entries.extend(selection.radiant_path().map(|e| (Slot::RadiantPath, e)));
    catalog_entries.extend(selection.items().iter().map(|e| (Slot::Item, e)));

    let mut records = Vec::new();
    for (slot, entry) in catalog_entries {
        if entry.source.is_empty() {
            tracing::warn!(entry = %entry.name, "skipping catalog entry without a source catalog");
            continue;
        }
        records.push(catalog_record(entry, slot));
    }

    for rank in selection.skills().trained() {
        records.push(generated_record(
            &rank.name,
            &types.skill,
            SKILL_ICON,
            rank.value,
        ));
    }

    for text in selection.expertise().filled() {
        records.push(generated_record(text, &types.expertise, EXPERTISE_ICON, 1));
    }

    records
}

/// Compute the write plan for `selection` against the character's prior state.
///
/// Records already present on `prior` (matched by provenance, one for one)
/// are kept rather than recreated. Wizard-created items on `prior` that the
/// draft no longer calls for are retracted.
pub fn finalize(
    selection: &BuildSelection,
    prior: Option<&CharacterRecord>,
    types: &ItemTypes,
) -> FinalizedBuild {
    let identity = IdentityUpdate {
        target: prior.map(|p| p.id).or(selection.target()),
        name: selection.display_name().to_string(),
        attributes: selection.attributes().values().to_vec(),
    };

    let mut available: HashMap<RecordKey, VecDeque<ItemId>> = HashMap::new();
    if let Some(prior) = prior {
        for item in &prior.items {
            if let Some(key) = RecordKey::of(&item.record) {
                available.entry(key).or_default().push_back(item.id);
            }
        }
    }

    let mut create = Vec::new();
    let mut keep = Vec::new();
    for record in desired_records(selection, types) {
        let matched = RecordKey::of(&record).and_then(|key| {
            let legacy = key.without_slot();
            available
                .get_mut(&key)
                .and_then(|ids| ids.pop_front())
                .or_else(|| legacy.and_then(|k| available.get_mut(&k)?.pop_front()))
        });
        match matched {
            Some(id) => keep.push(id),
            None => create.push(record),
        }
    }

    let kept: HashSet<ItemId> = keep.iter().copied().collect();
    let retract: Vec<ItemId> = prior
        .map(|p| {
            p.items
                .iter()
                .filter(|i| i.record.is_wizard_owned() && !kept.contains(&i.id))
                .map(|i| i.id)
                .collect()
        })
        .unwrap_or_default();

    tracing::debug!(
        name = %identity.name,
        create = create.len(),
        retract = retract.len(),
        keep = keep.len(),
        "finalized build"
    );

    FinalizedBuild {
        identity,
        create,
        retract,
        keep,
    }
}
