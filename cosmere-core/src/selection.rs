//! The in-progress character build edited by the wizard.

use crate::attributes::{Attribute, AttributeSet};
use crate::catalog::{CatalogEntry, CatalogSet};
use crate::character::{CharacterId, CharacterRecord, Slot};
use crate::expertise::ExpertiseSlots;
use crate::settings::CreatorSettings;
use crate::skills::{is_default_skill, SkillAllocation};

/// Name used when the player leaves the name blank.
pub const DEFAULT_NAME: &str = "New Cosmere Hero";

/// Most cultures a character may start with.
pub const MAX_CULTURES: usize = 2;

/// The attribute that decides how many expertise slots exist.
pub const EXPERTISE_ATTRIBUTE: Attribute = Attribute::Intellect;

/// Draft state for one wizard session.
///
/// Attribute and skill edits are normalized immediately, and the expertise
/// slots are resized whenever Intellect moves, so the draft is never in an
/// invalid state.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildSelection {
    target: Option<CharacterId>,
    name: String,
    ancestry: Option<CatalogEntry>,
    cultures: Vec<CatalogEntry>,
    heroic_path: Option<CatalogEntry>,
    radiant_path: Option<CatalogEntry>,
    items: Vec<CatalogEntry>,
    attributes: AttributeSet,
    skills: SkillAllocation,
    expertise: ExpertiseSlots,
}

impl Default for BuildSelection {
    fn default() -> Self {
        Self::new(SkillAllocation::with_defaults())
    }
}

impl BuildSelection {
    /// An empty draft over the given skill list.
    pub fn new(skills: SkillAllocation) -> Self {
        Self {
            target: None,
            name: DEFAULT_NAME.to_string(),
            ancestry: None,
            cultures: Vec::new(),
            heroic_path: None,
            radiant_path: None,
            items: Vec::new(),
            attributes: AttributeSet::new(),
            skills,
            expertise: ExpertiseSlots::new(),
        }
    }

    /// An empty draft using the skills offered by `catalogs`.
    pub fn for_catalogs(catalogs: &CatalogSet) -> Self {
        Self::new(SkillAllocation::new(catalogs.skills.iter().cloned()))
    }

    /// A draft prefilled from an existing character.
    ///
    /// Name and attributes are copied (and normalized). Skill ranks come from
    /// items of the configured skill type or named after a default skill.
    /// Items the wizard created earlier restore their catalog selections and
    /// expertise texts, so reopening and saving an unchanged character is a
    /// no-op.
    pub fn from_character(
        record: &CharacterRecord,
        catalogs: &CatalogSet,
        settings: &CreatorSettings,
    ) -> Self {
        let mut selection = Self::for_catalogs(catalogs);
        selection.target = Some(record.id);
        if !record.name.trim().is_empty() {
            selection.name = record.name.clone();
        }

        selection.attributes =
            AttributeSet::from_raw(Attribute::all().map(|a| (a, record.attribute(a))));

        let skill_type = settings.skill_item_type();
        let expertise_type = settings.expertise_item_type();

        let skill_values: Vec<(&str, i32)> = record
            .items
            .iter()
            .filter(|i| i.record.kind == skill_type || is_default_skill(&i.record.name))
            .map(|i| {
                let value = i.record.rank().map_or(0, |v| v.clamp(0, i64::from(u8::MAX)) as i32);
                (i.record.name.as_str(), value)
            })
            .collect();
        selection.skills.set_many(skill_values);

        selection.sync_expertise();
        let expertise_texts = record
            .items
            .iter()
            .filter(|i| i.record.is_wizard_owned() && i.record.kind == expertise_type)
            .map(|i| i.record.name.clone());
        for (index, text) in expertise_texts.enumerate() {
            if !selection.expertise.set(index, text) {
                break;
            }
        }

        for item in &record.items {
            let Some(provenance) = item.record.provenance.as_ref().filter(|p| p.created_by) else {
                continue;
            };
            let (Some(catalog), Some(id)) = (&provenance.source_catalog, &provenance.source_id)
            else {
                continue;
            };
            selection.restore_entry(provenance.slot, catalog, id, catalogs, settings);
        }

        selection
    }

    /// Put a wizard-created catalog item back into its draft slot.
    ///
    /// Items carrying a slot go straight back to it. Older items without one
    /// are placed by catalog name, skipping single slots already filled so a
    /// catalog shared by both path slots still restores both.
    fn restore_entry(
        &mut self,
        slot: Option<Slot>,
        catalog: &str,
        id: &str,
        catalogs: &CatalogSet,
        settings: &CreatorSettings,
    ) {
        let lookup = |entries: &[CatalogEntry]| {
            entries
                .iter()
                .find(|e| e.id == id && e.source == catalog)
                .cloned()
        };

        if let Some(slot) = slot {
            let Some(entry) = lookup(catalogs.entries(slot)) else {
                tracing::debug!(catalog, id, ?slot, "stored selection no longer in catalog");
                return;
            };
            match slot {
                Slot::Ancestry => self.ancestry = Some(entry),
                Slot::Culture => {
                    self.add_culture(entry);
                }
                Slot::HeroicPath => self.heroic_path = Some(entry),
                Slot::RadiantPath => self.radiant_path = Some(entry),
                Slot::Item => {
                    self.add_item(entry);
                }
            }
            return;
        }

        if catalog == settings.ancestries_catalog && self.ancestry.is_none() {
            if let Some(entry) = lookup(&catalogs.ancestries) {
                self.ancestry = Some(entry);
                return;
            }
        }
        if catalog == settings.cultures_catalog {
            if let Some(entry) = lookup(&catalogs.cultures) {
                self.add_culture(entry);
                return;
            }
        }
        if catalog == settings.heroic_paths_catalog && self.heroic_path.is_none() {
            if let Some(entry) = lookup(&catalogs.heroic_paths) {
                self.heroic_path = Some(entry);
                return;
            }
        }
        if catalog == settings.radiant_paths_catalog && self.radiant_path.is_none() {
            if let Some(entry) = lookup(&catalogs.radiant_paths) {
                self.radiant_path = Some(entry);
                return;
            }
        }
        if catalog == settings.items_catalog {
            if let Some(entry) = lookup(&catalogs.items) {
                self.add_item(entry);
            }
        }
    }

    pub fn target(&self) -> Option<CharacterId> {
        self.target
    }

    pub fn set_target(&mut self, target: Option<CharacterId>) {
        self.target = target;
    }

    /// The name as typed, possibly blank.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The name to show and save: the typed name, or [`DEFAULT_NAME`].
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            DEFAULT_NAME
        } else {
            &self.name
        }
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn ancestry(&self) -> Option<&CatalogEntry> {
        self.ancestry.as_ref()
    }

    pub fn set_ancestry(&mut self, entry: Option<CatalogEntry>) {
        self.ancestry = entry;
    }

    pub fn cultures(&self) -> &[CatalogEntry] {
        &self.cultures
    }

    /// Select a culture.
    ///
    /// Returns whether the culture is selected afterwards. Adding a third
    /// culture is rejected and leaves the selection unchanged.
    pub fn add_culture(&mut self, entry: CatalogEntry) -> bool {
        if self.has_culture(&entry.id) {
            return true;
        }
        if self.cultures.len() >= MAX_CULTURES {
            tracing::debug!(culture = %entry.name, "culture limit reached");
            return false;
        }
        self.cultures.push(entry);
        true
    }

    pub fn remove_culture(&mut self, id: &str) -> bool {
        let before = self.cultures.len();
        self.cultures.retain(|c| c.id != id);
        self.cultures.len() != before
    }

    /// Flip a culture on or off. Returns `false` only when turning it on
    /// was rejected by the culture limit.
    pub fn toggle_culture(&mut self, entry: CatalogEntry) -> bool {
        if self.remove_culture(&entry.id) {
            true
        } else {
            self.add_culture(entry)
        }
    }

    pub fn has_culture(&self, id: &str) -> bool {
        self.cultures.iter().any(|c| c.id == id)
    }

    pub fn heroic_path(&self) -> Option<&CatalogEntry> {
        self.heroic_path.as_ref()
    }

    pub fn set_heroic_path(&mut self, entry: Option<CatalogEntry>) {
        self.heroic_path = entry;
    }

    pub fn radiant_path(&self) -> Option<&CatalogEntry> {
        self.radiant_path.as_ref()
    }

    pub fn set_radiant_path(&mut self, entry: Option<CatalogEntry>) {
        self.radiant_path = entry;
    }

    pub fn items(&self) -> &[CatalogEntry] {
        &self.items
    }

    /// Add a basic item. Returns `false` if it was already selected.
    pub fn add_item(&mut self, entry: CatalogEntry) -> bool {
        if self.has_item(&entry.id) {
            return false;
        }
        self.items.push(entry);
        true
    }

    pub fn remove_item(&mut self, id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|i| i.id != id);
        self.items.len() != before
    }

    pub fn toggle_item(&mut self, entry: CatalogEntry) {
        if !self.remove_item(&entry.id) {
            self.add_item(entry);
        }
    }

    pub fn has_item(&self, id: &str) -> bool {
        self.items.iter().any(|i| i.id == id)
    }

    pub fn attributes(&self) -> &AttributeSet {
        &self.attributes
    }

    /// Set an attribute through the enforcer and resize expertise slots.
    ///
    /// Returns the value actually held afterwards.
    pub fn set_attribute(&mut self, attribute: Attribute, value: i32) -> u8 {
        let held = self.attributes.set(attribute, value);
        self.sync_expertise();
        held
    }

    pub fn skills(&self) -> &SkillAllocation {
        &self.skills
    }

    /// Set a skill rank through the enforcer. `None` for unknown skills.
    pub fn set_skill(&mut self, name: &str, value: i32) -> Option<u8> {
        self.skills.set(name, value)
    }

    pub fn expertise(&self) -> &ExpertiseSlots {
        &self.expertise
    }

    /// Fill one expertise slot. Returns `false` if the slot does not exist.
    pub fn set_expertise(&mut self, index: usize, text: impl Into<String>) -> bool {
        self.expertise.set(index, text)
    }

    fn sync_expertise(&mut self) {
        self.expertise
            .resize(self.attributes.get(EXPERTISE_ATTRIBUTE));
    }
}
