//! Cosmere RPG character creation core.
//!
//! This crate provides:
//! - Point-budget enforcement for attributes and skills
//! - A draft model for the creation wizard with derived expertise slots
//! - Preview snapshots and a provenance-aware finalizer
//! - File-backed reference collaborators for catalogs, characters and settings
//!
//! # Quick Start
//!
//! ```ignore
//! use cosmere_core::{Attribute, JsonCatalogDir, JsonCharacterStore, Wizard, CreatorSettings};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let catalogs = JsonCatalogDir::new("catalogs");
//!     let store = JsonCharacterStore::new("characters");
//!
//!     let mut wizard = Wizard::open(&catalogs, &store, CreatorSettings::conventional(), None).await?;
//!     wizard.selection.set_name("Kaladin");
//!     wizard.selection.set_attribute(Attribute::Strength, 3);
//!
//!     println!("{:?}", wizard.snapshot());
//!     wizard.submit(&store, &store).await?;
//!     Ok(())
//! }
//! ```

pub mod allocation;
pub mod attributes;
pub mod catalog;
pub mod character;
pub mod expertise;
pub mod finalize;
pub mod persist;
pub mod selection;
pub mod settings;
pub mod skills;
pub mod snapshot;
pub mod testing;
pub mod wizard;

// Primary public API
pub use allocation::{enforce, Allocation, PointPool, ATTRIBUTE_POOL, SKILL_POOL};
pub use attributes::{Attribute, AttributeSet};
pub use catalog::{
    filter_by_tag, CachedCatalog, CatalogEntry, CatalogSet, CatalogSource, JsonCatalogDir,
};
pub use character::{
    CharacterId, CharacterReader, CharacterRecord, ItemId, ItemRecord, PersistenceApplier, Slot,
};
pub use finalize::{finalize, FinalizedBuild, ItemTypes};
pub use persist::{JsonCharacterStore, StoreError};
pub use selection::{BuildSelection, DEFAULT_NAME};
pub use settings::{CreatorPaths, CreatorSettings, SettingsError};
pub use skills::SkillAllocation;
pub use snapshot::{snapshot, BuildSnapshot};
pub use wizard::{Wizard, WizardStep};
