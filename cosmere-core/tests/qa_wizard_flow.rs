//! QA tests for the full creation flow: catalogs in, draft edits, preview,
//! submit, reopen and resubmit.

use cosmere_core::testing::{
    sample_catalog, sample_character, sample_settings, MemoryCatalog, MemoryCharacterStore,
};
use cosmere_core::{
    catalog, finalize, Attribute, CachedCatalog, CatalogEntry, CharacterReader, CreatorSettings,
    JsonCatalogDir, JsonCharacterStore, PersistenceApplier, Wizard, WizardStep,
};
use tempfile::TempDir;

// =============================================================================
// Catalog loading
// =============================================================================

#[tokio::test]
async fn test_catalogs_load_with_path_filter_and_default_skills() {
    let store = MemoryCharacterStore::new();
    let wizard = Wizard::open(&sample_catalog(), &store, sample_settings(), None)
        .await
        .expect("open wizard");

    let heroic: Vec<&str> = wizard
        .catalogs
        .heroic_paths
        .iter()
        .map(|e| e.name.as_str())
        .collect();
    assert_eq!(heroic, vec!["Agent", "Warrior"]);
    assert_eq!(wizard.catalogs.cultures.len(), 3);
    assert_eq!(wizard.catalogs.skills.len(), 18);
    assert_eq!(wizard.step(), WizardStep::Name);
}

// =============================================================================
// Draft editing and preview
// =============================================================================

#[tokio::test]
async fn test_build_a_character_step_by_step() {
    let store = MemoryCharacterStore::new();
    let mut wizard = Wizard::open(&sample_catalog(), &store, sample_settings(), None)
        .await
        .expect("open wizard");

    wizard.selection.set_name("Kaladin");
    wizard.next_step();

    let human = catalog::find(&wizard.catalogs.ancestries, "human").cloned();
    wizard.selection.set_ancestry(human);
    wizard.next_step();

    let cultures = wizard.catalogs.cultures.clone();
    assert!(wizard.selection.add_culture(cultures[0].clone()));
    assert!(wizard.selection.add_culture(cultures[1].clone()));
    assert!(!wizard.selection.add_culture(cultures[2].clone()));
    wizard.next_step();

    let warrior = catalog::find(&wizard.catalogs.heroic_paths, "warrior").cloned();
    let windrunner = catalog::find(&wizard.catalogs.radiant_paths, "windrunner").cloned();
    wizard.selection.set_heroic_path(warrior);
    wizard.selection.set_radiant_path(windrunner);
    wizard.next_step();

    for attribute in Attribute::all() {
        wizard.selection.set_attribute(attribute, 3);
    }
    wizard.selection.set_attribute(Attribute::Intellect, 2);
    wizard.next_step();

    wizard.selection.set_skill("Athletics", 2);
    wizard.selection.set_skill("Heavy Weaponry", 2);
    wizard.selection.set_skill("Medicine", 2);
    wizard.next_step();

    wizard.selection.set_expertise(0, "Spears");
    wizard.selection.set_expertise(1, "  ");
    wizard.next_step();

    let spear = catalog::find(&wizard.catalogs.items, "spear").cloned();
    if let Some(spear) = spear {
        wizard.selection.add_item(spear);
    }
    assert_eq!(wizard.next_step(), WizardStep::Review);

    let snap = wizard.snapshot();
    assert_eq!(snap.name, "Kaladin");
    assert_eq!(snap.ancestry, "Human");
    assert_eq!(snap.cultures, "Alethi, Veden");
    assert_eq!(snap.heroic_path, "Warrior");
    assert_eq!(snap.radiant_path, "Windrunner");
    assert_eq!(snap.attribute(Attribute::Strength), 3);
    assert_eq!(snap.attribute(Attribute::Speed), 3);
    assert_eq!(snap.attribute(Attribute::Intellect), 2);
    assert_eq!(snap.attribute(Attribute::Willpower), 3);
    assert_eq!(snap.attribute_points_remaining, 1);
    // Medicine came last and the pool was already spent
    let skills: Vec<(&str, u8)> = snap.skills.iter().map(|s| (s.name.as_str(), s.value)).collect();
    assert_eq!(skills, vec![("Athletics", 2), ("Heavy Weaponry", 2)]);
    assert_eq!(snap.expertise, vec!["Spears".to_string()]);
    assert_eq!(snap.items, vec!["Spear".to_string()]);
}

// =============================================================================
// Submit and resubmit
// =============================================================================

#[tokio::test]
async fn test_submit_then_resubmit_is_noop() {
    let store = MemoryCharacterStore::new();
    let mut wizard = Wizard::open(&sample_catalog(), &store, sample_settings(), None)
        .await
        .expect("open wizard");

    wizard.selection.set_name("Shallan");
    let lightweaver = catalog::find(&wizard.catalogs.radiant_paths, "lightweaver").cloned();
    wizard.selection.set_radiant_path(lightweaver);
    wizard.selection.set_attribute(Attribute::Intellect, 1);
    wizard.selection.set_expertise(0, "Sketching");
    wizard.selection.set_skill("Deception", 2);

    let first = wizard.submit(&store, &store).await.expect("first submit");
    assert!(first.identity.target.is_none());
    assert_eq!(first.create.len(), 3);

    let second = wizard.submit(&store, &store).await.expect("second submit");
    assert!(second.identity.target.is_some());
    assert!(second.retract.is_empty());
    assert!(second.create.is_empty());
    assert_eq!(second.keep.len(), 3);

    let id = second.identity.target.expect("target");
    let stored = store.get(id).await.expect("stored");
    assert_eq!(stored.items.len(), 3);
    assert_eq!(store.applied().await.len(), 2);
}

#[tokio::test]
async fn test_reopen_existing_character_and_edit() {
    let store = MemoryCharacterStore::new();
    let character = sample_character("Adolin");
    let id = character.id;
    store.insert(character).await;

    // First pass builds the character
    let mut wizard = Wizard::open(&sample_catalog(), &store, sample_settings(), Some(id))
        .await
        .expect("open wizard");
    assert_eq!(wizard.selection.name(), "Adolin");
    let alethi = catalog::find(&wizard.catalogs.cultures, "alethi").cloned();
    if let Some(alethi) = alethi {
        wizard.selection.add_culture(alethi);
    }
    wizard.selection.set_skill("Light Weaponry", 2);
    wizard.submit(&store, &store).await.expect("submit");

    // Reopening restores the same draft, so saving again changes nothing
    let mut reopened = Wizard::open(&sample_catalog(), &store, sample_settings(), Some(id))
        .await
        .expect("reopen");
    assert!(reopened.selection.has_culture("alethi"));
    assert_eq!(reopened.selection.skills().get("Light Weaponry"), Some(2));
    let unchanged = reopened.submit(&store, &store).await.expect("resubmit");
    assert!(unchanged.is_item_noop());

    // Swapping a culture retracts only that item; the heirloom survives
    reopened.selection.remove_culture("alethi");
    let veden = catalog::find(&reopened.catalogs.cultures, "veden").cloned();
    if let Some(veden) = veden {
        reopened.selection.add_culture(veden);
    }
    let swap = reopened.submit(&store, &store).await.expect("swap submit");
    assert_eq!(swap.retract.len(), 1);
    assert_eq!(swap.create.len(), 1);

    let stored = store.get(id).await.expect("stored");
    let names: Vec<&str> = stored.items.iter().map(|i| i.record.name.as_str()).collect();
    assert!(names.contains(&"Family Heirloom"));
    assert!(names.contains(&"Veden"));
    assert!(!names.contains(&"Alethi"));
}

#[tokio::test]
async fn test_reopen_with_one_catalog_for_both_paths() {
    let paths = MemoryCatalog::new().with_catalog(
        "paths",
        vec![
            CatalogEntry::new("agent", "Agent").with_kind("path"),
            CatalogEntry::new("windrunner", "Windrunner").with_kind("path"),
            CatalogEntry::new("shard-training", "Shard Training").with_kind("talent"),
        ],
    );
    let settings = CreatorSettings {
        heroic_paths_catalog: "paths".to_string(),
        radiant_paths_catalog: "paths".to_string(),
        ..sample_settings()
    };
    let store = MemoryCharacterStore::new();

    let mut wizard = Wizard::open(&paths, &store, settings.clone(), None)
        .await
        .expect("open wizard");
    let agent = catalog::find(&wizard.catalogs.heroic_paths, "agent").cloned();
    let windrunner = catalog::find(&wizard.catalogs.radiant_paths, "windrunner").cloned();
    wizard.selection.set_heroic_path(agent);
    wizard.selection.set_radiant_path(windrunner);
    let first = wizard.submit(&store, &store).await.expect("submit");
    assert_eq!(first.create.len(), 2);
    let id = wizard.selection.target().expect("target");

    let mut reopened = Wizard::open(&paths, &store, settings, Some(id))
        .await
        .expect("reopen");
    let heroic = reopened.selection.heroic_path().map(|e| e.id.as_str());
    let radiant = reopened.selection.radiant_path().map(|e| e.id.as_str());
    assert_eq!(heroic, Some("agent"));
    assert_eq!(radiant, Some("windrunner"));

    let again = reopened.submit(&store, &store).await.expect("resubmit");
    assert!(again.is_item_noop());
    assert_eq!(again.keep.len(), 2);
}

#[tokio::test]
async fn test_open_missing_character_fails() {
    let store = MemoryCharacterStore::new();
    let missing = cosmere_core::CharacterId::new();
    let result = Wizard::open(&sample_catalog(), &store, sample_settings(), Some(missing)).await;
    assert!(matches!(result, Err(cosmere_core::StoreError::NotFound(id)) if id == missing));
}

// =============================================================================
// File-backed collaborators
// =============================================================================

#[tokio::test]
async fn test_file_backed_round_trip() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let catalog_dir = temp_dir.path().join("catalogs");
    std::fs::create_dir_all(&catalog_dir).expect("create catalog dir");
    std::fs::write(
        catalog_dir.join("ancestries.json"),
        r#"[{"id": "human", "name": "Human", "type": "ancestry", "system": {"size": "medium"}}]"#,
    )
    .expect("write ancestries");
    std::fs::write(
        catalog_dir.join("skills.json"),
        r#"[{"id": "s1", "name": "Stealth"}, {"id": "s2", "name": "Lore"}]"#,
    )
    .expect("write skills");

    let source = CachedCatalog::new(JsonCatalogDir::new(&catalog_dir));
    let store = JsonCharacterStore::new(temp_dir.path().join("characters"));

    let mut wizard = Wizard::open(&source, &store, sample_settings(), None)
        .await
        .expect("open wizard");
    assert_eq!(wizard.catalogs.skills, vec!["Stealth".to_string(), "Lore".to_string()]);
    assert!(wizard.catalogs.cultures.is_empty());

    let human = catalog::find(&wizard.catalogs.ancestries, "human").cloned();
    wizard.selection.set_ancestry(human);
    wizard.selection.set_skill("Lore", 2);
    let build = wizard.submit(&store, &store).await.expect("submit");
    assert_eq!(build.create.len(), 2);

    let id = wizard.selection.target().expect("target after submit");
    let stored = store.read(id).await.expect("read").expect("exists");
    let human_item = stored
        .items
        .iter()
        .find(|i| i.record.name == "Human")
        .expect("human item");
    assert_eq!(human_item.record.data["system"]["size"], "medium");

    // Re-finalizing against the stored state is a no-op
    let again = finalize(&wizard.selection, Some(&stored), &wizard.settings.item_types());
    assert!(again.is_item_noop());
    store.apply(&again).await.expect("apply no-op");
}
