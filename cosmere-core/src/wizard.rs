//! Step navigation and the session that ties catalogs, draft and storage
//! together.

use crate::catalog::{CatalogSet, CatalogSource};
use crate::character::{CharacterId, CharacterReader, PersistenceApplier};
use crate::finalize::{finalize, FinalizedBuild};
use crate::persist::StoreError;
use crate::selection::BuildSelection;
use crate::settings::CreatorSettings;
use crate::snapshot::{snapshot, BuildSnapshot};

/// Steps in character creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WizardStep {
    Name,
    Ancestry,
    Culture,
    Paths,
    Attributes,
    Skills,
    Expertise,
    Items,
    Review,
}

impl WizardStep {
    pub fn all() -> [WizardStep; 9] {
        [
            WizardStep::Name,
            WizardStep::Ancestry,
            WizardStep::Culture,
            WizardStep::Paths,
            WizardStep::Attributes,
            WizardStep::Skills,
            WizardStep::Expertise,
            WizardStep::Items,
            WizardStep::Review,
        ]
    }

    pub fn title(&self) -> &'static str {
        match self {
            WizardStep::Name => "Name Your Hero",
            WizardStep::Ancestry => "Choose Ancestry",
            WizardStep::Culture => "Choose Cultures",
            WizardStep::Paths => "Choose Paths",
            WizardStep::Attributes => "Assign Attributes",
            WizardStep::Skills => "Train Skills",
            WizardStep::Expertise => "Record Expertise",
            WizardStep::Items => "Pick Starting Items",
            WizardStep::Review => "Review Character",
        }
    }

    pub fn index(&self) -> usize {
        Self::all()
            .iter()
            .position(|s| s == self)
            .unwrap_or_default()
    }

    pub fn next(&self) -> Option<WizardStep> {
        Self::all().get(self.index() + 1).copied()
    }

    pub fn prev(&self) -> Option<WizardStep> {
        self.index().checked_sub(1).map(|i| Self::all()[i])
    }

    /// "Step n / last", counting from zero like the step list.
    pub fn indicator(&self) -> String {
        format!("Step {} / {}", self.index(), Self::all().len() - 1)
    }
}

/// One wizard session: resolved catalogs, the draft, and the current step.
#[derive(Debug, Clone)]
pub struct Wizard {
    pub catalogs: CatalogSet,
    pub selection: BuildSelection,
    pub settings: CreatorSettings,
    step: WizardStep,
}

impl Wizard {
    pub fn new(catalogs: CatalogSet, settings: CreatorSettings) -> Self {
        let selection = BuildSelection::for_catalogs(&catalogs);
        Self {
            catalogs,
            selection,
            settings,
            step: WizardStep::Name,
        }
    }

    /// Load catalogs and, when `character` is given, prefill from it.
    pub async fn open<S, R>(
        source: &S,
        reader: &R,
        settings: CreatorSettings,
        character: Option<CharacterId>,
    ) -> Result<Self, StoreError>
    where
        S: CatalogSource + ?Sized,
        R: CharacterReader + ?Sized,
    {
        let catalogs = CatalogSet::load(source, &settings).await;
        let mut wizard = Self::new(catalogs, settings);

        if let Some(id) = character {
            let record = reader.read(id).await?.ok_or(StoreError::NotFound(id))?;
            wizard.selection =
                BuildSelection::from_character(&record, &wizard.catalogs, &wizard.settings);
        }
        Ok(wizard)
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn go_to(&mut self, step: WizardStep) {
        self.step = step;
    }

    /// Advance one step. Stays on the last step.
    pub fn next_step(&mut self) -> WizardStep {
        if let Some(next) = self.step.next() {
            self.step = next;
        }
        self.step
    }

    /// Go back one step. Stays on the first step.
    pub fn prev_step(&mut self) -> WizardStep {
        if let Some(prev) = self.step.prev() {
            self.step = prev;
        }
        self.step
    }

    pub fn snapshot(&self) -> BuildSnapshot {
        snapshot(&self.selection)
    }

    /// Finalize against the target's stored state and apply the result.
    ///
    /// The stored state is re-read here, not at open time, so the diff
    /// reflects whatever the character holds at the moment of saving. On
    /// success the draft is retargeted at the saved character.
    pub async fn submit<R, A>(&mut self, reader: &R, applier: &A) -> Result<FinalizedBuild, StoreError>
    where
        R: CharacterReader + ?Sized,
        A: PersistenceApplier + ?Sized,
    {
        let prior = match self.selection.target() {
            Some(id) => Some(reader.read(id).await?.ok_or(StoreError::NotFound(id))?),
            None => None,
        };

        let build = finalize(&self.selection, prior.as_ref(), &self.settings.item_types());
        let id = applier.apply(&build).await?;
        self.selection.set_target(Some(id));
        Ok(build)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_navigation() {
        assert_eq!(WizardStep::Name.prev(), None);
        assert_eq!(WizardStep::Name.next(), Some(WizardStep::Ancestry));
        assert_eq!(WizardStep::Items.next(), Some(WizardStep::Review));
        assert_eq!(WizardStep::Review.next(), None);
        assert_eq!(WizardStep::Review.prev(), Some(WizardStep::Items));
    }

    #[test]
    fn test_indicator() {
        assert_eq!(WizardStep::Name.indicator(), "Step 0 / 8");
        assert_eq!(WizardStep::Review.indicator(), "Step 8 / 8");
    }

    #[test]
    fn test_wizard_clamps_at_ends() {
        let mut wizard = Wizard::new(CatalogSet::default(), CreatorSettings::default());
        assert_eq!(wizard.prev_step(), WizardStep::Name);
        for _ in 0..20 {
            wizard.next_step();
        }
        assert_eq!(wizard.step(), WizardStep::Review);
    }

    #[test]
    fn test_new_wizard_uses_catalog_skills() {
        let catalogs = CatalogSet {
            skills: vec!["Lightweaving".to_string()],
            ..CatalogSet::default()
        };
        let wizard = Wizard::new(catalogs, CreatorSettings::default());
        assert_eq!(wizard.selection.skills().len(), 1);
    }
}
