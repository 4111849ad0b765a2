//! Read-only projection of a draft for the preview panel.

use crate::attributes::Attribute;
use crate::catalog::CatalogEntry;
use crate::selection::BuildSelection;
use serde::Serialize;

/// Shown for any selection that has not been made.
pub const PLACEHOLDER: &str = "—";

/// A skill line in the preview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkillLine {
    pub name: String,
    pub value: u8,
}

/// Everything the preview shows, resolved to display text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildSnapshot {
    pub name: String,
    pub ancestry: String,
    pub cultures: String,
    pub heroic_path: String,
    pub radiant_path: String,
    pub attributes: Vec<(Attribute, u8)>,
    pub attribute_points_remaining: u8,
    /// Skills with a rank above zero only.
    pub skills: Vec<SkillLine>,
    pub skill_points_remaining: u8,
    /// Filled expertise slots, trimmed.
    pub expertise: Vec<String>,
    pub items: Vec<String>,
}

fn label(entry: Option<&CatalogEntry>) -> String {
    entry
        .map(|e| e.name.trim())
        .filter(|n| !n.is_empty())
        .unwrap_or(PLACEHOLDER)
        .to_string()
}

/// Project a draft into its preview.
pub fn snapshot(selection: &BuildSelection) -> BuildSnapshot {
    let cultures = selection
        .cultures()
        .iter()
        .map(|c| c.name.trim())
        .collect::<Vec<_>>()
        .join(", ");

    BuildSnapshot {
        name: selection.display_name().to_string(),
        ancestry: label(selection.ancestry()),
        cultures: if cultures.is_empty() {
            PLACEHOLDER.to_string()
        } else {
            cultures
        },
        heroic_path: label(selection.heroic_path()),
        radiant_path: label(selection.radiant_path()),
        attributes: selection.attributes().values().to_vec(),
        attribute_points_remaining: selection.attributes().remaining(),
        skills: selection
            .skills()
            .trained()
            .map(|r| SkillLine {
                name: r.name.clone(),
                value: r.value,
            })
            .collect(),
        skill_points_remaining: selection.skills().remaining(),
        expertise: selection
            .expertise()
            .filled()
            .map(str::to_string)
            .collect(),
        items: selection.items().iter().map(|i| i.name.clone()).collect(),
    }
}

impl BuildSnapshot {
    pub fn attribute(&self, attribute: Attribute) -> u8 {
        self.attributes
            .iter()
            .find(|(a, _)| *a == attribute)
            .map(|(_, v)| *v)
            .unwrap_or(0)
    }
}
