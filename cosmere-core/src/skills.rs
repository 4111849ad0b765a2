//! Skill ranks drawn from an open, catalog-defined skill list.

use crate::allocation::SKILL_POOL;
use serde::Serialize;

/// Skills offered when no skills catalog is configured or it loads empty.
pub const DEFAULT_SKILLS: [&str; 18] = [
    "Agility",
    "Athletics",
    "Heavy Weaponry",
    "Light Weaponry",
    "Stealth",
    "Thievery",
    "Crafting",
    "Deduction",
    "Discipline",
    "Intimidation",
    "Lore",
    "Medicine",
    "Deception",
    "Insight",
    "Leadership",
    "Perception",
    "Persuasion",
    "Survival",
];

pub fn is_default_skill(name: &str) -> bool {
    DEFAULT_SKILLS.contains(&name)
}

/// A single skill and its allocated rank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkillRank {
    pub name: String,
    pub value: u8,
}

/// Ordered skill ranks, always within [`SKILL_POOL`].
///
/// Order matters: when the pool overflows, ranks are taken back from the
/// last skill first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SkillAllocation {
    ranks: Vec<SkillRank>,
}

impl SkillAllocation {
    /// All skills at rank 0, in the given order. Duplicate names are dropped.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut ranks: Vec<SkillRank> = Vec::new();
        for name in names {
            let name = name.into();
            if !ranks.iter().any(|r| r.name == name) {
                ranks.push(SkillRank { name, value: 0 });
            }
        }
        Self { ranks }
    }

    pub fn with_defaults() -> Self {
        Self::new(DEFAULT_SKILLS)
    }

    pub fn get(&self, name: &str) -> Option<u8> {
        self.ranks.iter().find(|r| r.name == name).map(|r| r.value)
    }

    /// Set a skill rank and re-normalize the pool.
    ///
    /// Unknown skills are ignored and yield `None`. Otherwise returns the
    /// rank the skill holds after enforcement.
    pub fn set(&mut self, name: &str, value: i32) -> Option<u8> {
        if !self.ranks.iter().any(|r| r.name == name) {
            return None;
        }

        let raw: Vec<(usize, i32)> = self
            .ranks
            .iter()
            .enumerate()
            .map(|(i, r)| {
                let v = if r.name == name {
                    value
                } else {
                    i32::from(r.value)
                };
                (i, v)
            })
            .collect();

        for (i, v) in SKILL_POOL.enforce(&raw).values {
            self.ranks[i].value = v;
        }
        self.get(name)
    }

    /// Overwrite several ranks at once, then enforce once.
    ///
    /// Used for prefill, where the stored ranks should be normalized as a
    /// whole rather than edit by edit.
    pub fn set_many<'a>(&mut self, values: impl IntoIterator<Item = (&'a str, i32)>) {
        let mut raw: Vec<(usize, i32)> = self
            .ranks
            .iter()
            .enumerate()
            .map(|(i, r)| (i, i32::from(r.value)))
            .collect();
        for (name, value) in values {
            if let Some(i) = self.ranks.iter().position(|r| r.name == name) {
                raw[i].1 = value;
            }
        }
        for (i, v) in SKILL_POOL.enforce(&raw).values {
            self.ranks[i].value = v;
        }
    }

    pub fn ranks(&self) -> &[SkillRank] {
        &self.ranks
    }

    /// Skills with a rank above zero, in declaration order.
    pub fn trained(&self) -> impl Iterator<Item = &SkillRank> {
        self.ranks.iter().filter(|r| r.value > 0)
    }

    pub fn total(&self) -> u32 {
        self.ranks.iter().map(|r| u32::from(r.value)).sum()
    }

    pub fn remaining(&self) -> u8 {
        (u32::from(SKILL_POOL.total).saturating_sub(self.total())) as u8
    }

    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }
}
