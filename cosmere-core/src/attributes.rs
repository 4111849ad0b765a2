//! The six Cosmere attributes and their point-limited container.

use crate::allocation::{Allocation, ATTRIBUTE_POOL};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A character attribute, in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Attribute {
    Strength,
    Speed,
    Intellect,
    Willpower,
    Awareness,
    Presence,
}

impl Attribute {
    /// Short key used in stored character data.
    pub fn key(&self) -> &'static str {
        match self {
            Attribute::Strength => "str",
            Attribute::Speed => "spd",
            Attribute::Intellect => "int",
            Attribute::Willpower => "wil",
            Attribute::Awareness => "awa",
            Attribute::Presence => "pre",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Attribute::Strength => "Strength",
            Attribute::Speed => "Speed",
            Attribute::Intellect => "Intellect",
            Attribute::Willpower => "Willpower",
            Attribute::Awareness => "Awareness",
            Attribute::Presence => "Presence",
        }
    }

    pub fn all() -> [Attribute; 6] {
        [
            Attribute::Strength,
            Attribute::Speed,
            Attribute::Intellect,
            Attribute::Willpower,
            Attribute::Awareness,
            Attribute::Presence,
        ]
    }

    /// Look up an attribute by display name or short key, ignoring case.
    pub fn parse(s: &str) -> Option<Attribute> {
        let s = s.trim();
        Attribute::all()
            .into_iter()
            .find(|a| a.name().eq_ignore_ascii_case(s) || a.key().eq_ignore_ascii_case(s))
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Attribute values, always within [`ATTRIBUTE_POOL`].
///
/// Fields are private so every change goes through the enforcer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AttributeSet {
    strength: u8,
    speed: u8,
    intellect: u8,
    willpower: u8,
    awareness: u8,
    presence: u8,
}

impl AttributeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from raw values, normalizing them through the enforcer.
    pub fn from_raw(values: [(Attribute, i32); 6]) -> Self {
        let mut set = Self::default();
        set.apply(ATTRIBUTE_POOL.enforce(&values));
        set
    }

    pub fn get(&self, attribute: Attribute) -> u8 {
        match attribute {
            Attribute::Strength => self.strength,
            Attribute::Speed => self.speed,
            Attribute::Intellect => self.intellect,
            Attribute::Willpower => self.willpower,
            Attribute::Awareness => self.awareness,
            Attribute::Presence => self.presence,
        }
    }

    /// Set one attribute and re-normalize the whole pool.
    ///
    /// Returns the value the attribute actually holds afterwards, which may
    /// be lower than requested.
    pub fn set(&mut self, attribute: Attribute, value: i32) -> u8 {
        let raw = Attribute::all().map(|a| {
            let v = if a == attribute {
                value
            } else {
                i32::from(self.get(a))
            };
            (a, v)
        });
        self.apply(ATTRIBUTE_POOL.enforce(&raw));
        self.get(attribute)
    }

    pub fn total(&self) -> u32 {
        Attribute::all()
            .iter()
            .map(|a| u32::from(self.get(*a)))
            .sum()
    }

    pub fn remaining(&self) -> u8 {
        (u32::from(ATTRIBUTE_POOL.total).saturating_sub(self.total())) as u8
    }

    /// Values in declaration order.
    pub fn values(&self) -> [(Attribute, u8); 6] {
        Attribute::all().map(|a| (a, self.get(a)))
    }

    fn apply(&mut self, allocation: Allocation<Attribute>) {
        for (attribute, value) in allocation.values {
            match attribute {
                Attribute::Strength => self.strength = value,
                Attribute::Speed => self.speed = value,
                Attribute::Intellect => self.intellect = value,
                Attribute::Willpower => self.willpower = value,
                Attribute::Awareness => self.awareness = value,
                Attribute::Presence => self.presence = value,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_zero() {
        let set = AttributeSet::new();
        assert_eq!(set.total(), 0);
        assert_eq!(set.remaining(), 12);
    }

    #[test]
    fn test_set_clamps_to_cap() {
        let mut set = AttributeSet::new();
        assert_eq!(set.set(Attribute::Strength, 7), 3);
        assert_eq!(set.set(Attribute::Speed, -2), 0);
        assert_eq!(set.total(), 3);
    }

    #[test]
    fn test_later_attribute_loses_points_first() {
        let mut set = AttributeSet::new();
        for attribute in Attribute::all() {
            set.set(attribute, 3);
        }

        assert_eq!(set.total(), 12);
        assert_eq!(set.get(Attribute::Strength), 3);
        assert_eq!(set.get(Attribute::Willpower), 3);
        assert_eq!(set.get(Attribute::Awareness), 0);
        assert_eq!(set.get(Attribute::Presence), 0);
        assert_eq!(set.remaining(), 0);
    }

    #[test]
    fn test_raising_early_attribute_drains_later_ones() {
        let mut set = AttributeSet::from_raw([
            (Attribute::Strength, 0),
            (Attribute::Speed, 3),
            (Attribute::Intellect, 3),
            (Attribute::Willpower, 3),
            (Attribute::Awareness, 2),
            (Attribute::Presence, 1),
        ]);
        assert_eq!(set.total(), 12);

        set.set(Attribute::Strength, 3);
        assert_eq!(set.get(Attribute::Strength), 3);
        assert_eq!(set.get(Attribute::Presence), 0);
        assert_eq!(set.get(Attribute::Awareness), 0);
        assert_eq!(set.total(), 12);
    }

    #[test]
    fn test_parse() {
        assert_eq!(Attribute::parse("intellect"), Some(Attribute::Intellect));
        assert_eq!(Attribute::parse("AWA"), Some(Attribute::Awareness));
        assert_eq!(Attribute::parse("charisma"), None);
    }
}
