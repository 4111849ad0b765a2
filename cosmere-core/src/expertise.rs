//! Free-text expertise slots whose count follows the Intellect attribute.

use serde::Serialize;

/// Ordered expertise entries. Length always equals the driving attribute.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExpertiseSlots {
    slots: Vec<String>,
}

impl ExpertiseSlots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Grow with empty slots or truncate from the end to `count`.
    ///
    /// Text in truncated slots is discarded; growing again yields empty slots.
    pub fn resize(&mut self, count: u8) {
        self.slots.resize(usize::from(count), String::new());
    }

    /// Replace the text of one slot. Returns `false` if the slot does not exist.
    pub fn set(&mut self, index: usize, text: impl Into<String>) -> bool {
        match self.slots.get_mut(index) {
            Some(slot) => {
                *slot = text.into();
                true
            }
            None => false,
        }
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.slots.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slots(&self) -> &[String] {
        &self.slots
    }

    /// Non-blank entries, trimmed.
    pub fn filled(&self) -> impl Iterator<Item = &str> {
        self.slots.iter().map(|s| s.trim()).filter(|s| !s.is_empty())
    }
}
