//! Point-budget enforcement for attribute and skill pools.
//!
//! Every edit in the wizard funnels through [`enforce`]: values are clamped
//! to the per-item cap, then any overflow beyond the pool total is removed
//! starting from the last declared entry. Earlier entries keep their points.

use serde::{Deserialize, Serialize};

/// A pool of points with a per-item cap and a total budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointPool {
    pub per_item_cap: u8,
    pub total: u8,
}

/// Attributes: 3 points max each, 12 in total.
pub const ATTRIBUTE_POOL: PointPool = PointPool {
    per_item_cap: 3,
    total: 12,
};

/// Skills: 2 ranks max each, 4 in total.
pub const SKILL_POOL: PointPool = PointPool {
    per_item_cap: 2,
    total: 4,
};

/// Result of running the enforcer over a pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Allocation<K> {
    /// Clamped values in input order.
    pub values: Vec<(K, u8)>,
    /// Points still unspent, never negative.
    pub remaining: u8,
}

impl<K> Allocation<K> {
    pub fn total(&self) -> u32 {
        self.values.iter().map(|(_, v)| u32::from(*v)).sum()
    }

    pub fn get(&self, key: &K) -> Option<u8>
    where
        K: PartialEq,
    {
        self.values
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| *v)
    }
}

impl PointPool {
    pub fn new(per_item_cap: u8, total: u8) -> Self {
        Self {
            per_item_cap,
            total,
        }
    }

    /// Run [`enforce`] with this pool's caps.
    pub fn enforce<K: Clone>(&self, values: &[(K, i32)]) -> Allocation<K> {
        enforce(values, self.per_item_cap, self.total)
    }
}

/// Clamp `values` into the pool and strip overflow from the end.
///
/// Out-of-range input is never an error: negatives become 0 and oversized
/// values become `per_item_cap`. When the clamped sum exceeds `total_cap`,
/// entries are reduced in reverse input order until the sum fits. The
/// function is total and idempotent.
pub fn enforce<K: Clone>(values: &[(K, i32)], per_item_cap: u8, total_cap: u8) -> Allocation<K> {
    let mut clamped: Vec<(K, u8)> = values
        .iter()
        .map(|(key, raw)| {
            let v = (*raw).clamp(0, i32::from(per_item_cap));
            // clamp bounds the value to [0, per_item_cap], which fits in u8
            (key.clone(), v as u8)
        })
        .collect();

    let sum: u32 = clamped.iter().map(|(_, v)| u32::from(*v)).sum();
    let cap = u32::from(total_cap);

    if sum > cap {
        let mut overflow = sum - cap;
        for (_, value) in clamped.iter_mut().rev() {
            if overflow == 0 {
                break;
            }
            let reducible = u32::from(*value).min(overflow);
            // reducible <= *value, so this never underflows
            *value -= reducible as u8;
            overflow -= reducible;
        }
    }

    let total: u32 = clamped.iter().map(|(_, v)| u32::from(*v)).sum();
    let remaining = cap.saturating_sub(total) as u8;

    Allocation {
        values: clamped,
        remaining,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(values: &[(&'static str, i32)]) -> Vec<(&'static str, i32)> {
        values.to_vec()
    }

    fn refeed(allocation: &Allocation<&'static str>) -> Vec<(&'static str, i32)> {
        allocation
            .values
            .iter()
            .map(|(k, v)| (*k, i32::from(*v)))
            .collect()
    }

    #[test]
    fn test_under_budget_is_untouched() {
        let result = enforce(&raw(&[("A", 1), ("B", 2), ("C", 0)]), 3, 12);
        assert_eq!(result.values, vec![("A", 1), ("B", 2), ("C", 0)]);
        assert_eq!(result.remaining, 9);
    }

    #[test]
    fn test_clamps_each_value() {
        let result = enforce(&raw(&[("A", -4), ("B", 9), ("C", 2)]), 3, 12);
        assert_eq!(result.values, vec![("A", 0), ("B", 3), ("C", 2)]);
        assert_eq!(result.remaining, 7);
    }

    #[test]
    fn test_reverse_order_reduction_five_fields() {
        let input = raw(&[("A", 3), ("B", 3), ("C", 3), ("D", 3), ("E", 3)]);
        let result = enforce(&input, 3, 12);

        // Overflow 3 is taken entirely from the last field
        assert_eq!(
            result.values,
            vec![("A", 3), ("B", 3), ("C", 3), ("D", 3), ("E", 0)]
        );
        assert_eq!(result.total(), 12);
        assert_eq!(result.remaining, 0);
    }

    #[test]
    fn test_six_attributes_at_cap() {
        let input = raw(&[
            ("str", 3),
            ("spd", 3),
            ("int", 3),
            ("wil", 3),
            ("awa", 3),
            ("pre", 3),
        ]);
        let result = ATTRIBUTE_POOL.enforce(&input);

        assert_eq!(result.total(), 12);
        assert_eq!(result.get(&"str"), Some(3));
        assert_eq!(result.get(&"spd"), Some(3));
        assert_eq!(result.get(&"int"), Some(3));
        assert_eq!(result.get(&"wil"), Some(3));
        assert_eq!(result.get(&"awa"), Some(0));
        assert_eq!(result.get(&"pre"), Some(0));
    }

    #[test]
    fn test_skill_overflow() {
        let input = raw(&[("Stealth", 2), ("Lore", 2), ("Medicine", 2)]);
        let result = SKILL_POOL.enforce(&input);

        assert_eq!(result.get(&"Stealth"), Some(2));
        assert_eq!(result.get(&"Lore"), Some(2));
        assert_eq!(result.get(&"Medicine"), Some(0));
        assert_eq!(result.total(), 4);
    }

    #[test]
    fn test_skill_overflow_spread_over_two_fields() {
        // Overflow of 2 against a last field worth only 1
        let input = raw(&[("Stealth", 2), ("Lore", 2), ("Medicine", 1), ("Insight", 1)]);
        let result = SKILL_POOL.enforce(&input);

        assert_eq!(
            result.values,
            vec![("Stealth", 2), ("Lore", 2), ("Medicine", 0), ("Insight", 0)]
        );
    }

    #[test]
    fn test_idempotent() {
        let input = raw(&[("A", 5), ("B", -1), ("C", 3), ("D", 2), ("E", 3)]);
        let once = enforce(&input, 3, 7);
        let twice = enforce(&refeed(&once), 3, 7);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_empty_input() {
        let result: Allocation<&str> = enforce(&[], 2, 4);
        assert!(result.values.is_empty());
        assert_eq!(result.remaining, 4);
    }

    #[test]
    fn test_zero_total_cap() {
        let result = enforce(&raw(&[("A", 2), ("B", 1)]), 3, 0);
        assert_eq!(result.values, vec![("A", 0), ("B", 0)]);
        assert_eq!(result.remaining, 0);
    }
}
