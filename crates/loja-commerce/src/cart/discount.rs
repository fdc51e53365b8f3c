//! Tiered cart discount.
//!
//! The discount percentage is a step function of the cart subtotal. Every
//! threshold is an exclusive lower bound: a subtotal of exactly R$ 350,00 does
//! not reach a tier that starts "above 350".

use crate::error::CommerceError;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// One step of a tier schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DiscountTier {
    /// The subtotal must be strictly greater than this many cents.
    pub above_cents: i64,
    /// Percentage off the subtotal (0-100).
    pub percent: u32,
}

impl DiscountTier {
    pub const fn new(above_cents: i64, percent: u32) -> Self {
        Self {
            above_cents,
            percent,
        }
    }

    /// Check if a subtotal qualifies for this tier.
    pub fn applies_to(&self, subtotal_cents: i64) -> bool {
        subtotal_cents > self.above_cents
    }
}

/// Default storefront tiers: >350→50%, >300→45%, >250→40%, >200→30%, >150→25%, >100→20%.
pub const DEFAULT_TIERS: [DiscountTier; 6] = [
    DiscountTier::new(35_000, 50),
    DiscountTier::new(30_000, 45),
    DiscountTier::new(25_000, 40),
    DiscountTier::new(20_000, 30),
    DiscountTier::new(15_000, 25),
    DiscountTier::new(10_000, 20),
];

/// How far a subtotal is from the next discount tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierProgress {
    /// Percentage unlocked by the next tier.
    pub percent: u32,
    /// Amount still to add to the cart to unlock it.
    pub remaining: Money,
}

/// An ordered, validated set of discount tiers.
///
/// Tiers are kept highest threshold first and evaluated in that order; the
/// first tier the subtotal exceeds wins. Construction guarantees the schedule
/// is monotonic: a higher subtotal never yields a lower percentage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<DiscountTier>", into = "Vec<DiscountTier>")]
pub struct TierSchedule {
    tiers: Vec<DiscountTier>,
}

impl TierSchedule {
    /// Build a schedule from tiers in any order.
    pub fn new(mut tiers: Vec<DiscountTier>) -> Result<Self, CommerceError> {
        tiers.sort_by(|a, b| b.above_cents.cmp(&a.above_cents));

        for tier in &tiers {
            if tier.percent > 100 {
                return Err(CommerceError::ValidationError(format!(
                    "discount tier above {} cents has percent {} > 100",
                    tier.above_cents, tier.percent
                )));
            }
            if tier.above_cents < 0 {
                return Err(CommerceError::ValidationError(format!(
                    "discount tier threshold {} is negative",
                    tier.above_cents
                )));
            }
        }

        for pair in tiers.windows(2) {
            let (higher, lower) = (&pair[0], &pair[1]);
            if higher.above_cents == lower.above_cents {
                return Err(CommerceError::ValidationError(format!(
                    "duplicate discount tier threshold {}",
                    higher.above_cents
                )));
            }
            if higher.percent < lower.percent {
                return Err(CommerceError::ValidationError(format!(
                    "discount tier above {} cents ({}%) is lower than the tier above {} cents ({}%)",
                    higher.above_cents, higher.percent, lower.above_cents, lower.percent
                )));
            }
        }

        Ok(Self { tiers })
    }

    /// A schedule that never discounts.
    pub fn none() -> Self {
        Self { tiers: Vec::new() }
    }

    /// Tiers, highest threshold first.
    pub fn tiers(&self) -> &[DiscountTier] {
        &self.tiers
    }

    /// Discount percentage for a subtotal in cents.
    pub fn percent_for(&self, subtotal_cents: i64) -> u32 {
        self.tiers
            .iter()
            .find(|tier| tier.applies_to(subtotal_cents))
            .map(|tier| tier.percent)
            .unwrap_or(0)
    }

    /// The next tier with a better percentage, and what is left to reach it.
    ///
    /// `None` when no better tier exists or the next one is out of reach of
    /// any representable subtotal.
    pub fn progress(&self, subtotal: Money) -> Option<TierProgress> {
        let current = self.percent_for(subtotal.amount_cents);
        let tier = self
            .tiers
            .iter()
            .rev()
            .find(|tier| tier.percent > current && !tier.applies_to(subtotal.amount_cents))?;
        // Strictly greater-than: one cent past the threshold.
        let remaining = tier
            .above_cents
            .checked_sub(subtotal.amount_cents)?
            .checked_add(1)?;
        Some(TierProgress {
            percent: tier.percent,
            remaining: Money::new(remaining, subtotal.currency),
        })
    }
}

impl Default for TierSchedule {
    fn default() -> Self {
        Self {
            tiers: DEFAULT_TIERS.to_vec(),
        }
    }
}

impl TryFrom<Vec<DiscountTier>> for TierSchedule {
    type Error = CommerceError;

    fn try_from(tiers: Vec<DiscountTier>) -> Result<Self, Self::Error> {
        Self::new(tiers)
    }
}

impl From<TierSchedule> for Vec<DiscountTier> {
    fn from(schedule: TierSchedule) -> Self {
        schedule.tiers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table() {
        let schedule = TierSchedule::default();
        assert_eq!(schedule.percent_for(0), 0);
        assert_eq!(schedule.percent_for(10_000), 0);
        assert_eq!(schedule.percent_for(10_001), 20);
        assert_eq!(schedule.percent_for(15_001), 25);
        assert_eq!(schedule.percent_for(20_001), 30);
        assert_eq!(schedule.percent_for(25_001), 40);
        assert_eq!(schedule.percent_for(30_001), 45);
        assert_eq!(schedule.percent_for(35_000), 45);
        assert_eq!(schedule.percent_for(35_001), 50);
        assert_eq!(schedule.percent_for(1_000_000), 50);
    }

    #[test]
    fn test_every_boundary_is_exclusive() {
        let schedule = TierSchedule::default();
        for tier in schedule.tiers() {
            assert_ne!(schedule.percent_for(tier.above_cents), tier.percent);
            assert_eq!(schedule.percent_for(tier.above_cents + 1), tier.percent);
        }
    }

    #[test]
    fn test_default_is_monotonic() {
        let schedule = TierSchedule::default();
        let mut previous = 0;
        for cents in (0..=40_000).step_by(7) {
            let percent = schedule.percent_for(cents);
            assert!(percent >= previous, "{cents} cents dropped to {percent}%");
            previous = percent;
        }
    }

    #[test]
    fn test_unsorted_input_is_sorted() {
        let schedule =
            TierSchedule::new(vec![DiscountTier::new(100, 5), DiscountTier::new(500, 10)]).unwrap();
        assert_eq!(schedule.tiers()[0].above_cents, 500);
        assert_eq!(schedule.percent_for(300), 5);
    }

    #[test]
    fn test_rejects_non_monotonic() {
        let result = TierSchedule::new(vec![DiscountTier::new(100, 30), DiscountTier::new(500, 10)]);
        assert!(matches!(result, Err(CommerceError::ValidationError(_))));
    }

    #[test]
    fn test_rejects_percent_over_100() {
        let result = TierSchedule::new(vec![DiscountTier::new(100, 101)]);
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_duplicate_threshold() {
        let result = TierSchedule::new(vec![DiscountTier::new(100, 10), DiscountTier::new(100, 10)]);
        assert!(result.is_err());
    }

    #[test]
    fn test_progress_to_next_tier() {
        let schedule = TierSchedule::default();

        let progress = schedule.progress(Money::brl(9_000)).unwrap();
        assert_eq!(progress.percent, 20);
        assert_eq!(progress.remaining, Money::brl(1_001));

        let progress = schedule.progress(Money::brl(35_000)).unwrap();
        assert_eq!(progress.percent, 50);
        assert_eq!(progress.remaining, Money::brl(1));

        assert_eq!(schedule.progress(Money::brl(35_001)), None);
    }

    #[test]
    fn test_progress_near_i64_max() {
        let schedule = TierSchedule::new(vec![DiscountTier::new(i64::MAX, 10)]).unwrap();
        assert_eq!(schedule.percent_for(0), 0);
        assert_eq!(schedule.progress(Money::brl(0)), None);

        let schedule = TierSchedule::new(vec![DiscountTier::new(i64::MAX - 1, 10)]).unwrap();
        let progress = schedule.progress(Money::brl(0)).unwrap();
        assert_eq!(progress.remaining, Money::brl(i64::MAX));
    }

    #[test]
    fn test_none_schedule() {
        let schedule = TierSchedule::none();
        assert_eq!(schedule.percent_for(i64::MAX), 0);
        assert_eq!(schedule.progress(Money::brl(100)), None);
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: TierSchedule =
            serde_json::from_str(r#"[{"above_cents":100,"percent":10}]"#).unwrap();
        assert_eq!(ok.percent_for(101), 10);

        let bad = serde_json::from_str::<TierSchedule>(
            r#"[{"above_cents":100,"percent":30},{"above_cents":200,"percent":10}]"#,
        );
        assert!(bad.is_err());
    }
}
