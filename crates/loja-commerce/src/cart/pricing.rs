//! Cart pricing calculations.

use crate::cart::{CartLine, TierProgress, TierSchedule};
use crate::money::{Currency, Money, RoundingMode};
use serde::{Deserialize, Serialize};

/// Complete pricing breakdown for a cart.
///
/// A snapshot: it is derived from the lines on demand and never cached on the
/// cart, so it cannot go stale after a mutation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartPricing {
    /// Sum of quantities across all lines.
    pub total_items: u64,
    /// Number of distinct lines.
    pub unique_lines: usize,
    /// Subtotal before the tier discount.
    pub total_price: Money,
    /// Tier discount percentage for the subtotal.
    pub discount_percent: u32,
    /// Tier discount amount, rounded to the cent.
    pub discount_amount: Money,
    /// Subtotal minus the tier discount.
    pub final_price: Money,
    /// Savings already included in the unit prices (original price markdowns).
    pub catalog_savings: Money,
    /// Next tier the customer can unlock, if any.
    pub next_tier: Option<TierProgress>,
}

impl CartPricing {
    /// Derive pricing from cart lines.
    ///
    /// Line totals saturate instead of overflowing; a cart big enough to hit
    /// that is not a real cart.
    pub fn calculate(
        lines: &[CartLine],
        currency: Currency,
        tiers: &TierSchedule,
        rounding: RoundingMode,
    ) -> Self {
        let total_items = lines.iter().map(|l| u64::from(l.quantity)).sum();
        let total_cents = lines
            .iter()
            .fold(0_i64, |acc, l| acc.saturating_add(l.line_total_cents()));
        let savings_cents = lines
            .iter()
            .fold(0_i64, |acc, l| acc.saturating_add(l.line_savings_cents()));

        let total_price = Money::new(total_cents, currency);
        let discount_percent = tiers.percent_for(total_cents);
        // percent <= 100, so the discount never exceeds the subtotal
        let discount_amount = total_price
            .percentage(discount_percent, rounding)
            .unwrap_or_else(|| Money::zero(currency));
        let final_price = Money::new(total_cents - discount_amount.amount_cents, currency);

        Self {
            total_items,
            unique_lines: lines.len(),
            total_price,
            discount_percent,
            discount_amount,
            final_price,
            catalog_savings: Money::new(savings_cents, currency),
            next_tier: tiers.progress(total_price),
        }
    }

    /// Check if a tier discount applies.
    pub fn has_discount(&self) -> bool {
        self.discount_amount.is_positive()
    }

    /// Tier discount plus catalog markdowns.
    pub fn total_savings(&self) -> Money {
        Money::new(
            self.discount_amount
                .amount_cents
                .saturating_add(self.catalog_savings.amount_cents),
            self.total_price.currency,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Product;

    fn line(id: &str, price: i64, quantity: u32) -> CartLine {
        CartLine::new(Product::new(id, id, Money::brl(price)), quantity, None, None)
    }

    fn price(lines: &[CartLine]) -> CartPricing {
        CartPricing::calculate(lines, Currency::BRL, &TierSchedule::default(), RoundingMode::HalfUp)
    }

    #[test]
    fn test_empty_cart() {
        let pricing = price(&[]);
        assert_eq!(pricing.total_items, 0);
        assert_eq!(pricing.total_price, Money::brl(0));
        assert_eq!(pricing.discount_percent, 0);
        assert!(!pricing.has_discount());
        assert_eq!(pricing.final_price, Money::brl(0));
    }

    #[test]
    fn test_discount_tier_applied() {
        let pricing = price(&[line("a", 10_000, 2), line("b", 16_000, 1)]);
        assert_eq!(pricing.total_items, 3);
        assert_eq!(pricing.unique_lines, 2);
        assert_eq!(pricing.total_price, Money::brl(36_000));
        assert_eq!(pricing.discount_percent, 50);
        assert_eq!(pricing.discount_amount, Money::brl(18_000));
        assert_eq!(pricing.final_price, Money::brl(18_000));
        assert_eq!(pricing.next_tier, None);
    }

    #[test]
    fn test_exact_threshold_stays_in_lower_tier() {
        let pricing = price(&[line("a", 35_000, 1)]);
        assert_eq!(pricing.discount_percent, 45);
        assert_eq!(pricing.discount_amount, Money::brl(15_750));
        assert_eq!(pricing.final_price, Money::brl(19_250));
    }

    #[test]
    fn test_half_cent_rounding() {
        // 15_002 * 25% = 3750.5
        let pricing = price(&[line("a", 15_002, 1)]);
        assert_eq!(pricing.discount_percent, 25);
        assert_eq!(pricing.discount_amount, Money::brl(3_751));

        let even = CartPricing::calculate(
            &[line("a", 15_002, 1)],
            Currency::BRL,
            &TierSchedule::default(),
            RoundingMode::HalfEven,
        );
        assert_eq!(even.discount_amount, Money::brl(3_750));
        assert_eq!(even.final_price, Money::brl(11_252));
    }

    #[test]
    fn test_catalog_savings() {
        let product = Product::new("a", "A", Money::brl(2_000)).with_original_price(Money::brl(2_500));
        let pricing = price(&[CartLine::new(product, 3, None, None)]);
        assert_eq!(pricing.catalog_savings, Money::brl(1_500));
        assert_eq!(pricing.total_savings(), Money::brl(1_500));
    }
}
