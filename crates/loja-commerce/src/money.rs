//! Money type for representing monetary values.
//!
//! Uses cents-based integer representation to avoid floating-point
//! precision issues that plague monetary calculations. Percentages are
//! applied with integer arithmetic and an explicit [`RoundingMode`].

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Supported currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Currency {
    #[default]
    BRL,
    USD,
    EUR,
}

impl Currency {
    /// Get the currency code (e.g., "BRL").
    pub fn code(&self) -> &'static str {
        match self {
            Currency::BRL => "BRL",
            Currency::USD => "USD",
            Currency::EUR => "EUR",
        }
    }

    /// Get the currency symbol (e.g., "R$").
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::BRL => "R$",
            Currency::USD => "$",
            Currency::EUR => "\u{20ac}",
        }
    }

    /// Get the number of decimal places for this currency.
    pub fn decimal_places(&self) -> u32 {
        2
    }

    /// Thousands and decimal separators used when formatting.
    fn separators(&self) -> (char, char) {
        match self {
            Currency::BRL | Currency::EUR => ('.', ','),
            Currency::USD => (',', '.'),
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// How to resolve an exact half-cent when applying a percentage.
///
/// The two modes only differ when the unrounded result ends in exactly `.5`
/// of the minor unit: `HalfUp` moves away from zero, `HalfEven` moves to the
/// nearest even cent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RoundingMode {
    #[default]
    HalfUp,
    HalfEven,
}

impl RoundingMode {
    /// Divide `numerator` by a positive `denominator`, rounding to the nearest integer.
    pub fn divide(&self, numerator: i128, denominator: i128) -> i128 {
        debug_assert!(denominator > 0);
        let quotient = numerator.div_euclid(denominator);
        let remainder = numerator.rem_euclid(denominator);
        match (remainder * 2).cmp(&denominator) {
            Ordering::Less => quotient,
            Ordering::Greater => quotient + 1,
            Ordering::Equal => match self {
                RoundingMode::HalfUp if numerator >= 0 => quotient + 1,
                RoundingMode::HalfUp => quotient,
                RoundingMode::HalfEven if quotient % 2 == 0 => quotient,
                RoundingMode::HalfEven => quotient + 1,
            },
        }
    }
}

/// A monetary value with currency.
///
/// Amounts are stored in the smallest unit of the currency (cents for BRL).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Money {
    /// Amount in smallest currency unit (e.g., cents).
    pub amount_cents: i64,
    /// The currency.
    pub currency: Currency,
}

impl Money {
    /// Create a new Money value from cents.
    pub fn new(amount_cents: i64, currency: Currency) -> Self {
        Self {
            amount_cents,
            currency,
        }
    }

    /// Create a BRL value from centavos.
    pub fn brl(amount_cents: i64) -> Self {
        Self::new(amount_cents, Currency::BRL)
    }

    /// Create a zero amount in the given currency.
    pub fn zero(currency: Currency) -> Self {
        Self::new(0, currency)
    }

    /// Check if this is positive.
    pub fn is_positive(&self) -> bool {
        self.amount_cents > 0
    }

    /// Check if this is negative.
    pub fn is_negative(&self) -> bool {
        self.amount_cents < 0
    }

    /// Subtract an amount in the same currency, returning None on mismatch or overflow.
    pub fn try_subtract(&self, other: &Money) -> Option<Money> {
        if self.currency != other.currency {
            return None;
        }
        self.amount_cents
            .checked_sub(other.amount_cents)
            .map(|amount| Money::new(amount, self.currency))
    }

    /// Calculate `percent`% of this amount, rounded to the nearest cent.
    pub fn percentage(&self, percent: u32, rounding: RoundingMode) -> Option<Money> {
        let scaled = i128::from(self.amount_cents) * i128::from(percent);
        let cents = rounding.divide(scaled, 100);
        i64::try_from(cents)
            .ok()
            .map(|amount| Money::new(amount, self.currency))
    }

    /// The smaller of two amounts in the same currency.
    pub fn min(self, other: Money) -> Money {
        if other.amount_cents < self.amount_cents {
            other
        } else {
            self
        }
    }

    /// Format as a display string (e.g., "R$ 1.234,56").
    pub fn display(&self) -> String {
        match self.currency {
            Currency::BRL => format!("{} {}", self.currency.symbol(), self.display_amount()),
            _ => format!("{}{}", self.currency.symbol(), self.display_amount()),
        }
    }

    /// Format the amount without symbol (e.g., "1.234,56").
    pub fn display_amount(&self) -> String {
        let (thousands, decimal) = self.currency.separators();
        let divisor = 10_u64.pow(self.currency.decimal_places());
        let abs = self.amount_cents.unsigned_abs();
        let major = (abs / divisor).to_string();
        let minor = abs % divisor;

        let mut grouped = String::with_capacity(major.len() + major.len() / 3);
        for (i, ch) in major.chars().enumerate() {
            if i > 0 && (major.len() - i) % 3 == 0 {
                grouped.push(thousands);
            }
            grouped.push(ch);
        }

        let sign = if self.is_negative() { "-" } else { "" };
        let places = self.currency.decimal_places() as usize;
        format!("{sign}{grouped}{decimal}{minor:0places$}")
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}
