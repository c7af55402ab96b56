use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Money type, currency-agnostic and never rounded
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);
    pub const ONE: Money = Money(Decimal::ONE);

    /// create from decimal, keeping every digit
    pub fn from_decimal(d: Decimal) -> Self {
        Money(d)
    }

    /// create from string with exact parsing
    pub fn from_str_exact(s: &str) -> Result<Self, rust_decimal::Error> {
        Ok(Money(Decimal::from_str_exact(s)?))
    }

    /// create from integer amount
    pub fn from_major(amount: i64) -> Self {
        Money(Decimal::from(amount))
    }

    /// get underlying decimal
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// strictly greater than zero
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// strictly less than zero
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    pub fn max(self, other: Self) -> Self {
        Money(self.0.max(other.0))
    }

    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }

    pub fn checked_sub(self, other: Money) -> Option<Money> {
        self.0.checked_sub(other.0).map(Money)
    }

    /// multiply by a whole count of periods (months, years)
    pub fn checked_times(self, count: i64) -> Option<Money> {
        self.0.checked_mul(Decimal::from(count)).map(Money)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Money::from_str_exact(s)
    }
}

impl From<Decimal> for Money {
    fn from(d: Decimal) -> Self {
        Money::from_decimal(d)
    }
}

impl From<i32> for Money {
    fn from(i: i32) -> Self {
        Money::from_major(i as i64)
    }
}

/// sum that reports overflow instead of panicking
pub fn checked_total(amounts: impl IntoIterator<Item = Money>) -> Option<Money> {
    amounts
        .into_iter()
        .try_fold(Money::ZERO, |acc, m| acc.checked_add(m))
}

/// rate charged per 100 units of principal per month
///
/// `Rate::per_hundred(dec!(2))` means 2 units of interest every month for each
/// 100 units lent. This is the convention used in informal personal lending,
/// not an annual percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct Rate(Decimal);

impl Rate {
    /// create from the per-hundred figure (e.g. 2 for "2 per 100")
    pub fn per_hundred(d: Decimal) -> Self {
        Rate(d)
    }

    /// create from a whole per-hundred figure
    pub fn from_units(units: u32) -> Self {
        Rate(Decimal::from(units))
    }

    /// get the per-hundred figure
    pub fn as_per_hundred(&self) -> Decimal {
        self.0
    }

    /// get as a plain fraction (2 per 100 -> 0.02)
    pub fn as_fraction(&self) -> Decimal {
        self.0 / dec!(100)
    }

    /// monthly interest on `principal`
    ///
    /// Multiplies before dividing by 100 so tiny principals keep their digits.
    /// `None` when the product leaves Decimal's range.
    pub fn monthly_interest(&self, principal: Money) -> Option<Money> {
        self.0
            .checked_mul(principal.as_decimal())
            .and_then(|product| product.checked_div(dec!(100)))
            .map(Money)
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} per 100/month", self.0)
    }
}

impl From<Decimal> for Rate {
    fn from(d: Decimal) -> Self {
        Rate::per_hundred(d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_keeps_precision() {
        let m = Money::from_str_exact("100.123456789123").unwrap();
        assert_eq!(m.to_string(), "100.123456789123");
    }

    #[test]
    fn test_monthly_interest() {
        let principal = Money::from_major(10_000);
        let rate = Rate::from_units(2);

        assert_eq!(rate.monthly_interest(principal), Some(Money::from_major(200)));
        assert_eq!(rate.as_fraction(), dec!(0.02));
    }

    #[test]
    fn test_monthly_interest_small_principal() {
        let principal = Money::from_decimal(dec!(0.03));
        let rate = Rate::per_hundred(dec!(1.5));

        assert_eq!(rate.monthly_interest(principal), Some(Money::from_decimal(dec!(0.00045))));
    }

    #[test]
    fn test_monthly_interest_overflow() {
        let rate = Rate::per_hundred(Decimal::MAX);
        assert_eq!(rate.monthly_interest(Money::from_major(1_000)), None);
    }

    #[test]
    fn test_sign_checks() {
        assert!(Money::from_major(5).is_positive());
        assert!(!Money::ZERO.is_positive());
        assert!(!Money::ZERO.is_negative());
        assert!(Money::from_major(-5).is_negative());
    }

    #[test]
    fn test_checked_total() {
        let total = checked_total([1, 2, 3].into_iter().map(Money::from_major));
        assert_eq!(total, Some(Money::from_major(6)));
        assert_eq!(checked_total(std::iter::empty()), Some(Money::ZERO));

        let half_max = Money::from_decimal(Decimal::MAX / dec!(2));
        assert_eq!(checked_total([half_max, half_max, Money::ONE]), None);
    }
}
