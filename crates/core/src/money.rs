//! Monetary amounts in smallest currency units (e.g. cents).
//!
//! All amounts in the engine are integers: floating-point drift is how
//! ledgers stop reconciling. Sums are accumulated in `i128` so that no
//! realistic posting volume can overflow.

use core::ops::Neg;
use serde::{Deserialize, Serialize};

/// A monetary amount in smallest currency units.
///
/// Signed: balances of credit-normal accounts can swing negative, and
/// reversing entries mirror their originals. Individual posting amounts are
/// validated as strictly positive at the journal layer.
#[derive(
    Debug, Default, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    /// Construct from smallest-unit amount (e.g. cents).
    #[inline]
    pub const fn from_minor(minor: i64) -> Self {
        Money(minor)
    }

    /// The amount in smallest units.
    #[inline]
    pub const fn minor(&self) -> i64 {
        self.0
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Checked addition; `None` on overflow.
    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }

    /// Checked subtraction; `None` on overflow.
    pub fn checked_sub(self, other: Money) -> Option<Money> {
        self.0.checked_sub(other.0).map(Money)
    }

    /// Checked multiplication by a quantity; `None` on overflow.
    pub fn checked_mul(self, qty: i64) -> Option<Money> {
        self.0.checked_mul(qty).map(Money)
    }

    /// Sum an iterator of amounts without overflow (128-bit accumulator).
    pub fn sum<I: IntoIterator<Item = Money>>(amounts: I) -> i128 {
        amounts.into_iter().map(|m| m.0 as i128).sum()
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Money {
        Money(-self.0)
    }
}

impl core::fmt::Display for Money {
    /// Display with two decimal places (`1234` → `"12.34"`).
    ///
    /// Formatting only; stored amounts are always exact integers.
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn display_formats_minor_units() {
        assert_eq!(Money::from_minor(1234).to_string(), "12.34");
        assert_eq!(Money::from_minor(5).to_string(), "0.05");
        assert_eq!(Money::from_minor(-550).to_string(), "-5.50");
        assert_eq!(Money::ZERO.to_string(), "0.00");
    }

    #[test]
    fn checked_arithmetic_detects_overflow() {
        let max = Money::from_minor(i64::MAX);
        assert_eq!(max.checked_add(Money::from_minor(1)), None);
        assert_eq!(max.checked_mul(2), None);
        assert_eq!(
            Money::from_minor(10).checked_mul(3),
            Some(Money::from_minor(30))
        );
    }

    #[test]
    fn serializes_as_a_bare_integer() {
        let m = Money::from_minor(1234);
        assert_eq!(serde_json::to_string(&m).unwrap(), "1234");
        assert_eq!(serde_json::from_str::<Money>("-550").unwrap(), Money::from_minor(-550));
    }

    #[test]
    fn sum_uses_wide_accumulator() {
        let amounts = vec![Money::from_minor(i64::MAX), Money::from_minor(i64::MAX)];
        assert_eq!(Money::sum(amounts), 2 * (i64::MAX as i128));
    }

    proptest! {
        #[test]
        fn add_then_sub_is_identity(a in any::<i32>(), b in any::<i32>()) {
            let a = Money::from_minor(a as i64);
            let b = Money::from_minor(b as i64);
            let roundtrip = a.checked_add(b).unwrap().checked_sub(b).unwrap();
            prop_assert_eq!(roundtrip, a);
        }

        #[test]
        fn negation_mirrors_sign(v in any::<i32>()) {
            let m = Money::from_minor(v as i64);
            prop_assert_eq!((-m).minor(), -(v as i64));
        }
    }
}
