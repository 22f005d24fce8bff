use std::fmt;

use primitive_types::U256;
use serde::{Deserialize, Serialize};

/// A token amount in base units, 18 decimal places to the whole token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Money(pub U256);

impl Money {
    pub const DECIMALS: u32 = 18;
    // 10^18 fits in the low limb
    pub const ONE: Money = Money(U256([1_000_000_000_000_000_000, 0, 0, 0]));

    pub fn zero() -> Self {
        Money(U256::zero())
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Whole tokens, e.g. `Money::from_units(1)` is one token.
    pub fn from_units(units: u64) -> Self {
        // u64::MAX * 10^18 < 2^128
        Money(U256::from(units) * Self::ONE.0)
    }

    /// Base units, e.g. `Money::from_base_units(1)` is 10^-18 of a token.
    pub fn from_base_units(base: u128) -> Self {
        Money(U256::from(base))
    }

    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }

    pub fn checked_sub(self, other: Money) -> Option<Money> {
        self.0.checked_sub(other.0).map(Money)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / Self::ONE.0;
        let frac = (self.0 % Self::ONE.0).low_u64();
        if frac == 0 {
            write!(f, "{}", whole)
        } else {
            let frac = format!("{:018}", frac);
            write!(f, "{}.{}", whole, frac.trim_end_matches('0'))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_trims_fractional_zeros() {
        assert_eq!(Money::from_units(100).to_string(), "100");
        assert_eq!(
            Money::from_base_units(1_500_000_000_000_000_000).to_string(),
            "1.5"
        );
        assert_eq!(Money::from_base_units(1).to_string(), "0.000000000000000001");
    }

    #[test]
    fn test_checked_arithmetic_never_wraps() {
        assert_eq!(Money(U256::MAX).checked_add(Money::from_base_units(1)), None);
        assert_eq!(Money::zero().checked_sub(Money::from_base_units(1)), None);
        assert_eq!(
            Money::from_units(3).checked_sub(Money::ONE),
            Some(Money::from_units(2))
        );
    }

    #[test]
    fn test_amounts_beyond_u128_are_representable() {
        let big = Money(U256::from(u128::MAX));
        let sum = big.checked_add(big).unwrap();

        assert!(sum > big);
        assert_eq!(sum.checked_sub(big), Some(big));
        assert_eq!(
            Money(U256::from(u64::MAX)).checked_add(Money::ONE),
            Some(Money(U256::from(u64::MAX) + U256::from(1_000_000_000_000_000_000u64)))
        );
    }
}
