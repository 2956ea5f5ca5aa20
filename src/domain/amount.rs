//! Arbitrary-precision token amount with decimal-string transport.

use core::fmt;
use core::ops::{Add, AddAssign, Mul};
use core::str::FromStr;

use num_bigint::BigUint;
use num_traits::Zero;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::AmmError;

/// A non-negative amount of either pool asset, in its smallest unit.
///
/// Backed by an unbounded [`BigUint`], so `+` and `*` never overflow.
/// Only subtraction and division are fallible; they return `None` on
/// underflow or division by zero instead of panicking.
///
/// Amounts cross every external boundary (operation arguments, results and
/// the persisted pool record) as base-10 strings of unbounded length.
///
/// # Examples
///
/// ```
/// use carbon_amm::domain::Amount;
///
/// let a = Amount::new(100);
/// let b: Amount = "200".parse().expect("decimal");
/// assert_eq!(&a + &b, Amount::new(300));
/// assert_eq!(b.checked_sub(&a), Some(Amount::new(100)));
/// assert_eq!(b.checked_div(&Amount::new(3)), Some(Amount::new(66)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[must_use]
pub struct Amount(BigUint);

impl Amount {
    /// Zero amount.
    pub fn zero() -> Self {
        Self(BigUint::zero())
    }

    /// Creates an `Amount` from a machine integer.
    pub fn new(value: u128) -> Self {
        Self(BigUint::from(value))
    }

    /// Parses a base-10 string of ASCII digits.
    ///
    /// Zero is accepted; see [`Amount::parse_positive`] for operation inputs.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidAmount`] if the string is empty, signed,
    /// negative, or contains anything other than digits.
    pub fn parse(s: &str) -> crate::error::Result<Self> {
        if s.is_empty() {
            return Err(AmmError::InvalidAmount("amount is empty"));
        }
        if s.starts_with('-') {
            return Err(AmmError::InvalidAmount("amount must not be negative"));
        }
        if !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AmmError::InvalidAmount("amount is not a decimal integer"));
        }
        BigUint::parse_bytes(s.as_bytes(), 10)
            .map(Self)
            .ok_or(AmmError::InvalidAmount("amount is not a decimal integer"))
    }

    /// Parses a strictly positive amount.
    ///
    /// # Errors
    ///
    /// Same as [`Amount::parse`], plus [`AmmError::InvalidAmount`] for zero.
    pub fn parse_positive(s: &str) -> crate::error::Result<Self> {
        let amount = Self::parse(s)?;
        amount.ensure_positive()?;
        Ok(amount)
    }

    /// Fails with [`AmmError::InvalidAmount`] when the amount is zero.
    ///
    /// # Errors
    ///
    /// See above.
    pub fn ensure_positive(&self) -> crate::error::Result<()> {
        if self.is_zero() {
            return Err(AmmError::InvalidAmount("amount must be greater than zero"));
        }
        Ok(())
    }

    /// Returns the underlying big integer.
    #[must_use]
    pub const fn as_biguint(&self) -> &BigUint {
        &self.0
    }

    /// Returns `true` if the amount is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Checked subtraction. Returns `None` on underflow.
    #[must_use]
    pub fn checked_sub(&self, other: &Self) -> Option<Self> {
        if self.0 < other.0 {
            return None;
        }
        Some(Self(&self.0 - &other.0))
    }

    /// Checked floor division. Returns `None` if `divisor` is zero.
    #[must_use]
    pub fn checked_div(&self, divisor: &Self) -> Option<Self> {
        if divisor.is_zero() {
            return None;
        }
        Some(Self(&self.0 / &divisor.0))
    }
}

impl Add<&Amount> for &Amount {
    type Output = Amount;

    fn add(self, rhs: &Amount) -> Amount {
        Amount(&self.0 + &rhs.0)
    }
}

impl AddAssign<&Amount> for Amount {
    fn add_assign(&mut self, rhs: &Amount) {
        self.0 += &rhs.0;
    }
}

impl Mul<&Amount> for &Amount {
    type Output = Amount;

    fn mul(self, rhs: &Amount) -> Amount {
        Amount(&self.0 * &rhs.0)
    }
}

impl From<u128> for Amount {
    fn from(value: u128) -> Self {
        Self::new(value)
    }
}

impl From<u64> for Amount {
    fn from(value: u64) -> Self {
        Self(BigUint::from(value))
    }
}

impl From<BigUint> for Amount {
    fn from(value: BigUint) -> Self {
        Self(value)
    }
}

impl FromStr for Amount {
    type Err = AmmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_str_radix(10))
    }
}

struct AmountVisitor;

impl Visitor<'_> for AmountVisitor {
    type Value = Amount;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a non-negative decimal integer string")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Amount, E> {
        Amount::parse(v).map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_str(AmountVisitor)
    }
}
