use alloy_primitives::U256;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A token amount with `uint256` semantics.
///
/// Every arithmetic helper is checked; nothing here wraps or rounds up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(U256);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseAmountError {
    #[error("empty amount")]
    Empty,
    #[error("negative amount: {0}")]
    Negative(String),
    #[error("not a decimal integer: {0}")]
    NotDecimal(String),
    #[error("amount exceeds uint256: {0}")]
    Overflow(String),
}

impl Amount {
    pub const ZERO: Amount = Amount(U256::ZERO);
    pub const MAX: Amount = Amount(U256::MAX);

    pub const fn new(value: U256) -> Self {
        Self(value)
    }

    pub fn as_u256(&self) -> U256 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn checked_add(self, rhs: Amount) -> Option<Amount> {
        self.0.checked_add(rhs.0).map(Amount)
    }

    pub fn checked_sub(self, rhs: Amount) -> Option<Amount> {
        self.0.checked_sub(rhs.0).map(Amount)
    }

    pub fn checked_mul(self, rhs: Amount) -> Option<Amount> {
        self.0.checked_mul(rhs.0).map(Amount)
    }

    /// `floor(self * numerator / denominator)`, the same truncating integer
    /// division the contracts perform. `None` on overflow or a zero denominator.
    pub fn mul_div_floor(self, numerator: Amount, denominator: Amount) -> Option<Amount> {
        self.0
            .checked_mul(numerator.0)?
            .checked_div(denominator.0)
            .map(Amount)
    }

    /// Sum of all amounts, `None` if the total overflows.
    pub fn checked_sum<I: IntoIterator<Item = Amount>>(amounts: I) -> Option<Amount> {
        amounts
            .into_iter()
            .try_fold(Amount::ZERO, Amount::checked_add)
    }

    pub fn abs_diff(self, other: Amount) -> Amount {
        if self >= other {
            Amount(self.0 - other.0)
        } else {
            Amount(other.0 - self.0)
        }
    }

    /// 32-byte big-endian form, as `abi.encodePacked(uint256)` lays it out.
    pub fn to_be_bytes(&self) -> [u8; 32] {
        self.0.to_be_bytes::<32>()
    }
}

impl From<u64> for Amount {
    fn from(value: u64) -> Self {
        Self(U256::from(value))
    }
}

impl From<U256> for Amount {
    fn from(value: U256) -> Self {
        Self(value)
    }
}

impl FromStr for Amount {
    type Err = ParseAmountError;

    /// Plain base-10 digits only. Zero parses fine; callers that need a
    /// positive amount check that themselves.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(ParseAmountError::Empty);
        }
        if s.starts_with('-') {
            return Err(ParseAmountError::Negative(s.to_string()));
        }
        if !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ParseAmountError::NotDecimal(s.to_string()));
        }
        s.parse::<U256>()
            .map(Amount)
            .map_err(|_| ParseAmountError::Overflow(s.to_string()))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct AmountVisitor;

        impl serde::de::Visitor<'_> for AmountVisitor {
            type Value = Amount;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a decimal string or a non-negative integer")
            }

            fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<Amount, E> {
                Amount::from_str(v).map_err(E::custom)
            }

            fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<Amount, E> {
                Ok(Amount::from(v))
            }

            fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<Amount, E> {
                u64::try_from(v)
                    .map(Amount::from)
                    .map_err(|_| E::custom(ParseAmountError::Negative(v.to_string())))
            }
        }

        deserializer.deserialize_any(AmountVisitor)
    }
}
