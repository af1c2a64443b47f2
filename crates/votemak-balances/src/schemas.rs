/*!
# Balance Input Schemas

The two shapes a balance set arrives in:

- the legacy keyed map, `{ "<address>": <amount> }`, amount a JSON integer or a string
- the record list, `[{ "address", "earnings", "reasons" }]`, also stored as `balances.csv`

Both decode into [`BalanceInput`], whose variants are matched exhaustively by the
normalizer. Nothing here validates addresses or amounts; that is the normalizer's job.
*/

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use votemak_merkle::{Amount, ParseAmountError};

/// Expected headers for balances.csv in exact order
pub const BALANCE_CSV_HEADERS: &[&str] = &["address", "earnings", "reasons"];

/// A balance set in either accepted shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BalanceInput {
    /// Legacy `{ address: amount }` map. Entries carry no reasons and so no flags.
    Map(BTreeMap<String, RawAmount>),
    /// Explicit record list.
    List(Vec<BalanceRecord>),
}

/// One row of the record-list shape.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BalanceRecord {
    pub address: String,
    pub earnings: RawAmount,
    #[serde(default)]
    pub reasons: String,
}

/// Row structure for balances.csv
///
/// Every column is read as text so large earnings never pass through a float.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BalanceCsvRow {
    pub address: String,
    pub earnings: String,
    pub reasons: String,
}

impl From<BalanceCsvRow> for BalanceRecord {
    fn from(row: BalanceCsvRow) -> Self {
        Self {
            address: row.address,
            earnings: RawAmount::new(row.earnings),
            reasons: row.reasons,
        }
    }
}

impl From<&BalanceRecord> for BalanceCsvRow {
    fn from(record: &BalanceRecord) -> Self {
        Self {
            address: record.address.clone(),
            earnings: record.earnings.as_str().to_string(),
            reasons: record.reasons.clone(),
        }
    }
}

/// An amount exactly as it appeared in the input, before validation.
///
/// JSON integers and strings are both kept as text. Accepted forms on
/// [`RawAmount::parse`] are plain decimal digits and `0x`-prefixed hex.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RawAmount(String);

impl RawAmount {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn parse(&self) -> Result<Amount, ParseAmountError> {
        let raw = self.0.as_str();
        match raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
            Some("") => Err(ParseAmountError::Empty),
            Some(digits) => {
                if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
                    return Err(ParseAmountError::NotDecimal(raw.to_string()));
                }
                U256::from_str_radix(digits, 16)
                    .map(Amount::new)
                    .map_err(|_| ParseAmountError::Overflow(raw.to_string()))
            }
            None => raw.parse(),
        }
    }
}

impl fmt::Display for RawAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Amount> for RawAmount {
    fn from(amount: Amount) -> Self {
        Self(amount.to_string())
    }
}

// ================================================================================================
// Custom Serde Functions
// ================================================================================================

impl Serialize for RawAmount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for RawAmount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct RawAmountVisitor;

        impl serde::de::Visitor<'_> for RawAmountVisitor {
            type Value = RawAmount;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an integer or a string amount")
            }

            fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<RawAmount, E> {
                Ok(RawAmount(v.to_string()))
            }

            fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<RawAmount, E> {
                Ok(RawAmount(v.to_string()))
            }

            fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<RawAmount, E> {
                Ok(RawAmount(v.to_string()))
            }

            // Kept in exponent/fraction form so it fails amount parsing
            // instead of being silently rounded.
            fn visit_f64<E: serde::de::Error>(self, v: f64) -> Result<RawAmount, E> {
                Ok(RawAmount(format!("{v:?}")))
            }
        }

        deserializer.deserialize_any(RawAmountVisitor)
    }
}

// ================================================================================================
// Tests
// ================================================================================================
