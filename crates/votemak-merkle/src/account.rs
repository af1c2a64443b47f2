use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An EVM account identifier.
///
/// Ordering is the byte order of the 20-byte address, which is also the
/// order leaf indices are assigned in. The canonical text form is the
/// EIP-55 checksum string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Account(Address);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Found invalid address: {raw} ({reason})")]
pub struct ParseAccountError {
    pub raw: String,
    pub reason: &'static str,
}

impl Account {
    pub const ZERO: Account = Account(Address::ZERO);

    pub const fn new(address: Address) -> Self {
        Self(address)
    }

    pub fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(Address::from(bytes))
    }

    pub fn address(&self) -> Address {
        self.0
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0 .0 .0
    }

    /// EIP-55 mixed-case form.
    pub fn to_checksum(&self) -> String {
        self.0.to_checksum(None)
    }
}

impl FromStr for Account {
    type Err = ParseAccountError;

    /// Accepts `0x`-prefixed or bare hex. All-lowercase and all-uppercase
    /// digits are taken as is; mixed case must be a valid checksum.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let invalid = |reason| ParseAccountError {
            raw: raw.to_string(),
            reason,
        };

        let digits = raw.strip_prefix("0x").unwrap_or(raw);
        if digits.len() != 40 {
            return Err(invalid("expected 40 hex digits"));
        }
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid("non-hex character"));
        }

        let mut bytes = [0u8; 20];
        hex::decode_to_slice(digits, &mut bytes).map_err(|_| invalid("non-hex character"))?;
        let account = Account::from_bytes(bytes);

        let has_lower = digits.bytes().any(|b| b.is_ascii_lowercase());
        let has_upper = digits.bytes().any(|b| b.is_ascii_uppercase());
        if has_lower && has_upper && account.to_checksum()[2..] != *digits {
            return Err(invalid("bad checksum"));
        }

        Ok(account)
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_checksum())
    }
}

impl From<Address> for Account {
    fn from(address: Address) -> Self {
        Self(address)
    }
}

impl From<Account> for Address {
    fn from(account: Account) -> Self {
        account.0
    }
}

impl Serialize for Account {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_checksum())
    }
}

impl<'de> Deserialize<'de> for Account {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Account::from_str(&s).map_err(serde::de::Error::custom)
    }
}
