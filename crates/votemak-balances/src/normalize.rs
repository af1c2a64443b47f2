/*!
# Balance Normalization

Turns a [`BalanceInput`] into a canonical `account -> balance` table:
addresses parsed and checksummed, duplicates rejected, amounts strictly positive.
*/

use std::collections::BTreeMap;
use tracing::debug;
use votemak_merkle::{Account, Amount};

use crate::{
    errors::{BalanceError, BalanceResult},
    schemas::{BalanceInput, BalanceRecord, RawAmount},
};

/// Named classification flags attached to a claim.
pub type Flags = BTreeMap<String, bool>;

/// `(flag name, substring of the reasons field that sets it)`
pub const FLAG_VOCABULARY: &[(&str, &str)] =
    &[("isSOCKS", "socks"), ("isLP", "lp"), ("isUser", "user")];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedBalance {
    pub amount: Amount,
    /// `None` when the record had no reasons at all. An empty reasons
    /// string and a reasons string matching nothing are different: the
    /// latter carries every flag set to `false`.
    pub flags: Option<Flags>,
}

/// Canonical balances ordered by account, which is leaf index order.
pub type NormalizedBalances = BTreeMap<Account, NormalizedBalance>;

/// Derive flags from a free-text reasons field.
pub fn derive_flags(reasons: &str) -> Option<Flags> {
    if reasons.is_empty() {
        return None;
    }

    Some(
        FLAG_VOCABULARY
            .iter()
            .map(|(name, needle)| (name.to_string(), reasons.contains(needle)))
            .collect(),
    )
}

/// Validate and canonicalize a balance set.
///
/// The first bad record aborts the whole set.
pub fn normalize_balances(input: BalanceInput) -> BalanceResult<NormalizedBalances> {
    let records: Vec<BalanceRecord> = match input {
        BalanceInput::Map(map) => map
            .into_iter()
            .map(|(address, earnings)| BalanceRecord {
                address,
                earnings,
                reasons: String::new(),
            })
            .collect(),
        BalanceInput::List(records) => records,
    };

    let mut balances = NormalizedBalances::new();
    for record in records {
        let account: Account = record.address.parse()?;
        if balances.contains_key(&account) {
            return Err(BalanceError::DuplicateAddress(account));
        }

        let amount = parse_positive_amount(&record.address, &record.earnings)?;
        balances.insert(
            account,
            NormalizedBalance {
                amount,
                flags: derive_flags(&record.reasons),
            },
        );
    }

    debug!(accounts = balances.len(), "normalized balances");
    Ok(balances)
}

/// Normalize an already-typed `account -> amount` table, as produced by
/// the aggregator. Only the positivity check can fail here.
pub fn normalize_amounts<'a, I>(amounts: I) -> BalanceResult<NormalizedBalances>
where
    I: IntoIterator<Item = (&'a Account, &'a Amount)>,
{
    amounts
        .into_iter()
        .map(|(account, amount)| {
            if amount.is_zero() {
                return Err(BalanceError::InvalidAmount {
                    account: account.to_string(),
                    raw: amount.to_string(),
                    reason: "must be greater than zero".to_string(),
                });
            }
            Ok((
                *account,
                NormalizedBalance {
                    amount: *amount,
                    flags: None,
                },
            ))
        })
        .collect()
}

fn parse_positive_amount(address: &str, raw: &RawAmount) -> BalanceResult<Amount> {
    let invalid = |reason: String| BalanceError::InvalidAmount {
        account: address.to_string(),
        raw: raw.to_string(),
        reason,
    };

    let amount = raw.parse().map_err(|e| invalid(e.to_string()))?;
    if amount.is_zero() {
        return Err(invalid("must be greater than zero".to_string()));
    }
    Ok(amount)
}
