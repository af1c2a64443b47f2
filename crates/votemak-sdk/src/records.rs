/*!
# Input Records

Decoded chain data the distribution is computed from. Fetching these is
someone else's job; everything here is plain data with serde shapes matching
the JSON files the collectors write (`userVotes.json`, bribe event dumps).
*/

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use votemak_merkle::{Account, Amount};

/// Identifier of a reactor, the voting bucket bribes are attached to.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReactorKey(String);

impl ReactorKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReactorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ReactorKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Allocation {
    pub reactor_key: ReactorKey,
    pub amount: Amount,
}

/// One voter's snapshot: the total they hold and how it was split.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserVotes {
    pub total_votes: Amount,
    pub allocations: Vec<Allocation>,
}

pub type UserVotesList = BTreeMap<Account, UserVotes>;

/// Per-reactor vote totals as reported by the vote tracker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactorTotal {
    pub reactor_key: ReactorKey,
    pub total_votes: Amount,
}

/// The vote tracker's own view of the snapshot, used only for validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemVotes {
    pub total_votes: Amount,
    pub votes: Vec<ReactorTotal>,
}

/// Where an event sits in the chain. Orders by block, then log index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EventPosition {
    pub block_number: u64,
    pub log_index: u64,
}

/// `NewFee(uint256 fee)` from the bribe contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeEvent {
    pub block_number: u64,
    #[serde(default)]
    pub log_index: u64,
    pub fee: Amount,
}

impl FeeEvent {
    pub fn position(&self) -> EventPosition {
        EventPosition {
            block_number: self.block_number,
            log_index: self.log_index,
        }
    }
}

/// `NewBribe(proposal, token, amount)` from the bribe contract. The
/// proposal is the placement token the bribe targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BribeEvent {
    pub block_number: u64,
    #[serde(default)]
    pub log_index: u64,
    pub proposal: Account,
    pub token: Account,
    pub amount: Amount,
}

impl BribeEvent {
    pub fn position(&self) -> EventPosition {
        EventPosition {
            block_number: self.block_number,
            log_index: self.log_index,
        }
    }
}

/// Everything needed to compute net bribes, as dumped by the event collector.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BribeRecords {
    #[serde(default)]
    pub fee_events: Vec<FeeEvent>,
    #[serde(default)]
    pub bribe_events: Vec<BribeEvent>,
    /// Placement token (bribe proposal) -> reactor key.
    #[serde(default)]
    pub proposal_reactor_keys: BTreeMap<Account, ReactorKey>,
}

/// Summed allocations per reactor.
pub type ReactorVotes = BTreeMap<ReactorKey, Amount>;

/// Net bribe totals: token -> reactor -> amount.
pub type Bribes = BTreeMap<Account, BTreeMap<ReactorKey, Amount>>;

/// token -> account -> claimable amount.
pub type TokenDistribution = BTreeMap<Account, BTreeMap<Account, Amount>>;

/// reactor -> account -> allocated votes.
pub type ReactorBreakdown = BTreeMap<ReactorKey, BTreeMap<Account, Amount>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_votes_json_shape() {
        let json = r#"{
            "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed": {
                "totalVotes": "1000",
                "allocations": [
                    {"reactorKey": "0xabc", "amount": "400"},
                    {"reactorKey": "0xdef", "amount": "600"}
                ]
            }
        }"#;

        let list: UserVotesList = serde_json::from_str(json).unwrap();
        let votes = list.values().next().unwrap();
        assert_eq!(votes.total_votes, Amount::from(1000));
        assert_eq!(votes.allocations[1].reactor_key, ReactorKey::from("0xdef"));
    }

    #[test]
    fn test_event_position_ordering() {
        let earlier = EventPosition {
            block_number: 10,
            log_index: 5,
        };
        let later_log = EventPosition {
            block_number: 10,
            log_index: 6,
        };
        let later_block = EventPosition {
            block_number: 11,
            log_index: 0,
        };
        assert!(earlier < later_log);
        assert!(later_log < later_block);
    }

    #[test]
    fn test_bribe_records_defaults() {
        let records: BribeRecords = serde_json::from_str("{}").unwrap();
        assert!(records.fee_events.is_empty());
        assert!(records.bribe_events.is_empty());
        assert!(records.proposal_reactor_keys.is_empty());
    }
}
