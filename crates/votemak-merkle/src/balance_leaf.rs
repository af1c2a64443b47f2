use alloy_primitives::{keccak256, B256, U256};

use crate::{Account, Amount};

/// Byte length of `abi.encodePacked(uint256 index, address account, uint256 amount)`.
pub const PACKED_LEAF_LEN: usize = 32 + 20 + 32;

/// The data committed to by one leaf of a balance tree.
///
/// The index is part of the preimage, so two leaves for the same account
/// and amount at different positions never share a hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalanceLeaf {
    pub index: u64,
    pub account: Account,
    pub amount: Amount,
}

impl BalanceLeaf {
    pub fn new(index: u64, account: Account, amount: Amount) -> Self {
        Self {
            index,
            account,
            amount,
        }
    }

    /// Solidity `abi.encodePacked(index, account, amount)`.
    pub fn encode_packed(&self) -> [u8; PACKED_LEAF_LEN] {
        let mut packed = [0u8; PACKED_LEAF_LEN];
        packed[..32].copy_from_slice(&U256::from(self.index).to_be_bytes::<32>());
        packed[32..52].copy_from_slice(self.account.as_bytes());
        packed[52..].copy_from_slice(&self.amount.to_be_bytes());
        packed
    }

    /// `keccak256(abi.encodePacked(index, account, amount))`, what the
    /// distributor contract recomputes in `claim`.
    pub fn to_hash(&self) -> B256 {
        keccak256(self.encode_packed())
    }
}
