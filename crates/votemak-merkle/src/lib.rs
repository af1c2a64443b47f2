pub mod account;
pub mod amount;
pub mod balance_leaf;
pub mod balance_tree;
pub mod error;
pub mod hasher;
pub mod proof;

pub use account::{Account, ParseAccountError};
pub use amount::{Amount, ParseAmountError};
pub use balance_leaf::{BalanceLeaf, PACKED_LEAF_LEN};
pub use balance_tree::BalanceTree;
pub use error::{MerkleError, MerkleResult};
pub use hasher::{PositionalKeccakHasher, SortedKeccakHasher, TreeScheme};
pub use proof::{verify_proof, BalanceProof, ProofStep, Side};

pub use alloy_primitives::B256;

// Re-export key types from rs-merkle for convenience
pub use rs_merkle::{Hasher, MerkleTree};
