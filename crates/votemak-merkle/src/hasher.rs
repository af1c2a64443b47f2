use alloy_primitives::{keccak256, B256};
use rs_merkle::Hasher;
use serde::{Deserialize, Serialize};

use crate::MerkleError;

/// Keccak hasher whose internal nodes hash the two children in ascending
/// byte order: `keccak256(min(a, b) || max(a, b))`.
///
/// This is the pairing OpenZeppelin's `MerkleProof.verify` uses, which is
/// what the distributor contract checks claims against. Because the pair
/// hash is commutative a proof is just a list of sibling hashes.
#[derive(Clone, Debug)]
pub struct SortedKeccakHasher;

impl Hasher for SortedKeccakHasher {
    type Hash = [u8; 32];

    fn hash(data: &[u8]) -> [u8; 32] {
        keccak256(data).0
    }

    fn concat_and_hash(left: &Self::Hash, right: Option<&Self::Hash>) -> Self::Hash {
        match right {
            Some(right) => {
                let (first, second) = if left <= right {
                    (left, right)
                } else {
                    (right, left)
                };
                let mut buf = [0u8; 64];
                buf[..32].copy_from_slice(first);
                buf[32..].copy_from_slice(second);
                keccak256(buf).0
            }
            // lone node is promoted unchanged
            None => *left,
        }
    }
}

/// Keccak hasher with order-sensitive internal nodes: `keccak256(left || right)`.
#[derive(Clone, Debug)]
pub struct PositionalKeccakHasher;

impl Hasher for PositionalKeccakHasher {
    type Hash = [u8; 32];

    fn hash(data: &[u8]) -> [u8; 32] {
        keccak256(data).0
    }

    fn concat_and_hash(left: &Self::Hash, right: Option<&Self::Hash>) -> Self::Hash {
        match right {
            Some(right) => {
                let mut buf = [0u8; 64];
                buf[..32].copy_from_slice(left);
                buf[32..].copy_from_slice(right);
                keccak256(buf).0
            }
            None => *left,
        }
    }
}

/// How a balance tree lays out its leaves and combines sibling pairs.
///
/// - `Sorted`: leaves sit in ascending hash order and pairs use
///   [`SortedKeccakHasher`]. Compatible with the on-chain verifier.
/// - `Positional`: leaves sit in leaf-index order and pairs use
///   [`PositionalKeccakHasher`]; proofs must be replayed with their sides.
///
/// In both schemes an unpaired node at the end of a layer moves up as is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TreeScheme {
    #[default]
    Sorted,
    Positional,
}

impl TreeScheme {
    pub fn hash_pair(&self, left: &B256, right: &B256) -> B256 {
        let hash = match self {
            TreeScheme::Sorted => SortedKeccakHasher::concat_and_hash(&left.0, Some(&right.0)),
            TreeScheme::Positional => {
                PositionalKeccakHasher::concat_and_hash(&left.0, Some(&right.0))
            }
        };
        B256::from(hash)
    }
}

impl std::fmt::Display for TreeScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use TreeScheme::*;
        let s = match self {
            Sorted => "sorted",
            Positional => "positional",
        };

        write!(f, "{}", s)
    }
}

impl std::str::FromStr for TreeScheme {
    type Err = MerkleError;

    fn from_str(s: &str) -> Result<Self, MerkleError> {
        match s {
            "sorted" => Ok(TreeScheme::Sorted),
            "positional" => Ok(TreeScheme::Positional),
            _ => Err(MerkleError::InvalidTreeScheme(s.to_string())),
        }
    }
}
