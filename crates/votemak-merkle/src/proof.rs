use alloy_primitives::B256;
use std::str::FromStr;

use crate::{Account, Amount, BalanceLeaf, MerkleError, MerkleResult, TreeScheme};

/// Which side of the running hash a sibling sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProofStep {
    pub sibling: B256,
    pub side: Side,
}

/// Sibling path from a leaf up to the root, bottom layer first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BalanceProof {
    steps: Vec<ProofStep>,
}

impl BalanceProof {
    pub fn new(steps: Vec<ProofStep>) -> Self {
        Self { steps }
    }

    /// Rebuild a proof from the bare hash list that gets published.
    ///
    /// For the positional scheme the sides follow from the leaf index and
    /// leaf count alone, so a hash list of the wrong length is rejected.
    /// The sorted scheme hashes pairs commutatively and the sides carry no
    /// information, every step is marked `Right`.
    pub fn from_published(
        scheme: TreeScheme,
        index: usize,
        leaf_count: usize,
        hashes: &[B256],
    ) -> MerkleResult<Self> {
        let steps = match scheme {
            TreeScheme::Sorted => hashes
                .iter()
                .map(|sibling| ProofStep {
                    sibling: *sibling,
                    side: Side::Right,
                })
                .collect(),
            TreeScheme::Positional => {
                if index >= leaf_count {
                    return Err(MerkleError::LeafIndexOutOfRange { index, leaf_count });
                }
                let sides = positional_sides(index, leaf_count);
                if sides.len() != hashes.len() {
                    return Err(MerkleError::ProofLengthMismatch {
                        expected: sides.len(),
                        found: hashes.len(),
                    });
                }
                sides
                    .into_iter()
                    .zip(hashes)
                    .map(|(side, sibling)| ProofStep {
                        sibling: *sibling,
                        side,
                    })
                    .collect()
            }
        };
        Ok(Self { steps })
    }

    /// Same as [`BalanceProof::from_published`] but from `0x`-hex strings.
    pub fn from_hex(
        scheme: TreeScheme,
        index: usize,
        leaf_count: usize,
        hashes: &[String],
    ) -> MerkleResult<Self> {
        let hashes = hashes
            .iter()
            .map(|h| B256::from_str(h).map_err(|_| MerkleError::InvalidHash(h.clone())))
            .collect::<MerkleResult<Vec<_>>>()?;
        Self::from_published(scheme, index, leaf_count, &hashes)
    }

    pub fn steps(&self) -> &[ProofStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn hashes(&self) -> Vec<B256> {
        self.steps.iter().map(|step| step.sibling).collect()
    }

    pub fn hex_hashes(&self) -> Vec<String> {
        self.steps
            .iter()
            .map(|step| format!("0x{}", hex::encode(step.sibling)))
            .collect()
    }

    /// Fold the path onto `leaf_hash`.
    pub fn compute_root(&self, scheme: TreeScheme, leaf_hash: B256) -> B256 {
        self.steps
            .iter()
            .fold(leaf_hash, |node, step| match step.side {
                Side::Left => scheme.hash_pair(&step.sibling, &node),
                Side::Right => scheme.hash_pair(&node, &step.sibling),
            })
    }
}

/// Sides a positional proof takes for `index` in a tree of `leaf_count`
/// leaves. Levels where the node is promoted contribute nothing.
fn positional_sides(index: usize, leaf_count: usize) -> Vec<Side> {
    let mut sides = Vec::new();
    let mut position = index;
    let mut width = leaf_count;

    while width > 1 {
        let sibling = position ^ 1;
        if sibling < width {
            sides.push(if position % 2 == 0 {
                Side::Right
            } else {
                Side::Left
            });
        }
        position /= 2;
        width = width.div_ceil(2);
    }

    sides
}

/// Recompute the leaf for `(index, account, amount)`, fold the proof and
/// compare with `root`. Pure; only equality matters.
pub fn verify_proof(
    scheme: TreeScheme,
    index: u64,
    account: Account,
    amount: Amount,
    proof: &BalanceProof,
    root: &B256,
) -> bool {
    let leaf_hash = BalanceLeaf::new(index, account, amount).to_hash();
    proof.compute_root(scheme, leaf_hash) == *root
}
