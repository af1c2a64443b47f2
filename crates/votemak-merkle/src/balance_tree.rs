use alloy_primitives::B256;
use tracing::debug;

use crate::{
    Account, Amount, BalanceLeaf, BalanceProof, MerkleError, MerkleResult, ProofStep, Side,
    TreeScheme,
};

/// An immutable keccak merkle tree over `(index, account, amount)` leaves.
///
/// Leaf indices are assigned after sorting accounts ascending, so any party
/// holding the same balance set derives the same indices and root no matter
/// what order the balances arrived in.
#[derive(Debug, Clone)]
pub struct BalanceTree {
    scheme: TreeScheme,
    /// Leaves in index order (ascending account).
    leaves: Vec<BalanceLeaf>,
    /// Leaf index -> position in the bottom layer.
    positions: Vec<usize>,
    /// Bottom layer first; the last layer holds the root.
    layers: Vec<Vec<B256>>,
}

impl BalanceTree {
    /// Build a tree from `(account, amount)` pairs in any order.
    ///
    /// Fails on a repeated account or a zero amount.
    pub fn new<I>(balances: I, scheme: TreeScheme) -> MerkleResult<Self>
    where
        I: IntoIterator<Item = (Account, Amount)>,
    {
        let mut balances: Vec<(Account, Amount)> = balances.into_iter().collect();
        balances.sort_by_key(|(account, _)| *account);

        for pair in balances.windows(2) {
            if pair[0].0 == pair[1].0 {
                return Err(MerkleError::DuplicateAccount(pair[0].0));
            }
        }

        let leaves = balances
            .into_iter()
            .enumerate()
            .map(|(index, (account, amount))| {
                if amount.is_zero() {
                    return Err(MerkleError::ZeroAmount(account));
                }
                Ok(BalanceLeaf::new(index as u64, account, amount))
            })
            .collect::<MerkleResult<Vec<_>>>()?;

        let leaf_hashes: Vec<B256> = leaves.iter().map(BalanceLeaf::to_hash).collect();

        let mut positions: Vec<usize> = (0..leaves.len()).collect();
        let bottom = match scheme {
            TreeScheme::Positional => leaf_hashes,
            TreeScheme::Sorted => {
                let mut order: Vec<usize> = (0..leaf_hashes.len()).collect();
                order.sort_by_key(|&index| leaf_hashes[index]);
                for (position, &index) in order.iter().enumerate() {
                    positions[index] = position;
                }
                order.iter().map(|&index| leaf_hashes[index]).collect()
            }
        };

        let layers = build_layers(bottom, scheme);

        debug!(
            leaves = leaves.len(),
            depth = layers.len().saturating_sub(1),
            %scheme,
            "built balance tree"
        );

        Ok(Self {
            scheme,
            leaves,
            positions,
            layers,
        })
    }

    pub fn scheme(&self) -> TreeScheme {
        self.scheme
    }

    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    pub fn leaves(&self) -> &[BalanceLeaf] {
        &self.leaves
    }

    /// Root hash; the zero hash for an empty tree, which is also what the
    /// distributor contract reports for a token that never had a root set.
    pub fn root(&self) -> B256 {
        self.layers
            .last()
            .and_then(|layer| layer.first())
            .copied()
            .unwrap_or(B256::ZERO)
    }

    pub fn hex_root(&self) -> String {
        format!("0x{}", hex::encode(self.root()))
    }

    /// Sum of all leaf amounts, `None` on overflow.
    pub fn total(&self) -> Option<Amount> {
        Amount::checked_sum(self.leaves.iter().map(|leaf| leaf.amount))
    }

    pub fn leaf(&self, index: usize) -> MerkleResult<&BalanceLeaf> {
        self.leaves
            .get(index)
            .ok_or(MerkleError::LeafIndexOutOfRange {
                index,
                leaf_count: self.leaves.len(),
            })
    }

    pub fn index_of(&self, account: &Account) -> MerkleResult<usize> {
        self.leaves
            .binary_search_by_key(account, |leaf| leaf.account)
            .map_err(|_| MerkleError::AccountNotFound(*account))
    }

    pub fn leaf_for_account(&self, account: &Account) -> MerkleResult<&BalanceLeaf> {
        self.leaf(self.index_of(account)?)
    }

    /// Sibling path for the leaf at `index`, with the side of every sibling.
    pub fn proof(&self, index: usize) -> MerkleResult<BalanceProof> {
        let mut position = *self
            .positions
            .get(index)
            .ok_or(MerkleError::LeafIndexOutOfRange {
                index,
                leaf_count: self.leaves.len(),
            })?;

        let mut steps = Vec::with_capacity(self.layers.len());
        for layer in self.layers.iter().take(self.layers.len() - 1) {
            let sibling = position ^ 1;
            if let Some(hash) = layer.get(sibling) {
                steps.push(ProofStep {
                    sibling: *hash,
                    side: if position % 2 == 0 {
                        Side::Right
                    } else {
                        Side::Left
                    },
                });
            }
            position /= 2;
        }

        Ok(BalanceProof::new(steps))
    }

    pub fn proof_for_account(&self, account: &Account) -> MerkleResult<BalanceProof> {
        self.proof(self.index_of(account)?)
    }

    /// Check a proof against this tree's root.
    pub fn verify(&self, leaf: &BalanceLeaf, proof: &BalanceProof) -> bool {
        crate::verify_proof(
            self.scheme,
            leaf.index,
            leaf.account,
            leaf.amount,
            proof,
            &self.root(),
        )
    }
}

/// Pair adjacent nodes bottom-up until one node is left. An unpaired last
/// node moves up unchanged.
fn build_layers(bottom: Vec<B256>, scheme: TreeScheme) -> Vec<Vec<B256>> {
    if bottom.is_empty() {
        return Vec::new();
    }

    let mut layers = vec![bottom];
    while let Some(current) = layers.last().filter(|layer| layer.len() > 1) {
        let next = current
            .chunks(2)
            .map(|pair| match pair {
                [left, right] => scheme.hash_pair(left, right),
                _ => pair[0],
            })
            .collect();
        layers.push(next);
    }

    layers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PositionalKeccakHasher, SortedKeccakHasher};
    use rs_merkle::MerkleTree;

    fn account(seed: u8) -> Account {
        Account::from_bytes([seed; 20])
    }

    fn balances(count: u8) -> Vec<(Account, Amount)> {
        (1..=count)
            .map(|seed| (account(seed), Amount::from(seed as u64 * 100)))
            .collect()
    }

    #[test]
    fn test_empty_tree_has_zero_root() {
        let tree = BalanceTree::new(Vec::new(), TreeScheme::Sorted).unwrap();
        assert_eq!(tree.root(), B256::ZERO);
        assert_eq!(
            tree.hex_root(),
            "0x0000000000000000000000000000000000000000000000000000000000000000"
        );
        assert!(matches!(
            tree.proof(0),
            Err(MerkleError::LeafIndexOutOfRange {
                index: 0,
                leaf_count: 0
            })
        ));
    }

    #[test]
    fn test_single_leaf_root_is_leaf_hash() {
        let tree = BalanceTree::new(balances(1), TreeScheme::Positional).unwrap();
        assert_eq!(tree.root(), tree.leaves()[0].to_hash());
        assert!(tree.proof(0).unwrap().is_empty());
    }

    #[test]
    fn test_indices_follow_account_order() {
        let mut input = balances(4);
        input.reverse();
        let tree = BalanceTree::new(input, TreeScheme::Sorted).unwrap();
        for (index, leaf) in tree.leaves().iter().enumerate() {
            assert_eq!(leaf.index, index as u64);
            assert_eq!(leaf.account, account(index as u8 + 1));
        }
    }

    #[test]
    fn test_duplicate_account_rejected() {
        let input = vec![
            (account(1), Amount::from(1)),
            (account(2), Amount::from(2)),
            (account(1), Amount::from(3)),
        ];
        let result = BalanceTree::new(input, TreeScheme::Sorted);
        assert!(matches!(result, Err(MerkleError::DuplicateAccount(a)) if a == account(1)));
    }

    #[test]
    fn test_zero_amount_rejected() {
        let input = vec![(account(1), Amount::ZERO)];
        let result = BalanceTree::new(input, TreeScheme::Sorted);
        assert!(matches!(result, Err(MerkleError::ZeroAmount(_))));
    }

    #[test]
    fn test_every_proof_verifies_for_odd_sizes() {
        for scheme in [TreeScheme::Sorted, TreeScheme::Positional] {
            for count in 1..=9 {
                let tree = BalanceTree::new(balances(count), scheme).unwrap();
                for (index, leaf) in tree.leaves().iter().enumerate() {
                    let proof = tree.proof(index).unwrap();
                    assert!(tree.verify(leaf, &proof), "{scheme} n={count} i={index}");
                }
            }
        }
    }

    #[test]
    fn test_positional_root_matches_rs_merkle() {
        let tree = BalanceTree::new(balances(7), TreeScheme::Positional).unwrap();
        let leaf_hashes: Vec<[u8; 32]> = tree.leaves().iter().map(|l| l.to_hash().0).collect();
        let reference = MerkleTree::<PositionalKeccakHasher>::from_leaves(&leaf_hashes);
        assert_eq!(reference.root(), Some(tree.root().0));
    }

    #[test]
    fn test_sorted_root_matches_rs_merkle_over_sorted_hashes() {
        let tree = BalanceTree::new(balances(6), TreeScheme::Sorted).unwrap();
        let mut leaf_hashes: Vec<[u8; 32]> =
            tree.leaves().iter().map(|l| l.to_hash().0).collect();
        leaf_hashes.sort();
        let reference = MerkleTree::<SortedKeccakHasher>::from_leaves(&leaf_hashes);
        assert_eq!(reference.root(), Some(tree.root().0));
    }

    #[test]
    fn test_proof_for_account() {
        let tree = BalanceTree::new(balances(5), TreeScheme::Sorted).unwrap();
        let target = account(3);
        let proof = tree.proof_for_account(&target).unwrap();
        let leaf = tree.leaf_for_account(&target).unwrap();
        assert!(tree.verify(leaf, &proof));
        assert!(matches!(
            tree.proof_for_account(&account(42)),
            Err(MerkleError::AccountNotFound(_))
        ));
    }

    #[test]
    fn test_total() {
        let tree = BalanceTree::new(balances(3), TreeScheme::Sorted).unwrap();
        assert_eq!(tree.total(), Some(Amount::from(600)));
    }
}
