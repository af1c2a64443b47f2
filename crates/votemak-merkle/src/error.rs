use crate::Account;

pub type MerkleResult<T> = Result<T, MerkleError>;

#[derive(Debug, thiserror::Error)]
pub enum MerkleError {
    #[error("Leaf index {index} out of range for a tree of {leaf_count} leaves")]
    LeafIndexOutOfRange { index: usize, leaf_count: usize },

    #[error("Account not found in tree: {0}")]
    AccountNotFound(Account),

    #[error("Duplicate address: {0}")]
    DuplicateAccount(Account),

    #[error("Invalid amount for account: {0} (must be greater than zero)")]
    ZeroAmount(Account),

    #[error("Proof has {found} hashes, expected {expected} for this leaf position")]
    ProofLengthMismatch { expected: usize, found: usize },

    #[error("Invalid hash: {0}")]
    InvalidHash(String),

    #[error("Invalid tree scheme: {0}")]
    InvalidTreeScheme(String),
}
