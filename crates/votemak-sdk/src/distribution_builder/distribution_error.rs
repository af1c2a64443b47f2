use votemak_merkle::{Account, Amount};

#[derive(Debug, thiserror::Error)]
pub enum DistributionError {
    #[error("Amount overflow: {0}")]
    AmountOverflow(String),

    #[error(transparent)]
    Balance(#[from] votemak_balances::BalanceError),

    #[error("Chain id mismatch: configured for chain {configured}, connected to chain {observed}")]
    ChainIdMismatch { configured: u64, observed: u64 },

    #[error("Invalid fee {fee} (max {max})")]
    InvalidFee { fee: Amount, max: Amount },

    #[error(transparent)]
    Merkle(#[from] votemak_merkle::MerkleError),

    #[error("Generated proof for {account} does not verify against root {root}")]
    SelfCheckFailed { account: Account, root: String },

    #[error("Bribe for unknown proposal {proposal} (no reactor key)")]
    UnknownProposal { proposal: Account },
}

pub type DistributionResult<T> = std::result::Result<T, DistributionError>;
