use {
    crate::{DistributionError, DistributionResult},
    serde::{Deserialize, Serialize},
    std::collections::BTreeMap,
    votemak_merkle::Account,
};

/// Contract addresses on one chain. Each chain only carries the contracts
/// deployed there.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractAddresses {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multi_merkle_distributor: Option<Account>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub votemak_bribe: Option<Account>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vote_tracker: Option<Account>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multicall: Option<Account>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weth: Option<Account>,
}

/// chain id -> deployed contracts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Deployments(BTreeMap<u64, ContractAddresses>);

impl Deployments {
    pub fn new(chains: BTreeMap<u64, ContractAddresses>) -> Self {
        Self(chains)
    }

    pub fn chain_ids(&self) -> impl Iterator<Item = u64> + '_ {
        self.0.keys().copied()
    }

    /// Contracts for the chain we are actually talking to.
    ///
    /// Fails unless `observed` is the configured chain and has deployments.
    pub fn for_chain(
        &self,
        configured: u64,
        observed: u64,
    ) -> DistributionResult<&ContractAddresses> {
        if configured != observed {
            return Err(DistributionError::ChainIdMismatch {
                configured,
                observed,
            });
        }
        self.0
            .get(&observed)
            .ok_or(DistributionError::ChainIdMismatch {
                configured,
                observed,
            })
    }
}
