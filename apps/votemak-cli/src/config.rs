use serde::{Deserialize, Serialize};
use std::path::Path;
use votemak_merkle::{Amount, TreeScheme};
use votemak_sdk::{validation::DEFAULT_USER_VOTES_EPSILON, ContractAddresses, Deployments};

use crate::error::{CliError, CliResult};

/// Configuration file structure (`votemak.yaml`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VotemakConfig {
    /// Chain the distribution is computed for
    #[serde(default = "default_chain_id")]
    pub chain_id: u64,

    /// Contract addresses per chain id
    pub deployments: Deployments,

    #[serde(default)]
    pub fees: FeeConfig,

    #[serde(default)]
    pub validation: ValidationConfig,

    /// Leaf layout and pair hashing of every tree
    #[serde(default)]
    pub tree_scheme: TreeScheme,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeeConfig {
    /// Fee (out of 10000) in effect before the first `NewFee` event
    #[serde(default)]
    pub initial_fee: Amount,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Allowed drift between a user's total votes and their allocations
    #[serde(default = "default_user_votes_epsilon")]
    pub user_votes_epsilon: Amount,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            user_votes_epsilon: default_user_votes_epsilon(),
        }
    }
}

fn default_chain_id() -> u64 {
    1
}

fn default_user_votes_epsilon() -> Amount {
    Amount::from(DEFAULT_USER_VOTES_EPSILON)
}

impl VotemakConfig {
    pub fn load(path: &Path) -> CliResult<Self> {
        let file = std::fs::File::open(path)?;
        let config: VotemakConfig = serde_yaml::from_reader(file)?;
        if config.deployments.chain_ids().next().is_none() {
            return Err(CliError::InvalidConfig(format!(
                "{}: no deployments configured",
                path.display()
            )));
        }
        Ok(config)
    }

    /// Refuse to run against a chain the configuration was not written for.
    pub fn contracts_for(&self, observed_chain_id: Option<u64>) -> CliResult<&ContractAddresses> {
        let observed = observed_chain_id.unwrap_or(self.chain_id);
        Ok(self.deployments.for_chain(self.chain_id, observed)?)
    }
}
