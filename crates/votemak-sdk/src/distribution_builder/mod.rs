mod distribution_error;
mod distributor_info;

use {
    std::collections::BTreeMap,
    tracing::{debug, info},
    votemak_balances::normalize_amounts,
    votemak_merkle::{Account, TreeScheme},
};

pub use {
    distribution_error::{DistributionError, DistributionResult},
    distributor_info::{Claim, MerkleDistributorInfo, build_distributor_info, parse_balance_map},
};

use crate::records::TokenDistribution;

/// token -> that token's tree and claims.
pub type MultiMerkleDistributorInfo = BTreeMap<Account, MerkleDistributorInfo>;

/// token -> claim, for one account.
pub type UserClaims = BTreeMap<Account, Claim>;

/// account -> (token -> claim). The tree output re-keyed for lookups.
pub type UserClaimsList = BTreeMap<Account, UserClaims>;

/// Build one tree per token and the per-account view of all claims.
///
/// Tokens are independent: each gets its own leaf index space and root,
/// computed from that token's balances only.
pub fn generate_merkle_trees(
    distribution: &TokenDistribution,
    scheme: TreeScheme,
) -> DistributionResult<(MultiMerkleDistributorInfo, UserClaimsList)> {
    let mut multi_info = MultiMerkleDistributorInfo::new();
    let mut user_claims = UserClaimsList::new();

    for (token, balances) in distribution {
        let normalized = normalize_amounts(balances)?;
        let info = build_distributor_info(&normalized, scheme)?;

        debug!(
            %token,
            root = %info.merkle_root,
            claims = info.claims.len(),
            "built token tree"
        );

        for (account, claim) in &info.claims {
            user_claims
                .entry(*account)
                .or_default()
                .insert(*token, claim.clone());
        }
        multi_info.insert(*token, info);
    }

    info!(
        tokens = multi_info.len(),
        accounts = user_claims.len(),
        "generated merkle trees"
    );

    Ok((multi_info, user_claims))
}
