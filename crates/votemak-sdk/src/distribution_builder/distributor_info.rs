use {
    crate::{DistributionError, DistributionResult},
    serde::{Deserialize, Serialize},
    std::collections::BTreeMap,
    tracing::debug,
    votemak_balances::{BalanceInput, Flags, NormalizedBalances, normalize_balances},
    votemak_merkle::{Account, Amount, B256, BalanceProof, BalanceTree, TreeScheme, verify_proof},
};

/// One account's claim in one token's tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    pub index: u64,
    pub amount: Amount,
    pub proof: Vec<B256>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flags: Option<Flags>,
}

/// Everything needed to recreate one token's tree and check that it holds
/// exactly the published claims. This is the file that gets pinned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MerkleDistributorInfo {
    pub merkle_root: B256,
    pub token_total: Amount,
    #[serde(default)]
    pub tree_scheme: TreeScheme,
    pub claims: BTreeMap<Account, Claim>,
}

impl MerkleDistributorInfo {
    /// Check one published claim against the published root.
    pub fn verify_claim(&self, account: &Account) -> Option<bool> {
        let claim = self.claims.get(account)?;
        Some(self.verify(account, claim))
    }

    /// Check an arbitrary claim record for `account` against this root.
    pub fn verify(&self, account: &Account, claim: &Claim) -> bool {
        let Ok(index) = usize::try_from(claim.index) else {
            return false;
        };
        let Ok(proof) =
            BalanceProof::from_published(self.tree_scheme, index, self.claims.len(), &claim.proof)
        else {
            return false;
        };
        verify_proof(
            self.tree_scheme,
            claim.index,
            *account,
            claim.amount,
            &proof,
            &self.merkle_root,
        )
    }

    /// Rebuild the tree from the published claims.
    pub fn rebuild_tree(&self) -> DistributionResult<BalanceTree> {
        let tree = BalanceTree::new(
            self.claims
                .iter()
                .map(|(account, claim)| (*account, claim.amount)),
            self.tree_scheme,
        )?;
        Ok(tree)
    }
}

/// Normalize a raw balance set and build its tree and claims.
pub fn parse_balance_map(
    input: BalanceInput,
    scheme: TreeScheme,
) -> DistributionResult<MerkleDistributorInfo> {
    let balances = normalize_balances(input)?;
    build_distributor_info(&balances, scheme)
}

/// Build the tree and claims for an already-normalized balance set.
///
/// Every generated proof is verified against the new root before returning.
pub fn build_distributor_info(
    balances: &NormalizedBalances,
    scheme: TreeScheme,
) -> DistributionResult<MerkleDistributorInfo> {
    let tree = BalanceTree::new(
        balances
            .iter()
            .map(|(account, balance)| (*account, balance.amount)),
        scheme,
    )?;
    let root = tree.root();

    let mut claims = BTreeMap::new();
    for (position, leaf) in tree.leaves().iter().enumerate() {
        let proof = tree.proof(position)?;
        if !tree.verify(leaf, &proof) {
            return Err(DistributionError::SelfCheckFailed {
                account: leaf.account,
                root: tree.hex_root(),
            });
        }

        let flags = balances
            .get(&leaf.account)
            .and_then(|balance| balance.flags.clone());
        claims.insert(
            leaf.account,
            Claim {
                index: leaf.index,
                amount: leaf.amount,
                proof: proof.hashes(),
                flags,
            },
        );
    }

    let token_total = tree
        .total()
        .ok_or_else(|| DistributionError::AmountOverflow("token total".to_string()))?;

    debug!(
        root = %tree.hex_root(),
        claims = claims.len(),
        %token_total,
        "built distributor info"
    );

    Ok(MerkleDistributorInfo {
        merkle_root: root,
        token_total,
        tree_scheme: scheme,
        claims,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use votemak_balances::{BalanceRecord, RawAmount};

    const ALICE: &str = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";
    const BOB: &str = "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359";
    const CAROL: &str = "0xdbF03B407c01E7cD3CBea99509d93f8DDDC8C6FB";

    fn list_input() -> BalanceInput {
        BalanceInput::List(vec![
            BalanceRecord {
                address: ALICE.to_string(),
                earnings: RawAmount::new("200"),
                reasons: "user".to_string(),
            },
            BalanceRecord {
                address: BOB.to_string(),
                earnings: RawAmount::new("300"),
                reasons: String::new(),
            },
            BalanceRecord {
                address: CAROL.to_string(),
                earnings: RawAmount::new("250"),
                reasons: "lp".to_string(),
            },
        ])
    }

    #[test]
    fn test_parse_balance_map() {
        let info = parse_balance_map(list_input(), TreeScheme::Sorted).unwrap();

        assert_eq!(info.token_total, Amount::from(750));
        assert_eq!(info.claims.len(), 3);

        let indices: Vec<u64> = info.claims.values().map(|claim| claim.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);

        let alice: Account = ALICE.parse().unwrap();
        let bob: Account = BOB.parse().unwrap();
        assert!(info.claims[&alice].flags.as_ref().unwrap()["isUser"]);
        assert!(info.claims[&bob].flags.is_none());

        for account in info.claims.keys() {
            assert_eq!(info.verify_claim(account), Some(true));
        }
    }

    #[test]
    fn test_json_shape() {
        let info = parse_balance_map(list_input(), TreeScheme::Sorted).unwrap();
        let json = serde_json::to_value(&info).unwrap();

        assert!(json["merkleRoot"].as_str().unwrap().starts_with("0x"));
        assert_eq!(json["tokenTotal"], "750");
        assert_eq!(json["treeScheme"], "sorted");

        let bob = &json["claims"][BOB];
        assert_eq!(bob["amount"], "300");
        assert!(bob.get("flags").is_none());
        assert!(json["claims"][ALICE].get("flags").is_some());

        let back: MerkleDistributorInfo = serde_json::from_value(json).unwrap();
        assert_eq!(back, info);
    }

    #[test]
    fn test_tampered_claim_fails_verification() {
        let info = parse_balance_map(list_input(), TreeScheme::Positional).unwrap();
        let alice: Account = ALICE.parse().unwrap();

        let mut claim = info.claims[&alice].clone();
        claim.amount = Amount::from(201);
        assert!(!info.verify(&alice, &claim));

        let bob: Account = BOB.parse().unwrap();
        assert!(!info.verify(&bob, &info.claims[&alice]));
    }

    #[test]
    fn test_rebuild_matches_root() {
        let info = parse_balance_map(list_input(), TreeScheme::Sorted).unwrap();
        assert_eq!(info.rebuild_tree().unwrap().root(), info.merkle_root);
    }
}
