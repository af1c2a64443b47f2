use std::collections::BTreeMap;
use votemak_sdk::{
    Account, Amount, ClaimsLookup, TreeScheme, encode_claim_calldata, generate_calldata,
    generate_distribution, generate_merkle_trees, reactor_votes,
    records::{Allocation, Bribes, ReactorKey, ReactorTotal, SystemVotes, UserVotes, UserVotesList},
    updateMerkleRootsCall,
    validation::{DEFAULT_USER_VOTES_EPSILON, validate_bribes, validate_merkle_tree, validate_votes},
};
use alloy_sol_types::SolCall;

fn account(seed: u8) -> Account {
    Account::from_bytes([seed; 20])
}

fn fixture() -> (UserVotesList, Bribes) {
    let mut user_votes = UserVotesList::new();
    for seed in 1..=7u8 {
        let amount = seed as u64 * 1_000;
        let allocations = vec![
            Allocation {
                reactor_key: ReactorKey::from("mkr"),
                amount: Amount::from(amount),
            },
            Allocation {
                reactor_key: ReactorKey::from("snx"),
                amount: Amount::from(amount / 2),
            },
        ];
        user_votes.insert(
            account(seed),
            UserVotes {
                total_votes: Amount::from(amount + amount / 2),
                allocations,
            },
        );
    }

    let bribes = Bribes::from([
        (
            account(0xd0),
            BTreeMap::from([
                (ReactorKey::from("mkr"), Amount::from(1_000_003)),
                (ReactorKey::from("snx"), Amount::from(77)),
            ]),
        ),
        (
            account(0xe0),
            BTreeMap::from([(ReactorKey::from("snx"), Amount::from(5_000_000_000u64))]),
        ),
    ]);

    (user_votes, bribes)
}

/// Aggregate, build, publish and validate a two-token distribution
#[test]
fn test_end_to_end() {
    let (user_votes, bribes) = fixture();

    let totals = reactor_votes(&user_votes).unwrap();
    let distribution = generate_distribution(&bribes, &user_votes, &totals).unwrap();
    let (info, user_claims) = generate_merkle_trees(&distribution, TreeScheme::Sorted).unwrap();

    assert_eq!(info.len(), 2);
    for (token, distributor) in &info {
        let bribed = Amount::checked_sum(bribes[token].values().copied()).unwrap();
        assert!(distributor.token_total <= bribed);
        for account in distributor.claims.keys() {
            assert_eq!(distributor.verify_claim(account), Some(true));
        }
    }

    // publishing payload lines tokens up with roots
    let payload = generate_calldata(&info);
    let decoded = updateMerkleRootsCall::abi_decode(&payload.calldata, true).unwrap();
    for (i, token) in payload.tokens.iter().enumerate() {
        assert_eq!(decoded.tokens[i], token.address());
        assert_eq!(decoded.merkleRoots[i], info[token].merkle_root);
    }

    // validation finds nothing wrong
    let system_votes = SystemVotes {
        total_votes: Amount::checked_sum(user_votes.values().map(|v| v.total_votes)).unwrap(),
        votes: totals
            .iter()
            .map(|(key, total)| ReactorTotal {
                reactor_key: key.clone(),
                total_votes: *total,
            })
            .collect(),
    };
    let mut report = validate_votes(
        &user_votes,
        &system_votes,
        Amount::from(DEFAULT_USER_VOTES_EPSILON),
    );
    report.merge(validate_merkle_tree(&bribes, &info, &user_claims));
    let funded: BTreeMap<Account, Amount> = bribes
        .iter()
        .map(|(token, per_reactor)| {
            (*token, Amount::checked_sum(per_reactor.values().copied()).unwrap())
        })
        .collect();
    report.merge(validate_bribes(&bribes, &funded));
    assert!(report.is_valid(), "{:#?}", report);

    // a user can look up and submit their claims
    let lookup = ClaimsLookup::new(user_claims);
    let (who, claims) = lookup.lookup(&account(3).to_string().to_lowercase()).unwrap();
    assert_eq!(who, account(3));
    assert_eq!(claims.len(), 2);
    assert!(!encode_claim_calldata(&who, &claims).is_empty());
}

/// Building the same distribution twice gives identical artifacts
#[test]
fn test_artifacts_are_deterministic() {
    let (user_votes, bribes) = fixture();
    let totals = reactor_votes(&user_votes).unwrap();
    let distribution = generate_distribution(&bribes, &user_votes, &totals).unwrap();

    for scheme in [TreeScheme::Sorted, TreeScheme::Positional] {
        let (a, _) = generate_merkle_trees(&distribution, scheme).unwrap();
        let (b, _) = generate_merkle_trees(&distribution, scheme).unwrap();
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }
}
