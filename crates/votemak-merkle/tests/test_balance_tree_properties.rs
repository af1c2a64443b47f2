use votemak_merkle::{
    verify_proof, Account, Amount, BalanceLeaf, BalanceProof, BalanceTree, TreeScheme, B256,
};

fn account(seed: u8) -> Account {
    let mut bytes = [0u8; 20];
    bytes[0] = seed;
    bytes[19] = seed.wrapping_mul(31);
    Account::from_bytes(bytes)
}

fn sample_balances() -> Vec<(Account, Amount)> {
    vec![
        (account(7), Amount::from(700)),
        (account(2), Amount::from(200)),
        (account(9), Amount::from(900)),
        (account(4), Amount::from(400)),
        (account(1), Amount::from(100)),
    ]
}

const SCHEMES: [TreeScheme; 2] = [TreeScheme::Sorted, TreeScheme::Positional];

/// Building twice from the same balances yields the same root
#[test]
fn test_root_is_deterministic() {
    for scheme in SCHEMES {
        let a = BalanceTree::new(sample_balances(), scheme).unwrap();
        let b = BalanceTree::new(sample_balances(), scheme).unwrap();
        assert_eq!(a.root(), b.root());
    }
}

/// Input order does not affect indices or root
#[test]
fn test_root_ignores_input_order() {
    for scheme in SCHEMES {
        let forward = BalanceTree::new(sample_balances(), scheme).unwrap();

        let mut reversed_input = sample_balances();
        reversed_input.reverse();
        let reversed = BalanceTree::new(reversed_input, scheme).unwrap();

        let mut rotated_input = sample_balances();
        rotated_input.rotate_left(2);
        let rotated = BalanceTree::new(rotated_input, scheme).unwrap();

        assert_eq!(forward.root(), reversed.root());
        assert_eq!(forward.root(), rotated.root());
        assert_eq!(forward.leaves(), reversed.leaves());
        for index in 0..forward.len() {
            let proof = forward.proof(index).unwrap();
            assert_eq!(proof, reversed.proof(index).unwrap());
            assert_eq!(proof, rotated.proof(index).unwrap());
        }
    }
}

/// Every leaf's generated proof verifies against the root
#[test]
fn test_every_leaf_round_trips() {
    for scheme in SCHEMES {
        let tree = BalanceTree::new(sample_balances(), scheme).unwrap();
        let root = tree.root();
        for leaf in tree.leaves() {
            let proof = tree.proof(leaf.index as usize).unwrap();
            assert!(verify_proof(
                scheme,
                leaf.index,
                leaf.account,
                leaf.amount,
                &proof,
                &root
            ));
        }
    }
}

/// Published hex proofs can be parsed back and still verify
#[test]
fn test_published_proofs_verify() {
    for scheme in SCHEMES {
        let tree = BalanceTree::new(sample_balances(), scheme).unwrap();
        let root = tree.root();
        for leaf in tree.leaves() {
            let published = tree.proof(leaf.index as usize).unwrap().hex_hashes();
            let parsed =
                BalanceProof::from_hex(scheme, leaf.index as usize, tree.len(), &published)
                    .unwrap();
            assert!(verify_proof(
                scheme,
                leaf.index,
                leaf.account,
                leaf.amount,
                &parsed,
                &root
            ));
        }
    }
}

/// Changing any of index, account or amount breaks verification
#[test]
fn test_tampered_claims_fail() {
    for scheme in SCHEMES {
        let tree = BalanceTree::new(sample_balances(), scheme).unwrap();
        let root = tree.root();
        let leaf = tree.leaves()[2];
        let proof = tree.proof(2).unwrap();

        let more = Amount::from(leaf.amount.as_u256().to::<u64>() + 1);
        assert!(!verify_proof(
            scheme,
            leaf.index,
            leaf.account,
            more,
            &proof,
            &root
        ));
        assert!(!verify_proof(
            scheme,
            leaf.index,
            account(99),
            leaf.amount,
            &proof,
            &root
        ));
        assert!(!verify_proof(
            scheme,
            leaf.index + 1,
            leaf.account,
            leaf.amount,
            &proof,
            &root
        ));
        assert!(!verify_proof(
            scheme,
            leaf.index,
            leaf.account,
            leaf.amount,
            &proof,
            &B256::repeat_byte(0x11)
        ));
    }
}

/// Flipping one byte of any proof sibling breaks verification
#[test]
fn test_tampered_proof_elements_fail() {
    for scheme in SCHEMES {
        let tree = BalanceTree::new(sample_balances(), scheme).unwrap();
        let root = tree.root();
        for leaf in tree.leaves() {
            let proof = tree.proof(leaf.index as usize).unwrap();
            for step in 0..proof.len() {
                for byte in [0, 31] {
                    let mut steps = proof.steps().to_vec();
                    steps[step].sibling.0[byte] ^= 0x01;
                    let tampered = BalanceProof::new(steps);
                    assert!(
                        !verify_proof(
                            scheme,
                            leaf.index,
                            leaf.account,
                            leaf.amount,
                            &tampered,
                            &root
                        ),
                        "{scheme} leaf {} step {step} byte {byte}",
                        leaf.index
                    );
                }
            }
        }
    }
}

/// A single-leaf tree has an empty proof and the leaf hash as root
#[test]
fn test_single_leaf_tree() {
    for scheme in SCHEMES {
        let only = (account(5), Amount::from(1));
        let tree = BalanceTree::new(vec![only], scheme).unwrap();
        let expected = BalanceLeaf::new(0, only.0, only.1).to_hash();
        assert_eq!(tree.root(), expected);

        let proof = tree.proof(0).unwrap();
        assert!(proof.is_empty());
        assert!(verify_proof(scheme, 0, only.0, only.1, &proof, &tree.root()));
    }
}
