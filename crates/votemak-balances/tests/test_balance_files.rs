use std::io::Write;
use tempfile::NamedTempFile;
use votemak_balances::{
    normalize_balances, read_balance_csv, read_balance_json, write_balance_csv, BalanceError,
    BalanceInput, BalanceRecord, RawAmount,
};
use votemak_merkle::{Account, Amount};

const ALICE: &str = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";
const BOB: &str = "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359";

/// A legacy map file normalizes to checksummed accounts without flags
#[test]
fn test_legacy_map_file() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{"{}": 200, "{}": "300"}}"#,
        ALICE.to_lowercase(),
        BOB.to_uppercase().replacen("0X", "0x", 1)
    )
    .unwrap();

    let input = read_balance_json(file.path()).unwrap();
    let balances = normalize_balances(input).unwrap();

    let accounts: Vec<String> = balances.keys().map(|a| a.to_string()).collect();
    assert!(accounts.contains(&ALICE.to_string()));
    assert!(accounts.contains(&BOB.to_string()));
    assert!(balances.values().all(|b| b.flags.is_none()));
    assert_eq!(balances.len(), 2);
}

/// A record list written to CSV reads back and keeps its flags
#[test]
fn test_record_list_csv_keeps_flags() {
    let records = vec![
        BalanceRecord {
            address: ALICE.to_string(),
            earnings: RawAmount::new("10"),
            reasons: "socks,user".to_string(),
        },
        BalanceRecord {
            address: BOB.to_string(),
            earnings: RawAmount::new("20"),
            reasons: String::new(),
        },
    ];

    let file = NamedTempFile::new().unwrap();
    write_balance_csv(file.path(), &records).unwrap();
    let read = read_balance_csv(file.path()).unwrap();
    let balances = normalize_balances(BalanceInput::List(read)).unwrap();

    let alice = &balances[&ALICE.parse::<Account>().unwrap()];
    assert_eq!(alice.amount, Amount::from(10));
    let flags = alice.flags.as_ref().unwrap();
    assert!(flags["isSOCKS"]);
    assert!(flags["isUser"]);
    assert!(!flags["isLP"]);

    let bob = &balances[&BOB.parse::<Account>().unwrap()];
    assert!(bob.flags.is_none());
}

/// A mixed-case address with a broken checksum is an invalid address
#[test]
fn test_bad_checksum_rejected() {
    let broken = ALICE.replace('a', "A");
    let input = BalanceInput::List(vec![BalanceRecord {
        address: broken,
        earnings: RawAmount::new("1"),
        reasons: String::new(),
    }]);
    assert!(matches!(
        normalize_balances(input),
        Err(BalanceError::InvalidAddress(_))
    ));
}
