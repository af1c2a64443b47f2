use std::collections::BTreeMap;
use std::path::PathBuf;
use votemak_merkle::{Account, Amount};
use votemak_sdk::{
    bribes_from_events,
    records::{BribeRecords, SystemVotes, UserVotesList},
    validation::{validate_bribes, validate_merkle_tree, validate_votes},
    MultiMerkleDistributorInfo, UserClaimsList, ValidationReport,
};

use super::read_json;
use crate::config::VotemakConfig;
use crate::error::{CliError, CliResult};

pub struct ValidateInputs {
    pub config: PathBuf,
    pub user_votes: PathBuf,
    pub system_votes: PathBuf,
    pub bribes_in: PathBuf,
    pub balances: PathBuf,
    pub distributor_info: PathBuf,
    pub user_claims: PathBuf,
    pub chain_id: Option<u64>,
}

pub fn execute(inputs: ValidateInputs) -> CliResult<()> {
    let config = VotemakConfig::load(&inputs.config)?;
    config.contracts_for(inputs.chain_id)?;

    let user_votes: UserVotesList = read_json(&inputs.user_votes)?;
    let system_votes: SystemVotes = read_json(&inputs.system_votes)?;
    let bribe_records: BribeRecords = read_json(&inputs.bribes_in)?;
    let balances: BTreeMap<Account, Amount> = read_json(&inputs.balances)?;
    let distributor_info: MultiMerkleDistributorInfo = read_json(&inputs.distributor_info)?;
    let user_claims: UserClaimsList = read_json(&inputs.user_claims)?;

    let mut report = ValidationReport::default();

    println!("🗳️  Validating votes...");
    report.merge(validate_votes(
        &user_votes,
        &system_votes,
        config.validation.user_votes_epsilon,
    ));

    println!("💰 Validating bribes...");
    let bribes = bribes_from_events(&bribe_records, config.fees.initial_fee)?;
    report.merge(validate_bribes(&bribes, &balances));

    println!("🌳 Validating claims...");
    report.merge(validate_merkle_tree(&bribes, &distributor_info, &user_claims));

    if report.is_valid() {
        println!("✅ No mismatches found");
        return Ok(());
    }

    println!("❌ {} mismatches:", report.mismatches.len());
    for mismatch in &report.mismatches {
        println!("   {}", mismatch);
    }
    Err(CliError::ValidationFailed(report.mismatches.len()))
}
