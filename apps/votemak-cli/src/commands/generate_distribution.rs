use std::path::PathBuf;
use tracing::info;
use votemak_sdk::{
    generate_calldata, generate_distribution, generate_merkle_trees, reactor_votes,
    records::{BribeRecords, UserVotesList},
};

use super::{read_json, write_json_set};
use crate::config::VotemakConfig;
use crate::error::CliResult;

pub const DISTRIBUTOR_INFO_FILE: &str = "multiMerkleDistributorInfo.json";
pub const USER_CLAIMS_FILE: &str = "userClaims.json";

pub fn execute(
    config: PathBuf,
    user_votes: PathBuf,
    bribes_in: PathBuf,
    output_dir: PathBuf,
    chain_id: Option<u64>,
) -> CliResult<()> {
    let config = VotemakConfig::load(&config)?;
    config.contracts_for(chain_id)?;

    let user_votes: UserVotesList = read_json(&user_votes)?;
    let bribe_records: BribeRecords = read_json(&bribes_in)?;

    println!("📊 Generating distribution...");
    let bribes = votemak_sdk::bribes_from_events(&bribe_records, config.fees.initial_fee)?;
    let totals = reactor_votes(&user_votes)?;
    let distribution = generate_distribution(&bribes, &user_votes, &totals)?;

    println!("🌳 Generating merkle trees ({})...", config.tree_scheme);
    let (distributor_info, user_claims) =
        generate_merkle_trees(&distribution, config.tree_scheme)?;

    let info_json = serde_json::to_string_pretty(&distributor_info)?;
    let claims_json = serde_json::to_string_pretty(&user_claims)?;

    std::fs::create_dir_all(&output_dir)?;
    let info_path = output_dir.join(DISTRIBUTOR_INFO_FILE);
    let claims_path = output_dir.join(USER_CLAIMS_FILE);
    write_json_set(&[
        (info_path.clone(), info_json),
        (claims_path.clone(), claims_json),
    ])?;
    info!(
        info = %info_path.display(),
        claims = %claims_path.display(),
        "wrote distribution artifacts"
    );

    let payload = generate_calldata(&distributor_info);
    println!("✅ Distribution generated");
    println!(
        "   Tokens: {:?}",
        payload.tokens.iter().map(ToString::to_string).collect::<Vec<_>>()
    );
    println!(
        "   Merkle roots: {:?}",
        payload.merkle_roots.iter().map(ToString::to_string).collect::<Vec<_>>()
    );
    println!("   updateMerkleRoots() calldata: {}", payload.hex_calldata());

    Ok(())
}
