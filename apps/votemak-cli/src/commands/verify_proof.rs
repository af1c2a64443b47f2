use std::path::PathBuf;
use votemak_merkle::Account;
use votemak_sdk::MultiMerkleDistributorInfo;

use super::read_json;
use crate::error::{CliError, CliResult};

pub fn execute(distributor_info: PathBuf, token: String, account: String) -> CliResult<()> {
    let info: MultiMerkleDistributorInfo = read_json(&distributor_info)?;
    let token: Account = token.parse()?;
    let account: Account = account.parse()?;

    let distributor = info.get(&token).ok_or_else(|| {
        CliError::CommandExecution(format!("No merkle tree for token {}", token))
    })?;
    let claim = distributor.claims.get(&account).ok_or_else(|| {
        CliError::CommandExecution(format!("No claim for {} in token {}", account, token))
    })?;

    println!("🔍 Verifying claim for {} in token {}", account, token);
    println!("   Index: {}", claim.index);
    println!("   Amount: {}", claim.amount);
    println!("   Proof length: {}", claim.proof.len());
    println!("   Root: {}", distributor.merkle_root);

    if distributor.verify(&account, claim) {
        println!("✅ Proof is valid");
        Ok(())
    } else {
        println!("❌ Proof is INVALID");
        Err(CliError::CommandExecution("proof does not verify".to_string()))
    }
}
