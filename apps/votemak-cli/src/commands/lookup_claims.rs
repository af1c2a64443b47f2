use std::path::PathBuf;
use votemak_sdk::{ClaimsLookup, UserClaimsList};

use super::read_json;
use crate::error::CliResult;

pub fn execute(user_claims: PathBuf, address: String) -> CliResult<()> {
    let claims: UserClaimsList = read_json(&user_claims)?;
    let lookup = ClaimsLookup::new(claims);

    let (account, claims) = lookup.lookup(&address)?;
    if claims.is_empty() {
        println!("ℹ️  No claims for {}", account);
    }

    let response = serde_json::json!({
        "address": account,
        "claims": claims,
    });
    println!("{}", serde_json::to_string_pretty(&response)?);

    Ok(())
}
