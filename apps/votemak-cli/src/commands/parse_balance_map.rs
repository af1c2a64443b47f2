use std::path::PathBuf;
use votemak_balances::read_balance_file;
use votemak_merkle::TreeScheme;
use votemak_sdk::parse_balance_map;

use super::write_json;
use crate::error::CliResult;

pub fn execute(input: PathBuf, output: PathBuf, tree_scheme: TreeScheme) -> CliResult<()> {
    println!("📄 Reading balances from {}", input.display());
    let balances = read_balance_file(&input)?;

    let info = parse_balance_map(balances, tree_scheme)?;
    write_json(&output, &info)?;

    println!("✅ Merkle root: {}", info.merkle_root);
    println!("   Token total: {}", info.token_total);
    println!("   Claims: {}", info.claims.len());
    println!("   Written to {}", output.display());

    Ok(())
}
