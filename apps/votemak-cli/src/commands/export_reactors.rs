use std::path::PathBuf;
use tracing::debug;
use votemak_sdk::{reactor_breakdown, records::UserVotesList};

use super::{read_json, write_json};
use crate::error::CliResult;

pub fn execute(user_votes: PathBuf, output_dir: PathBuf) -> CliResult<()> {
    let user_votes: UserVotesList = read_json(&user_votes)?;
    let breakdown = reactor_breakdown(&user_votes);

    std::fs::create_dir_all(&output_dir)?;
    for (reactor_key, votes) in &breakdown {
        let file_name = format!("{}.json", file_stem(reactor_key.as_str()));
        let path = output_dir.join(file_name);
        write_json(&path, votes)?;
        debug!(%reactor_key, voters = votes.len(), path = %path.display(), "exported reactor");
    }

    println!(
        "✅ Exported {} reactors to {}",
        breakdown.len(),
        output_dir.display()
    );
    Ok(())
}

/// Reactor keys become file names; anything but `[A-Za-z0-9_-]` is replaced.
fn file_stem(reactor_key: &str) -> String {
    reactor_key
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_stem() {
        assert_eq!(file_stem("0xabc123"), "0xabc123");
        assert_eq!(file_stem("../etc/passwd"), "___etc_passwd");
    }

    #[test]
    fn test_export_one_file_per_reactor() {
        let dir = tempfile::tempdir().unwrap();
        let user_votes = dir.path().join("userVotes.json");
        std::fs::write(
            &user_votes,
            r#"{
                "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed": {
                    "totalVotes": "10",
                    "allocations": [
                        {"reactorKey": "mkr", "amount": "4"},
                        {"reactorKey": "snx", "amount": "6"}
                    ]
                }
            }"#,
        )
        .unwrap();

        let output_dir = dir.path().join("reactors");
        execute(user_votes, output_dir.clone()).unwrap();

        let mkr: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(output_dir.join("mkr.json")).unwrap())
                .unwrap();
        assert_eq!(mkr["0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed"], "4");
        assert!(output_dir.join("snx.json").exists());
    }
}
