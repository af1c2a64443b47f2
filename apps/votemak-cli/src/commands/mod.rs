pub mod export_reactors;
pub mod generate_distribution;
pub mod lookup_claims;
pub mod parse_balance_map;
pub mod validate;
pub mod verify_proof;

use serde::{de::DeserializeOwned, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{CliError, CliResult};

/// Read a JSON file, naming the file in any error.
pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> CliResult<T> {
    let parse = || -> CliResult<T> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    };
    parse().map_err(|e| CliError::File {
        path: path.display().to_string(),
        source: Box::new(e),
    })
}

pub(crate) fn write_json<T: Serialize>(path: &Path, value: &T) -> CliResult<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.flush()?;
    Ok(())
}

/// Write several JSON artifacts as a set.
///
/// Everything is serialized and staged next to its target first. Targets are
/// only replaced once every staged file is on disk, and a failure while
/// staging removes what was staged.
pub(crate) fn write_json_set(files: &[(PathBuf, String)]) -> CliResult<()> {
    let staged: Vec<PathBuf> = files
        .iter()
        .map(|(path, _)| {
            let mut name = path.as_os_str().to_owned();
            name.push(".tmp");
            PathBuf::from(name)
        })
        .collect();

    for (index, ((_, contents), staging)) in files.iter().zip(&staged).enumerate() {
        if let Err(e) = std::fs::write(staging, contents) {
            for written in &staged[..index] {
                let _ = std::fs::remove_file(written);
            }
            return Err(CliError::File {
                path: staging.display().to_string(),
                source: Box::new(e.into()),
            });
        }
    }

    for ((path, _), staging) in files.iter().zip(&staged) {
        std::fs::rename(staging, path)?;
    }
    Ok(())
}
