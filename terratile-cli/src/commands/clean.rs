//! Clean command - remove aged run directories from the workspace.
//!
//! The pipeline itself never deletes run artifacts (failed runs are kept
//! for diagnostics), so the workspace accumulates directories over time.
//! This command is the retention policy: purge everything, or only runs
//! older than a cutoff.

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use super::common::load_config;
use crate::error::CliError;

/// Arguments for the clean command.
pub struct CleanArgs {
    pub all: bool,
    pub older_than_days: Option<u64>,
    pub config: Option<PathBuf>,
}

/// Run the clean command.
pub fn run(args: CleanArgs) -> Result<(), CliError> {
    let config = load_config(args.config.as_deref())?;
    let root = &config.workspace_dir;

    if !root.exists() {
        println!("Workspace {} does not exist; nothing to clean", root.display());
        return Ok(());
    }

    let cutoff = match (args.all, args.older_than_days) {
        (true, _) => None,
        (false, Some(days)) => {
            Some(SystemTime::now() - Duration::from_secs(days * 24 * 60 * 60))
        }
        (false, None) => {
            return Err(CliError::InvalidInput(
                "specify --all or --older-than-days <N>".to_string(),
            ))
        }
    };

    let removed = clean_workspace(root, cutoff)?;
    println!(
        "Removed {} run director{} from {}",
        removed,
        if removed == 1 { "y" } else { "ies" },
        root.display()
    );

    Ok(())
}

/// Removes run directories under `root`; with a cutoff, only those not
/// modified since. Returns the number of directories removed.
fn clean_workspace(root: &Path, cutoff: Option<SystemTime>) -> Result<usize, CliError> {
    let entries = std::fs::read_dir(root).map_err(|error| CliError::Io {
        path: root.display().to_string(),
        error,
    })?;

    let mut removed = 0;
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }

        if let Some(cutoff) = cutoff {
            let modified = entry
                .metadata()
                .and_then(|m| m.modified())
                .unwrap_or(SystemTime::UNIX_EPOCH);
            if modified >= cutoff {
                continue;
            }
        }

        std::fs::remove_dir_all(&path).map_err(|error| CliError::Io {
            path: path.display().to_string(),
            error,
        })?;
        removed += 1;
    }

    Ok(removed)
}
