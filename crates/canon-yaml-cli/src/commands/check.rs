//! `canon-yaml check`: load files and report key-order problems.

use std::path::PathBuf;

use anyhow::Result;
use tracing::info;

use canon_yaml::{OrderPolicy, load_path};

use super::Outcome;

/// Arguments for the check command
#[derive(Debug)]
pub struct CheckArgs {
    pub order: OrderPolicy,
    pub files: Vec<PathBuf>,
}

/// Execute the check command
pub fn execute(args: CheckArgs) -> Result<Outcome> {
    let mut outcome = Outcome::default();

    for path in args.files {
        match load_path(&path, args.order) {
            Ok(_) => {
                println!("ok {}", path.display());
                outcome.passed.push(path);
            }
            Err(err) => {
                eprintln!("{}: {}", path.display(), err);
                outcome.failed.push(path);
            }
        }
    }

    info!(
        policy = %args.order,
        passed = outcome.passed.len(),
        failed = outcome.failed.len(),
        "check finished"
    );
    Ok(outcome)
}
