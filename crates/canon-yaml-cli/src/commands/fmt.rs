//! `canon-yaml fmt`: rewrite files in canonical key order.
//!
//! Files are loaded without order enforcement and dumped with the chosen
//! policy, so an unsorted file is fixed rather than rejected. Files that use
//! `!include` are reported and left alone: the dumped tree has the included
//! content spliced in and would lose the directive.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::{debug, info};

use canon_yaml::{DumpOptions, DumpOverrides, Loader, OrderPolicy, dump_to_string};

use super::Outcome;

/// Arguments for the fmt command
#[derive(Debug)]
pub struct FmtArgs {
    pub order: OrderPolicy,
    pub options: DumpOptions,
    /// Report instead of writing
    pub check: bool,
    pub files: Vec<PathBuf>,
}

/// Dump overrides for the flags given on the command line.
pub fn flag_overrides(indent: Option<usize>, flow: bool, no_explicit_start: bool) -> DumpOverrides {
    DumpOverrides {
        indent,
        flow_style: flow.then_some(true),
        explicit_start: no_explicit_start.then_some(false),
        ..DumpOverrides::default()
    }
}

/// Execute the fmt command
pub fn execute(args: FmtArgs) -> Result<Outcome> {
    let mut outcome = Outcome::default();

    for path in args.files {
        let formatted = match format_file(&path, args.order, &args.options) {
            Ok(formatted) => formatted,
            Err(err) => {
                eprintln!("{}: {:#}", path.display(), err);
                outcome.failed.push(path);
                continue;
            }
        };

        if !formatted.changed {
            debug!(path = %path.display(), "already formatted");
            outcome.passed.push(path);
            continue;
        }

        if args.check {
            println!("would reformat {}", path.display());
            outcome.failed.push(path);
        } else {
            fs::write(&path, &formatted.text)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!(path = %path.display(), "reformatted");
            outcome.passed.push(path);
        }
    }

    Ok(outcome)
}

struct Formatted {
    text: String,
    changed: bool,
}

fn format_file(path: &Path, order: OrderPolicy, options: &DumpOptions) -> Result<Formatted> {
    let original = fs::read_to_string(path)
        .with_context(|| format!("Failed to read input file: {}", path.display()))?;
    let mut loader = Loader::new(OrderPolicy::None);
    let value = loader.load_path(path)?;
    if let Some(first) = loader.included().first() {
        bail!("uses !include ({}), not rewritten", first.display());
    }
    let text = dump_to_string(&value, order, options)?;
    let changed = text != original;
    Ok(Formatted { text, changed })
}
