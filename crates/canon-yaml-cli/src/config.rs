//! Settings file for the CLI.
//!
//! ```toml
//! order = "dns"
//!
//! [dump]
//! indent = 4
//! default-style = "single-quoted"
//! ```
//!
//! Command-line flags win over the file; the file wins over built-in
//! defaults.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;

use canon_yaml::{DumpOptions, DumpOverrides, OrderPolicy};

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub order: Option<OrderPolicy>,
    pub dump: DumpOverrides,
}

impl Config {
    /// Read the settings file, or the defaults when there is none.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        debug!(path = %path.display(), ?config, "loaded config");
        Ok(config)
    }

    pub fn order(&self) -> OrderPolicy {
        self.order.unwrap_or_default()
    }

    /// Dump options with the file's `[dump]` table and then `flags` applied.
    pub fn dump_options(&self, flags: &DumpOverrides) -> DumpOptions {
        let overrides = self.dump.clone().merge(flags);
        DumpOptions::default().with_overrides(&overrides)
    }
}
