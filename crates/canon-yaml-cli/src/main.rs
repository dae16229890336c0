//! canon-yaml CLI - Main entry point

use std::path::PathBuf;
use std::process;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use canon_yaml::OrderPolicy;

mod commands;
mod config;

use config::Config;

#[derive(Parser)]
#[command(name = "canon-yaml")]
#[command(version)]
#[command(about = "Check and format YAML files in canonical key order", long_about = None)]
struct Cli {
    /// TOML file with default settings
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load files and report any mapping whose keys are out of order
    Check {
        /// Key order to enforce (natural, dns or none)
        #[arg(long, value_name = "POLICY")]
        order: Option<OrderPolicy>,

        /// Files to check
        #[arg(required = true, value_name = "FILE")]
        files: Vec<PathBuf>,
    },

    /// Rewrite files with every mapping in canonical order
    Fmt {
        /// Key order to write (natural or dns)
        #[arg(long, value_name = "POLICY")]
        order: Option<OrderPolicy>,

        /// Spaces per nesting level
        #[arg(long, value_name = "N")]
        indent: Option<usize>,

        /// Write collections in flow style
        #[arg(long)]
        flow: bool,

        /// Omit the leading `---`
        #[arg(long)]
        no_explicit_start: bool,

        /// Report files that would change without writing them
        #[arg(long)]
        check: bool,

        /// Files to format
        #[arg(required = true, value_name = "FILE")]
        files: Vec<PathBuf>,
    },
}

fn main() {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "canon_yaml=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run() {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(2);
        }
    }
}

/// Run the selected command. `Ok(false)` means some file failed.
fn run() -> Result<bool> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;

    let outcome = match cli.command {
        Commands::Check { order, files } => commands::check::execute(commands::check::CheckArgs {
            order: order.unwrap_or_else(|| config.order()),
            files,
        }),
        Commands::Fmt {
            order,
            indent,
            flow,
            no_explicit_start,
            check,
            files,
        } => commands::fmt::execute(commands::fmt::FmtArgs {
            order: order.unwrap_or_else(|| config.order()),
            options: config.dump_options(&commands::fmt::flag_overrides(
                indent,
                flow,
                no_explicit_start,
            )),
            check,
            files,
        }),
    }?;

    Ok(outcome.succeeded())
}
