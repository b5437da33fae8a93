//! # docgov CLI entry point
//!
//! Parses command-line arguments, loads the policy, and dispatches to
//! subcommand handlers.
//!
//! Exit codes: `0` success, `1` usage, configuration, or I/O failure,
//! `2` the governance engine rejected the operation.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use docgov_cli::document::{run_document, DocumentArgs};
use docgov_cli::policy::{run_policy, PolicyArgs};
use docgov_cli::retention::{run_retention, RetentionArgs};
use docgov_cli::{CliContext, DEFAULT_STATE_DIR};
use docgov_core::DocumentPolicy;
use docgov_state::DocumentError;

/// Enrollment document governance.
///
/// Creates document records, drives their processing status, attaches
/// encryption and storage attestations, and scans for retention deadlines.
#[derive(Parser, Debug)]
#[command(name = "docgov", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a policy YAML file. `DOC_SERVICE_*` variables override it.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding document record files.
    #[arg(long, global = true, default_value = DEFAULT_STATE_DIR)]
    state_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Inspect the effective document policy.
    Policy(PolicyArgs),

    /// Document record lifecycle (create, status, encrypt, store, show, verify, retrieve).
    Document(DocumentArgs),

    /// Retention and key rotation scans.
    Retention(RetentionArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let policy = match DocumentPolicy::load(cli.config.as_deref())
        .context("failed to load document policy")
    {
        Ok(policy) => policy,
        Err(e) => {
            tracing::error!("{e:#}");
            return ExitCode::from(1);
        }
    };
    tracing::debug!(state_dir = %cli.state_dir.display(), "docgov starting");
    let ctx = CliContext::new(policy, cli.state_dir);

    let result = match cli.command {
        Commands::Policy(args) => run_policy(&args, &ctx),
        Commands::Document(args) => run_document(&args, &ctx),
        Commands::Retention(args) => run_retention(&args, &ctx),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => match e.downcast_ref::<DocumentError>() {
            Some(rejection) => {
                tracing::error!(kind = rejection.kind(), "{e:#}");
                ExitCode::from(2)
            }
            None => {
                tracing::error!("{e:#}");
                ExitCode::from(1)
            }
        },
    }
}
