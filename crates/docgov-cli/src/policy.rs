//! # Policy Subcommand
//!
//! Prints the effective policy after file loading, environment overrides,
//! and validation.

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::CliContext;

/// Arguments for the `docgov policy` subcommand.
#[derive(Args, Debug)]
pub struct PolicyArgs {
    #[command(subcommand)]
    pub command: PolicyCommand,
}

/// Policy subcommands.
#[derive(Subcommand, Debug)]
pub enum PolicyCommand {
    /// Print the effective policy as YAML.
    Show,
}

/// Execute the policy subcommand.
pub fn run_policy(args: &PolicyArgs, ctx: &CliContext) -> Result<u8> {
    match args.command {
        PolicyCommand::Show => {
            print!("{}", render_policy(ctx)?);
            Ok(0)
        }
    }
}

fn render_policy(ctx: &CliContext) -> Result<String> {
    Ok(serde_yaml::to_string(ctx.policy.as_ref())?)
}
