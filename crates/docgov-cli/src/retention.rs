//! # Retention Subcommand
//!
//! Read-only scan of the state directory for records whose retention date
//! has been reached and for encryption keys overdue for rotation. Nothing is
//! deleted; the output is input for the retention-enforcement collaborator.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use docgov_core::Timestamp;
use docgov_state::{DocumentRecord, RetentionCalculator};

use crate::store::list_records;
use crate::CliContext;

/// Arguments for the `docgov retention` subcommand.
#[derive(Args, Debug)]
pub struct RetentionArgs {
    #[command(subcommand)]
    pub command: RetentionCommand,
}

/// Retention subcommands.
#[derive(Subcommand, Debug)]
pub enum RetentionCommand {
    /// List records past retention or key rotation.
    Scan {
        /// Evaluate at this instant (e.g., "2031-01-01T00:00:00Z") instead of now.
        #[arg(long)]
        now: Option<String>,
    },
}

/// Records selected by a scan.
#[derive(Debug, Default)]
pub struct RetentionReport {
    /// Records whose retention date has been reached.
    pub expired: Vec<DocumentRecord>,
    /// Records whose encryption key is overdue for rotation.
    pub rotation_overdue: Vec<DocumentRecord>,
}

/// Execute the retention subcommand.
pub fn run_retention(args: &RetentionArgs, ctx: &CliContext) -> Result<u8> {
    match &args.command {
        RetentionCommand::Scan { now } => {
            let now = match now {
                Some(s) => Timestamp::parse(s)
                    .with_context(|| format!("invalid --now value {s:?}"))?,
                None => Timestamp::now(),
            };
            let report = scan(ctx, now)?;
            print_report(&report, now);
            Ok(0)
        }
    }
}

/// Scan every record in the state directory at `now`.
pub fn scan(ctx: &CliContext, now: Timestamp) -> Result<RetentionReport> {
    let records = list_records(&ctx.state_dir)?;
    let calculator = RetentionCalculator::from_policy(&ctx.policy);
    let expired = calculator
        .due_for_retention(&records, now)
        .into_iter()
        .cloned()
        .collect();
    let rotation_overdue = records
        .iter()
        .filter(|r| r.encryption_metadata().is_some_and(|md| md.rotation_overdue_at(now)))
        .cloned()
        .collect();
    Ok(RetentionReport {
        expired,
        rotation_overdue,
    })
}

fn display_id(record: &DocumentRecord) -> String {
    record
        .id
        .as_ref()
        .map(|id| id.to_string())
        .unwrap_or_else(|| "(unassigned)".to_string())
}

fn print_report(report: &RetentionReport, now: Timestamp) {
    println!("Retention scan at {now}");
    if report.expired.is_empty() {
        println!("No documents past retention.");
    } else {
        println!("Past retention ({}):", report.expired.len());
        for record in &report.expired {
            println!("  {}: retention date {}", display_id(record), record.retention_date());
        }
    }
    if report.rotation_overdue.is_empty() {
        println!("No encryption keys overdue for rotation.");
    } else {
        println!("Key rotation overdue ({}):", report.rotation_overdue.len());
        for record in &report.rotation_overdue {
            if let Some(md) = record.encryption_metadata() {
                println!("  {}: key {} due {}", display_id(record), md.key_id, md.key_rotation_due);
            }
        }
    }
}
