//! # Document Subcommand
//!
//! Record lifecycle commands. Each command loads at most one record, runs
//! one engine operation, and writes the record back only if the operation
//! succeeded.
//!
//! ## Subcommands
//!
//! - `create`: validate a submission and persist a new `PENDING` record.
//! - `status`: change status (optionally under strict ordering).
//! - `encrypt`: attest encryption with the policy algorithm and attach it.
//! - `store`: hash the stored bytes and attach the storage location.
//! - `show`: print a summary and the audit trail.
//! - `verify`: re-check record invariants, and content integrity if given bytes.
//! - `retrieve`: journal a hand-out of a completed, encrypted document.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use docgov_core::{ContentDigest, DocumentId};
use docgov_state::{
    DocumentRecord, EncryptionMetadata, EncryptionMetadataValidator, GovernanceEngine,
    LifecycleController, StrictTransitions,
};

use crate::store::{load_record, save_record};
use crate::CliContext;

/// Arguments for the `docgov document` subcommand.
#[derive(Args, Debug)]
pub struct DocumentArgs {
    #[command(subcommand)]
    pub command: DocumentCommand,
}

/// Document subcommands.
#[derive(Subcommand, Debug)]
pub enum DocumentCommand {
    /// Create a new document record in PENDING status.
    Create {
        /// Enrollment the document belongs to.
        #[arg(long)]
        enrollment_id: String,
        /// Document classification (e.g., "CPF", "RG").
        #[arg(long)]
        document_type: String,
        /// Original filename.
        #[arg(long)]
        filename: String,
        /// MIME type, checked against the policy allow-list.
        #[arg(long)]
        content_type: String,
        /// Size in bytes.
        #[arg(long = "size")]
        size_bytes: u64,
    },

    /// Change a document's processing status.
    Status {
        /// Document identifier.
        #[arg(long)]
        id: String,
        /// Target status (pending, processing, validating, encrypting, completed, failed).
        #[arg(long)]
        status: String,
        /// Reason recorded in the audit trail.
        #[arg(long, default_value = "")]
        reason: String,
        /// Enforce pipeline ordering instead of accepting any status.
        #[arg(long)]
        strict: bool,
    },

    /// Attest encryption of a document's content.
    Encrypt {
        /// Document identifier.
        #[arg(long)]
        id: String,
        /// Key reference in the external key store.
        #[arg(long)]
        key_id: String,
        /// Initialization vector as produced by the encryptor.
        #[arg(long)]
        iv: String,
        /// Key version as named by the key store.
        #[arg(long, default_value = "1")]
        key_version: String,
    },

    /// Attach the storage location and content digest of stored bytes.
    Store {
        /// Document identifier.
        #[arg(long)]
        id: String,
        /// Opaque storage location of the encrypted blob.
        #[arg(long)]
        storage_path: String,
        /// File holding the stored bytes, hashed into `content_hash`.
        #[arg(long)]
        file: PathBuf,
    },

    /// Show a document record.
    Show {
        /// Document identifier.
        #[arg(long)]
        id: String,
        /// Print the serialized record instead of a summary.
        #[arg(long)]
        json: bool,
    },

    /// Re-check a persisted record against the current policy.
    Verify {
        /// Document identifier.
        #[arg(long)]
        id: String,
        /// Stored bytes to check against the recorded content hash.
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Journal a retrieval of a completed document.
    Retrieve {
        /// Document identifier.
        #[arg(long)]
        id: String,
        /// Who the document was handed to.
        #[arg(long)]
        actor: String,
    },
}

/// Execute the document subcommand.
pub fn run_document(args: &DocumentArgs, ctx: &CliContext) -> Result<u8> {
    match &args.command {
        DocumentCommand::Create {
            enrollment_id,
            document_type,
            filename,
            content_type,
            size_bytes,
        } => {
            let record = create_record(
                ctx,
                enrollment_id,
                document_type,
                filename,
                content_type,
                *size_bytes,
            )?;
            if let Some(id) = &record.id {
                println!("OK: created document {id} in {} status", record.status());
                println!("{id}");
            }
            Ok(0)
        }

        DocumentCommand::Status {
            id,
            status,
            reason,
            strict,
        } => cmd_status(ctx, id, status, reason, *strict),

        DocumentCommand::Encrypt {
            id,
            key_id,
            iv,
            key_version,
        } => cmd_encrypt(ctx, id, key_id, iv, key_version),

        DocumentCommand::Store {
            id,
            storage_path,
            file,
        } => cmd_store(ctx, id, storage_path, file),

        DocumentCommand::Show { id, json } => cmd_show(ctx, id, *json),

        DocumentCommand::Verify { id, file } => cmd_verify(ctx, id, file.as_deref()),

        DocumentCommand::Retrieve { id, actor } => cmd_retrieve(ctx, id, actor),
    }
}

/// Create, assign an id, and persist a new record.
pub fn create_record(
    ctx: &CliContext,
    enrollment_id: &str,
    document_type: &str,
    filename: &str,
    content_type: &str,
    size_bytes: u64,
) -> Result<DocumentRecord> {
    let engine = GovernanceEngine::new(ctx.policy.clone());
    let mut record = engine.create_document(
        enrollment_id,
        document_type,
        filename,
        content_type,
        size_bytes,
    )?;
    record.id = Some(DocumentId::generate());
    save_record(&ctx.state_dir, &record)?;
    Ok(record)
}

fn cmd_status(ctx: &CliContext, id: &str, status: &str, reason: &str, strict: bool) -> Result<u8> {
    let mut record = load_record(&ctx.state_dir, id)?;
    let from = record.status();
    if strict {
        LifecycleController::with_policy(StrictTransitions)
            .update_status(&mut record, status, reason)?;
    } else {
        LifecycleController::new().update_status(&mut record, status, reason)?;
    }
    save_record(&ctx.state_dir, &record)?;
    println!("OK: document {id} transitioned {from} -> {}", record.status());
    Ok(0)
}

fn cmd_encrypt(
    ctx: &CliContext,
    id: &str,
    key_id: &str,
    iv: &str,
    key_version: &str,
) -> Result<u8> {
    let mut record = load_record(&ctx.state_dir, id)?;
    let metadata = EncryptionMetadata::attest(key_id, iv, key_version, &ctx.policy)?;
    let due = metadata.key_rotation_due;
    EncryptionMetadataValidator::from_policy(&ctx.policy)
        .set_encryption_metadata(&mut record, metadata)?;
    save_record(&ctx.state_dir, &record)?;
    println!("OK: document {id} encrypted with key {key_id} (rotation due {due})");
    Ok(0)
}

fn cmd_store(ctx: &CliContext, id: &str, storage_path: &str, file: &Path) -> Result<u8> {
    let mut record = load_record(&ctx.state_dir, id)?;
    let bytes = std::fs::read(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let digest = ContentDigest::of_bytes(&bytes);
    if bytes.len() as u64 != record.size_bytes() {
        tracing::warn!(
            document = id,
            declared = record.size_bytes(),
            actual = bytes.len(),
            "stored size differs from declared size"
        );
    }
    record.attach_storage(storage_path, digest.clone())?;
    save_record(&ctx.state_dir, &record)?;
    println!("OK: document {id} stored at {storage_path} ({digest})");
    Ok(0)
}

fn cmd_show(ctx: &CliContext, id: &str, json: bool) -> Result<u8> {
    let record = load_record(&ctx.state_dir, id)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&record)?);
        return Ok(0);
    }

    println!("Document: {id}");
    println!("  Enrollment: {}", record.enrollment_id());
    println!("  Type: {}", record.document_type());
    println!(
        "  File: {} ({}, {} bytes)",
        record.filename(),
        record.content_type(),
        record.size_bytes()
    );
    println!("  Status: {}", record.status());
    println!("  Created: {}", record.created_at());
    println!("  Updated: {}", record.updated_at());
    if let Some(processed) = record.processed_at() {
        println!("  Processed: {processed}");
    }
    println!("  Retention: {}", record.retention_date());
    if let Some(path) = &record.storage_path {
        println!("  Storage: {path}");
    }
    if let Some(hash) = &record.content_hash {
        println!("  Content hash: {hash}");
    }
    if let Some(md) = record.encryption_metadata() {
        println!(
            "  Encryption: {} key {} v{} (rotation due {})",
            md.algorithm, md.key_id, md.key_version, md.key_rotation_due
        );
    }
    println!("  Audit trail ({}):", record.audit_trail().len());
    for (i, entry) in record.audit_trail().iter().enumerate() {
        println!(
            "    [{i}] {} {} {} by {}: {}",
            entry.timestamp, entry.action, entry.status, entry.performed_by, entry.reason
        );
    }
    Ok(0)
}

fn cmd_verify(ctx: &CliContext, id: &str, file: Option<&Path>) -> Result<u8> {
    let record = load_record(&ctx.state_dir, id)?;
    record.verify_invariants(&ctx.policy)?;
    if let Some(file) = file {
        let bytes = std::fs::read(file)
            .with_context(|| format!("failed to read {}", file.display()))?;
        record.verify_content(&bytes)?;
    }
    let fingerprint = record
        .audit_trail()
        .fingerprint()
        .context("failed to fingerprint audit trail")?;
    println!("OK: document {id} verified (audit {fingerprint})");
    Ok(0)
}

fn cmd_retrieve(ctx: &CliContext, id: &str, actor: &str) -> Result<u8> {
    let mut record = load_record(&ctx.state_dir, id)?;
    record.record_retrieval(actor)?;
    save_record(&ctx.state_dir, &record)?;
    println!("OK: document {id} retrieved by {actor}");
    Ok(0)
}
