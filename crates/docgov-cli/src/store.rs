//! # Record Store
//!
//! Document records as pretty-printed JSON files, one per document, named
//! `<id>.json` inside the state directory. Each command replaces a whole
//! file through a temporary sibling and a rename, so readers never see a
//! partial write.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use uuid::Uuid;

use docgov_state::DocumentRecord;

/// Validate that a document id is safe for use in filesystem paths.
///
/// Ids issued by this CLI are UUID v4 strings; anything else is refused
/// before it reaches a path join.
pub fn validate_document_id(id: &str) -> Result<()> {
    if id.is_empty() {
        bail!("document ID must not be empty");
    }
    if id.contains('/') || id.contains('\\') || id.contains('\0') || id.contains("..") {
        bail!("document ID contains invalid path characters: {id:?}");
    }
    Uuid::parse_str(id).with_context(|| format!("document ID is not a UUID: {id:?}"))?;
    Ok(())
}

/// Resolve a record file path, with path traversal protection.
pub fn document_file(state_dir: &Path, id: &str) -> Result<PathBuf> {
    validate_document_id(id)?;
    let file = state_dir.join(format!("{id}.json"));
    let canonical_dir = state_dir
        .canonicalize()
        .unwrap_or_else(|_| state_dir.to_path_buf());
    let canonical_file = file.canonicalize().unwrap_or_else(|_| file.clone());
    if !canonical_file.starts_with(&canonical_dir) {
        bail!("document ID resolves outside state directory: {id:?}");
    }
    Ok(file)
}

/// Load one record by id.
pub fn load_record(state_dir: &Path, id: &str) -> Result<DocumentRecord> {
    let file = document_file(state_dir, id)?;
    if !file.exists() {
        bail!("document not found: {id}");
    }
    let content = std::fs::read_to_string(&file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let record: DocumentRecord = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse {}", file.display()))?;
    if !record.id.as_ref().is_some_and(|stored| stored.as_str() == id) {
        bail!(
            "record file {} holds document {:?}, expected {id}",
            file.display(),
            record.id
        );
    }
    Ok(record)
}

/// Write a record to `<id>.json`, replacing any previous version.
pub fn save_record(state_dir: &Path, record: &DocumentRecord) -> Result<PathBuf> {
    let Some(id) = &record.id else {
        bail!("cannot persist a record without an id");
    };
    std::fs::create_dir_all(state_dir).context("failed to create document state directory")?;
    let file = document_file(state_dir, id.as_str())?;
    let tmp = file.with_extension("json.tmp");

    let json = serde_json::to_string_pretty(record)?;
    std::fs::write(&tmp, json).with_context(|| format!("failed to write {}", tmp.display()))?;
    std::fs::rename(&tmp, &file).with_context(|| format!("failed to replace {}", file.display()))?;
    tracing::debug!(document = %id, path = %file.display(), "record saved");
    Ok(file)
}

/// Every parseable record in the state directory, sorted by id.
///
/// Unreadable or malformed files are skipped with a warning.
pub fn list_records(state_dir: &Path) -> Result<Vec<DocumentRecord>> {
    if !state_dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut records = Vec::new();
    for entry in std::fs::read_dir(state_dir)? {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                tracing::warn!(
                    dir = %state_dir.display(),
                    error = %e,
                    "failed to read directory entry"
                );
                continue;
            }
        };
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to read record file");
                continue;
            }
        };
        match serde_json::from_str::<DocumentRecord>(&content) {
            Ok(record) => records.push(record),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to parse record file");
            }
        }
    }

    records.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use docgov_core::{DocumentId, DocumentPolicy};
    use docgov_state::GovernanceEngine;
    use std::sync::Arc;

    fn record_with_id() -> DocumentRecord {
        let engine = GovernanceEngine::new(Arc::new(DocumentPolicy::default()));
        let mut record = engine
            .create_document("E1", "CPF", "cpf.pdf", "application/pdf", 10)
            .unwrap();
        record.id = Some(DocumentId::generate());
        record
    }

    #[test]
    fn document_id_rejects_traversal() {
        for bad in ["", "../etc/passwd", "a/b", "a\\b", "..", "not-a-uuid"] {
            assert!(validate_document_id(bad).is_err(), "{bad:?} accepted");
        }
        assert!(validate_document_id(DocumentId::generate().as_str()).is_ok());
    }

    #[test]
    fn save_then_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let state_dir = dir.path().join("documents");
        let record = record_with_id();
        let id = record.id.clone().unwrap();

        let path = save_record(&state_dir, &record).unwrap();
        assert!(path.exists());
        assert!(!path.with_extension("json.tmp").exists());

        let loaded = load_record(&state_dir, id.as_str()).unwrap();
        assert_eq!(loaded, record);
    }

    #[test]
    fn save_requires_id() {
        let dir = tempfile::tempdir().unwrap();
        let mut record = record_with_id();
        record.id = None;
        assert!(save_record(dir.path(), &record).is_err());
    }

    #[test]
    fn load_missing_record_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_record(dir.path(), DocumentId::generate().as_str()).unwrap_err();
        assert!(err.to_string().contains("document not found"));
    }

    #[test]
    fn load_rejects_mismatched_id() {
        let dir = tempfile::tempdir().unwrap();
        let record = record_with_id();
        let other = DocumentId::generate();
        let json = serde_json::to_string(&record).unwrap();
        std::fs::write(dir.path().join(format!("{other}.json")), json).unwrap();
        assert!(load_record(dir.path(), other.as_str()).is_err());
    }

    #[test]
    fn list_skips_invalid_files() {
        let dir = tempfile::tempdir().unwrap();
        let state_dir = dir.path();
        save_record(state_dir, &record_with_id()).unwrap();
        save_record(state_dir, &record_with_id()).unwrap();
        std::fs::write(state_dir.join("bad.json"), b"not valid json").unwrap();
        std::fs::write(state_dir.join("notes.md"), b"# notes").unwrap();

        let records = list_records(state_dir).unwrap();
        assert_eq!(records.len(), 2);
        assert!(records[0].id < records[1].id);
    }

    #[test]
    fn list_missing_dir_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(list_records(&dir.path().join("absent")).unwrap().is_empty());
    }
}
