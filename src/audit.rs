//! Audit hook invoked for every ingested stolen-vehicle record.
//!
//! The loader only calls the hook; where the entries end up is the
//! caller's choice. Entries are emitted once the vehicles file has been
//! read, before cleaning, so a batch that later fails to clean still
//! leaves its "ingested" entries behind.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{info, warn};

use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditEntry {
    pub vehicle_id: String,
    pub timestamp: DateTime<Utc>,
    pub message: String,
}

impl AuditEntry {
    pub fn ingested(vehicle_id: &str) -> Self {
        Self {
            vehicle_id: vehicle_id.to_string(),
            timestamp: Utc::now(),
            message: format!("stolen vehicle {vehicle_id} ingested"),
        }
    }
}

pub trait AuditHook {
    fn record(&mut self, entry: AuditEntry);
}

impl<F: FnMut(AuditEntry)> AuditHook for F {
    fn record(&mut self, entry: AuditEntry) {
        self(entry)
    }
}

/// Discards every entry.
pub struct NoAudit;

impl AuditHook for NoAudit {
    fn record(&mut self, _entry: AuditEntry) {}
}

/// Emits each entry as a tracing event on the `audit` target.
pub struct TracingAudit;

impl AuditHook for TracingAudit {
    fn record(&mut self, entry: AuditEntry) {
        info!(
            target: "audit",
            vehicle_id = %entry.vehicle_id,
            timestamp = %entry.timestamp,
            "{}",
            entry.message
        );
    }
}

/// Appends one JSON object per entry to a file.
pub struct JsonLinesAudit {
    writer: BufWriter<File>,
}

impl JsonLinesAudit {
    pub fn open(path: &Path) -> Result<Self> {
        let file = OpenOptions::new().append(true).create(true).open(path)?;
        Ok(Self {
            writer: BufWriter::new(file),
        })
    }

    fn write_entry(&mut self, entry: &AuditEntry) -> Result<()> {
        serde_json::to_writer(&mut self.writer, entry)?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }
}

impl AuditHook for JsonLinesAudit {
    fn record(&mut self, entry: AuditEntry) {
        if let Err(e) = self.write_entry(&entry) {
            warn!(vehicle_id = %entry.vehicle_id, error = %e, "Failed to write audit entry");
        }
    }
}

impl Drop for JsonLinesAudit {
    fn drop(&mut self) {
        if let Err(e) = self.writer.flush() {
            warn!(error = %e, "Failed to flush audit log");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs;

    #[test]
    fn test_closure_hook_collects_entries() {
        let mut seen = Vec::new();
        {
            let mut hook = |entry: AuditEntry| seen.push(entry.vehicle_id);
            hook.record(AuditEntry::ingested("1"));
            hook.record(AuditEntry::ingested("2"));
        }
        assert_eq!(seen, vec!["1", "2"]);
    }

    #[test]
    fn test_ingested_message_names_vehicle() {
        let entry = AuditEntry::ingested("42");
        assert_eq!(entry.vehicle_id, "42");
        assert!(entry.message.contains("42"));
    }

    #[test]
    fn test_json_lines_audit_appends() {
        let path = env::temp_dir().join(format!(
            "vehicle_theft_etl_test_audit_{}.jsonl",
            std::process::id()
        ));
        let _ = fs::remove_file(&path);

        {
            let mut audit = JsonLinesAudit::open(&path).unwrap();
            audit.record(AuditEntry::ingested("7"));
            audit.record(AuditEntry::ingested("8"));
        }

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["vehicle_id"], "7");

        fs::remove_file(&path).unwrap();
    }
}
