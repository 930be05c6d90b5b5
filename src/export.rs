// Backup export/import - the original's "download JSON file" feature
//
// A backup is a single JSON document carrying the preferences and the full
// transaction list, with a SHA-256 checksum over the serialized transaction
// array so a damaged file is rejected instead of silently importing garbage.

use crate::ledger::Ledger;
use crate::prefs::Preferences;
use crate::model::Transaction;
use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;

/// Bumped when the backup layout changes
pub const BACKUP_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
pub struct BackupDocument {
    pub version: u32,
    pub exported_at: DateTime<Utc>,
    /// SHA-256 hex digest of the serialized transaction array
    pub checksum: String,
    pub preferences: Preferences,
    pub transactions: Vec<Transaction>,
}

/// What an import merge did
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported: usize,
    pub skipped: usize,
}

fn transactions_checksum(transactions: &[Transaction]) -> Result<String> {
    let serialized = serde_json::to_string(transactions)?;
    let mut hasher = Sha256::new();
    hasher.update(serialized.as_bytes());
    Ok(format!("{:x}", hasher.finalize()))
}

impl BackupDocument {
    pub fn new(prefs: &Preferences, transactions: &[Transaction]) -> Result<Self> {
        Ok(BackupDocument {
            version: BACKUP_VERSION,
            exported_at: Utc::now(),
            checksum: transactions_checksum(transactions)?,
            preferences: prefs.clone(),
            transactions: transactions.to_vec(),
        })
    }

    /// Recompute the checksum and compare with the embedded one
    pub fn verify(&self) -> Result<()> {
        let actual = transactions_checksum(&self.transactions)?;
        if actual != self.checksum {
            bail!(
                "Backup checksum mismatch: expected {}, got {}",
                self.checksum,
                actual
            );
        }
        Ok(())
    }
}

/// Serialize the ledger and preferences to a backup file
pub fn write_backup(path: &Path, prefs: &Preferences, ledger: &Ledger) -> Result<()> {
    let doc = BackupDocument::new(prefs, ledger.transactions())?;
    let json = serde_json::to_string_pretty(&doc)?;
    fs::write(path, json)
        .with_context(|| format!("Failed to write backup to {}", path.display()))?;
    Ok(())
}

/// Parse and verify a backup file
pub fn read_backup(path: &Path) -> Result<BackupDocument> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read backup from {}", path.display()))?;
    let doc: BackupDocument =
        serde_json::from_str(&json).context("Backup file is not valid JSON")?;

    if doc.version > BACKUP_VERSION {
        bail!("Backup version {} is newer than supported", doc.version);
    }
    doc.verify()?;

    Ok(doc)
}

/// Merge backup transactions into the ledger: known ids are skipped,
/// everything else is appended
pub fn merge_transactions(ledger: &mut Ledger, incoming: Vec<Transaction>) -> ImportSummary {
    let mut summary = ImportSummary::default();

    for tx in incoming {
        if ledger.contains(&tx.id) {
            summary.skipped += 1;
        } else {
            ledger.add(tx);
            summary.imported += 1;
        }
    }

    summary
}

/// Flat CSV of the ledger for spreadsheets
pub fn write_csv(path: &Path, ledger: &Ledger) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create CSV at {}", path.display()))?;

    wtr.write_record(["id", "date", "title", "type", "amount", "flow", "note"])?;

    for tx in ledger.transactions() {
        wtr.write_record([
            tx.id.as_str(),
            &tx.date.format("%Y-%m-%d").to_string(),
            tx.title.as_str(),
            tx.entry_type.as_str(),
            &tx.amount.to_string(),
            tx.flow.as_str(),
            tx.note.as_str(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================
