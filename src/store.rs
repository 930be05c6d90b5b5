// Persistence boundary - SQLite stand-in for the original's browser storage
//
// Two tables: transaction rows, and a key-value table mirroring the
// local-storage preference keys. Every ledger mutation is mirrored here;
// preferences are read at startup and written on toggle.

use crate::ledger::Ledger;
use crate::model::{EntryType, Flow, Transaction};
use crate::prefs::{BackupCadence, Preferences};
use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

const DATE_FMT: &str = "%Y-%m-%d";

// Preference keys, matching the original local-storage names
const PREF_BLUR_AMOUNTS: &str = "blur_amounts";
const PREF_SHOW_FIDUCIARY: &str = "show_fiduciary";
const PREF_PIN: &str = "pin";
const PREF_BACKUP_CADENCE: &str = "backup_cadence";
const PREF_LAST_BACKUP_AT: &str = "last_backup_at";

pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open (or create) the database file and ensure the schema exists
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database at {}", path.display()))?;
        let store = Store { conn };
        store.setup_schema()?;
        Ok(store)
    }

    /// In-memory database for tests
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Store { conn };
        store.setup_schema()?;
        Ok(store)
    }

    fn setup_schema(&self) -> Result<()> {
        // WAL mode for crash recovery
        self.conn.pragma_update(None, "journal_mode", "WAL")?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS transactions (
                id TEXT PRIMARY KEY,
                date TEXT NOT NULL,
                title TEXT NOT NULL,
                entry_type TEXT NOT NULL,
                amount INTEGER NOT NULL,
                flow TEXT NOT NULL,
                note TEXT NOT NULL DEFAULT '',
                created_at TEXT NOT NULL
            )",
            [],
        )?;

        // Key-value table standing in for browser local storage
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS preferences (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_transactions_date ON transactions(date)",
            [],
        )?;

        Ok(())
    }

    // ========================================================================
    // TRANSACTIONS
    // ========================================================================

    pub fn insert_transaction(&self, tx: &Transaction) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO transactions (id, date, title, entry_type, amount, flow, note, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    tx.id,
                    tx.date.format(DATE_FMT).to_string(),
                    tx.title,
                    tx.entry_type.as_str(),
                    tx.amount as i64,
                    tx.flow.as_str(),
                    tx.note,
                    tx.created_at.to_rfc3339(),
                ],
            )
            .context("Failed to insert transaction")?;
        Ok(())
    }

    /// Delete by id, returns whether a row existed
    pub fn delete_transaction(&self, id: &str) -> Result<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM transactions WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }

    /// All transactions in display order: date desc, then created_at desc
    pub fn get_all_transactions(&self) -> Result<Vec<Transaction>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, date, title, entry_type, amount, flow, note, created_at
             FROM transactions
             ORDER BY date DESC, created_at DESC",
        )?;

        let transactions = stmt
            .query_map([], |row| {
                let date_str: String = row.get(1)?;
                let type_str: String = row.get(3)?;
                let flow_str: String = row.get(5)?;
                let created_str: String = row.get(7)?;
                let amount: i64 = row.get(4)?;

                Ok(Transaction {
                    id: row.get(0)?,
                    date: NaiveDate::parse_from_str(&date_str, DATE_FMT)
                        .map_err(|_| rusqlite::Error::InvalidQuery)?,
                    title: row.get(2)?,
                    entry_type: EntryType::parse(&type_str)
                        .ok_or(rusqlite::Error::InvalidQuery)?,
                    amount: amount.max(0) as u64,
                    flow: Flow::parse(&flow_str).ok_or(rusqlite::Error::InvalidQuery)?,
                    note: row.get(6)?,
                    created_at: DateTime::parse_from_rfc3339(&created_str)
                        .map_err(|_| rusqlite::Error::InvalidQuery)?
                        .with_timezone(&Utc),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(transactions)
    }

    pub fn transaction_count(&self) -> Result<i64> {
        let count: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM transactions", [], |row| row.get(0))?;
        Ok(count)
    }

    // ========================================================================
    // PREFERENCES (key-value, local-storage style)
    // ========================================================================

    fn set_pref(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO preferences (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    fn get_pref(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM preferences WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn delete_pref(&self, key: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM preferences WHERE key = ?1", params![key])?;
        Ok(())
    }

    /// Write all preference flags
    pub fn save_preferences(&self, prefs: &Preferences) -> Result<()> {
        self.set_pref(PREF_BLUR_AMOUNTS, &prefs.blur_amounts.to_string())?;
        self.set_pref(PREF_SHOW_FIDUCIARY, &prefs.show_fiduciary.to_string())?;
        self.set_pref(PREF_BACKUP_CADENCE, prefs.backup_cadence.as_str())?;

        match &prefs.pin {
            Some(pin) => self.set_pref(PREF_PIN, pin)?,
            None => self.delete_pref(PREF_PIN)?,
        }

        match &prefs.last_backup_at {
            Some(at) => self.set_pref(PREF_LAST_BACKUP_AT, &at.to_rfc3339())?,
            None => self.delete_pref(PREF_LAST_BACKUP_AT)?,
        }

        Ok(())
    }

    /// Read preference flags, falling back to defaults for missing keys
    pub fn load_preferences(&self) -> Result<Preferences> {
        let mut prefs = Preferences::default();

        if let Some(v) = self.get_pref(PREF_BLUR_AMOUNTS)? {
            prefs.blur_amounts = v == "true";
        }
        if let Some(v) = self.get_pref(PREF_SHOW_FIDUCIARY)? {
            prefs.show_fiduciary = v == "true";
        }
        if let Some(v) = self.get_pref(PREF_BACKUP_CADENCE)? {
            if let Some(cadence) = BackupCadence::parse(&v) {
                prefs.backup_cadence = cadence;
            }
        }
        prefs.pin = self.get_pref(PREF_PIN)?;
        if let Some(v) = self.get_pref(PREF_LAST_BACKUP_AT)? {
            prefs.last_backup_at = DateTime::parse_from_rfc3339(&v)
                .ok()
                .map(|dt| dt.with_timezone(&Utc));
        }

        Ok(prefs)
    }

    /// Load the whole ledger into memory
    pub fn load_ledger(&self) -> Result<Ledger> {
        Ok(Ledger::from_transactions(self.get_all_transactions()?))
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn tx(date: &str, title: &str, amount: u64, flow: Flow, entry_type: EntryType) -> Transaction {
        let date = NaiveDate::parse_from_str(date, DATE_FMT).unwrap();
        Transaction::on_date(date, title, amount, flow, entry_type)
    }

    #[test]
    fn test_insert_and_load_roundtrip() {
        let store = Store::open_in_memory().unwrap();

        let a = tx("2024-01-05", "Salary", 450000, Flow::In, EntryType::Income);
        let b = tx("2024-01-06", "Groceries", 15000, Flow::Out, EntryType::Expense)
            .with_note("market run");

        store.insert_transaction(&a).unwrap();
        store.insert_transaction(&b).unwrap();

        let loaded = store.get_all_transactions().unwrap();
        assert_eq!(loaded.len(), 2);

        // display order: date desc
        assert_eq!(loaded[0].title, "Groceries");
        assert_eq!(loaded[0].note, "market run");
        assert_eq!(loaded[1].title, "Salary");
        assert_eq!(loaded[1].amount, 450000);
        assert_eq!(loaded[1].flow, Flow::In);
        assert_eq!(loaded[1].entry_type, EntryType::Income);
    }

    #[test]
    fn test_created_at_survives_storage() {
        let store = Store::open_in_memory().unwrap();

        let a = tx("2024-01-05", "One", 100, Flow::In, EntryType::Income);
        store.insert_transaction(&a).unwrap();

        let loaded = store.get_all_transactions().unwrap();
        // RFC 3339 keeps sub-second precision, so timestamps compare equal
        assert_eq!(loaded[0].created_at, a.created_at);
        assert_eq!(loaded[0].id, a.id);
    }

    #[test]
    fn test_same_date_insertion_order() {
        let store = Store::open_in_memory().unwrap();

        let mut first = tx("2024-01-05", "First", 100, Flow::In, EntryType::Income);
        let second = tx("2024-01-05", "Second", 200, Flow::In, EntryType::Income);
        first.created_at = second.created_at - Duration::seconds(1);

        store.insert_transaction(&first).unwrap();
        store.insert_transaction(&second).unwrap();

        let loaded = store.get_all_transactions().unwrap();
        assert_eq!(loaded[0].title, "Second");
        assert_eq!(loaded[1].title, "First");
    }

    #[test]
    fn test_delete_transaction() {
        let store = Store::open_in_memory().unwrap();

        let a = tx("2024-01-05", "Salary", 450000, Flow::In, EntryType::Income);
        store.insert_transaction(&a).unwrap();

        assert!(store.delete_transaction(&a.id).unwrap());
        assert_eq!(store.transaction_count().unwrap(), 0);

        // deleting an unknown id reports false
        assert!(!store.delete_transaction("no-such-id").unwrap());
    }

    #[test]
    fn test_preferences_roundtrip() {
        let store = Store::open_in_memory().unwrap();

        let mut prefs = Preferences::default();
        prefs.blur_amounts = true;
        prefs.show_fiduciary = true;
        prefs.set_pin("1234").unwrap();
        prefs.backup_cadence = BackupCadence::Weekly;
        prefs.mark_backed_up(Utc::now());

        store.save_preferences(&prefs).unwrap();
        let loaded = store.load_preferences().unwrap();

        assert_eq!(loaded.blur_amounts, prefs.blur_amounts);
        assert_eq!(loaded.show_fiduciary, prefs.show_fiduciary);
        assert_eq!(loaded.pin, prefs.pin);
        assert_eq!(loaded.backup_cadence, prefs.backup_cadence);
        assert_eq!(loaded.last_backup_at, prefs.last_backup_at);
    }

    #[test]
    fn test_preferences_defaults_when_empty() {
        let store = Store::open_in_memory().unwrap();

        let loaded = store.load_preferences().unwrap();
        assert_eq!(loaded, Preferences::default());
    }

    #[test]
    fn test_clearing_pin_removes_key() {
        let store = Store::open_in_memory().unwrap();

        let mut prefs = Preferences::default();
        prefs.set_pin("1234").unwrap();
        store.save_preferences(&prefs).unwrap();

        prefs.clear_pin();
        store.save_preferences(&prefs).unwrap();

        let loaded = store.load_preferences().unwrap();
        assert!(loaded.pin.is_none());
    }

    #[test]
    fn test_load_ledger() {
        let store = Store::open_in_memory().unwrap();

        store
            .insert_transaction(&tx("2024-01-05", "Salary", 450000, Flow::In, EntryType::Income))
            .unwrap();
        store
            .insert_transaction(&tx("2024-01-06", "Rent", 80000, Flow::Out, EntryType::Expense))
            .unwrap();

        let ledger = store.load_ledger().unwrap();
        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.balance(false), 370000);
    }
}
