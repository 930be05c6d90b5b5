// Application state - explicit state object + persistence boundary
//
// The original prototypes scattered storage reads/writes through UI
// callbacks. Here all state lives in one AppState: loaded from the store at
// startup, every mutation routed through a method that mirrors it to the
// store, and preferences written back at shutdown.

use crate::ledger::Ledger;
use crate::model::Transaction;
use crate::prefs::{BackupCadence, Preferences};
use crate::store::Store;
use anyhow::Result;
use chrono::Utc;

#[derive(Debug)]
pub struct AppState {
    pub ledger: Ledger,
    pub prefs: Preferences,
}

impl AppState {
    pub fn new() -> Self {
        AppState {
            ledger: Ledger::new(),
            prefs: Preferences::default(),
        }
    }

    /// Load everything from the store (startup boundary)
    pub fn load(store: &Store) -> Result<Self> {
        Ok(AppState {
            ledger: store.load_ledger()?,
            prefs: store.load_preferences()?,
        })
    }

    /// Write preferences back (shutdown boundary; transaction rows are
    /// already mirrored per-mutation)
    pub fn save(&self, store: &Store) -> Result<()> {
        store.save_preferences(&self.prefs)
    }

    // ========================================================================
    // MUTATIONS (each one mirrors to the store)
    // ========================================================================

    pub fn add_transaction(&mut self, store: &Store, tx: Transaction) -> Result<()> {
        store.insert_transaction(&tx)?;
        self.ledger.add(tx);
        Ok(())
    }

    pub fn remove_transaction(&mut self, store: &Store, id: &str) -> Result<bool> {
        let removed = store.delete_transaction(id)?;
        self.ledger.remove(id);
        Ok(removed)
    }

    pub fn toggle_blur(&mut self, store: &Store) -> Result<()> {
        self.prefs.blur_amounts = !self.prefs.blur_amounts;
        store.save_preferences(&self.prefs)
    }

    pub fn toggle_fiduciary(&mut self, store: &Store) -> Result<()> {
        self.prefs.show_fiduciary = !self.prefs.show_fiduciary;
        store.save_preferences(&self.prefs)
    }

    pub fn set_pin(&mut self, store: &Store, pin: &str) -> Result<()> {
        self.prefs
            .set_pin(pin)
            .map_err(|e| anyhow::anyhow!(e))?;
        store.save_preferences(&self.prefs)
    }

    pub fn clear_pin(&mut self, store: &Store) -> Result<()> {
        self.prefs.clear_pin();
        store.save_preferences(&self.prefs)
    }

    pub fn set_backup_cadence(&mut self, store: &Store, cadence: BackupCadence) -> Result<()> {
        self.prefs.backup_cadence = cadence;
        store.save_preferences(&self.prefs)
    }

    pub fn mark_backed_up(&mut self, store: &Store) -> Result<()> {
        self.prefs.mark_backed_up(Utc::now());
        store.save_preferences(&self.prefs)
    }

    /// Balance under the current fiduciary preference
    pub fn balance(&self) -> i64 {
        self.ledger.balance(self.prefs.show_fiduciary)
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EntryType, Flow};

    #[test]
    fn test_mutations_mirror_to_store() {
        let store = Store::open_in_memory().unwrap();
        let mut state = AppState::load(&store).unwrap();

        let tx = Transaction::new("Salary", 450000, Flow::In, EntryType::Income);
        let id = tx.id.clone();
        state.add_transaction(&store, tx).unwrap();

        assert_eq!(state.ledger.len(), 1);
        assert_eq!(store.transaction_count().unwrap(), 1);

        // a fresh load sees the same state
        let reloaded = AppState::load(&store).unwrap();
        assert_eq!(reloaded.ledger.len(), 1);
        assert_eq!(reloaded.balance(), 450000);

        assert!(state.remove_transaction(&store, &id).unwrap());
        assert_eq!(store.transaction_count().unwrap(), 0);
        assert!(state.ledger.is_empty());
    }

    #[test]
    fn test_toggles_persist() {
        let store = Store::open_in_memory().unwrap();
        let mut state = AppState::load(&store).unwrap();

        state.toggle_blur(&store).unwrap();
        state.toggle_fiduciary(&store).unwrap();
        state.set_pin(&store, "1234").unwrap();
        state
            .set_backup_cadence(&store, BackupCadence::Daily)
            .unwrap();

        let reloaded = AppState::load(&store).unwrap();
        assert!(reloaded.prefs.blur_amounts);
        assert!(reloaded.prefs.show_fiduciary);
        assert_eq!(reloaded.prefs.pin.as_deref(), Some("1234"));
        assert_eq!(reloaded.prefs.backup_cadence, BackupCadence::Daily);
    }

    #[test]
    fn test_invalid_pin_is_rejected() {
        let store = Store::open_in_memory().unwrap();
        let mut state = AppState::load(&store).unwrap();

        assert!(state.set_pin(&store, "12").is_err());
        assert!(state.prefs.pin.is_none());
    }

    #[test]
    fn test_balance_follows_fiduciary_pref() {
        let store = Store::open_in_memory().unwrap();
        let mut state = AppState::load(&store).unwrap();

        state
            .add_transaction(
                &store,
                Transaction::new("Salary", 100000, Flow::In, EntryType::Income),
            )
            .unwrap();
        state
            .add_transaction(
                &store,
                Transaction::new("Held for brother", 40000, Flow::In, EntryType::Fiduciary),
            )
            .unwrap();

        assert_eq!(state.balance(), 100000);

        state.toggle_fiduciary(&store).unwrap();
        assert_eq!(state.balance(), 140000);
    }
}
