// FinanceOS - Core Library
// Personal-finance ledger: transactions, derived totals, PIN gate, backups

pub mod export;
pub mod icons;
pub mod ledger;
pub mod model;
pub mod pin;
pub mod prefs;
pub mod state;
pub mod store;

// Re-export commonly used types
pub use export::{
    merge_transactions, read_backup, write_backup, write_csv, BackupDocument, ImportSummary,
    BACKUP_VERSION,
};
pub use icons::{icon_for, Icon};
pub use ledger::{Ledger, LedgerTotals, LedgerView};
pub use model::{format_amount, format_signed, truncate, EntryType, Flow, Transaction, CURRENCY};
pub use pin::{PinGate, PinOutcome, PIN_LEN};
pub use prefs::{BackupCadence, Preferences};
pub use state::AppState;
pub use store::Store;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
