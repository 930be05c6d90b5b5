// Ledger - the in-memory list of transaction records
//
// Derived totals are recomputed on demand (every render). Fiduciary entries
// are money held for someone else: they stay out of the balance unless the
// show_fiduciary preference is on.

use crate::model::{EntryType, Flow, Transaction};

// ============================================================================
// LEDGER VIEW (filter)
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerView {
    All,
    Income,
    Expense,
    Fiduciary,
    Debt,
}

impl LedgerView {
    pub fn matches(&self, tx: &Transaction) -> bool {
        match self {
            LedgerView::All => true,
            LedgerView::Income => tx.entry_type == EntryType::Income,
            LedgerView::Expense => tx.entry_type == EntryType::Expense,
            LedgerView::Fiduciary => tx.entry_type == EntryType::Fiduciary,
            LedgerView::Debt => tx.entry_type == EntryType::Debt,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            LedgerView::All => "All",
            LedgerView::Income => "Income",
            LedgerView::Expense => "Expense",
            LedgerView::Fiduciary => "Fiduciary",
            LedgerView::Debt => "Debt",
        }
    }
}

// ============================================================================
// DERIVED TOTALS
// ============================================================================

/// Per-direction and per-type sums over a transaction subset
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LedgerTotals {
    /// Σ signed amounts over the selected subset
    pub balance: i64,

    pub inflow: u64,
    pub outflow: u64,

    pub income_total: i64,
    pub expense_total: i64,
    pub fiduciary_total: i64,
    pub debt_total: i64,

    pub count: usize,
    pub fiduciary_count: usize,
}

// ============================================================================
// LEDGER
// ============================================================================

#[derive(Debug, Default, Clone)]
pub struct Ledger {
    transactions: Vec<Transaction>,
}

impl Ledger {
    pub fn new() -> Self {
        Ledger {
            transactions: Vec::new(),
        }
    }

    pub fn from_transactions(mut transactions: Vec<Transaction>) -> Self {
        sort_display_order(&mut transactions);
        Ledger { transactions }
    }

    /// Append a transaction and restore display order
    pub fn add(&mut self, tx: Transaction) {
        self.transactions.push(tx);
        sort_display_order(&mut self.transactions);
    }

    /// Delete by id. Unknown ids are a no-op and return false.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.transactions.len();
        self.transactions.retain(|tx| tx.id != id);
        self.transactions.len() != before
    }

    pub fn get(&self, id: &str) -> Option<&Transaction> {
        self.transactions.iter().find(|tx| tx.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// All transactions in display order (date desc, then created_at desc)
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Total balance: Σ(amount if flow=in else -amount) over the selected
    /// subset. Fiduciary entries count only when `show_fiduciary` is on.
    pub fn balance(&self, show_fiduciary: bool) -> i64 {
        self.transactions
            .iter()
            .filter(|tx| show_fiduciary || tx.entry_type != EntryType::Fiduciary)
            .map(|tx| tx.signed_amount())
            .sum()
    }

    /// Full breakdown, same fiduciary rule as `balance`
    pub fn totals(&self, show_fiduciary: bool) -> LedgerTotals {
        let mut totals = LedgerTotals::default();

        for tx in &self.transactions {
            let signed = tx.signed_amount();

            match tx.entry_type {
                EntryType::Income => totals.income_total += signed,
                EntryType::Expense => totals.expense_total += signed,
                EntryType::Fiduciary => {
                    totals.fiduciary_total += signed;
                    totals.fiduciary_count += 1;
                }
                EntryType::Debt => totals.debt_total += signed,
            }

            if tx.entry_type == EntryType::Fiduciary && !show_fiduciary {
                continue;
            }

            totals.count += 1;
            totals.balance += signed;
            match tx.flow {
                Flow::In => totals.inflow += tx.amount,
                Flow::Out => totals.outflow += tx.amount,
            }
        }

        totals
    }

    /// Subset by entry type, display order preserved
    pub fn filter(&self, view: LedgerView) -> Vec<&Transaction> {
        self.transactions
            .iter()
            .filter(|tx| view.matches(tx))
            .collect()
    }

    /// Case-insensitive substring match on title and note
    pub fn search(&self, query: &str) -> Vec<&Transaction> {
        let needle = query.to_lowercase();
        if needle.is_empty() {
            return self.transactions.iter().collect();
        }
        self.transactions
            .iter()
            .filter(|tx| {
                tx.title.to_lowercase().contains(&needle)
                    || tx.note.to_lowercase().contains(&needle)
            })
            .collect()
    }
}

/// Display order: date desc, then created_at desc (newest first)
fn sort_display_order(transactions: &mut [Transaction]) {
    transactions.sort_by(|a, b| {
        b.date
            .cmp(&a.date)
            .then(b.created_at.cmp(&a.created_at))
    });
}

// ============================================================================
// TESTS
// ============================================================================
