use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Currency symbol used for display (amounts are minor-unit-free integers)
pub const CURRENCY: &str = "₦";

// ============================================================================
// ENTRY TYPE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    /// Money earned (salary, business income)
    Income,

    /// Money spent
    Expense,

    /// Held/managed on behalf of a third party
    /// Excluded from default totals unless toggled on
    Fiduciary,

    /// Borrowed or lent money
    Debt,
}

impl EntryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryType::Income => "income",
            EntryType::Expense => "expense",
            EntryType::Fiduciary => "fiduciary",
            EntryType::Debt => "debt",
        }
    }

    pub fn parse(s: &str) -> Option<EntryType> {
        match s.to_lowercase().as_str() {
            "income" => Some(EntryType::Income),
            "expense" => Some(EntryType::Expense),
            "fiduciary" => Some(EntryType::Fiduciary),
            "debt" => Some(EntryType::Debt),
            _ => None,
        }
    }

    pub fn all() -> [EntryType; 4] {
        [
            EntryType::Income,
            EntryType::Expense,
            EntryType::Fiduciary,
            EntryType::Debt,
        ]
    }
}

// ============================================================================
// FLOW DIRECTION
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Flow {
    /// Money coming in (counts positive)
    In,

    /// Money going out (counts negative)
    Out,
}

impl Flow {
    pub fn as_str(&self) -> &'static str {
        match self {
            Flow::In => "in",
            Flow::Out => "out",
        }
    }

    pub fn parse(s: &str) -> Option<Flow> {
        match s.to_lowercase().as_str() {
            "in" => Some(Flow::In),
            "out" => Some(Flow::Out),
            _ => None,
        }
    }

    /// Sign applied when summing: +1 for In, -1 for Out
    pub fn sign(&self) -> i64 {
        match self {
            Flow::In => 1,
            Flow::Out => -1,
        }
    }
}

// ============================================================================
// TRANSACTION
// ============================================================================

/// A single ledger entry
///
/// Immutable once created: corrections are delete + re-add.
/// `id` is the only identity; there is no uniqueness invariant beyond it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Stable identity (UUID) - never changes
    pub id: String,

    /// Calendar date the entry applies to
    pub date: NaiveDate,

    /// Short label (e.g. "Salary", "Groceries")
    pub title: String,

    #[serde(rename = "type")]
    pub entry_type: EntryType,

    /// Positive integer, minor-unit-free currency value
    pub amount: u64,

    pub flow: Flow,

    /// Free-form note, empty when unset
    #[serde(default)]
    pub note: String,

    /// When this record entered the ledger (insertion-order tiebreak)
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Create a new transaction with a fresh UUID, dated today
    pub fn new(title: &str, amount: u64, flow: Flow, entry_type: EntryType) -> Self {
        let now = Utc::now();
        Transaction {
            id: uuid::Uuid::new_v4().to_string(),
            date: now.date_naive(),
            title: title.to_string(),
            entry_type,
            amount,
            flow,
            note: String::new(),
            created_at: now,
        }
    }

    /// Create a transaction on a specific date
    pub fn on_date(
        date: NaiveDate,
        title: &str,
        amount: u64,
        flow: Flow,
        entry_type: EntryType,
    ) -> Self {
        let mut tx = Self::new(title, amount, flow, entry_type);
        tx.date = date;
        tx
    }

    pub fn with_note(mut self, note: &str) -> Self {
        self.note = note.to_string();
        self
    }

    /// Signed amount: +amount for Flow::In, -amount for Flow::Out
    pub fn signed_amount(&self) -> i64 {
        self.flow.sign() * self.amount as i64
    }
}

/// Format an integer amount with thousands separators (e.g. 450000 -> "450,000")
pub fn format_amount(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Truncate to at most `max_len` characters, ellipsized (char-based so
/// multi-byte titles never split)
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}

/// Format a signed amount with currency symbol (e.g. -15000 -> "-₦15,000")
pub fn format_signed(amount: i64) -> String {
    if amount < 0 {
        format!("-{}{}", CURRENCY, format_amount(amount.unsigned_abs()))
    } else {
        format!("{}{}", CURRENCY, format_amount(amount as u64))
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_creation() {
        let tx = Transaction::new("Salary", 450000, Flow::In, EntryType::Income);

        assert!(!tx.id.is_empty());
        assert_eq!(tx.title, "Salary");
        assert_eq!(tx.amount, 450000);
        assert_eq!(tx.flow, Flow::In);
        assert_eq!(tx.entry_type, EntryType::Income);
        assert!(tx.note.is_empty());
    }

    #[test]
    fn test_signed_amount() {
        let income = Transaction::new("Salary", 450000, Flow::In, EntryType::Income);
        let expense = Transaction::new("Groceries", 15000, Flow::Out, EntryType::Expense);

        assert_eq!(income.signed_amount(), 450000);
        assert_eq!(expense.signed_amount(), -15000);
    }

    #[test]
    fn test_entry_type_parse_roundtrip() {
        for entry_type in EntryType::all() {
            assert_eq!(EntryType::parse(entry_type.as_str()), Some(entry_type));
        }
        assert_eq!(EntryType::parse("INCOME"), Some(EntryType::Income));
        assert_eq!(EntryType::parse("unknown"), None);
    }

    #[test]
    fn test_flow_parse_roundtrip() {
        assert_eq!(Flow::parse("in"), Some(Flow::In));
        assert_eq!(Flow::parse("OUT"), Some(Flow::Out));
        assert_eq!(Flow::parse("sideways"), None);
        assert_eq!(Flow::In.sign(), 1);
        assert_eq!(Flow::Out.sign(), -1);
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(0), "0");
        assert_eq!(format_amount(999), "999");
        assert_eq!(format_amount(1000), "1,000");
        assert_eq!(format_amount(450000), "450,000");
        assert_eq!(format_amount(1234567), "1,234,567");
    }

    #[test]
    fn test_format_signed() {
        assert_eq!(format_signed(450000), "₦450,000");
        assert_eq!(format_signed(-15000), "-₦15,000");
        assert_eq!(format_signed(0), "₦0");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("exactly ten", 11), "exactly ten");
        assert_eq!(truncate("a longer title than fits", 10), "a longe...");
        // char-based, not byte-based
        assert_eq!(truncate("₦₦₦₦₦", 5), "₦₦₦₦₦");
        assert_eq!(truncate("₦₦₦₦₦₦", 5), "₦₦...");
    }

    #[test]
    fn test_serde_roundtrip() {
        let tx = Transaction::new("Rent", 80000, Flow::Out, EntryType::Expense)
            .with_note("October");

        let json = serde_json::to_string(&tx).unwrap();
        let back: Transaction = serde_json::from_str(&json).unwrap();

        assert_eq!(tx, back);
        // wire names match the original storage format
        assert!(json.contains("\"type\":\"expense\""));
        assert!(json.contains("\"flow\":\"out\""));
    }
}
