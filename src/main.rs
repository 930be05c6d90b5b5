// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{bail, Result};
#[cfg(feature = "tui")]
use chrono::Utc;
use std::env;
use std::path::{Path, PathBuf};

use financeos::{
    format_signed, merge_transactions, read_backup, write_backup, write_csv, AppState,
    BackupCadence, EntryType, Flow, Transaction, CURRENCY,
};

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    match args.get(1).map(|s| s.as_str()) {
        None => run_ui_mode(),
        Some("add") => run_add(&args[2..]),
        Some("list") => run_list(),
        Some("remove") => run_remove(&args[2..]),
        Some("export") => run_export(&args[2..]),
        Some("import") => run_import(&args[2..]),
        Some("export-csv") => run_export_csv(&args[2..]),
        Some("set-pin") => run_set_pin(&args[2..]),
        Some("clear-pin") => run_clear_pin(),
        Some("set-cadence") => run_set_cadence(&args[2..]),
        Some("help") | Some("--help") => {
            print_usage();
            Ok(())
        }
        Some(other) => {
            eprintln!("❌ Unknown command: {}", other);
            print_usage();
            std::process::exit(2);
        }
    }
}

fn print_usage() {
    println!("FinanceOS {} - personal finance ledger", financeos::VERSION);
    println!();
    println!("Usage:");
    println!("  financeos                                 interactive UI");
    println!("  financeos add <in|out> <title> <amount> [type] [note]");
    println!("  financeos list                            print the ledger and totals");
    println!("  financeos remove <id>");
    println!("  financeos export <path>                   JSON backup");
    println!("  financeos import <path>                   merge a JSON backup");
    println!("  financeos export-csv <path>");
    println!("  financeos set-pin <4 digits> / clear-pin");
    println!("  financeos set-cadence <off|daily|weekly|monthly>");
    println!();
    println!("Database path comes from FINANCEOS_DB (default: financeos.db)");
}

fn db_path() -> PathBuf {
    env::var("FINANCEOS_DB")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("financeos.db"))
}

fn open_state() -> Result<(financeos::Store, AppState)> {
    let store = financeos::Store::open(&db_path())?;
    let state = AppState::load(&store)?;
    Ok((store, state))
}

fn run_add(args: &[String]) -> Result<()> {
    if args.len() < 3 {
        bail!("Usage: financeos add <in|out> <title> <amount> [type] [note]");
    }

    let flow = Flow::parse(&args[0])
        .ok_or_else(|| anyhow::anyhow!("Flow must be 'in' or 'out', got '{}'", args[0]))?;
    let title = &args[1];
    let amount: u64 = args[2]
        .replace(',', "")
        .parse()
        .map_err(|_| anyhow::anyhow!("Amount must be a positive integer, got '{}'", args[2]))?;
    if amount == 0 {
        bail!("Amount must be greater than zero");
    }

    let entry_type = match args.get(3) {
        Some(s) => EntryType::parse(s)
            .ok_or_else(|| anyhow::anyhow!("Unknown type '{}' (income|expense|fiduciary|debt)", s))?,
        None => match flow {
            Flow::In => EntryType::Income,
            Flow::Out => EntryType::Expense,
        },
    };

    let mut tx = Transaction::new(title, amount, flow, entry_type);
    if let Some(note) = args.get(4) {
        tx = tx.with_note(note);
    }

    let (store, mut state) = open_state()?;
    let id = tx.id.clone();
    state.add_transaction(&store, tx)?;

    println!("✓ Added \"{}\" ({}{})", title, CURRENCY, args[2]);
    println!("  id: {}", id);
    println!("  balance: {}", format_signed(state.balance()));

    Ok(())
}

fn run_list() -> Result<()> {
    let (_store, state) = open_state()?;
    let show_fiduciary = state.prefs.show_fiduciary;

    println!("📒 Ledger ({} entries)", state.ledger.len());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    for tx in state.ledger.transactions() {
        let sign = if tx.flow == Flow::In { "+" } else { "-" };
        println!(
            "{}  {:<24} {:>14} {:<10} {}",
            tx.date,
            financeos::truncate(&tx.title, 24),
            format!("{}{}{}", sign, CURRENCY, financeos::format_amount(tx.amount)),
            tx.entry_type.as_str(),
            tx.id,
        );
    }

    let totals = state.ledger.totals(show_fiduciary);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("  Income:    {}", format_signed(totals.income_total));
    println!("  Expense:   {}", format_signed(totals.expense_total));
    println!("  Debt:      {}", format_signed(totals.debt_total));
    if show_fiduciary {
        println!("  Fiduciary: {}", format_signed(totals.fiduciary_total));
    } else if totals.fiduciary_count > 0 {
        println!(
            "  Fiduciary: {} entries hidden from totals",
            totals.fiduciary_count
        );
    }
    println!("  Balance:   {}", format_signed(totals.balance));

    Ok(())
}

fn run_remove(args: &[String]) -> Result<()> {
    let Some(id) = args.first() else {
        bail!("Usage: financeos remove <id>");
    };

    let (store, mut state) = open_state()?;
    if state.remove_transaction(&store, id)? {
        println!("✓ Removed {}", id);
    } else {
        println!("Nothing to remove: unknown id {}", id);
    }

    Ok(())
}

fn run_export(args: &[String]) -> Result<()> {
    let Some(path) = args.first() else {
        bail!("Usage: financeos export <path>");
    };

    let (store, mut state) = open_state()?;
    write_backup(Path::new(path), &state.prefs, &state.ledger)?;
    state.mark_backed_up(&store)?;

    println!(
        "✓ Exported {} transactions to {}",
        state.ledger.len(),
        path
    );

    Ok(())
}

fn run_import(args: &[String]) -> Result<()> {
    let Some(path) = args.first() else {
        bail!("Usage: financeos import <path>");
    };

    let doc = read_backup(Path::new(path))?;
    println!(
        "📂 Backup from {} ({} transactions)",
        doc.exported_at.format("%Y-%m-%d %H:%M UTC"),
        doc.transactions.len()
    );

    let (store, mut state) = open_state()?;

    // merge into memory first, then mirror the new rows
    let existing = state.ledger.clone();
    let summary = merge_transactions(&mut state.ledger, doc.transactions);
    for tx in state.ledger.transactions() {
        if !existing.contains(&tx.id) {
            store.insert_transaction(tx)?;
        }
    }

    println!("✓ Imported: {}", summary.imported);
    println!("✓ Skipped duplicates: {}", summary.skipped);
    println!("  balance: {}", format_signed(state.balance()));

    Ok(())
}

fn run_export_csv(args: &[String]) -> Result<()> {
    let Some(path) = args.first() else {
        bail!("Usage: financeos export-csv <path>");
    };

    let (_store, state) = open_state()?;
    write_csv(Path::new(path), &state.ledger)?;
    println!("✓ Wrote {} rows to {}", state.ledger.len(), path);

    Ok(())
}

fn run_set_pin(args: &[String]) -> Result<()> {
    let Some(pin) = args.first() else {
        bail!("Usage: financeos set-pin <4 digits>");
    };

    let (store, mut state) = open_state()?;
    state.set_pin(&store, pin)?;
    println!("🔒 PIN set. The UI will ask for it on startup.");

    Ok(())
}

fn run_clear_pin() -> Result<()> {
    let (store, mut state) = open_state()?;
    state.clear_pin(&store)?;
    println!("🔓 PIN cleared.");

    Ok(())
}

fn run_set_cadence(args: &[String]) -> Result<()> {
    let Some(raw) = args.first() else {
        bail!("Usage: financeos set-cadence <off|daily|weekly|monthly>");
    };

    let cadence = BackupCadence::parse(raw)
        .ok_or_else(|| anyhow::anyhow!("Unknown cadence '{}' (off|daily|weekly|monthly)", raw))?;

    let (store, mut state) = open_state()?;
    state.set_backup_cadence(&store, cadence)?;

    println!("⏰ Backup cadence: {}", cadence.as_str());
    if state.prefs.backup_due(chrono::Utc::now()) {
        println!("   A backup is already due - run `financeos export <path>`.");
    }

    Ok(())
}

#[cfg(feature = "tui")]
fn run_ui_mode() -> Result<()> {
    let (store, state) = open_state()?;

    if state.prefs.backup_due(Utc::now()) {
        println!("⏰ Backup due - run `financeos export <path>` when you're done.");
    }

    let mut app = ui::App::new(state, store);
    ui::run_ui(&mut app)?;

    // shutdown boundary: preferences written back in one place
    app.state.save(&app.store)?;

    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode() -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    std::process::exit(1);
}
