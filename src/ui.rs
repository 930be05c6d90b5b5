use anyhow::Result;
use chrono::Utc;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use financeos::{
    format_amount, format_signed, icon_for, truncate, AppState, EntryType, Flow, LedgerView,
    PinGate, Store, Transaction, CURRENCY,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use std::io;
use std::time::Duration;

const BLURRED: &str = "•••••";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Home,
    Ledger,
    Settings,
}

impl Page {
    pub fn next(&self) -> Self {
        match self {
            Page::Home => Page::Ledger,
            Page::Ledger => Page::Settings,
            Page::Settings => Page::Home,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            Page::Home => Page::Settings,
            Page::Ledger => Page::Home,
            Page::Settings => Page::Ledger,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Page::Home => "Home",
            Page::Ledger => "Ledger",
            Page::Settings => "Settings",
        }
    }
}

// ============================================================================
// ADD-ENTRY FORM
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    Amount,
    Kind,
}

#[derive(Debug, Clone)]
pub struct AddForm {
    pub field: FormField,
    pub title: String,
    pub amount: String,
    pub entry_type: EntryType,
    pub flow: Flow,
}

impl AddForm {
    pub fn new() -> Self {
        AddForm {
            field: FormField::Title,
            title: String::new(),
            amount: String::new(),
            entry_type: EntryType::Expense,
            flow: Flow::Out,
        }
    }

    /// Pick the entry kind; flow follows the kind's usual direction
    pub fn select_kind(&mut self, entry_type: EntryType) {
        self.entry_type = entry_type;
        self.flow = match entry_type {
            EntryType::Income | EntryType::Fiduciary => Flow::In,
            EntryType::Expense | EntryType::Debt => Flow::Out,
        };
    }

    pub fn toggle_flow(&mut self) {
        self.flow = match self.flow {
            Flow::In => Flow::Out,
            Flow::Out => Flow::In,
        };
    }

    /// Build the transaction, None while the form is incomplete
    pub fn build(&self) -> Option<Transaction> {
        if self.title.trim().is_empty() {
            return None;
        }
        let amount: u64 = self.amount.parse().ok().filter(|a| *a > 0)?;
        Some(Transaction::new(
            self.title.trim(),
            amount,
            self.flow,
            self.entry_type,
        ))
    }
}

#[derive(Debug, Clone)]
pub enum InputMode {
    Normal,
    Search,
    Add(AddForm),
}

// ============================================================================
// APP
// ============================================================================

pub struct App {
    pub state: AppState,
    pub store: Store,
    pub gate: PinGate,
    pub page: Page,
    pub table_state: TableState,
    pub view: LedgerView,
    pub search: String,
    pub input: InputMode,
    pub status: Option<String>,
    pub should_quit: bool,
}

impl App {
    pub fn new(state: AppState, store: Store) -> Self {
        let gate = PinGate::new(state.prefs.pin.clone());
        let mut table_state = TableState::default();
        if !state.ledger.is_empty() {
            table_state.select(Some(0));
        }

        App {
            state,
            store,
            gate,
            page: Page::Home,
            table_state,
            view: LedgerView::All,
            search: String::new(),
            input: InputMode::Normal,
            status: None,
            should_quit: false,
        }
    }

    /// Rows shown on the ledger page: view filter then search, display order
    pub fn visible(&self) -> Vec<Transaction> {
        let needle = self.search.to_lowercase();
        self.state
            .ledger
            .transactions()
            .iter()
            .filter(|tx| self.view.matches(tx))
            .filter(|tx| {
                needle.is_empty()
                    || tx.title.to_lowercase().contains(&needle)
                    || tx.note.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect()
    }

    pub fn selected_transaction(&self) -> Option<Transaction> {
        let visible = self.visible();
        self.table_state
            .selected()
            .and_then(|i| visible.get(i).cloned())
    }

    pub fn apply_view(&mut self, view: LedgerView) {
        self.view = view;
        self.reset_selection();
    }

    fn reset_selection(&mut self) {
        if self.visible().is_empty() {
            self.table_state.select(None);
        } else {
            self.table_state.select(Some(0));
        }
    }

    pub fn next_row(&mut self) {
        let len = self.visible().len();
        if len == 0 {
            return;
        }
        let i = match self.table_state.selected() {
            Some(i) if i >= len - 1 => 0,
            Some(i) => i + 1,
            None => 0,
        };
        self.table_state.select(Some(i));
    }

    pub fn previous_row(&mut self) {
        let len = self.visible().len();
        if len == 0 {
            return;
        }
        let i = match self.table_state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.table_state.select(Some(i));
    }

    pub fn page_down(&mut self) {
        let len = self.visible().len();
        if len == 0 {
            return;
        }
        let i = self
            .table_state
            .selected()
            .map(|i| (i + 10).min(len - 1))
            .unwrap_or(0);
        self.table_state.select(Some(i));
    }

    pub fn page_up(&mut self) {
        let i = self
            .table_state
            .selected()
            .map(|i| i.saturating_sub(10))
            .unwrap_or(0);
        self.table_state.select(Some(i));
    }

    pub fn delete_selected(&mut self) -> Result<()> {
        if let Some(tx) = self.selected_transaction() {
            self.state.remove_transaction(&self.store, &tx.id)?;
            self.status = Some(format!("Deleted \"{}\"", tx.title));
            self.reset_selection();
        }
        Ok(())
    }

    pub fn commit_form(&mut self) -> Result<()> {
        if let InputMode::Add(form) = &self.input {
            match form.build() {
                Some(tx) => {
                    let title = tx.title.clone();
                    self.state.add_transaction(&self.store, tx)?;
                    self.status = Some(format!("Added \"{}\"", title));
                    self.input = InputMode::Normal;
                    self.reset_selection();
                }
                None => {
                    self.status = Some("Need a title and a positive amount".to_string());
                }
            }
        }
        Ok(())
    }

    /// Amount as displayed: blurred when the preference is on
    pub fn display_amount(&self, tx: &Transaction) -> String {
        if self.state.prefs.blur_amounts {
            BLURRED.to_string()
        } else {
            format!(
                "{}{}{}",
                if tx.flow == Flow::In { "+" } else { "-" },
                CURRENCY,
                format_amount(tx.amount)
            )
        }
    }

    pub fn display_balance(&self) -> String {
        if self.state.prefs.blur_amounts {
            BLURRED.to_string()
        } else {
            format_signed(self.state.balance())
        }
    }
}

// ============================================================================
// EVENT LOOP
// ============================================================================

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        app.gate.tick(Utc::now());
        terminal.draw(|f| ui(f, app))?;

        // Poll so the rejected-PIN window clears without a key press
        if !event::poll(Duration::from_millis(250))? {
            continue;
        }

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }

            if !app.gate.is_unlocked() {
                handle_lock_screen_key(app, key.code);
            } else {
                match app.input.clone() {
                    InputMode::Normal => handle_normal_key(app, key.code, key.modifiers)?,
                    InputMode::Search => handle_search_key(app, key.code),
                    InputMode::Add(_) => handle_form_key(app, key.code)?,
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_lock_screen_key(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Backspace => app.gate.backspace(),
        KeyCode::Char(c) => {
            app.gate.push_digit(c, Utc::now());
        }
        _ => {}
    }
}

fn handle_normal_key(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> Result<()> {
    app.status = None;

    match code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Tab => {
            if modifiers.contains(KeyModifiers::SHIFT) {
                app.page = app.page.previous();
            } else {
                app.page = app.page.next();
            }
        }
        KeyCode::BackTab => app.page = app.page.previous(),
        KeyCode::Char('a') => app.input = InputMode::Add(AddForm::new()),
        KeyCode::Char('/') if app.page == Page::Ledger => {
            app.search.clear();
            app.input = InputMode::Search;
        }
        KeyCode::Char('d') if app.page == Page::Ledger => app.delete_selected()?,
        KeyCode::Char('c') if app.page == Page::Ledger => {
            app.search.clear();
            app.apply_view(LedgerView::All);
        }
        KeyCode::Char('1') if app.page == Page::Ledger => app.apply_view(LedgerView::All),
        KeyCode::Char('2') if app.page == Page::Ledger => app.apply_view(LedgerView::Income),
        KeyCode::Char('3') if app.page == Page::Ledger => app.apply_view(LedgerView::Expense),
        KeyCode::Char('4') if app.page == Page::Ledger => app.apply_view(LedgerView::Fiduciary),
        KeyCode::Char('5') if app.page == Page::Ledger => app.apply_view(LedgerView::Debt),
        KeyCode::Char('b') if app.page == Page::Settings => {
            app.state.toggle_blur(&app.store)?;
        }
        KeyCode::Char('f') if app.page == Page::Settings => {
            app.state.toggle_fiduciary(&app.store)?;
        }
        KeyCode::Char('c') if app.page == Page::Settings => {
            let next = app.state.prefs.backup_cadence.next();
            app.state.set_backup_cadence(&app.store, next)?;
        }
        KeyCode::Char('L') => app.gate.lock(),
        KeyCode::Down | KeyCode::Char('j') => app.next_row(),
        KeyCode::Up | KeyCode::Char('k') => app.previous_row(),
        KeyCode::PageDown => app.page_down(),
        KeyCode::PageUp => app.page_up(),
        _ => {}
    }

    Ok(())
}

fn handle_search_key(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Enter | KeyCode::Esc => {
            app.input = InputMode::Normal;
            app.reset_selection();
        }
        KeyCode::Backspace => {
            app.search.pop();
        }
        KeyCode::Char(c) => app.search.push(c),
        _ => {}
    }
}

fn handle_form_key(app: &mut App, code: KeyCode) -> Result<()> {
    let InputMode::Add(mut form) = app.input.clone() else {
        return Ok(());
    };

    match code {
        KeyCode::Esc => {
            app.input = InputMode::Normal;
            return Ok(());
        }
        KeyCode::Enter => {
            if form.field == FormField::Kind {
                app.input = InputMode::Add(form);
                return app.commit_form();
            }
            form.field = match form.field {
                FormField::Title => FormField::Amount,
                FormField::Amount => FormField::Kind,
                FormField::Kind => FormField::Kind,
            };
        }
        KeyCode::Tab => {
            form.field = match form.field {
                FormField::Title => FormField::Amount,
                FormField::Amount => FormField::Kind,
                FormField::Kind => FormField::Title,
            };
        }
        KeyCode::Backspace => match form.field {
            FormField::Title => {
                form.title.pop();
            }
            FormField::Amount => {
                form.amount.pop();
            }
            FormField::Kind => {}
        },
        KeyCode::Char(c) => match form.field {
            FormField::Title => form.title.push(c),
            FormField::Amount => {
                if c.is_ascii_digit() {
                    form.amount.push(c);
                }
            }
            FormField::Kind => match c {
                '1' => form.select_kind(EntryType::Income),
                '2' => form.select_kind(EntryType::Expense),
                '3' => form.select_kind(EntryType::Fiduciary),
                '4' => form.select_kind(EntryType::Debt),
                'x' => form.toggle_flow(),
                _ => {}
            },
        },
        _ => {}
    }

    app.input = InputMode::Add(form);
    Ok(())
}

// ============================================================================
// RENDERING
// ============================================================================

fn ui(f: &mut Frame, app: &mut App) {
    if !app.gate.is_unlocked() {
        render_lock_screen(f, app);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with navigation
            Constraint::Min(0),    // Content area
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    match app.page {
        Page::Home => render_home(f, chunks[1], app),
        Page::Ledger => render_ledger(f, chunks[1], app),
        Page::Settings => render_settings(f, chunks[1], app),
    }

    render_status_bar(f, chunks[2], app);

    if let InputMode::Add(form) = &app.input {
        render_add_form(f, form);
    }
}

fn render_lock_screen(f: &mut Frame, app: &App) {
    let area = centered_rect(40, 9, f.size());

    let dots = (0..financeos::PIN_LEN)
        .map(|i| if i < app.gate.entered_len() { "●" } else { "○" })
        .collect::<Vec<_>>()
        .join(" ");

    let (message, style) = if app.gate.is_rejected() {
        ("Wrong PIN", Style::default().fg(Color::Red))
    } else {
        ("Enter PIN", Style::default().fg(Color::DarkGray))
    };

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "🔒 FinanceOS",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(dots, Style::default().fg(Color::Yellow))),
        Line::from(""),
        Line::from(Span::styled(message, style)),
    ];

    let lock = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    f.render_widget(lock, area);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let pages = [Page::Home, Page::Ledger, Page::Settings];

    let mut tab_spans = vec![];
    for (i, page) in pages.iter().enumerate() {
        if i > 0 {
            tab_spans.push(Span::raw(" │ "));
        }

        let style = if *page == app.page {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        tab_spans.push(Span::styled(page.title(), style));
    }

    tab_spans.push(Span::raw("  |  "));
    tab_spans.push(Span::styled(
        format!("Balance: {}", app.display_balance()),
        Style::default().fg(Color::White),
    ));
    tab_spans.push(Span::raw("  |  "));
    tab_spans.push(Span::styled(
        format!("{} entries", app.state.ledger.len()),
        Style::default().fg(Color::Cyan),
    ));

    let header = Paragraph::new(vec![Line::from(tab_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    f.render_widget(header, area);
}

fn render_home(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(7), Constraint::Min(0)])
        .split(area);

    let totals = app.state.ledger.totals(app.state.prefs.show_fiduciary);
    let blur = app.state.prefs.blur_amounts;
    let money = |v: i64| {
        if blur {
            BLURRED.to_string()
        } else {
            format_signed(v)
        }
    };

    let mut card_lines = vec![
        Line::from(Span::styled(
            "TOTAL BALANCE",
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(Span::styled(
            app.display_balance(),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled(
                format!("Income {}  ", money(totals.income_total)),
                Style::default().fg(Color::Green),
            ),
            Span::styled(
                format!("Expense {}  ", money(totals.expense_total)),
                Style::default().fg(Color::Red),
            ),
            Span::styled(
                format!("Debt {}", money(totals.debt_total)),
                Style::default().fg(Color::Yellow),
            ),
        ]),
    ];

    if app.state.prefs.show_fiduciary {
        card_lines.push(Line::from(Span::styled(
            format!(
                "Fiduciary {} ({} entries held for others)",
                money(totals.fiduciary_total),
                totals.fiduciary_count
            ),
            Style::default().fg(Color::Cyan),
        )));
    }

    let card = Paragraph::new(card_lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Overview ")
            .border_style(Style::default().fg(Color::White)),
    );
    f.render_widget(card, chunks[0]);

    // Recent entries
    let recent: Vec<Line> = app
        .state
        .ledger
        .transactions()
        .iter()
        .take(8)
        .map(|tx| {
            let color = if tx.flow == Flow::In {
                Color::Green
            } else {
                Color::Red
            };
            Line::from(vec![
                Span::raw(format!("{} ", icon_for(&tx.title, tx.flow).glyph())),
                Span::raw(format!("{}  ", tx.date)),
                Span::styled(
                    format!("{:<24}", truncate(&tx.title, 24)),
                    Style::default().fg(Color::White),
                ),
                Span::styled(app.display_amount(tx), Style::default().fg(color)),
            ])
        })
        .collect();

    let recent_block = Paragraph::new(recent).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Recent ")
            .border_style(Style::default().fg(Color::White)),
    );
    f.render_widget(recent_block, chunks[1]);
}

fn render_ledger(f: &mut Frame, area: Rect, app: &mut App) {
    let header_cells = ["", "Date", "Title", "Amount", "Type", "Note"].iter().map(|h| {
        Cell::from(*h).style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    });

    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let visible = app.visible();
    let rows = visible.iter().map(|tx| {
        let color = match tx.entry_type {
            EntryType::Income => Color::Green,
            EntryType::Expense => Color::Red,
            EntryType::Fiduciary => Color::Cyan,
            EntryType::Debt => Color::Yellow,
        };

        let cells = vec![
            Cell::from(icon_for(&tx.title, tx.flow).glyph()),
            Cell::from(tx.date.to_string()),
            Cell::from(truncate(&tx.title, 28)),
            Cell::from(app.display_amount(tx)).style(Style::default().fg(color)),
            Cell::from(tx.entry_type.as_str()).style(Style::default().fg(color)),
            Cell::from(truncate(&tx.note, 24)),
        ];

        Row::new(cells).height(1)
    });

    let title = if app.search.is_empty() {
        format!(" {} ", app.view.title())
    } else {
        format!(" {} / \"{}\" ", app.view.title(), app.search)
    };

    let table = Table::new(
        rows,
        [
            Constraint::Length(2),
            Constraint::Length(12),
            Constraint::Length(30),
            Constraint::Length(14),
            Constraint::Length(10),
            Constraint::Length(26),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(title),
    )
    .highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.table_state);
}

fn render_settings(f: &mut Frame, area: Rect, app: &App) {
    let prefs = &app.state.prefs;
    let on_off = |v: bool| if v { "ON" } else { "off" };

    let lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("b", Style::default().fg(Color::Yellow)),
            Span::raw(format!("  Blur amounts: {}", on_off(prefs.blur_amounts))),
        ]),
        Line::from(vec![
            Span::styled("f", Style::default().fg(Color::Yellow)),
            Span::raw(format!(
                "  Show fiduciary in totals: {}",
                on_off(prefs.show_fiduciary)
            )),
        ]),
        Line::from(vec![
            Span::styled("L", Style::default().fg(Color::Yellow)),
            Span::raw(format!(
                "  Screen lock: {}",
                if prefs.pin.is_some() {
                    "PIN set (press L to lock now)"
                } else {
                    "no PIN (set one with `financeos set-pin`)"
                }
            )),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("c", Style::default().fg(Color::Yellow)),
            Span::raw(format!(
                "  Backup cadence: {}{}",
                prefs.backup_cadence.as_str(),
                if prefs.backup_due(Utc::now()) {
                    "  (backup due - run `financeos export`)"
                } else {
                    ""
                }
            )),
        ]),
        Line::from(Span::raw(format!(
            "   Last backup: {}",
            prefs
                .last_backup_at
                .map(|at| at.format("%Y-%m-%d %H:%M UTC").to_string())
                .unwrap_or_else(|| "never".to_string())
        ))),
    ];

    let settings = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Settings ")
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(settings, area);
}

fn render_add_form(f: &mut Frame, form: &AddForm) {
    let area = centered_rect(50, 10, f.size());

    let field_style = |field: FormField| {
        if form.field == field {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        }
    };

    let lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("Title:  ", field_style(FormField::Title)),
            Span::raw(form.title.clone()),
            Span::raw(if form.field == FormField::Title { "_" } else { "" }),
        ]),
        Line::from(vec![
            Span::styled("Amount: ", field_style(FormField::Amount)),
            Span::raw(format!("{}{}", CURRENCY, form.amount)),
            Span::raw(if form.field == FormField::Amount { "_" } else { "" }),
        ]),
        Line::from(vec![
            Span::styled("Kind:   ", field_style(FormField::Kind)),
            Span::raw(format!(
                "{} ({})  [1 income  2 expense  3 fiduciary  4 debt, x flips flow]",
                form.entry_type.as_str(),
                form.flow.as_str()
            )),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "Enter next/save · Tab field · Esc cancel",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let block = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Add Entry ")
            .border_style(Style::default().fg(Color::Green)),
    );

    f.render_widget(ratatui::widgets::Clear, area);
    f.render_widget(block, area);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![];

    if let Some(status) = &app.status {
        spans.push(Span::styled(
            format!(" {} ", status),
            Style::default().fg(Color::Green),
        ));
        spans.push(Span::raw("| "));
    }

    match app.input {
        InputMode::Search => {
            spans.push(Span::styled("Search: ", Style::default().fg(Color::Cyan)));
            spans.push(Span::raw(app.search.clone()));
            spans.push(Span::raw("_  (Enter/Esc done)"));
        }
        _ => {
            spans.push(Span::styled("a", Style::default().fg(Color::Yellow)));
            spans.push(Span::raw(" Add | "));
            spans.push(Span::styled("d", Style::default().fg(Color::Yellow)));
            spans.push(Span::raw(" Delete | "));
            spans.push(Span::styled("1-5", Style::default().fg(Color::Yellow)));
            spans.push(Span::raw(" Filter | "));
            spans.push(Span::styled("/", Style::default().fg(Color::Yellow)));
            spans.push(Span::raw(" Search | "));
            spans.push(Span::styled("Tab", Style::default().fg(Color::Yellow)));
            spans.push(Span::raw(" Page | "));
            spans.push(Span::styled("q", Style::default().fg(Color::Red)));
            spans.push(Span::raw(" Quit"));
        }
    }

    let status_bar = Paragraph::new(vec![Line::from(spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn tx(date: &str, title: &str, amount: u64, flow: Flow, entry_type: EntryType) -> Transaction {
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap();
        Transaction::on_date(date, title, amount, flow, entry_type)
    }

    fn test_app() -> App {
        let store = Store::open_in_memory().unwrap();
        let mut state = AppState::load(&store).unwrap();
        state
            .add_transaction(
                &store,
                tx("2024-01-05", "Salary", 450000, Flow::In, EntryType::Income),
            )
            .unwrap();
        state
            .add_transaction(
                &store,
                tx("2024-01-06", "Groceries", 15000, Flow::Out, EntryType::Expense),
            )
            .unwrap();
        state
            .add_transaction(
                &store,
                tx("2024-01-07", "Sister savings", 50000, Flow::In, EntryType::Fiduciary),
            )
            .unwrap();
        App::new(state, store)
    }

    #[test]
    fn test_visible_respects_view_and_search() {
        let mut app = test_app();

        assert_eq!(app.visible().len(), 3);

        app.apply_view(LedgerView::Expense);
        assert_eq!(app.visible().len(), 1);
        assert_eq!(app.visible()[0].title, "Groceries");

        app.apply_view(LedgerView::All);
        app.search = "sav".to_string();
        assert_eq!(app.visible().len(), 1);
        assert_eq!(app.visible()[0].title, "Sister savings");
    }

    #[test]
    fn test_row_navigation_wraps() {
        let mut app = test_app();

        assert_eq!(app.table_state.selected(), Some(0));
        app.next_row();
        app.next_row();
        assert_eq!(app.table_state.selected(), Some(2));
        app.next_row();
        assert_eq!(app.table_state.selected(), Some(0));
        app.previous_row();
        assert_eq!(app.table_state.selected(), Some(2));
    }

    #[test]
    fn test_delete_selected_mirrors_store() {
        let mut app = test_app();

        // first visible row is the newest entry
        let first = app.visible()[0].title.clone();
        app.delete_selected().unwrap();

        assert_eq!(app.state.ledger.len(), 2);
        assert_eq!(app.store.transaction_count().unwrap(), 2);
        assert!(app.visible().iter().all(|t| t.title != first));
    }

    #[test]
    fn test_form_builds_transaction() {
        let mut form = AddForm::new();
        assert!(form.build().is_none());

        form.title = "Lunch".to_string();
        assert!(form.build().is_none()); // no amount yet

        form.amount = "2500".to_string();
        let built = form.build().unwrap();
        assert_eq!(built.title, "Lunch");
        assert_eq!(built.amount, 2500);
        assert_eq!(built.flow, Flow::Out);
        assert_eq!(built.entry_type, EntryType::Expense);
    }

    #[test]
    fn test_form_kind_sets_flow() {
        let mut form = AddForm::new();

        form.select_kind(EntryType::Income);
        assert_eq!(form.flow, Flow::In);

        form.select_kind(EntryType::Debt);
        assert_eq!(form.flow, Flow::Out);

        form.toggle_flow();
        assert_eq!(form.flow, Flow::In);
    }

    #[test]
    fn test_form_rejects_zero_amount() {
        let mut form = AddForm::new();
        form.title = "Nothing".to_string();
        form.amount = "0".to_string();
        assert!(form.build().is_none());
    }

    #[test]
    fn test_commit_form_adds_entry() {
        let mut app = test_app();

        let mut form = AddForm::new();
        form.title = "Fuel".to_string();
        form.amount = "7000".to_string();
        form.field = FormField::Kind;
        app.input = InputMode::Add(form);

        app.commit_form().unwrap();

        assert_eq!(app.state.ledger.len(), 4);
        assert_eq!(app.store.transaction_count().unwrap(), 4);
        assert!(matches!(app.input, InputMode::Normal));
    }

    #[test]
    fn test_display_amount_blurs() {
        let mut app = test_app();
        let tx = app.visible()[0].clone();

        assert!(app.display_amount(&tx).contains(CURRENCY));

        app.state.prefs.blur_amounts = true;
        assert_eq!(app.display_amount(&tx), BLURRED);
        assert_eq!(app.display_balance(), BLURRED);
    }

    #[test]
    fn test_settings_key_cycles_backup_cadence() {
        use financeos::BackupCadence;

        let mut app = test_app();
        app.page = Page::Settings;
        assert_eq!(app.state.prefs.backup_cadence, BackupCadence::Off);

        handle_normal_key(&mut app, KeyCode::Char('c'), KeyModifiers::NONE).unwrap();
        assert_eq!(app.state.prefs.backup_cadence, BackupCadence::Daily);

        // a fresh cadence with no prior backup means a backup is due
        assert!(app.state.prefs.backup_due(Utc::now()));

        // the toggle is mirrored, so a reload sees it
        let reloaded = app.store.load_preferences().unwrap();
        assert_eq!(reloaded.backup_cadence, BackupCadence::Daily);

        handle_normal_key(&mut app, KeyCode::Char('c'), KeyModifiers::NONE).unwrap();
        handle_normal_key(&mut app, KeyCode::Char('c'), KeyModifiers::NONE).unwrap();
        handle_normal_key(&mut app, KeyCode::Char('c'), KeyModifiers::NONE).unwrap();
        assert_eq!(app.state.prefs.backup_cadence, BackupCadence::Off);

        // on the ledger page 'c' clears filters instead
        app.page = Page::Ledger;
        handle_normal_key(&mut app, KeyCode::Char('c'), KeyModifiers::NONE).unwrap();
        assert_eq!(app.state.prefs.backup_cadence, BackupCadence::Off);
    }

    #[test]
    fn test_locked_app_starts_gated() {
        let store = Store::open_in_memory().unwrap();
        let mut state = AppState::load(&store).unwrap();
        state.set_pin(&store, "1234").unwrap();

        let app = App::new(state, store);
        assert!(!app.gate.is_unlocked());
    }
}
