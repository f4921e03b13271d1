use crate::entities::{Expense, ExpenseFilter, NewExpense};
use crate::error::Outcome;
use crate::reports::{CategoryTotal, MonthlyTotals, YearMonth};
use crate::tracker::Tracker;
use anyhow::Result;
use chrono::Local;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{BarChart, Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use std::io;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Ledger,
    Monthly,
    Categories,
}

impl Page {
    pub fn next(&self) -> Self {
        match self {
            Page::Ledger => Page::Monthly,
            Page::Monthly => Page::Categories,
            Page::Categories => Page::Ledger,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            Page::Ledger => Page::Categories,
            Page::Monthly => Page::Ledger,
            Page::Categories => Page::Monthly,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Page::Ledger => "Expenses",
            Page::Monthly => "Monthly Report",
            Page::Categories => "Categories",
        }
    }
}

// ============================================================================
// FORMS
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    /// 0 = username, 1 = password
    pub focus: usize,
}

impl LoginForm {
    fn field_mut(&mut self) -> &mut String {
        if self.focus == 0 {
            &mut self.username
        } else {
            &mut self.password
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpenseField {
    Date,
    Category,
    Amount,
    Description,
}

impl ExpenseField {
    fn next(self) -> Self {
        match self {
            ExpenseField::Date => ExpenseField::Category,
            ExpenseField::Category => ExpenseField::Amount,
            ExpenseField::Amount => ExpenseField::Description,
            ExpenseField::Description => ExpenseField::Date,
        }
    }

    fn previous(self) -> Self {
        match self {
            ExpenseField::Date => ExpenseField::Description,
            ExpenseField::Category => ExpenseField::Date,
            ExpenseField::Amount => ExpenseField::Category,
            ExpenseField::Description => ExpenseField::Amount,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseForm {
    pub date: String,
    pub category: String,
    pub amount: String,
    pub description: String,
    pub focus: ExpenseField,
}

impl ExpenseForm {
    fn new() -> Self {
        ExpenseForm {
            date: Local::now().date_naive().format("%Y-%m-%d").to_string(),
            category: String::new(),
            amount: String::new(),
            description: String::new(),
            focus: ExpenseField::Date,
        }
    }

    fn field_mut(&mut self) -> &mut String {
        match self.focus {
            ExpenseField::Date => &mut self.date,
            ExpenseField::Category => &mut self.category,
            ExpenseField::Amount => &mut self.amount,
            ExpenseField::Description => &mut self.description,
        }
    }

    /// Step through registered categories, like a read-only combo box
    fn cycle_category(&mut self, categories: &[String], forward: bool) {
        if categories.is_empty() {
            return;
        }
        let len = categories.len();
        let next = match categories.iter().position(|c| c == &self.category) {
            Some(i) if forward => (i + 1) % len,
            Some(i) => (i + len - 1) % len,
            None if forward => 0,
            None => len - 1,
        };
        self.category = categories[next].clone();
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    Login(LoginForm),
    Normal,
    AddExpense(ExpenseForm),
    AddCategory(String),
    Filter(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Status {
    pub text: String,
    pub is_error: bool,
}

// ============================================================================
// APP STATE
// ============================================================================

pub struct App {
    pub tracker: Tracker,
    pub page: Page,
    pub mode: Mode,
    pub expenses: Vec<Expense>,
    pub state: TableState,
    pub total: f64,
    pub monthly: Outcome<MonthlyTotals>,
    pub spending: Outcome<Vec<(YearMonth, f64)>>,
    pub category_totals: Outcome<Vec<CategoryTotal>>,
    pub categories: Vec<String>,
    pub filter: ExpenseFilter,
    pub status: Option<Status>,
    pub export_path: PathBuf,
}

impl App {
    pub fn new(tracker: Tracker) -> Self {
        let mode = if tracker.is_logged_in() {
            Mode::Normal
        } else {
            Mode::Login(LoginForm::default())
        };

        let mut app = Self {
            tracker,
            page: Page::Ledger,
            mode,
            expenses: Vec::new(),
            state: TableState::default(),
            total: 0.0,
            monthly: Outcome::NoData,
            spending: Outcome::NoData,
            category_totals: Outcome::NoData,
            categories: Vec::new(),
            filter: ExpenseFilter::default(),
            status: None,
            export_path: PathBuf::from("expenses_export.csv"),
        };

        if app.tracker.is_logged_in() {
            app.refresh();
        }
        app
    }

    fn info(&mut self, text: impl Into<String>) {
        self.status = Some(Status {
            text: text.into(),
            is_error: false,
        });
    }

    fn error(&mut self, text: impl Into<String>) {
        self.status = Some(Status {
            text: text.into(),
            is_error: true,
        });
    }

    fn load(&mut self) -> crate::error::Result<()> {
        self.categories = self.tracker.categories()?;
        self.expenses = self.tracker.filter_expenses(&self.filter)?;
        self.total = self.tracker.total_spent()?;
        self.monthly = self.tracker.monthly_totals()?;
        self.spending = self.tracker.monthly_spending()?;
        self.category_totals = self.tracker.category_totals()?;
        Ok(())
    }

    /// Reload everything shown on screen from the tracker
    pub fn refresh(&mut self) {
        if let Err(e) = self.load() {
            self.error(e.to_string());
        }

        match self.state.selected() {
            _ if self.expenses.is_empty() => self.state.select(None),
            Some(i) if i >= self.expenses.len() => self.state.select(Some(self.expenses.len() - 1)),
            None => self.state.select(Some(0)),
            _ => {}
        }
    }

    fn clear_data(&mut self) {
        self.expenses.clear();
        self.categories.clear();
        self.total = 0.0;
        self.monthly = Outcome::NoData;
        self.spending = Outcome::NoData;
        self.category_totals = Outcome::NoData;
        self.filter = ExpenseFilter::default();
        self.state.select(None);
    }

    pub fn next(&mut self) {
        let len = self.expenses.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.expenses.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }

    /// Suggested category for the description being typed, if any
    pub fn suggestion(&self, description: &str) -> Option<String> {
        if description.trim().is_empty() {
            return None;
        }
        self.tracker
            .suggest_category(description)
            .ok()
            .flatten()
            .map(|s| s.category)
    }

    /// Handle one key press. Returns `false` when the app should exit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        let mode = std::mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Login(form) => match self.on_login_key(form, key) {
                Some(mode) => mode,
                None => return false,
            },
            Mode::Normal => match self.on_normal_key(key) {
                Some(mode) => mode,
                None => return false,
            },
            Mode::AddExpense(form) => self.on_expense_key(form, key),
            Mode::AddCategory(name) => self.on_category_key(name, key),
            Mode::Filter(keyword) => self.on_filter_key(keyword, key),
        };

        true
    }

    fn on_login_key(&mut self, mut form: LoginForm, key: KeyEvent) -> Option<Mode> {
        match key.code {
            KeyCode::Esc => return None,
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Down | KeyCode::Up => {
                form.focus = 1 - form.focus;
            }
            KeyCode::Backspace => {
                form.field_mut().pop();
            }
            KeyCode::Char(c) => form.field_mut().push(c),
            KeyCode::Enter => {
                let result = self
                    .tracker
                    .login(&form.username, &form.password)
                    .map(|s| s.username().to_string());

                match result {
                    Ok(name) => {
                        self.info(format!("Logged in as {}", name));
                        self.refresh();
                        return Some(Mode::Normal);
                    }
                    Err(e) => {
                        self.error(e.to_string());
                        form.password.clear();
                        form.focus = 1;
                    }
                }
            }
            _ => {}
        }

        Some(Mode::Login(form))
    }

    fn on_normal_key(&mut self, key: KeyEvent) -> Option<Mode> {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return None,
            KeyCode::Tab => {
                if key.modifiers.contains(KeyModifiers::SHIFT) {
                    self.page = self.page.previous();
                } else {
                    self.page = self.page.next();
                }
            }
            KeyCode::BackTab => self.page = self.page.previous(),
            KeyCode::Down | KeyCode::Char('j') => self.next(),
            KeyCode::Up | KeyCode::Char('k') => self.previous(),
            KeyCode::Home if !self.expenses.is_empty() => self.state.select(Some(0)),
            KeyCode::End if !self.expenses.is_empty() => {
                self.state.select(Some(self.expenses.len() - 1))
            }
            KeyCode::Char('a') => {
                if self.categories.is_empty() {
                    self.error("Add a category first (n)");
                } else {
                    return Some(Mode::AddExpense(ExpenseForm::new()));
                }
            }
            KeyCode::Char('n') => return Some(Mode::AddCategory(String::new())),
            KeyCode::Char('/') => return Some(Mode::Filter(self.filter.keyword.clone())),
            KeyCode::Char('c') => {
                self.filter = ExpenseFilter::default();
                self.refresh();
            }
            KeyCode::Char('e') => self.export(),
            KeyCode::Char('l') => {
                self.tracker.logout();
                self.clear_data();
                self.info("Logged out");
                return Some(Mode::Login(LoginForm::default()));
            }
            _ => {}
        }

        Some(Mode::Normal)
    }

    fn on_expense_key(&mut self, mut form: ExpenseForm, key: KeyEvent) -> Mode {
        match key.code {
            KeyCode::Esc => return Mode::Normal,
            KeyCode::Tab | KeyCode::Down => form.focus = form.focus.next(),
            KeyCode::BackTab | KeyCode::Up => form.focus = form.focus.previous(),
            KeyCode::Left if form.focus == ExpenseField::Category => {
                form.cycle_category(&self.categories, false)
            }
            KeyCode::Right if form.focus == ExpenseField::Category => {
                form.cycle_category(&self.categories, true)
            }
            KeyCode::Backspace => {
                form.field_mut().pop();
            }
            KeyCode::Char(c) => form.field_mut().push(c),
            KeyCode::Enter => {
                if form.category.trim().is_empty() {
                    if let Some(suggested) = self.suggestion(&form.description) {
                        form.category = suggested;
                    }
                }

                let input =
                    NewExpense::new(&form.date, &form.category, &form.amount, &form.description);
                match self.tracker.record_expense(&input) {
                    Ok(_) => {
                        self.info("Expense added");
                        self.refresh();
                        return Mode::Normal;
                    }
                    Err(e) => self.error(e.to_string()),
                }
            }
            _ => {}
        }

        Mode::AddExpense(form)
    }

    fn on_category_key(&mut self, mut name: String, key: KeyEvent) -> Mode {
        match key.code {
            KeyCode::Esc => return Mode::Normal,
            KeyCode::Backspace => {
                name.pop();
            }
            KeyCode::Char(c) => name.push(c),
            KeyCode::Enter => match self.tracker.add_category(&name) {
                Ok(Some(_)) => {
                    self.info(format!("Category '{}' added", name.trim()));
                    self.refresh();
                    return Mode::Normal;
                }
                Ok(None) => return Mode::Normal,
                Err(e) => self.error(e.to_string()),
            },
            _ => {}
        }

        Mode::AddCategory(name)
    }

    fn on_filter_key(&mut self, mut keyword: String, key: KeyEvent) -> Mode {
        match key.code {
            KeyCode::Esc => return Mode::Normal,
            KeyCode::Backspace => {
                keyword.pop();
            }
            KeyCode::Char(c) => keyword.push(c),
            KeyCode::Enter => {
                self.filter = ExpenseFilter {
                    keyword: keyword.trim().to_string(),
                    ..self.filter.clone()
                };
                self.refresh();
                return Mode::Normal;
            }
            _ => {}
        }

        Mode::Filter(keyword)
    }

    fn export(&mut self) {
        let path = self.export_path.clone();
        match self.tracker.export_all(&path) {
            Ok(Outcome::Data(rows)) => {
                self.info(format!("Exported {} expenses to {}", rows, path.display()))
            }
            Ok(Outcome::NoData) => self.info("No expenses to export"),
            Err(e) => self.error(e.to_string()),
        }
    }
}

// ============================================================================
// TERMINAL LOOP
// ============================================================================

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res.map_err(Into::into)
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if !app.handle_key(key) {
                return Ok(());
            }
        }
    }
}

// ============================================================================
// RENDERING
// ============================================================================

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with navigation
            Constraint::Min(0),    // Content area
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    if let Mode::Login(form) = &app.mode {
        render_login(f, chunks[1], form);
        render_status_bar(f, chunks[2], app);
        return;
    }

    render_header(f, chunks[0], app);

    match app.page {
        Page::Ledger => render_table(f, chunks[1], app),
        Page::Monthly => render_monthly(f, chunks[1], app),
        Page::Categories => render_categories(f, chunks[1], app),
    }

    render_status_bar(f, chunks[2], app);

    match &app.mode {
        Mode::AddExpense(form) => {
            let suggestion = app.suggestion(&form.description);
            render_expense_form(f, form, suggestion.as_deref());
        }
        Mode::AddCategory(name) => render_prompt(f, " New Category ", name),
        Mode::Filter(keyword) => render_prompt(f, " Filter (category / description) ", keyword),
        _ => {}
    }
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let pages = [Page::Ledger, Page::Monthly, Page::Categories];

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

        tab_spans.push(Span::styled(page.title().to_string(), style));
    }

    let user = app
        .tracker
        .current_session()
        .map(|s| s.username().to_string())
        .unwrap_or_default();

    tab_spans.push(Span::raw("  |  "));
    tab_spans.push(Span::styled(user, Style::default().fg(Color::Cyan)));
    tab_spans.push(Span::raw("  |  "));
    tab_spans.push(Span::styled(
        format!("Total spent: {:.2}", app.total),
        Style::default().fg(Color::Red),
    ));

    let header = Paragraph::new(vec![Line::from(tab_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    f.render_widget(header, area);
}

fn header_row<'a>(titles: impl IntoIterator<Item = String>) -> Row<'a> {
    let cells = titles.into_iter().map(|h| {
        Cell::from(h).style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    });

    Row::new(cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1)
}

fn render_table(f: &mut Frame, area: Rect, app: &mut App) {
    let header = header_row(
        ["Date", "Category", "Amount", "Description"]
            .iter()
            .map(|s| s.to_string()),
    );

    let rows = app.expenses.iter().map(|e| {
        Row::new(vec![
            Cell::from(e.date.to_string()),
            Cell::from(truncate(&e.category, 20)),
            Cell::from(format!("{:.2}", e.amount)).style(Style::default().fg(Color::Red)),
            Cell::from(truncate(&e.description, 40)),
        ])
        .height(1)
    });

    let title = if app.filter.is_empty() {
        " Expenses ".to_string()
    } else {
        format!(" Expenses - filter: '{}' ", app.filter.keyword)
    };

    let table = Table::new(
        rows,
        [
            Constraint::Length(12),
            Constraint::Length(22),
            Constraint::Length(12),
            Constraint::Min(20),
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

    f.render_stateful_widget(table, area, &mut app.state);
}

fn render_no_data(f: &mut Frame, area: Rect, title: &str) {
    let p = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            "  No expenses to show yet. Press 'a' to add one.",
            Style::default().fg(Color::DarkGray),
        )),
    ])
    .block(Block::default().borders(Borders::ALL).title(title.to_string()));

    f.render_widget(p, area);
}

fn render_monthly(f: &mut Frame, area: Rect, app: &App) {
    let (Outcome::Data(spending), Outcome::Data(report)) = (&app.spending, &app.monthly) else {
        render_no_data(f, area, " Monthly Spending ");
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    let labels: Vec<(String, u64)> = spending
        .iter()
        .map(|(month, total)| (month.to_string(), total.round() as u64))
        .collect();
    let data: Vec<(&str, u64)> = labels.iter().map(|(l, v)| (l.as_str(), *v)).collect();

    let chart = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Monthly Spending "),
        )
        .data(data.as_slice())
        .bar_width(8)
        .bar_gap(2)
        .bar_style(Style::default().fg(Color::Cyan))
        .value_style(Style::default().fg(Color::Black).bg(Color::Cyan));

    f.render_widget(chart, chunks[0]);

    let mut titles = vec!["Month".to_string()];
    titles.extend(report.categories.iter().cloned());
    titles.push("Total".to_string());

    let rows = report.rows().into_iter().map(|(month, values)| {
        let mut cells = vec![Cell::from(month.to_string())];
        cells.extend(values.iter().map(|v| Cell::from(format!("{:.2}", v))));
        cells.push(
            Cell::from(format!("{:.2}", report.month_total(month)))
                .style(Style::default().add_modifier(Modifier::BOLD)),
        );
        Row::new(cells)
    });

    let widths = vec![Constraint::Length(12); report.categories.len() + 2];
    let table = Table::new(rows, widths).header(header_row(titles)).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Month x Category "),
    );

    f.render_widget(table, chunks[1]);
}

fn render_categories(f: &mut Frame, area: Rect, app: &App) {
    let Outcome::Data(totals) = &app.category_totals else {
        render_no_data(f, area, " Spending by Category ");
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let labels: Vec<(String, u64)> = totals
        .iter()
        .map(|t| (truncate(&t.category, 10), t.total.round() as u64))
        .collect();
    let data: Vec<(&str, u64)> = labels.iter().map(|(l, v)| (l.as_str(), *v)).collect();

    let chart = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Spending by Category "),
        )
        .data(data.as_slice())
        .bar_width(10)
        .bar_gap(2)
        .bar_style(Style::default().fg(Color::Magenta))
        .value_style(Style::default().fg(Color::Black).bg(Color::Magenta));

    f.render_widget(chart, chunks[0]);

    let rows = totals.iter().map(|t| {
        Row::new(vec![
            Cell::from(truncate(&t.category, 20)),
            Cell::from(format!("{:.2}", t.total)),
            Cell::from(format!("{:.1}%", t.share * 100.0)),
        ])
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(22),
            Constraint::Length(12),
            Constraint::Length(8),
        ],
    )
    .header(header_row(
        ["Category", "Total", "Share"].iter().map(|s| s.to_string()),
    ))
    .block(Block::default().borders(Borders::ALL).title(" Totals "));

    f.render_widget(table, chunks[1]);
}

fn field_line<'a>(label: &'a str, value: String, focused: bool) -> Line<'a> {
    let style = if focused {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };
    let cursor = if focused { "_" } else { "" };

    Line::from(vec![
        Span::styled(format!("  {:<13}", label), Style::default().fg(Color::Cyan)),
        Span::styled(format!("{}{}", value, cursor), style),
    ])
}

fn render_login(f: &mut Frame, area: Rect, form: &LoginForm) {
    let popup = centered_rect(50, 40, area);
    let lines = vec![
        Line::from(""),
        field_line("Username:", form.username.clone(), form.focus == 0),
        field_line("Password:", "*".repeat(form.password.len()), form.focus == 1),
        Line::from(""),
        Line::from(Span::styled(
            "  Enter login | Tab switch | Esc quit",
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(Span::styled(
            "  New here? expense-tracker register --help",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let p = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Expense Tracker - Login "),
    );

    f.render_widget(Clear, popup);
    f.render_widget(p, popup);
}

fn render_expense_form(f: &mut Frame, form: &ExpenseForm, suggestion: Option<&str>) {
    let popup = centered_rect(60, 50, f.size());

    let category = if form.category.is_empty() {
        match suggestion {
            Some(s) => format!("(suggested: {})", s),
            None => String::new(),
        }
    } else {
        form.category.clone()
    };

    let lines = vec![
        Line::from(""),
        field_line("Date:", form.date.clone(), form.focus == ExpenseField::Date),
        field_line("Category:", category, form.focus == ExpenseField::Category),
        field_line("Amount:", form.amount.clone(), form.focus == ExpenseField::Amount),
        field_line(
            "Description:",
            form.description.clone(),
            form.focus == ExpenseField::Description,
        ),
        Line::from(""),
        Line::from(Span::styled(
            "  Enter save | Tab next | ←/→ pick category | Esc cancel",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let p = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(" Add Expense "),
    );

    f.render_widget(Clear, popup);
    f.render_widget(p, popup);
}

fn render_prompt(f: &mut Frame, title: &str, value: &str) {
    let popup = centered_rect(50, 20, f.size());
    let p = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("  {}_", value),
            Style::default().fg(Color::Yellow),
        )),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(title.to_string()),
    );

    f.render_widget(Clear, popup);
    f.render_widget(p, popup);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let mut status_spans = vec![];

    if let Some(status) = &app.status {
        let color = if status.is_error { Color::Red } else { Color::Green };
        status_spans.push(Span::styled(
            format!(" {} ", status.text),
            Style::default().fg(color),
        ));
        status_spans.push(Span::raw(" | "));
    }

    if !matches!(app.mode, Mode::Login(_)) {
        let selected = app.state.selected().map(|i| i + 1).unwrap_or(0);
        status_spans.push(Span::styled(
            format!("Row: {}/{} ", selected, app.expenses.len()),
            Style::default().fg(Color::Cyan),
        ));

        for (key, label) in [
            ("a", " Add"),
            ("n", " Category"),
            ("/", " Filter"),
            ("c", " Clear"),
            ("e", " Export"),
            ("Tab", " Page"),
            ("l", " Logout"),
        ] {
            status_spans.push(Span::raw("| "));
            status_spans.push(Span::styled(key, Style::default().fg(Color::Yellow)));
            status_spans.push(Span::raw(format!("{} ", label)));
        }
        status_spans.push(Span::raw("| "));
        status_spans.push(Span::styled("q", Style::default().fg(Color::Red)));
        status_spans.push(Span::raw(" Quit"));
    }

    let status_bar = Paragraph::new(vec![Line::from(status_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}

// ============================================================================
// TESTS
// ============================================================================
