use anyhow::Result;
use chrono::NaiveDate;
use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::io;

use tri_ledger::filter::{self, CategoryFilter};
use tri_ledger::report::{format_money, format_percent};
use tri_ledger::transaction::format_date;
use tri_ledger::{
    Company, DashboardReport, ParentCategory, ReportOptions, RuleEngine, Selection, Transaction,
    TransactionStore,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Dashboard,
    Categories,
    Transactions,
    Monthly,
}

impl Page {
    pub const ALL: [Page; 4] = [Page::Dashboard, Page::Categories, Page::Transactions, Page::Monthly];

    pub fn next(&self) -> Self {
        match self {
            Page::Dashboard => Page::Categories,
            Page::Categories => Page::Transactions,
            Page::Transactions => Page::Monthly,
            Page::Monthly => Page::Dashboard,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            Page::Dashboard => Page::Monthly,
            Page::Categories => Page::Dashboard,
            Page::Transactions => Page::Categories,
            Page::Monthly => Page::Transactions,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Page::Dashboard => "Dashboard",
            Page::Categories => "Categories",
            Page::Transactions => "Transactions",
            Page::Monthly => "Monthly",
        }
    }
}

pub struct App {
    store: TransactionStore,
    engine: RuleEngine,
    options: ReportOptions,
    today: NaiveDate,
    pub company: Company,
    pub report: DashboardReport,
    /// Company transactions after the category filter, newest first
    pub transactions: Vec<Transaction>,
    pub category_filter: Option<CategoryFilter>,
    pub state: TableState,
    pub current_page: Page,
    pub show_detail: bool,
}

impl App {
    pub fn new(
        store: TransactionStore,
        engine: RuleEngine,
        options: ReportOptions,
        company: Company,
        today: NaiveDate,
    ) -> Self {
        let report = DashboardReport::build(
            store.transactions(),
            &Selection::company(company),
            &options,
            &engine,
            today,
        );

        let mut app = Self {
            store,
            engine,
            options,
            today,
            company,
            report,
            transactions: Vec::new(),
            category_filter: None,
            state: TableState::default(),
            current_page: Page::Dashboard,
            show_detail: false,
        };
        app.refresh();
        app
    }

    /// Re-run the whole pipeline for the current selection
    pub fn refresh(&mut self) {
        let selection = Selection::company(self.company);
        self.report = DashboardReport::build(
            self.store.transactions(),
            &selection,
            &self.options,
            &self.engine,
            self.today,
        );

        let mut transactions: Vec<Transaction> = filter::apply(self.store.transactions(), &selection)
            .into_iter()
            .map(|tx| tx.ensure_categorized(&self.engine))
            .collect();
        if let Some(category) = &self.category_filter {
            transactions = filter::by_category(&transactions, category);
        }
        transactions.sort_by(|a, b| b.date().cmp(&a.date()));
        self.transactions = transactions;

        // Reset selection to first item
        if self.transactions.is_empty() {
            self.state.select(None);
        } else {
            self.state.select(Some(0));
        }
    }

    pub fn next_company(&mut self) {
        self.company = self.company.next();
        self.refresh();
    }

    pub fn previous_company(&mut self) {
        self.company = self.company.previous();
        self.refresh();
    }

    pub fn next_page(&mut self) {
        self.current_page = self.current_page.next();
    }

    pub fn previous_page(&mut self) {
        self.current_page = self.current_page.previous();
    }

    /// None → each parent in taxonomy order → None
    pub fn cycle_parent_filter(&mut self) {
        let next = match &self.category_filter {
            None => Some(ParentCategory::ALL[0]),
            Some(current) => ParentCategory::ALL
                .iter()
                .position(|p| *p == current.parent)
                .and_then(|i| ParentCategory::ALL.get(i + 1))
                .copied(),
        };
        self.category_filter = next.map(|parent| CategoryFilter {
            parent,
            subcategory: None,
        });
        self.refresh();
    }

    pub fn clear_filter(&mut self) {
        self.category_filter = None;
        self.refresh();
    }

    pub fn toggle_detail(&mut self) {
        self.show_detail = !self.show_detail;
    }

    pub fn selected_transaction(&self) -> Option<&Transaction> {
        self.state.selected().and_then(|i| self.transactions.get(i))
    }

    pub fn next(&mut self) {
        let len = self.transactions.len();
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
        let len = self.transactions.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }

    pub fn page_down(&mut self) {
        let len = self.transactions.len();
        if len == 0 {
            return;
        }
        let i = self.state.selected().map_or(0, |i| (i + 20).min(len - 1));
        self.state.select(Some(i));
    }

    pub fn page_up(&mut self) {
        if self.transactions.is_empty() {
            return;
        }
        let i = self.state.selected().map_or(0, |i| i.saturating_sub(20));
        self.state.select(Some(i));
    }

    fn accent(&self) -> Color {
        self.company.primary_color().parse().unwrap_or(Color::Cyan)
    }
}

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

    if let Err(err) = res {
        println!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Enter => app.toggle_detail(),
                KeyCode::Tab => {
                    if key.modifiers.contains(KeyModifiers::SHIFT) {
                        app.previous_page();
                    } else {
                        app.next_page();
                    }
                }
                KeyCode::BackTab => app.previous_page(),
                KeyCode::Right | KeyCode::Char('l') => app.next_company(),
                KeyCode::Left | KeyCode::Char('h') => app.previous_company(),
                KeyCode::Char('f') => {
                    app.cycle_parent_filter();
                    app.current_page = Page::Transactions;
                }
                KeyCode::Char('c') => app.clear_filter(),
                KeyCode::Down | KeyCode::Char('j') => app.next(),
                KeyCode::Up | KeyCode::Char('k') => app.previous(),
                KeyCode::PageDown => app.page_down(),
                KeyCode::PageUp => app.page_up(),
                KeyCode::Home if !app.transactions.is_empty() => app.state.select(Some(0)),
                KeyCode::End if !app.transactions.is_empty() => {
                    app.state.select(Some(app.transactions.len() - 1))
                }
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with company + page tabs
            Constraint::Min(0),    // Content area
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    if app.show_detail && app.current_page == Page::Transactions {
        let content_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(chunks[1]);

        render_transactions(f, content_chunks[0], app);
        render_detail_panel(f, content_chunks[1], app);
    } else {
        match app.current_page {
            Page::Dashboard => render_dashboard(f, chunks[1], app),
            Page::Categories => render_categories(f, chunks[1], app),
            Page::Transactions => render_transactions(f, chunks[1], app),
            Page::Monthly => render_monthly(f, chunks[1], app),
        }
    }

    render_status_bar(f, chunks[2], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![
        Span::styled(
            format!("{} {}", app.company.logo(), app.company.name()),
            Style::default().fg(app.accent()).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  |  "),
    ];

    for (i, page) in Page::ALL.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" │ "));
        }
        let style = if *page == app.current_page {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(page.title().to_string(), style));
    }

    spans.push(Span::raw("  |  "));
    spans.push(Span::styled(
        format!("↑ {}", app.report.totals.income_count),
        Style::default().fg(Color::Green),
    ));
    spans.push(Span::raw("  "));
    spans.push(Span::styled(
        format!("↓ {}", app.report.totals.expense_count),
        Style::default().fg(Color::Red),
    ));

    let header = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.accent())),
    );
    f.render_widget(header, area);
}

fn metric_line(label: &str, value: String, color: Color) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("  {:<16}", label),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::styled(value, Style::default().fg(color)),
    ])
}

fn bar_value(amount: Decimal) -> u64 {
    amount.round().to_u64().unwrap_or(0)
}

fn render_dashboard(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(42), Constraint::Min(0)])
        .split(area);

    let report = &app.report;
    let t = &report.totals;
    let balance_color = if t.balance < Decimal::ZERO { Color::Red } else { Color::Green };

    let metrics = vec![
        Line::from(""),
        metric_line("Income", format_money(t.total_income), Color::Green),
        metric_line("Expenses", format_money(t.total_expenses), Color::Red),
        metric_line("Balance", format_money(t.balance), balance_color),
        Line::from(""),
        metric_line("Expense ratio", format_percent(report.ratios.expense_ratio), Color::White),
        metric_line("Profit margin", format_percent(report.ratios.profit_margin), Color::White),
        metric_line("Efficiency", format_percent(report.ratios.efficiency), Color::White),
        Line::from(""),
        metric_line("Avg income", format_money(report.averages.average_income), Color::Green),
        metric_line("Avg expense", format_money(report.averages.average_expense), Color::Red),
        metric_line("Transactions", report.transaction_count.to_string(), Color::White),
    ];

    let summary = Paragraph::new(metrics).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Summary "),
    );
    f.render_widget(summary, chunks[0]);

    let groups: Vec<BarGroup> = report
        .daily
        .iter()
        .map(|point| {
            BarGroup::default()
                .label(Line::from(point.label.clone()))
                .bars(&[
                    Bar::default()
                        .value(bar_value(point.income))
                        .style(Style::default().fg(Color::Green))
                        .text_value(String::new()),
                    Bar::default()
                        .value(bar_value(point.expense))
                        .style(Style::default().fg(Color::Red))
                        .text_value(String::new()),
                ])
        })
        .collect();

    let mut chart = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::White))
                .title(format!(" Cash flow - last {} days (income / expense) ", report.daily.len())),
        )
        .bar_width(3)
        .bar_gap(1)
        .group_gap(2);
    for group in groups {
        chart = chart.data(group);
    }
    f.render_widget(chart, chunks[1]);
}

fn render_categories(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(10), Constraint::Min(0)])
        .split(area);

    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[0]);

    let parent_rows = app.report.by_parent.iter().map(|entry| {
        let color = ParentCategory::from_label(&entry.label)
            .and_then(|p| p.color().parse().ok())
            .unwrap_or(Color::White);
        Row::new(vec![
            Cell::from(entry.label.clone()).style(Style::default().fg(color)),
            Cell::from(format_money(entry.total)),
            Cell::from(entry.count.to_string()),
        ])
    });
    let parents = Table::new(
        parent_rows,
        [Constraint::Length(24), Constraint::Length(14), Constraint::Length(6)],
    )
    .header(header_row(&["Category", "Total", "#"]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" By parent category "),
    );
    f.render_widget(parents, top[0]);

    let top_rows = app.report.top_subcategories.iter().enumerate().map(|(i, entry)| {
        Row::new(vec![
            Cell::from(format!("{}.", i + 1)),
            Cell::from(entry.label.clone()),
            Cell::from(format_money(entry.total)).style(Style::default().fg(Color::Red)),
        ])
    });
    let top_table = Table::new(
        top_rows,
        [Constraint::Length(3), Constraint::Length(24), Constraint::Length(14)],
    )
    .header(header_row(&["", "Subcategory", "Total"]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(format!(" Top {} expenses ", app.options.top_subcategories)),
    );
    f.render_widget(top_table, top[1]);

    let summary_rows = app.report.expense_summary.iter().map(|row| {
        Row::new(vec![
            Cell::from(row.label.clone()),
            Cell::from(format_money(row.total)),
            Cell::from(row.count.to_string()),
            Cell::from(truncate(&row.examples, 60)),
        ])
    });
    let summary = Table::new(
        summary_rows,
        [
            Constraint::Length(24),
            Constraint::Length(14),
            Constraint::Length(6),
            Constraint::Min(20),
        ],
    )
    .header(header_row(&["Subcategory", "Total", "#", "Examples"]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Expense summary "),
    );
    f.render_widget(summary, chunks[1]);
}

fn render_transactions(f: &mut Frame, area: Rect, app: &mut App) {
    let rows = app.transactions.iter().map(|tx| {
        let color = if tx.is_income() { Color::Green } else { Color::Red };
        let (parent, sub) = match tx.category() {
            Some(c) => (c.parent.label(), c.subcategory.as_str()),
            None => ("-", "-"),
        };

        Row::new(vec![
            Cell::from(format_date(tx.date())),
            Cell::from(truncate(tx.description(), 36)),
            Cell::from(format_money(tx.amount())).style(Style::default().fg(color)),
            Cell::from(tx.transaction_type().label()).style(Style::default().fg(color)),
            Cell::from(truncate(parent, 22)),
            Cell::from(truncate(sub, 22)),
        ])
        .height(1)
    });

    let title = match &app.category_filter {
        Some(filter) => format!(" Transactions - {} ", filter.parent.label()),
        None => " Transactions ".to_string(),
    };

    let table = Table::new(
        rows,
        [
            Constraint::Length(12),
            Constraint::Length(38),
            Constraint::Length(12),
            Constraint::Length(8),
            Constraint::Length(24),
            Constraint::Length(24),
        ],
    )
    .header(header_row(&["Date", "Description", "Amount", "Type", "Category", "Subcategory"]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(title),
    )
    .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn render_monthly(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);

    let monthly_rows = app.report.monthly.iter().map(|point| {
        let color = if point.amount < Decimal::ZERO { Color::Red } else { Color::Green };
        Row::new(vec![
            Cell::from(point.label.clone()),
            Cell::from(format_money(point.income)),
            Cell::from(format_money(point.expenses)),
            Cell::from(format_money(point.amount)).style(Style::default().fg(color)),
        ])
    });
    let monthly = Table::new(
        monthly_rows,
        [
            Constraint::Length(8),
            Constraint::Length(13),
            Constraint::Length(13),
            Constraint::Length(13),
        ],
    )
    .header(header_row(&["Month", "Income", "Expenses", "Net"]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Monthly evolution "),
    );
    f.render_widget(monthly, chunks[0]);

    let category_rows = app.report.monthly_by_parent.iter().map(|point| {
        Row::new(vec![
            Cell::from(point.label.clone()),
            Cell::from(format!("{} {}", point.parent.icon(), point.parent.label())),
            Cell::from(format_money(point.amount)),
        ])
    });
    let by_parent = Table::new(
        category_rows,
        [Constraint::Length(8), Constraint::Length(28), Constraint::Length(13)],
    )
    .header(header_row(&["Month", "Category", "Amount"]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" By category "),
    );
    f.render_widget(by_parent, chunks[1]);
}

fn header_row(titles: &[&'static str]) -> Row<'static> {
    Row::new(titles.iter().map(|h| {
        Cell::from(*h).style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
    }))
    .style(Style::default().bg(Color::DarkGray))
    .height(1)
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let selected = app.state.selected().map(|i| i + 1).unwrap_or(0);

    let mut spans = vec![Span::styled(
        format!(" Row: {}/{} ", selected, app.transactions.len()),
        Style::default().fg(Color::Cyan),
    )];

    if let Some(filter) = &app.category_filter {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(
            format!("Filter: {}", filter.parent.label()),
            Style::default().fg(Color::Green),
        ));
        spans.push(Span::raw(" ("));
        spans.push(Span::styled("c", Style::default().fg(Color::Yellow)));
        spans.push(Span::raw(" clear)"));
    }

    spans.push(Span::raw(" | "));
    for (key, action) in [
        ("←/→", " Company | "),
        ("Tab", " Page | "),
        ("f", " Filter | "),
        ("Enter", " Details | "),
        ("↑/↓", " Nav | "),
    ] {
        spans.push(Span::styled(key, Style::default().fg(Color::Yellow)));
        spans.push(Span::raw(action));
    }
    spans.push(Span::styled("q", Style::default().fg(Color::Red)));
    spans.push(Span::raw(" Quit"));

    let status_bar = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );
    f.render_widget(status_bar, area);
}

fn render_detail_panel(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" Transaction Details ");

    let tx = match app.selected_transaction() {
        Some(t) => t,
        None => {
            f.render_widget(Paragraph::new("No transaction selected").block(block), area);
            return;
        }
    };

    let color = if tx.is_income() { Color::Green } else { Color::Red };
    let category = tx
        .category()
        .map(|c| format!("{} {}", c.parent.icon(), c))
        .unwrap_or_else(|| "-".to_string());

    let mut content = vec![
        Line::from(""),
        metric_line("Date", format_date(tx.date()), Color::White),
        metric_line("Amount", format_money(tx.amount()), color),
        metric_line("Type", tx.transaction_type().label().to_string(), color),
        metric_line("Company", tx.company().name().to_string(), Color::White),
        metric_line("Category", category, Color::White),
        Line::from(""),
        Line::from("  ─────────────────────────────────────"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "  DESCRIPTION",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        )]),
        Line::from(""),
    ];
    for line in wrap_text(tx.description(), 35) {
        content.push(Line::from(Span::styled(
            format!("  {}", line),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )));
    }
    content.push(Line::from(""));
    content.push(Line::from(Span::styled(
        "  Press Enter to close",
        Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
    )));

    f.render_widget(Paragraph::new(content).block(block), area);
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let needed = current.chars().count() + word.chars().count() + usize::from(!current.is_empty());
        if needed > width && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use tri_ledger::FixtureSource;

    fn app() -> App {
        let engine = RuleEngine::default();
        let store = TransactionStore::load(&FixtureSource).unwrap();
        App::new(
            store,
            engine,
            ReportOptions::default(),
            Company::WTravelChile,
            NaiveDate::from_ymd_opt(2024, 7, 15).unwrap(),
        )
    }

    #[test]
    fn test_company_switch_recomputes_report() {
        let mut app = app();
        assert_eq!(app.report.company, Company::WTravelChile);

        app.next_company();
        assert_eq!(app.company, Company::WolfTravelChile);
        assert_eq!(app.report.company, Company::WolfTravelChile);
        assert!(app.transactions.iter().all(|tx| tx.company() == Company::WolfTravelChile));

        app.previous_company();
        app.previous_company();
        assert_eq!(app.report.company, Company::HelpMeTravelSpa);
    }

    #[test]
    fn test_page_cycle() {
        let mut app = app();
        for expected in [Page::Categories, Page::Transactions, Page::Monthly, Page::Dashboard] {
            app.next_page();
            assert_eq!(app.current_page, expected);
        }
        app.previous_page();
        assert_eq!(app.current_page, Page::Monthly);
    }

    #[test]
    fn test_parent_filter_cycles_through_taxonomy() {
        let mut app = app();
        let all = app.transactions.len();

        app.cycle_parent_filter();
        assert_eq!(app.category_filter.as_ref().map(|f| f.parent), Some(ParentCategory::Income));
        assert!(app.transactions.len() < all);
        assert!(app.transactions.iter().all(|tx| tx.is_income()));

        for _ in 1..ParentCategory::ALL.len() {
            app.cycle_parent_filter();
        }
        assert_eq!(app.category_filter.as_ref().map(|f| f.parent), Some(ParentCategory::Travel));

        app.cycle_parent_filter();
        assert!(app.category_filter.is_none());
        assert_eq!(app.transactions.len(), all);
    }

    #[test]
    fn test_navigation_wraps() {
        let mut app = app();
        let len = app.transactions.len();
        assert_eq!(app.state.selected(), Some(0));

        app.previous();
        assert_eq!(app.state.selected(), Some(len - 1));
        app.next();
        assert_eq!(app.state.selected(), Some(0));

        app.page_down();
        assert_eq!(app.state.selected(), Some(20.min(len - 1)));
        app.page_up();
        assert_eq!(app.state.selected(), Some(0));
    }

    #[test]
    fn test_transactions_newest_first() {
        let app = app();
        let dates: Vec<_> = app.transactions.iter().map(|tx| tx.date()).collect();
        assert!(dates.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("Comisión", 20), "Comisión");
        assert_eq!(truncate("Venta paquete turístico Europa", 12), "Venta paq...");
        assert_eq!(truncate("áéíóú", 4), "á...");
    }

    #[test]
    fn test_wrap_text() {
        assert_eq!(wrap_text("Pago arriendo oficina", 10), ["Pago", "arriendo", "oficina"]);
        assert_eq!(wrap_text("Pago arriendo", 20), ["Pago arriendo"]);
        assert!(wrap_text("", 10).is_empty());
    }
}
