// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use tri_ledger::report::{format_money, format_percent};
use tri_ledger::transaction::{format_date, parse_date};
use tri_ledger::{
    filter, write_csv, CategorizerVariant, Company, DashboardConfig, DashboardReport, DateRange,
    ParentCategory, RuleEngine, Selection, TransactionStore, TransactionType,
};

/// Income and expense dashboards for the travel companies
#[derive(Parser, Debug)]
#[command(name = "tri-ledger", version, about, long_about = None)]
struct Cli {
    /// JSON config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory with one CSV per company (overrides config)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Built-in rule set: hierarchical or expense-overview (overrides config)
    #[arg(long, global = true)]
    categorizer: Option<CategorizerVariant>,

    /// End of the daily window, DD/MM/YYYY (defaults to the local date)
    #[arg(long, global = true, value_parser = parse_date_arg)]
    today: Option<NaiveDate>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the dashboard report for a company
    Summary {
        /// Company name or code (w-travel, wolf-travel, helpmetravel)
        #[arg(short, long)]
        company: Option<String>,

        /// First day included, DD/MM/YYYY
        #[arg(long, value_parser = parse_date_arg)]
        from: Option<NaiveDate>,

        /// Last day included, DD/MM/YYYY
        #[arg(long, value_parser = parse_date_arg)]
        to: Option<NaiveDate>,

        /// Emit the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Categorize a company's transactions and export them as CSV
    Categorize {
        #[arg(short, long)]
        company: Option<String>,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Categorize a single description
    Classify {
        description: String,

        /// Ingreso or Gasto
        #[arg(short = 't', long = "type", default_value = "Gasto")]
        transaction_type: String,
    },
    /// Print the category hierarchy
    Taxonomy,
    /// Interactive terminal dashboard
    Tui {
        #[arg(short, long)]
        company: Option<String>,
    },
}

fn parse_date_arg(text: &str) -> Result<NaiveDate, String> {
    parse_date(text).map_err(|e| e.to_string())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = DashboardConfig::load(cli.config.as_deref())?;
    if cli.data_dir.is_some() {
        config.data_dir = cli.data_dir.clone();
    }
    if let Some(variant) = cli.categorizer {
        config.categorizer = variant;
    }
    let today = cli
        .today
        .unwrap_or_else(|| chrono::Local::now().date_naive());

    match cli.command {
        Some(Command::Summary { company, from, to, json }) => {
            run_summary(&config, company.as_deref(), from, to, json, today)
        }
        Some(Command::Categorize { company, output }) => {
            run_categorize(&config, company.as_deref(), output)
        }
        Some(Command::Classify { description, transaction_type }) => {
            run_classify(&config, &description, &transaction_type)
        }
        Some(Command::Taxonomy) => {
            run_taxonomy();
            Ok(())
        }
        Some(Command::Tui { company }) => run_ui_mode(&config, company.as_deref(), today),
        // UI mode (default)
        None => run_ui_mode(&config, None, today),
    }
}

fn pick_company(config: &DashboardConfig, company: Option<&str>) -> Company {
    company.map(Company::resolve).unwrap_or(config.default_company)
}

fn load(config: &DashboardConfig) -> Result<(RuleEngine, TransactionStore)> {
    let engine = config.build_engine()?;
    let store = config.load_store(&engine)?;
    Ok((engine, store))
}

fn run_summary(
    config: &DashboardConfig,
    company: Option<&str>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    json: bool,
    today: NaiveDate,
) -> Result<()> {
    let (engine, store) = load(config)?;
    let selection = Selection {
        company: pick_company(config, company),
        date_range: DateRange::from_bounds(from, to)?,
    };

    let report = DashboardReport::build(
        store.transactions(),
        &selection,
        &config.report_options(),
        &engine,
        today,
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_report(&report);
    Ok(())
}

fn print_report(report: &DashboardReport) {
    println!("{} {}", report.logo, report.company);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    if let Some(range) = report.selection.date_range {
        let bound = |date: NaiveDate| {
            if date == NaiveDate::MIN || date == NaiveDate::MAX {
                "…".to_string()
            } else {
                format_date(date)
            }
        };
        println!("Range: {} → {}", bound(range.start()), bound(range.end()));
    }
    println!("Transactions: {}", report.transaction_count);

    if report.is_empty() {
        println!("\n⚠️  No transactions for this selection");
        return;
    }

    let t = &report.totals;
    println!("\n💰 Totals");
    println!("   Income:   {:>14}  ({} transactions)", format_money(t.total_income), t.income_count);
    println!("   Expenses: {:>14}  ({} transactions)", format_money(t.total_expenses), t.expense_count);
    println!("   Balance:  {:>14}", format_money(t.balance));

    let r = &report.ratios;
    println!("\n📈 Ratios");
    println!("   Expense ratio: {}", format_percent(r.expense_ratio));
    println!("   Profit margin: {}", format_percent(r.profit_margin));
    println!("   Efficiency:    {}", format_percent(r.efficiency));
    println!(
        "   Avg income {} | Avg expense {}",
        format_money(report.averages.average_income),
        format_money(report.averages.average_expense)
    );

    println!("\n📅 Last {} days", report.daily.len());
    for point in &report.daily {
        println!("   {}  +{:>12}  -{:>12}", point.label, format_money(point.income), format_money(point.expense));
    }

    println!("\n🗓️  Monthly");
    for point in &report.monthly {
        println!("   {}  {:>14}", point.label, format_money(point.amount));
    }

    println!("\n🏷️  By category");
    for entry in &report.by_parent {
        println!("   {:<26} {:>14}  ({})", entry.label, format_money(entry.total), entry.count);
    }

    println!("\n🔝 Top expense subcategories");
    for (i, entry) in report.top_subcategories.iter().enumerate() {
        println!("   {}. {:<24} {:>14}", i + 1, entry.label, format_money(entry.total));
    }

    println!("\n🧾 Recent");
    for tx in &report.recent {
        let category = tx.category().map(|c| c.subcategory.as_str()).unwrap_or("-");
        println!(
            "   {}  {:<36} {:>12}  {}",
            format_date(tx.date()),
            tx.description(),
            format_money(tx.amount()),
            category
        );
    }
}

fn run_categorize(config: &DashboardConfig, company: Option<&str>, output: Option<PathBuf>) -> Result<()> {
    let (_engine, store) = load(config)?;
    let company = pick_company(config, company);
    let transactions = filter::filter(store.transactions(), company, None);

    match output {
        Some(path) => {
            let file = File::create(&path)
                .with_context(|| format!("Failed to create file: {}", path.display()))?;
            write_csv(file, &transactions)?;
            println!("✓ Wrote {} categorized transactions to {}", transactions.len(), path.display());
        }
        None => write_csv(io::stdout().lock(), &transactions)?,
    }

    Ok(())
}

fn run_classify(config: &DashboardConfig, description: &str, transaction_type: &str) -> Result<()> {
    let engine = config.build_engine()?;
    let transaction_type: TransactionType = transaction_type.parse()?;
    let result = engine.classify(description, transaction_type);

    println!("{} {}", result.category.parent.icon(), result.category);
    match result.rule_id {
        Some(id) => println!("   matched rule: {}", id),
        None => println!("   no rule matched (fallback)"),
    }
    Ok(())
}

fn run_taxonomy() {
    for parent in ParentCategory::ALL {
        println!("{} {}", parent.icon(), parent.label());
        for sub in parent.subcategories() {
            println!("   • {}", sub);
        }
    }
}

#[cfg(feature = "tui")]
fn run_ui_mode(config: &DashboardConfig, company: Option<&str>, today: NaiveDate) -> Result<()> {
    println!("🖥️  Loading Tri-Ledger dashboard...\n");

    let (engine, store) = load(config)?;
    println!("✓ Loaded {} transactions\n", store.len());

    let mut app = ui::App::new(store, engine, config.report_options(), pick_company(config, company), today);
    ui::run_ui(&mut app)?;

    println!("\n✅ Dashboard closed");
    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_config: &DashboardConfig, _company: Option<&str>, _today: NaiveDate) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or use the JSON API: cargo run --bin tri-ledger-server --features server");
    std::process::exit(1);
}
