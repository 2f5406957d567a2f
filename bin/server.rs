// Tri-Ledger - Web Server
// Read-only JSON API over the dashboard engine

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use tri_ledger::api::{build_router, AppState};
use tri_ledger::transaction::parse_date;
use tri_ledger::{CategorizerVariant, DashboardConfig};

/// JSON API server for the travel company dashboards
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// JSON config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory with one CSV per company (overrides config)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Built-in rule set: hierarchical or expense-overview (overrides config)
    #[arg(long)]
    categorizer: Option<CategorizerVariant>,

    /// Address to bind (overrides config)
    #[arg(long)]
    addr: Option<String>,

    /// Pin "today" for the daily window (DD/MM/YYYY)
    #[arg(long, value_parser = parse_today)]
    today: Option<NaiveDate>,
}

fn parse_today(text: &str) -> Result<NaiveDate, String> {
    parse_date(text).map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    println!("🌐 Tri-Ledger - Web Server");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let mut config = DashboardConfig::load(args.config.as_deref())?;
    if args.data_dir.is_some() {
        config.data_dir = args.data_dir;
    }
    if let Some(variant) = args.categorizer {
        config.categorizer = variant;
    }
    if let Some(addr) = args.addr {
        config.server_addr = addr;
    }

    let engine = config.build_engine()?;
    let store = config.load_store(&engine)?;
    println!("✓ Loaded {} transactions", store.len());

    let state = AppState::new(store, engine, config.report_options())
        .with_default_company(config.default_company)
        .with_today(args.today);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.server_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.server_addr))?;

    println!("\n🚀 Server running on http://{}", config.server_addr);
    println!("   API: http://{}/api/report", config.server_addr);
    println!("\n   Press Ctrl+C to stop\n");

    axum::serve(listener, app)
        .await
        .context("Server error")?;

    Ok(())
}
