use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use floatdash_core::commands::{DailyContent, Dashboard, ensure_initialized, resolve_root};
use floatdash_core::services::catalog::CatalogKind;

#[derive(Parser)]
#[command(
    name = "floatdash-admin",
    about = "Admin helpers for the floating dashboard's daily quote and word"
)]
struct Cli {
    /// Workspace root (defaults to $FLOATDASH_ROOT, then .floatdash)
    #[arg(long, global = true)]
    root: Option<PathBuf>,
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Create the workspace layout, default config and seed catalogs
    Init,
    /// Print today's quote as JSON
    Quote,
    /// Print today's word as JSON
    Word,
    /// Print the stored ledger for a catalog (quotes|words)
    Ledger { kind: CatalogKind },
    /// Validate a catalog file and list its entries
    Catalog { kind: CatalogKind },
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let root = resolve_root(cli.root.as_deref());
    match cli.cmd {
        Cmd::Init => init(&root),
        Cmd::Quote => show_content(&root, Dashboard::quote_of_the_day),
        Cmd::Word => show_content(&root, Dashboard::word_of_the_day),
        Cmd::Ledger { kind } => show_ledger(&root, kind),
        Cmd::Catalog { kind } => show_catalog(&root, kind),
    }
}

fn init(root: &std::path::Path) -> Result<()> {
    let report = ensure_initialized(root)?;
    println!("Workspace: {}", report.root.display());
    for c in &report.created {
        println!("  created  {c}");
    }
    for e in &report.existed {
        println!("  existed  {e}");
    }
    Ok(())
}

fn show_content(root: &std::path::Path, pick: fn(&Dashboard) -> DailyContent) -> Result<()> {
    let dash = Dashboard::open(root)?;
    let content = pick(&dash);
    println!("{}", serde_json::to_string_pretty(&content)?);
    Ok(())
}

fn show_ledger(root: &std::path::Path, kind: CatalogKind) -> Result<()> {
    let dash = Dashboard::open_existing(root)?;
    let ledger = dash
        .ledger(kind)
        .with_context(|| format!("reading {kind} ledger"))?;
    println!("{}", serde_json::to_string_pretty(&ledger)?);
    Ok(())
}

fn show_catalog(root: &std::path::Path, kind: CatalogKind) -> Result<()> {
    let dash = Dashboard::open_existing(root)?;
    let path = dash.config().catalog_path(kind);
    let catalog = dash
        .catalog(kind)
        .map_err(|e| anyhow::anyhow!("loading {kind} catalog: {e}"))?;
    println!("{} ({} entries)", path.display(), catalog.len());
    for (i, item) in catalog.iter().enumerate() {
        println!("{:>4}. {} | {}", i + 1, item.key, item.payload);
    }
    Ok(())
}
