// Doccat CLI binary

use std::path::PathBuf;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::LevelFilter;

use doccat_lib::catalog::{load_catalog, query};
use doccat_lib::constants::BASE_DIR_ENV;
use doccat_lib::{run_sync, CatalogConfig, CatalogRecord, SyncOptions};

#[derive(Parser)]
#[command(name = "doccat")]
#[command(about = "Doccat - keep a document catalog in sync with its folder", long_about = None)]
#[command(version)]
struct Cli {
    /// Base directory holding documents/ and documents.json (defaults to current directory)
    #[arg(short, long, global = true, env = BASE_DIR_ENV)]
    base: Option<PathBuf>,

    /// Folder to scan (overrides <base>/documents)
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Catalog file (overrides <base>/documents.json)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Backup file (defaults to document_old.json next to the catalog)
    #[arg(long, global = true)]
    backup: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Add catalog records for files not yet catalogued (default)
    Sync {
        /// Show what would be added without writing the catalog
        #[arg(long)]
        dry_run: bool,
    },

    /// List catalog records
    List {
        /// Only records carrying this tag
        #[arg(short, long)]
        tag: Option<String>,
    },

    /// Show every tag with its record count
    Tags,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = build_config(&cli)?;

    match cli.command.unwrap_or(Commands::Sync { dry_run: false }) {
        Commands::Sync { dry_run } => cmd_sync(&config, dry_run),
        Commands::List { tag } => cmd_list(&config, tag),
        Commands::Tags => cmd_tags(&config),
    }
}

fn init_logging(verbose: bool) {
    let mut builder = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("warn"),
    );
    if verbose {
        builder.filter_level(LevelFilter::Debug);
    }
    builder.init();
}

fn build_config(cli: &Cli) -> Result<CatalogConfig> {
    let base = match &cli.base {
        Some(b) => b.clone(),
        None => std::env::current_dir().context("Cannot determine current directory")?,
    };

    let mut config = CatalogConfig::from_base_dir(&base);
    if let Some(root) = &cli.root {
        config.root = root.clone();
    }
    if let Some(catalog) = &cli.catalog {
        config = CatalogConfig::new(config.root, catalog.clone());
    }
    if let Some(backup) = &cli.backup {
        config = config.with_backup_path(backup.clone());
    }

    Ok(config)
}

fn cmd_sync(config: &CatalogConfig, dry_run: bool) -> Result<()> {
    let options = SyncOptions { dry_run, ..SyncOptions::default() };
    let report = match run_sync(config, &options) {
        Ok(report) => report,
        Err(e) => {
            if e.is_io_failure() {
                eprintln!(
                    "Catalog was not updated. If {} looks damaged, restore it from {}",
                    config.catalog_path.display(),
                    config.backup_path.display()
                );
            }
            return Err(anyhow::Error::new(e)
                .context(format!("Sync of {} failed", config.catalog_path.display())));
        }
    };

    if let Some(ref msg) = report.scan_error {
        println!("{}", msg);
    }

    for file in &report.discovered {
        println!("{}", file.display());
    }

    println!();
    if report.unregistered.is_empty() {
        println!("No unregistered files.");
        return Ok(());
    }

    println!("Unregistered files ({}):", report.unregistered.len());
    for file in &report.unregistered {
        println!("  {}", file.display());
    }

    println!();
    if report.saved {
        println!(
            "Added {} records to {}",
            report.added_ids.len(),
            config.catalog_path.display()
        );
        if let Some(ref backup) = report.backup_path {
            println!("Previous catalog saved as {}", backup.display());
        }
    } else {
        println!(
            "Dry run: {} records would be added (ids {})",
            report.added_ids.len(),
            format_id_range(&report.added_ids)
        );
    }

    Ok(())
}

fn cmd_list(config: &CatalogConfig, tag: Option<String>) -> Result<()> {
    let records = load_catalog(&config.catalog_path)
        .with_context(|| format!("Cannot read {}", config.catalog_path.display()))?;

    let shown: Vec<&CatalogRecord> = match tag {
        Some(ref t) => query::filter_by_tag(&records, t),
        None => records.iter().collect(),
    };

    println!("Catalog: {} ({} records)", config.catalog_path.display(), records.len());
    println!();

    if shown.is_empty() {
        match tag {
            Some(t) => println!("No records tagged '{}'.", t),
            None => println!("No records. Use 'doccat sync' to catalogue files."),
        }
        return Ok(());
    }

    println!("{:>5}  {:>8}  {:>19}  {:<30}  {}", "ID", "Type", "Created", "Filename", "Title");
    println!("{}", "-".repeat(90));

    for record in shown {
        println!(
            "{:>5}  {:>8}  {:>19}  {:<30}  {}",
            record.id,
            if record.filetype.is_empty() { "-" } else { record.filetype.as_str() },
            record.created,
            truncate(&record.filename, 30),
            record.title.as_deref().unwrap_or("-"),
        );
    }

    Ok(())
}

fn cmd_tags(config: &CatalogConfig) -> Result<()> {
    let records = load_catalog(&config.catalog_path)
        .with_context(|| format!("Cannot read {}", config.catalog_path.display()))?;

    let counts = query::tag_counts(&records);
    if counts.is_empty() {
        println!("No tags in {}.", config.catalog_path.display());
        return Ok(());
    }

    for (tag, count) in counts {
        println!("{} ({})", tag, count);
    }

    Ok(())
}

// --- Helper Functions ---

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let head: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", head)
    } else {
        s.to_string()
    }
}

fn format_id_range(ids: &[i64]) -> String {
    match (ids.first(), ids.last()) {
        (Some(first), Some(last)) if first == last => first.to_string(),
        (Some(first), Some(last)) => format!("{}-{}", first, last),
        _ => "-".to_string(),
    }
}
