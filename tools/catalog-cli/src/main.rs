//! Catalog CLI - Drive the catalog widget controller from a terminal.
//!
//! Commands:
//! - `catalog browse` - Search a fixture catalog
//! - `catalog checkout` - Fill a cart and submit a purchase
//! - `catalog config` - Manage configuration

mod commands;
mod config;
mod context;
mod fixtures;
mod output;
mod session;

use anyhow::Result;
use clap::{Parser, Subcommand};
use catalog_widget::observability::{init_logging, LogFormat};

use commands::{BrowseArgs, CheckoutArgs, ConfigArgs};

/// Catalog CLI - Browse a catalog, fill a cart and check out
#[derive(Parser)]
#[command(name = "catalog")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output (controller logs on stderr)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the catalog
    Browse(BrowseArgs),

    /// Add items to the cart and submit a purchase
    Checkout(CheckoutArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        init_logging(if cli.json {
            LogFormat::Json
        } else {
            LogFormat::Human
        });
    }

    // Setup output formatting
    let output = output::Output::new(cli.verbose, cli.json);

    // Load config
    let config_path = cli.config.as_deref();
    let ctx = context::Context::load(config_path, output)?;

    // Execute command
    let result = match cli.command {
        Commands::Browse(args) => commands::browse::run(args, &ctx).await,
        Commands::Checkout(args) => commands::checkout::run(args, &ctx).await,
        Commands::Config(args) => commands::config::run(args, &ctx).await,
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
