//! CLI command implementations.

pub mod browse;
pub mod checkout;
pub mod config;

use clap::{Args, Subcommand};

/// Arguments for the browse command.
#[derive(Args)]
pub struct BrowseArgs {
    /// Free-text search (waits out the debounce window).
    #[arg(short, long)]
    pub search: Option<String>,

    /// Type category codes to filter on.
    #[arg(short = 't', long = "type")]
    pub types: Vec<String>,

    /// Family category codes to filter on.
    #[arg(short, long = "family")]
    pub families: Vec<String>,

    /// Page number, starting at 1.
    #[arg(short, long, default_value = "1")]
    pub page: u32,

    /// Items per page (overrides config).
    #[arg(long)]
    pub page_size: Option<u32>,

    /// Catalog fixture (JSON array of items).
    #[arg(long)]
    pub catalog: Option<String>,
}

/// Arguments for the checkout command.
#[derive(Args)]
pub struct CheckoutArgs {
    /// Purchasing account id.
    #[arg(short, long)]
    pub account: Option<String>,

    /// Item to buy, as `ID` or `ID:QTY`. Repeatable.
    #[arg(short, long = "item")]
    pub items: Vec<String>,

    /// Make the purchase service fail with this message.
    #[arg(long)]
    pub fail: Option<String>,

    /// Catalog fixture (JSON array of items).
    #[arg(long)]
    pub catalog: Option<String>,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Get a config value.
    Get {
        /// Config key (dot-separated).
        key: String,
    },
    /// Set a config value.
    Set {
        /// Config key (dot-separated).
        key: String,
        /// Value to set.
        value: String,
    },
    /// Initialize a new config file.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
    /// Validate the config file.
    Validate,
}
