//! CLI command definitions using clap.
//!
//! Defines the main CLI structure and subcommands:
//! - days: show configured grocery days
//! - quotient: compute a frequency quotient
//! - item: add/edit/remove/list/clear food items
//! - list: generate the grocery list for a shopping day
//! - preview: forecast when an item will appear

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Grocer - recurring grocery lists with per-item frequencies
#[derive(Parser, Debug)]
#[command(name = "grocer")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Main subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the configured grocery days (set them in grocer.yml)
    Days,

    /// Compute the frequency quotient for a rate
    Quotient {
        /// Purchases per time frame
        frequency: u32,

        /// Time frame in weeks
        time_frame: u32,

        /// Grocery days per week (defaults to the configured days)
        #[arg(short, long)]
        days: Option<u32>,
    },

    /// Food item management
    Item {
        #[command(subcommand)]
        command: ItemCommands,
    },

    /// Generate the grocery list for a shopping day
    List {
        /// Date of the shopping occasion (defaults to today)
        #[arg(short, long)]
        date: Option<NaiveDate>,

        /// Generate even if the date is not a grocery day
        #[arg(short, long)]
        force: bool,
    },

    /// Forecast upcoming appearances of an item
    Preview {
        /// Item ID
        id: String,

        /// Number of shopping occasions to forecast
        #[arg(short = 'n', long)]
        occasions: Option<usize>,
    },
}

/// Food item subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ItemCommands {
    /// Configure a new food item
    Add {
        /// Item label
        #[arg(short, long)]
        label: String,

        /// Purchases per time frame
        #[arg(short, long)]
        frequency: u32,

        /// Time frame in weeks
        #[arg(short, long)]
        time_frame: u32,

        #[command(flatten)]
        details: ItemDetails,
    },

    /// Edit an existing food item
    Edit {
        /// Item ID
        id: String,

        /// New label
        #[arg(short, long)]
        label: Option<String>,

        /// New purchases per time frame
        #[arg(short, long)]
        frequency: Option<u32>,

        /// New time frame in weeks
        #[arg(short, long)]
        time_frame: Option<u32>,

        #[command(flatten)]
        details: ItemDetails,
    },

    /// Remove a food item
    Remove {
        /// Item ID
        id: String,
    },

    /// List configured food items
    List,

    /// Delete every food item and all scheduling history
    Clear {
        /// Confirm the wipe
        #[arg(long)]
        yes: bool,
    },
}

/// Optional presentation fields shared by add and edit
#[derive(Args, Debug, Clone, Default)]
pub struct ItemDetails {
    /// Brand
    #[arg(short, long)]
    pub brand: Option<String>,

    /// Amount to buy
    #[arg(short, long)]
    pub amount: Option<u32>,

    /// Unit of the amount
    #[arg(short, long)]
    pub unit: Option<String>,

    /// Free-form notes
    #[arg(short, long)]
    pub info: Option<String>,
}
