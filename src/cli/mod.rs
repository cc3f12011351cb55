pub mod add;
pub mod categories;
pub mod clear;
pub mod init;
pub mod report;
pub mod status;
pub mod tracker;

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use crate::error::{PaisaError, Result};
use crate::settings::Settings;
use crate::storage::FileStorage;
use crate::store::ExpenseStore;

/// Today's local date as YYYY-MM-DD.
pub(crate) fn today() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}

pub(crate) fn open_store(settings: &Settings) -> ExpenseStore<FileStorage> {
    ExpenseStore::load(FileStorage::new(PathBuf::from(&settings.data_dir)))
}

/// Validate a `YYYY-MM` month argument, defaulting to the current month.
pub(crate) fn parse_month_opt(month: Option<&str>) -> Result<String> {
    match month {
        None => Ok(today()[..7].to_string()),
        Some(m) => {
            let valid = m.len() == 7
                && NaiveDate::parse_from_str(&format!("{m}-01"), "%Y-%m-%d").is_ok();
            if valid {
                Ok(m.to_string())
            } else {
                Err(PaisaError::InvalidDate(m.to_string()))
            }
        }
    }
}

#[derive(Parser)]
#[command(name = "paisawise", about = "Quick-add personal expense tracker.", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Set up PaisaWise: choose a data directory.
    Init {
        /// Path for PaisaWise data (default: ~/Documents/paisawise)
        #[arg(long = "data-dir")]
        data_dir: Option<String>,
    },
    /// Add an expense without opening the tracker.
    Add {
        /// Whole rupees, digits only
        amount: String,
        /// Category name (see `paisawise categories`)
        #[arg(long, short)]
        category: String,
        /// Optional note
        #[arg(long, short, default_value = "")]
        note: String,
        /// Date: YYYY-MM-DD (default: today)
        #[arg(long, short)]
        date: Option<String>,
    },
    /// Monthly total and category breakdown.
    Summary {
        /// Month: YYYY-MM (default: this month)
        #[arg(long)]
        month: Option<String>,
    },
    /// Most recent expenses by date.
    Recent {
        /// How many to show (default from settings)
        #[arg(long)]
        limit: Option<usize>,
    },
    /// List expense categories.
    Categories,
    /// Delete every expense.
    Clear {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Show settings, data location and entry count.
    Status,
    /// Print shell completions.
    Completions {
        shell: clap_complete::Shell,
    },
}
