use std::path::PathBuf;

use crate::error::Result;
use crate::fmt::rupees;
use crate::logging::LOG_FILE;
use crate::settings::{load_settings, settings_path};
use crate::storage::{FileStorage, EXPENSES_KEY};

use super::open_store;

pub fn run() -> Result<()> {
    let settings = load_settings();
    let data_dir = PathBuf::from(&settings.data_dir);
    let data_file = FileStorage::new(&data_dir).path_for(EXPENSES_KEY);

    println!("Settings:   {}", settings_path().display());
    println!("Data dir:   {}", data_dir.display());
    println!("Data file:  {}", data_file.display());
    println!("Log file:   {}", data_dir.join(LOG_FILE).display());

    if !data_file.exists() {
        println!();
        println!("No expenses saved yet. Run `paisawise add` or `paisawise` to start.");
        return Ok(());
    }

    let store = open_store(&settings);
    let report = store.load_report();
    let lifetime: u64 = store
        .expenses()
        .iter()
        .fold(0u64, |sum, e| sum.saturating_add(e.amount));

    println!();
    println!("Entries:       {}", store.len());
    println!("All-time:      {}", rupees(lifetime));
    if report.malformed {
        println!("Warning:       saved data could not be read");
    } else if report.dropped > 0 {
        println!("Skipped:       {} unreadable entries", report.dropped);
    }
    Ok(())
}
