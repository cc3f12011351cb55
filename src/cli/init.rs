use std::path::PathBuf;

use crate::error::Result;
use crate::settings::{load_settings, save_settings, settings_path, shellexpand_path, Settings};
use crate::storage::{FileStorage, EXPENSES_KEY};

pub fn run(data_dir: Option<String>) -> Result<()> {
    let mut settings = load_settings();
    let defaults = Settings::default();

    if let Some(dir) = data_dir {
        settings.data_dir = shellexpand_path(&dir);
    } else if settings.data_dir == defaults.data_dir && !settings_path().exists() {
        // First run: prompt for data dir
        println!("Data directory [{}]: ", settings.data_dir);
        let mut input = String::new();
        std::io::stdin().read_line(&mut input).ok();
        let chosen = input.trim();
        if !chosen.is_empty() {
            settings.data_dir = shellexpand_path(chosen);
        }
    }

    save_settings(&settings)?;

    let resolved = PathBuf::from(&settings.data_dir);
    std::fs::create_dir_all(&resolved)?;

    let data_file = FileStorage::new(&resolved).path_for(EXPENSES_KEY);
    println!("Initialized paisawise at {}", resolved.display());
    println!("Expenses are saved to {}", data_file.display());
    Ok(())
}
