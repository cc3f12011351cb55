mod aggregate;
mod categories;
mod cli;
mod error;
mod fmt;
mod form;
mod logging;
mod models;
mod settings;
mod storage;
mod store;
mod tui;
mod view;

use std::path::PathBuf;

use clap::{CommandFactory, Parser};

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let settings = settings::load_settings();
    logging::init(&PathBuf::from(&settings.data_dir), &settings.log_level);

    let result = match cli.command {
        None => cli::tracker::run(),
        Some(Commands::Init { data_dir }) => cli::init::run(data_dir),
        Some(Commands::Add {
            amount,
            category,
            note,
            date,
        }) => cli::add::run(&amount, &category, &note, date.as_deref()),
        Some(Commands::Summary { month }) => cli::report::summary(month),
        Some(Commands::Recent { limit }) => cli::report::recent(limit),
        Some(Commands::Categories) => cli::categories::list(),
        Some(Commands::Clear { yes }) => cli::clear::run(yes),
        Some(Commands::Status) => cli::status::run(),
        Some(Commands::Completions { shell }) => {
            clap_complete::generate(shell, &mut Cli::command(), "paisawise", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "command failed");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
