use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

pub const LOG_FILE: &str = "paisawise.log";
pub const LOG_ENV: &str = "PAISAWISE_LOG";

/// Send tracing output to `<data_dir>/paisawise.log` so it never lands on the
/// terminal the UI is drawing to. `PAISAWISE_LOG` overrides `level`.
///
/// Best-effort: a log file that cannot be opened, or a subscriber that is
/// already installed, leaves logging off without failing the command.
pub fn init(data_dir: &Path, level: &str) {
    if std::fs::create_dir_all(data_dir).is_err() {
        return;
    }
    let file = match OpenOptions::new()
        .create(true)
        .append(true)
        .open(data_dir.join(LOG_FILE))
    {
        Ok(f) => f,
        Err(_) => return,
    };

    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init();
}
