use std::io::{BufRead, Write};

use colored::Colorize;

use crate::error::Result;
use crate::settings::load_settings;

use super::open_store;

pub fn run(yes: bool) -> Result<()> {
    let mut store = open_store(&load_settings());
    if store.is_empty() {
        println!("Nothing to clear.");
        return Ok(());
    }

    let count = store.len();
    let cleared = store.clear_with(|message| {
        yes || confirm(message, &mut std::io::stdin().lock(), &mut std::io::stdout())
    })?;
    if cleared {
        println!("{} {count} entries.", "Cleared".red().bold());
    } else {
        println!("Nothing changed.");
    }
    Ok(())
}

/// Ask a yes/no question; only an explicit "y" or "yes" counts as yes.
fn confirm(message: &str, input: &mut impl BufRead, output: &mut impl Write) -> bool {
    let _ = write!(output, "{message} [y/N]: ");
    let _ = output.flush();
    let mut answer = String::new();
    if input.read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ask(answer: &str) -> (bool, String) {
        let mut input = answer.as_bytes();
        let mut output = Vec::new();
        let result = confirm("Sure?", &mut input, &mut output);
        (result, String::from_utf8(output).unwrap())
    }

    #[test]
    fn confirm_accepts_y_and_yes() {
        assert!(ask("y\n").0);
        assert!(ask("YES\n").0);
        assert!(ask("  yes  \n").0);
    }

    #[test]
    fn confirm_defaults_to_no() {
        assert!(!ask("\n").0);
        assert!(!ask("n\n").0);
        assert!(!ask("").0);
        assert!(!ask("yep\n").0);
    }

    #[test]
    fn confirm_prints_prompt() {
        assert_eq!(ask("n\n").1, "Sure? [y/N]: ");
    }
}
