use colored::Colorize;

use crate::categories;
use crate::error::{PaisaError, Result};
use crate::fmt::rupees;
use crate::form::EntryForm;
use crate::settings::load_settings;

use super::{open_store, today};

/// Build an expense with the same entry form the tracker uses, then store it.
pub fn run(amount: &str, category: &str, note: &str, date: Option<&str>) -> Result<()> {
    if amount.is_empty() || !amount.chars().all(|c| c.is_ascii_digit()) {
        return Err(PaisaError::InvalidAmount(amount.to_string()));
    }
    let category = categories::resolve(category)
        .ok_or_else(|| PaisaError::UnknownCategory(category.to_string()))?;

    let mut form = EntryForm::new(date.map(str::to_string).unwrap_or_else(today));
    for digit in amount.chars() {
        form.press_digit(digit);
    }
    form.select_category(category.name);
    form.set_note(note);
    let draft = form.submit()?;

    let mut store = open_store(&load_settings());
    let expense = store.add(draft)?;
    println!(
        "{} {} {} on {}",
        "Added".green().bold(),
        rupees(expense.amount),
        format!("{} {}", expense.emoji, expense.category).bold(),
        expense.date
    );
    Ok(())
}
