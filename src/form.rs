//! Quick-add entry form: transient input that becomes one expense draft.

use chrono::NaiveDate;
use thiserror::Error;
use tracing::debug;

use crate::categories;
use crate::models::ExpenseDraft;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    #[error("Enter an amount")]
    MissingAmount,
    #[error("Pick a category")]
    MissingCategory,
    #[error("Unknown category: {0}")]
    UnknownCategory(String),
    #[error("Amount {0} is too large")]
    AmountTooLarge(String),
    #[error("Invalid date: {0} (expected YYYY-MM-DD)")]
    InvalidDate(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryForm {
    digits: String,
    category: Option<String>,
    note: String,
    date: String,
}

impl EntryForm {
    /// An empty form dated `today` (YYYY-MM-DD).
    pub fn new(today: impl Into<String>) -> Self {
        Self {
            digits: String::new(),
            category: None,
            note: String::new(),
            date: today.into(),
        }
    }

    /// Append one keypad digit. Anything other than 0-9 is ignored.
    pub fn press_digit(&mut self, digit: char) {
        if digit.is_ascii_digit() {
            self.digits.push(digit);
        }
    }

    pub fn press_clear(&mut self) {
        self.digits.clear();
    }

    pub fn press_delete(&mut self) {
        self.digits.pop();
    }

    pub fn select_category(&mut self, name: &str) {
        self.category = Some(name.to_string());
    }

    pub fn set_note(&mut self, note: impl Into<String>) {
        self.note = note.into();
    }

    pub fn set_date(&mut self, date: impl Into<String>) {
        self.date = date.into();
    }

    pub fn digits(&self) -> &str {
        &self.digits
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn note(&self) -> &str {
        &self.note
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    /// Amount as currently typed; `None` while empty or past `u64`.
    pub fn amount(&self) -> Option<u64> {
        self.digits.parse().ok()
    }

    /// Whether the submit button would be enabled.
    pub fn can_submit(&self) -> bool {
        !self.digits.is_empty()
            && self
                .category
                .as_deref()
                .is_some_and(|c| categories::find(c).is_some())
    }

    /// Produce a draft and reset amount, category and note. The date is kept.
    /// On error the form is left exactly as it was.
    pub fn submit(&mut self) -> Result<ExpenseDraft, SubmitError> {
        let draft = self.validate().inspect_err(|e| debug!(reason = %e, "submit rejected"))?;
        self.digits.clear();
        self.category = None;
        self.note.clear();
        Ok(draft)
    }

    fn validate(&self) -> Result<ExpenseDraft, SubmitError> {
        if self.digits.is_empty() {
            return Err(SubmitError::MissingAmount);
        }
        let name = self.category.as_deref().ok_or(SubmitError::MissingCategory)?;
        let category =
            categories::find(name).ok_or_else(|| SubmitError::UnknownCategory(name.to_string()))?;
        let amount: u64 = self
            .digits
            .parse()
            .map_err(|_| SubmitError::AmountTooLarge(self.digits.clone()))?;
        if NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").is_err() {
            return Err(SubmitError::InvalidDate(self.date.clone()));
        }

        Ok(ExpenseDraft {
            amount,
            category: category.name.to_string(),
            note: self.note.clone(),
            date: self.date.clone(),
            emoji: category.emoji.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(amount: &str) -> EntryForm {
        let mut form = EntryForm::new("2024-06-01");
        for c in amount.chars() {
            form.press_digit(c);
        }
        form
    }

    #[test]
    fn test_keypad_editing() {
        let mut form = typed("120");
        assert_eq!(form.digits(), "120");
        form.press_delete();
        assert_eq!(form.digits(), "12");
        form.press_digit('x');
        assert_eq!(form.digits(), "12");
        form.press_clear();
        assert_eq!(form.digits(), "");
        form.press_delete();
        assert_eq!(form.digits(), "");
    }

    #[test]
    fn test_leading_zeros_are_kept_in_digits() {
        let form = typed("007");
        assert_eq!(form.digits(), "007");
        assert_eq!(form.amount(), Some(7));
    }

    #[test]
    fn test_category_reselect() {
        let mut form = typed("5");
        form.select_category("Food");
        form.select_category("Food");
        assert_eq!(form.category(), Some("Food"));
        form.select_category("Rent");
        assert_eq!(form.category(), Some("Rent"));
    }

    #[test]
    fn test_submit_without_amount_is_rejected() {
        let mut form = EntryForm::new("2024-06-01");
        form.select_category("Food");
        assert!(!form.can_submit());
        assert_eq!(form.submit(), Err(SubmitError::MissingAmount));
        assert_eq!(form.category(), Some("Food"));
    }

    #[test]
    fn test_submit_without_category_is_rejected() {
        let mut form = typed("250");
        assert!(!form.can_submit());
        assert_eq!(form.submit(), Err(SubmitError::MissingCategory));
        assert_eq!(form.digits(), "250");
    }

    #[test]
    fn test_submit_with_unknown_category_is_rejected() {
        let mut form = typed("250");
        form.select_category("Groceries");
        assert!(!form.can_submit());
        assert_eq!(
            form.submit(),
            Err(SubmitError::UnknownCategory("Groceries".into()))
        );
    }

    #[test]
    fn test_submit_with_overflowing_amount_is_rejected() {
        let mut form = typed("99999999999999999999999");
        form.select_category("Food");
        assert!(matches!(form.submit(), Err(SubmitError::AmountTooLarge(_))));
        assert_eq!(form.digits().len(), 23);
    }

    #[test]
    fn test_submit_with_bad_date_is_rejected() {
        let mut form = typed("10");
        form.select_category("Food");
        form.set_date("2024-13-01");
        assert_eq!(form.submit(), Err(SubmitError::InvalidDate("2024-13-01".into())));
    }

    #[test]
    fn test_submit_builds_draft_and_resets_all_but_date() {
        let mut form = typed("250");
        form.select_category("Food");
        form.set_note("lunch");
        form.set_date("2024-05-30");
        assert!(form.can_submit());

        let draft = form.submit().unwrap();
        assert_eq!(
            draft,
            ExpenseDraft {
                amount: 250,
                category: "Food".into(),
                note: "lunch".into(),
                date: "2024-05-30".into(),
                emoji: "\u{1f354}".into(),
            }
        );
        assert_eq!(form.digits(), "");
        assert_eq!(form.category(), None);
        assert_eq!(form.note(), "");
        assert_eq!(form.date(), "2024-05-30");
    }
}
