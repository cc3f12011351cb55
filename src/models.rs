use serde::{Deserialize, Serialize};

/// A stored expense. Field names and layout match the persisted JSON blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: String,
    pub amount: u64,
    pub category: String,
    pub note: String,
    /// ISO date, YYYY-MM-DD.
    pub date: String,
    /// Category icon copied at creation time; never re-derived from the registry.
    pub emoji: String,
}

/// An expense before the store has assigned it an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpenseDraft {
    pub amount: u64,
    pub category: String,
    pub note: String,
    pub date: String,
    pub emoji: String,
}

impl ExpenseDraft {
    pub fn into_expense(self, id: String) -> Expense {
        Expense {
            id,
            amount: self.amount,
            category: self.category,
            note: self.note,
            date: self.date,
            emoji: self.emoji,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    pub name: &'static str,
    pub emoji: &'static str,
    /// Display color as a `#RRGGBB` hex string.
    pub color: &'static str,
}
