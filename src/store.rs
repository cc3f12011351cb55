//! The expense store: sole owner and writer of the expense collection.
//!
//! Every mutation is written through to storage immediately and then announced
//! to the registered change listeners.

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::models::{Expense, ExpenseDraft};
use crate::storage::{KeyValueStorage, EXPENSES_KEY};

pub const CLEAR_CONFIRM_MESSAGE: &str =
    "Are you sure you want to clear all data? This cannot be undone.";

type ChangeListener = Box<dyn FnMut(&[Expense])>;
type Clock = Box<dyn Fn() -> i64>;

/// What `load` found in storage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub loaded: usize,
    /// Records inside a valid array that failed to deserialize.
    pub dropped: usize,
    /// The stored blob was unreadable or not a JSON array.
    pub malformed: bool,
}

pub struct ExpenseStore<S: KeyValueStorage> {
    storage: S,
    expenses: Vec<Expense>,
    revision: u64,
    last_id: i64,
    clock: Clock,
    listeners: Vec<ChangeListener>,
    load_report: LoadReport,
}

impl<S: KeyValueStorage> ExpenseStore<S> {
    /// Read the persisted collection. Never fails: missing or malformed data
    /// starts an empty collection.
    pub fn load(storage: S) -> Self {
        Self::load_with_clock(storage, Box::new(|| chrono::Utc::now().timestamp_millis()))
    }

    pub fn load_with_clock(storage: S, clock: Clock) -> Self {
        let (expenses, load_report) = match storage.get(EXPENSES_KEY) {
            Ok(Some(raw)) => parse_collection(&raw),
            Ok(None) => (Vec::new(), LoadReport::default()),
            Err(e) => {
                warn!(error = %e, "could not read stored expenses, starting empty");
                (
                    Vec::new(),
                    LoadReport {
                        malformed: true,
                        ..LoadReport::default()
                    },
                )
            }
        };
        info!(
            loaded = load_report.loaded,
            dropped = load_report.dropped,
            malformed = load_report.malformed,
            "loaded expenses"
        );

        let last_id = expenses
            .iter()
            .filter_map(|e| e.id.parse::<i64>().ok())
            .max()
            .unwrap_or(0);

        Self {
            storage,
            expenses,
            revision: 0,
            last_id,
            clock,
            listeners: Vec::new(),
            load_report,
        }
    }

    /// Assign a fresh id to `draft` and put it at the front of the collection.
    ///
    /// The record stays in memory even if the storage write fails; the write
    /// error is returned so the caller can report it.
    pub fn add(&mut self, draft: ExpenseDraft) -> Result<Expense> {
        let id = self.next_id();
        let expense = draft.into_expense(id);
        info!(
            id = %expense.id,
            category = %expense.category,
            amount = expense.amount,
            "added expense"
        );
        self.expenses.insert(0, expense.clone());
        self.commit()?;
        Ok(expense)
    }

    /// Empty the collection if `confirm` accepts [`CLEAR_CONFIRM_MESSAGE`].
    /// Returns whether anything was cleared.
    pub fn clear_with<F>(&mut self, confirm: F) -> Result<bool>
    where
        F: FnOnce(&str) -> bool,
    {
        if !confirm(CLEAR_CONFIRM_MESSAGE) {
            debug!("clear declined");
            return Ok(false);
        }
        let removed = self.expenses.len();
        self.expenses.clear();
        info!(removed, "cleared all expenses");
        self.commit()?;
        Ok(true)
    }

    /// Serialize the whole collection to storage.
    pub fn persist(&mut self) -> Result<()> {
        let json = serde_json::to_string(&self.expenses)?;
        self.storage.set(EXPENSES_KEY, &json).map_err(|e| {
            warn!(error = %e, "failed to persist expenses");
            e
        })
    }

    pub fn on_change(&mut self, listener: impl FnMut(&[Expense]) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn len(&self) -> usize {
        self.expenses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expenses.is_empty()
    }

    /// Bumped on every mutation; derived views key their caches on it.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn load_report(&self) -> LoadReport {
        self.load_report
    }

    #[cfg(test)]
    pub fn storage(&self) -> &S {
        &self.storage
    }

    #[cfg(test)]
    pub fn into_storage(self) -> S {
        self.storage
    }

    fn next_id(&mut self) -> String {
        let now = (self.clock)();
        let id = if now > self.last_id { now } else { self.last_id + 1 };
        self.last_id = id;
        id.to_string()
    }

    fn commit(&mut self) -> Result<()> {
        self.revision += 1;
        let persisted = self.persist();
        for listener in self.listeners.iter_mut() {
            listener(&self.expenses);
        }
        persisted
    }
}

/// Decode the stored blob record by record so one bad entry does not cost the
/// whole collection.
fn parse_collection(raw: &str) -> (Vec<Expense>, LoadReport) {
    let values: Vec<Value> = match serde_json::from_str(raw) {
        Ok(v) => v,
        Err(e) => {
            warn!(error = %e, "stored expenses are not a JSON array, starting empty");
            return (
                Vec::new(),
                LoadReport {
                    malformed: true,
                    ..LoadReport::default()
                },
            );
        }
    };

    let total = values.len();
    let expenses: Vec<Expense> = values
        .into_iter()
        .filter_map(|v| match serde_json::from_value::<Expense>(v) {
            Ok(e) => Some(e),
            Err(e) => {
                warn!(error = %e, "dropping malformed expense record");
                None
            }
        })
        .collect();

    let report = LoadReport {
        loaded: expenses.len(),
        dropped: total - expenses.len(),
        malformed: false,
    };
    (expenses, report)
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::error::PaisaError;
    use crate::storage::MemoryStorage;

    fn draft(amount: u64, category: &str, date: &str) -> ExpenseDraft {
        ExpenseDraft {
            amount,
            category: category.to_string(),
            note: String::new(),
            date: date.to_string(),
            emoji: "\u{1f354}".to_string(),
        }
    }

    fn fixed_clock(ms: i64) -> Clock {
        Box::new(move || ms)
    }

    struct ReadOnlyStorage;

    impl KeyValueStorage for ReadOnlyStorage {
        fn get(&self, _key: &str) -> Result<Option<String>> {
            Ok(None)
        }
        fn set(&mut self, _key: &str, _value: &str) -> Result<()> {
            Err(PaisaError::Other("storage is read-only".into()))
        }
    }

    #[test]
    fn test_load_empty_storage() {
        let store = ExpenseStore::load(MemoryStorage::new());
        assert!(store.is_empty());
        assert_eq!(store.load_report(), LoadReport::default());
    }

    #[test]
    fn test_load_malformed_blob_starts_empty() {
        for raw in ["not json", "{\"id\": 1}", "null", "42"] {
            let store = ExpenseStore::load(MemoryStorage::with_value(EXPENSES_KEY, raw));
            assert!(store.is_empty(), "{raw}");
            assert!(store.load_report().malformed, "{raw}");
        }
    }

    #[test]
    fn test_load_drops_individual_bad_records() {
        let raw = r#"[
            {"id":"1","amount":250,"category":"Food","note":"","date":"2024-06-01","emoji":"x"},
            {"id":"2","amount":"lots","category":"Food","note":"","date":"2024-06-01","emoji":"x"},
            {"id":"3","category":"Rent"}
        ]"#;
        let store = ExpenseStore::load(MemoryStorage::with_value(EXPENSES_KEY, raw));
        assert_eq!(store.len(), 1);
        assert_eq!(store.expenses()[0].id, "1");
        assert_eq!(
            store.load_report(),
            LoadReport { loaded: 1, dropped: 2, malformed: false }
        );
    }

    #[test]
    fn test_add_prepends_and_grows_by_one() {
        let mut store = ExpenseStore::load(MemoryStorage::new());
        for (i, date) in ["2024-06-05", "2024-01-01", "2024-12-31"].iter().enumerate() {
            let added = store.add(draft(100 + i as u64, "Food", date)).unwrap();
            assert_eq!(store.len(), i + 1);
            assert_eq!(store.expenses()[0], added);
        }
        // Newest first regardless of the date value.
        assert_eq!(store.expenses()[0].date, "2024-12-31");
        assert_eq!(store.expenses()[2].date, "2024-06-05");
    }

    #[test]
    fn test_ids_are_unique_and_increasing_within_one_millisecond() {
        let mut store = ExpenseStore::load_with_clock(MemoryStorage::new(), fixed_clock(1_700_000_000_000));
        let a = store.add(draft(1, "Food", "2024-06-01")).unwrap();
        let b = store.add(draft(2, "Food", "2024-06-01")).unwrap();
        let c = store.add(draft(3, "Food", "2024-06-01")).unwrap();
        assert_eq!(a.id, "1700000000000");
        assert_eq!(b.id, "1700000000001");
        assert_eq!(c.id, "1700000000002");
    }

    #[test]
    fn test_ids_continue_after_reload() {
        let raw = r#"[{"id":"5000","amount":1,"category":"Food","note":"","date":"2024-06-01","emoji":"x"}]"#;
        let mut store =
            ExpenseStore::load_with_clock(MemoryStorage::with_value(EXPENSES_KEY, raw), fixed_clock(10));
        let added = store.add(draft(1, "Food", "2024-06-02")).unwrap();
        assert_eq!(added.id, "5001");
    }

    #[test]
    fn test_add_writes_through() {
        let mut store = ExpenseStore::load(MemoryStorage::new());
        store.add(draft(250, "Food", "2024-06-01")).unwrap();
        let raw = store.storage().get(EXPENSES_KEY).unwrap().unwrap();
        let stored: Vec<Expense> = serde_json::from_str(&raw).unwrap();
        assert_eq!(stored, store.expenses());
    }

    #[test]
    fn test_persist_then_reload_is_equal() {
        let mut store = ExpenseStore::load(MemoryStorage::new());
        store.add(draft(250, "Food", "2024-06-01")).unwrap();
        let mut with_note = draft(1000, "Rent", "2024-06-02");
        with_note.note = "June rent, \"flat 4\"".to_string();
        store.add(with_note).unwrap();
        let before = store.expenses().to_vec();

        let reloaded = ExpenseStore::load(store.into_storage());
        assert_eq!(reloaded.expenses(), before.as_slice());
    }

    #[test]
    fn test_clear_confirmed_empties_collection() {
        let mut store = ExpenseStore::load(MemoryStorage::new());
        store.add(draft(1, "Food", "2024-06-01")).unwrap();
        store.add(draft(2, "Bills", "2024-06-01")).unwrap();

        let mut asked = String::new();
        let cleared = store
            .clear_with(|msg| {
                asked = msg.to_string();
                true
            })
            .unwrap();
        assert!(cleared);
        assert!(store.is_empty());
        assert_eq!(asked, CLEAR_CONFIRM_MESSAGE);
        assert_eq!(store.storage().get(EXPENSES_KEY).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_clear_declined_leaves_state_untouched() {
        let mut store = ExpenseStore::load(MemoryStorage::new());
        store.add(draft(1, "Food", "2024-06-01")).unwrap();
        let revision = store.revision();
        assert!(!store.clear_with(|_| false).unwrap());
        assert_eq!(store.len(), 1);
        assert_eq!(store.revision(), revision);
    }

    #[test]
    fn test_listeners_see_every_mutation() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let mut store = ExpenseStore::load(MemoryStorage::new());
        store.on_change(move |all| sink.borrow_mut().push(all.len()));

        store.add(draft(1, "Food", "2024-06-01")).unwrap();
        store.add(draft(2, "Food", "2024-06-01")).unwrap();
        store.clear_with(|_| true).unwrap();
        assert_eq!(*seen.borrow(), vec![1, 2, 0]);
        assert_eq!(store.revision(), 3);
    }

    #[test]
    fn test_write_failure_is_reported_but_record_kept() {
        let mut store = ExpenseStore::load(ReadOnlyStorage);
        let result = store.add(draft(1, "Food", "2024-06-01"));
        assert!(result.is_err());
        assert_eq!(store.len(), 1);
        assert_eq!(store.revision(), 1);
    }
}
