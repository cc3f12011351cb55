//! Monthly dashboard figures derived from the expense collection.
//!
//! Months are matched on the first seven characters of the stored date string
//! (`YYYY-MM`). No calendar or timezone arithmetic is involved.

use crate::categories::CATEGORIES;
use crate::models::Expense;

pub const DEFAULT_RECENT_LIMIT: usize = 5;

/// Year-month prefix of an ISO date, or `None` if the string is too short.
pub fn month_key(date: &str) -> Option<&str> {
    date.get(..7)
}

pub fn monthly_expenses<'a>(all: &'a [Expense], reference: &str) -> Vec<&'a Expense> {
    let Some(month) = month_key(reference) else {
        return Vec::new();
    };
    all.iter()
        .filter(|e| month_key(&e.date) == Some(month))
        .collect()
}

pub fn total_spending(monthly: &[&Expense]) -> u64 {
    monthly
        .iter()
        .fold(0u64, |sum, e| sum.saturating_add(e.amount))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTotal {
    pub name: &'static str,
    pub emoji: &'static str,
    pub color: &'static str,
    pub value: u64,
}

impl CategoryTotal {
    /// Percentage of `total` this category accounts for.
    pub fn share(&self, total: u64) -> f64 {
        if total == 0 {
            0.0
        } else {
            self.value as f64 * 100.0 / total as f64
        }
    }
}

/// Per-category totals for the registry, zero totals dropped, largest first.
/// Equal totals keep registry order.
pub fn category_breakdown(monthly: &[&Expense]) -> Vec<CategoryTotal> {
    let mut totals: Vec<CategoryTotal> = CATEGORIES
        .iter()
        .map(|cat| CategoryTotal {
            name: cat.name,
            emoji: cat.emoji,
            color: cat.color,
            value: monthly
                .iter()
                .filter(|e| e.category == cat.name)
                .fold(0u64, |sum, e| sum.saturating_add(e.amount)),
        })
        .filter(|t| t.value > 0)
        .collect();
    totals.sort_by(|a, b| b.value.cmp(&a.value));
    totals
}

/// The `limit` latest expenses by date across all months. Same-date entries
/// keep collection order (newest added first).
pub fn recent_transactions(all: &[Expense], limit: usize) -> Vec<&Expense> {
    let mut sorted: Vec<&Expense> = all.iter().collect();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));
    sorted.truncate(limit);
    sorted
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DashboardSummary {
    pub month: String,
    pub total: u64,
    pub breakdown: Vec<CategoryTotal>,
    pub recent: Vec<Expense>,
    pub entry_count: usize,
}

impl DashboardSummary {
    pub fn compute(all: &[Expense], reference: &str, recent_limit: usize) -> Self {
        let monthly = monthly_expenses(all, reference);
        Self {
            month: month_key(reference).unwrap_or_default().to_string(),
            total: total_spending(&monthly),
            breakdown: category_breakdown(&monthly),
            recent: recent_transactions(all, recent_limit)
                .into_iter()
                .cloned()
                .collect(),
            entry_count: all.len(),
        }
    }
}

/// Holds the last summary and recomputes only when the store revision, the
/// reference month or the limit changes.
#[derive(Debug, Default)]
pub struct SummaryCache {
    key: Option<(u64, String, usize)>,
    summary: DashboardSummary,
    computations: usize,
}

impl SummaryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(
        &mut self,
        revision: u64,
        all: &[Expense],
        reference: &str,
        recent_limit: usize,
    ) -> &DashboardSummary {
        let month = month_key(reference).unwrap_or_default().to_string();
        let key = (revision, month, recent_limit);
        if self.key.as_ref() != Some(&key) {
            self.summary = DashboardSummary::compute(all, reference, recent_limit);
            self.key = Some(key);
            self.computations += 1;
        }
        &self.summary
    }

    /// Forget the cached summary; the next `get` recomputes.
    pub fn invalidate(&mut self) {
        self.key = None;
    }

    #[cfg(test)]
    pub fn computations(&self) -> usize {
        self.computations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expense(id: &str, amount: u64, category: &str, date: &str) -> Expense {
        Expense {
            id: id.to_string(),
            amount,
            category: category.to_string(),
            note: String::new(),
            date: date.to_string(),
            emoji: String::new(),
        }
    }

    #[test]
    fn test_month_key() {
        assert_eq!(month_key("2024-06-01"), Some("2024-06"));
        assert_eq!(month_key("2024-06"), Some("2024-06"));
        assert_eq!(month_key("2024"), None);
        assert_eq!(month_key(""), None);
    }

    #[test]
    fn test_empty_collection() {
        let all: Vec<Expense> = vec![];
        let monthly = monthly_expenses(&all, "2024-06-15");
        assert_eq!(total_spending(&monthly), 0);
        assert!(category_breakdown(&monthly).is_empty());
        assert!(recent_transactions(&all, 5).is_empty());
    }

    #[test]
    fn test_monthly_filter_is_prefix_match() {
        let all = vec![
            expense("1", 100, "Food", "2024-06-30"),
            expense("2", 200, "Food", "2024-07-01"),
            expense("3", 300, "Food", "2023-06-15"),
            expense("4", 400, "Food", "2024-06-01"),
            expense("5", 500, "Food", "bad"),
        ];
        let monthly = monthly_expenses(&all, "2024-06-15");
        let ids: Vec<&str> = monthly.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "4"]);
        assert_eq!(total_spending(&monthly), 500);
    }

    #[test]
    fn test_scenario_food_and_rent() {
        let all = vec![
            expense("2", 1000, "Rent", "2024-06-02"),
            expense("1", 250, "Food", "2024-06-01"),
        ];
        let monthly = monthly_expenses(&all, "2024-06-20");
        assert_eq!(total_spending(&monthly), 1250);
        let breakdown = category_breakdown(&monthly);
        let pairs: Vec<(&str, u64)> = breakdown.iter().map(|t| (t.name, t.value)).collect();
        assert_eq!(pairs, vec![("Rent", 1000), ("Food", 250)]);
        assert_eq!(breakdown[0].color, "#45B7D1");
    }

    #[test]
    fn test_breakdown_drops_zero_and_ties_keep_registry_order() {
        let all = vec![
            expense("1", 0, "Food", "2024-06-01"),
            expense("2", 300, "Other", "2024-06-01"),
            expense("3", 300, "Transport", "2024-06-01"),
            expense("4", 100, "Bills", "2024-06-01"),
            expense("5", 200, "Bills", "2024-06-02"),
        ];
        let monthly = monthly_expenses(&all, "2024-06-01");
        let names: Vec<&str> = category_breakdown(&monthly).iter().map(|t| t.name).collect();
        // Transport, Bills and Other all total 300; registry order decides.
        assert_eq!(names, vec!["Transport", "Bills", "Other"]);
        for t in category_breakdown(&monthly) {
            assert!(t.value > 0);
        }
    }

    #[test]
    fn test_orphan_category_counts_toward_total_only() {
        let all = vec![
            expense("1", 100, "Groceries", "2024-06-01"),
            expense("2", 50, "Food", "2024-06-01"),
        ];
        let monthly = monthly_expenses(&all, "2024-06-01");
        assert_eq!(total_spending(&monthly), 150);
        let breakdown = category_breakdown(&monthly);
        assert_eq!(breakdown.len(), 1);
        assert_eq!(breakdown[0].name, "Food");
    }

    #[test]
    fn test_recent_takes_latest_five_by_date() {
        let all = vec![
            expense("1", 1, "Food", "2024-01-03"),
            expense("2", 1, "Food", "2024-01-06"),
            expense("3", 1, "Food", "2024-01-01"),
            expense("4", 1, "Food", "2024-01-05"),
            expense("5", 1, "Food", "2024-01-02"),
            expense("6", 1, "Food", "2024-01-04"),
        ];
        let recent = recent_transactions(&all, 5);
        let dates: Vec<&str> = recent.iter().map(|e| e.date.as_str()).collect();
        assert_eq!(
            dates,
            vec!["2024-01-06", "2024-01-05", "2024-01-04", "2024-01-03", "2024-01-02"]
        );
    }

    #[test]
    fn test_recent_spans_months_and_ties_keep_collection_order() {
        let all = vec![
            expense("c", 1, "Food", "2024-05-01"),
            expense("b", 1, "Food", "2024-05-01"),
            expense("a", 1, "Food", "2023-12-31"),
        ];
        let ids: Vec<&str> = recent_transactions(&all, 5)
            .iter()
            .map(|e| e.id.as_str())
            .collect();
        assert_eq!(ids, vec!["c", "b", "a"]);
    }

    #[test]
    fn test_share() {
        let t = CategoryTotal { name: "Food", emoji: "", color: "#000000", value: 250 };
        assert!((t.share(1000) - 25.0).abs() < f64::EPSILON);
        assert_eq!(t.share(0), 0.0);
    }

    #[test]
    fn test_summary_cache_recomputes_only_on_change() {
        let all = vec![expense("1", 250, "Food", "2024-06-01")];
        let mut cache = SummaryCache::new();

        assert_eq!(cache.get(1, &all, "2024-06-10", 5).total, 250);
        assert_eq!(cache.get(1, &all, "2024-06-28", 5).total, 250);
        assert_eq!(cache.computations(), 1);

        let summary = cache.get(1, &all, "2024-07-01", 5);
        assert_eq!(summary.total, 0);
        assert_eq!(summary.recent.len(), 1);
        assert_eq!(cache.computations(), 2);

        cache.get(2, &all, "2024-07-01", 5);
        assert_eq!(cache.computations(), 3);

        cache.invalidate();
        cache.get(2, &all, "2024-07-01", 5);
        assert_eq!(cache.computations(), 4);
    }
}
