use colored::Colorize;
use comfy_table::{Cell, CellAlignment, Table};

use crate::aggregate::{category_breakdown, monthly_expenses, recent_transactions, total_spending};
use crate::error::Result;
use crate::fmt::{month_label, rupees, short_date};
use crate::models::Expense;
use crate::settings::load_settings;

use super::{open_store, parse_month_opt};

pub fn summary(month: Option<String>) -> Result<()> {
    let month = parse_month_opt(month.as_deref())?;
    let store = open_store(&load_settings());
    print!("{}", render_summary(store.expenses(), &month));
    Ok(())
}

pub fn recent(limit: Option<usize>) -> Result<()> {
    let settings = load_settings();
    let store = open_store(&settings);
    let limit = limit.unwrap_or(settings.recent_limit);
    print!("{}", render_recent(store.expenses(), limit));
    Ok(())
}

fn render_summary(all: &[Expense], month: &str) -> String {
    let monthly = monthly_expenses(all, month);
    let total = total_spending(&monthly);
    let breakdown = category_breakdown(&monthly);

    let mut out = format!(
        "{}\n{}\n",
        format!("Spending for {}", month_label(month)).bold(),
        rupees(total).green().bold()
    );
    if breakdown.is_empty() {
        out.push_str("No spending data for this month.\n");
        return out;
    }

    let mut table = Table::new();
    table.set_header(vec!["Category", "Amount", "Share"]);
    for item in &breakdown {
        table.add_row(vec![
            Cell::new(format!("{} {}", item.emoji, item.name)),
            Cell::new(rupees(item.value)).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.1}%", item.share(total))).set_alignment(CellAlignment::Right),
        ]);
    }
    out.push_str(&format!("Category Breakdown\n{table}\n"));
    out
}

fn render_recent(all: &[Expense], limit: usize) -> String {
    let recent = recent_transactions(all, limit);
    if recent.is_empty() {
        return "No transactions yet.\n".to_string();
    }

    let mut table = Table::new();
    table.set_header(vec!["Date", "Category", "Note", "Amount"]);
    for e in recent {
        table.add_row(vec![
            Cell::new(short_date(&e.date)),
            Cell::new(format!("{} {}", e.emoji, e.category)),
            Cell::new(&e.note),
            Cell::new(rupees(e.amount)).set_alignment(CellAlignment::Right),
        ]);
    }
    format!("Recent Transactions\n{table}\n")
}
