use chrono::NaiveDate;

/// Format a whole-rupee amount with Indian digit grouping: ₹1,23,456
///
/// The last three digits form one group; everything above is grouped in pairs.
pub fn rupees(amount: u64) -> String {
    let digits = amount.to_string();
    if digits.len() <= 3 {
        return format!("\u{20b9}{digits}");
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut grouped = String::new();
    for (i, c) in head.chars().enumerate() {
        if i > 0 && (head.len() - i) % 2 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    format!("\u{20b9}{grouped},{tail}")
}

/// Render an ISO date the way en-IN locales do: 2024-06-01 -> 1/6/2024.
/// Input that does not parse is returned unchanged.
pub fn short_date(date: &str) -> String {
    match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        Ok(d) => d.format("%-d/%-m/%Y").to_string(),
        Err(_) => date.to_string(),
    }
}

/// "2024-06" -> "June 2024"
pub fn month_label(month: &str) -> String {
    match NaiveDate::parse_from_str(&format!("{month}-01"), "%Y-%m-%d") {
        Ok(d) => d.format("%B %Y").to_string(),
        Err(_) => month.to_string(),
    }
}
