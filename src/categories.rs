use crate::models::Category;

/// The category registry, in display order. Order breaks ties in the monthly
/// breakdown and drives the picker grid layout.
pub const CATEGORIES: &[Category] = &[
    Category { name: "Food", emoji: "\u{1f354}", color: "#FF6B6B" },
    Category { name: "Transport", emoji: "\u{1f697}", color: "#4ECDC4" },
    Category { name: "Rent", emoji: "\u{1f3e0}", color: "#45B7D1" },
    Category { name: "Shopping", emoji: "\u{1f6cd}\u{fe0f}", color: "#96CEB4" },
    Category { name: "Entertainment", emoji: "\u{1f3ac}", color: "#FFEAA7" },
    Category { name: "Bills", emoji: "\u{1f4a1}", color: "#DDA0DD" },
    Category { name: "Health", emoji: "\u{2764}\u{fe0f}", color: "#FF7675" },
    Category { name: "Other", emoji: "\u{1f389}", color: "#FDCB6E" },
];

pub fn find(name: &str) -> Option<&'static Category> {
    CATEGORIES.iter().find(|c| c.name == name)
}

/// Case-insensitive lookup for names typed on the command line.
pub fn resolve(input: &str) -> Option<&'static Category> {
    let needle = input.trim();
    CATEGORIES
        .iter()
        .find(|c| c.name.eq_ignore_ascii_case(needle))
}
