use comfy_table::{Cell, Color, Table};

use crate::categories::CATEGORIES;
use crate::error::Result;
use crate::tui::hex_color;

pub fn list() -> Result<()> {
    let mut table = Table::new();
    table.set_header(vec!["#", "Category", "Color"]);
    for (i, cat) in CATEGORIES.iter().enumerate() {
        let swatch = match hex_color(cat.color) {
            ratatui::style::Color::Rgb(r, g, b) => Color::Rgb { r, g, b },
            _ => Color::Grey,
        };
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(format!("{} {}", cat.emoji, cat.name)),
            Cell::new(cat.color).fg(swatch),
        ]);
    }
    println!("Categories\n{table}");
    Ok(())
}
