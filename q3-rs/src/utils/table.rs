//! Table output for model listings

use prettytable::format::{Alignment, consts::FORMAT_NO_LINESEP_WITH_TITLE};
use prettytable::{Cell, Row, Table};

/// Table with bold column titles
pub fn create_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table.set_format(*FORMAT_NO_LINESEP_WITH_TITLE);
    let titles = headers.iter().map(|h| Cell::new(h).style_spec("b")).collect();
    table.set_titles(Row::new(titles));
    table
}

/// Append a row; frame indices, counts and fractions are right-aligned
pub fn add_table_row(table: &mut Table, cells: Vec<String>) {
    table.add_row(Row::new(cells.iter().map(|text| cell(text)).collect()));
}

fn cell(text: &str) -> Cell {
    if is_numeric(text) {
        Cell::new_align(text, Alignment::RIGHT)
    } else {
        Cell::new(text)
    }
}

fn is_numeric(text: &str) -> bool {
    !text.is_empty() && text.parse::<f64>().is_ok()
}
