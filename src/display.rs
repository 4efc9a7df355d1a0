//! Plain-text rendering for the command line.

use crate::models::NormalizedRow;
use tabled::settings::{object::Columns, Modify, Style, Width};
use tabled::Table;

pub const NO_RESULTS: &str = "No results found for the query.";

/// Widest a column may grow before cells are truncated
const MAX_COLUMN_WIDTH: usize = 48;

/// Render rows as a table with one header line, or the no-results message.
pub fn render_table(rows: &[NormalizedRow]) -> String {
    if rows.is_empty() {
        return NO_RESULTS.to_string();
    }

    Table::new(rows)
        .with(Style::psql())
        .with(Modify::new(Columns::new(..)).with(Width::truncate(MAX_COLUMN_WIDTH).suffix("…")))
        .to_string()
}
