//! Search results (`amuleweb-main-search.php`).

use serde::Serialize;
use tracing::{debug, info, warn};

use super::cursor::{CellClass, ColumnSpec, MarkerPolicy, RowLayout, RowMachine, RowRecord};
use super::table::{ROW_CELLS, selected_row_cells};
use crate::profile::VersionProfile;

/// One search hit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchRecord {
    /// Content hash from the result's checkbox.
    pub id: Option<String>,
    /// File name as listed.
    pub name: String,
    /// Size text, unit included.
    pub size: String,
    /// Number of sources reporting the file.
    pub sources: String,
}

/// Columns of a search result row, after the checkbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
    Name,
    Size,
    Sources,
}

/// Rows start at the selection checkbox; anything before it is ignored.
pub(crate) const SEARCH_LAYOUT: RowLayout<SearchField> = RowLayout {
    columns: &[
        ColumnSpec::field(SearchField::Name),
        ColumnSpec::field(SearchField::Size),
        ColumnSpec::field(SearchField::Sources),
    ],
    marker: MarkerPolicy::Gate,
};

impl RowRecord for SearchRecord {
    type Field = SearchField;

    fn assign(&mut self, field: SearchField, value: &str) {
        let slot = match field {
            SearchField::Name => &mut self.name,
            SearchField::Size => &mut self.size,
            SearchField::Sources => &mut self.sources,
        };
        *slot = value.to_string();
    }
}

/// Parses the search result rows.
#[tracing::instrument(skip(html, profile), fields(html_len = html.len(), profile = %profile.label))]
#[must_use]
pub fn parse_search_results(html: &str, profile: &VersionProfile) -> Vec<SearchRecord> {
    if html.trim().is_empty() {
        warn!("search page is empty");
        return Vec::new();
    }

    let cells = selected_row_cells(html, &profile.search_row_selector, ROW_CELLS);
    let mut machine = RowMachine::<SearchRecord>::new(SEARCH_LAYOUT);
    for cell in &cells {
        if cell.is_empty() {
            machine.feed(CellClass::Empty, cell.html());
        } else if cell.is_selection_checkbox() {
            let id = cell.input_name().map(str::to_string);
            debug!(id = ?id, "found search result id");
            machine.mark(|result| result.id = id);
        } else {
            machine.feed(CellClass::Filled, cell.html());
        }
    }

    let records = machine.finish();
    info!(count = records.len(), "parsed search results");
    records
}
