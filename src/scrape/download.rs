//! Download list (`amuleweb-main-dload.php`).

use serde::Serialize;
use tracing::{debug, info, warn};

use super::cursor::{CellClass, ColumnSpec, MarkerPolicy, RowLayout, RowMachine, RowRecord};
use super::markup::nbsp_to_space;
use super::table::{ROW_CELLS_WITH_INPUTS, TableScope, table_cells};
use crate::locale::NumberLocale;
use crate::profile::VersionProfile;

/// One row of the download list.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DownloadRecord {
    /// Daemon-side file id from the row's checkbox, if present.
    pub id: Option<String>,
    /// Display name.
    pub name: String,
    /// Total size, e.g. `"700.5 MB"`.
    pub size: String,
    /// Completed amount with percentage, e.g. `"350.2 MB (50.1%)"`.
    pub completed: String,
    /// Instantaneous speed, e.g. `"10.5 kb/s"`; empty when paused.
    pub speed: String,
    /// Completion percentage, 0 to 100.
    pub progress: f64,
    /// Source counts as rendered.
    pub sources: String,
    /// Status text.
    pub status: String,
    /// Priority text.
    pub priority: String,
}

/// Download table columns, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadField {
    Name,
    Size,
    Completed,
    Speed,
    Sources,
    Status,
    Priority,
}

/// Columns: name, size, completed, speed, progress bar, sources, status, priority.
pub(crate) const DOWNLOAD_LAYOUT: RowLayout<DownloadField> = RowLayout {
    columns: &[
        ColumnSpec::field(DownloadField::Name),
        ColumnSpec::field(DownloadField::Size),
        ColumnSpec::field(DownloadField::Completed),
        ColumnSpec::optional(DownloadField::Speed),
        ColumnSpec::ignored(),
        ColumnSpec::field(DownloadField::Sources),
        ColumnSpec::field(DownloadField::Status),
        ColumnSpec::field(DownloadField::Priority),
    ],
    marker: MarkerPolicy::Restart,
};

/// Record builder carrying the locale used to decompose the completed column.
#[derive(Debug, Clone, Default)]
struct DownloadRow {
    record: DownloadRecord,
    locale: NumberLocale,
}

impl RowRecord for DownloadRow {
    type Field = DownloadField;

    fn assign(&mut self, field: DownloadField, value: &str) {
        let record = &mut self.record;
        match field {
            DownloadField::Name => record.name = value.to_string(),
            DownloadField::Size => record.size = value.to_string(),
            DownloadField::Completed => {
                record.completed = nbsp_to_space(value);
                record.progress = completed_percentage(&record.completed, self.locale);
            }
            DownloadField::Speed => record.speed = value.to_string(),
            DownloadField::Sources => record.sources = value.to_string(),
            DownloadField::Status => record.status = value.to_string(),
            DownloadField::Priority => record.priority = value.to_string(),
        }
    }
}

/// Parses the download list into records, in row order.
///
/// Rows missing trailing cells are dropped. Returns an empty list when the
/// page or table is absent.
#[tracing::instrument(skip(html, profile), fields(html_len = html.len(), profile = %profile.label))]
#[must_use]
pub fn parse_downloads(html: &str, profile: &VersionProfile, locale: NumberLocale) -> Vec<DownloadRecord> {
    if html.trim().is_empty() {
        warn!("download page is empty");
        return Vec::new();
    }

    let cells = table_cells(html, &profile.download, TableScope::Single, ROW_CELLS_WITH_INPUTS);
    let template = DownloadRow {
        record: DownloadRecord::default(),
        locale,
    };
    let mut machine = RowMachine::with_template(DOWNLOAD_LAYOUT, template);

    for cell in &cells {
        if cell.is_empty() {
            machine.feed(CellClass::Empty, cell.html());
        } else if cell.has_input() {
            let id = cell.input_name().map(str::to_string);
            machine.mark(|row| row.record.id = id);
        } else {
            machine.feed(CellClass::Filled, cell.html());
        }
    }

    let dropped = machine.dropped();
    let records: Vec<DownloadRecord> = machine.finish().into_iter().map(|row| row.record).collect();
    info!(count = records.len(), dropped, "parsed downloads");
    records
}

/// Extracts the percentage between `(` and `%` of a completed-amount cell.
///
/// Either decimal separator is accepted. Returns `0.0` when the cell has no
/// percentage or it does not parse.
#[must_use]
pub fn completed_percentage(completed: &str, locale: NumberLocale) -> f64 {
    let (Some(open), Some(percent)) = (completed.find('('), completed.find('%')) else {
        return 0.0;
    };
    if percent <= open {
        debug!(completed = %completed, "percentage markers out of order");
        return 0.0;
    }
    let raw = &completed[open + 1..percent];
    locale.parse_decimal(raw).unwrap_or_else(|| {
        debug!(completed = %completed, raw = %raw, "percentage does not parse, using 0");
        0.0
    })
}
