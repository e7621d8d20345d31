//! Upload list, embedded in the download page.

use serde::Serialize;
use tracing::{info, warn};

use super::cursor::{CellClass, ColumnSpec, MarkerPolicy, OnEmpty, OnFilled, RowLayout, RowMachine, RowRecord};
use super::markup::NBSP;
use super::table::{ROW_CELLS_WITH_INPUTS, TableScope, table_cells};
use crate::profile::VersionProfile;

/// One row of the upload list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UploadRecord {
    /// Shared file name.
    pub file_name: String,
    /// Remote user name.
    pub user_name: String,
    /// Total sent to this user.
    pub uploaded: String,
    /// Total received from this user.
    pub downloaded: String,
    /// Current upload speed to this user.
    pub speed: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadField {
    FileName,
    UserName,
    Uploaded,
    Downloaded,
    Speed,
}

/// The two unused columns between "downloaded" and "speed".
const GAP_ADVANCES: ColumnSpec<UploadField> = ColumnSpec {
    on_filled: OnFilled::Reset,
    on_empty: OnEmpty::Advance,
};

const GAP_STRICT: ColumnSpec<UploadField> = ColumnSpec {
    on_filled: OnFilled::Reset,
    on_empty: OnEmpty::Reset,
};

/// Blank gap columns advance the cursor.
pub(crate) const UPLOAD_LAYOUT: RowLayout<UploadField> = RowLayout {
    columns: &[
        ColumnSpec::field(UploadField::FileName),
        ColumnSpec::field(UploadField::UserName),
        ColumnSpec::field(UploadField::Uploaded),
        ColumnSpec::field(UploadField::Downloaded),
        GAP_ADVANCES,
        GAP_ADVANCES,
        ColumnSpec::field(UploadField::Speed),
    ],
    marker: MarkerPolicy::Attach,
};

/// Blank gap columns end the row.
pub(crate) const UPLOAD_LAYOUT_STRICT: RowLayout<UploadField> = RowLayout {
    columns: &[
        ColumnSpec::field(UploadField::FileName),
        ColumnSpec::field(UploadField::UserName),
        ColumnSpec::field(UploadField::Uploaded),
        ColumnSpec::field(UploadField::Downloaded),
        GAP_STRICT,
        GAP_STRICT,
        ColumnSpec::field(UploadField::Speed),
    ],
    marker: MarkerPolicy::Attach,
};

impl RowRecord for UploadRecord {
    type Field = UploadField;

    fn assign(&mut self, field: UploadField, value: &str) {
        let slot = match field {
            UploadField::FileName => &mut self.file_name,
            UploadField::UserName => &mut self.user_name,
            UploadField::Uploaded => &mut self.uploaded,
            UploadField::Downloaded => &mut self.downloaded,
            UploadField::Speed => &mut self.speed,
        };
        *slot = value.to_string();
    }
}

/// Upload cells are blank when empty or padded with `&nbsp;`.
fn is_blank(cell: &str) -> bool {
    cell.is_empty() || cell.contains(NBSP)
}

/// Parses the upload list out of the download page.
#[tracing::instrument(skip(html, profile), fields(html_len = html.len(), profile = %profile.label))]
#[must_use]
pub fn parse_uploads(html: &str, profile: &VersionProfile) -> Vec<UploadRecord> {
    if html.trim().is_empty() {
        warn!("upload page is empty");
        return Vec::new();
    }

    let layout = if profile.upload_blank_gap_advances {
        UPLOAD_LAYOUT
    } else {
        UPLOAD_LAYOUT_STRICT
    };
    let cells = table_cells(html, &profile.upload, TableScope::Single, ROW_CELLS_WITH_INPUTS);
    let mut machine = RowMachine::<UploadRecord>::new(layout);
    for cell in &cells {
        let class = if is_blank(cell.html()) { CellClass::Empty } else { CellClass::Filled };
        machine.feed(class, cell.html());
    }

    let dropped = machine.dropped();
    let records = machine.finish();
    info!(count = records.len(), dropped, "parsed uploads");
    records
}
