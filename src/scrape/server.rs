//! Server list (`amuleweb-main-servers.php`).

use serde::Serialize;
use tracing::{info, warn};

use super::cursor::{CellClass, ColumnSpec, MarkerPolicy, RowLayout, RowMachine, RowRecord};
use super::markup::link_endpoint;
use super::table::{ROW_CELLS, TableScope, table_cells};
use crate::profile::VersionProfile;

/// One known server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ServerRecord {
    /// Opaque address token from the connect/remove link (`ip=`).
    pub id: Option<String>,
    /// Port from the connect/remove link (`port=`).
    pub port: Option<String>,
    pub name: String,
    pub description: String,
    /// `host:port` as displayed.
    pub address: String,
    pub users: String,
    pub files: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerField {
    Name,
    Description,
    Address,
    Users,
    Files,
}

pub(crate) const SERVER_LAYOUT: RowLayout<ServerField> = RowLayout {
    columns: &[
        ColumnSpec::field(ServerField::Name),
        ColumnSpec::field(ServerField::Description),
        ColumnSpec::field(ServerField::Address),
        ColumnSpec::field(ServerField::Users),
        ColumnSpec::field(ServerField::Files),
    ],
    marker: MarkerPolicy::Attach,
};

impl RowRecord for ServerRecord {
    type Field = ServerField;

    fn assign(&mut self, field: ServerField, value: &str) {
        let slot = match field {
            ServerField::Name => &mut self.name,
            ServerField::Description => &mut self.description,
            ServerField::Address => &mut self.address,
            ServerField::Users => &mut self.users,
            ServerField::Files => &mut self.files,
        };
        *slot = value.to_string();
    }
}

/// Parses the server list.
///
/// Every table from the profile's server index onward is scanned, skipping
/// the header rows of each.
#[tracing::instrument(skip(html, profile), fields(html_len = html.len(), profile = %profile.label))]
#[must_use]
pub fn parse_servers(html: &str, profile: &VersionProfile) -> Vec<ServerRecord> {
    if html.trim().is_empty() {
        warn!("server page is empty");
        return Vec::new();
    }

    let cells = table_cells(html, &profile.server, TableScope::FromIndex, ROW_CELLS);
    let mut machine = RowMachine::<ServerRecord>::new(SERVER_LAYOUT);
    for cell in &cells {
        if cell.is_empty() {
            machine.feed(CellClass::Empty, cell.html());
        } else if let Some(href) = cell.link() {
            let (id, port) = link_endpoint(href);
            // A link without parameters leaves whatever an earlier link set.
            machine.mark(|server| {
                if id.is_some() {
                    server.id = id;
                }
                if port.is_some() {
                    server.port = port;
                }
            });
        } else {
            machine.feed(CellClass::Filled, cell.html());
        }
    }

    let dropped = machine.dropped();
    let records = machine.finish();
    info!(count = records.len(), dropped, "parsed servers");
    records
}
