//! Table extraction engine.
//!
//! Turns a page into the flat, ordered sequence of [`Cell`]s that the
//! per-document row machines consume. Structural misses (no such table, no
//! rows after the header skip, a selector that does not compile) produce an
//! empty sequence, never an error.
//!
//! Rows are the direct `<tr>` children of the targeted table. The HTML parser
//! moves rows into an implicit `<tbody>`, so section elements are descended
//! into, but rows of nested tables are not.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

use crate::profile::TableTarget;

/// Cell tags of the download and upload tables.
pub const ROW_CELLS_WITH_INPUTS: &[&str] = &["th", "td", "input"];

/// Cell tags of every other table.
pub const ROW_CELLS: &[&str] = &["th", "td"];

#[allow(clippy::expect_used)]
static INPUT: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("input").expect("input selector is valid")); // Static pattern, safe to panic

#[allow(clippy::expect_used)]
static LINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("link selector is valid")); // Static pattern, safe to panic

#[allow(clippy::expect_used)]
static NESTED_TABLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table").expect("table selector is valid")); // Static pattern, safe to panic

/// One table cell.
///
/// Carries the re-serialized inner markup (what gets stored in records) and
/// the facts the row machines branch on, read from the parsed elements so
/// they do not depend on how the serializer orders attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cell {
    html: String,
    input: Option<InputElement>,
    link: Option<String>,
    nested_table: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct InputElement {
    kind: Option<String>,
    name: Option<String>,
}

impl Cell {
    fn from_element(cell: ElementRef<'_>) -> Self {
        let input = cell.select(&INPUT).next().map(|input| InputElement {
            kind: input.value().attr("type").map(str::to_string),
            name: input.value().attr("name").map(str::to_string),
        });
        let link = cell
            .select(&LINK)
            .next()
            .and_then(|anchor| anchor.value().attr("href"))
            .map(str::to_string);
        Self {
            html: cell.inner_html(),
            input,
            link,
            nested_table: cell.select(&NESTED_TABLE).next().is_some(),
        }
    }

    /// Inner markup as serialized by the parser.
    #[must_use]
    pub fn html(&self) -> &str {
        &self.html
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.html.is_empty()
    }

    /// Whether the cell holds an `<input>` element.
    #[must_use]
    pub fn has_input(&self) -> bool {
        self.input.is_some()
    }

    /// `name` attribute of the cell's first `<input>`, if non-empty.
    #[must_use]
    pub fn input_name(&self) -> Option<&str> {
        let name = self.input.as_ref()?.name.as_deref();
        if name.is_none_or(str::is_empty) {
            warn!(cell = %self.html, "input without a name");
            return None;
        }
        name
    }

    /// Whether the cell is a row-selection checkbox (and not a nested table).
    #[must_use]
    pub fn is_selection_checkbox(&self) -> bool {
        !self.nested_table
            && self
                .input
                .as_ref()
                .and_then(|input| input.kind.as_deref())
                .is_some_and(|kind| kind.eq_ignore_ascii_case("checkbox"))
    }

    /// `href` of the cell's first hyperlink, entities already decoded.
    #[must_use]
    pub fn link(&self) -> Option<&str> {
        self.link.as_deref()
    }
}

/// Which tables of the selector's matches are walked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableScope {
    /// Only the table at the configured index.
    Single,
    /// Every table from the configured index to the end of the page.
    FromIndex,
}

/// Compiles a CSS selector, logging and returning `None` on failure.
pub(crate) fn compile(css: &str) -> Option<Selector> {
    match Selector::parse(css) {
        Ok(selector) => Some(selector),
        Err(e) => {
            warn!(selector = %css, error = ?e, "selector does not compile");
            None
        }
    }
}

/// Returns each data cell of the targeted table(s).
///
/// Header rows are skipped per table. Cells are the row's direct children
/// whose tag is in `cell_tags`, in document order.
#[tracing::instrument(skip(html, target), fields(html_len = html.len(), table_index = target.table_index))]
#[must_use]
pub fn table_cells(
    html: &str,
    target: &TableTarget,
    scope: TableScope,
    cell_tags: &[&str],
) -> Vec<Cell> {
    let Some(selector) = compile(&target.selector) else {
        return Vec::new();
    };
    let document = Html::parse_document(html);
    let tables: Vec<ElementRef<'_>> = document.select(&selector).collect();

    if tables.len() <= target.table_index {
        warn!(
            found = tables.len(),
            index = target.table_index,
            "target table not found"
        );
        return Vec::new();
    }

    let selected = match scope {
        TableScope::Single => &tables[target.table_index..=target.table_index],
        TableScope::FromIndex => &tables[target.table_index..],
    };

    let cells: Vec<Cell> = selected
        .iter()
        .flat_map(|table| direct_rows(*table).into_iter().skip(target.row_skip))
        .flat_map(|row| row_cells(row, cell_tags))
        .map(Cell::from_element)
        .collect();

    if cells.is_empty() {
        debug!(row_skip = target.row_skip, "no data rows after header skip");
    }
    cells
}

/// Returns each cell of every row the selector matches.
///
/// Used where rows are not anchored to a table index.
#[tracing::instrument(skip(html), fields(html_len = html.len()))]
#[must_use]
pub fn selected_row_cells(html: &str, row_selector: &str, cell_tags: &[&str]) -> Vec<Cell> {
    let Some(selector) = compile(row_selector) else {
        return Vec::new();
    };
    let document = Html::parse_document(html);
    let cells: Vec<Cell> = document
        .select(&selector)
        .flat_map(|row| row_cells(row, cell_tags))
        .map(Cell::from_element)
        .collect();
    if cells.is_empty() {
        debug!("no rows matched");
    }
    cells
}

/// Returns the text content of every `cell_tag` cell of every matched table.
#[must_use]
pub fn all_table_texts(html: &str, table_selector: &str, cell_tags: &[&str]) -> Vec<String> {
    let Some(selector) = compile(table_selector) else {
        return Vec::new();
    };
    let document = Html::parse_document(html);
    let mut texts = Vec::new();
    for table in document.select(&selector) {
        for row in direct_rows(table) {
            texts.extend(row_cells(row, cell_tags).map(|cell| cell.text().collect::<String>()));
        }
    }
    texts
}

/// Text content of the first element the selector matches.
#[must_use]
pub fn first_text(html: &str, css: &str) -> Option<String> {
    let selector = compile(css)?;
    let document = Html::parse_document(html);
    document
        .select(&selector)
        .next()
        .map(|element| element.text().collect())
}

/// Inner content of every element the selector matches.
#[must_use]
pub fn element_contents(html: &str, css: &str) -> Vec<String> {
    let Some(selector) = compile(css) else {
        return Vec::new();
    };
    let document = Html::parse_document(html);
    document
        .select(&selector)
        .map(|element| element.inner_html())
        .collect()
}

/// `<tr>` children of a table, looking through `thead`/`tbody`/`tfoot`.
fn direct_rows(table: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    let mut rows = Vec::new();
    for child in table.children().filter_map(ElementRef::wrap) {
        match child.value().name() {
            "tr" => rows.push(child),
            "thead" | "tbody" | "tfoot" => rows.extend(
                child
                    .children()
                    .filter_map(ElementRef::wrap)
                    .filter(|e| e.value().name() == "tr"),
            ),
            _ => {}
        }
    }
    rows
}

fn row_cells<'a>(row: ElementRef<'a>, cell_tags: &'a [&'a str]) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    row.children()
        .filter_map(ElementRef::wrap)
        .filter(move |cell| cell_tags.contains(&cell.value().name()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn markup(cells: &[Cell]) -> Vec<&str> {
        cells.iter().map(Cell::html).collect()
    }

    fn single(cell_html: &str) -> Cell {
        let html = format!("<table><tr><td>{cell_html}</td></tr></table>");
        let mut cells = table_cells(&html, &TableTarget::new(0, 0), TableScope::Single, ROW_CELLS);
        assert_eq!(cells.len(), 1);
        cells.remove(0)
    }

    const PAGE: &str = r#"<html><body>
        <table id="a"><tr><td>a-head</td></tr><tr><td>a1</td><td>a2</td></tr></table>
        <table id="b">
            <tr><th>Name</th><th>Size</th></tr>
            <tr><td>b1</td><td>b2</td></tr>
            <tr><td>b3</td><td></td></tr>
        </table>
        <table id="c"><tbody><tr><td>skip</td></tr><tr><td>c1</td></tr></tbody></table>
    </body></html>"#;

    #[test]
    fn test_table_cells_single_table_skips_headers() {
        let cells = table_cells(PAGE, &TableTarget::new(1, 1), TableScope::Single, ROW_CELLS);
        assert_eq!(markup(&cells), vec!["b1", "b2", "b3", ""]);
    }

    #[test]
    fn test_table_cells_includes_header_when_no_skip() {
        let cells = table_cells(PAGE, &TableTarget::new(1, 0), TableScope::Single, ROW_CELLS);
        assert_eq!(markup(&cells)[..2], ["Name", "Size"]);
    }

    #[test]
    fn test_table_cells_index_out_of_range_is_empty() {
        let cells = table_cells(PAGE, &TableTarget::new(7, 0), TableScope::Single, ROW_CELLS);
        assert!(cells.is_empty());
    }

    #[test]
    fn test_table_cells_skip_beyond_rows_is_empty() {
        let cells = table_cells(PAGE, &TableTarget::new(0, 5), TableScope::Single, ROW_CELLS);
        assert!(cells.is_empty());
    }

    #[test]
    fn test_table_cells_from_index_scans_later_tables() {
        let cells = table_cells(PAGE, &TableTarget::new(1, 1), TableScope::FromIndex, ROW_CELLS);
        assert_eq!(markup(&cells), vec!["b1", "b2", "b3", "", "c1"]);
    }

    #[test]
    fn test_table_cells_bad_selector_is_empty() {
        let target = TableTarget {
            selector: "table[[".to_string(),
            table_index: 0,
            row_skip: 0,
        };
        assert!(table_cells(PAGE, &target, TableScope::Single, ROW_CELLS).is_empty());
    }

    #[test]
    fn test_table_cells_ignores_nested_table_rows() {
        let html = r"<table><tr><td>outer</td><td><table><tr><td>inner</td></tr></table></td></tr></table>";
        let cells = table_cells(html, &TableTarget::new(0, 0), TableScope::Single, ROW_CELLS);
        assert_eq!(cells.len(), 2);
        assert_eq!(cells[0].html(), "outer");
        assert!(cells[1].html().contains("inner"));
    }

    #[test]
    fn test_table_cells_returns_raw_markup() {
        let html = r#"<table><tr><td><input type="checkbox" name="42"></td><td>a &amp; b</td></tr></table>"#;
        let cells = table_cells(html, &TableTarget::new(0, 0), TableScope::Single, ROW_CELLS);
        assert!(cells[0].html().starts_with("<input"));
        assert_eq!(cells[1].html(), "a &amp; b");
    }

    #[test]
    fn test_selected_row_cells_spans_tables() {
        let cells = selected_row_cells(PAGE, "tr", ROW_CELLS);
        assert_eq!(cells.first().unwrap().html(), "a-head");
        assert_eq!(cells.last().unwrap().html(), "c1");
    }

    #[test]
    fn test_cell_checkbox_ignores_attribute_order() {
        for html in [
            r#"<input type="checkbox" name="0123ABCD">"#,
            r#"<input name="0123ABCD" type="checkbox">"#,
            r#"<input class="sel" name="0123ABCD" TYPE="CHECKBOX">"#,
        ] {
            let cell = single(html);
            assert!(cell.has_input(), "{html}");
            assert!(cell.is_selection_checkbox(), "{html}");
            assert_eq!(cell.input_name(), Some("0123ABCD"), "{html}");
        }
    }

    #[test]
    fn test_cell_checkbox_rejects_nested_table_and_text() {
        let nested = single(r#"<table><tr><td><input type="checkbox" name="all"></td></tr></table>"#);
        assert!(!nested.is_selection_checkbox());
        assert!(!single(r#"<input type="text" name="q">"#).is_selection_checkbox());
        assert!(!single("input type=checkbox").is_selection_checkbox());
    }

    #[test]
    fn test_cell_input_name_missing_or_empty() {
        assert_eq!(single(r#"<input type="checkbox">"#).input_name(), None);
        assert_eq!(single(r#"<input name="">"#).input_name(), None);
        assert!(!single("plain").has_input());
    }

    #[test]
    fn test_cell_link_ignores_attribute_order() {
        for html in [
            r#"<a href="servers.php?cmd=connect&amp;ip=77&amp;port=4661">Connect</a>"#,
            r#"<a title="Connect" class="btn" href="servers.php?cmd=connect&amp;ip=77&amp;port=4661">Connect</a>"#,
        ] {
            assert_eq!(single(html).link(), Some("servers.php?cmd=connect&ip=77&port=4661"), "{html}");
        }
        assert_eq!(single(r#"<a name="top">x</a>"#).link(), None);
    }

    #[test]
    fn test_all_table_texts_uses_text_content() {
        let html = r"<table><tr><td><b>Ed2k</b> : Connected</td></tr></table>";
        assert_eq!(all_table_texts(html, "table", &["td"]), vec!["Ed2k : Connected"]);
    }

    #[test]
    fn test_first_text_and_element_contents() {
        let html = "<pre>line one\nline two</pre><script>var a = 1;</script>";
        assert_eq!(first_text(html, "pre").unwrap(), "line one\nline two");
        assert_eq!(first_text(html, "code"), None);
        assert_eq!(element_contents(html, "script"), vec!["var a = 1;"]);
    }
}
