//! Table assembly and combination across pages.

use crate::model::{Row, Table};
use crate::parsing::values::parse_id;
use crate::schema::{CombinePolicy, FamilyProfile};

/// Wrap finished rows of one page (or one pooled document) in a table.
pub fn build_table(
    profile: &FamilyProfile,
    rows: Vec<Row>,
    page_number: Option<usize>,
    page_count: usize,
) -> Table {
    Table::new(&profile.headers, rows, page_number, page_count)
}

/// Combine tables into one.
///
/// `Concatenate` keeps rows in input order. `SortById` orders rows by the
/// numeric identity field (unparseable ids count as 0), keeping input order
/// among equal ids. The result's page count is the sum of the inputs'.
pub fn combine_tables(profile: &FamilyProfile, tables: Vec<Table>) -> Table {
    let page_count = tables.iter().map(|t| t.metadata.source_page_count).sum();
    let mut rows: Vec<Row> = tables.into_iter().flat_map(|t| t.rows).collect();

    if profile.combine == CombinePolicy::SortById {
        rows.sort_by_key(|row| parse_id(row.get(profile.identity_field).unwrap_or_default()));
    }

    tracing::debug!(
        family = %profile.family,
        rows = rows.len(),
        pages = page_count,
        "combined tables"
    );
    build_table(profile, rows, None, page_count)
}
