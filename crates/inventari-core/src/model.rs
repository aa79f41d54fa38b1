use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::parsing::values::parse_amount;

/// Value written into every schema field the parser could not fill.
pub const MISSING: &str = "-";

/// A positioned piece of text, as handed over by a fragment source.
///
/// Coordinates live in a document-relative unit space where `y` grows
/// downward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextFragment {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
    pub text: String,
    #[serde(default)]
    pub font_face: i32,
}

impl TextFragment {
    pub fn new(x: f64, y: f64, text: impl Into<String>) -> Self {
        TextFragment {
            x,
            y,
            width: 0.0,
            height: 0.0,
            text: text.into(),
            font_face: 0,
        }
    }

    pub fn trimmed(&self) -> &str {
        self.text.trim()
    }

    /// Lowest point covered by this fragment.
    pub fn bottom(&self) -> f64 {
        self.y + self.height.max(0.0)
    }
}

/// One reconstructed record: schema field name -> value.
///
/// Serializes as a flat JSON object. The composite identity is kept for
/// deduplication and debugging and is never serialized, so the key set of
/// a finished row is exactly the table headers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    #[serde(skip)]
    identity: String,
    #[serde(flatten)]
    fields: IndexMap<String, String>,
}

impl Row {
    pub fn new() -> Self {
        Row::default()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    /// True if the field holds a real value (not absent, empty or the sentinel).
    pub fn is_set(&self, field: &str) -> bool {
        matches!(self.get(field), Some(v) if !v.is_empty() && v != MISSING)
    }

    pub fn set(&mut self, field: &str, value: impl Into<String>) {
        self.fields.insert(field.to_string(), value.into());
    }

    /// Append text to a field, separated by a single space.
    pub fn append(&mut self, field: &str, text: &str) {
        match self.fields.get_mut(field) {
            Some(existing) if !existing.is_empty() && existing != MISSING => {
                existing.push(' ');
                existing.push_str(text);
            }
            _ => self.set(field, text),
        }
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub(crate) fn values_mut(&mut self) -> impl Iterator<Item = &mut String> {
        self.fields.values_mut()
    }

    /// Composite `anchor-date-number` key built during post-processing.
    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub(crate) fn set_identity(&mut self, identity: String) {
        self.identity = identity;
    }

    /// Rebuild the field map in `headers` order, filling gaps with
    /// [`MISSING`] and dropping keys outside the schema.
    pub(crate) fn conform_to(&mut self, headers: &[&str]) {
        let mut conformed = IndexMap::with_capacity(headers.len());
        for header in headers {
            let value = match self.fields.swap_remove(*header) {
                Some(v) if !v.is_empty() => v,
                _ => MISSING.to_string(),
            };
            conformed.insert(header.to_string(), value);
        }
        self.fields = conformed;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableMetadata {
    pub total_rows: usize,
    pub total_columns: usize,
    /// Page this table was parsed from. Absent once tables are combined or
    /// when the whole document was parsed as one pool.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_page_number: Option<usize>,
    /// Number of source pages that contributed rows to this table.
    pub source_page_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Row>,
    pub metadata: TableMetadata,
}

impl Table {
    pub fn new(
        headers: &[&str],
        rows: Vec<Row>,
        source_page_number: Option<usize>,
        source_page_count: usize,
    ) -> Self {
        let headers: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
        Table {
            metadata: TableMetadata {
                total_rows: rows.len(),
                total_columns: headers.len(),
                source_page_number,
                source_page_count,
            },
            headers,
            rows,
        }
    }

    /// Sum of every parseable amount in `field`. Sentinels and malformed
    /// values count as zero.
    pub fn column_total(&self, field: &str) -> Decimal {
        self.rows
            .iter()
            .filter_map(|row| row.get(field).and_then(parse_amount))
            .sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    /// Not inside any anchor's row window.
    OutsideRows,
    /// Inside a row but outside every column band.
    OutsideColumns,
    /// Inside at least one band but no field in those bands accepted it.
    Rejected,
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DropReason::OutsideRows => write!(f, "outside every row window"),
            DropReason::OutsideColumns => write!(f, "outside every column band"),
            DropReason::Rejected => write!(f, "rejected by every field in its band"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DroppedFragment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_number: Option<usize>,
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub reason: DropReason,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum ExclusionReason {
    /// A checked text field carried a totals/subtotal keyword.
    TotalsKeyword { field: String },
    /// The identity field does not have the expected numeric shape.
    InvalidIdentity,
}

impl fmt::Display for ExclusionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExclusionReason::TotalsKeyword { field } => {
                write!(f, "totals keyword in '{field}'")
            }
            ExclusionReason::InvalidIdentity => write!(f, "invalid identity value"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExcludedRow {
    pub identity: String,
    pub reason: ExclusionReason,
}

/// What the parser discarded while building a table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParseDiagnostics {
    pub anchors_found: usize,
    pub merged_anchors: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dropped_fragments: Vec<DroppedFragment>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub excluded_rows: Vec<ExcludedRow>,
}

impl ParseDiagnostics {
    pub fn absorb(&mut self, other: ParseDiagnostics) {
        self.anchors_found += other.anchors_found;
        self.merged_anchors += other.merged_anchors;
        self.dropped_fragments.extend(other.dropped_fragments);
        self.excluded_rows.extend(other.excluded_rows);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedTable {
    pub table: Table,
    pub diagnostics: ParseDiagnostics,
}
