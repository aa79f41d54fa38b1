//! Integration tests for the parse_pdf() end-to-end pipeline.
//!
//! Uses a MockSource that returns pre-built PageFragments without invoking
//! pdftotext, so these tests run without poppler-utils.

use inventari_core::error::InventariError;
use inventari_core::extraction::{FragmentSource, PageFragments};
use inventari_core::model::{ExclusionReason, TextFragment, MISSING};
use inventari_core::parse_pdf;
use inventari_core::parsing::TableParser;
use inventari_core::schema::tuning::parse_tuning_str;
use inventari_core::schema::{llibre_a, relacio_bens, DocumentFamily};
use rust_decimal_macros::dec;

struct MockSource {
    pages: Vec<PageFragments>,
}

impl FragmentSource for MockSource {
    fn extract_pages(&self, _bytes: &[u8]) -> Result<Vec<PageFragments>, InventariError> {
        Ok(self.pages.clone())
    }

    fn backend_name(&self) -> &str {
        "mock"
    }
}

fn frag(x: f64, y: f64, text: &str) -> TextFragment {
    TextFragment::new(x, y, text)
}

fn page(number: usize, height: Option<f64>, fragments: Vec<TextFragment>) -> PageFragments {
    PageFragments {
        page_number: number,
        height,
        fragments,
    }
}

fn parser(family: DocumentFamily) -> TableParser {
    TableParser::new(family).unwrap()
}

/// One relació de béns row, anchored at `y`.
fn bens_row(code: &str, y: f64, description: &str) -> Vec<TextFragment> {
    vec![
        frag(3.0, y, code),
        frag(7.0, y, "12"),
        frag(7.0, y + 1.0, "15/03/2020"),
        frag(14.0, y, "1"),
        frag(14.0, y + 1.0, description),
        frag(30.0, y, "COMPRA"),
        frag(30.0, y + 0.8, "PROPIETAT"),
        frag(30.0, y + 1.6, "PATRIMONIAL"),
        frag(30.0, y + 2.4, "ÚS COMÚ GENERAL"),
        frag(38.0, y, "1.234,56"),
    ]
}

// ---------------------------------------------------------------------------
// Worked example: anchor, enumerated status and a date
// ---------------------------------------------------------------------------
#[test]
fn worked_example_row() {
    let fragments = vec![
        frag(3.0, 10.0, "120103"),
        frag(30.0, 10.5, "PROPIETAT"),
        frag(9.0, 11.0, "15/03/2020"),
    ];
    let table = parser(DocumentFamily::RelacioBens).parse_table(&fragments, 1);

    assert_eq!(table.rows.len(), 1);
    let row = &table.rows[0];
    assert_eq!(row.get(relacio_bens::CLASSIFICACIO), Some("120103"));
    assert_eq!(row.get(relacio_bens::S_PATRIMONIAL), Some("PROPIETAT"));
    assert_eq!(row.get(relacio_bens::D_ALTA), Some("15/03/2020"));

    let set: Vec<&str> = row
        .fields()
        .filter(|(_, v)| *v != MISSING)
        .map(|(k, _)| k)
        .collect();
    assert_eq!(
        set,
        vec![
            relacio_bens::CLASSIFICACIO,
            relacio_bens::D_ALTA,
            relacio_bens::S_PATRIMONIAL
        ]
    );
}

// ---------------------------------------------------------------------------
// No anchors: empty, schema-complete table
// ---------------------------------------------------------------------------
#[test]
fn no_anchors_yields_empty_table() {
    for family in DocumentFamily::ALL {
        let fragments = vec![frag(20.0, 5.0, "INVENTARI DE BÉNS"), frag(40.0, 5.0, "Pàg. 1")];
        let parsed = parser(family).parse_table_with_diagnostics(&fragments, 1);
        assert!(parsed.table.rows.is_empty());
        assert_eq!(parsed.table.metadata.total_rows, 0);
        assert_eq!(parsed.table.headers.len(), parsed.table.metadata.total_columns);
        assert_eq!(parsed.diagnostics.dropped_fragments.len(), 2);
    }
}

// ---------------------------------------------------------------------------
// Every row has exactly the header keys, in header order
// ---------------------------------------------------------------------------
#[test]
fn rows_are_schema_complete() {
    let mut fragments = bens_row("120103", 10.0, "ESCOLA BRESSOL");
    fragments.extend(bens_row("120104", 20.0, "PAVELLÓ"));
    fragments.push(frag(60.0, 21.0, "SOROLL"));
    let table = parser(DocumentFamily::RelacioBens).parse_table(&fragments, 1);

    assert_eq!(table.rows.len(), 2);
    assert_eq!(table.rows.len(), table.metadata.total_rows);
    for row in &table.rows {
        let keys: Vec<&str> = row.keys().collect();
        assert_eq!(keys, table.headers);
    }

    let first = &table.rows[0];
    assert_eq!(first.get(relacio_bens::N_BE), Some("12"));
    assert_eq!(first.get(relacio_bens::QUANT), Some("1"));
    assert_eq!(first.get(relacio_bens::DESCRIPCIO), Some("ESCOLA BRESSOL"));
    assert_eq!(first.get(relacio_bens::T_ADQUISICIO), Some("COMPRA"));
    assert_eq!(first.get(relacio_bens::NATURALESA), Some("PATRIMONIAL"));
    assert_eq!(first.get(relacio_bens::US), Some("ÚS COMÚ GENERAL"));
    assert_eq!(first.get(relacio_bens::VBC), Some("1.234,56"));
    assert_eq!(first.identity(), "120103-15/03/2020-12");
}

// ---------------------------------------------------------------------------
// Parsing is a pure function of its input
// ---------------------------------------------------------------------------
#[test]
fn parsing_is_idempotent() {
    let fragments = bens_row("120103", 10.0, "ESCOLA");
    let p = parser(DocumentFamily::RelacioBens);
    let a = p.parse_table_with_diagnostics(&fragments, 2);
    let b = p.parse_table_with_diagnostics(&fragments, 2);
    assert_eq!(a, b);
}

// ---------------------------------------------------------------------------
// Totals lines are excluded and reported
// ---------------------------------------------------------------------------
#[test]
fn totals_row_is_excluded() {
    let fragments = vec![frag(3.0, 10.0, "120103"), frag(15.0, 10.5, "TOTAL GENERAL:")];
    let parsed = parser(DocumentFamily::RelacioBens).parse_table_with_diagnostics(&fragments, 1);

    assert!(parsed.table.rows.is_empty());
    assert_eq!(parsed.diagnostics.excluded_rows.len(), 1);
    assert_eq!(
        parsed.diagnostics.excluded_rows[0].reason,
        ExclusionReason::TotalsKeyword {
            field: relacio_bens::DESCRIPCIO.to_string()
        }
    );
}

#[test]
fn plural_subtotals_row_is_excluded() {
    let fragments = vec![frag(3.0, 10.0, "120103"), frag(15.0, 10.5, "SUBTOTALS:")];
    let parsed = parser(DocumentFamily::RelacioBens).parse_table_with_diagnostics(&fragments, 1);

    assert!(parsed.table.rows.is_empty());
    assert_eq!(parsed.diagnostics.excluded_rows.len(), 1);
}

// ---------------------------------------------------------------------------
// Headers above the first row and footers below the last stay out of rows
// ---------------------------------------------------------------------------
#[test]
fn column_header_above_first_row_is_not_absorbed() {
    let fragments = vec![
        frag(15.0, 8.2, "DESCRIPCIÓ"),
        frag(3.0, 10.0, "120103"),
        frag(15.0, 10.5, "ESCOLA"),
    ];
    let parsed = parser(DocumentFamily::RelacioBens).parse_table_with_diagnostics(&fragments, 1);

    assert_eq!(parsed.table.rows.len(), 1);
    assert_eq!(
        parsed.table.rows[0].get(relacio_bens::DESCRIPCIO),
        Some("ESCOLA")
    );
    assert_eq!(parsed.diagnostics.dropped_fragments.len(), 1);
}

#[test]
fn page_footer_total_does_not_drop_last_row() {
    let fragments = vec![
        frag(3.0, 10.0, "120103"),
        frag(15.0, 10.5, "ESCOLA"),
        frag(15.0, 15.5, "TOTAL PÀGINA"),
    ];
    let parsed = parser(DocumentFamily::RelacioBens).parse_table_with_diagnostics(&fragments, 1);

    assert_eq!(parsed.table.rows.len(), 1);
    assert_eq!(
        parsed.table.rows[0].get(relacio_bens::DESCRIPCIO),
        Some("ESCOLA")
    );
    assert!(parsed.diagnostics.excluded_rows.is_empty());
    assert_eq!(parsed.diagnostics.dropped_fragments.len(), 1);
}

// ---------------------------------------------------------------------------
// Duplicate anchor a hair apart is one row
// ---------------------------------------------------------------------------
#[test]
fn near_duplicate_anchors_make_one_row() {
    let fragments = vec![frag(3.0, 10.0, "120103"), frag(3.0, 10.05, "120103")];
    let parsed = parser(DocumentFamily::RelacioBens).parse_table_with_diagnostics(&fragments, 1);
    assert_eq!(parsed.table.rows.len(), 1);
    assert_eq!(parsed.diagnostics.merged_anchors, 1);
}

// ---------------------------------------------------------------------------
// Page-concatenation family keeps page order
// ---------------------------------------------------------------------------
#[test]
fn relacio_bens_document_keeps_page_order() {
    let source = MockSource {
        pages: vec![
            page(1, None, bens_row("230100", 10.0, "VEHICLE")),
            page(2, None, bens_row("120103", 10.0, "ESCOLA")),
        ],
    };
    let parsed = parse_pdf(&[], &source, &parser(DocumentFamily::RelacioBens), None).unwrap();
    let table = parsed.table;

    let codes: Vec<&str> = table
        .rows
        .iter()
        .filter_map(|r| r.get(relacio_bens::CLASSIFICACIO))
        .collect();
    assert_eq!(codes, vec!["230100", "120103"]);
    assert_eq!(table.metadata.source_page_count, 2);
    assert_eq!(table.metadata.source_page_number, None);
    assert_eq!(table.column_total(relacio_bens::VBC), dec!(2469.12));
}

#[test]
fn combine_concatenates_in_input_order() {
    let p = parser(DocumentFamily::RelacioBens);
    let a = p.parse_table(&bens_row("230100", 10.0, "VEHICLE"), 1);
    let b = p.parse_table(&bens_row("120103", 10.0, "ESCOLA"), 2);
    let expected: Vec<_> = a.rows.iter().chain(&b.rows).cloned().collect();
    let combined = p.combine_tables(vec![a, b]);
    assert_eq!(combined.rows, expected);
}

// ---------------------------------------------------------------------------
// Llibre A: pooled pages, rows across page breaks, id order
// ---------------------------------------------------------------------------
fn llibre_row(id: &str, y: f64, description: &str) -> Vec<TextFragment> {
    vec![
        frag(1.0, y, id),
        frag(2.0, y, "120103"),
        frag(3.5, y, "7"),
        frag(5.0, y, "1"),
        frag(5.0, y + 1.0, description),
        frag(10.0, y, "COMPRA"),
        frag(12.0, y, "12.345,67"),
        frag(12.0, y + 1.0, "15/03/2020"),
    ]
}

#[test]
fn llibre_a_row_fields() {
    let table = parser(DocumentFamily::LlibreA).parse_table(&llibre_row("41", 10.0, "ESCOLA"), 1);
    assert_eq!(table.rows.len(), 1);
    let row = &table.rows[0];
    assert_eq!(row.get(llibre_a::ID), Some("41"));
    assert_eq!(row.get(llibre_a::CLASSIFICACIO), Some("120103"));
    assert_eq!(row.get(llibre_a::N_BE), Some("7"));
    assert_eq!(row.get(llibre_a::QUANT), Some("1"));
    assert_eq!(row.get(llibre_a::DESCRIPCIO), Some("ESCOLA"));
    assert_eq!(row.get(llibre_a::T_ADQUISICIO), Some("COMPRA"));
    assert_eq!(row.get(llibre_a::COST_ADQUI), Some("12.345,67"));
    assert_eq!(row.get(llibre_a::D_ALTA), Some("15/03/2020"));
    assert_eq!(row.get(llibre_a::CENTRE), Some(MISSING));
    assert_eq!(row.identity(), "41-15/03/2020-7");
}

#[test]
fn llibre_a_document_is_pooled_and_sorted() {
    // Row 12 starts at the foot of page 1 and its description continues
    // on page 2, above row 11.
    let mut first = llibre_row("10", 10.0, "ESCOLA");
    first.push(frag(1.0, 47.0, "12"));
    let mut second = vec![frag(5.0, 0.5, "MAGATZEM")];
    second.extend(llibre_row("11", 5.0, "PAVELLÓ"));

    let source = MockSource {
        pages: vec![page(1, Some(48.0), first), page(2, Some(48.0), second)],
    };
    let parsed = parse_pdf(&[], &source, &parser(DocumentFamily::LlibreA), None).unwrap();
    let table = parsed.table;

    let ids: Vec<&str> = table.rows.iter().filter_map(|r| r.get(llibre_a::ID)).collect();
    assert_eq!(ids, vec!["10", "11", "12"]);
    assert_eq!(table.rows[2].get(llibre_a::DESCRIPCIO), Some("MAGATZEM"));
    assert_eq!(table.metadata.source_page_count, 2);
    assert_eq!(table.column_total(llibre_a::COST_ADQUI), dec!(24691.34));
}

#[test]
fn llibre_a_combine_sorts_by_id() {
    let p = parser(DocumentFamily::LlibreA);
    let late = p.parse_table(&llibre_row("30", 10.0, "B"), 2);
    let early = p.parse_table(&llibre_row("4", 10.0, "A"), 1);
    let combined = p.combine_tables(vec![late, early]);
    let ids: Vec<&str> = combined
        .rows
        .iter()
        .filter_map(|r| r.get(llibre_a::ID))
        .collect();
    assert_eq!(ids, vec!["4", "30"]);
}

// ---------------------------------------------------------------------------
// Entry point errors and options
// ---------------------------------------------------------------------------
#[test]
fn page_filter_selects_one_page() {
    let source = MockSource {
        pages: vec![
            page(1, None, bens_row("230100", 10.0, "VEHICLE")),
            page(2, None, bens_row("120103", 10.0, "ESCOLA")),
        ],
    };
    let p = parser(DocumentFamily::RelacioBens);
    let parsed = parse_pdf(&[], &source, &p, Some(2)).unwrap();
    assert_eq!(parsed.table.rows.len(), 1);
    assert_eq!(parsed.table.metadata.source_page_count, 1);

    let err = parse_pdf(&[], &source, &p, Some(5)).unwrap_err();
    assert!(matches!(err, InventariError::PageNotFound { page: 5, total: 2 }));
}

#[test]
fn no_pages_is_an_extraction_error() {
    let source = MockSource { pages: vec![] };
    let err = parse_pdf(&[], &source, &parser(DocumentFamily::LlibreA), None).unwrap_err();
    assert!(matches!(err, InventariError::Extraction(_)));
}

#[test]
fn custom_tuning_changes_row_windows() {
    // With a short span the description line falls outside the row.
    let tuning =
        parse_tuning_str(r#"{"defaultSpan": 0.5, "epsilon": 0.1, "tolerance": 0.2}"#).unwrap();
    let p = TableParser::with_tuning(DocumentFamily::RelacioBens, tuning);
    let fragments = vec![frag(3.0, 10.0, "120103"), frag(15.0, 13.0, "ESCOLA")];
    let parsed = p.parse_table_with_diagnostics(&fragments, 1);
    assert_eq!(
        parsed.table.rows[0].get(relacio_bens::DESCRIPCIO),
        Some(MISSING)
    );
    assert_eq!(parsed.diagnostics.dropped_fragments.len(), 1);
}
