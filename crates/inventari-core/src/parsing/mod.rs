pub mod columns;
pub mod normalize;
pub mod postprocess;
pub mod segment;
pub mod values;

use crate::assembly;
use crate::error::InventariError;
use crate::extraction::{pool_pages, PageFragments};
use crate::model::{
    DropReason, DroppedFragment, ExcludedRow, ParseDiagnostics, ParsedTable, Table, TextFragment,
};
use crate::schema::tuning::Tuning;
use crate::schema::{DocumentFamily, FamilyProfile};
use columns::assign_columns;
use postprocess::{finish_row, Finished};
use segment::segment_rows;

/// Reconstructs tables of one document family.
///
/// Holds no state between calls: every table is built from its input
/// fragments, the family profile and the tuning alone.
#[derive(Debug, Clone)]
pub struct TableParser {
    family: DocumentFamily,
    tuning: Tuning,
}

impl TableParser {
    /// Parser with the family's built-in tuning.
    pub fn new(family: DocumentFamily) -> Result<Self, InventariError> {
        Ok(TableParser {
            family,
            tuning: Tuning::builtin(family)?,
        })
    }

    pub fn with_tuning(family: DocumentFamily, tuning: Tuning) -> Self {
        TableParser { family, tuning }
    }

    pub fn family(&self) -> DocumentFamily {
        self.family
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn profile(&self) -> &'static FamilyProfile {
        self.family.profile()
    }

    /// Rebuild the table printed on one page.
    pub fn parse_table(&self, fragments: &[TextFragment], page_number: usize) -> Table {
        self.parse_table_with_diagnostics(fragments, page_number).table
    }

    /// Like [`parse_table`](Self::parse_table), also reporting what was dropped.
    pub fn parse_table_with_diagnostics(
        &self,
        fragments: &[TextFragment],
        page_number: usize,
    ) -> ParsedTable {
        self.parse_fragments(fragments, Some(page_number), 1)
    }

    /// Rebuild the table of a whole document.
    ///
    /// Families that pool pages segment all fragments as one stream, so a
    /// row may straddle a page break. Others are parsed page by page and
    /// combined.
    pub fn parse_document(&self, pages: &[PageFragments]) -> ParsedTable {
        let profile = self.profile();
        if profile.pooled {
            let pooled = pool_pages(pages);
            tracing::debug!(
                pages = pages.len(),
                fragments = pooled.len(),
                "pooled document fragments"
            );
            let parsed = self.parse_fragments(&pooled, None, pages.len());
            return ParsedTable {
                table: self.combine_tables(vec![parsed.table]),
                diagnostics: parsed.diagnostics,
            };
        }

        let mut diagnostics = ParseDiagnostics::default();
        let mut tables = Vec::with_capacity(pages.len());
        for page in pages {
            let parsed = self.parse_fragments(&page.fragments, Some(page.page_number), 1);
            diagnostics.absorb(parsed.diagnostics);
            tables.push(parsed.table);
        }
        ParsedTable {
            table: self.combine_tables(tables),
            diagnostics,
        }
    }

    /// Combine per-page tables under this family's ordering policy.
    pub fn combine_tables(&self, tables: Vec<Table>) -> Table {
        assembly::combine_tables(self.profile(), tables)
    }

    fn parse_fragments(
        &self,
        fragments: &[TextFragment],
        page_number: Option<usize>,
        page_count: usize,
    ) -> ParsedTable {
        let profile = self.profile();
        let segmentation = segment_rows(fragments, &profile.anchor, &self.tuning);

        let mut diagnostics = ParseDiagnostics {
            anchors_found: segmentation.rows.len(),
            merged_anchors: segmentation.merged_anchors,
            ..Default::default()
        };
        let dropped = |fragment: &TextFragment, reason: DropReason| DroppedFragment {
            page_number,
            text: fragment.text.clone(),
            x: fragment.x,
            y: fragment.y,
            reason,
        };

        diagnostics.dropped_fragments.extend(
            segmentation
                .unassigned
                .iter()
                .map(|f| dropped(*f, DropReason::OutsideRows)),
        );

        let mut rows = Vec::with_capacity(segmentation.rows.len());
        for group in &segmentation.rows {
            let assignment = assign_columns(group.anchor, &group.members, &profile.columns);
            diagnostics.dropped_fragments.extend(
                assignment
                    .unplaced
                    .iter()
                    .map(|u| dropped(u.fragment, u.reason)),
            );

            match finish_row(assignment.row, group.anchor.trimmed(), profile) {
                Finished::Data(row) => {
                    tracing::debug!(identity = row.identity(), "row reconstructed");
                    rows.push(row);
                }
                Finished::Excluded(row, reason) => {
                    tracing::warn!(identity = row.identity(), %reason, "row excluded");
                    diagnostics.excluded_rows.push(ExcludedRow {
                        identity: row.identity().to_string(),
                        reason,
                    });
                }
            }
        }

        tracing::info!(
            family = %self.family,
            page = ?page_number,
            anchors = diagnostics.anchors_found,
            rows = rows.len(),
            dropped = diagnostics.dropped_fragments.len(),
            "table parsed"
        );

        ParsedTable {
            table: assembly::build_table(profile, rows, page_number, page_count),
            diagnostics,
        }
    }
}
