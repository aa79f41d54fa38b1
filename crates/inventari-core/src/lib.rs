pub mod assembly;
pub mod error;
pub mod extraction;
pub mod model;
pub mod parsing;
pub mod schema;

use error::InventariError;
use extraction::FragmentSource;
use model::ParsedTable;
use parsing::TableParser;

/// Main API entry point: rebuild the inventory table of a document.
///
/// Fragments come from `source`; `page` restricts parsing to one page
/// (1-based). Content problems never fail the call, they only show up in
/// the returned diagnostics.
pub fn parse_pdf(
    bytes: &[u8],
    source: &dyn FragmentSource,
    parser: &TableParser,
    page: Option<usize>,
) -> Result<ParsedTable, InventariError> {
    let mut pages = source.extract_pages(bytes)?;
    if pages.is_empty() {
        return Err(InventariError::Extraction(format!(
            "{} returned no pages",
            source.backend_name()
        )));
    }
    tracing::debug!(
        backend = source.backend_name(),
        pages = pages.len(),
        "fragments extracted"
    );

    if let Some(number) = page {
        let total = pages.len();
        pages.retain(|p| p.page_number == number);
        if pages.is_empty() {
            return Err(InventariError::PageNotFound {
                page: number,
                total,
            });
        }
    }

    Ok(parser.parse_document(&pages))
}
