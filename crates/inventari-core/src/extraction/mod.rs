pub mod pdf2json;
pub mod pdftotext;

use serde::{Deserialize, Serialize};

use crate::error::InventariError;
use crate::model::TextFragment;

/// Positioned fragments of a single page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageFragments {
    pub page_number: usize,
    /// Page height in fragment units, when the source knows it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    pub fragments: Vec<TextFragment>,
}

impl PageFragments {
    /// Height used to stack this page below the previous one.
    fn extent(&self) -> f64 {
        self.height.unwrap_or_else(|| {
            self.fragments
                .iter()
                .map(TextFragment::bottom)
                .fold(0.0, f64::max)
        })
    }
}

/// Trait for positioned-text extraction backends.
pub trait FragmentSource: Send + Sync {
    /// Extract fragments from document bytes, one entry per page.
    fn extract_pages(&self, bytes: &[u8]) -> Result<Vec<PageFragments>, InventariError>;

    /// Name of this extraction backend (for diagnostics).
    fn backend_name(&self) -> &str;
}

/// Merge pages into one coordinate stream, each page shifted below the
/// previous ones so `y` keeps growing across page breaks.
pub fn pool_pages(pages: &[PageFragments]) -> Vec<TextFragment> {
    let mut offset = 0.0;
    let mut pooled = Vec::with_capacity(pages.iter().map(|p| p.fragments.len()).sum());
    for page in pages {
        pooled.extend(page.fragments.iter().map(|f| TextFragment {
            y: f.y + offset,
            ..f.clone()
        }));
        offset += page.extent();
    }
    pooled
}
