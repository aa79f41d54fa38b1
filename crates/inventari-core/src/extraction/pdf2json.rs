use serde::Deserialize;

use crate::error::InventariError;
use crate::extraction::{FragmentSource, PageFragments};
use crate::model::TextFragment;

/// Fragment source reading JSON dumps instead of PDFs.
///
/// Accepts the raw pdf2json layout (`Pages[].Texts[]`, text percent-encoded
/// in `R[0].T`) and the already-decoded layout
/// (`pages[].textElements[]`, one [`TextFragment`] per element).
pub struct Pdf2JsonSource;

impl Pdf2JsonSource {
    pub fn new() -> Self {
        Pdf2JsonSource
    }
}

impl Default for Pdf2JsonSource {
    fn default() -> Self {
        Self::new()
    }
}

impl FragmentSource for Pdf2JsonSource {
    fn extract_pages(&self, bytes: &[u8]) -> Result<Vec<PageFragments>, InventariError> {
        let dump: Dump =
            serde_json::from_slice(bytes).map_err(|e| InventariError::FragmentDump(e.to_string()))?;
        Ok(dump.into_pages())
    }

    fn backend_name(&self) -> &str {
        "pdf2json"
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Dump {
    Raw {
        #[serde(rename = "Pages")]
        pages: Vec<RawPage>,
    },
    Extracted {
        pages: Vec<ExtractedPage>,
    },
}

#[derive(Debug, Deserialize)]
struct RawPage {
    #[serde(rename = "Height", default)]
    height: Option<f64>,
    #[serde(rename = "Texts", default)]
    texts: Vec<RawText>,
}

#[derive(Debug, Deserialize)]
struct RawText {
    x: f64,
    y: f64,
    #[serde(default)]
    w: f64,
    #[serde(rename = "R", default)]
    runs: Vec<RawRun>,
}

#[derive(Debug, Deserialize)]
struct RawRun {
    #[serde(rename = "T", default)]
    text: String,
    /// [font face, size, bold, italic]
    #[serde(rename = "TS", default)]
    style: Vec<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExtractedPage {
    #[serde(default)]
    page_number: Option<usize>,
    #[serde(default)]
    height: Option<f64>,
    #[serde(default)]
    text_elements: Vec<TextFragment>,
}

impl Dump {
    fn into_pages(self) -> Vec<PageFragments> {
        match self {
            Dump::Raw { pages } => pages
                .into_iter()
                .enumerate()
                .map(|(i, page)| PageFragments {
                    page_number: i + 1,
                    height: page.height,
                    fragments: page.texts.into_iter().map(RawText::into_fragment).collect(),
                })
                .collect(),
            Dump::Extracted { pages } => pages
                .into_iter()
                .enumerate()
                .map(|(i, page)| PageFragments {
                    page_number: page.page_number.unwrap_or(i + 1),
                    height: page.height,
                    fragments: page.text_elements,
                })
                .collect(),
        }
    }
}

impl RawText {
    fn into_fragment(self) -> TextFragment {
        let (text, font_face) = match self.runs.into_iter().next() {
            Some(run) => (
                decode_text(&run.text),
                run.style.first().map(|f| *f as i32).unwrap_or(0),
            ),
            None => (String::new(), 0),
        };
        TextFragment {
            x: self.x,
            y: self.y,
            width: self.w,
            height: 0.0,
            text,
            font_face,
        }
    }
}

/// Percent-decode pdf2json text, keeping the raw text if it is not valid
/// percent-encoded UTF-8.
fn decode_text(raw: &str) -> String {
    match urlencoding::decode(raw) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => raw.to_string(),
    }
}
