use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::io::Write;
use std::process::Command;

use crate::error::InventariError;
use crate::extraction::{FragmentSource, PageFragments};
use crate::model::TextFragment;

/// PDF points per fragment unit.
const POINTS_PER_UNIT: f64 = 16.0;

/// Words closer than this fraction of their height are one phrase.
const PHRASE_GAP_RATIO: f64 = 0.5;

/// Fragment source using pdftotext (from poppler-utils).
///
/// Runs `pdftotext -bbox-layout` and turns each run of closely spaced words
/// on a line into one fragment, with coordinates scaled from points into
/// fragment units.
pub struct PdftotextSource;

impl PdftotextSource {
    pub fn new() -> Self {
        PdftotextSource
    }
}

impl Default for PdftotextSource {
    fn default() -> Self {
        Self::new()
    }
}

impl FragmentSource for PdftotextSource {
    fn extract_pages(&self, pdf_bytes: &[u8]) -> Result<Vec<PageFragments>, InventariError> {
        let mut tmpfile = tempfile::NamedTempFile::new()
            .map_err(|e| InventariError::Extraction(e.to_string()))?;
        tmpfile
            .write_all(pdf_bytes)
            .map_err(|e| InventariError::Extraction(e.to_string()))?;

        let output = Command::new("pdftotext")
            .arg("-bbox-layout")
            .arg(tmpfile.path())
            .arg("-")
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    InventariError::PdftotextNotFound
                } else {
                    InventariError::Extraction(format!("pdftotext failed: {}", e))
                }
            })?;

        if !output.status.success() {
            let code = output.status.code().unwrap_or(-1);
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            return Err(InventariError::PdftotextFailed { code, stderr });
        }

        let xml = String::from_utf8_lossy(&output.stdout);
        parse_bbox_xml(&xml)
    }

    fn backend_name(&self) -> &str {
        "pdftotext"
    }
}

#[derive(Debug, Clone)]
struct Word {
    x_min: f64,
    y_min: f64,
    x_max: f64,
    y_max: f64,
    text: String,
}

impl Word {
    fn joins(&self, next: &Word) -> bool {
        let height = (self.y_max - self.y_min).max(next.y_max - next.y_min);
        next.x_min - self.x_max <= height * PHRASE_GAP_RATIO
    }

    fn into_fragment(self) -> TextFragment {
        TextFragment {
            x: self.x_min / POINTS_PER_UNIT,
            y: self.y_min / POINTS_PER_UNIT,
            width: (self.x_max - self.x_min) / POINTS_PER_UNIT,
            height: (self.y_max - self.y_min) / POINTS_PER_UNIT,
            text: self.text,
            font_face: 0,
        }
    }
}

/// Parse `pdftotext -bbox-layout` output into pages of phrase fragments.
fn parse_bbox_xml(xml: &str) -> Result<Vec<PageFragments>, InventariError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut pages: Vec<PageFragments> = Vec::new();
    let mut line: Vec<Word> = Vec::new();
    let mut word: Option<Word> = None;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| InventariError::Extraction(format!("bad pdftotext output: {e}")))?;
        match event {
            Event::Start(e) => match e.name().as_ref() {
                b"page" => pages.push(PageFragments {
                    page_number: pages.len() + 1,
                    height: attr_f64(&e, "height").map(|h| h / POINTS_PER_UNIT),
                    fragments: Vec::new(),
                }),
                b"line" => line.clear(),
                b"word" => {
                    word = Some(Word {
                        x_min: attr_f64(&e, "xMin").unwrap_or_default(),
                        y_min: attr_f64(&e, "yMin").unwrap_or_default(),
                        x_max: attr_f64(&e, "xMax").unwrap_or_default(),
                        y_max: attr_f64(&e, "yMax").unwrap_or_default(),
                        text: String::new(),
                    })
                }
                _ => {}
            },
            Event::Text(t) => {
                if let Some(w) = word.as_mut() {
                    let text = t
                        .unescape()
                        .map_err(|e| InventariError::Extraction(e.to_string()))?;
                    w.text.push_str(&text);
                }
            }
            Event::End(e) => match e.name().as_ref() {
                b"word" => {
                    if let Some(w) = word.take().filter(|w| !w.text.trim().is_empty()) {
                        line.push(w);
                    }
                }
                b"line" => {
                    if let Some(page) = pages.last_mut() {
                        page.fragments.extend(phrases(std::mem::take(&mut line)));
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(pages)
}

/// Merge adjacent words of one line into phrases.
fn phrases(words: Vec<Word>) -> Vec<TextFragment> {
    let mut out: Vec<Word> = Vec::new();
    for word in words {
        match out.last_mut() {
            Some(prev) if prev.joins(&word) => {
                prev.text.push(' ');
                prev.text.push_str(&word.text);
                prev.x_max = word.x_max;
                prev.y_min = prev.y_min.min(word.y_min);
                prev.y_max = prev.y_max.max(word.y_max);
            }
            _ => out.push(word),
        }
    }
    out.into_iter().map(Word::into_fragment).collect()
}

fn attr_f64(tag: &BytesStart<'_>, name: &str) -> Option<f64> {
    tag.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == name.as_bytes())
        .and_then(|a| a.unescape_value().ok()?.parse().ok())
}
