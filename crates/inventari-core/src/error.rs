use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum InventariError {
    #[error("fragment extraction failed: {0}")]
    Extraction(String),

    #[error("pdftotext not found. Install poppler: brew install poppler (macOS) or apt install poppler-utils (Linux)")]
    PdftotextNotFound,

    #[error("pdftotext failed with exit code {code}: {stderr}")]
    PdftotextFailed { code: i32, stderr: String },

    #[error("invalid fragment dump: {0}")]
    FragmentDump(String),

    #[error("page {page} not found (document has {total} page(s))")]
    PageNotFound { page: usize, total: usize },

    #[error("unknown document family '{0}'. Available: relacio-bens, llibre-a")]
    UnknownFamily(String),

    #[error("no document family for municipality '{municipality}' and report '{report}'")]
    UnroutableReport {
        municipality: String,
        report: String,
    },

    #[error("failed to load tuning from {path}: {reason}")]
    TuningLoad { path: PathBuf, reason: String },

    #[error("invalid tuning: {0}")]
    TuningInvalid(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
