//! Numeric tuning for row segmentation.
//!
//! Each family ships a built-in tuning; a JSON file with the same shape can
//! replace it for documents whose rows sit tighter or looser than usual.

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::DocumentFamily;
use crate::error::InventariError;

const RELACIO_BENS_JSON: &str = include_str!("../../../../tuning/relacio-bens.json");
const LLIBRE_A_JSON: &str = include_str!("../../../../tuning/llibre-a.json");

fn default_anchor_merge_gap() -> f64 {
    0.25
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Tuning {
    /// Nominal height of a row window below its anchor.
    pub default_span: f64,
    /// Gap kept between a window's end and the next anchor.
    pub epsilon: f64,
    /// Slack added on both sides of a window when collecting fragments.
    pub tolerance: f64,
    /// Anchors with equal text closer than this are one anchor.
    #[serde(default = "default_anchor_merge_gap")]
    pub anchor_merge_gap: f64,
}

impl Tuning {
    /// Tuning shipped with the crate for `family`.
    pub fn builtin(family: DocumentFamily) -> Result<Tuning, InventariError> {
        let json = match family {
            DocumentFamily::RelacioBens => RELACIO_BENS_JSON,
            DocumentFamily::LlibreA => LLIBRE_A_JSON,
        };
        parse_tuning_str(json)
    }
}

/// Load tuning from a JSON file.
pub fn load_tuning(path: &Path) -> Result<Tuning, InventariError> {
    let content = std::fs::read_to_string(path).map_err(|e| InventariError::TuningLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    parse_tuning(&content, path)
}

/// Parse tuning from a JSON string read from `source`.
pub fn parse_tuning(json: &str, source: &Path) -> Result<Tuning, InventariError> {
    let tuning: Tuning = serde_json::from_str(json).map_err(|e| InventariError::TuningLoad {
        path: source.to_path_buf(),
        reason: e.to_string(),
    })?;
    validate_tuning(&tuning)?;
    Ok(tuning)
}

/// Parse tuning from a JSON string (no file path context).
pub fn parse_tuning_str(json: &str) -> Result<Tuning, InventariError> {
    let tuning: Tuning = serde_json::from_str(json)?;
    validate_tuning(&tuning)?;
    Ok(tuning)
}

/// Check that all values are finite and in range.
pub fn validate_tuning(tuning: &Tuning) -> Result<(), InventariError> {
    let values = [
        ("defaultSpan", tuning.default_span),
        ("epsilon", tuning.epsilon),
        ("tolerance", tuning.tolerance),
        ("anchorMergeGap", tuning.anchor_merge_gap),
    ];
    for (name, value) in values {
        if !value.is_finite() || value < 0.0 {
            return Err(InventariError::TuningInvalid(format!(
                "{name} must be a finite non-negative number, got {value}"
            )));
        }
    }

    if tuning.default_span <= 0.0 {
        return Err(InventariError::TuningInvalid(
            "defaultSpan must be greater than zero".into(),
        ));
    }

    if tuning.epsilon >= tuning.default_span {
        return Err(InventariError::TuningInvalid(format!(
            "epsilon ({}) must be smaller than defaultSpan ({})",
            tuning.epsilon, tuning.default_span
        )));
    }

    Ok(())
}
