pub mod llibre_a;
pub mod relacio_bens;
pub mod shape;
pub mod tuning;
pub mod vocab;

use crate::error::InventariError;
use crate::model::TextFragment;
use shape::Shape;
use std::fmt;
use std::str::FromStr;
use vocab::{MatchMode, Vocabulary};

/// Horizontal band, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct XRange {
    pub min: f64,
    pub max: f64,
}

impl XRange {
    pub const fn new(min: f64, max: f64) -> Self {
        XRange { min, max }
    }

    pub fn contains(&self, x: f64) -> bool {
        x >= self.min && x <= self.max
    }
}

/// One field of a stacked column, optionally guarded by a shape.
#[derive(Debug, Clone, Copy)]
pub struct Slot {
    pub field: &'static str,
    pub shape: Option<Shape>,
}

impl Slot {
    pub const fn any(field: &'static str) -> Self {
        Slot { field, shape: None }
    }

    pub const fn shaped(field: &'static str, shape: Shape) -> Self {
        Slot {
            field,
            shape: Some(shape),
        }
    }

    pub fn accepts(&self, text: &str) -> bool {
        self.shape.map_or(true, |s| s.matches(text))
    }
}

/// A vocabulary test that claims a fragment for a field.
#[derive(Debug, Clone, Copy)]
pub struct EnumChoice {
    pub field: &'static str,
    pub vocabulary: &'static Vocabulary,
    pub mode: MatchMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeywordAction {
    /// Set the field to this canonical value unless it already holds one.
    Canonical(&'static str),
    /// Concatenate the fragment onto the field.
    Append,
}

/// Catches pieces of an enumerated value the PDF split into several fragments.
#[derive(Debug, Clone, Copy)]
pub struct KeywordRule {
    pub keyword: &'static str,
    pub field: &'static str,
    pub action: KeywordAction,
}

#[derive(Debug, Clone)]
pub enum ColumnKind {
    /// The topmost fragment must have `shape`; everything else is ignored.
    Single { field: &'static str, shape: Shape },
    /// Fields stacked top to bottom. Fragments fill slots in order, skipping
    /// slots whose shape rejects them. With `absorb_last`, the final slot
    /// keeps collecting every remaining fragment.
    Stacked { slots: Vec<Slot>, absorb_last: bool },
    /// Each fragment is tried against `choices` in order, then `keywords`.
    Enumerated {
        choices: Vec<EnumChoice>,
        keywords: Vec<KeywordRule>,
    },
    /// Every fragment in the band, joined with spaces.
    FreeText { field: &'static str },
}

#[derive(Debug, Clone)]
pub struct ColumnDefinition {
    pub name: &'static str,
    pub x_range: XRange,
    pub kind: ColumnKind,
}

impl ColumnDefinition {
    pub fn fields(&self) -> Vec<&'static str> {
        match &self.kind {
            ColumnKind::Single { field, .. } | ColumnKind::FreeText { field } => vec![*field],
            ColumnKind::Stacked { slots, .. } => slots.iter().map(|s| s.field).collect(),
            ColumnKind::Enumerated { choices, .. } => {
                let mut fields: Vec<&'static str> = Vec::new();
                for choice in choices {
                    if !fields.contains(&choice.field) {
                        fields.push(choice.field);
                    }
                }
                fields
            }
        }
    }
}

/// How row anchors are recognised.
#[derive(Debug, Clone, Copy)]
pub struct AnchorRule {
    pub shape: Shape,
    /// Restricts anchors to a band so unrelated numbers elsewhere are ignored.
    pub x_band: Option<XRange>,
}

impl AnchorRule {
    pub fn matches(&self, fragment: &TextFragment) -> bool {
        self.shape.matches(fragment.trimmed())
            && self.x_band.map_or(true, |band| band.contains(fragment.x))
    }
}

/// If `field` contains `keyword`, replace it with `canonical`.
#[derive(Debug, Clone, Copy)]
pub struct RepairRule {
    pub field: &'static str,
    pub keyword: &'static str,
    pub canonical: &'static str,
}

#[derive(Debug, Clone)]
pub struct TotalsRule {
    pub fields: Vec<&'static str>,
    pub keywords: &'static [&'static str],
}

/// Fields joined into a row's composite identity.
#[derive(Debug, Clone, Copy)]
pub struct IdentityRecipe {
    pub date_field: &'static str,
    pub number_field: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombinePolicy {
    /// Keep page order.
    Concatenate,
    /// Re-sort ascending by the numeric identity field.
    SortById,
}

/// Everything that distinguishes one document layout from another.
#[derive(Debug)]
pub struct FamilyProfile {
    pub family: DocumentFamily,
    pub description: &'static str,
    /// Schema field order, as emitted in table headers.
    pub headers: Vec<&'static str>,
    /// Field that always carries the anchor's own text.
    pub identity_field: &'static str,
    pub identity_shape: Shape,
    pub anchor: AnchorRule,
    /// Evaluated in order; order breaks ties between overlapping bands.
    pub columns: Vec<ColumnDefinition>,
    pub repairs: Vec<RepairRule>,
    /// Enumerated fields whose truncated values may be completed.
    pub completions: Vec<(&'static str, &'static Vocabulary)>,
    pub totals: TotalsRule,
    pub identity: IdentityRecipe,
    pub combine: CombinePolicy,
    /// Merge all pages into one fragment pool before segmenting.
    pub pooled: bool,
    /// Monetary fields, summed in reports.
    pub amount_fields: Vec<&'static str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentFamily {
    /// "Relació de béns": rows anchored on 6-digit classification codes,
    /// parsed page by page.
    RelacioBens,
    /// "Llibre A": rows anchored on a globally incrementing inventory id,
    /// parsed as one document.
    LlibreA,
}

impl DocumentFamily {
    pub const ALL: [DocumentFamily; 2] = [DocumentFamily::RelacioBens, DocumentFamily::LlibreA];

    pub fn name(&self) -> &'static str {
        match self {
            DocumentFamily::RelacioBens => "relacio-bens",
            DocumentFamily::LlibreA => "llibre-a",
        }
    }

    pub fn profile(&self) -> &'static FamilyProfile {
        match self {
            DocumentFamily::RelacioBens => &relacio_bens::PROFILE,
            DocumentFamily::LlibreA => &llibre_a::PROFILE,
        }
    }

    /// Route a (municipality, report type) pair to its layout.
    pub fn for_report(municipality: &str, report: &str) -> Result<Self, InventariError> {
        let m = municipality.trim().to_lowercase();
        let r = report.trim().to_lowercase();
        let known_municipality = matches!(m.as_str(), "collbato" | "santboi" | "premia");
        match (known_municipality, r.as_str()) {
            (true, "bens") => Ok(DocumentFamily::RelacioBens),
            (true, "a") => Ok(DocumentFamily::LlibreA),
            _ => Err(InventariError::UnroutableReport {
                municipality: municipality.to_string(),
                report: report.to_string(),
            }),
        }
    }
}

impl FromStr for DocumentFamily {
    type Err = InventariError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "relacio-bens" | "bens" | "sant-boi" => Ok(DocumentFamily::RelacioBens),
            "llibre-a" | "a" | "premia" => Ok(DocumentFamily::LlibreA),
            _ => Err(InventariError::UnknownFamily(s.to_string())),
        }
    }
}

impl fmt::Display for DocumentFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_family_from_str_aliases() {
        assert_eq!(
            "relacio-bens".parse::<DocumentFamily>().unwrap(),
            DocumentFamily::RelacioBens
        );
        assert_eq!(
            "Sant-Boi".parse::<DocumentFamily>().unwrap(),
            DocumentFamily::RelacioBens
        );
        assert_eq!(
            "premia".parse::<DocumentFamily>().unwrap(),
            DocumentFamily::LlibreA
        );
        assert!("xyz".parse::<DocumentFamily>().is_err());
    }

    #[test]
    fn test_for_report_routing() {
        assert_eq!(
            DocumentFamily::for_report("santboi", "bens").unwrap(),
            DocumentFamily::RelacioBens
        );
        assert_eq!(
            DocumentFamily::for_report("Premia", "A").unwrap(),
            DocumentFamily::LlibreA
        );
        assert!(DocumentFamily::for_report("girona", "a").is_err());
        assert!(DocumentFamily::for_report("premia", "c").is_err());
    }

    #[test]
    fn test_headers_cover_every_column_field() {
        for family in DocumentFamily::ALL {
            let profile = family.profile();
            assert!(profile.headers.contains(&profile.identity_field));
            for column in &profile.columns {
                for field in column.fields() {
                    assert!(
                        profile.headers.contains(&field),
                        "{}: column {} field {} missing from headers",
                        family,
                        column.name,
                        field
                    );
                }
            }
        }
    }

    #[test]
    fn test_headers_are_unique() {
        for family in DocumentFamily::ALL {
            let headers = &family.profile().headers;
            for (i, h) in headers.iter().enumerate() {
                assert!(!headers[i + 1..].contains(h), "{family}: duplicate {h}");
            }
        }
    }

    #[test]
    fn test_anchor_band_restricts_position() {
        let rule = AnchorRule {
            shape: Shape::Integer,
            x_band: Some(XRange::new(0.0, 1.5)),
        };
        assert!(rule.matches(&TextFragment::new(1.0, 5.0, "12")));
        assert!(!rule.matches(&TextFragment::new(2.0, 5.0, "12")));
        assert!(!rule.matches(&TextFragment::new(1.0, 5.0, "A12")));
    }
}
