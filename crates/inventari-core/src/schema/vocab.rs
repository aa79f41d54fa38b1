//! Closed vocabularies for the enumerated inventory fields.
//!
//! Used both to recognise which field a fragment belongs to and to
//! reassemble values the PDF split across several fragments.

use crate::parsing::normalize::collapse_whitespace;

/// Shortest partial value that may be completed to a canonical one.
const MIN_COMPLETION_LEN: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// Fragment text equals a canonical value.
    Exact,
    /// Fragment text contains a canonical value.
    Contains,
}

#[derive(Debug)]
pub struct Vocabulary {
    pub name: &'static str,
    pub values: &'static [&'static str],
}

impl Vocabulary {
    /// First canonical value (in vocabulary order) that `text` matches.
    pub fn find(&self, text: &str, mode: MatchMode) -> Option<&'static str> {
        let text = text.trim();
        self.values.iter().copied().find(|canonical| match mode {
            MatchMode::Exact => text == *canonical,
            MatchMode::Contains => text.contains(canonical),
        })
    }

    pub fn contains(&self, text: &str) -> bool {
        self.find(text, MatchMode::Exact).is_some()
    }

    /// Complete a truncated value to the only canonical value it prefixes.
    pub fn complete(&self, partial: &str) -> Option<&'static str> {
        let partial = collapse_whitespace(partial);
        if partial.chars().count() < MIN_COMPLETION_LEN {
            return None;
        }
        let mut candidates = self
            .values
            .iter()
            .copied()
            .filter(|v| v.starts_with(partial.as_str()));
        match (candidates.next(), candidates.next()) {
            (Some(only), None) => Some(only),
            _ => None,
        }
    }
}

pub static ACQUISITION_TYPES: Vocabulary = Vocabulary {
    name: "acquisition type",
    values: &[
        "COMPRA",
        "CESSIÓ GRATUÏTA DE LA PROPIETAT O DONACIÓ",
        "CESSIÓ URBANÍSTICA OBLIGATÒRIA",
        "ALTA PER OBRA EN CURS",
        "TREBALLS FETS AMB MITJANS PROPIS",
        "CESSIÓ D'ÚS TEMPORAL",
        "ADSCRIPCIÓ I ALTRES APORTACIONS DE BÉNS I DRETS DE L'ENTITAT PROPIETÀRIA",
        "INSPECCIÓ FÍSICA O INVENTARI",
        "EXPROPIACIÓ",
        "ADJUDICACIÓ EN PAGAMENT DE DEUTES O EMBARGAMENT",
        "ADJUDICACIÓ EN PAGAMENT DE DEUTES O EMBARGAMENT EXERCICI TANCAT",
        "ARRENDAMENT",
        "ALTA PER ARRENDAMENT FINANCER (LÍSING I ALTRES)",
        "COMPRA AMB PAGAMENT FRACCIONAT",
        "ALTA PER LÍSING AL VENEDOR (LEASE - BACK)",
        "ALTA PER MODIFICACIONS DE TANCAMENT",
    ],
};

pub static PATRIMONIAL_STATUS: Vocabulary = Vocabulary {
    name: "patrimonial status",
    values: &[
        "PROPIETAT",
        "CEDIT A FAVOR",
        "CEDIT EN CONTRA",
        "ADSCRIT A FAVOR",
        "ADSCRIT EN CONTRA",
        "ARRENDAT A FAVOR",
        "CONCESSIÓ EN CONTRA",
        "RETIRADA PERMANENT DE L'ÚS",
    ],
};

pub static LEGAL_NATURE: Vocabulary = Vocabulary {
    name: "legal nature",
    values: &[
        "PATRIMONIAL",
        "DOMINI PÚBLIC - ÚS PÚBLIC",
        "DOMINI PÚBLIC - SERVEI PÚBLIC",
        "COMUNAL",
        "PATRIMONI PÚBLIC DEL SÒL",
    ],
};

pub static USAGE_TYPES: Vocabulary = Vocabulary {
    name: "usage type",
    values: &["ÚS COMÚ GENERAL", "ÚS COMÚ ESPECIAL", "ÚS PRIVATIU"],
};

/// Words that mark an aggregate line rather than an asset.
pub static TOTALS_KEYWORDS: &[&str] = &[
    "total",
    "totals",
    "totales",
    "subtotal",
    "subtotals",
    "subtotales",
    "suma",
    "sumes",
    "sumas",
];
