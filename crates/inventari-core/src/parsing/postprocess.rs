//! Row post-processing: clean values, repair split enumerations, make the
//! row schema-complete and decide whether it is data at all.

use crate::model::{ExclusionReason, Row, MISSING};
use crate::parsing::normalize::{collapse_whitespace, contains_keyword, contains_word};
use crate::schema::FamilyProfile;

/// Outcome of finishing one row.
#[derive(Debug, Clone, PartialEq)]
pub enum Finished {
    Data(Row),
    Excluded(Row, ExclusionReason),
}

/// Turn a raw assignment into a finished row.
pub fn finish_row(mut row: Row, anchor_text: &str, profile: &FamilyProfile) -> Finished {
    for value in row.values_mut() {
        *value = collapse_whitespace(value);
    }

    for repair in &profile.repairs {
        if let Some(value) = row.get(repair.field) {
            if value != repair.canonical && contains_keyword(value, &[repair.keyword]) {
                row.set(repair.field, repair.canonical);
            }
        }
    }

    for (field, vocabulary) in &profile.completions {
        let completed = row
            .get(field)
            .filter(|v| !vocabulary.contains(v))
            .and_then(|v| vocabulary.complete(v));
        if let Some(canonical) = completed {
            row.set(field, canonical);
        }
    }

    row.conform_to(&profile.headers);
    row.set(profile.identity_field, anchor_text);

    let identity = format!(
        "{}-{}-{}",
        anchor_text,
        row.get(profile.identity.date_field).unwrap_or(MISSING),
        row.get(profile.identity.number_field).unwrap_or(MISSING),
    );
    row.set_identity(identity);

    match exclusion_reason(&row, profile) {
        Some(reason) => Finished::Excluded(row, reason),
        None => Finished::Data(row),
    }
}

fn exclusion_reason(row: &Row, profile: &FamilyProfile) -> Option<ExclusionReason> {
    for field in &profile.totals.fields {
        if let Some(value) = row.get(field) {
            if contains_word(value, profile.totals.keywords) {
                return Some(ExclusionReason::TotalsKeyword {
                    field: field.to_string(),
                });
            }
        }
    }

    let identity = row.get(profile.identity_field).unwrap_or_default();
    if !profile.identity_shape.matches(identity) {
        return Some(ExclusionReason::InvalidIdentity);
    }

    None
}
