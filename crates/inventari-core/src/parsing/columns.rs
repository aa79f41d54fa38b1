//! Column assignment: map the members of one row onto schema fields.
//!
//! Columns are visited in schema order. Each sees the member fragments in
//! its band that no earlier column has claimed, sorted top to bottom, and
//! claims the ones it can place. Fragments a column leaves alone stay
//! available to later, overlapping bands.

use std::cmp::Ordering;

use crate::model::{DropReason, Row, TextFragment};
use crate::parsing::normalize::contains_keyword;
use crate::schema::shape::Shape;
use crate::schema::{ColumnDefinition, ColumnKind, EnumChoice, KeywordAction, KeywordRule, Slot};

/// A member fragment that ended up in no field.
#[derive(Debug, Clone, Copy)]
pub struct Unplaced<'a> {
    pub fragment: &'a TextFragment,
    pub reason: DropReason,
}

#[derive(Debug, Clone, Default)]
pub struct Assignment<'a> {
    /// Raw, unconformed field values.
    pub row: Row,
    pub unplaced: Vec<Unplaced<'a>>,
}

/// Assign `members` of the row anchored on `anchor` to fields of `columns`.
pub fn assign_columns<'a>(
    anchor: &TextFragment,
    members: &[&'a TextFragment],
    columns: &[ColumnDefinition],
) -> Assignment<'a> {
    let anchor_text = anchor.trimmed();
    let mut row = Row::new();
    // Fragments repeating the anchor text were consumed by segmentation.
    let mut claimed: Vec<bool> = members
        .iter()
        .map(|f| f.trimmed() == anchor_text)
        .collect();

    for column in columns {
        let mut in_band: Vec<usize> = (0..members.len())
            .filter(|&i| !claimed[i] && column.x_range.contains(members[i].x))
            .collect();
        if in_band.is_empty() {
            continue;
        }
        in_band.sort_by(|&a, &b| stack_order(members[a], members[b]));

        let texts: Vec<&str> = in_band.iter().map(|&i| members[i].trimmed()).collect();
        let taken = match &column.kind {
            ColumnKind::Single { field, shape } => assign_single(&mut row, field, *shape, &texts),
            ColumnKind::Stacked { slots, absorb_last } => {
                assign_stacked(&mut row, slots, *absorb_last, &texts)
            }
            ColumnKind::Enumerated { choices, keywords } => {
                assign_enumerated(&mut row, choices, keywords, &texts)
            }
            ColumnKind::FreeText { field } => {
                for text in &texts {
                    row.append(field, text);
                }
                vec![true; texts.len()]
            }
        };

        for (&index, took) in in_band.iter().zip(taken) {
            if took {
                claimed[index] = true;
            }
        }
        tracing::trace!(column = column.name, candidates = texts.len(), "column assigned");
    }

    let unplaced = members
        .iter()
        .zip(&claimed)
        .filter(|(_, claimed)| !**claimed)
        .map(|(&fragment, _)| {
            let in_any_band = columns.iter().any(|c| c.x_range.contains(fragment.x));
            Unplaced {
                fragment,
                reason: if in_any_band {
                    DropReason::Rejected
                } else {
                    DropReason::OutsideColumns
                },
            }
        })
        .collect();

    Assignment { row, unplaced }
}

/// Top to bottom, then left to right.
fn stack_order(a: &TextFragment, b: &TextFragment) -> Ordering {
    a.y.total_cmp(&b.y).then(a.x.total_cmp(&b.x))
}

/// Only the topmost fragment is considered; it must have `shape`.
fn assign_single(row: &mut Row, field: &str, shape: Shape, texts: &[&str]) -> Vec<bool> {
    let mut taken = vec![false; texts.len()];
    if let Some(first) = texts.first() {
        if shape.matches(first) {
            row.set(field, *first);
            taken[0] = true;
        }
    }
    taken
}

/// Walk fragments top to bottom with a cursor over `slots`. Each fragment
/// goes to the first slot at or after the cursor whose shape accepts it,
/// which lets a missing field be skipped without shifting the rest.
fn assign_stacked(row: &mut Row, slots: &[Slot], absorb_last: bool, texts: &[&str]) -> Vec<bool> {
    let mut taken = vec![false; texts.len()];
    let last = slots.len().saturating_sub(1);
    let mut cursor = 0;

    for (i, text) in texts.iter().enumerate() {
        let Some(offset) = slots[cursor.min(slots.len())..]
            .iter()
            .position(|slot| slot.accepts(text))
        else {
            continue;
        };
        let slot = cursor + offset;
        if absorb_last && slot == last {
            row.append(slots[slot].field, text);
            cursor = slot;
        } else {
            row.set(slots[slot].field, *text);
            cursor = slot + 1;
        }
        taken[i] = true;
    }
    taken
}

/// Vocabulary choices first, in order, each filling its field once. Text no
/// vocabulary recognises may still carry a keyword from a value the PDF split.
fn assign_enumerated(
    row: &mut Row,
    choices: &[EnumChoice],
    keywords: &[KeywordRule],
    texts: &[&str],
) -> Vec<bool> {
    texts
        .iter()
        .map(|text| {
            for choice in choices {
                if row.is_set(choice.field) {
                    continue;
                }
                if choice.vocabulary.find(text, choice.mode).is_some() {
                    row.set(choice.field, *text);
                    return true;
                }
            }
            for rule in keywords {
                if !contains_keyword(text, &[rule.keyword]) {
                    continue;
                }
                match rule.action {
                    KeywordAction::Canonical(value) => {
                        if !row.is_set(rule.field) {
                            row.set(rule.field, value);
                        }
                    }
                    KeywordAction::Append => row.append(rule.field, text),
                }
                return true;
            }
            false
        })
        .collect()
}
