//! Row segmentation: find anchors, give each a vertical window, and hand
//! every other fragment to exactly one window.

use std::cmp::Ordering;

use crate::model::TextFragment;
use crate::schema::tuning::Tuning;
use crate::schema::AnchorRule;

/// An anchor and the fragments that fell into its window.
#[derive(Debug, Clone)]
pub struct RowGroup<'a> {
    pub anchor: &'a TextFragment,
    /// Core window `[start, end]`, before tolerance.
    pub start: f64,
    pub end: f64,
    /// Members in input order.
    pub members: Vec<&'a TextFragment>,
}

impl RowGroup<'_> {
    /// Vertical distance from `y` to the core window, zero inside it.
    fn distance(&self, y: f64) -> f64 {
        if y < self.start {
            self.start - y
        } else if y > self.end {
            y - self.end
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Segmentation<'a> {
    /// Rows in anchor order (top to bottom).
    pub rows: Vec<RowGroup<'a>>,
    /// Duplicate anchors folded into an earlier one.
    pub merged_anchors: usize,
    /// Non-empty fragments outside every window.
    pub unassigned: Vec<&'a TextFragment>,
}

fn by_position(a: &TextFragment, b: &TextFragment) -> Ordering {
    a.y.total_cmp(&b.y).then(a.x.total_cmp(&b.x))
}

/// Split `fragments` into rows.
///
/// Anchors are fragments accepted by `rule`. A second anchor with the same
/// text less than `anchor_merge_gap` below the previous one is the same row
/// printed twice and is absorbed. Windows run from the anchor down by
/// `default_span`, clipped `epsilon` short of the next anchor so they never
/// overlap. A fragment belongs to a row if it lies within `tolerance` of its
/// window; when two windows qualify the nearer one wins, the earlier row on
/// a tie.
pub fn segment_rows<'a>(
    fragments: &'a [TextFragment],
    rule: &AnchorRule,
    tuning: &Tuning,
) -> Segmentation<'a> {
    let mut candidates: Vec<(usize, &TextFragment)> = fragments
        .iter()
        .enumerate()
        .filter(|(_, f)| rule.matches(f))
        .collect();
    candidates.sort_by(|(_, a), (_, b)| by_position(a, b));

    let mut is_anchor = vec![false; fragments.len()];
    let mut anchors: Vec<&TextFragment> = Vec::with_capacity(candidates.len());
    let mut merged_anchors = 0;
    for (index, fragment) in candidates {
        is_anchor[index] = true;
        let duplicate = anchors
            .iter()
            .rev()
            .take_while(|kept| fragment.y - kept.y <= tuning.anchor_merge_gap)
            .any(|kept| kept.trimmed() == fragment.trimmed());
        if duplicate {
            tracing::debug!(anchor = fragment.trimmed(), y = fragment.y, "merged duplicate anchor");
            merged_anchors += 1;
        } else {
            anchors.push(fragment);
        }
    }

    let mut rows: Vec<RowGroup<'a>> = anchors
        .iter()
        .copied()
        .enumerate()
        .map(|(i, anchor)| {
            let start = anchor.y;
            let mut end = start + tuning.default_span;
            if let Some(next) = anchors.get(i + 1) {
                end = end.min(next.y - tuning.epsilon).max(start);
            }
            RowGroup {
                anchor,
                start,
                end,
                members: Vec::new(),
            }
        })
        .collect();

    let mut unassigned = Vec::new();
    for (index, fragment) in fragments.iter().enumerate() {
        if is_anchor[index] || fragment.trimmed().is_empty() {
            continue;
        }
        match nearest_row(&rows, fragment.y, tuning.tolerance) {
            Some(row) => rows[row].members.push(fragment),
            None => unassigned.push(fragment),
        }
    }

    Segmentation {
        rows,
        merged_anchors,
        unassigned,
    }
}

fn nearest_row(rows: &[RowGroup<'_>], y: f64, tolerance: f64) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, row) in rows.iter().enumerate() {
        let distance = row.distance(y);
        if distance > tolerance {
            continue;
        }
        match best {
            Some((_, d)) if d <= distance => {}
            _ => best = Some((i, distance)),
        }
    }
    best.map(|(i, _)| i)
}
