use inventari_core::model::{ParseDiagnostics, Table, MISSING};
use inventari_core::schema::FamilyProfile;

/// Widest a column is allowed to grow before values are cut.
const MAX_WIDTH: usize = 28;

pub fn print(table: &Table, profile: &FamilyProfile) {
    if table.rows.is_empty() {
        println!("No rows found.");
        return;
    }

    // Skip columns no row fills
    let shown: Vec<&str> = table
        .headers
        .iter()
        .map(String::as_str)
        .filter(|h| {
            table
                .rows
                .iter()
                .any(|r| r.get(h).is_some_and(|v| v != MISSING))
        })
        .collect();

    let widths: Vec<usize> = shown
        .iter()
        .map(|h| {
            table
                .rows
                .iter()
                .filter_map(|r| r.get(h))
                .map(|v| v.chars().count())
                .chain(std::iter::once(h.chars().count()))
                .max()
                .unwrap_or(1)
                .min(MAX_WIDTH)
        })
        .collect();

    let header_line: Vec<String> = shown
        .iter()
        .zip(&widths)
        .map(|(h, w)| pad(h, *w))
        .collect();
    println!("{}", header_line.join("  "));
    println!("{}", "-".repeat(widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1)));

    for row in &table.rows {
        let cells: Vec<String> = shown
            .iter()
            .zip(&widths)
            .map(|(h, w)| pad(row.get(h).unwrap_or(MISSING), *w))
            .collect();
        println!("{}", cells.join("  ").trim_end());
    }

    println!();
    println!(
        "{} row(s), {} column(s), {} page(s)",
        table.metadata.total_rows, table.metadata.total_columns, table.metadata.source_page_count
    );
    for field in &profile.amount_fields {
        println!("  Total {:<14} {}", field, table.column_total(field));
    }
}

pub fn print_diagnostics(diagnostics: &ParseDiagnostics) {
    if diagnostics.merged_anchors > 0 {
        eprintln!(
            "  {} duplicate anchor(s) merged",
            diagnostics.merged_anchors
        );
    }
    if !diagnostics.excluded_rows.is_empty() {
        eprintln!("  {} row(s) excluded:", diagnostics.excluded_rows.len());
        for excluded in &diagnostics.excluded_rows {
            eprintln!("    {}: {}", excluded.identity, excluded.reason);
        }
    }
    if !diagnostics.dropped_fragments.is_empty() {
        eprintln!(
            "  {} fragment(s) dropped during parsing",
            diagnostics.dropped_fragments.len()
        );
    }
}

fn pad(value: &str, width: usize) -> String {
    let len = value.chars().count();
    if len > width {
        let cut: String = value.chars().take(width.saturating_sub(1)).collect();
        format!("{cut}~")
    } else {
        format!("{value}{}", " ".repeat(width - len))
    }
}
