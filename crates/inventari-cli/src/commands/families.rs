use inventari_core::error::InventariError;
use inventari_core::schema::tuning::{load_tuning, Tuning};
use inventari_core::schema::{ColumnKind, CombinePolicy, DocumentFamily};
use std::path::Path;

pub fn list() -> Result<(), InventariError> {
    println!("Available document families:\n");
    for family in DocumentFamily::ALL {
        let profile = family.profile();
        println!("  {:<14} {}", family.name(), profile.description);
        println!(
            "  {:<14} {} columns, {} bands",
            "",
            profile.headers.len(),
            profile.columns.len()
        );
        println!();
    }
    println!("Routing: collbato, santboi, premia with report 'bens' -> relacio-bens, 'a' -> llibre-a");
    Ok(())
}

pub fn explain(name: &str) -> Result<(), InventariError> {
    let family: DocumentFamily = name.parse()?;
    let profile = family.profile();

    println!("{} ({})\n", profile.description, family);

    let band = match profile.anchor.x_band {
        Some(range) => format!(" with x in [{}, {}]", range.min, range.max),
        None => String::new(),
    };
    println!(
        "Rows start at every fragment shaped as {}{}.",
        profile.anchor.shape, band
    );
    println!(
        "The anchor text is stored in '{}'.\n",
        profile.identity_field
    );

    println!("Column bands (checked in this order):\n");
    for column in &profile.columns {
        println!(
            "  {:<32} x {:>5.1} .. {:<5.1}",
            column.name, column.x_range.min, column.x_range.max
        );
        match &column.kind {
            ColumnKind::Single { field, shape } => {
                println!("      {field}: topmost fragment, must be {shape}");
            }
            ColumnKind::Stacked { slots, absorb_last } => {
                for (i, slot) in slots.iter().enumerate() {
                    let shape = slot
                        .shape
                        .map(|s| s.to_string())
                        .unwrap_or_else(|| "any".into());
                    let absorbs = if *absorb_last && i + 1 == slots.len() {
                        ", collects remaining lines"
                    } else {
                        ""
                    };
                    println!("      {}. {}: {}{}", i + 1, slot.field, shape, absorbs);
                }
            }
            ColumnKind::Enumerated { choices, keywords } => {
                for choice in choices {
                    println!(
                        "      {}: {} ({} values, {:?} match)",
                        choice.field,
                        choice.vocabulary.name,
                        choice.vocabulary.values.len(),
                        choice.mode
                    );
                }
                for rule in keywords {
                    println!("      keyword '{}' -> {}", rule.keyword, rule.field);
                }
            }
            ColumnKind::FreeText { field } => {
                println!("      {field}: all fragments joined");
            }
        }
    }

    println!();
    println!(
        "Rows whose {} contain {} are totals and are dropped.",
        profile.totals.fields.join(", "),
        profile.totals.keywords.join("/")
    );
    let order = match profile.combine {
        CombinePolicy::Concatenate => "kept in page order",
        CombinePolicy::SortById => "sorted by id",
    };
    let scope = if profile.pooled {
        "as a single document"
    } else {
        "page by page"
    };
    println!("Pages are parsed {scope}; combined rows are {order}.\n");
    Ok(())
}

pub fn tuning(name: &str) -> Result<(), InventariError> {
    let family: DocumentFamily = name.parse()?;
    let tuning = Tuning::builtin(family)?;
    println!("{}", serde_json::to_string_pretty(&tuning)?);
    Ok(())
}

pub fn validate(file: &Path) -> Result<(), InventariError> {
    let tuning = load_tuning(file)?;

    println!("Tuning '{}' is valid.", file.display());
    println!("  defaultSpan:    {}", tuning.default_span);
    println!("  epsilon:        {}", tuning.epsilon);
    println!("  tolerance:      {}", tuning.tolerance);
    println!("  anchorMergeGap: {}", tuning.anchor_merge_gap);

    // Warnings, not errors
    if tuning.tolerance >= tuning.default_span {
        println!("\nWarnings:");
        println!("  - tolerance is not smaller than defaultSpan; fragments may land in a neighbouring row");
    }

    Ok(())
}
