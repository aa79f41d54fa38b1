use inventari_core::error::InventariError;
use inventari_core::extraction::pdf2json::Pdf2JsonSource;
use inventari_core::extraction::pdftotext::PdftotextSource;
use inventari_core::extraction::FragmentSource;
use inventari_core::parsing::TableParser;
use inventari_core::schema::tuning::load_tuning;
use inventari_core::schema::DocumentFamily;
use std::path::{Path, PathBuf};

use crate::output;

pub struct ParseArgs {
    pub input_file: PathBuf,
    pub family: Option<String>,
    pub municipality: Option<String>,
    pub report: Option<String>,
    pub page: Option<usize>,
    pub tuning: Option<PathBuf>,
    pub output_format: String,
    pub output_file: Option<PathBuf>,
}

pub fn run(args: ParseArgs) -> Result<(), InventariError> {
    let family = resolve_family(&args)?;
    let parser = match &args.tuning {
        Some(path) => TableParser::with_tuning(family, load_tuning(path)?),
        None => TableParser::new(family)?,
    };

    let bytes = std::fs::read(&args.input_file)?;
    let source = source_for(&args.input_file);
    tracing::info!(
        file = %args.input_file.display(),
        family = %family,
        backend = source.backend_name(),
        "parsing"
    );
    let parsed = inventari_core::parse_pdf(&bytes, source.as_ref(), &parser, args.page)?;

    match args.output_file {
        Some(path) => {
            // Always write JSON when saving to file
            output::json::write(&parsed.table, &path)?;
            eprintln!(
                "Parsed {} row(s) from {} page(s), written to {}",
                parsed.table.metadata.total_rows,
                parsed.table.metadata.source_page_count,
                path.display()
            );
            output::table::print_diagnostics(&parsed.diagnostics);
        }
        None => match args.output_format.as_str() {
            "json" => output::json::print(&parsed)?,
            _ => {
                output::table::print(&parsed.table, parser.profile());
                output::table::print_diagnostics(&parsed.diagnostics);
            }
        },
    }

    Ok(())
}

fn resolve_family(args: &ParseArgs) -> Result<DocumentFamily, InventariError> {
    match (&args.family, &args.municipality, &args.report) {
        (Some(name), _, _) => name.parse(),
        (None, Some(municipality), Some(report)) => {
            DocumentFamily::for_report(municipality, report)
        }
        _ => Err(InventariError::UnknownFamily(
            "none given (use --family, or --municipality with --report)".into(),
        )),
    }
}

fn source_for(path: &Path) -> Box<dyn FragmentSource> {
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        Box::new(Pdf2JsonSource::new())
    } else {
        Box::new(PdftotextSource::new())
    }
}
