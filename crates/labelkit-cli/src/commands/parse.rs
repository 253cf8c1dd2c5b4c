use labelkit_core::error::LabelkitError;
use labelkit_core::extraction::pdftotext::PdftotextExtractor;
use labelkit_core::parsing::{merge_order_ids, ParseOptions};
use std::path::PathBuf;

use crate::config::Config;
use crate::output;

pub fn run(
    config: &Config,
    pdf_file: PathBuf,
    extra: Vec<PathBuf>,
    output_format: &str,
    output_file: Option<PathBuf>,
) -> Result<(), LabelkitError> {
    let pdf_bytes = std::fs::read(&pdf_file)?;
    let extractor = PdftotextExtractor::new();
    let options = ParseOptions {
        default_department: config.department.clone(),
        ..ParseOptions::default()
    };
    let mut parsed = labelkit_core::parse_pdf(&pdf_bytes, &extractor, &options)?;
    let extra_ids = super::extra_order_ids(&extra, &extractor)?;
    merge_order_ids(&mut parsed.records, &extra_ids);

    match output_file {
        Some(path) => {
            // Always write JSON when saving to file
            let json = serde_json::to_string_pretty(&parsed.records)?;
            std::fs::write(&path, json)?;
            eprintln!(
                "Parsed {} record(s), written to {}",
                parsed.records.len(),
                path.display()
            );
            for w in &parsed.warnings {
                eprintln!("  warning: {w}");
            }
        }
        None => match output_format {
            "json" => output::json::print(&parsed)?,
            _ => print!("{}", output::table::format_parsed(&parsed)),
        },
    }

    Ok(())
}
