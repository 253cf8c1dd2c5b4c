use labelkit_core::error::LabelkitError;
use labelkit_core::export::csv::write_rows;
use labelkit_core::extraction::pdftotext::PdftotextExtractor;
use labelkit_core::parsing::ParseOptions;
use labelkit_core::LabelRequest;
use rust_decimal::Decimal;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use tracing::info;

use crate::config::Config;
use crate::output;

pub struct LabelArgs {
    pub pdf_file: PathBuf,
    pub extra: Vec<PathBuf>,
    pub lookup: Option<PathBuf>,
    pub product_type: String,
    pub department: Option<String>,
    pub materials: Vec<String>,
    pub price: Decimal,
    pub washing_code: Option<String>,
    pub csv: Option<PathBuf>,
    pub output: String,
}

pub fn run(config: &Config, args: LabelArgs) -> Result<(), LabelkitError> {
    let table = super::load_table(config, args.lookup.as_deref())?;
    let extractor = PdftotextExtractor::new();

    let request = LabelRequest {
        parse: ParseOptions {
            department: args.department,
            default_department: config.department.clone(),
            product_type: args.product_type,
            material_hints: args.materials,
            ..ParseOptions::default()
        },
        engine: config.engine_options(),
        base_price: Some(args.price),
        washing_code: args.washing_code,
        extra_order_ids: super::extra_order_ids(&args.extra, &extractor)?,
    };

    let pdf_bytes = std::fs::read(&args.pdf_file)?;
    let batch = labelkit_core::label_pdf(&pdf_bytes, &extractor, &table, &request)?;

    for w in &batch.parsed.warnings {
        eprintln!("warning: {w}");
    }

    match args.output.as_str() {
        "json" => output::json::print(&output::json::results(&batch.results))?,
        _ => output::table::print_results(&batch.results, &table),
    }

    if let Some(path) = args.csv {
        let rows = batch.rows();
        let file = File::create(&path)?;
        write_rows(&rows, &table, BufWriter::new(file))?;
        info!(rows = rows.len(), file = %path.display(), "csv written");
        eprintln!("{} row(s) written to {}", rows.len(), path.display());
    }

    match batch.rejected().count() {
        0 => Ok(()),
        n => Err(LabelkitError::Rejected(n)),
    }
}
