use labelkit_core::engine::finalize_all;
use labelkit_core::error::LabelkitError;
use labelkit_core::export::csv::write_rows;
use labelkit_core::model::DraftRecord;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use crate::config::Config;
use crate::output;

/// Finalize draft records saved as JSON (e.g. by `parse -O` and edited).
pub fn run(
    config: &Config,
    drafts_file: PathBuf,
    lookup: Option<PathBuf>,
    csv: Option<PathBuf>,
    output_format: &str,
) -> Result<(), LabelkitError> {
    let table = super::load_table(config, lookup.as_deref())?;
    let json = std::fs::read(&drafts_file)?;
    let drafts: Vec<DraftRecord> = serde_json::from_slice(&json)?;

    let results = finalize_all(&drafts, &table, &config.engine_options());

    match output_format {
        "json" => output::json::print(&output::json::results(&results))?,
        _ => output::table::print_results(&results, &table),
    }

    if let Some(path) = csv {
        let rows: Vec<_> = results.iter().filter_map(|r| r.as_ref().ok().cloned()).collect();
        write_rows(&rows, &table, BufWriter::new(File::create(&path)?))?;
        eprintln!("{} row(s) written to {}", rows.len(), path.display());
    }

    match results.iter().filter(|r| r.is_err()).count() {
        0 => Ok(()),
        n => Err(LabelkitError::Rejected(n)),
    }
}
