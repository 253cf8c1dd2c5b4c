pub mod finalize;
pub mod label;
pub mod ladder;
pub mod lookup;
pub mod parse;

use labelkit_core::error::LabelkitError;
use labelkit_core::extraction::PdfExtractor;
use labelkit_core::lookup::schema::LookupTable;
use labelkit_core::lookup::{builtin, load_lookup_table, workbook};
use labelkit_core::parsing::extract_order_id;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::config::Config;

/// Load the lookup table from `--lookup`, the config file, or the built-in copy.
pub fn load_table(config: &Config, explicit: Option<&Path>) -> Result<LookupTable, LabelkitError> {
    let path = explicit.or(config.lookup.as_deref());
    let table = match path {
        None => builtin::default_table()?,
        Some(path) if is_workbook(path) => {
            let bytes = std::fs::read(path).map_err(|e| LabelkitError::LookupLoad {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
            workbook::load_workbook(&bytes, &config.reference_currency)?
        }
        Some(path) => load_lookup_table(path)?,
    };
    info!(name = %table.name, version = %table.version, "loaded lookup table");
    Ok(table)
}

pub fn is_workbook(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("xlsx"))
        .unwrap_or(false)
}

/// Order ids of secondary sheets; sheets without one are skipped with a warning.
pub fn extra_order_ids(
    paths: &[PathBuf],
    extractor: &dyn PdfExtractor,
) -> Result<Vec<String>, LabelkitError> {
    let mut ids = Vec::new();
    for path in paths {
        let bytes = std::fs::read(path)?;
        let pages = extractor.extract_pages(&bytes)?;
        match extract_order_id(&pages) {
            Some(id) => ids.push(id),
            None => warn!(file = %path.display(), "no order id found, sheet ignored"),
        }
    }
    Ok(ids)
}
