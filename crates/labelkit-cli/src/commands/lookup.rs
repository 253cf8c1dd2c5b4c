use labelkit_core::error::LabelkitError;
use labelkit_core::lookup::validate_lookup_table;
use std::path::Path;

use crate::config::Config;
use crate::output;

pub fn show(config: &Config, file: Option<&Path>, output_format: &str) -> Result<(), LabelkitError> {
    let table = super::load_table(config, file)?;
    match output_format {
        "json" => output::json::print(&table)?,
        _ => output::table::print_table_summary(&table),
    }
    Ok(())
}

/// Load and check a lookup file without using it.
pub fn validate(config: &Config, file: &Path) -> Result<(), LabelkitError> {
    let table = super::load_table(config, Some(file))?;
    // Loaders validate already; rerun for tables assembled from workbooks.
    validate_lookup_table(&table)?;
    println!(
        "Valid lookup table: {} (v{}) with {} product(s) and {} currencies",
        table.name,
        table.version,
        table.products.len(),
        table.prices.currencies.len()
    );
    Ok(())
}
