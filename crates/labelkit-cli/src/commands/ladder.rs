use labelkit_core::engine::generate;
use labelkit_core::error::LabelkitError;
use rust_decimal::Decimal;
use std::path::PathBuf;

use crate::config::Config;
use crate::output;

pub fn run(
    config: &Config,
    price: Decimal,
    lookup: Option<PathBuf>,
    output_format: &str,
) -> Result<(), LabelkitError> {
    let table = super::load_table(config, lookup.as_deref())?;
    let ladder = generate(price, &table.prices)?;

    match output_format {
        "json" => output::json::print(&ladder)?,
        _ => output::table::print_ladder(&ladder, &table.prices),
    }
    Ok(())
}
