use crate::error::LabelkitError;
use crate::lookup::parse_lookup_table_str;
use crate::lookup::schema::LookupTable;

const DEFAULT_LOOKUP_JSON: &str = include_str!("../../../../tables/default-lookup.json");

/// Load the lookup table shipped with the binary.
///
/// Used when no workbook or JSON table is supplied; the real data lives in
/// the merchandising spreadsheet and this copy is only as fresh as the build.
pub fn default_table() -> Result<LookupTable, LabelkitError> {
    parse_lookup_table_str(DEFAULT_LOOKUP_JSON)
}
