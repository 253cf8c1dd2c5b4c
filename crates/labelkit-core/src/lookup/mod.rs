pub mod builtin;
pub mod schema;
pub mod workbook;

use crate::error::LabelkitError;
use schema::LookupTable;
use std::collections::BTreeSet;
use std::path::Path;

/// Load a lookup table from a JSON file.
pub fn load_lookup_table(path: &Path) -> Result<LookupTable, LabelkitError> {
    let content = std::fs::read_to_string(path).map_err(|e| LabelkitError::LookupLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    parse_lookup_table(&content, path)
}

/// Parse a lookup table from a JSON string.
pub fn parse_lookup_table(json: &str, source: &Path) -> Result<LookupTable, LabelkitError> {
    let table: LookupTable =
        serde_json::from_str(json).map_err(|e| LabelkitError::LookupLoad {
            path: source.to_path_buf(),
            reason: e.to_string(),
        })?;
    validate_lookup_table(&table)?;
    Ok(table)
}

/// Parse a lookup table from a JSON string (no file path context).
pub fn parse_lookup_table_str(json: &str) -> Result<LookupTable, LabelkitError> {
    let table: LookupTable = serde_json::from_str(json).map_err(LabelkitError::Json)?;
    validate_lookup_table(&table)?;
    Ok(table)
}

/// Validate that a lookup table is well-formed.
pub fn validate_lookup_table(table: &LookupTable) -> Result<(), LabelkitError> {
    if table.locales.is_empty() {
        return Err(LabelkitError::LookupInvalid(
            "locales must not be empty".into(),
        ));
    }

    for locale in &table.composition_locales {
        if !table.locales.contains(locale) {
            return Err(LabelkitError::LookupInvalid(format!(
                "composition locale '{}' is not one of the label locales",
                locale
            )));
        }
    }

    let mut seen = BTreeSet::new();
    for product in &table.products {
        if product.department.trim().is_empty() || product.product_type.trim().is_empty() {
            return Err(LabelkitError::LookupInvalid(
                "product department and type must not be empty".into(),
            ));
        }
        if !seen.insert((product.department.as_str(), product.product_type.as_str())) {
            return Err(LabelkitError::LookupInvalid(format!(
                "product '{}' listed twice in department '{}'",
                product.product_type, product.department
            )));
        }
    }

    for rule in &table.washing_rules {
        if rule.material.trim().is_empty() {
            return Err(LabelkitError::LookupInvalid(
                "washing rule material must not be empty".into(),
            ));
        }
        if !table.washing_codes.contains_key(&rule.code) {
            return Err(LabelkitError::LookupInvalid(format!(
                "washing rule for '{}' references unknown code '{}'",
                rule.material, rule.code
            )));
        }
    }

    let prices = &table.prices;
    if !prices.currencies.contains(&prices.reference_currency) {
        return Err(LabelkitError::LookupInvalid(format!(
            "reference currency '{}' must be listed in currencies",
            prices.reference_currency
        )));
    }

    for (currency, rate) in &prices.rates {
        if !prices.currencies.contains(currency) {
            return Err(LabelkitError::LookupInvalid(format!(
                "rate given for unsupported currency '{}'",
                currency
            )));
        }
        if rate.is_sign_negative() || rate.is_zero() {
            return Err(LabelkitError::LookupInvalid(format!(
                "rate for '{}' must be positive",
                currency
            )));
        }
    }

    for (i, point) in prices.price_points.iter().enumerate() {
        if !point.contains_key(&prices.reference_currency) {
            return Err(LabelkitError::LookupInvalid(format!(
                "price point {} has no {} amount",
                i + 1,
                prices.reference_currency
            )));
        }
    }

    Ok(())
}
