use tracing::debug;

use crate::engine::composition::MaterialComposition;
use crate::error::RuleError;
use crate::lookup::schema::{LookupTable, WashingCode};

/// Normalized lookup key for a material within a department,
/// e.g. `cotton@BABY`.
pub fn washing_key(material: &str, department: &str) -> String {
    format!(
        "{}@{}",
        material.trim().to_lowercase(),
        department.trim().to_uppercase()
    )
}

/// Map a complete composition to a washing code via the table's rules.
///
/// The dominant material decides. A rule for the exact department wins over
/// a department-agnostic rule for the same material.
pub fn resolve(
    table: &LookupTable,
    composition: &MaterialComposition,
    department: &str,
) -> Result<WashingCode, RuleError> {
    let dominant = match composition.dominant() {
        Some(d) if composition.is_complete() => d,
        _ => {
            return Err(RuleError::IncompleteComposition {
                total: composition.total(),
            })
        }
    };

    let material = dominant.material.trim().to_lowercase();
    let department = department.trim().to_uppercase();
    let key = washing_key(&material, &department);

    let matches_material = |rule_material: &str| rule_material.trim().to_lowercase() == material;
    let rule = table
        .washing_rules
        .iter()
        .find(|r| {
            matches_material(&r.material)
                && r
                    .department
                    .as_deref()
                    .is_some_and(|d| d.trim().to_uppercase() == department)
        })
        .or_else(|| {
            table
                .washing_rules
                .iter()
                .find(|r| matches_material(&r.material) && r.department.is_none())
        });

    let code = rule
        .and_then(|r| table.washing_codes.get(&r.code))
        .cloned()
        .ok_or(RuleError::UnmappedMaterial { key: key.clone() })?;

    debug!(key = %key, symbol = %code.symbol_code, "resolved washing code");
    Ok(code)
}

/// Use the operator's manual pick from the washing catalogue.
///
/// Still refuses incomplete compositions, so a code is never attached to a
/// record whose materials are unknown.
pub fn resolve_override(
    table: &LookupTable,
    composition: &MaterialComposition,
    code: &str,
) -> Result<WashingCode, RuleError> {
    if !composition.is_complete() {
        return Err(RuleError::IncompleteComposition {
            total: composition.total(),
        });
    }

    table
        .washing_codes
        .get(code.trim())
        .cloned()
        .ok_or_else(|| RuleError::UnknownWashingCode {
            code: code.trim().to_string(),
        })
}
