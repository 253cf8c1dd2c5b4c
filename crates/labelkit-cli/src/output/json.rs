use labelkit_core::engine::{FinalizedRow, ValidationErrorSet};
use labelkit_core::error::LabelkitError;
use serde::Serialize;

pub fn print<T: Serialize + ?Sized>(value: &T) -> Result<(), LabelkitError> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}

#[derive(Serialize)]
pub struct RecordResult<'a> {
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row: Option<&'a FinalizedRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<&'a ValidationErrorSet>,
}

/// One entry per record, with either the row or its errors.
pub fn results(results: &[Result<FinalizedRow, ValidationErrorSet>]) -> Vec<RecordResult<'_>> {
    results
        .iter()
        .enumerate()
        .map(|(index, r)| RecordResult {
            index,
            row: r.as_ref().ok(),
            errors: r.as_ref().err(),
        })
        .collect()
}
