use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::engine::composition::MaterialComponent;

/// Department derived from the order sheet's item classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Department {
    Baby,
    Kids,
    Teens,
    Women,
    Men,
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Department::Baby => write!(f, "BABY"),
            Department::Kids => write!(f, "KIDS"),
            Department::Teens => write!(f, "TEENS"),
            Department::Women => write!(f, "WOMEN"),
            Department::Men => write!(f, "MEN"),
        }
    }
}

impl Department {
    pub fn from_item_classification(item_class: &str) -> Option<Department> {
        let lower = item_class.trim().to_lowercase();
        let any = |needles: &[&str]| needles.iter().any(|n| lower.contains(n));

        if any(&[
            "baby boys outerwear",
            "baby girls outerwear",
            "baby boys essentials",
            "baby girls essentials",
        ]) {
            Some(Department::Baby)
        } else if any(&["younger boys outerwear", "younger girls outerwear"]) {
            Some(Department::Kids)
        } else if any(&["older girls outerwear", "older boys outerwear"]) {
            Some(Department::Teens)
        } else if lower.contains("ladies outerwear") {
            Some(Department::Women)
        } else if lower.contains("mens outerwear") {
            Some(Department::Men)
        } else {
            None
        }
    }
}

/// Order-sheet fields the engine carries through to the export untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassThrough {
    pub sku: Option<String>,
    pub supplier_product_code: Option<String>,
    pub item_classification: Option<String>,
    pub supplier_name: Option<String>,
    /// Date the sheet was processed (dd-mm-YYYY).
    pub document_date: Option<String>,
    pub collection: Option<String>,
    pub colour_sku: Option<String>,
    pub style_merch_season: Option<String>,
    pub batch: Option<String>,
}

/// One line of an order sheet, as produced by the PDF parser.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    pub order_id: String,
    pub style: String,
    pub colour: String,
    pub barcode: String,
    pub department: String,
    pub product_type: String,
    /// Free-text composition hints, e.g. "60% cotton".
    #[serde(default)]
    pub raw_material_hints: Vec<String>,
    #[serde(default)]
    pub pass_through: PassThrough,
}

/// A record in the operator's hands: raw data plus everything entered
/// interactively. This is the pending state that `finalize` validates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DraftRecord {
    pub raw: RawRecord,
    /// Components as entered. `finalize` replays them through
    /// `add_component`, so a bad entry is reported against this record.
    #[serde(default)]
    pub composition: Vec<MaterialComponent>,
    /// Base price in the reference currency.
    #[serde(default)]
    pub base_price: Option<Decimal>,
    /// Catalogue key picked manually instead of rule-based mapping.
    #[serde(default)]
    pub washing_code: Option<String>,
}

impl DraftRecord {
    pub fn new(raw: RawRecord) -> Self {
        DraftRecord {
            raw,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_department_from_item_classification() {
        assert_eq!(
            Department::from_item_classification("Baby Girls Essentials - Tops"),
            Some(Department::Baby)
        );
        assert_eq!(
            Department::from_item_classification("YOUNGER BOYS OUTERWEAR"),
            Some(Department::Kids)
        );
        assert_eq!(
            Department::from_item_classification("Older Girls Outerwear"),
            Some(Department::Teens)
        );
        assert_eq!(
            Department::from_item_classification("Ladies Outerwear"),
            Some(Department::Women)
        );
        assert_eq!(
            Department::from_item_classification("Mens Outerwear"),
            Some(Department::Men)
        );
        assert_eq!(Department::from_item_classification("Home decor"), None);
    }

    #[test]
    fn test_department_display_round_trips_serde_name() {
        let json = serde_json::to_string(&Department::Teens).unwrap();
        assert_eq!(json, "\"TEENS\"");
        assert_eq!(Department::Teens.to_string(), "TEENS");
    }
}
