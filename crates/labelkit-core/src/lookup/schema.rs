use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Snapshot of the externally maintained reference data.
///
/// Passed explicitly into every engine call; the engine only reads it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupTable {
    pub name: String,
    pub version: String,
    /// Locale columns in label order, e.g. ["EN", "AL", "BG", ...].
    pub locales: Vec<String>,
    /// Locales whose label text gets the composition appended.
    #[serde(default)]
    pub composition_locales: Vec<String>,
    /// Fixed sentence appended to a locale's label text.
    #[serde(default)]
    pub locale_suffixes: BTreeMap<String, String>,
    pub products: Vec<ProductEntry>,
    /// Material name -> locale -> translated material name.
    #[serde(default)]
    pub materials: BTreeMap<String, BTreeMap<String, String>>,
    /// Catalogue key -> washing code.
    pub washing_codes: BTreeMap<String, WashingCode>,
    #[serde(default)]
    pub washing_rules: Vec<WashingRule>,
    pub prices: PriceTable,
    #[serde(default)]
    pub collections: Vec<CollectionGroup>,
}

/// Translations of one product type within a department.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductEntry {
    pub department: String,
    pub product_type: String,
    /// Locale -> product name.
    pub translations: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WashingCode {
    pub symbol_code: String,
    #[serde(default)]
    pub description: String,
}

/// Maps a dominant material (optionally within one department) to a
/// washing catalogue key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WashingRule {
    pub material: String,
    /// Omit to apply in every department.
    #[serde(default)]
    pub department: Option<String>,
    pub code: String,
}

/// Conversion data for the price ladder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceTable {
    pub reference_currency: String,
    /// Every currency the ladder must contain, in export order.
    pub currencies: Vec<String>,
    /// Currency -> units of that currency per one reference unit.
    #[serde(default)]
    pub rates: BTreeMap<String, Decimal>,
    /// Currency -> decimal places (default 2).
    #[serde(default)]
    pub decimal_places: BTreeMap<String, u32>,
    /// Rows of the price sheet: currency -> amount. A row whose reference
    /// amount equals the base price overrides rate conversion.
    #[serde(default)]
    pub price_points: Vec<BTreeMap<String, Decimal>>,
}

pub const DEFAULT_DECIMAL_PLACES: u32 = 2;

impl PriceTable {
    pub fn decimal_places_for(&self, currency: &str) -> u32 {
        self.decimal_places
            .get(currency)
            .copied()
            .unwrap_or(DEFAULT_DECIMAL_PLACES)
    }
}

/// Collection renames for the item classifications of one group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionGroup {
    pub name: String,
    /// Item-classification substrings (case-insensitive) selecting the group.
    pub classifications: Vec<String>,
    /// Checked in order; the first alias whose source occurs in the
    /// collection wins.
    pub aliases: Vec<CollectionAlias>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionAlias {
    pub source: String,
    pub target: String,
}

impl LookupTable {
    /// Find a product by department and product type (exact, trimmed).
    pub fn product(&self, department: &str, product_type: &str) -> Option<&ProductEntry> {
        let department = department.trim();
        let product_type = product_type.trim();
        self.products
            .iter()
            .find(|p| p.department == department && p.product_type == product_type)
    }

    /// Distinct departments in table order.
    pub fn departments(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for p in &self.products {
            if !out.contains(&p.department.as_str()) {
                out.push(&p.department);
            }
        }
        out
    }

    /// Translation of a material name for one locale.
    pub fn material_translation(&self, material: &str, locale: &str) -> Option<&str> {
        self.materials
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(material.trim()))
            .and_then(|(_, by_locale)| by_locale.get(locale))
            .map(|s| s.as_str())
    }
}
