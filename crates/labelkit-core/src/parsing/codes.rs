use std::sync::LazyLock;

use regex::Regex;

static SKU: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d{8}\b").expect("valid SKU pattern"));
static BARCODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d{13}\b").expect("valid barcode pattern"));
static EXCLUDED_BARCODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"barcode:\s*(\d{13});").expect("valid excluded barcode pattern")
});

/// SKU / barcode pairs from page 3 of an order sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeTable {
    pub pairs: Vec<(String, String)>,
    pub sku_count: usize,
    pub barcode_count: usize,
}

impl CodeTable {
    /// SKUs and usable barcodes did not line up one to one.
    pub fn is_unbalanced(&self) -> bool {
        self.sku_count != self.barcode_count
    }
}

/// Zip 8-digit SKUs with 13-digit barcodes in page order.
///
/// Barcodes listed as `barcode: <13 digits>;` belong to references and are
/// excluded before pairing. Surplus SKUs or barcodes are dropped.
pub fn parse_codes(text: &str) -> CodeTable {
    let all = |re: &Regex| -> Vec<String> {
        re.find_iter(text).map(|m| m.as_str().to_string()).collect()
    };

    let skus = all(&SKU);
    let barcodes = all(&BARCODE);
    let excluded: Vec<String> = EXCLUDED_BARCODE
        .captures_iter(text)
        .filter_map(|c| c.get(1).map(|m| m.as_str().to_string()))
        .collect();

    let barcodes: Vec<String> = barcodes
        .into_iter()
        .filter(|b| !excluded.contains(b))
        .collect();

    CodeTable {
        sku_count: skus.len(),
        barcode_count: barcodes.len(),
        pairs: skus.into_iter().zip(barcodes).collect(),
    }
}
