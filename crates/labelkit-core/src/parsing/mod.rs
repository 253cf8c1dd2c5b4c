pub mod codes;
pub mod colour;
pub mod header;

use chrono::{Local, NaiveDate};
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::LabelkitError;
use crate::extraction::PageContent;
use crate::model::{Department, PassThrough, RawRecord};
use codes::parse_codes;
use colour::{parse_colour, ColourLine};
use header::{parse_header, parse_order_id};

/// Order sheets carry header, colour and code pages, in that order.
pub const MIN_PAGES: usize = 3;

const UNKNOWN: &str = "UNKNOWN";

/// Operator choices applied to every record of a sheet.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Stamped into `document_date` as dd-mm-YYYY.
    pub processing_date: NaiveDate,
    /// Overrides the department derived from the item classification.
    pub department: Option<String>,
    /// Used when the item classification names no known department.
    pub default_department: Option<String>,
    pub product_type: String,
    pub material_hints: Vec<String>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            processing_date: Local::now().date_naive(),
            department: None,
            default_department: None,
            product_type: String::new(),
            material_hints: Vec::new(),
        }
    }
}

/// Records of one sheet plus everything the operator should double-check.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ParsedOrder {
    pub records: Vec<RawRecord>,
    pub warnings: Vec<String>,
}

/// Parse extracted order-sheet pages into one record per SKU/barcode pair.
pub fn parse_order_sheet(
    pages: &[PageContent],
    options: &ParseOptions,
) -> Result<ParsedOrder, LabelkitError> {
    if pages.len() < MIN_PAGES {
        return Err(LabelkitError::ParseError(format!(
            "order sheet must have at least {MIN_PAGES} pages, found {}",
            pages.len()
        )));
    }

    let mut warnings = Vec::new();
    let header = parse_header(&pages[0].text());

    let colour = match parse_colour(&pages[1].text()) {
        ColourLine::Found(c) => c,
        ColourLine::Manual => {
            warnings.push(format!(
                "page {}: 'MANUAL' detected in colour field",
                pages[1].page_number
            ));
            UNKNOWN.to_string()
        }
        ColourLine::Missing => {
            warnings.push(format!(
                "page {}: colour information not found",
                pages[1].page_number
            ));
            UNKNOWN.to_string()
        }
    };

    let codes = parse_codes(&pages[2].text());
    if codes.is_unbalanced() {
        warnings.push(format!(
            "page {}: {} SKUs but {} barcodes, extra entries dropped",
            pages[2].page_number, codes.sku_count, codes.barcode_count
        ));
    }
    if codes.pairs.is_empty() {
        warnings.push("no SKU/barcode pairs found".to_string());
    }

    let item_classification = header
        .item_classification
        .clone()
        .unwrap_or_else(|| UNKNOWN.to_string());
    let department = match &options.department {
        Some(d) => d.trim().to_uppercase(),
        None => match (
            Department::from_item_classification(&item_classification),
            &options.default_department,
        ) {
            (Some(d), _) => d.to_string(),
            (None, Some(fallback)) => fallback.trim().to_uppercase(),
            (None, None) => {
                warnings.push(format!(
                    "no department for item classification '{item_classification}'"
                ));
                String::new()
            }
        },
    };

    let style = header.style.clone().unwrap_or_else(|| UNKNOWN.to_string());
    let style_merch_season = match &header.style {
        Some(style) => format!(
            "STYLE {style} • {} • Batch No./",
            header.style_suffix().unwrap_or_default()
        ),
        None => "STYLE UNKNOWN".to_string(),
    };
    let batch = format!(
        "Data e prodhimit: {}",
        header.batch().unwrap_or_else(|| UNKNOWN.to_string())
    );
    let order_id = header
        .order_id
        .clone()
        .unwrap_or_else(|| UNKNOWN.to_string());
    let document_date = options.processing_date.format("%d-%m-%Y").to_string();

    let records: Vec<RawRecord> = codes
        .pairs
        .into_iter()
        .map(|(sku, barcode)| RawRecord {
            order_id: order_id.clone(),
            style: style.clone(),
            colour: colour.clone(),
            barcode,
            department: department.clone(),
            product_type: options.product_type.clone(),
            raw_material_hints: options.material_hints.clone(),
            pass_through: PassThrough {
                colour_sku: Some(format!("{colour} • SKU {sku}")),
                sku: Some(sku),
                supplier_product_code: Some(
                    header
                        .supplier_product_code
                        .clone()
                        .unwrap_or_else(|| UNKNOWN.to_string()),
                ),
                item_classification: Some(item_classification.clone()),
                supplier_name: Some(
                    header
                        .supplier_name
                        .clone()
                        .unwrap_or_else(|| UNKNOWN.to_string()),
                ),
                document_date: Some(document_date.clone()),
                collection: Some(
                    header
                        .collection
                        .clone()
                        .unwrap_or_else(|| UNKNOWN.to_string()),
                ),
                style_merch_season: Some(style_merch_season.clone()),
                batch: Some(batch.clone()),
            },
        })
        .collect();

    for w in &warnings {
        warn!("{}", w);
    }
    debug!(order_id = %order_id, records = records.len(), "parsed order sheet");

    Ok(ParsedOrder { records, warnings })
}

/// Order id from the first page, for sheets merged into another order.
pub fn extract_order_id(pages: &[PageContent]) -> Option<String> {
    pages.first().and_then(|p| parse_order_id(&p.text()))
}

/// Append secondary order ids to every record, joined with `+`.
pub fn merge_order_ids(records: &mut [RawRecord], extra_ids: &[String]) {
    let extra: Vec<&str> = extra_ids
        .iter()
        .map(|id| id.trim())
        .filter(|id| !id.is_empty())
        .collect();
    if extra.is_empty() {
        return;
    }
    let suffix = extra.join("+");
    for record in records {
        record.order_id = format!("{}+{}", record.order_id, suffix);
    }
}
