pub mod engine;
pub mod error;
pub mod export;
pub mod extraction;
pub mod lookup;
pub mod model;
pub mod parsing;

use rust_decimal::Decimal;

use engine::{EngineOptions, FinalizedRow, ValidationErrorSet};
use error::LabelkitError;
use extraction::PdfExtractor;
use lookup::schema::LookupTable;
use model::DraftRecord;
use parsing::{ParseOptions, ParsedOrder};

/// Operator input for labelling one order sheet.
#[derive(Debug, Clone, Default)]
pub struct LabelRequest {
    pub parse: ParseOptions,
    pub engine: EngineOptions,
    /// Base price in the table's reference currency.
    pub base_price: Option<Decimal>,
    /// Manual pick from the washing catalogue instead of rule-based mapping.
    pub washing_code: Option<String>,
    /// Order ids of secondary sheets merged into this order.
    pub extra_order_ids: Vec<String>,
}

/// Every record of a sheet, finalized or rejected, in sheet order.
#[derive(Debug, Clone)]
pub struct LabelBatch {
    pub parsed: ParsedOrder,
    pub results: Vec<Result<FinalizedRow, ValidationErrorSet>>,
}

impl LabelBatch {
    pub fn rows(&self) -> Vec<FinalizedRow> {
        self.results
            .iter()
            .filter_map(|r| r.as_ref().ok().cloned())
            .collect()
    }

    pub fn rejected(&self) -> impl Iterator<Item = (usize, &ValidationErrorSet)> {
        self.results
            .iter()
            .enumerate()
            .filter_map(|(i, r)| r.as_ref().err().map(|e| (i, e)))
    }
}

/// Extract and parse an order sheet into raw records.
pub fn parse_pdf(
    pdf_bytes: &[u8],
    extractor: &dyn PdfExtractor,
    options: &ParseOptions,
) -> Result<ParsedOrder, LabelkitError> {
    let pages = extractor.extract_pages(pdf_bytes)?;
    parsing::parse_order_sheet(&pages, options)
}

/// Main API entry point: turn an order sheet PDF into label rows.
///
/// Parsing problems abort; rule violations are reported per record and
/// never stop the other records.
pub fn label_pdf(
    pdf_bytes: &[u8],
    extractor: &dyn PdfExtractor,
    table: &LookupTable,
    request: &LabelRequest,
) -> Result<LabelBatch, LabelkitError> {
    let mut parsed = parse_pdf(pdf_bytes, extractor, &request.parse)?;
    parsing::merge_order_ids(&mut parsed.records, &request.extra_order_ids);

    let drafts: Vec<DraftRecord> = parsed
        .records
        .iter()
        .cloned()
        .map(|raw| DraftRecord {
            base_price: request.base_price,
            washing_code: request.washing_code.clone(),
            ..DraftRecord::new(raw)
        })
        .collect();

    let results = engine::finalize_all(&drafts, table, &request.engine);
    Ok(LabelBatch { parsed, results })
}
