//! Integration tests for the label_pdf() end-to-end pipeline.
//!
//! Uses a MockExtractor that returns pre-built PageContent without
//! invoking pdftotext, so these tests run without poppler-utils.

use chrono::NaiveDate;
use labelkit_core::engine::EngineOptions;
use labelkit_core::error::{Field, LabelkitError, RuleErrorKind};
use labelkit_core::export::csv::write_rows;
use labelkit_core::extraction::{PageContent, PdfExtractor};
use labelkit_core::lookup::builtin::default_table;
use labelkit_core::parsing::ParseOptions;
use labelkit_core::{label_pdf, parse_pdf, LabelRequest};
use rust_decimal_macros::dec;

struct MockExtractor {
    pages: Vec<PageContent>,
}

impl PdfExtractor for MockExtractor {
    fn extract_pages(&self, _pdf_bytes: &[u8]) -> Result<Vec<PageContent>, LabelkitError> {
        Ok(self.pages.clone())
    }

    fn backend_name(&self) -> &str {
        "mock"
    }
}

fn page(number: usize, lines: &[&str]) -> PageContent {
    PageContent {
        page_number: number,
        lines: lines.iter().map(|s| s.to_string()).collect(),
    }
}

fn order_sheet(item_classification: &str, collection: &str) -> MockExtractor {
    MockExtractor {
        pages: vec![
            page(
                1,
                &[
                    "PEPCO Poland                      PURCHASE ORDER",
                    "Order - ID ............. 4500123        Page 1 of 3",
                    "Merch code ............. J45",
                    "Season ................. SS 26",
                    &format!("Collection ............. {collection} - main"),
                    "Handover date .......... 15/02/2026",
                    &format!("Item classification .... {item_classification}"),
                    "Supplier product code .. AB-55",
                    "Supplier name .......... Fabrika Tekstil",
                    "",
                    "  Style    318204",
                ],
            ),
            page(
                2,
                &[
                    "PURCHASE ORDER - COLOURS",
                    "PANTONE 19-4052 TPX",
                    "  1.  Dark navy (01)",
                    "TOTAL ORDERED 1200",
                ],
            ),
            page(
                3,
                &[
                    "SKU         EAN",
                    "21000001    5905000000011",
                    "21000002    5905000000028",
                    "21000003    5905000000035",
                    "Pack barcode: 5905000000999;",
                    "5905000000999",
                ],
            ),
        ],
    }
}

fn request(product_type: &str, hints: &[&str]) -> LabelRequest {
    LabelRequest {
        parse: ParseOptions {
            processing_date: NaiveDate::from_ymd_opt(2026, 1, 20).unwrap(),
            product_type: product_type.to_string(),
            material_hints: hints.iter().map(|s| s.to_string()).collect(),
            ..ParseOptions::default()
        },
        base_price: Some(dec!(19.99)),
        ..LabelRequest::default()
    }
}

// ---------------------------------------------------------------------------
// Test 1: Baby bodysuit, pure cotton, price from the price sheet
// ---------------------------------------------------------------------------
#[test]
fn baby_cotton_bodysuit_finalizes_every_sku() {
    let table = default_table().unwrap();
    let extractor = order_sheet("Baby Boys Essentials", "Dino Friends");

    let batch = label_pdf(&[], &extractor, &table, &request("Bodysuit", &["100% Cotton"])).unwrap();

    assert!(batch.parsed.warnings.is_empty(), "{:?}", batch.parsed.warnings);
    let rows = batch.rows();
    assert_eq!(rows.len(), 3);

    let row = &rows[0];
    assert_eq!(row.order_id(), "4500123");
    assert_eq!(row.style(), "318204");
    assert_eq!(row.colour(), "DARK NAVY");
    assert_eq!(row.department(), "BABY");
    // Cotton in BABY gets the gentler care set.
    assert_eq!(row.washing_code().symbol_code, "ijnst");
    assert_eq!(row.price_ladder().get("EUR"), Some(dec!(4.99)));
    assert_eq!(row.price_ladder().get("PLN"), Some(dec!(19.99)));
    assert_eq!(row.collection(), Some("CLASSIC 1"));
    assert!(row.is_pure_cotton());
    assert_eq!(
        row.pass_through().batch.as_deref(),
        Some("Data e prodhimit: 012026")
    );
    assert_eq!(rows[2].barcode(), "5905000000035");
}

// ---------------------------------------------------------------------------
// Test 2: Rule errors are aggregated per record and don't abort the batch
// ---------------------------------------------------------------------------
#[test]
fn unmapped_material_and_missing_rate_reported_together() {
    let mut table = default_table().unwrap();
    table.prices.rates.remove("RSD");
    let extractor = order_sheet("Mens Outerwear", "Croco Club");
    let mut req = request("Jacket", &["70% Silk", "30% Cotton"]);
    req.base_price = Some(dec!(45));

    let batch = label_pdf(&[], &extractor, &table, &req).unwrap();

    assert!(batch.rows().is_empty());
    let rejected: Vec<_> = batch.rejected().collect();
    assert_eq!(rejected.len(), 3);
    let errors = rejected[0].1;
    assert!(errors.contains(RuleErrorKind::UnmappedMaterial));
    assert!(errors.contains(RuleErrorKind::MissingRate));
    assert_eq!(errors.for_field(Field::Price).count(), 1);
    assert!(errors.to_string().contains("silk@MEN"));
}

// ---------------------------------------------------------------------------
// Test 3: Incomplete composition is reported, never mapped
// ---------------------------------------------------------------------------
#[test]
fn incomplete_composition_blocks_washing_lookup() {
    let table = default_table().unwrap();
    let extractor = order_sheet("Ladies Outerwear", "Country Side");

    let batch = label_pdf(&[], &extractor, &table, &request("Dress", &["60% Cotton"])).unwrap();

    let (_, errors) = batch.rejected().next().unwrap();
    assert!(errors.contains(RuleErrorKind::IncompleteComposition));
    assert!(!errors.contains(RuleErrorKind::UnmappedMaterial));
}

// ---------------------------------------------------------------------------
// Test 4: Secondary order ids are merged into every record
// ---------------------------------------------------------------------------
#[test]
fn extra_order_ids_merged() {
    let table = default_table().unwrap();
    let extractor = order_sheet("Older Girls Outerwear", "Cool Girl");
    let mut req = request("T-shirt", &["100% Polyester"]);
    req.parse.department = Some("KIDS".into());
    req.extra_order_ids = vec!["4500124".into(), "4500125".into()];

    let batch = label_pdf(&[], &extractor, &table, &req).unwrap();
    let rows = batch.rows();
    assert_eq!(rows.len(), 3);
    assert!(rows.iter().all(|r| r.order_id() == "4500123+4500124+4500125"));
    assert_eq!(rows[0].collection(), Some("COLLECTION_6 G"));
}

// ---------------------------------------------------------------------------
// Test 5: Short documents are rejected before any rule runs
// ---------------------------------------------------------------------------
#[test]
fn short_document_is_a_parse_error() {
    let extractor = MockExtractor {
        pages: vec![page(1, &["Order - ID ..... 1"])],
    };
    let result = parse_pdf(&[], &extractor, &ParseOptions::default());
    assert!(matches!(result, Err(LabelkitError::ParseError(_))));
}

// ---------------------------------------------------------------------------
// Test 6: CSV export matches the label printer layout
// ---------------------------------------------------------------------------
#[test]
fn csv_export_layout() {
    let table = default_table().unwrap();
    let extractor = order_sheet("Baby Boys Essentials", "Dino Friends");
    let batch = label_pdf(&[], &extractor, &table, &request("Bodysuit", &["100% Cotton"])).unwrap();

    let mut out = Vec::new();
    write_rows(&batch.rows(), &table, &mut out).unwrap();

    assert!(out.starts_with(b"\xEF\xBB\xBF"));
    let text = String::from_utf8(out[3..].to_vec()).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("\"Order_ID\";\"Style\";\"Colour\";"));
    assert!(lines[0].ends_with("\"product_name\";\"Dept\";\"Cotton\""));

    let fields: Vec<&str> = lines[1].split("\";\"").collect();
    assert_eq!(fields[0], "\"4500123");
    assert_eq!(fields[12], "ijnst");
    assert_eq!(fields[13], "4,99");
    assert_eq!(fields[16], "19,99");
    assert_eq!(fields[21], "1890");
    assert!(fields[22].starts_with("|EN| Bodysuit |AL| Trupore: 100% Pambuk"));
    assert_eq!(fields[23], "BABY");
    assert_eq!(fields[24], "Y\"");
}
