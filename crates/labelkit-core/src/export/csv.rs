use rust_decimal::{Decimal, RoundingStrategy};
use std::io::Write;
use tracing::debug;

use crate::engine::outcome::FinalizedRow;
use crate::error::LabelkitError;
use crate::lookup::schema::LookupTable;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

const LEADING_COLUMNS: [&str; 13] = [
    "Order_ID",
    "Style",
    "Colour",
    "Supplier_product_code",
    "Item_classification",
    "Supplier_name",
    "today_date",
    "Collection",
    "Colour_SKU",
    "Style_Merch_Season",
    "Batch",
    "barcode",
    "washing_code",
];

const TRAILING_COLUMNS: [&str; 3] = ["product_name", "Dept", "Cotton"];

/// Header row: fixed columns around one column per ladder currency.
pub fn header(table: &LookupTable) -> Vec<String> {
    LEADING_COLUMNS
        .iter()
        .map(|c| c.to_string())
        .chain(table.prices.currencies.iter().cloned())
        .chain(TRAILING_COLUMNS.iter().map(|c| c.to_string()))
        .collect()
}

/// Write finalized rows as the label printer's CSV: UTF-8 with BOM,
/// `;` separated, every field quoted.
pub fn write_rows<W: Write>(
    rows: &[FinalizedRow],
    table: &LookupTable,
    mut writer: W,
) -> Result<(), LabelkitError> {
    writer.write_all(UTF8_BOM)?;
    let mut csv = ::csv::WriterBuilder::new()
        .delimiter(b';')
        .quote_style(::csv::QuoteStyle::Always)
        .from_writer(writer);

    csv.write_record(header(table))?;
    for row in rows {
        csv.write_record(record(row, table))?;
    }
    let mut inner = csv
        .into_inner()
        .map_err(|e| LabelkitError::Io(e.into_error()))?;
    inner.flush()?;

    debug!(rows = rows.len(), "wrote csv");
    Ok(())
}

fn record(row: &FinalizedRow, table: &LookupTable) -> Vec<String> {
    let p = row.pass_through();
    let text = |v: &Option<String>| v.clone().unwrap_or_default();

    let mut out = vec![
        row.order_id().to_string(),
        row.style().to_string(),
        row.colour().to_string(),
        text(&p.supplier_product_code),
        text(&p.item_classification),
        text(&p.supplier_name),
        text(&p.document_date),
        row.collection().unwrap_or_default().to_string(),
        text(&p.colour_sku),
        text(&p.style_merch_season),
        text(&p.batch),
        row.barcode().to_string(),
        row.washing_code().symbol_code.clone(),
    ];

    let prices = &table.prices;
    out.extend(prices.currencies.iter().map(|currency| {
        row.price_ladder()
            .get(currency)
            .map(|amount| format_amount(amount, prices.decimal_places_for(currency)))
            .unwrap_or_default()
    }));

    out.push(row.product_label().to_string());
    out.push(row.department().to_string());
    out.push(if row.is_pure_cotton() { "Y" } else { "" }.to_string());
    out
}

/// Format an amount for the label: exactly `decimal_places` digits after a
/// comma, no thousands grouping; whole numbers when `decimal_places` is 0.
pub fn format_amount(amount: Decimal, decimal_places: u32) -> String {
    let mut rounded =
        amount.round_dp_with_strategy(decimal_places, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(decimal_places);
    rounded.to_string().replace('.', ",")
}
