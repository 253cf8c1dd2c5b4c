use std::sync::LazyLock;

use chrono::{Duration, NaiveDate};
use regex::Regex;

/// Days between the production batch date and the handover date.
const BATCH_LEAD_DAYS: i64 = 20;

/// `Label ...... value` row; `label` is a regex fragment.
fn labelled_row(label: &str) -> Regex {
    Regex::new(&format!(r"{label}\s*\.{{2,}}\s*(.+)")).expect("valid header label pattern")
}

fn pattern(re: &str) -> Regex {
    Regex::new(re).expect("valid header pattern")
}

static ORDER_ID: LazyLock<Regex> = LazyLock::new(|| labelled_row(r"Order\s*-\s*ID"));
static ORDER_ID_ONLY: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"(?i)Order\s*-\s*ID\s*\.{2,}\s*([A-Z0-9_+-]+)"));
static STYLE: LazyLock<Regex> = LazyLock::new(|| pattern(r"\b(\d{6})\b"));
static MERCH_CODE: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"Merch\s*code\s*\.{2,}\s*([\w/]+)"));
static SEASON: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"Season\s*\.{2,}\s*(?:\w+?)?\s*(\d{2})\b"));
static COLLECTION: LazyLock<Regex> = LazyLock::new(|| labelled_row(r"Collection"));
static HANDOVER_DATE: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"Handover\s*date\s*\.{2,}\s*(\d{2}/\d{2}/\d{4})"));
static ITEM_CLASSIFICATION: LazyLock<Regex> =
    LazyLock::new(|| labelled_row(r"Item\s+classification"));
static SUPPLIER_PRODUCT_CODE: LazyLock<Regex> =
    LazyLock::new(|| labelled_row(r"Supplier\s+product\s+code"));
static SUPPLIER_NAME: LazyLock<Regex> = LazyLock::new(|| labelled_row(r"Supplier\s+name"));

/// Labelled fields from the first page of an order sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SheetHeader {
    pub order_id: Option<String>,
    pub style: Option<String>,
    pub merch_code: Option<String>,
    pub season_digits: Option<String>,
    pub collection: Option<String>,
    pub handover_date: Option<NaiveDate>,
    pub item_classification: Option<String>,
    pub supplier_product_code: Option<String>,
    pub supplier_name: Option<String>,
}

impl SheetHeader {
    /// `{merch}{season}`, or just the merch code when the season is missing.
    pub fn style_suffix(&self) -> Option<String> {
        let merch = self.merch_code.as_deref()?;
        Some(match self.season_digits.as_deref() {
            Some(season) => format!("{merch}{season}"),
            None => merch.to_string(),
        })
    }

    /// Production batch as `MMYYYY`, 20 days before handover.
    pub fn batch(&self) -> Option<String> {
        self.handover_date
            .map(|d| (d - Duration::days(BATCH_LEAD_DAYS)).format("%m%Y").to_string())
    }
}

/// Extract the header fields from page 1 text.
pub fn parse_header(text: &str) -> SheetHeader {
    SheetHeader {
        order_id: labelled(text, &ORDER_ID),
        style: capture(text, &STYLE),
        merch_code: capture(text, &MERCH_CODE),
        season_digits: capture(text, &SEASON),
        collection: labelled(text, &COLLECTION)
            .and_then(|c| c.split('-').next().map(|s| s.trim().to_string()))
            .filter(|c| !c.is_empty()),
        handover_date: capture(text, &HANDOVER_DATE)
            .and_then(|d| NaiveDate::parse_from_str(&d, "%d/%m/%Y").ok()),
        item_classification: labelled(text, &ITEM_CLASSIFICATION),
        supplier_product_code: labelled(text, &SUPPLIER_PRODUCT_CODE),
        supplier_name: labelled(text, &SUPPLIER_NAME),
    }
}

/// Only the order id, for secondary sheets whose records are not needed.
pub fn parse_order_id(text: &str) -> Option<String> {
    capture(text, &ORDER_ID_ONLY)
}

fn labelled(text: &str, re: &Regex) -> Option<String> {
    capture(text, re).and_then(|v| truncate_at_gap(&v))
}

fn capture(text: &str, re: &Regex) -> Option<String> {
    re.captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
}

/// Cut a value at the next large whitespace gap (3+ spaces), which in
/// pdftotext -layout output separates it from the next column.
fn truncate_at_gap(value: &str) -> Option<String> {
    let value = match value.find("   ") {
        Some(gap) => &value[..gap],
        None => value,
    }
    .trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
