use std::collections::BTreeMap;
use std::io::{Cursor, Read, Seek};

use calamine::{Data, Range, Reader, Xlsx};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::error::LabelkitError;
use crate::lookup::schema::{
    CollectionAlias, CollectionGroup, LookupTable, PriceTable, ProductEntry, WashingCode,
    WashingRule,
};
use crate::lookup::validate_lookup_table;

/// Columns in the product sheet that carry a second text for a locale,
/// e.g. `ES_CA` is appended to `ES` as "ES / ES_CA".
const SECONDARY_SUFFIX: &str = "_CA";

/// Build a lookup table from the merchandising workbook export.
///
/// Expected sheets:
/// - `Products`: `DEPARTMENT | PRODUCT_NAME | <locale>...`
/// - `Materials`: `Name | <locale>...` (these locales get composition text)
/// - `Rates`: `Currency | Rate | Decimals`, in export order
/// - `Washing`: `Code | Symbol | Description`
/// - `WashingRules` (optional): `Material | Department | Code`
/// - `Prices` (optional): one column per currency, one price point per row
/// - `Suffixes` (optional): `Locale | Text`
/// - `Collections` (optional): `Group | Classifications | Source | Target`,
///   classifications separated by `;`
pub fn load_workbook(bytes: &[u8], reference_currency: &str) -> Result<LookupTable, LabelkitError> {
    let cursor = Cursor::new(bytes);
    let mut workbook: Xlsx<_> = calamine::open_workbook_from_rs(cursor)
        .map_err(|e| LabelkitError::Workbook(format!("failed to open xlsx: {e}")))?;

    let (locales, products) = read_products(&required_sheet(&mut workbook, "Products")?)?;
    let (composition_locales, materials) =
        read_materials(&required_sheet(&mut workbook, "Materials")?);
    let prices_sheet = optional_sheet(&mut workbook, "Prices")?;
    let prices = read_prices(
        &required_sheet(&mut workbook, "Rates")?,
        prices_sheet.as_ref(),
        reference_currency,
    )?;
    let washing_codes = read_washing_codes(&required_sheet(&mut workbook, "Washing")?);
    let washing_rules = optional_sheet(&mut workbook, "WashingRules")?
        .map(|s| read_washing_rules(&s))
        .unwrap_or_default();
    let locale_suffixes = optional_sheet(&mut workbook, "Suffixes")?
        .map(|s| read_suffixes(&s))
        .unwrap_or_default();
    let collections = optional_sheet(&mut workbook, "Collections")?
        .map(|s| read_collections(&s))
        .unwrap_or_default();

    let table = LookupTable {
        name: "Workbook".into(),
        version: "workbook".into(),
        composition_locales: composition_locales
            .into_iter()
            .filter(|l| locales.contains(l))
            .collect(),
        locales,
        locale_suffixes,
        products,
        materials,
        washing_codes,
        washing_rules,
        prices,
        collections,
    };

    debug!(
        products = table.products.len(),
        materials = table.materials.len(),
        currencies = table.prices.currencies.len(),
        "loaded lookup workbook"
    );

    validate_lookup_table(&table)?;
    Ok(table)
}

fn optional_sheet<R: Read + Seek>(
    workbook: &mut Xlsx<R>,
    name: &str,
) -> Result<Option<Range<Data>>, LabelkitError> {
    if !workbook.sheet_names().iter().any(|s| s == name) {
        return Ok(None);
    }
    workbook
        .worksheet_range(name)
        .map(Some)
        .map_err(|e| LabelkitError::Workbook(format!("sheet '{name}': {e}")))
}

fn required_sheet<R: Read + Seek>(
    workbook: &mut Xlsx<R>,
    name: &str,
) -> Result<Range<Data>, LabelkitError> {
    optional_sheet(workbook, name)?
        .ok_or_else(|| LabelkitError::Workbook(format!("sheet '{name}' not found")))
}

fn header_row(range: &Range<Data>) -> Vec<String> {
    range
        .rows()
        .next()
        .map(|row| {
            row.iter()
                .map(|c| cell_as_string(c).unwrap_or_default())
                .collect()
        })
        .unwrap_or_default()
}

fn read_products(range: &Range<Data>) -> Result<(Vec<String>, Vec<ProductEntry>), LabelkitError> {
    let header = header_row(range);
    let dept_col = header.iter().position(|h| h.eq_ignore_ascii_case("DEPARTMENT"));
    let name_col = header
        .iter()
        .position(|h| h.eq_ignore_ascii_case("PRODUCT_NAME"));
    let (dept_col, name_col) = match (dept_col, name_col) {
        (Some(d), Some(n)) => (d, n),
        _ => {
            return Err(LabelkitError::Workbook(
                "Products sheet needs DEPARTMENT and PRODUCT_NAME columns".into(),
            ))
        }
    };

    let locale_cols: Vec<(usize, &String)> = header
        .iter()
        .enumerate()
        .filter(|(i, h)| *i != dept_col && *i != name_col && !h.is_empty())
        .collect();
    let locales: Vec<String> = locale_cols
        .iter()
        .filter(|(_, h)| !h.ends_with(SECONDARY_SUFFIX))
        .map(|(_, h)| (*h).clone())
        .collect();

    let mut products = Vec::new();
    for row in range.rows().skip(1) {
        let department = row.get(dept_col).and_then(cell_as_string);
        let product_type = row.get(name_col).and_then(cell_as_string);
        let (department, product_type) = match (department, product_type) {
            (Some(d), Some(p)) => (d, p),
            _ => continue,
        };

        let mut translations = BTreeMap::new();
        for (i, locale) in &locale_cols {
            if locale.ends_with(SECONDARY_SUFFIX) {
                continue;
            }
            if let Some(text) = row.get(*i).and_then(cell_as_string) {
                translations.insert((*locale).clone(), text);
            }
        }
        for (i, column) in &locale_cols {
            let Some(primary) = column.strip_suffix(SECONDARY_SUFFIX) else {
                continue;
            };
            if let Some(extra) = row.get(*i).and_then(cell_as_string) {
                if let Some(text) = translations.get_mut(primary) {
                    *text = format!("{text} / {extra}");
                }
            }
        }

        products.push(ProductEntry {
            department,
            product_type,
            translations,
        });
    }

    Ok((locales, products))
}

fn read_materials(
    range: &Range<Data>,
) -> (Vec<String>, BTreeMap<String, BTreeMap<String, String>>) {
    let header = header_row(range);
    let locales: Vec<String> = header.iter().skip(1).filter(|h| !h.is_empty()).cloned().collect();

    let mut materials = BTreeMap::new();
    for row in range.rows().skip(1) {
        let Some(name) = row.first().and_then(cell_as_string) else {
            continue;
        };
        let by_locale: BTreeMap<String, String> = header
            .iter()
            .enumerate()
            .skip(1)
            .filter_map(|(i, locale)| {
                let text = row.get(i).and_then(cell_as_string)?;
                Some((locale.clone(), text))
            })
            .collect();
        materials.insert(name, by_locale);
    }

    (locales, materials)
}

fn read_prices(
    rates_sheet: &Range<Data>,
    prices_sheet: Option<&Range<Data>>,
    reference_currency: &str,
) -> Result<PriceTable, LabelkitError> {
    let mut currencies = Vec::new();
    let mut rates = BTreeMap::new();
    let mut decimal_places = BTreeMap::new();

    for row in rates_sheet.rows().skip(1) {
        let Some(currency) = row.first().and_then(cell_as_string) else {
            continue;
        };
        let currency = currency.to_uppercase();
        if currency != reference_currency {
            match row.get(1).and_then(cell_as_decimal) {
                Some(rate) => {
                    rates.insert(currency.clone(), rate);
                }
                None => warn!(currency = %currency, "no rate in workbook"),
            }
        }
        if let Some(places) = row.get(2).and_then(cell_as_decimal) {
            let places = places.to_u32().ok_or_else(|| {
                LabelkitError::Workbook(format!("invalid decimal places for {currency}"))
            })?;
            decimal_places.insert(currency.clone(), places);
        }
        currencies.push(currency);
    }

    let mut price_points = Vec::new();
    if let Some(sheet) = prices_sheet {
        let header: Vec<String> = header_row(sheet).iter().map(|h| h.to_uppercase()).collect();
        for row in sheet.rows().skip(1) {
            let point: BTreeMap<String, Decimal> = header
                .iter()
                .enumerate()
                .filter(|(_, h)| !h.is_empty())
                .filter_map(|(i, h)| Some((h.clone(), row.get(i).and_then(cell_as_decimal)?)))
                .collect();
            if point.contains_key(reference_currency) {
                price_points.push(point);
            }
        }
    }

    Ok(PriceTable {
        reference_currency: reference_currency.to_string(),
        currencies,
        rates,
        decimal_places,
        price_points,
    })
}

fn read_washing_codes(range: &Range<Data>) -> BTreeMap<String, WashingCode> {
    range
        .rows()
        .skip(1)
        .filter_map(|row| {
            let code = row.first().and_then(cell_as_string)?;
            let symbol_code = row.get(1).and_then(cell_as_string)?;
            let description = row.get(2).and_then(cell_as_string).unwrap_or_default();
            Some((
                code,
                WashingCode {
                    symbol_code,
                    description,
                },
            ))
        })
        .collect()
}

fn read_washing_rules(range: &Range<Data>) -> Vec<WashingRule> {
    range
        .rows()
        .skip(1)
        .filter_map(|row| {
            Some(WashingRule {
                material: row.first().and_then(cell_as_string)?,
                department: row.get(1).and_then(cell_as_string),
                code: row.get(2).and_then(cell_as_string)?,
            })
        })
        .collect()
}

fn read_suffixes(range: &Range<Data>) -> BTreeMap<String, String> {
    range
        .rows()
        .skip(1)
        .filter_map(|row| {
            Some((
                row.first().and_then(cell_as_string)?,
                row.get(1).and_then(cell_as_string)?,
            ))
        })
        .collect()
}

fn read_collections(range: &Range<Data>) -> Vec<CollectionGroup> {
    let mut groups: Vec<CollectionGroup> = Vec::new();
    for row in range.rows().skip(1) {
        let (Some(name), Some(source), Some(target)) = (
            row.first().and_then(cell_as_string),
            row.get(2).and_then(cell_as_string),
            row.get(3).and_then(cell_as_string),
        ) else {
            continue;
        };
        let classifications: Vec<String> = row
            .get(1)
            .and_then(cell_as_string)
            .map(|s| {
                s.split(';')
                    .map(|c| c.trim().to_lowercase())
                    .filter(|c| !c.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let alias = CollectionAlias { source, target };
        match groups.iter_mut().find(|g| g.name == name) {
            Some(group) => {
                for c in classifications {
                    if !group.classifications.contains(&c) {
                        group.classifications.push(c);
                    }
                }
                group.aliases.push(alias);
            }
            None => groups.push(CollectionGroup {
                name,
                classifications,
                aliases: vec![alias],
            }),
        }
    }
    groups
}

fn cell_as_string(cell: &Data) -> Option<String> {
    match cell {
        Data::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Data::Float(f) => Some(f.to_string()),
        Data::Int(i) => Some(i.to_string()),
        Data::Empty => None,
        _ => Some(format!("{cell}")),
    }
}

fn cell_as_decimal(cell: &Data) -> Option<Decimal> {
    match cell {
        Data::Float(f) => Some(f64_to_decimal(*f)),
        Data::Int(i) => Some(Decimal::from(*i)),
        Data::String(s) => s.trim().replace(',', ".").parse().ok(),
        _ => None,
    }
}

/// Convert f64 to Decimal through its shortest string form, so that a
/// cell holding 0.2345 does not become 0.23449999...
fn f64_to_decimal(f: f64) -> Decimal {
    let s = format!("{f}");
    s.parse::<Decimal>()
        .unwrap_or_else(|_| Decimal::try_from(f).unwrap_or_default())
}
