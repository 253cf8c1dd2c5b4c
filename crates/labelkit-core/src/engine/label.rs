use std::collections::BTreeMap;

use crate::engine::composition::MaterialComposition;
use crate::lookup::schema::{LookupTable, ProductEntry};

const BOYS_OUTERWEAR: [&str; 2] = ["younger boys outerwear", "older boys outerwear"];
const GIRLS_OUTERWEAR: [&str; 2] = ["younger girls outerwear", "older girls outerwear"];

/// Product name for every locale of the table, falling back to the
/// product type where a translation is missing.
pub fn product_names(table: &LookupTable, product: &ProductEntry) -> BTreeMap<String, String> {
    table
        .locales
        .iter()
        .map(|locale| (locale.clone(), translation(product, locale)))
        .collect()
}

fn translation(product: &ProductEntry, locale: &str) -> String {
    product
        .translations
        .get(locale)
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .unwrap_or(product.product_type.trim())
        .to_string()
}

/// Composition text for one locale, e.g. `60% Pamuk, 40% Poliester`.
///
/// Materials without a translation for the locale are left out; `None`
/// when nothing is left.
pub fn composition_text(
    table: &LookupTable,
    composition: &MaterialComposition,
    locale: &str,
) -> Option<String> {
    let parts: Vec<String> = composition
        .components()
        .iter()
        .filter_map(|c| {
            table
                .material_translation(&c.material, locale)
                .map(|name| format!("{}% {}", c.percentage.normalize(), name))
        })
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(", "))
    }
}

/// Multi-locale label text: `|EN| Dress |AL| Fustan: 100% Pambuk ...`.
pub fn product_label(
    table: &LookupTable,
    product: &ProductEntry,
    composition: &MaterialComposition,
) -> String {
    table
        .locales
        .iter()
        .map(|locale| {
            let mut text = translation(product, locale);
            if table.composition_locales.contains(locale) {
                if let Some(materials) = composition_text(table, composition, locale) {
                    text = format!("{text}: {materials}");
                }
            }
            if let Some(suffix) = table.locale_suffixes.get(locale) {
                if !text.ends_with('.') {
                    text.push('.');
                }
                text.push(' ');
                text.push_str(suffix.trim());
            }
            format!("|{locale}| {text}")
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Rename a collection through the alias group of its item classification,
/// then mark boys' and girls' outerwear with ` B` / ` G`.
pub fn resolve_collection(table: &LookupTable, collection: &str, item_classification: &str) -> String {
    let class = item_classification.trim().to_lowercase();
    let mut resolved = collection.trim().to_string();

    let group = table.collections.iter().find(|g| {
        g.classifications
            .iter()
            .any(|c| class.contains(&c.trim().to_lowercase()))
    });
    if let Some(group) = group {
        let upper = resolved.to_uppercase();
        if let Some(alias) = group
            .aliases
            .iter()
            .find(|a| upper.contains(&a.source.trim().to_uppercase()))
        {
            resolved = alias.target.clone();
        }
    }

    if BOYS_OUTERWEAR.iter().any(|c| class.contains(c)) {
        resolved.push_str(" B");
    } else if GIRLS_OUTERWEAR.iter().any(|c| class.contains(c)) {
        resolved.push_str(" G");
    }
    resolved
}
