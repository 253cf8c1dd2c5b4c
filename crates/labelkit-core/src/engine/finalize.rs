use tracing::{debug, info};

use crate::engine::composition::{composition_from_components, composition_from_hints};
use crate::engine::label::{product_label, product_names, resolve_collection};
use crate::engine::outcome::{FinalizedRow, ValidationErrorSet};
use crate::engine::{pricing, washing, EngineOptions};
use crate::error::RuleError;
use crate::lookup::schema::LookupTable;
use crate::model::DraftRecord;

/// Validate one draft record and build its export row.
///
/// Every check runs; the row is only built when none of them failed.
/// The entered components are replayed with `options`; when there are
/// none, the record's material hints are used instead.
pub fn finalize(
    draft: &DraftRecord,
    table: &LookupTable,
    options: &EngineOptions,
) -> Result<FinalizedRow, ValidationErrorSet> {
    let raw = &draft.raw;
    let mut errors = ValidationErrorSet::new();

    let product = table.product(&raw.department, &raw.product_type);
    if product.is_none() {
        errors.push(RuleError::UnknownProduct {
            department: raw.department.trim().to_string(),
            product_type: raw.product_type.trim().to_string(),
        });
    }

    let composition = if draft.composition.is_empty() && !raw.raw_material_hints.is_empty() {
        composition_from_hints(&raw.raw_material_hints, options)
    } else {
        composition_from_components(&draft.composition, options)
    };

    let washing_code = match &composition {
        Ok(composition) => {
            let code = match draft.washing_code.as_deref() {
                Some(code) => washing::resolve_override(table, composition, code),
                None => washing::resolve(table, composition, &raw.department),
            };
            code.map_err(|e| errors.push(e)).ok()
        }
        Err(e) => {
            errors.push(e.clone());
            None
        }
    };

    let price_ladder = match draft.base_price {
        Some(base_price) => pricing::generate(base_price, &table.prices)
            .map_err(|e| errors.push(e))
            .ok(),
        None => {
            errors.push(RuleError::InvalidPrice {
                reason: "base price is missing".into(),
            });
            None
        }
    };

    match (product, composition, washing_code, price_ladder) {
        (Some(product), Ok(composition), Some(washing_code), Some(price_ladder))
            if errors.is_empty() =>
        {
            let pass_through = raw.pass_through.clone();
            let collection = pass_through.collection.as_deref().map(|c| {
                resolve_collection(
                    table,
                    c,
                    pass_through.item_classification.as_deref().unwrap_or(""),
                )
            });

            debug!(order_id = %raw.order_id, barcode = %raw.barcode, "record finalized");
            Ok(FinalizedRow {
                order_id: raw.order_id.clone(),
                style: raw.style.clone(),
                colour: raw.colour.clone(),
                barcode: raw.barcode.clone(),
                department: raw.department.trim().to_string(),
                product_type: product.product_type.clone(),
                product_names: product_names(table, product),
                product_label: product_label(table, product, &composition),
                pure_cotton: composition.is_pure_cotton(),
                composition,
                washing_code,
                price_ladder,
                collection,
                pass_through,
            })
        }
        _ => {
            debug!(order_id = %raw.order_id, barcode = %raw.barcode, %errors, "record rejected");
            Err(errors)
        }
    }
}

/// Finalize a batch. Records are independent; one failure never affects
/// another, and results keep the input order.
pub fn finalize_all(
    drafts: &[DraftRecord],
    table: &LookupTable,
    options: &EngineOptions,
) -> Vec<Result<FinalizedRow, ValidationErrorSet>> {
    let results: Vec<_> = drafts
        .iter()
        .map(|draft| finalize(draft, table, options))
        .collect();
    let ok = results.iter().filter(|r| r.is_ok()).count();
    info!(total = results.len(), finalized = ok, "finalized batch");
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::composition::MaterialComponent;
    use crate::engine::MaterialNamePolicy;
    use crate::error::{Field, RuleErrorKind};
    use crate::lookup::builtin::default_table;
    use crate::model::{PassThrough, RawRecord};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn raw(department: &str, product_type: &str) -> RawRecord {
        RawRecord {
            order_id: "PO123".into(),
            style: "123456".into(),
            colour: "NAVY".into(),
            barcode: "5901234567890".into(),
            department: department.into(),
            product_type: product_type.into(),
            raw_material_hints: Vec::new(),
            pass_through: PassThrough {
                item_classification: Some("Mens Outerwear".into()),
                collection: Some("Little Sailor".into()),
                ..PassThrough::default()
            },
        }
    }

    fn composition(parts: &[(&str, Decimal)]) -> Vec<MaterialComponent> {
        parts
            .iter()
            .map(|(name, pct)| MaterialComponent {
                material: name.to_string(),
                percentage: *pct,
            })
            .collect()
    }

    fn draft(parts: &[(&str, Decimal)], price: Option<Decimal>) -> DraftRecord {
        DraftRecord {
            raw: raw("MEN", "Jacket"),
            composition: composition(parts),
            base_price: price,
            washing_code: None,
        }
    }

    #[test]
    fn test_valid_record_is_fully_populated() {
        let table = default_table().unwrap();
        let row = finalize(
            &draft(&[("Cotton", dec!(100))], Some(dec!(19.99))),
            &table,
            &EngineOptions::default(),
        )
        .unwrap();

        assert_eq!(row.order_id(), "PO123");
        assert_eq!(row.department(), "MEN");
        assert_eq!(row.washing_code().symbol_code, "djnst");
        assert_eq!(row.price_ladder().len(), table.prices.currencies.len());
        assert_eq!(row.price_ladder().get("EUR"), Some(dec!(4.99)));
        assert!(row.is_pure_cotton());
        assert_eq!(row.collection(), Some("MODERN 2"));
        assert!(row.product_label().starts_with("|EN| Jacket |AL| Xhaketë: 100% Pambuk"));
        assert_eq!(row.product_names()["HU"], "Kabát");
        assert!(row.composition().is_complete());
    }

    #[test]
    fn test_errors_are_aggregated() {
        let mut table = default_table().unwrap();
        table.prices.rates.remove("HUF");
        let err = finalize(
            &draft(&[("Silk", dec!(100))], Some(dec!(10))),
            &table,
            &EngineOptions::default(),
        )
        .unwrap_err();

        assert_eq!(err.len(), 2);
        assert!(err.contains(RuleErrorKind::UnmappedMaterial));
        assert!(err.contains(RuleErrorKind::MissingRate));
        assert_eq!(err.for_field(Field::WashingCode).count(), 1);
    }

    #[test]
    fn test_incomplete_composition_and_missing_price() {
        let table = default_table().unwrap();
        let err = finalize(
            &draft(&[("Cotton", dec!(60))], None),
            &table,
            &EngineOptions::default(),
        )
        .unwrap_err();
        let kinds: Vec<RuleErrorKind> = err.errors().iter().map(|e| e.error.kind()).collect();
        assert_eq!(
            kinds,
            vec![RuleErrorKind::IncompleteComposition, RuleErrorKind::InvalidPrice]
        );
    }

    #[test]
    fn test_unknown_product() {
        let table = default_table().unwrap();
        let mut d = draft(&[("Cotton", dec!(100))], Some(dec!(10)));
        d.raw.product_type = "Scarf".into();
        let err = finalize(&d, &table, &EngineOptions::default()).unwrap_err();
        assert_eq!(
            err.errors()[0].error,
            RuleError::UnknownProduct {
                department: "MEN".into(),
                product_type: "Scarf".into()
            }
        );
        assert_eq!(err.len(), 1);
    }

    #[test]
    fn test_hints_build_composition() {
        let table = default_table().unwrap();
        let mut d = draft(&[], Some(dec!(29.99)));
        d.raw.raw_material_hints = vec!["95% Polyester".into(), "5% Elastane".into()];
        let row = finalize(&d, &table, &EngineOptions::default()).unwrap();
        assert_eq!(row.washing_code().symbol_code, "gjnpt");
        assert!(!row.is_pure_cotton());

        d.raw.raw_material_hints = vec!["95% Polyester".into(), "10% Elastane".into()];
        let err = finalize(&d, &table, &EngineOptions::default()).unwrap_err();
        assert!(err.contains(RuleErrorKind::OverComposition));
        assert!(!err.contains(RuleErrorKind::IncompleteComposition));
    }

    #[test]
    fn test_washing_override() {
        let table = default_table().unwrap();
        let mut d = draft(&[("Silk", dec!(100))], Some(dec!(10)));
        d.washing_code = Some("15".into());
        assert_eq!(
            finalize(&d, &table, &EngineOptions::default())
                .unwrap()
                .washing_code()
                .symbol_code,
            "djnsw"
        );

        d.washing_code = Some("99".into());
        let err = finalize(&d, &table, &EngineOptions::default()).unwrap_err();
        assert!(err.contains(RuleErrorKind::UnknownWashingCode));
    }

    #[test]
    fn test_finalize_all_isolates_records() {
        let table = default_table().unwrap();
        let drafts = vec![
            draft(&[("Cotton", dec!(100))], Some(dec!(10))),
            draft(&[("Cotton", dec!(50))], Some(dec!(10))),
            draft(&[("Wool", dec!(100))], Some(dec!(10))),
        ];
        let results = finalize_all(&drafts, &table, &EngineOptions::default());
        assert_eq!(results.len(), 3);
        assert!(results[0].is_ok());
        assert!(results[1].is_err());
        assert_eq!(results[2].as_ref().unwrap().washing_code().symbol_code, "ijnsv");
    }

    #[test]
    fn test_bad_saved_composition_rejects_only_its_record() {
        let table = default_table().unwrap();
        let json = r#"[
            {"raw": {"order_id": "PO1", "style": "1", "colour": "RED", "barcode": "1",
                     "department": "MEN", "product_type": "Jacket"},
             "composition": [{"material": "Wool", "percentage": "100"}],
             "base_price": "10"},
            {"raw": {"order_id": "PO2", "style": "2", "colour": "RED", "barcode": "2",
                     "department": "MEN", "product_type": "Jacket"},
             "composition": [{"material": "Wool", "percentage": "60"},
                             {"material": "Cotton", "percentage": "60"}],
             "base_price": "10"}
        ]"#;
        let drafts: Vec<DraftRecord> = serde_json::from_str(json).unwrap();

        let results = finalize_all(&drafts, &table, &EngineOptions::default());
        assert!(results[0].is_ok());
        let err = results[1].as_ref().unwrap_err();
        assert_eq!(err.len(), 1);
        assert_eq!(err.errors()[0].field, Field::Composition);
        assert!(err.contains(RuleErrorKind::OverComposition));
    }

    #[test]
    fn test_saved_composition_uses_configured_policy() {
        let table = default_table().unwrap();
        let d = draft(&[("Cotton", dec!(50)), ("cotton", dec!(50))], Some(dec!(19.99)));

        let err = finalize(&d, &table, &EngineOptions::default()).unwrap_err();
        assert!(err.contains(RuleErrorKind::DuplicateMaterial));

        let options = EngineOptions {
            material_name_policy: MaterialNamePolicy::CaseSensitive,
            ..EngineOptions::default()
        };
        let row = finalize(&d, &table, &options).unwrap();
        assert_eq!(row.composition().components().len(), 2);
    }
}
