use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::engine::{EngineOptions, MaterialNamePolicy};
use crate::error::RuleError;

/// Percentages are compared at this many decimal places.
pub const PERCENT_SCALE: u32 = 2;

const FULL: Decimal = Decimal::ONE_HUNDRED;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialComponent {
    pub material: String,
    pub percentage: Decimal,
}

/// Materials and their shares, in the order the operator entered them.
///
/// Only `add_component` grows a composition, so the sum never exceeds 100
/// and `complete` is set exactly when it reaches 100. Serialized as the
/// component list; see `composition_from_components` for the way back.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(into = "Vec<MaterialComponent>")]
pub struct MaterialComposition {
    components: Vec<MaterialComponent>,
    complete: bool,
}

/// Result of one successful `add_component` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositionStep {
    pub composition: MaterialComposition,
    /// False means the caller should prompt for another component.
    pub is_complete: bool,
}

impl MaterialComposition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn components(&self) -> &[MaterialComponent] {
        &self.components
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn total(&self) -> Decimal {
        self.components.iter().map(|c| c.percentage).sum()
    }

    /// Share still missing to reach 100%.
    pub fn remaining(&self) -> Decimal {
        FULL - self.total()
    }

    /// Component with the largest share; the earliest one wins ties.
    pub fn dominant(&self) -> Option<&MaterialComponent> {
        self.components.iter().fold(None, |best, c| match best {
            Some(b) if b.percentage >= c.percentage => Some(b),
            _ => Some(c),
        })
    }

    /// A single cotton component at 100%.
    pub fn is_pure_cotton(&self) -> bool {
        self.complete
            && self.components.len() == 1
            && self.components[0].material.trim().eq_ignore_ascii_case("cotton")
    }

    fn contains_material(&self, material: &str, policy: MaterialNamePolicy) -> bool {
        self.components.iter().any(|c| match policy {
            MaterialNamePolicy::CaseInsensitive => c.material.to_lowercase() == material.to_lowercase(),
            MaterialNamePolicy::CaseSensitive => c.material == material,
        })
    }
}

impl From<MaterialComposition> for Vec<MaterialComponent> {
    fn from(composition: MaterialComposition) -> Self {
        composition.components
    }
}

/// Add one component, returning the grown composition.
///
/// The input composition is never modified; on error the caller keeps
/// using the value it already has.
pub fn add_component(
    composition: &MaterialComposition,
    material: &str,
    percentage: Decimal,
    options: &EngineOptions,
) -> Result<CompositionStep, RuleError> {
    let material = material.trim();
    if material.is_empty() {
        return Err(RuleError::EmptyMaterialName);
    }

    let percentage = percentage.normalize();
    if percentage <= Decimal::ZERO || percentage.scale() > PERCENT_SCALE {
        return Err(RuleError::InvalidPercentage { value: percentage });
    }

    let current = composition.total();
    if composition.complete || percentage > composition.remaining() {
        return Err(RuleError::OverComposition {
            current,
            attempted: percentage,
        });
    }

    if composition.contains_material(material, options.material_name_policy) {
        return Err(RuleError::DuplicateMaterial {
            material: material.to_string(),
        });
    }

    if composition.components.len() >= options.max_components {
        return Err(RuleError::TooManyComponents {
            max: options.max_components,
        });
    }

    let mut components = composition.components.clone();
    components.push(MaterialComponent {
        material: material.to_string(),
        percentage,
    });
    let total = current + percentage;
    let complete = total == FULL;

    debug!(material, %percentage, %total, complete, "added component");

    Ok(CompositionStep {
        composition: MaterialComposition {
            components,
            complete,
        },
        is_complete: complete,
    })
}

/// Replay saved components through `add_component`, in order.
///
/// The first rejected component aborts.
pub fn composition_from_components(
    components: &[MaterialComponent],
    options: &EngineOptions,
) -> Result<MaterialComposition, RuleError> {
    components
        .iter()
        .try_fold(MaterialComposition::new(), |acc, c| {
            add_component(&acc, &c.material, c.percentage, options).map(|s| s.composition)
        })
}

/// Build a composition from operator hints such as "60% cotton",
/// "cotton 60%" or "cotton=60", applied in order through `add_component`.
///
/// The result may be incomplete; the first rejected hint aborts.
pub fn composition_from_hints(
    hints: &[String],
    options: &EngineOptions,
) -> Result<MaterialComposition, RuleError> {
    let mut composition = MaterialComposition::new();
    for hint in hints {
        let (material, percentage) = parse_hint(hint).ok_or(RuleError::EmptyMaterialName)?;
        composition = add_component(&composition, &material, percentage, options)?.composition;
    }
    Ok(composition)
}

/// Split a hint into material name and percentage.
///
/// Returns `None` when no material name is present. A hint with a name but
/// no number is read as 100%.
fn parse_hint(hint: &str) -> Option<(String, Decimal)> {
    let cleaned = hint.replace(['%', '='], " ").replace(',', ".");
    let mut number = None;
    let mut words = Vec::new();

    for token in cleaned.split_whitespace() {
        match token.parse::<Decimal>() {
            Ok(n) if number.is_none() => number = Some(n),
            _ => words.push(token),
        }
    }

    if words.is_empty() {
        return None;
    }
    Some((words.join(" "), number.unwrap_or(FULL)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RuleErrorKind;
    use rust_decimal_macros::dec;

    fn opts() -> EngineOptions {
        EngineOptions::default()
    }

    fn add(c: &MaterialComposition, name: &str, pct: Decimal) -> Result<CompositionStep, RuleError> {
        add_component(c, name, pct, &opts())
    }

    #[test]
    fn test_single_component_completes() {
        let step = add(&MaterialComposition::new(), "Cotton", dec!(100)).unwrap();
        assert!(step.is_complete);
        assert_eq!(step.composition.components().len(), 1);
        assert_eq!(step.composition.remaining(), dec!(0));
        assert!(step.composition.is_pure_cotton());
    }

    #[test]
    fn test_partial_then_complete() {
        let first = add(&MaterialComposition::new(), "Cotton", dec!(60)).unwrap();
        assert!(!first.is_complete);
        assert_eq!(first.composition.remaining(), dec!(40));

        let second = add(&first.composition, "Polyester", dec!(40)).unwrap();
        assert!(second.is_complete);
        assert!(!second.composition.is_pure_cotton());
        let names: Vec<&str> = second
            .composition
            .components()
            .iter()
            .map(|c| c.material.as_str())
            .collect();
        assert_eq!(names, vec!["Cotton", "Polyester"]);
    }

    #[test]
    fn test_over_composition_leaves_input_untouched() {
        let first = add(&MaterialComposition::new(), "Cotton", dec!(70)).unwrap();
        let before = first.composition.clone();
        let err = add(&first.composition, "Polyester", dec!(40)).unwrap_err();
        assert_eq!(err.kind(), RuleErrorKind::OverComposition);
        assert_eq!(first.composition, before);
    }

    #[test]
    fn test_complete_composition_is_sealed() {
        let done = add(&MaterialComposition::new(), "Cotton", dec!(100)).unwrap();
        let err = add(&done.composition, "Elastane", dec!(0.01)).unwrap_err();
        assert_eq!(err.kind(), RuleErrorKind::OverComposition);
    }

    #[test]
    fn test_duplicate_case_insensitive_by_default() {
        let first = add(&MaterialComposition::new(), "Cotton", dec!(50)).unwrap();
        let err = add(&first.composition, "cotton", dec!(10)).unwrap_err();
        assert_eq!(err.kind(), RuleErrorKind::DuplicateMaterial);
    }

    #[test]
    fn test_duplicate_case_sensitive_policy() {
        let options = EngineOptions {
            material_name_policy: MaterialNamePolicy::CaseSensitive,
            ..EngineOptions::default()
        };
        let first = add_component(&MaterialComposition::new(), "Cotton", dec!(50), &options).unwrap();
        let second = add_component(&first.composition, "cotton", dec!(50), &options).unwrap();
        assert!(second.is_complete);
        let err = add_component(&first.composition, "Cotton", dec!(10), &options).unwrap_err();
        assert_eq!(err.kind(), RuleErrorKind::DuplicateMaterial);
    }

    #[test]
    fn test_invalid_percentages() {
        let empty = MaterialComposition::new();
        for pct in [dec!(0), dec!(-5), dec!(33.333)] {
            let err = add(&empty, "Cotton", pct).unwrap_err();
            assert_eq!(err.kind(), RuleErrorKind::InvalidPercentage, "{pct}");
        }
        // Trailing zeros are not extra precision.
        assert!(add(&empty, "Cotton", dec!(50.500)).is_ok());
    }

    #[test]
    fn test_empty_material_rejected() {
        let err = add(&MaterialComposition::new(), "   ", dec!(10)).unwrap_err();
        assert_eq!(err, RuleError::EmptyMaterialName);
    }

    #[test]
    fn test_fractional_shares_reach_exactly_100() {
        let mut c = MaterialComposition::new();
        for (name, pct) in [("A", dec!(33.33)), ("B", dec!(33.33)), ("C", dec!(33.34))] {
            c = add(&c, name, pct).unwrap().composition;
        }
        assert!(c.is_complete());
        assert_eq!(c.total(), dec!(100));
    }

    #[test]
    fn test_max_components() {
        let mut c = MaterialComposition::new();
        for name in ["A", "B", "C", "D", "E"] {
            c = add(&c, name, dec!(10)).unwrap().composition;
        }
        let err = add(&c, "F", dec!(10)).unwrap_err();
        assert_eq!(err, RuleError::TooManyComponents { max: 5 });
    }

    #[test]
    fn test_dominant_prefers_first_on_tie() {
        let mut c = MaterialComposition::new();
        for (name, pct) in [("Viscose", dec!(20)), ("Cotton", dec!(40)), ("Wool", dec!(40))] {
            c = add(&c, name, pct).unwrap().composition;
        }
        assert_eq!(c.dominant().unwrap().material, "Cotton");
        assert!(MaterialComposition::new().dominant().is_none());
    }

    #[test]
    fn test_huge_percentage_is_over_composition() {
        let half = add(&MaterialComposition::new(), "Cotton", dec!(50)).unwrap();
        let err = add(&half.composition, "Wool", Decimal::MAX).unwrap_err();
        assert_eq!(
            err,
            RuleError::OverComposition {
                current: dec!(50),
                attempted: Decimal::MAX,
            }
        );

        let hints = vec![
            "50% cotton".to_string(),
            "79228162514264337593543950335 wool".to_string(),
        ];
        assert_eq!(
            composition_from_hints(&hints, &opts()).unwrap_err().kind(),
            RuleErrorKind::OverComposition
        );
    }

    #[test]
    fn test_components_replay_with_given_options() {
        let saved: Vec<MaterialComponent> = serde_json::from_str(
            r#"[{"material":"Cotton","percentage":"50"},{"material":"cotton","percentage":"50"}]"#,
        )
        .unwrap();

        let err = composition_from_components(&saved, &opts()).unwrap_err();
        assert_eq!(err.kind(), RuleErrorKind::DuplicateMaterial);

        let case_sensitive = EngineOptions {
            material_name_policy: MaterialNamePolicy::CaseSensitive,
            ..EngineOptions::default()
        };
        let c = composition_from_components(&saved, &case_sensitive).unwrap();
        assert!(c.is_complete());
        assert_eq!(serde_json::to_value(&c).unwrap()[1]["material"], "cotton");
    }

    #[test]
    fn test_components_replay_respects_max_components() {
        let saved: Vec<MaterialComponent> = ["A", "B", "C", "D", "E", "F"]
            .iter()
            .map(|m| MaterialComponent {
                material: m.to_string(),
                percentage: dec!(10),
            })
            .collect();
        assert_eq!(
            composition_from_components(&saved, &opts()).unwrap_err(),
            RuleError::TooManyComponents { max: 5 }
        );

        let roomy = EngineOptions {
            max_components: 8,
            ..EngineOptions::default()
        };
        let c = composition_from_components(&saved, &roomy).unwrap();
        assert_eq!(c.remaining(), dec!(40));
    }

    #[test]
    fn test_parse_hint_forms() {
        assert_eq!(parse_hint("60% cotton"), Some(("cotton".into(), dec!(60))));
        assert_eq!(parse_hint("Cotton 60%"), Some(("Cotton".into(), dec!(60))));
        assert_eq!(parse_hint("cotton=40,5"), Some(("cotton".into(), dec!(40.5))));
        assert_eq!(
            parse_hint("organic cotton"),
            Some(("organic cotton".into(), dec!(100)))
        );
        assert_eq!(parse_hint("60%"), None);
    }

    #[test]
    fn test_composition_from_hints() {
        let hints = vec!["60% Cotton".to_string(), "Polyester 40%".to_string()];
        let c = composition_from_hints(&hints, &opts()).unwrap();
        assert!(c.is_complete());
        assert_eq!(c.components()[1].material, "Polyester");

        let partial = composition_from_hints(&["60% Cotton".to_string()], &opts()).unwrap();
        assert!(!partial.is_complete());

        let bad = vec!["60% Cotton".to_string(), "50% Wool".to_string()];
        assert_eq!(
            composition_from_hints(&bad, &opts()).unwrap_err().kind(),
            RuleErrorKind::OverComposition
        );
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        /// Split 10000 hundredths into `n` positive parts.
        fn shares(cuts: Vec<u32>) -> Vec<Decimal> {
            let mut points: Vec<u32> = cuts.into_iter().map(|c| c % 9999 + 1).collect();
            points.sort_unstable();
            points.dedup();
            let mut out = Vec::new();
            let mut prev = 0;
            for p in points.into_iter().chain(std::iter::once(10000)) {
                out.push(Decimal::new(i64::from(p - prev), 2));
                prev = p;
            }
            out
        }

        proptest! {
            /// Property: shares summing to exactly 100 complete the
            /// composition with every component kept in order.
            #[test]
            fn full_sequences_complete(cuts in prop::collection::vec(any::<u32>(), 0..4)) {
                let parts = shares(cuts);
                let mut c = MaterialComposition::new();
                for (i, pct) in parts.iter().enumerate() {
                    let step = add(&c, &format!("m{i}"), *pct).unwrap();
                    prop_assert_eq!(step.is_complete, i + 1 == parts.len());
                    c = step.composition;
                }
                prop_assert!(c.is_complete());
                prop_assert_eq!(c.components().len(), parts.len());
                for (i, comp) in c.components().iter().enumerate() {
                    prop_assert_eq!(&comp.material, &format!("m{i}"));
                    prop_assert_eq!(comp.percentage, parts[i]);
                }
            }

            /// Property: below 100 nothing completes and another add is accepted.
            #[test]
            fn partial_sequences_stay_open(cuts in prop::collection::vec(any::<u32>(), 1..4)) {
                let parts = shares(cuts);
                let mut c = MaterialComposition::new();
                for (i, pct) in parts[..parts.len() - 1].iter().enumerate() {
                    let step = add(&c, &format!("m{i}"), *pct).unwrap();
                    prop_assert!(!step.is_complete);
                    c = step.composition;
                }
                let remaining = c.remaining();
                prop_assert!(remaining > Decimal::ZERO);
                prop_assert!(add(&c, "last", remaining).is_ok());
            }

            /// Property: an overflowing add is rejected and repeatable.
            #[test]
            fn overflow_is_rejected_idempotently(
                first in 1u32..10000,
                extra in 1u32..10000,
            ) {
                let c = add(&MaterialComposition::new(), "a", Decimal::new(i64::from(first), 2))
                    .unwrap()
                    .composition;
                let over = c.remaining() + Decimal::new(i64::from(extra), 2);
                let before = c.clone();
                let e1 = add(&c, "b", over).unwrap_err();
                let e2 = add(&c, "b", over).unwrap_err();
                prop_assert_eq!(e1.kind(), RuleErrorKind::OverComposition);
                prop_assert_eq!(e1, e2);
                prop_assert_eq!(c, before);
            }
        }
    }
}
