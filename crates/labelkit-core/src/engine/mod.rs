pub mod composition;
pub mod finalize;
pub mod label;
pub mod outcome;
pub mod pricing;
pub mod washing;

use serde::{Deserialize, Serialize};

pub use composition::{
    add_component, composition_from_components, CompositionStep, MaterialComponent,
    MaterialComposition,
};
pub use finalize::{finalize, finalize_all};
pub use outcome::{FieldError, FinalizedRow, ValidationErrorSet};
pub use pricing::{generate, PriceLadder, PriceLadderEntry};

/// How material names are compared when checking for duplicates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MaterialNamePolicy {
    /// "Cotton" and "cotton" are the same material.
    #[default]
    CaseInsensitive,
    CaseSensitive,
}

/// Options controlling rule evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineOptions {
    pub material_name_policy: MaterialNamePolicy,
    /// Upper bound on components per composition.
    pub max_components: usize,
}

pub const DEFAULT_MAX_COMPONENTS: usize = 5;

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            material_name_policy: MaterialNamePolicy::default(),
            max_components: DEFAULT_MAX_COMPONENTS,
        }
    }
}
