use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::engine::composition::MaterialComposition;
use crate::engine::pricing::PriceLadder;
use crate::error::{Field, RuleError, RuleErrorKind};
use crate::lookup::schema::WashingCode;
use crate::model::PassThrough;

/// One rule violation, keyed by the field it concerns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: Field,
    pub error: RuleError,
}

impl From<RuleError> for FieldError {
    fn from(error: RuleError) -> Self {
        FieldError {
            field: error.field(),
            error,
        }
    }
}

/// Every reason a record could not be finalized, in check order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrorSet {
    errors: Vec<FieldError>,
}

impl ValidationErrorSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: RuleError) {
        self.errors.push(error.into());
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn contains(&self, kind: RuleErrorKind) -> bool {
        self.errors.iter().any(|e| e.error.kind() == kind)
    }

    pub fn for_field(&self, field: Field) -> impl Iterator<Item = &RuleError> {
        self.errors
            .iter()
            .filter(move |e| e.field == field)
            .map(|e| &e.error)
    }
}

impl fmt::Display for ValidationErrorSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.errors.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", e.field, e.error)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrorSet {}

/// A validated, export-ready record. Only `finalize` builds one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FinalizedRow {
    pub(crate) order_id: String,
    pub(crate) style: String,
    pub(crate) colour: String,
    pub(crate) barcode: String,
    pub(crate) department: String,
    pub(crate) product_type: String,
    pub(crate) product_names: BTreeMap<String, String>,
    pub(crate) product_label: String,
    pub(crate) composition: MaterialComposition,
    pub(crate) washing_code: WashingCode,
    pub(crate) price_ladder: PriceLadder,
    pub(crate) collection: Option<String>,
    pub(crate) pure_cotton: bool,
    pub(crate) pass_through: PassThrough,
}

impl FinalizedRow {
    pub fn order_id(&self) -> &str {
        &self.order_id
    }

    pub fn style(&self) -> &str {
        &self.style
    }

    pub fn colour(&self) -> &str {
        &self.colour
    }

    pub fn barcode(&self) -> &str {
        &self.barcode
    }

    pub fn department(&self) -> &str {
        &self.department
    }

    pub fn product_type(&self) -> &str {
        &self.product_type
    }

    /// Locale -> translated product name.
    pub fn product_names(&self) -> &BTreeMap<String, String> {
        &self.product_names
    }

    /// Multi-locale label text, `|EN| ... |AL| ...`.
    pub fn product_label(&self) -> &str {
        &self.product_label
    }

    pub fn composition(&self) -> &MaterialComposition {
        &self.composition
    }

    pub fn washing_code(&self) -> &WashingCode {
        &self.washing_code
    }

    pub fn price_ladder(&self) -> &PriceLadder {
        &self.price_ladder
    }

    /// Collection after alias renaming, when the sheet had one.
    pub fn collection(&self) -> Option<&str> {
        self.collection.as_deref()
    }

    pub fn is_pure_cotton(&self) -> bool {
        self.pure_cotton
    }

    pub fn pass_through(&self) -> &PassThrough {
        &self.pass_through
    }
}
