use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Errors raised by the collaborators around the rule engine
/// (extraction, parsing, lookup loading, export).
#[derive(Debug, thiserror::Error)]
pub enum LabelkitError {
    #[error("PDF extraction failed: {0}")]
    Extraction(String),

    #[error("pdftotext not found. Install poppler: brew install poppler (macOS) or apt install poppler-utils (Linux)")]
    PdftotextNotFound,

    #[error("pdftotext failed with exit code {code}: {stderr}")]
    PdftotextFailed { code: i32, stderr: String },

    #[error("failed to parse order sheet: {0}")]
    ParseError(String),

    #[error("failed to load lookup table from {path}: {reason}")]
    LookupLoad { path: PathBuf, reason: String },

    #[error("invalid lookup table: {0}")]
    LookupInvalid(String),

    #[error("failed to read workbook: {0}")]
    Workbook(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Rule(#[from] RuleError),

    #[error("{0} record(s) failed validation")]
    Rejected(usize),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Which part of a record a rule error concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Composition,
    WashingCode,
    Price,
    Product,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Composition => write!(f, "composition"),
            Field::WashingCode => write!(f, "washing_code"),
            Field::Price => write!(f, "price"),
            Field::Product => write!(f, "product"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleErrorKind {
    DuplicateMaterial,
    OverComposition,
    IncompleteComposition,
    UnmappedMaterial,
    InvalidPrice,
    MissingRate,
    InvalidPercentage,
    EmptyMaterialName,
    TooManyComponents,
    UnknownWashingCode,
    UnknownProduct,
}

/// A recoverable, operator-correctable rule violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RuleError {
    #[error("material '{material}' is already part of the composition")]
    DuplicateMaterial { material: String },

    #[error("adding {attempted}% to {current}% would exceed 100%")]
    OverComposition { current: Decimal, attempted: Decimal },

    #[error("composition totals {total}%, it must reach exactly 100%")]
    IncompleteComposition { total: Decimal },

    #[error("no washing code mapped for '{key}'")]
    UnmappedMaterial { key: String },

    #[error("invalid price: {reason}")]
    InvalidPrice { reason: String },

    #[error("no conversion rate for {}", currencies.join(", "))]
    MissingRate { currencies: Vec<String> },

    #[error("percentage {value} must be above 0 with at most 2 decimal places")]
    InvalidPercentage { value: Decimal },

    #[error("material name must not be empty")]
    EmptyMaterialName,

    #[error("composition already has the maximum of {max} materials")]
    TooManyComponents { max: usize },

    #[error("unknown washing code '{code}'")]
    UnknownWashingCode { code: String },

    #[error("no product '{product_type}' in department '{department}'")]
    UnknownProduct {
        department: String,
        product_type: String,
    },
}

impl RuleError {
    pub fn kind(&self) -> RuleErrorKind {
        match self {
            RuleError::DuplicateMaterial { .. } => RuleErrorKind::DuplicateMaterial,
            RuleError::OverComposition { .. } => RuleErrorKind::OverComposition,
            RuleError::IncompleteComposition { .. } => RuleErrorKind::IncompleteComposition,
            RuleError::UnmappedMaterial { .. } => RuleErrorKind::UnmappedMaterial,
            RuleError::InvalidPrice { .. } => RuleErrorKind::InvalidPrice,
            RuleError::MissingRate { .. } => RuleErrorKind::MissingRate,
            RuleError::InvalidPercentage { .. } => RuleErrorKind::InvalidPercentage,
            RuleError::EmptyMaterialName => RuleErrorKind::EmptyMaterialName,
            RuleError::TooManyComponents { .. } => RuleErrorKind::TooManyComponents,
            RuleError::UnknownWashingCode { .. } => RuleErrorKind::UnknownWashingCode,
            RuleError::UnknownProduct { .. } => RuleErrorKind::UnknownProduct,
        }
    }

    /// The record field an operator has to correct.
    pub fn field(&self) -> Field {
        match self {
            RuleError::DuplicateMaterial { .. }
            | RuleError::OverComposition { .. }
            | RuleError::IncompleteComposition { .. }
            | RuleError::InvalidPercentage { .. }
            | RuleError::EmptyMaterialName
            | RuleError::TooManyComponents { .. } => Field::Composition,
            RuleError::UnmappedMaterial { .. } | RuleError::UnknownWashingCode { .. } => {
                Field::WashingCode
            }
            RuleError::InvalidPrice { .. } | RuleError::MissingRate { .. } => Field::Price,
            RuleError::UnknownProduct { .. } => Field::Product,
        }
    }
}
