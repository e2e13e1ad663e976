#![forbid(unsafe_code)]

use super::transform::TransformRules;
use gs_core::schema::{HYPOTHESIS_PERCENT_FIELDS, HYPOTHESIS_REQUIRED_HEADERS};
use gs_core::{HeaderRow, Record};

/// Which table hosts the records and how incoming values are normalized.
#[derive(Clone, Debug, PartialEq)]
pub struct TableSchema {
    pub required_headers: Vec<String>,
    pub transforms: TransformRules,
}

impl TableSchema {
    pub fn new<S: Into<String>>(required_headers: impl IntoIterator<Item = S>) -> Self {
        Self {
            required_headers: required_headers.into_iter().map(Into::into).collect(),
            transforms: TransformRules::default(),
        }
    }

    pub fn with_transforms(mut self, transforms: TransformRules) -> Self {
        self.transforms = transforms;
        self
    }

    pub fn hypotheses() -> Self {
        Self::new(HYPOTHESIS_REQUIRED_HEADERS.iter().copied())
            .with_transforms(TransformRules::percent_fields(HYPOTHESIS_PERCENT_FIELDS.iter().copied()))
    }
}

impl Default for TableSchema {
    fn default() -> Self {
        Self::hypotheses()
    }
}

/// Decoded snapshot of a whole table, read in a single request.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TableSnapshot {
    pub table: String,
    pub headers: HeaderRow,
    pub records: Vec<Record>,
}

/// Confirmation of a successful row write.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpdateReceipt {
    pub table: String,
    pub id: String,
    /// 1-based sheet row that was rewritten.
    pub row_number: u32,
    pub range: String,
    pub applied: Vec<String>,
    pub ignored: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableDescription {
    pub table: String,
    pub headers: Vec<String>,
    pub id_column: Option<String>,
}
