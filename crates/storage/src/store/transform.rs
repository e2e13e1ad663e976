#![forbid(unsafe_code)]

use super::StoreError;
use gs_core::{CellValue, FieldUpdates};

/// Per-field normalization applied to incoming update values before they are written.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ValueTransform {
    /// `0..=100` percent in the request, `0..=1` fraction in the grid.
    PercentToFraction { field: String },
}

impl ValueTransform {
    pub fn field(&self) -> &str {
        match self {
            Self::PercentToFraction { field } => field,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::PercentToFraction { field } => format!("{field}: percent -> fraction"),
        }
    }

    fn apply(&self, value: &CellValue) -> Result<CellValue, StoreError> {
        match self {
            Self::PercentToFraction { field } => percent_to_fraction(field, value),
        }
    }
}

fn percent_to_fraction(field: &str, value: &CellValue) -> Result<CellValue, StoreError> {
    let percent = match value {
        CellValue::Number(n) => *n,
        // "80%" is already understood by the sheet when entered as user input.
        CellValue::Text(text) if text.trim().ends_with('%') => return Ok(value.clone()),
        CellValue::Text(text) => match text.trim().parse::<f64>() {
            Ok(n) => n,
            Err(_) if text.trim().is_empty() => return Ok(value.clone()),
            Err(_) => {
                return Err(StoreError::InvalidInput(format!(
                    "{field} must be a number between 0 and 100 (got {text:?})"
                )));
            }
        },
        CellValue::Empty => return Ok(CellValue::Empty),
        CellValue::Bool(_) => {
            return Err(StoreError::InvalidInput(format!(
                "{field} must be a number between 0 and 100"
            )));
        }
    };
    if !percent.is_finite() || !(0.0..=100.0).contains(&percent) {
        return Err(StoreError::InvalidInput(format!(
            "{field} must be between 0 and 100 (got {percent})"
        )));
    }
    Ok(CellValue::Number(percent / 100.0))
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransformRules {
    rules: Vec<ValueTransform>,
}

impl TransformRules {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn percent_fields<S: Into<String>>(fields: impl IntoIterator<Item = S>) -> Self {
        Self {
            rules: fields
                .into_iter()
                .map(|field| ValueTransform::PercentToFraction {
                    field: field.into(),
                })
                .collect(),
        }
    }

    pub fn rules(&self) -> &[ValueTransform] {
        &self.rules
    }

    /// Rewrites only the fields present in `updates`; stored values are never touched.
    pub fn apply(&self, updates: &FieldUpdates) -> Result<FieldUpdates, StoreError> {
        let mut out = updates.clone();
        for rule in &self.rules {
            if let Some(value) = out.get_mut(rule.field()) {
                *value = rule.apply(value)?;
            }
        }
        Ok(out)
    }
}
