#![forbid(unsafe_code)]

use crate::store::GridError;
use gs_core::{A1Range, CellValue};
use serde_json::{Number, Value};

/// Row-major cell values. Rows may be ragged; trailing empties are usually omitted.
pub type Grid = Vec<Vec<CellValue>>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WriteMode {
    /// Store values verbatim.
    Raw,
    /// Parse values as if typed into the UI (numeric text becomes a number, etc).
    UserEntered,
}

impl WriteMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Raw => "RAW",
            Self::UserEntered => "USER_ENTERED",
        }
    }
}

/// Key-range read/write access to a multi-table document.
pub trait GridSource {
    /// Table names in document order.
    fn list_tables(&self) -> Result<Vec<String>, GridError>;

    fn read_range(&self, range: &A1Range) -> Result<Grid, GridError>;

    fn write_range(
        &mut self,
        range: &A1Range,
        values: Grid,
        mode: WriteMode,
    ) -> Result<(), GridError>;
}

impl<G: GridSource + ?Sized> GridSource for Box<G> {
    fn list_tables(&self) -> Result<Vec<String>, GridError> {
        (**self).list_tables()
    }

    fn read_range(&self, range: &A1Range) -> Result<Grid, GridError> {
        (**self).read_range(range)
    }

    fn write_range(
        &mut self,
        range: &A1Range,
        values: Grid,
        mode: WriteMode,
    ) -> Result<(), GridError> {
        (**self).write_range(range, values, mode)
    }
}

/// Scalars only; arrays and objects return `None`.
pub fn cell_from_json(value: &Value) -> Option<CellValue> {
    match value {
        Value::Null => Some(CellValue::Empty),
        Value::String(v) => Some(CellValue::Text(v.clone())),
        Value::Bool(v) => Some(CellValue::Bool(*v)),
        Value::Number(n) => n.as_f64().map(CellValue::Number),
        Value::Array(_) | Value::Object(_) => None,
    }
}

pub fn cell_to_json(cell: &CellValue) -> Value {
    match cell {
        CellValue::Empty => Value::String(String::new()),
        CellValue::Text(v) => Value::String(v.clone()),
        CellValue::Bool(v) => Value::Bool(*v),
        CellValue::Number(n) => {
            if n.fract() == 0.0 && n.abs() < 9.0e15 {
                Value::Number(Number::from(*n as i64))
            } else {
                Number::from_f64(*n)
                    .map(Value::Number)
                    .unwrap_or_else(|| Value::String(cell.as_text().into_owned()))
            }
        }
    }
}

/// Parse text the way the sheet UI does for typed input. A leading `'`
/// forces the rest to be stored as literal text.
pub fn interpret_user_entered(cell: CellValue) -> CellValue {
    let text = match cell {
        CellValue::Text(text) => text,
        other => return other,
    };
    if let Some(literal) = text.strip_prefix('\'') {
        return CellValue::Text(literal.to_string());
    }
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return CellValue::Empty;
    }
    if trimmed.eq_ignore_ascii_case("true") {
        return CellValue::Bool(true);
    }
    if trimmed.eq_ignore_ascii_case("false") {
        return CellValue::Bool(false);
    }
    if let Some(percent) = trimmed.strip_suffix('%')
        && let Ok(n) = percent.trim().parse::<f64>()
        && n.is_finite()
    {
        return CellValue::Number(n / 100.0);
    }
    match trimmed.parse::<f64>() {
        Ok(n) if n.is_finite() => CellValue::Number(n),
        _ => CellValue::Text(text),
    }
}

/// Text that [`interpret_user_entered`] would change gets the `'` prefix, so
/// the cell reads back exactly as given.
pub fn literal_user_entered(cell: CellValue) -> CellValue {
    match cell {
        CellValue::Text(text) if !text.is_empty() => {
            let original = CellValue::Text(text);
            if interpret_user_entered(original.clone()) == original {
                original
            } else {
                CellValue::Text(format!("'{original}"))
            }
        }
        other => other,
    }
}

pub fn grid_to_json(grid: &Grid) -> Value {
    Value::Array(
        grid.iter()
            .map(|row| Value::Array(row.iter().map(cell_to_json).collect()))
            .collect(),
    )
}

/// Decode a `values` payload (`[[cell, ...], ...]`).
pub(crate) fn grid_from_json(value: &Value) -> Result<Grid, GridError> {
    let Some(rows) = value.as_array() else {
        return Err(GridError::Malformed("values must be an array of rows".to_string()));
    };
    let mut grid = Vec::with_capacity(rows.len());
    for (row_index, row) in rows.iter().enumerate() {
        let Some(cells) = row.as_array() else {
            return Err(GridError::Malformed(format!("row {row_index} is not an array")));
        };
        let mut out = Vec::with_capacity(cells.len());
        for (col_index, cell) in cells.iter().enumerate() {
            let Some(cell) = cell_from_json(cell) else {
                return Err(GridError::Malformed(format!(
                    "cell {}{} is not a scalar",
                    gs_core::index_to_letter(col_index),
                    row_index + 1
                )));
            };
            out.push(cell);
        }
        grid.push(out);
    }
    Ok(grid)
}
