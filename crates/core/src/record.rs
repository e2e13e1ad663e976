#![forbid(unsafe_code)]

use crate::cell::CellValue;
use crate::schema::is_id_header;
use std::collections::BTreeMap;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HeaderError {
    Duplicate { name: String, first: usize, second: usize },
}

impl std::fmt::Display for HeaderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Duplicate {
                name,
                first,
                second,
            } => write!(
                f,
                "duplicate header {name:?} in columns {} and {}",
                crate::index_to_letter(*first),
                crate::index_to_letter(*second)
            ),
        }
    }
}

impl std::error::Error for HeaderError {}

/// Row 0 of a table: trimmed field names in column order.
///
/// Blank names are kept as positional placeholders so a rewritten row stays
/// aligned, but they are never addressable by name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HeaderRow {
    names: Vec<String>,
}

impl HeaderRow {
    pub fn parse<I, S>(cells: I) -> Result<Self, HeaderError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names = cells
            .into_iter()
            .map(|cell| cell.as_ref().trim().to_string())
            .collect::<Vec<_>>();
        for (second, name) in names.iter().enumerate() {
            if name.is_empty() {
                continue;
            }
            if let Some(first) = names[..second].iter().position(|prev| prev == name) {
                return Err(HeaderError::Duplicate {
                    name: name.clone(),
                    first,
                    second,
                });
            }
        }
        Ok(Self { names })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        if name.is_empty() {
            return None;
        }
        self.names.iter().position(|candidate| candidate == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn contains_all<S: AsRef<str>>(&self, required: &[S]) -> bool {
        required.iter().all(|name| self.contains(name.as_ref()))
    }

    /// Zero-based index of the last header column.
    pub fn last_column(&self) -> Option<usize> {
        self.names.len().checked_sub(1)
    }
}

/// One data row decoded against a [`HeaderRow`].
///
/// Always holds exactly one cell per header; missing trailing cells decode as
/// [`CellValue::Empty`] and cells past the last header are dropped.
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    fields: Vec<(String, CellValue)>,
}

impl Record {
    pub fn decode(headers: &HeaderRow, row: &[CellValue]) -> Self {
        let fields = headers
            .names()
            .iter()
            .enumerate()
            .map(|(index, name)| (name.clone(), row.get(index).cloned().unwrap_or_default()))
            .collect();
        Self { fields }
    }

    pub fn get(&self, name: &str) -> Option<&CellValue> {
        if name.is_empty() {
            return None;
        }
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    pub fn id(&self) -> Option<&CellValue> {
        self.get(crate::schema::ID_HEADER)
    }

    /// Named fields in column order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.fields
            .iter()
            .filter(|(name, _)| !name.is_empty())
            .map(|(name, value)| (name.as_str(), value))
    }

    pub fn width(&self) -> usize {
        self.fields.len()
    }

    /// Overlay `updates` onto this record, serialized in `headers` order.
    ///
    /// Untouched named columns keep their current value (looked up by name),
    /// unnamed columns keep the value at the same position, and the `ID`
    /// column is never overwritten.
    pub fn merge(&self, headers: &HeaderRow, updates: &FieldUpdates) -> RowMerge {
        let mut cells = Vec::with_capacity(headers.len());
        let mut applied = Vec::new();
        for (index, name) in headers.names().iter().enumerate() {
            if !name.is_empty()
                && !is_id_header(name)
                && let Some(value) = updates.get(name)
            {
                cells.push(value.clone());
                applied.push(name.clone());
                continue;
            }
            let current = if name.is_empty() {
                self.fields.get(index).map(|(_, value)| value)
            } else {
                self.get(name)
            };
            cells.push(current.cloned().unwrap_or_default());
        }

        let ignored = updates
            .names()
            .filter(|name| is_id_header(name) || !headers.contains(name))
            .map(str::to_string)
            .collect();

        RowMerge {
            cells,
            applied,
            ignored,
        }
    }
}

/// Result of [`Record::merge`]: the full row to write plus bookkeeping.
#[derive(Clone, Debug, PartialEq)]
pub struct RowMerge {
    pub cells: Vec<CellValue>,
    pub applied: Vec<String>,
    pub ignored: Vec<String>,
}

/// Partial field-name -> value mapping for an update.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FieldUpdates {
    values: BTreeMap<String, CellValue>,
}

impl FieldUpdates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, name: impl Into<String>, value: impl Into<CellValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<CellValue>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&CellValue> {
        self.values.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut CellValue> {
        self.values.get_mut(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<CellValue>> FromIterator<(K, V)> for FieldUpdates {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut out = Self::new();
        for (name, value) in iter {
            out.insert(name, value);
        }
        out
    }
}
