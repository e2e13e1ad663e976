#![forbid(unsafe_code)]

use crate::grid::{Grid, GridSource, WriteMode, cell_from_json, interpret_user_entered};
use crate::store::GridError;
use gs_core::{A1Range, CellValue, Span};
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

#[derive(Clone, Debug, PartialEq)]
struct MemoryTable {
    name: String,
    rows: Grid,
}

/// In-process grid with the same read/write semantics as the remote API.
///
/// Reads drop trailing empty cells and rows. Writes grow the table as needed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MemoryGrid {
    tables: Vec<MemoryTable>,
}

#[derive(Deserialize)]
struct Fixture {
    tables: Vec<FixtureTable>,
}

#[derive(Deserialize)]
struct FixtureTable {
    name: String,
    #[serde(default)]
    rows: Vec<Vec<Value>>,
}

impl MemoryGrid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table<R, C>(mut self, name: impl Into<String>, rows: R) -> Self
    where
        R: IntoIterator,
        R::Item: IntoIterator<Item = C>,
        C: Into<CellValue>,
    {
        self.insert_table(
            name,
            rows.into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
        );
        self
    }

    /// Adds or replaces a table. New tables go last in document order.
    pub fn insert_table(&mut self, name: impl Into<String>, rows: Grid) {
        let name = name.into();
        match self.tables.iter_mut().find(|t| t.name == name) {
            Some(table) => table.rows = rows,
            None => self.tables.push(MemoryTable { name, rows }),
        }
    }

    pub fn rows(&self, table: &str) -> Option<&Grid> {
        self.tables.iter().find(|t| t.name == table).map(|t| &t.rows)
    }

    pub fn from_fixture_json(raw: &str) -> Result<Self, GridError> {
        let fixture: Fixture = serde_json::from_str(raw)
            .map_err(|e| GridError::Malformed(format!("fixture: {e}")))?;
        Self::from_fixture(fixture)
    }

    pub fn from_fixture_yaml(raw: &str) -> Result<Self, GridError> {
        let fixture: Fixture = serde_yaml::from_str(raw)
            .map_err(|e| GridError::Malformed(format!("fixture: {e}")))?;
        Self::from_fixture(fixture)
    }

    /// Loads `.yaml`/`.yml` as YAML, anything else as JSON.
    pub fn load_fixture(path: &Path) -> Result<Self, GridError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| GridError::Transport(format!("{}: {e}", path.display())))?;
        let is_yaml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| matches!(ext, "yaml" | "yml"));
        if is_yaml {
            Self::from_fixture_yaml(&raw)
        } else {
            Self::from_fixture_json(&raw)
        }
    }

    fn from_fixture(fixture: Fixture) -> Result<Self, GridError> {
        let mut grid = Self::new();
        for table in fixture.tables {
            let mut rows = Vec::with_capacity(table.rows.len());
            for (row_index, row) in table.rows.iter().enumerate() {
                let mut cells = Vec::with_capacity(row.len());
                for cell in row {
                    let Some(cell) = cell_from_json(cell) else {
                        return Err(GridError::Malformed(format!(
                            "fixture table {:?} row {} has a non-scalar cell",
                            table.name,
                            row_index + 1
                        )));
                    };
                    cells.push(cell);
                }
                rows.push(cells);
            }
            grid.insert_table(table.name, rows);
        }
        Ok(grid)
    }

    fn table(&self, name: &str) -> Result<&MemoryTable, GridError> {
        self.tables
            .iter()
            .find(|t| t.name == name)
            .ok_or_else(|| GridError::UnknownTable(name.to_string()))
    }

    fn table_mut(&mut self, name: &str) -> Result<&mut MemoryTable, GridError> {
        self.tables
            .iter_mut()
            .find(|t| t.name == name)
            .ok_or_else(|| GridError::UnknownTable(name.to_string()))
    }
}

impl GridSource for MemoryGrid {
    fn list_tables(&self) -> Result<Vec<String>, GridError> {
        Ok(self.tables.iter().map(|t| t.name.clone()).collect())
    }

    fn read_range(&self, range: &A1Range) -> Result<Grid, GridError> {
        let rows = &self.table(range.table_name())?.rows;
        let (first_row, last_row, first_col, last_col) = bounds(range.span(), rows.len());
        let mut out = Vec::new();
        for row_number in first_row..=last_row {
            let Some(row) = rows.get(row_number - 1) else {
                break;
            };
            let end = row.len().min(last_col.saturating_add(1));
            let slice = if first_col < end {
                row[first_col..end].to_vec()
            } else {
                Vec::new()
            };
            out.push(trim_trailing_empty(slice));
        }
        while out.last().is_some_and(|row| row.is_empty()) {
            out.pop();
        }
        Ok(out)
    }

    fn write_range(
        &mut self,
        range: &A1Range,
        values: Grid,
        mode: WriteMode,
    ) -> Result<(), GridError> {
        let range_label = range.to_string();
        let table = self.table_mut(range.table_name())?;
        let (first_row, last_row, first_col, last_col) = bounds(range.span(), usize::MAX);

        let height = last_row.saturating_sub(first_row).saturating_add(1);
        if values.len() > height {
            return Err(GridError::RangeMismatch {
                range: range_label,
                reason: format!("{} rows for a {height}-row range", values.len()),
            });
        }
        let width = last_col.saturating_sub(first_col).saturating_add(1);
        if let Some(row) = values.iter().find(|row| row.len() > width) {
            return Err(GridError::RangeMismatch {
                range: range_label,
                reason: format!("{} cells for a {width}-column range", row.len()),
            });
        }

        for (offset, row) in values.into_iter().enumerate() {
            let row_index = first_row - 1 + offset;
            if table.rows.len() <= row_index {
                table.rows.resize_with(row_index + 1, Vec::new);
            }
            let target = &mut table.rows[row_index];
            for (col_offset, cell) in row.into_iter().enumerate() {
                let col = first_col + col_offset;
                if target.len() <= col {
                    target.resize(col + 1, CellValue::Empty);
                }
                target[col] = match mode {
                    WriteMode::Raw => cell,
                    WriteMode::UserEntered => interpret_user_entered(cell),
                };
            }
        }
        Ok(())
    }
}

/// `(first_row, last_row, first_col, last_col)`; rows 1-based, columns 0-based, inclusive.
fn bounds(span: &Span, row_count: usize) -> (usize, usize, usize, usize) {
    match span {
        Span::Whole => (1, row_count.max(1), 0, usize::MAX),
        Span::Rows { first, last } => ((*first).max(1) as usize, *last as usize, 0, usize::MAX),
        Span::Cells {
            first_col,
            first_row,
            last_col,
            last_row,
        } => (
            (*first_row).max(1) as usize,
            last_row.map(|r| r as usize).unwrap_or(row_count.max(1)),
            *first_col,
            *last_col,
        ),
    }
}

fn trim_trailing_empty(mut row: Vec<CellValue>) -> Vec<CellValue> {
    while row.last().is_some_and(CellValue::is_empty) {
        row.pop();
    }
    row
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> MemoryGrid {
        MemoryGrid::new().with_table(
            "T",
            vec![
                vec!["ID", "Name", "Score"],
                vec!["1", "Alice", ""],
                vec![],
                vec!["3", "Carol", "7"],
            ],
        )
    }

    #[test]
    fn whole_table_read_trims_like_the_api() {
        let rows = sample().read_range(&A1Range::table("T")).expect("read");
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[1], vec![CellValue::text("1"), CellValue::text("Alice")]);
        assert!(rows[2].is_empty());
    }

    #[test]
    fn column_read_keeps_empty_rows_in_place() {
        let rows = sample()
            .read_range(&A1Range::column_from("T", 0, 1))
            .expect("read");
        assert_eq!(
            rows,
            vec![
                vec![CellValue::text("ID")],
                vec![CellValue::text("1")],
                vec![],
                vec![CellValue::text("3")],
            ]
        );
    }

    #[test]
    fn row_span_write_grows_and_interprets_input() {
        let mut grid = sample();
        grid.write_range(
            &A1Range::row_span("T", 6, 0, 3),
            vec![vec![
                CellValue::text("6"),
                CellValue::text("Frank"),
                CellValue::text("80%"),
                CellValue::text("TRUE"),
            ]],
            WriteMode::UserEntered,
        )
        .expect("write");
        let rows = grid.rows("T").expect("table");
        assert_eq!(rows.len(), 6);
        assert!(rows[4].is_empty());
        assert_eq!(
            rows[5],
            vec![
                CellValue::Number(6.0),
                CellValue::text("Frank"),
                CellValue::Number(0.8),
                CellValue::Bool(true),
            ]
        );
    }

    #[test]
    fn raw_write_is_verbatim() {
        let mut grid = sample();
        grid.write_range(
            &A1Range::row_span("T", 2, 2, 2),
            vec![vec![CellValue::text("42")]],
            WriteMode::Raw,
        )
        .expect("write");
        assert_eq!(grid.rows("T").expect("table")[1][2], CellValue::text("42"));
    }

    #[test]
    fn oversized_writes_and_unknown_tables_fail() {
        let mut grid = sample();
        let err = grid
            .write_range(
                &A1Range::row_span("T", 2, 0, 1),
                vec![vec![CellValue::Empty; 3]],
                WriteMode::Raw,
            )
            .unwrap_err();
        assert!(matches!(err, GridError::RangeMismatch { .. }));
        assert!(matches!(
            grid.read_range(&A1Range::table("Nope")),
            Err(GridError::UnknownTable(_))
        ));
    }

    #[test]
    fn fixtures_load_from_json_and_yaml() {
        let json = r#"{"tables":[{"name":"Notes","rows":[["a"]]},{"name":"H","rows":[["ID"],[1]]}]}"#;
        let grid = MemoryGrid::from_fixture_json(json).expect("json fixture");
        assert_eq!(grid.list_tables().expect("tables"), vec!["Notes", "H"]);
        assert_eq!(grid.rows("H").expect("H")[1], vec![CellValue::Number(1.0)]);

        let yaml = "tables:\n  - name: H\n    rows:\n      - [ID, Name]\n      - [P1, null]\n";
        let grid = MemoryGrid::from_fixture_yaml(yaml).expect("yaml fixture");
        assert_eq!(
            grid.rows("H").expect("H")[1],
            vec![CellValue::text("P1"), CellValue::Empty]
        );

        assert!(MemoryGrid::from_fixture_json(r#"{"tables":[{"name":"x","rows":[[[1]]]}]}"#).is_err());
    }
}
