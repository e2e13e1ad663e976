#![forbid(unsafe_code)]

//! A1-notation range addresses: `Table`, `Table!1:1`, `Table!C1:C`, `Table!A5:M5`.

use crate::columns::index_to_letter;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Span {
    /// Bare table name: every populated cell.
    Whole,
    /// Full rows, 1-based inclusive.
    Rows { first: u32, last: u32 },
    /// Rectangle of cells. `last_row: None` runs to the end of the table.
    Cells {
        first_col: usize,
        first_row: u32,
        last_col: usize,
        last_row: Option<u32>,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct A1Range {
    table: String,
    span: Span,
}

impl A1Range {
    pub fn table(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            span: Span::Whole,
        }
    }

    pub fn header_row(table: impl Into<String>) -> Self {
        Self::rows(table, 1, 1)
    }

    pub fn rows(table: impl Into<String>, first: u32, last: u32) -> Self {
        Self {
            table: table.into(),
            span: Span::Rows { first, last },
        }
    }

    /// One column from `first_row` down to the last populated row.
    pub fn column_from(table: impl Into<String>, col: usize, first_row: u32) -> Self {
        Self {
            table: table.into(),
            span: Span::Cells {
                first_col: col,
                first_row,
                last_col: col,
                last_row: None,
            },
        }
    }

    /// One row, columns `first_col..=last_col`.
    pub fn row_span(
        table: impl Into<String>,
        row: u32,
        first_col: usize,
        last_col: usize,
    ) -> Self {
        Self {
            table: table.into(),
            span: Span::Cells {
                first_col,
                first_row: row,
                last_col,
                last_row: Some(row),
            },
        }
    }

    pub fn table_name(&self) -> &str {
        &self.table
    }

    pub fn span(&self) -> &Span {
        &self.span
    }
}

impl std::fmt::Display for A1Range {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write_table_name(f, &self.table)?;
        match &self.span {
            Span::Whole => Ok(()),
            Span::Rows { first, last } => write!(f, "!{first}:{last}"),
            Span::Cells {
                first_col,
                first_row,
                last_col,
                last_row,
            } => {
                write!(
                    f,
                    "!{}{first_row}:{}",
                    index_to_letter(*first_col),
                    index_to_letter(*last_col)
                )?;
                match last_row {
                    Some(row) => write!(f, "{row}"),
                    None => Ok(()),
                }
            }
        }
    }
}

fn needs_quotes(table: &str) -> bool {
    table.is_empty()
        || !table
            .chars()
            .all(|ch| ch.is_ascii_alphabetic() || ch == '_')
}

fn write_table_name(f: &mut std::fmt::Formatter<'_>, table: &str) -> std::fmt::Result {
    if !needs_quotes(table) {
        return f.write_str(table);
    }
    f.write_str("'")?;
    f.write_str(&table.replace('\'', "''"))?;
    f.write_str("'")
}
