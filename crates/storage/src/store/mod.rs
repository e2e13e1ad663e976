#![forbid(unsafe_code)]

mod discovery;
mod error;
mod requests;
mod transform;
mod update;

pub use error::{GridError, StoreError};
pub use requests::*;
pub use transform::{TransformRules, ValueTransform};

use crate::grid::GridSource;
use gs_core::schema::ID_HEADER;
use gs_core::{A1Range, CellValue, HeaderRow, Record};
use tracing::{debug, info, warn};

/// Row Store Adapter: named-field records over a [`GridSource`].
///
/// Nothing is cached between calls; every operation re-reads what it needs so
/// the remote grid stays the single source of truth. Concurrent updates to the
/// same record are last-writer-wins.
#[derive(Debug)]
pub struct RowStore<G> {
    grid: G,
    schema: TableSchema,
}

impl<G: GridSource> RowStore<G> {
    pub fn new(grid: G, schema: TableSchema) -> Self {
        Self { grid, schema }
    }

    pub fn schema(&self) -> &TableSchema {
        &self.schema
    }

    pub fn grid(&self) -> &G {
        &self.grid
    }

    /// All records, in sheet row order. A table without data rows yields an empty list.
    pub fn load_records(&self) -> Result<Vec<Record>, StoreError> {
        Ok(self.load_table()?.records)
    }

    pub fn load_table(&self) -> Result<TableSnapshot, StoreError> {
        let table = self.resolve_table()?;
        info!(table = %table, "loading all rows");
        let snapshot = self.read_snapshot(&table, format!("read table {table:?}"))?;
        if snapshot.records.is_empty() {
            warn!(table = %table, "table has no data rows");
        } else {
            info!(table = %table, count = snapshot.records.len(), "loaded records");
        }
        Ok(snapshot)
    }

    /// First record whose `ID` cell equals `id` exactly. Blank identifiers are rejected.
    pub fn get_record(&self, id: &str) -> Result<Record, StoreError> {
        require_id(id)?;
        let table = self.resolve_table().map_err(|err| err.for_record(id))?;
        self.find_record(&table, id)
    }

    pub fn describe(&self) -> Result<TableDescription, StoreError> {
        let table = self.resolve_table()?;
        let headers = self.read_headers(&table, format!("read headers of table {table:?}"))?;
        let id_column = headers.position(ID_HEADER).map(gs_core::index_to_letter);
        Ok(TableDescription {
            table,
            headers: headers.names().to_vec(),
            id_column,
        })
    }

    fn read(&self, range: &A1Range, context: impl Into<String>) -> Result<crate::Grid, StoreError> {
        debug!(range = %range, "read range");
        self.grid
            .read_range(range)
            .map_err(StoreError::transport(context))
    }

    pub(crate) fn read_headers(
        &self,
        table: &str,
        context: String,
    ) -> Result<HeaderRow, StoreError> {
        let rows = self.read(&A1Range::header_row(table), context)?;
        let cells = rows.into_iter().next().unwrap_or_default();
        parse_headers(table, &cells)
    }

    pub(crate) fn read_snapshot(
        &self,
        table: &str,
        context: String,
    ) -> Result<TableSnapshot, StoreError> {
        let rows = self.read(&A1Range::table(table), context)?;
        let Some((head, body)) = rows.split_first() else {
            return Ok(TableSnapshot {
                table: table.to_string(),
                ..TableSnapshot::default()
            });
        };
        let headers = parse_headers(table, head)?;
        let records = body
            .iter()
            .map(|row| Record::decode(&headers, row))
            .collect();
        Ok(TableSnapshot {
            table: table.to_string(),
            headers,
            records,
        })
    }

    pub(crate) fn find_record(&self, table: &str, id: &str) -> Result<Record, StoreError> {
        let snapshot =
            self.read_snapshot(table, format!("read record {id:?} from table {table:?}"))?;
        if !snapshot.headers.is_empty() && !snapshot.headers.contains(ID_HEADER) {
            return Err(missing_id_column(table));
        }
        snapshot
            .records
            .into_iter()
            .find(|record| record.id().is_some_and(|cell| cell.matches_text(id)))
            .ok_or_else(|| StoreError::NotFound(format!("record {id:?} in table {table:?}")))
    }
}

fn parse_headers(table: &str, cells: &[CellValue]) -> Result<HeaderRow, StoreError> {
    HeaderRow::parse(cells.iter().map(|cell| cell.as_text()))
        .map_err(|err| StoreError::Schema(format!("table {table:?}: {err}")))
}

pub(crate) fn require_id(id: &str) -> Result<(), StoreError> {
    if id.trim().is_empty() {
        return Err(StoreError::InvalidInput(
            "record identifier must not be blank".to_string(),
        ));
    }
    Ok(())
}

pub(crate) fn missing_id_column(table: &str) -> StoreError {
    StoreError::Schema(format!("table {table:?} has no {ID_HEADER:?} column"))
}
