#![forbid(unsafe_code)]

use super::{RowStore, StoreError, parse_headers};
use crate::grid::GridSource;
use gs_core::A1Range;
use tracing::{debug, info, warn};

impl<G: GridSource> RowStore<G> {
    /// Name of the first table (document order) whose header row contains
    /// every required header. Uniqueness of the match is not checked.
    ///
    /// A table whose header row cannot be parsed is skipped; if nothing else
    /// matches, its schema error is reported instead of `NotFound`.
    pub fn resolve_table(&self) -> Result<String, StoreError> {
        let tables = self
            .grid
            .list_tables()
            .map_err(StoreError::transport("list tables"))?;
        if tables.is_empty() {
            return Err(StoreError::NotFound("document has no tables".to_string()));
        }

        let mut unusable = None;
        for table in tables {
            let rows = self
                .grid
                .read_range(&A1Range::header_row(&table))
                .map_err(StoreError::transport(format!("read headers of table {table:?}")))?;
            let cells = rows.into_iter().next().unwrap_or_default();
            let headers = match parse_headers(&table, &cells) {
                Ok(headers) => headers,
                Err(err) => {
                    warn!(table = %table, error = %err, "skipping table with unusable header row");
                    unusable.get_or_insert(err);
                    continue;
                }
            };
            debug!(table = %table, headers = headers.len(), "checking table");
            if headers.contains_all(&self.schema.required_headers) {
                info!(table = %table, "resolved record table");
                return Ok(table);
            }
        }

        Err(unusable.unwrap_or_else(|| {
            StoreError::NotFound(format!(
                "no table has the required headers {:?}",
                self.schema.required_headers
            ))
        }))
    }
}
