#![forbid(unsafe_code)]

use super::{RowStore, StoreError, UpdateReceipt, missing_id_column, require_id};
use crate::grid::{GridSource, WriteMode, literal_user_entered};
use gs_core::schema::ID_HEADER;
use gs_core::{A1Range, FieldUpdates};
use tracing::{debug, info};

impl<G: GridSource> RowStore<G> {
    /// Merge `updates` into the record `id` and rewrite its full row in one request.
    ///
    /// Unknown fields and `ID` are ignored. Nothing is written unless every read,
    /// the merge and the value transforms succeed. The identifier cell is written
    /// as literal text so the sheet cannot reinterpret it (`"007"` stays `"007"`).
    pub fn update_record(
        &mut self,
        id: &str,
        updates: &FieldUpdates,
    ) -> Result<UpdateReceipt, StoreError> {
        require_id(id)?;
        let updates = self.schema.transforms.apply(updates)?;

        let table = self.resolve_table().map_err(|err| err.for_record(id))?;
        let headers = self.read_headers(
            &table,
            format!("read headers of table {table:?} for record {id:?}"),
        )?;
        let Some(last_column) = headers.last_column() else {
            return Err(StoreError::Schema(format!(
                "table {table:?} has an empty header row"
            )));
        };
        let Some(id_column) = headers.position(ID_HEADER) else {
            return Err(missing_id_column(&table));
        };

        let row_number = self.locate_row(&table, id_column, id)?;
        let current = self.find_record(&table, id)?;
        let mut merge = current.merge(&headers, &updates);
        if let Some(cell) = merge.cells.get_mut(id_column) {
            *cell = literal_user_entered(std::mem::take(cell));
        }

        let range = A1Range::row_span(&table, row_number, 0, last_column);
        debug!(range = %range, applied = ?merge.applied, ignored = ?merge.ignored, "write row");
        self.grid
            .write_range(&range, vec![merge.cells], WriteMode::UserEntered)
            .map_err(StoreError::transport(format!(
                "write record {id:?} to table {table:?}"
            )))?;

        info!(table = %table, id = %id, row = row_number, "updated record");
        Ok(UpdateReceipt {
            table,
            id: id.to_string(),
            row_number,
            range: range.to_string(),
            applied: merge.applied,
            ignored: merge.ignored,
        })
    }

    /// 1-based sheet row holding `id` in the identifier column (header row excluded).
    fn locate_row(&self, table: &str, id_column: usize, id: &str) -> Result<u32, StoreError> {
        let column = self
            .grid
            .read_range(&A1Range::column_from(table, id_column, 1))
            .map_err(StoreError::transport(format!(
                "read {ID_HEADER} column of table {table:?} to locate record {id:?}"
            )))?;

        // Empty rows come back as empty vectors; keep them so positions stay aligned.
        let offset = column
            .iter()
            .skip(1)
            .position(|row| row.first().is_some_and(|cell| cell.matches_text(id)))
            .ok_or_else(|| StoreError::NotFound(format!("record {id:?} in table {table:?}")))?;

        u32::try_from(offset + 2)
            .map_err(|_| StoreError::InvalidInput(format!("row for {id:?} is out of range")))
    }
}
