#![forbid(unsafe_code)]

pub mod cell;
pub mod columns;
pub mod range;
pub mod record;

pub mod schema {
    /// Header of the column that carries record identity.
    pub const ID_HEADER: &str = "ID";

    /// Headers that mark the table holding hypothesis records.
    pub const HYPOTHESIS_REQUIRED_HEADERS: &[&str] =
        &["Problem Title", "Hypothesis", "Questions to Ask in Meeting"];

    /// Fields stored as a 0..1 fraction behind a percent cell format.
    pub const HYPOTHESIS_PERCENT_FIELDS: &[&str] = &["Confidence %"];

    pub fn is_id_header(value: &str) -> bool {
        value == ID_HEADER
    }
}

pub use cell::CellValue;
pub use columns::{ColumnError, index_to_letter, letter_to_index};
pub use range::{A1Range, Span};
pub use record::{FieldUpdates, HeaderError, HeaderRow, Record, RowMerge};
