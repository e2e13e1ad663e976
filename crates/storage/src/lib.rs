#![forbid(unsafe_code)]

//! Header-indexed record store over a spreadsheet-like grid.
//!
//! [`RowStore`] translates between a schema-less [`Grid`] (rows of cells,
//! row 0 = headers) read through a [`GridSource`] and named-field
//! [`Record`]s, and writes partial updates back at the right row address.

mod grid;
mod http;
mod memory;
mod store;

pub use grid::{
    Grid, GridSource, WriteMode, cell_from_json, cell_to_json, grid_to_json,
    interpret_user_entered, literal_user_entered,
};
pub use http::{DEFAULT_API_BASE, HttpGrid, HttpGridConfig};
pub use memory::MemoryGrid;
pub use store::*;

pub use gs_core::{A1Range, CellValue, FieldUpdates, HeaderRow, Record};
