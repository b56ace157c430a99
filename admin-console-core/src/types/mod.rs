//! Core type definitions

mod dialog;
mod grid;

pub use dialog::{DialogFields, DialogKind, DialogTarget, FieldErrors, FieldSpec, OpenFlags, Transition};
pub use grid::{GridPagination, GridRow, RowId, RowPage, RowQuery, SelectionModel};
