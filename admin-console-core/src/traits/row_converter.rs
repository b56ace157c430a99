//! Row to dialog-fields conversion

use async_trait::async_trait;

use crate::error::CoreResult;

/// Turns a grid row into the fields its dialogs edit.
///
/// Must not touch the dialog session; the binding layer applies the result.
/// May perform I/O. An `Err` is surfaced as a conversion failure.
#[async_trait]
pub trait RowConverter<R, F>: Send + Sync {
    async fn convert(&self, row: &R) -> CoreResult<F>;
}
