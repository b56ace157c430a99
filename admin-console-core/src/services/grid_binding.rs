//! Grid/dialog binding
//!
//! Keeps the session's selection-derived state in line with the loaded rows:
//! resolves the grid's selection model into row ids, converts a single
//! selected row into dialog fields, and turns row activation (double click,
//! Enter) into a guarded request to open the edit dialog.

use std::sync::Arc;

use crate::error::CoreError;
use crate::session::SessionHandle;
use crate::traits::RowConverter;
use crate::types::{DialogFields, DialogKind, GridRow, RowId, SelectionModel, Transition};

pub struct GridBinding<R, F> {
    session: SessionHandle<F>,
    converter: Arc<dyn RowConverter<R, F>>,
    rows: Vec<R>,
    selection: SelectionModel,
}

impl<R: GridRow, F: DialogFields> GridBinding<R, F> {
    pub fn new(session: SessionHandle<F>, converter: Arc<dyn RowConverter<R, F>>) -> Self {
        Self {
            session,
            converter,
            rows: Vec::new(),
            selection: SelectionModel::none(),
        }
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn row(&self, id: RowId) -> Option<&R> {
        self.rows.iter().find(|row| row.row_id() == id)
    }

    pub fn selection(&self) -> &SelectionModel {
        &self.selection
    }

    /// Replace the loaded rows and re-derive the selection against them.
    pub async fn set_rows(&mut self, rows: Vec<R>) {
        self.rows = rows;
        self.sync_selection().await;
    }

    /// Apply a new selection model from the grid.
    pub async fn select(&mut self, selection: SelectionModel) {
        self.selection = selection;
        self.sync_selection().await;
    }

    async fn sync_selection(&mut self) {
        let ids = self.selection.resolve(&self.rows);
        let single = match ids.as_slice() {
            [id] => self.row(*id).cloned(),
            _ => None,
        };

        let token = self.session.token();
        let Some(ticket) = self
            .session
            .update_if_live(token, |s| s.set_selected_rows(ids))
        else {
            return;
        };

        let Some(row) = single else {
            return;
        };
        let result = self
            .converter
            .convert(&row)
            .await
            .map_err(conversion_failure);
        self.session.update(|s| s.apply_conversion(ticket, result));
    }

    /// Convert the activated row and ask to open the edit dialog with it.
    /// The request goes through the discard guard like any other.
    pub async fn activate_row(&mut self, id: RowId) -> Transition {
        let Some(row) = self.row(id).cloned() else {
            log::warn!("Activated row {id} is not loaded");
            return Transition::Rejected;
        };

        let token = self.session.token();
        match self.converter.convert(&row).await {
            Ok(fields) => self
                .session
                .update_if_live(token, |s| s.open_with_record(DialogKind::Edit, fields, false))
                .unwrap_or(Transition::Rejected),
            Err(err) => {
                let err = conversion_failure(err);
                log::error!("Row {id}: {err}");
                self.session
                    .update_if_live(token, |s| s.set_error(Some(err.user_message())));
                Transition::Rejected
            }
        }
    }
}

fn conversion_failure(err: CoreError) -> CoreError {
    match err {
        CoreError::ConversionFailure(_) => err,
        other => CoreError::ConversionFailure(other.user_message()),
    }
}
