//! CRUD page orchestration
//!
//! A [`CrudPage`] owns everything one entity page needs for one company:
//! the dialog session, the grid binding, the row data source and the
//! entity's submit/delete handlers. Its async methods are the only places
//! where the page suspends. Each one finishes by settling: a revalidation
//! queued by a commit is performed exactly once and the refreshed rows are
//! fed back through the grid binding.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use admin_console_api::MAX_PAGE_SIZE;

use super::delete_prompt::{DeletePrompt, DeleteTitles};
use super::grid_binding::GridBinding;
use super::row_data_source::RowDataSource;
use super::submission::{DeleteContext, SubmitContext};
use crate::error::CoreResult;
use crate::session::{DialogSession, SessionHandle};
use crate::traits::{DeleteHandler, RowConverter, SubmitHandler};
use crate::types::{
    DialogFields, DialogKind, DialogTarget, GridPagination, GridRow, RowId, RowPage, RowQuery,
    SelectionModel, Transition,
};

/// The entity-specific handlers of a page.
pub struct CrudHandlers<F> {
    pub add: Arc<dyn SubmitHandler<F>>,
    pub edit: Arc<dyn SubmitHandler<F>>,
    pub delete: Arc<dyn DeleteHandler<F>>,
}

impl<F> Clone for CrudHandlers<F> {
    fn clone(&self) -> Self {
        Self {
            add: Arc::clone(&self.add),
            edit: Arc::clone(&self.edit),
            delete: Arc::clone(&self.delete),
        }
    }
}

pub struct CrudPage<R, F> {
    session: SessionHandle<F>,
    grid: GridBinding<R, F>,
    source: RowDataSource<R>,
    handlers: CrudHandlers<F>,
    /// Entity-specific submit actions beyond add/edit, by name.
    actions: HashMap<&'static str, Arc<dyn SubmitHandler<F>>>,
    company_id: i64,
    auth_token: String,
    pagination: GridPagination,
    total_count: u64,
    delete_titles: DeleteTitles,
}

impl<R: GridRow, F: DialogFields> CrudPage<R, F> {
    pub fn new(
        company_id: i64,
        auth_token: impl Into<String>,
        source: RowDataSource<R>,
        converter: Arc<dyn RowConverter<R, F>>,
        handlers: CrudHandlers<F>,
        delete_titles: DeleteTitles,
    ) -> Self {
        let session = SessionHandle::new();
        Self {
            grid: GridBinding::new(session.clone(), converter),
            session,
            source,
            handlers,
            actions: HashMap::new(),
            company_id,
            auth_token: auth_token.into(),
            pagination: GridPagination::default(),
            total_count: 0,
            delete_titles,
        }
    }

    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.pagination = GridPagination::with_page_size(page_size.clamp(1, MAX_PAGE_SIZE));
        self
    }

    /// Register an extra submit action, e.g. rerolling a secret.
    #[must_use]
    pub fn with_action(mut self, name: &'static str, handler: Arc<dyn SubmitHandler<F>>) -> Self {
        self.actions.insert(name, handler);
        self
    }

    // ===== State =====

    pub fn session(&self) -> &SessionHandle<F> {
        &self.session
    }

    pub fn source(&self) -> &RowDataSource<R> {
        &self.source
    }

    pub fn rows(&self) -> &[R] {
        self.grid.rows()
    }

    pub fn selection(&self) -> &SelectionModel {
        self.grid.selection()
    }

    pub fn pagination(&self) -> GridPagination {
        self.pagination
    }

    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    pub fn company_id(&self) -> i64 {
        self.company_id
    }

    pub fn delete_prompt(&self) -> DeletePrompt {
        self.session
            .read(|s| DeletePrompt::from_session(s, &self.delete_titles))
    }

    // ===== Rows =====

    /// Fetch the current page.
    pub async fn load(&mut self) -> CoreResult<()> {
        let query = RowQuery::new(self.company_id, self.pagination);
        let page = self.source.fetch(query).await?;
        self.apply_page(page).await;
        Ok(())
    }

    /// Move to another page (0-based) or page size and fetch it.
    pub async fn change_page(&mut self, pagination: GridPagination) -> CoreResult<()> {
        self.pagination = GridPagination {
            page: pagination.page,
            page_size: pagination.page_size.clamp(1, MAX_PAGE_SIZE),
        };
        self.load().await
    }

    pub async fn select(&mut self, selection: SelectionModel) {
        self.grid.select(selection).await;
    }

    /// Double click / Enter on a row.
    pub async fn activate_row(&mut self, id: RowId) -> Transition {
        self.grid.activate_row(id).await
    }

    // ===== Dialogs =====

    pub fn open(&self, kind: DialogKind) -> Transition {
        self.session.update(|s| s.open_dialog(kind, false))
    }

    pub fn open_custom(&self, key: &str, payload: Option<Value>) -> Transition {
        self.session
            .update(|s| s.open_custom_dialog(key, payload, false))
    }

    /// Field edit from a dialog form.
    pub fn edit_fields(&self, kind: DialogKind, edit: impl FnOnce(&mut F)) {
        self.session.update(|s| s.edit_pending(kind, edit));
    }

    pub async fn cancel(&mut self) -> Transition {
        let transition = self.session.update(|s| s.cancel_dialog(false));
        self.settle().await;
        transition
    }

    pub async fn confirm_discard(&mut self) -> Transition {
        let transition = self.session.update(DialogSession::confirm_discard);
        self.settle().await;
        transition
    }

    pub fn decline_discard(&self) -> Transition {
        self.session.update(DialogSession::decline_discard)
    }

    /// Close without asking, e.g. the one-time secret dialog.
    pub async fn close(&mut self) {
        self.session.update(DialogSession::close_current_dialog);
        self.settle().await;
    }

    // ===== Submission =====

    pub async fn submit_add(&mut self) -> bool {
        let handler = Arc::clone(&self.handlers.add);
        self.submit_with(DialogKind::Add, handler.as_ref()).await
    }

    pub async fn submit_edit(&mut self) -> bool {
        let handler = Arc::clone(&self.handlers.edit);
        self.submit_with(DialogKind::Edit, handler.as_ref()).await
    }

    /// Run the registered action `name` on the visible `kind` dialog.
    pub async fn submit_action(&mut self, kind: DialogKind, name: &str) -> bool {
        let Some(handler) = self.actions.get(name).cloned() else {
            log::warn!("No submit action named '{name}'");
            return false;
        };
        self.submit_with(kind, handler.as_ref()).await
    }

    /// Run `handler` on the pending data of the visible `kind` dialog.
    /// Edit submits without a target record never reach the handler.
    pub async fn submit_with(&mut self, kind: DialogKind, handler: &dyn SubmitHandler<F>) -> bool {
        let target = DialogTarget::Standard(kind);
        let resolved = self.session.update(|s| {
            if !s.is_open(&target) {
                return None;
            }
            s.clear_field_errors();
            let data = s.submit_data(kind);
            match &data {
                Ok(_) => s.set_error(None),
                Err(err) => s.set_error(Some(err.user_message())),
            }
            Some(data)
        });
        let data = match resolved {
            None => {
                log::debug!("Ignoring {kind} submit: dialog not open");
                return false;
            }
            Some(Err(err)) => {
                log::warn!("{kind} submit rejected: {err}");
                return false;
            }
            Some(Ok(data)) => data,
        };

        let ctx = SubmitContext::new(self.session.clone(), self.company_id, &self.auth_token);
        let committed = handler.submit(data, &ctx).await;
        if committed && ctx.is_live() {
            self.session.update(DialogSession::mark_committed);
        }
        self.settle().await;
        committed
    }

    /// Delete the resolved targets: the explicit delete record, else the
    /// selection. Fails with the no-selection message when there are none.
    pub async fn submit_delete(&mut self) -> bool {
        let target = DialogTarget::Standard(DialogKind::Delete);
        let resolved = self.session.update(|s| {
            if !s.is_open(&target) {
                return None;
            }
            let targets = s.delete_targets();
            match &targets {
                Ok(_) => s.set_error(None),
                Err(err) => s.set_error(Some(err.user_message())),
            }
            Some(targets)
        });
        let identifiers = match resolved {
            None => {
                log::debug!("Ignoring delete submit: dialog not open");
                return false;
            }
            Some(Err(err)) => {
                log::warn!("Delete rejected: {err}");
                return false;
            }
            Some(Ok(ids)) => ids,
        };

        let handler = Arc::clone(&self.handlers.delete);
        let ctx = DeleteContext::new(
            self.session.clone(),
            identifiers,
            self.company_id,
            &self.auth_token,
        );
        let token = self.session.token();
        let committed = handler.delete(&ctx).await;
        if committed {
            self.session.update_if_live(token, |s| {
                s.mark_committed();
                s.close_current_dialog();
            });
        }
        self.settle().await;
        committed
    }

    // ===== Lifecycle =====

    /// Tear the page down; late async results are discarded.
    pub fn dispose(&self) {
        self.session.dispose();
    }

    async fn settle(&mut self) {
        if !self.session.update(DialogSession::take_revalidation) {
            return;
        }
        match self.source.revalidate().await {
            Ok(Some(page)) => self.apply_page(page).await,
            Ok(None) => {}
            Err(err) => {
                self.session
                    .update(|s| s.set_error(Some(err.user_message())));
            }
        }
    }

    async fn apply_page(&mut self, page: RowPage<R>) {
        self.total_count = page.total_count;
        self.grid.set_rows(page.items).await;
    }
}

#[cfg(test)]
#[path = "crud_page_tests.rs"]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests;
