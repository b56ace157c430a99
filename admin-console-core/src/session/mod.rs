//! Dialog state store
//!
//! One [`DialogSession`] exists per CRUD page. It decides which dialog is
//! visible, holds the working copy of the entity being added, edited or
//! deleted, and routes dialog switches through the discard-changes guard
//! while the visible dialog has unsaved edits.
//!
//! All operations are synchronous and infallible. Asynchronous work
//! (row conversion, submission, revalidation) happens outside and reports
//! back through [`SessionHandle`], tagged with a [`SessionToken`] or
//! [`SelectionTicket`] so results that outlived their session or selection
//! are dropped.

mod guard;
mod handle;
mod history;

use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::error::{CoreError, CoreResult};
use crate::types::{DialogFields, DialogKind, DialogTarget, FieldErrors, OpenFlags, RowId, Transition};

pub use guard::DeferredRequest;
pub use handle::SessionHandle;

use guard::ConfirmationGuard;
use history::{DialogHistory, HistoryEntry};

/// Liveness token of a session. Invalidated by [`DialogSession::dispose`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionToken(u64);

/// Captured when the selection changes; a conversion result is applied only
/// if neither the session nor the selection changed since.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionTicket {
    token: SessionToken,
    epoch: u64,
}

impl SelectionTicket {
    pub fn token(&self) -> SessionToken {
        self.token
    }
}

#[derive(Debug, Clone)]
struct PendingData<F> {
    add: Option<F>,
    edit: Option<F>,
    delete: Option<F>,
}

impl<F> Default for PendingData<F> {
    fn default() -> Self {
        Self {
            add: None,
            edit: None,
            delete: None,
        }
    }
}

impl<F> PendingData<F> {
    fn slot(&self, kind: DialogKind) -> &Option<F> {
        match kind {
            DialogKind::Add => &self.add,
            DialogKind::Edit => &self.edit,
            DialogKind::Delete => &self.delete,
        }
    }

    fn slot_mut(&mut self, kind: DialogKind) -> &mut Option<F> {
        match kind {
            DialogKind::Add => &mut self.add,
            DialogKind::Edit => &mut self.edit,
            DialogKind::Delete => &mut self.delete,
        }
    }
}

/// Live dialog state of one CRUD page.
#[derive(Debug)]
pub struct DialogSession<F> {
    current: Option<DialogTarget>,
    guard: ConfirmationGuard<F>,
    history: DialogHistory<F>,
    pending: PendingData<F>,
    /// Converted single selection; edit/delete fall back to it on settle.
    selection_snapshot: Option<F>,
    custom_data: HashMap<String, Map<String, Value>>,
    selected_row_ids: Vec<RowId>,
    selection_epoch: u64,
    dirty: bool,
    error: Option<String>,
    field_errors: FieldErrors,
    loading: bool,
    commit_pending: bool,
    revalidation_queued: bool,
    generation: u64,
    disposed: bool,
}

impl<F: DialogFields> Default for DialogSession<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: DialogFields> DialogSession<F> {
    pub fn new() -> Self {
        Self {
            current: None,
            guard: ConfirmationGuard::default(),
            history: DialogHistory::default(),
            pending: PendingData::default(),
            selection_snapshot: None,
            custom_data: HashMap::new(),
            selected_row_ids: Vec::new(),
            selection_epoch: 0,
            dirty: false,
            error: None,
            field_errors: FieldErrors::new(),
            loading: false,
            commit_pending: false,
            revalidation_queued: false,
            generation: 0,
            disposed: false,
        }
    }

    // ===== Dialog switching =====

    /// Open a standard dialog. Without `force`, unsaved changes route the
    /// request through the confirmation guard.
    pub fn open_dialog(&mut self, kind: DialogKind, force: bool) -> Transition {
        self.request(DeferredRequest::Open(kind), force)
    }

    /// Open a custom dialog. An object `payload` replaces the dialog's data;
    /// any other payload is ignored.
    pub fn open_custom_dialog(
        &mut self,
        key: impl Into<String>,
        payload: Option<Value>,
        force: bool,
    ) -> Transition {
        self.request(
            DeferredRequest::OpenCustom {
                key: key.into(),
                payload,
            },
            force,
        )
    }

    /// Install `record` as the pending data of `kind` and open it, as one
    /// guarded step.
    pub fn open_with_record(&mut self, kind: DialogKind, record: F, force: bool) -> Transition {
        self.request(DeferredRequest::OpenWithRecord { kind, record }, force)
    }

    /// Return to the previous dialog, or close everything when there is none.
    pub fn cancel_dialog(&mut self, force: bool) -> Transition {
        self.request(DeferredRequest::Cancel, force)
    }

    /// Close whatever is visible without consulting the guard. Clears the
    /// history and drops a pending confirmation.
    pub fn close_current_dialog(&mut self) {
        if self.disposed {
            return;
        }
        if let Some(pending) = self.guard.take() {
            log::debug!("Dropping pending '{}' on close", pending.request);
        }
        self.history.clear();
        self.close_all();
    }

    /// Accept discarding the unsaved changes and replay the held request.
    pub fn confirm_discard(&mut self) -> Transition {
        if self.disposed {
            return Transition::Rejected;
        }
        let Some(pending) = self.guard.take() else {
            return Transition::Rejected;
        };
        log::debug!("Discarding unsaved changes for '{}'", pending.request);
        self.current = pending.hidden;
        self.apply(pending.request);
        Transition::Applied
    }

    /// Keep the unsaved changes and restore the dialog that was visible.
    pub fn decline_discard(&mut self) -> Transition {
        if self.disposed {
            return Transition::Rejected;
        }
        let Some(pending) = self.guard.take() else {
            return Transition::Rejected;
        };
        log::debug!("Keeping unsaved changes, '{}' abandoned", pending.request);
        self.current = pending.hidden;
        // The guard only fires on a dirty, visible dialog.
        self.dirty = self.current.is_some();
        Transition::Applied
    }

    fn request(&mut self, request: DeferredRequest<F>, force: bool) -> Transition {
        if self.disposed {
            return Transition::Rejected;
        }

        if self.guard.is_pending() {
            if !force {
                log::warn!("Rejecting '{request}': a discard confirmation is already pending");
                return Transition::Rejected;
            }
            if let Some(pending) = self.guard.take() {
                log::debug!("Forced '{request}' supersedes pending '{}'", pending.request);
                self.current = pending.hidden;
            }
        } else if self.dirty && !force {
            log::debug!("Unsaved changes, asking before '{request}'");
            let hidden = self.current.take();
            self.dirty = false;
            self.guard.intercept(hidden, request);
            return Transition::AwaitingConfirmation;
        }

        self.apply(request);
        Transition::Applied
    }

    fn apply(&mut self, request: DeferredRequest<F>) {
        match request {
            DeferredRequest::Open(kind) => self.push_and_show(kind.into()),
            DeferredRequest::OpenCustom { key, payload } => {
                match payload {
                    Some(Value::Object(map)) => {
                        self.custom_data.insert(key.clone(), map);
                    }
                    Some(other) => {
                        log::debug!("Ignoring non-object payload for custom dialog '{key}': {other}");
                    }
                    None => {}
                }
                self.push_and_show(DialogTarget::Custom(key));
            }
            DeferredRequest::OpenWithRecord { kind, record } => {
                *self.pending.slot_mut(kind) = Some(record);
                self.push_and_show(kind.into());
            }
            DeferredRequest::Cancel => self.go_back(),
        }
    }

    fn push_and_show(&mut self, target: DialogTarget) {
        if let Some(previous) = self.current.take() {
            if previous != target {
                let entry = self.snapshot_of(previous);
                self.history.push(entry);
            }
        }
        self.show(target);
    }

    fn go_back(&mut self) {
        let Some(entry) = self.history.pop() else {
            self.close_all();
            return;
        };
        self.current = None;
        match &entry.target {
            DialogTarget::Standard(kind) => {
                let slot = self.pending.slot_mut(*kind);
                if slot.is_none() {
                    *slot = entry.fields;
                }
            }
            DialogTarget::Custom(key) => {
                if let Some(payload) = entry.payload {
                    self.custom_data.entry(key.clone()).or_insert(payload);
                }
            }
        }
        self.show(entry.target);
    }

    fn show(&mut self, target: DialogTarget) {
        self.dirty = false;
        self.error = None;
        self.field_errors.clear();
        let missing_target = match target {
            DialogTarget::Standard(DialogKind::Delete) => self.delete_targets().err(),
            DialogTarget::Standard(DialogKind::Edit) => self.edit_target().err(),
            _ => None,
        };
        if let Some(err) = missing_target {
            self.error = Some(err.user_message());
        }
        self.current = Some(target);
    }

    fn snapshot_of(&self, target: DialogTarget) -> HistoryEntry<F> {
        let (fields, payload) = match &target {
            DialogTarget::Standard(kind) => (self.pending.slot(*kind).clone(), None),
            DialogTarget::Custom(key) => (None, self.custom_data.get(key).cloned()),
        };
        HistoryEntry {
            target,
            fields,
            payload,
        }
    }

    fn close_all(&mut self) {
        self.current = None;
        self.dirty = false;
        if self.is_all_closed() {
            self.settle();
        }
    }

    /// Runs on every transition into "all closed".
    fn settle(&mut self) {
        self.history.clear();
        self.dirty = false;
        self.error = None;
        self.field_errors.clear();
        self.pending.add = None;
        self.custom_data.clear();

        if self.commit_pending {
            self.commit_pending = false;
            self.revalidation_queued = true;
            self.pending = PendingData::default();
            self.selection_snapshot = None;
            log::debug!("Commit settled, revalidation queued");
        } else {
            self.pending.edit.clone_from(&self.selection_snapshot);
            self.pending.delete.clone_from(&self.selection_snapshot);
        }
    }

    // ===== Visibility =====

    /// The visible dialog. `None` while the confirmation prompt is shown.
    pub fn current_dialog(&self) -> Option<&DialogTarget> {
        self.current.as_ref()
    }

    /// The dialog a cancel would return to.
    pub fn previous_dialog(&self) -> Option<&DialogTarget> {
        self.history.previous()
    }

    pub fn history_depth(&self) -> usize {
        self.history.len()
    }

    pub fn is_open(&self, target: &DialogTarget) -> bool {
        self.current.as_ref() == Some(target)
    }

    pub fn is_confirmation_pending(&self) -> bool {
        self.guard.is_pending()
    }

    /// The request the confirmation prompt is about.
    pub fn pending_request(&self) -> Option<&DeferredRequest<F>> {
        self.guard.pending_request()
    }

    /// No dialog and no confirmation prompt visible.
    pub fn is_all_closed(&self) -> bool {
        self.current.is_none() && !self.guard.is_pending()
    }

    pub fn open_flags(&self) -> OpenFlags {
        let mut flags = OpenFlags {
            confirmation: self.guard.is_pending(),
            ..OpenFlags::default()
        };
        match &self.current {
            Some(DialogTarget::Standard(DialogKind::Add)) => flags.add = true,
            Some(DialogTarget::Standard(DialogKind::Edit)) => flags.edit = true,
            Some(DialogTarget::Standard(DialogKind::Delete)) => flags.delete = true,
            Some(DialogTarget::Custom(key)) => flags.custom = Some(key.clone()),
            None => {}
        }
        flags
    }

    // ===== Pending data =====

    pub fn pending_data(&self, kind: DialogKind) -> Option<&F> {
        self.pending.slot(kind).as_ref()
    }

    /// Replace the working data of `kind`. Does not mark the session dirty;
    /// field edits go through [`edit_pending`](Self::edit_pending).
    pub fn set_pending_data(&mut self, kind: DialogKind, data: Option<F>) {
        *self.pending.slot_mut(kind) = data;
    }

    /// Field-level edit of the working data of `kind`. Only the add dialog
    /// starts from the default record; edit and delete need a target first.
    /// Marks the session dirty while a dialog is visible.
    pub fn edit_pending(&mut self, kind: DialogKind, edit: impl FnOnce(&mut F)) {
        let slot = self.pending.slot_mut(kind);
        if kind == DialogKind::Add {
            edit(slot.get_or_insert_with(F::default));
        } else if let Some(record) = slot {
            edit(record);
        } else {
            log::debug!("Ignoring {kind} field edit: no target record");
            return;
        }
        if self.current.is_some() {
            self.dirty = true;
        }
    }

    pub fn custom_data(&self, key: &str) -> Option<&Map<String, Value>> {
        self.custom_data.get(key)
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.dirty
    }

    // ===== Selection =====

    pub fn selected_row_ids(&self) -> &[RowId] {
        &self.selected_row_ids
    }

    pub fn selection_snapshot(&self) -> Option<&F> {
        self.selection_snapshot.as_ref()
    }

    /// Replace the selection. Selection-derived data is cleared until a
    /// conversion for the new selection is applied.
    pub fn set_selected_rows(&mut self, ids: Vec<RowId>) -> SelectionTicket {
        self.selection_epoch += 1;
        self.selected_row_ids = ids;
        self.apply_selection_snapshot(None);
        SelectionTicket {
            token: self.token(),
            epoch: self.selection_epoch,
        }
    }

    /// Apply the outcome of converting the single selected row. Returns
    /// `false` when the result is stale and was dropped.
    pub fn apply_conversion(&mut self, ticket: SelectionTicket, result: CoreResult<F>) -> bool {
        if !self.is_live(ticket.token) {
            log::debug!("Dropping conversion result for a disposed session");
            return false;
        }
        if ticket.epoch != self.selection_epoch {
            log::debug!("Dropping conversion result for an outdated selection");
            return false;
        }
        match result {
            Ok(fields) => self.apply_selection_snapshot(Some(fields)),
            Err(err) => {
                log::error!("Row conversion failed: {err}");
                self.error = Some(err.user_message());
                self.apply_selection_snapshot(None);
            }
        }
        true
    }

    fn apply_selection_snapshot(&mut self, snapshot: Option<F>) {
        // Never overwrite data a visible or hidden dialog is working on;
        // settle resets edit/delete to the snapshot once everything closes.
        if self.is_all_closed() {
            self.pending.edit.clone_from(&snapshot);
            self.pending.delete.clone_from(&snapshot);
        }
        self.selection_snapshot = snapshot;
    }

    /// Identifiers a delete would act on: the explicit delete record, else
    /// the selection.
    pub fn delete_targets(&self) -> CoreResult<Vec<RowId>> {
        if let Some(record) = &self.pending.delete {
            return Ok(vec![record.record_id()]);
        }
        if self.selected_row_ids.is_empty() {
            return Err(CoreError::NoSelection);
        }
        Ok(self.selected_row_ids.clone())
    }

    pub fn can_submit_delete(&self) -> bool {
        !self.loading && self.delete_targets().is_ok()
    }

    /// The record an edit would submit. There is none until a single row
    /// was selected and converted, or a record was opened explicitly.
    pub fn edit_target(&self) -> CoreResult<&F> {
        self.pending.edit.as_ref().ok_or(CoreError::NoSelection)
    }

    pub fn can_submit_edit(&self) -> bool {
        !self.loading && self.edit_target().is_ok()
    }

    /// Working data a submit of `kind` sends. The add dialog falls back to
    /// the default record; the other kinds need their target.
    pub fn submit_data(&self, kind: DialogKind) -> CoreResult<F> {
        match kind {
            DialogKind::Add => Ok(self.pending.add.clone().unwrap_or_default()),
            DialogKind::Edit => self.edit_target().cloned(),
            DialogKind::Delete => self
                .pending
                .delete
                .clone()
                .ok_or(CoreError::NoSelection),
        }
    }

    // ===== Error / loading =====

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn set_error(&mut self, message: Option<String>) {
        self.error = message;
    }

    pub fn field_errors(&self) -> &FieldErrors {
        &self.field_errors
    }

    pub fn set_field_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.field_errors.insert(field.into(), message.into());
    }

    pub fn clear_field_errors(&mut self) {
        self.field_errors.clear();
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    // ===== Commit / revalidation =====

    /// Record a successful submit. The revalidation it causes is queued on
    /// the next transition into "all closed", or immediately if everything
    /// is closed already.
    pub fn mark_committed(&mut self) {
        if self.disposed {
            return;
        }
        self.commit_pending = true;
        if self.is_all_closed() {
            self.settle();
        }
    }

    pub fn is_commit_pending(&self) -> bool {
        self.commit_pending
    }

    /// Take the queued revalidation, if any. Returns `true` at most once per
    /// settled commit.
    pub fn take_revalidation(&mut self) -> bool {
        std::mem::take(&mut self.revalidation_queued)
    }

    // ===== Lifecycle =====

    pub fn token(&self) -> SessionToken {
        SessionToken(self.generation)
    }

    pub fn is_live(&self, token: SessionToken) -> bool {
        !self.disposed && token.0 == self.generation
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Tear the session down. Every token handed out so far becomes stale
    /// and later requests are rejected.
    pub fn dispose(&mut self) {
        self.generation += 1;
        self.disposed = true;
        self.guard.take();
        self.history.clear();
        self.current = None;
        self.pending = PendingData::default();
        self.selection_snapshot = None;
        self.custom_data.clear();
        self.selected_row_ids.clear();
        self.dirty = false;
        self.error = None;
        self.field_errors.clear();
        self.loading = false;
        self.commit_pending = false;
        self.revalidation_queued = false;
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests;
