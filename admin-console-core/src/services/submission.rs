//! Context bundles handed to submit and delete handlers
//!
//! Every mutation a handler performs through a context is dropped once the
//! session it was created for has been disposed.

use serde_json::Value;

use crate::error::{CoreError, MISSING_AUTH_MESSAGE};
use crate::session::{SessionHandle, SessionToken};
use crate::types::{DialogFields, FieldSpec, RowId};

/// What a create/update handler may do besides its backend call.
pub struct SubmitContext<F> {
    session: SessionHandle<F>,
    token: SessionToken,
    company_id: i64,
    auth_token: String,
}

impl<F: DialogFields> SubmitContext<F> {
    pub fn new(session: SessionHandle<F>, company_id: i64, auth_token: impl Into<String>) -> Self {
        let token = session.token();
        Self {
            session,
            token,
            company_id,
            auth_token: auth_token.into(),
        }
    }

    /// Company scope of the page.
    pub fn company_id(&self) -> i64 {
        self.company_id
    }

    /// Opaque bearer token.
    pub fn auth_token(&self) -> &str {
        &self.auth_token
    }

    pub fn is_live(&self) -> bool {
        self.session.is_live(self.token)
    }

    /// `false`, with the global error set, when there is no bearer token.
    pub fn ensure_authenticated(&self) -> bool {
        if self.auth_token.trim().is_empty() {
            log::warn!("Submit attempted without a bearer token");
            self.set_global_error(MISSING_AUTH_MESSAGE);
            return false;
        }
        true
    }

    /// `false`, with a field error set, when a required `value` is blank.
    pub fn require(&self, spec: &FieldSpec, value: &str) -> bool {
        if spec.required && value.trim().is_empty() {
            self.set_field_error(spec.name, &format!("{} is required", spec.label));
            return false;
        }
        true
    }

    pub fn set_field_error(&self, field: &str, message: &str) {
        self.session
            .update_if_live(self.token, |s| s.set_field_error(field, message));
    }

    pub fn set_global_error(&self, message: impl Into<String>) {
        let message = message.into();
        self.session
            .update_if_live(self.token, |s| s.set_error(Some(message)));
    }

    /// Log `err` and show `"{prefix}: {message}"` in the error banner.
    pub fn report(&self, prefix: &str, err: &CoreError) {
        if err.is_expected() {
            log::warn!("{prefix}: {err}");
        } else {
            log::error!("{prefix}: {err}");
        }
        self.set_global_error(format!("{prefix}: {}", err.user_message()));
    }

    pub fn set_loading(&self, loading: bool) {
        self.session
            .update_if_live(self.token, |s| s.set_loading(loading));
    }

    /// Set the loading flag until the returned guard is dropped.
    pub fn loading(&self) -> LoadingGuard<'_, F> {
        self.set_loading(true);
        LoadingGuard { ctx: self }
    }

    /// Close the dialog after a definitive success.
    pub fn close_dialog(&self) {
        self.session
            .update_if_live(self.token, |s| s.close_current_dialog());
    }

    /// Escalate to a custom dialog. Bypasses the discard guard: after a
    /// successful submit there is nothing left to discard.
    pub fn open_custom_dialog(&self, key: &str, payload: Value) {
        self.session.update_if_live(self.token, |s| {
            s.open_custom_dialog(key, Some(payload), true);
        });
    }

    pub fn session(&self) -> &SessionHandle<F> {
        &self.session
    }
}

/// Resets the loading flag on drop, whatever path the handler exits by.
pub struct LoadingGuard<'a, F: DialogFields> {
    ctx: &'a SubmitContext<F>,
}

impl<F: DialogFields> Drop for LoadingGuard<'_, F> {
    fn drop(&mut self) {
        self.ctx.set_loading(false);
    }
}

/// What a delete handler receives: resolved identifiers plus reporting.
pub struct DeleteContext<F> {
    identifiers: Vec<RowId>,
    inner: SubmitContext<F>,
}

impl<F: DialogFields> DeleteContext<F> {
    pub fn new(
        session: SessionHandle<F>,
        identifiers: Vec<RowId>,
        company_id: i64,
        auth_token: impl Into<String>,
    ) -> Self {
        Self {
            identifiers,
            inner: SubmitContext::new(session, company_id, auth_token),
        }
    }

    pub fn identifiers(&self) -> &[RowId] {
        &self.identifiers
    }

    pub fn company_id(&self) -> i64 {
        self.inner.company_id()
    }

    pub fn auth_token(&self) -> &str {
        self.inner.auth_token()
    }

    pub fn ensure_authenticated(&self) -> bool {
        self.inner.ensure_authenticated()
    }

    pub fn set_global_error(&self, message: impl Into<String>) {
        self.inner.set_global_error(message);
    }

    pub fn report(&self, prefix: &str, err: &CoreError) {
        self.inner.report(prefix, err);
    }

    pub fn loading(&self) -> LoadingGuard<'_, F> {
        self.inner.loading()
    }
}
