//! Test fixtures and mock collaborators

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex as StdMutex;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::{Mutex, RwLock};

use crate::error::{CoreError, CoreResult};
use crate::services::{DeleteContext, SubmitContext};
use crate::session::SessionHandle;
use crate::traits::{DeleteHandler, RowConverter, RowFetcher, SubmitHandler};
use crate::types::{DialogFields, GridRow, RowId, RowPage, RowQuery};

// ===== Fixtures =====

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestFields {
    pub id: RowId,
    pub name: String,
}

impl DialogFields for TestFields {
    fn record_id(&self) -> RowId {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestRow {
    pub id: RowId,
    pub name: String,
}

impl GridRow for TestRow {
    fn row_id(&self) -> RowId {
        self.id
    }
}

pub fn row(id: RowId) -> TestRow {
    TestRow {
        id,
        name: format!("row-{id}"),
    }
}

pub fn test_fields(id: RowId) -> TestFields {
    TestFields {
        id,
        name: format!("row-{id}"),
    }
}

// ===== MockRowConverter =====

#[derive(Default)]
pub struct MockRowConverter {
    failing: Mutex<HashSet<RowId>>,
    dispose_on_convert: Option<SessionHandle<TestFields>>,
    calls: AtomicUsize,
}

impl MockRowConverter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tears `session` down while the conversion is in flight.
    pub fn disposing(session: SessionHandle<TestFields>) -> Self {
        Self {
            dispose_on_convert: Some(session),
            ..Self::default()
        }
    }

    pub async fn fail_for(&self, id: RowId) {
        self.failing.lock().await.insert(id);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RowConverter<TestRow, TestFields> for MockRowConverter {
    async fn convert(&self, row: &TestRow) -> CoreResult<TestFields> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(session) = &self.dispose_on_convert {
            session.dispose();
        }
        if self.failing.lock().await.contains(&row.id) {
            return Err(CoreError::ConversionFailure(format!("row {}", row.id)));
        }
        Ok(TestFields {
            id: row.id,
            name: row.name.clone(),
        })
    }
}

// ===== MockRowFetcher =====

pub struct MockRowFetcher {
    rows: RwLock<Vec<TestRow>>,
    failure: RwLock<Option<CoreError>>,
    last_query: StdMutex<Option<RowQuery>>,
    calls: AtomicUsize,
}

impl MockRowFetcher {
    pub fn new(rows: Vec<TestRow>) -> Self {
        Self {
            rows: RwLock::new(rows),
            failure: RwLock::new(None),
            last_query: StdMutex::new(None),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_query(&self) -> Option<RowQuery> {
        *self.last_query.lock().unwrap()
    }

    pub async fn set_rows(&self, rows: Vec<TestRow>) {
        *self.rows.write().await = rows;
    }

    pub async fn fail_with(&self, failure: Option<CoreError>) {
        *self.failure.write().await = failure;
    }
}

#[async_trait]
impl RowFetcher<TestRow> for MockRowFetcher {
    async fn fetch(&self, query: &RowQuery, _auth_token: &str) -> CoreResult<RowPage<TestRow>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_query.lock().unwrap() = Some(*query);
        if let Some(err) = self.failure.read().await.clone() {
            return Err(err);
        }

        let rows = self.rows.read().await;
        let size = query.page_size as usize;
        let start = (query.page.saturating_sub(1) as usize) * size;
        Ok(RowPage {
            items: rows.iter().skip(start).take(size).cloned().collect(),
            total_count: rows.len() as u64,
        })
    }
}

// ===== MockSubmitHandler =====

/// What [`MockSubmitHandler`] does after "calling the backend".
#[derive(Debug, Clone)]
pub enum SubmitOutcome {
    Close,
    Escalate { key: &'static str, payload: Value },
    Fail(CoreError),
    FieldError { field: &'static str, message: &'static str },
}

pub struct MockSubmitHandler {
    outcome: StdMutex<SubmitOutcome>,
    submitted: StdMutex<Vec<TestFields>>,
    saw_loading: AtomicBool,
}

impl MockSubmitHandler {
    pub fn new(outcome: SubmitOutcome) -> Self {
        Self {
            outcome: StdMutex::new(outcome),
            submitted: StdMutex::new(Vec::new()),
            saw_loading: AtomicBool::new(false),
        }
    }

    pub fn set_outcome(&self, outcome: SubmitOutcome) {
        *self.outcome.lock().unwrap() = outcome;
    }

    pub fn submitted(&self) -> Vec<TestFields> {
        self.submitted.lock().unwrap().clone()
    }

    /// Whether the loading flag was set while the handler ran.
    pub fn saw_loading(&self) -> bool {
        self.saw_loading.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SubmitHandler<TestFields> for MockSubmitHandler {
    async fn submit(&self, data: TestFields, ctx: &SubmitContext<TestFields>) -> bool {
        let _loading = ctx.loading();
        self.saw_loading
            .store(ctx.session().read(|s| s.is_loading()), Ordering::SeqCst);
        self.submitted.lock().unwrap().push(data);

        let outcome = self.outcome.lock().unwrap().clone();
        match outcome {
            SubmitOutcome::Close => {
                ctx.close_dialog();
                true
            }
            SubmitOutcome::Escalate { key, payload } => {
                ctx.open_custom_dialog(key, payload);
                true
            }
            SubmitOutcome::Fail(err) => {
                ctx.report("Failed to save", &err);
                false
            }
            SubmitOutcome::FieldError { field, message } => {
                ctx.set_field_error(field, message);
                false
            }
        }
    }
}

// ===== MockDeleteHandler =====

#[derive(Default)]
pub struct MockDeleteHandler {
    failure: StdMutex<Option<CoreError>>,
    deleted: StdMutex<Vec<Vec<RowId>>>,
}

impl MockDeleteHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(err: CoreError) -> Self {
        Self {
            failure: StdMutex::new(Some(err)),
            ..Self::default()
        }
    }

    /// Identifier sets of every call, in order.
    pub fn deleted(&self) -> Vec<Vec<RowId>> {
        self.deleted.lock().unwrap().clone()
    }
}

#[async_trait]
impl DeleteHandler<TestFields> for MockDeleteHandler {
    async fn delete(&self, ctx: &DeleteContext<TestFields>) -> bool {
        let _loading = ctx.loading();
        self.deleted
            .lock()
            .unwrap()
            .push(ctx.identifiers().to_vec());

        let failure = self.failure.lock().unwrap().clone();
        match failure {
            Some(err) => {
                ctx.report("Failed to delete", &err);
                false
            }
            None => true,
        }
    }
}
