//! Administrators page binding

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use admin_console_api::{
    AdminApiClient, AdministratorListDto, DeleteAdministratorsRequest, InviteAdministratorRequest,
    ListRequest, PaginationParams, UpdateAdministratorRequest, ADMINISTRATOR_ROLE,
};

use super::crud_page::{CrudHandlers, CrudPage};
use super::delete_prompt::DeleteTitles;
use super::row_data_source::RowDataSource;
use super::submission::{DeleteContext, SubmitContext};
use crate::error::{CoreError, CoreResult};
use crate::traits::{DeleteHandler, RowConverter, RowFetcher, SubmitHandler};
use crate::types::{DialogFields, FieldSpec, GridRow, RowId, RowPage, RowQuery};

pub const ADMINISTRATOR_DELETE_TITLES: DeleteTitles = DeleteTitles {
    singular: "Are you sure you want to remove this administrator from the company?",
    plural: "Are you sure you want to remove the selected administrators from the company?",
};

const USERNAME: FieldSpec = FieldSpec {
    name: "username",
    label: "Username",
    required: true,
    addable: true,
    editable: false,
};

const ADMINISTRATOR_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        name: "id",
        label: "ID",
        required: false,
        addable: false,
        editable: false,
    },
    FieldSpec {
        name: "name",
        label: "Name",
        required: false,
        addable: false,
        editable: false,
    },
    FieldSpec {
        name: "status",
        label: "Status",
        required: false,
        addable: false,
        editable: false,
    },
    USERNAME,
    FieldSpec {
        name: "enabled",
        label: "Enabled",
        required: false,
        addable: true,
        editable: true,
    },
];

/// Invitation state, derived from the row's `accepted` flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdministratorStatus {
    #[default]
    Invited,
    Active,
}

impl fmt::Display for AdministratorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Invited => write!(f, "Invited"),
            Self::Active => write!(f, "Active"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdministratorFields {
    pub id: RowId,
    pub name: String,
    pub username: String,
    pub enabled: bool,
    pub status: AdministratorStatus,
}

impl DialogFields for AdministratorFields {
    const FIELDS: &'static [FieldSpec] = ADMINISTRATOR_FIELDS;

    fn record_id(&self) -> RowId {
        self.id
    }
}

impl From<&AdministratorListDto> for AdministratorFields {
    fn from(row: &AdministratorListDto) -> Self {
        Self {
            id: row.id,
            name: row.name.clone(),
            username: row.username.clone(),
            enabled: row.enabled,
            status: if row.accepted {
                AdministratorStatus::Active
            } else {
                AdministratorStatus::Invited
            },
        }
    }
}

impl GridRow for AdministratorListDto {
    fn row_id(&self) -> RowId {
        self.id
    }
}

pub type AdministratorPage = CrudPage<AdministratorListDto, AdministratorFields>;

/// Build the administrators page of `company_id`.
pub fn administrator_page(
    client: &Arc<AdminApiClient>,
    company_id: i64,
    auth_token: &str,
    dedupe_interval: Duration,
) -> AdministratorPage {
    let source = RowDataSource::new(
        Arc::new(AdministratorRowFetcher::new(Arc::clone(client))),
        auth_token,
    )
    .with_dedupe_interval(dedupe_interval);
    let handlers = CrudHandlers {
        add: Arc::new(AdministratorInviteHandler::new(Arc::clone(client))),
        edit: Arc::new(AdministratorUpdateHandler::new(Arc::clone(client))),
        delete: Arc::new(AdministratorDeleteHandler::new(Arc::clone(client))),
    };
    CrudPage::new(
        company_id,
        auth_token,
        source,
        Arc::new(AdministratorRowConverter),
        handlers,
        ADMINISTRATOR_DELETE_TITLES,
    )
}

// ===== Rows =====

pub struct AdministratorRowFetcher {
    client: Arc<AdminApiClient>,
}

impl AdministratorRowFetcher {
    pub fn new(client: Arc<AdminApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RowFetcher<AdministratorListDto> for AdministratorRowFetcher {
    async fn fetch(
        &self,
        query: &RowQuery,
        auth_token: &str,
    ) -> CoreResult<RowPage<AdministratorListDto>> {
        let request = ListRequest::new(
            query.company_id,
            PaginationParams {
                page: query.page,
                page_size: query.page_size,
            },
        );
        let page = self.client.list_administrators(auth_token, &request).await?;
        Ok(page.into())
    }
}

pub struct AdministratorRowConverter;

#[async_trait]
impl RowConverter<AdministratorListDto, AdministratorFields> for AdministratorRowConverter {
    async fn convert(&self, row: &AdministratorListDto) -> CoreResult<AdministratorFields> {
        Ok(row.into())
    }
}

// ===== Handlers =====

pub struct AdministratorInviteHandler {
    client: Arc<AdminApiClient>,
}

impl AdministratorInviteHandler {
    pub fn new(client: Arc<AdminApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SubmitHandler<AdministratorFields> for AdministratorInviteHandler {
    async fn submit(&self, data: AdministratorFields, ctx: &SubmitContext<AdministratorFields>) -> bool {
        if !ctx.ensure_authenticated() || !ctx.require(&USERNAME, &data.username) {
            return false;
        }

        let _loading = ctx.loading();
        let body = InviteAdministratorRequest {
            company_id: ctx.company_id(),
            enabled: data.enabled,
            role: ADMINISTRATOR_ROLE.to_string(),
            username: data.username.trim().to_string(),
        };
        match self.client.invite_administrator(ctx.auth_token(), &body).await {
            Ok(()) => {
                log::info!("Invited administrator to company {}", body.company_id);
                ctx.close_dialog();
                true
            }
            Err(err) => {
                ctx.report("Failed to invite administrator", &CoreError::from(err));
                false
            }
        }
    }
}

pub struct AdministratorUpdateHandler {
    client: Arc<AdminApiClient>,
}

impl AdministratorUpdateHandler {
    pub fn new(client: Arc<AdminApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SubmitHandler<AdministratorFields> for AdministratorUpdateHandler {
    async fn submit(&self, data: AdministratorFields, ctx: &SubmitContext<AdministratorFields>) -> bool {
        if !ctx.ensure_authenticated() {
            return false;
        }

        let _loading = ctx.loading();
        let body = UpdateAdministratorRequest {
            company_id: ctx.company_id(),
            enabled: data.enabled,
            role: ADMINISTRATOR_ROLE.to_string(),
        };
        match self
            .client
            .update_administrator(ctx.auth_token(), data.id, &body)
            .await
        {
            Ok(()) => {
                log::info!("Updated administrator {}", data.id);
                ctx.close_dialog();
                true
            }
            Err(err) => {
                ctx.report("Failed to update administrator", &CoreError::from(err));
                false
            }
        }
    }
}

pub struct AdministratorDeleteHandler {
    client: Arc<AdminApiClient>,
}

impl AdministratorDeleteHandler {
    pub fn new(client: Arc<AdminApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DeleteHandler<AdministratorFields> for AdministratorDeleteHandler {
    async fn delete(&self, ctx: &DeleteContext<AdministratorFields>) -> bool {
        if !ctx.ensure_authenticated() {
            return false;
        }

        let _loading = ctx.loading();
        let body = DeleteAdministratorsRequest {
            administrator_ids: ctx.identifiers().to_vec(),
            company_id: ctx.company_id(),
        };
        match self.client.delete_administrators(ctx.auth_token(), &body).await {
            Ok(()) => {
                log::info!("Deleted {} administrator(s)", body.administrator_ids.len());
                true
            }
            Err(err) => {
                ctx.report("Failed to delete administrator(s)", &CoreError::from(err));
                false
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::error::MISSING_AUTH_MESSAGE;
    use crate::session::SessionHandle;
    use crate::types::DialogKind;

    /// Nothing listens on the discard port, so every call fails fast.
    fn unreachable_client() -> Arc<AdminApiClient> {
        Arc::new(
            AdminApiClient::builder("http://127.0.0.1:9")
                .timeout(Duration::from_secs(2))
                .max_retries(0)
                .build()
                .unwrap(),
        )
    }

    fn dto(accepted: bool) -> AdministratorListDto {
        AdministratorListDto {
            id: 4,
            enabled: true,
            accepted,
            username: "kari".to_string(),
            email: "kari@example.com".to_string(),
            name: "Kari".to_string(),
        }
    }

    fn add_context(token: &str) -> (SessionHandle<AdministratorFields>, SubmitContext<AdministratorFields>) {
        let session = SessionHandle::new();
        session.update(|s| s.open_dialog(DialogKind::Add, false));
        let ctx = SubmitContext::new(session.clone(), 7, token);
        (session, ctx)
    }

    #[test]
    fn defaults() {
        let fields = AdministratorFields::default();
        assert_eq!(fields.id, 0);
        assert!(!fields.enabled);
        assert_eq!(fields.status, AdministratorStatus::Invited);
    }

    #[test]
    fn status_follows_accepted() {
        assert_eq!(AdministratorFields::from(&dto(false)).status, AdministratorStatus::Invited);
        let fields = AdministratorFields::from(&dto(true));
        assert_eq!(fields.status, AdministratorStatus::Active);
        assert_eq!(fields.username, "kari");
        assert_eq!(fields.record_id(), 4);
    }

    #[test]
    fn only_username_and_enabled_are_addable() {
        let addable: Vec<_> = AdministratorFields::FIELDS
            .iter()
            .filter(|f| f.is_input_in(DialogKind::Add))
            .map(|f| f.name)
            .collect();
        let editable: Vec<_> = AdministratorFields::FIELDS
            .iter()
            .filter(|f| f.is_input_in(DialogKind::Edit))
            .map(|f| f.name)
            .collect();
        assert_eq!(addable, vec!["username", "enabled"]);
        assert_eq!(editable, vec!["enabled"]);
    }

    #[tokio::test]
    async fn invite_requires_username() {
        let handler = AdministratorInviteHandler::new(unreachable_client());
        let (session, ctx) = add_context("token");

        assert!(!handler.submit(AdministratorFields::default(), &ctx).await);

        session.read(|s| {
            assert_eq!(
                s.field_errors().get("username").map(String::as_str),
                Some("Username is required")
            );
            assert!(s.error().is_none());
            assert!(!s.is_loading());
        });
    }

    #[tokio::test]
    async fn invite_without_token_is_rejected() {
        let handler = AdministratorInviteHandler::new(unreachable_client());
        let (session, ctx) = add_context("");

        assert!(!handler.submit(AdministratorFields::default(), &ctx).await);
        assert_eq!(
            session.read(|s| s.error().map(ToString::to_string)).as_deref(),
            Some(MISSING_AUTH_MESSAGE)
        );
    }

    #[tokio::test]
    async fn invite_failure_is_prefixed_and_keeps_dialog() {
        let handler = AdministratorInviteHandler::new(unreachable_client());
        let (session, ctx) = add_context("token");
        let data = AdministratorFields {
            username: "kari".to_string(),
            ..AdministratorFields::default()
        };

        assert!(!handler.submit(data, &ctx).await);

        session.read(|s| {
            assert!(s
                .error()
                .unwrap()
                .starts_with("Failed to invite administrator: "));
            assert!(s.is_open(&DialogKind::Add.into()));
            assert!(!s.is_loading());
        });
    }
}
