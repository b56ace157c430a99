//! API keys page binding
//!
//! Creating a key and rerolling its secret are the only calls that return
//! the client secret in clear text. Both escalate to the one-time secret
//! dialog instead of closing.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use admin_console_api::{
    AdminApiClient, ApiKeyListDto, CreateApiKeyRequest, DeleteApiKeysRequest, ListRequest,
    PaginationParams, RerollApiKeyRequest, UpdateApiKeyRequest,
};

use super::crud_page::{CrudHandlers, CrudPage};
use super::delete_prompt::DeleteTitles;
use super::row_data_source::RowDataSource;
use super::submission::{DeleteContext, SubmitContext};
use crate::error::{CoreError, CoreResult};
use crate::session::DialogSession;
use crate::traits::{DeleteHandler, RowConverter, RowFetcher, SubmitHandler};
use crate::types::{DialogFields, FieldSpec, GridRow, RowId, RowPage, RowQuery};

/// Key of the custom dialog showing a freshly issued secret.
pub const CLIENT_SECRET_DIALOG: &str = "clientIdSecretDialog";

/// Name of the reroll action registered on the API keys page.
pub const REROLL_ACTION: &str = "reroll";

pub const API_KEY_DELETE_TITLES: DeleteTitles = DeleteTitles {
    singular: "Are you sure you want to delete the apiKey?",
    plural: "Are you sure you want to delete the selected apiKeys?",
};

const fn read_only(name: &'static str, label: &'static str) -> FieldSpec {
    FieldSpec {
        name,
        label,
        required: false,
        addable: false,
        editable: false,
    }
}

const fn input(name: &'static str, label: &'static str) -> FieldSpec {
    FieldSpec {
        name,
        label,
        required: true,
        addable: true,
        editable: true,
    }
}

const NAME: FieldSpec = input("name", "Name");
const DESCRIPTION: FieldSpec = input("description", "Description");
const SCOPES: FieldSpec = input("scopes", "Scopes");

const API_KEY_FIELDS: &[FieldSpec] = &[
    read_only("id", "ID"),
    read_only("clientId", "Client ID"),
    input("enabled", "Enabled"),
    NAME,
    DESCRIPTION,
    SCOPES,
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKeyFields {
    pub id: RowId,
    pub enabled: bool,
    pub client_id: String,
    pub name: String,
    pub description: String,
    /// Comma-separated, as typed into the dialog.
    pub scopes: String,
}

impl Default for ApiKeyFields {
    fn default() -> Self {
        Self {
            id: 0,
            enabled: true,
            client_id: String::new(),
            name: String::new(),
            description: String::new(),
            scopes: String::new(),
        }
    }
}

impl ApiKeyFields {
    /// Scopes as the backend expects them. Blank entries are dropped.
    pub fn scope_list(&self) -> Vec<String> {
        self.scopes
            .split(',')
            .map(str::trim)
            .filter(|scope| !scope.is_empty())
            .map(ToString::to_string)
            .collect()
    }

    fn validate(&self, ctx: &SubmitContext<Self>) -> bool {
        // Check every field so all errors show at once.
        let name = ctx.require(&NAME, &self.name);
        let description = ctx.require(&DESCRIPTION, &self.description);
        let scopes = ctx.require(&SCOPES, &self.scopes);
        name && description && scopes
    }
}

impl DialogFields for ApiKeyFields {
    const FIELDS: &'static [FieldSpec] = API_KEY_FIELDS;

    fn record_id(&self) -> RowId {
        self.id
    }
}

impl From<&ApiKeyListDto> for ApiKeyFields {
    fn from(row: &ApiKeyListDto) -> Self {
        Self {
            id: row.id,
            enabled: row.enabled,
            client_id: row.client_id.clone(),
            name: row.name.clone(),
            description: row.description.clone(),
            scopes: row.scopes.join(","),
        }
    }
}

impl GridRow for ApiKeyListDto {
    fn row_id(&self) -> RowId {
        self.id
    }
}

/// Payload of the one-time secret dialog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientSecretPayload {
    pub client_id: String,
    pub client_secret: String,
}

impl ClientSecretPayload {
    /// Read the payload back from the session. `None` ("No data available")
    /// when the dialog has no payload or it is malformed.
    pub fn from_session<F: DialogFields>(session: &DialogSession<F>) -> Option<Self> {
        let payload = session.custom_data(CLIENT_SECRET_DIALOG)?;
        serde_json::from_value(Value::Object(payload.clone())).ok()
    }

    fn into_value(self) -> Value {
        json!({
            "clientId": self.client_id,
            "clientSecret": self.client_secret,
        })
    }
}

pub type ApiKeyPage = CrudPage<ApiKeyListDto, ApiKeyFields>;

/// Build the API keys page of `company_id`, with the reroll action
/// registered under [`REROLL_ACTION`].
pub fn api_key_page(
    client: &Arc<AdminApiClient>,
    company_id: i64,
    auth_token: &str,
    dedupe_interval: Duration,
) -> ApiKeyPage {
    let source = RowDataSource::new(
        Arc::new(ApiKeyRowFetcher::new(Arc::clone(client))),
        auth_token,
    )
    .with_dedupe_interval(dedupe_interval);
    let handlers = CrudHandlers {
        add: Arc::new(ApiKeyCreateHandler::new(Arc::clone(client))),
        edit: Arc::new(ApiKeyUpdateHandler::new(Arc::clone(client))),
        delete: Arc::new(ApiKeyDeleteHandler::new(Arc::clone(client))),
    };
    CrudPage::new(
        company_id,
        auth_token,
        source,
        Arc::new(ApiKeyRowConverter),
        handlers,
        API_KEY_DELETE_TITLES,
    )
    .with_action(
        REROLL_ACTION,
        Arc::new(ApiKeyRerollHandler::new(Arc::clone(client))),
    )
}

// ===== Rows =====

pub struct ApiKeyRowFetcher {
    client: Arc<AdminApiClient>,
}

impl ApiKeyRowFetcher {
    pub fn new(client: Arc<AdminApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RowFetcher<ApiKeyListDto> for ApiKeyRowFetcher {
    async fn fetch(&self, query: &RowQuery, auth_token: &str) -> CoreResult<RowPage<ApiKeyListDto>> {
        let request = ListRequest::new(
            query.company_id,
            PaginationParams {
                page: query.page,
                page_size: query.page_size,
            },
        );
        let page = self.client.list_api_keys(auth_token, &request).await?;
        Ok(page.into())
    }
}

pub struct ApiKeyRowConverter;

#[async_trait]
impl RowConverter<ApiKeyListDto, ApiKeyFields> for ApiKeyRowConverter {
    async fn convert(&self, row: &ApiKeyListDto) -> CoreResult<ApiKeyFields> {
        Ok(row.into())
    }
}

// ===== Handlers =====

pub struct ApiKeyCreateHandler {
    client: Arc<AdminApiClient>,
}

impl ApiKeyCreateHandler {
    pub fn new(client: Arc<AdminApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SubmitHandler<ApiKeyFields> for ApiKeyCreateHandler {
    async fn submit(&self, data: ApiKeyFields, ctx: &SubmitContext<ApiKeyFields>) -> bool {
        if !ctx.ensure_authenticated() || !data.validate(ctx) {
            return false;
        }

        let _loading = ctx.loading();
        let body = CreateApiKeyRequest {
            company_id: ctx.company_id(),
            enabled: data.enabled,
            scopes: data.scope_list(),
            name: data.name,
            description: data.description,
        };
        match self.client.create_api_key(ctx.auth_token(), &body).await {
            Ok(created) => {
                log::info!("Created API key {}", created.id);
                let payload = ClientSecretPayload {
                    client_id: created.client_id,
                    client_secret: created.client_secret,
                };
                ctx.open_custom_dialog(CLIENT_SECRET_DIALOG, payload.into_value());
                true
            }
            Err(err) => {
                ctx.report("Failed to create API key", &CoreError::from(err));
                false
            }
        }
    }
}

pub struct ApiKeyUpdateHandler {
    client: Arc<AdminApiClient>,
}

impl ApiKeyUpdateHandler {
    pub fn new(client: Arc<AdminApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SubmitHandler<ApiKeyFields> for ApiKeyUpdateHandler {
    async fn submit(&self, data: ApiKeyFields, ctx: &SubmitContext<ApiKeyFields>) -> bool {
        if !ctx.ensure_authenticated() || !data.validate(ctx) {
            return false;
        }

        let _loading = ctx.loading();
        let id = data.id;
        let body = UpdateApiKeyRequest {
            company_id: ctx.company_id(),
            enabled: data.enabled,
            scopes: data.scope_list(),
            name: data.name,
            description: data.description,
        };
        match self.client.update_api_key(ctx.auth_token(), id, &body).await {
            Ok(()) => {
                log::info!("Updated API key {id}");
                ctx.close_dialog();
                true
            }
            Err(err) => {
                ctx.report("Failed to update API key", &CoreError::from(err));
                false
            }
        }
    }
}

/// Regenerates the secret of the key being edited.
pub struct ApiKeyRerollHandler {
    client: Arc<AdminApiClient>,
}

impl ApiKeyRerollHandler {
    pub fn new(client: Arc<AdminApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SubmitHandler<ApiKeyFields> for ApiKeyRerollHandler {
    async fn submit(&self, data: ApiKeyFields, ctx: &SubmitContext<ApiKeyFields>) -> bool {
        if !ctx.ensure_authenticated() {
            return false;
        }

        let _loading = ctx.loading();
        let body = RerollApiKeyRequest {
            id: data.id,
            company_id: ctx.company_id(),
        };
        match self.client.reroll_api_key(ctx.auth_token(), &body).await {
            Ok(rerolled) => {
                log::info!("Rerolled secret of API key {}", data.id);
                let payload = ClientSecretPayload {
                    client_id: rerolled.client_id,
                    client_secret: rerolled.client_secret,
                };
                ctx.open_custom_dialog(CLIENT_SECRET_DIALOG, payload.into_value());
                true
            }
            Err(err) => {
                ctx.report("Failed to reroll API key secret", &CoreError::from(err));
                false
            }
        }
    }
}

pub struct ApiKeyDeleteHandler {
    client: Arc<AdminApiClient>,
}

impl ApiKeyDeleteHandler {
    pub fn new(client: Arc<AdminApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DeleteHandler<ApiKeyFields> for ApiKeyDeleteHandler {
    async fn delete(&self, ctx: &DeleteContext<ApiKeyFields>) -> bool {
        if !ctx.ensure_authenticated() {
            return false;
        }

        let _loading = ctx.loading();
        let body = DeleteApiKeysRequest {
            api_key_ids: ctx.identifiers().to_vec(),
            company_id: ctx.company_id(),
        };
        match self.client.delete_api_keys(ctx.auth_token(), &body).await {
            Ok(()) => {
                log::info!("Deleted {} API key(s)", body.api_key_ids.len());
                true
            }
            Err(err) => {
                ctx.report("Failed to delete API key(s)", &CoreError::from(err));
                false
            }
        }
    }
}
