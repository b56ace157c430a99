//! Admin backend client

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::dto::{
    AdministratorListDto, ApiKeyListDto, CreateApiKeyRequest, CreateApiKeyResponse,
    DeleteAdministratorsRequest, DeleteApiKeysRequest, InviteAdministratorRequest,
    RerollApiKeyRequest, RerollApiKeyResponse, UpdateAdministratorRequest, UpdateApiKeyRequest,
};
use crate::error::{ApiError, ApiResult};
use crate::http_client::HttpUtils;
use crate::routes::ApiRoutes;
use crate::types::{ListEnvelope, ListRequest, PaginatedResponse};
use crate::utils::log_sanitizer::sanitize_for_log;

/// Retries applied to list calls unless configured otherwise.
pub const DEFAULT_MAX_RETRIES: u32 = 2;

/// Request timeout unless configured otherwise.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the administrator and API-key endpoints.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct AdminApiClient {
    client: Client,
    routes: ApiRoutes,
    max_retries: u32,
}

/// Builder for [`AdminApiClient`].
#[derive(Debug, Clone)]
pub struct AdminApiClientBuilder {
    base_url: String,
    timeout: Duration,
    max_retries: u32,
}

impl AdminApiClientBuilder {
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn build(self) -> ApiResult<AdminApiClient> {
        let client = Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| ApiError::Configuration {
                detail: e.to_string(),
            })?;
        Ok(AdminApiClient {
            client,
            routes: ApiRoutes::new(self.base_url),
            max_retries: self.max_retries,
        })
    }
}

impl AdminApiClient {
    /// Client with default timeout and retry settings.
    pub fn new(base_url: impl Into<String>) -> ApiResult<Self> {
        Self::builder(base_url).build()
    }

    pub fn builder(base_url: impl Into<String>) -> AdminApiClientBuilder {
        AdminApiClientBuilder {
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    /// Wrap an existing `reqwest::Client` (shared pool, custom TLS, ...).
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            routes: ApiRoutes::new(base_url),
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    pub fn routes(&self) -> &ApiRoutes {
        &self.routes
    }

    // ============ Administrators ============

    pub async fn list_administrators(
        &self,
        token: &str,
        request: &ListRequest,
    ) -> ApiResult<PaginatedResponse<AdministratorListDto>> {
        self.list(
            &self.routes.administrator_list(),
            "administrator/list",
            token,
            request,
        )
        .await
    }

    pub async fn invite_administrator(
        &self,
        token: &str,
        body: &InviteAdministratorRequest,
    ) -> ApiResult<()> {
        self.send(
            Method::POST,
            &self.routes.administrator_invite(),
            "administrator/invite",
            token,
            body,
            false,
        )
        .await
        .map(drop)
    }

    pub async fn update_administrator(
        &self,
        token: &str,
        id: i64,
        body: &UpdateAdministratorRequest,
    ) -> ApiResult<()> {
        self.send(
            Method::PUT,
            &self.routes.administrator(id),
            "administrator/{id}",
            token,
            body,
            false,
        )
        .await
        .map(drop)
    }

    pub async fn delete_administrators(
        &self,
        token: &str,
        body: &DeleteAdministratorsRequest,
    ) -> ApiResult<()> {
        self.send(
            Method::DELETE,
            &self.routes.administrator_index(),
            "administrator",
            token,
            body,
            false,
        )
        .await
        .map(drop)
    }

    // ============ API keys ============

    pub async fn list_api_keys(
        &self,
        token: &str,
        request: &ListRequest,
    ) -> ApiResult<PaginatedResponse<ApiKeyListDto>> {
        self.list(&self.routes.api_key_list(), "api-key/list", token, request)
            .await
    }

    pub async fn create_api_key(
        &self,
        token: &str,
        body: &CreateApiKeyRequest,
    ) -> ApiResult<CreateApiKeyResponse> {
        let endpoint = "api-key";
        let text = self
            .send(
                Method::POST,
                &self.routes.api_key_index(),
                endpoint,
                token,
                body,
                false,
            )
            .await?;
        HttpUtils::parse_json(&text, endpoint)
    }

    pub async fn update_api_key(
        &self,
        token: &str,
        id: i64,
        body: &UpdateApiKeyRequest,
    ) -> ApiResult<()> {
        self.send(
            Method::PUT,
            &self.routes.api_key(id),
            "api-key/{id}",
            token,
            body,
            false,
        )
        .await
        .map(drop)
    }

    pub async fn reroll_api_key(
        &self,
        token: &str,
        body: &RerollApiKeyRequest,
    ) -> ApiResult<RerollApiKeyResponse> {
        let endpoint = "api-key/{id}/reroll";
        let text = self
            .send(
                Method::POST,
                &self.routes.api_key_reroll(body.id),
                endpoint,
                token,
                body,
                false,
            )
            .await?;
        HttpUtils::parse_json(&text, endpoint)
    }

    pub async fn delete_api_keys(&self, token: &str, body: &DeleteApiKeysRequest) -> ApiResult<()> {
        self.send(
            Method::DELETE,
            &self.routes.api_key_index(),
            "api-key",
            token,
            body,
            false,
        )
        .await
        .map(drop)
    }

    // ============ Plumbing ============

    async fn list<T: DeserializeOwned>(
        &self,
        url: &str,
        endpoint: &str,
        token: &str,
        request: &ListRequest,
    ) -> ApiResult<PaginatedResponse<T>> {
        let text = self
            .send(Method::POST, url, endpoint, token, request, true)
            .await?;
        let envelope: ListEnvelope<T> = HttpUtils::parse_json(&text, endpoint)?;
        Ok(envelope.into_page(request))
    }

    async fn send<B: Serialize>(
        &self,
        method: Method,
        url: &str,
        endpoint: &str,
        token: &str,
        body: &B,
        retry: bool,
    ) -> ApiResult<String> {
        let payload = serde_json::to_vec(body).map_err(|e| ApiError::Serialization {
            endpoint: endpoint.to_string(),
            detail: e.to_string(),
        })?;
        log::debug!(
            "[{endpoint}] Request Body: {}",
            sanitize_for_log(&String::from_utf8_lossy(&payload))
        );

        let method_name = method.as_str().to_string();
        let request = self
            .client
            .request(method, url)
            .bearer_auth(token)
            .header(CONTENT_TYPE, "application/json")
            .body(payload);

        if retry {
            HttpUtils::execute_request_with_retry(request, &method_name, endpoint, self.max_retries)
                .await
        } else {
            HttpUtils::execute_request(request, &method_name, endpoint).await
        }
    }
}
