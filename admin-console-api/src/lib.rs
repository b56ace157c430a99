//! # admin-console-api
//!
//! Typed REST client for the access-control admin backend: company
//! administrators and API keys.
//!
//! ## Feature Flags
//!
//! - **`native-tls`** *(default)*: use the platform's native TLS implementation.
//! - **`rustls`**: use rustls.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use admin_console_api::{AdminApiClient, ListRequest, PaginationParams};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = AdminApiClient::new("http://localhost:8080")?;
//!
//!     let request = ListRequest::new(42, PaginationParams::default());
//!     let page = client.list_api_keys("bearer-token", &request).await?;
//!     for key in &page.items {
//!         println!("{} ({})", key.name, key.client_id);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Every call returns [`ApiResult<T>`](ApiResult). Non-success statuses are
//! classified by [`ApiError::from_status`]; list calls retry transient
//! failures ([`ApiError::is_retryable`]) with exponential backoff, mutating
//! calls are sent exactly once.

mod client;
mod dto;
mod error;
mod http_client;
mod routes;
mod types;
mod utils;

pub use client::{AdminApiClient, AdminApiClientBuilder, DEFAULT_MAX_RETRIES, DEFAULT_TIMEOUT};

pub use dto::{
    ADMINISTRATOR_ROLE, AdministratorListDto, ApiKeyListDto, CreateApiKeyRequest,
    CreateApiKeyResponse, DeleteAdministratorsRequest, DeleteApiKeysRequest,
    InviteAdministratorRequest, RerollApiKeyRequest, RerollApiKeyResponse,
    UpdateAdministratorRequest, UpdateApiKeyRequest,
};

pub use error::{ApiError, ApiResult};

pub use routes::ApiRoutes;

pub use types::{ListEnvelope, ListRequest, MAX_PAGE_SIZE, PaginatedResponse, PaginationParams};

pub use utils::log_sanitizer;
