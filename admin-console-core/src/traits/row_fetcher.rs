//! Paginated row fetching abstraction

use async_trait::async_trait;

use crate::error::CoreResult;
use crate::types::{RowPage, RowQuery};

/// Fetches one page of rows for a company.
///
/// Implementations:
/// - `AdministratorRowFetcher` / `ApiKeyRowFetcher` (REST backend)
/// - `MockRowFetcher` (tests)
#[async_trait]
pub trait RowFetcher<R>: Send + Sync {
    /// # Arguments
    /// * `query` - company scope and 1-based page
    /// * `auth_token` - opaque bearer token
    async fn fetch(&self, query: &RowQuery, auth_token: &str) -> CoreResult<RowPage<R>>;
}
