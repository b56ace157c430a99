//! Row data source
//!
//! Paginated row fetching with a query-keyed cache, request deduplication
//! and explicit revalidation. The cache may be shared between pages reading
//! the same company/page; only [`RowDataSource::revalidate`] bypasses it.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, RwLock};
use tokio::time::Instant;

use crate::error::CoreResult;
use crate::traits::RowFetcher;
use crate::types::{RowPage, RowQuery};

/// Fetches of the same query within this window reuse the cached page.
pub const DEFAULT_DEDUPE_INTERVAL: Duration = Duration::from_millis(2000);

struct CachedPage<R> {
    page: RowPage<R>,
    fetched_at: Instant,
}

/// Query-keyed page cache.
pub struct RowCache<R> {
    entries: RwLock<HashMap<RowQuery, CachedPage<R>>>,
}

impl<R> Default for RowCache<R> {
    fn default() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }
}

impl<R: Clone> RowCache<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached page for `query`, however old.
    pub async fn get(&self, query: &RowQuery) -> Option<RowPage<R>> {
        self.entries
            .read()
            .await
            .get(query)
            .map(|entry| entry.page.clone())
    }

    async fn fresh(&self, query: &RowQuery, max_age: Duration) -> Option<RowPage<R>> {
        let entries = self.entries.read().await;
        let entry = entries.get(query)?;
        (entry.fetched_at.elapsed() < max_age).then(|| entry.page.clone())
    }

    async fn store(&self, query: RowQuery, page: RowPage<R>) {
        self.entries.write().await.insert(
            query,
            CachedPage {
                page,
                fetched_at: Instant::now(),
            },
        );
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

/// Latest page published to subscribers.
pub type PageUpdates<R> = watch::Receiver<Option<Arc<RowPage<R>>>>;

pub struct RowDataSource<R> {
    fetcher: Arc<dyn RowFetcher<R>>,
    cache: Arc<RowCache<R>>,
    auth_token: String,
    dedupe_interval: Duration,
    current: RwLock<Option<RowQuery>>,
    updates: watch::Sender<Option<Arc<RowPage<R>>>>,
}

impl<R: Clone + Send + Sync + 'static> RowDataSource<R> {
    pub fn new(fetcher: Arc<dyn RowFetcher<R>>, auth_token: impl Into<String>) -> Self {
        let (updates, _) = watch::channel(None);
        Self {
            fetcher,
            cache: Arc::new(RowCache::new()),
            auth_token: auth_token.into(),
            dedupe_interval: DEFAULT_DEDUPE_INTERVAL,
            current: RwLock::new(None),
            updates,
        }
    }

    /// Share `cache` with other sources.
    #[must_use]
    pub fn with_cache(mut self, cache: Arc<RowCache<R>>) -> Self {
        self.cache = cache;
        self
    }

    #[must_use]
    pub fn with_dedupe_interval(mut self, interval: Duration) -> Self {
        self.dedupe_interval = interval;
        self
    }

    pub fn cache(&self) -> &Arc<RowCache<R>> {
        &self.cache
    }

    pub async fn current_query(&self) -> Option<RowQuery> {
        *self.current.read().await
    }

    pub fn subscribe(&self) -> PageUpdates<R> {
        self.updates.subscribe()
    }

    /// Make `query` current and return its page, from the cache when it was
    /// fetched within the dedupe interval.
    pub async fn fetch(&self, query: RowQuery) -> CoreResult<RowPage<R>> {
        *self.current.write().await = Some(query);

        if let Some(page) = self.cache.fresh(&query, self.dedupe_interval).await {
            log::debug!("Rows for {query:?} served from cache");
            self.publish(&page);
            return Ok(page);
        }
        self.load(query).await
    }

    /// Refetch the current query, ignoring the cache. `Ok(None)` when nothing
    /// has been fetched yet.
    pub async fn revalidate(&self) -> CoreResult<Option<RowPage<R>>> {
        let Some(query) = self.current_query().await else {
            log::debug!("Nothing to revalidate");
            return Ok(None);
        };
        log::debug!("Revalidating rows for {query:?}");
        self.load(query).await.map(Some)
    }

    async fn load(&self, query: RowQuery) -> CoreResult<RowPage<R>> {
        let page = match self.fetcher.fetch(&query, &self.auth_token).await {
            Ok(page) => page,
            Err(err) => {
                if err.is_expected() {
                    log::warn!("Fetching rows for {query:?} failed: {err}");
                } else {
                    log::error!("Fetching rows for {query:?} failed: {err}");
                }
                return Err(err);
            }
        };
        self.cache.store(query, page.clone()).await;
        self.publish(&page);
        Ok(page)
    }

    fn publish(&self, page: &RowPage<R>) {
        self.updates.send_replace(Some(Arc::new(page.clone())));
    }
}
