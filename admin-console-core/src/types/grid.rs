use std::collections::BTreeSet;

use admin_console_api::PaginatedResponse;
use serde::{Deserialize, Serialize};

/// Identifier of a grid row / entity.
pub type RowId = i64;

/// A row as the grid receives it from the backend.
pub trait GridRow: Clone + Send + Sync + 'static {
    fn row_id(&self) -> RowId;
}

/// Grid pagination state. `page` is 0-based, as the grid shows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridPagination {
    pub page: u32,
    pub page_size: u32,
}

impl GridPagination {
    pub const DEFAULT_PAGE_SIZE: u32 = 25;

    pub fn with_page_size(page_size: u32) -> Self {
        Self { page: 0, page_size }
    }
}

impl Default for GridPagination {
    fn default() -> Self {
        Self::with_page_size(Self::DEFAULT_PAGE_SIZE)
    }
}

/// Cache key of the row data source. `page` is 1-based, as the backend expects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowQuery {
    pub company_id: i64,
    pub page: u32,
    pub page_size: u32,
}

impl RowQuery {
    pub fn new(company_id: i64, pagination: GridPagination) -> Self {
        Self {
            company_id,
            page: pagination.page.saturating_add(1),
            page_size: pagination.page_size,
        }
    }
}

/// One fetched page of rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowPage<R> {
    pub items: Vec<R>,
    pub total_count: u64,
}

impl<R> RowPage<R> {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total_count: 0,
        }
    }
}

impl<R> From<PaginatedResponse<R>> for RowPage<R> {
    fn from(page: PaginatedResponse<R>) -> Self {
        Self {
            items: page.items,
            total_count: page.total_count,
        }
    }
}

/// The grid's selection model.
///
/// `Exclude` lets "select all except N" avoid materializing every id; the
/// selected ids are only resolved against the rows actually loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "ids", rename_all = "lowercase")]
pub enum SelectionModel {
    Include(BTreeSet<RowId>),
    Exclude(BTreeSet<RowId>),
}

impl Default for SelectionModel {
    fn default() -> Self {
        Self::none()
    }
}

impl SelectionModel {
    pub fn none() -> Self {
        Self::Include(BTreeSet::new())
    }

    pub fn all() -> Self {
        Self::Exclude(BTreeSet::new())
    }

    pub fn single(id: RowId) -> Self {
        Self::Include(BTreeSet::from([id]))
    }

    pub fn includes(&self, id: RowId) -> bool {
        match self {
            Self::Include(ids) => ids.contains(&id),
            Self::Exclude(ids) => !ids.contains(&id),
        }
    }

    /// Selected ids among `rows`, in row order.
    pub fn resolve<R: GridRow>(&self, rows: &[R]) -> Vec<RowId> {
        rows.iter()
            .map(GridRow::row_id)
            .filter(|id| self.includes(*id))
            .collect()
    }
}
