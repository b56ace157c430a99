use serde::{Deserialize, Serialize};

// ============ Pagination ============

/// Largest page size the backend accepts.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Pagination parameters for list operations.
///
/// Pages are 1-indexed on the wire.
///
/// # Default
///
/// The default is `page = 1, page_size = 25`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationParams {
    /// Page number (1-indexed).
    pub page: u32,
    /// Number of items per page.
    pub page_size: u32,
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 25,
        }
    }
}

impl PaginationParams {
    /// Clamp pagination values to valid ranges.
    ///
    /// - `page` is clamped to `>= 1`
    /// - `page_size` is clamped to `1..=max_page_size`
    #[must_use]
    pub fn validated(&self, max_page_size: u32) -> Self {
        Self {
            page: self.page.max(1),
            page_size: self.page_size.clamp(1, max_page_size),
        }
    }
}

/// Body of the `POST .../list` endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListRequest {
    pub company_id: i64,
    pub page: u32,
    pub size: u32,
}

impl ListRequest {
    /// Build a list request for `company_id`, clamping the pagination first.
    pub fn new(company_id: i64, params: PaginationParams) -> Self {
        let params = params.validated(MAX_PAGE_SIZE);
        Self {
            company_id,
            page: params.page,
            size: params.page_size,
        }
    }
}

/// Backend list envelope. Every field is optional on the wire; a missing
/// field deserializes to `None`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListEnvelope<T> {
    pub data: Option<Vec<T>>,
    pub total_pages: Option<u32>,
    pub total_elements: Option<u64>,
    pub message: Option<String>,
}

impl<T> ListEnvelope<T> {
    /// Normalize into a [`PaginatedResponse`] for the request that produced it.
    pub fn into_page(self, request: &ListRequest) -> PaginatedResponse<T> {
        PaginatedResponse::new(
            self.data.unwrap_or_default(),
            request.page,
            request.size,
            self.total_elements.unwrap_or(0),
        )
    }
}

/// A paginated response wrapper.
///
/// Contains the current page of items along with pagination metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResponse<T> {
    /// Items in the current page.
    pub items: Vec<T>,
    /// Current page number (1-indexed).
    pub page: u32,
    /// Page size used for this request.
    pub page_size: u32,
    /// Total number of items across all pages.
    pub total_count: u64,
    /// Whether there are more pages after this one.
    pub has_more: bool,
}

impl<T> PaginatedResponse<T> {
    /// Create a new paginated response, computing [`has_more`](Self::has_more).
    pub fn new(items: Vec<T>, page: u32, page_size: u32, total_count: u64) -> Self {
        let has_more = u64::from(page) * u64::from(page_size) < total_count;
        Self {
            items,
            page,
            page_size,
            total_count,
            has_more,
        }
    }

    /// An empty first page.
    pub fn empty(page_size: u32) -> Self {
        Self::new(Vec::new(), 1, page_size, 0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn validated_clamps() {
        let p = PaginationParams {
            page: 0,
            page_size: 500,
        }
        .validated(MAX_PAGE_SIZE);
        assert_eq!(p.page, 1);
        assert_eq!(p.page_size, MAX_PAGE_SIZE);

        let p = PaginationParams {
            page: 3,
            page_size: 0,
        }
        .validated(MAX_PAGE_SIZE);
        assert_eq!((p.page, p.page_size), (3, 1));
    }

    #[test]
    fn list_request_serializes_camel_case() {
        let req = ListRequest::new(
            12,
            PaginationParams {
                page: 2,
                page_size: 25,
            },
        );
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json, serde_json::json!({"companyId": 12, "page": 2, "size": 25}));
    }

    #[test]
    fn envelope_with_missing_fields_is_empty_page() {
        let env: ListEnvelope<i64> = serde_json::from_str(r#"{"message":"ok"}"#).unwrap();
        let page = env.into_page(&ListRequest::new(1, PaginationParams::default()));
        assert!(page.items.is_empty());
        assert_eq!(page.total_count, 0);
        assert!(!page.has_more);
    }

    #[test]
    fn envelope_maps_total_elements() {
        let env: ListEnvelope<i64> =
            serde_json::from_str(r#"{"data":[1,2],"totalPages":3,"totalElements":52}"#).unwrap();
        let req = ListRequest::new(
            1,
            PaginationParams {
                page: 1,
                page_size: 25,
            },
        );
        let page = env.into_page(&req);
        assert_eq!(page.items, vec![1, 2]);
        assert_eq!(page.total_count, 52);
        assert!(page.has_more);
    }
}
