use serde::{Deserialize, Serialize};

use crate::pagination::{Page, page_count};

const SUCCESS_MESSAGE: &str = "Operation successful";
const FAILURE_MESSAGE: &str = "Operation failed";

/// Single-item response envelope shared by every API implementation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    /// Whether the operation succeeded.
    pub success: bool,
    /// Operation payload.
    pub data: T,
    /// Fixed message derived from `success`.
    #[serde(default)]
    pub message: String,
}

impl<T> ApiResponse<T> {
    /// Wraps `data` with the message matching `success`.
    #[must_use]
    pub fn new(data: T, success: bool) -> Self {
        let message = if success {
            SUCCESS_MESSAGE
        } else {
            FAILURE_MESSAGE
        };

        Self {
            success,
            data,
            message: message.to_owned(),
        }
    }

    /// Wraps `data` in a successful envelope.
    #[must_use]
    pub fn ok(data: T) -> Self {
        Self::new(data, true)
    }

    /// Unwraps the payload.
    pub fn into_data(self) -> T {
        self.data
    }
}

/// Pagination block of a [`PaginatedResponse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    /// 1-based page number.
    pub page: u32,
    /// Page size.
    pub limit: u32,
    /// Filtered count before pagination.
    pub total: usize,
    /// `ceil(total / limit)`.
    pub pages: u32,
}

/// Paginated response envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResponse<T> {
    /// Always `true`; failures travel as errors.
    pub success: bool,
    /// Items of the current page.
    pub data: Vec<T>,
    /// Page metadata.
    pub pagination: PaginationMeta,
}

impl<T> PaginatedResponse<T> {
    /// Wraps a ready slice; `total` is the number of items given.
    #[must_use]
    pub fn from_items(data: Vec<T>, page: u32, limit: u32) -> Self {
        let total = data.len();
        Self {
            success: true,
            data,
            pagination: PaginationMeta {
                page,
                limit,
                total,
                pages: page_count(total, limit),
            },
        }
    }
}

impl<T> From<Page<T>> for PaginatedResponse<T> {
    fn from(page: Page<T>) -> Self {
        Self {
            success: true,
            data: page.items,
            pagination: PaginationMeta {
                page: page.page,
                limit: page.limit,
                total: page.total,
                pages: page.pages,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::pagination::{PageRequest, paginate};

    use super::{ApiResponse, PaginatedResponse};

    #[test]
    fn message_follows_success_flag() {
        assert_eq!(ApiResponse::ok(1).message, "Operation successful");
        assert_eq!(ApiResponse::new(1, false).message, "Operation failed");
    }

    #[test]
    fn null_payload_serializes_as_null() {
        let value = serde_json::to_value(ApiResponse::ok(()));
        assert!(value.is_ok());
        assert_eq!(
            value.unwrap_or_default(),
            serde_json::json!({
                "success": true,
                "data": null,
                "message": "Operation successful"
            })
        );
    }

    #[test]
    fn from_page_keeps_pre_pagination_total() {
        let page = paginate((0..23).collect::<Vec<u32>>(), PageRequest::new(Some(3), Some(10)));
        let response = PaginatedResponse::from(page);

        assert_eq!(response.data, vec![20, 21, 22]);
        assert_eq!(response.pagination.total, 23);
        assert_eq!(response.pagination.pages, 3);
        assert_eq!(response.pagination.limit, 10);
    }

    #[test]
    fn from_items_counts_given_items() {
        let response = PaginatedResponse::from_items(vec!["a", "b", "c"], 1, 2);
        assert_eq!(response.pagination.total, 3);
        assert_eq!(response.pagination.pages, 2);
        assert!(response.success);
    }
}
