//! JSON response envelopes and pagination helpers.

use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

/// Standard success envelope.
#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub data: T,
}

/// Success envelope for list endpoints.
#[derive(Debug, Serialize)]
pub struct Paginated<T: Serialize> {
    pub success: bool,
    pub data: Vec<T>,
    pub pagination: Pagination,
}

/// Pagination block reported by list endpoints.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub pages: i64,
}

impl Pagination {
    /// Builds the block, deriving the page count from `total` and `limit`.
    pub fn new(page: i64, limit: i64, total: i64) -> Self {
        let pages = if total == 0 {
            0
        } else {
            (total + limit - 1) / limit
        };
        Self {
            page,
            limit,
            total,
            pages,
        }
    }
}

/// 200 with a bare data envelope.
pub fn ok<T: Serialize>(data: T) -> (StatusCode, Json<Envelope<T>>) {
    (
        StatusCode::OK,
        Json(Envelope {
            success: true,
            message: None,
            data,
        }),
    )
}

/// 200 with a message alongside the data.
pub fn ok_with_message<T: Serialize>(
    message: &str,
    data: T,
) -> (StatusCode, Json<Envelope<T>>) {
    (
        StatusCode::OK,
        Json(Envelope {
            success: true,
            message: Some(message.to_string()),
            data,
        }),
    )
}

/// 201 for freshly created resources.
pub fn created<T: Serialize>(message: &str, data: T) -> (StatusCode, Json<Envelope<T>>) {
    (
        StatusCode::CREATED,
        Json(Envelope {
            success: true,
            message: Some(message.to_string()),
            data,
        }),
    )
}

/// 200 with a page of rows and the pagination block.
pub fn paginated<T: Serialize>(
    data: Vec<T>,
    page: i64,
    limit: i64,
    total: i64,
) -> (StatusCode, Json<Paginated<T>>) {
    (
        StatusCode::OK,
        Json(Paginated {
            success: true,
            data,
            pagination: Pagination::new(page, limit, total),
        }),
    )
}

/// Normalizes raw `page`/`limit` query values into a bounded window.
///
/// Returns `(page, limit, offset)` with `page >= 1` and
/// `1 <= limit <= max_limit`.
pub fn page_window(
    page: Option<i64>,
    limit: Option<i64>,
    default_limit: i64,
    max_limit: i64,
) -> (i64, i64, i64) {
    let page = page.unwrap_or(1).max(1);
    let limit = limit.unwrap_or(default_limit).clamp(1, max_limit);
    let offset = (page - 1) * limit;
    (page, limit, offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_page_count() {
        assert_eq!(Pagination::new(1, 10, 0).pages, 0);
        assert_eq!(Pagination::new(1, 10, 1).pages, 1);
        assert_eq!(Pagination::new(1, 10, 10).pages, 1);
        assert_eq!(Pagination::new(1, 10, 11).pages, 2);
        assert_eq!(Pagination::new(1, 3, 7).pages, 3);
    }

    #[test]
    fn test_page_window_defaults() {
        let (page, limit, offset) = page_window(None, None, 10, 100);
        assert_eq!((page, limit, offset), (1, 10, 0));
    }

    #[test]
    fn test_page_window_clamps() {
        // limit is capped
        let (_, limit, _) = page_window(None, Some(10_000), 10, 100);
        assert_eq!(limit, 100);

        // nonsense values are floored
        let (page, limit, offset) = page_window(Some(-3), Some(0), 10, 100);
        assert_eq!((page, limit, offset), (1, 1, 0));
    }

    #[test]
    fn test_page_window_offset() {
        let (_, _, offset) = page_window(Some(3), Some(20), 10, 100);
        assert_eq!(offset, 40);
    }
}
