//! API response types.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

/// Standard API response envelope: `{code, message, data}`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub code: u16,
    pub message: String,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a success response.
    pub fn ok(data: T) -> Self {
        Self {
            code: StatusCode::OK.as_u16(),
            message: "ok".to_string(),
            data: Some(data),
        }
    }

    /// Create a success response with a custom message.
    pub fn ok_with_message(message: impl Into<String>, data: T) -> Self {
        Self {
            code: StatusCode::OK.as_u16(),
            message: message.into(),
            data: Some(data),
        }
    }

    /// Create a created (201) response.
    pub fn created(message: impl Into<String>, data: T) -> Self {
        Self {
            code: StatusCode::CREATED.as_u16(),
            message: message.into(),
            data: Some(data),
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.code).unwrap_or(StatusCode::OK);
        (status, Json(self)).into_response()
    }
}

/// A page of results with total-count metadata.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T: Serialize> {
    pub content: Vec<T>,
    pub total_elements: u64,
    pub page: u64,
    pub size: u64,
    pub total_pages: u64,
}

impl<T: Serialize> Page<T> {
    /// Build a page from items plus the query's total row count.
    pub fn new(content: Vec<T>, total_elements: u64, page: u64, size: u64) -> Self {
        let size = size.max(1);
        Self {
            content,
            total_elements,
            page,
            size,
            total_pages: total_elements.div_ceil(size),
        }
    }
}

/// Pagination query parameters, 0-based.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PageParams {
    #[serde(default)]
    pub page: u64,
    #[serde(default = "default_size")]
    pub size: u64,
}

const fn default_size() -> u64 {
    10
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            page: 0,
            size: default_size(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_total_pages_rounds_up() {
        let page = Page::new(vec![1, 2, 3], 25, 0, 10);
        assert_eq!(page.total_pages, 3);
    }

    #[test]
    fn test_page_zero_size_clamped() {
        let page = Page::<i32>::new(vec![], 5, 0, 0);
        assert_eq!(page.size, 1);
        assert_eq!(page.total_pages, 5);
    }
}
