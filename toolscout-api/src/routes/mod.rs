/// API route handlers
///
/// Handlers are organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Registration, login, current-user
/// - `tools`: Catalog listing/search, enum listings, seeding
/// - `reviews`: Review lifecycle and listing
/// - `comments`: Comments attached to reviews

use axum::Json;
use serde_json::json;

pub mod auth;
pub mod comments;
pub mod health;
pub mod reviews;
pub mod tools;

/// API banner, `GET /api/`
pub async fn root() -> Json<serde_json::Value> {
    Json(json!({ "message": "AI Tools Aggregator API" }))
}

/// Offset for 1-based pagination
///
/// Widens before multiplying: a large `page` must yield a large offset (and
/// an empty listing), not a u32 overflow.
pub(crate) fn page_offset(page: u32, per_page: u32) -> i64 {
    (i64::from(page) - 1) * i64::from(per_page)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_offset() {
        assert_eq!(page_offset(1, 20), 0);
        assert_eq!(page_offset(3, 10), 20);
    }

    #[test]
    fn test_page_offset_survives_huge_page() {
        // (100_000_000 - 1) * 50 exceeds u32::MAX; the widened arithmetic
        // must produce the exact offset instead of wrapping or panicking
        assert_eq!(page_offset(100_000_000, 50), 4_999_999_950);
        assert_eq!(page_offset(u32::MAX, 100), (i64::from(u32::MAX) - 1) * 100);
    }
}
