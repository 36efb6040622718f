//! # ToolScout Shared Library
//!
//! Shared types and business logic used by the ToolScout API server.
//!
//! ## Module Organization
//!
//! - `models`: Database models and data structures
//! - `auth`: Password hashing and session token utilities
//! - `db`: Connection pooling and migrations
//! - `rating`: Derived rating aggregation

pub mod auth;
pub mod db;
pub mod models;
pub mod rating;

/// Current version of the ToolScout shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
