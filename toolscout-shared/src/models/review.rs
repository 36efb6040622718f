/// Review model and database operations
///
/// One review per (tool_id, user_id) pair, enforced by a unique index. The
/// author's username is denormalized onto the row as a snapshot taken at
/// write time. Reviews may only be updated or deleted by their author; that
/// check lives in the API layer, which has the authenticated user at hand.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE reviews (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     tool_id UUID NOT NULL REFERENCES tools(id) ON DELETE CASCADE,
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     username VARCHAR(100) NOT NULL,
///     rating INTEGER NOT NULL CHECK (rating BETWEEN 1 AND 5),
///     title VARCHAR(255) NOT NULL,
///     content TEXT NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// CREATE UNIQUE INDEX reviews_tool_id_user_id_key ON reviews (tool_id, user_id);
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Review model: one user's rating+text for one tool
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Review {
    /// Unique review ID
    pub id: Uuid,

    /// Reviewed tool
    pub tool_id: Uuid,

    /// Author
    pub user_id: Uuid,

    /// Author username snapshot at write time
    pub username: String,

    /// Rating in 1..=5
    pub rating: i32,

    /// Review title
    pub title: String,

    /// Review body
    pub content: String,

    /// When the review was first written (preserved across updates)
    pub created_at: DateTime<Utc>,

    /// When the review was last edited
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a review
#[derive(Debug, Clone)]
pub struct CreateReview {
    pub tool_id: Uuid,
    pub user_id: Uuid,
    pub username: String,
    pub rating: i32,
    pub title: String,
    pub content: String,
}

/// Input for updating a review
///
/// `created_at` is never touched; `updated_at` is refreshed to now.
#[derive(Debug, Clone)]
pub struct UpdateReview {
    pub tool_id: Uuid,
    pub rating: i32,
    pub title: String,
    pub content: String,
}

const REVIEW_COLUMNS: &str =
    "id, tool_id, user_id, username, rating, title, content, created_at, updated_at";

impl Review {
    /// Creates a new review
    ///
    /// # Errors
    ///
    /// A second review by the same user for the same tool violates the
    /// `reviews_tool_id_user_id_key` index; the API maps that to 409.
    pub async fn create(pool: &PgPool, data: CreateReview) -> Result<Self, sqlx::Error> {
        let sql = format!(
            r#"
            INSERT INTO reviews (tool_id, user_id, username, rating, title, content)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            REVIEW_COLUMNS
        );

        let review = sqlx::query_as::<_, Review>(&sql)
            .bind(data.tool_id)
            .bind(data.user_id)
            .bind(data.username)
            .bind(data.rating)
            .bind(data.title)
            .bind(data.content)
            .fetch_one(pool)
            .await?;

        Ok(review)
    }

    /// Finds a review by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let sql = format!("SELECT {} FROM reviews WHERE id = $1", REVIEW_COLUMNS);

        let review = sqlx::query_as::<_, Review>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(review)
    }

    /// Finds the review a user wrote for a tool, if any
    pub async fn find_by_tool_and_user(
        pool: &PgPool,
        tool_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let sql = format!(
            "SELECT {} FROM reviews WHERE tool_id = $1 AND user_id = $2",
            REVIEW_COLUMNS
        );

        let review = sqlx::query_as::<_, Review>(&sql)
            .bind(tool_id)
            .bind(user_id)
            .fetch_optional(pool)
            .await?;

        Ok(review)
    }

    /// Lists a tool's reviews, newest first
    pub async fn list_by_tool(
        pool: &PgPool,
        tool_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let sql = format!(
            r#"
            SELECT {} FROM reviews
            WHERE tool_id = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
            REVIEW_COLUMNS
        );

        let reviews = sqlx::query_as::<_, Review>(&sql)
            .bind(tool_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;

        Ok(reviews)
    }

    /// Counts a tool's reviews
    pub async fn count_by_tool(pool: &PgPool, tool_id: Uuid) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM reviews WHERE tool_id = $1")
            .bind(tool_id)
            .fetch_one(pool)
            .await?;

        Ok(count)
    }

    /// Updates a review in place, preserving `created_at`
    ///
    /// Returns the updated review if it still exists.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateReview,
    ) -> Result<Option<Self>, sqlx::Error> {
        let sql = format!(
            r#"
            UPDATE reviews
            SET tool_id = $2, rating = $3, title = $4, content = $5, updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            REVIEW_COLUMNS
        );

        let review = sqlx::query_as::<_, Review>(&sql)
            .bind(id)
            .bind(data.tool_id)
            .bind(data.rating)
            .bind(data.title)
            .bind(data.content)
            .fetch_optional(pool)
            .await?;

        Ok(review)
    }

    /// Deletes a review by ID
    ///
    /// Comments referencing the review are removed by the caller first; see
    /// `routes::reviews::delete_review`.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
