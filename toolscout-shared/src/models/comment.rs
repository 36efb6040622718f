/// Comment model and database operations
///
/// Comments attach to a review and may reference a parent comment for
/// threading. `parent_id` is stored as given and not checked against the
/// comments table. Comments are listed oldest first, the opposite order from
/// reviews. There is no delete endpoint; rows go away only when their review
/// is deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Comment model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    /// Unique comment ID
    pub id: Uuid,

    /// Review this comment belongs to
    pub review_id: Uuid,

    /// Author
    pub user_id: Uuid,

    /// Author username snapshot at write time
    pub username: String,

    /// Comment body
    pub content: String,

    /// Optional parent comment for threading (unvalidated)
    pub parent_id: Option<Uuid>,

    /// When the comment was posted
    pub created_at: DateTime<Utc>,
}

/// Input for creating a comment
#[derive(Debug, Clone)]
pub struct CreateComment {
    pub review_id: Uuid,
    pub user_id: Uuid,
    pub username: String,
    pub content: String,
    pub parent_id: Option<Uuid>,
}

const COMMENT_COLUMNS: &str = "id, review_id, user_id, username, content, parent_id, created_at";

impl Comment {
    /// Creates a new comment
    pub async fn create(pool: &PgPool, data: CreateComment) -> Result<Self, sqlx::Error> {
        let sql = format!(
            r#"
            INSERT INTO comments (review_id, user_id, username, content, parent_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            COMMENT_COLUMNS
        );

        let comment = sqlx::query_as::<_, Comment>(&sql)
            .bind(data.review_id)
            .bind(data.user_id)
            .bind(data.username)
            .bind(data.content)
            .bind(data.parent_id)
            .fetch_one(pool)
            .await?;

        Ok(comment)
    }

    /// Lists a review's comments, oldest first
    pub async fn list_by_review(
        pool: &PgPool,
        review_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let sql = format!(
            r#"
            SELECT {} FROM comments
            WHERE review_id = $1
            ORDER BY created_at ASC
            "#,
            COMMENT_COLUMNS
        );

        let comments = sqlx::query_as::<_, Comment>(&sql)
            .bind(review_id)
            .fetch_all(pool)
            .await?;

        Ok(comments)
    }

    /// Deletes all comments belonging to a review
    ///
    /// Part of the review-deletion cascade; returns the number removed.
    pub async fn delete_by_review(pool: &PgPool, review_id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM comments WHERE review_id = $1")
            .bind(review_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_comment_struct() {
        let create = CreateComment {
            review_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            username: "bob".to_string(),
            content: "Agreed!".to_string(),
            parent_id: None,
        };

        assert!(create.parent_id.is_none());
        assert_eq!(create.username, "bob");
    }
}
