/// Comment endpoints
///
/// # Endpoints
///
/// - `POST /api/comments` - Comment on a review (authenticated)
/// - `GET /api/comments/:review_id` - Comments for a review, oldest first
///
/// Comments list oldest first, the opposite of review ordering. `parent_id`
/// is stored as given without checking it references a comment on the same
/// review. There is no delete endpoint; comments disappear only with their
/// review.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use toolscout_shared::models::{
    comment::{Comment, CreateComment},
    review::Review,
    user::User,
};
use uuid::Uuid;
use validator::Validate;

/// Comment creation payload
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCommentRequest {
    pub review_id: Uuid,

    #[validate(length(min = 1, message = "Content must not be empty"))]
    pub content: String,

    /// Optional parent comment for threading
    pub parent_id: Option<Uuid>,
}

/// Comment listing response
#[derive(Debug, Serialize)]
pub struct CommentsResponse {
    pub comments: Vec<Comment>,
}

/// Comments on a review
///
/// # Errors
///
/// - `404 Not Found`: Review does not exist
pub async fn create_comment(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(req): Json<CreateCommentRequest>,
) -> ApiResult<Json<Comment>> {
    req.validate().map_err(ApiError::from_validation)?;

    if Review::find_by_id(&state.db, req.review_id).await?.is_none() {
        return Err(ApiError::NotFound("Review not found".to_string()));
    }

    let comment = Comment::create(
        &state.db,
        CreateComment {
            review_id: req.review_id,
            user_id: user.id,
            username: user.username.clone(),
            content: req.content,
            parent_id: req.parent_id,
        },
    )
    .await?;

    Ok(Json(comment))
}

/// Lists a review's comments, oldest first
pub async fn list_comments(
    State(state): State<AppState>,
    Path(review_id): Path<Uuid>,
) -> ApiResult<Json<CommentsResponse>> {
    let comments = Comment::list_by_review(&state.db, review_id).await?;

    Ok(Json(CommentsResponse { comments }))
}
