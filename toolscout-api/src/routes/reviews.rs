/// Review endpoints
///
/// # Endpoints
///
/// - `POST /api/reviews` - Write a review (authenticated)
/// - `GET /api/reviews/:tool_id` - Paginated reviews for a tool
/// - `PUT /api/reviews/:review_id` - Edit own review (authenticated)
/// - `DELETE /api/reviews/:review_id` - Delete own review (authenticated)
///
/// The pair (tool, user) holds at most one review. Every mutation ends by
/// recomputing the tool's derived rating columns, so list/detail reads see
/// rating and review_count move together with the review set.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use toolscout_shared::{
    models::review::{CreateReview, Review, UpdateReview},
    models::tool::Tool,
    models::user::User,
    rating,
};
use uuid::Uuid;
use validator::Validate;

/// Review creation/update payload
///
/// The same shape serves PUT; an update that moves the review to a
/// different tool re-validates the target tool.
#[derive(Debug, Deserialize, Validate)]
pub struct ReviewRequest {
    pub tool_id: Uuid,

    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i32,

    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,

    #[validate(length(min = 1, message = "Content must not be empty"))]
    pub content: String,
}

/// Review listing query parameters
///
/// `page` is at least 1, `per_page` is clamped into 1..=50.
#[derive(Debug, Deserialize)]
pub struct ReviewsQuery {
    #[serde(default = "default_page")]
    pub page: u32,

    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

fn default_page() -> u32 {
    1
}

fn default_per_page() -> u32 {
    10
}

/// Review listing response
#[derive(Debug, Serialize)]
pub struct ReviewsResponse {
    pub reviews: Vec<Review>,
    pub total: i64,
    pub page: u32,
    pub per_page: u32,
}

/// Writes a review for a tool
///
/// # Errors
///
/// - `404 Not Found`: Tool does not exist
/// - `409 Conflict`: This user already reviewed this tool. The pre-check
///   catches the common case; the unique index settles concurrent creates.
pub async fn create_review(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(req): Json<ReviewRequest>,
) -> ApiResult<Json<Review>> {
    req.validate().map_err(ApiError::from_validation)?;

    if !Tool::exists(&state.db, req.tool_id).await? {
        return Err(ApiError::NotFound("Tool not found".to_string()));
    }

    if Review::find_by_tool_and_user(&state.db, req.tool_id, user.id)
        .await?
        .is_some()
    {
        return Err(ApiError::Conflict(
            "You have already reviewed this tool".to_string(),
        ));
    }

    let review = Review::create(
        &state.db,
        CreateReview {
            tool_id: req.tool_id,
            user_id: user.id,
            username: user.username.clone(),
            rating: req.rating,
            title: req.title,
            content: req.content,
        },
    )
    .await?;

    rating::recompute(&state.db, review.tool_id).await?;

    Ok(Json(review))
}

/// Lists a tool's reviews, newest first
pub async fn list_reviews(
    State(state): State<AppState>,
    Path(tool_id): Path<Uuid>,
    Query(query): Query<ReviewsQuery>,
) -> ApiResult<Json<ReviewsResponse>> {
    let page = query.page.max(1);
    let per_page = query.per_page.clamp(1, 50);
    let offset = super::page_offset(page, per_page);

    let total = Review::count_by_tool(&state.db, tool_id).await?;
    let reviews = Review::list_by_tool(&state.db, tool_id, per_page as i64, offset).await?;

    Ok(Json(ReviewsResponse {
        reviews,
        total,
        page,
        per_page,
    }))
}

/// Edits the caller's own review
///
/// Preserves `created_at` and refreshes `updated_at`.
///
/// # Errors
///
/// - `404 Not Found`: Review absent, or the payload moves the review to a
///   tool that does not exist
/// - `403 Forbidden`: Caller is not the author
pub async fn update_review(
    State(state): State<AppState>,
    Path(review_id): Path<Uuid>,
    Extension(user): Extension<User>,
    Json(req): Json<ReviewRequest>,
) -> ApiResult<Json<Review>> {
    req.validate().map_err(ApiError::from_validation)?;

    let review = Review::find_by_id(&state.db, review_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Review not found".to_string()))?;

    if review.user_id != user.id {
        return Err(ApiError::Forbidden(
            "Not authorized to edit this review".to_string(),
        ));
    }

    if req.tool_id != review.tool_id && !Tool::exists(&state.db, req.tool_id).await? {
        return Err(ApiError::NotFound("Tool not found".to_string()));
    }

    let updated = Review::update(
        &state.db,
        review_id,
        UpdateReview {
            tool_id: req.tool_id,
            rating: req.rating,
            title: req.title,
            content: req.content,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Review not found".to_string()))?;

    rating::recompute(&state.db, updated.tool_id).await?;

    Ok(Json(updated))
}

/// Deletes the caller's own review
///
/// Cascade order: comments first, then the review, then the rating
/// recompute for the review's tool. A crash between the two deletes can
/// leave orphaned comments; the storage layer gives no multi-statement
/// guarantee here.
///
/// # Errors
///
/// - `404 Not Found`: Review absent
/// - `403 Forbidden`: Caller is not the author
pub async fn delete_review(
    State(state): State<AppState>,
    Path(review_id): Path<Uuid>,
    Extension(user): Extension<User>,
) -> ApiResult<Json<serde_json::Value>> {
    let review = Review::find_by_id(&state.db, review_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Review not found".to_string()))?;

    if review.user_id != user.id {
        return Err(ApiError::Forbidden(
            "Not authorized to delete this review".to_string(),
        ));
    }

    let removed_comments = toolscout_shared::models::comment::Comment::delete_by_review(
        &state.db, review_id,
    )
    .await?;

    Review::delete(&state.db, review_id).await?;

    rating::recompute(&state.db, review.tool_id).await?;

    tracing::info!(
        %review_id,
        removed_comments,
        "Deleted review and its comments"
    );

    Ok(Json(json!({ "message": "Review deleted successfully" })))
}
