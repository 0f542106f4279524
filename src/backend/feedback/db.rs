//! Database operations for feedback
//!
//! Listings join `users` for the author's username. Processing a feedback
//! rewrites its status, reward and guide message in place; it can be
//! processed again.

use sqlx::SqlitePool;

use crate::backend::auth::users::require_user;
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::store::{begin_write, now_timestamp};
use crate::shared::error::SharedError;
use crate::shared::feedback::{
    Feedback, FeedbackAction, FeedbackComment, FeedbackPage, FeedbackReward, FeedbackStats,
    FeedbackStatus, DEFAULT_CATEGORY, MAX_RATING, MIN_RATING,
};

pub const DEFAULT_FEEDBACK_PAGE_SIZE: i64 = 20;
pub const MAX_FEEDBACK_PAGE_SIZE: i64 = 100;

/// Guide message used when a feedback is rejected without one
pub const DEFAULT_REJECT_MESSAGE: &str = "Feedback did not meet the guidelines";

const FEEDBACK_SELECT: &str = r#"
    SELECT f.id, f.user_id, u.username, f.rating, f.content, f.category, f.status,
           f.reward, f.guide_message, f.submitted_at, f.processed_at
    FROM feedback f
    JOIN users u ON u.id = f.user_id
"#;

#[derive(Debug, sqlx::FromRow)]
struct FeedbackRow {
    id: i64,
    user_id: i64,
    username: String,
    rating: i64,
    content: Option<String>,
    category: String,
    status: String,
    reward: Option<String>,
    guide_message: Option<String>,
    submitted_at: String,
    processed_at: Option<String>,
}

impl TryFrom<FeedbackRow> for Feedback {
    type Error = SharedError;

    fn try_from(row: FeedbackRow) -> Result<Self, Self::Error> {
        Ok(Feedback {
            id: row.id,
            user_id: row.user_id,
            username: row.username,
            rating: row.rating,
            content: row.content,
            category: row.category,
            status: FeedbackStatus::parse(&row.status)?,
            reward: row.reward,
            guide_message: row.guide_message,
            submitted_at: row.submitted_at,
            processed_at: row.processed_at,
        })
    }
}

fn into_feedbacks(rows: Vec<FeedbackRow>) -> Result<Vec<Feedback>, SharedError> {
    rows.into_iter().map(Feedback::try_from).collect()
}

/// Fields of a feedback about to be submitted
#[derive(Debug, Clone)]
pub struct NewFeedback {
    pub user_id: i64,
    pub rating: i64,
    pub content: Option<String>,
    /// Defaults to `general`
    pub category: Option<String>,
}

/// Get a feedback by ID
pub async fn get_feedback(pool: &SqlitePool, feedback_id: i64) -> BackendResult<Option<Feedback>> {
    let row = sqlx::query_as::<_, FeedbackRow>(&format!("{} WHERE f.id = ?", FEEDBACK_SELECT))
        .bind(feedback_id)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(Feedback::try_from).transpose()?)
}

/// Store a new pending feedback
///
/// # Errors
/// * `Validation` - rating outside 1..=5
/// * `NotFound` - no such user
pub async fn submit_feedback(pool: &SqlitePool, new_feedback: NewFeedback) -> BackendResult<Feedback> {
    if !(MIN_RATING..=MAX_RATING).contains(&new_feedback.rating) {
        return Err(BackendError::validation(
            "rating",
            format!("Rating must be between {} and {}", MIN_RATING, MAX_RATING),
        ));
    }
    require_user(pool, new_feedback.user_id).await?;

    let category = new_feedback
        .category
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or(DEFAULT_CATEGORY);

    let (feedback_id,): (i64,) = sqlx::query_as(
        r#"
        INSERT INTO feedback (user_id, rating, content, category, status, submitted_at)
        VALUES (?, ?, ?, ?, 'pending', ?)
        RETURNING id
        "#,
    )
    .bind(new_feedback.user_id)
    .bind(new_feedback.rating)
    .bind(&new_feedback.content)
    .bind(category)
    .bind(now_timestamp())
    .fetch_one(pool)
    .await?;

    tracing::info!(
        "User {} rated {} (feedback {})",
        new_feedback.user_id,
        new_feedback.rating,
        feedback_id
    );
    get_feedback(pool, feedback_id)
        .await?
        .ok_or_else(|| BackendError::not_found("Feedback"))
}

/// One page of feedback, newest first, optionally of one status
///
/// `page` starts at 1. `limit` defaults to 20 and is clamped to `1..=100`.
pub async fn list_feedback(
    pool: &SqlitePool,
    status: Option<FeedbackStatus>,
    page: Option<i64>,
    limit: Option<i64>,
) -> BackendResult<FeedbackPage> {
    let page = page.unwrap_or(1).max(1);
    let limit = limit
        .unwrap_or(DEFAULT_FEEDBACK_PAGE_SIZE)
        .clamp(1, MAX_FEEDBACK_PAGE_SIZE);
    let status = status.map(|s| s.as_str());

    let (total,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM feedback WHERE (?1 IS NULL OR status = ?1)")
            .bind(status)
            .fetch_one(pool)
            .await?;

    let rows = sqlx::query_as::<_, FeedbackRow>(&format!(
        r#"
        {}
        WHERE (?1 IS NULL OR f.status = ?1)
        ORDER BY f.submitted_at DESC, f.id DESC
        LIMIT ?2 OFFSET ?3
        "#,
        FEEDBACK_SELECT
    ))
    .bind(status)
    .bind(limit)
    .bind((page - 1).saturating_mul(limit))
    .fetch_all(pool)
    .await?;

    Ok(FeedbackPage {
        feedbacks: into_feedbacks(rows)?,
        total,
        page,
        limit,
        total_pages: (total + limit - 1) / limit,
    })
}

/// Approve or reject a feedback
///
/// Approving records the reward and guide message. Rejecting clears the
/// reward and falls back to a default guide message.
///
/// # Errors
/// * `NotFound` - no such feedback
pub async fn process_feedback(
    pool: &SqlitePool,
    feedback_id: i64,
    action: FeedbackAction,
    reward: Option<&str>,
    message: Option<&str>,
) -> BackendResult<Feedback> {
    let (reward, message) = match action {
        FeedbackAction::Approve => (reward, message),
        FeedbackAction::Reject => (None, Some(message.unwrap_or(DEFAULT_REJECT_MESSAGE))),
    };

    let mut tx = begin_write(pool).await?;
    let updated: Option<(i64,)> = sqlx::query_as(
        r#"
        UPDATE feedback
        SET status = ?, reward = ?, guide_message = ?, processed_at = ?
        WHERE id = ?
        RETURNING id
        "#,
    )
    .bind(action.status().as_str())
    .bind(reward)
    .bind(message)
    .bind(now_timestamp())
    .bind(feedback_id)
    .fetch_optional(&mut *tx)
    .await?;
    if updated.is_none() {
        return Err(BackendError::not_found("Feedback"));
    }

    let row = sqlx::query_as::<_, FeedbackRow>(&format!("{} WHERE f.id = ?", FEEDBACK_SELECT))
        .bind(feedback_id)
        .fetch_one(&mut *tx)
        .await?;
    tx.commit().await?;

    let feedback = Feedback::try_from(row)?;
    tracing::info!("Feedback {} {}", feedback_id, feedback.status.as_str());
    Ok(feedback)
}

/// Rating distribution and comments of approved feedback, oldest first
pub async fn feedback_stats(pool: &SqlitePool) -> BackendResult<FeedbackStats> {
    let rows = sqlx::query_as::<_, FeedbackRow>(&format!(
        "{} WHERE f.status = 'approved' ORDER BY f.submitted_at, f.id",
        FEEDBACK_SELECT
    ))
    .fetch_all(pool)
    .await?;

    let mut stats = FeedbackStats::default();
    for feedback in into_feedbacks(rows)? {
        *stats.ratings.entry(feedback.rating).or_default() += 1;
        stats.comments.push(FeedbackComment {
            user: feedback.username,
            score: feedback.rating,
            content: feedback.content,
            submitted_at: feedback.submitted_at,
        });
    }
    Ok(stats)
}

/// Every feedback of a user with its reward, newest first
pub async fn rewards_for_user(pool: &SqlitePool, user_id: i64) -> BackendResult<Vec<FeedbackReward>> {
    let rows = sqlx::query_as::<_, FeedbackRow>(&format!(
        "{} WHERE f.user_id = ? ORDER BY f.submitted_at DESC, f.id DESC",
        FEEDBACK_SELECT
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(into_feedbacks(rows)?.into_iter().map(FeedbackReward::from).collect())
}
