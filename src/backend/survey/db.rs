//! Database operations for survey submissions
//!
//! Submitting stores the answers and flips `users.has_completed_survey` in
//! the same transaction.

use std::collections::BTreeMap;

use sqlx::SqlitePool;

use crate::backend::auth::users::require_user;
use crate::backend::error::BackendResult;
use crate::backend::store::{begin_write, now_timestamp};
use crate::shared::survey::{join_choices, split_choices, SurveyAnswers, SurveyStats};

/// Answers as stored, multi-choice fields comma-separated
#[derive(Debug, sqlx::FromRow)]
struct SubmissionRow {
    interests: Option<String>,
    diets: Option<String>,
    expect: Option<String>,
    gender: Option<String>,
    age_group: Option<String>,
    monthly_income: Option<String>,
    cultural_identity: Option<String>,
    psychological_traits: Option<String>,
    travel_frequency: Option<String>,
}

/// Store a user's answers and mark their survey as done
///
/// # Returns
/// ID of the new submission
///
/// # Errors
/// * `NotFound` - no such user
pub async fn submit_survey(
    pool: &SqlitePool,
    user_id: i64,
    answers: &SurveyAnswers,
) -> BackendResult<i64> {
    let mut tx = begin_write(pool).await?;
    require_user(&mut *tx, user_id).await?;

    let now = now_timestamp();
    let (submission_id,): (i64,) = sqlx::query_as(
        r#"
        INSERT INTO survey_submissions (
            user_id, interests, diets, health, expect, gender, age_group, monthly_income,
            cultural_identity, psychological_traits, travel_frequency, suggestion, submitted_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(user_id)
    .bind(join_choices(&answers.interests))
    .bind(join_choices(&answers.diets))
    .bind(&answers.health)
    .bind(&answers.expect)
    .bind(&answers.gender)
    .bind(&answers.age_group)
    .bind(&answers.monthly_income)
    .bind(&answers.cultural_identity)
    .bind(join_choices(&answers.psychological_traits))
    .bind(&answers.travel_frequency)
    .bind(&answers.suggestion)
    .bind(&now)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query("UPDATE users SET has_completed_survey = 1, updated_at = ? WHERE id = ?")
        .bind(&now)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    tracing::info!("User {} submitted survey {}", user_id, submission_id);
    Ok(submission_id)
}

fn tally_one(counts: &mut BTreeMap<String, i64>, answer: Option<String>) {
    if let Some(answer) = answer.filter(|a| !a.trim().is_empty()) {
        *counts.entry(answer).or_default() += 1;
    }
}

fn tally_many(counts: &mut BTreeMap<String, i64>, stored: Option<String>) {
    for choice in stored.as_deref().map(split_choices).unwrap_or_default() {
        *counts.entry(choice).or_default() += 1;
    }
}

/// Count every answer across all submissions
pub async fn survey_stats(pool: &SqlitePool) -> BackendResult<SurveyStats> {
    let rows = sqlx::query_as::<_, SubmissionRow>(
        r#"
        SELECT interests, diets, expect, gender, age_group, monthly_income,
               cultural_identity, psychological_traits, travel_frequency
        FROM survey_submissions
        "#,
    )
    .fetch_all(pool)
    .await?;

    let mut stats = SurveyStats {
        total: rows.len() as i64,
        ..SurveyStats::default()
    };
    for row in rows {
        tally_many(&mut stats.interest, row.interests);
        tally_many(&mut stats.diets, row.diets);
        tally_many(&mut stats.psychological_traits, row.psychological_traits);
        tally_one(&mut stats.expect, row.expect);
        tally_one(&mut stats.gender, row.gender);
        tally_one(&mut stats.age_group, row.age_group);
        tally_one(&mut stats.monthly_income, row.monthly_income);
        tally_one(&mut stats.cultural_identity, row.cultural_identity);
        tally_one(&mut stats.travel_frequency, row.travel_frequency);
    }
    Ok(stats)
}
