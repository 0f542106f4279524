//! Database operations for tourist/guide bindings
//!
//! A partial unique index allows one `pending` or `approved` binding per
//! (tourist, guide) pair. Rejected rows stay behind as history.

use sqlx::SqlitePool;

use crate::backend::auth::users::{find_profile, ProfileRow};
use crate::backend::error::{BackendError, BackendResult, ConflictKind};
use crate::backend::store::now_timestamp;
use crate::shared::binding::{BindingStatus, BindingWithProfile, GuideBinding};
use crate::shared::error::SharedError;
use crate::shared::{PublicProfile, UserRole};

const BINDING_COLUMNS: &str = "id, tourist_id, guide_id, status, created_at, updated_at";

#[derive(Debug, sqlx::FromRow)]
struct BindingRow {
    id: i64,
    tourist_id: i64,
    guide_id: i64,
    status: String,
    created_at: String,
    updated_at: String,
}

impl TryFrom<BindingRow> for GuideBinding {
    type Error = SharedError;

    fn try_from(row: BindingRow) -> Result<Self, Self::Error> {
        Ok(GuideBinding {
            id: row.id,
            tourist_id: row.tourist_id,
            guide_id: row.guide_id,
            status: BindingStatus::parse(&row.status)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Binding joined with the profile of the user on the other end
#[derive(Debug, sqlx::FromRow)]
struct BindingProfileRow {
    binding_id: i64,
    tourist_id: i64,
    guide_id: i64,
    status: String,
    binding_created_at: String,
    binding_updated_at: String,
    #[sqlx(flatten)]
    profile: ProfileRow,
}

impl TryFrom<BindingProfileRow> for BindingWithProfile {
    type Error = SharedError;

    fn try_from(row: BindingProfileRow) -> Result<Self, Self::Error> {
        Ok(BindingWithProfile {
            binding: GuideBinding {
                id: row.binding_id,
                tourist_id: row.tourist_id,
                guide_id: row.guide_id,
                status: BindingStatus::parse(&row.status)?,
                created_at: row.binding_created_at,
                updated_at: row.binding_updated_at,
            },
            user: PublicProfile::from(row.profile),
        })
    }
}

fn map_binding_conflict(err: sqlx::Error) -> BackendError {
    match err {
        sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
            BackendError::conflict(ConflictKind::DuplicateBinding)
        }
        other => BackendError::Store(other),
    }
}

/// Get a binding by ID
pub async fn get_binding(pool: &SqlitePool, binding_id: i64) -> BackendResult<Option<GuideBinding>> {
    let row = sqlx::query_as::<_, BindingRow>(&format!(
        "SELECT {} FROM user_guide_bindings WHERE id = ?",
        BINDING_COLUMNS
    ))
    .bind(binding_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(GuideBinding::try_from).transpose()?)
}

/// Ask to bind a tourist to a guide
///
/// # Errors
/// * `Validation` - same user on both ends, or `guide_id` is not a guide
/// * `NotFound` - either user does not exist
/// * `Conflict(DuplicateBinding)` - a pending or approved binding exists
pub async fn bind_guide(pool: &SqlitePool, tourist_id: i64, guide_id: i64) -> BackendResult<GuideBinding> {
    if tourist_id == guide_id {
        return Err(BackendError::validation("guideId", "Cannot bind to yourself"));
    }

    find_profile(pool, tourist_id)
        .await?
        .ok_or_else(|| BackendError::not_found("User"))?;
    let guide = find_profile(pool, guide_id)
        .await?
        .ok_or_else(|| BackendError::not_found("User"))?;
    if guide.role != UserRole::Guide {
        return Err(BackendError::validation("guideId", "User is not a guide"));
    }

    let now = now_timestamp();
    let row = sqlx::query_as::<_, BindingRow>(&format!(
        r#"
        INSERT OR IGNORE INTO user_guide_bindings (tourist_id, guide_id, status, created_at, updated_at)
        VALUES (?, ?, 'pending', ?, ?)
        RETURNING {}
        "#,
        BINDING_COLUMNS
    ))
    .bind(tourist_id)
    .bind(guide_id)
    .bind(&now)
    .bind(&now)
    .fetch_optional(pool)
    .await?;

    let row = row.ok_or_else(|| BackendError::conflict(ConflictKind::DuplicateBinding))?;
    tracing::info!("Tourist {} requested guide {} (binding {})", tourist_id, guide_id, row.id);
    Ok(GuideBinding::try_from(row)?)
}

/// Approve or reject a binding
///
/// # Errors
/// * `Validation` - `status` is `pending`
/// * `NotFound` - no such binding
/// * `Conflict(DuplicateBinding)` - re-approving would clash with another live binding
pub async fn review_binding(
    pool: &SqlitePool,
    binding_id: i64,
    status: BindingStatus,
) -> BackendResult<GuideBinding> {
    if status == BindingStatus::Pending {
        return Err(BackendError::validation(
            "status",
            "Status must be approved or rejected",
        ));
    }

    let row = sqlx::query_as::<_, BindingRow>(&format!(
        "UPDATE user_guide_bindings SET status = ?, updated_at = ? WHERE id = ? RETURNING {}",
        BINDING_COLUMNS
    ))
    .bind(status.as_str())
    .bind(now_timestamp())
    .bind(binding_id)
    .fetch_optional(pool)
    .await
    .map_err(map_binding_conflict)?;

    let row = row.ok_or_else(|| BackendError::not_found("Binding"))?;
    tracing::info!("Binding {} {}", binding_id, status.as_str());
    Ok(GuideBinding::try_from(row)?)
}

/// Remove every binding of a tourist, returning how many were removed
pub async fn unbind_guide(pool: &SqlitePool, tourist_id: i64) -> BackendResult<u64> {
    let removed = sqlx::query("DELETE FROM user_guide_bindings WHERE tourist_id = ?")
        .bind(tourist_id)
        .execute(pool)
        .await?
        .rows_affected();

    tracing::info!("Removed {} bindings of tourist {}", removed, tourist_id);
    Ok(removed)
}

/// The tourist's approved binding with the guide's profile
pub async fn binding_for_tourist(
    pool: &SqlitePool,
    tourist_id: i64,
) -> BackendResult<Option<BindingWithProfile>> {
    let row = sqlx::query_as::<_, BindingProfileRow>(
        r#"
        SELECT b.id AS binding_id, b.tourist_id, b.guide_id, b.status,
               b.created_at AS binding_created_at, b.updated_at AS binding_updated_at,
               u.id, u.username, u.avatar, u.role, u.created_at
        FROM user_guide_bindings b
        JOIN users u ON u.id = b.guide_id
        WHERE b.tourist_id = ? AND b.status = 'approved'
        ORDER BY b.updated_at DESC, b.id DESC
        LIMIT 1
        "#,
    )
    .bind(tourist_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(BindingWithProfile::try_from).transpose()?)
}

/// Pending bindings addressed to a guide, with each tourist's profile
pub async fn pending_for_guide(pool: &SqlitePool, guide_id: i64) -> BackendResult<Vec<BindingWithProfile>> {
    let rows = sqlx::query_as::<_, BindingProfileRow>(
        r#"
        SELECT b.id AS binding_id, b.tourist_id, b.guide_id, b.status,
               b.created_at AS binding_created_at, b.updated_at AS binding_updated_at,
               u.id, u.username, u.avatar, u.role, u.created_at
        FROM user_guide_bindings b
        JOIN users u ON u.id = b.tourist_id
        WHERE b.guide_id = ? AND b.status = 'pending'
        ORDER BY b.created_at DESC, b.id DESC
        "#,
    )
    .bind(guide_id)
    .fetch_all(pool)
    .await?;

    let requests = rows
        .into_iter()
        .map(BindingWithProfile::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(requests)
}

/// Profiles of the tourists a guide has approved
pub async fn tourists_for_guide(pool: &SqlitePool, guide_id: i64) -> BackendResult<Vec<PublicProfile>> {
    let rows = sqlx::query_as::<_, ProfileRow>(
        r#"
        SELECT DISTINCT u.id, u.username, u.avatar, u.role, u.created_at
        FROM user_guide_bindings b
        JOIN users u ON u.id = b.tourist_id
        WHERE b.guide_id = ? AND b.status = 'approved'
        ORDER BY u.id
        "#,
    )
    .bind(guide_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(PublicProfile::from).collect())
}

/// Delete duplicate bindings, keeping the newest row of each
/// (tourist, guide, status) group
pub async fn cleanup_duplicate_bindings(pool: &SqlitePool) -> BackendResult<u64> {
    let removed = sqlx::query(
        r#"
        DELETE FROM user_guide_bindings
        WHERE id NOT IN (
            SELECT MAX(id) FROM user_guide_bindings
            GROUP BY tourist_id, guide_id, status
        )
        "#,
    )
    .execute(pool)
    .await?
    .rows_affected();

    if removed > 0 {
        tracing::warn!("Removed {} duplicate bindings", removed);
    }
    Ok(removed)
}
