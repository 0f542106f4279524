//! Database operations for itineraries

use serde_json::Value;
use sqlx::SqlitePool;

use crate::backend::auth::users::require_user;
use crate::backend::error::BackendResult;
use crate::backend::store::now_timestamp;
use crate::shared::error::SharedError;
use crate::shared::itinerary::Itinerary;

#[derive(Debug, sqlx::FromRow)]
struct ItineraryRow {
    user_id: i64,
    items: String,
    created_at: String,
    updated_at: String,
}

impl TryFrom<ItineraryRow> for Itinerary {
    type Error = SharedError;

    fn try_from(row: ItineraryRow) -> Result<Self, Self::Error> {
        Ok(Itinerary {
            user_id: row.user_id.to_string(),
            itinerary_items: serde_json::from_str(&row.items)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// The user's itinerary, if they saved one
pub async fn get_itinerary(pool: &SqlitePool, user_id: i64) -> BackendResult<Option<Itinerary>> {
    let row = sqlx::query_as::<_, ItineraryRow>(
        "SELECT user_id, items, created_at, updated_at FROM itineraries WHERE user_id = ?",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(Itinerary::try_from).transpose()?)
}

/// Create or replace the user's itinerary, keeping its creation time
///
/// # Errors
/// * `NotFound` - no such user
pub async fn save_itinerary(pool: &SqlitePool, user_id: i64, items: &[Value]) -> BackendResult<Itinerary> {
    require_user(pool, user_id).await?;
    let items = serde_json::to_string(items).map_err(SharedError::from)?;

    let now = now_timestamp();
    let row = sqlx::query_as::<_, ItineraryRow>(
        r#"
        INSERT INTO itineraries (user_id, items, created_at, updated_at)
        VALUES (?, ?, ?, ?)
        ON CONFLICT(user_id) DO UPDATE SET items = excluded.items, updated_at = excluded.updated_at
        RETURNING user_id, items, created_at, updated_at
        "#,
    )
    .bind(user_id)
    .bind(&items)
    .bind(&now)
    .bind(&now)
    .fetch_one(pool)
    .await?;

    tracing::debug!("Saved itinerary of user {}", user_id);
    Ok(Itinerary::try_from(row)?)
}

/// Drop the user's itinerary; `false` when there was none
pub async fn delete_itinerary(pool: &SqlitePool, user_id: i64) -> BackendResult<bool> {
    let result = sqlx::query("DELETE FROM itineraries WHERE user_id = ?")
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::error::BackendError;
    use crate::backend::messaging::db::test_support::{create_users, memory_db};
    use assert_matches::assert_matches;
    use serde_json::json;

    #[tokio::test]
    async fn test_save_replaces_and_keeps_created_at() {
        let db = memory_db().await;
        let [alice] = create_users(&db, ["alice"]).await;
        assert_eq!(get_itinerary(db.pool(), alice).await.unwrap(), None);

        let first = save_itinerary(db.pool(), alice, &[json!({"place": "Louvre", "day": 1})])
            .await
            .unwrap();
        assert_eq!(first.user_id, alice.to_string());

        let items = vec![json!({"place": "Orsay"}), json!({"place": "Versailles", "day": 2})];
        let second = save_itinerary(db.pool(), alice, &items).await.unwrap();
        assert_eq!(second.itinerary_items, items);
        assert_eq!(second.created_at, first.created_at);
        assert!(second.updated_at >= first.updated_at);

        let stored = get_itinerary(db.pool(), alice).await.unwrap().unwrap();
        assert_eq!(stored, second);
    }

    #[tokio::test]
    async fn test_save_for_unknown_user() {
        let db = memory_db().await;
        let result = save_itinerary(db.pool(), 404, &[]).await;
        assert_matches!(result, Err(BackendError::NotFound { entity: "User" }));
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let db = memory_db().await;
        let [alice] = create_users(&db, ["alice"]).await;
        save_itinerary(db.pool(), alice, &[json!("museum")]).await.unwrap();

        assert!(delete_itinerary(db.pool(), alice).await.unwrap());
        assert!(!delete_itinerary(db.pool(), alice).await.unwrap());
        assert_eq!(get_itinerary(db.pool(), alice).await.unwrap(), None);
    }
}
