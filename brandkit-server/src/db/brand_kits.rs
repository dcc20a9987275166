use shared::models::{BrandKit, BrandKitFields};
use sqlx::PgPool;
use uuid::Uuid;

pub async fn find_by_user(pool: &PgPool, user_id: Uuid) -> Result<Option<BrandKit>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM brand_kits WHERE user_id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

/// Create the user's brand kit, or replace every field of the existing one.
///
/// Read-then-write: two concurrent first saves race on `UNIQUE(user_id)` and
/// the loser gets a constraint error.
pub async fn upsert(
    pool: &PgPool,
    user_id: Uuid,
    fields: &BrandKitFields,
    now: i64,
) -> Result<BrandKit, sqlx::Error> {
    if find_by_user(pool, user_id).await?.is_some() {
        sqlx::query_as(
            "UPDATE brand_kits
             SET logo_url = $1, primary_color = $2, secondary_color = $3,
                 accent_color = $4, updated_at = $5
             WHERE user_id = $6
             RETURNING *",
        )
        .bind(&fields.logo_url)
        .bind(&fields.primary_color)
        .bind(&fields.secondary_color)
        .bind(&fields.accent_color)
        .bind(now)
        .bind(user_id)
        .fetch_one(pool)
        .await
    } else {
        sqlx::query_as(
            "INSERT INTO brand_kits
                (id, user_id, logo_url, primary_color, secondary_color, accent_color, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(&fields.logo_url)
        .bind(&fields.primary_color)
        .bind(&fields.secondary_color)
        .bind(&fields.accent_color)
        .bind(now)
        .fetch_one(pool)
        .await
    }
}

/// Delete a brand kit owned by `user_id`. Returns false when no such kit exists.
pub async fn delete(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
    let rows = sqlx::query("DELETE FROM brand_kits WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?
        .rows_affected();
    Ok(rows > 0)
}
