use shared::models::{Design, NewDesign};
use sqlx::PgPool;
use uuid::Uuid;

pub async fn create(
    pool: &PgPool,
    user_id: Uuid,
    design: &NewDesign,
    thumbnail_url: &str,
    now: i64,
) -> Result<Design, sqlx::Error> {
    sqlx::query_as(
        "INSERT INTO designs
            (id, user_id, template_id, name, headline, description, thumbnail_url, design_data, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)
         RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(&design.template_id)
    .bind(&design.name)
    .bind(&design.headline)
    .bind(&design.description)
    .bind(thumbnail_url)
    .bind(&design.design_data)
    .bind(now)
    .fetch_one(pool)
    .await
}

/// The user's designs, newest first
pub async fn list_by_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<Design>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM designs WHERE user_id = $1 ORDER BY created_at DESC")
        .bind(user_id)
        .fetch_all(pool)
        .await
}

pub async fn find(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<Option<Design>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM designs WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

/// Returns false when the design does not exist or belongs to someone else
pub async fn delete(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
    let rows = sqlx::query("DELETE FROM designs WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?
        .rows_affected();
    Ok(rows > 0)
}
