//! Database access layer

pub mod brand_kits;
pub mod designs;
pub mod users;

use sqlx::PgPool;

/// Round-trip to the database, used by the health endpoint
pub async fn ping(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}
