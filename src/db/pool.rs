use sqlx::postgres::PgPool;

pub async fn health_check(pool: &PgPool) -> crate::types::AppResult<()> {
    sqlx::query("SELECT 1")
        .execute(pool)
        .await?;

    Ok(())
}
