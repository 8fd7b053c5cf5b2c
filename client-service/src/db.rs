use anyhow::{Context, Result};
use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::info;

/// Open the pool and bring the schema up to date before serving traffic.
pub async fn connect(database_url: &str) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await
        .context("failed to connect to Postgres")?;
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("failed to apply migrations")?;
    info!("database migrations applied");
    Ok(pool)
}

#[cfg(test)]
mod tests {
    #[test]
    fn migrations_are_embedded_in_version_order() {
        let migrator = sqlx::migrate!("./migrations");
        let versions: Vec<i64> = migrator.iter().map(|m| m.version).collect();
        assert_eq!(versions, vec![1]);
        assert_eq!(migrator.iter().next().map(|m| &*m.description), Some("client profiles"));
    }
}
