pub mod analysis_repo;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

pub use analysis_repo::PgAnalysisStore;

pub async fn init_pool(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}
