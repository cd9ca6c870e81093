use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::info;

use crate::{config::Config, Result};

pub mod memory;
pub mod posts_repo;
pub mod user_repo;

pub use memory::InMemoryRepo;

#[derive(Clone)]
pub struct PostgresRepo {
    pool: PgPool,
}

impl PostgresRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(config: &Config) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.database_url)
            .await?;

        info!(max_connections = config.max_connections, "Connected to the database");
        Ok(Self::new(pool))
    }

    pub async fn migrate(&self) -> Result<()> {
        info!("Running database migrations");
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}
