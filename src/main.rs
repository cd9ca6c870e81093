use std::sync::Arc;

use board_posts::{
    config::Config, models::query::PostCriteria, repositories::PostgresRepo,
    services::PostsService, Result,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::init()?;

    let repo = match PostgresRepo::connect(&config).await {
        Ok(repo) => {
            info!("✅ Connection to the database is successful!");
            repo
        }
        Err(err) => {
            error!("🔥 Failed to connect to the database: {:?}", err);
            std::process::exit(1);
        }
    };

    repo.migrate().await?;

    let posts_service = PostsService::new(Arc::new(repo));
    let total = posts_service.count(&PostCriteria::default()).await?;

    info!(total, "Post store is ready");

    Ok(())
}
