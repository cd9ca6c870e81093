use async_trait::async_trait;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::{models::users::User, Result};

use super::PostgresRepo;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create_user(&self, name: &str, email: &str, provider: &str) -> Result<User>;
    async fn get_user(&self, user_id: Uuid) -> Result<Option<User>>;
}

#[async_trait]
impl UserRepository for PostgresRepo {
    #[instrument(skip(self))]
    async fn create_user(&self, name: &str, email: &str, provider: &str) -> Result<User> {
        let id = Uuid::now_v7();

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, name, email, provider)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, provider, created_at
            "#,
        )
        .bind(id)
        .bind(name.trim())
        .bind(email.trim())
        .bind(provider.trim())
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    #[instrument(skip(self))]
    async fn get_user(&self, user_id: Uuid) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, provider, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        debug!(user_found = user.is_some(), "User query completed");

        Ok(user)
    }
}
