use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone, PartialEq)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub provider: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// Projection of a user exposed on posts in place of the raw writer id.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct WriterSummary {
    pub name: String,
    pub provider: String,
    pub email: String,
}

impl WriterSummary {
    pub fn from_user(user: &User) -> Self {
        WriterSummary {
            name: user.name.to_owned(),
            provider: user.provider.to_owned(),
            email: user.email.to_owned(),
        }
    }
}
