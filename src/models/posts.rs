use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::{now, users::WriterSummary};

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Comment {
    pub id: Uuid,
    #[serde(default)]
    pub contents: String,
    #[serde(default)]
    pub writer: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(contents: &str, writer: &str) -> Self {
        Self {
            id: Uuid::now_v7(),
            contents: contents.trim().to_string(),
            writer: writer.trim().to_string(),
            created_at: now(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Validate, Clone, PartialEq)]
pub struct Post {
    pub id: Uuid,
    #[validate(length(min = 1, message = "Post title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Post contents are required"))]
    pub contents: String,
    pub writer: Option<Uuid>,
    #[sqlx(json)]
    pub comments: Vec<Comment>,
    #[serde(rename = "imageUrl")]
    pub image_url: String,
    pub tags: Vec<String>,
    pub hits: i64,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl Post {
    pub fn new(dto: CreatePostDto) -> Self {
        let timestamp = now();
        let mut post = Self {
            id: Uuid::now_v7(),
            title: dto.title,
            contents: dto.contents,
            writer: dto.writer,
            comments: Vec::new(),
            image_url: dto.image_url,
            tags: dto.tags,
            hits: 0,
            created_at: timestamp,
            updated_at: timestamp,
        };
        post.normalize();
        post
    }

    /// A post carrying only store defaults, as created by a hit on a missing id.
    pub fn with_defaults(id: Uuid) -> Self {
        let timestamp = now();
        Self {
            id,
            title: String::new(),
            contents: String::new(),
            writer: None,
            comments: Vec::new(),
            image_url: String::new(),
            tags: Vec::new(),
            hits: 0,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Trims text fields and drops sub-microsecond precision from timestamps,
    /// so a saved post reads back unchanged from Postgres.
    pub fn normalize(&mut self) {
        trim_in_place(&mut self.title);
        trim_in_place(&mut self.contents);
        self.created_at = self.created_at.trunc_subsecs(6);
        self.updated_at = self.updated_at.trunc_subsecs(6);
        for comment in &mut self.comments {
            trim_in_place(&mut comment.contents);
            trim_in_place(&mut comment.writer);
            comment.created_at = comment.created_at.trunc_subsecs(6);
        }
    }

    pub fn comment_index(&self, comment_id: Uuid) -> Option<usize> {
        self.comments.iter().position(|c| c.id == comment_id)
    }
}

fn trim_in_place(value: &mut String) {
    let trimmed = value.trim();
    if trimmed.len() != value.len() {
        *value = trimmed.to_string();
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PostWithWriter {
    pub id: Uuid,
    pub title: String,
    pub contents: String,
    pub writer: Option<WriterSummary>,
    pub comments: Vec<Comment>,
    #[serde(rename = "imageUrl")]
    pub image_url: String,
    pub tags: Vec<String>,
    pub hits: i64,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl PostWithWriter {
    pub fn compose(post: Post, writer: Option<WriterSummary>) -> Self {
        Self {
            id: post.id,
            title: post.title,
            contents: post.contents,
            writer,
            comments: post.comments,
            image_url: post.image_url,
            tags: post.tags,
            hits: post.hits,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct CreatePostDto {
    pub title: String,
    pub contents: String,
    #[serde(default)]
    pub writer: Option<Uuid>,
    #[serde(default, rename = "imageUrl")]
    pub image_url: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct NewCommentDto {
    #[serde(default)]
    pub contents: String,
}
