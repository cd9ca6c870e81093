//! In-memory store for tests and local development.
//!
//! Every mutation happens under a single write lock, so comment pushes and
//! hit increments are atomic with respect to other callers, matching what the
//! Postgres store guarantees per statement. Data is lost when the value is dropped.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::{
    models::{
        now,
        posts::{Comment, Post, PostWithWriter},
        query::{ListOptions, PostCriteria},
        users::{User, WriterSummary},
    },
    Error, Result,
};

use super::{posts_repo::PostsRepository, user_repo::UserRepository};

#[derive(Debug, Clone, Default)]
pub struct InMemoryRepo {
    posts: Arc<RwLock<HashMap<Uuid, Post>>>,
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl InMemoryRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn post_count(&self) -> usize {
        self.posts.read().await.len()
    }

    async fn with_writer(&self, post: Post) -> PostWithWriter {
        let writer = match post.writer {
            Some(id) => self
                .users
                .read()
                .await
                .get(&id)
                .map(WriterSummary::from_user),
            None => None,
        };

        PostWithWriter::compose(post, writer)
    }
}

#[async_trait]
impl PostsRepository for InMemoryRepo {
    async fn save_post(&self, post: &Post) -> Result<Post> {
        let mut posts = self.posts.write().await;
        let stored = match posts.get(&post.id) {
            Some(existing) => Post {
                comments: existing.comments.clone(),
                hits: existing.hits,
                ..post.clone()
            },
            None => post.clone(),
        };

        posts.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn push_comment(&self, post_id: Uuid, comment: &Comment) -> Result<Post> {
        let mut posts = self.posts.write().await;
        let post = posts.get_mut(&post_id).ok_or(Error::PostNotFound(post_id))?;
        post.comments.push(comment.clone());
        Ok(post.clone())
    }

    async fn pull_comment(&self, post_id: Uuid, comment_id: Uuid) -> Result<Post> {
        let mut posts = self.posts.write().await;
        let post = posts.get_mut(&post_id).ok_or(Error::PostNotFound(post_id))?;
        let index = post
            .comment_index(comment_id)
            .ok_or(Error::CommentNotFound(comment_id))?;
        post.comments.remove(index);
        Ok(post.clone())
    }

    async fn get_post(&self, post_id: Uuid) -> Result<Option<PostWithWriter>> {
        let post = self.posts.read().await.get(&post_id).cloned();

        match post {
            Some(post) => Ok(Some(self.with_writer(post).await)),
            None => Ok(None),
        }
    }

    async fn get_posts(&self, options: &ListOptions) -> Result<Vec<PostWithWriter>> {
        // Negative paging never matches rows here; Postgres rejects it instead.
        let (Ok(limit), Ok(offset)) = (
            usize::try_from(options.per_page),
            usize::try_from(options.offset()),
        ) else {
            debug!(?options, "Negative paging values, returning no posts");
            return Ok(Vec::new());
        };

        let mut matching: Vec<Post> = self
            .posts
            .read()
            .await
            .values()
            .filter(|post| options.criteria.matches(post))
            .cloned()
            .collect();

        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let mut page = Vec::new();
        for post in matching.into_iter().skip(offset).take(limit) {
            page.push(self.with_writer(post).await);
        }

        Ok(page)
    }

    async fn count_posts(&self, criteria: &PostCriteria) -> Result<i64> {
        let posts = self.posts.read().await;
        let total = posts.values().filter(|post| criteria.matches(post)).count();
        Ok(total as i64)
    }

    async fn increment_hits(&self, post_id: Uuid) -> Result<Post> {
        let mut posts = self.posts.write().await;
        let post = posts
            .entry(post_id)
            .or_insert_with(|| Post::with_defaults(post_id));
        post.hits += 1;
        Ok(post.clone())
    }
}

#[async_trait]
impl UserRepository for InMemoryRepo {
    async fn create_user(&self, name: &str, email: &str, provider: &str) -> Result<User> {
        let user = User {
            id: Uuid::now_v7(),
            name: name.trim().to_string(),
            email: email.trim().to_string(),
            provider: provider.trim().to_string(),
            created_at: now(),
        };

        self.users.write().await.insert(user.id, user.clone());
        Ok(user)
    }

    async fn get_user(&self, user_id: Uuid) -> Result<Option<User>> {
        Ok(self.users.read().await.get(&user_id).cloned())
    }
}
