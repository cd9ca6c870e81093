use std::sync::Arc;

use tracing::{info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

use crate::{
    models::{
        posts::{Comment, CreatePostDto, NewCommentDto, Post, PostWithWriter},
        query::{ListOptions, PostCriteria},
        users::User,
    },
    repositories::posts_repo::PostsRepository,
    Error, Result,
};

#[derive(Clone)]
pub struct PostsService {
    repo: Arc<dyn PostsRepository>,
}

impl PostsService {
    pub fn new(repo: Arc<dyn PostsRepository>) -> Self {
        Self { repo }
    }

    pub async fn create_post(&self, new_post: CreatePostDto) -> Result<Post> {
        self.save(Post::new(new_post)).await
    }

    /// Trims and validates the post, then inserts it or updates its editable
    /// fields. Comments and hits already stored are kept, since they only
    /// change through `add_comment`, `remove_comment` and `increment_hits`.
    #[instrument(skip(self, post), fields(post_id = %post.id))]
    pub async fn save(&self, mut post: Post) -> Result<Post> {
        post.normalize();

        if let Err(errs) = post.validate() {
            let err = Error::from(errs);
            warn!(error = %err, "Rejected post");
            return Err(err);
        }

        let saved = self.repo.save_post(&post).await?;
        info!("Post saved");

        Ok(saved)
    }

    /// Appends a comment written by `author`. Only `post.id` is read from the
    /// given post; the returned value reflects the stored comment list.
    #[instrument(skip(self, post, author, comment), fields(post_id = %post.id, author_id = %author.id))]
    pub async fn add_comment(
        &self,
        post: &Post,
        author: &User,
        comment: &NewCommentDto,
    ) -> Result<Post> {
        let comment = Comment::new(&comment.contents, &author.id.to_string());
        let updated = self.repo.push_comment(post.id, &comment).await?;

        info!(comment_id = %comment.id, comments = updated.comments.len(), "Comment added");

        Ok(updated)
    }

    #[instrument(skip(self, post), fields(post_id = %post.id))]
    pub async fn remove_comment(&self, post: &Post, comment_id: Uuid) -> Result<Post> {
        match self.repo.pull_comment(post.id, comment_id).await {
            Ok(updated) => {
                info!(comments = updated.comments.len(), "Comment removed");
                Ok(updated)
            }
            Err(err) => {
                if err.is_not_found() {
                    warn!(error = %err, "Comment not removed");
                }
                Err(err)
            }
        }
    }

    pub async fn load(&self, post_id: Uuid) -> Result<Option<PostWithWriter>> {
        self.repo.get_post(post_id).await
    }

    pub async fn list(&self, options: &ListOptions) -> Result<Vec<PostWithWriter>> {
        self.repo.get_posts(options).await
    }

    pub async fn count(&self, criteria: &PostCriteria) -> Result<i64> {
        self.repo.count_posts(criteria).await
    }

    #[instrument(skip(self))]
    pub async fn increment_hits(&self, post_id: Uuid) -> Result<Post> {
        let post = self.repo.increment_hits(post_id).await?;

        if post.hits == 1 {
            info!("First hit recorded");
        }

        Ok(post)
    }
}
