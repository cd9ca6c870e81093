use async_trait::async_trait;
use sqlx::{types::Json, Postgres, QueryBuilder};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::{
    models::{
        posts::{Comment, Post, PostWithWriter},
        query::{ListOptions, PostCriteria},
        users::WriterSummary,
    },
    Error, Result,
};

use super::PostgresRepo;

/// Store operations on posts. Comment mutations are applied atomically by the
/// store against its current copy of the post, never a caller-held snapshot.
#[async_trait]
pub trait PostsRepository: Sync + Send {
    /// Inserts the post. For an existing id every field except `comments` and
    /// `hits` is replaced; those keep their stored values.
    async fn save_post(&self, post: &Post) -> Result<Post>;
    async fn push_comment(&self, post_id: Uuid, comment: &Comment) -> Result<Post>;
    async fn pull_comment(&self, post_id: Uuid, comment_id: Uuid) -> Result<Post>;
    async fn get_post(&self, post_id: Uuid) -> Result<Option<PostWithWriter>>;
    async fn get_posts(&self, options: &ListOptions) -> Result<Vec<PostWithWriter>>;
    async fn count_posts(&self, criteria: &PostCriteria) -> Result<i64>;
    /// Bumps `hits` by one, creating a default post when the id is unknown.
    async fn increment_hits(&self, post_id: Uuid) -> Result<Post>;
}

#[derive(sqlx::FromRow)]
struct PostWriterRow {
    #[sqlx(flatten)]
    post: Post,
    writer_name: Option<String>,
    writer_provider: Option<String>,
    writer_email: Option<String>,
}

impl From<PostWriterRow> for PostWithWriter {
    fn from(row: PostWriterRow) -> Self {
        let writer = match (row.writer_name, row.writer_provider, row.writer_email) {
            (Some(name), Some(provider), Some(email)) => Some(WriterSummary {
                name,
                provider,
                email,
            }),
            _ => None,
        };

        PostWithWriter::compose(row.post, writer)
    }
}

const SELECT_WITH_WRITER: &str = r#"
    SELECT p.id, p.title, p.contents, p.writer, p.comments, p.image_url, p.tags,
           p.hits, p.created_at, p.updated_at,
           u.name AS writer_name, u.provider AS writer_provider, u.email AS writer_email
    FROM posts p
    LEFT JOIN users u ON u.id = p.writer
"#;

fn push_criteria(qb: &mut QueryBuilder<'_, Postgres>, criteria: &PostCriteria) {
    let mut separator = " WHERE ";

    if let Some(writer) = criteria.writer {
        qb.push(separator).push("p.writer = ").push_bind(writer);
        separator = " AND ";
    }

    if let Some(tag) = &criteria.tag {
        qb.push(separator).push_bind(tag.clone()).push(" = ANY(p.tags)");
        separator = " AND ";
    }

    if let Some(needle) = &criteria.title_contains {
        qb.push(separator)
            .push("p.title ILIKE ")
            .push_bind(format!("%{}%", escape_like(needle)));
    }
}

fn escape_like(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[async_trait]
impl PostsRepository for PostgresRepo {
    #[instrument(skip(self, post), fields(post_id = %post.id))]
    async fn save_post(&self, post: &Post) -> Result<Post> {
        let saved = sqlx::query_as::<_, Post>(
            r#"
            INSERT INTO posts (id, title, contents, writer, comments, image_url, tags, hits, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (id) DO UPDATE
            SET title = EXCLUDED.title,
                contents = EXCLUDED.contents,
                writer = EXCLUDED.writer,
                image_url = EXCLUDED.image_url,
                tags = EXCLUDED.tags,
                created_at = EXCLUDED.created_at,
                updated_at = EXCLUDED.updated_at
            RETURNING id, title, contents, writer, comments, image_url, tags, hits, created_at, updated_at
            "#,
        )
        .bind(post.id)
        .bind(&post.title)
        .bind(&post.contents)
        .bind(post.writer)
        .bind(Json(&post.comments))
        .bind(&post.image_url)
        .bind(&post.tags)
        .bind(post.hits)
        .bind(post.created_at)
        .bind(post.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(saved)
    }

    #[instrument(skip(self, comment), fields(comment_id = %comment.id))]
    async fn push_comment(&self, post_id: Uuid, comment: &Comment) -> Result<Post> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            UPDATE posts
            SET comments = comments || jsonb_build_array($2::jsonb)
            WHERE id = $1
            RETURNING id, title, contents, writer, comments, image_url, tags, hits, created_at, updated_at
            "#,
        )
        .bind(post_id)
        .bind(Json(comment))
        .fetch_optional(&self.pool)
        .await?;

        post.ok_or(Error::PostNotFound(post_id))
    }

    #[instrument(skip(self))]
    async fn pull_comment(&self, post_id: Uuid, comment_id: Uuid) -> Result<Post> {
        // `jsonb - int` drops the element at that index, so only the first match goes.
        let post = sqlx::query_as::<_, Post>(
            r#"
            UPDATE posts
            SET comments = comments - (
                SELECT (c.ordinality - 1)::int
                FROM jsonb_array_elements(posts.comments) WITH ORDINALITY AS c(value, ordinality)
                WHERE c.value->>'id' = $2
                ORDER BY c.ordinality
                LIMIT 1
            )
            WHERE id = $1
              AND EXISTS (
                SELECT 1
                FROM jsonb_array_elements(posts.comments) AS e(value)
                WHERE e.value->>'id' = $2
              )
            RETURNING id, title, contents, writer, comments, image_url, tags, hits, created_at, updated_at
            "#,
        )
        .bind(post_id)
        .bind(comment_id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        if let Some(post) = post {
            return Ok(post);
        }

        let post_exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM posts WHERE id = $1)")
                .bind(post_id)
                .fetch_one(&self.pool)
                .await?;

        if post_exists {
            Err(Error::CommentNotFound(comment_id))
        } else {
            Err(Error::PostNotFound(post_id))
        }
    }

    #[instrument(skip(self))]
    async fn get_post(&self, post_id: Uuid) -> Result<Option<PostWithWriter>> {
        let sql = format!("{} WHERE p.id = $1", SELECT_WITH_WRITER);

        let row = sqlx::query_as::<_, PostWriterRow>(&sql)
            .bind(post_id)
            .fetch_optional(&self.pool)
            .await?;

        debug!(post_found = row.is_some(), "Post query completed");

        Ok(row.map(PostWithWriter::from))
    }

    #[instrument(skip(self))]
    async fn get_posts(&self, options: &ListOptions) -> Result<Vec<PostWithWriter>> {
        let mut qb = QueryBuilder::<Postgres>::new(SELECT_WITH_WRITER);
        push_criteria(&mut qb, &options.criteria);
        qb.push(" ORDER BY p.created_at DESC LIMIT ")
            .push_bind(options.per_page)
            .push(" OFFSET ")
            .push_bind(options.offset());

        let rows = qb
            .build_query_as::<PostWriterRow>()
            .fetch_all(&self.pool)
            .await?;

        info!(returned = rows.len(), "Post list query completed");

        Ok(rows.into_iter().map(PostWithWriter::from).collect())
    }

    #[instrument(skip(self))]
    async fn count_posts(&self, criteria: &PostCriteria) -> Result<i64> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM posts p");
        push_criteria(&mut qb, criteria);

        let total = qb
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;

        Ok(total)
    }

    #[instrument(skip(self))]
    async fn increment_hits(&self, post_id: Uuid) -> Result<Post> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            INSERT INTO posts (id, hits)
            VALUES ($1, 1)
            ON CONFLICT (id) DO UPDATE
            SET hits = posts.hits + 1
            RETURNING id, title, contents, writer, comments, image_url, tags, hits, created_at, updated_at
            "#,
        )
        .bind(post_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(post)
    }
}
