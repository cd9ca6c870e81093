use serde::Deserialize;
use uuid::Uuid;

use super::posts::Post;

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct PostCriteria {
    pub writer: Option<Uuid>,
    pub tag: Option<String>,
    #[serde(rename = "titleContains")]
    pub title_contains: Option<String>,
}

impl PostCriteria {
    pub fn is_empty(&self) -> bool {
        self.writer.is_none() && self.tag.is_none() && self.title_contains.is_none()
    }

    pub fn matches(&self, post: &Post) -> bool {
        if let Some(writer) = self.writer {
            if post.writer != Some(writer) {
                return false;
            }
        }

        if let Some(tag) = &self.tag {
            if !post.tags.iter().any(|t| t == tag) {
                return false;
            }
        }

        if let Some(needle) = &self.title_contains {
            if !post
                .title
                .to_lowercase()
                .contains(&needle.to_lowercase())
            {
                return false;
            }
        }

        true
    }
}

/// Paging is zero-based; rows skipped are `per_page * page`.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ListOptions {
    #[serde(default)]
    pub criteria: PostCriteria,
    #[serde(rename = "perPage")]
    pub per_page: i64,
    #[serde(default)]
    pub page: i64,
}

impl ListOptions {
    pub fn new(page: i64, per_page: i64) -> Self {
        Self {
            criteria: PostCriteria::default(),
            per_page,
            page,
        }
    }

    pub fn with_criteria(mut self, criteria: PostCriteria) -> Self {
        self.criteria = criteria;
        self
    }

    pub fn offset(&self) -> i64 {
        self.per_page.saturating_mul(self.page)
    }
}
