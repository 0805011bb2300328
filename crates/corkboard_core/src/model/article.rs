//! Article domain model.
//!
//! # Responsibility
//! - Define the canonical article record and its creation input.
//!
//! # Invariants
//! - `id` is stable and never reused for another article.
//! - `created_at` is epoch milliseconds stamped at insert time.

use serde::{Deserialize, Serialize};

/// Stable identifier for a persisted article.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type ArticleId = i64;

/// Canonical article record as read back from storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    /// Stable row id used for linking and ordering tie-breaks.
    pub id: ArticleId,
    /// Authoring user reference. Account management lives outside core.
    pub user_id: String,
    pub title: String,
    /// Free-form body text; hashtags are extracted from this field.
    pub content: String,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    /// Unix epoch milliseconds, bumped on every content mutation.
    pub updated_at: i64,
    /// Associated hashtag names, sorted ascending, case preserved.
    pub hashtags: Vec<String>,
}

/// Write model for article creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewArticle {
    pub user_id: String,
    pub title: String,
    pub content: String,
}

impl Article {
    /// Returns whether the article carries any hashtag association.
    pub fn has_hashtags(&self) -> bool {
        !self.hashtags.is_empty()
    }
}

impl NewArticle {
    pub fn new(
        user_id: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            title: title.into(),
            content: content.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Article;

    #[test]
    fn article_serializes_with_stable_field_names() {
        let article = Article {
            id: 7,
            user_id: "uno".to_string(),
            title: "t".to_string(),
            content: "#java body".to_string(),
            created_at: 1_000,
            updated_at: 2_000,
            hashtags: vec!["java".to_string()],
        };

        let value = serde_json::to_value(&article).unwrap();
        assert_eq!(value["id"], 7);
        assert_eq!(value["user_id"], "uno");
        assert_eq!(value["hashtags"][0], "java");
        assert!(article.has_hashtags());
    }
}
