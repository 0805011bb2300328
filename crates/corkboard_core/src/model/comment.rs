//! Comment domain model.
//!
//! # Responsibility
//! - Define the flat comment record used by storage and thread assembly.
//!
//! # Invariants
//! - `parent_comment_id`, when set, references a comment on the same article.
//! - Valid data keeps threads exactly two levels deep; a reply is never
//!   itself a parent.

use serde::{Deserialize, Serialize};

use crate::model::article::ArticleId;

/// Stable identifier for a persisted comment.
pub type CommentId = i64;

/// Canonical comment record as read back from storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub article_id: ArticleId,
    /// Authoring user reference. Account management lives outside core.
    pub user_id: String,
    pub content: String,
    /// Parent comment reference. `None` means root-level comment.
    pub parent_comment_id: Option<CommentId>,
    /// Unix epoch milliseconds.
    pub created_at: i64,
}

impl Comment {
    /// Returns whether this comment is a reply to another comment.
    pub fn is_reply(&self) -> bool {
        self.parent_comment_id.is_some()
    }
}

/// Write model for comment creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    pub article_id: ArticleId,
    pub user_id: String,
    pub content: String,
    pub parent_comment_id: Option<CommentId>,
}

impl NewComment {
    /// Creates a root-level comment input.
    pub fn root(
        article_id: ArticleId,
        user_id: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            article_id,
            user_id: user_id.into(),
            content: content.into(),
            parent_comment_id: None,
        }
    }

    /// Creates a reply input targeting an existing root comment.
    pub fn reply(
        article_id: ArticleId,
        user_id: impl Into<String>,
        content: impl Into<String>,
        parent_comment_id: CommentId,
    ) -> Self {
        Self {
            article_id,
            user_id: user_id.into(),
            content: content.into(),
            parent_comment_id: Some(parent_comment_id),
        }
    }
}
