//! Comment use-case service and thread assembly.
//!
//! # Responsibility
//! - Provide comment create/delete/list APIs with parent validation.
//! - Rebuild the two-level comment thread from a flat record set.
//!
//! # Invariants
//! - A parent reference must point to a root comment on the same article.
//! - Root ordering is `created_at DESC, id ASC`; replies within a parent are
//!   `created_at ASC, id ASC`.
//! - Records whose parent id is absent from the input set are dropped from
//!   the assembled output.

use crate::model::article::ArticleId;
use crate::model::comment::{Comment, CommentId, NewComment};
use crate::repo::comment_repo::CommentRepository;
use crate::repo::{RepoError, RepoResult};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// One comment with its directly attached replies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentThreadNode {
    pub comment: Comment,
    /// Replies ordered by `created_at ASC, id ASC`. Empty for reply nodes.
    pub replies: Vec<CommentThreadNode>,
}

/// Rebuilds the thread structure from a flat comment record set.
///
/// The build uses an id-indexed arena with child index lists, so parent and
/// child never hold references to each other. A record whose parent id does
/// not resolve within the input is not attached anywhere and disappears from
/// the output; this mirrors the historical lookup-miss behavior and is kept
/// intentionally until product guidance says otherwise.
///
/// Reply ordering inside a parent is a stated choice (`created_at ASC,
/// id ASC`); the data source imposes no order of its own.
pub fn assemble_comment_thread(comments: &[Comment]) -> Vec<CommentThreadNode> {
    let index_by_id: HashMap<CommentId, usize> = comments
        .iter()
        .enumerate()
        .map(|(index, comment)| (comment.id, index))
        .collect();

    let mut child_indices: Vec<Vec<usize>> = vec![Vec::new(); comments.len()];
    for (index, comment) in comments.iter().enumerate() {
        if let Some(parent_id) = comment.parent_comment_id {
            if let Some(&parent_index) = index_by_id.get(&parent_id) {
                child_indices[parent_index].push(index);
            }
        }
    }

    for children in &mut child_indices {
        children.sort_by(|&a, &b| {
            comments[a]
                .created_at
                .cmp(&comments[b].created_at)
                .then(comments[a].id.cmp(&comments[b].id))
        });
    }

    let mut root_indices: Vec<usize> = comments
        .iter()
        .enumerate()
        .filter(|(_, comment)| comment.parent_comment_id.is_none())
        .map(|(index, _)| index)
        .collect();
    root_indices.sort_by(|&a, &b| {
        comments[b]
            .created_at
            .cmp(&comments[a].created_at)
            .then(comments[a].id.cmp(&comments[b].id))
    });

    root_indices
        .into_iter()
        .map(|index| build_node(index, comments, &child_indices))
        .collect()
}

fn build_node(
    index: usize,
    comments: &[Comment],
    child_indices: &[Vec<usize>],
) -> CommentThreadNode {
    CommentThreadNode {
        comment: comments[index].clone(),
        replies: child_indices[index]
            .iter()
            .map(|&child| build_node(child, comments, child_indices))
            .collect(),
    }
}

/// Service error for comment use-cases.
#[derive(Debug)]
pub enum CommentServiceError {
    /// Comment body is blank after trim.
    InvalidContent,
    /// Target article does not exist.
    ArticleNotFound(ArticleId),
    /// Target comment does not exist.
    CommentNotFound(CommentId),
    /// Referenced parent comment does not exist.
    ParentNotFound(CommentId),
    /// Referenced parent belongs to another article.
    ParentOnDifferentArticle {
        parent_id: CommentId,
        parent_article_id: ArticleId,
        article_id: ArticleId,
    },
    /// Referenced parent is itself a reply; threads stay two levels deep.
    ReplyToReply(CommentId),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for CommentServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidContent => write!(f, "comment content must not be blank"),
            Self::ArticleNotFound(id) => write!(f, "article not found: {id}"),
            Self::CommentNotFound(id) => write!(f, "comment not found: {id}"),
            Self::ParentNotFound(id) => write!(f, "parent comment not found: {id}"),
            Self::ParentOnDifferentArticle {
                parent_id,
                parent_article_id,
                article_id,
            } => write!(
                f,
                "parent comment {parent_id} belongs to article {parent_article_id}, not {article_id}"
            ),
            Self::ReplyToReply(id) => {
                write!(f, "comment {id} is a reply and cannot be replied to")
            }
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent comment state: {details}"),
        }
    }
}

impl Error for CommentServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for CommentServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::CommentNotFound(id) => Self::CommentNotFound(id),
            RepoError::ArticleNotFound(id) => Self::ArticleNotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Comment service facade over repository implementations.
pub struct CommentService<R: CommentRepository> {
    repo: R,
}

impl<R: CommentRepository> CommentService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates one comment after validating article and parent references.
    pub fn create_comment(&self, input: NewComment) -> Result<Comment, CommentServiceError> {
        if input.content.trim().is_empty() {
            return Err(CommentServiceError::InvalidContent);
        }
        if !self.repo.article_exists(input.article_id)? {
            return Err(CommentServiceError::ArticleNotFound(input.article_id));
        }

        if let Some(parent_id) = input.parent_comment_id {
            let parent = self
                .repo
                .get_comment(parent_id)?
                .ok_or(CommentServiceError::ParentNotFound(parent_id))?;
            if parent.article_id != input.article_id {
                return Err(CommentServiceError::ParentOnDifferentArticle {
                    parent_id,
                    parent_article_id: parent.article_id,
                    article_id: input.article_id,
                });
            }
            if parent.is_reply() {
                return Err(CommentServiceError::ReplyToReply(parent_id));
            }
        }

        let id = self.repo.create_comment(&input)?;
        self.repo
            .get_comment(id)?
            .ok_or(CommentServiceError::InconsistentState(
                "created comment not found in read-back",
            ))
    }

    /// Deletes one comment; replies disappear with their parent.
    pub fn delete_comment(&self, id: CommentId) -> Result<(), CommentServiceError> {
        self.repo.delete_comment(id)?;
        Ok(())
    }

    /// Lists the assembled two-level thread for one article.
    pub fn get_thread(&self, article_id: ArticleId) -> RepoResult<Vec<CommentThreadNode>> {
        let comments = self.repo.list_comments_for_article(article_id)?;
        Ok(assemble_comment_thread(&comments))
    }
}
