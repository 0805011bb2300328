//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate SQLite query details from service/business orchestration.
//!
//! # Invariants
//! - Repository APIs return semantic errors (`ArticleNotFound`,
//!   `DuplicateHashtagName`) in addition to DB transport errors.
//! - Uniqueness of hashtag names is enforced by the storage layer and
//!   surfaced as `DuplicateHashtagName`, never as a raw SQLite error.

use crate::db::DbError;
use crate::model::article::ArticleId;
use crate::model::comment::CommentId;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod article_repo;
pub mod comment_repo;
pub mod hashtag_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for board persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    ArticleNotFound(ArticleId),
    CommentNotFound(CommentId),
    /// A concurrent create won the uniqueness race on `hashtags.name`.
    DuplicateHashtagName(String),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::ArticleNotFound(id) => write!(f, "article not found: {id}"),
            Self::CommentNotFound(id) => write!(f, "comment not found: {id}"),
            Self::DuplicateHashtagName(name) => {
                write!(f, "hashtag name already exists: `{name}`")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted board data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::ArticleNotFound(_) => None,
            Self::CommentNotFound(_) => None,
            Self::DuplicateHashtagName(_) => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}
