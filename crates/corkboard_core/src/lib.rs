//! Core domain logic for the Corkboard bulletin board.
//! This crate is the single source of truth for business invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::article::{Article, ArticleId, NewArticle};
pub use model::comment::{Comment, CommentId, NewComment};
pub use model::hashtag::{Hashtag, HashtagId};
pub use repo::article_repo::{ArticleListQuery, ArticleRepository, SqliteArticleRepository};
pub use repo::comment_repo::{CommentRepository, SqliteCommentRepository};
pub use repo::hashtag_repo::{HashtagRepository, SqliteHashtagRepository};
pub use repo::{RepoError, RepoResult};
pub use service::article_service::{ArticlePage, ArticleService, ArticleServiceError};
pub use service::comment_service::{
    assemble_comment_thread, CommentService, CommentServiceError, CommentThreadNode,
};
pub use service::hashtag_service::{parse_hashtag_names, HashtagService};
pub use service::pagination::{total_pages, PaginationBar};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
