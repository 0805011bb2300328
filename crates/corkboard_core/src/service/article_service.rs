//! Article use-case service.
//!
//! # Responsibility
//! - Provide article create/get/update/delete/list APIs.
//! - Drive the hashtag lifecycle: extract on write, resolve handles,
//!   replace associations, garbage-collect orphans.
//!
//! # Invariants
//! - `update_article` uses full content replacement semantics.
//! - Article list is always sorted by `created_at DESC, id ASC`.
//! - Every mutation runs extract -> resolve -> associate -> cleanup as one
//!   logical unit on the caller's connection.

use crate::model::article::{Article, ArticleId, NewArticle};
use crate::repo::article_repo::{
    normalize_page_size, ArticleListQuery, ArticleRepository,
};
use crate::repo::hashtag_repo::HashtagRepository;
use crate::repo::{RepoError, RepoResult};
use crate::service::hashtag_service::{parse_hashtag_names, HashtagService};
use crate::service::pagination::total_pages;
use std::error::Error;
use std::fmt::{Display, Formatter};

const ARTICLE_CONTENT_MAX_CHARS: usize = 10_000;

/// Service error for article use-cases.
#[derive(Debug)]
pub enum ArticleServiceError {
    /// Title is blank after trim.
    InvalidTitle,
    /// Content is blank after trim.
    InvalidContent,
    /// Content exceeds the storage bound.
    ContentTooLong { chars: usize, max: usize },
    /// Target article does not exist.
    ArticleNotFound(ArticleId),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for ArticleServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTitle => write!(f, "article title must not be blank"),
            Self::InvalidContent => write!(f, "article content must not be blank"),
            Self::ContentTooLong { chars, max } => {
                write!(f, "article content has {chars} chars, limit is {max}")
            }
            Self::ArticleNotFound(id) => write!(f, "article not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent article state: {details}"),
        }
    }
}

impl Error for ArticleServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ArticleServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::ArticleNotFound(id) => Self::ArticleNotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// List result envelope used by service callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticlePage {
    /// List items sorted by `created_at DESC, id ASC`.
    pub items: Vec<Article>,
    /// Total page count for the applied filter and page size.
    pub total_pages: u32,
    /// Effective normalized page size used by the query.
    pub applied_page_size: u32,
}

/// Article service facade over repository implementations.
pub struct ArticleService<A: ArticleRepository, H: HashtagRepository> {
    articles: A,
    hashtags: HashtagService<H>,
}

impl<A: ArticleRepository, H: HashtagRepository> ArticleService<A, H> {
    /// Creates a service over article and hashtag repositories.
    pub fn new(articles: A, hashtags: H) -> Self {
        Self {
            articles,
            hashtags: HashtagService::new(hashtags),
        }
    }

    /// Creates one article and associates the hashtags found in its content.
    pub fn create_article(&self, input: NewArticle) -> Result<Article, ArticleServiceError> {
        validate_article_input(&input.title, &input.content)?;

        let id = self.articles.create_article(&input)?;
        self.associate_hashtags(id, &input.content)?;

        self.articles
            .get_article(id)?
            .ok_or(ArticleServiceError::InconsistentState(
                "created article not found in read-back",
            ))
    }

    /// Replaces title and content, re-resolving the hashtag associations.
    ///
    /// Hashtags that were associated before the edit become cleanup
    /// candidates; any of them still referenced elsewhere survives.
    pub fn update_article(
        &self,
        id: ArticleId,
        title: &str,
        content: &str,
    ) -> Result<Article, ArticleServiceError> {
        validate_article_input(title, content)?;

        let previous = self.articles.hashtag_ids_for_article(id)?;
        self.articles.update_article(id, title, content)?;
        self.associate_hashtags(id, content)?;
        self.hashtags.cleanup_orphans(&previous)?;

        self.articles
            .get_article(id)?
            .ok_or(ArticleServiceError::InconsistentState(
                "updated article not found in read-back",
            ))
    }

    /// Deletes one article and garbage-collects its orphaned hashtags.
    pub fn delete_article(&self, id: ArticleId) -> Result<(), ArticleServiceError> {
        let previous = self.articles.hashtag_ids_for_article(id)?;
        self.articles.delete_article(id)?;
        self.hashtags.cleanup_orphans(&previous)?;
        Ok(())
    }

    /// Gets one article by stable id.
    pub fn get_article(&self, id: ArticleId) -> RepoResult<Option<Article>> {
        self.articles.get_article(id)
    }

    /// Lists one page of articles with optional exact hashtag filter.
    pub fn list_articles(
        &self,
        hashtag: Option<String>,
        page: u32,
        page_size: Option<u32>,
    ) -> Result<ArticlePage, ArticleServiceError> {
        let applied_page_size = normalize_page_size(page_size);
        let query = ArticleListQuery {
            hashtag: hashtag.clone(),
            limit: Some(applied_page_size),
            offset: page.saturating_mul(applied_page_size),
        };
        let items = self.articles.list_articles(&query)?;
        let total_items = self.articles.count_articles(hashtag.as_deref())?;

        Ok(ArticlePage {
            items,
            total_pages: total_pages(total_items, applied_page_size),
            applied_page_size,
        })
    }

    fn associate_hashtags(&self, id: ArticleId, content: &str) -> Result<(), ArticleServiceError> {
        let names = parse_hashtag_names(content);
        let resolved = self.hashtags.resolve(&names)?;
        let hashtag_ids: Vec<_> = resolved.iter().map(|hashtag| hashtag.id).collect();
        self.articles.replace_article_hashtags(id, &hashtag_ids)?;
        Ok(())
    }
}

fn validate_article_input(title: &str, content: &str) -> Result<(), ArticleServiceError> {
    if title.trim().is_empty() {
        return Err(ArticleServiceError::InvalidTitle);
    }
    if content.trim().is_empty() {
        return Err(ArticleServiceError::InvalidContent);
    }
    let chars = content.chars().count();
    if chars > ARTICLE_CONTENT_MAX_CHARS {
        return Err(ArticleServiceError::ContentTooLong {
            chars,
            max: ARTICLE_CONTENT_MAX_CHARS,
        });
    }
    Ok(())
}
