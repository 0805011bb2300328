//! Article repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide article persistence APIs including the hashtag join table.
//! - Own association replacement logic (`replace_article_hashtags`) with
//!   atomic semantics.
//!
//! # Invariants
//! - Article listing is deterministic: `created_at DESC, id ASC`.
//! - `replace_article_hashtags` swaps the whole association set in a single
//!   immediate transaction.
//! - Hashtag names attached to read models are sorted ascending.

use crate::model::article::{Article, ArticleId, NewArticle};
use crate::model::hashtag::HashtagId;
use crate::repo::{RepoError, RepoResult};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row, Transaction, TransactionBehavior};

const ARTICLES_DEFAULT_PAGE_SIZE: u32 = 10;
const ARTICLES_PAGE_SIZE_MAX: u32 = 50;

const ARTICLE_SELECT_SQL: &str = "SELECT
    id,
    user_id,
    title,
    content,
    created_at,
    updated_at
FROM articles";

/// Query options for article list use-cases.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleListQuery {
    /// Optional exact hashtag name filter (case-sensitive).
    pub hashtag: Option<String>,
    /// Maximum rows to return. Defaults to 10 and clamps to 50.
    pub limit: Option<u32>,
    /// Number of rows to skip.
    pub offset: u32,
}

/// Repository interface for article persistence and hashtag associations.
pub trait ArticleRepository {
    /// Creates one article and returns its stable id.
    fn create_article(&self, input: &NewArticle) -> RepoResult<ArticleId>;
    /// Gets one article with its associated hashtag names.
    fn get_article(&self, id: ArticleId) -> RepoResult<Option<Article>>;
    /// Replaces title and content of an existing article.
    fn update_article(&self, id: ArticleId, title: &str, content: &str) -> RepoResult<()>;
    /// Deletes one article; associations are removed by cascade.
    fn delete_article(&self, id: ArticleId) -> RepoResult<()>;
    /// Lists articles using optional hashtag filter + pagination.
    fn list_articles(&self, query: &ArticleListQuery) -> RepoResult<Vec<Article>>;
    /// Counts articles matching the optional hashtag filter.
    fn count_articles(&self, hashtag: Option<&str>) -> RepoResult<u64>;
    /// Returns ids of hashtags currently associated with the article.
    fn hashtag_ids_for_article(&self, id: ArticleId) -> RepoResult<Vec<HashtagId>>;
    /// Replaces the whole association set for the article in one transaction.
    fn replace_article_hashtags(&self, id: ArticleId, hashtag_ids: &[HashtagId])
        -> RepoResult<()>;
}

/// SQLite-backed article repository.
pub struct SqliteArticleRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteArticleRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ArticleRepository for SqliteArticleRepository<'_> {
    fn create_article(&self, input: &NewArticle) -> RepoResult<ArticleId> {
        self.conn.execute(
            "INSERT INTO articles (user_id, title, content) VALUES (?1, ?2, ?3);",
            params![
                input.user_id.as_str(),
                input.title.as_str(),
                input.content.as_str(),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn get_article(&self, id: ArticleId) -> RepoResult<Option<Article>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ARTICLE_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            let mut article = parse_article_row(row)?;
            article.hashtags = load_hashtags_for_article(self.conn, id)?;
            return Ok(Some(article));
        }

        Ok(None)
    }

    fn update_article(&self, id: ArticleId, title: &str, content: &str) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE articles
             SET
                title = ?2,
                content = ?3,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?1;",
            params![id, title, content],
        )?;

        if changed == 0 {
            return Err(RepoError::ArticleNotFound(id));
        }

        Ok(())
    }

    fn delete_article(&self, id: ArticleId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM articles WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(RepoError::ArticleNotFound(id));
        }

        Ok(())
    }

    fn list_articles(&self, query: &ArticleListQuery) -> RepoResult<Vec<Article>> {
        let mut sql = format!("{ARTICLE_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(hashtag) = query.hashtag.as_ref() {
            sql.push_str(
                " AND EXISTS (
                    SELECT 1
                    FROM article_hashtags ah
                    INNER JOIN hashtags h ON h.id = ah.hashtag_id
                    WHERE ah.article_id = articles.id
                      AND h.name = ?
                )",
            );
            bind_values.push(Value::Text(hashtag.clone()));
        }

        sql.push_str(" ORDER BY created_at DESC, id ASC");
        let limit = normalize_page_size(query.limit);
        sql.push_str(" LIMIT ?");
        bind_values.push(Value::Integer(i64::from(limit)));
        if query.offset > 0 {
            sql.push_str(" OFFSET ?");
            bind_values.push(Value::Integer(i64::from(query.offset)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut articles = Vec::new();
        while let Some(row) = rows.next()? {
            let mut article = parse_article_row(row)?;
            article.hashtags = load_hashtags_for_article(self.conn, article.id)?;
            articles.push(article);
        }

        Ok(articles)
    }

    fn count_articles(&self, hashtag: Option<&str>) -> RepoResult<u64> {
        let count: i64 = match hashtag {
            Some(name) => self.conn.query_row(
                "SELECT COUNT(*)
                 FROM articles
                 WHERE EXISTS (
                    SELECT 1
                    FROM article_hashtags ah
                    INNER JOIN hashtags h ON h.id = ah.hashtag_id
                    WHERE ah.article_id = articles.id
                      AND h.name = ?1
                 );",
                [name],
                |row| row.get(0),
            )?,
            None => self
                .conn
                .query_row("SELECT COUNT(*) FROM articles;", [], |row| row.get(0))?,
        };
        Ok(count as u64)
    }

    fn hashtag_ids_for_article(&self, id: ArticleId) -> RepoResult<Vec<HashtagId>> {
        let mut stmt = self.conn.prepare(
            "SELECT hashtag_id
             FROM article_hashtags
             WHERE article_id = ?1
             ORDER BY hashtag_id ASC;",
        )?;
        let mut rows = stmt.query([id])?;
        let mut ids = Vec::new();
        while let Some(row) = rows.next()? {
            ids.push(row.get(0)?);
        }
        Ok(ids)
    }

    fn replace_article_hashtags(
        &self,
        id: ArticleId,
        hashtag_ids: &[HashtagId],
    ) -> RepoResult<()> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        if !article_exists_in_tx(&tx, id)? {
            return Err(RepoError::ArticleNotFound(id));
        }

        tx.execute("DELETE FROM article_hashtags WHERE article_id = ?1;", [id])?;

        for hashtag_id in hashtag_ids {
            tx.execute(
                "INSERT OR IGNORE INTO article_hashtags (article_id, hashtag_id)
                 VALUES (?1, ?2);",
                params![id, hashtag_id],
            )?;
        }

        tx.commit()?;
        Ok(())
    }
}

/// Normalizes list page size according to the listing contract.
pub fn normalize_page_size(limit: Option<u32>) -> u32 {
    match limit {
        Some(0) => ARTICLES_DEFAULT_PAGE_SIZE,
        Some(value) if value > ARTICLES_PAGE_SIZE_MAX => ARTICLES_PAGE_SIZE_MAX,
        Some(value) => value,
        None => ARTICLES_DEFAULT_PAGE_SIZE,
    }
}

fn parse_article_row(row: &Row<'_>) -> RepoResult<Article> {
    Ok(Article {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        title: row.get("title")?,
        content: row.get("content")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
        hashtags: Vec::new(),
    })
}

fn load_hashtags_for_article(conn: &Connection, id: ArticleId) -> RepoResult<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT h.name
         FROM article_hashtags ah
         INNER JOIN hashtags h ON h.id = ah.hashtag_id
         WHERE ah.article_id = ?1
         ORDER BY h.name ASC;",
    )?;
    let mut rows = stmt.query([id])?;
    let mut names = Vec::new();
    while let Some(row) = rows.next()? {
        names.push(row.get(0)?);
    }
    Ok(names)
}

fn article_exists_in_tx(tx: &Transaction<'_>, id: ArticleId) -> RepoResult<bool> {
    let exists: i64 = tx.query_row(
        "SELECT EXISTS(SELECT 1 FROM articles WHERE id = ?1);",
        [id],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}
