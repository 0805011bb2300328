//! Comment repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide flat comment persistence for one article.
//! - Keep thread reconstruction out of SQL; the assembler works in memory.
//!
//! # Invariants
//! - Flat listing is deterministic: `created_at ASC, id ASC`.
//! - Deleting a parent comment removes its replies by cascade.

use crate::model::article::ArticleId;
use crate::model::comment::{Comment, CommentId, NewComment};
use crate::repo::{RepoError, RepoResult};
use rusqlite::{params, Connection, Row};

const COMMENT_SELECT_SQL: &str = "SELECT
    id,
    article_id,
    user_id,
    content,
    parent_comment_id,
    created_at
FROM article_comments";

/// Repository interface for article comment persistence.
pub trait CommentRepository {
    /// Creates one comment and returns its stable id.
    fn create_comment(&self, input: &NewComment) -> RepoResult<CommentId>;
    /// Gets one comment by id.
    fn get_comment(&self, id: CommentId) -> RepoResult<Option<Comment>>;
    /// Lists all comments of one article as a flat record set.
    fn list_comments_for_article(&self, article_id: ArticleId) -> RepoResult<Vec<Comment>>;
    /// Deletes one comment; replies are removed by cascade.
    fn delete_comment(&self, id: CommentId) -> RepoResult<()>;
    /// Returns whether the referenced article exists.
    fn article_exists(&self, article_id: ArticleId) -> RepoResult<bool>;
}

/// SQLite-backed comment repository.
pub struct SqliteCommentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCommentRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl CommentRepository for SqliteCommentRepository<'_> {
    fn create_comment(&self, input: &NewComment) -> RepoResult<CommentId> {
        self.conn.execute(
            "INSERT INTO article_comments (article_id, user_id, content, parent_comment_id)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                input.article_id,
                input.user_id.as_str(),
                input.content.as_str(),
                input.parent_comment_id,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn get_comment(&self, id: CommentId) -> RepoResult<Option<Comment>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{COMMENT_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_comment_row(row)?));
        }

        Ok(None)
    }

    fn list_comments_for_article(&self, article_id: ArticleId) -> RepoResult<Vec<Comment>> {
        let mut stmt = self.conn.prepare(&format!(
            "{COMMENT_SELECT_SQL}
             WHERE article_id = ?1
             ORDER BY created_at ASC, id ASC;"
        ))?;

        let mut rows = stmt.query([article_id])?;
        let mut comments = Vec::new();
        while let Some(row) = rows.next()? {
            comments.push(parse_comment_row(row)?);
        }

        Ok(comments)
    }

    fn delete_comment(&self, id: CommentId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM article_comments WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(RepoError::CommentNotFound(id));
        }

        Ok(())
    }

    fn article_exists(&self, article_id: ArticleId) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM articles WHERE id = ?1);",
            [article_id],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }
}

fn parse_comment_row(row: &Row<'_>) -> RepoResult<Comment> {
    Ok(Comment {
        id: row.get("id")?,
        article_id: row.get("article_id")?,
        user_id: row.get("user_id")?,
        content: row.get("content")?,
        parent_comment_id: row.get("parent_comment_id")?,
        created_at: row.get("created_at")?,
    })
}
