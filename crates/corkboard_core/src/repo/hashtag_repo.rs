//! Hashtag repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Resolve hashtag handles by exact name and create missing ones.
//! - Expose the reference count needed for orphan garbage collection.
//!
//! # Invariants
//! - Name comparison is byte-for-byte; `Java` and `java` are distinct rows.
//! - `create` surfaces a uniqueness violation as `DuplicateHashtagName` so
//!   callers can recover with a re-fetch instead of failing the request.
//! - `delete` of an absent row is a no-op, keeping orphan cleanup idempotent.

use crate::model::hashtag::{Hashtag, HashtagId};
use crate::repo::{RepoError, RepoResult};
use rusqlite::types::Value;
use rusqlite::{
    ffi, params, params_from_iter, Connection, OptionalExtension, Transaction,
    TransactionBehavior,
};
use std::collections::BTreeSet;

/// Repository interface for hashtag resolution and lifecycle bookkeeping.
pub trait HashtagRepository {
    /// Finds one hashtag by exact name.
    fn find_by_name(&self, name: &str) -> RepoResult<Option<Hashtag>>;
    /// Finds all hashtags whose name is in the given set.
    fn find_by_names(&self, names: &BTreeSet<String>) -> RepoResult<Vec<Hashtag>>;
    /// Creates one hashtag row for the given name.
    fn create(&self, name: &str) -> RepoResult<Hashtag>;
    /// Counts articles currently associated with the hashtag.
    fn count_referencing_articles(&self, id: HashtagId) -> RepoResult<u64>;
    /// Deletes one hashtag row. Absent rows are treated as already deleted.
    fn delete(&self, id: HashtagId) -> RepoResult<()>;
    /// Deletes the hashtag only when no article references it.
    ///
    /// The reference check and the delete must execute atomically, so a
    /// concurrent resolve cannot associate the row in between. Returns
    /// whether a row was deleted; an absent or still-referenced row yields
    /// `false` without error.
    fn delete_if_orphaned(&self, id: HashtagId) -> RepoResult<bool>;
}

/// SQLite-backed hashtag repository.
pub struct SqliteHashtagRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteHashtagRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl HashtagRepository for SqliteHashtagRepository<'_> {
    fn find_by_name(&self, name: &str) -> RepoResult<Option<Hashtag>> {
        let found = self
            .conn
            .query_row(
                "SELECT id, name FROM hashtags WHERE name = ?1;",
                [name],
                |row| {
                    Ok(Hashtag {
                        id: row.get(0)?,
                        name: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(found)
    }

    fn find_by_names(&self, names: &BTreeSet<String>) -> RepoResult<Vec<Hashtag>> {
        if names.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; names.len()].join(", ");
        let sql = format!("SELECT id, name FROM hashtags WHERE name IN ({placeholders}) ORDER BY name ASC;");
        let bind_values: Vec<Value> = names
            .iter()
            .map(|name| Value::Text(name.clone()))
            .collect();

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut hashtags = Vec::new();
        while let Some(row) = rows.next()? {
            hashtags.push(Hashtag {
                id: row.get(0)?,
                name: row.get(1)?,
            });
        }
        Ok(hashtags)
    }

    fn create(&self, name: &str) -> RepoResult<Hashtag> {
        let inserted = self
            .conn
            .execute("INSERT INTO hashtags (name) VALUES (?1);", [name]);

        match inserted {
            Ok(_) => Ok(Hashtag {
                id: self.conn.last_insert_rowid(),
                name: name.to_string(),
            }),
            // Only the UNIQUE extended code means "name already taken";
            // other constraint failures must stay visible as DB errors.
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE =>
            {
                Err(RepoError::DuplicateHashtagName(name.to_string()))
            }
            Err(other) => Err(other.into()),
        }
    }

    fn count_referencing_articles(&self, id: HashtagId) -> RepoResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM article_hashtags WHERE hashtag_id = ?1;",
            [id],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    fn delete(&self, id: HashtagId) -> RepoResult<()> {
        self.conn
            .execute("DELETE FROM hashtags WHERE id = ?1;", params![id])?;
        Ok(())
    }

    fn delete_if_orphaned(&self, id: HashtagId) -> RepoResult<bool> {
        // The write lock taken here keeps the count and the delete in one
        // scope; an association arriving from another connection lands
        // either before the count (row survives) or after the commit.
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let references: i64 = tx.query_row(
            "SELECT COUNT(*) FROM article_hashtags WHERE hashtag_id = ?1;",
            [id],
            |row| row.get(0),
        )?;

        let deleted = if references == 0 {
            tx.execute("DELETE FROM hashtags WHERE id = ?1;", [id])? > 0
        } else {
            false
        };

        tx.commit()?;
        Ok(deleted)
    }
}
