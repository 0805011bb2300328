//! Hashtag extraction and lifecycle service.
//!
//! # Responsibility
//! - Parse hashtag tokens out of free text (pure, total).
//! - Resolve parsed names against storage, creating rows lazily.
//! - Garbage-collect hashtags that lost their last article reference.
//!
//! # Invariants
//! - Parsing never fails and preserves token case without normalization.
//! - A duplicate-name race during resolve is recovered by re-fetching, never
//!   surfaced to callers.
//! - Orphan cleanup is idempotent; an already-deleted candidate is a no-op.

use crate::model::hashtag::{Hashtag, HashtagId};
use crate::repo::hashtag_repo::HashtagRepository;
use crate::repo::{RepoError, RepoResult};
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

// A token is `#` followed by a maximal run of Unicode letters, decimal
// digits or underscore. A bare `#` matches nothing; `#` does not need a
// word boundary before it (`ja#va` yields `va`).
static HASHTAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"#([\p{L}\p{Nd}_]+)").expect("valid hashtag regex"));

/// Extracts unique hashtag names from free text.
///
/// Total function: empty or token-free input yields an empty set. Duplicate
/// tokens collapse into one entry; case is preserved.
pub fn parse_hashtag_names(content: &str) -> BTreeSet<String> {
    HASHTAG_RE
        .captures_iter(content)
        .filter_map(|caps| caps.get(1))
        .map(|token| token.as_str().to_string())
        .collect()
}

/// Hashtag catalog facade over repository implementations.
pub struct HashtagService<R: HashtagRepository> {
    repo: R,
}

impl<R: HashtagRepository> HashtagService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Resolves each name to a persisted handle, creating missing rows.
    ///
    /// A `DuplicateHashtagName` error from a concurrent create is recovered
    /// by re-fetching the winning row. Any other storage failure propagates.
    pub fn resolve(&self, names: &BTreeSet<String>) -> RepoResult<Vec<Hashtag>> {
        let mut resolved = self.repo.find_by_names(names)?;
        let known: BTreeSet<&str> = resolved
            .iter()
            .map(|hashtag| hashtag.name.as_str())
            .collect();

        let missing: Vec<&String> = names
            .iter()
            .filter(|name| !known.contains(name.as_str()))
            .collect();

        for name in missing {
            resolved.push(self.create_or_refetch(name)?);
        }

        resolved.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(resolved)
    }

    /// Deletes every candidate that no article references anymore.
    ///
    /// The check-then-delete pair runs atomically in the repository, so a
    /// resolve racing in from elsewhere either keeps the row alive or sees
    /// it gone before re-creating it. Safe to call repeatedly with the same
    /// candidates; a candidate that is already gone is a no-op.
    pub fn cleanup_orphans(&self, candidates: &[HashtagId]) -> RepoResult<()> {
        for &id in candidates {
            if self.repo.delete_if_orphaned(id)? {
                debug!("event=hashtag_cleanup module=hashtag status=ok hashtag_id={id}");
            }
        }
        Ok(())
    }

    fn create_or_refetch(&self, name: &str) -> RepoResult<Hashtag> {
        match self.repo.create(name) {
            Ok(hashtag) => {
                debug!(
                    "event=hashtag_create module=hashtag status=ok hashtag_id={}",
                    hashtag.id
                );
                Ok(hashtag)
            }
            Err(RepoError::DuplicateHashtagName(_)) => {
                // Lost the uniqueness race; the winning row must exist now.
                self.repo.find_by_name(name)?.ok_or_else(|| {
                    RepoError::InvalidData(format!(
                        "hashtag `{name}` missing after duplicate-name race"
                    ))
                })
            }
            Err(other) => Err(other),
        }
    }
}
