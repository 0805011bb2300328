//! Hashtag domain model.
//!
//! # Responsibility
//! - Define the persisted hashtag handle resolved from extracted names.
//!
//! # Invariants
//! - `name` is unique across the system, compared case-sensitively.
//! - A hashtag referenced by zero articles is an orphan and eligible for
//!   deletion.

use serde::{Deserialize, Serialize};

/// Stable identifier for a persisted hashtag.
pub type HashtagId = i64;

/// Persisted hashtag handle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hashtag {
    pub id: HashtagId,
    /// Literal token text following `#`, case preserved, no normalization.
    pub name: String,
}
