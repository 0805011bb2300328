//! Domain model for board articles, comments and hashtags.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Keep read models free of persistence details.
//!
//! # Invariants
//! - Every domain object is identified by a stable integer row id.
//! - Hashtag names are stored exactly as extracted, case preserved.

pub mod article;
pub mod comment;
pub mod hashtag;
