//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Host the pure board logic: hashtag parsing, thread assembly,
//!   pagination windowing.

pub mod article_service;
pub mod comment_service;
pub mod hashtag_service;
pub mod pagination;
