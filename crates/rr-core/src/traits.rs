//! # Core Traits (Ports)
//!
//! Any plugin must implement these traits to be used by the binary.

use async_trait::async_trait;

use crate::models::{Author, ForumPost};

/// Persistence contract for forum threads.
///
/// A post is always stored as its full graph (post + replies); `save_post`
/// overwrites whatever was stored under the same id.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ForumRepo: Send + Sync {
    /// All posts, newest first. A store that was never written is empty.
    async fn list_posts(&self) -> anyhow::Result<Vec<ForumPost>>;

    async fn get_post(&self, id: &str) -> anyhow::Result<Option<ForumPost>>;

    /// Replaces the stored post with the same id, or puts a new one at the
    /// front of the feed.
    async fn save_post(&self, post: &ForumPost) -> anyhow::Result<()>;
}

/// Persistence contract for the current build, mirrored as component ids.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait BuildRepo: Send + Sync {
    async fn load_build(&self) -> anyhow::Result<Vec<String>>;

    async fn save_build(&self, component_ids: &[String]) -> anyhow::Result<()>;
}

/// Who authored actions are attributed to.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait IdentityProvider: Send + Sync {
    fn current_author(&self) -> Author;
}
