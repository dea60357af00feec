//! # rr-storage-local
//! rusty-rig/crates/rr-plugins/rr-storage-local/src/lib.rs
//! Local filesystem implementation of `ForumRepo` and `BuildRepo`.
//! Features: named JSON records, atomic replace-on-write, missing record reads as empty.

use std::path::PathBuf;

use anyhow::Context;
use async_trait::async_trait;
use rr_core::models::ForumPost;
use rr_core::traits::{BuildRepo, ForumRepo};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::fs;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Record holding every forum post, replies embedded.
pub const FORUM_RECORD: &str = "forumPosts";
/// Record holding the ids of the current build.
pub const BUILD_RECORD: &str = "pcBuild";

pub struct LocalRecordStore {
    /// Directory holding one `<name>.json` file per record (e.g., "./data")
    root_path: PathBuf,
    /// Serializes read-modify-write cycles on the forum record.
    forum_write: Mutex<()>,
}

impl LocalRecordStore {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root_path: root,
            forum_write: Mutex::new(()),
        }
    }

    fn record_path(&self, name: &str) -> PathBuf {
        self.root_path.join(format!("{name}.json"))
    }

    /// Reads a record. A record that was never written reads as `T::default()`.
    pub async fn read_record<T>(&self, name: &str) -> anyhow::Result<T>
    where
        T: DeserializeOwned + Default,
    {
        let path = self.record_path(name);
        let raw = match fs::read(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(T::default()),
            Err(e) => return Err(e).with_context(|| format!("reading {}", path.display())),
        };
        serde_json::from_slice(&raw).with_context(|| format!("parsing {}", path.display()))
    }

    /// Overwrites a record in full. The new content is written to a staging
    /// file of its own beside the old one and renamed over it, so readers never
    /// see a partial document and concurrent writers never share a staging file.
    pub async fn write_record<T>(&self, name: &str, value: &T) -> anyhow::Result<()>
    where
        T: Serialize + ?Sized,
    {
        fs::create_dir_all(&self.root_path)
            .await
            .with_context(|| format!("creating {}", self.root_path.display()))?;

        let path = self.record_path(name);
        let staging = self.root_path.join(format!(".{name}.{}.tmp", Uuid::new_v4()));
        let raw = serde_json::to_vec_pretty(value)?;
        fs::write(&staging, raw)
            .await
            .with_context(|| format!("writing {}", staging.display()))?;
        fs::rename(&staging, &path)
            .await
            .with_context(|| format!("replacing {}", path.display()))?;
        log::debug!("wrote record '{name}'");
        Ok(())
    }
}

#[async_trait]
impl ForumRepo for LocalRecordStore {
    async fn list_posts(&self) -> anyhow::Result<Vec<ForumPost>> {
        self.read_record(FORUM_RECORD).await
    }

    async fn get_post(&self, id: &str) -> anyhow::Result<Option<ForumPost>> {
        let posts: Vec<ForumPost> = self.read_record(FORUM_RECORD).await?;
        Ok(posts.into_iter().find(|p| p.id == id))
    }

    /// Last writer wins: the stored graph for `post.id` is replaced wholesale.
    async fn save_post(&self, post: &ForumPost) -> anyhow::Result<()> {
        let _guard = self.forum_write.lock().await;
        let mut posts: Vec<ForumPost> = self.read_record(FORUM_RECORD).await?;
        match posts.iter_mut().find(|p| p.id == post.id) {
            Some(existing) => *existing = post.clone(),
            None => posts.insert(0, post.clone()),
        }
        self.write_record(FORUM_RECORD, &posts).await
    }
}

#[async_trait]
impl BuildRepo for LocalRecordStore {
    async fn load_build(&self) -> anyhow::Result<Vec<String>> {
        self.read_record(BUILD_RECORD).await
    }

    async fn save_build(&self, component_ids: &[String]) -> anyhow::Result<()> {
        self.write_record(BUILD_RECORD, component_ids).await
    }
}
