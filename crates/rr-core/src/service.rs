//! # Services
//!
//! Orchestration between the pure domain types and the storage/identity ports.
//! Each operation reads current state, computes the new state, and commits it.
//! Mutations of one service run one at a time, from load to store write.

use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use serde::Serialize;
use tokio::sync::Mutex as AsyncMutex;

use crate::build::{BuildSelection, BuildSummary, PresetLoad};
use crate::catalog::Catalog;
use crate::error::{AppError, Result};
use crate::forum::{NewPost, NewReply};
use crate::models::{Category, Component, ForumPost};
use crate::traits::{BuildRepo, ForumRepo, IdentityProvider};

pub struct ForumService {
    repo: Box<dyn ForumRepo>,
    identity: Box<dyn IdentityProvider>,
    /// Held across load, apply and save.
    writes: AsyncMutex<()>,
}

impl ForumService {
    pub fn new(repo: Box<dyn ForumRepo>, identity: Box<dyn IdentityProvider>) -> Self {
        Self {
            repo,
            identity,
            writes: AsyncMutex::new(()),
        }
    }

    /// Feed, newest first, optionally narrowed to one category tag.
    pub async fn list_posts(&self, category: Option<&str>) -> Result<Vec<ForumPost>> {
        let mut posts = self.repo.list_posts().await?;
        if let Some(tag) = category {
            posts.retain(|p| p.category == tag);
        }
        Ok(posts)
    }

    pub async fn get_post(&self, id: &str) -> Result<ForumPost> {
        self.repo
            .get_post(id)
            .await?
            .ok_or_else(|| AppError::not_found("Post", id))
    }

    pub async fn create_post(&self, draft: NewPost) -> Result<ForumPost> {
        let post = draft.into_post(self.identity.current_author(), Utc::now())?;
        let _turn = self.writes.lock().await;
        self.repo.save_post(&post).await?;
        log::info!("created post {} in '{}'", post.id, post.category);
        Ok(post)
    }

    /// Detail view: counts one view per call.
    pub async fn open_post(&self, id: &str) -> Result<ForumPost> {
        self.update(id, |post| {
            post.record_view();
            Ok(())
        })
        .await
    }

    pub async fn like_post(&self, id: &str) -> Result<ForumPost> {
        self.update(id, |post| {
            post.like();
            Ok(())
        })
        .await
    }

    pub async fn add_reply(&self, id: &str, draft: NewReply) -> Result<ForumPost> {
        let reply = draft.into_reply(self.identity.current_author(), Utc::now())?;
        self.update(id, move |post| {
            post.add_reply(reply);
            Ok(())
        })
        .await
    }

    pub async fn like_reply(&self, id: &str, reply_id: &str) -> Result<ForumPost> {
        self.update(id, |post| post.like_reply(reply_id).map(|_| ()))
            .await
    }

    /// Load, mutate, write back the whole post. Nothing is written if `apply` fails.
    async fn update<F>(&self, id: &str, apply: F) -> Result<ForumPost>
    where
        F: FnOnce(&mut ForumPost) -> Result<()>,
    {
        let _turn = self.writes.lock().await;
        let mut post = self.get_post(id).await?;
        apply(&mut post)?;
        self.repo.save_post(&post).await?;
        Ok(post)
    }
}

/// Selected components together with their aggregates.
#[derive(Debug, Clone, Serialize)]
pub struct BuildView {
    pub components: Vec<Component>,
    pub summary: BuildSummary,
}

impl From<&BuildSelection> for BuildView {
    fn from(selection: &BuildSelection) -> Self {
        Self {
            components: selection.components().cloned().collect(),
            summary: selection.summary(),
        }
    }
}

/// Owns the catalog and the single current build, mirroring every change to
/// the build store.
///
/// A change only becomes visible once the store accepted it; readers see the
/// last committed selection.
pub struct BuildService {
    catalog: Catalog,
    selection: Mutex<BuildSelection>,
    /// Held from computing a change until its save returns.
    commits: AsyncMutex<()>,
    repo: Box<dyn BuildRepo>,
}

impl BuildService {
    pub fn new(catalog: Catalog, repo: Box<dyn BuildRepo>) -> Self {
        Self {
            catalog,
            selection: Mutex::new(BuildSelection::new()),
            commits: AsyncMutex::new(()),
            repo,
        }
    }

    /// Reloads the persisted build. Ids the catalog no longer has are dropped.
    pub async fn restore(&self) -> Result<BuildView> {
        let _turn = self.commits.lock().await;
        let ids = self.repo.load_build().await?;
        let (selection, report) = BuildSelection::from_ids(ids.as_slice(), &self.catalog);
        if !report.skipped.is_empty() {
            log::warn!("restored build dropped unknown ids {:?}", report.skipped);
        }
        let view = BuildView::from(&selection);
        *self.lock() = selection;
        Ok(view)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn view(&self) -> BuildView {
        BuildView::from(&*self.lock())
    }

    pub async fn select(&self, category: Category, component_id: &str) -> Result<BuildView> {
        let component = self
            .catalog
            .get(component_id)
            .ok_or_else(|| AppError::not_found("Component", component_id))?;
        if component.category != category {
            return Err(AppError::validation(format!(
                "{} is a {}, not a {}",
                component.id, component.category, category
            )));
        }
        let component = component.clone();
        self.commit(|selection| {
            selection.select(component);
        })
        .await
    }

    pub async fn remove(&self, category: Category) -> Result<BuildView> {
        self.commit(|selection| {
            selection.remove(category);
        })
        .await
    }

    pub async fn clear(&self) -> Result<BuildView> {
        self.commit(BuildSelection::clear).await
    }

    pub async fn load_preset(&self, preset_id: &str) -> Result<(BuildView, PresetLoad)> {
        let preset = self
            .catalog
            .preset(preset_id)
            .ok_or_else(|| AppError::not_found("Preset", preset_id))?;
        let mut report = PresetLoad::default();
        let view = self
            .commit(|selection| report = selection.load_preset(preset, &self.catalog))
            .await?;
        log::info!("loaded preset '{}' ({} components)", preset.id, view.components.len());
        Ok((view, report))
    }

    /// Applies `change` to a copy of the selection and swaps it in only after
    /// the store saved it. A failed save leaves the selection untouched.
    async fn commit<F>(&self, change: F) -> Result<BuildView>
    where
        F: FnOnce(&mut BuildSelection),
    {
        let _turn = self.commits.lock().await;
        let mut next = self.lock().clone();
        change(&mut next);
        self.repo.save_build(&next.component_ids()).await?;
        let view = BuildView::from(&next);
        *self.lock() = next;
        Ok(view)
    }

    fn lock(&self) -> MutexGuard<'_, BuildSelection> {
        // The selection is always left consistent, so a poisoned lock is still usable.
        self.selection.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Author, Price};
    use crate::traits::{MockBuildRepo, MockForumRepo, MockIdentityProvider};

    fn identity() -> Box<MockIdentityProvider> {
        let mut identity = MockIdentityProvider::new();
        identity.expect_current_author().returning(|| Author {
            name: "You".into(),
            avatar: "YO".into(),
        });
        Box::new(identity)
    }

    fn stored_post() -> ForumPost {
        NewPost {
            title: "Quiet case?".into(),
            content: "Looking for something silent".into(),
            category: "case".into(),
        }
        .into_post(
            Author {
                name: "Ann".into(),
                avatar: "AN".into(),
            },
            Utc::now(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn rejected_post_is_never_saved() {
        let mut repo = MockForumRepo::new();
        repo.expect_save_post().never();
        let forum = ForumService::new(Box::new(repo), identity());

        let err = forum
            .create_post(NewPost {
                title: String::new(),
                content: "body".into(),
                category: String::new(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn created_post_is_attributed_to_current_user() {
        let mut repo = MockForumRepo::new();
        repo.expect_save_post()
            .withf(|p| p.author == "You" && p.avatar == "YO" && p.title == "Hi")
            .times(1)
            .returning(|_| Ok(()));
        let forum = ForumService::new(Box::new(repo), identity());

        let post = forum
            .create_post(NewPost {
                title: "Hi".into(),
                content: "there".into(),
                category: "builds".into(),
            })
            .await
            .unwrap();
        assert_eq!(post.category, "builds");
    }

    #[tokio::test]
    async fn open_post_counts_a_view_and_persists() {
        let post = stored_post();
        let id = post.id.clone();
        let mut repo = MockForumRepo::new();
        let key = id.clone();
        repo.expect_get_post()
            .withf(move |requested| requested == key)
            .returning(move |_| Ok(Some(post.clone())));
        repo.expect_save_post()
            .withf(|p| p.views == 1)
            .times(1)
            .returning(|_| Ok(()));
        let forum = ForumService::new(Box::new(repo), identity());

        assert_eq!(forum.open_post(&id).await.unwrap().views, 1);
    }

    #[tokio::test]
    async fn missing_post_is_not_found() {
        let mut repo = MockForumRepo::new();
        repo.expect_get_post().returning(|_| Ok(None));
        repo.expect_save_post().never();
        let forum = ForumService::new(Box::new(repo), identity());

        assert!(matches!(
            forum.like_post("nope").await,
            Err(AppError::NotFound(..))
        ));
    }

    #[tokio::test]
    async fn list_posts_filters_by_category() {
        let mut other = stored_post();
        other.category = "gpu".into();
        let posts = vec![stored_post(), other];
        let mut repo = MockForumRepo::new();
        repo.expect_list_posts().returning(move || Ok(posts.clone()));
        let forum = ForumService::new(Box::new(repo), identity());

        assert_eq!(forum.list_posts(None).await.unwrap().len(), 2);
        let gpu = forum.list_posts(Some("gpu")).await.unwrap();
        assert_eq!(gpu.len(), 1);
        assert_eq!(gpu[0].category, "gpu");
    }

    #[tokio::test]
    async fn store_failure_surfaces_as_internal() {
        let mut repo = MockForumRepo::new();
        repo.expect_list_posts()
            .returning(|| Err(anyhow::anyhow!("disk unplugged")));
        let forum = ForumService::new(Box::new(repo), identity());

        assert!(matches!(
            forum.list_posts(None).await,
            Err(AppError::Internal(_))
        ));
    }

    #[tokio::test]
    async fn build_changes_are_mirrored() {
        let mut repo = MockBuildRepo::new();
        repo.expect_save_build()
            .withf(|ids| ids == ["cpu2".to_string()])
            .times(1)
            .returning(|_| Ok(()));
        repo.expect_save_build()
            .withf(|ids| ids.is_empty())
            .times(1)
            .returning(|_| Ok(()));
        let builds = BuildService::new(Catalog::builtin(), Box::new(repo));

        let view = builds.select(Category::Cpu, "cpu2").await.unwrap();
        assert_eq!(view.summary.total_price, Price::from_cents(199_99));
        let view = builds.remove(Category::Cpu).await.unwrap();
        assert!(view.components.is_empty());
    }

    #[tokio::test]
    async fn select_checks_category_and_id() {
        let mut repo = MockBuildRepo::new();
        repo.expect_save_build().never();
        let builds = BuildService::new(Catalog::builtin(), Box::new(repo));

        assert!(matches!(
            builds.select(Category::Gpu, "cpu2").await,
            Err(AppError::ValidationError(_))
        ));
        assert!(matches!(
            builds.select(Category::Cpu, "cpu99").await,
            Err(AppError::NotFound(..))
        ));
        assert!(builds.view().components.is_empty());
    }

    #[tokio::test]
    async fn restore_drops_retired_ids() {
        let mut repo = MockBuildRepo::new();
        repo.expect_load_build()
            .returning(|| Ok(vec!["cpu4".into(), "discontinued".into(), "mb4".into()]));
        let builds = BuildService::new(Catalog::builtin(), Box::new(repo));

        let view = builds.restore().await.unwrap();
        assert_eq!(view.components.len(), 2);
        assert_eq!(builds.view().summary.component_count, 2);
    }

    #[tokio::test]
    async fn preset_load_persists_resolved_ids() {
        let mut repo = MockBuildRepo::new();
        repo.expect_save_build()
            .withf(|ids| ids.len() == 6)
            .times(1)
            .returning(|_| Ok(()));
        let builds = BuildService::new(Catalog::builtin(), Box::new(repo));

        let (view, report) = builds.load_preset("gaming-starter").await.unwrap();
        assert_eq!(report.resolved, 6);
        assert_eq!(view.summary.completion_percent, 83);
        assert!(!view.summary.complete, "preset has no case");
        assert!(matches!(
            builds.load_preset("nope").await,
            Err(AppError::NotFound(..))
        ));
    }

    #[tokio::test]
    async fn failed_save_keeps_previous_selection() {
        let mut repo = MockBuildRepo::new();
        let mut seq = mockall::Sequence::new();
        repo.expect_save_build()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        repo.expect_save_build()
            .times(2)
            .in_sequence(&mut seq)
            .returning(|_| Err(anyhow::anyhow!("disk full")));
        let builds = BuildService::new(Catalog::builtin(), Box::new(repo));

        builds.select(Category::Cpu, "cpu2").await.unwrap();
        let before = builds.view();

        assert!(matches!(
            builds.select(Category::Cpu, "cpu4").await,
            Err(AppError::Internal(_))
        ));
        assert!(matches!(
            builds.load_preset("flagship").await,
            Err(AppError::Internal(_))
        ));
        let after = builds.view();
        assert_eq!(after.components, before.components);
        assert_eq!(after.summary, before.summary);
        assert_eq!(after.components[0].id, "cpu2");
    }

    #[tokio::test]
    async fn failed_reply_save_reports_error() {
        let post = stored_post();
        let id = post.id.clone();
        let mut repo = MockForumRepo::new();
        repo.expect_get_post()
            .returning(move |_| Ok(Some(post.clone())));
        repo.expect_save_post()
            .returning(|_| Err(anyhow::anyhow!("read-only")));
        let forum = ForumService::new(Box::new(repo), identity());

        assert!(matches!(
            forum.add_reply(&id, NewReply { content: "me too".into() }).await,
            Err(AppError::Internal(_))
        ));
    }
}
