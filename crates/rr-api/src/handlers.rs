//! # rr-api Handlers
//!
//! This module coordinates the flow between HTTP requests and the core services.

use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use rr_core::filter::{BrandFilter, CatalogFilter, SortKey};
use rr_core::forum::{timestamp_label, NewPost, NewReply};
use rr_core::models::{Category, Component, ForumPost, ForumReply, Price};
use rr_core::build::PresetLoad;
use rr_core::service::{BuildService, BuildView, ForumService};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// State shared across all Actix-web workers.
pub struct AppState {
    pub builds: BuildService,
    pub forum: ForumService,
}

type ApiResult<T> = Result<T, ApiError>;

// ── Catalog ─────────────────────────────────────────────────────────────────

/// Query string of `GET /api/catalog`. Prices are in cents.
#[derive(Debug, Default, Deserialize)]
pub struct CatalogQuery {
    pub category: Option<String>,
    pub min_price: Option<u64>,
    pub max_price: Option<u64>,
    pub brand: Option<String>,
    pub sort: Option<String>,
}

impl CatalogQuery {
    fn into_filter(self) -> ApiResult<CatalogFilter> {
        Ok(CatalogFilter {
            category: self.category.as_deref().map(str::parse::<Category>).transpose()?,
            min_price: self.min_price.map(Price::from_cents),
            max_price: self.max_price.map(Price::from_cents),
            brand: BrandFilter::from(self.brand.as_deref()),
            sort: self
                .sort
                .as_deref()
                .map(str::parse::<SortKey>)
                .transpose()?
                .unwrap_or_default(),
        })
    }
}

pub async fn list_components(
    data: web::Data<AppState>,
    query: web::Query<CatalogQuery>,
) -> ApiResult<web::Json<Vec<Component>>> {
    let filter = query.into_inner().into_filter()?;
    let found = filter
        .apply(data.builds.catalog())
        .into_iter()
        .cloned()
        .collect();
    Ok(web::Json(found))
}

#[derive(Debug, Serialize)]
pub struct CategoryInfo {
    pub id: Category,
    pub title: &'static str,
    pub required: bool,
}

pub async fn list_categories() -> web::Json<Vec<CategoryInfo>> {
    web::Json(
        Category::ALL
            .into_iter()
            .map(|c| CategoryInfo {
                id: c,
                title: c.title(),
                required: c.is_required(),
            })
            .collect(),
    )
}

pub async fn list_brands(
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<String>>> {
    let category: Category = path.parse()?;
    let brands = data.builds.catalog().brands(category);
    Ok(web::Json(brands.into_iter().map(String::from).collect()))
}

/// A preset as shown in the gallery, with its ids already resolved.
#[derive(Debug, Serialize)]
pub struct PresetCard {
    pub id: String,
    pub name: String,
    pub description: String,
    pub components: Vec<Component>,
    pub total_price: Price,
}

pub async fn list_presets(data: web::Data<AppState>) -> web::Json<Vec<PresetCard>> {
    let catalog = data.builds.catalog();
    let cards = catalog
        .presets()
        .iter()
        .map(|preset| {
            let components: Vec<Component> = preset
                .components
                .iter()
                .filter_map(|id| catalog.get(id).cloned())
                .collect();
            PresetCard {
                id: preset.id.clone(),
                name: preset.name.clone(),
                description: preset.description.clone(),
                total_price: components.iter().map(|c| c.price).sum(),
                components,
            }
        })
        .collect();
    web::Json(cards)
}

// ── Build ───────────────────────────────────────────────────────────────────

pub async fn get_build(data: web::Data<AppState>) -> web::Json<BuildView> {
    web::Json(data.builds.view())
}

#[derive(Debug, Deserialize)]
pub struct SelectRequest {
    pub component_id: String,
}

pub async fn select_component(
    data: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<SelectRequest>,
) -> ApiResult<web::Json<BuildView>> {
    let category: Category = path.parse()?;
    let view = data.builds.select(category, &body.component_id).await?;
    Ok(web::Json(view))
}

pub async fn remove_component(
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<BuildView>> {
    let category: Category = path.parse()?;
    Ok(web::Json(data.builds.remove(category).await?))
}

pub async fn clear_build(data: web::Data<AppState>) -> ApiResult<web::Json<BuildView>> {
    Ok(web::Json(data.builds.clear().await?))
}

/// The loaded build plus how many preset ids resolved and which were dropped.
#[derive(Debug, Serialize)]
pub struct PresetLoadView {
    #[serde(flatten)]
    pub build: BuildView,
    #[serde(flatten)]
    pub report: PresetLoad,
}

pub async fn load_preset(
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<PresetLoadView>> {
    let (build, report) = data.builds.load_preset(&path).await?;
    Ok(web::Json(PresetLoadView { build, report }))
}

// ── Forum ───────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ReplyView {
    pub id: String,
    pub author: String,
    pub avatar: String,
    pub content: String,
    pub likes: u64,
    pub created_at: DateTime<Utc>,
    /// Relative age, e.g. "5 minutes ago"
    pub timestamp: String,
}

impl ReplyView {
    fn new(reply: ForumReply, now: DateTime<Utc>) -> Self {
        Self {
            timestamp: timestamp_label(reply.created_at, now),
            id: reply.id,
            author: reply.author,
            avatar: reply.avatar,
            content: reply.content,
            likes: reply.likes,
            created_at: reply.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PostView {
    pub id: String,
    pub author: String,
    pub avatar: String,
    pub title: String,
    pub content: String,
    pub category: String,
    pub views: u64,
    pub likes: u64,
    pub reply_count: usize,
    pub replies: Vec<ReplyView>,
    pub created_at: DateTime<Utc>,
    pub timestamp: String,
}

impl PostView {
    fn new(post: ForumPost, now: DateTime<Utc>) -> Self {
        Self {
            timestamp: timestamp_label(post.created_at, now),
            reply_count: post.replies.len(),
            replies: post
                .replies
                .into_iter()
                .map(|r| ReplyView::new(r, now))
                .collect(),
            id: post.id,
            author: post.author,
            avatar: post.avatar,
            title: post.title,
            content: post.content,
            category: post.category,
            views: post.views,
            likes: post.likes,
            created_at: post.created_at,
        }
    }
}

fn post_view(post: ForumPost) -> web::Json<PostView> {
    web::Json(PostView::new(post, Utc::now()))
}

#[derive(Debug, Deserialize)]
pub struct FeedQuery {
    pub category: Option<String>,
}

pub async fn list_posts(
    data: web::Data<AppState>,
    query: web::Query<FeedQuery>,
) -> ApiResult<web::Json<Vec<PostView>>> {
    let posts = data.forum.list_posts(query.category.as_deref()).await?;
    let now = Utc::now();
    Ok(web::Json(
        posts.into_iter().map(|p| PostView::new(p, now)).collect(),
    ))
}

pub async fn create_post(
    data: web::Data<AppState>,
    body: web::Json<NewPost>,
) -> ApiResult<HttpResponse> {
    let post = data.forum.create_post(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(PostView::new(post, Utc::now())))
}

/// Detail view. Each request counts as one view.
pub async fn open_post(
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<PostView>> {
    Ok(post_view(data.forum.open_post(&path).await?))
}

pub async fn like_post(
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<PostView>> {
    Ok(post_view(data.forum.like_post(&path).await?))
}

pub async fn add_reply(
    data: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<NewReply>,
) -> ApiResult<HttpResponse> {
    let post = data.forum.add_reply(&path, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(PostView::new(post, Utc::now())))
}

pub async fn like_reply(
    data: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> ApiResult<web::Json<PostView>> {
    let (post_id, reply_id) = path.into_inner();
    Ok(post_view(data.forum.like_reply(&post_id, &reply_id).await?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_query_defaults_to_everything_by_price() {
        let filter = CatalogQuery::default().into_filter().unwrap();
        assert!(filter.category.is_none());
        assert_eq!(filter.brand, BrandFilter::All);
        assert_eq!(filter.sort, SortKey::PriceAsc);
    }

    #[test]
    fn catalog_query_rejects_unknown_values() {
        let bad_category = CatalogQuery {
            category: Some("cooler".into()),
            ..CatalogQuery::default()
        };
        assert!(bad_category.into_filter().is_err());

        let bad_sort = CatalogQuery {
            sort: Some("random".into()),
            ..CatalogQuery::default()
        };
        assert!(bad_sort.into_filter().is_err());
    }
}
