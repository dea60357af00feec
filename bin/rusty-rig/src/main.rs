//! # Rusty-Rig Binary
//!
//! The entry point that assembles the application based on compile-time features.

mod settings;

use actix_web::{web, App, HttpServer};
use anyhow::Context;
use rr_api::{configure_routes, middleware, AppState};
use rr_core::catalog::Catalog;
use rr_core::service::{BuildService, ForumService};
use rr_core::traits::{BuildRepo, ForumRepo};
use rr_identity_fixed::FixedIdentity;
use settings::Settings;

// Feature-gated imports: the storage backend is chosen at compile time
#[cfg(feature = "db-sqlite")]
use rr_db_sqlite::SqliteRecordRepo;

#[cfg(all(feature = "storage-local", not(feature = "db-sqlite")))]
use rr_storage_local::LocalRecordStore;

#[cfg(not(any(feature = "storage-local", feature = "db-sqlite")))]
compile_error!("enable one storage backend: `storage-local` or `db-sqlite`");

async fn load_catalog(settings: &Settings) -> anyhow::Result<Catalog> {
    match &settings.catalog_path {
        Some(path) => {
            let raw = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("reading catalog {}", path.display()))?;
            let catalog = Catalog::from_json(&raw)
                .with_context(|| format!("loading catalog {}", path.display()))?;
            log::info!(
                "catalog: {} components, {} presets from {}",
                catalog.components().len(),
                catalog.presets().len(),
                path.display()
            );
            Ok(catalog)
        }
        None => Ok(Catalog::builtin()),
    }
}

#[cfg(feature = "db-sqlite")]
async fn open_stores(settings: &Settings) -> anyhow::Result<(Box<dyn ForumRepo>, Box<dyn BuildRepo>)> {
    let repo = SqliteRecordRepo::new(&settings.database_url).await?;
    Ok((Box::new(repo.clone()), Box::new(repo)))
}

#[cfg(all(feature = "storage-local", not(feature = "db-sqlite")))]
async fn open_stores(settings: &Settings) -> anyhow::Result<(Box<dyn ForumRepo>, Box<dyn BuildRepo>)> {
    log::info!("record store at {}", settings.data_dir.display());
    Ok((
        Box::new(LocalRecordStore::new(settings.data_dir.clone())),
        Box::new(LocalRecordStore::new(settings.data_dir.clone())),
    ))
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let settings = Settings::load()?;

    // 1. Catalog
    let catalog = load_catalog(&settings).await?;

    // 2. Storage implementation
    let (forum_repo, build_repo) = open_stores(&settings).await?;

    // 3. Identity
    let identity = FixedIdentity::new(&settings.user_name);

    // 4. Wrap in AppState (Using dynamic dispatch for maximum flexibility)
    let builds = BuildService::new(catalog, build_repo);
    let restored = builds.restore().await?;
    if !restored.components.is_empty() {
        log::info!("restored build with {} components", restored.components.len());
    }
    let state = web::Data::new(AppState {
        builds,
        forum: ForumService::new(forum_repo, Box::new(identity)),
    });

    log::info!("🚀 Rusty-Rig starting on http://{}:{}", settings.host, settings.port);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(middleware::standard_middleware())
            .wrap(middleware::cors_policy())
            .configure(configure_routes)
    })
    .bind((settings.host.as_str(), settings.port))?
    .run()
    .await?;

    Ok(())
}
