#![allow(dead_code)]

use actix_web::web;
use rr_api::AppState;
use rr_core::catalog::Catalog;
use rr_core::service::{BuildService, ForumService};
use rr_identity_fixed::FixedIdentity;
use rr_storage_local::LocalRecordStore;
use tempfile::TempDir;

/// App state backed by record stores in a fresh temp dir. Keep the `TempDir`
/// alive for as long as the state is used.
pub fn state() -> (TempDir, web::Data<AppState>) {
    let dir = tempfile::tempdir().expect("temp dir");
    let state = state_in(&dir);
    (dir, state)
}

pub fn state_in(dir: &TempDir) -> web::Data<AppState> {
    let root = dir.path().to_path_buf();
    web::Data::new(AppState {
        builds: BuildService::new(
            Catalog::builtin(),
            Box::new(LocalRecordStore::new(root.clone())),
        ),
        forum: ForumService::new(
            Box::new(LocalRecordStore::new(root)),
            Box::new(FixedIdentity::new("Jane Doe")),
        ),
    })
}
