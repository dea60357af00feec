//! Runtime configuration.
//!
//! Values come from `RUSTY_RIG_*` environment variables (a `.env` file is
//! loaded first), falling back to the defaults below.

use std::path::PathBuf;

use anyhow::Context;
use config::{Config, Environment};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    /// Directory of the local record store.
    pub data_dir: PathBuf,
    /// Used by the `db-sqlite` feature.
    pub database_url: String,
    /// Display name forum actions are attributed to.
    pub user_name: String,
    /// Optional JSON catalog replacing the built-in one.
    pub catalog_path: Option<PathBuf>,
}

impl Settings {
    pub fn load() -> anyhow::Result<Self> {
        Config::builder()
            .set_default("host", "127.0.0.1")?
            .set_default("port", 8080)?
            .set_default("data_dir", "./data")?
            .set_default("database_url", "sqlite:rusty_rig.db")?
            .set_default("user_name", rr_identity_fixed::DEFAULT_NAME)?
            .add_source(Environment::with_prefix("RUSTY_RIG"))
            .build()?
            .try_deserialize()
            .context("invalid RUSTY_RIG_* configuration")
    }
}
