//! Fills an empty local record store with a few forum threads so a fresh
//! install has something to show. Does nothing if the feed already has posts.
//!
//! Usage: `seed [DATA_DIR]` (defaults to `RUSTY_RIG_DATA_DIR`, then `./data`).

use std::path::PathBuf;

use chrono::{DateTime, Duration, Utc};
use rr_core::forum::{NewPost, NewReply};
use rr_core::models::{Author, ForumPost};
use rr_core::traits::ForumRepo;
use rr_identity_fixed::avatar_label;
use rr_storage_local::LocalRecordStore;

fn author(name: &str) -> Author {
    Author {
        name: name.to_string(),
        avatar: avatar_label(name),
    }
}

fn thread(
    who: &str,
    title: &str,
    content: &str,
    category: &str,
    at: DateTime<Utc>,
    replies: &[(&str, &str)],
) -> anyhow::Result<ForumPost> {
    let mut post = NewPost {
        title: title.to_string(),
        content: content.to_string(),
        category: category.to_string(),
    }
    .into_post(author(who), at)?;

    for (offset, (who, text)) in replies.iter().enumerate() {
        let reply = NewReply {
            content: text.to_string(),
        }
        .into_reply(author(who), at + Duration::minutes(10 * (offset as i64 + 1)))?;
        post.add_reply(reply);
    }
    Ok(post)
}

/// Sample threads, oldest first.
fn sample_posts(now: DateTime<Utc>) -> anyhow::Result<Vec<ForumPost>> {
    Ok(vec![
        thread(
            "Alex Turner",
            "Is 650W enough for an RTX 4070?",
            "Planning a Ryzen 5 7600 + RTX 4070 build. Will a 650W bronze unit hold up?",
            "psu",
            now - Duration::days(3),
            &[
                ("Maria Lopez", "Draw is around 280W, so yes, with plenty of headroom."),
                ("Dmitri", "Get a gold unit if you can, they run quieter."),
            ],
        )?,
        thread(
            "Maria Lopez",
            "AM5 vs LGA1700 for a long-lived build",
            "Which platform will have a better upgrade path over the next few years?",
            "cpu",
            now - Duration::hours(20),
            &[("Alex Turner", "AM5, the socket is promised for several generations.")],
        )?,
        thread(
            "Sam",
            "Show off: my first Flagship preset build",
            "Loaded the Flagship preset, swapped nothing. Temps are great so far.",
            "builds",
            now - Duration::hours(2),
            &[],
        )?,
    ])
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let data_dir = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("RUSTY_RIG_DATA_DIR").ok())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("./data"));
    let store = LocalRecordStore::new(data_dir.clone());

    if !store.list_posts().await?.is_empty() {
        log::info!("{} already has forum posts, nothing to do", data_dir.display());
        return Ok(());
    }

    // Saving oldest first leaves the newest at the front of the feed.
    let posts = sample_posts(Utc::now())?;
    for post in &posts {
        store.save_post(post).await?;
    }
    log::info!("seeded {} threads into {}", posts.len(), data_dir.display());
    Ok(())
}
