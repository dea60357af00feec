//! # Forum entities
//!
//! Pure state transitions on posts and replies. Persistence and identity are
//! handled by [`crate::service::ForumService`].

use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{Author, ForumPost, ForumReply};

/// Tag applied when a post is created without one.
pub const DEFAULT_CATEGORY: &str = "general";

/// Form data for a new thread.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub category: String,
}

/// Form data for a reply.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewReply {
    pub content: String,
}

fn required(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    Ok(())
}

impl NewPost {
    pub fn validate(&self) -> Result<()> {
        required("title", &self.title)?;
        required("content", &self.content)
    }

    /// Builds the post. Fails without side effects if a field is blank.
    pub fn into_post(self, author: Author, now: DateTime<Utc>) -> Result<ForumPost> {
        self.validate()?;
        let category = match self.category.trim() {
            "" => DEFAULT_CATEGORY.to_string(),
            tag => tag.to_string(),
        };
        Ok(ForumPost {
            id: Uuid::now_v7().to_string(),
            author: author.name,
            avatar: author.avatar,
            title: self.title.trim().to_string(),
            content: self.content,
            category,
            replies: Vec::new(),
            views: 0,
            likes: 0,
            created_at: now,
        })
    }
}

impl NewReply {
    pub fn into_reply(self, author: Author, now: DateTime<Utc>) -> Result<ForumReply> {
        required("content", &self.content)?;
        Ok(ForumReply {
            id: Uuid::now_v7().to_string(),
            author: author.name,
            avatar: author.avatar,
            content: self.content,
            likes: 0,
            created_at: now,
        })
    }
}

impl ForumPost {
    pub fn record_view(&mut self) {
        self.views += 1;
    }

    /// Likes are not deduplicated; every call counts.
    pub fn like(&mut self) {
        self.likes += 1;
    }

    pub fn add_reply(&mut self, reply: ForumReply) {
        self.replies.push(reply);
    }

    pub fn reply(&self, reply_id: &str) -> Option<&ForumReply> {
        self.replies.iter().find(|r| r.id == reply_id)
    }

    /// Bumps one reply's counter, leaving siblings and the post untouched.
    pub fn like_reply(&mut self, reply_id: &str) -> Result<&ForumReply> {
        let reply = self
            .replies
            .iter_mut()
            .find(|r| r.id == reply_id)
            .ok_or_else(|| AppError::not_found("Reply", reply_id))?;
        reply.likes += 1;
        Ok(reply)
    }
}

/// Relative age label, e.g. "just now" or "3 hours ago".
pub fn timestamp_label(created_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let age = now.signed_duration_since(created_at);
    let (n, unit) = if age.num_minutes() < 1 {
        return "just now".to_string();
    } else if age.num_hours() < 1 {
        (age.num_minutes(), "minute")
    } else if age.num_days() < 1 {
        (age.num_hours(), "hour")
    } else {
        (age.num_days(), "day")
    };
    let plural = if n == 1 { "" } else { "s" };
    format!("{n} {unit}{plural} ago")
}
