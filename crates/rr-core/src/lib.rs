//! rusty-rig/crates/rr-core/src/lib.rs
//!
//! The central domain logic and interface definitions for Rusty-Rig:
//! the component catalog, build aggregation rules, and forum entities.

pub mod build;
pub mod catalog;
pub mod error;
pub mod filter;
pub mod forum;
pub mod models;
pub mod service;
pub mod traits;

// Re-exporting for easier access in other crates
pub use build::{BuildSelection, BuildSummary, Check, PresetLoad, Slot};
pub use catalog::Catalog;
pub use error::*;
pub use filter::{BrandFilter, CatalogFilter, SortKey};
pub use models::*;
pub use service::{BuildService, BuildView, ForumService};
pub use traits::*;

#[cfg(test)]
mod tests {
    use super::models::*;

    #[test]
    fn test_category_round_trip_through_str() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>().unwrap(), category);
        }
        assert!("cooler".parse::<Category>().is_err());
    }

    #[test]
    fn test_required_categories() {
        let required: Vec<_> = Category::required().collect();
        assert_eq!(
            required,
            vec![
                Category::Cpu,
                Category::Ram,
                Category::Motherboard,
                Category::Psu,
                Category::Storage,
                Category::Case
            ]
        );
        assert!(!Category::Gpu.is_required());
    }

    #[test]
    fn test_price_display_and_sum() {
        let total: Price = [Price::from_cents(349_99), Price::from_cents(5)].iter().sum();
        assert_eq!(total.to_string(), "350.04");
        assert_eq!(Price::ZERO.to_string(), "0.00");
    }

    #[test]
    fn test_price_sum_saturates() {
        let total: Price = [Price::from_cents(u64::MAX), Price::from_cents(1)].iter().sum();
        assert_eq!(total, Price::from_cents(u64::MAX));
    }

    #[test]
    fn test_post_serializes_full_graph() {
        let post = ForumPost {
            id: uuid::Uuid::now_v7().to_string(),
            author: "You".into(),
            avatar: "YO".into(),
            title: "First build".into(),
            content: "Hello Rust!".into(),
            category: "builds".into(),
            replies: vec![ForumReply {
                id: "r1".into(),
                author: "You".into(),
                avatar: "YO".into(),
                content: "bump".into(),
                likes: 2,
                created_at: chrono::Utc::now(),
            }],
            views: 4,
            likes: 1,
            created_at: chrono::Utc::now(),
        };
        let json = serde_json::to_value(&post).unwrap();
        assert_eq!(json["replies"][0]["likes"], 2);
        let back: ForumPost = serde_json::from_value(json).unwrap();
        assert_eq!(back, post);
    }
}
