//! # Domain Models
//!
//! These structs represent the core entities of Rusty-Rig: catalog components,
//! presets, and forum posts. Forum entities use UUID v7 for time-ordered,
//! globally unique identification.

use std::fmt;
use std::iter::Sum;
use std::ops::Add;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// A hardware role a build holds at most one component for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Cpu,
    Gpu,
    Ram,
    Motherboard,
    Psu,
    Storage,
    Case,
}

impl Category {
    /// Every category, in display order.
    pub const ALL: [Category; 7] = [
        Category::Cpu,
        Category::Gpu,
        Category::Ram,
        Category::Motherboard,
        Category::Psu,
        Category::Storage,
        Category::Case,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Cpu => "cpu",
            Category::Gpu => "gpu",
            Category::Ram => "ram",
            Category::Motherboard => "motherboard",
            Category::Psu => "psu",
            Category::Storage => "storage",
            Category::Case => "case",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Category::Cpu => "Processor",
            Category::Gpu => "Graphics card",
            Category::Ram => "Memory",
            Category::Motherboard => "Motherboard",
            Category::Psu => "Power supply",
            Category::Storage => "Storage",
            Category::Case => "Case",
        }
    }

    /// Whether a build counts as incomplete while this slot is empty.
    /// Only the GPU is optional (integrated graphics).
    pub fn is_required(self) -> bool {
        self != Category::Gpu
    }

    pub fn required() -> impl Iterator<Item = Category> {
        Self::ALL.into_iter().filter(|c| c.is_required())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| AppError::validation(format!("unknown category '{s}'")))
    }
}

/// A non-negative amount of money in minor units (cents).
///
/// Serialized as the plain integer number of cents so that sums stay exact.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(u64);

impl Price {
    pub const ZERO: Price = Price(0);

    pub const fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    pub const fn cents(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl Add for Price {
    type Output = Price;

    /// Saturates at `u64::MAX` cents instead of overflowing.
    fn add(self, rhs: Price) -> Price {
        Price(self.0.saturating_add(rhs.0))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Price>>(iter: I) -> Price {
        iter.fold(Price::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Price> for Price {
    fn sum<I: Iterator<Item = &'a Price>>(iter: I) -> Price {
        iter.copied().sum()
    }
}

/// A catalog entry. Immutable once the catalog is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    pub id: String,
    pub name: String,
    pub category: Category,
    pub price: Price,
    /// Human-readable spec line (e.g. "8 cores, 16 threads, 3.8 GHz")
    pub specs: String,
    /// Watts. Power draw for most parts, rated output for a PSU.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub socket: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
}

/// A named, fixed list of catalog ids representing a recommended build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preset {
    pub id: String,
    pub name: String,
    pub description: String,
    pub components: Vec<String>,
}

/// Who an authored forum action is attributed to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
    /// Short label shown in place of a profile picture (e.g. "JD")
    pub avatar: String,
}

/// A forum thread starter together with its replies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForumPost {
    pub id: String,
    pub author: String,
    pub avatar: String,
    pub title: String,
    pub content: String,
    pub category: String,
    #[serde(default)]
    pub replies: Vec<ForumReply>,
    #[serde(default)]
    pub views: u64,
    #[serde(default)]
    pub likes: u64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForumReply {
    pub id: String,
    pub author: String,
    pub avatar: String,
    pub content: String,
    #[serde(default)]
    pub likes: u64,
    pub created_at: DateTime<Utc>,
}
