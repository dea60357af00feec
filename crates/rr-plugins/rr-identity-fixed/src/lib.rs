//! # rr-identity-fixed
//!
//! `IdentityProvider` for a single local user. Every post, reply and like is
//! attributed to the same configured display name; there is no login and no
//! way to tell viewers apart.

use rr_core::models::Author;
use rr_core::traits::IdentityProvider;

/// Display name used when none is configured.
pub const DEFAULT_NAME: &str = "You";

pub struct FixedIdentity {
    author: Author,
}

impl FixedIdentity {
    /// Accepts a display name (e.g., from an environment variable).
    /// A blank name falls back to [`DEFAULT_NAME`].
    pub fn new(name: &str) -> Self {
        let name = match name.trim() {
            "" => DEFAULT_NAME,
            trimmed => trimmed,
        };
        log::debug!("forum actions will be attributed to '{name}'");
        Self {
            author: Author {
                name: name.to_string(),
                avatar: avatar_label(name),
            },
        }
    }
}

impl Default for FixedIdentity {
    fn default() -> Self {
        Self::new(DEFAULT_NAME)
    }
}

impl IdentityProvider for FixedIdentity {
    fn current_author(&self) -> Author {
        self.author.clone()
    }
}

/// Two-letter badge: initials of the first two words, or the first two
/// characters of a single word, uppercased.
pub fn avatar_label(name: &str) -> String {
    let words: Vec<&str> = name.split_whitespace().collect();
    let label: String = match words.as_slice() {
        [] => String::new(),
        [single] => single.chars().take(2).collect(),
        [first, second, ..] => first.chars().take(1).chain(second.chars().take(1)).collect(),
    };
    label.to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn avatar_from_one_or_two_words() {
        assert_eq!(avatar_label("You"), "YO");
        assert_eq!(avatar_label("Jane Doe"), "JD");
        assert_eq!(avatar_label("ada lovelace byron"), "AL");
        assert_eq!(avatar_label("Вы"), "ВЫ");
        assert_eq!(avatar_label("x"), "X");
    }

    #[test]
    fn every_call_returns_the_same_author() {
        let identity = FixedIdentity::new("Jane Doe");
        assert_eq!(identity.current_author(), identity.current_author());
        assert_eq!(identity.current_author().avatar, "JD");
    }

    #[test]
    fn blank_name_falls_back_to_default() {
        let author = FixedIdentity::new("   ").current_author();
        assert_eq!(author.name, DEFAULT_NAME);
        assert_eq!(author.avatar, "YO");
    }
}
