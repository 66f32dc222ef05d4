use dashmap::DashMap;
use serde::Serialize;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReactionCounts {
    pub like: u64,
    pub dislike: u64,
    pub love: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReactionKind {
    Like,
    Dislike,
    Love,
}

impl FromStr for ReactionKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "like" => Ok(ReactionKind::Like),
            "dislike" => Ok(ReactionKind::Dislike),
            "love" => Ok(ReactionKind::Love),
            _ => Err(()),
        }
    }
}

impl ReactionCounts {
    fn slot(&mut self, kind: ReactionKind) -> &mut u64 {
        match kind {
            ReactionKind::Like => &mut self.like,
            ReactionKind::Dislike => &mut self.dislike,
            ReactionKind::Love => &mut self.love,
        }
    }
}

/// Per-post reaction counters.
///
/// Owned by the application state and handed to handlers; counters live as
/// long as the store does. A post seen for the first time starts from
/// deterministic seed counts rather than zero.
pub struct ReactionStore {
    counts: DashMap<String, ReactionCounts>,
    salt: String,
}

impl ReactionStore {
    pub fn new(site_prefix: &str) -> Self {
        Self {
            counts: DashMap::new(),
            salt: format!("{}-global-reactions", site_prefix),
        }
    }

    pub fn get(&self, post_id: &str) -> ReactionCounts {
        *self
            .counts
            .entry(post_id.to_string())
            .or_insert_with(|| seed_counts(post_id, &self.salt))
    }

    /// Apply an increment then a decrement (floored at zero) atomically.
    pub fn apply(
        &self,
        post_id: &str,
        increment: Option<ReactionKind>,
        decrement: Option<ReactionKind>,
    ) -> ReactionCounts {
        let mut counts = self
            .counts
            .entry(post_id.to_string())
            .or_insert_with(|| seed_counts(post_id, &self.salt));

        if let Some(kind) = increment {
            *counts.slot(kind) += 1;
        }
        if let Some(kind) = decrement {
            let slot = counts.slot(kind);
            *slot = slot.saturating_sub(1);
        }
        *counts
    }
}

fn seed_counts(post_id: &str, salt: &str) -> ReactionCounts {
    let hash = string_hash(&format!("{}{}", post_id, salt));
    ReactionCounts {
        like: (hash % 70).unsigned_abs() + 5,
        dislike: (hash % 10).unsigned_abs(),
        love: (hash % 40).unsigned_abs() + 3,
    }
}

// `h = c + ((h << 5) - h)` over UTF-16 code units, where the shift wraps to
// 32 bits but the sum does not.
fn string_hash(s: &str) -> i64 {
    s.encode_utf16().fold(0i64, |acc, unit| {
        let shifted = (acc as i32).wrapping_shl(5) as i64;
        unit as i64 + (shifted - acc)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_counts_are_deterministic() {
        let store = ReactionStore::new("techblog");
        assert_eq!(
            store.get("hello-world"),
            ReactionCounts { like: 17, dislike: 2, love: 5 }
        );
        assert_eq!(
            store.get("my-first-post"),
            ReactionCounts { like: 26, dislike: 1, love: 34 }
        );
        assert_eq!(
            store.get("مرحبا"),
            ReactionCounts { like: 20, dislike: 5, love: 8 }
        );
    }

    #[test]
    fn test_hash_exceeds_32_bits() {
        assert_eq!(string_hash("hello-worldtechblog-global-reactions"), -5_433_346_882);
    }

    #[test]
    fn test_increment_and_decrement() {
        let store = ReactionStore::new("techblog");
        let before = store.get("hello-world");

        let after = store.apply("hello-world", Some(ReactionKind::Love), Some(ReactionKind::Like));
        assert_eq!(after.love, before.love + 1);
        assert_eq!(after.like, before.like - 1);
        assert_eq!(after.dislike, before.dislike);
        assert_eq!(store.get("hello-world"), after);
    }

    #[test]
    fn test_decrement_floors_at_zero() {
        let store = ReactionStore::new("techblog");
        let dislike = store.get("my-first-post").dislike;

        for _ in 0..dislike + 3 {
            store.apply("my-first-post", None, Some(ReactionKind::Dislike));
        }
        assert_eq!(store.get("my-first-post").dislike, 0);
    }

    #[test]
    fn test_counts_are_per_post() {
        let store = ReactionStore::new("techblog");
        store.apply("a", Some(ReactionKind::Like), None);
        let b = store.get("b");
        assert_eq!(store.get("b"), b);
        assert_eq!(store.counts.len(), 2);
    }

    #[test]
    fn test_parse_kind() {
        assert_eq!("like".parse::<ReactionKind>(), Ok(ReactionKind::Like));
        assert_eq!("love".parse::<ReactionKind>(), Ok(ReactionKind::Love));
        assert_eq!("dislike".parse::<ReactionKind>(), Ok(ReactionKind::Dislike));
        assert!("Like".parse::<ReactionKind>().is_err());
        assert!("wow".parse::<ReactionKind>().is_err());
    }
}
