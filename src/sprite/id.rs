//! # Sprite Identifiers
//!
//! Process-wide, strictly increasing sprite ids.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};

static NEXT_ID: OnceLock<AtomicU64> = OnceLock::new();

/// Unique identifier of a sprite.
///
/// Ids come from one counter shared by the whole process, seeded once with
/// the wall-clock time in milliseconds, so they are unique across trees and
/// ordered by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SpriteId(pub u64);

impl SpriteId {
    /// Takes the next id from the process-wide counter.
    ///
    /// # Examples
    ///
    /// ```
    /// use blaze::SpriteId;
    ///
    /// let first = SpriteId::next();
    /// let second = SpriteId::next();
    /// assert!(second > first);
    /// ```
    pub fn next() -> Self {
        let counter = NEXT_ID.get_or_init(|| AtomicU64::new(clock_seed()));
        Self(counter.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for SpriteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sprite#{}", self.0)
    }
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_ids_increase() {
        let ids: Vec<SpriteId> = (0..100).map(|_| SpriteId::next()).collect();
        assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn test_ids_unique_across_threads() {
        let handles: Vec<_> = (0..4)
            .map(|_| thread::spawn(|| (0..250).map(|_| SpriteId::next()).collect::<Vec<_>>()))
            .collect();

        let mut ids: Vec<SpriteId> = handles
            .into_iter()
            .flat_map(|handle| handle.join().unwrap())
            .collect();
        let total = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), total);
    }

    #[test]
    fn test_display() {
        assert_eq!(SpriteId(7).to_string(), "sprite#7");
    }
}
