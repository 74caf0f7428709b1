pub mod http;
pub mod pool;
pub mod worker;

use std::sync::Mutex;

use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};

use crate::engine::error::SupplyError;
use crate::generator::pool::WordPool;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordEntry {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u32>,
}

impl WordEntry {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            level: None,
        }
    }
}

/// Anything that can hand out words to spawn.
pub trait WordSource: Send + Sync {
    fn fetch_words(&self, count: usize, level: u32) -> Result<Vec<WordEntry>, SupplyError>;
}

/// Serves words from the embedded pool. Never fails.
pub struct LocalWordSource {
    pool: WordPool,
    rng: Mutex<SmallRng>,
}

impl LocalWordSource {
    pub fn new(pool: WordPool, rng: SmallRng) -> Self {
        Self {
            pool,
            rng: Mutex::new(rng),
        }
    }
}

impl Default for LocalWordSource {
    fn default() -> Self {
        Self::new(WordPool::load(), SmallRng::from_entropy())
    }
}

impl WordSource for LocalWordSource {
    fn fetch_words(&self, count: usize, _level: u32) -> Result<Vec<WordEntry>, SupplyError> {
        let mut rng = match self.rng.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let words = self.pool.sample(&mut *rng, count.clamp(1, 10));
        if words.is_empty() {
            return Err(SupplyError::Empty);
        }
        Ok(words.into_iter().map(WordEntry::new).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_source_clamps_count() {
        let source = LocalWordSource::new(WordPool::load(), SmallRng::seed_from_u64(2));
        assert_eq!(source.fetch_words(0, 1).unwrap().len(), 1);
        assert_eq!(source.fetch_words(50, 1).unwrap().len(), 10);
    }

    #[test]
    fn test_local_source_empty_pool_errors() {
        let source = LocalWordSource::new(WordPool::from_words(vec![]), SmallRng::seed_from_u64(2));
        assert!(matches!(source.fetch_words(1, 1), Err(SupplyError::Empty)));
    }

    #[test]
    fn test_word_entry_accepts_server_shape() {
        let entries: Vec<WordEntry> =
            serde_json::from_str(r#"[{"text":"neon"},{"text":"orbit","level":2}]"#).unwrap();
        assert_eq!(entries[0], WordEntry::new("neon"));
        assert_eq!(entries[1].level, Some(2));
    }
}
