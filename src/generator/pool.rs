use rand::Rng;
use rand::seq::SliceRandom;

use crate::engine::matcher::eq_ignore_case;

const WORDS_EN: &str = include_str!("../../assets/words-en.json");

/// Built-in word list used whenever the word service cannot help.
#[derive(Clone, Debug)]
pub struct WordPool {
    words: Vec<String>,
}

impl WordPool {
    pub fn load() -> Self {
        let words: Vec<String> = serde_json::from_str(WORDS_EN).unwrap_or_default();
        Self::from_words(words)
    }

    pub fn from_words(words: Vec<String>) -> Self {
        let words = words
            .into_iter()
            .map(|w| w.trim().to_string())
            .filter(|w| !w.is_empty())
            .collect();
        Self { words }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Uniformly picks a word that is not already on the board. When every
    /// word is excluded a duplicate is allowed rather than retrying forever.
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R, exclude: &[&str]) -> Option<String> {
        let fresh: Vec<&String> = self
            .words
            .iter()
            .filter(|w| !exclude.iter().any(|e| eq_ignore_case(w, e)))
            .collect();
        if let Some(word) = fresh.choose(rng) {
            return Some((*word).clone());
        }
        self.words.choose(rng).cloned()
    }

    /// Up to `count` distinct words, padded with repeats if the pool is short.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R, count: usize) -> Vec<String> {
        let mut out: Vec<String> = Vec::with_capacity(count);
        for _ in 0..count {
            let taken: Vec<&str> = out.iter().map(String::as_str).collect();
            match self.pick(rng, &taken) {
                Some(word) => out.push(word),
                None => break,
            }
        }
        out
    }
}

impl Default for WordPool {
    fn default() -> Self {
        Self::load()
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    #[test]
    fn test_embedded_pool_has_several_dozen_words() {
        let pool = WordPool::load();
        assert!(pool.len() >= 36);
        assert!(pool.words().iter().any(|w| w == "neon"));
    }

    #[test]
    fn test_pick_avoids_excluded_words() {
        let pool = WordPool::from_words(vec!["neon".into(), "cyber".into()]);
        let mut rng = SmallRng::seed_from_u64(9);
        for _ in 0..50 {
            assert_eq!(pool.pick(&mut rng, &["NEON"]).as_deref(), Some("cyber"));
        }
    }

    #[test]
    fn test_pick_allows_duplicate_when_pool_exhausted() {
        let pool = WordPool::from_words(vec!["neon".into()]);
        let mut rng = SmallRng::seed_from_u64(1);
        assert_eq!(pool.pick(&mut rng, &["neon"]).as_deref(), Some("neon"));
    }

    #[test]
    fn test_empty_pool_yields_nothing() {
        let pool = WordPool::from_words(vec![" ".into()]);
        let mut rng = SmallRng::seed_from_u64(1);
        assert!(pool.is_empty());
        assert!(pool.pick(&mut rng, &[]).is_none());
    }

    #[test]
    fn test_sample_is_distinct_when_possible() {
        let pool = WordPool::load();
        let mut rng = SmallRng::seed_from_u64(5);
        let words = pool.sample(&mut rng, 10);
        let unique: std::collections::HashSet<&String> = words.iter().collect();
        assert_eq!(words.len(), 10);
        assert_eq!(unique.len(), 10);
    }
}
