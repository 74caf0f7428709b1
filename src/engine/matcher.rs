use std::borrow::Cow;

use icu_normalizer::ComposingNormalizerBorrowed;
use tracing::debug;

use crate::engine::fall::{ActiveWord, WordId};
use crate::engine::session::{GameEvent, GameSession, Notice, Submission};

/// Live feedback for the word the player is currently typing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrefixMatch {
    pub target: WordId,
    /// Leading part of the target typed correctly so far.
    pub matched: String,
    /// Target character at the first mistake, if the input diverged.
    pub wrong: Option<char>,
    /// Untyped remainder of the target after `matched` and `wrong`.
    pub rest: String,
    /// Everything typed so far is a correct prefix.
    pub ok: bool,
}

fn nfc(text: &str) -> Cow<'_, str> {
    ComposingNormalizerBorrowed::new_nfc().normalize(text)
}

pub fn chars_eq(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}

/// Case-insensitive, normalization-insensitive whole-word equality.
pub fn eq_ignore_case(a: &str, b: &str) -> bool {
    let (a, b) = (nfc(a), nfc(b));
    a.chars().count() == b.chars().count() && a.chars().zip(b.chars()).all(|(x, y)| chars_eq(x, y))
}

/// Length in chars of the case-insensitive common prefix.
pub fn common_prefix_len(input: &str, target: &str) -> usize {
    let (input, target) = (nfc(input), nfc(target));
    input
        .chars()
        .zip(target.chars())
        .take_while(|&(a, b)| chars_eq(a, b))
        .count()
}

pub fn starts_with_ignore_case(text: &str, prefix: &str) -> bool {
    common_prefix_len(prefix, text) == nfc(prefix).chars().count()
}

/// Picks the word the input is aimed at: the first word it is a prefix of,
/// otherwise the first word on the board.
pub fn prefix_match(input: &str, words: &[ActiveWord]) -> Option<PrefixMatch> {
    let candidates: Vec<&ActiveWord> = words.iter().filter(|w| !w.slashed).collect();
    let target = candidates
        .iter()
        .find(|w| starts_with_ignore_case(&w.text, input))
        .or_else(|| candidates.first())?;

    let text = nfc(&target.text);
    let typed = nfc(input).chars().count();
    let i = common_prefix_len(input, &text);
    let ok = i == typed;

    let mut chars = text.chars();
    let matched: String = chars.by_ref().take(i).collect();
    let wrong = if ok { None } else { chars.next() };
    let rest: String = chars.collect();

    Some(PrefixMatch {
        target: target.id,
        matched,
        wrong,
        rest,
        ok,
    })
}

/// The word an exact submission clears, if any.
pub fn find_exact<'a>(submitted: &str, words: &'a [ActiveWord]) -> Option<&'a ActiveWord> {
    words
        .iter()
        .filter(|w| !w.slashed)
        .find(|w| eq_ignore_case(&w.text, submitted))
}

impl GameSession {
    /// Prefix feedback for the current input buffer.
    pub fn feedback(&self) -> Option<PrefixMatch> {
        if self.input.is_empty() {
            return None;
        }
        prefix_match(&self.input, &self.active)
    }

    /// Submits the input buffer. Only counts while a round is running.
    pub fn submit(&mut self) -> Submission {
        let raw = std::mem::take(&mut self.input);
        let value = raw.trim();
        if value.is_empty() || self.paused || self.exited || !self.phase.is_active() {
            return Submission::Ignored;
        }
        self.ledger.record_attempt();

        let Some(id) = find_exact(value, &self.active).map(|w| w.id) else {
            self.ledger.break_streak();
            debug!(input = value, "wrong word");
            self.events.push(GameEvent::Wrong {
                input: value.to_string(),
            });
            self.show_notice(Notice::Wrong);
            return Submission::Wrong;
        };
        let Some(word) = self.remove_word(id) else {
            return Submission::Ignored;
        };

        let streak = self.ledger.record_correct();
        let points = self.hit_value();
        self.events.push(GameEvent::Hit {
            id,
            text: word.text.clone(),
            points,
        });
        if streak >= self.tuning.on_fire_streak {
            self.show_notice(Notice::OnFire { streak });
        }
        self.award_points(points);
        Submission::Hit {
            text: word.text,
            points,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(texts: &[&str]) -> Vec<ActiveWord> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| ActiveWord::new(WordId(i as u64), t.to_string(), 3.0, 0))
            .collect()
    }

    #[test]
    fn test_correct_prefix() {
        let board = words(&["plasma"]);
        let m = prefix_match("PLa", &board).unwrap();
        assert!(m.ok);
        assert_eq!(m.matched, "pla");
        assert_eq!(m.wrong, None);
        assert_eq!(m.rest, "sma");
    }

    #[test]
    fn test_divergent_input_marks_wrong_char() {
        let board = words(&["cyber"]);
        let m = prefix_match("cyx", &board).unwrap();
        assert!(!m.ok);
        assert_eq!(m.matched, "cy");
        assert_eq!(m.wrong, Some('b'));
        assert_eq!(m.rest, "er");
    }

    #[test]
    fn test_empty_input_targets_first_word() {
        let board = words(&["neon", "node"]);
        let m = prefix_match("", &board).unwrap();
        assert_eq!(m.target, WordId(0));
        assert!(m.ok);
        assert_eq!(m.rest, "neon");
    }

    #[test]
    fn test_targets_word_with_matching_prefix() {
        let board = words(&["neon", "orbit"]);
        let m = prefix_match("or", &board).unwrap();
        assert_eq!(m.target, WordId(1));
    }

    #[test]
    fn test_overtyped_input_is_not_ok() {
        let board = words(&["neo"]);
        let m = prefix_match("neon", &board).unwrap();
        assert!(!m.ok);
        assert_eq!(m.matched, "neo");
        assert_eq!(m.wrong, None);
        assert_eq!(m.rest, "");
    }

    #[test]
    fn test_no_words_no_feedback() {
        assert!(prefix_match("a", &[]).is_none());
    }

    #[test]
    fn test_exact_match_ignores_case_and_normalization() {
        let board = words(&["caf\u{e9}"]);
        assert!(find_exact("CAFE\u{301}", &board).is_some());
        assert!(find_exact("caf", &board).is_none());
    }

    #[test]
    fn test_slashed_words_cannot_be_matched() {
        let mut board = words(&["neon"]);
        board[0].slashed = true;
        assert!(find_exact("neon", &board).is_none());
        assert!(prefix_match("ne", &board).is_none());
    }
}
