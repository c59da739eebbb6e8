//! Move legality: which letters can be appended without losing on the spot
//!
//! Each candidate letter falls in one of four buckets:
//! - safe: the new prefix still leads somewhere and is not itself a word
//! - completes a word that can still be extended (legal, but callable)
//! - completes a word nothing extends (the round is lost when called)
//! - dead end: no word starts with the new prefix

use super::dictionary::WordOracle;
use super::{ALPHABET, MIN_WORD_LENGTH};
use std::collections::BTreeSet;
use std::sync::Arc;

/// What appending one letter to a prefix does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LetterOutcome {
    /// Prefix stays alive and is not a completable word
    Safe,
    /// Forms a word of qualifying length that longer words still extend
    CompletesContinuable,
    /// Forms a word of qualifying length with no longer completion
    CompletesTerminal,
    /// No word starts with the result
    DeadEnd,
}

impl LetterOutcome {
    /// Loses immediately for the player who plays it
    pub fn is_losing(&self) -> bool {
        matches!(self, LetterOutcome::CompletesTerminal | LetterOutcome::DeadEnd)
    }
}

/// Letters available from a position, split by risk
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LegalMoves {
    /// Letters that keep the prefix alive without forming a word
    pub primary: BTreeSet<char>,
    /// Letters that form a word longer words still extend
    pub completing: BTreeSet<char>,
}

impl LegalMoves {
    /// The playable set: primary, or completing when primary is empty.
    pub fn playable(&self) -> &BTreeSet<char> {
        if self.primary.is_empty() {
            &self.completing
        } else {
            &self.primary
        }
    }

    /// True when nothing at all can be played without losing.
    pub fn is_stuck(&self) -> bool {
        self.primary.is_empty() && self.completing.is_empty()
    }

    /// True when every playable letter forms a word.
    pub fn is_forced_completion(&self) -> bool {
        self.primary.is_empty() && !self.completing.is_empty()
    }
}

/// Computes legal letters against a shared dictionary.
#[derive(Debug, Clone)]
pub struct LegalMoveEngine {
    oracle: Arc<WordOracle>,
}

impl LegalMoveEngine {
    pub fn new(oracle: Arc<WordOracle>) -> Self {
        Self { oracle }
    }

    /// The dictionary this engine consults
    pub fn oracle(&self) -> &WordOracle {
        &self.oracle
    }

    /// Classify appending `letter` to `prefix`.
    pub fn classify(&self, prefix: &str, letter: char) -> LetterOutcome {
        let mut candidate = String::with_capacity(prefix.len() + 1);
        candidate.push_str(prefix);
        candidate.push(letter.to_ascii_uppercase());
        self.classify_word(&candidate)
    }

    /// Classify a prefix that has just been formed.
    pub fn classify_word(&self, candidate: &str) -> LetterOutcome {
        let completions = self.oracle.completions_of(candidate);
        if completions.is_empty() {
            return LetterOutcome::DeadEnd;
        }

        let is_word = candidate.len() >= MIN_WORD_LENGTH
            && completions
                .first()
                .is_some_and(|w| w.eq_ignore_ascii_case(candidate));
        if !is_word {
            return LetterOutcome::Safe;
        }

        if completions.iter().any(|w| w.len() > candidate.len()) {
            LetterOutcome::CompletesContinuable
        } else {
            LetterOutcome::CompletesTerminal
        }
    }

    /// Outcome of every letter, in alphabet order.
    pub fn outcomes(&self, prefix: &str) -> [(char, LetterOutcome); 26] {
        ALPHABET.map(|c| (c, self.classify(prefix, c)))
    }

    /// Both legal sets for a prefix.
    pub fn moves(&self, prefix: &str) -> LegalMoves {
        let mut moves = LegalMoves::default();
        for (letter, outcome) in self.outcomes(prefix) {
            match outcome {
                LetterOutcome::Safe => {
                    moves.primary.insert(letter);
                }
                LetterOutcome::CompletesContinuable => {
                    moves.completing.insert(letter);
                }
                LetterOutcome::CompletesTerminal | LetterOutcome::DeadEnd => {}
            }
        }
        moves
    }

    /// Letters that do not lose immediately. Falls back to word-completing
    /// letters when nothing safer exists; empty means no legal letter.
    pub fn legal_letters(&self, prefix: &str) -> BTreeSet<char> {
        self.moves(prefix).playable().clone()
    }

    /// Letters that keep the prefix alive and avoid forming any word.
    pub fn safe_count(&self, prefix: &str) -> usize {
        self.outcomes(prefix)
            .iter()
            .filter(|(_, o)| *o == LetterOutcome::Safe)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(words: &[&str]) -> LegalMoveEngine {
        LegalMoveEngine::new(Arc::new(WordOracle::from_words(words)))
    }

    #[test]
    fn test_classify_buckets() {
        let engine = engine(&["cat", "cats", "catalog", "cattle", "zoom"]);
        assert_eq!(engine.classify("CA", 'T'), LetterOutcome::Safe);
        assert_eq!(engine.classify("CAT", 'S'), LetterOutcome::CompletesTerminal);
        assert_eq!(engine.classify("CAT", 'A'), LetterOutcome::Safe);
        assert_eq!(engine.classify("CAT", 'Q'), LetterOutcome::DeadEnd);
        assert_eq!(engine.classify("ZOO", 'M'), LetterOutcome::CompletesTerminal);
    }

    #[test]
    fn test_three_letter_words_are_safe() {
        let engine = engine(&["cat", "cattle"]);
        // CAT is a word but too short to count
        assert_eq!(engine.classify("CA", 'T'), LetterOutcome::Safe);
    }

    #[test]
    fn test_continuable_completion() {
        let engine = engine(&["dogma", "dogmas", "dogmatic"]);
        assert_eq!(engine.classify("DOGM", 'A'), LetterOutcome::CompletesContinuable);
        let moves = engine.moves("DOGM");
        assert!(moves.primary.is_empty());
        assert!(moves.completing.contains(&'A'));
        assert!(moves.is_forced_completion());
        assert_eq!(engine.legal_letters("DOGM").into_iter().collect::<Vec<_>>(), vec!['A']);
    }

    #[test]
    fn test_primary_preferred_over_completing() {
        let engine = engine(&["bark", "barks", "barn", "barns", "baron"]);
        let moves = engine.moves("BAR");
        assert!(moves.primary.contains(&'O'));
        assert!(moves.completing.contains(&'K'));
        assert!(moves.completing.contains(&'N'));
        let legal = engine.legal_letters("BAR");
        assert_eq!(legal.into_iter().collect::<Vec<_>>(), vec!['O']);
    }

    #[test]
    fn test_terminal_words_excluded() {
        let engine = engine(&["cat", "cats", "catalog"]);
        let legal = engine.legal_letters("CAT");
        assert!(legal.contains(&'A'));
        assert!(!legal.contains(&'S'));
    }

    #[test]
    fn test_dead_prefix_has_no_legal_letters() {
        let engine = engine(&["cat", "cats", "dog"]);
        assert!(engine.legal_letters("SJ").is_empty());
        assert!(engine.moves("SJ").is_stuck());
    }

    #[test]
    fn test_empty_prefix_letters() {
        let engine = engine(&["cat", "dog", "zoom"]);
        let legal: Vec<char> = engine.legal_letters("").into_iter().collect();
        assert_eq!(legal, vec!['C', 'D', 'Z']);
    }

    #[test]
    fn test_legal_letters_are_sound() {
        let engine = LegalMoveEngine::new(WordOracle::embedded());
        for prefix in ["", "C", "CA", "GHO", "STR", "QU", "XY"] {
            for letter in engine.legal_letters(prefix) {
                let candidate = format!("{}{}", prefix, letter);
                let outcome = engine.classify_word(&candidate);
                assert!(
                    matches!(outcome, LetterOutcome::Safe | LetterOutcome::CompletesContinuable),
                    "{} -> {:?}",
                    candidate,
                    outcome
                );
                assert!(engine.oracle().has_any_completion(&candidate));
            }
        }
    }

    #[test]
    fn test_safe_count() {
        let engine = engine(&["bark", "barn", "baron", "bare", "barely"]);
        // O leads to BARON; E and N and K form words
        assert_eq!(engine.safe_count("BAR"), 1);
    }
}
