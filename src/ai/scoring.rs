//! Heuristic letter scoring
//!
//! A letter's score is the plain sum of independent terms. Only the
//! ordering of scores matters; there is no fixed range.

use super::patterns;
use super::tuning::Weights;
use crate::game::rules::{LegalMoveEngine, LetterOutcome};
use crate::game::MIN_WORD_LENGTH;

/// Each heuristic term for one candidate letter
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Terms {
    pub trap: f64,
    pub completion_risk: f64,
    pub continuation: f64,
    pub balance: f64,
    pub pattern: f64,
    pub forced: f64,
    pub diversity: f64,
}

impl Terms {
    pub fn total(&self) -> f64 {
        self.trap
            + self.completion_risk
            + self.continuation
            + self.balance
            + self.pattern
            + self.forced
            + self.diversity
    }
}

/// A scored candidate letter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LetterScore {
    pub letter: char,
    pub score: f64,
    /// Replies left for whoever moves next
    pub continuations: usize,
}

/// How the opponent's replies to a position break down
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ReplyProfile {
    pub safe: usize,
    pub continuable: usize,
    pub terminal: usize,
    /// Safe replies after which we would have nothing playable
    pub self_traps: usize,
}

impl ReplyProfile {
    /// Replies that lead somewhere (dead ends are not real options)
    pub fn live(&self) -> usize {
        self.safe + self.continuable + self.terminal
    }

    /// Share of live replies that lose or hand us a callable word
    pub fn bad_ratio(&self) -> f64 {
        let live = self.live();
        if live == 0 {
            return 0.0;
        }
        (self.terminal as f64 + 0.5 * self.continuable as f64) / live as f64
    }

    /// The opponent cannot avoid losing
    pub fn no_escape(&self) -> bool {
        self.safe == 0 && self.continuable == 0
    }
}

pub struct Scorer<'a> {
    engine: &'a LegalMoveEngine,
    weights: &'a Weights,
}

impl<'a> Scorer<'a> {
    pub fn new(engine: &'a LegalMoveEngine, weights: &'a Weights) -> Self {
        Self { engine, weights }
    }

    /// Score every letter in `letters` and sort best first.
    pub fn rank(&self, prefix: &str, letters: impl IntoIterator<Item = char>) -> Vec<LetterScore> {
        let mut scored: Vec<LetterScore> = letters
            .into_iter()
            .map(|letter| self.score_letter(prefix, letter))
            .collect();
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored
    }

    pub fn score_letter(&self, prefix: &str, letter: char) -> LetterScore {
        let candidate = format!("{}{}", prefix, letter);
        let terms = self.terms(prefix, letter);
        LetterScore {
            letter,
            score: terms.total(),
            continuations: self.continuations(&candidate),
        }
    }

    /// All terms for appending `letter` to `prefix`.
    pub fn terms(&self, prefix: &str, letter: char) -> Terms {
        let candidate = format!("{}{}", prefix, letter);
        Terms {
            trap: self.trap_potential(&candidate),
            ..self.static_terms(prefix, letter, &candidate)
        }
    }

    /// Everything except the two-ply trap term. Cheap enough to call
    /// at every node of a lookahead.
    pub fn quick_score(&self, prefix: &str, letter: char) -> f64 {
        let candidate = format!("{}{}", prefix, letter);
        self.static_terms(prefix, letter, &candidate).total()
    }

    fn static_terms(&self, prefix: &str, letter: char, candidate: &str) -> Terms {
        Terms {
            trap: 0.0,
            completion_risk: self.completion_risk(candidate),
            continuation: self.continuation(candidate),
            balance: self.balance(candidate),
            pattern: self.pattern(candidate),
            forced: self.forced(prefix, letter),
            diversity: self.diversity(candidate),
        }
    }

    /// Break down the opponent's replies to `candidate`, looking one more
    /// ply ahead for replies that would leave us stuck.
    pub fn reply_profile(&self, candidate: &str) -> ReplyProfile {
        let mut profile = ReplyProfile::default();
        for (reply, outcome) in self.engine.outcomes(candidate) {
            match outcome {
                LetterOutcome::Safe => {
                    profile.safe += 1;
                    let next = format!("{}{}", candidate, reply);
                    if self.engine.moves(&next).is_stuck() {
                        profile.self_traps += 1;
                    }
                }
                LetterOutcome::CompletesContinuable => profile.continuable += 1,
                LetterOutcome::CompletesTerminal => profile.terminal += 1,
                LetterOutcome::DeadEnd => {}
            }
        }
        profile
    }

    /// Reward funnelling the opponent into bad replies; penalise handing
    /// them a reply that traps us.
    pub fn trap_potential(&self, candidate: &str) -> f64 {
        let profile = self.reply_profile(candidate);
        if profile.live() == 0 {
            return 0.0;
        }

        let mut score = self.weights.trap * profile.bad_ratio();
        if profile.no_escape() {
            score += self.weights.trap_no_escape;
        }
        if profile.safe > 0 {
            score += self.weights.self_trap * profile.self_traps as f64 / profile.safe as f64;
        }
        score
    }

    /// Penalise forming callable words and positions where most words end
    /// next letter; reward many, long completions.
    pub fn completion_risk(&self, candidate: &str) -> f64 {
        let mut score = match self.engine.classify_word(candidate) {
            LetterOutcome::CompletesTerminal => self.weights.terminal_word,
            LetterOutcome::CompletesContinuable => self.weights.callable_word,
            LetterOutcome::Safe | LetterOutcome::DeadEnd => 0.0,
        };

        let n = candidate.len();
        let longer: Vec<usize> = self
            .engine
            .oracle()
            .completions_of(candidate)
            .iter()
            .map(|w| w.len())
            .filter(|len| *len > n)
            .collect();
        if longer.is_empty() {
            return score;
        }

        let total = longer.len() as f64;
        let one_longer = longer
            .iter()
            .filter(|len| **len == n + 1 && **len >= MIN_WORD_LENGTH)
            .count() as f64;
        let avg_extra = longer.iter().map(|len| (len - n) as f64).sum::<f64>() / total;

        score += self.weights.one_letter_share * (one_longer / total);
        score += self.weights.breadth * (total.min(50.0) / 50.0);
        score += self.weights.depth * avg_extra.min(6.0);
        score
    }

    /// Replies available to the next player after `candidate`.
    pub fn continuations(&self, candidate: &str) -> usize {
        let moves = self.engine.moves(candidate);
        moves.primary.len() + moves.completing.len()
    }

    pub fn continuation(&self, candidate: &str) -> f64 {
        self.weights.continuation * (1.0 + self.continuations(candidate) as f64).ln()
    }

    /// Keep the vowel ratio in a natural band once there is enough word to judge.
    pub fn balance(&self, candidate: &str) -> f64 {
        if candidate.len() < 3 {
            return 0.0;
        }
        let ratio = patterns::vowel_ratio(candidate);
        if (0.3..=0.5).contains(&ratio) {
            self.weights.balance_good
        } else if !(0.2..=0.7).contains(&ratio) {
            self.weights.balance_bad
        } else {
            0.0
        }
    }

    pub fn pattern(&self, candidate: &str) -> f64 {
        let mut score = 0.0;
        if patterns::ends_with_common_bigram(candidate) {
            score += self.weights.common_bigram;
        }
        if patterns::ends_with_common_trigram(candidate) {
            score += self.weights.common_trigram;
        }
        if patterns::has_bad_run(candidate) {
            score += self.weights.bad_run;
        }
        score
    }

    /// Dominant term when the tail of `prefix` dictates what comes next.
    pub fn forced(&self, prefix: &str, letter: char) -> f64 {
        let w = self.weights.forced_pattern;
        let matches = if let Some(required) = patterns::required_letter(prefix) {
            letter == required
        } else if patterns::needs_vowel(prefix) {
            patterns::is_vowelish(letter)
        } else if patterns::needs_consonant(prefix) {
            !patterns::is_vowelish(letter)
        } else {
            return 0.0;
        };

        if matches {
            w
        } else {
            -w
        }
    }

    pub fn diversity(&self, candidate: &str) -> f64 {
        self.weights.diversity * self.engine.oracle().next_letters(candidate).len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::dictionary::WordOracle;
    use std::sync::Arc;

    fn engine(words: &[&str]) -> LegalMoveEngine {
        LegalMoveEngine::new(Arc::new(WordOracle::from_words(words)))
    }

    #[test]
    fn test_terminal_word_heavily_penalised() {
        let engine = engine(&["cats", "catalog", "catapult", "category"]);
        let weights = Weights::default();
        let scorer = Scorer::new(&engine, &weights);
        assert!(scorer.completion_risk("CATS") <= weights.terminal_word);
        assert!(scorer.completion_risk("CATA") > 0.0);
    }

    #[test]
    fn test_callable_word_penalised() {
        let engine = engine(&["barn", "barns", "baron", "barony"]);
        let weights = Weights::default();
        let scorer = Scorer::new(&engine, &weights);
        assert!(scorer.completion_risk("BARN") < scorer.completion_risk("BARO"));
    }

    #[test]
    fn test_one_letter_endings_penalised() {
        let weights = Weights::default();
        // Every word after TEN ends one letter later
        let short = engine(&["tent", "tend", "tens"]);
        let long = engine(&["tenant", "tender", "tennis"]);
        let short_risk = Scorer::new(&short, &weights).completion_risk("TEN");
        let long_risk = Scorer::new(&long, &weights).completion_risk("TEN");
        assert!(short_risk < 0.0);
        assert!(short_risk < long_risk);
    }

    #[test]
    fn test_reply_profile_counts() {
        // After ZOO the only reply forms ZOOM, which nothing extends
        let engine = engine(&["zoom", "zone"]);
        let weights = Weights::default();
        let scorer = Scorer::new(&engine, &weights);
        let profile = scorer.reply_profile("ZOO");
        assert_eq!(profile.terminal, 1);
        assert_eq!(profile.safe, 0);
        assert!(profile.no_escape());
        assert_eq!(profile.bad_ratio(), 1.0);
        assert!(scorer.trap_potential("ZOO") >= weights.trap_no_escape);
    }

    #[test]
    fn test_self_trap_penalised() {
        // After BA the opponent can play R, leaving us only BARN/BARK to form
        let engine = engine(&["bark", "barn", "bats", "batch", "batches"]);
        let weights = Weights::default();
        let scorer = Scorer::new(&engine, &weights);
        let profile = scorer.reply_profile("BA");
        assert_eq!(profile.safe, 2);
        assert_eq!(profile.self_traps, 1);
    }

    #[test]
    fn test_balance_band() {
        let engine = engine(&["cat"]);
        let weights = Weights::default();
        let scorer = Scorer::new(&engine, &weights);
        // 1/3 vowels sits inside the band
        assert_eq!(scorer.balance("CAT"), weights.balance_good);
        assert_eq!(scorer.balance("STRK"), weights.balance_bad);
        assert_eq!(scorer.balance("AEIB"), weights.balance_bad);
        assert_eq!(scorer.balance("ST"), 0.0);
    }

    #[test]
    fn test_pattern_rewards_clusters() {
        let engine = engine(&["the"]);
        let weights = Weights::default();
        let scorer = Scorer::new(&engine, &weights);
        assert!(scorer.pattern("STR") > 0.0);
        assert!(scorer.pattern("ABKD") < 0.0);
    }

    #[test]
    fn test_forced_term_dominates() {
        let engine = engine(&["queen", "quest"]);
        let weights = Weights::default();
        let scorer = Scorer::new(&engine, &weights);
        assert_eq!(scorer.forced("Q", 'U'), weights.forced_pattern);
        assert_eq!(scorer.forced("Q", 'A'), -weights.forced_pattern);
        assert_eq!(scorer.forced("STR", 'E'), weights.forced_pattern);
        assert_eq!(scorer.forced("STR", 'K'), -weights.forced_pattern);
        assert_eq!(scorer.forced("CA", 'T'), 0.0);
    }

    #[test]
    fn test_diversity_counts_branches() {
        let engine = engine(&["cab", "cad", "cat", "car"]);
        let weights = Weights::default();
        let scorer = Scorer::new(&engine, &weights);
        assert_eq!(scorer.diversity("CA"), 4.0 * weights.diversity);
        assert_eq!(scorer.diversity("CAT"), 0.0);
    }

    #[test]
    fn test_rank_sorted_best_first() {
        let engine = LegalMoveEngine::new(WordOracle::embedded());
        let weights = Weights::default();
        let scorer = Scorer::new(&engine, &weights);
        let ranked = scorer.rank("GH", engine.legal_letters("GH"));
        assert!(!ranked.is_empty());
        for pair in ranked.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }
}
