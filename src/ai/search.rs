//! Forcing-move detection and bounded lookahead
//!
//! Lookahead is a depth-limited search over a narrow beam: at each ply only
//! the best few letters by static score are expanded. Depth never exceeds
//! [`MAX_LOOKAHEAD_PLIES`](super::tuning::MAX_LOOKAHEAD_PLIES).

use super::scoring::{LetterScore, Scorer};
use super::tuning::{Tuning, Weights};
use crate::game::rules::{LegalMoveEngine, LegalMoves, LetterOutcome};

/// Value of a position the opponent cannot escape
const WIN: f64 = 1000.0;

/// Value of a position where we have nothing to play
const LOSS: f64 = -1000.0;

/// Letters after which every live opponent reply loses on the spot.
pub fn forcing_moves(
    engine: &LegalMoveEngine,
    prefix: &str,
    legal: impl IntoIterator<Item = char>,
) -> Vec<char> {
    legal
        .into_iter()
        .filter(|letter| {
            let candidate = format!("{}{}", prefix, letter);
            let outcomes = engine.outcomes(&candidate);
            let forced = outcomes.iter().all(|(_, o)| o.is_losing());
            let live = outcomes
                .iter()
                .any(|(_, o)| *o == LetterOutcome::CompletesTerminal);
            forced && live
        })
        .collect()
}

/// Every letter that does not lose on the spot, word-forming ones included.
fn non_losing(moves: &LegalMoves) -> impl Iterator<Item = char> + '_ {
    moves.primary.iter().chain(moves.completing.iter()).copied()
}

/// Re-scores candidates by searching ahead.
pub struct Lookahead<'a> {
    engine: &'a LegalMoveEngine,
    scorer: Scorer<'a>,
    weights: &'a Weights,
    beam: usize,
}

impl<'a> Lookahead<'a> {
    pub fn new(engine: &'a LegalMoveEngine, tuning: &'a Tuning) -> Self {
        Self {
            engine,
            scorer: Scorer::new(engine, &tuning.weights),
            weights: &tuning.weights,
            beam: tuning.lookahead_beam.max(1),
        }
    }

    /// Search `plies` deep (the candidate itself is the first ply) and
    /// return the candidates with their searched scores, best first.
    /// Ties keep their incoming order.
    pub fn rescore(&self, prefix: &str, candidates: &[LetterScore], plies: usize) -> Vec<LetterScore> {
        let mut rescored: Vec<LetterScore> = candidates
            .iter()
            .map(|c| {
                let candidate = format!("{}{}", prefix, c.letter);
                let searched = self.evaluate(&candidate, plies.saturating_sub(1));
                LetterScore {
                    score: c.score + searched,
                    ..*c
                }
            })
            .collect();
        rescored.sort_by(|a, b| b.score.total_cmp(&a.score));
        rescored
    }

    /// Value, to the player who just moved, of `position` with the
    /// opponent to reply and `plies` left to search.
    fn evaluate(&self, position: &str, plies: usize) -> f64 {
        let replies = self.engine.moves(position);
        if replies.is_stuck() {
            return WIN;
        }

        let base = self.weights.trap * self.scorer.reply_profile(position).bad_ratio();
        if plies == 0 {
            return base;
        }

        let worst = self
            .best_letters(position, non_losing(&replies))
            .into_iter()
            .map(|reply| {
                let next = format!("{}{}", position, reply);
                self.respond(&next, plies - 1)
            })
            .fold(f64::INFINITY, f64::min);

        0.5 * base + worst
    }

    /// Our best value at `position` where we must move.
    fn respond(&self, position: &str, plies: usize) -> f64 {
        let moves = self.engine.moves(position);
        if moves.is_stuck() {
            return LOSS;
        }
        if plies == 0 {
            return 0.0;
        }

        self.best_letters(position, non_losing(&moves))
            .into_iter()
            .map(|letter| {
                let static_score = self.scorer.quick_score(position, letter);
                let next = format!("{}{}", position, letter);
                static_score + self.evaluate(&next, plies - 1)
            })
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// The beam: best letters by static score.
    fn best_letters(&self, position: &str, letters: impl Iterator<Item = char>) -> Vec<char> {
        let mut scored: Vec<(char, f64)> = letters
            .map(|l| (l, self.scorer.quick_score(position, l)))
            .collect();
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored.into_iter().take(self.beam).map(|(l, _)| l).collect()
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
    fn test_forcing_move_found() {
        // ZO -> ZOO leaves only ZOOM; ZO -> ZON leaves ZONE or ZONES
        let engine = engine(&["zoom", "zone", "zones"]);
        let forcing = forcing_moves(&engine, "ZO", engine.legal_letters("ZO"));
        assert_eq!(forcing, vec!['O']);
    }

    #[test]
    fn test_no_forcing_move_when_replies_survive() {
        let engine = engine(&["cattle", "catalog", "cater"]);
        assert!(forcing_moves(&engine, "CA", engine.legal_letters("CA")).is_empty());
    }

    #[test]
    fn test_lookahead_prefers_trapping_line() {
        // After ZO: O forces ZOOM next; N lets the opponent continue into ZONES
        let engine = engine(&["zoom", "zone", "zones", "zoned", "zoning"]);
        let tuning = Tuning::default();
        let lookahead = Lookahead::new(&engine, &tuning);
        let candidates = [
            LetterScore { letter: 'N', score: 0.0, continuations: 2 },
            LetterScore { letter: 'O', score: 0.0, continuations: 1 },
        ];
        let rescored = lookahead.rescore("ZO", &candidates, 3);
        assert_eq!(rescored[0].letter, 'O');
    }

    #[test]
    fn test_lookahead_terminates_on_dead_positions() {
        let engine = engine(&["cat"]);
        let tuning = Tuning::default();
        let lookahead = Lookahead::new(&engine, &tuning);
        let candidates = [LetterScore { letter: 'Q', score: 1.0, continuations: 0 }];
        let rescored = lookahead.rescore("SJ", &candidates, 3);
        assert_eq!(rescored.len(), 1);
        assert!(rescored[0].score.is_finite());
    }
}
