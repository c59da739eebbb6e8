//! Balancing knobs for the move selector
//!
//! The probabilities and weights were picked by playing, not derived. They
//! are gathered here so they can be tuned without touching the search.

/// Deepest lookahead allowed, in plies, counting the candidate move itself
pub const MAX_LOOKAHEAD_PLIES: usize = 3;

/// Weight of each heuristic term in a letter's score
#[derive(Debug, Clone, PartialEq)]
pub struct Weights {
    /// Scaled by the share of opponent replies that lose
    pub trap: f64,
    /// Opponent has no reply that avoids losing
    pub trap_no_escape: f64,
    /// Scaled by the share of opponent replies that leave us stuck (negative)
    pub self_trap: f64,
    /// Result is a word longer words still extend (negative)
    pub callable_word: f64,
    /// Result is a word nothing extends (negative)
    pub terminal_word: f64,
    /// Scaled by the share of completions only one letter longer (negative)
    pub one_letter_share: f64,
    /// Scaled by how many words remain, saturating at 50
    pub breadth: f64,
    /// Per letter of average remaining word length, capped at 6
    pub depth: f64,
    /// Scaled by ln(1 + replies left for the next player)
    pub continuation: f64,
    /// Vowel ratio inside 0.3..=0.5
    pub balance_good: f64,
    /// Vowel ratio under 0.2 or over 0.7 (negative)
    pub balance_bad: f64,
    pub common_bigram: f64,
    pub common_trigram: f64,
    /// Three consonants or vowels in a row that English doesn't use (negative)
    pub bad_run: f64,
    /// Matching (or, negated, missing) a structurally required vowel/consonant
    pub forced_pattern: f64,
    /// Per distinct next letter among completions
    pub diversity: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            trap: 12.0,
            trap_no_escape: 40.0,
            self_trap: -10.0,
            callable_word: -25.0,
            terminal_word: -100.0,
            one_letter_share: -15.0,
            breadth: 5.0,
            depth: 0.5,
            continuation: 2.0,
            balance_good: 3.0,
            balance_bad: -4.0,
            common_bigram: 2.0,
            common_trigram: 3.0,
            bad_run: -5.0,
            forced_pattern: 30.0,
            diversity: 0.4,
        }
    }
}

/// Selection policy parameters per difficulty
#[derive(Debug, Clone, PartialEq)]
pub struct Tuning {
    pub weights: Weights,
    /// Chance hard plays a forcing move when one exists
    pub hard_forcing_chance: f64,
    /// Chance superior plays a forcing move when one exists
    pub superior_forcing_chance: f64,
    /// Chance of bluffing a non-word instead of honestly completing one
    pub bluff_chance: f64,
    /// Chance easy notices a completed word it could call
    pub easy_call_chance: f64,
    /// Candidates easy picks from uniformly
    pub easy_window: usize,
    /// Positive-scoring candidates medium picks from
    pub medium_window: usize,
    pub medium_min_score: f64,
    /// Strong candidates hard picks from
    pub hard_window: usize,
    pub hard_min_score: f64,
    pub hard_min_continuations: usize,
    /// Candidates superior re-scores with lookahead
    pub superior_candidates: usize,
    /// Plies searched by superior, capped at [`MAX_LOOKAHEAD_PLIES`]
    pub lookahead_plies: usize,
    /// Replies expanded at each lookahead ply
    pub lookahead_beam: usize,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            weights: Weights::default(),
            hard_forcing_chance: 0.4,
            superior_forcing_chance: 0.7,
            bluff_chance: 0.4,
            easy_call_chance: 0.5,
            easy_window: 10,
            medium_window: 3,
            medium_min_score: 0.0,
            hard_window: 2,
            hard_min_score: 5.0,
            hard_min_continuations: 3,
            superior_candidates: 5,
            lookahead_plies: 3,
            lookahead_beam: 3,
        }
    }
}

impl Tuning {
    /// Lookahead depth with the hard cap applied
    pub fn plies(&self) -> usize {
        self.lookahead_plies.clamp(1, MAX_LOOKAHEAD_PLIES)
    }
}
