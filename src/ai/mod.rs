//! Computer opponent
//!
//! [`MoveSelector`] decides what the AI does with a prefix: challenge it,
//! or append a letter. Letters are ranked by [`scoring::Scorer`], then each
//! difficulty picks from the ranking in its own way. Randomness always goes
//! through an explicit `Rng`, so a seeded selector replays exactly.

pub mod patterns;
pub mod scoring;
pub mod search;
pub mod tuning;

use crate::game::dictionary::WordOracle;
use crate::game::round::{MatchState, RoundError};
use crate::game::rules::{LegalMoveEngine, LetterOutcome};
use crate::game::{frequency_weighted_letter, random_starting_letter, Difficulty, MIN_WORD_LENGTH};
use log::debug;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use scoring::{LetterScore, Scorer};
use search::{forcing_moves, Lookahead};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use tuning::Tuning;

/// Rare letters hard and superior bluff with
const OBSCURE_LETTERS: [char; 5] = ['X', 'Q', 'Z', 'J', 'K'];

/// Everyday letters easy and medium bluff with
const COMMON_LETTERS: [char; 10] = ['E', 'T', 'A', 'O', 'I', 'N', 'S', 'R', 'H', 'L'];

/// What the AI does on its turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiMove {
    /// Append this letter
    Play(char),
    /// Claim no word starts with the current prefix
    Challenge,
}

/// Chooses the AI's moves against a shared dictionary.
#[derive(Debug, Clone)]
pub struct MoveSelector {
    engine: LegalMoveEngine,
    tuning: Tuning,
    seed: Option<u64>,
}

impl MoveSelector {
    /// Selector drawing from OS randomness
    pub fn new(oracle: Arc<WordOracle>) -> Self {
        Self {
            engine: LegalMoveEngine::new(oracle),
            tuning: Tuning::default(),
            seed: None,
        }
    }

    /// Selector whose choices depend only on `seed` and the inputs of each call
    pub fn with_seed(oracle: Arc<WordOracle>, seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::new(oracle)
        }
    }

    pub fn with_tuning(mut self, tuning: Tuning) -> Self {
        self.tuning = tuning;
        self
    }

    pub fn engine(&self) -> &LegalMoveEngine {
        &self.engine
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Fresh generator for one decision. Seeded selectors mix the call's
    /// inputs into the seed so each position gets its own stream.
    fn rng_for(&self, prefix: &str, difficulty: Difficulty, salt: &str) -> StdRng {
        match self.seed {
            Some(seed) => {
                let mut hasher = DefaultHasher::new();
                prefix.hash(&mut hasher);
                difficulty.hash(&mut hasher);
                salt.hash(&mut hasher);
                StdRng::seed_from_u64(seed ^ hasher.finish())
            }
            None => StdRng::from_os_rng(),
        }
    }

    /// The AI's move for the active round of a match.
    pub fn select_ai_move(&self, state: &MatchState, difficulty: Difficulty) -> Result<AiMove, RoundError> {
        let prefix = state.current_word()?;
        Ok(self.select_move(prefix, difficulty))
    }

    pub fn select_move(&self, prefix: &str, difficulty: Difficulty) -> AiMove {
        let prefix = prefix.to_ascii_uppercase();
        let mut rng = self.rng_for(&prefix, difficulty, "move");
        self.select_move_with_rng(&prefix, difficulty, &mut rng)
    }

    /// Choose a move using `rng` for every random decision.
    pub fn select_move_with_rng<R: Rng>(&self, prefix: &str, difficulty: Difficulty, rng: &mut R) -> AiMove {
        let prefix = prefix.to_ascii_uppercase();
        if self.should_challenge(&prefix, difficulty) {
            debug!("{} challenges {}", difficulty, prefix);
            return AiMove::Challenge;
        }

        let moves = self.engine.moves(&prefix);
        let playable = moves.playable();
        if playable.is_empty() {
            let letter = self.bluff_move_with_rng(&prefix, difficulty, rng);
            debug!("{} has no legal letter after {}, bluffs {}", difficulty, prefix, letter);
            return AiMove::Play(letter);
        }

        let scorer = Scorer::new(&self.engine, &self.tuning.weights);
        let ranked = scorer.rank(&prefix, playable.iter().copied());
        let letter = match difficulty {
            Difficulty::Easy => self.pick_easy(&ranked, rng),
            Difficulty::Medium => self.pick_medium(&ranked, rng),
            Difficulty::Hard => self.pick_hard(&prefix, &ranked, rng),
            Difficulty::Superior => self.pick_superior(&prefix, &ranked, rng),
        };

        // Ranked is never empty here; the fallback keeps the AI total anyway
        let letter = letter.unwrap_or_else(|| random_starting_letter(rng));
        debug!("{} plays {} after {}", difficulty, letter, prefix);
        AiMove::Play(letter)
    }

    fn pick_easy<R: Rng>(&self, ranked: &[LetterScore], rng: &mut R) -> Option<char> {
        let window = self.tuning.easy_window.min(ranked.len());
        ranked[..window].choose(rng).map(|s| s.letter)
    }

    fn pick_medium<R: Rng>(&self, ranked: &[LetterScore], rng: &mut R) -> Option<char> {
        let decent: Vec<&LetterScore> = ranked
            .iter()
            .filter(|s| s.score > self.tuning.medium_min_score)
            .take(self.tuning.medium_window)
            .collect();
        match decent.choose(rng) {
            Some(s) => Some(s.letter),
            None => ranked.first().map(|s| s.letter),
        }
    }

    fn pick_hard<R: Rng>(&self, prefix: &str, ranked: &[LetterScore], rng: &mut R) -> Option<char> {
        if let Some(letter) = self.try_forcing(prefix, ranked, self.tuning.hard_forcing_chance, rng) {
            debug!("hard plays forcing move {} after {}", letter, prefix);
            return Some(letter);
        }

        let strong: Vec<&LetterScore> = ranked
            .iter()
            .filter(|s| {
                s.score > self.tuning.hard_min_score
                    && s.continuations > self.tuning.hard_min_continuations
            })
            .take(self.tuning.hard_window)
            .collect();
        if let Some(s) = strong.choose(rng) {
            return Some(s.letter);
        }

        let window = self.tuning.hard_window.min(ranked.len());
        ranked[..window].choose(rng).map(|s| s.letter)
    }

    fn pick_superior<R: Rng>(&self, prefix: &str, ranked: &[LetterScore], rng: &mut R) -> Option<char> {
        if let Some(letter) =
            self.try_forcing(prefix, ranked, self.tuning.superior_forcing_chance, rng)
        {
            debug!("superior plays forcing move {} after {}", letter, prefix);
            return Some(letter);
        }

        let top = &ranked[..self.tuning.superior_candidates.min(ranked.len())];
        let lookahead = Lookahead::new(&self.engine, &self.tuning);
        lookahead
            .rescore(prefix, top, self.tuning.plies())
            .first()
            .map(|s| s.letter)
    }

    /// Best-ranked forcing move, taken with probability `chance`.
    fn try_forcing<R: Rng>(&self, prefix: &str, ranked: &[LetterScore], chance: f64, rng: &mut R) -> Option<char> {
        let forcing = forcing_moves(&self.engine, prefix, ranked.iter().map(|s| s.letter));
        let best = ranked
            .iter()
            .map(|s| s.letter)
            .find(|l| forcing.contains(l))?;
        roll(rng, chance).then_some(best)
    }

    /// Whether to challenge the opponent on `prefix`.
    ///
    /// Only dead prefixes are challenged. Two-letter prefixes are challenged
    /// only when they are not a common English pair, and easy never
    /// challenges at all.
    pub fn should_challenge(&self, prefix: &str, difficulty: Difficulty) -> bool {
        if difficulty == Difficulty::Easy {
            return false;
        }
        let prefix = prefix.to_ascii_uppercase();
        if prefix.len() < 2 || self.engine.oracle().has_any_completion(&prefix) {
            return false;
        }
        if prefix.len() == 2 {
            return !patterns::is_common_bigram(&prefix);
        }
        true
    }

    /// Whether to call the word the opponent just formed. Easy only
    /// notices some of the time.
    pub fn should_call_word(&self, prefix: &str, difficulty: Difficulty) -> bool {
        let prefix = prefix.to_ascii_uppercase();
        if prefix.len() < MIN_WORD_LENGTH || !self.engine.oracle().is_valid_word(&prefix) {
            return false;
        }
        if difficulty == Difficulty::Easy {
            let mut rng = self.rng_for(&prefix, difficulty, "call");
            return roll(&mut rng, self.tuning.easy_call_chance);
        }
        true
    }

    /// Word to answer a challenge with: the shortest real extension, or a
    /// plausible-looking bluff when there is none.
    pub fn defend_challenge(&self, prefix: &str) -> String {
        let prefix = prefix.to_ascii_uppercase();
        if let Some(word) = self.engine.oracle().shortest_extension(&prefix) {
            return word.to_string();
        }

        let mut bluff = prefix;
        bluff.push('S');
        if bluff.len() < MIN_WORD_LENGTH {
            bluff.push_str("ING");
        }
        debug!("no real extension, defending with {}", bluff);
        bluff
    }

    /// Letter to play when nothing is legal.
    pub fn bluff_move(&self, prefix: &str, difficulty: Difficulty) -> char {
        let prefix = prefix.to_ascii_uppercase();
        let mut rng = self.rng_for(&prefix, difficulty, "bluff");
        self.bluff_move_with_rng(&prefix, difficulty, &mut rng)
    }

    /// Either honestly complete a word (risking a call) or play a letter
    /// that leads nowhere and hope it goes unchallenged.
    pub fn bluff_move_with_rng<R: Rng>(&self, prefix: &str, difficulty: Difficulty, rng: &mut R) -> char {
        let honest: Vec<char> = self
            .engine
            .outcomes(prefix)
            .iter()
            .filter(|(_, outcome)| *outcome == LetterOutcome::CompletesTerminal)
            .map(|(letter, _)| *letter)
            .collect();

        if !honest.is_empty() && !roll(rng, self.tuning.bluff_chance) {
            if let Some(letter) = honest.choose(rng) {
                return *letter;
            }
        }

        let pool: &[char] = match difficulty {
            Difficulty::Hard | Difficulty::Superior => &OBSCURE_LETTERS,
            Difficulty::Easy | Difficulty::Medium => &COMMON_LETTERS,
        };
        let plausible: Vec<char> = pool
            .iter()
            .copied()
            .filter(|c| !patterns::is_implausible(&format!("{}{}", prefix, c)))
            .collect();

        let bluff = match difficulty {
            Difficulty::Hard | Difficulty::Superior => plausible.choose(rng).copied(),
            Difficulty::Easy | Difficulty::Medium => frequency_weighted_letter(rng, &plausible),
        };

        bluff
            .or_else(|| honest.choose(rng).copied())
            .unwrap_or_else(|| random_starting_letter(rng))
    }
}

/// True with probability `p`. Out-of-range values behave as 0 or 1.
fn roll<R: Rng>(rng: &mut R, p: f64) -> bool {
    rng.random::<f64>() < p
}
