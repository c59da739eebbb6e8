//! Round and match control
//!
//! The controller is the only thing that mutates a match. Every operation
//! names the acting seat and is rejected, leaving state untouched, when it
//! is not that seat's turn or the round is not in the right phase.
//!
//! Round lifecycle: `Playing -> Challenge -> RoundOver`, or
//! `Playing -> RoundOver` via a called word or a timeout. A match ends when
//! one seat has won [`ROUNDS_TO_WIN`] rounds.

use super::remote::WordJudge;
use super::validation::{ChallengeResolver, ChallengeResult};
use super::{normalize_word, random_starting_letter, word_points, Difficulty, MIN_WORD_LENGTH};
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fmt;
use std::sync::Arc;

/// Rounds a player must win to take the match
pub const ROUNDS_TO_WIN: u32 = 2;

/// Shortest word that may be challenged
pub const MIN_CHALLENGE_LENGTH: usize = 3;

/// One of the two players in a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Seat {
    First,
    Second,
}

impl Seat {
    pub fn other(self) -> Seat {
        match self {
            Seat::First => Seat::Second,
            Seat::Second => Seat::First,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Seat::First => 0,
            Seat::Second => 1,
        }
    }
}

/// Who is playing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameMode {
    /// Human in the first seat against the AI in the second
    VsAi(Difficulty),
    /// Two people sharing a keyboard
    LocalTwoPlayer,
}

/// Why a round was lost
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LossReason {
    /// Called a word that is not real
    Invalid,
    /// Formed a real word and got called on it
    CalledWord,
    /// Challenged and could not name a real extension
    ChallengeSuccess,
    /// Challenged a prefix that had a real extension
    ChallengeFailed,
    /// Ran out of time
    Timeout,
}

impl LossReason {
    pub fn label(&self) -> &'static str {
        match self {
            LossReason::Invalid => "invalid",
            LossReason::CalledWord => "called_word",
            LossReason::ChallengeSuccess => "challenge_success",
            LossReason::ChallengeFailed => "challenge_failed",
            LossReason::Timeout => "timeout",
        }
    }
}

/// A letter played by a seat
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    pub letter: char,
    pub player: Seat,
}

/// Everything that happened in one round
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundRecord {
    pub round_number: u32,
    /// Word so far, starting with the seeded letter
    pub current_word: String,
    /// Letters played by the seats (the seed letter is not a move)
    pub move_history: Vec<Move>,
    pub challenger: Option<Seat>,
    pub loser: Option<Seat>,
    pub reason: Option<LossReason>,
    /// Word named in answer to a challenge, if the round had one
    pub target_word: Option<String>,
}

impl RoundRecord {
    fn new(round_number: u32, starting_letter: char) -> Self {
        Self {
            round_number,
            current_word: starting_letter.to_ascii_uppercase().to_string(),
            move_history: Vec::new(),
            challenger: None,
            loser: None,
            reason: None,
            target_word: None,
        }
    }

    /// Round has a loser and can no longer change
    pub fn is_over(&self) -> bool {
        self.loser.is_some() && self.reason.is_some()
    }
}

/// Player score in a match
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerState {
    pub name: String,
    pub score: u32,
    pub rounds_won: u32,
}

impl PlayerState {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            score: 0,
            rounds_won: 0,
        }
    }
}

/// Where the active round stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Seats take turns adding letters
    Playing,
    /// The word is frozen; the challenged seat must name a word
    Challenge { challenger: Seat },
    /// Round decided, another one to come
    RoundOver,
    /// A seat reached the winning number of rounds
    MatchOver,
}

/// Complete state of a match
#[derive(Debug, Clone)]
pub struct MatchState {
    pub mode: GameMode,
    pub players: [PlayerState; 2],
    pub rounds: Vec<RoundRecord>,
    pub active_round: usize,
    /// Seat that must act next
    pub turn: Seat,
    pub phase: Phase,
    /// Letter that may not be played next (after a letter bomb)
    pub forbidden_letter: Option<char>,
}

impl MatchState {
    /// New match seeded with a uniformly random starting letter.
    pub fn new(mode: GameMode, rng: &mut StdRng) -> Self {
        Self::with_starting_letter(mode, random_starting_letter(rng))
    }

    /// New match whose first round starts with `letter`.
    pub fn with_starting_letter(mode: GameMode, letter: char) -> Self {
        let players = match mode {
            GameMode::VsAi(difficulty) => [
                PlayerState::new("You"),
                PlayerState::new(&format!("Ghost ({})", difficulty)),
            ],
            GameMode::LocalTwoPlayer => [PlayerState::new("Player 1"), PlayerState::new("Player 2")],
        };

        Self {
            mode,
            players,
            rounds: vec![RoundRecord::new(1, letter)],
            active_round: 0,
            turn: Seat::First,
            phase: Phase::Playing,
            forbidden_letter: None,
        }
    }

    /// The round being played (or just finished)
    pub fn current_round(&self) -> Result<&RoundRecord, RoundError> {
        self.rounds.get(self.active_round).ok_or(RoundError::NoActiveRound)
    }

    fn current_round_mut(&mut self) -> Result<&mut RoundRecord, RoundError> {
        self.rounds
            .get_mut(self.active_round)
            .ok_or(RoundError::NoActiveRound)
    }

    /// Current word of the active round
    pub fn current_word(&self) -> Result<&str, RoundError> {
        Ok(self.current_round()?.current_word.as_str())
    }

    pub fn player(&self, seat: Seat) -> &PlayerState {
        &self.players[seat.index()]
    }

    /// Seat that won the match, once it is over
    pub fn winner(&self) -> Option<Seat> {
        [Seat::First, Seat::Second]
            .into_iter()
            .find(|s| self.player(*s).rounds_won >= ROUNDS_TO_WIN)
    }

    pub fn is_over(&self) -> bool {
        self.phase == Phase::MatchOver
    }
}

/// Create a match with a random starting letter.
pub fn init_game(mode: GameMode) -> MatchState {
    MatchState::new(mode, &mut StdRng::from_os_rng())
}

/// Rejected operations. State is unchanged when one is returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundError {
    /// Wrong turn, wrong phase, or a forbidden letter
    InvalidMove(String),
    /// Word too short to call or challenge
    PreconditionFailed(String),
    /// Match state has no round at the active index
    NoActiveRound,
}

impl fmt::Display for RoundError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoundError::InvalidMove(reason) => write!(f, "invalid move: {}", reason),
            RoundError::PreconditionFailed(reason) => write!(f, "not allowed yet: {}", reason),
            RoundError::NoActiveRound => write!(f, "match has no active round"),
        }
    }
}

impl std::error::Error for RoundError {}

/// How a finished round came out
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundResult {
    pub loser: Seat,
    pub winner: Seat,
    pub reason: LossReason,
    /// Word the points were counted on
    pub word: String,
    /// Points awarded to the winner
    pub points: u32,
    pub match_over: bool,
}

/// Applies moves to a match.
pub struct RoundController {
    judge: Arc<dyn WordJudge>,
    resolver: ChallengeResolver,
    state: MatchState,
    rng: StdRng,
}

impl RoundController {
    pub fn new(judge: Arc<dyn WordJudge>, state: MatchState) -> Self {
        Self::with_rng(judge, state, StdRng::from_os_rng())
    }

    /// Controller whose later round seeds come from `rng`
    pub fn with_rng(judge: Arc<dyn WordJudge>, state: MatchState, rng: StdRng) -> Self {
        let resolver = ChallengeResolver::new(Arc::clone(&judge));
        Self {
            judge,
            resolver,
            state,
            rng,
        }
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    pub fn into_state(self) -> MatchState {
        self.state
    }

    fn expect_turn(&self, seat: Seat) -> Result<(), RoundError> {
        if self.state.turn != seat {
            return Err(RoundError::InvalidMove("not your turn".to_string()));
        }
        Ok(())
    }

    fn expect_playing(&self) -> Result<(), RoundError> {
        match self.state.phase {
            Phase::Playing => Ok(()),
            Phase::Challenge { .. } => {
                Err(RoundError::InvalidMove("a challenge is waiting for a word".to_string()))
            }
            Phase::RoundOver | Phase::MatchOver => {
                Err(RoundError::InvalidMove("round is over".to_string()))
            }
        }
    }

    fn expect_no_pending_bomb(&self) -> Result<(), RoundError> {
        if self.state.forbidden_letter.is_some() {
            return Err(RoundError::InvalidMove(
                "replace the removed letter first".to_string(),
            ));
        }
        Ok(())
    }

    /// Append a letter for `seat` and pass the turn.
    pub fn play_letter(&mut self, seat: Seat, letter: char) -> Result<(), RoundError> {
        self.expect_playing()?;
        self.expect_turn(seat)?;

        if !letter.is_ascii_alphabetic() {
            return Err(RoundError::InvalidMove(format!("'{}' is not a letter", letter)));
        }
        let letter = letter.to_ascii_uppercase();
        if self.state.forbidden_letter == Some(letter) {
            return Err(RoundError::InvalidMove(format!(
                "{} was just removed and can't be replayed",
                letter
            )));
        }

        let round = self.state.current_round_mut()?;
        round.current_word.push(letter);
        round.move_history.push(Move {
            letter,
            player: seat,
        });
        self.state.forbidden_letter = None;
        self.state.turn = seat.other();
        Ok(())
    }

    /// Letter bomb: remove the last letter; `seat` must then play a
    /// different one in its place.
    pub fn remove_last_letter(&mut self, seat: Seat) -> Result<char, RoundError> {
        self.expect_playing()?;
        self.expect_turn(seat)?;
        self.expect_no_pending_bomb()?;

        let round = self.state.current_round_mut()?;
        if round.move_history.is_empty() {
            return Err(RoundError::PreconditionFailed(
                "no played letter to remove".to_string(),
            ));
        }
        round.move_history.pop();
        let removed = round
            .current_word
            .pop()
            .ok_or(RoundError::NoActiveRound)?;
        self.state.forbidden_letter = Some(removed);
        Ok(removed)
    }

    /// `seat` claims the current word is a real word. If it is, the seat
    /// that played its last letter loses; otherwise the caller does.
    pub fn call_word(&mut self, seat: Seat) -> Result<RoundResult, RoundError> {
        self.expect_playing()?;
        self.expect_turn(seat)?;
        self.expect_no_pending_bomb()?;

        let word = self.state.current_word()?.to_string();
        if word.len() < MIN_WORD_LENGTH {
            return Err(RoundError::PreconditionFailed(format!(
                "words need {}+ letters to be called",
                MIN_WORD_LENGTH
            )));
        }

        if self.judge.is_valid_word(&word) {
            let formed_by = self
                .state
                .current_round()?
                .move_history
                .last()
                .map_or(seat.other(), |mv| mv.player);
            self.finish_round(formed_by, LossReason::CalledWord, None)
        } else {
            self.finish_round(seat, LossReason::Invalid, None)
        }
    }

    /// `seat` claims no word starts with the current prefix. The word is
    /// frozen and the other seat must answer with a real word.
    pub fn initiate_challenge(&mut self, seat: Seat) -> Result<(), RoundError> {
        self.expect_playing()?;
        self.expect_turn(seat)?;
        self.expect_no_pending_bomb()?;

        let len = self.state.current_word()?.len();
        if len < MIN_CHALLENGE_LENGTH {
            return Err(RoundError::PreconditionFailed(format!(
                "challenges need {}+ letters",
                MIN_CHALLENGE_LENGTH
            )));
        }

        self.state.current_round_mut()?.challenger = Some(seat);
        self.state.phase = Phase::Challenge { challenger: seat };
        self.state.turn = seat.other();
        info!("seat {:?} challenged", seat);
        Ok(())
    }

    /// The challenged seat names its word.
    pub fn submit_challenge_word(
        &mut self,
        seat: Seat,
        word: &str,
    ) -> Result<(RoundResult, ChallengeResult), RoundError> {
        let challenger = match self.state.phase {
            Phase::Challenge { challenger } => challenger,
            _ => return Err(RoundError::InvalidMove("no challenge to answer".to_string())),
        };
        self.expect_turn(seat)?;

        let prefix = self.state.current_word()?.to_string();
        let claimed = normalize_word(word).unwrap_or_else(|| word.trim().to_ascii_uppercase());
        let challenge = self.resolver.resolve_challenge(&prefix, &claimed);

        let result = if challenge.success {
            self.finish_round(seat, LossReason::ChallengeSuccess, Some(claimed))?
        } else {
            self.finish_round(challenger, LossReason::ChallengeFailed, Some(claimed))?
        };
        Ok((result, challenge))
    }

    /// The seat to act ran out of time.
    pub fn timeout(&mut self) -> Result<RoundResult, RoundError> {
        match self.state.phase {
            Phase::Playing | Phase::Challenge { .. } => {}
            _ => return Err(RoundError::InvalidMove("round is over".to_string())),
        }
        self.finish_round(self.state.turn, LossReason::Timeout, None)
    }

    fn finish_round(
        &mut self,
        loser: Seat,
        reason: LossReason,
        claimed: Option<String>,
    ) -> Result<RoundResult, RoundError> {
        let winner = loser.other();

        // A proven word is worth its own letters; otherwise count what was built.
        let scored_word = match &claimed {
            Some(word) if reason == LossReason::ChallengeFailed => word.clone(),
            _ => self.state.current_word()?.to_string(),
        };
        let points = word_points(&scored_word);

        let round = self.state.current_round_mut()?;
        round.loser = Some(loser);
        round.reason = Some(reason);
        round.target_word = claimed;
        let round_number = round.round_number;

        let player = &mut self.state.players[winner.index()];
        player.score += points;
        player.rounds_won += 1;
        let match_over = player.rounds_won >= ROUNDS_TO_WIN;

        self.state.phase = if match_over {
            Phase::MatchOver
        } else {
            Phase::RoundOver
        };
        self.state.turn = loser;
        self.state.forbidden_letter = None;

        info!(
            "round {} over: {:?} lost ({}), {} +{} points",
            round_number,
            loser,
            reason.label(),
            scored_word,
            points
        );
        if match_over {
            info!("match over: {:?} wins", winner);
        }

        Ok(RoundResult {
            loser,
            winner,
            reason,
            word: scored_word,
            points,
            match_over,
        })
    }

    /// Start the next round with a fresh random letter. The previous
    /// round's loser moves first.
    pub fn start_next_round(&mut self) -> Result<(), RoundError> {
        let letter = random_starting_letter(&mut self.rng);
        self.start_next_round_with(letter)
    }

    /// Start the next round with a chosen starting letter.
    pub fn start_next_round_with(&mut self, letter: char) -> Result<(), RoundError> {
        match self.state.phase {
            Phase::RoundOver => {}
            Phase::MatchOver => return Err(RoundError::InvalidMove("match is over".to_string())),
            _ => return Err(RoundError::InvalidMove("round still in play".to_string())),
        }
        if !letter.is_ascii_alphabetic() {
            return Err(RoundError::InvalidMove(format!("'{}' is not a letter", letter)));
        }

        let loser = self
            .state
            .current_round()?
            .loser
            .ok_or(RoundError::NoActiveRound)?;
        let number = self.state.rounds.len() as u32 + 1;
        self.state.rounds.push(RoundRecord::new(number, letter));
        self.state.active_round = self.state.rounds.len() - 1;
        self.state.turn = loser;
        self.state.phase = Phase::Playing;
        info!("round {} starts with {}", number, letter.to_ascii_uppercase());
        Ok(())
    }
}
