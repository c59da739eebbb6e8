//! Session state for one match in the terminal
//!
//! The `App` owns the round controller and, against the computer, the move
//! selector. Key handlers act for whichever seat is at the keyboard; the AI
//! takes its turn from `tick`, one step per tick.

use crate::ai::{AiMove, MoveSelector};
use crate::config::GameOptions;
use crate::game::dictionary::WordOracle;
use crate::game::remote::WordJudge;
use crate::game::round::{
    GameMode, LossReason, MatchState, Move, Phase, RoundController, RoundError, RoundResult, Seat,
};
use crate::game::validation::ChallengeResult;
use crate::game::Difficulty;
use log::{debug, error};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;

/// Seat the computer plays in
pub const AI_SEAT: Seat = Seat::Second;

/// How the feedback line should be coloured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tone {
    #[default]
    Neutral,
    Good,
    Bad,
}

/// Main application state
pub struct App {
    controller: RoundController,
    selector: Option<MoveSelector>,
    difficulty: Option<Difficulty>,
    /// Word typed while answering a challenge
    pub input: String,
    /// Message from the last action
    pub feedback: String,
    pub tone: Tone,
    /// Seconds left on the turn clock (`None` when the clock is off)
    pub time_remaining: Option<u32>,
    turn_seconds: u32,
    last_result: Option<RoundResult>,
}

impl App {
    /// Start a match on `oracle` in the given mode.
    pub fn new(oracle: Arc<WordOracle>, mode: GameMode, options: GameOptions) -> Self {
        let mut rng = match options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        let mut state = MatchState::new(mode, &mut rng);
        let (selector, difficulty) = match mode {
            GameMode::VsAi(difficulty) => {
                if options.ai_first {
                    state.turn = AI_SEAT;
                }
                let selector = match options.seed {
                    Some(seed) => MoveSelector::with_seed(Arc::clone(&oracle), seed),
                    None => MoveSelector::new(Arc::clone(&oracle)),
                };
                (Some(selector), Some(difficulty))
            }
            GameMode::LocalTwoPlayer => (None, None),
        };

        let judge: Arc<dyn WordJudge> = oracle;
        let mut app = Self {
            controller: RoundController::with_rng(judge, state, rng),
            selector,
            difficulty,
            input: String::new(),
            feedback: String::new(),
            tone: Tone::Neutral,
            time_remaining: None,
            turn_seconds: options.turn_seconds,
            last_result: None,
        };
        app.reset_clock();
        app.feedback = format!("{} to play", app.player_name(app.state().turn));
        app
    }

    pub fn state(&self) -> &MatchState {
        self.controller.state()
    }

    pub fn phase(&self) -> Phase {
        self.state().phase
    }

    /// Current word, or an empty string if the match has no round
    pub fn current_word(&self) -> &str {
        self.state().current_word().unwrap_or_default()
    }

    pub fn player_name(&self, seat: Seat) -> &str {
        &self.state().player(seat).name
    }

    /// Letters played this round, oldest first
    pub fn move_history(&self) -> &[Move] {
        self.state()
            .current_round()
            .map(|round| round.move_history.as_slice())
            .unwrap_or_default()
    }

    pub fn last_result(&self) -> Option<&RoundResult> {
        self.last_result.as_ref()
    }

    pub fn difficulty(&self) -> Option<Difficulty> {
        self.difficulty
    }

    fn is_ai(&self, seat: Seat) -> bool {
        self.selector.is_some() && seat == AI_SEAT
    }

    /// Whether the person at the keyboard is the one to act
    pub fn is_human_turn(&self) -> bool {
        !self.is_ai(self.state().turn)
    }

    /// Keys act only for a person, and only while the round is live
    fn accepts_keys(&self) -> bool {
        self.is_human_turn() && !self.is_round_over()
    }

    /// The person at the keyboard is answering a challenge
    pub fn is_defending(&self) -> bool {
        matches!(self.phase(), Phase::Challenge { .. }) && self.is_human_turn()
    }

    pub fn is_round_over(&self) -> bool {
        matches!(self.phase(), Phase::RoundOver | Phase::MatchOver)
    }

    fn say(&mut self, tone: Tone, message: impl Into<String>) {
        self.tone = tone;
        self.feedback = message.into();
    }

    fn reset_clock(&mut self) {
        self.time_remaining = (self.turn_seconds > 0).then_some(self.turn_seconds);
    }

    /// Report a rejected action. A missing round means the match is corrupt.
    fn reject(&mut self, err: RoundError) {
        if err == RoundError::NoActiveRound {
            error!("{}", err);
        }
        self.say(Tone::Bad, err.to_string());
    }

    /// Letter key: play it, or type it into a challenge answer.
    pub fn on_char(&mut self, c: char) {
        if !c.is_ascii_alphabetic() || !self.accepts_keys() {
            return;
        }
        if self.is_defending() {
            self.input.push(c.to_ascii_uppercase());
            return;
        }

        let seat = self.state().turn;
        match self.controller.play_letter(seat, c) {
            Ok(()) => {
                self.reset_clock();
                let next = self.player_name(self.state().turn).to_string();
                self.say(Tone::Neutral, format!("{} to play", next));
            }
            Err(err) => self.reject(err),
        }
    }

    /// Backspace: edit a challenge answer, otherwise letter bomb.
    pub fn on_backspace(&mut self) {
        if !self.accepts_keys() {
            return;
        }
        if self.is_defending() {
            self.input.pop();
            return;
        }

        let seat = self.state().turn;
        match self.controller.remove_last_letter(seat) {
            Ok(removed) => self.say(
                Tone::Neutral,
                format!("Removed {}. Play a different letter", removed),
            ),
            Err(err) => self.reject(err),
        }
    }

    /// Tab: claim the current word is a real word.
    pub fn on_call_word(&mut self) {
        if !self.accepts_keys() {
            return;
        }
        let seat = self.state().turn;
        match self.controller.call_word(seat) {
            Ok(result) => self.round_finished(result, None),
            Err(err) => self.reject(err),
        }
    }

    /// `?`: claim no word starts with the current prefix.
    pub fn on_challenge(&mut self) {
        if !self.accepts_keys() {
            return;
        }
        let seat = self.state().turn;
        match self.controller.initiate_challenge(seat) {
            Ok(()) => {
                self.reset_clock();
                let defender = self.player_name(seat.other()).to_string();
                self.say(
                    Tone::Neutral,
                    format!("{} must name a word starting with {}", defender, self.current_word()),
                );
            }
            Err(err) => self.reject(err),
        }
    }

    /// Enter: submit a challenge answer, or start the next round.
    pub fn on_submit(&mut self) {
        match self.phase() {
            Phase::Challenge { .. } if self.is_human_turn() => {
                if self.input.is_empty() {
                    return;
                }
                let word = std::mem::take(&mut self.input);
                let seat = self.state().turn;
                match self.controller.submit_challenge_word(seat, &word) {
                    Ok((result, challenge)) => self.round_finished(result, Some(challenge)),
                    Err(err) => self.reject(err),
                }
            }
            Phase::RoundOver => self.next_round(),
            _ => {}
        }
    }

    fn next_round(&mut self) {
        match self.controller.start_next_round() {
            Ok(()) => {
                self.last_result = None;
                self.input.clear();
                self.reset_clock();
                let first = self.player_name(self.state().turn).to_string();
                self.say(Tone::Neutral, format!("New round. {} to play", first));
            }
            Err(err) => self.reject(err),
        }
    }

    /// One clock step: run down the turn clock, then let the AI act.
    pub fn tick(&mut self) {
        if self.is_round_over() {
            return;
        }

        if let Some(remaining) = self.time_remaining.as_mut() {
            *remaining = remaining.saturating_sub(1);
            if *remaining == 0 {
                match self.controller.timeout() {
                    Ok(result) => self.round_finished(result, None),
                    Err(err) => self.reject(err),
                }
                return;
            }
        }

        if !self.is_human_turn() {
            self.ai_turn();
        }
    }

    /// Let the AI act once if it is its turn.
    pub fn ai_turn(&mut self) {
        let (Some(selector), Some(difficulty)) = (self.selector.as_ref(), self.difficulty) else {
            return;
        };
        if self.state().turn != AI_SEAT {
            return;
        }

        let prefix = self.current_word().to_string();
        let outcome = match self.phase() {
            Phase::Challenge { .. } => {
                let word = selector.defend_challenge(&prefix);
                self.controller
                    .submit_challenge_word(AI_SEAT, &word)
                    .map(|(result, challenge)| AiOutcome::Finished(result, Some(challenge)))
            }
            Phase::Playing if selector.should_call_word(&prefix, difficulty) => self
                .controller
                .call_word(AI_SEAT)
                .map(|result| AiOutcome::Finished(result, None)),
            Phase::Playing => match selector.select_ai_move(self.state(), difficulty) {
                Ok(AiMove::Challenge) => match self.controller.initiate_challenge(AI_SEAT) {
                    Ok(()) => Ok(AiOutcome::Challenged),
                    Err(RoundError::PreconditionFailed(reason)) => {
                        // Too early to challenge: keep playing, out of options
                        debug!("AI could not challenge {}: {}", prefix, reason);
                        let letter = selector.bluff_move(&prefix, difficulty);
                        self.controller
                            .play_letter(AI_SEAT, letter)
                            .map(|()| AiOutcome::Played(letter))
                    }
                    Err(err) => Err(err),
                },
                Ok(AiMove::Play(letter)) => self
                    .controller
                    .play_letter(AI_SEAT, letter)
                    .map(|()| AiOutcome::Played(letter)),
                Err(err) => Err(err),
            },
            Phase::RoundOver | Phase::MatchOver => return,
        };

        match outcome {
            Ok(AiOutcome::Played(letter)) => {
                self.reset_clock();
                self.say(Tone::Neutral, format!("Ghost plays {}. Your turn", letter));
            }
            Ok(AiOutcome::Challenged) => {
                self.reset_clock();
                self.say(
                    Tone::Bad,
                    format!(
                        "Ghost challenges! Type a word starting with {} and press Enter",
                        self.current_word()
                    ),
                );
            }
            Ok(AiOutcome::Finished(result, challenge)) => self.round_finished(result, challenge),
            Err(err) => self.reject(err),
        }
    }

    fn round_finished(&mut self, result: RoundResult, challenge: Option<ChallengeResult>) {
        self.input.clear();
        self.time_remaining = None;

        let mut message = self.describe(&result);
        if let Some(challenge) = challenge {
            message = format!("{} ({})", message, challenge.message());
        }

        // Good when a person at the keyboard won it against the computer
        let tone = if self.selector.is_none() || !self.is_ai(result.winner) {
            Tone::Good
        } else {
            Tone::Bad
        };
        self.say(tone, message);
        self.last_result = Some(result);
    }

    /// One-line account of how a round ended
    pub fn describe(&self, result: &RoundResult) -> String {
        let loser = self.player_name(result.loser);
        let winner = self.player_name(result.winner);
        let how = match result.reason {
            LossReason::CalledWord => format!("{} was caught on {}", loser, result.word),
            LossReason::Invalid => format!("{} called {}, which is not a word", loser, result.word),
            LossReason::ChallengeSuccess => {
                format!("{} could not back up the prefix with {}", loser, result.word)
            }
            LossReason::ChallengeFailed => {
                format!("{} challenged, but {} is a word", loser, result.word)
            }
            LossReason::Timeout => format!("{} ran out of time", loser),
        };
        format!("{}. {} +{}", how, winner, result.points)
    }
}

/// What the AI's step did
enum AiOutcome {
    Played(char),
    Challenged,
    Finished(RoundResult, Option<ChallengeResult>),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn oracle() -> Arc<WordOracle> {
        Arc::new(WordOracle::from_words([
            "cat", "cats", "catalog", "cattle", "ghost", "ghosts", "ghostly",
        ]))
    }

    fn options(seed: u64) -> GameOptions {
        GameOptions {
            seed: Some(seed),
            ai_first: false,
            turn_seconds: 0,
        }
    }

    /// Two-player app whose first round starts with C
    fn two_player() -> App {
        let mut app = App::new(oracle(), GameMode::LocalTwoPlayer, options(1));
        // Reset the opening letter to something with words behind it
        let state = MatchState::with_starting_letter(GameMode::LocalTwoPlayer, 'C');
        app.controller = RoundController::with_rng(oracle(), state, StdRng::seed_from_u64(1));
        app
    }

    #[test]
    fn test_letters_alternate_turns() {
        let mut app = two_player();
        assert_eq!(app.state().turn, Seat::First);
        app.on_char('a');
        assert_eq!(app.current_word(), "CA");
        assert_eq!(app.state().turn, Seat::Second);
        app.on_char('t');
        assert_eq!(app.current_word(), "CAT");
        assert_eq!(app.move_history().len(), 2);
    }

    #[test]
    fn test_call_word_ends_round() {
        let mut app = two_player();
        for c in "ATS".chars() {
            app.on_char(c);
        }
        // First seat formed CATS; second seat calls it
        app.on_call_word();
        assert!(app.is_round_over());
        let result = app.last_result().unwrap();
        assert_eq!(result.loser, Seat::First);
        assert_eq!(result.reason, LossReason::CalledWord);
        assert_eq!(app.tone, Tone::Good);
    }

    #[test]
    fn test_short_call_rejected() {
        let mut app = two_player();
        app.on_char('A');
        app.on_call_word();
        assert!(!app.is_round_over());
        assert_eq!(app.tone, Tone::Bad);
    }

    #[test]
    fn test_challenge_answered_from_keyboard() {
        let mut app = two_player();
        app.on_char('A');
        app.on_char('T');
        app.on_challenge();
        assert!(app.is_defending());
        for c in "cattle".chars() {
            app.on_char(c);
        }
        assert_eq!(app.input, "CATTLE");
        app.on_backspace();
        app.on_char('E');
        app.on_submit();

        let result = app.last_result().unwrap();
        assert_eq!(result.reason, LossReason::ChallengeFailed);
        assert_eq!(result.loser, Seat::First);
        assert!(app.input.is_empty());
    }

    #[test]
    fn test_letter_bomb_from_backspace() {
        let mut app = two_player();
        app.on_char('A');
        // Second seat removes the A and must replace it
        app.on_backspace();
        assert_eq!(app.current_word(), "C");
        assert_eq!(app.state().turn, Seat::Second);

        app.on_backspace();
        assert_eq!(app.tone, Tone::Bad);
        app.on_char('A');
        assert_eq!(app.current_word(), "C");
        assert_eq!(app.tone, Tone::Bad);

        app.on_char('O');
        assert_eq!(app.current_word(), "CO");
        assert_eq!(app.state().turn, Seat::First);
    }

    #[test]
    fn test_call_waits_for_bombed_letter_to_be_replaced() {
        let mut app = two_player();
        for c in "ATSU".chars() {
            app.on_char(c);
        }
        app.on_backspace();
        assert_eq!(app.current_word(), "CATS");

        app.on_call_word();
        assert_eq!(app.tone, Tone::Bad);
        assert!(!app.is_round_over());
        app.on_challenge();
        assert_eq!(app.phase(), Phase::Playing);
    }

    #[test]
    fn test_keys_ignored_after_round() {
        let mut app = two_player();
        for c in "ATS".chars() {
            app.on_char(c);
        }
        app.on_call_word();
        let message = app.feedback.clone();
        app.on_char('E');
        app.on_challenge();
        assert_eq!(app.current_word(), "CATS");
        assert_eq!(app.feedback, message);
    }

    #[test]
    fn test_enter_starts_next_round() {
        let mut app = two_player();
        for c in "ATS".chars() {
            app.on_char(c);
        }
        app.on_call_word();
        app.on_submit();
        assert_eq!(app.phase(), Phase::Playing);
        assert_eq!(app.state().rounds.len(), 2);
        // Loser opens the next round
        assert_eq!(app.state().turn, Seat::First);
        assert!(app.last_result().is_none());
    }

    #[test]
    fn test_clock_runs_out() {
        let mut app = two_player();
        app.turn_seconds = 2;
        app.reset_clock();
        app.tick();
        assert!(!app.is_round_over());
        app.tick();
        let result = app.last_result().unwrap();
        assert_eq!(result.reason, LossReason::Timeout);
        assert_eq!(result.loser, Seat::First);
    }

    #[test]
    fn test_ai_moves_on_tick() {
        let mode = GameMode::VsAi(Difficulty::Medium);
        let mut app = App::new(oracle(), mode, options(3));
        let state = MatchState::with_starting_letter(mode, 'G');
        app.controller = RoundController::with_rng(oracle(), state, StdRng::seed_from_u64(3));

        app.on_char('H');
        assert_eq!(app.state().turn, AI_SEAT);
        // Keys are ignored while the AI is to move
        app.on_char('X');
        assert_eq!(app.current_word(), "GH");

        app.tick();
        assert_eq!(app.current_word(), "GHO");
        assert_eq!(app.state().turn, Seat::First);
    }

    #[test]
    fn test_ai_calls_formed_word() {
        let mode = GameMode::VsAi(Difficulty::Hard);
        let mut app = App::new(oracle(), mode, options(4));
        let state = MatchState::with_starting_letter(mode, 'C');
        app.controller = RoundController::with_rng(oracle(), state, StdRng::seed_from_u64(4));

        app.on_char('A');
        app.tick();
        assert_eq!(app.current_word(), "CAT");
        app.on_char('S');
        app.tick();

        let result = app.last_result().unwrap();
        assert_eq!(result.reason, LossReason::CalledWord);
        assert_eq!(result.winner, AI_SEAT);
        assert_eq!(app.tone, Tone::Bad);
    }

    #[test]
    fn test_ai_defends_challenge() {
        let mode = GameMode::VsAi(Difficulty::Medium);
        let mut app = App::new(oracle(), mode, options(5));
        let state = MatchState::with_starting_letter(mode, 'G');
        app.controller = RoundController::with_rng(oracle(), state, StdRng::seed_from_u64(5));

        app.on_char('H');
        app.tick();
        assert_eq!(app.current_word(), "GHO");
        app.on_challenge();
        app.tick();

        let result = app.last_result().unwrap();
        assert_eq!(result.reason, LossReason::ChallengeFailed);
        assert_eq!(result.word, "GHOST");
        assert_eq!(result.loser, Seat::First);
    }

    #[test]
    fn test_ai_first_option() {
        let opts = GameOptions {
            ai_first: true,
            ..options(6)
        };
        let app = App::new(WordOracle::embedded(), GameMode::VsAi(Difficulty::Easy), opts);
        assert_eq!(app.state().turn, AI_SEAT);
        assert!(!app.is_human_turn());
    }

    #[test]
    fn test_describe_result() {
        let app = two_player();
        let result = RoundResult {
            loser: Seat::First,
            winner: Seat::Second,
            reason: LossReason::CalledWord,
            word: "GHOST".to_string(),
            points: 9,
            match_over: false,
        };
        assert_eq!(app.describe(&result), "Player 1 was caught on GHOST. Player 2 +9");
    }
}
