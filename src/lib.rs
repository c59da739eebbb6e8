//! Ghost: a two-player word game engine with a computer opponent
//!
//! Players take turns adding a letter to a growing prefix. Whoever completes
//! a real word of four or more letters, or plays a prefix no word starts
//! with, loses the round.
//!
//! - [`game`]: dictionary, move legality, challenges, rounds and matches
//! - [`ai`]: the computer opponent
//! - [`app`] and [`tui`]: the terminal front end

pub mod ai;
pub mod app;
pub mod config;
pub mod game;
pub mod logging;
pub mod tui;

pub use ai::{AiMove, MoveSelector};
pub use game::dictionary::WordOracle;
pub use game::round::{init_game, GameMode, MatchState, RoundController, RoundError};
pub use game::rules::LegalMoveEngine;
pub use game::validation::ChallengeResolver;
pub use game::Difficulty;
