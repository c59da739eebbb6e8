//! Command-line configuration

use crate::game::Difficulty;
use clap::Parser;
use std::path::PathBuf;

/// Seconds a player has to act before losing the round on time
pub const DEFAULT_TURN_SECONDS: u32 = 30;

/// Ghost, the word game where nobody wants to finish a word
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// AI strength preselected in the menu (easy, medium, hard, superior)
    #[arg(short = 'd', long, default_value_t = Difficulty::Medium)]
    pub difficulty: Difficulty,

    /// Seed for the AI and starting letters, for replayable games
    #[arg(short = 's', long)]
    pub seed: Option<u64>,

    /// Newline-delimited word list to use instead of the built-in one
    #[arg(short = 'w', long = "words")]
    pub words_path: Option<PathBuf>,

    /// Write log output to this file instead of stderr
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Let the AI play the first letter of the match
    #[arg(long)]
    pub ai_first: bool,

    /// Turn clock in seconds; 0 turns it off
    #[arg(short = 't', long, default_value_t = DEFAULT_TURN_SECONDS)]
    pub turn_seconds: u32,
}

impl Cli {
    /// Options that shape each new match
    pub fn game_options(&self) -> GameOptions {
        GameOptions {
            seed: self.seed,
            ai_first: self.ai_first,
            turn_seconds: self.turn_seconds,
        }
    }
}

#[must_use]
pub fn parse_cli() -> Cli {
    Cli::parse()
}

/// Per-match settings taken from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameOptions {
    pub seed: Option<u64>,
    pub ai_first: bool,
    /// Zero disables the clock
    pub turn_seconds: u32,
}

impl Default for GameOptions {
    fn default() -> Self {
        Self {
            seed: None,
            ai_first: false,
            turn_seconds: DEFAULT_TURN_SECONDS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["ghost"]).unwrap();
        assert_eq!(cli.difficulty, Difficulty::Medium);
        assert_eq!(cli.seed, None);
        assert!(cli.words_path.is_none());
        assert!(!cli.ai_first);
        assert_eq!(cli.game_options(), GameOptions::default());
    }

    #[test]
    fn test_all_flags() {
        let cli = Cli::try_parse_from([
            "ghost",
            "--difficulty",
            "superior",
            "--seed",
            "7",
            "--words",
            "/tmp/words.txt",
            "--log-file",
            "/tmp/ghost.log",
            "--ai-first",
            "--turn-seconds",
            "0",
        ])
        .unwrap();
        assert_eq!(cli.difficulty, Difficulty::Superior);
        assert_eq!(cli.words_path, Some(PathBuf::from("/tmp/words.txt")));
        assert_eq!(cli.log_file, Some(PathBuf::from("/tmp/ghost.log")));
        assert_eq!(
            cli.game_options(),
            GameOptions {
                seed: Some(7),
                ai_first: true,
                turn_seconds: 0,
            }
        );
    }

    #[test]
    fn test_rejects_unknown_difficulty() {
        assert!(Cli::try_parse_from(["ghost", "-d", "impossible"]).is_err());
    }
}
