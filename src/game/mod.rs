//! Game logic: letters, scoring, dictionary, move legality, challenges, rounds

pub mod dictionary;
pub mod remote;
pub mod round;
pub mod rules;
pub mod validation;

use rand::distr::weighted::WeightedIndex;
use rand::prelude::*;
use std::fmt;
use std::str::FromStr;

/// Minimum length at which a word counts: it can be called, and forming it loses.
pub const MIN_WORD_LENGTH: usize = 4;

/// The playable alphabet, in order.
pub const ALPHABET: [char; 26] = [
    'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R',
    'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z',
];

/// English letter frequencies (percentages * 100 for integer weights).
/// Based on standard English text frequency analysis.
const LETTER_WEIGHTS: [(char, u32); 26] = [
    ('A', 820),
    ('B', 150),
    ('C', 280),
    ('D', 430),
    ('E', 1270),
    ('F', 220),
    ('G', 200),
    ('H', 610),
    ('I', 700),
    ('J', 15),
    ('K', 80),
    ('L', 400),
    ('M', 240),
    ('N', 670),
    ('O', 750),
    ('P', 190),
    ('Q', 10),
    ('R', 600),
    ('S', 630),
    ('T', 910),
    ('U', 280),
    ('V', 100),
    ('W', 240),
    ('X', 15),
    ('Y', 200),
    ('Z', 7),
];

/// Point value per letter, used to total a round's word.
const LETTER_POINTS: [(char, u32); 26] = [
    ('A', 1),
    ('B', 3),
    ('C', 3),
    ('D', 2),
    ('E', 1),
    ('F', 4),
    ('G', 2),
    ('H', 4),
    ('I', 1),
    ('J', 8),
    ('K', 5),
    ('L', 1),
    ('M', 3),
    ('N', 1),
    ('O', 1),
    ('P', 3),
    ('Q', 10),
    ('R', 1),
    ('S', 1),
    ('T', 1),
    ('U', 1),
    ('V', 4),
    ('W', 4),
    ('X', 8),
    ('Y', 4),
    ('Z', 10),
];

const VOWELS: [char; 5] = ['A', 'E', 'I', 'O', 'U'];

/// Check whether a letter is one of A, E, I, O, U (case-insensitive).
pub fn is_vowel(c: char) -> bool {
    VOWELS.contains(&c.to_ascii_uppercase())
}

/// Point value of a single letter. Non-letters are worth nothing.
pub fn letter_points(c: char) -> u32 {
    let upper = c.to_ascii_uppercase();
    LETTER_POINTS
        .iter()
        .find(|(letter, _)| *letter == upper)
        .map(|(_, points)| *points)
        .unwrap_or(0)
}

/// Total point value of a word.
pub fn word_points(word: &str) -> u32 {
    word.chars().map(letter_points).sum()
}

/// Normalise user input into an uppercase word, or `None` if it holds
/// anything other than ASCII letters.
pub fn normalize_word(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    Some(trimmed.to_ascii_uppercase())
}

/// Pick the starting letter of a round, uniformly over A-Z.
///
/// The frequency table is not used here; every letter is an
/// equally likely opener.
pub fn random_starting_letter<R: Rng>(rng: &mut R) -> char {
    ALPHABET[rng.random_range(0..ALPHABET.len())]
}

/// Pick a letter weighted to English frequency.
pub fn frequency_weighted_letter<R: Rng>(rng: &mut R, pool: &[char]) -> Option<char> {
    let weights: Vec<u32> = pool
        .iter()
        .map(|c| {
            LETTER_WEIGHTS
                .iter()
                .find(|(letter, _)| letter == c)
                .map(|(_, w)| *w)
                .unwrap_or(0)
        })
        .collect();
    let dist = WeightedIndex::new(&weights).ok()?;
    Some(pool[dist.sample(rng)])
}

/// AI strength. Only changes which strategy the move selector runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
    Superior,
}

impl Difficulty {
    /// Get all difficulties in order
    pub fn all() -> &'static [Difficulty] {
        &[
            Difficulty::Easy,
            Difficulty::Medium,
            Difficulty::Hard,
            Difficulty::Superior,
        ]
    }

    /// Get the display label for this difficulty
    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
            Difficulty::Superior => "Superior",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label().to_lowercase())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            "superior" => Ok(Difficulty::Superior),
            other => Err(format!(
                "unknown difficulty '{}' (expected easy, medium, hard or superior)",
                other
            )),
        }
    }
}
