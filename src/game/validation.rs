//! Challenge resolution
//!
//! When a player is challenged they must name a real word that extends the
//! challenged prefix. The claim is checked in order, cheapest first:
//! - The word starts with the challenged prefix
//! - The word is longer than the prefix and at least 4 letters
//! - The word is in the dictionary

use super::remote::WordJudge;
use super::MIN_WORD_LENGTH;
use std::sync::Arc;

/// Why a challenge came out the way it did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChallengeReason {
    /// Claimed word does not begin with the challenged prefix
    NotAnExtension,
    /// Claimed word is not longer than the prefix, or under 4 letters
    TooShort { length: usize },
    /// Claimed word is not in the dictionary
    NotInDictionary,
    /// Claimed word is real and extends the prefix
    ValidWord,
}

/// Outcome of a challenge. `success` means the challenger was right and
/// the defender loses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChallengeResult {
    pub success: bool,
    pub reason: ChallengeReason,
}

impl ChallengeResult {
    fn upheld(reason: ChallengeReason) -> Self {
        Self {
            success: true,
            reason,
        }
    }

    /// Returns a user-friendly message
    pub fn message(&self) -> String {
        match &self.reason {
            ChallengeReason::NotAnExtension => "That word doesn't extend the prefix".to_string(),
            ChallengeReason::TooShort { length } => format!(
                "Too short ({} chars, need {}+ and longer than the prefix)",
                length, MIN_WORD_LENGTH
            ),
            ChallengeReason::NotInDictionary => "Not in dictionary".to_string(),
            ChallengeReason::ValidWord => "Real word! Challenge failed".to_string(),
        }
    }
}

/// Decides challenges against a word judge (local or remote-backed).
#[derive(Clone)]
pub struct ChallengeResolver {
    judge: Arc<dyn WordJudge>,
}

impl ChallengeResolver {
    pub fn new(judge: Arc<dyn WordJudge>) -> Self {
        Self { judge }
    }

    /// Resolve a challenge of `original_prefix` answered with `claimed_word`.
    pub fn resolve_challenge(&self, original_prefix: &str, claimed_word: &str) -> ChallengeResult {
        let prefix = original_prefix.trim().to_ascii_uppercase();
        let claimed = claimed_word.trim().to_ascii_uppercase();

        if !claimed.starts_with(&prefix) {
            return ChallengeResult::upheld(ChallengeReason::NotAnExtension);
        }

        if claimed.len() <= prefix.len() || claimed.len() < MIN_WORD_LENGTH {
            return ChallengeResult::upheld(ChallengeReason::TooShort {
                length: claimed.len(),
            });
        }

        if !self.judge.is_valid_word(&claimed) {
            return ChallengeResult::upheld(ChallengeReason::NotInDictionary);
        }

        ChallengeResult {
            success: false,
            reason: ChallengeReason::ValidWord,
        }
    }
}
