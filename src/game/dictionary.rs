//! Dictionary module: the word/prefix oracle every other component asks
//!
//! Embeds an English wordlist at build time. Words are normalised to
//! uppercase and kept sorted, so every prefix query is a contiguous range
//! found by binary search.

use super::MIN_WORD_LENGTH;
use log::{info, warn};
use once_cell::sync::Lazy;
use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// Embedded wordlist, lowercase, alphabetic only, one per line
static WORDS_DATA: &str = include_str!("../../data/words.txt");

/// Shared oracle over the embedded list, built on first use
static EMBEDDED: Lazy<Arc<WordOracle>> = Lazy::new(|| Arc::new(WordOracle::from_text(WORDS_DATA)));

/// Errors that can occur while loading or consulting a dictionary.
#[derive(Debug)]
pub enum DictionaryError {
    /// Word list file could not be read
    Io(std::io::Error),
    /// Word list held no usable words
    Empty,
    /// Remote lookup did not answer in time
    Timeout,
    /// Remote lookup failed
    Remote(String),
}

impl fmt::Display for DictionaryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DictionaryError::Io(e) => write!(f, "failed to read word list: {}", e),
            DictionaryError::Empty => write!(f, "word list contains no words"),
            DictionaryError::Timeout => write!(f, "dictionary lookup timed out"),
            DictionaryError::Remote(reason) => write!(f, "remote dictionary error: {}", reason),
        }
    }
}

impl std::error::Error for DictionaryError {}

impl From<std::io::Error> for DictionaryError {
    fn from(e: std::io::Error) -> Self {
        DictionaryError::Io(e)
    }
}

/// Immutable set of valid words answering membership and prefix queries.
#[derive(Debug, Clone)]
pub struct WordOracle {
    /// Uppercase words, sorted and de-duplicated
    words: Vec<String>,
    /// False when construction failed and this is a stand-in
    loaded: bool,
}

impl WordOracle {
    /// Shared oracle over the embedded word list.
    pub fn embedded() -> Arc<WordOracle> {
        Arc::clone(&EMBEDDED)
    }

    /// Build an oracle from any list of words.
    /// Entries are uppercased; anything non-alphabetic is dropped.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let set: BTreeSet<String> = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_ascii_uppercase())
            .filter(|w| !w.is_empty() && w.chars().all(|c| c.is_ascii_alphabetic()))
            .collect();

        Self {
            words: set.into_iter().collect(),
            loaded: true,
        }
    }

    /// Build an oracle from newline-separated text.
    pub fn from_text(text: &str) -> Self {
        Self::from_words(text.lines())
    }

    /// Load a newline-separated word list from disk.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, DictionaryError> {
        let text = std::fs::read_to_string(path)?;
        let oracle = Self::from_text(&text);
        if oracle.is_empty() {
            return Err(DictionaryError::Empty);
        }
        Ok(oracle)
    }

    /// Load a word list, reporting failure and returning an unloaded oracle.
    ///
    /// An unloaded oracle answers every query negatively.
    pub fn load_or_unloaded<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match Self::from_file(path) {
            Ok(oracle) => {
                info!("loaded {} words from {}", oracle.len(), path.display());
                oracle
            }
            Err(e) => {
                warn!("dictionary {} unavailable: {}", path.display(), e);
                Self::unloaded()
            }
        }
    }

    /// Stand-in for a dictionary that failed to load.
    pub fn unloaded() -> Self {
        Self {
            words: Vec::new(),
            loaded: false,
        }
    }

    /// Whether the word list was loaded successfully.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Number of words in the dictionary
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Check if the dictionary holds no words
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Exact membership test. Case-insensitive.
    pub fn is_valid_word(&self, word: &str) -> bool {
        let upper = word.to_ascii_uppercase();
        self.words.binary_search(&upper).is_ok()
    }

    /// Member of the dictionary and long enough to count.
    pub fn is_completable_word(&self, word: &str) -> bool {
        word.len() >= MIN_WORD_LENGTH && self.is_valid_word(word)
    }

    /// All words starting with `prefix`, including `prefix` itself if it is
    /// a word. Sorted alphabetically.
    pub fn completions_of(&self, prefix: &str) -> &[String] {
        let upper = prefix.to_ascii_uppercase();
        let start = self.words.partition_point(|w| w.as_str() < upper.as_str());
        let len = self.words[start..].partition_point(|w| w.starts_with(upper.as_str()));
        &self.words[start..start + len]
    }

    /// True iff at least one word starts with `prefix`.
    pub fn has_any_completion(&self, prefix: &str) -> bool {
        !self.completions_of(prefix).is_empty()
    }

    /// True iff some word strictly longer than `prefix` starts with it.
    pub fn has_longer_completion(&self, prefix: &str) -> bool {
        self.completions_of(prefix)
            .iter()
            .any(|w| w.len() > prefix.len())
    }

    /// Distinct letters that follow `prefix` in some longer word.
    pub fn next_letters(&self, prefix: &str) -> BTreeSet<char> {
        let n = prefix.len();
        self.completions_of(prefix)
            .iter()
            .filter_map(|w| w.chars().nth(n))
            .collect()
    }

    /// Shortest completable word strictly longer than `prefix`.
    /// Alphabetical order breaks ties.
    pub fn shortest_extension(&self, prefix: &str) -> Option<&str> {
        let min_len = (prefix.len() + 1).max(MIN_WORD_LENGTH);
        self.completions_of(prefix)
            .iter()
            .filter(|w| w.len() >= min_len)
            .min_by_key(|w| w.len())
            .map(|w| w.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> WordOracle {
        WordOracle::from_words(["cat", "cats", "catalog", "dog", "Dogma", "zoom", "bad-word"])
    }

    #[test]
    fn test_valid_words() {
        let oracle = WordOracle::embedded();
        assert!(oracle.is_valid_word("ghost"));
        assert!(oracle.is_valid_word("world"));
        assert!(oracle.is_valid_word("game"));
        assert!(oracle.is_valid_word("word"));
    }

    #[test]
    fn test_case_insensitive() {
        let oracle = small();
        assert!(oracle.is_valid_word("Cat"));
        assert!(oracle.is_valid_word("CAT"));
        assert!(oracle.is_valid_word("dOgMa"));
    }

    #[test]
    fn test_invalid_words() {
        let oracle = small();
        assert!(!oracle.is_valid_word("xyzzy"));
        assert!(!oracle.is_valid_word("ca"));
        assert!(!oracle.is_valid_word(""));
        assert!(!oracle.is_valid_word("BAD-WORD"));
    }

    #[test]
    fn test_word_count() {
        assert_eq!(small().len(), 6);
        let count = WordOracle::embedded().len();
        assert!(count > 2000, "Expected 2K+ words, got {}", count);
    }

    #[test]
    fn test_completions_include_prefix_itself() {
        let oracle = small();
        let completions = oracle.completions_of("CAT");
        assert_eq!(completions, ["CAT", "CATALOG", "CATS"]);
        assert_eq!(oracle.completions_of("ca").len(), 3);
        assert!(oracle.completions_of("CATZ").is_empty());
    }

    #[test]
    fn test_empty_prefix_completes_everything() {
        let oracle = small();
        assert_eq!(oracle.completions_of("").len(), oracle.len());
        assert!(oracle.has_any_completion(""));
    }

    #[test]
    fn test_completable_requires_four_letters() {
        let oracle = small();
        assert!(!oracle.is_completable_word("CAT"));
        assert!(oracle.is_completable_word("CATS"));
    }

    #[test]
    fn test_longer_completion() {
        let oracle = small();
        assert!(oracle.has_longer_completion("CAT"));
        assert!(!oracle.has_longer_completion("CATS"));
        assert!(!oracle.has_longer_completion("ZOOM"));
    }

    #[test]
    fn test_next_letters() {
        let oracle = small();
        let next: Vec<char> = oracle.next_letters("CAT").into_iter().collect();
        assert_eq!(next, vec!['A', 'S']);
        assert!(oracle.next_letters("ZOOM").is_empty());
    }

    #[test]
    fn test_shortest_extension() {
        let oracle = small();
        assert_eq!(oracle.shortest_extension("CA"), Some("CATS"));
        assert_eq!(oracle.shortest_extension("DO"), Some("DOGMA"));
        assert_eq!(oracle.shortest_extension("ZOOM"), None);
    }

    #[test]
    fn test_every_prefix_of_a_word_has_a_completion() {
        let oracle = WordOracle::embedded();
        for word in oracle.completions_of("GH") {
            for end in 0..word.len() {
                assert!(oracle.has_any_completion(&word[..end]), "{} lost", &word[..end]);
            }
        }
    }

    #[test]
    fn test_unloaded_oracle_answers_nothing() {
        let oracle = WordOracle::load_or_unloaded("/definitely/not/a/wordlist.txt");
        assert!(!oracle.is_loaded());
        assert!(!oracle.has_any_completion(""));
        assert!(!oracle.has_any_completion("C"));
        assert!(!oracle.is_valid_word("CAT"));
    }

    #[test]
    fn test_from_file_rejects_missing_file() {
        let result = WordOracle::from_file("/definitely/not/a/wordlist.txt");
        assert!(matches!(result, Err(DictionaryError::Io(_))));
    }
}
