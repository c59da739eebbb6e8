//! Word judging with an optional remote dictionary
//!
//! Calling a word and resolving a challenge both ask "is this a word?".
//! That question may be put to a remote service; if the service errors or
//! does not answer within the timeout, the local oracle answers instead.
//! The fallback is a single local lookup, never a retry.
//!
//! A remote that hangs keeps its worker thread until it returns. At most
//! [`MAX_PENDING_LOOKUPS`] such workers are allowed at once; past that the
//! local list answers without asking the remote.

use super::dictionary::{DictionaryError, WordOracle};
use log::warn;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Default time to wait for a remote answer
pub const DEFAULT_REMOTE_TIMEOUT: Duration = Duration::from_millis(1500);

/// Remote lookups allowed to be running at once
pub const MAX_PENDING_LOOKUPS: usize = 4;

/// Anything that can rule on whether a word is real.
pub trait WordJudge: Send + Sync {
    fn is_valid_word(&self, word: &str) -> bool;
}

impl WordJudge for WordOracle {
    fn is_valid_word(&self, word: &str) -> bool {
        WordOracle::is_valid_word(self, word)
    }
}

/// A dictionary living somewhere else (a web API, a service).
pub trait RemoteDictionary: Send + Sync + 'static {
    fn lookup(&self, word: &str) -> Result<bool, DictionaryError>;
}

/// Which source produced a lookup answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupSource {
    Remote,
    LocalFallback,
}

/// Answer to a word lookup plus where it came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lookup {
    pub valid: bool,
    pub source: LookupSource,
}

/// Remote dictionary backed by a local word list.
pub struct FallbackDictionary {
    remote: Arc<dyn RemoteDictionary>,
    local: Arc<WordOracle>,
    timeout: Duration,
    max_pending: usize,
    /// Workers that have not returned yet, timed out ones included
    pending: Arc<AtomicUsize>,
}

impl FallbackDictionary {
    pub fn new(remote: Arc<dyn RemoteDictionary>, local: Arc<WordOracle>) -> Self {
        Self {
            remote,
            local,
            timeout: DEFAULT_REMOTE_TIMEOUT,
            max_pending: MAX_PENDING_LOOKUPS,
            pending: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Override how many remote lookups may be running at once
    pub fn with_max_pending(mut self, max_pending: usize) -> Self {
        self.max_pending = max_pending;
        self
    }

    /// Remote lookups still running
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }

    /// Override how long to wait for the remote
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Look a word up remotely, falling back to the local list.
    pub fn lookup(&self, word: &str) -> Lookup {
        let word_upper = word.to_ascii_uppercase();

        match self.remote_lookup(&word_upper) {
            Ok(valid) => Lookup {
                valid,
                source: LookupSource::Remote,
            },
            Err(e) => {
                warn!("remote dictionary unavailable for {}: {}; using local list", word_upper, e);
                Lookup {
                    valid: self.local.is_valid_word(&word_upper),
                    source: LookupSource::LocalFallback,
                }
            }
        }
    }

    /// Run the remote query on a worker thread so a hung service can be
    /// abandoned after the timeout.
    fn remote_lookup(&self, word: &str) -> Result<bool, DictionaryError> {
        let reserved = self
            .pending
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| {
                (n < self.max_pending).then_some(n + 1)
            });
        if reserved.is_err() {
            return Err(DictionaryError::Remote(format!(
                "{} lookups still pending",
                self.max_pending
            )));
        }

        let (tx, rx) = mpsc::channel();
        let remote = Arc::clone(&self.remote);
        let pending = Arc::clone(&self.pending);
        let word = word.to_string();

        thread::spawn(move || {
            let result = remote.lookup(&word);
            pending.fetch_sub(1, Ordering::SeqCst);
            // Receiver may be gone after a timeout; nothing to do then.
            let _ = tx.send(result);
        });

        match rx.recv_timeout(self.timeout) {
            Ok(result) => result,
            Err(mpsc::RecvTimeoutError::Timeout) => Err(DictionaryError::Timeout),
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                Err(DictionaryError::Remote("lookup worker exited".to_string()))
            }
        }
    }
}

impl WordJudge for FallbackDictionary {
    fn is_valid_word(&self, word: &str) -> bool {
        self.lookup(word).valid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Answers(Vec<&'static str>);

    impl RemoteDictionary for Answers {
        fn lookup(&self, word: &str) -> Result<bool, DictionaryError> {
            Ok(self.0.iter().any(|w| w.eq_ignore_ascii_case(word)))
        }
    }

    struct Broken;

    impl RemoteDictionary for Broken {
        fn lookup(&self, _word: &str) -> Result<bool, DictionaryError> {
            Err(DictionaryError::Remote("503".to_string()))
        }
    }

    struct Slow;

    impl RemoteDictionary for Slow {
        fn lookup(&self, _word: &str) -> Result<bool, DictionaryError> {
            thread::sleep(Duration::from_millis(500));
            Ok(true)
        }
    }

    fn local() -> Arc<WordOracle> {
        Arc::new(WordOracle::from_words(["cats", "dogs"]))
    }

    #[test]
    fn test_remote_answer_is_used() {
        let dict = FallbackDictionary::new(Arc::new(Answers(vec!["QUOKKA"])), local());
        let lookup = dict.lookup("quokka");
        assert!(lookup.valid);
        assert_eq!(lookup.source, LookupSource::Remote);

        // Remote is authoritative when it answers
        assert!(!dict.lookup("cats").valid);
    }

    #[test]
    fn test_remote_error_falls_back_to_local() {
        let dict = FallbackDictionary::new(Arc::new(Broken), local());
        let lookup = dict.lookup("cats");
        assert_eq!(
            lookup,
            Lookup {
                valid: true,
                source: LookupSource::LocalFallback
            }
        );
        assert!(!dict.is_valid_word("quokka"));
    }

    #[test]
    fn test_remote_timeout_falls_back_to_local() {
        let dict = FallbackDictionary::new(Arc::new(Slow), local())
            .with_timeout(Duration::from_millis(20));
        let lookup = dict.lookup("quokka");
        assert!(!lookup.valid);
        assert_eq!(lookup.source, LookupSource::LocalFallback);
    }

    struct Counting {
        calls: AtomicUsize,
    }

    impl RemoteDictionary for Counting {
        fn lookup(&self, _word: &str) -> Result<bool, DictionaryError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            thread::sleep(Duration::from_millis(500));
            Ok(true)
        }
    }

    #[test]
    fn test_hung_remote_is_not_asked_past_the_cap() {
        let remote = Arc::new(Counting {
            calls: AtomicUsize::new(0),
        });
        let dict = FallbackDictionary::new(Arc::clone(&remote) as Arc<dyn RemoteDictionary>, local())
            .with_timeout(Duration::from_millis(20))
            .with_max_pending(1);

        assert_eq!(dict.lookup("quokka").source, LookupSource::LocalFallback);
        assert_eq!(dict.pending(), 1);

        // The first worker is still asleep, so the remote is skipped
        let lookup = dict.lookup("cats");
        assert_eq!(
            lookup,
            Lookup {
                valid: true,
                source: LookupSource::LocalFallback
            }
        );
        assert!(remote.calls.load(Ordering::SeqCst) <= 1);
    }

    #[test]
    fn test_finished_lookups_free_their_slot() {
        let dict = FallbackDictionary::new(Arc::new(Answers(vec!["QUOKKA"])), local()).with_max_pending(1);
        for _ in 0..3 {
            assert_eq!(dict.lookup("quokka").source, LookupSource::Remote);
        }
        assert_eq!(dict.pending(), 0);
    }

    #[test]
    fn test_fallback_is_deterministic() {
        let dict = FallbackDictionary::new(Arc::new(Broken), local());
        let first = dict.lookup("dogs");
        for _ in 0..5 {
            assert_eq!(dict.lookup("dogs"), first);
        }
    }
}
