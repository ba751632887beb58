//! Probe failure classification
//!
//! A transport error is either known network noise (benign) or something
//! unrecognized that may mean the paste site has started refusing us
//! (suspicious). Suspicious errors accumulate in a `SuspicionTracker`;
//! once it trips, the discovery loop stops launching probes.

use crate::discovery::fetcher::FetchError;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

/// Error-message fragments treated as benign by default
pub const DEFAULT_BENIGN_PATTERNS: &[&str] = &[
    "timed out",
    "deadline",
    "connection reset",
    "reset by peer",
    "closed",
    "broken pipe",
    "eof",
];

/// Verdict for one probe failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Ordinary transient failure; logged and ignored
    Benign,

    /// Unrecognized failure; a possible block signal
    Suspicious,
}

/// Substring-based error classifier
///
/// Matching is case-insensitive and runs on the error's cause only, never
/// on the request URL.
#[derive(Debug, Clone)]
pub struct ErrorClassifier {
    patterns: Vec<String>,
}

impl ErrorClassifier {
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            patterns: patterns
                .into_iter()
                .map(|p| p.as_ref().to_lowercase())
                .filter(|p| !p.is_empty())
                .collect(),
        }
    }

    /// Classifier using `DEFAULT_BENIGN_PATTERNS`
    pub fn with_defaults() -> Self {
        Self::new(DEFAULT_BENIGN_PATTERNS)
    }

    /// Classifies a raw error message
    pub fn classify_message(&self, message: &str) -> ErrorClass {
        let message = message.to_lowercase();
        if self.patterns.iter().any(|p| message.contains(p.as_str())) {
            ErrorClass::Benign
        } else {
            ErrorClass::Suspicious
        }
    }

    /// Classifies a fetch failure
    pub fn classify(&self, error: &FetchError) -> ErrorClass {
        self.classify_message(error.detail())
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }
}

impl Default for ErrorClassifier {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Counts suspicious errors and trips once a threshold is reached
#[derive(Debug)]
pub struct SuspicionTracker {
    threshold: u32,
    seen: AtomicU32,
    tripped: AtomicBool,
}

impl SuspicionTracker {
    /// Creates a tracker; a threshold of 0 is treated as 1
    pub fn new(threshold: u32) -> Self {
        Self {
            threshold: threshold.max(1),
            seen: AtomicU32::new(0),
            tripped: AtomicBool::new(false),
        }
    }

    /// Records one suspicious error
    ///
    /// Returns true only for the call that trips the tracker.
    pub fn record(&self) -> bool {
        let seen = self.seen.fetch_add(1, Ordering::AcqRel) + 1;
        if seen >= self.threshold {
            !self.tripped.swap(true, Ordering::AcqRel)
        } else {
            false
        }
    }

    pub fn is_tripped(&self) -> bool {
        self.tripped.load(Ordering::Acquire)
    }

    pub fn count(&self) -> u32 {
        self.seen.load(Ordering::Acquire)
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request_error(detail: &str) -> FetchError {
        FetchError::Request {
            url: "https://rentry.co/abcde/raw".to_string(),
            detail: detail.to_string(),
        }
    }

    #[test]
    fn test_known_errors_are_benign() {
        let classifier = ErrorClassifier::with_defaults();
        for detail in [
            "error sending request: connection closed before message completed",
            "error reading a body from connection: Connection reset by peer (os error 104)",
            "unexpected EOF during handshake",
            "Broken pipe (os error 32)",
        ] {
            assert_eq!(classifier.classify(&request_error(detail)), ErrorClass::Benign, "{}", detail);
        }
        assert_eq!(
            classifier.classify(&FetchError::Timeout {
                url: "https://x.example".to_string()
            }),
            ErrorClass::Benign
        );
    }

    #[test]
    fn test_default_patterns_do_not_overlap() {
        for (i, a) in DEFAULT_BENIGN_PATTERNS.iter().enumerate() {
            for (j, b) in DEFAULT_BENIGN_PATTERNS.iter().enumerate() {
                assert!(i == j || !a.contains(b), "{:?} is covered by {:?}", a, b);
            }
        }
        assert_eq!(
            ErrorClassifier::with_defaults().classify_message("use of closed network connection"),
            ErrorClass::Benign
        );
    }

    #[test]
    fn test_unknown_errors_are_suspicious() {
        let classifier = ErrorClassifier::with_defaults();
        assert_eq!(
            classifier.classify(&request_error("tcp connect error: Connection refused (os error 111)")),
            ErrorClass::Suspicious
        );
        assert_eq!(
            classifier.classify(&request_error("invalid certificate")),
            ErrorClass::Suspicious
        );
    }

    #[test]
    fn test_url_never_influences_verdict() {
        let classifier = ErrorClassifier::with_defaults();
        let error = FetchError::Connect {
            url: "https://rentry.co/eofxx/raw".to_string(),
            detail: "Connection refused".to_string(),
        };
        assert_eq!(classifier.classify(&error), ErrorClass::Suspicious);
    }

    #[test]
    fn test_custom_patterns_replace_defaults() {
        let classifier = ErrorClassifier::new(["refused"]);
        assert_eq!(classifier.classify_message("Connection REFUSED"), ErrorClass::Benign);
        assert_eq!(classifier.classify_message("connection reset"), ErrorClass::Suspicious);
    }

    #[test]
    fn test_empty_patterns_are_dropped() {
        let classifier = ErrorClassifier::new(["", "eof"]);
        assert_eq!(classifier.patterns().len(), 1);
        assert_eq!(classifier.classify_message("anything"), ErrorClass::Suspicious);
    }

    #[test]
    fn test_tracker_trips_once_at_threshold() {
        let tracker = SuspicionTracker::new(3);
        assert!(!tracker.record());
        assert!(!tracker.record());
        assert!(!tracker.is_tripped());
        assert!(tracker.record());
        assert!(tracker.is_tripped());
        assert!(!tracker.record());
        assert_eq!(tracker.count(), 4);
    }

    #[test]
    fn test_default_threshold_trips_on_first_error() {
        let tracker = SuspicionTracker::new(1);
        assert!(tracker.record());
        assert!(tracker.is_tripped());
        assert_eq!(SuspicionTracker::new(0).threshold(), 1);
    }
}
