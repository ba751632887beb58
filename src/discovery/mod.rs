//! Discovery module for probing the paste site's identifier space
//!
//! # Components
//!
//! - `candidate`: Random identifiers and candidate URLs
//! - `fetcher`: HTTP client seam and error types
//! - `classifier`: Benign vs suspicious transport errors
//! - `counter`: In-flight probe accounting
//! - `probe`: One fetch-and-process task
//! - `scheduler`: The tick-driven discovery loop
//! - `shutdown`: Two-tier interrupt handling
//! - `coordinator`: Wires a full run together

pub mod candidate;
pub mod classifier;
pub mod coordinator;
pub mod counter;
pub mod fetcher;
pub mod probe;
pub mod scheduler;
pub mod shutdown;

// Re-export main types
pub use candidate::{generate_id, CandidateGenerator, CandidateUrl};
pub use classifier::{ErrorClass, ErrorClassifier, SuspicionTracker, DEFAULT_BENIGN_PATTERNS};
pub use coordinator::{run_discovery, Coordinator, RunReport};
pub use counter::{WorkCounter, WorkGuard};
pub use fetcher::{build_http_client, FetchError, FetchOutcome, Fetcher, HttpFetcher, StaticFetcher};
pub use probe::{run_probe, ProbeContext, ProbeOutcome};
pub use scheduler::{DiscoveryLoop, StopReason};
pub use shutdown::{interrupt_signals, CancelToken, ShutdownCoordinator, FORCED_EXIT_CODE};
