//! A single probe: fetch one candidate URL and process the page if it exists

use crate::discovery::candidate::CandidateUrl;
use crate::discovery::classifier::{ErrorClass, ErrorClassifier, SuspicionTracker};
use crate::discovery::fetcher::Fetcher;
use crate::modules::ModuleRegistry;
use crate::output::{ResultSink, RunStatistics};
use std::sync::Arc;

/// Everything a probe task needs, shared by all probes of a run
pub struct ProbeContext {
    pub fetcher: Arc<dyn Fetcher>,
    pub registry: Arc<ModuleRegistry>,
    pub sink: Arc<dyn ResultSink>,
    pub stats: Arc<RunStatistics>,
    pub classifier: ErrorClassifier,
    pub suspicion: SuspicionTracker,
}

/// What happened to one probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The identifier does not belong to a paste
    Miss { status: u16 },

    /// The paste exists; `entries` were found and `delivered` reached the sink
    Hit { entries: usize, delivered: usize },

    /// The request failed at the transport level
    Failed(ErrorClass),
}

/// Runs one probe to completion
///
/// Never fails: misses, transport errors and module errors are all
/// recorded and absorbed here. A suspicious transport error may trip the
/// run's `SuspicionTracker`, which the discovery loop observes.
pub async fn run_probe(context: &ProbeContext, candidate: &CandidateUrl) -> ProbeOutcome {
    let outcome = probe(context, candidate).await;
    context.stats.record_completed();
    outcome
}

async fn probe(context: &ProbeContext, candidate: &CandidateUrl) -> ProbeOutcome {
    let url = candidate.as_str();

    let response = match context.fetcher.get(url).await {
        Ok(response) => response,
        Err(e) => {
            let class = context.classifier.classify(&e);
            match class {
                ErrorClass::Benign => {
                    context.stats.record_benign();
                    tracing::debug!("Benign probe error: {}", e);
                }
                ErrorClass::Suspicious => {
                    context.stats.record_suspicious();
                    tracing::warn!("Unrecognized probe error: {}", e);
                    if context.suspicion.record() {
                        tracing::warn!(
                            "Possible rate limiting after {} unrecognized errors; stopping discovery",
                            context.suspicion.count()
                        );
                        context.fetcher.rotate();
                    }
                }
            }
            return ProbeOutcome::Failed(class);
        }
    };

    if !response.is_ok() {
        context.stats.record_miss();
        tracing::trace!("Miss {} ({})", url, response.status);
        return ProbeOutcome::Miss {
            status: response.status,
        };
    }

    context.stats.record_page();
    tracing::debug!("Found paste {}", url);

    let body = response.text();
    let entries = context
        .registry
        .fan_out(context.fetcher.as_ref(), &body, url)
        .await;

    if entries.is_empty() {
        return ProbeOutcome::Hit {
            entries: 0,
            delivered: 0,
        };
    }

    let delivered = context.sink.deliver(&entries);
    context.stats.record_delivered(delivered);
    context.stats.record_dropped(entries.len() - delivered);

    ProbeOutcome::Hit {
        entries: entries.len(),
        delivered,
    }
}
