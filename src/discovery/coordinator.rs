//! Discovery coordinator - wires a run together
//!
//! This module contains the top-level run logic:
//! - Building the fetcher, module registry, and probe context from config
//! - Running the discovery loop until interrupt or rate-limit suspicion
//! - Draining in-flight probes and finishing the result sink
//! - Reporting the final shutdown state and run statistics

use crate::config::Config;
use crate::discovery::candidate::CandidateGenerator;
use crate::discovery::classifier::{ErrorClassifier, SuspicionTracker};
use crate::discovery::fetcher::{Fetcher, HttpFetcher};
use crate::discovery::probe::ProbeContext;
use crate::discovery::scheduler::{DiscoveryLoop, StopReason};
use crate::discovery::shutdown::ShutdownCoordinator;
use crate::modules::ModuleRegistry;
use crate::output::{ResultSink, RunStatistics, StatsSnapshot};
use crate::state::{ShutdownEvent, ShutdownState};
use crate::Result;
use std::sync::Arc;

/// Summary of a finished run
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Why discovery stopped
    pub reason: StopReason,

    /// Shutdown state after the drain
    pub state: ShutdownState,

    pub stats: StatsSnapshot,
}

impl RunReport {
    /// Process exit code for this run
    pub fn exit_code(&self) -> i32 {
        self.state.exit_code().unwrap_or(0)
    }
}

/// Main run coordinator structure
pub struct Coordinator {
    discovery: DiscoveryLoop,
    context: Arc<ProbeContext>,
    shutdown: Arc<ShutdownCoordinator>,
}

impl Coordinator {
    /// Creates a coordinator that probes over real HTTP
    ///
    /// # Arguments
    ///
    /// * `config` - Validated run configuration
    /// * `sink` - Destination for discovered entries
    /// * `shutdown` - Interrupt state machine shared with the signal listener
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(TrawlerError)` - The HTTP client or module registry could not be built
    pub fn new(
        config: &Config,
        sink: Arc<dyn ResultSink>,
        shutdown: Arc<ShutdownCoordinator>,
    ) -> Result<Self> {
        let fetcher = Arc::new(HttpFetcher::new(&config.fetch)?);
        Self::with_fetcher(config, fetcher, sink, shutdown)
    }

    /// Creates a coordinator around an arbitrary fetcher
    pub fn with_fetcher(
        config: &Config,
        fetcher: Arc<dyn Fetcher>,
        sink: Arc<dyn ResultSink>,
        shutdown: Arc<ShutdownCoordinator>,
    ) -> Result<Self> {
        let registry = ModuleRegistry::from_names(&config.modules.enabled)?;
        tracing::info!("Enabled modules: {}", registry.names().join(", "));

        let generator = Arc::new(CandidateGenerator::new(&config.discovery.alphabet)?);
        let context = Arc::new(ProbeContext {
            fetcher,
            registry: Arc::new(registry),
            sink,
            stats: Arc::new(RunStatistics::new()),
            classifier: ErrorClassifier::new(&config.classifier.benign_patterns),
            suspicion: SuspicionTracker::new(config.classifier.suspicion_threshold),
        });
        let discovery = DiscoveryLoop::new(&config.discovery, generator, Arc::clone(&context));

        Ok(Self {
            discovery,
            context,
            shutdown,
        })
    }

    pub fn stats(&self) -> Arc<RunStatistics> {
        Arc::clone(&self.context.stats)
    }

    /// Runs discovery to completion
    ///
    /// This method:
    /// 1. Probes until the shutdown token is cancelled or rate limiting is suspected
    /// 2. Moves the shutdown machine to draining when the loop stopped on its own
    /// 3. Waits for every in-flight probe
    /// 4. Marks the drain complete and finishes the sink
    pub async fn run(mut self) -> Result<RunReport> {
        let token = self.shutdown.token();
        let reason = self.discovery.run(&token).await?;

        if reason == StopReason::RateLimited {
            self.shutdown.handle(ShutdownEvent::LoopStopped);
        }

        self.discovery.drain().await?;
        let state = self.shutdown.handle(ShutdownEvent::DrainComplete);

        if let Err(e) = self.context.sink.finish() {
            tracing::error!("Failed to finish output: {}", e);
        }

        Ok(RunReport {
            reason,
            state,
            stats: self.context.stats.snapshot(),
        })
    }
}

/// Convenience entry point: build a coordinator and run it
pub async fn run_discovery(
    config: &Config,
    sink: Arc<dyn ResultSink>,
    shutdown: Arc<ShutdownCoordinator>,
) -> Result<RunReport> {
    Coordinator::new(config, sink, shutdown)?.run().await
}
