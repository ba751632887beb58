//! Discovery loop: launches one probe per tick until told to stop
//!
//! This module handles:
//! - The fixed-interval launch tick
//! - Optional semaphore admission when `max-in-flight` is set
//! - Stopping on cancellation or rate-limit suspicion
//! - Draining in-flight probes before reporting completion

use crate::config::DiscoveryConfig;
use crate::discovery::candidate::{CandidateGenerator, CandidateUrl};
use crate::discovery::counter::WorkCounter;
use crate::discovery::probe::{run_probe, ProbeContext};
use crate::discovery::shutdown::CancelToken;
use crate::state::LoopState;
use crate::{Result, TrawlerError};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;

/// Interval between drain progress reports
const DRAIN_REPORT_INTERVAL: Duration = Duration::from_secs(2);

/// Why the loop stopped launching probes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The cancellation token was triggered (operator interrupt)
    Cancelled,

    /// Unrecognized errors reached the suspicion threshold
    RateLimited,
}

impl StopReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cancelled => "interrupted",
            Self::RateLimited => "rate-limited",
        }
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The probe scheduler
pub struct DiscoveryLoop {
    state: LoopState,
    url_template: String,
    id_length: usize,
    tick: Duration,
    generator: Arc<CandidateGenerator>,
    context: Arc<ProbeContext>,
    counter: WorkCounter,
    admission: Option<Arc<Semaphore>>,
}

impl DiscoveryLoop {
    /// Creates a loop in the `Idle` state
    ///
    /// # Arguments
    ///
    /// * `config` - Discovery settings (template, identifier shape, tick, admission)
    /// * `generator` - Shared identifier source
    /// * `context` - Shared probe collaborators
    pub fn new(
        config: &DiscoveryConfig,
        generator: Arc<CandidateGenerator>,
        context: Arc<ProbeContext>,
    ) -> Self {
        let admission = match config.max_in_flight {
            0 => None,
            limit => Some(Arc::new(Semaphore::new(limit))),
        };

        Self {
            state: LoopState::Idle,
            url_template: config.url_template.clone(),
            id_length: config.id_length,
            tick: Duration::from_millis(config.tick_ms),
            generator,
            context,
            counter: WorkCounter::new(),
            admission,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Handle on the in-flight counter
    pub fn counter(&self) -> &WorkCounter {
        &self.counter
    }

    pub fn in_flight(&self) -> usize {
        self.counter.in_flight()
    }

    fn transition(&mut self, next: LoopState) -> Result<()> {
        if !self.state.can_transition_to(next) {
            return Err(TrawlerError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }
        tracing::debug!("Discovery loop {} -> {}", self.state, next);
        self.state = next;
        Ok(())
    }

    /// Launches probes until cancelled or rate limited
    ///
    /// Returns with the loop in `Draining`; in-flight probes keep running
    /// until `drain` is awaited.
    pub async fn run(&mut self, cancel: &CancelToken) -> Result<StopReason> {
        self.transition(LoopState::Probing)?;
        tracing::info!(
            "Probing {} every {:?} ({})",
            self.url_template,
            self.tick,
            match &self.admission {
                Some(semaphore) => format!("at most {} in flight", semaphore.available_permits()),
                None => "unbounded".to_string(),
            }
        );

        let reason = loop {
            if cancel.is_cancelled() {
                break StopReason::Cancelled;
            }
            if self.context.suspicion.is_tripped() {
                break StopReason::RateLimited;
            }

            tokio::select! {
                _ = tokio::time::sleep(self.tick) => self.launch(cancel).await,
                // Re-checked at the top of the loop
                _ = cancel.cancelled() => {}
            }
        };

        tracing::info!(
            "Discovery stopped ({}); {} probes in flight",
            reason,
            self.counter.in_flight()
        );
        self.transition(LoopState::Draining)?;
        Ok(reason)
    }

    /// Spawns one probe task without waiting for it
    async fn launch(&self, cancel: &CancelToken) {
        let permit = match &self.admission {
            None => None,
            Some(semaphore) => {
                let acquire = Arc::clone(semaphore).acquire_owned();
                tokio::select! {
                    permit = acquire => match permit {
                        Ok(permit) => Some(permit),
                        Err(_) => return,
                    },
                    _ = cancel.cancelled() => return,
                }
            }
        };

        let guard = self.counter.enter();
        let candidate = CandidateUrl::from_template(
            &self.url_template,
            self.generator.generate(self.id_length),
        );
        let context = Arc::clone(&self.context);
        context.stats.record_launched();

        tokio::spawn(async move {
            let _guard = guard;
            let _permit = permit;
            run_probe(&context, &candidate).await;
        });
    }

    /// Waits for every in-flight probe, then moves to `Stopped`
    ///
    /// Probes are never cancelled; drain time is bounded by the fetch
    /// timeout.
    pub async fn drain(&mut self) -> Result<()> {
        if self.state != LoopState::Draining {
            return Err(TrawlerError::InvalidTransition {
                from: self.state,
                to: LoopState::Stopped,
            });
        }

        let counter = self.counter.clone();
        tracing::info!("Waiting for {} in-flight probes", counter.in_flight());

        let idle = counter.wait_idle();
        tokio::pin!(idle);
        let mut report = tokio::time::interval(DRAIN_REPORT_INTERVAL);
        report.tick().await;

        loop {
            tokio::select! {
                _ = &mut idle => break,
                _ = report.tick() => {
                    tracing::info!("Still draining: {} probes in flight", counter.in_flight());
                }
            }
        }

        tracing::info!("All probes finished");
        self.transition(LoopState::Stopped)
    }
}
