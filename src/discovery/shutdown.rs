//! Interrupt handling
//!
//! The first Ctrl+C cancels the discovery loop and lets in-flight probes
//! drain. A second Ctrl+C while draining runs the force action, which in
//! production exits the process with code 2 without flushing anything.

use crate::state::{ShutdownEvent, ShutdownState};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, Notify};
use tokio::task::JoinHandle;

/// Exit code used when a second interrupt cuts the drain short
pub const FORCED_EXIT_CODE: i32 = 2;

#[derive(Debug, Default)]
struct CancelInner {
    cancelled: AtomicBool,
    notify: Notify,
}

/// Cooperative cancellation flag observed by the discovery loop
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    inner: Arc<CancelInner>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        if !self.inner.cancelled.swap(true, Ordering::AcqRel) {
            self.inner.notify.notify_waiters();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::Acquire)
    }

    /// Resolves once `cancel` has been called
    pub async fn cancelled(&self) {
        loop {
            let notified = self.inner.notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();
            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }
}

type ForceAction = Box<dyn Fn() + Send + Sync>;

/// Drives the `ShutdownState` machine from interrupts and loop events
pub struct ShutdownCoordinator {
    state: Mutex<ShutdownState>,
    token: CancelToken,
    force: ForceAction,
}

impl ShutdownCoordinator {
    /// Creates a coordinator whose forced path runs `force`
    pub fn new<F>(force: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self {
            state: Mutex::new(ShutdownState::Running),
            token: CancelToken::new(),
            force: Box::new(force),
        }
    }

    /// Creates a coordinator whose forced path terminates the process
    pub fn with_process_exit() -> Self {
        Self::new(|| {
            tracing::warn!(
                "Second interrupt received; exiting immediately. In-flight results are lost and output files may be truncated"
            );
            std::process::exit(FORCED_EXIT_CODE);
        })
    }

    /// Token the discovery loop checks on every tick
    pub fn token(&self) -> CancelToken {
        self.token.clone()
    }

    pub fn state(&self) -> ShutdownState {
        *self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Applies an event and performs the side effect of the new state
    ///
    /// Entering `Draining` cancels the loop; entering `ForceKilled` runs the
    /// force action. The lock is released before either side effect.
    pub fn handle(&self, event: ShutdownEvent) -> ShutdownState {
        let (previous, next) = {
            let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
            let previous = *state;
            *state = previous.on_event(event);
            (previous, *state)
        };

        if previous == next {
            tracing::debug!("Ignoring {:?} in state {}", event, next);
            return next;
        }

        tracing::debug!("Shutdown state {} -> {}", previous, next);
        match next {
            ShutdownState::Draining => {
                if event == ShutdownEvent::Interrupt {
                    tracing::info!(
                        "Interrupt received; finishing in-flight probes. Press Ctrl+C again to exit immediately (results may be lost)"
                    );
                }
                self.token.cancel();
            }
            ShutdownState::ForceKilled => (self.force)(),
            ShutdownState::Running | ShutdownState::Terminated => {}
        }

        next
    }

    /// Feeds every message on `signals` into the machine as an interrupt
    ///
    /// The listener exits once a terminal state is reached or the sender
    /// side closes.
    pub fn listen(self: Arc<Self>, mut signals: mpsc::Receiver<()>) -> JoinHandle<()> {
        tokio::spawn(async move {
            while signals.recv().await.is_some() {
                if self.handle(ShutdownEvent::Interrupt).is_terminal() {
                    break;
                }
            }
        })
    }
}

/// Forwards OS interrupts (Ctrl+C) into a channel
///
/// Must be called from within a tokio runtime.
pub fn interrupt_signals() -> mpsc::Receiver<()> {
    let (tx, rx) = mpsc::channel(4);
    tokio::spawn(async move {
        loop {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for interrupts: {}", e);
                break;
            }
            if tx.send(()).await.is_err() {
                break;
            }
        }
    });
    rx
}
