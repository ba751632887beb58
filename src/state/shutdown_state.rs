/// Shutdown protocol states
///
/// The first interrupt starts a graceful drain; an interrupt that arrives
/// while draining ends the process without cleanup.
use std::fmt;

/// Events that drive the shutdown state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownEvent {
    /// An OS interrupt (Ctrl+C) arrived
    Interrupt,

    /// The discovery loop stopped on its own (rate-limit suspicion)
    LoopStopped,

    /// Every in-flight probe finished
    DrainComplete,
}

/// Represents where the process is in its shutdown protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShutdownState {
    /// Discovery is running normally
    Running,

    /// Discovery stopped; waiting for in-flight probes
    Draining,

    /// Drain finished; outputs were flushed
    Terminated,

    /// A second interrupt cut the drain short; no cleanup guarantees
    ForceKilled,
}

impl ShutdownState {
    /// Applies an event and returns the resulting state
    ///
    /// Events that have no meaning in the current state leave it unchanged.
    pub fn on_event(self, event: ShutdownEvent) -> Self {
        match (self, event) {
            (Self::Running, ShutdownEvent::Interrupt) => Self::Draining,
            (Self::Running, ShutdownEvent::LoopStopped) => Self::Draining,
            (Self::Running, ShutdownEvent::DrainComplete) => Self::Terminated,
            (Self::Draining, ShutdownEvent::Interrupt) => Self::ForceKilled,
            (Self::Draining, ShutdownEvent::DrainComplete) => Self::Terminated,
            (state, _) => state,
        }
    }

    /// Returns true if no further transitions are possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Terminated | Self::ForceKilled)
    }

    /// Process exit code associated with a terminal state
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Self::Terminated => Some(0),
            Self::ForceKilled => Some(2),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Draining => "draining",
            Self::Terminated => "terminated",
            Self::ForceKilled => "force_killed",
        }
    }
}

impl fmt::Display for ShutdownState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
