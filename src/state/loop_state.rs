/// Discovery loop lifecycle states
///
/// The loop moves strictly forward: `Idle → Probing → Draining → Stopped`.
use std::fmt;

/// Represents the current phase of the discovery loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoopState {
    /// Loop has been built but not started
    Idle,

    /// Loop is launching one probe per tick
    Probing,

    /// No new probes are launched; in-flight probes are finishing
    Draining,

    /// Every probe has finished
    Stopped,
}

impl LoopState {
    /// Returns true if the loop may still launch probes
    pub fn is_accepting(&self) -> bool {
        matches!(self, Self::Idle | Self::Probing)
    }

    /// Returns true once nothing is left running
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Stopped)
    }

    /// Returns true if moving from `self` to `next` is a legal transition
    pub fn can_transition_to(&self, next: LoopState) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::Probing)
                | (Self::Probing, Self::Draining)
                | (Self::Draining, Self::Stopped)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Probing => "probing",
            Self::Draining => "draining",
            Self::Stopped => "stopped",
        }
    }
}

impl fmt::Display for LoopState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
