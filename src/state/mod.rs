//! State module for tracking run progress
//!
//! # Components
//!
//! - `LoopState`: Lifecycle of the discovery loop (idle, probing, draining, stopped)
//! - `ShutdownState`: Two-tier interrupt protocol (graceful drain, forced exit)

mod loop_state;
mod shutdown_state;

// Re-export main types
pub use loop_state::LoopState;
pub use shutdown_state::{ShutdownEvent, ShutdownState};
