//! Main application modules.
//!
//! Progress logging and the signal-driven shutdown coordinator used by the
//! scrape orchestrator.

pub mod logging;
pub mod shutdown;

// Re-export public API
pub use logging::log_progress;
pub use shutdown::{termination_signal, ShutdownCoordinator, ShutdownState};
