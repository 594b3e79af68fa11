//! Instrumentation helpers for highsrun.
//!
//! - [`memory`]: resident-memory sampling of solver child processes
//! - [`logging`]: `tracing` subscriber setup driven by `HIGHSRUN_*` variables

pub mod logging;
pub mod memory;

pub use logging::{LoggingError, enable_logging};
pub use memory::{MemoryError, MemoryProbe};
