//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! connection, queries, signing, submission
//!     → logging.rs (structured tracing events)
//!     → metrics.rs (counters through the `metrics` facade)
//! ```
//!
//! The host application decides where events and metrics go. Without an installed
//! subscriber or recorder both are no-ops.

pub mod logging;
pub mod metrics;

pub use logging::init_logging;
