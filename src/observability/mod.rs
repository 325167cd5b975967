//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Build passes produce:
//!     → logging.rs (structured log events, one span per item)
//!     → metrics.rs (pass, built and skipped counters)
//!
//! Consumers:
//!     → stdout / log aggregation
//!     → Prometheus scrape (watch mode only)
//! ```

pub mod logging;
pub mod metrics;
