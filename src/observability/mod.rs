//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Interceptor decisions produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (rejection and redirect counters)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON) for machine parsing
//! - Metrics are cheap (atomic increments) and no-ops until an exporter
//!   is installed

pub mod logging;
pub mod metrics;
