//! # Observability
//!
//! Structured logging for the estimation chain via `tracing`.
//!
//! ```text
//! peak_detector ──trace──┐
//! conversion ────debug───┼──► tracing ──► init_logging() ──► stdout
//! estimator ─────info────┘                (JSON / Pretty / Compact)
//! ```

pub mod logging;

pub use logging::{init_logging, LogConfig, LogFormat, LogLevel};
