//! Core infrastructure for Flowline.
//!
//! This crate provides the ambient pieces every Flowline network leans on:
//!
//! - [`TracingConfig`] - Logging and observability via the `tracing` crate
//! - [`Clock`] - Time provider with a mockable backend for testing
//!
//! # Feature Flags
//!
//! - `test-utils` - Enables [`MockClock`] for deterministic time testing
//!
//! # Example
//!
//! ```no_run
//! use flowline_core::{Clock, TracingConfig, TracingFormat};
//! use tracing::Level;
//!
//! TracingConfig::default()
//!     .with_level(Level::DEBUG)
//!     .with_format(TracingFormat::Compact)
//!     .try_init();
//!
//! let clock = Clock::default();
//! let started = clock.now();
//! tracing::info!(elapsed = ?clock.elapsed_since(started), "ready");
//! ```
//!
//! # Architecture
//!
//! This crate is part of Layer 1 infrastructure:
//!
//! - **Layer 1** (`flowline_core`, `flowline_component`): Core primitives and infrastructure
//! - **Layer 2** (`flowline_graph`, `flowline_network`): Graph description and live wiring

mod time;
mod tracing_setup;

pub use time::{Clock, ClockProvider};
pub use tracing_setup::{TracingConfig, TracingError, TracingFormat};

// Re-export test utilities
#[cfg(any(test, feature = "test-utils"))]
pub use time::MockClock;
