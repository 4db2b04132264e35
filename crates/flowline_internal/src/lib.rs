//! # Flowline Internal Library
//!
//! Re-exports the core Flowline crates for convenience.

/// Layer 1: Tracing setup and clock.
pub use flowline_core;

/// Layer 1: Channels, ports, and components.
pub use flowline_component;

/// Layer 2: Declarative graph description.
pub use flowline_graph;

/// Layer 2: Live network assembly.
pub use flowline_network;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use flowline_component::prelude::*;
    pub use flowline_core::{Clock, TracingConfig, TracingFormat};
    pub use flowline_graph::prelude::*;
    pub use flowline_network::prelude::*;
}
