//! Live network assembly for Flowline (Layer 2).
//!
//! `flowline_network` turns a [`Graph`](flowline_graph::Graph) into running
//! component instances joined by channels. It enforces port datatype
//! compatibility at wiring time and lets callers observe channel traffic
//! through named hooks.
//!
//! # Core Concepts
//!
//! - [`Network`] - Mirrors a graph as processes and connections
//! - [`NetworkBuilder`] - Configures components, hooks, and the clock
//! - [`HookRegistry`] - Named callbacks attached to every wired channel
//! - [`is_port_compatible`] - The output-to-input datatype rule
//!
//! # Example
//!
//! ```
//! use flowline_component::ChannelEvent;
//! use flowline_graph::{EdgeRecord, Graph, InitializerRecord, NodeRecord, PortRef};
//! use flowline_network::{HookRegistry, Network};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! let graph = Arc::new(Graph::new("hello"));
//! graph.add_node(NodeRecord::new("relay", "Forward"))?;
//! graph.add_node(NodeRecord::new("print", "Output"))?;
//! graph.add_edge(EdgeRecord::new(PortRef::new("relay", "out"), PortRef::new("print", "in")))?;
//! graph.add_initial(InitializerRecord::new(json!("hi"), PortRef::new("relay", "in")))?;
//!
//! let hooks = HookRegistry::new();
//! hooks.hook("data", "trace", |event: &ChannelEvent<'_>| {
//!     tracing::info!(%event, "packet");
//! })?;
//!
//! let network = Network::builder(graph).hooks(hooks).build()?;
//! assert_eq!(network.connection_count(), 2);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

/// Port datatype compatibility.
pub mod compat;

/// Network error types.
pub mod error;

/// Channel hooks.
pub mod hooks;

/// The live network.
pub mod network;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use crate::compat::is_port_compatible;
    pub use crate::error::{
        DefinitionError, EdgeDirection, HookError, IncompatibleTypeError, NetworkError,
    };
    pub use crate::hooks::{HookRegistry, HookTable};
    pub use crate::network::{Connection, ConnectionEnd, Network, NetworkBuilder, ProcessRecord};
}

// Re-export key types at crate root for convenience
pub use compat::is_port_compatible;
pub use error::{DefinitionError, EdgeDirection, HookError, IncompatibleTypeError, NetworkError};
pub use hooks::{HookRegistry, HookTable};
pub use network::{Connection, ConnectionEnd, Network, NetworkBuilder, ProcessRecord};
