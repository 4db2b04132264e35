//! Declarative dataflow graphs for Flowline (Layer 2).
//!
//! `flowline_graph` describes *what* a network should look like: processes
//! naming component types, edges between their ports, and one-shot initial
//! values. A [`Graph`] is observable, so a live network can mirror every
//! change as it happens.
//!
//! # Core Concepts
//!
//! - [`NodeRecord`], [`EdgeRecord`], [`InitializerRecord`] - Plain, serializable records
//! - [`Graph`] - Shared, internally locked record store
//! - [`GraphObserver`] / [`GraphMutation`] - Change notification
//!
//! # Example
//!
//! ```
//! use flowline_graph::Graph;
//!
//! let graph = Graph::from_json(r#"{
//!     "processes": { "out": { "component": "core/Output" } },
//!     "connections": [ { "data": 42, "tgt": { "process": "out", "port": "in" } } ]
//! }"#)?;
//!
//! assert_eq!(graph.initializers().len(), 1);
//! # Ok::<(), flowline_graph::GraphError>(())
//! ```

/// The observable graph.
pub mod graph;

/// FBP JSON loading.
pub mod json;

/// Graph records.
pub mod record;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use crate::graph::{Graph, GraphError, GraphMutation, GraphObserver, ObserverError};
    pub use crate::record::{EdgeRecord, InitialData, InitializerRecord, NodeRecord, PortRef};
}

// Re-export key types at crate root for convenience
pub use graph::{Graph, GraphError, GraphMutation, GraphObserver, ObserverError};
pub use record::{EdgeRecord, InitialData, InitializerRecord, NodeRecord, PortRef};
