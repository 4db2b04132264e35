//! Loading graphs from the FBP JSON format.
//!
//! ```json
//! {
//!   "properties": { "name": "count" },
//!   "processes": {
//!     "split": { "component": "core/Forward" },
//!     "print": { "component": "core/Output" }
//!   },
//!   "connections": [
//!     { "data": "hello", "tgt": { "process": "split", "port": "in" } },
//!     { "src": { "process": "split", "port": "out" }, "tgt": { "process": "print", "port": "in" } }
//!   ]
//! }
//! ```
//!
//! Connections carrying `data` become initializers; all others become edges.
//! Records are added in document order: processes, then edges, then
//! initializers.

use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::graph::{Graph, GraphError};
use crate::record::{EdgeRecord, InitializerRecord, NodeRecord, PortRef};

#[derive(Debug, Deserialize)]
struct GraphFile {
    #[serde(default)]
    properties: Properties,
    #[serde(default)]
    processes: IndexMap<String, ProcessEntry>,
    #[serde(default)]
    connections: Vec<ConnectionEntry>,
}

#[derive(Debug, Default, Deserialize)]
struct Properties {
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct ProcessEntry {
    #[serde(default)]
    component: Option<String>,
    #[serde(default)]
    metadata: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct Socket {
    process: String,
    port: String,
}

impl From<Socket> for PortRef {
    fn from(socket: Socket) -> Self {
        PortRef::new(socket.process, socket.port)
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ConnectionEntry {
    Edge { src: Socket, tgt: Socket },
    Initial { data: Value, tgt: Socket },
}

impl Graph {
    /// Parses a graph from FBP JSON.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Parse`] if the input is not a valid graph
    /// description.
    pub fn from_json(input: &str) -> Result<Self, GraphError> {
        let file: GraphFile = serde_json::from_str(input)?;
        let graph = Graph::new(file.properties.name);

        for (id, process) in file.processes {
            graph.add_node(NodeRecord {
                id,
                component: process.component,
                metadata: process.metadata,
            })?;
        }

        let mut initializers = Vec::new();
        for connection in file.connections {
            match connection {
                ConnectionEntry::Edge { src, tgt } => {
                    graph.add_edge(EdgeRecord::new(src.into(), tgt.into()))?;
                }
                ConnectionEntry::Initial { data, tgt } => {
                    initializers.push(InitializerRecord::new(data, tgt.into()));
                }
            }
        }
        for initializer in initializers {
            graph.add_initial(initializer)?;
        }

        tracing::debug!(
            graph = %graph.name(),
            nodes = graph.nodes().len(),
            edges = graph.edges().len(),
            initializers = graph.initializers().len(),
            "graph loaded"
        );
        Ok(graph)
    }

    /// Reads and parses a graph file.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Io`] if the file cannot be read, or
    /// [`GraphError::Parse`] if its contents are not a valid graph.
    pub fn load_file(path: impl AsRef<Path>) -> Result<Self, GraphError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| GraphError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&contents)
    }
}
