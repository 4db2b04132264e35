//! The observable graph.
//!
//! A [`Graph`] stores node, edge, and initializer records and tells its
//! subscribers about every mutation. Subscribers are held weakly, so a
//! network may own its graph without forming a reference cycle.

use core::fmt;
use std::sync::{Arc, Weak};

use indexmap::IndexMap;
use parking_lot::RwLock;

use crate::record::{EdgeRecord, InitializerRecord, NodeRecord};

/// Error type an observer returns to reject a mutation.
pub type ObserverError = Box<dyn std::error::Error + Send + Sync>;

/// A change applied to a [`Graph`].
#[derive(Debug, Clone, PartialEq)]
pub enum GraphMutation {
    /// A node was added.
    AddNode(NodeRecord),
    /// A node was removed.
    RemoveNode(NodeRecord),
    /// An edge was added.
    AddEdge(EdgeRecord),
    /// Edges matching this record were removed.
    RemoveEdge(EdgeRecord),
    /// An initializer was added.
    AddInitial(InitializerRecord),
}

impl fmt::Display for GraphMutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphMutation::AddNode(node) => write!(f, "addNode({})", node.id),
            GraphMutation::RemoveNode(node) => write!(f, "removeNode({})", node.id),
            GraphMutation::AddEdge(edge) => write!(f, "addEdge({edge})"),
            GraphMutation::RemoveEdge(edge) => write!(f, "removeEdge({edge})"),
            GraphMutation::AddInitial(init) => write!(f, "addInitial({init})"),
        }
    }
}

/// Receives graph mutations after they are recorded.
pub trait GraphObserver: Send + Sync {
    /// Applies a mutation. Returning an error stops dispatch to later
    /// observers; the graph keeps the record either way.
    fn on_mutation(&self, mutation: &GraphMutation) -> Result<(), ObserverError>;
}

/// Errors raised by graph operations.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// A node with this id already exists.
    #[error("node '{0}' already exists")]
    DuplicateNode(String),

    /// An observer failed to apply a mutation.
    #[error("observer rejected {mutation}: {source}")]
    ObserverRejected {
        /// The rejected mutation, rendered.
        mutation: String,
        /// The observer's error.
        #[source]
        source: ObserverError,
    },

    /// The graph description is not valid JSON or does not match the format.
    #[error("invalid graph description: {0}")]
    Parse(#[from] serde_json::Error),

    /// The graph file could not be read.
    #[error("failed to read graph file '{path}': {source}")]
    Io {
        /// The file path.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

#[derive(Default)]
struct GraphState {
    nodes: IndexMap<String, NodeRecord>,
    edges: Vec<EdgeRecord>,
    initializers: Vec<InitializerRecord>,
}

/// A declarative dataflow graph.
///
/// All methods take `&self`; the graph is shared as `Arc<Graph>` between the
/// code that edits it and the networks observing it.
///
/// # Example
///
/// ```
/// use flowline_graph::{EdgeRecord, Graph, NodeRecord, PortRef};
///
/// let graph = Graph::new("pipeline");
/// graph.add_node(NodeRecord::new("read", "core/Forward"))?;
/// graph.add_node(NodeRecord::new("write", "core/Output"))?;
/// graph.add_edge(EdgeRecord::new(PortRef::new("read", "out"), PortRef::new("write", "in")))?;
///
/// assert_eq!(graph.nodes().len(), 2);
/// # Ok::<(), flowline_graph::GraphError>(())
/// ```
pub struct Graph {
    name: String,
    state: RwLock<GraphState>,
    observers: RwLock<Vec<Weak<dyn GraphObserver>>>,
}

impl Graph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: RwLock::new(GraphState::default()),
            observers: RwLock::new(Vec::new()),
        }
    }

    /// Returns the graph name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Registers an observer. Dropped observers are pruned on the next
    /// dispatch.
    pub fn subscribe(&self, observer: Weak<dyn GraphObserver>) {
        self.observers.write().push(observer);
    }

    /// Returns the number of live observers.
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.observers
            .read()
            .iter()
            .filter(|observer| observer.strong_count() > 0)
            .count()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Adds a node.
    ///
    /// # Errors
    ///
    /// - [`GraphError::DuplicateNode`] if the id is taken (nothing is emitted).
    /// - [`GraphError::ObserverRejected`] if an observer fails.
    pub fn add_node(&self, node: NodeRecord) -> Result<(), GraphError> {
        {
            let mut state = self.state.write();
            if state.nodes.contains_key(&node.id) {
                return Err(GraphError::DuplicateNode(node.id));
            }
            state.nodes.insert(node.id.clone(), node.clone());
        }
        self.emit(&GraphMutation::AddNode(node))
    }

    /// Removes a node along with its edges and initializers.
    ///
    /// A `RemoveEdge` mutation is emitted for every edge touching the node,
    /// then a source-less `RemoveEdge` for every initializer targeting it,
    /// then the `RemoveNode` mutation. Returns the removed node, or `None` if
    /// the id is unknown.
    ///
    /// # Errors
    ///
    /// Returns the first [`GraphError::ObserverRejected`]. Records are removed
    /// and every mutation is still emitted.
    pub fn remove_node(&self, id: &str) -> Result<Option<NodeRecord>, GraphError> {
        let (node, edges, initializers) = {
            let mut state = self.state.write();
            let Some(node) = state.nodes.shift_remove(id) else {
                return Ok(None);
            };
            let (edges, kept): (Vec<_>, Vec<_>) = state.edges.drain(..).partition(|edge| {
                edge.to.node == id || edge.from.as_ref().is_some_and(|from| from.node == id)
            });
            state.edges = kept;
            let (initializers, kept): (Vec<_>, Vec<_>) = state
                .initializers
                .drain(..)
                .partition(|init| init.to.node == id);
            state.initializers = kept;
            (node, edges, initializers)
        };

        let mutations = edges
            .into_iter()
            .chain(
                initializers
                    .into_iter()
                    .map(|init| EdgeRecord::seed(init.from.data, init.to)),
            )
            .map(GraphMutation::RemoveEdge)
            .chain([GraphMutation::RemoveNode(node.clone())]);

        let mut first_error = None;
        for mutation in mutations {
            if let Err(err) = self.emit(&mutation) {
                first_error.get_or_insert(err);
            }
        }
        match first_error {
            Some(err) => Err(err),
            None => Ok(Some(node)),
        }
    }

    /// Adds an edge. Endpoints are not checked here; observers validate them.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::ObserverRejected`] if an observer fails.
    pub fn add_edge(&self, edge: EdgeRecord) -> Result<(), GraphError> {
        self.state.write().edges.push(edge.clone());
        self.emit(&GraphMutation::AddEdge(edge))
    }

    /// Removes every edge matching `edge` (see [`EdgeRecord::matches`]) and
    /// returns how many were removed. Nothing is emitted when none match.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::ObserverRejected`] if an observer fails.
    pub fn remove_edge(&self, edge: &EdgeRecord) -> Result<usize, GraphError> {
        let removed = {
            let mut state = self.state.write();
            let before = state.edges.len();
            state
                .edges
                .retain(|existing| !edge.matches(existing.from.as_ref(), &existing.to));
            before - state.edges.len()
        };
        if removed > 0 {
            self.emit(&GraphMutation::RemoveEdge(edge.clone()))?;
        }
        Ok(removed)
    }

    /// Adds an initializer.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::ObserverRejected`] if an observer fails.
    pub fn add_initial(&self, initializer: InitializerRecord) -> Result<(), GraphError> {
        self.state.write().initializers.push(initializer.clone());
        self.emit(&GraphMutation::AddInitial(initializer))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────────

    /// Returns a node by id.
    #[must_use]
    pub fn get_node(&self, id: &str) -> Option<NodeRecord> {
        self.state.read().nodes.get(id).cloned()
    }

    /// Returns all nodes in insertion order.
    #[must_use]
    pub fn nodes(&self) -> Vec<NodeRecord> {
        self.state.read().nodes.values().cloned().collect()
    }

    /// Returns all edges in insertion order.
    #[must_use]
    pub fn edges(&self) -> Vec<EdgeRecord> {
        self.state.read().edges.clone()
    }

    /// Returns all initializers in insertion order.
    #[must_use]
    pub fn initializers(&self) -> Vec<InitializerRecord> {
        self.state.read().initializers.clone()
    }

    fn emit(&self, mutation: &GraphMutation) -> Result<(), GraphError> {
        let observers: Vec<Arc<dyn GraphObserver>> = {
            let mut observers = self.observers.write();
            observers.retain(|observer| observer.strong_count() > 0);
            observers.iter().filter_map(Weak::upgrade).collect()
        };

        tracing::trace!(graph = %self.name, %mutation, observers = observers.len(), "graph mutation");

        for observer in observers {
            observer
                .on_mutation(mutation)
                .map_err(|source| GraphError::ObserverRejected {
                    mutation: mutation.to_string(),
                    source,
                })?;
        }
        Ok(())
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new("")
    }
}

impl fmt::Debug for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.read();
        f.debug_struct("Graph")
            .field("name", &self.name)
            .field("nodes", &state.nodes.len())
            .field("edges", &state.edges.len())
            .field("initializers", &state.initializers.len())
            .finish()
    }
}
