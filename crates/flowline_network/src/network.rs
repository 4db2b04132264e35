//! The live network.
//!
//! A [`Network`] mirrors a [`Graph`] as running component instances
//! ([`ProcessRecord`]s) joined by [`Channel`]s ([`Connection`]s). It subscribes
//! to the graph on creation, replays what the graph already holds, and from
//! then on applies every graph mutation as it happens.
//!
//! # Wiring order
//!
//! 1. Nodes, in graph order.
//! 2. Edges, in graph order. Each edge checks both ports exist and that the
//!    source datatype may feed the target datatype.
//! 3. Initializers. Each one opens a seed channel, sends its value, and
//!    closes the channel again before the call returns.
//!
//! A wiring operation that fails leaves no connection and no port attachment
//! behind. Dropping the network detaches every connection it still holds, so
//! feedback loops (`A.out -> A.in`) do not keep their channels alive.

use core::fmt;
use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};

use flowline_component::{
    Channel, ChannelEvent, Component, ComponentRegistry, Endpoint, Port,
};
use flowline_core::Clock;
use flowline_graph::{
    EdgeRecord, Graph, GraphMutation, GraphObserver, InitializerRecord, NodeRecord,
    ObserverError, PortRef,
};
use indexmap::IndexMap;
use parking_lot::RwLock;
use serde_json::Value;

use crate::compat::is_port_compatible;
use crate::error::{
    DefinitionError, EdgeDirection, HookError, IncompatibleTypeError, NetworkError,
};
use crate::hooks::{HookRegistry, HookTable};

// ─────────────────────────────────────────────────────────────────────────────
// ProcessRecord
// ─────────────────────────────────────────────────────────────────────────────

/// A named, live component instance.
pub struct ProcessRecord {
    id: String,
    component: Option<Arc<dyn Component>>,
}

impl ProcessRecord {
    /// Returns the process id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the component instance, if the node declared one.
    #[must_use]
    pub fn component(&self) -> Option<&Arc<dyn Component>> {
        self.component.as_ref()
    }

    fn component_or_err(&self) -> Result<&Arc<dyn Component>, DefinitionError> {
        self.component
            .as_ref()
            .ok_or_else(|| DefinitionError::MissingComponent {
                process: self.id.clone(),
            })
    }

    fn out_port(&self, port: &str) -> Result<&Port, DefinitionError> {
        self.component_or_err()?
            .out_ports()
            .get(port)
            .ok_or_else(|| DefinitionError::MissingOutPort {
                process: self.id.clone(),
                port: port.to_string(),
            })
    }

    fn in_port(&self, port: &str) -> Result<&Port, DefinitionError> {
        self.component_or_err()?
            .in_ports()
            .get(port)
            .ok_or_else(|| DefinitionError::MissingInPort {
                process: self.id.clone(),
                port: port.to_string(),
            })
    }
}

impl fmt::Debug for ProcessRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessRecord")
            .field("id", &self.id)
            .field(
                "component",
                &self.component.as_ref().map(|component| component.description()),
            )
            .finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Connection
// ─────────────────────────────────────────────────────────────────────────────

/// One end of a [`Connection`].
#[derive(Debug, Clone)]
pub struct ConnectionEnd {
    process: Arc<ProcessRecord>,
    port: String,
}

impl ConnectionEnd {
    /// Returns the process as it was when the connection was wired.
    #[must_use]
    pub fn process(&self) -> &Arc<ProcessRecord> {
        &self.process
    }

    /// Returns the port name.
    #[must_use]
    pub fn port(&self) -> &str {
        &self.port
    }

    fn port_ref(&self) -> PortRef {
        PortRef::new(self.process.id(), self.port.as_str())
    }
}

/// A live channel between two process ports, or from a seed to a port.
#[derive(Debug, Clone)]
pub struct Connection {
    channel: Arc<Channel>,
    from: Option<ConnectionEnd>,
    to: ConnectionEnd,
}

impl Connection {
    /// Returns the channel.
    #[must_use]
    pub fn channel(&self) -> &Arc<Channel> {
        &self.channel
    }

    /// Returns the source end, absent for seeds.
    #[must_use]
    pub fn from(&self) -> Option<&ConnectionEnd> {
        self.from.as_ref()
    }

    /// Returns the target end.
    #[must_use]
    pub fn to(&self) -> &ConnectionEnd {
        &self.to
    }

    /// Returns the channel identity, e.g. `A.out:B.in` or `ANON:B.in`.
    #[must_use]
    pub fn identity(&self) -> String {
        self.channel.identity()
    }

    fn matches(&self, edge: &EdgeRecord) -> bool {
        let from = self.from.as_ref().map(ConnectionEnd::port_ref);
        edge.matches(from.as_ref(), &self.to.port_ref())
    }

    fn touches(&self, process: &str) -> bool {
        self.to.process.id() == process
            || self
                .from
                .as_ref()
                .is_some_and(|from| from.process.id() == process)
    }

    /// Detaches the channel from both of its ports.
    fn detach(&self) {
        if let Some(from) = &self.from
            && let Ok(port) = from.process.out_port(&from.port)
        {
            port.detach(&self.channel);
        }
        if let Ok(port) = self.to.process.in_port(&self.to.port) {
            port.detach(&self.channel);
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// NetworkBuilder
// ─────────────────────────────────────────────────────────────────────────────

/// Configures a [`Network`] before it replays its graph.
///
/// # Example
///
/// ```
/// use flowline_component::{ChannelEvent, ComponentRegistry};
/// use flowline_graph::Graph;
/// use flowline_network::{HookRegistry, Network};
/// use std::sync::Arc;
///
/// let hooks = HookRegistry::new();
/// hooks.hook("data", "trace", |event: &ChannelEvent<'_>| {
///     tracing::trace!(%event, "packet");
/// })?;
///
/// let graph = Arc::new(Graph::new("empty"));
/// let network = Network::builder(graph)
///     .components(ComponentRegistry::with_core_components())
///     .hooks(hooks)
///     .build()?;
///
/// assert_eq!(network.connection_count(), 0);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct NetworkBuilder {
    graph: Arc<Graph>,
    components: Arc<ComponentRegistry>,
    hooks: HookRegistry,
    clock: Clock,
}

impl NetworkBuilder {
    fn new(graph: Arc<Graph>) -> Self {
        Self {
            graph,
            components: Arc::new(ComponentRegistry::with_core_components()),
            hooks: HookRegistry::new(),
            clock: Clock::default(),
        }
    }

    /// Sets the registry component type names resolve through.
    ///
    /// Defaults to [`ComponentRegistry::with_core_components`].
    #[must_use]
    pub fn components(mut self, registry: ComponentRegistry) -> Self {
        self.components = Arc::new(registry);
        self
    }

    /// Shares an existing registry between networks.
    #[must_use]
    pub fn shared_components(mut self, registry: Arc<ComponentRegistry>) -> Self {
        self.components = registry;
        self
    }

    /// Sets the hooks attached to every channel, including initial-value
    /// channels wired during [`build`](Self::build).
    #[must_use]
    pub fn hooks(mut self, hooks: HookRegistry) -> Self {
        self.hooks = hooks;
        self
    }

    /// Sets the clock [`Network::uptime`] is measured on.
    #[must_use]
    pub fn clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Builds the network, subscribes it to the graph, and replays the
    /// graph's nodes, edges, and initializers.
    ///
    /// # Errors
    ///
    /// Returns the first [`NetworkError`] raised while replaying.
    pub fn build(self) -> Result<Arc<Network>, NetworkError> {
        let started = self.clock.now();
        let network = Arc::new(Network {
            graph: self.graph,
            components: self.components,
            hooks: self.hooks,
            processes: RwLock::new(IndexMap::new()),
            connections: RwLock::new(Vec::new()),
            clock: self.clock,
            started,
        });

        let weak = Arc::downgrade(&network);
        let observer: Weak<dyn GraphObserver> = weak;
        network.graph.subscribe(observer);

        for node in network.graph.nodes() {
            network.add_node(&node)?;
        }
        for edge in network.graph.edges() {
            network.add_edge(&edge)?;
        }
        for initializer in network.graph.initializers() {
            network.add_initial(&initializer)?;
        }

        tracing::debug!(
            graph = %network.graph.name(),
            processes = network.process_count(),
            connections = network.connection_count(),
            "network created"
        );
        Ok(network)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Network
// ─────────────────────────────────────────────────────────────────────────────

/// A graph assembled into live processes and channels.
pub struct Network {
    graph: Arc<Graph>,
    components: Arc<ComponentRegistry>,
    hooks: HookRegistry,
    processes: RwLock<IndexMap<String, Arc<ProcessRecord>>>,
    connections: RwLock<Vec<Connection>>,
    clock: Clock,
    started: Instant,
}

impl Network {
    /// Creates a network over `graph` with the core components and no hooks.
    ///
    /// # Errors
    ///
    /// Returns the first [`NetworkError`] raised while replaying the graph.
    pub fn create(graph: Arc<Graph>) -> Result<Arc<Self>, NetworkError> {
        Self::builder(graph).build()
    }

    /// Returns a builder for a network over `graph`.
    #[must_use]
    pub fn builder(graph: Arc<Graph>) -> NetworkBuilder {
        NetworkBuilder::new(graph)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Processes
    // ─────────────────────────────────────────────────────────────────────────

    /// Adds a process for `node`. Adding an id that already exists returns the
    /// existing process and changes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`DefinitionError::ComponentNotFound`] or
    /// [`DefinitionError::InvalidComponent`] if the component type does not
    /// resolve.
    pub fn add_node(&self, node: &NodeRecord) -> Result<Arc<ProcessRecord>, NetworkError> {
        if let Some(existing) = self.get_node(&node.id) {
            return Ok(existing);
        }

        let component = match &node.component {
            Some(name) => Some(self.components.resolve(name).map_err(|err| {
                let err = DefinitionError::from(err);
                tracing::warn!(process = %node.id, error = %err, "process rejected");
                err
            })?),
            None => None,
        };

        let process = Arc::clone(
            self.processes
                .write()
                .entry(node.id.clone())
                .or_insert_with(|| {
                    Arc::new(ProcessRecord {
                        id: node.id.clone(),
                        component,
                    })
                }),
        );

        tracing::debug!(
            process = %node.id,
            component = node.component.as_deref().unwrap_or("-"),
            "process added"
        );
        Ok(process)
    }

    /// Removes a process. Returns false if no such process exists.
    ///
    /// Connections touching the process are left in place; use
    /// [`disconnect_process`](Self::disconnect_process) to drop them.
    pub fn remove_node(&self, id: &str) -> bool {
        let removed = self.processes.write().shift_remove(id).is_some();
        if removed {
            tracing::debug!(process = %id, "process removed");
        }
        removed
    }

    /// Drops every connection with either end on the process and returns how
    /// many were dropped.
    pub fn disconnect_process(&self, id: &str) -> usize {
        let removed = self.take_connections(|connection| connection.touches(id));
        tracing::debug!(process = %id, connections = removed, "process disconnected");
        removed
    }

    /// Returns the process with this id.
    #[must_use]
    pub fn get_node(&self, id: &str) -> Option<Arc<ProcessRecord>> {
        self.processes.read().get(id).cloned()
    }

    /// Returns process ids in insertion order.
    #[must_use]
    pub fn process_ids(&self) -> Vec<String> {
        self.processes.read().keys().cloned().collect()
    }

    /// Returns the number of processes.
    #[must_use]
    pub fn process_count(&self) -> usize {
        self.processes.read().len()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Edges
    // ─────────────────────────────────────────────────────────────────────────

    /// Wires an edge. A source-less edge is delivered as an initial value
    /// (its `data`, or `null`).
    ///
    /// # Errors
    ///
    /// - [`DefinitionError::MissingProcess`] if either process is unknown.
    /// - Any error from [`connect_ports`](Self::connect_ports).
    pub fn add_edge(&self, edge: &EdgeRecord) -> Result<(), NetworkError> {
        let Some(from) = &edge.from else {
            let data = edge.data.clone().unwrap_or(Value::Null);
            return self.add_initial(&InitializerRecord::new(data, edge.to.clone()));
        };

        let from_process = self.process_for(&from.node, EdgeDirection::Outbound)?;
        let to_process = self.process_for(&edge.to.node, EdgeDirection::Inbound)?;

        let channel = Arc::new(Channel::between(
            Endpoint::new(from.node.as_str(), from.port.as_str()),
            Endpoint::new(edge.to.node.as_str(), edge.to.port.as_str()),
        ));

        if let Err(err) =
            self.connect_ports(&channel, &from_process, &from.port, &to_process, &edge.to.port)
        {
            tracing::warn!(edge = %edge, error = %err, "edge rejected");
            return Err(err);
        }
        self.hooks.add_hooks(&channel);

        tracing::debug!(connection = %channel.identity(), "edge wired");
        self.connections.write().push(Connection {
            channel,
            from: Some(ConnectionEnd {
                process: from_process,
                port: from.port.clone(),
            }),
            to: ConnectionEnd {
                process: to_process,
                port: edge.to.port.clone(),
            },
        });
        Ok(())
    }

    /// Attaches `channel` to an output port and an input port after checking
    /// both exist and their datatypes are compatible.
    ///
    /// Nothing is attached when an error is returned.
    ///
    /// # Errors
    ///
    /// - [`DefinitionError::MissingComponent`], [`DefinitionError::MissingOutPort`]
    ///   or [`DefinitionError::MissingInPort`] for unknown ports.
    /// - [`IncompatibleTypeError`] if the datatypes do not match.
    pub fn connect_ports(
        &self,
        channel: &Arc<Channel>,
        from: &ProcessRecord,
        from_port: &str,
        to: &ProcessRecord,
        to_port: &str,
    ) -> Result<(), NetworkError> {
        let outport = from.out_port(from_port)?;
        let inport = to.in_port(to_port)?;

        let from_type = outport.datatype();
        let to_type = inport.datatype();
        if !is_port_compatible(&from_type, &to_type) {
            return Err(IncompatibleTypeError {
                from_process: from.id().to_string(),
                from_port: from_port.to_string(),
                from_type,
                to_process: to.id().to_string(),
                to_port: to_port.to_string(),
                to_type,
            }
            .into());
        }

        outport.attach(channel);
        inport.attach(channel);
        Ok(())
    }

    /// Attaches `channel` to an input port. No datatype check is made.
    ///
    /// # Errors
    ///
    /// Returns [`DefinitionError::MissingComponent`] or
    /// [`DefinitionError::MissingInPort`] for an unknown port.
    pub fn connect_inbound_port(
        &self,
        channel: &Arc<Channel>,
        to: &ProcessRecord,
        port: &str,
    ) -> Result<(), NetworkError> {
        to.in_port(port)?.attach(channel);
        Ok(())
    }

    /// Removes every connection matching `edge` and detaches each from its
    /// ports. Returns how many were removed.
    ///
    /// A connection matches when its target equals `edge.to` and, if
    /// `edge.from` is set, its source equals `edge.from`.
    pub fn remove_edge(&self, edge: &EdgeRecord) -> usize {
        let removed = self.take_connections(|connection| connection.matches(edge));
        tracing::debug!(edge = %edge, connections = removed, "edge removed");
        removed
    }

    /// Delivers an initial value: wires a seed channel to the target port,
    /// then connects, sends, and disconnects it.
    ///
    /// # Errors
    ///
    /// - [`DefinitionError::MissingProcess`] if the target process is unknown.
    /// - Any error from [`connect_inbound_port`](Self::connect_inbound_port).
    pub fn add_initial(&self, initializer: &InitializerRecord) -> Result<(), NetworkError> {
        let to = &initializer.to;
        let to_process = self.process_for(&to.node, EdgeDirection::Inbound)?;

        let channel = Arc::new(Channel::seed(Endpoint::new(
            to.node.as_str(),
            to.port.as_str(),
        )));
        if let Err(err) = self.connect_inbound_port(&channel, &to_process, &to.port) {
            tracing::warn!(initial = %initializer, error = %err, "initial rejected");
            return Err(err);
        }
        self.hooks.add_hooks(&channel);

        channel.connect();
        channel.send(initializer.data());
        channel.disconnect();

        tracing::debug!(connection = %channel.identity(), "initial delivered");
        self.connections.write().push(Connection {
            channel,
            from: None,
            to: ConnectionEnd {
                process: to_process,
                port: to.port.clone(),
            },
        });
        Ok(())
    }

    /// Returns a snapshot of the live connections in wiring order.
    #[must_use]
    pub fn connections(&self) -> Vec<Connection> {
        self.connections.read().clone()
    }

    /// Returns the number of live connections.
    #[must_use]
    pub fn connection_count(&self) -> usize {
        self.connections.read().len()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Hooks
    // ─────────────────────────────────────────────────────────────────────────

    /// Registers a hook on the network's [`HookRegistry`].
    ///
    /// The hook reaches channels wired after this call.
    ///
    /// # Errors
    ///
    /// See [`HookRegistry::hook`].
    pub fn hook<F>(
        &self,
        category: &str,
        name: impl Into<String>,
        callback: F,
    ) -> Result<&Self, HookError>
    where
        F: Fn(&ChannelEvent<'_>) + Send + Sync + 'static,
    {
        self.hooks.hook(category, name, callback)?;
        Ok(self)
    }

    /// Returns a snapshot of the registered hooks.
    #[must_use]
    pub fn hooks(&self) -> HookTable {
        self.hooks.hooks()
    }

    /// Returns the network's hook registry.
    #[must_use]
    pub fn hook_registry(&self) -> &HookRegistry {
        &self.hooks
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Introspection
    // ─────────────────────────────────────────────────────────────────────────

    /// Returns the graph this network mirrors.
    #[must_use]
    pub fn graph(&self) -> &Arc<Graph> {
        &self.graph
    }

    /// Returns the component registry.
    #[must_use]
    pub fn components(&self) -> &Arc<ComponentRegistry> {
        &self.components
    }

    /// Returns the time elapsed since the network was created.
    #[must_use]
    pub fn uptime(&self) -> Duration {
        self.clock.elapsed_since(self.started)
    }

    fn process_for(
        &self,
        node: &str,
        direction: EdgeDirection,
    ) -> Result<Arc<ProcessRecord>, DefinitionError> {
        self.get_node(node)
            .ok_or_else(|| DefinitionError::MissingProcess {
                node: node.to_string(),
                direction,
            })
    }

    /// Removes matching connections, keeping the rest in order, and detaches
    /// each removed one after the lock is released.
    fn take_connections(&self, matches: impl Fn(&Connection) -> bool) -> usize {
        let removed: Vec<Connection> = {
            let mut connections = self.connections.write();
            let (removed, kept): (Vec<_>, Vec<_>) =
                connections.drain(..).partition(|connection| matches(connection));
            *connections = kept;
            removed
        };
        for connection in &removed {
            connection.detach();
        }
        removed.len()
    }
}

impl GraphObserver for Network {
    fn on_mutation(&self, mutation: &GraphMutation) -> Result<(), ObserverError> {
        match mutation {
            GraphMutation::AddNode(node) => {
                self.add_node(node)?;
            }
            GraphMutation::RemoveNode(node) => {
                self.remove_node(&node.id);
            }
            GraphMutation::AddEdge(edge) => self.add_edge(edge)?,
            GraphMutation::RemoveEdge(edge) => {
                self.remove_edge(edge);
            }
            GraphMutation::AddInitial(initializer) => self.add_initial(initializer)?,
        }
        Ok(())
    }
}

impl Drop for Network {
    fn drop(&mut self) {
        for connection in self.connections.get_mut().drain(..) {
            connection.detach();
        }
    }
}

impl fmt::Debug for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Network")
            .field("graph", &self.graph.name())
            .field("processes", &self.process_ids())
            .field("connections", &self.connection_count())
            .field("hooks", &self.hooks)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowline_component::{EventCategory, PortSet};
    use serde_json::json;

    struct Typed {
        inports: PortSet,
        outports: PortSet,
    }

    impl Typed {
        fn new(in_type: &str, out_type: &str) -> Self {
            Self {
                inports: PortSet::new().with(Port::input("in").with_datatype(in_type)),
                outports: PortSet::new().with(Port::output("out").with_datatype(out_type)),
            }
        }
    }

    impl Component for Typed {
        fn in_ports(&self) -> &PortSet {
            &self.inports
        }

        fn out_ports(&self) -> &PortSet {
            &self.outports
        }
    }

    fn registry() -> ComponentRegistry {
        let mut registry = ComponentRegistry::with_core_components();
        registry
            .register("test/Ints", || Typed::new("int", "int"))
            .unwrap();
        registry
            .register("test/Strings", || Typed::new("string", "string"))
            .unwrap();
        registry
    }

    fn network() -> Arc<Network> {
        Network::builder(Arc::new(Graph::new("test")))
            .components(registry())
            .build()
            .unwrap()
    }

    fn edge(from: &str, to: &str) -> EdgeRecord {
        EdgeRecord::new(PortRef::new(from, "out"), PortRef::new(to, "in"))
    }

    #[test]
    fn add_node_is_idempotent() {
        let network = network();
        let first = network.add_node(&NodeRecord::new("A", "Forward")).unwrap();
        let second = network.add_node(&NodeRecord::new("A", "Output")).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(network.process_ids(), vec!["A"]);
    }

    #[test]
    fn unknown_component_is_a_definition_error() {
        let network = network();
        let err = network
            .add_node(&NodeRecord::new("A", "nope/Missing"))
            .unwrap_err();

        assert_eq!(
            err,
            NetworkError::Definition(DefinitionError::ComponentNotFound(
                "nope/Missing".to_string()
            ))
        );
        assert!(network.get_node("A").is_none());
    }

    #[test]
    fn bare_node_has_no_component() {
        let network = network();
        network.add_node(&NodeRecord::bare("A")).unwrap();
        network.add_node(&NodeRecord::new("B", "Forward")).unwrap();

        let err = network.add_edge(&edge("A", "B")).unwrap_err();
        assert_eq!(
            err,
            NetworkError::Definition(DefinitionError::MissingComponent {
                process: "A".to_string()
            })
        );
    }

    #[test]
    fn missing_processes_name_the_direction() {
        let network = network();
        network.add_node(&NodeRecord::new("B", "Forward")).unwrap();

        let err = network.add_edge(&edge("A", "B")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "No process defined for outbound node A"
        );

        let err = network.add_edge(&edge("B", "C")).unwrap_err();
        assert_eq!(err.to_string(), "No process defined for inbound node C");
    }

    #[test]
    fn missing_ports_are_definition_errors() {
        let network = network();
        network.add_node(&NodeRecord::new("A", "Forward")).unwrap();
        network.add_node(&NodeRecord::new("B", "Forward")).unwrap();

        let bad_out = EdgeRecord::new(PortRef::new("A", "nope"), PortRef::new("B", "in"));
        assert!(matches!(
            network.add_edge(&bad_out),
            Err(NetworkError::Definition(DefinitionError::MissingOutPort { .. }))
        ));

        let bad_in = EdgeRecord::new(PortRef::new("A", "out"), PortRef::new("B", "nope"));
        assert!(matches!(
            network.add_edge(&bad_in),
            Err(NetworkError::Definition(DefinitionError::MissingInPort { .. }))
        ));
        assert_eq!(network.connection_count(), 0);
    }

    #[test]
    fn incompatible_types_attach_nothing() {
        let network = network();
        let ints = network.add_node(&NodeRecord::new("A", "test/Ints")).unwrap();
        let strings = network.add_node(&NodeRecord::new("B", "test/Strings")).unwrap();

        let err = network.add_edge(&edge("A", "B")).unwrap_err();
        let err = match err {
            NetworkError::IncompatibleType(err) => err,
            other => panic!("expected an incompatible type error, got {other:?}"),
        };
        assert_eq!(err.from_type, "int");
        assert_eq!(err.to_type, "string");

        assert_eq!(network.connection_count(), 0);
        let outport = ints.component().unwrap().out_ports().get("out").unwrap();
        let inport = strings.component().unwrap().in_ports().get("in").unwrap();
        assert_eq!(outport.attached_count(), 0);
        assert_eq!(inport.attached_count(), 0);
    }

    #[test]
    fn compatible_edge_attaches_both_ports() {
        let network = network();
        let a = network.add_node(&NodeRecord::new("A", "test/Ints")).unwrap();
        let b = network.add_node(&NodeRecord::new("B", "Forward")).unwrap();

        network.add_edge(&edge("A", "B")).unwrap();

        let connections = network.connections();
        assert_eq!(connections.len(), 1);
        assert_eq!(connections[0].identity(), "A.out:B.in");
        let channel = connections[0].channel();
        assert!(a.component().unwrap().out_ports().get("out").unwrap().is_attached(channel));
        assert!(b.component().unwrap().in_ports().get("in").unwrap().is_attached(channel));
    }

    #[test]
    fn initial_has_no_datatype_check() {
        let network = network();
        network.add_node(&NodeRecord::new("A", "test/Ints")).unwrap();

        network
            .add_initial(&InitializerRecord::new(json!("not an int"), PortRef::new("A", "in")))
            .unwrap();

        let connections = network.connections();
        assert_eq!(connections.len(), 1);
        assert_eq!(connections[0].identity(), "ANON:A.in");
        assert!(connections[0].from().is_none());
        assert!(!connections[0].channel().is_connected());
    }

    #[test]
    fn sourceless_edge_is_delivered_as_initial() {
        let network = network();
        network.add_node(&NodeRecord::new("A", "Output")).unwrap();

        network
            .add_edge(&EdgeRecord::seed(json!(3), PortRef::new("A", "in")))
            .unwrap();

        assert_eq!(network.connections()[0].identity(), "ANON:A.in");
    }

    #[test]
    fn remove_node_does_not_cascade() {
        let network = network();
        network.add_node(&NodeRecord::new("A", "Forward")).unwrap();
        network.add_node(&NodeRecord::new("B", "Forward")).unwrap();
        network.add_edge(&edge("A", "B")).unwrap();

        assert!(network.remove_node("A"));
        assert!(!network.remove_node("A"));
        assert_eq!(network.connection_count(), 1);
        assert_eq!(network.connections()[0].from().unwrap().process().id(), "A");

        assert_eq!(network.disconnect_process("A"), 1);
        assert_eq!(network.connection_count(), 0);
    }

    #[test]
    fn graph_mutations_reach_the_network() {
        let graph = Arc::new(Graph::new("live"));
        let network = Network::builder(Arc::clone(&graph))
            .components(registry())
            .build()
            .unwrap();

        graph.add_node(NodeRecord::new("A", "Forward")).unwrap();
        graph.add_node(NodeRecord::new("B", "Output")).unwrap();
        graph.add_edge(edge("A", "B")).unwrap();
        assert_eq!(network.connection_count(), 1);

        graph.remove_node("B").unwrap();
        assert_eq!(network.connection_count(), 0);
        assert_eq!(network.process_ids(), vec!["A"]);
    }

    #[test]
    fn graph_surfaces_network_rejections() {
        let graph = Arc::new(Graph::new("live"));
        let _network = Network::create(Arc::clone(&graph)).unwrap();

        let err = graph.add_edge(edge("A", "B")).unwrap_err();
        assert!(err.to_string().contains("No process defined for outbound node A"));
    }

    #[test]
    fn hooks_reach_later_channels_only() {
        let network = network();
        network.add_node(&NodeRecord::new("A", "Output")).unwrap();
        network
            .add_initial(&InitializerRecord::new(json!(1), PortRef::new("A", "in")))
            .unwrap();

        network.hook("data", "noop", |_: &ChannelEvent<'_>| {}).unwrap();
        network
            .add_initial(&InitializerRecord::new(json!(2), PortRef::new("A", "in")))
            .unwrap();

        // One observer is the input port's forwarder.
        let connections = network.connections();
        assert_eq!(connections[0].channel().observer_count(EventCategory::Data), 1);
        assert_eq!(connections[1].channel().observer_count(EventCategory::Data), 2);
        assert_eq!(network.hooks().len(), 1);
    }
}
