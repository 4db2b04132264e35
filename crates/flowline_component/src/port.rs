//! Ports: typed, named attachment points on a component.
//!
//! An input port forwards every event arriving on its attached channels to
//! the listeners registered by component code. An output port records its
//! attached channels so component code can emit on all of them at once.
//!
//! [`Port`] is a cheap handle (`Arc` inside): a component keeps clones of its
//! own ports inside listener closures, while the network reaches the same
//! ports through [`PortSet::get`].
//!
//! An output port holds its channels strongly, and an input port's listeners
//! may hold output ports. A channel wired from a component's output back to
//! one of its own inputs therefore lives until it is detached from a port.

use core::fmt;
use std::sync::Arc;

use hashbrown::HashMap;
use indexmap::IndexMap;
use parking_lot::RwLock;
use serde_json::Value;

use crate::channel::{Channel, Observer, ObserverId};
use crate::event::{ChannelEvent, EventCategory};

/// Datatype every port accepts when none is declared.
pub const DEFAULT_DATATYPE: &str = "all";

/// Attribute key holding a port's datatype.
pub const DATATYPE_ATTRIBUTE: &str = "datatype";

/// Direction of a port relative to its component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortDirection {
    /// Receives packets.
    Input,
    /// Emits packets.
    Output,
}

impl fmt::Display for PortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortDirection::Input => f.write_str("inport"),
            PortDirection::Output => f.write_str("outport"),
        }
    }
}

struct Attachment {
    channel: Arc<Channel>,
    /// Forwarding observers this port installed on the channel.
    observers: Vec<ObserverId>,
}

type Listeners = Arc<RwLock<Vec<(EventCategory, Observer)>>>;

struct PortInner {
    name: String,
    direction: PortDirection,
    attributes: RwLock<HashMap<String, String>>,
    attachments: RwLock<Vec<Attachment>>,
    listeners: Listeners,
}

/// A typed, named attachment point on a component.
#[derive(Clone)]
pub struct Port {
    inner: Arc<PortInner>,
}

impl Port {
    fn new(name: impl Into<String>, direction: PortDirection) -> Self {
        Self {
            inner: Arc::new(PortInner {
                name: name.into(),
                direction,
                attributes: RwLock::new(HashMap::new()),
                attachments: RwLock::new(Vec::new()),
                listeners: Arc::new(RwLock::new(Vec::new())),
            }),
        }
    }

    /// Creates an input port.
    #[must_use]
    pub fn input(name: impl Into<String>) -> Self {
        Self::new(name, PortDirection::Input)
    }

    /// Creates an output port.
    #[must_use]
    pub fn output(name: impl Into<String>) -> Self {
        Self::new(name, PortDirection::Output)
    }

    /// Sets the declared datatype.
    #[must_use]
    pub fn with_datatype(self, datatype: impl Into<String>) -> Self {
        self.with_attribute(DATATYPE_ATTRIBUTE, datatype)
    }

    /// Sets a human-readable description.
    #[must_use]
    pub fn with_description(self, description: impl Into<String>) -> Self {
        self.with_attribute("description", description)
    }

    /// Sets an arbitrary attribute.
    #[must_use]
    pub fn with_attribute(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.inner
            .attributes
            .write()
            .insert(key.into(), value.into());
        self
    }

    /// Returns the port name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Returns the port direction.
    #[must_use]
    pub fn direction(&self) -> PortDirection {
        self.inner.direction
    }

    /// Returns an attribute value.
    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<String> {
        self.inner.attributes.read().get(key).cloned()
    }

    /// Returns the declared datatype, or `"all"` when none was declared.
    #[must_use]
    pub fn datatype(&self) -> String {
        self.attribute(DATATYPE_ATTRIBUTE)
            .unwrap_or_else(|| DEFAULT_DATATYPE.to_string())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Wiring
    // ─────────────────────────────────────────────────────────────────────────

    /// Attaches a channel. Attaching the same channel twice is a no-op.
    pub fn attach(&self, channel: &Arc<Channel>) {
        let mut attachments = self.inner.attachments.write();
        if attachments
            .iter()
            .any(|attachment| attachment.channel.id() == channel.id())
        {
            return;
        }

        let observers = match self.inner.direction {
            PortDirection::Input => {
                let forward = forwarder(Arc::clone(&self.inner.listeners));
                EventCategory::ALL
                    .into_iter()
                    .map(|category| channel.on_shared(category, Arc::clone(&forward)))
                    .collect()
            }
            PortDirection::Output => Vec::new(),
        };

        tracing::trace!(
            port = %self.inner.name,
            direction = %self.inner.direction,
            channel = %channel.identity(),
            "channel attached"
        );

        attachments.push(Attachment {
            channel: Arc::clone(channel),
            observers,
        });
    }

    /// Detaches a channel. Returns false if it was not attached.
    pub fn detach(&self, channel: &Channel) -> bool {
        let removed = {
            let mut attachments = self.inner.attachments.write();
            let Some(index) = attachments
                .iter()
                .position(|attachment| attachment.channel.id() == channel.id())
            else {
                return false;
            };
            attachments.remove(index)
        };

        for observer in removed.observers {
            removed.channel.off(observer);
        }

        tracing::trace!(
            port = %self.inner.name,
            direction = %self.inner.direction,
            channel = %channel.identity(),
            "channel detached"
        );
        true
    }

    /// Returns true if the channel is attached to this port.
    #[must_use]
    pub fn is_attached(&self, channel: &Channel) -> bool {
        self.inner
            .attachments
            .read()
            .iter()
            .any(|attachment| attachment.channel.id() == channel.id())
    }

    /// Returns the number of attached channels.
    #[must_use]
    pub fn attached_count(&self) -> usize {
        self.inner.attachments.read().len()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Component-side API
    // ─────────────────────────────────────────────────────────────────────────

    /// Registers a listener for events arriving on an input port.
    ///
    /// Listeners run after any listener registered earlier and see events
    /// from every attached channel.
    pub fn on<F>(&self, category: EventCategory, listener: F) -> &Self
    where
        F: Fn(&ChannelEvent<'_>) + Send + Sync + 'static,
    {
        self.inner
            .listeners
            .write()
            .push((category, Arc::new(listener)));
        self
    }

    /// Opens every attached channel of an output port.
    pub fn connect(&self) {
        self.emit(Channel::connect);
    }

    /// Sends a packet on every attached channel of an output port.
    pub fn send(&self, data: &Value) {
        self.emit(|channel| channel.send(data));
    }

    /// Opens a group on every attached channel of an output port.
    pub fn begin_group(&self, group: &str) {
        self.emit(|channel| channel.begin_group(group));
    }

    /// Closes a group on every attached channel of an output port.
    pub fn end_group(&self, group: &str) {
        self.emit(|channel| channel.end_group(group));
    }

    /// Closes every attached channel of an output port.
    pub fn disconnect(&self) {
        self.emit(Channel::disconnect);
    }

    fn emit(&self, op: impl Fn(&Channel)) {
        if self.inner.direction != PortDirection::Output {
            tracing::warn!(port = %self.inner.name, "cannot emit on an input port");
            return;
        }
        let channels: Vec<Arc<Channel>> = self
            .inner
            .attachments
            .read()
            .iter()
            .map(|attachment| Arc::clone(&attachment.channel))
            .collect();
        for channel in &channels {
            op(channel);
        }
    }
}

fn forwarder(listeners: Listeners) -> Observer {
    Arc::new(move |event: &ChannelEvent<'_>| {
        let category = event.category();
        let matching: Vec<Observer> = listeners
            .read()
            .iter()
            .filter(|(listens_to, _)| *listens_to == category)
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        for listener in &matching {
            listener(event);
        }
    })
}

impl fmt::Debug for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Port")
            .field("name", &self.inner.name)
            .field("direction", &self.inner.direction)
            .field("datatype", &self.datatype())
            .field("attached", &self.attached_count())
            .finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// PortSet
// ─────────────────────────────────────────────────────────────────────────────

/// Insertion-ordered collection of a component's ports in one direction.
#[derive(Debug, Clone, Default)]
pub struct PortSet {
    ports: IndexMap<String, Port>,
}

impl PortSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a port and returns the set, for building.
    #[must_use]
    pub fn with(mut self, port: Port) -> Self {
        self.add(port);
        self
    }

    /// Adds a port, replacing any port with the same name.
    pub fn add(&mut self, port: Port) {
        self.ports.insert(port.name().to_string(), port);
    }

    /// Returns true if a port with this name exists.
    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.ports.contains_key(name)
    }

    /// Returns the port with this name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Port> {
        self.ports.get(name)
    }

    /// Returns port names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.ports.keys().map(String::as_str)
    }

    /// Iterates over the ports in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Port> {
        self.ports.values()
    }

    /// Returns the number of ports.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ports.len()
    }

    /// Returns true if the set holds no ports.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ports.is_empty()
    }
}

impl FromIterator<Port> for PortSet {
    fn from_iter<I: IntoIterator<Item = Port>>(iter: I) -> Self {
        let mut set = Self::new();
        for port in iter {
            set.add(port);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::Endpoint;
    use parking_lot::Mutex;
    use serde_json::json;

    fn seed_channel() -> Arc<Channel> {
        Arc::new(Channel::seed(Endpoint::new("p", "in")))
    }

    #[test]
    fn datatype_defaults_to_all() {
        let port = Port::input("in");
        assert_eq!(port.datatype(), "all");
        assert_eq!(port.attribute("datatype"), None);

        let port = Port::output("out").with_datatype("int");
        assert_eq!(port.datatype(), "int");
        assert_eq!(port.attribute("datatype").as_deref(), Some("int"));
    }

    #[test]
    fn input_port_forwards_channel_events_to_listeners() {
        let port = Port::input("in");
        let received = Arc::new(Mutex::new(Vec::new()));
        {
            let received = Arc::clone(&received);
            port.on(EventCategory::Data, move |event: &ChannelEvent<'_>| {
                if let Some(data) = event.data() {
                    received.lock().push(data.clone());
                }
            });
        }

        let channel = seed_channel();
        port.attach(&channel);
        channel.send(&json!(42));

        assert_eq!(*received.lock(), vec![json!(42)]);
    }

    #[test]
    fn detach_stops_forwarding_and_removes_observers() {
        let port = Port::input("in");
        let hits = Arc::new(Mutex::new(0));
        {
            let hits = Arc::clone(&hits);
            port.on(EventCategory::Data, move |_: &ChannelEvent<'_>| {
                *hits.lock() += 1;
            });
        }

        let channel = seed_channel();
        port.attach(&channel);
        assert_eq!(channel.observer_count(EventCategory::Data), 1);

        assert!(port.detach(&channel));
        assert!(!port.is_attached(&channel));
        assert_eq!(channel.observer_count(EventCategory::Data), 0);

        channel.send(&json!(1));
        assert_eq!(*hits.lock(), 0);
        assert!(!port.detach(&channel));
    }

    #[test]
    fn attach_is_idempotent_per_channel() {
        let port = Port::input("in");
        let channel = seed_channel();

        port.attach(&channel);
        port.attach(&channel);

        assert_eq!(port.attached_count(), 1);
        assert_eq!(channel.observer_count(EventCategory::Connect), 1);
    }

    #[test]
    fn port_holds_many_channels() {
        let port = Port::input("in");
        let a = seed_channel();
        let b = seed_channel();

        port.attach(&a);
        port.attach(&b);
        assert_eq!(port.attached_count(), 2);

        port.detach(&a);
        assert!(!port.is_attached(&a));
        assert!(port.is_attached(&b));
    }

    #[test]
    fn output_port_emits_on_every_attached_channel() {
        let out = Port::output("out");
        let a = Arc::new(Channel::new(Some(Endpoint::new("p", "out")), None));
        let b = Arc::new(Channel::new(Some(Endpoint::new("p", "out")), None));
        out.attach(&a);
        out.attach(&b);

        let seen = Arc::new(Mutex::new(Vec::new()));
        for channel in [&a, &b] {
            let seen = Arc::clone(&seen);
            channel.on(EventCategory::Data, move |event: &ChannelEvent<'_>| {
                seen.lock().push(event.channel().id().clone());
            });
        }

        out.connect();
        out.send(&json!("x"));
        assert!(a.is_connected() && b.is_connected());
        assert_eq!(*seen.lock(), vec![a.id().clone(), b.id().clone()]);

        out.disconnect();
        assert!(!a.is_connected() && !b.is_connected());
    }

    #[test]
    fn input_port_refuses_to_emit() {
        let port = Port::input("in");
        let channel = seed_channel();
        port.attach(&channel);

        port.connect();
        assert!(!channel.is_connected());
    }

    #[test]
    fn port_set_lookup_and_order() {
        let set: PortSet = [Port::input("b"), Port::input("a")].into_iter().collect();

        assert!(set.has("a"));
        assert!(!set.has("c"));
        assert_eq!(set.get("b").map(Port::name), Some("b"));
        assert_eq!(set.names().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(set.len(), 2);
    }
}
