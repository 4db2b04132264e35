//! Message channels.
//!
//! A [`Channel`] links one producer port to one consumer port, or delivers an
//! anonymous seed value to a consumer port. It carries no queue: every
//! operation synchronously notifies the observers attached for that
//! [`EventCategory`], in attachment order, before returning.
//!
//! # Example
//!
//! ```
//! use flowline_component::channel::{Channel, Endpoint};
//! use flowline_component::event::{ChannelEvent, EventCategory};
//! use serde_json::json;
//!
//! let channel = Channel::between(Endpoint::new("reader", "out"), Endpoint::new("writer", "in"));
//! channel.on(EventCategory::Data, |event: &ChannelEvent<'_>| {
//!     println!("{event}");
//! });
//!
//! channel.connect();
//! channel.send(&json!("hello"));
//! channel.disconnect();
//! assert_eq!(channel.identity(), "reader.out:writer.in");
//! ```

use core::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use parking_lot::RwLock;
use serde_json::Value;

use crate::event::{ChannelEvent, EventCategory};

/// Shared observer callback.
///
/// Observers are reference-counted so one callback can be attached to many
/// channels (hooks) or to every category of one channel (input ports).
pub type Observer = Arc<dyn Fn(&ChannelEvent<'_>) + Send + Sync>;

// ─────────────────────────────────────────────────────────────────────────────
// Identifiers
// ─────────────────────────────────────────────────────────────────────────────

/// Unique identifier for a channel.
///
/// Channel IDs are generated using nanoid, so channels created by different
/// networks never collide.
///
/// Internally uses `Arc<str>` for cheap cloning (reference count bump only).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChannelId(Arc<str>);

impl ChannelId {
    /// Creates a new channel ID with a unique nanoid.
    #[must_use]
    pub fn new() -> Self {
        Self(nanoid::nanoid!().into())
    }

    /// Returns the ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ChannelId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "channel_{}", self.0)
    }
}

/// Handle returned by [`Channel::on`], used to detach the observer again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(usize);

/// One end of a channel: a process id and one of its port names.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Endpoint {
    /// Process id.
    pub process: String,
    /// Port name on that process.
    pub port: String,
}

impl Endpoint {
    /// Creates an endpoint.
    #[must_use]
    pub fn new(process: impl Into<String>, port: impl Into<String>) -> Self {
        Self {
            process: process.into(),
            port: port.into(),
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.process, self.port)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Channel
// ─────────────────────────────────────────────────────────────────────────────

struct ObserverEntry {
    id: ObserverId,
    category: EventCategory,
    observer: Observer,
}

/// A unidirectional conduit between two ports that fans lifecycle events out
/// to its observers.
///
/// None of the operations fail. If an observer panics, the panic unwinds
/// through the caller and the remaining observers for that event do not run.
pub struct Channel {
    id: ChannelId,
    from: Option<Endpoint>,
    to: Option<Endpoint>,
    connected: AtomicBool,
    observers: RwLock<Vec<ObserverEntry>>,
    next_observer: AtomicUsize,
}

impl Channel {
    /// Creates a channel with optional endpoints.
    #[must_use]
    pub fn new(from: Option<Endpoint>, to: Option<Endpoint>) -> Self {
        Self {
            id: ChannelId::new(),
            from,
            to,
            connected: AtomicBool::new(false),
            observers: RwLock::new(Vec::new()),
            next_observer: AtomicUsize::new(0),
        }
    }

    /// Creates a channel between a producer and a consumer.
    #[must_use]
    pub fn between(from: Endpoint, to: Endpoint) -> Self {
        Self::new(Some(from), Some(to))
    }

    /// Creates an anonymous channel that seeds a consumer with an initial value.
    #[must_use]
    pub fn seed(to: Endpoint) -> Self {
        Self::new(None, Some(to))
    }

    /// Returns the channel's unique ID.
    #[must_use]
    pub fn id(&self) -> &ChannelId {
        &self.id
    }

    /// Returns the producer endpoint, if bound.
    #[must_use]
    pub fn from(&self) -> Option<&Endpoint> {
        self.from.as_ref()
    }

    /// Returns the consumer endpoint, if bound.
    #[must_use]
    pub fn to(&self) -> Option<&Endpoint> {
        self.to.as_ref()
    }

    /// Returns a stable label derived from the endpoints.
    ///
    /// An unbound side renders as `ANON`, e.g. `ANON:counter.in` for a seed.
    #[must_use]
    pub fn identity(&self) -> String {
        match (&self.from, &self.to) {
            (Some(from), Some(to)) => format!("{from}:{to}"),
            (Some(from), None) => format!("{from}:ANON"),
            (None, Some(to)) => format!("ANON:{to}"),
            (None, None) => "ANON:ANON".to_string(),
        }
    }

    /// Returns true between [`connect`](Self::connect) and
    /// [`disconnect`](Self::disconnect).
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Observers
    // ─────────────────────────────────────────────────────────────────────────

    /// Attaches an observer for one category.
    pub fn on<F>(&self, category: EventCategory, observer: F) -> ObserverId
    where
        F: Fn(&ChannelEvent<'_>) + Send + Sync + 'static,
    {
        self.on_shared(category, Arc::new(observer))
    }

    /// Attaches an already-shared observer for one category.
    pub fn on_shared(&self, category: EventCategory, observer: Observer) -> ObserverId {
        let id = ObserverId(self.next_observer.fetch_add(1, Ordering::Relaxed));
        self.observers.write().push(ObserverEntry {
            id,
            category,
            observer,
        });
        id
    }

    /// Detaches an observer. Returns false if it was not attached.
    pub fn off(&self, id: ObserverId) -> bool {
        let mut observers = self.observers.write();
        match observers.iter().position(|entry| entry.id == id) {
            Some(index) => {
                observers.remove(index);
                true
            }
            None => false,
        }
    }

    /// Returns the number of observers attached for a category.
    #[must_use]
    pub fn observer_count(&self, category: EventCategory) -> usize {
        self.observers
            .read()
            .iter()
            .filter(|entry| entry.category == category)
            .count()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Lifecycle
    // ─────────────────────────────────────────────────────────────────────────

    /// Marks the channel active and notifies `connect` observers.
    pub fn connect(&self) {
        self.connected.store(true, Ordering::Release);
        self.dispatch(&ChannelEvent::Connect { channel: self });
    }

    /// Notifies `data` observers with the packet.
    pub fn send(&self, data: &Value) {
        self.dispatch(&ChannelEvent::Data {
            data,
            channel: self,
        });
    }

    /// Notifies `beginGroup` observers.
    pub fn begin_group(&self, group: &str) {
        self.dispatch(&ChannelEvent::BeginGroup {
            group,
            channel: self,
        });
    }

    /// Notifies `endGroup` observers.
    pub fn end_group(&self, group: &str) {
        self.dispatch(&ChannelEvent::EndGroup {
            group,
            channel: self,
        });
    }

    /// Marks the channel inactive and notifies `disconnect` observers.
    pub fn disconnect(&self) {
        self.connected.store(false, Ordering::Release);
        self.dispatch(&ChannelEvent::Disconnect { channel: self });
    }

    fn dispatch(&self, event: &ChannelEvent<'_>) {
        let category = event.category();
        // Snapshot so observers may attach, detach, or send without deadlocking.
        let observers: Vec<Observer> = self
            .observers
            .read()
            .iter()
            .filter(|entry| entry.category == category)
            .map(|entry| Arc::clone(&entry.observer))
            .collect();

        tracing::trace!(
            channel = %self.identity(),
            event = %category,
            observers = observers.len(),
            "channel dispatch"
        );

        for observer in &observers {
            observer(event);
        }
    }
}

impl fmt::Debug for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Channel")
            .field("id", &self.id)
            .field("identity", &self.identity())
            .field("connected", &self.is_connected())
            .field("observers", &self.observers.read().len())
            .finish()
    }
}
