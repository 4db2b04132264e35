//! Shared test utilities for `flowline_network` integration tests.
//!
//! This module provides fixture components and recording hooks used across
//! multiple test files. Import via `mod test_utils;` in test files.

#![allow(
    dead_code,
    missing_docs,
    reason = "shared test utilities; not every item is used in every test binary"
)]

use std::sync::Arc;

use flowline_component::{
    ChannelEvent, Component, ComponentRegistry, EventCategory, Port, PortSet,
};
use flowline_graph::{EdgeRecord, Graph, PortRef};
use flowline_network::{HookRegistry, Network};
use parking_lot::Mutex;
use serde_json::Value;

// ═══════════════════════════════════════════════════════════════════════════════
// FIXTURE COMPONENTS
// ═══════════════════════════════════════════════════════════════════════════════

/// A component with one typed `in` port and one typed `out` port that relays
/// data from `in` to `out`.
pub struct Typed {
    inports: PortSet,
    outports: PortSet,
}

impl Typed {
    pub fn new(in_type: &str, out_type: &str) -> Self {
        let input = Port::input("in").with_datatype(in_type);
        let output = Port::output("out").with_datatype(out_type);
        {
            let output = output.clone();
            input.on(EventCategory::Data, move |event: &ChannelEvent<'_>| {
                if let Some(data) = event.data() {
                    output.send(data);
                }
            });
        }
        Self {
            inports: PortSet::new().with(input),
            outports: PortSet::new().with(output),
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

/// Datatypes with a registered `test/<type>` component whose ports both carry
/// that type.
pub const DATATYPES: [&str; 6] = ["all", "bang", "int", "integer", "number", "string"];

/// Core components plus one `test/<type>` component per entry in [`DATATYPES`].
pub fn test_registry() -> ComponentRegistry {
    let mut registry = ComponentRegistry::with_core_components();
    for datatype in DATATYPES {
        registry
            .register(format!("test/{datatype}"), move || Typed::new(datatype, datatype))
            .expect("unique test component name");
    }
    registry
}

/// Builds a network over an empty graph with [`test_registry`] and `hooks`.
pub fn network_with(hooks: HookRegistry) -> Arc<Network> {
    Network::builder(Arc::new(Graph::new("test")))
        .components(test_registry())
        .hooks(hooks)
        .build()
        .expect("empty graph always builds")
}

/// Builds a network over an empty graph with [`test_registry`] and no hooks.
pub fn empty_network() -> Arc<Network> {
    network_with(HookRegistry::new())
}

pub fn edge(from: &str, from_port: &str, to: &str, to_port: &str) -> EdgeRecord {
    EdgeRecord::new(PortRef::new(from, from_port), PortRef::new(to, to_port))
}

// ═══════════════════════════════════════════════════════════════════════════════
// RECORDING HOOKS
// ═══════════════════════════════════════════════════════════════════════════════

/// One observed channel event.
#[derive(Debug, Clone, PartialEq)]
pub struct Observed {
    pub category: EventCategory,
    pub identity: String,
    pub data: Option<Value>,
}

/// Shared log of events seen by recording hooks.
#[derive(Clone, Default)]
pub struct EventLog {
    events: Arc<Mutex<Vec<Observed>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Observed> {
        self.events.lock().clone()
    }

    pub fn categories(&self) -> Vec<EventCategory> {
        self.events.lock().iter().map(|event| event.category).collect()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }

    /// Returns a hook callback that appends to this log.
    pub fn recorder(&self) -> impl Fn(&ChannelEvent<'_>) + Send + Sync + 'static {
        let events = Arc::clone(&self.events);
        move |event: &ChannelEvent<'_>| {
            events.lock().push(Observed {
                category: event.category(),
                identity: event.channel().identity(),
                data: event.data().cloned(),
            });
        }
    }
}

/// Registers a `name` hook that records into `log` on every category.
pub fn record_all(hooks: &HookRegistry, name: &str, log: &EventLog) {
    for category in EventCategory::ALL {
        hooks
            .hook_on(category, name, log.recorder())
            .expect("fresh hook name");
    }
}
