//! Channels, ports, and the component contract for Flowline (Layer 1).
//!
//! `flowline_component` provides the pieces a network wires together. A
//! [`Channel`] carries lifecycle events between two [`Port`]s, and a
//! [`Component`] exposes those ports by name.
//!
//! # Core Concepts
//!
//! - [`Channel`] - Synchronous event fan-out between two endpoints
//! - [`EventCategory`] / [`ChannelEvent`] - The five lifecycle points and their payloads
//! - [`Port`] / [`PortSet`] - Typed attachment points on a component
//! - [`Component`] - Trait for processing units
//! - [`ComponentRegistry`] - Resolves component type names to fresh instances
//!
//! # Example
//!
//! ```
//! use flowline_component::prelude::*;
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! let registry = ComponentRegistry::with_core_components();
//! let sink = registry.resolve("Output").expect("core/Output is registered");
//!
//! let channel = Arc::new(Channel::seed(Endpoint::new("sink", "in")));
//! sink.in_ports().get("in").expect("declared").attach(&channel);
//!
//! channel.connect();
//! channel.send(&json!("hello"));
//! channel.disconnect();
//! ```
//!
//! # Architecture
//!
//! This crate is Layer 1 of the Flowline architecture:
//!
//! - **Layer 1** (`flowline_core`, `flowline_component`): Core primitives (this crate)
//! - **Layer 2** (`flowline_graph`): Declarative graph description
//! - **Layer 2** (`flowline_network`): Live wiring of a graph into channels and ports

/// Channels and observer plumbing.
pub mod channel;

/// The component trait.
pub mod component;

/// Built-in components.
pub mod components;

/// Event categories and payloads.
pub mod event;

/// Ports and port sets.
pub mod port;

/// Component type registry.
pub mod registry;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use crate::channel::{Channel, ChannelId, Endpoint, Observer, ObserverId};
    pub use crate::component::{Component, ComponentError};
    pub use crate::components::{Forward, Output};
    pub use crate::event::{ChannelEvent, EventCategory, UnknownCategory};
    pub use crate::port::{DEFAULT_DATATYPE, Port, PortDirection, PortSet};
    pub use crate::registry::{ComponentFactory, ComponentRegistry, RegistryError};
}

// Re-export key types at crate root for convenience
pub use channel::{Channel, ChannelId, Endpoint, Observer, ObserverId};
pub use component::{Component, ComponentError};
pub use event::{ChannelEvent, EventCategory, UnknownCategory};
pub use port::{Port, PortDirection, PortSet};
pub use registry::{ComponentRegistry, RegistryError};
