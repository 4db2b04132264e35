//! Plain records describing a graph.
//!
//! Records are pure data: they name components and ports but hold no live
//! state. A network turns them into processes and channels.

use core::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A process declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    /// Unique process id within the graph.
    pub id: String,
    /// Component type name, resolved through a component registry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,
    /// Free-form metadata (editor positions, labels, ...).
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub metadata: Map<String, Value>,
}

impl NodeRecord {
    /// Creates a node backed by a component type.
    #[must_use]
    pub fn new(id: impl Into<String>, component: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            component: Some(component.into()),
            metadata: Map::new(),
        }
    }

    /// Creates a node without a component.
    #[must_use]
    pub fn bare(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            component: None,
            metadata: Map::new(),
        }
    }

    /// Adds a metadata entry.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }
}

/// A `(node, port)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PortRef {
    /// Node id.
    pub node: String,
    /// Port name on that node.
    pub port: String,
}

impl PortRef {
    /// Creates a port reference.
    #[must_use]
    pub fn new(node: impl Into<String>, port: impl Into<String>) -> Self {
        Self {
            node: node.into(),
            port: port.into(),
        }
    }
}

impl fmt::Display for PortRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.node, self.port)
    }
}

/// A connection between two ports.
///
/// An edge without `from` is a seed: it delivers `data` (or `null`) to `to`
/// once, exactly like an [`InitializerRecord`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    /// Source port, absent for seeds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<PortRef>,
    /// Target port.
    pub to: PortRef,
    /// Seed payload when `from` is absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl EdgeRecord {
    /// Creates an edge from an output port to an input port.
    #[must_use]
    pub fn new(from: PortRef, to: PortRef) -> Self {
        Self {
            from: Some(from),
            to,
            data: None,
        }
    }

    /// Creates a source-less edge carrying a seed value.
    #[must_use]
    pub fn seed(data: Value, to: PortRef) -> Self {
        Self {
            from: None,
            to,
            data: Some(data),
        }
    }

    /// Returns true if this edge would match a connection between the given
    /// ports.
    ///
    /// The target must match. The source must match only when this edge
    /// names one.
    #[must_use]
    pub fn matches(&self, from: Option<&PortRef>, to: &PortRef) -> bool {
        if self.to != *to {
            return false;
        }
        match &self.from {
            Some(own) => from == Some(own),
            None => true,
        }
    }
}

impl fmt::Display for EdgeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.from {
            Some(from) => write!(f, "{} -> {}", from, self.to),
            None => write!(f, "ANON -> {}", self.to),
        }
    }
}

/// Payload side of an initializer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitialData {
    /// The value delivered to the target port.
    pub data: Value,
}

/// A one-shot value delivered to an input port when the network is wired.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitializerRecord {
    /// The seed value.
    pub from: InitialData,
    /// Target port.
    pub to: PortRef,
}

impl InitializerRecord {
    /// Creates an initializer.
    #[must_use]
    pub fn new(data: Value, to: PortRef) -> Self {
        Self {
            from: InitialData { data },
            to,
        }
    }

    /// Returns the seed value.
    #[must_use]
    pub fn data(&self) -> &Value {
        &self.from.data
    }
}

impl fmt::Display for InitializerRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' -> {}", self.from.data, self.to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn edge_matching_with_and_without_source() {
        let a_out = PortRef::new("A", "out");
        let c_out = PortRef::new("C", "out");
        let b_in = PortRef::new("B", "in");

        let exact = EdgeRecord::new(a_out.clone(), b_in.clone());
        assert!(exact.matches(Some(&a_out), &b_in));
        assert!(!exact.matches(Some(&c_out), &b_in));
        assert!(!exact.matches(None, &b_in));

        let any_source = EdgeRecord::seed(json!(1), b_in.clone());
        assert!(any_source.matches(Some(&a_out), &b_in));
        assert!(any_source.matches(None, &b_in));
        assert!(!any_source.matches(None, &PortRef::new("B", "other")));
    }

    #[test]
    fn records_serialize_compactly() {
        let node = NodeRecord::bare("A");
        assert_eq!(serde_json::to_value(&node).unwrap(), json!({"id": "A"}));

        let init = InitializerRecord::new(json!(5), PortRef::new("A", "in"));
        assert_eq!(
            serde_json::to_value(&init).unwrap(),
            json!({"from": {"data": 5}, "to": {"node": "A", "port": "in"}})
        );
        assert_eq!(init.to_string(), "'5' -> A.in");
    }
}
