//! Network error taxonomy.

use core::fmt;

use flowline_component::{RegistryError, UnknownCategory};

/// Which side of an edge a missing process was expected on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeDirection {
    /// The source side.
    Outbound,
    /// The target side.
    Inbound,
}

impl fmt::Display for EdgeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeDirection::Outbound => f.write_str("outbound"),
            EdgeDirection::Inbound => f.write_str("inbound"),
        }
    }
}

/// The graph asks for something the network cannot build.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DefinitionError {
    /// No component type is registered under this name.
    #[error("Component type {0} not found")]
    ComponentNotFound(String),

    /// The component type resolved but could not be used.
    #[error("Component {name} doesn't appear to be a valid component: {reason}")]
    InvalidComponent {
        /// The requested type name.
        name: String,
        /// Why it was rejected.
        reason: String,
    },

    /// An edge references a process that is not in the network.
    #[error("No process defined for {direction} node {node}")]
    MissingProcess {
        /// The referenced node id.
        node: String,
        /// Which end of the edge it was on.
        direction: EdgeDirection,
    },

    /// The process exists but has no component to attach ports to.
    #[error("No component defined for process {process}")]
    MissingComponent {
        /// The process id.
        process: String,
    },

    /// The source component has no such output port.
    #[error("No outport {port} defined for process {process}")]
    MissingOutPort {
        /// The process id.
        process: String,
        /// The port name.
        port: String,
    },

    /// The target component has no such input port.
    #[error("No inport {port} defined for process {process}")]
    MissingInPort {
        /// The process id.
        process: String,
        /// The port name.
        port: String,
    },
}

impl From<RegistryError> for DefinitionError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::NotFound(name) => DefinitionError::ComponentNotFound(name),
            RegistryError::Invalid { name, reason } => DefinitionError::InvalidComponent {
                name,
                reason: reason.to_string(),
            },
            RegistryError::AlreadyRegistered(name) => DefinitionError::InvalidComponent {
                name,
                reason: "registered twice".to_string(),
            },
        }
    }
}

/// A source port's datatype cannot feed the target port's datatype.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(
    "Connection from process {from_process} port {from_port} ({from_type}) \
     to process {to_process} port {to_port} ({to_type}) has incompatible types"
)]
pub struct IncompatibleTypeError {
    /// Source process id.
    pub from_process: String,
    /// Source port name.
    pub from_port: String,
    /// Source port datatype.
    pub from_type: String,
    /// Target process id.
    pub to_process: String,
    /// Target port name.
    pub to_port: String,
    /// Target port datatype.
    pub to_type: String,
}

/// Hook registration failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HookError {
    /// The category is not one of the five channel events.
    #[error(transparent)]
    InvalidCategory(#[from] UnknownCategory),

    /// A hook with this name is already registered for the category.
    #[error("hook '{name}' already registered for event '{category}'")]
    DuplicateHook {
        /// The category.
        category: String,
        /// The duplicate hook name.
        name: String,
    },
}

/// Any error a network wiring operation can return.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NetworkError {
    /// The graph references something the network cannot build.
    #[error(transparent)]
    Definition(#[from] DefinitionError),

    /// Connected ports have incompatible datatypes.
    #[error(transparent)]
    IncompatibleType(#[from] IncompatibleTypeError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowline_component::ComponentError;

    #[test]
    fn messages_name_the_culprits() {
        let err = DefinitionError::MissingProcess {
            node: "A".to_string(),
            direction: EdgeDirection::Outbound,
        };
        assert_eq!(err.to_string(), "No process defined for outbound node A");

        let err = IncompatibleTypeError {
            from_process: "A".to_string(),
            from_port: "out".to_string(),
            from_type: "string".to_string(),
            to_process: "B".to_string(),
            to_port: "in".to_string(),
            to_type: "int".to_string(),
        };
        let message = NetworkError::from(err).to_string();
        assert!(message.contains("process A port out (string)"));
        assert!(message.contains("process B port in (int)"));
    }

    #[test]
    fn registry_errors_map_to_definition_errors() {
        assert_eq!(
            DefinitionError::from(RegistryError::NotFound("x/Y".to_string())),
            DefinitionError::ComponentNotFound("x/Y".to_string())
        );

        let err = DefinitionError::from(RegistryError::Invalid {
            name: "x/Y".to_string(),
            reason: ComponentError::NoPorts,
        });
        assert_eq!(
            err.to_string(),
            "Component x/Y doesn't appear to be a valid component: component declares no ports"
        );
    }
}
