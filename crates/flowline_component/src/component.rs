//! The component contract.

use crate::port::PortSet;

/// A processing unit exposing named input and output ports.
///
/// Components wire their behavior up front, typically by registering
/// listeners on their input ports in the constructor. The network never calls
/// into a component directly; it only attaches channels to its ports.
///
/// # Example
///
/// ```
/// use flowline_component::{Component, Port, PortSet};
///
/// struct Sink {
///     inports: PortSet,
///     outports: PortSet,
/// }
///
/// impl Sink {
///     fn new() -> Self {
///         Self {
///             inports: PortSet::new().with(Port::input("in").with_datatype("string")),
///             outports: PortSet::new(),
///         }
///     }
/// }
///
/// impl Component for Sink {
///     fn in_ports(&self) -> &PortSet {
///         &self.inports
///     }
///
///     fn out_ports(&self) -> &PortSet {
///         &self.outports
///     }
/// }
/// ```
pub trait Component: Send + Sync + 'static {
    /// Returns the input ports.
    fn in_ports(&self) -> &PortSet;

    /// Returns the output ports.
    fn out_ports(&self) -> &PortSet;

    /// Returns a short description of what the component does.
    fn description(&self) -> &str {
        ""
    }
}

/// Error raised by a component factory.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ComponentError {
    /// The factory could not build an instance.
    #[error("construction failed: {0}")]
    Construction(String),

    /// The instance declares neither input nor output ports.
    #[error("component declares no ports")]
    NoPorts,
}

impl ComponentError {
    /// Creates a [`Construction`](Self::Construction) error.
    pub fn construction(msg: impl Into<String>) -> Self {
        Self::Construction(msg.into())
    }
}
