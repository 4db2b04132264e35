//! Built-in components, registered under the `core` namespace by
//! [`ComponentRegistry::with_core_components`](crate::ComponentRegistry::with_core_components).

mod forward;
mod output;

pub use forward::Forward;
pub use output::Output;
