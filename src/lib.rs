//! Assemble declarative dataflow graphs into live, typed, observable networks.
//!

pub use flowline_internal::*;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use flowline_internal::prelude::*;
}
