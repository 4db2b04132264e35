//! Port datatype compatibility.

/// Datatypes any source may feed.
const UNIVERSAL_TARGETS: [&str; 2] = ["all", "bang"];

/// Returns true if an output port of type `from` may feed an input port of
/// type `to`.
///
/// The relation is one-directional: `int` feeds `number`, but not the other
/// way around.
///
/// ```
/// use flowline_network::is_port_compatible;
///
/// assert!(is_port_compatible("string", "string"));
/// assert!(is_port_compatible("object", "all"));
/// assert!(is_port_compatible("int", "number"));
/// assert!(!is_port_compatible("number", "int"));
/// ```
#[must_use]
pub fn is_port_compatible(from: &str, to: &str) -> bool {
    from == to
        || UNIVERSAL_TARGETS.contains(&to)
        || (matches!(from, "int" | "integer") && to == "number")
}
