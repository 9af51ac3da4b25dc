#![warn(missing_docs)]
#![warn(clippy::std_instead_of_core)]
//! Wraps [`pojo_core::PojoValue`]s as navigable trees of [`PojoNode`]s.
//!
//! A node exposes a name, the wrapped value, its position among its siblings,
//! its parent and lazily computed children. Object children come from
//! properties discovered on the object's [`pojo_core::PojoClass`] by a
//! [`PojoNodeContext`]; arrays, lists, sets and maps expose one child per
//! element (per entry for maps).
//!
//! Updates are copy-on-write: [`PojoNode::set_value`] never touches the
//! wrapped value. It builds a new value for the parent, then for the parent's
//! parent, up to the root, and returns the new node.
//!
//! ```
//! use pojo_core::PojoValue;
//! use pojo_reflect::{PojoNode, ReflectiveContext};
//!
//! let root = PojoNode::wrap("scores", PojoValue::array(vec![1, 2, 3]), ReflectiveContext::shared());
//! let second = root.child(1)?;
//! let updated = second.set_value(20)?;
//!
//! assert_eq!(updated.root().value(), &PojoValue::array(vec![1, 20, 3]));
//! assert_eq!(root.value(), &PojoValue::array(vec![1, 2, 3]));
//! # Ok::<(), pojo_reflect::PojoError>(())
//! ```

mod error;
pub use error::*;

mod kind;
pub use kind::*;

mod path;
pub use path::*;

mod property;
pub use property::*;

mod discovery;
pub use discovery::discover_properties;

mod context;
pub use context::*;

mod adapter;

mod node;
pub use node::*;

mod update;

mod walk;
pub use walk::*;

#[cfg(feature = "tracing")]
#[allow(unused_imports)]
pub(crate) use tracing::{debug, trace};

#[cfg(not(feature = "tracing"))]
#[macro_export]
/// Forwards to tracing::trace when the tracing feature is enabled
macro_rules! trace {
    ($($tt:tt)*) => {};
}
#[cfg(not(feature = "tracing"))]
#[macro_export]
/// Forwards to tracing::debug when the tracing feature is enabled
macro_rules! debug {
    ($($tt:tt)*) => {};
}
