#![warn(missing_docs)]
#![warn(clippy::std_instead_of_core)]
//! Reflective pojo values and navigable, copy-on-write trees over them.
//!
//! Re-exports the value model from `pojo-core` and, with the `reflect`
//! feature (on by default), the node layer from `pojo-reflect`.
//!
//! ```
//! use pojo::{PojoNode, PojoValue, ReflectiveContext};
//!
//! let tags = PojoValue::list([PojoValue::from("a"), PojoValue::from("b")]);
//! let root = PojoNode::wrap("tags", tags, ReflectiveContext::shared());
//!
//! let values = root.children_values()?;
//! assert_eq!(values.len(), 2);
//! assert_eq!(values[1].as_str(), Some("b"));
//! # Ok::<(), pojo::PojoError>(())
//! ```

pub use pojo_core::*;

#[cfg(feature = "reflect")]
pub use pojo_reflect::*;
