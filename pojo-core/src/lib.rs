#![warn(missing_docs)]
#![warn(clippy::std_instead_of_core)]
//! Core types for pojo trees: the dynamic [`PojoValue`] model, node names,
//! and the reflective class descriptors ([`PojoClass`], [`PojoMethod`]) that
//! user types expose through the [`Pojo`] trait.
//!
//! Values are immutable except for [`PojoSet`] and [`PojoMap`], which are
//! shared handles that can be changed from the outside and carry a
//! modification counter so readers can notice.

mod error;
pub use error::*;

mod name;
pub use name::*;

mod value;
pub use value::*;

mod array;
pub use array::*;

mod collections;
pub use collections::*;

mod class;
pub use class::*;

mod object;
pub use object::*;
