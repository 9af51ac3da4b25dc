use core::fmt;

use pojo_core::{PojoName, ValueError};

use crate::NodeKind;

/// Errors raised while navigating or updating a node tree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PojoError {
    /// The node kind does not support the structural operation.
    #[error("{operation} is not supported on {kind} nodes")]
    Unsupported {
        /// The operation that was attempted.
        operation: &'static str,
        /// The kind of node it was attempted on.
        kind: NodeKind,
    },

    /// Reading or writing a property failed.
    #[error("property `{property}`: {message}")]
    Property {
        /// The property.
        property: PojoName,
        /// The underlying cause.
        message: String,
    },

    /// A bulk replacement supplied the wrong number of children.
    #[error("expected {expected} children, got {actual}")]
    ChildCountMismatch {
        /// Children the node has.
        expected: usize,
        /// Children supplied.
        actual: usize,
    },

    /// A positional access went past the last child.
    #[error("index {index} out of bounds for {len} children")]
    IndexOutOfBounds {
        /// The requested position.
        index: usize,
        /// Number of children.
        len: usize,
    },

    /// A replacement child has a value the node cannot hold at that position.
    #[error("child {index}: {message}")]
    ElementType {
        /// Position of the offending child.
        index: usize,
        /// Why it was rejected.
        message: String,
    },

    /// A read-only property was asked to change.
    #[error("property `{property}` is read-only")]
    ReadOnlyProperty {
        /// The property.
        property: PojoName,
    },

    /// An argument was rejected.
    #[error("{0}")]
    IllegalArgument(String),

    /// A live set or map kept changing while its children were being read.
    #[error("collection was modified while being read ({attempts} attempts)")]
    ConcurrentModification {
        /// Attempts made before giving up.
        attempts: u32,
    },

    /// No child has the requested name.
    #[error("no child named `{name}`")]
    NoSuchChild {
        /// The requested name.
        name: PojoName,
    },
}

impl PojoError {
    pub(crate) fn property(property: &PojoName, cause: impl fmt::Display) -> Self {
        PojoError::Property {
            property: property.clone(),
            message: cause.to_string(),
        }
    }

    pub(crate) fn unsupported(operation: &'static str, kind: NodeKind) -> Self {
        PojoError::Unsupported { operation, kind }
    }
}

impl From<ValueError> for PojoError {
    fn from(err: ValueError) -> Self {
        match err {
            ValueError::IndexOutOfBounds { index, len } => {
                PojoError::IndexOutOfBounds { index, len }
            }
            ValueError::Element { index, source } => PojoError::ElementType {
                index,
                message: source.to_string(),
            },
            err @ ValueError::Mismatch { .. } => PojoError::IllegalArgument(err.to_string()),
        }
    }
}
