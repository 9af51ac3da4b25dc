use core::fmt;

use pojo_core::{ArrayKind, PojoValue};

/// What kind of node wraps a value: decides how children are derived and how
/// a child replacement is spliced back in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Null, primitives, strings, class references. No children.
    Basic,
    /// An array; one child per element.
    Array(ArrayKind),
    /// A list; one child per element.
    List,
    /// A set; one child per element, in iteration order.
    Set,
    /// A map; one entry child per mapping, in iteration order.
    Map,
    /// A map entry; children `key` and `value`.
    Entry,
    /// A reflective object; one child per discovered property.
    Object,
}

impl NodeKind {
    /// The kind of node that wraps `value`.
    pub fn of(value: &PojoValue) -> Self {
        match value {
            PojoValue::Null
            | PojoValue::Boolean(_)
            | PojoValue::Byte(_)
            | PojoValue::Char(_)
            | PojoValue::Short(_)
            | PojoValue::Int(_)
            | PojoValue::Long(_)
            | PojoValue::Float(_)
            | PojoValue::Double(_)
            | PojoValue::String(_)
            | PojoValue::Class(_) => NodeKind::Basic,
            PojoValue::Array(array) => NodeKind::Array(array.kind()),
            PojoValue::List(_) => NodeKind::List,
            PojoValue::Set(_) => NodeKind::Set,
            PojoValue::Map(_) => NodeKind::Map,
            PojoValue::Entry(_) => NodeKind::Entry,
            PojoValue::Object(_) => NodeKind::Object,
        }
    }

    /// True for nodes that never have children.
    pub fn is_leaf(self) -> bool {
        matches!(self, NodeKind::Basic)
    }

    /// True for nodes whose children are positional and can be added or
    /// removed.
    pub fn is_sequence(self) -> bool {
        matches!(
            self,
            NodeKind::Array(_) | NodeKind::List | NodeKind::Set | NodeKind::Map
        )
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Basic => f.write_str("basic"),
            NodeKind::Array(kind) => write!(f, "{kind}"),
            NodeKind::List => f.write_str("list"),
            NodeKind::Set => f.write_str("set"),
            NodeKind::Map => f.write_str("map"),
            NodeKind::Entry => f.write_str("entry"),
            NodeKind::Object => f.write_str("object"),
        }
    }
}
