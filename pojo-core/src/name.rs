use core::fmt;
use std::sync::{Arc, LazyLock};

/// Indices below this bound share a single allocation.
const INTERNED_INDICES: usize = 128;

static INDICES: LazyLock<Vec<PojoName>> = LazyLock::new(|| {
    (0..INTERNED_INDICES)
        .map(|i| PojoName(Arc::new(NameRepr::Index(i))))
        .collect()
});

// Variant order matters: derived `Ord` puts indices before property names.
#[derive(PartialEq, Eq, Hash, PartialOrd, Ord)]
enum NameRepr {
    Index(usize),
    Property(Box<str>),
}

/// Identifies a node among its siblings: either a property name or a position.
///
/// Names compare by value. Indices `0..128` are interned, so asking twice for
/// the same small index hands back the same allocation (see [`PojoName::is_same`]).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PojoName(Arc<NameRepr>);

impl PojoName {
    /// Name for the element at `index`.
    pub fn index(index: usize) -> Self {
        match INDICES.get(index) {
            Some(name) => name.clone(),
            None => Self(Arc::new(NameRepr::Index(index))),
        }
    }

    /// Name for a property. Property names are case-sensitive.
    pub fn property(name: impl Into<Box<str>>) -> Self {
        Self(Arc::new(NameRepr::Property(name.into())))
    }

    /// Reads a name from text: all-digit strings are indices, anything else is a
    /// property name.
    pub fn parse(text: &str) -> Self {
        if !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(index) = text.parse::<usize>() {
                return Self::index(index);
            }
        }
        Self::property(text)
    }

    /// Returns the index, if this names a position.
    pub fn as_index(&self) -> Option<usize> {
        match *self.0 {
            NameRepr::Index(index) => Some(index),
            NameRepr::Property(_) => None,
        }
    }

    /// Returns the property name, if this names a property.
    pub fn as_property(&self) -> Option<&str> {
        match &*self.0 {
            NameRepr::Index(_) => None,
            NameRepr::Property(name) => Some(name),
        }
    }

    /// True if both names share the same allocation.
    pub fn is_same(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }
}

impl fmt::Display for PojoName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &*self.0 {
            NameRepr::Index(index) => write!(f, "{index}"),
            NameRepr::Property(name) => f.write_str(name),
        }
    }
}

impl fmt::Debug for PojoName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &*self.0 {
            NameRepr::Index(index) => write!(f, "PojoName[{index}]"),
            NameRepr::Property(name) => write!(f, "PojoName({name:?})"),
        }
    }
}

impl From<usize> for PojoName {
    fn from(index: usize) -> Self {
        Self::index(index)
    }
}

impl From<&str> for PojoName {
    fn from(name: &str) -> Self {
        Self::property(name)
    }
}

impl From<String> for PojoName {
    fn from(name: String) -> Self {
        Self::property(name)
    }
}

impl PartialEq<str> for PojoName {
    fn eq(&self, other: &str) -> bool {
        self.as_property() == Some(other)
    }
}

impl PartialEq<&str> for PojoName {
    fn eq(&self, other: &&str) -> bool {
        self.as_property() == Some(*other)
    }
}
