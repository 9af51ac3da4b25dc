use core::fmt;
use core::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::{
    ArrayElement, PojoArray, PojoClass, PojoEntry, PojoList, PojoMap, PojoObject, PojoSet, Pojo,
    ValueError,
};

/// A dynamically typed value, one variant per element kind.
///
/// Equality is deep and total: floating point values compare by bit pattern
/// (so `NaN == NaN` and `0.0 != -0.0`), arrays compare element by element,
/// sets and maps compare by content regardless of order, and objects compare
/// through the user type's `PartialEq`. [`Hash`] agrees with that equality, so
/// any value can be a set element or a map key.
#[derive(Clone)]
pub enum PojoValue {
    /// The absent value.
    Null,
    /// `boolean`
    Boolean(bool),
    /// `byte`
    Byte(i8),
    /// `char`
    Char(char),
    /// `short`
    Short(i16),
    /// `int`
    Int(i32),
    /// `long`
    Long(i64),
    /// `float`
    Float(f32),
    /// `double`
    Double(f64),
    /// An immutable string.
    String(Arc<str>),
    /// A reference to a class descriptor.
    Class(&'static PojoClass),
    /// A fixed-length array of one element kind.
    Array(PojoArray),
    /// An ordered list.
    List(PojoList),
    /// A shared, insertion-ordered set.
    Set(PojoSet),
    /// A shared, insertion-ordered map.
    Map(PojoMap),
    /// One key/value pair of a map.
    Entry(PojoEntry),
    /// An instance of a type implementing [`Pojo`].
    Object(PojoObject),
}

impl PojoValue {
    /// Builds a string value.
    pub fn string(text: impl Into<Arc<str>>) -> Self {
        PojoValue::String(text.into())
    }

    /// Builds an array value from typed elements.
    pub fn array<T: ArrayElement>(elements: impl Into<Arc<[T]>>) -> Self {
        PojoValue::Array(T::wrap(elements.into()))
    }

    /// Builds a list value.
    pub fn list(values: impl IntoIterator<Item = PojoValue>) -> Self {
        PojoValue::List(values.into_iter().collect())
    }

    /// Builds a set value. Duplicates keep their first position.
    pub fn set(values: impl IntoIterator<Item = PojoValue>) -> Self {
        PojoValue::Set(values.into_iter().collect())
    }

    /// Builds a map value from key/value pairs.
    pub fn map(entries: impl IntoIterator<Item = (PojoValue, PojoValue)>) -> Self {
        PojoValue::Map(entries.into_iter().collect())
    }

    /// Builds a map entry value.
    pub fn entry(key: impl Into<PojoValue>, value: impl Into<PojoValue>) -> Self {
        PojoValue::Entry(PojoEntry::new(key.into(), value.into()))
    }

    /// Wraps a reflective object.
    pub fn object<T: Pojo>(value: T) -> Self {
        PojoValue::Object(PojoObject::new(value))
    }

    /// True for null, primitives, strings and class references: the values
    /// that never have children.
    pub fn is_basic(&self) -> bool {
        matches!(
            self,
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
                | PojoValue::Class(_)
        )
    }

    /// True for [`PojoValue::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, PojoValue::Null)
    }

    /// Name of the runtime type of this value, e.g. `int`, `long[]`, `List`,
    /// or the class name of an object.
    pub fn type_name(&self) -> &'static str {
        match self {
            PojoValue::Null => "null",
            PojoValue::Boolean(_) => "boolean",
            PojoValue::Byte(_) => "byte",
            PojoValue::Char(_) => "char",
            PojoValue::Short(_) => "short",
            PojoValue::Int(_) => "int",
            PojoValue::Long(_) => "long",
            PojoValue::Float(_) => "float",
            PojoValue::Double(_) => "double",
            PojoValue::String(_) => "String",
            PojoValue::Class(_) => "Class",
            PojoValue::Array(array) => array.kind().type_name(),
            PojoValue::List(_) => "List",
            PojoValue::Set(_) => "Set",
            PojoValue::Map(_) => "Map",
            PojoValue::Entry(_) => "Entry",
            PojoValue::Object(object) => object.class().name(),
        }
    }

    /// Borrows the string, if this is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PojoValue::String(text) => Some(text),
            _ => None,
        }
    }

    /// Borrows the object, if this is one.
    pub fn as_object(&self) -> Option<&PojoObject> {
        match self {
            PojoValue::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Borrows the array, if this is one.
    pub fn as_array(&self) -> Option<&PojoArray> {
        match self {
            PojoValue::Array(array) => Some(array),
            _ => None,
        }
    }

    /// Borrows the list, if this is one.
    pub fn as_list(&self) -> Option<&PojoList> {
        match self {
            PojoValue::List(list) => Some(list),
            _ => None,
        }
    }

    /// Borrows the entry, if this is one.
    pub fn as_entry(&self) -> Option<&PojoEntry> {
        match self {
            PojoValue::Entry(entry) => Some(entry),
            _ => None,
        }
    }

    /// Clones the wrapped `T` out of an object value.
    pub fn to_pojo<T: Pojo>(&self) -> Result<T, ValueError> {
        self.as_object()
            .and_then(|object| object.downcast_ref::<T>())
            .cloned()
            .ok_or(ValueError::Mismatch {
                expected: core::any::type_name::<T>(),
                actual: self.type_name(),
            })
    }
}

impl PartialEq for PojoValue {
    fn eq(&self, other: &Self) -> bool {
        use PojoValue::*;
        match (self, other) {
            (Null, Null) => true,
            (Boolean(a), Boolean(b)) => a == b,
            (Byte(a), Byte(b)) => a == b,
            (Char(a), Char(b)) => a == b,
            (Short(a), Short(b)) => a == b,
            (Int(a), Int(b)) => a == b,
            (Long(a), Long(b)) => a == b,
            (Float(a), Float(b)) => a.to_bits() == b.to_bits(),
            (Double(a), Double(b)) => a.to_bits() == b.to_bits(),
            (String(a), String(b)) => a == b,
            (Class(a), Class(b)) => core::ptr::eq(*a, *b),
            (Array(a), Array(b)) => a == b,
            (List(a), List(b)) => a == b,
            (Set(a), Set(b)) => a == b,
            (Map(a), Map(b)) => a == b,
            (Entry(a), Entry(b)) => a == b,
            (Object(a), Object(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for PojoValue {}

impl Hash for PojoValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        core::mem::discriminant(self).hash(state);
        match self {
            PojoValue::Null => {}
            PojoValue::Boolean(v) => v.hash(state),
            PojoValue::Byte(v) => v.hash(state),
            PojoValue::Char(v) => v.hash(state),
            PojoValue::Short(v) => v.hash(state),
            PojoValue::Int(v) => v.hash(state),
            PojoValue::Long(v) => v.hash(state),
            PojoValue::Float(v) => v.to_bits().hash(state),
            PojoValue::Double(v) => v.to_bits().hash(state),
            PojoValue::String(v) => v.hash(state),
            PojoValue::Class(class) => (*class as *const PojoClass as usize).hash(state),
            PojoValue::Array(v) => v.hash(state),
            PojoValue::List(v) => v.hash(state),
            PojoValue::Set(v) => v.hash(state),
            PojoValue::Map(v) => v.hash(state),
            PojoValue::Entry(v) => v.hash(state),
            PojoValue::Object(v) => v.hash(state),
        }
    }
}

impl fmt::Debug for PojoValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PojoValue::Null => f.write_str("Null"),
            PojoValue::Boolean(v) => write!(f, "Boolean({v})"),
            PojoValue::Byte(v) => write!(f, "Byte({v})"),
            PojoValue::Char(v) => write!(f, "Char({v:?})"),
            PojoValue::Short(v) => write!(f, "Short({v})"),
            PojoValue::Int(v) => write!(f, "Int({v})"),
            PojoValue::Long(v) => write!(f, "Long({v})"),
            PojoValue::Float(v) => write!(f, "Float({v:?})"),
            PojoValue::Double(v) => write!(f, "Double({v:?})"),
            PojoValue::String(v) => write!(f, "String({v:?})"),
            PojoValue::Class(class) => write!(f, "Class({})", class.name()),
            PojoValue::Array(v) => fmt::Debug::fmt(v, f),
            PojoValue::List(v) => fmt::Debug::fmt(v, f),
            PojoValue::Set(v) => fmt::Debug::fmt(v, f),
            PojoValue::Map(v) => fmt::Debug::fmt(v, f),
            PojoValue::Entry(v) => fmt::Debug::fmt(v, f),
            PojoValue::Object(v) => fmt::Debug::fmt(v, f),
        }
    }
}

impl fmt::Display for PojoValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PojoValue::Null => f.write_str("null"),
            PojoValue::Boolean(v) => write!(f, "{v}"),
            PojoValue::Byte(v) => write!(f, "{v}"),
            PojoValue::Char(v) => write!(f, "{v}"),
            PojoValue::Short(v) => write!(f, "{v}"),
            PojoValue::Int(v) => write!(f, "{v}"),
            PojoValue::Long(v) => write!(f, "{v}"),
            PojoValue::Float(v) => write!(f, "{v}"),
            PojoValue::Double(v) => write!(f, "{v}"),
            PojoValue::String(v) => f.write_str(v),
            PojoValue::Class(class) => write!(f, "class {}", class.name()),
            PojoValue::Array(array) => write_seq(f, '[', ']', array.values().iter()),
            PojoValue::List(list) => write_seq(f, '[', ']', list.iter()),
            PojoValue::Set(set) => {
                set.format_with(f, |f| write_seq(f, '{', '}', set.snapshot().iter()))
            }
            PojoValue::Map(map) => {
                map.format_with(f, |f| write_seq(f, '{', '}', map.entries().iter()))
            }
            PojoValue::Entry(entry) => write!(f, "{}={}", entry.key(), entry.value()),
            PojoValue::Object(object) => write!(f, "{object:?}"),
        }
    }
}

fn write_seq<'a, T: fmt::Display + 'a>(
    f: &mut fmt::Formatter<'_>,
    open: char,
    close: char,
    items: impl Iterator<Item = &'a T>,
) -> fmt::Result {
    write!(f, "{open}")?;
    for (i, item) in items.enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    write!(f, "{close}")
}

macro_rules! scalar_conversions {
    ($($ty:ty => $variant:ident, $name:literal;)*) => {
        $(
            impl From<$ty> for PojoValue {
                fn from(value: $ty) -> Self {
                    PojoValue::$variant(value)
                }
            }

            impl TryFrom<PojoValue> for $ty {
                type Error = ValueError;

                fn try_from(value: PojoValue) -> Result<Self, Self::Error> {
                    match value {
                        PojoValue::$variant(v) => Ok(v),
                        other => Err(ValueError::Mismatch {
                            expected: $name,
                            actual: other.type_name(),
                        }),
                    }
                }
            }
        )*
    };
}

scalar_conversions! {
    bool => Boolean, "boolean";
    i8 => Byte, "byte";
    char => Char, "char";
    i16 => Short, "short";
    i32 => Int, "int";
    i64 => Long, "long";
    f32 => Float, "float";
    f64 => Double, "double";
    PojoArray => Array, "array";
    PojoList => List, "List";
    PojoSet => Set, "Set";
    PojoMap => Map, "Map";
    PojoEntry => Entry, "Entry";
    PojoObject => Object, "object";
}

impl From<&str> for PojoValue {
    fn from(value: &str) -> Self {
        PojoValue::String(value.into())
    }
}

impl From<String> for PojoValue {
    fn from(value: String) -> Self {
        PojoValue::String(value.into())
    }
}

impl From<&'static PojoClass> for PojoValue {
    fn from(class: &'static PojoClass) -> Self {
        PojoValue::Class(class)
    }
}

impl<T: Into<PojoValue>> From<Option<T>> for PojoValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(PojoValue::Null, Into::into)
    }
}

impl TryFrom<PojoValue> for String {
    type Error = ValueError;

    fn try_from(value: PojoValue) -> Result<Self, Self::Error> {
        match value {
            PojoValue::String(text) => Ok(text.to_string()),
            other => Err(ValueError::Mismatch {
                expected: "String",
                actual: other.type_name(),
            }),
        }
    }
}
