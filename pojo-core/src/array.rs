use core::fmt;
use core::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::{PojoValue, ValueError};

/// The element kind of a [`PojoArray`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ArrayKind {
    /// `boolean[]`
    Boolean,
    /// `byte[]`
    Byte,
    /// `char[]`
    Char,
    /// `short[]`
    Short,
    /// `int[]`
    Int,
    /// `long[]`
    Long,
    /// `float[]`
    Float,
    /// `double[]`
    Double,
    /// `Object[]`, elements of any kind
    Object,
}

impl ArrayKind {
    /// Type name of an array of this kind, e.g. `int[]`.
    pub const fn type_name(self) -> &'static str {
        match self {
            ArrayKind::Boolean => "boolean[]",
            ArrayKind::Byte => "byte[]",
            ArrayKind::Char => "char[]",
            ArrayKind::Short => "short[]",
            ArrayKind::Int => "int[]",
            ArrayKind::Long => "long[]",
            ArrayKind::Float => "float[]",
            ArrayKind::Double => "double[]",
            ArrayKind::Object => "Object[]",
        }
    }
}

impl fmt::Display for ArrayKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// A type that can be stored in a [`PojoArray`].
///
/// Implemented for the primitive element types and for [`PojoValue`] itself,
/// which backs `Object[]`.
pub trait ArrayElement: Clone + fmt::Debug + Send + Sync + 'static {
    /// The array kind holding this element type.
    const KIND: ArrayKind;

    /// Converts the element to a value.
    fn into_value(self) -> PojoValue;

    /// Reads an element out of a value, checking its type.
    fn from_value(value: PojoValue) -> Result<Self, ValueError>;

    /// Element equality with `Arrays.equals` semantics (bitwise for floats).
    fn element_eq(&self, other: &Self) -> bool;

    /// Hash consistent with [`ArrayElement::element_eq`].
    fn element_hash<H: Hasher>(&self, state: &mut H);

    /// Wraps a slice of elements as an array.
    fn wrap(elements: Arc<[Self]>) -> PojoArray;

    /// Borrows the elements if `array` holds this element type.
    fn elements(array: &PojoArray) -> Option<&[Self]>;
}

macro_rules! primitive_elements {
    ($($ty:ty => $variant:ident;)*) => {
        $(
            impl ArrayElement for $ty {
                const KIND: ArrayKind = ArrayKind::$variant;

                fn into_value(self) -> PojoValue {
                    PojoValue::$variant(self)
                }

                fn from_value(value: PojoValue) -> Result<Self, ValueError> {
                    <$ty>::try_from(value)
                }

                fn element_eq(&self, other: &Self) -> bool {
                    self == other
                }

                fn element_hash<H: Hasher>(&self, state: &mut H) {
                    self.hash(state)
                }

                fn wrap(elements: Arc<[Self]>) -> PojoArray {
                    PojoArray::$variant(elements)
                }

                fn elements(array: &PojoArray) -> Option<&[Self]> {
                    match array {
                        PojoArray::$variant(elements) => Some(elements),
                        _ => None,
                    }
                }
            }
        )*
    };
}

primitive_elements! {
    bool => Boolean;
    i8 => Byte;
    char => Char;
    i16 => Short;
    i32 => Int;
    i64 => Long;
}

macro_rules! float_elements {
    ($($ty:ty => $variant:ident;)*) => {
        $(
            impl ArrayElement for $ty {
                const KIND: ArrayKind = ArrayKind::$variant;

                fn into_value(self) -> PojoValue {
                    PojoValue::$variant(self)
                }

                fn from_value(value: PojoValue) -> Result<Self, ValueError> {
                    <$ty>::try_from(value)
                }

                fn element_eq(&self, other: &Self) -> bool {
                    self.to_bits() == other.to_bits()
                }

                fn element_hash<H: Hasher>(&self, state: &mut H) {
                    self.to_bits().hash(state)
                }

                fn wrap(elements: Arc<[Self]>) -> PojoArray {
                    PojoArray::$variant(elements)
                }

                fn elements(array: &PojoArray) -> Option<&[Self]> {
                    match array {
                        PojoArray::$variant(elements) => Some(elements),
                        _ => None,
                    }
                }
            }
        )*
    };
}

float_elements! {
    f32 => Float;
    f64 => Double;
}

impl ArrayElement for PojoValue {
    const KIND: ArrayKind = ArrayKind::Object;

    fn into_value(self) -> PojoValue {
        self
    }

    fn from_value(value: PojoValue) -> Result<Self, ValueError> {
        Ok(value)
    }

    fn element_eq(&self, other: &Self) -> bool {
        self == other
    }

    fn element_hash<H: Hasher>(&self, state: &mut H) {
        self.hash(state)
    }

    fn wrap(elements: Arc<[Self]>) -> PojoArray {
        PojoArray::Object(elements)
    }

    fn elements(array: &PojoArray) -> Option<&[Self]> {
        match array {
            PojoArray::Object(elements) => Some(elements),
            _ => None,
        }
    }
}

/// An immutable array, one variant per element kind.
///
/// Every "modifying" operation returns a new array; the receiver is untouched.
#[derive(Clone)]
pub enum PojoArray {
    /// `boolean[]`
    Boolean(Arc<[bool]>),
    /// `byte[]`
    Byte(Arc<[i8]>),
    /// `char[]`
    Char(Arc<[char]>),
    /// `short[]`
    Short(Arc<[i16]>),
    /// `int[]`
    Int(Arc<[i32]>),
    /// `long[]`
    Long(Arc<[i64]>),
    /// `float[]`
    Float(Arc<[f32]>),
    /// `double[]`
    Double(Arc<[f64]>),
    /// `Object[]`
    Object(Arc<[PojoValue]>),
}

/// Runs `$body` with `$elements` bound to the typed slice of `$array`.
macro_rules! with_elements {
    ($array:expr, $elements:ident => $body:expr) => {
        match $array {
            PojoArray::Boolean($elements) => $body,
            PojoArray::Byte($elements) => $body,
            PojoArray::Char($elements) => $body,
            PojoArray::Short($elements) => $body,
            PojoArray::Int($elements) => $body,
            PojoArray::Long($elements) => $body,
            PojoArray::Float($elements) => $body,
            PojoArray::Double($elements) => $body,
            PojoArray::Object($elements) => $body,
        }
    };
}

impl PojoArray {
    /// Builds an array of `kind` from values, checking every element.
    ///
    /// The error names the first offending index.
    pub fn from_values(
        kind: ArrayKind,
        values: impl IntoIterator<Item = PojoValue>,
    ) -> Result<Self, ValueError> {
        match kind {
            ArrayKind::Boolean => collect::<bool>(values),
            ArrayKind::Byte => collect::<i8>(values),
            ArrayKind::Char => collect::<char>(values),
            ArrayKind::Short => collect::<i16>(values),
            ArrayKind::Int => collect::<i32>(values),
            ArrayKind::Long => collect::<i64>(values),
            ArrayKind::Float => collect::<f32>(values),
            ArrayKind::Double => collect::<f64>(values),
            ArrayKind::Object => collect::<PojoValue>(values),
        }
    }

    /// The element kind.
    pub fn kind(&self) -> ArrayKind {
        match self {
            PojoArray::Boolean(_) => ArrayKind::Boolean,
            PojoArray::Byte(_) => ArrayKind::Byte,
            PojoArray::Char(_) => ArrayKind::Char,
            PojoArray::Short(_) => ArrayKind::Short,
            PojoArray::Int(_) => ArrayKind::Int,
            PojoArray::Long(_) => ArrayKind::Long,
            PojoArray::Float(_) => ArrayKind::Float,
            PojoArray::Double(_) => ArrayKind::Double,
            PojoArray::Object(_) => ArrayKind::Object,
        }
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        with_elements!(self, elements => elements.len())
    }

    /// True if the array has no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the element at `index` as a value.
    pub fn get(&self, index: usize) -> Option<PojoValue> {
        with_elements!(self, elements => elements.get(index).cloned().map(ArrayElement::into_value))
    }

    /// Borrows the elements, if they are of type `T`.
    pub fn elements<T: ArrayElement>(&self) -> Option<&[T]> {
        T::elements(self)
    }

    /// All elements as values, in order.
    pub fn values(&self) -> Vec<PojoValue> {
        with_elements!(self, elements => elements.iter().cloned().map(ArrayElement::into_value).collect())
    }

    /// A copy of this array with the element at `index` replaced.
    pub fn with_element(&self, index: usize, value: PojoValue) -> Result<Self, ValueError> {
        with_elements!(self, elements => replace(elements, index, value))
    }

    /// A copy of this array, one longer, with `value` inserted at `index`.
    pub fn with_inserted(&self, index: usize, value: PojoValue) -> Result<Self, ValueError> {
        with_elements!(self, elements => insert(elements, index, value))
    }

    /// A copy of this array, one shorter, without the element at `index`.
    pub fn with_removed(&self, index: usize) -> Result<Self, ValueError> {
        with_elements!(self, elements => remove(elements, index))
    }

    /// True if both arrays share storage.
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        match (a, b) {
            (PojoArray::Boolean(a), PojoArray::Boolean(b)) => Arc::ptr_eq(a, b),
            (PojoArray::Byte(a), PojoArray::Byte(b)) => Arc::ptr_eq(a, b),
            (PojoArray::Char(a), PojoArray::Char(b)) => Arc::ptr_eq(a, b),
            (PojoArray::Short(a), PojoArray::Short(b)) => Arc::ptr_eq(a, b),
            (PojoArray::Int(a), PojoArray::Int(b)) => Arc::ptr_eq(a, b),
            (PojoArray::Long(a), PojoArray::Long(b)) => Arc::ptr_eq(a, b),
            (PojoArray::Float(a), PojoArray::Float(b)) => Arc::ptr_eq(a, b),
            (PojoArray::Double(a), PojoArray::Double(b)) => Arc::ptr_eq(a, b),
            (PojoArray::Object(a), PojoArray::Object(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

fn collect<T: ArrayElement>(
    values: impl IntoIterator<Item = PojoValue>,
) -> Result<PojoArray, ValueError> {
    let elements = values
        .into_iter()
        .enumerate()
        .map(|(index, value)| T::from_value(value).map_err(|err| err.at(index)))
        .collect::<Result<Vec<T>, _>>()?;
    Ok(T::wrap(elements.into()))
}

fn replace<T: ArrayElement>(
    elements: &[T],
    index: usize,
    value: PojoValue,
) -> Result<PojoArray, ValueError> {
    if index >= elements.len() {
        return Err(ValueError::IndexOutOfBounds {
            index,
            len: elements.len(),
        });
    }
    let element = T::from_value(value).map_err(|err| err.at(index))?;
    let mut copy = elements.to_vec();
    copy[index] = element;
    Ok(T::wrap(copy.into()))
}

fn insert<T: ArrayElement>(
    elements: &[T],
    index: usize,
    value: PojoValue,
) -> Result<PojoArray, ValueError> {
    if index > elements.len() {
        return Err(ValueError::IndexOutOfBounds {
            index,
            len: elements.len(),
        });
    }
    let element = T::from_value(value).map_err(|err| err.at(index))?;
    let mut copy = elements.to_vec();
    copy.insert(index, element);
    Ok(T::wrap(copy.into()))
}

fn remove<T: ArrayElement>(elements: &[T], index: usize) -> Result<PojoArray, ValueError> {
    if index >= elements.len() {
        return Err(ValueError::IndexOutOfBounds {
            index,
            len: elements.len(),
        });
    }
    let mut copy = elements.to_vec();
    copy.remove(index);
    Ok(T::wrap(copy.into()))
}

fn elements_eq<T: ArrayElement>(a: &[T], b: &[T]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(a, b)| a.element_eq(b))
}

impl PartialEq for PojoArray {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (PojoArray::Boolean(a), PojoArray::Boolean(b)) => elements_eq(a, b),
            (PojoArray::Byte(a), PojoArray::Byte(b)) => elements_eq(a, b),
            (PojoArray::Char(a), PojoArray::Char(b)) => elements_eq(a, b),
            (PojoArray::Short(a), PojoArray::Short(b)) => elements_eq(a, b),
            (PojoArray::Int(a), PojoArray::Int(b)) => elements_eq(a, b),
            (PojoArray::Long(a), PojoArray::Long(b)) => elements_eq(a, b),
            (PojoArray::Float(a), PojoArray::Float(b)) => elements_eq(a, b),
            (PojoArray::Double(a), PojoArray::Double(b)) => elements_eq(a, b),
            (PojoArray::Object(a), PojoArray::Object(b)) => elements_eq(a, b),
            _ => false,
        }
    }
}

impl Eq for PojoArray {}

impl Hash for PojoArray {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind().hash(state);
        with_elements!(self, elements => {
            elements.len().hash(state);
            for element in elements.iter() {
                element.element_hash(state);
            }
        })
    }
}

impl fmt::Debug for PojoArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind())?;
        with_elements!(self, elements => f.debug_list().entries(elements.iter()).finish())
    }
}

impl<T: ArrayElement> From<Vec<T>> for PojoArray {
    fn from(elements: Vec<T>) -> Self {
        T::wrap(elements.into())
    }
}
