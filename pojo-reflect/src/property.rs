use core::fmt;

use pojo_core::{PojoMethod, PojoName, PojoObject, PojoValue, TypeRef};

use crate::PojoError;

/// How a property setter produces the updated object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SetterKind {
    /// The setter mutates its receiver; the mutated receiver is the result.
    InPlace,
    /// The setter leaves its receiver alone and returns the updated object.
    Wither,
}

impl SetterKind {
    /// Classifies a setter by its declared return type: `void` and `Object`
    /// mean in-place, anything else means the return value is the result.
    pub fn classify(returns: TypeRef) -> Self {
        match returns {
            TypeRef::Void | TypeRef::Object => SetterKind::InPlace,
            _ => SetterKind::Wither,
        }
    }
}

/// A named, typed value of an object, read (and possibly written) through
/// reflective methods.
pub trait PojoProperty: fmt::Debug + Send + Sync {
    /// Property name.
    fn name(&self) -> &PojoName;

    /// Declared type of the property value.
    fn value_type(&self) -> TypeRef;

    /// How the setter produces its result, or `None` when there is no setter.
    fn setter_kind(&self) -> Option<SetterKind>;

    /// True when the property cannot be written.
    fn is_read_only(&self) -> bool {
        self.setter_kind().is_none()
    }

    /// Reads the property of `object`.
    fn get(&self, object: &PojoObject) -> Result<PojoValue, PojoError>;

    /// Returns a copy of `object` with the property set to `value`. `object`
    /// itself is left unchanged.
    fn set(&self, object: &PojoObject, value: PojoValue) -> Result<PojoObject, PojoError>;
}

fn read(name: &PojoName, getter: &PojoMethod, object: &PojoObject) -> Result<PojoValue, PojoError> {
    object
        .invoke(getter, &[])
        .map(|invocation| invocation.returned)
        .map_err(|err| PojoError::property(name, err))
}

/// A property with a getter only.
#[derive(Debug)]
pub struct ReadOnlyProperty {
    name: PojoName,
    getter: &'static PojoMethod,
}

impl ReadOnlyProperty {
    /// A property read through `getter`.
    pub fn new(name: PojoName, getter: &'static PojoMethod) -> Self {
        Self { name, getter }
    }

    /// The getter.
    pub fn getter(&self) -> &'static PojoMethod {
        self.getter
    }
}

impl PojoProperty for ReadOnlyProperty {
    fn name(&self) -> &PojoName {
        &self.name
    }

    fn value_type(&self) -> TypeRef {
        self.getter.returns()
    }

    fn setter_kind(&self) -> Option<SetterKind> {
        None
    }

    fn get(&self, object: &PojoObject) -> Result<PojoValue, PojoError> {
        read(&self.name, self.getter, object)
    }

    fn set(&self, _object: &PojoObject, _value: PojoValue) -> Result<PojoObject, PojoError> {
        Err(PojoError::ReadOnlyProperty {
            property: self.name.clone(),
        })
    }
}

/// A property with both a getter and a setter.
#[derive(Debug)]
pub struct ReadWriteProperty {
    name: PojoName,
    getter: &'static PojoMethod,
    setter: &'static PojoMethod,
    kind: SetterKind,
}

impl ReadWriteProperty {
    /// A property read through `getter` and written through `setter`.
    pub fn new(name: PojoName, getter: &'static PojoMethod, setter: &'static PojoMethod) -> Self {
        Self {
            name,
            getter,
            setter,
            kind: SetterKind::classify(setter.returns()),
        }
    }

    /// The getter.
    pub fn getter(&self) -> &'static PojoMethod {
        self.getter
    }

    /// The setter.
    pub fn setter(&self) -> &'static PojoMethod {
        self.setter
    }
}

impl PojoProperty for ReadWriteProperty {
    fn name(&self) -> &PojoName {
        &self.name
    }

    fn value_type(&self) -> TypeRef {
        self.getter.returns()
    }

    fn setter_kind(&self) -> Option<SetterKind> {
        Some(self.kind)
    }

    fn get(&self, object: &PojoObject) -> Result<PojoValue, PojoError> {
        read(&self.name, self.getter, object)
    }

    fn set(&self, object: &PojoObject, value: PojoValue) -> Result<PojoObject, PojoError> {
        let invocation = object
            .invoke(self.setter, &[value])
            .map_err(|err| PojoError::property(&self.name, err))?;

        match self.kind {
            SetterKind::InPlace => Ok(invocation.receiver),
            SetterKind::Wither => match invocation.returned {
                PojoValue::Object(updated) => Ok(updated),
                other => Err(PojoError::property(
                    &self.name,
                    format_args!(
                        "`{}` returned {} instead of an object",
                        self.setter.name(),
                        other.type_name()
                    ),
                )),
            },
        }
    }
}
