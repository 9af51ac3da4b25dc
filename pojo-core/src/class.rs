use core::any::Any;
use core::fmt;
use core::marker::PhantomData;

use crate::{ArrayKind, InvokeError, Pojo, PojoObject, PojoValue};

/// The declared type of a method parameter or return value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TypeRef {
    /// No value (`void`).
    Void,
    /// Any value (`Object`).
    Object,
    /// `boolean`
    Boolean,
    /// `byte`
    Byte,
    /// `char`
    Char,
    /// `short`
    Short,
    /// `int`
    Int,
    /// `long`
    Long,
    /// `float`
    Float,
    /// `double`
    Double,
    /// `String`
    String,
    /// `Class`
    Class,
    /// An array of the given kind.
    Array(ArrayKind),
    /// `List`
    List,
    /// `Set`
    Set,
    /// `Map`
    Map,
    /// A reflective class, by name.
    Named(&'static str),
}

impl TypeRef {
    /// Name of the type, e.g. `int`, `long[]`, `Person`.
    pub fn type_name(&self) -> &'static str {
        match self {
            TypeRef::Void => "void",
            TypeRef::Object => "Object",
            TypeRef::Boolean => "boolean",
            TypeRef::Byte => "byte",
            TypeRef::Char => "char",
            TypeRef::Short => "short",
            TypeRef::Int => "int",
            TypeRef::Long => "long",
            TypeRef::Float => "float",
            TypeRef::Double => "double",
            TypeRef::String => "String",
            TypeRef::Class => "Class",
            TypeRef::Array(kind) => kind.type_name(),
            TypeRef::List => "List",
            TypeRef::Set => "Set",
            TypeRef::Map => "Map",
            TypeRef::Named(name) => name,
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

type SharedFn = dyn Fn(&dyn Any, &[PojoValue]) -> Result<PojoValue, InvokeError> + Send + Sync;
type ExclusiveFn =
    dyn Fn(&mut dyn Any, &[PojoValue]) -> Result<PojoValue, InvokeError> + Send + Sync;

/// The code behind a [`PojoMethod`], operating on a type-erased receiver.
pub enum MethodBody {
    /// Reads from the receiver.
    Shared(Box<SharedFn>),
    /// Mutates the receiver.
    Exclusive(Box<ExclusiveFn>),
}

impl MethodBody {
    /// Body taking a shared receiver.
    pub fn shared<F>(body: F) -> Self
    where
        F: Fn(&dyn Any, &[PojoValue]) -> Result<PojoValue, InvokeError> + Send + Sync + 'static,
    {
        MethodBody::Shared(Box::new(body))
    }

    /// Body taking an exclusive receiver.
    pub fn exclusive<F>(body: F) -> Self
    where
        F: Fn(&mut dyn Any, &[PojoValue]) -> Result<PojoValue, InvokeError>
            + Send
            + Sync
            + 'static,
    {
        MethodBody::Exclusive(Box::new(body))
    }
}

/// A reflectively callable method.
pub struct PojoMethod {
    name: &'static str,
    params: Vec<TypeRef>,
    returns: TypeRef,
    body: MethodBody,
}

impl PojoMethod {
    /// Describes a method.
    pub fn new(
        name: &'static str,
        params: Vec<TypeRef>,
        returns: TypeRef,
        body: MethodBody,
    ) -> Self {
        Self {
            name,
            params,
            returns,
            body,
        }
    }

    /// Method name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Declared parameter types.
    pub fn params(&self) -> &[TypeRef] {
        &self.params
    }

    /// Number of parameters.
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// Declared return type.
    pub fn returns(&self) -> TypeRef {
        self.returns
    }

    /// The method body.
    pub fn body(&self) -> &MethodBody {
        &self.body
    }
}

impl fmt::Debug for PojoMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}(", self.returns, self.name)?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{param}")?;
        }
        f.write_str(")")
    }
}

/// Describes a reflective type: its name and its methods, in declaration order.
///
/// Classes live in `'static` storage (see [`Pojo::pojo_class`]) and are
/// compared by address.
pub struct PojoClass {
    name: &'static str,
    methods: Vec<PojoMethod>,
}

impl PojoClass {
    /// Starts describing the class of `T`.
    pub fn builder<T: Pojo>(name: &'static str) -> PojoClassBuilder<T> {
        PojoClassBuilder {
            name,
            methods: Vec::new(),
            _ty: PhantomData,
        }
    }

    /// Class name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// All methods, in declaration order.
    pub fn methods(&self) -> &[PojoMethod] {
        &self.methods
    }

    /// First method called `name`.
    pub fn method(&self, name: &str) -> Option<&PojoMethod> {
        self.methods.iter().find(|m| m.name == name)
    }

    /// True if `method` is one of this class's methods (by address).
    pub fn declares(&self, method: &PojoMethod) -> bool {
        self.methods.iter().any(|m| core::ptr::eq(m, method))
    }
}

impl fmt::Debug for PojoClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PojoClass")
            .field("name", &self.name)
            .field("methods", &self.methods)
            .finish()
    }
}

/// Builder for [`PojoClass`], with typed helpers for the common accessor shapes.
pub struct PojoClassBuilder<T> {
    name: &'static str,
    methods: Vec<PojoMethod>,
    _ty: PhantomData<fn() -> T>,
}

fn receiver<'a, T: 'static>(method: &'static str, this: &'a dyn Any) -> Result<&'a T, InvokeError> {
    this.downcast_ref::<T>().ok_or(InvokeError::Receiver {
        method,
        expected: core::any::type_name::<T>(),
    })
}

fn receiver_mut<'a, T: 'static>(
    method: &'static str,
    this: &'a mut dyn Any,
) -> Result<&'a mut T, InvokeError> {
    this.downcast_mut::<T>().ok_or(InvokeError::Receiver {
        method,
        expected: core::any::type_name::<T>(),
    })
}

fn single_arg(method: &'static str, args: &[PojoValue]) -> Result<PojoValue, InvokeError> {
    match args {
        [arg] => Ok(arg.clone()),
        _ => Err(InvokeError::Arity {
            method,
            expected: 1,
            actual: args.len(),
        }),
    }
}

impl<T: Pojo> PojoClassBuilder<T> {
    /// Adds a zero-argument method returning `returns`.
    pub fn getter<F>(mut self, name: &'static str, returns: TypeRef, get: F) -> Self
    where
        F: Fn(&T) -> PojoValue + Send + Sync + 'static,
    {
        let body = MethodBody::shared(move |this, _args| Ok(get(receiver::<T>(name, this)?)));
        self.methods.push(PojoMethod::new(name, Vec::new(), returns, body));
        self
    }

    /// Adds a one-argument `void` method that mutates the receiver.
    pub fn setter<F>(mut self, name: &'static str, param: TypeRef, set: F) -> Self
    where
        F: Fn(&mut T, PojoValue) -> Result<(), InvokeError> + Send + Sync + 'static,
    {
        let body = MethodBody::exclusive(move |this, args| {
            let arg = single_arg(name, args)?;
            set(receiver_mut::<T>(name, this)?, arg)?;
            Ok(PojoValue::Null)
        });
        self.methods.push(PojoMethod::new(name, vec![param], TypeRef::Void, body));
        self
    }

    /// Adds a one-argument method returning a new instance of this class.
    pub fn wither<F>(mut self, name: &'static str, param: TypeRef, with: F) -> Self
    where
        F: Fn(&T, PojoValue) -> Result<T, InvokeError> + Send + Sync + 'static,
    {
        let body = MethodBody::shared(move |this, args| {
            let arg = single_arg(name, args)?;
            let next = with(receiver::<T>(name, this)?, arg)?;
            Ok(PojoValue::Object(PojoObject::new(next)))
        });
        self.methods.push(PojoMethod::new(
            name,
            vec![param],
            TypeRef::Named(self.name),
            body,
        ));
        self
    }

    /// Adds an arbitrary method.
    pub fn method(mut self, method: PojoMethod) -> Self {
        self.methods.push(method);
        self
    }

    /// Finishes the class.
    pub fn build(self) -> PojoClass {
        PojoClass {
            name: self.name,
            methods: self.methods,
        }
    }
}
