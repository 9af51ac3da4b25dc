use core::any::Any;
use core::fmt;
use core::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::{InvokeError, MethodBody, PojoClass, PojoMethod, PojoValue};

/// A type that can be wrapped as a reflective object.
///
/// Implementors describe themselves once, in `'static` storage:
///
/// ```
/// use std::sync::LazyLock;
/// use pojo_core::{Pojo, PojoClass, PojoValue, TypeRef};
///
/// #[derive(Clone, Debug, PartialEq)]
/// struct Counter {
///     count: i32,
/// }
///
/// impl Pojo for Counter {
///     fn pojo_class() -> &'static PojoClass {
///         static CLASS: LazyLock<PojoClass> = LazyLock::new(|| {
///             PojoClass::builder::<Counter>("Counter")
///                 .getter("getCount", TypeRef::Int, |c| c.count.into())
///                 .setter("setCount", TypeRef::Int, |c, v| {
///                     c.count = i32::try_from(v)?;
///                     Ok(())
///                 })
///                 .build()
///         });
///         &CLASS
///     }
/// }
///
/// let value = PojoValue::object(Counter { count: 1 });
/// assert_eq!(value.type_name(), "Counter");
/// ```
pub trait Pojo: Any + Clone + fmt::Debug + PartialEq + Send + Sync {
    /// The class descriptor shared by every instance.
    fn pojo_class() -> &'static PojoClass;
}

/// Object-safe view of a [`Pojo`].
pub trait DynPojo: Any + fmt::Debug + Send + Sync {
    /// The class descriptor.
    fn class(&self) -> &'static PojoClass;

    /// Upcast for downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Upcast for downcasting.
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Clones the instance behind a new box.
    fn clone_boxed(&self) -> Box<dyn DynPojo>;

    /// Equality against another erased instance.
    fn dyn_eq(&self, other: &dyn DynPojo) -> bool;
}

impl<T: Pojo> DynPojo for T {
    fn class(&self) -> &'static PojoClass {
        T::pojo_class()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn clone_boxed(&self) -> Box<dyn DynPojo> {
        Box::new(self.clone())
    }

    fn dyn_eq(&self, other: &dyn DynPojo) -> bool {
        other
            .as_any()
            .downcast_ref::<T>()
            .is_some_and(|other| self == other)
    }
}

/// The outcome of [`PojoObject::invoke`].
#[derive(Debug, Clone)]
pub struct Invocation {
    /// The instance the method ran against. For shared-receiver methods this is
    /// the original instance; for exclusive-receiver methods it is the mutated
    /// private copy.
    pub receiver: PojoObject,
    /// What the method returned (`Null` for `void`).
    pub returned: PojoValue,
}

/// A shared, immutable handle to a reflective object.
#[derive(Clone)]
pub struct PojoObject {
    instance: Arc<dyn DynPojo>,
}

impl PojoObject {
    /// Wraps `value`.
    pub fn new<T: Pojo>(value: T) -> Self {
        Self {
            instance: Arc::new(value),
        }
    }

    /// The class descriptor.
    pub fn class(&self) -> &'static PojoClass {
        self.instance.class()
    }

    /// Borrows the instance as `T`.
    pub fn downcast_ref<T: Pojo>(&self) -> Option<&T> {
        self.instance.as_any().downcast_ref::<T>()
    }

    /// True if both handles share the same instance.
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.instance, &b.instance)
    }

    /// Calls `method` with `args`.
    ///
    /// The wrapped instance is never mutated: exclusive-receiver methods run
    /// against a private copy, handed back as [`Invocation::receiver`].
    pub fn invoke(&self, method: &PojoMethod, args: &[PojoValue]) -> Result<Invocation, InvokeError> {
        let class = self.class();
        if !class.declares(method) {
            return Err(InvokeError::Receiver {
                method: method.name(),
                expected: class.name(),
            });
        }
        if args.len() != method.arity() {
            return Err(InvokeError::Arity {
                method: method.name(),
                expected: method.arity(),
                actual: args.len(),
            });
        }

        match method.body() {
            MethodBody::Shared(body) => {
                let returned = body(self.instance.as_any(), args)?;
                Ok(Invocation {
                    receiver: self.clone(),
                    returned,
                })
            }
            MethodBody::Exclusive(body) => {
                let mut copy = self.instance.clone_boxed();
                let target: &mut dyn DynPojo = &mut *copy;
                let returned = body(target.as_any_mut(), args)?;
                Ok(Invocation {
                    receiver: PojoObject {
                        instance: Arc::from(copy),
                    },
                    returned,
                })
            }
        }
    }
}

impl PartialEq for PojoObject {
    fn eq(&self, other: &Self) -> bool {
        Self::ptr_eq(self, other)
            || (core::ptr::eq(self.class(), other.class())
                && self.instance.dyn_eq(&*other.instance))
    }
}

impl Eq for PojoObject {}

impl Hash for PojoObject {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Equal objects share a class; field values are not required to be `Hash`.
        (self.class() as *const PojoClass as usize).hash(state);
    }
}

impl fmt::Debug for PojoObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.instance, f)
    }
}
