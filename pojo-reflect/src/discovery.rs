//! Finds the properties of a [`PojoClass`] by looking at its method names and
//! signatures.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::sync::Arc;

use pojo_core::{PojoClass, PojoMethod, PojoName, TypeRef};

use crate::{PojoProperty, ReadOnlyProperty, ReadWriteProperty};

const IGNORED_GETTERS: &[&str] = &["getClass", "hashCode", "toString"];

/// Lower rank wins when several getters map to the same property.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum GetterStyle {
    Get,
    Is,
    Bare,
}

struct Getter {
    method: &'static PojoMethod,
    style: GetterStyle,
}

/// `URL` stays `URL`, `Name` becomes `name`.
fn decapitalize(name: &str) -> String {
    let mut chars = name.chars();
    let (Some(first), second) = (chars.next(), chars.next()) else {
        return String::new();
    };
    if first.is_uppercase() && second.is_some_and(char::is_uppercase) {
        return name.to_owned();
    }
    let mut out = String::with_capacity(name.len());
    out.extend(first.to_lowercase());
    out.push_str(&name[first.len_utf8()..]);
    out
}

fn accessor_suffix<'a>(name: &'a str, prefix: &str) -> Option<&'a str> {
    name.strip_prefix(prefix).filter(|rest| !rest.is_empty())
}

fn as_getter(method: &'static PojoMethod) -> Option<(String, Getter)> {
    if method.arity() != 0
        || method.returns() == TypeRef::Void
        || IGNORED_GETTERS.contains(&method.name())
    {
        return None;
    }

    let name = method.name();
    let (property, style) = if let Some(rest) = accessor_suffix(name, "get") {
        (decapitalize(rest), GetterStyle::Get)
    } else if let Some(rest) =
        accessor_suffix(name, "is").filter(|_| method.returns() == TypeRef::Boolean)
    {
        (decapitalize(rest), GetterStyle::Is)
    } else {
        (name.to_owned(), GetterStyle::Bare)
    };
    Some((property, Getter { method, style }))
}

fn as_setter(method: &'static PojoMethod) -> Option<(String, &'static PojoMethod)> {
    if method.arity() != 1 {
        return None;
    }
    let rest = accessor_suffix(method.name(), "set")?;
    Some((decapitalize(rest), method))
}

/// Discovers the properties of `class`, sorted by name.
///
/// A getter is any zero-argument, non-`void` method other than `getClass`,
/// `hashCode` and `toString`: `getXxx` names property `xxx`, `isXxx` does too
/// when it returns `boolean`, and any other name is a record-style accessor
/// naming the property after itself. When several getters name the same
/// property, `getXxx` beats `isXxx`, which beats the bare accessor.
///
/// A one-argument `setXxx` whose parameter is the getter's return type (or
/// `Object`) turns the property read-write. An exact type match is preferred.
pub fn discover_properties(class: &'static PojoClass) -> Vec<Arc<dyn PojoProperty>> {
    let mut getters: BTreeMap<String, Getter> = BTreeMap::new();
    let mut setters: Vec<(String, &'static PojoMethod)> = Vec::new();

    for method in class.methods() {
        if let Some((property, getter)) = as_getter(method) {
            match getters.entry(property) {
                Entry::Vacant(slot) => {
                    slot.insert(getter);
                }
                Entry::Occupied(mut slot) => {
                    if getter.style < slot.get().style {
                        slot.insert(getter);
                    }
                }
            }
        } else if let Some(setter) = as_setter(method) {
            setters.push(setter);
        }
    }

    getters
        .into_iter()
        .map(|(property, getter)| {
            let value_type = getter.method.returns();
            let matching = |exact: bool| {
                setters.iter().find_map(|(name, setter)| {
                    let param = setter.params()[0];
                    let fits = if exact {
                        param == value_type
                    } else {
                        param == TypeRef::Object
                    };
                    (*name == property && fits).then_some(*setter)
                })
            };
            let name = PojoName::property(property.as_str());
            let discovered: Arc<dyn PojoProperty> =
                match matching(true).or_else(|| matching(false)) {
                    Some(setter) => Arc::new(ReadWriteProperty::new(name, getter.method, setter)),
                    None => Arc::new(ReadOnlyProperty::new(name, getter.method)),
                };
            discovered
        })
        .collect()
}
