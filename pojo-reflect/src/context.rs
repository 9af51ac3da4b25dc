use core::fmt;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use pojo_core::{PojoClass, PojoEntry, PojoMap, PojoSet, PojoValue};

use crate::{PojoProperty, discover_properties};

/// Properties of one class, sorted by name.
pub type PropertyList = Arc<[Arc<dyn PojoProperty>]>;

/// Supplies what nodes need from the outside: the properties of object
/// classes, and the collections built when a node's children are replaced.
pub trait PojoNodeContext: fmt::Debug + Send + Sync {
    /// The properties of `class`, sorted by name.
    fn properties(&self, class: &'static PojoClass) -> PropertyList;

    /// A new list holding `values`.
    fn new_list(&self, values: Vec<PojoValue>) -> PojoValue {
        PojoValue::list(values)
    }

    /// A new set holding `values`. Duplicates collapse onto the first
    /// occurrence.
    fn new_set(&self, values: Vec<PojoValue>) -> PojoValue {
        PojoValue::Set(values.into_iter().collect::<PojoSet>())
    }

    /// A new map holding `entries`. A repeated key keeps its first position
    /// and its last value.
    fn new_map(&self, entries: Vec<PojoEntry>) -> PojoValue {
        PojoValue::Map(entries.into_iter().collect::<PojoMap>())
    }
}

/// The default context: discovers properties from method names and caches them
/// per class. Entries are never invalidated.
#[derive(Default)]
pub struct ReflectiveContext {
    cache: RwLock<HashMap<usize, PropertyList>>,
}

fn class_key(class: &'static PojoClass) -> usize {
    class as *const PojoClass as usize
}

impl ReflectiveContext {
    /// An empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty context, ready to hand to [`crate::PojoNode::wrap`].
    pub fn shared() -> Arc<dyn PojoNodeContext> {
        Arc::new(Self::new())
    }

    /// Number of classes whose properties have been discovered.
    pub fn cached_classes(&self) -> usize {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl PojoNodeContext for ReflectiveContext {
    fn properties(&self, class: &'static PojoClass) -> PropertyList {
        let key = class_key(class);
        if let Some(found) = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            return found.clone();
        }

        let discovered: PropertyList = discover_properties(class).into();
        crate::debug!(
            "discovered {} properties on {}",
            discovered.len(),
            class.name()
        );

        // Another thread may have won the race; keep whichever landed first.
        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(key)
            .or_insert(discovered)
            .clone()
    }
}

impl fmt::Debug for ReflectiveContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReflectiveContext")
            .field("cached_classes", &self.cached_classes())
            .finish()
    }
}
