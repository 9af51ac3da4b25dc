//! Copy-on-write updates.
//!
//! A wrapped value is never changed. Updating a node builds the new value for
//! its parent, then for the parent's parent, and so on up to the root. Every
//! node off that path keeps its core; array and list siblings of the changed
//! child are carried over into the new parent as-is.

use std::sync::Arc;

use pojo_core::{PojoArray, PojoEntry, PojoObject, PojoValue};

use crate::node::{ChildCores, NodeCore};
use crate::{NodeKind, PojoError, PojoNode};

fn slot<T>(items: &mut [T], index: usize) -> Result<&mut T, PojoError> {
    let len = items.len();
    items
        .get_mut(index)
        .ok_or(PojoError::IndexOutOfBounds { index, len })
}

fn insert_at<T>(items: &mut Vec<T>, index: usize, item: T) -> Result<(), PojoError> {
    if index > items.len() {
        return Err(PojoError::IndexOutOfBounds {
            index,
            len: items.len(),
        });
    }
    items.insert(index, item);
    Ok(())
}

fn remove_at<T>(items: &mut Vec<T>, index: usize) -> Result<T, PojoError> {
    if index >= items.len() {
        return Err(PojoError::IndexOutOfBounds {
            index,
            len: items.len(),
        });
    }
    Ok(items.remove(index))
}

fn as_entry(index: usize, value: PojoValue) -> Result<PojoEntry, PojoError> {
    match value {
        PojoValue::Entry(entry) => Ok(entry),
        other => Err(PojoError::ElementType {
            index,
            message: format!("expected a map entry, got {}", other.type_name()),
        }),
    }
}

fn as_entries(values: impl IntoIterator<Item = PojoValue>) -> Result<Vec<PojoEntry>, PojoError> {
    values
        .into_iter()
        .enumerate()
        .map(|(index, value)| as_entry(index, value))
        .collect()
}

impl PojoNode {
    /// Replaces the wrapped value.
    ///
    /// Returns the node wrapping `value` in the updated tree: its ancestors are
    /// new nodes over new values, up to a new root. `self` and the tree it
    /// belongs to are left unchanged. If `value` equals the current value,
    /// `self` is returned as-is.
    ///
    /// Fails when an ancestor cannot take the new value: an array of the
    /// wrong element type, a read-only property, a failing setter, or a map
    /// given something other than an entry.
    pub fn set_value(&self, value: impl Into<PojoValue>) -> Result<PojoNode, PojoError> {
        let value = value.into();
        if value == *self.value() {
            return Ok(self.clone());
        }
        self.replace_with(self.rewrap(value, None))
    }

    fn replace_with(&self, core: Arc<NodeCore>) -> Result<PojoNode, PojoError> {
        let (Some(parent), Some(index)) = (&self.parent, self.index) else {
            return Ok(PojoNode::root_of(core));
        };
        let parent = parent.splice_child(index, &core)?;
        parent.locate(index, &core)
    }

    /// The parent updated so that its child at `index` is `child`.
    fn splice_child(&self, index: usize, child: &Arc<NodeCore>) -> Result<PojoNode, PojoError> {
        let value = self.value_with_child(index, child.value.clone())?;
        if value == *self.value() {
            return Ok(self.clone());
        }
        crate::debug!("splicing {} into {} at {}", child.name, self.name(), index);
        let known = self.spliced_children(index, child);
        self.replace_with(self.rewrap(value, known))
    }

    /// Children for the new parent when they can be carried over.
    fn spliced_children(&self, index: usize, child: &Arc<NodeCore>) -> Option<ChildCores> {
        if !matches!(self.kind(), NodeKind::Array(_) | NodeKind::List) {
            return None;
        }
        let mut cores = self.core.known_children()?.to_vec();
        *cores.get_mut(index)? = child.clone();
        Some(cores.into())
    }

    /// Finds the spliced child in the updated parent. Sets and maps may have
    /// moved it: a replacement equal to another element (or, for maps, with
    /// another entry's key) collapses onto the earlier position.
    fn locate(&self, index: usize, child: &NodeCore) -> Result<PojoNode, PojoError> {
        let position = match self.kind() {
            NodeKind::Set | NodeKind::Map => self.position_of(&child.value)?.unwrap_or(index),
            _ => index,
        };
        self.child(position)
    }

    fn value_with_child(&self, index: usize, child: PojoValue) -> Result<PojoValue, PojoError> {
        let context = self.context();
        match self.value() {
            PojoValue::Array(array) => Ok(PojoValue::Array(array.with_element(index, child)?)),
            PojoValue::List(list) => {
                let mut values = list.as_slice().to_vec();
                *slot(&mut values, index)? = child;
                Ok(context.new_list(values))
            }
            PojoValue::Set(_) => {
                let mut values = self.children_values()?.to_vec();
                *slot(&mut values, index)? = child;
                Ok(context.new_set(values))
            }
            PojoValue::Map(_) => {
                let entry = as_entry(index, child)?;
                let mut entries = as_entries(self.children_values()?.iter().cloned())?;
                *slot(&mut entries, index)? = entry;
                Ok(context.new_map(entries))
            }
            PojoValue::Entry(entry) => match index {
                0 => Ok(PojoValue::Entry(entry.with_key(child))),
                1 => Ok(PojoValue::Entry(entry.with_value(child))),
                _ => Err(PojoError::IndexOutOfBounds { index, len: 2 }),
            },
            PojoValue::Object(object) => {
                let properties = context.properties(object.class());
                let property = properties.get(index).ok_or(PojoError::IndexOutOfBounds {
                    index,
                    len: properties.len(),
                })?;
                Ok(PojoValue::Object(property.set(object, child)?))
            }
            _ => Err(PojoError::IndexOutOfBounds { index, len: 0 }),
        }
    }

    fn object_with_values(
        &self,
        object: &PojoObject,
        values: Vec<PojoValue>,
    ) -> Result<PojoObject, PojoError> {
        let properties = self.context().properties(object.class());
        if properties.len() != values.len() {
            return Err(PojoError::ChildCountMismatch {
                expected: properties.len(),
                actual: values.len(),
            });
        }

        let mut updated = object.clone();
        for (property, value) in properties.iter().zip(values) {
            if property.get(&updated)? == value {
                continue;
            }
            if property.is_read_only() {
                return Err(PojoError::ReadOnlyProperty {
                    property: property.name().clone(),
                });
            }
            updated = property.set(&updated, value)?;
        }
        Ok(updated)
    }

    /// Replaces every child value at once.
    ///
    /// Objects need exactly one value per property, in property order; a
    /// read-only property must be given its current value. Arrays check every
    /// element against their element type. Maps need entries. Entries need a
    /// key and a value. Leaves accept only an empty list.
    pub fn set_children_values(&self, values: Vec<PojoValue>) -> Result<PojoNode, PojoError> {
        let context = self.context();
        let value = match self.value() {
            PojoValue::Array(array) => PojoValue::Array(PojoArray::from_values(array.kind(), values)?),
            PojoValue::List(_) => context.new_list(values),
            PojoValue::Set(_) => context.new_set(values),
            PojoValue::Map(_) => context.new_map(as_entries(values)?),
            PojoValue::Entry(_) => {
                let [key, value] = <[PojoValue; 2]>::try_from(values).map_err(|values| {
                    PojoError::ChildCountMismatch {
                        expected: 2,
                        actual: values.len(),
                    }
                })?;
                PojoValue::Entry(PojoEntry::new(key, value))
            }
            PojoValue::Object(object) => PojoValue::Object(self.object_with_values(object, values)?),
            _ if values.is_empty() => return Ok(self.clone()),
            _ => {
                return Err(PojoError::ChildCountMismatch {
                    expected: 0,
                    actual: values.len(),
                });
            }
        };
        self.set_value(value)
    }

    /// Replaces every child with the value of the matching node in `children`.
    pub fn set_children(&self, children: &[PojoNode]) -> Result<PojoNode, PojoError> {
        self.set_children_values(children.iter().map(|child| child.value().clone()).collect())
    }

    /// Inserts `value` as the child at `index`, shifting later children.
    ///
    /// Supported on arrays, lists, sets and maps (which need an entry). A set
    /// that already holds `value` keeps it where it was.
    pub fn insert_child(
        &self,
        index: usize,
        value: impl Into<PojoValue>,
    ) -> Result<PojoNode, PojoError> {
        let value = value.into();
        let context = self.context();
        let updated = match self.value() {
            PojoValue::Array(array) => PojoValue::Array(array.with_inserted(index, value)?),
            PojoValue::List(list) => {
                let mut values = list.as_slice().to_vec();
                insert_at(&mut values, index, value)?;
                context.new_list(values)
            }
            PojoValue::Set(_) => {
                let mut values = self.children_values()?.to_vec();
                insert_at(&mut values, index, value)?;
                context.new_set(values)
            }
            PojoValue::Map(_) => {
                let entry = as_entry(index, value)?;
                let mut entries = as_entries(self.children_values()?.iter().cloned())?;
                insert_at(&mut entries, index, entry)?;
                context.new_map(entries)
            }
            _ => return Err(PojoError::unsupported("insert_child", self.kind())),
        };
        self.set_value(updated)
    }

    /// Appends `value` after the last child.
    pub fn push_child(&self, value: impl Into<PojoValue>) -> Result<PojoNode, PojoError> {
        if !self.kind().is_sequence() {
            return Err(PojoError::unsupported("push_child", self.kind()));
        }
        self.insert_child(self.child_count()?, value)
    }

    /// Removes the child at `index`, shifting later children.
    pub fn remove_child(&self, index: usize) -> Result<PojoNode, PojoError> {
        let context = self.context();
        let updated = match self.value() {
            PojoValue::Array(array) => PojoValue::Array(array.with_removed(index)?),
            PojoValue::List(list) => {
                let mut values = list.as_slice().to_vec();
                remove_at(&mut values, index)?;
                context.new_list(values)
            }
            PojoValue::Set(_) => {
                let mut values = self.children_values()?.to_vec();
                remove_at(&mut values, index)?;
                context.new_set(values)
            }
            PojoValue::Map(_) => {
                let mut entries = as_entries(self.children_values()?.iter().cloned())?;
                remove_at(&mut entries, index)?;
                context.new_map(entries)
            }
            _ => return Err(PojoError::unsupported("remove_child", self.kind())),
        };
        self.set_value(updated)
    }
}
