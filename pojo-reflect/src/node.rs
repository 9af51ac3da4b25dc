use core::fmt;
use std::sync::{Arc, LazyLock, Mutex, OnceLock, PoisonError};

use pojo_core::{PojoEntry, PojoMap, PojoName, PojoObject, PojoSet, PojoValue};

use crate::adapter::IterAdapter;
use crate::{NodeKind, PojoError, PojoNodeContext, PojoPath};

static KEY: LazyLock<PojoName> = LazyLock::new(|| PojoName::property("key"));
static VALUE: LazyLock<PojoName> = LazyLock::new(|| PojoName::property("value"));

pub(crate) type ChildCores = Arc<[Arc<NodeCore>]>;

/// How a core produces its children.
enum Children {
    Leaf,
    /// Computed once from the (immutable) value.
    Memo(OnceLock<ChildCores>),
    SetElements(Mutex<IterAdapter<PojoSet, Arc<NodeCore>>>),
    MapEntries(Mutex<IterAdapter<PojoMap, Arc<NodeCore>>>),
}

/// The part of a node that depends only on its name and value. Shared by every
/// node handle that wraps the same value at the same place.
pub(crate) struct NodeCore {
    pub(crate) name: PojoName,
    pub(crate) value: PojoValue,
    pub(crate) kind: NodeKind,
    pub(crate) context: Arc<dyn PojoNodeContext>,
    children: Children,
}

impl NodeCore {
    pub(crate) fn new(
        name: PojoName,
        value: PojoValue,
        context: Arc<dyn PojoNodeContext>,
    ) -> Arc<Self> {
        Self::with_children(name, value, context, None)
    }

    /// Like [`NodeCore::new`], with the children already known.
    pub(crate) fn with_children(
        name: PojoName,
        value: PojoValue,
        context: Arc<dyn PojoNodeContext>,
        known: Option<ChildCores>,
    ) -> Arc<Self> {
        let kind = NodeKind::of(&value);
        crate::trace!("wrapping {} as {} node", name, kind);
        let children = match &value {
            PojoValue::Set(set) => Children::SetElements(Mutex::new(IterAdapter::new(set.clone()))),
            PojoValue::Map(map) => Children::MapEntries(Mutex::new(IterAdapter::new(map.clone()))),
            _ if kind.is_leaf() => Children::Leaf,
            _ => Children::Memo(known.map(OnceLock::from).unwrap_or_default()),
        };
        Arc::new(NodeCore {
            name,
            value,
            kind,
            context,
            children,
        })
    }

    fn child(&self, name: PojoName, value: PojoValue) -> Arc<NodeCore> {
        NodeCore::new(name, value, self.context.clone())
    }

    fn build_children(&self) -> Result<Vec<Arc<NodeCore>>, PojoError> {
        let indexed = |values: Vec<PojoValue>| -> Vec<Arc<NodeCore>> {
            values
                .into_iter()
                .enumerate()
                .map(|(i, value)| self.child(PojoName::index(i), value))
                .collect()
        };
        Ok(match &self.value {
            PojoValue::Array(array) => indexed(array.values()),
            PojoValue::List(list) => indexed(list.as_slice().to_vec()),
            PojoValue::Entry(entry) => vec![
                self.child(KEY.clone(), entry.key().clone()),
                self.child(VALUE.clone(), entry.value().clone()),
            ],
            PojoValue::Object(object) => self.property_children(object)?,
            _ => Vec::new(),
        })
    }

    fn property_children(&self, object: &PojoObject) -> Result<Vec<Arc<NodeCore>>, PojoError> {
        self.context
            .properties(object.class())
            .iter()
            .map(|property| {
                let value = property.get(object)?;
                Ok(self.child(property.name().clone(), value))
            })
            .collect()
    }

    /// Every child core, reading live collections to the end.
    pub(crate) fn child_cores(&self) -> Result<ChildCores, PojoError> {
        match &self.children {
            Children::Leaf => Ok(Arc::from([])),
            Children::Memo(memo) => {
                if let Some(known) = memo.get() {
                    return Ok(known.clone());
                }
                let built: ChildCores = self.build_children()?.into();
                Ok(memo.get_or_init(|| built).clone())
            }
            Children::SetElements(adapter) => {
                let mut adapter = adapter.lock().unwrap_or_else(PoisonError::into_inner);
                let held = adapter.fill_all(|i, value| self.child(PojoName::index(i), value))?;
                Ok(held.into())
            }
            Children::MapEntries(adapter) => {
                let mut adapter = adapter.lock().unwrap_or_else(PoisonError::into_inner);
                let held = adapter.fill_all(|i, entry| {
                    self.child(PojoName::index(i), PojoValue::Entry(entry))
                })?;
                Ok(held.into())
            }
        }
    }

    /// The child core at `index`, reading live collections only as far as
    /// needed.
    pub(crate) fn child_core(&self, index: usize) -> Result<Arc<NodeCore>, PojoError> {
        match &self.children {
            Children::SetElements(adapter) => adapter
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .get(index, |i, value| self.child(PojoName::index(i), value)),
            Children::MapEntries(adapter) => adapter
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .get(index, |i, entry| {
                    self.child(PojoName::index(i), PojoValue::Entry(entry))
                }),
            Children::Leaf | Children::Memo(_) => {
                let cores = self.child_cores()?;
                cores
                    .get(index)
                    .cloned()
                    .ok_or(PojoError::IndexOutOfBounds {
                        index,
                        len: cores.len(),
                    })
            }
        }
    }

    /// Children already computed, without computing them.
    pub(crate) fn known_children(&self) -> Option<ChildCores> {
        match &self.children {
            Children::Memo(memo) => memo.get().cloned(),
            _ => None,
        }
    }
}

/// A node in a tree built over a [`PojoValue`].
///
/// A node is a cheap handle: a shared core holding the name, the value and the
/// memoized children, plus the chain of ancestors it was reached through.
/// Cloning a node never copies the wrapped value.
#[derive(Clone)]
pub struct PojoNode {
    pub(crate) core: Arc<NodeCore>,
    pub(crate) parent: Option<Arc<PojoNode>>,
    pub(crate) index: Option<usize>,
}

impl PojoNode {
    /// Wraps `value` as a root node.
    pub fn wrap(
        name: impl Into<PojoName>,
        value: impl Into<PojoValue>,
        context: Arc<dyn PojoNodeContext>,
    ) -> Self {
        Self::root_of(NodeCore::new(name.into(), value.into(), context))
    }

    pub(crate) fn root_of(core: Arc<NodeCore>) -> Self {
        PojoNode {
            core,
            parent: None,
            index: None,
        }
    }

    /// The node's name: a property name under objects and entries, an index
    /// under arrays and collections.
    pub fn name(&self) -> &PojoName {
        &self.core.name
    }

    /// The wrapped value.
    pub fn value(&self) -> &PojoValue {
        &self.core.value
    }

    /// What kind of value is wrapped.
    pub fn kind(&self) -> NodeKind {
        self.core.kind
    }

    /// Position among the parent's children; `None` for the root.
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// The node this one was reached from.
    pub fn parent(&self) -> Option<&PojoNode> {
        self.parent.as_deref()
    }

    /// The context shared by the whole tree.
    pub fn context(&self) -> &Arc<dyn PojoNodeContext> {
        &self.core.context
    }

    /// True for a node without a parent.
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// The topmost ancestor (or this node).
    pub fn root(&self) -> PojoNode {
        let mut node = self;
        while let Some(parent) = node.parent() {
            node = parent;
        }
        node.clone()
    }

    /// True if both handles share a core and sit at the same position.
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.core, &b.core) && a.index == b.index
    }

    fn adopt(&self, parent: &Arc<PojoNode>, index: usize, core: Arc<NodeCore>) -> PojoNode {
        debug_assert!(Arc::ptr_eq(&parent.core, &self.core));
        PojoNode {
            core,
            parent: Some(parent.clone()),
            index: Some(index),
        }
    }

    /// Number of children.
    pub fn child_count(&self) -> Result<usize, PojoError> {
        Ok(self.core.child_cores()?.len())
    }

    /// All children, in order.
    pub fn children(&self) -> Result<Vec<PojoNode>, PojoError> {
        let cores = self.core.child_cores()?;
        let parent = Arc::new(self.clone());
        Ok(cores
            .iter()
            .enumerate()
            .map(|(i, core)| self.adopt(&parent, i, core.clone()))
            .collect())
    }

    /// The child at `index`.
    pub fn child(&self, index: usize) -> Result<PojoNode, PojoError> {
        let core = self.core.child_core(index)?;
        Ok(self.adopt(&Arc::new(self.clone()), index, core))
    }

    /// The child called `name`.
    pub fn child_by_name(&self, name: impl Into<PojoName>) -> Result<PojoNode, PojoError> {
        let name = name.into();
        if let (Some(index), true) = (name.as_index(), self.kind().is_sequence()) {
            return self.child(index).map_err(|err| match err {
                PojoError::IndexOutOfBounds { .. } => PojoError::NoSuchChild { name },
                other => other,
            });
        }
        let cores = self.core.child_cores()?;
        match cores.iter().position(|core| core.name == name) {
            Some(index) => Ok(self.adopt(&Arc::new(self.clone()), index, cores[index].clone())),
            None => Err(PojoError::NoSuchChild { name }),
        }
    }

    /// The values of the children, in order.
    pub fn children_values(&self) -> Result<Arc<[PojoValue]>, PojoError> {
        Ok(self
            .core
            .child_cores()?
            .iter()
            .map(|core| core.value.clone())
            .collect())
    }

    /// The names leading from the root to this node. The root's own name is not
    /// part of the path.
    pub fn path(&self) -> PojoPath {
        let mut names = Vec::new();
        let mut node = self;
        while let Some(parent) = node.parent() {
            names.push(node.name().clone());
            node = parent;
        }
        names.into_iter().rev().collect()
    }

    /// Follows `path` down from this node.
    pub fn resolve(&self, path: &PojoPath) -> Result<PojoNode, PojoError> {
        path.names()
            .iter()
            .try_fold(self.clone(), |node, name| node.child_by_name(name.clone()))
    }

    /// A core for `value` with this node's name and context.
    pub(crate) fn rewrap(&self, value: PojoValue, known: Option<ChildCores>) -> Arc<NodeCore> {
        NodeCore::with_children(self.name().clone(), value, self.context().clone(), known)
    }

    /// Position of the child equal to `value` (by key for map entries).
    pub(crate) fn position_of(&self, value: &PojoValue) -> Result<Option<usize>, PojoError> {
        let cores = self.core.child_cores()?;
        let key = value.as_entry().map(PojoEntry::key);
        Ok(cores.iter().position(|core| match (key, core.value.as_entry()) {
            (Some(key), Some(entry)) => entry.key() == key,
            _ => core.value == *value,
        }))
    }
}

impl PartialEq for PojoNode {
    fn eq(&self, other: &Self) -> bool {
        self.value() == other.value()
    }
}

impl Eq for PojoNode {}

impl fmt::Debug for PojoNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PojoNode")
            .field("name", self.name())
            .field("index", &self.index)
            .field("kind", &self.kind())
            .field("value", self.value())
            .finish()
    }
}
