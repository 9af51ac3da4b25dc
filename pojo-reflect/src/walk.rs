//! Visitor API for depth-first traversal of [`PojoNode`] trees.
//!
//! # Traversal order
//!
//! - **Depth-first, child order.** Object properties come in name order, array
//!   and collection elements by position, map entries as `key` then `value`.
//! - `enter` is called **before** children; `leave` is called **after** them.
//!
//! # Traversal control
//!
//! | Decision        | Effect                                                   |
//! |-----------------|----------------------------------------------------------|
//! | `Recurse`       | Visit children, then call `leave`.                       |
//! | `SkipChildren`  | Skip descendants of this node; `leave` is still called.  |
//! | `Stop`          | Terminate the entire walk immediately.                   |
//!
//! # Cycles
//!
//! Maps are shared handles, so a map can hold itself as one of its values. A
//! set or map already on the current path is reported to `enter`/`leave` but
//! its children are skipped.

use pojo_core::{PojoMap, PojoSet, PojoValue};

use crate::{PojoError, PojoNode, PojoPath};

/// Decision returned by [`NodeVisitor::enter`] to control traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitDecision {
    /// Descend into this node's children, then call [`NodeVisitor::leave`].
    Recurse,
    /// Skip this node's descendants. [`NodeVisitor::leave`] is still called.
    SkipChildren,
    /// Stop the entire walk immediately. No further callbacks are made.
    Stop,
}

/// Outcome of [`walk_node`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkStatus {
    /// The walk visited every reachable node.
    Completed,
    /// The walk was terminated early by [`VisitDecision::Stop`].
    Stopped,
}

/// Receives callbacks as [`walk_node`] descends through a tree.
pub trait NodeVisitor {
    /// Called when the walker enters a node, **before** visiting children.
    fn enter(&mut self, path: &PojoPath, node: &PojoNode) -> VisitDecision;

    /// Called when the walker leaves a node. Not called if `enter` returned
    /// [`VisitDecision::Stop`].
    fn leave(&mut self, path: &PojoPath, node: &PojoNode) {
        let _ = (path, node);
    }
}

/// Walks the tree below `node` depth-first, calling `visitor` at each node.
/// Paths are relative to `node`.
///
/// Fails if reading children fails (a failing getter, or a live collection
/// that keeps changing).
pub fn walk_node(node: &PojoNode, visitor: &mut impl NodeVisitor) -> Result<WalkStatus, PojoError> {
    let mut path = PojoPath::new();
    let mut ancestors = Vec::new();
    Ok(if walk_recursive(node, visitor, &mut path, &mut ancestors)? {
        WalkStatus::Stopped
    } else {
        WalkStatus::Completed
    })
}

fn same_collection(a: &PojoValue, b: &PojoValue) -> bool {
    match (a, b) {
        (PojoValue::Set(a), PojoValue::Set(b)) => PojoSet::ptr_eq(a, b),
        (PojoValue::Map(a), PojoValue::Map(b)) => PojoMap::ptr_eq(a, b),
        _ => false,
    }
}

/// Returns `true` if the walk was stopped.
fn walk_recursive(
    node: &PojoNode,
    visitor: &mut impl NodeVisitor,
    path: &mut PojoPath,
    ancestors: &mut Vec<PojoValue>,
) -> Result<bool, PojoError> {
    let is_cycle = ancestors
        .iter()
        .any(|ancestor| same_collection(ancestor, node.value()));

    match visitor.enter(path, node) {
        VisitDecision::Stop => return Ok(true),
        VisitDecision::SkipChildren => {
            visitor.leave(path, node);
            return Ok(false);
        }
        VisitDecision::Recurse if is_cycle || node.kind().is_leaf() => {
            visitor.leave(path, node);
            return Ok(false);
        }
        VisitDecision::Recurse => {}
    }

    ancestors.push(node.value().clone());
    let mut stopped = false;
    for child in node.children()? {
        path.push(child.name().clone());
        stopped = walk_recursive(&child, visitor, path, ancestors)?;
        path.pop();
        if stopped {
            break;
        }
    }
    ancestors.pop();

    if !stopped {
        visitor.leave(path, node);
    }
    Ok(stopped)
}
