//! One grammar level: an ordered vector of optional node slots.

use std::collections::HashSet;
use std::ops::ControlFlow;

use crate::error::{Error, Result};
use crate::grammar::{Arena, NodeId, TreeId};

/// Ordered sibling slots of one grammar level.
///
/// A slot may be empty, marking a structurally absent child. The container
/// never orders its contents by itself; see
/// [`Arena::insert_or_merge`](crate::grammar::Arena::insert_or_merge) and
/// [`Arena::sort`](crate::grammar::Arena::sort).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseTree {
    slots: Vec<Option<NodeId>>,
    /// Children are drawn from rather than consumed in order, and may repeat
    /// unless individually marked chosen.
    pub set: bool,
    pub name: Option<String>,
}

impl ParseTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Number of slots, empty ones included.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slots(&self) -> &[Option<NodeId>] {
        &self.slots
    }

    pub fn get(&self, i: usize) -> Option<NodeId> {
        self.slots.get(i).copied().flatten()
    }

    /// The occupied slots, in order.
    pub fn nodes(&self) -> impl DoubleEndedIterator<Item = NodeId> + '_ {
        self.slots.iter().flatten().copied()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.slots.contains(&Some(id))
    }

    pub fn position(&self, id: NodeId) -> Option<usize> {
        self.slots.iter().position(|s| *s == Some(id))
    }

    pub fn push(&mut self, id: NodeId) {
        self.slots.push(Some(id));
    }

    pub fn push_slot(&mut self, slot: Option<NodeId>) {
        self.slots.push(slot);
    }

    /// Insert a slot at `i`, shifting later slots right.
    pub fn insert(&mut self, i: usize, slot: Option<NodeId>) -> Result<()> {
        if i > self.slots.len() {
            return Err(Error::Invariant(format!(
                "insert at {i} past end of tree with {} slots",
                self.slots.len()
            )));
        }
        self.slots.insert(i, slot);
        Ok(())
    }

    /// Empty slot `i` without removing it, returning what it held.
    pub fn clear_slot(&mut self, i: usize) -> Option<NodeId> {
        self.slots.get_mut(i).and_then(Option::take)
    }

    /// Remove slot `i`, shifting later slots left.
    pub fn remove(&mut self, i: usize) -> Option<Option<NodeId>> {
        (i < self.slots.len()).then(|| self.slots.remove(i))
    }

    /// Cut to `len` slots, returning the nodes that were cut off.
    pub fn truncate(&mut self, len: usize) -> Vec<NodeId> {
        if len >= self.slots.len() {
            return Vec::new();
        }
        self.slots.split_off(len).into_iter().flatten().collect()
    }

    pub(crate) fn take_slots(&mut self) -> Vec<Option<NodeId>> {
        std::mem::take(&mut self.slots)
    }

    pub(crate) fn set_slots(&mut self, slots: Vec<Option<NodeId>>) {
        self.slots = slots;
    }
}

impl Arena {
    /// Remove slot `i` of `tree`. With `release`, the removed node and its
    /// owned subtree are released and `None` is returned; otherwise the
    /// detached node is returned to the caller.
    pub fn delete(&mut self, tree: TreeId, i: usize, release: bool) -> Result<Option<NodeId>> {
        let removed = self
            .tree_mut(tree)?
            .remove(i)
            .ok_or_else(|| Error::Invariant(format!("no slot {i} in tree {tree}")))?;
        let Some(id) = removed else {
            return Ok(None);
        };
        if release {
            self.release_node(id)?;
            Ok(None)
        } else {
            self.node_mut(id)?.parent = None;
            Ok(Some(id))
        }
    }

    /// Cut `tree` to `len` slots, releasing what was cut off.
    pub fn truncate(&mut self, tree: TreeId, len: usize) -> Result<()> {
        for id in self.tree_mut(tree)?.truncate(len) {
            self.release_node(id)?;
        }
        Ok(())
    }

    /// Visit nodes depth-first, pre-order, down to `depth` levels (1 visits
    /// only `tree` itself). The visitor may stop the walk early.
    ///
    /// Each tree is entered at most once, so cyclic or shared structures are
    /// walked without marking nodes.
    pub fn apply<F>(&self, tree: TreeId, depth: usize, mut visit: F) -> Result<ControlFlow<()>>
    where
        F: FnMut(&Arena, NodeId, usize) -> ControlFlow<()>,
    {
        let mut seen: HashSet<TreeId> = HashSet::new();
        let mut stack: Vec<(NodeId, usize)> = Vec::new();
        if depth == 0 || !seen.insert(tree) {
            return Ok(ControlFlow::Continue(()));
        }
        stack.extend(self.tree(tree)?.nodes().rev().map(|n| (n, 0)));
        while let Some((id, level)) = stack.pop() {
            let node = self.node(id)?;
            if visit(self, id, level).is_break() {
                return Ok(ControlFlow::Break(()));
            }
            if level + 1 >= depth {
                continue;
            }
            if let Some(child) = node.children.tree()
                && seen.insert(child)
            {
                stack.extend(self.tree(child)?.nodes().rev().map(|n| (n, level + 1)));
            }
        }
        Ok(ControlFlow::Continue(()))
    }

    /// Every node reachable from `tree` within `depth` levels.
    pub fn reachable(&self, tree: TreeId, depth: usize) -> Result<Vec<NodeId>> {
        let mut found = Vec::new();
        let _flow = self.apply(tree, depth, |_, id, _| {
            found.push(id);
            ControlFlow::Continue(())
        })?;
        Ok(found)
    }

    /// First node in `tree` whose name is `name`.
    pub fn find_one(&self, tree: TreeId, name: &str) -> Result<Option<NodeId>> {
        for id in self.tree(tree)?.nodes() {
            if self.node(id)?.name() == name {
                return Ok(Some(id));
            }
        }
        Ok(None)
    }

    /// True if `tree` holds a terminator, i.e. its owner can end a command.
    pub fn has_terminator(&self, tree: TreeId) -> Result<bool> {
        for id in self.tree(tree)?.nodes() {
            if self.node(id)?.is_terminator() {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::GrammarNode;

    fn flat(arena: &mut Arena, names: &[&str]) -> TreeId {
        let t = arena.new_tree();
        for name in names {
            arena.add_top(t, GrammarNode::command(*name)).unwrap();
        }
        t
    }

    fn names(arena: &Arena, t: TreeId) -> Vec<String> {
        arena
            .tree(t)
            .unwrap()
            .nodes()
            .map(|n| arena.node(n).unwrap().name().to_string())
            .collect()
    }

    #[test]
    fn slot_operations() {
        let mut tree = ParseTree::new();
        let mut arena = Arena::new();
        let a = arena.alloc(GrammarNode::command("a"));
        let b = arena.alloc(GrammarNode::command("b"));
        tree.push(a);
        tree.insert(0, Some(b)).unwrap();
        tree.push_slot(None);
        assert_eq!(tree.len(), 3);
        assert_eq!(tree.nodes().count(), 2);
        assert_eq!(tree.clear_slot(0), Some(b));
        assert_eq!(tree.len(), 3);
        assert!(tree.insert(9, None).is_err());
        assert_eq!(tree.truncate(1), vec![a]);
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn delete_with_and_without_release() {
        let mut arena = Arena::new();
        let t = flat(&mut arena, &["a", "b", "c"]);
        let detached = arena.delete(t, 0, false).unwrap().unwrap();
        assert!(arena.contains_node(detached));
        assert_eq!(arena.delete(t, 0, true).unwrap(), None);
        assert_eq!(names(&arena, t), vec!["c"]);
        assert_eq!(arena.node_count(), 2);
        assert!(arena.delete(t, 5, true).is_err());
    }

    #[test]
    fn truncate_releases() {
        let mut arena = Arena::new();
        let t = flat(&mut arena, &["a", "b", "c"]);
        arena.truncate(t, 1).unwrap();
        assert_eq!(names(&arena, t), vec!["a"]);
        assert_eq!(arena.node_count(), 1);
    }

    #[test]
    fn apply_depth_and_early_stop() {
        let mut arena = Arena::new();
        let t = flat(&mut arena, &["a", "b"]);
        let a = arena.tree(t).unwrap().get(0).unwrap();
        arena.add_child(a, GrammarNode::command("a1")).unwrap();

        assert_eq!(arena.reachable(t, 1).unwrap().len(), 2);
        assert_eq!(arena.reachable(t, 2).unwrap().len(), 3);

        let mut visited = Vec::new();
        let flow = arena
            .apply(t, 2, |arena, id, _| {
                visited.push(arena.node(id).unwrap().name().to_string());
                if visited.len() == 2 {
                    ControlFlow::Break(())
                } else {
                    ControlFlow::Continue(())
                }
            })
            .unwrap();
        assert!(flow.is_break());
        assert_eq!(visited, vec!["a", "a1"]);
    }

    #[test]
    fn find_and_terminator() {
        let mut arena = Arena::new();
        let t = flat(&mut arena, &["x", "y"]);
        assert!(arena.find_one(t, "y").unwrap().is_some());
        assert!(arena.find_one(t, "z").unwrap().is_none());
        assert!(!arena.has_terminator(t).unwrap());
        arena.add_top(t, GrammarNode::terminator()).unwrap();
        assert!(arena.has_terminator(t).unwrap());
    }
}
