//! Sorted insertion with merge-on-duplicate, and level sorting.

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::error::Result;
use crate::grammar::{Arena, Children, CompareOptions, CopyMode, GrammarNode, NodeId, TreeId, order};

impl Arena {
    /// Order two nodes by handle.
    pub fn compare(&self, a: NodeId, b: NodeId, opts: CompareOptions) -> Result<Ordering> {
        Ok(order::compare_nodes(self.node(a)?, self.node(b)?, opts))
    }

    /// Insert `node` into `tree` at its sorted position.
    ///
    /// If an equal node is already present, the children of `node` are
    /// merged into it, `node` is released, and the existing node is
    /// returned. Otherwise `node` itself is returned.
    pub fn insert_or_merge(&mut self, tree: TreeId, node: NodeId, opts: CompareOptions) -> Result<NodeId> {
        self.check_subtree(node)?;
        let slots = self.tree(tree)?.slots().to_vec();
        let mut position = None;
        for (i, slot) in slots.into_iter().enumerate() {
            let Some(existing) = slot else { continue };
            match self.compare(existing, node, opts)? {
                Ordering::Less => {}
                Ordering::Equal => {
                    log::trace!("merging duplicate {} into {existing}", self.node(node)?.name());
                    self.merge_into(existing, node, opts)?;
                    return Ok(existing);
                }
                Ordering::Greater => {
                    position = Some(i);
                    break;
                }
            }
        }
        let t = self.tree_mut(tree)?;
        match position {
            Some(i) => t.insert(i, Some(node))?,
            None => t.push(node),
        }
        Ok(node)
    }

    /// Allocate `node` as a child of `parent` at its sorted position,
    /// merging with an equal sibling if there is one.
    pub fn add_child_sorted(&mut self, parent: NodeId, mut node: GrammarNode, opts: CompareOptions) -> Result<NodeId> {
        self.node(parent)?;
        node.parent = Some(parent);
        let t = self.own_children(parent)?;
        let id = self.alloc(node);
        self.insert_or_merge(t, id, opts)
    }

    /// Allocate `node` at its sorted position in a top-level tree.
    pub fn add_top_sorted(&mut self, tree: TreeId, node: GrammarNode, opts: CompareOptions) -> Result<NodeId> {
        self.tree(tree)?;
        let id = self.alloc(node);
        self.insert_or_merge(tree, id, opts)
    }

    /// Merge `src` into `dst` and release `src`.
    ///
    /// The children of `src` join those of `dst`, recursively merging
    /// duplicates. `dst` keeps its own metadata, except that an empty
    /// callback list adopts the callbacks of `src`.
    fn merge_into(&mut self, dst: NodeId, src: NodeId, opts: CompareOptions) -> Result<()> {
        let source = self.node(src)?;
        let callbacks = source.callbacks.clone();
        let src_children = source.children;
        let target = self.node_mut(dst)?;
        if target.callbacks.is_empty() {
            target.callbacks = callbacks;
        }
        // Both alias the same static level: nothing to union.
        if let (Children::Aliased(a), Children::Aliased(b)) = (target.children, src_children)
            && a == b
        {
            return self.release_node(src);
        }

        let incoming: Vec<NodeId> = match src_children {
            Children::None => Vec::new(),
            Children::Owned(t) => {
                let moved = self.tree_mut(t)?.take_slots();
                self.node_mut(src)?.children = Children::None;
                self.release_tree(t)?;
                moved.into_iter().flatten().collect()
            }
            Children::Aliased(t) => {
                let shared: Vec<NodeId> = self.tree(t)?.nodes().collect();
                let mut copies = Vec::with_capacity(shared.len());
                for n in shared {
                    copies.push(self.copy_node(n, CopyMode::Alias, Some(dst))?);
                }
                copies
            }
        };
        self.release_node(src)?;
        if incoming.is_empty() {
            return Ok(());
        }

        let dst_tree = self.own_children(dst)?;
        for child in incoming {
            self.node_mut(child)?.parent = Some(dst);
            self.insert_or_merge(dst_tree, child, opts)?;
        }
        Ok(())
    }

    /// Verify every handle reachable from `node` is live, so a merge never
    /// stops half way on a stale handle.
    fn check_subtree(&self, node: NodeId) -> Result<()> {
        let mut seen = HashSet::new();
        let mut pending = vec![node];
        while let Some(id) = pending.pop() {
            if let Some(t) = self.node(id)?.children.tree()
                && seen.insert(t)
            {
                pending.extend(self.tree(t)?.nodes());
            }
        }
        Ok(())
    }

    /// Stable sort of one level. Empty slots sort first. With `recursive`,
    /// owned child levels are sorted too; aliased levels are left alone.
    pub fn sort(&mut self, tree: TreeId, opts: CompareOptions, recursive: bool) -> Result<()> {
        let mut seen = HashSet::new();
        let mut pending = vec![tree];
        while let Some(t) = pending.pop() {
            if !seen.insert(t) {
                continue;
            }
            let mut slots = self.tree_mut(t)?.take_slots();
            let sorted = self.sort_slots(&mut slots, opts);
            self.tree_mut(t)?.set_slots(slots);
            sorted?;
            if recursive {
                for id in self.tree(t)?.nodes() {
                    if let Children::Owned(child) = self.node(id)?.children {
                        pending.push(child);
                    }
                }
            }
        }
        Ok(())
    }

    fn sort_slots(&self, slots: &mut [Option<NodeId>], opts: CompareOptions) -> Result<()> {
        for id in slots.iter().flatten() {
            self.node(*id)?;
        }
        slots.sort_by(|a, b| match (a, b) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(x), Some(y)) => self.compare(*x, *y, opts).unwrap_or(Ordering::Equal),
        });
        Ok(())
    }

    /// Sort one level and merge adjacent duplicates into the first of them.
    /// Empty slots are dropped.
    pub fn sort_merge(&mut self, tree: TreeId, opts: CompareOptions) -> Result<()> {
        self.sort(tree, opts, false)?;
        let slots = self.tree_mut(tree)?.take_slots();
        let mut kept: Vec<Option<NodeId>> = Vec::with_capacity(slots.len());
        let mut result = Ok(());
        for id in slots.into_iter().flatten() {
            if result.is_err() {
                kept.push(Some(id));
                continue;
            }
            let duplicate_of = match kept.last() {
                Some(Some(last)) => match self.compare(*last, id, opts) {
                    Ok(Ordering::Equal) => Some(*last),
                    Ok(_) => None,
                    Err(e) => {
                        result = Err(e);
                        None
                    }
                },
                _ => None,
            };
            match duplicate_of {
                Some(last) => {
                    if let Err(e) = self.merge_into(last, id, opts) {
                        result = Err(e);
                    }
                }
                None => kept.push(Some(id)),
            }
        }
        self.tree_mut(tree)?.set_slots(kept);
        result
    }
}
