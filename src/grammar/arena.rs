//! Node and tree storage addressed by generational handles.
//!
//! Every grammar node and every parse tree lives in an [`Arena`]. Handles
//! stay valid until the slot is released; a released slot's generation is
//! bumped, so an old handle is reported as stale instead of reaching
//! whatever reuses the slot.

use std::fmt;

use crate::error::{Error, Result};
use crate::grammar::{Children, GrammarNode, ParseTree};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TreeId {
    index: u32,
    generation: u32,
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}.{}", self.index, self.generation)
    }
}

impl fmt::Display for TreeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}.{}", self.index, self.generation)
    }
}

#[derive(Debug)]
struct Slot<T> {
    generation: u32,
    item: Option<T>,
}

#[derive(Debug)]
struct Pool<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
}

impl<T> Default for Pool<T> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }
}

impl<T> Pool<T> {
    fn insert(&mut self, item: T) -> (u32, u32) {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.item = Some(item);
            return (index, slot.generation);
        }
        self.slots.push(Slot {
            generation: 0,
            item: Some(item),
        });
        ((self.slots.len() - 1) as u32, 0)
    }

    fn get(&self, index: u32, generation: u32) -> Option<&T> {
        self.slots
            .get(index as usize)
            .filter(|s| s.generation == generation)
            .and_then(|s| s.item.as_ref())
    }

    fn get_mut(&mut self, index: u32, generation: u32) -> Option<&mut T> {
        self.slots
            .get_mut(index as usize)
            .filter(|s| s.generation == generation)
            .and_then(|s| s.item.as_mut())
    }

    fn remove(&mut self, index: u32, generation: u32) -> Option<T> {
        let slot = self
            .slots
            .get_mut(index as usize)
            .filter(|s| s.generation == generation)?;
        let item = slot.item.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(index);
        Some(item)
    }

    fn live(&self) -> usize {
        self.slots.len() - self.free.len()
    }
}

/// How [`Arena::copy_node`] treats the child tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyMode {
    /// Deep-copy the whole subtree into new owned trees.
    Recursive,
    /// Share the source's child tree through an aliased edge.
    Alias,
}

#[derive(Debug, Default)]
pub struct Arena {
    nodes: Pool<GrammarNode>,
    trees: Pool<ParseTree>,
}

impl Arena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc(&mut self, node: GrammarNode) -> NodeId {
        let (index, generation) = self.nodes.insert(node);
        NodeId { index, generation }
    }

    pub fn new_tree(&mut self) -> TreeId {
        self.insert_tree(ParseTree::new())
    }

    pub fn insert_tree(&mut self, tree: ParseTree) -> TreeId {
        let (index, generation) = self.trees.insert(tree);
        TreeId { index, generation }
    }

    pub fn node(&self, id: NodeId) -> Result<&GrammarNode> {
        self.nodes
            .get(id.index, id.generation)
            .ok_or(Error::StaleNode(id))
    }

    pub fn node_mut(&mut self, id: NodeId) -> Result<&mut GrammarNode> {
        self.nodes
            .get_mut(id.index, id.generation)
            .ok_or(Error::StaleNode(id))
    }

    pub fn tree(&self, id: TreeId) -> Result<&ParseTree> {
        self.trees
            .get(id.index, id.generation)
            .ok_or(Error::StaleTree(id))
    }

    pub fn tree_mut(&mut self, id: TreeId) -> Result<&mut ParseTree> {
        self.trees
            .get_mut(id.index, id.generation)
            .ok_or(Error::StaleTree(id))
    }

    pub fn contains_node(&self, id: NodeId) -> bool {
        self.nodes.get(id.index, id.generation).is_some()
    }

    pub fn contains_tree(&self, id: TreeId) -> bool {
        self.trees.get(id.index, id.generation).is_some()
    }

    /// Number of live nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.live()
    }

    /// Number of live trees.
    pub fn tree_count(&self) -> usize {
        self.trees.live()
    }

    /// The child tree of a node, owned or aliased.
    pub fn children(&self, id: NodeId) -> Result<Option<TreeId>> {
        Ok(self.node(id)?.children.tree())
    }

    /// The owned child tree of `id`, created if the node has none.
    ///
    /// An aliased child tree is first replaced by an owned tree holding
    /// alias copies of its nodes, so the shared tree is never mutated.
    pub fn own_children(&mut self, id: NodeId) -> Result<TreeId> {
        match self.node(id)?.children {
            Children::Owned(t) => Ok(t),
            Children::None => {
                let t = self.new_tree();
                self.node_mut(id)?.children = Children::Owned(t);
                Ok(t)
            }
            Children::Aliased(shared) => {
                let source = self.tree(shared)?;
                let (set, name) = (source.set, source.name.clone());
                let members: Vec<Option<NodeId>> = source.slots().to_vec();
                let mut owned = ParseTree::new();
                owned.set = set;
                owned.name = name;
                let t = self.insert_tree(owned);
                for member in members {
                    let slot = match member {
                        Some(n) => Some(self.copy_node(n, CopyMode::Alias, Some(id))?),
                        None => None,
                    };
                    self.tree_mut(t)?.push_slot(slot);
                }
                self.node_mut(id)?.children = Children::Owned(t);
                Ok(t)
            }
        }
    }

    /// Append `node` to the children of `parent` without ordering.
    pub fn add_child(&mut self, parent: NodeId, mut node: GrammarNode) -> Result<NodeId> {
        self.node(parent)?;
        node.parent = Some(parent);
        let t = self.own_children(parent)?;
        let id = self.alloc(node);
        self.tree_mut(t)?.push(id);
        Ok(id)
    }

    /// Append `node` to a top-level tree without ordering.
    pub fn add_top(&mut self, tree: TreeId, node: GrammarNode) -> Result<NodeId> {
        self.tree(tree)?;
        let id = self.alloc(node);
        self.tree_mut(tree)?.push(id);
        Ok(id)
    }

    /// Copy a node.
    ///
    /// In [`CopyMode::Recursive`] the child tree is deep-copied into owned
    /// trees. In [`CopyMode::Alias`] the copy shares the source's child tree;
    /// releasing the copy leaves that tree alone.
    pub fn copy_node(&mut self, id: NodeId, mode: CopyMode, parent: Option<NodeId>) -> Result<NodeId> {
        let mut copy = self.node(id)?.clone();
        copy.parent = parent;
        let source_children = copy.children.tree();
        copy.children = match (mode, source_children) {
            (_, None) => Children::None,
            (CopyMode::Alias, Some(t)) => Children::Aliased(t),
            (CopyMode::Recursive, Some(_)) => Children::None,
        };
        let new_id = self.alloc(copy);
        if let (CopyMode::Recursive, Some(t)) = (mode, source_children) {
            match self.copy_tree(t, new_id) {
                Ok(copied) => self.node_mut(new_id)?.children = Children::Owned(copied),
                Err(e) => {
                    self.release_node(new_id)?;
                    return Err(e);
                }
            }
        }
        Ok(new_id)
    }

    /// Deep-copy a tree, parenting its top nodes to `parent`.
    fn copy_tree(&mut self, id: TreeId, parent: NodeId) -> Result<TreeId> {
        let source = self.tree(id)?;
        let mut copy = ParseTree::new();
        copy.set = source.set;
        copy.name = source.name.clone();
        let members: Vec<Option<NodeId>> = source.slots().to_vec();
        let t = self.insert_tree(copy);
        for member in members {
            let slot = match member {
                Some(n) => match self.copy_node(n, CopyMode::Recursive, Some(parent)) {
                    Ok(c) => Some(c),
                    Err(e) => {
                        self.release_tree(t)?;
                        return Err(e);
                    }
                },
                None => None,
            };
            self.tree_mut(t)?.push_slot(slot);
        }
        Ok(t)
    }

    /// Release a node and everything it owns. Aliased child trees are left
    /// untouched.
    pub fn release_node(&mut self, id: NodeId) -> Result<()> {
        let node = self.nodes.remove(id.index, id.generation).ok_or(Error::StaleNode(id))?;
        if let Children::Owned(t) = node.children {
            self.release_tree(t)?;
        }
        Ok(())
    }

    /// Release a tree and every node in it, following owned edges only.
    pub fn release_tree(&mut self, id: TreeId) -> Result<()> {
        let tree = self.trees.remove(id.index, id.generation).ok_or(Error::StaleTree(id))?;
        let mut pending: Vec<NodeId> = tree.nodes().collect();
        while let Some(n) = pending.pop() {
            let Some(node) = self.nodes.remove(n.index, n.generation) else {
                log::warn!("owned tree {id} held stale node {n}");
                continue;
            };
            if let Children::Owned(t) = node.children
                && let Some(child) = self.trees.remove(t.index, t.generation)
            {
                pending.extend(child.nodes());
            }
        }
        Ok(())
    }
}
