//! Named-tree registry.
//!
//! References in a grammar (`@name`) are resolved here. Each entry holds a
//! root tree and two optional settings: a working point, a node whose child
//! tree stands in for the root on lookup, and the name of an output pipe
//! tree offered after terminal commands.

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::grammar::{Arena, NodeId, TreeId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    pub name: String,
    pub root: TreeId,
    pub working_point: Option<NodeId>,
    pub pipe: Option<String>,
}

/// Registry of static trees, keyed by name.
#[derive(Debug, Default)]
pub struct TreeRegistry {
    entries: HashMap<String, TreeEntry>,
    active: Option<String>,
}

impl TreeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `root` under `name`, naming the tree accordingly.
    ///
    /// Replacing an existing entry keeps its pipe setting, drops its working
    /// point, and returns the old root so the caller can release it.
    pub fn register(&mut self, arena: &mut Arena, name: impl Into<String>, root: TreeId) -> Result<Option<TreeId>> {
        let name = name.into();
        arena.tree_mut(root)?.name = Some(name.clone());
        let previous = self.entries.remove(&name);
        let pipe = previous.as_ref().and_then(|e| e.pipe.clone());
        log::debug!("registering tree {name} at {root}");
        self.entries.insert(
            name.clone(),
            TreeEntry {
                name,
                root,
                working_point: None,
                pipe,
            },
        );
        Ok(previous.map(|e| e.root).filter(|old| *old != root))
    }

    /// Remove an entry, returning it. Clears the active tree if it was this one.
    pub fn unregister(&mut self, name: &str) -> Option<TreeEntry> {
        if self.active.as_deref() == Some(name) {
            self.active = None;
        }
        self.entries.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&TreeEntry> {
        self.entries.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut TreeEntry> {
        self.entries.get_mut(name)
    }

    /// The tree to walk for references to `name`: the working point's child
    /// tree when one is set, otherwise the root.
    pub fn lookup(&self, arena: &Arena, name: &str) -> Result<TreeId> {
        let entry = self
            .entries
            .get(name)
            .ok_or_else(|| Error::UnresolvedTree(name.to_string()))?;
        match entry.working_point {
            Some(wp) => arena
                .children(wp)?
                .ok_or_else(|| Error::NoSuchNode(format!("working point of {name} has no children"))),
            None => Ok(entry.root),
        }
    }

    pub fn set_active(&mut self, name: &str) -> Result<()> {
        if !self.entries.contains_key(name) {
            return Err(Error::UnresolvedTree(name.to_string()));
        }
        self.active = Some(name.to_string());
        Ok(())
    }

    pub fn active(&self) -> Option<&TreeEntry> {
        self.active.as_deref().and_then(|n| self.entries.get(n))
    }

    pub fn set_working_point(&mut self, name: &str, node: Option<NodeId>) -> Result<()> {
        let entry = self
            .entries
            .get_mut(name)
            .ok_or_else(|| Error::UnresolvedTree(name.to_string()))?;
        entry.working_point = node;
        Ok(())
    }

    pub fn set_pipe(&mut self, name: &str, pipe: Option<String>) -> Result<()> {
        let entry = self
            .entries
            .get_mut(name)
            .ok_or_else(|| Error::UnresolvedTree(name.to_string()))?;
        entry.pipe = pipe;
        Ok(())
    }

    /// Output pipe tree name of the active entry.
    pub fn active_pipe(&self) -> Option<&str> {
        self.active().and_then(|e| e.pipe.as_deref())
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
