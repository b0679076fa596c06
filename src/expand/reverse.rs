//! Map a node reached through a reference chain back to the matching node
//! in another tree.

use std::collections::HashSet;

use crate::error::{Error, Result};
use crate::grammar::{Arena, GrammarNode, NodeId, TreeId};

/// Find the node in `target` that corresponds to `node`.
///
/// Walks `node`'s ancestors up to the nearest tree-top node (or a node
/// without a parent), then walks down `target` by the same names. A command
/// expanded from a variable is looked up by that variable's name.
pub fn resolve_original(arena: &Arena, node: NodeId, target: TreeId) -> Result<NodeId> {
    let mut path = Vec::new();
    let mut seen = HashSet::new();
    let mut current = node;
    loop {
        if !seen.insert(current) {
            return Err(Error::Invariant(format!("parent links loop at {current}")));
        }
        let n = arena.node(current)?;
        path.push(lookup_name(arena, n)?);
        if n.flags.tree_top {
            break;
        }
        match n.parent {
            Some(parent) => current = parent,
            None => break,
        }
    }

    let mut tree = target;
    let mut found: Option<NodeId> = None;
    while let Some(name) = path.pop() {
        if let Some(above) = found {
            tree = arena
                .children(above)?
                .ok_or_else(|| Error::NoSuchNode(name.clone()))?;
        }
        let id = arena.find_one(tree, &name)?.ok_or(Error::NoSuchNode(name))?;
        found = Some(id);
    }
    found.ok_or_else(|| Error::NoSuchNode(node.to_string()))
}

fn lookup_name(arena: &Arena, node: &GrammarNode) -> Result<String> {
    match node.expanded_from_var {
        Some(var) => Ok(arena.node(var)?.name().to_string()),
        None => Ok(node.name().to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::GrammarNode;

    #[test]
    fn walks_to_parentless_top() {
        let mut arena = Arena::new();
        let sub = arena.new_tree();
        let show = arena.add_top(sub, GrammarNode::command("show")).unwrap();
        let version = arena.add_child(show, GrammarNode::command("version")).unwrap();

        let other = arena.new_tree();
        let show2 = arena.add_top(other, GrammarNode::command("show")).unwrap();
        let version2 = arena.add_child(show2, GrammarNode::command("version")).unwrap();

        assert_eq!(resolve_original(&arena, version, other).unwrap(), version2);
        assert_eq!(resolve_original(&arena, show, other).unwrap(), show2);
    }

    #[test]
    fn stops_at_tree_top() {
        let mut arena = Arena::new();
        let outer = arena.new_tree();
        let wrapper = arena.add_top(outer, GrammarNode::command("wrapper")).unwrap();
        let mut top = GrammarNode::command("show");
        top.flags.tree_top = true;
        let show = arena.add_child(wrapper, top).unwrap();

        let target = arena.new_tree();
        let expected = arena.add_top(target, GrammarNode::command("show")).unwrap();
        assert_eq!(resolve_original(&arena, show, target).unwrap(), expected);
    }

    #[test]
    fn missing_name_is_reported() {
        let mut arena = Arena::new();
        let a = arena.new_tree();
        let x = arena.add_top(a, GrammarNode::command("x")).unwrap();
        let b = arena.new_tree();
        arena.add_top(b, GrammarNode::command("y")).unwrap();
        assert!(matches!(resolve_original(&arena, x, b), Err(Error::NoSuchNode(name)) if name == "x"));
    }
}
