//! Serializable view of a tree, used to dump shadows and grammars as JSON.

use std::collections::HashSet;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::grammar::{Arena, Children, NodeFlags, NodeKind, TreeId};
use crate::value::CvType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotKind {
    Command,
    Variable,
    Reference,
    Terminator,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeSnapshot {
    pub kind: SnapshotKind,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ty: Option<CvType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub callbacks: Vec<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub hidden: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub tree_top: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub aliased: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeSnapshot>,
}

/// Snapshot `tree` down to `depth` levels. A tree already being walked
/// higher up is not entered again.
pub fn snapshot(arena: &Arena, tree: TreeId, depth: usize) -> Result<Vec<NodeSnapshot>> {
    let mut path = HashSet::new();
    level(arena, tree, depth, &mut path)
}

pub fn to_json(arena: &Arena, tree: TreeId, depth: usize) -> Result<serde_json::Value> {
    let nodes = snapshot(arena, tree, depth)?;
    serde_json::to_value(nodes).map_err(|e| Error::Invariant(format!("snapshot serialization: {e}")))
}

fn level(arena: &Arena, tree: TreeId, depth: usize, path: &mut HashSet<TreeId>) -> Result<Vec<NodeSnapshot>> {
    if depth == 0 || !path.insert(tree) {
        return Ok(Vec::new());
    }
    let mut out = Vec::new();
    for id in arena.tree(tree)?.nodes() {
        let node = arena.node(id)?;
        let (kind, ty) = match &node.kind {
            NodeKind::Command(_) => (SnapshotKind::Command, None),
            NodeKind::Variable(spec) => (SnapshotKind::Variable, Some(spec.ty)),
            NodeKind::Reference(_) => (SnapshotKind::Reference, None),
            NodeKind::Terminator => (SnapshotKind::Terminator, None),
        };
        let NodeFlags { hidden, tree_top, .. } = node.flags;
        let children = match node.children() {
            Children::None => Vec::new(),
            Children::Owned(t) | Children::Aliased(t) => level(arena, t, depth - 1, path)?,
        };
        out.push(NodeSnapshot {
            kind,
            name: node.name().to_string(),
            ty,
            help: node.help.clone(),
            labels: node.labels.clone(),
            filters: node.filters.clone(),
            callbacks: node.callbacks.iter().map(|c| c.name.clone()).collect(),
            hidden,
            tree_top,
            aliased: node.children().is_aliased(),
            children,
        });
    }
    path.remove(&tree);
    Ok(out)
}
