//! Grammar node model and parse-tree container.
//!
//! Nodes and trees live in an [`Arena`] and are addressed by generational
//! [`NodeId`]/[`TreeId`] handles. A node's child edge is either owned
//! (released with the node) or aliased (shared with a static grammar and
//! never released through the alias).

pub mod arena;
pub mod merge;
pub mod node;
pub mod order;
pub mod preference;
pub mod print;
pub mod snapshot;
pub mod tree;
pub mod varspec;

pub use arena::{Arena, CopyMode, NodeId, TreeId};
pub use node::{Children, GrammarNode, NodeFlags, NodeKind};
pub use order::{CompareOptions, compare_nodes, token_cmp};
pub use preference::{preference, var_preference};
pub use print::{describe, print_tree};
pub use snapshot::{NodeSnapshot, SnapshotKind, snapshot, to_json};
pub use tree::ParseTree;
pub use varspec::{Callback, Interval, Pattern, VarSpec};
