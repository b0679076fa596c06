//! One grammar tree node.

use crate::grammar::{Callback, NodeId, TreeId, VarSpec};
use crate::value::CvValue;

/// What a node matches.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// A literal keyword token.
    Command(String),
    /// A typed value.
    Variable(Box<VarSpec>),
    /// Inline the named tree at this position.
    Reference(String),
    /// End of a complete command (`;`).
    Terminator,
}

impl NodeKind {
    /// Rank used to order nodes of different kinds.
    pub(crate) fn rank(&self) -> u8 {
        match self {
            NodeKind::Terminator => 0,
            NodeKind::Command(_) => 1,
            NodeKind::Variable(_) => 2,
            NodeKind::Reference(_) => 3,
        }
    }
}

/// The child tree edge of a node.
///
/// `Owned` trees are released with the node. `Aliased` trees belong to some
/// other node (typically in a static grammar) and are never released through
/// this edge; only transient shadow nodes carry them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Children {
    #[default]
    None,
    Owned(TreeId),
    Aliased(TreeId),
}

impl Children {
    pub fn tree(self) -> Option<TreeId> {
        match self {
            Children::None => None,
            Children::Owned(t) | Children::Aliased(t) => Some(t),
        }
    }

    pub fn is_aliased(self) -> bool {
        matches!(self, Children::Aliased(_))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NodeFlags {
    /// Not offered for completion when hidden nodes are suppressed.
    pub hidden: bool,
    /// Top-level node inlined from a referenced tree.
    pub tree_top: bool,
    /// Generated from an optional grammar element.
    pub from_option: bool,
    /// Already chosen in a set level; not offered again.
    pub chosen: bool,
}

#[derive(Debug, Clone)]
pub struct GrammarNode {
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    pub(crate) children: Children,
    pub help: Option<String>,
    /// Disambiguating prefix shown before the token.
    pub prefix: Option<String>,
    pub callbacks: Vec<Callback>,
    /// Local annotations, e.g. `secret` or `@remove:secret` on a reference.
    pub labels: Vec<String>,
    /// Labels suppressed in this node's subtree.
    pub filters: Vec<String>,
    pub flags: NodeFlags,
    /// Overrides the computed preference when set.
    pub preference: Option<i32>,
    /// Transient matched value, cleared before a shadow is released.
    pub value: Option<CvValue>,
    /// Unescaped command text of a node produced by an expansion callback.
    pub literal: Option<String>,
    /// Original variable this command was expanded from.
    pub expanded_from_var: Option<NodeId>,
    /// Original node in a referenced tree this node was inlined from.
    pub expanded_from_ref: Option<NodeId>,
}

impl GrammarNode {
    fn with_kind(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            children: Children::None,
            help: None,
            prefix: None,
            callbacks: Vec::new(),
            labels: Vec::new(),
            filters: Vec::new(),
            flags: NodeFlags::default(),
            preference: None,
            value: None,
            literal: None,
            expanded_from_var: None,
            expanded_from_ref: None,
        }
    }

    pub fn command(token: impl Into<String>) -> Self {
        Self::with_kind(NodeKind::Command(token.into()))
    }

    pub fn variable(spec: VarSpec) -> Self {
        let help = spec.help.clone();
        let mut node = Self::with_kind(NodeKind::Variable(Box::new(spec)));
        node.help = help;
        node
    }

    pub fn reference(tree: impl Into<String>) -> Self {
        Self::with_kind(NodeKind::Reference(tree.into()))
    }

    pub fn terminator() -> Self {
        Self::with_kind(NodeKind::Terminator)
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.labels.push(label.into());
        self
    }

    pub fn with_filter(mut self, label: impl Into<String>) -> Self {
        self.filters.push(label.into());
        self
    }

    pub fn with_callback(mut self, callback: Callback) -> Self {
        self.callbacks.push(callback);
        self
    }

    pub fn with_preference(mut self, preference: i32) -> Self {
        self.preference = Some(preference);
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn hidden(mut self) -> Self {
        self.flags.hidden = true;
        self
    }

    pub fn children(&self) -> Children {
        self.children
    }

    /// Name used for lookups: the literal or token of a command, the name of
    /// a variable, the target of a reference.
    pub fn name(&self) -> &str {
        match &self.kind {
            NodeKind::Command(token) => self.literal.as_deref().unwrap_or(token),
            NodeKind::Variable(spec) => &spec.name,
            NodeKind::Reference(tree) => tree,
            NodeKind::Terminator => ";",
        }
    }

    pub fn token(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Command(token) => Some(token),
            _ => None,
        }
    }

    pub fn var(&self) -> Option<&VarSpec> {
        match &self.kind {
            NodeKind::Variable(spec) => Some(spec),
            _ => None,
        }
    }

    pub fn reference_target(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Reference(tree) => Some(tree),
            _ => None,
        }
    }

    pub fn is_terminator(&self) -> bool {
        matches!(self.kind, NodeKind::Terminator)
    }

    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }

    /// True if any local label is in `filters` or in this node's own filters.
    pub fn is_filtered(&self, filters: &[String]) -> bool {
        self.labels
            .iter()
            .any(|l| filters.contains(l) || self.filters.contains(l))
    }
}
