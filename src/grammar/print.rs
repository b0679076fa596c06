//! Compact grammar-like text rendering of a tree, for debugging.
//!
//! ```text
//! show("Show state") {
//!     interfaces, show_if();
//!     <port:uint16 range[1:1024]>;
//! }
//! @pipe
//! ```

use std::collections::HashSet;
use std::fmt::Write;

use crate::error::Result;
use crate::grammar::{Arena, GrammarNode, NodeKind, TreeId, VarSpec};
use crate::value::CvValue;

pub fn print_tree(arena: &Arena, tree: TreeId) -> Result<String> {
    let mut out = String::new();
    let mut seen = HashSet::new();
    print_level(arena, tree, 0, &mut seen, &mut out)?;
    Ok(out)
}

fn print_level(
    arena: &Arena,
    tree: TreeId,
    indent: usize,
    seen: &mut HashSet<TreeId>,
    out: &mut String,
) -> Result<()> {
    if !seen.insert(tree) {
        let _ = writeln!(out, "{:indent$}...", "", indent = indent * 4);
        return Ok(());
    }
    for id in arena.tree(tree)?.nodes() {
        let node = arena.node(id)?;
        if node.is_terminator() {
            let _ = writeln!(out, "{:indent$};", "", indent = indent * 4);
            continue;
        }
        let _ = write!(out, "{:indent$}{}", "", describe(node), indent = indent * 4);
        let Some(t) = node.children().tree() else {
            out.push('\n');
            continue;
        };
        let children: Vec<_> = arena.tree(t)?.nodes().collect();
        match children.as_slice() {
            [] => out.push('\n'),
            [only] if arena.node(*only)?.is_terminator() => out.push_str(";\n"),
            _ => {
                out.push_str(" {\n");
                print_level(arena, t, indent + 1, seen, out)?;
                let _ = writeln!(out, "{:indent$}}}", "", indent = indent * 4);
            }
        }
    }
    seen.remove(&tree);
    Ok(())
}

/// One node without its children.
pub fn describe(node: &GrammarNode) -> String {
    let mut s = String::new();
    if let Some(prefix) = &node.prefix {
        s.push_str(prefix);
    }
    match &node.kind {
        NodeKind::Command(token) => s.push_str(token),
        NodeKind::Variable(spec) => s.push_str(&describe_var(spec)),
        NodeKind::Reference(tree) => {
            s.push('@');
            s.push_str(tree);
        }
        NodeKind::Terminator => s.push(';'),
    }
    if let Some(help) = &node.help {
        let _ = write!(s, "({help:?})");
    }
    for cb in &node.callbacks {
        let _ = write!(s, ", {}()", cb.name);
    }
    if node.flags.hidden {
        s.push_str(", hide");
    }
    for label in &node.labels {
        let _ = write!(s, ", #{label}");
    }
    s
}

fn describe_var(spec: &VarSpec) -> String {
    let mut s = format!("<{}:{}", spec.name, spec.ty);
    let keyword = if spec.ty.is_string() { "length" } else { "range" };
    for interval in &spec.intervals {
        let bound = |b: &Option<CvValue>| b.as_ref().map(CvValue::to_string).unwrap_or_default();
        let _ = write!(s, " {keyword}[{}:{}]", bound(&interval.low), bound(&interval.high));
    }
    for pattern in &spec.patterns {
        let bang = if pattern.invert() { "!" } else { "" };
        let _ = write!(s, " regexp:{bang}{:?}", pattern.source());
    }
    if let Some(choice) = &spec.choice {
        let _ = write!(s, " choice:{choice}");
    }
    if let Some(expand) = &spec.expand {
        let _ = write!(s, " {}()", expand.name);
    }
    s.push('>');
    s
}
