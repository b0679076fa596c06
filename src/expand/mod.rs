//! Expansion of a static tree into a per-request shadow tree.
//!
//! The shadow holds alias copies of the static nodes: they share the static
//! child trees and are released without touching them. Along the way tree
//! references are inlined, choice and callback variables turn into literal
//! commands, labelled nodes are filtered, and an output pipe may be offered
//! after a terminal command. The assembled level is sorted and merged so
//! that duplicates reached through several paths collapse into one node.

pub mod escape;
pub mod handlers;
pub mod request;
pub mod reverse;

pub use handlers::{ExpandCall, ExpandItem, HandlerRegistry, NameResolver, Resolution, VarExpander};
pub use request::{ExpandRequest, ExpandSettings};
pub use reverse::resolve_original;

use std::collections::HashSet;

use crate::error::{Error, Result};
use crate::grammar::{Arena, Callback, CopyMode, NodeId, NodeKind, ParseTree, TreeId};
use crate::registry::TreeRegistry;

/// A transient expansion result.
#[derive(Debug)]
pub struct Shadow {
    pub tree: TreeId,
    /// Structural misses met while expanding; each was skipped.
    pub misses: Vec<Error>,
}

pub struct Engine<'a> {
    registry: &'a TreeRegistry,
    handlers: &'a HandlerRegistry,
    resolver: Option<&'a dyn NameResolver>,
    settings: &'a ExpandSettings,
}

/// Inherited state of the level being copied into the shadow.
struct Level {
    filters: Vec<String>,
    callbacks: Vec<Callback>,
    /// The level's nodes come from a referenced tree.
    inlined: bool,
    /// Trees being inlined, outermost first.
    path: Vec<TreeId>,
}

enum Action {
    Copy,
    Reference(String),
    Choice(String),
    Callback(Callback),
}

impl<'a> Engine<'a> {
    pub fn new(registry: &'a TreeRegistry, handlers: &'a HandlerRegistry, settings: &'a ExpandSettings) -> Self {
        Self {
            registry,
            handlers,
            resolver: None,
            settings,
        }
    }

    pub fn with_resolver(mut self, resolver: &'a dyn NameResolver) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Build the shadow of `tree` for one request.
    ///
    /// A fatal error releases whatever shadow was built so far. The static
    /// trees are never modified.
    pub fn expand(&self, arena: &mut Arena, tree: TreeId, req: &ExpandRequest) -> Result<Shadow> {
        let source = arena.tree(tree)?;
        let mut level = ParseTree::new();
        level.set = source.set;
        level.name = source.name.clone();
        let mut shadow = Shadow {
            tree: arena.insert_tree(level),
            misses: Vec::new(),
        };
        match self.build(arena, tree, req, &mut shadow) {
            Ok(()) => Ok(shadow),
            Err(e) => {
                if let Err(release) = arena.release_tree(shadow.tree) {
                    log::error!("releasing partial shadow: {release}");
                }
                Err(e)
            }
        }
    }

    fn build(&self, arena: &mut Arena, tree: TreeId, req: &ExpandRequest, shadow: &mut Shadow) -> Result<()> {
        let mut filters = req.filters.clone();
        extend_unique(&mut filters, &self.settings.default_filters);
        if let Some(enclosing) = req.enclosing {
            extend_unique(&mut filters, &arena.node(enclosing)?.filters);
        }
        let level = Level {
            filters,
            callbacks: req.callbacks.clone(),
            inlined: false,
            path: vec![tree],
        };
        self.expand_level(arena, tree, req, &level, shadow)?;
        self.inject_pipe(arena, tree, req, &level, shadow)?;
        arena.sort_merge(shadow.tree, self.settings.compare)
    }

    fn expand_level(
        &self,
        arena: &mut Arena,
        src: TreeId,
        req: &ExpandRequest,
        level: &Level,
        shadow: &mut Shadow,
    ) -> Result<()> {
        let source = arena.tree(src)?;
        let set = source.set;
        let members: Vec<NodeId> = source.nodes().collect();

        for id in members {
            let node = arena.node(id)?;
            if req.hide && node.flags.hidden {
                log::debug!("hiding {}", node.name());
                continue;
            }
            if set && node.flags.chosen {
                continue;
            }
            if node.is_filtered(&level.filters) {
                log::debug!("filtering {}", node.name());
                continue;
            }
            let action = match &node.kind {
                NodeKind::Reference(target) => Action::Reference(target.clone()),
                NodeKind::Variable(spec) => match (&spec.choice, &spec.expand) {
                    (Some(choice), _) => Action::Choice(choice.clone()),
                    (None, Some(cb)) if req.expand_vars => Action::Callback(cb.clone()),
                    _ => Action::Copy,
                },
                NodeKind::Command(_) | NodeKind::Terminator => Action::Copy,
            };
            let origin = node.expanded_from_var.unwrap_or(id);
            let var_name = node.name().to_string();

            match action {
                Action::Copy => {
                    self.place(arena, id, req, level, shadow)?;
                }
                Action::Reference(target) => {
                    self.expand_reference(arena, id, &target, req, level, shadow)?;
                }
                Action::Choice(choice) => {
                    for alt in self.settings.choices(&choice) {
                        let token = match escape::escape(alt) {
                            Ok(token) => token,
                            Err(e) => {
                                log::warn!("skipping choice of <{var_name}>: {e}");
                                continue;
                            }
                        };
                        let copy = self.place(arena, id, req, level, shadow)?;
                        let node = arena.node_mut(copy)?;
                        if token != alt {
                            node.literal = Some(alt.to_string());
                        }
                        node.kind = NodeKind::Command(token);
                        node.expanded_from_var = Some(origin);
                    }
                }
                Action::Callback(cb) => {
                    let Some(handler) = self.handlers.get(&cb.name) else {
                        log::warn!("no expansion handler `{}` for <{var_name}>", cb.name);
                        shadow
                            .misses
                            .push(Error::NoSuchNode(format!("expansion handler {}", cb.name)));
                        self.place(arena, id, req, level, shadow)?;
                        continue;
                    };
                    let vars = req.vars.without_keywords();
                    let call = ExpandCall {
                        name: &var_name,
                        tokens: &req.tokens,
                        vars: &vars,
                        args: cb.args.as_ref(),
                    };
                    let items = handler.expand(&call).map_err(|reason| Error::Callback {
                        name: cb.name.clone(),
                        reason,
                    })?;
                    log::debug!("<{var_name}> expanded by {} into {} items", cb.name, items.len());
                    for item in items {
                        let token = match escape::escape(&item.command) {
                            Ok(token) => token,
                            Err(e) => {
                                log::warn!("skipping item from {}: {e}", cb.name);
                                continue;
                            }
                        };
                        let copy = self.place(arena, id, req, level, shadow)?;
                        let node = arena.node_mut(copy)?;
                        if token != item.command {
                            node.literal = Some(item.command);
                        }
                        node.kind = NodeKind::Command(token);
                        if let Some(help) = item.help {
                            node.help = Some(help);
                        }
                        node.expanded_from_var = Some(origin);
                    }
                    if self.settings.keep_expanded_variable {
                        self.place(arena, id, req, level, shadow)?;
                    }
                }
            }
        }
        Ok(())
    }

    /// Alias-copy `id` into the shadow, applying the level's inherited state.
    fn place(&self, arena: &mut Arena, id: NodeId, req: &ExpandRequest, level: &Level, shadow: &Shadow) -> Result<NodeId> {
        let copy = arena.copy_node(id, CopyMode::Alias, req.enclosing)?;
        arena.tree_mut(shadow.tree)?.push(copy);
        let terminal = match arena.children(copy)? {
            Some(t) => arena.has_terminator(t)?,
            None => false,
        };
        let node = arena.node_mut(copy)?;
        extend_unique(&mut node.filters, &level.filters);
        if level.inlined {
            node.flags.tree_top = true;
            node.expanded_from_ref = Some(node.expanded_from_ref.unwrap_or(id));
        }
        if terminal && node.callbacks.is_empty() && !level.callbacks.is_empty() {
            node.callbacks = level.callbacks.clone();
        }
        Ok(copy)
    }

    fn expand_reference(
        &self,
        arena: &mut Arena,
        id: NodeId,
        target: &str,
        req: &ExpandRequest,
        level: &Level,
        shadow: &mut Shadow,
    ) -> Result<()> {
        let name = match self.resolver {
            Some(resolver) => match resolver.resolve(target, &req.tokens).map_err(|reason| Error::Resolve {
                name: target.to_string(),
                reason,
            })? {
                Resolution::Unchanged => target.to_string(),
                Resolution::Rewritten(name) => {
                    log::debug!("@{target} resolved to @{name}");
                    name
                }
            },
            None => target.to_string(),
        };
        let Some(tree) = self.lookup(arena, &name, shadow)? else {
            return Ok(());
        };
        if level.path.contains(&tree) {
            log::warn!("reference cycle through @{name}");
            shadow
                .misses
                .push(Error::UnresolvedTree(format!("{name} (reference cycle)")));
            return Ok(());
        }

        let node = arena.node(id)?;
        let mut filters = level.filters.clone();
        extend_unique(&mut filters, self.settings.removed_labels(&node.labels));
        extend_unique(&mut filters, &node.filters);
        let callbacks = if node.callbacks.is_empty() {
            level.callbacks.clone()
        } else {
            node.callbacks.clone()
        };
        let mut path = level.path.clone();
        path.push(tree);
        let inner = Level {
            filters,
            callbacks,
            inlined: true,
            path,
        };
        log::debug!("inlining @{name} ({tree})");
        self.expand_level(arena, tree, req, &inner, shadow)
    }

    /// Registry lookup where a structural miss is recorded and skipped.
    fn lookup(&self, arena: &Arena, name: &str, shadow: &mut Shadow) -> Result<Option<TreeId>> {
        match self.registry.lookup(arena, name) {
            Ok(tree) => Ok(Some(tree)),
            Err(e) if !e.is_fatal() => {
                log::warn!("{e}");
                shadow.misses.push(e);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Offer the active output pipe after a terminal command with callbacks,
    /// unless the level already references it or the command is itself part
    /// of the pipe tree.
    fn inject_pipe(
        &self,
        arena: &mut Arena,
        tree: TreeId,
        req: &ExpandRequest,
        level: &Level,
        shadow: &mut Shadow,
    ) -> Result<()> {
        let (Some(pipe), Some(enclosing)) = (self.registry.active_pipe(), req.enclosing) else {
            return Ok(());
        };
        let node = arena.node(enclosing)?;
        let callbacks = if node.callbacks.is_empty() {
            req.callbacks.clone()
        } else {
            node.callbacks.clone()
        };
        if callbacks.is_empty() {
            return Ok(());
        }
        // Only a terminal command: nothing but terminators below it.
        let mut terminal = false;
        for id in arena.tree(tree)?.nodes() {
            let n = arena.node(id)?;
            if n.reference_target() == Some(pipe) {
                return Ok(());
            }
            if !n.is_terminator() {
                return Ok(());
            }
            terminal = true;
        }
        if !terminal || !arena.has_terminator(shadow.tree)? {
            return Ok(());
        }
        let Some(pipe_tree) = self.lookup(arena, pipe, shadow)? else {
            return Ok(());
        };
        if level.path.contains(&pipe_tree) || within(arena, enclosing, pipe_tree)? {
            return Ok(());
        }

        log::debug!("offering @{pipe} after {}", arena.node(enclosing)?.name());
        let mut path = level.path.clone();
        path.push(pipe_tree);
        let inner = Level {
            filters: level.filters.clone(),
            callbacks,
            inlined: true,
            path,
        };
        self.expand_level(arena, pipe_tree, req, &inner, shadow)
    }
}

/// Clear the transient values of every node reachable from the shadow,
/// then release it. Static trees it aliases are left alone.
pub fn cleanup(arena: &mut Arena, shadow: Shadow) -> Result<()> {
    for id in arena.reachable(shadow.tree, usize::MAX)? {
        arena.node_mut(id)?.value = None;
    }
    arena.release_tree(shadow.tree)
}

/// True if `node` descends from, or was inlined from, a top node of `tree`.
fn within(arena: &Arena, node: NodeId, tree: TreeId) -> Result<bool> {
    let members = arena.tree(tree)?;
    let mut seen = HashSet::new();
    let mut current = Some(node);
    while let Some(id) = current {
        if members.contains(id) {
            return Ok(true);
        }
        if !seen.insert(id) {
            break;
        }
        let n = arena.node(id)?;
        current = n.expanded_from_ref.or(n.parent);
    }
    Ok(false)
}

fn extend_unique<I, S>(base: &mut Vec<String>, add: I)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    for item in add {
        let item = item.as_ref();
        if !base.iter().any(|b| b == item) {
            base.push(item.to_string());
        }
    }
}
