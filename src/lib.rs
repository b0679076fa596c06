//! cligen: interactive command grammar trees.
//!
//! A host builds static grammar trees of commands, typed variables, tree
//! references and terminators, registers them by name, and for every
//! completion or match step asks the expansion engine for a transient
//! shadow tree: references inlined, choice and callback variables turned
//! into literal commands, filtered labels removed, duplicates merged.
//!
//! # Architecture
//!
//! - **[`value`]**: Typed values and their parse, validate, render and compare rules.
//! - **[`grammar`]**: Node model and parse-tree container in a handle-based arena.
//! - **[`registry`]**: Named trees, working points and the output pipe.
//! - **[`expand`]**: Shadow tree construction, cleanup and reverse mapping.
//! - **[`config`]**: Embedded defaults merged with a user overlay.
//! - **[`logging`]**: `simplelog` setup for hosts without a logger of their own.

/// Configuration types, loading, and overlay merge logic.
pub mod config;
/// Error taxonomy and severity tiers.
pub mod error;
/// Shadow tree expansion engine.
pub mod expand;
/// Grammar nodes, parse trees, ordering and merging.
pub mod grammar;
/// Logger initialisation.
pub mod logging;
/// Named-tree registry.
pub mod registry;
/// Typed variable values.
pub mod value;

pub use error::{Error, Result, Severity};

use config::Config;
use expand::{Engine, ExpandRequest, ExpandSettings, HandlerRegistry, NameResolver, Shadow, VarExpander};
use grammar::{Arena, NodeId, TreeId};
use registry::TreeRegistry;

/// An arena, its registries and settings, bundled for hosts that want one
/// handle to the whole library.
pub struct Cligen {
    pub arena: Arena,
    pub registry: TreeRegistry,
    pub handlers: HandlerRegistry,
    resolver: Option<Box<dyn NameResolver>>,
    settings: ExpandSettings,
    config: Config,
}

impl Cligen {
    pub fn new(config: Config) -> Self {
        Self {
            arena: Arena::new(),
            registry: TreeRegistry::new(),
            handlers: HandlerRegistry::new(),
            resolver: None,
            settings: ExpandSettings::from_config(&config),
            config,
        }
    }

    /// Built from the embedded defaults merged with the user overlay.
    pub fn load() -> Self {
        Self::new(Config::load())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn settings(&self) -> &ExpandSettings {
        &self.settings
    }

    pub fn set_resolver(&mut self, resolver: impl NameResolver + 'static) {
        self.resolver = Some(Box::new(resolver));
    }

    pub fn register_handler(&mut self, name: impl Into<String>, handler: impl VarExpander + 'static) {
        self.handlers.register(name, handler);
    }

    /// Register a tree, releasing the tree it replaces.
    pub fn register_tree(&mut self, name: &str, root: TreeId) -> Result<()> {
        if let Some(old) = self.registry.register(&mut self.arena, name, root)? {
            self.arena.release_tree(old)?;
        }
        Ok(())
    }

    /// Expand the tree registered as `name`.
    pub fn expand(&mut self, name: &str, req: &ExpandRequest) -> Result<Shadow> {
        let tree = self.registry.lookup(&self.arena, name)?;
        self.expand_tree(tree, req)
    }

    pub fn expand_tree(&mut self, tree: TreeId, req: &ExpandRequest) -> Result<Shadow> {
        let mut engine = Engine::new(&self.registry, &self.handlers, &self.settings);
        if let Some(resolver) = &self.resolver {
            engine = engine.with_resolver(resolver.as_ref());
        }
        engine.expand(&mut self.arena, tree, req)
    }

    pub fn cleanup(&mut self, shadow: Shadow) -> Result<()> {
        expand::cleanup(&mut self.arena, shadow)
    }

    pub fn resolve_original(&self, node: NodeId, target: TreeId) -> Result<NodeId> {
        expand::resolve_original(&self.arena, node, target)
    }
}

impl Default for Cligen {
    fn default() -> Self {
        Self::new(Config::default_config())
    }
}
