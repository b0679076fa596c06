//! Host collaborators consulted during expansion: variable expansion
//! handlers, registered by callback name, and the tree-name resolver.

use std::collections::HashMap;

use crate::value::CvVec;

/// One alternative produced by an expansion handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpandItem {
    pub command: String,
    pub help: Option<String>,
}

impl ExpandItem {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            help: None,
        }
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }
}

/// What a handler is called with.
#[derive(Debug)]
pub struct ExpandCall<'a> {
    /// Name of the variable being expanded.
    pub name: &'a str,
    pub tokens: &'a [String],
    /// Current variables, keyword entries excluded.
    pub vars: &'a CvVec,
    /// Argument vector from the grammar, if any.
    pub args: Option<&'a CvVec>,
}

/// Produces the literal alternatives of a variable.
///
/// An `Err` carries the reason and aborts the expansion.
pub trait VarExpander {
    fn expand(&self, call: &ExpandCall<'_>) -> Result<Vec<ExpandItem>, String>;
}

impl<F> VarExpander for F
where
    F: Fn(&ExpandCall<'_>) -> Result<Vec<ExpandItem>, String>,
{
    fn expand(&self, call: &ExpandCall<'_>) -> Result<Vec<ExpandItem>, String> {
        self(call)
    }
}

/// Expansion handlers keyed by callback name.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: HashMap<String, Box<dyn VarExpander>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler, replacing any previous one with the same name.
    pub fn register(&mut self, name: impl Into<String>, handler: impl VarExpander + 'static) {
        self.handlers.insert(name.into(), Box::new(handler));
    }

    pub fn get(&self, name: &str) -> Option<&dyn VarExpander> {
        self.handlers.get(name).map(|b| b.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&String> = self.handlers.keys().collect();
        names.sort();
        f.debug_struct("HandlerRegistry").field("handlers", &names).finish()
    }
}

/// Outcome of a tree-name resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Unchanged,
    Rewritten(String),
}

/// Rewrites the target of a tree reference before registry lookup.
pub trait NameResolver {
    fn resolve(&self, name: &str, tokens: &[String]) -> Result<Resolution, String>;
}

impl<F> NameResolver for F
where
    F: Fn(&str, &[String]) -> Result<Resolution, String>,
{
    fn resolve(&self, name: &str, tokens: &[String]) -> Result<Resolution, String> {
        self(name, tokens)
    }
}
