//! Per-request context and engine-wide settings.

use crate::config::Config;
use crate::grammar::{Callback, CompareOptions, NodeId};
use crate::value::CvVec;

/// Context of one expansion request.
#[derive(Debug, Clone, Default)]
pub struct ExpandRequest {
    /// Tokens typed so far.
    pub tokens: Vec<String>,
    /// Values matched so far.
    pub vars: CvVec,
    /// Leave out nodes flagged hidden.
    pub hide: bool,
    /// Call expansion handlers of variables.
    pub expand_vars: bool,
    /// Callbacks inherited from the command being completed.
    pub callbacks: Vec<Callback>,
    /// Labels to filter out.
    pub filters: Vec<String>,
    /// Node whose child tree is being expanded.
    pub enclosing: Option<NodeId>,
}

impl ExpandRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tokens<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tokens = tokens.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_vars(mut self, vars: CvVec) -> Self {
        self.vars = vars;
        self
    }

    pub fn hide(mut self, hide: bool) -> Self {
        self.hide = hide;
        self
    }

    pub fn expand_vars(mut self, expand: bool) -> Self {
        self.expand_vars = expand;
        self
    }

    pub fn with_callbacks(mut self, callbacks: Vec<Callback>) -> Self {
        self.callbacks = callbacks;
        self
    }

    pub fn with_filter(mut self, label: impl Into<String>) -> Self {
        self.filters.push(label.into());
        self
    }

    pub fn enclosing(mut self, node: NodeId) -> Self {
        self.enclosing = Some(node);
        self
    }
}

/// Engine settings, usually taken from [`Config`].
#[derive(Debug, Clone, PartialEq)]
pub struct ExpandSettings {
    pub compare: CompareOptions,
    pub choice_delimiters: String,
    pub keep_expanded_variable: bool,
    pub default_filters: Vec<String>,
    pub remove_prefix: String,
}

impl Default for ExpandSettings {
    fn default() -> Self {
        Self {
            compare: CompareOptions::default(),
            choice_delimiters: ",|".into(),
            keep_expanded_variable: false,
            default_filters: Vec::new(),
            remove_prefix: "@remove:".into(),
        }
    }
}

impl ExpandSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            compare: config.compare_options(),
            choice_delimiters: config.expand.choice_delimiters.clone(),
            keep_expanded_variable: config.expand.keep_expanded_variable,
            default_filters: config.expand.default_filters.clone(),
            remove_prefix: config.expand.remove_prefix.clone(),
        }
    }

    /// Alternatives of a choice list, in order, blanks dropped.
    pub fn choices<'a>(&self, list: &'a str) -> Vec<&'a str> {
        list.split(|c: char| self.choice_delimiters.contains(c))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// Labels a reference asks to filter, from its `@remove:<label>` labels.
    pub fn removed_labels<'a>(&self, labels: &'a [String]) -> Vec<&'a str> {
        labels
            .iter()
            .filter_map(|l| l.strip_prefix(self.remove_prefix.as_str()))
            .collect()
    }
}
