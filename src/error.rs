//! Error taxonomy shared by every component.
//!
//! Errors fall into three tiers, reported by [`Error::severity`]:
//! - **Validation**: the input did not parse or failed a range, length or
//!   pattern check. Expected during interactive use; the reason string is
//!   owned by the caller.
//! - **Structural**: a tree reference or lookup target was not found. Reported,
//!   but sibling processing continues.
//! - **Fatal**: an invariant was violated or a host collaborator failed. The
//!   operation aborts without mutating persistent state.

use thiserror::Error;

use crate::grammar::{NodeId, TreeId};

/// Which tier an [`Error`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Validation,
    Structural,
    Fatal,
}

#[derive(Debug, Error)]
pub enum Error {
    /// Content or format mismatch; the payload is the human-readable reason.
    #[error("{0}")]
    Invalid(String),

    /// A tree reference named a tree the registry does not know.
    #[error("unresolved tree reference: {0}")]
    UnresolvedTree(String),

    /// A lookup by name found no candidate node.
    #[error("no such node: {0}")]
    NoSuchNode(String),

    #[error("stale node handle {0}")]
    StaleNode(NodeId),

    #[error("stale tree handle {0}")]
    StaleTree(TreeId),

    #[error("expansion callback `{name}` failed: {reason}")]
    Callback { name: String, reason: String },

    #[error("tree name resolution for `{name}` failed: {reason}")]
    Resolve { name: String, reason: String },

    #[error("invalid pattern `{pattern}`: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("invariant violated: {0}")]
    Invariant(String),
}

impl Error {
    /// Shorthand for a validation failure with the given reason.
    pub fn invalid(reason: impl Into<String>) -> Self {
        Error::Invalid(reason.into())
    }

    pub fn severity(&self) -> Severity {
        match self {
            Error::Invalid(_) => Severity::Validation,
            Error::UnresolvedTree(_) | Error::NoSuchNode(_) => Severity::Structural,
            Error::StaleNode(_)
            | Error::StaleTree(_)
            | Error::Callback { .. }
            | Error::Resolve { .. }
            | Error::Pattern { .. }
            | Error::Invariant(_) => Severity::Fatal,
        }
    }

    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }

    /// The reason string of a validation failure, if this is one.
    pub fn reason(&self) -> Option<&str> {
        match self {
            Error::Invalid(reason) => Some(reason),
            _ => None,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiers() {
        assert_eq!(Error::invalid("bad").severity(), Severity::Validation);
        assert_eq!(
            Error::UnresolvedTree("x".into()).severity(),
            Severity::Structural
        );
        assert!(Error::Invariant("x".into()).is_fatal());
    }

    #[test]
    fn reason_only_for_validation() {
        assert_eq!(Error::invalid("too long").reason(), Some("too long"));
        assert_eq!(Error::UnresolvedTree("t".into()).reason(), None);
        assert_eq!(Error::invalid("too long").to_string(), "too long");
    }
}
