//! Preference ranks used to pick among several matching nodes.
//!
//! Higher wins. An explicit per-node preference overrides the table.

use crate::grammar::{GrammarNode, NodeKind, VarSpec};
use crate::value::CvType;

pub const PREF_COMMAND_EXACT: i32 = 100;
pub const PREF_COMMAND_PREFIX: i32 = 90;
pub const PREF_ADDRESS: i32 = 70;
pub const PREF_DECIMAL: i32 = 60;
/// Ranged integers start here and gain one point per narrower width step.
pub const PREF_INT_RANGED: i32 = 50;
pub const PREF_INT: i32 = 40;
pub const PREF_BOOL: i32 = 30;
pub const PREF_REGEX_STRING: i32 = 20;
pub const PREF_STRING: i32 = 10;
pub const PREF_REST: i32 = 1;
pub const PREF_NONE: i32 = 0;

/// Preference of a node. `exact` tells whether a command matched its whole
/// token rather than a prefix of it.
pub fn preference(node: &GrammarNode, exact: bool) -> i32 {
    if let Some(p) = node.preference {
        return p;
    }
    match &node.kind {
        NodeKind::Command(_) if exact => PREF_COMMAND_EXACT,
        NodeKind::Command(_) => PREF_COMMAND_PREFIX,
        NodeKind::Variable(spec) => var_preference(spec),
        NodeKind::Reference(_) | NodeKind::Terminator => PREF_NONE,
    }
}

pub fn var_preference(spec: &VarSpec) -> i32 {
    match spec.ty {
        CvType::Ipv4Addr
        | CvType::Ipv4Prefix
        | CvType::Ipv6Addr
        | CvType::Ipv6Prefix
        | CvType::MacAddr
        | CvType::Uuid
        | CvType::Time
        | CvType::Url => PREF_ADDRESS,
        CvType::Decimal64 => PREF_DECIMAL,
        ty if ty.is_int() => {
            if spec.intervals.is_empty() {
                PREF_INT
            } else {
                let width = ty.int_width().unwrap_or(64);
                PREF_INT_RANGED + (64 / width as i32).ilog2() as i32
            }
        }
        CvType::Bool | CvType::Interface => PREF_BOOL,
        CvType::String if !spec.patterns.is_empty() => PREF_REGEX_STRING,
        CvType::String => PREF_STRING,
        CvType::Rest => PREF_REST,
        _ => PREF_NONE,
    }
}
