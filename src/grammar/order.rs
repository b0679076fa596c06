//! Node ordering and equality.
//!
//! Terminators sort before every other kind and references after every
//! other kind; commands sort before variables. Within a kind, commands
//! compare by token and variables by [`VarSpec::compare`].

use std::cmp::Ordering;

use crate::grammar::{GrammarNode, NodeKind};

/// Comparison settings threaded into every compare, merge and sort call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompareOptions {
    /// Fold ASCII case when comparing command tokens.
    pub case_insensitive: bool,
    /// Plain byte-wise ordering instead of version-aware ordering, where
    /// digit runs compare numerically (`if2` < `if10`).
    pub lexicographic: bool,
}

/// Compare two command tokens under `opts`.
pub fn token_cmp(a: &str, b: &str, opts: CompareOptions) -> Ordering {
    let fold = |c: u8| {
        if opts.case_insensitive {
            c.to_ascii_lowercase()
        } else {
            c
        }
    };
    if opts.lexicographic {
        return a.bytes().map(fold).cmp(b.bytes().map(fold));
    }
    version_cmp(a.as_bytes(), b.as_bytes(), fold)
}

fn digit_run(s: &[u8]) -> usize {
    s.iter().take_while(|c| c.is_ascii_digit()).count()
}

fn version_cmp(a: &[u8], b: &[u8], fold: impl Fn(u8) -> u8) -> Ordering {
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        if a[i].is_ascii_digit() && b[j].is_ascii_digit() {
            let (ra, rb) = (digit_run(&a[i..]), digit_run(&b[j..]));
            let (da, db) = (&a[i..i + ra], &b[j..j + rb]);
            let strip = |d: &[u8]| {
                let zeros = d.iter().take_while(|c| **c == b'0').count();
                d.len() - zeros
            };
            let (sa, sb) = (strip(da), strip(db));
            let ord = sa
                .cmp(&sb)
                .then_with(|| da[ra - sa..].cmp(&db[rb - sb..]))
                .then_with(|| rb.cmp(&ra));
            if ord != Ordering::Equal {
                return ord;
            }
            i += ra;
            j += rb;
            continue;
        }
        let ord = fold(a[i]).cmp(&fold(b[j]));
        if ord != Ordering::Equal {
            return ord;
        }
        i += 1;
        j += 1;
    }
    (a.len() - i).cmp(&(b.len() - j))
}

/// Order two nodes. `Equal` means the nodes are duplicates that merge.
pub fn compare_nodes(a: &GrammarNode, b: &GrammarNode, opts: CompareOptions) -> Ordering {
    match (&a.kind, &b.kind) {
        (NodeKind::Command(x), NodeKind::Command(y)) => token_cmp(x, y, opts),
        (NodeKind::Variable(x), NodeKind::Variable(y)) => x.compare(y),
        (NodeKind::Reference(x), NodeKind::Reference(y)) => x.cmp(y),
        (NodeKind::Terminator, NodeKind::Terminator) => Ordering::Equal,
        (x, y) => x.rank().cmp(&y.rank()),
    }
}
