//! Reversible quoting of expansion texts that would not survive as a
//! single command token.

use crate::error::{Error, Result};

const SIGNIFICANT: &str = "\"'\\?|;&<>$`#";

pub fn needs_escape(text: &str) -> bool {
    text.is_empty() || text.chars().any(|c| c.is_whitespace() || SIGNIFICANT.contains(c))
}

/// Quote `text` if it needs it, otherwise return it as is.
pub fn escape(text: &str) -> Result<String> {
    if !needs_escape(text) {
        return Ok(text.to_string());
    }
    shlex::try_quote(text)
        .map(|quoted| quoted.into_owned())
        .map_err(|e| Error::invalid(format!("cannot quote {text:?}: {e}")))
}

/// Undo [`escape`]. `None` if `text` is not exactly one quoted word.
pub fn unescape(text: &str) -> Option<String> {
    let mut words = shlex::split(text)?;
    if words.len() != 1 {
        return None;
    }
    words.pop()
}
