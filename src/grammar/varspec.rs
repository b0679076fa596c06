//! Declared type and constraints of a variable node.

use std::cmp::Ordering;

use regex::Regex;

use crate::error::{Error, Result};
use crate::value::{self, CvType, CvValue, CvVec, Value, ValueOptions};

/// A host callback reference and its argument vector.
///
/// The core copies these verbatim and never interprets them.
#[derive(Debug, Clone, PartialEq)]
pub struct Callback {
    pub name: String,
    pub args: Option<CvVec>,
}

impl Callback {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: None,
        }
    }

    pub fn with_args(mut self, args: CvVec) -> Self {
        self.args = Some(args);
        self
    }
}

/// An inclusive `[low, high]` interval. A missing bound is the type's
/// minimum or maximum.
#[derive(Debug, Clone, PartialEq)]
pub struct Interval {
    pub low: Option<CvValue>,
    pub high: Option<CvValue>,
}

impl Interval {
    pub fn new(low: CvValue, high: CvValue) -> Self {
        Self {
            low: Some(low),
            high: Some(high),
        }
    }

    /// Length interval for string variables.
    pub fn length(low: u64, high: u64) -> Self {
        Self::new(
            CvValue::from_value(Value::Uint64(low)),
            CvValue::from_value(Value::Uint64(high)),
        )
    }

    pub fn contains(&self, cv: &CvValue) -> bool {
        let above = self
            .low
            .as_ref()
            .is_none_or(|low| value::compare(cv, low) != Ordering::Less);
        let below = self
            .high
            .as_ref()
            .is_none_or(|high| value::compare(cv, high) != Ordering::Greater);
        above && below
    }

    fn compare(&self, other: &Self) -> Ordering {
        self.low.cmp(&other.low).then_with(|| self.high.cmp(&other.high))
    }
}

/// A compiled, anchored regular expression with an invert flag.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    invert: bool,
    regex: Regex,
}

impl Pattern {
    /// Compile `source`. The expression must match the whole value.
    pub fn new(source: impl Into<String>, invert: bool) -> Result<Self> {
        let source = source.into();
        let regex = Regex::new(&format!("^(?:{source})$")).map_err(|e| Error::Pattern {
            pattern: source.clone(),
            source: e,
        })?;
        Ok(Self {
            source,
            invert,
            regex,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn invert(&self) -> bool {
        self.invert
    }

    /// True if `text` satisfies the pattern, honoring the invert flag.
    pub fn accepts(&self, text: &str) -> bool {
        self.regex.is_match(text) != self.invert
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source && self.invert == other.invert
    }
}

/// Type and constraints of a variable node.
#[derive(Debug, Clone, PartialEq)]
pub struct VarSpec {
    pub ty: CvType,
    /// Variable name, e.g. `port` in `<port:uint16>`.
    pub name: String,
    pub fraction_digits: u8,
    pub intervals: Vec<Interval>,
    pub patterns: Vec<Pattern>,
    pub help: Option<String>,
    /// Callback producing literal alternatives at expansion time.
    pub expand: Option<Callback>,
    /// Static alternatives separated by `,` or `|`.
    pub choice: Option<String>,
    /// Host callback translating a parsed value; carried, never invoked here.
    pub translate: Option<Callback>,
}

impl VarSpec {
    pub fn new(name: impl Into<String>, ty: CvType) -> Self {
        Self {
            ty,
            name: name.into(),
            fraction_digits: value::DEFAULT_FRACTION_DIGITS,
            intervals: Vec::new(),
            patterns: Vec::new(),
            help: None,
            expand: None,
            choice: None,
            translate: None,
        }
    }

    pub fn with_interval(mut self, interval: Interval) -> Self {
        self.intervals.push(interval);
        self
    }

    pub fn with_pattern(mut self, pattern: Pattern) -> Self {
        self.patterns.push(pattern);
        self
    }

    pub fn with_choice(mut self, choice: impl Into<String>) -> Self {
        self.choice = Some(choice.into());
        self
    }

    pub fn with_expand(mut self, callback: Callback) -> Self {
        self.expand = Some(callback);
        self
    }

    pub fn with_fraction_digits(mut self, digits: u8) -> Self {
        self.fraction_digits = digits;
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Parse `text` as this variable's type, then validate it.
    pub fn parse_and_validate(&self, text: &str, opts: &ValueOptions) -> Result<CvValue> {
        let cv = value::parse(text, self.ty, self.fraction_digits, opts)?.named(self.name.clone());
        value::validate(&cv, self)?;
        Ok(cv)
    }

    /// Structural comparison used for node ordering and merge detection.
    ///
    /// Considers the type, expansion callback name, choice list, pattern list
    /// and interval list. The variable name is deliberately not part of it.
    pub fn compare(&self, other: &Self) -> Ordering {
        self.ty
            .cmp(&other.ty)
            .then_with(|| {
                let name = |s: &VarSpec| s.expand.as_ref().map(|cb| cb.name.clone());
                name(self).cmp(&name(other))
            })
            .then_with(|| self.choice.cmp(&other.choice))
            .then_with(|| {
                let key = |p: &Pattern| (p.source.clone(), p.invert);
                self.patterns
                    .iter()
                    .map(key)
                    .cmp(other.patterns.iter().map(key))
            })
            .then_with(|| {
                self.intervals
                    .len()
                    .cmp(&other.intervals.len())
                    .then_with(|| {
                        self.intervals
                            .iter()
                            .zip(&other.intervals)
                            .map(|(a, b)| a.compare(b))
                            .find(|o| o.is_ne())
                            .unwrap_or(Ordering::Equal)
                    })
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pattern_is_anchored() {
        let p = Pattern::new("[a-z]+", false).unwrap();
        assert!(p.accepts("abc"));
        assert!(!p.accepts("abc1"));
        let inverted = Pattern::new("[a-z]+", true).unwrap();
        assert!(inverted.accepts("abc1"));
    }

    #[test]
    fn bad_pattern_is_fatal() {
        let err = Pattern::new("(", false).unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn open_interval() {
        let at_most_ten = Interval {
            low: None,
            high: Some(CvValue::from_value(Value::Int32(10))),
        };
        assert!(at_most_ten.contains(&CvValue::from_value(Value::Int32(-100))));
        assert!(!at_most_ten.contains(&CvValue::from_value(Value::Int32(11))));
    }

    #[test]
    fn compare_ignores_name() {
        let a = VarSpec::new("a", CvType::Int32);
        let b = VarSpec::new("b", CvType::Int32);
        assert_eq!(a.compare(&b), Ordering::Equal);
        let ranged = VarSpec::new("c", CvType::Int32).with_interval(Interval::new(
            CvValue::from_value(Value::Int32(1)),
            CvValue::from_value(Value::Int32(5)),
        ));
        assert_ne!(a.compare(&ranged), Ordering::Equal);
        let choice = VarSpec::new("d", CvType::Int32).with_choice("1|2");
        assert_ne!(a.compare(&choice), Ordering::Equal);
    }
}
