//! Constraint checks of a parsed value against its variable spec.

use crate::error::{Error, Result};
use crate::grammar::{Interval, VarSpec};
use crate::value::{CvValue, Value};

/// Check `cv` against the intervals and patterns declared in `spec`.
///
/// Numbers must lie in at least one interval (no intervals means no
/// restriction). Decimals must also carry the declared fraction-digit
/// count. Strings must satisfy at least one pattern when patterns are
/// declared, then have a length inside at least one interval.
pub fn validate(cv: &CvValue, spec: &VarSpec) -> Result<()> {
    let ty = cv.ty();
    if let Value::Decimal64 { digits, .. } = cv.value()
        && *digits != spec.fraction_digits
    {
        return Err(Error::invalid(format!(
            "decimal {cv} has {digits} fraction digits, expected {}",
            spec.fraction_digits
        )));
    }
    if ty.is_numeric() {
        return check_intervals(cv, &spec.intervals, "number");
    }
    if ty.is_string() {
        let text = cv.as_str().unwrap_or_default();
        if !spec.patterns.is_empty() && !spec.patterns.iter().any(|p| p.accepts(text)) {
            let sources: Vec<&str> = spec.patterns.iter().map(|p| p.source()).collect();
            return Err(Error::invalid(format!(
                "'{text}' does not match {}",
                sources.join(" or ")
            )));
        }
        let len = CvValue::from_value(Value::Uint64(text.len() as u64));
        return check_intervals(&len, &spec.intervals, "length");
    }
    Ok(())
}

fn check_intervals(cv: &CvValue, intervals: &[Interval], what: &str) -> Result<()> {
    if intervals.is_empty() || intervals.iter().any(|i| i.contains(cv)) {
        return Ok(());
    }
    let ranges: Vec<String> = intervals
        .iter()
        .map(|i| {
            let bound = |b: &Option<CvValue>| b.as_ref().map(|v| v.to_string()).unwrap_or_default();
            format!("{} - {}", bound(&i.low), bound(&i.high))
        })
        .collect();
    Err(Error::invalid(format!(
        "{what} {cv} out of range: {}",
        ranges.join(", ")
    )))
}
