//! Typed values of grammar variables: parse, validate, render, compare.
//!
//! Duplicating a value is [`Clone`]; every owned string is deep-copied.
//! Releasing is [`Drop`].

pub mod compare;
pub mod data;
pub mod parse;
pub mod render;
pub mod types;
pub mod validate;
pub mod vec;

pub use compare::{compare, compare_values};
pub use data::{CvValue, Opaque, Timestamp, Url, Value};
pub use parse::{MAX_FRACTION_DIGITS, parse};
pub use render::{render_decimal, render_time};
pub use types::CvType;
pub use validate::validate;
pub use vec::CvVec;

/// Fraction digits given to decimal values that do not declare their own.
pub const DEFAULT_FRACTION_DIGITS: u8 = 2;

/// Parser settings that come from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ValueOptions {
    /// Accept `on`/`off` as booleans.
    pub bool_on_off: bool,
    /// Accept `enable`/`disable` as booleans.
    pub bool_enable_disable: bool,
}
