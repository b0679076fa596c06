//! Value storage: one enum variant per type, wrapped with name and flags.

use std::any::Any;
use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::rc::Rc;

use crate::error::{Error, Result};
use crate::value::CvType;

/// URL components. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Url {
    pub scheme: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub host: Option<String>,
    pub path: Option<String>,
}

/// UTC instant with microsecond resolution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Timestamp {
    pub secs: i64,
    pub usecs: u32,
}

/// Host-owned opaque payload. Two opaques are equal only if they are the
/// same allocation.
#[derive(Clone)]
pub struct Opaque(Rc<dyn Any>);

impl Opaque {
    pub fn new<T: Any>(value: T) -> Self {
        Opaque(Rc::new(value))
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref()
    }

    /// Address used for identity comparison.
    pub fn addr(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }
}

impl fmt::Debug for Opaque {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Opaque({:#x})", self.addr())
    }
}

/// The typed payload of a [`CvValue`].
#[derive(Debug, Clone)]
pub enum Value {
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Uint8(u8),
    Uint16(u16),
    Uint32(u32),
    Uint64(u64),
    /// Scaled integer: the value is `n / 10^digits`.
    Decimal64 { n: i64, digits: u8 },
    Bool(bool),
    Rest(String),
    String(String),
    Interface(String),
    Ipv4Addr(Ipv4Addr),
    Ipv4Prefix { addr: Ipv4Addr, masklen: u8 },
    Ipv6Addr(Ipv6Addr),
    Ipv6Prefix { addr: Ipv6Addr, masklen: u8 },
    MacAddr([u8; 6]),
    Url(Url),
    Uuid(uuid::Uuid),
    Time(Timestamp),
    Void(Option<Opaque>),
    Empty,
}

impl Value {
    /// The zero value of a type. Decimals take the given fraction-digit count.
    pub fn zero(ty: CvType, digits: u8) -> Self {
        match ty {
            CvType::Int8 => Value::Int8(0),
            CvType::Int16 => Value::Int16(0),
            CvType::Int32 => Value::Int32(0),
            CvType::Int64 => Value::Int64(0),
            CvType::Uint8 => Value::Uint8(0),
            CvType::Uint16 => Value::Uint16(0),
            CvType::Uint32 => Value::Uint32(0),
            CvType::Uint64 => Value::Uint64(0),
            CvType::Decimal64 => Value::Decimal64 { n: 0, digits },
            CvType::Bool => Value::Bool(false),
            CvType::Rest => Value::Rest(String::new()),
            CvType::String => Value::String(String::new()),
            CvType::Interface => Value::Interface(String::new()),
            CvType::Ipv4Addr => Value::Ipv4Addr(Ipv4Addr::UNSPECIFIED),
            CvType::Ipv4Prefix => Value::Ipv4Prefix {
                addr: Ipv4Addr::UNSPECIFIED,
                masklen: 0,
            },
            CvType::Ipv6Addr => Value::Ipv6Addr(Ipv6Addr::UNSPECIFIED),
            CvType::Ipv6Prefix => Value::Ipv6Prefix {
                addr: Ipv6Addr::UNSPECIFIED,
                masklen: 0,
            },
            CvType::MacAddr => Value::MacAddr([0; 6]),
            CvType::Url => Value::Url(Url::default()),
            CvType::Uuid => Value::Uuid(uuid::Uuid::nil()),
            CvType::Time => Value::Time(Timestamp::default()),
            CvType::Void => Value::Void(None),
            CvType::Empty => Value::Empty,
        }
    }

    pub fn ty(&self) -> CvType {
        match self {
            Value::Int8(_) => CvType::Int8,
            Value::Int16(_) => CvType::Int16,
            Value::Int32(_) => CvType::Int32,
            Value::Int64(_) => CvType::Int64,
            Value::Uint8(_) => CvType::Uint8,
            Value::Uint16(_) => CvType::Uint16,
            Value::Uint32(_) => CvType::Uint32,
            Value::Uint64(_) => CvType::Uint64,
            Value::Decimal64 { .. } => CvType::Decimal64,
            Value::Bool(_) => CvType::Bool,
            Value::Rest(_) => CvType::Rest,
            Value::String(_) => CvType::String,
            Value::Interface(_) => CvType::Interface,
            Value::Ipv4Addr(_) => CvType::Ipv4Addr,
            Value::Ipv4Prefix { .. } => CvType::Ipv4Prefix,
            Value::Ipv6Addr(_) => CvType::Ipv6Addr,
            Value::Ipv6Prefix { .. } => CvType::Ipv6Prefix,
            Value::MacAddr(_) => CvType::MacAddr,
            Value::Url(_) => CvType::Url,
            Value::Uuid(_) => CvType::Uuid,
            Value::Time(_) => CvType::Time,
            Value::Void(_) => CvType::Void,
            Value::Empty => CvType::Empty,
        }
    }

    /// Integer payload widened to `i128`, for integer types only.
    pub fn as_i128(&self) -> Option<i128> {
        match *self {
            Value::Int8(v) => Some(v as i128),
            Value::Int16(v) => Some(v as i128),
            Value::Int32(v) => Some(v as i128),
            Value::Int64(v) => Some(v as i128),
            Value::Uint8(v) => Some(v as i128),
            Value::Uint16(v) => Some(v as i128),
            Value::Uint32(v) => Some(v as i128),
            Value::Uint64(v) => Some(v as i128),
            _ => None,
        }
    }

    /// Narrow an `i128` into the integer variant of `ty`.
    pub(crate) fn from_i128(ty: CvType, v: i128) -> Option<Self> {
        let value = match ty {
            CvType::Int8 => Value::Int8(i8::try_from(v).ok()?),
            CvType::Int16 => Value::Int16(i16::try_from(v).ok()?),
            CvType::Int32 => Value::Int32(i32::try_from(v).ok()?),
            CvType::Int64 => Value::Int64(i64::try_from(v).ok()?),
            CvType::Uint8 => Value::Uint8(u8::try_from(v).ok()?),
            CvType::Uint16 => Value::Uint16(u16::try_from(v).ok()?),
            CvType::Uint32 => Value::Uint32(u32::try_from(v).ok()?),
            CvType::Uint64 => Value::Uint64(u64::try_from(v).ok()?),
            _ => return None,
        };
        Some(value)
    }

    /// Text payload of string, rest and interface values.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) | Value::Rest(s) | Value::Interface(s) => Some(s),
            _ => None,
        }
    }
}

/// A typed grammar variable value with its name and flags.
///
/// The variant of `value` is fixed at construction. [`CvValue::set`] refuses
/// a value of another type; [`CvValue::reset`] returns to the zero value of
/// the same type.
#[derive(Debug, Clone)]
pub struct CvValue {
    name: Option<String>,
    keyword: bool,
    flags: u32,
    value: Value,
}

impl CvValue {
    pub fn new(ty: CvType) -> Self {
        Self::from_value(Value::zero(ty, super::DEFAULT_FRACTION_DIGITS))
    }

    pub fn from_value(value: Value) -> Self {
        Self {
            name: None,
            keyword: false,
            flags: 0,
            value,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// A constant keyword value, as recorded for matched command tokens.
    pub fn keyword(name: impl Into<String>, text: impl Into<String>) -> Self {
        let mut cv = Self::from_value(Value::String(text.into())).named(name);
        cv.keyword = true;
        cv
    }

    pub fn ty(&self) -> CvType {
        self.value.ty()
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: Option<String>) {
        self.name = name;
    }

    pub fn is_keyword(&self) -> bool {
        self.keyword
    }

    pub fn set_keyword(&mut self, keyword: bool) {
        self.keyword = keyword;
    }

    /// Host-defined flag bits.
    pub fn flags(&self) -> u32 {
        self.flags
    }

    pub fn set_flags(&mut self, flags: u32) {
        self.flags = flags;
    }

    /// Replace the payload. The new payload must have the same type.
    pub fn set(&mut self, value: Value) -> Result<()> {
        if value.ty() != self.ty() {
            return Err(Error::Invariant(format!(
                "cannot store {} in a {} value",
                value.ty(),
                self.ty()
            )));
        }
        self.value = value;
        Ok(())
    }

    /// Clear the payload, keeping only the declared type.
    pub fn reset(&mut self) {
        let digits = match self.value {
            Value::Decimal64 { digits, .. } => digits,
            _ => super::DEFAULT_FRACTION_DIGITS,
        };
        *self = Self::from_value(Value::zero(self.ty(), digits));
    }

    pub fn as_str(&self) -> Option<&str> {
        self.value.as_str()
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.value {
            Value::Bool(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_i128(&self) -> Option<i128> {
        self.value.as_i128()
    }

    pub fn as_mac(&self) -> Option<[u8; 6]> {
        match self.value {
            Value::MacAddr(mac) => Some(mac),
            _ => None,
        }
    }

    pub fn as_url(&self) -> Option<&Url> {
        match &self.value {
            Value::Url(url) => Some(url),
            _ => None,
        }
    }

    pub fn as_time(&self) -> Option<Timestamp> {
        match self.value {
            Value::Time(ts) => Some(ts),
            _ => None,
        }
    }

    /// Scaled integer and fraction-digit count of a decimal value.
    pub fn as_decimal(&self) -> Option<(i64, u8)> {
        match self.value {
            Value::Decimal64 { n, digits } => Some((n, digits)),
            _ => None,
        }
    }
}

impl PartialEq for CvValue {
    fn eq(&self, other: &Self) -> bool {
        super::compare(self, other).is_eq()
    }
}

impl Eq for CvValue {}

impl PartialOrd for CvValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CvValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        super::compare(self, other)
    }
}
