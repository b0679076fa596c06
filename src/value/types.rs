//! Declared value types and their grammar names.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// The declared type of a grammar variable.
///
/// Variant order is significant: values of different types compare by this
/// order before their contents are looked at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CvType {
    Int8,
    Int16,
    Int32,
    Int64,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Decimal64,
    Bool,
    Rest,
    String,
    Interface,
    Ipv4Addr,
    Ipv4Prefix,
    Ipv6Addr,
    Ipv6Prefix,
    MacAddr,
    Url,
    Uuid,
    Time,
    Void,
    Empty,
}

const NAMES: &[(CvType, &str)] = &[
    (CvType::Int8, "int8"),
    (CvType::Int16, "int16"),
    (CvType::Int32, "int32"),
    (CvType::Int64, "int64"),
    (CvType::Uint8, "uint8"),
    (CvType::Uint16, "uint16"),
    (CvType::Uint32, "uint32"),
    (CvType::Uint64, "uint64"),
    (CvType::Decimal64, "decimal64"),
    (CvType::Bool, "bool"),
    (CvType::Rest, "rest"),
    (CvType::String, "string"),
    (CvType::Interface, "interface"),
    (CvType::Ipv4Addr, "ipv4addr"),
    (CvType::Ipv4Prefix, "ipv4prefix"),
    (CvType::Ipv6Addr, "ipv6addr"),
    (CvType::Ipv6Prefix, "ipv6prefix"),
    (CvType::MacAddr, "macaddr"),
    (CvType::Url, "url"),
    (CvType::Uuid, "uuid"),
    (CvType::Time, "time"),
    (CvType::Void, "void"),
    (CvType::Empty, "empty"),
];

impl CvType {
    pub fn name(self) -> &'static str {
        NAMES
            .iter()
            .find(|(ty, _)| *ty == self)
            .map(|(_, name)| *name)
            .unwrap_or("unknown")
    }

    pub fn is_signed_int(self) -> bool {
        matches!(
            self,
            CvType::Int8 | CvType::Int16 | CvType::Int32 | CvType::Int64
        )
    }

    pub fn is_unsigned_int(self) -> bool {
        matches!(
            self,
            CvType::Uint8 | CvType::Uint16 | CvType::Uint32 | CvType::Uint64
        )
    }

    pub fn is_int(self) -> bool {
        self.is_signed_int() || self.is_unsigned_int()
    }

    /// Integers and decimals: the types an interval restricts by value.
    pub fn is_numeric(self) -> bool {
        self.is_int() || self == CvType::Decimal64
    }

    /// Types an interval restricts by length and patterns restrict by content.
    pub fn is_string(self) -> bool {
        matches!(self, CvType::String | CvType::Rest | CvType::Interface)
    }

    /// Inclusive bounds of an integer type, widened to `i128`.
    pub fn int_bounds(self) -> Option<(i128, i128)> {
        let bounds = match self {
            CvType::Int8 => (i8::MIN as i128, i8::MAX as i128),
            CvType::Int16 => (i16::MIN as i128, i16::MAX as i128),
            CvType::Int32 => (i32::MIN as i128, i32::MAX as i128),
            CvType::Int64 => (i64::MIN as i128, i64::MAX as i128),
            CvType::Uint8 => (0, u8::MAX as i128),
            CvType::Uint16 => (0, u16::MAX as i128),
            CvType::Uint32 => (0, u32::MAX as i128),
            CvType::Uint64 => (0, u64::MAX as i128),
            _ => return None,
        };
        Some(bounds)
    }

    /// Storage width in bits for integer types.
    pub fn int_width(self) -> Option<u32> {
        match self {
            CvType::Int8 | CvType::Uint8 => Some(8),
            CvType::Int16 | CvType::Uint16 => Some(16),
            CvType::Int32 | CvType::Uint32 => Some(32),
            CvType::Int64 | CvType::Uint64 => Some(64),
            _ => None,
        }
    }
}

impl fmt::Display for CvType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CvType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NAMES
            .iter()
            .find(|(_, name)| *name == s)
            .map(|(ty, _)| *ty)
            .ok_or_else(|| Error::invalid(format!("unknown type: {s}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for (ty, name) in NAMES {
            assert_eq!(ty.name(), *name);
            assert_eq!(name.parse::<CvType>().unwrap(), *ty);
        }
    }

    #[test]
    fn unknown_name() {
        assert!("float".parse::<CvType>().is_err());
    }

    #[test]
    fn classification() {
        assert!(CvType::Uint16.is_int());
        assert!(!CvType::Decimal64.is_int());
        assert!(CvType::Decimal64.is_numeric());
        assert!(CvType::Rest.is_string());
        assert_eq!(CvType::Uint8.int_bounds(), Some((0, 255)));
        assert_eq!(CvType::Int64.int_width(), Some(64));
    }
}
