//! Value to text rendering. Output parses back to an equal value.

use std::fmt;

use chrono::{DateTime, Utc};

use crate::value::{CvValue, MAX_FRACTION_DIGITS, Timestamp, Url, Value};

/// Render a scaled decimal: `-15` with one fraction digit is `-1.5`.
/// Digit counts above [`MAX_FRACTION_DIGITS`] are clamped.
pub fn render_decimal(n: i64, digits: u8) -> String {
    let digits = digits.min(MAX_FRACTION_DIGITS);
    let scale = 10u64.pow(digits as u32);
    let abs = n.unsigned_abs();
    let sign = if n < 0 { "-" } else { "" };
    if digits == 0 {
        return format!("{sign}{abs}");
    }
    format!(
        "{sign}{}.{:0width$}",
        abs / scale,
        abs % scale,
        width = digits as usize
    )
}

/// Fixed-width `YYYY-MM-DDTHH:MM:SS.ffffffZ`.
pub fn render_time(ts: Timestamp) -> String {
    match DateTime::<Utc>::from_timestamp(ts.secs, ts.usecs * 1000) {
        Some(dt) => format!("{}.{:06}Z", dt.format("%Y-%m-%dT%H:%M:%S"), ts.usecs),
        None => format!("{}.{:06}", ts.secs, ts.usecs),
    }
}

fn render_mac(mac: &[u8; 6]) -> String {
    mac.iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(":")
}

impl fmt::Display for Url {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://", self.scheme.as_deref().unwrap_or(""))?;
        if let Some(user) = &self.user {
            f.write_str(user)?;
            if let Some(password) = &self.password {
                write!(f, ":{password}")?;
            }
            f.write_str("@")?;
        }
        f.write_str(self.host.as_deref().unwrap_or(""))?;
        if let Some(path) = &self.path {
            write!(f, "/{path}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int8(v) => write!(f, "{v}"),
            Value::Int16(v) => write!(f, "{v}"),
            Value::Int32(v) => write!(f, "{v}"),
            Value::Int64(v) => write!(f, "{v}"),
            Value::Uint8(v) => write!(f, "{v}"),
            Value::Uint16(v) => write!(f, "{v}"),
            Value::Uint32(v) => write!(f, "{v}"),
            Value::Uint64(v) => write!(f, "{v}"),
            Value::Decimal64 { n, digits } => f.write_str(&render_decimal(*n, *digits)),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Rest(s) | Value::String(s) | Value::Interface(s) => f.write_str(s),
            Value::Ipv4Addr(a) => write!(f, "{a}"),
            Value::Ipv4Prefix { addr, masklen } => write!(f, "{addr}/{masklen}"),
            Value::Ipv6Addr(a) => write!(f, "{a}"),
            Value::Ipv6Prefix { addr, masklen } => write!(f, "{addr}/{masklen}"),
            Value::MacAddr(mac) => f.write_str(&render_mac(mac)),
            Value::Url(url) => write!(f, "{url}"),
            Value::Uuid(u) => write!(f, "{}", u.hyphenated()),
            Value::Time(ts) => f.write_str(&render_time(*ts)),
            Value::Void(Some(opaque)) => write!(f, "{:#x}", opaque.addr()),
            Value::Void(None) => f.write_str("(null)"),
            Value::Empty => Ok(()),
        }
    }
}

impl fmt::Display for CvValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{CvType, ValueOptions, parse};

    fn round_trip(text: &str, ty: CvType) -> String {
        parse(text, ty, 2, &ValueOptions::default())
            .unwrap()
            .to_string()
    }

    #[test]
    fn decimal_rendering() {
        assert_eq!(render_decimal(-15, 1), "-1.5");
        assert_eq!(render_decimal(5, 3), "0.005");
        assert_eq!(render_decimal(-5, 2), "-0.05");
        assert_eq!(render_decimal(i64::MIN, 18), "-9.223372036854775808");
    }

    #[test]
    fn oversized_digit_count_is_clamped() {
        assert_eq!(render_decimal(5, 40), render_decimal(5, 18));
        let cv = CvValue::from_value(Value::Decimal64 { n: -1, digits: u8::MAX });
        assert_eq!(cv.to_string(), "-0.000000000000000001");
    }

    #[test]
    fn normalizing_round_trips() {
        assert_eq!(round_trip("0x1A", CvType::Int32), "26");
        assert_eq!(round_trip("+7", CvType::Int8), "7");
        assert_eq!(round_trip("1.5", CvType::Decimal64), "1.50");
        assert_eq!(round_trip("AA:BB:CC:DD:EE:FF", CvType::MacAddr), "aa:bb:cc:dd:ee:ff");
        assert_eq!(round_trip("10.1.2.0/24", CvType::Ipv4Prefix), "10.1.2.0/24");
        assert_eq!(
            round_trip("123E4567-E89B-12D3-A456-426614174000", CvType::Uuid),
            "123e4567-e89b-12d3-a456-426614174000"
        );
    }

    #[test]
    fn url_rendering() {
        for text in [
            "http://example.com",
            "ssh://alice@host/home",
            "ftp://bob:pw@ftp.example.org/pub/x.tar",
        ] {
            assert_eq!(round_trip(text, CvType::Url), text);
        }
    }

    #[test]
    fn time_rendering() {
        assert_eq!(
            round_trip("2021-01-01T00:00:00Z", CvType::Time),
            "2021-01-01T00:00:00.000000Z"
        );
        assert_eq!(
            round_trip("2008-09-21T18:57:21.003456Z", CvType::Time),
            "2008-09-21T18:57:21.003456Z"
        );
    }
}
