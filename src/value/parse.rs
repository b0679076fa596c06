//! Text to value parsing, one rule set per type.

use std::net::{Ipv4Addr, Ipv6Addr};

use chrono::NaiveDate;

use crate::error::{Error, Result};
use crate::value::{CvType, CvValue, Timestamp, Url, Value, ValueOptions};

/// Largest supported decimal fraction-digit count.
pub const MAX_FRACTION_DIGITS: u8 = 18;

/// Parse `text` as a value of type `ty`.
///
/// `digits` is the fraction-digit count for decimals and ignored otherwise.
/// A malformed or out-of-range input is an [`Error::Invalid`] carrying the
/// reason.
pub fn parse(text: &str, ty: CvType, digits: u8, opts: &ValueOptions) -> Result<CvValue> {
    let value = match ty {
        CvType::Int8
        | CvType::Int16
        | CvType::Int32
        | CvType::Int64
        | CvType::Uint8
        | CvType::Uint16
        | CvType::Uint32
        | CvType::Uint64 => parse_int(text, ty)?,
        CvType::Decimal64 => {
            let n = parse_decimal(text, digits)?;
            Value::Decimal64 { n, digits }
        }
        CvType::Bool => Value::Bool(parse_bool(text, opts)?),
        CvType::Rest => Value::Rest(text.to_string()),
        CvType::String => Value::String(text.to_string()),
        CvType::Interface => Value::Interface(text.to_string()),
        CvType::Ipv4Addr => Value::Ipv4Addr(parse_ipv4(text)?),
        CvType::Ipv4Prefix => {
            let (addr, masklen) = split_prefix(text, 32)?;
            Value::Ipv4Prefix {
                addr: parse_ipv4(addr)?,
                masklen,
            }
        }
        CvType::Ipv6Addr => Value::Ipv6Addr(parse_ipv6(text)?),
        CvType::Ipv6Prefix => {
            let (addr, masklen) = split_prefix(text, 128)?;
            Value::Ipv6Prefix {
                addr: parse_ipv6(addr)?,
                masklen,
            }
        }
        CvType::MacAddr => Value::MacAddr(parse_mac(text)?),
        CvType::Url => Value::Url(parse_url(text)?),
        CvType::Uuid => Value::Uuid(parse_uuid(text)?),
        CvType::Time => Value::Time(parse_time(text)?),
        CvType::Void => return Err(Error::invalid("void values cannot be parsed from text")),
        CvType::Empty => {
            if !text.is_empty() {
                return Err(Error::invalid(format!("'{text}' is not empty")));
            }
            Value::Empty
        }
    };
    Ok(CvValue::from_value(value))
}

/// Split an optional sign and base prefix off an integer literal.
///
/// `0x`/`0X` selects hexadecimal, a leading `0` followed by more digits
/// selects octal, anything else is decimal.
fn split_base(text: &str) -> (bool, u32, &str) {
    let (negative, rest) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    if let Some(hex) = rest.strip_prefix("0x").or_else(|| rest.strip_prefix("0X")) {
        (negative, 16, hex)
    } else if rest.len() > 1 && rest.starts_with('0') {
        (negative, 8, &rest[1..])
    } else {
        (negative, 10, rest)
    }
}

/// Parse digits in `radix`. `Ok(None)` means the magnitude does not fit.
fn magnitude(digits: &str, radix: u32) -> Option<Option<u128>> {
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }
    Some(u128::from_str_radix(digits, radix).ok())
}

fn out_of_range(text: &str, ty: CvType) -> Error {
    let (min, max) = ty.int_bounds().unwrap_or((0, 0));
    Error::invalid(format!("number {text} out of range: {min} - {max}"))
}

fn parse_int(text: &str, ty: CvType) -> Result<Value> {
    if text.is_empty() {
        return Err(Error::invalid("empty string is not a number"));
    }
    let (negative, radix, digits) = split_base(text);
    let Some(mag) = magnitude(digits, radix) else {
        return Err(Error::invalid(format!("'{text}' is not a number")));
    };
    let signed = mag
        .and_then(|m| i128::try_from(m).ok())
        .map(|m| if negative { -m } else { m });
    signed
        .and_then(|v| Value::from_i128(ty, v))
        .ok_or_else(|| out_of_range(text, ty))
}

/// Parse a decimal literal into a scaled integer with `digits` fraction digits.
pub fn parse_decimal(text: &str, digits: u8) -> Result<i64> {
    if digits == 0 || digits > MAX_FRACTION_DIGITS {
        return Err(Error::invalid(format!(
            "fraction-digits {digits} must be between 1 and {MAX_FRACTION_DIGITS}"
        )));
    }
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i, f),
        None => (text, ""),
    };
    let (negative, int_digits) = match int_part.as_bytes().first() {
        Some(b'-') => (true, &int_part[1..]),
        Some(b'+') => (false, &int_part[1..]),
        _ => (false, int_part),
    };
    let is_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if int_digits.is_empty() || !is_digits(int_digits) || !is_digits(frac_part) {
        return Err(Error::invalid(format!("'{text}' is not a decimal number")));
    }
    if frac_part.len() > digits as usize {
        return Err(Error::invalid(format!(
            "'{text}' has more than {digits} fraction digits"
        )));
    }
    let range_err = || Error::invalid(format!("decimal {text} out of range"));
    let int: i128 = int_digits.parse().map_err(|_| range_err())?;
    let frac: i128 = if frac_part.is_empty() {
        0
    } else {
        let padded = format!("{frac_part:0<width$}", width = digits as usize);
        padded.parse().map_err(|_| range_err())?
    };
    let scale = 10i128.pow(digits as u32);
    let magnitude = int
        .checked_mul(scale)
        .and_then(|v| v.checked_add(frac))
        .ok_or_else(range_err)?;
    let n = if negative { -magnitude } else { magnitude };
    i64::try_from(n).map_err(|_| range_err())
}

fn parse_bool(text: &str, opts: &ValueOptions) -> Result<bool> {
    match text {
        "true" => Ok(true),
        "false" => Ok(false),
        "on" if opts.bool_on_off => Ok(true),
        "off" if opts.bool_on_off => Ok(false),
        "enable" if opts.bool_enable_disable => Ok(true),
        "disable" if opts.bool_enable_disable => Ok(false),
        _ => Err(Error::invalid(format!("'{text}' is not a boolean value"))),
    }
}

fn parse_ipv4(text: &str) -> Result<Ipv4Addr> {
    text.parse()
        .map_err(|_| Error::invalid(format!("'{text}' is not an IPv4 address")))
}

fn parse_ipv6(text: &str) -> Result<Ipv6Addr> {
    text.parse()
        .map_err(|_| Error::invalid(format!("'{text}' is not an IPv6 address")))
}

fn split_prefix(text: &str, max: u8) -> Result<(&str, u8)> {
    let Some((addr, len)) = text.split_once('/') else {
        return Err(Error::invalid(format!("'{text}' has no prefix length")));
    };
    let masklen: u8 = len
        .parse()
        .ok()
        .filter(|l| *l <= max)
        .ok_or_else(|| Error::invalid(format!("prefix length '{len}' must be 0 - {max}")))?;
    Ok((addr, masklen))
}

/// Exactly six colon-separated two-hex-digit octets, `aa:bb:cc:dd:ee:ff`.
fn parse_mac(text: &str) -> Result<[u8; 6]> {
    let octets = text.split(':').count();
    if octets != 6 {
        return Err(Error::invalid(format!(
            "MAC address '{text}' has {octets} octets, expected 6"
        )));
    }
    if text.len() != 17 || !text.is_ascii() {
        return Err(Error::invalid(format!(
            "MAC address '{text}' must be 17 characters"
        )));
    }
    let bytes = text.as_bytes();
    let mut mac = [0u8; 6];
    for (i, octet) in mac.iter_mut().enumerate() {
        let at = i * 3;
        if i > 0 && bytes[at - 1] != b':' {
            return Err(Error::invalid(format!(
                "MAC address '{text}' expects ':' at offset {}",
                at - 1
            )));
        }
        let pair = &text[at..at + 2];
        if !pair.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(Error::invalid(format!(
                "MAC address '{text}' has invalid octet '{pair}'"
            )));
        }
        *octet = u8::from_str_radix(pair, 16).map_err(|_| {
            Error::invalid(format!("MAC address '{text}' has invalid octet '{pair}'"))
        })?;
    }
    Ok(mac)
}

/// `scheme://[user[:password]@]host[/path]`.
fn parse_url(text: &str) -> Result<Url> {
    let Some((scheme, rest)) = text.split_once("://") else {
        return Err(Error::invalid(format!("'{text}' is not a URL: missing '://'")));
    };
    let non_empty = |s: &str| (!s.is_empty()).then(|| s.to_string());

    let slash = rest.find('/');
    let authority_end = slash.unwrap_or(rest.len());
    let (credentials, host_start) = match rest[..authority_end].find('@') {
        Some(at) => (Some(&rest[..at]), at + 1),
        None => (None, 0),
    };
    let (user, password) = match credentials {
        Some(cred) => match cred.split_once(':') {
            Some((u, p)) => (non_empty(u), non_empty(p)),
            None => (non_empty(cred), None),
        },
        None => (None, None),
    };
    let host = non_empty(&rest[host_start..authority_end]);
    let path = slash.and_then(|s| non_empty(&rest[s + 1..]));

    Ok(Url {
        scheme: non_empty(scheme),
        user,
        password,
        host,
        path,
    })
}

/// Exactly 36 characters, `8-4-4-4-12` hex groups.
fn parse_uuid(text: &str) -> Result<uuid::Uuid> {
    if text.len() != 36 {
        return Err(Error::invalid(format!(
            "UUID '{text}' must be 36 characters"
        )));
    }
    for (i, b) in text.bytes().enumerate() {
        let dash = matches!(i, 8 | 13 | 18 | 23);
        if dash && b != b'-' {
            return Err(Error::invalid(format!("UUID '{text}' expects '-' at offset {i}")));
        }
        if !dash && !b.is_ascii_hexdigit() {
            return Err(Error::invalid(format!(
                "UUID '{text}' has non-hex character at offset {i}"
            )));
        }
    }
    uuid::Uuid::parse_str(text).map_err(|e| Error::invalid(format!("UUID '{text}': {e}")))
}

const MIN_YEAR: i32 = 1970;
const MAX_YEAR: i32 = 2104;

/// Read a fixed-width decimal field and the separator after it.
fn field(text: &str, at: usize, width: usize) -> Option<u32> {
    let s = text.get(at..at + width)?;
    if !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// ISO-8601 subset: `YYYY-MM-DD[T ]HH:MM:SS[.f{1,6}][Z|±HH[:]MM]`.
///
/// The zone marker is accepted but not applied; fields are taken as UTC.
fn parse_time(text: &str) -> Result<Timestamp> {
    let bad = || Error::invalid(format!("'{text}' is not a timestamp (YYYY-MM-DDTHH:MM:SS)"));
    let bytes = text.as_bytes();
    let sep = |at: usize, allowed: &[u8]| bytes.get(at).is_some_and(|b| allowed.contains(b));

    let year = field(text, 0, 4).ok_or_else(bad)? as i32;
    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return Err(Error::invalid(format!(
            "year {year} out of range: {MIN_YEAR} - {MAX_YEAR}"
        )));
    }
    if !(sep(4, b"-") && sep(7, b"-") && sep(10, b"T ") && sep(13, b":") && sep(16, b":")) {
        return Err(bad());
    }
    let month = field(text, 5, 2).ok_or_else(bad)?;
    let day = field(text, 8, 2).ok_or_else(bad)?;
    let hour = field(text, 11, 2).ok_or_else(bad)?;
    let minute = field(text, 14, 2).ok_or_else(bad)?;
    let second = field(text, 17, 2).ok_or_else(bad)?;

    let mut rest = &text[19..];
    let mut usecs = 0u32;
    if let Some(frac) = rest.strip_prefix('.') {
        let len = frac.bytes().take_while(u8::is_ascii_digit).count();
        if len == 0 || len > 6 {
            return Err(Error::invalid(format!(
                "'{text}' must have 1 to 6 fractional second digits"
            )));
        }
        usecs = format!("{:0<6}", &frac[..len]).parse().map_err(|_| bad())?;
        rest = &frac[len..];
    }
    if !is_zone(rest) {
        return Err(Error::invalid(format!("'{text}' has invalid zone '{rest}'")));
    }

    let datetime = NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_micro_opt(hour, minute, second, usecs))
        .ok_or_else(|| Error::invalid(format!("'{text}' is not a valid date and time")))?;
    Ok(Timestamp {
        secs: datetime.and_utc().timestamp(),
        usecs,
    })
}

fn is_zone(zone: &str) -> bool {
    match zone.as_bytes() {
        [] | [b'Z'] | [b'z'] => true,
        [b'+' | b'-', rest @ ..] => {
            let digits: Vec<u8> = rest.iter().copied().filter(|b| *b != b':').collect();
            digits.len() == 4 && digits.iter().all(u8::is_ascii_digit)
        }
        _ => false,
    }
}
