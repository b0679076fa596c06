//! Total ordering over values: type first, then contents.

use std::cmp::Ordering;

use crate::value::{CvValue, MAX_FRACTION_DIGITS, Url, Value};

/// Compare two values.
///
/// Values of different types order by [`CvType`](crate::value::CvType).
/// Numbers compare numerically, strings byte-wise, fixed-size binary forms
/// byte-wise, URLs field by field (scheme, host, path, user, password),
/// opaque values by identity. Empty values are always equal.
pub fn compare(a: &CvValue, b: &CvValue) -> Ordering {
    compare_values(a.value(), b.value())
}

pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    let by_type = a.ty().cmp(&b.ty());
    if by_type != Ordering::Equal {
        return by_type;
    }
    match (a, b) {
        (Value::Decimal64 { n: x, digits: dx }, Value::Decimal64 { n: y, digits: dy }) => {
            decimal_cmp(*x, *dx, *y, *dy)
        }
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Rest(x), Value::Rest(y))
        | (Value::String(x), Value::String(y))
        | (Value::Interface(x), Value::Interface(y)) => x.as_bytes().cmp(y.as_bytes()),
        (Value::Ipv4Addr(x), Value::Ipv4Addr(y)) => x.octets().cmp(&y.octets()),
        (
            Value::Ipv4Prefix { addr: x, masklen: mx },
            Value::Ipv4Prefix { addr: y, masklen: my },
        ) => x.octets().cmp(&y.octets()).then(mx.cmp(my)),
        (Value::Ipv6Addr(x), Value::Ipv6Addr(y)) => x.octets().cmp(&y.octets()),
        (
            Value::Ipv6Prefix { addr: x, masklen: mx },
            Value::Ipv6Prefix { addr: y, masklen: my },
        ) => x.octets().cmp(&y.octets()).then(mx.cmp(my)),
        (Value::MacAddr(x), Value::MacAddr(y)) => x.cmp(y),
        (Value::Uuid(x), Value::Uuid(y)) => x.as_bytes().cmp(y.as_bytes()),
        (Value::Url(x), Value::Url(y)) => url_cmp(x, y),
        (Value::Time(x), Value::Time(y)) => x.cmp(y),
        (Value::Void(x), Value::Void(y)) => {
            let addr = |v: &Option<crate::value::Opaque>| v.as_ref().map(|o| o.addr());
            addr(x).cmp(&addr(y))
        }
        (Value::Empty, Value::Empty) => Ordering::Equal,
        _ => match (a.as_i128(), b.as_i128()) {
            (Some(x), Some(y)) => x.cmp(&y),
            _ => Ordering::Equal,
        },
    }
}

/// Compare scaled decimals, rescaling to a common digit count.
fn decimal_cmp(x: i64, dx: u8, y: i64, dy: u8) -> Ordering {
    let (dx, dy) = (dx.min(MAX_FRACTION_DIGITS), dy.min(MAX_FRACTION_DIGITS));
    let common = dx.max(dy) as u32;
    let scale = |n: i64, d: u8| n as i128 * 10i128.pow(common - d as u32);
    scale(x, dx).cmp(&scale(y, dy))
}

fn url_cmp(x: &Url, y: &Url) -> Ordering {
    x.scheme
        .cmp(&y.scheme)
        .then_with(|| x.host.cmp(&y.host))
        .then_with(|| x.path.cmp(&y.path))
        .then_with(|| x.user.cmp(&y.user))
        .then_with(|| x.password.cmp(&y.password))
}
