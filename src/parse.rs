//! Stock string parsers backing the per-type constructors in [`values`](crate::values).
//!
//! Integers follow the usual command-line conventions for base prefixes:
//! `0x`/`0X` hex, `0o`/`0O` or a bare leading `0` octal, `0b`/`0B` binary,
//! and `_` digit separators once a prefix is present.

use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use num_complex::Complex;
use url::Url;

use crate::error::BoxError;

/// A malformed value the standard library has no dedicated error for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    kind: &'static str,
    input: String,
}

impl SyntaxError {
    fn new(kind: &'static str, input: &str) -> Self {
        SyntaxError {
            kind,
            input: input.to_string(),
        }
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {} syntax: {:?}", self.kind, self.input)
    }
}

impl std::error::Error for SyntaxError {}

/// Integer types accepted by [`int`].
pub trait Integer: Sized {
    fn from_str_radix(src: &str, radix: u32) -> Result<Self, std::num::ParseIntError>;
}

macro_rules! impl_integer {
    ($($t:ty),*) => {
        $(impl Integer for $t {
            fn from_str_radix(src: &str, radix: u32) -> Result<Self, std::num::ParseIntError> {
                <$t>::from_str_radix(src, radix)
            }
        })*
    };
}

impl_integer!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

/// Parse an integer of any width, honouring base prefixes.
pub fn int<T: Integer>(s: &str) -> Result<T, BoxError> {
    let (sign, rest) = match s.as_bytes().first() {
        Some(b'-') => ("-", &s[1..]),
        Some(b'+') => ("", &s[1..]),
        _ => ("", s),
    };

    let (radix, digits) = split_radix(rest);
    let digits = if radix == 10 {
        digits.to_string()
    } else {
        if digits.ends_with('_') || digits.contains("__") {
            return Err(SyntaxError::new("integer", s).into());
        }
        digits.replace('_', "")
    };
    // from_str_radix accepts its own sign; a second one must not sneak in.
    if digits.starts_with(['+', '-']) {
        return Err(SyntaxError::new("integer", s).into());
    }

    Ok(T::from_str_radix(&format!("{sign}{digits}"), radix)?)
}

fn split_radix(s: &str) -> (u32, &str) {
    let lower = s.get(..2).map(str::to_ascii_lowercase);
    match lower.as_deref() {
        Some("0x") => (16, &s[2..]),
        Some("0o") => (8, &s[2..]),
        Some("0b") => (2, &s[2..]),
        _ if s.len() > 1 && s.starts_with('0') => (8, &s[1..]),
        _ => (10, s),
    }
}

pub fn float<T>(s: &str) -> Result<T, BoxError>
where
    T: FromStr<Err = std::num::ParseFloatError>,
{
    Ok(s.parse::<T>()?)
}

/// Accepts `1 t T TRUE true True` and `0 f F FALSE false False`.
pub fn boolean(s: &str) -> Result<bool, BoxError> {
    match s {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        _ => Err(SyntaxError::new("boolean", s).into()),
    }
}

/// Complex numbers such as `1+2i`, `-3.5i` or `(2-1i)`.
pub fn complex<T>(s: &str) -> Result<Complex<T>, BoxError>
where
    Complex<T>: FromStr,
    <Complex<T> as FromStr>::Err: fmt::Display,
{
    let inner = s
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
        .unwrap_or(s);
    inner
        .parse::<Complex<T>>()
        .map_err(|e| format!("invalid complex syntax {s:?}: {e}").into())
}

pub fn string(s: &str) -> Result<String, BoxError> {
    Ok(s.to_string())
}

/// Durations in humantime syntax (`90s`, `1h30m`, `250ms`). A bare `0` is
/// accepted as zero.
pub fn duration(s: &str) -> Result<Duration, BoxError> {
    if s == "0" {
        return Ok(Duration::ZERO);
    }
    Ok(humantime::parse_duration(s)?)
}

pub fn format_duration(d: &Duration) -> String {
    humantime::format_duration(*d).to_string()
}

/// A parser for timestamps written in `layout` (strftime syntax). Layouts
/// without a time of day produce midnight.
pub fn timestamp(layout: &str) -> impl Fn(&str) -> Result<NaiveDateTime, BoxError> + use<> {
    let layout = layout.to_string();
    move |s: &str| match NaiveDateTime::parse_from_str(s, &layout) {
        Ok(dt) => Ok(dt),
        Err(full) => match NaiveDate::parse_from_str(s, &layout) {
            Ok(date) => Ok(date.and_time(NaiveTime::default())),
            Err(_) => Err(full.into()),
        },
    }
}

pub fn format_timestamp(layout: &str) -> impl Fn(&NaiveDateTime) -> String + use<> {
    let layout = layout.to_string();
    move |dt: &NaiveDateTime| dt.format(&layout).to_string()
}

pub fn url(s: &str) -> Result<Url, BoxError> {
    Ok(Url::parse(s)?)
}

pub fn ip_addr(s: &str) -> Result<IpAddr, BoxError> {
    Ok(s.parse::<IpAddr>()?)
}

pub fn socket_addr(s: &str) -> Result<SocketAddr, BoxError> {
    Ok(s.parse::<SocketAddr>()?)
}
