//! Ready-made [`Var`] and [`List`] boxes for the common types.
//!
//! ```ignore
//! let mut set = FlagSet::new("app", ErrorHandling::ContinueOnError);
//! let port = set.add("port", values::uint16(8080), "listen `port`");
//! let peers = set.add("peer", values::socket_addrs_str(&["10.0.0.1:7000"]), "peer address");
//! ```
//!
//! Types without a literal syntax (URLs, addresses, timestamps) also come in a
//! `_str` form taking the default as text. Those panic when the default does
//! not parse.

use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use chrono::NaiveDateTime;
use num_complex::Complex;
use url::Url;

use crate::error::BoxError;
use crate::parse;
use crate::value::{List, Var, setter_from};

/// A flag of any `T` with a caller-supplied setter.
///
/// Chain [`Var::bool_flag`] if the flag should work without a value.
pub fn var<T, S>(default: T, setter: S) -> Var<T>
where
    T: fmt::Display + 'static,
    S: FnMut(&mut T, &str) -> Result<(), BoxError> + 'static,
{
    Var::new(default, setter)
}

/// Like [`var`], with the default given as text and run through `setter`.
///
/// # Panics
///
/// Panics if `default` does not parse.
pub fn var_str<T, S>(default: &str, setter: S) -> Var<T>
where
    T: fmt::Display + Default + 'static,
    S: FnMut(&mut T, &str) -> Result<(), BoxError> + 'static,
{
    Var::from_str_default(default, setter)
}

/// A repeatable flag of any `T`.
pub fn list<T, P>(defaults: &[T], parse: P) -> List<T>
where
    T: fmt::Display + Clone + 'static,
    P: Fn(&str) -> Result<T, BoxError> + 'static,
{
    List::new(defaults, parse)
}

/// # Panics
///
/// Panics on the first default that does not parse.
pub fn list_str<T, S, P>(defaults: &[S], parse: P) -> List<T>
where
    T: fmt::Display + 'static,
    S: AsRef<str>,
    P: Fn(&str) -> Result<T, BoxError> + 'static,
{
    List::from_str_defaults(defaults, parse)
}

fn parsed_default<T>(default: &str, parse: fn(&str) -> Result<T, BoxError>) -> T {
    match parse(default) {
        Ok(v) => v,
        Err(e) => panic!("flag: invalid default value {default:?}: {e}"),
    }
}

macro_rules! numeric_values {
    ($parser:path; $($scalar:ident, $list:ident, $t:ty;)*) => {
        $(
            #[doc = concat!("A `", stringify!($t), "` flag.")]
            pub fn $scalar(default: $t) -> Var<$t> {
                let parser: fn(&str) -> Result<$t, BoxError> = $parser;
                Var::new(default, setter_from(parser))
            }

            #[doc = concat!("A repeatable `", stringify!($t), "` flag.")]
            pub fn $list(defaults: &[$t]) -> List<$t> {
                let parser: fn(&str) -> Result<$t, BoxError> = $parser;
                List::new(defaults, parser)
            }
        )*
    };
}

numeric_values! {
    parse::int;
    int, ints, isize;
    int8, int8s, i8;
    int16, int16s, i16;
    int32, int32s, i32;
    int64, int64s, i64;
    uint, uints, usize;
    uint8, uint8s, u8;
    uint16, uint16s, u16;
    uint32, uint32s, u32;
    uint64, uint64s, u64;
}

numeric_values! {
    parse::float;
    float32, float32s, f32;
    float64, float64s, f64;
}

numeric_values! {
    parse::complex;
    complex64, complex64s, Complex<f32>;
    complex128, complex128s, Complex<f64>;
}

/// A boolean flag. It may be given bare on the command line (`-verbose`).
pub fn boolean(default: bool) -> Var<bool> {
    Var::new(default, setter_from(parse::boolean)).bool_flag()
}

pub fn booleans(defaults: &[bool]) -> List<bool> {
    List::new(defaults, parse::boolean).bool_flag()
}

pub fn string(default: impl Into<String>) -> Var<String> {
    Var::new(default.into(), setter_from(parse::string))
}

pub fn strings<S: AsRef<str>>(defaults: &[S]) -> List<String> {
    List::from_str_defaults(defaults, parse::string)
}

/// A duration flag in humantime syntax (`1h30m`, `250ms`).
pub fn duration(default: Duration) -> Var<Duration> {
    Var::with_renderer(default, setter_from(parse::duration), parse::format_duration)
}

pub fn durations(defaults: &[Duration]) -> List<Duration> {
    List::with_renderer(defaults, parse::duration, parse::format_duration)
}

/// A timestamp flag in the given strftime `layout`.
pub fn time(layout: &str, default: NaiveDateTime) -> Var<NaiveDateTime> {
    Var::with_renderer(
        default,
        setter_from(parse::timestamp(layout)),
        parse::format_timestamp(layout),
    )
}

/// # Panics
///
/// Panics if `default` does not match `layout`.
pub fn time_str(layout: &str, default: &str) -> Var<NaiveDateTime> {
    let parser = parse::timestamp(layout);
    let value = match parser(default) {
        Ok(v) => v,
        Err(e) => panic!("flag: invalid default value {default:?}: {e}"),
    };
    Var::with_renderer(value, setter_from(parser), parse::format_timestamp(layout))
}

pub fn times(layout: &str, defaults: &[NaiveDateTime]) -> List<NaiveDateTime> {
    List::with_renderer(
        defaults,
        parse::timestamp(layout),
        parse::format_timestamp(layout),
    )
}

/// # Panics
///
/// Panics on the first default that does not match `layout`.
pub fn times_str<S: AsRef<str>>(layout: &str, defaults: &[S]) -> List<NaiveDateTime> {
    List::from_str_defaults_with_renderer(
        defaults,
        parse::timestamp(layout),
        parse::format_timestamp(layout),
    )
}

macro_rules! textual_values {
    ($($scalar:ident, $scalar_str:ident, $list:ident, $list_str:ident, $t:ty, $parser:path;)*) => {
        $(
            pub fn $scalar(default: $t) -> Var<$t> {
                Var::new(default, setter_from($parser))
            }

            /// # Panics
            ///
            /// Panics if `default` does not parse.
            pub fn $scalar_str(default: &str) -> Var<$t> {
                Var::new(parsed_default(default, $parser), setter_from($parser))
            }

            pub fn $list(defaults: &[$t]) -> List<$t> {
                List::new(defaults, $parser)
            }

            /// # Panics
            ///
            /// Panics on the first default that does not parse.
            pub fn $list_str<S: AsRef<str>>(defaults: &[S]) -> List<$t> {
                List::from_str_defaults(defaults, $parser)
            }
        )*
    };
}

textual_values! {
    url, url_str, urls, urls_str, Url, parse::url;
    ip_addr, ip_addr_str, ip_addrs, ip_addrs_str, IpAddr, parse::ip_addr;
    socket_addr, socket_addr_str, socket_addrs, socket_addrs_str, SocketAddr, parse::socket_addr;
}
