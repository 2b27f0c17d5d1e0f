//! Turning raw command-line arguments into flag bindings.
//!
//! The tokenizer only decides which flag each argument names and what text
//! goes with it. Storing values and recording provenance is left to
//! [`FlagSet::parse`](crate::FlagSet::parse), so every tokenizer gets the
//! same semantics for repeated and boolean flags.

use std::io::{self, Write};

use tracing::trace;

use crate::error::FlagError;
use crate::set::FlagSet;

/// A flag named on the command line together with its raw value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub name: String,
    pub value: String,
}

impl Binding {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Binding {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Output of a [`Tokenizer`], in command-line order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tokens {
    pub bindings: Vec<Binding>,
    pub positional: Vec<String>,
}

/// Splits the command line into [`Tokens`].
///
/// Implementations may consult `set` to learn which flags exist and which
/// are boolean; they must not bind a name the set does not declare.
pub trait Tokenizer {
    fn tokenize(&self, set: &FlagSet, args: Vec<String>) -> Result<Tokens, FlagError>;

    /// Usage text matching the syntax this tokenizer accepts.
    ///
    /// `None` falls back to the set's single-dash listing.
    fn write_usage(&self, _set: &FlagSet, _w: &mut dyn Write) -> Option<io::Result<()>> {
        None
    }
}

/// The classic single-dash syntax.
///
/// - `-name value`, `-name=value`, and `--name` spelled with two dashes alike.
/// - Boolean flags take no separate argument: `-v` means `-v=true`, and
///   `-v false` leaves `false` as a positional argument.
/// - Parsing stops at the first non-flag argument or after `--`; the rest is
///   positional.
/// - `-h` and `-help` request help unless the set declares them.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTokenizer;

impl Tokenizer for DefaultTokenizer {
    fn tokenize(&self, set: &FlagSet, args: Vec<String>) -> Result<Tokens, FlagError> {
        let mut tokens = Tokens::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            if arg.len() < 2 || !arg.starts_with('-') {
                tokens.positional.push(arg);
                break;
            }

            let mut body = &arg[1..];
            if let Some(rest) = body.strip_prefix('-') {
                if rest.is_empty() {
                    trace!("flag terminator");
                    break;
                }
                body = rest;
            }
            if body.is_empty() || body.starts_with('-') || body.starts_with('=') {
                return Err(FlagError::BadSyntax(arg));
            }

            let (name, inline) = match body.split_once('=') {
                Some((name, value)) => (name, Some(value.to_string())),
                None => (body, None),
            };

            let Some(flag) = set.lookup(name) else {
                if name == "help" || name == "h" {
                    return Err(FlagError::Help);
                }
                return Err(FlagError::UnknownFlag(name.to_string()));
            };

            let value = match inline {
                Some(value) => value,
                None if flag.is_bool_flag() => "true".to_string(),
                None => args
                    .next()
                    .ok_or_else(|| FlagError::MissingValue(name.to_string()))?,
            };
            trace!(flag = name, value = %value, "flag token");
            tokens.bindings.push(Binding::new(name, value));
        }

        tokens.positional.extend(args);
        Ok(tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::values;

    fn set() -> FlagSet {
        let mut set = FlagSet::default();
        set.add("n", values::int(0), "");
        set.add("v", values::boolean(false), "");
        set
    }

    fn tokenize(args: &[&str]) -> Result<Tokens, FlagError> {
        let args = args.iter().map(|s| s.to_string()).collect();
        DefaultTokenizer.tokenize(&set(), args)
    }

    #[test]
    fn separate_and_inline_values() {
        let tokens = tokenize(&["-n", "1", "--n=2", "-v"]).unwrap();
        assert_eq!(
            tokens.bindings,
            vec![
                Binding::new("n", "1"),
                Binding::new("n", "2"),
                Binding::new("v", "true"),
            ]
        );
        assert!(tokens.positional.is_empty());
    }

    #[test]
    fn bool_flag_does_not_consume_next_arg() {
        let tokens = tokenize(&["-v", "false"]).unwrap();
        assert_eq!(tokens.bindings, vec![Binding::new("v", "true")]);
        assert_eq!(tokens.positional, vec!["false"]);
    }

    #[test]
    fn stops_at_first_positional() {
        let tokens = tokenize(&["-n", "1", "file", "-v"]).unwrap();
        assert_eq!(tokens.bindings.len(), 1);
        assert_eq!(tokens.positional, vec!["file", "-v"]);
    }

    #[test]
    fn double_dash_terminates() {
        let tokens = tokenize(&["-v", "--", "-n", "1"]).unwrap();
        assert_eq!(tokens.bindings.len(), 1);
        assert_eq!(tokens.positional, vec!["-n", "1"]);
    }

    #[test]
    fn single_dash_is_positional() {
        let tokens = tokenize(&["-"]).unwrap();
        assert_eq!(tokens.positional, vec!["-"]);
    }

    #[test]
    fn malformed_names() {
        for arg in ["---n", "-=1", "--=1"] {
            assert!(
                matches!(tokenize(&[arg]), Err(FlagError::BadSyntax(a)) if a == arg),
                "{arg}"
            );
        }
    }

    #[test]
    fn missing_value() {
        assert!(matches!(tokenize(&["-n"]), Err(FlagError::MissingValue(n)) if n == "n"));
    }

    #[test]
    fn unknown_and_help() {
        assert!(matches!(tokenize(&["-x"]), Err(FlagError::UnknownFlag(n)) if n == "x"));
        assert!(matches!(tokenize(&["-h"]), Err(FlagError::Help)));
        assert!(matches!(tokenize(&["--help"]), Err(FlagError::Help)));
    }

    #[test]
    fn declared_help_flag_is_a_normal_flag() {
        let mut set = FlagSet::default();
        set.add("help", values::boolean(false), "");
        let tokens = DefaultTokenizer
            .tokenize(&set, vec!["-help".to_string()])
            .unwrap();
        assert_eq!(tokens.bindings, vec![Binding::new("help", "true")]);
    }
}
