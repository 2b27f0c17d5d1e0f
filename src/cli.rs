//! Clap adapter for the primary command-line pass.
//!
//! Compiled only when the `clap` Cargo feature is enabled (on by default).
//! [`ClapTokenizer`] builds a [`clap::Command`] from the declared flags on
//! every parse, so the command line follows GNU conventions (`--port 80`,
//! `--port=80`, `--verbose`) and gets clap's error messages. The set's usage
//! message becomes clap's rendered help, listing `--name` options, while
//! values still flow through each flag's own setter.
//!
//! ```ignore
//! let mut set = FlagSet::new("app", ErrorHandling::ExitOnError)
//!     .with_tokenizer(ClapTokenizer::new());
//! ```

use std::io::{self, Write};

use clap::error::ErrorKind;
use clap::{Arg, ArgAction, Command};
use tracing::trace;

use crate::args::{Binding, Tokenizer, Tokens};
use crate::error::FlagError;
use crate::set::FlagSet;

const POSITIONAL: &str = "flagstack::positional";

/// A [`Tokenizer`] delegating to clap.
///
/// Every flag becomes a repeatable `--name` option. Boolean flags take no
/// separate argument and accept an optional `--name=value`.
#[derive(Debug, Clone, Default)]
pub struct ClapTokenizer {
    about: Option<String>,
}

impl ClapTokenizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Text shown at the top of clap's help output.
    pub fn about(mut self, about: impl Into<String>) -> Self {
        self.about = Some(about.into());
        self
    }

    /// The clap command mirroring `set`'s flags.
    pub fn command(&self, set: &FlagSet) -> Command {
        let name = if set.name().is_empty() {
            "app".to_string()
        } else {
            set.name().to_string()
        };

        let mut cmd = Command::new(name)
            .no_binary_name(true)
            .disable_version_flag(true);
        if let Some(about) = &self.about {
            cmd = cmd.about(about.clone());
        }
        if set.lookup("help").is_some() {
            cmd = cmd.disable_help_flag(true);
        }

        for flag in set.flags() {
            let mut arg = Arg::new(flag.name().to_string())
                .long(flag.name().to_string())
                .help(flag.usage().to_string())
                .action(ArgAction::Append);
            arg = if flag.is_bool_flag() {
                arg.num_args(0..=1)
                    .require_equals(true)
                    .default_missing_value("true")
            } else {
                arg.num_args(1).allow_hyphen_values(true)
            };
            cmd = cmd.arg(arg);
        }

        cmd.arg(
            Arg::new(POSITIONAL)
                .num_args(0..)
                .action(ArgAction::Append)
                .trailing_var_arg(true),
        )
    }
}

impl Tokenizer for ClapTokenizer {
    fn tokenize(&self, set: &FlagSet, args: Vec<String>) -> Result<Tokens, FlagError> {
        let matches = self
            .command(set)
            .try_get_matches_from(args)
            .map_err(|e| match e.kind() {
                ErrorKind::DisplayHelp => FlagError::Help,
                _ => FlagError::Tokenizer(e.to_string().trim_end().to_string()),
            })?;

        let mut tokens = Tokens::default();
        for flag in set.flags() {
            let Some(raw) = matches.get_raw(flag.name()) else {
                continue;
            };
            for value in raw {
                let value = value.to_string_lossy().into_owned();
                trace!(flag = flag.name(), value = %value, "clap binding");
                tokens.bindings.push(Binding::new(flag.name(), value));
            }
        }
        if let Some(raw) = matches.get_raw(POSITIONAL) {
            tokens
                .positional
                .extend(raw.map(|v| v.to_string_lossy().into_owned()));
        }
        Ok(tokens)
    }

    fn write_usage(&self, set: &FlagSet, w: &mut dyn Write) -> Option<io::Result<()>> {
        let help = self.command(set).render_help();
        Some(write!(w, "{help}"))
    }
}
