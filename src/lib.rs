//! Typed command-line flags that can also be filled from the environment,
//! `.env` files and structured config files, with a record of where every
//! value came from.
//!
//! ```ignore
//! let mut set = FlagSet::new("myapp", ErrorHandling::ExitOnError);
//! let port = set.add("port", values::uint16(8080), "listen `port`");
//! let config = set.add("config", values::string("myapp.toml"), "config `file`");
//!
//! let env = EnvParser::new().prefix("MYAPP");
//! let file = FileParser::new(&config, Mux::standard()).ignore_missing();
//! set.parse(std::env::args().skip(1), &[&env, &file])?;
//!
//! println!("listening on {}", port.get());
//! ```
//!
//! That call binds `-port` and `-config` from the command line, then looks up
//! `MYAPP_PORT` for anything still unset, then reads whatever file `-config`
//! ended up naming.
//!
//! # Declaring flags
//!
//! [`FlagSet::add`] takes a name, a value box and a usage string, and hands
//! back a [`Handle`] to the value's storage. The handle is shared with the
//! set: whichever source resolves the flag, the caller sees the result
//! through the handle it already holds.
//!
//! The [`values`] module has boxes for the common types: every integer
//! width, floats, complex numbers, booleans, strings, durations, timestamps,
//! URLs, IP and socket addresses. Each comes in a scalar ([`Var`]) and a list
//! ([`List`]) form. Anything else implements [`Value`] and [`Getter`].
//!
//! List flags accumulate: `-peer a -peer b` yields `[a, b]`. The first
//! occurrence from any source discards the default list instead of
//! appending to it.
//!
//! # Layer precedence
//!
//! ```text
//! Declared defaults
//!        ↑ overridden by
//! Secondary passes      last pass in the chain has lowest priority
//!        ↑ overridden by
//! Command line          always wins
//! ```
//!
//! Every pass only fills the flags nobody has set yet. The command line
//! goes first, so it always wins; then each [`Pass`] runs in the order
//! given, so an earlier pass shadows a later one. A flag no layer mentions
//! keeps its default.
//!
//! Resolution is fail-fast. A bad command line stops before any pass runs,
//! and the first failing pass stops the chain; flags set before the failure
//! keep their values.
//!
//! # Provenance
//!
//! Every flag is tagged with the [`Source`] that last set it: `default`,
//! `flags`, or whatever tag the pass chose (`env: MYAPP_PORT`,
//! `file: myapp.toml`). [`FlagSet::print_values`] prints the lot:
//!
//! ```text
//! Current configuration of myapp:
//!   -config myapp.toml (default)
//!   -port 9000         (env: MYAPP_PORT)
//! ```
//!
//! # Secondary passes
//!
//! - [`EnvParser`] maps flag names to environment variables, optionally
//!   splitting values into list elements and falling back to a `.env` file.
//! - [`FileParser`] decodes a JSON, TOML or YAML file picked by extension
//!   through a [`Mux`] and looks flags up by dotted [`KeyPath`].
//!
//! Both take their file path as a [`PathSpec`]. Built from a string flag's
//! handle, the path is read when the pass runs, after the command line has
//! had its say.
//!
//! Any `Fn(&mut FlagSet) -> Result<(), FlagError>` is a pass too.
//!
//! # Command-line syntax
//!
//! The default tokenizer speaks the classic single-dash syntax (`-port 80`,
//! `-port=80`, bare `-verbose` for booleans). With the `clap` Cargo feature
//! (on by default), [`ClapTokenizer`] hands the command line to clap instead
//! and accepts `--port 80`. Install one with [`FlagSet::with_tokenizer`].
//!
//! # Error handling
//!
//! All fallible operations return [`FlagError`]. What [`FlagSet::parse`]
//! does with a failure depends on the set's [`ErrorHandling`]: return it,
//! print it and exit, or panic. A request for help is [`FlagError::Help`],
//! which exits with status 0 under
//! [`ExitOnError`](ErrorHandling::ExitOnError).
//!
//! Declaring a flag twice, or with a string default that does not parse, is
//! a programming error and panics.

pub mod error;
pub mod types;

mod args;
#[cfg(feature = "clap")]
mod cli;
pub mod env;
pub mod file;
pub mod parse;
mod report;
mod set;
pub mod value;
pub mod values;

#[cfg(test)]
mod fixtures;

pub use args::{Binding, DefaultTokenizer, Tokenizer, Tokens};
#[cfg(feature = "clap")]
pub use cli::ClapTokenizer;
pub use env::{EnvParser, default_mapper};
pub use error::{BoxError, FlagError};
pub use file::{FileParser, KeyPath, Mux};
pub use report::unquote_usage;
pub use set::{Flag, FlagSet, Pass};
pub use types::{ErrorHandling, PathSpec, Source};
pub use value::{Getter, Handle, List, Value, Var, setter_from};
