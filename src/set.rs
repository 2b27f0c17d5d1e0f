//! The flag registry and the resolution pipeline.
//!
//! [`FlagSet::parse`] runs in a fixed order:
//!
//! 1. The primary tokenizer binds flags given on the command line. A failure
//!    here stops everything; no secondary pass runs.
//! 2. Every flag is tagged [`Source::DEFAULT`], then every flag bound on the
//!    command line is retagged [`Source::FLAGS`].
//! 3. Each secondary [`Pass`] runs in the order given. A pass only fills
//!    flags nobody has set yet (see [`FlagSet::visit_remaining_mut`]), so
//!    the order of the chain is the order of precedence. The first failing
//!    pass stops the chain and its error is returned as is.
//!
//! A `FlagSet` is built and resolved on a single thread. It is `!Send` because
//! the handles it gives out share storage with it.

use std::collections::{BTreeMap, BTreeSet};
use std::io::{self, Write};

use tracing::{debug, trace};

use crate::args::{DefaultTokenizer, Tokenizer};
use crate::error::FlagError;
use crate::report;
use crate::types::{ErrorHandling, Source};
use crate::value::{Getter, Handle, Value};

/// A declared flag.
pub struct Flag {
    name: String,
    usage: String,
    default_value: String,
    value: Box<dyn Value>,
}

impl Flag {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn usage(&self) -> &str {
        &self.usage
    }

    /// The default as rendered at declaration time.
    pub fn default_value(&self) -> &str {
        &self.default_value
    }

    /// The current value, rendered.
    pub fn value(&self) -> String {
        self.value.render()
    }

    pub fn is_bool_flag(&self) -> bool {
        self.value.is_bool_flag()
    }
}

impl std::fmt::Debug for Flag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Flag")
            .field("name", &self.name)
            .field("usage", &self.usage)
            .field("default_value", &self.default_value)
            .field("value", &self.value())
            .finish()
    }
}

/// A secondary source of flag values.
///
/// A pass must only set flags that are still unset; the usual way is to walk
/// them with [`FlagSet::visit_remaining_mut`] and call [`FlagSet::set`] with
/// the pass's own [`Source`] tag. Closures of the right shape are passes too.
pub trait Pass {
    fn apply(&self, set: &mut FlagSet) -> Result<(), FlagError>;
}

impl<F> Pass for F
where
    F: Fn(&mut FlagSet) -> Result<(), FlagError>,
{
    fn apply(&self, set: &mut FlagSet) -> Result<(), FlagError> {
        self(set)
    }
}

type UsageFn = Box<dyn Fn(&FlagSet, &mut dyn Write) -> io::Result<()>>;

/// An ordered collection of typed flags plus where each value came from.
///
/// Flag names are unique within a set; declaring a name twice panics.
pub struct FlagSet {
    name: String,
    error_handling: ErrorHandling,
    flags: BTreeMap<String, Flag>,
    actual: BTreeSet<String>,
    provenance: BTreeMap<String, Source>,
    args: Vec<String>,
    parsed: bool,
    tokenizer: Box<dyn Tokenizer>,
    output: Option<Box<dyn Write>>,
    usage: Option<UsageFn>,
}

impl Default for FlagSet {
    fn default() -> Self {
        FlagSet::new("", ErrorHandling::default())
    }
}

impl FlagSet {
    /// An empty set. A non-empty `name` shows up in usage and report headers.
    pub fn new(name: &str, error_handling: ErrorHandling) -> Self {
        FlagSet {
            name: name.to_string(),
            error_handling,
            flags: BTreeMap::new(),
            actual: BTreeSet::new(),
            provenance: BTreeMap::new(),
            args: Vec::new(),
            parsed: false,
            tokenizer: Box::new(DefaultTokenizer),
            output: None,
            usage: None,
        }
    }

    /// Reset the name and error-handling policy.
    pub fn init(&mut self, name: &str, error_handling: ErrorHandling) {
        self.name = name.to_string();
        self.error_handling = error_handling;
    }

    /// Replace the primary command-line tokenizer.
    pub fn with_tokenizer(mut self, tokenizer: impl Tokenizer + 'static) -> Self {
        self.tokenizer = Box::new(tokenizer);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn error_handling(&self) -> ErrorHandling {
        self.error_handling
    }

    /// Declare a flag and return a handle to its storage.
    ///
    /// # Panics
    ///
    /// Panics if `name` is already declared, starts with `-` or contains `=`.
    pub fn add<G>(&mut self, name: &str, value: G, usage: &str) -> Handle<G::Target>
    where
        G: Getter + 'static,
    {
        if name.starts_with('-') {
            panic!("flag {name:?} begins with -");
        }
        if name.contains('=') {
            panic!("flag {name:?} contains =");
        }
        if self.flags.contains_key(name) {
            if self.name.is_empty() {
                panic!("flag redefined: {name}");
            }
            panic!("{} flag redefined: {name}", self.name);
        }

        let handle = value.handle();
        let flag = Flag {
            name: name.to_string(),
            usage: usage.to_string(),
            default_value: value.render(),
            value: Box::new(value),
        };
        self.flags.insert(name.to_string(), flag);
        handle
    }

    pub fn lookup(&self, name: &str) -> Option<&Flag> {
        self.flags.get(name)
    }

    /// All declared flags in lexicographical order.
    pub fn flags(&self) -> impl Iterator<Item = &Flag> {
        self.flags.values()
    }

    /// Set the named flag from `raw`, recording `source` as its provenance.
    ///
    /// On failure the flag's value and provenance are left alone; the
    /// setter's own error is the [`source`](std::error::Error::source) of the
    /// returned [`FlagError::InvalidValue`].
    pub fn set(&mut self, source: impl Into<Source>, name: &str, raw: &str) -> Result<(), FlagError> {
        let source = source.into();
        self.set_value(name, raw)?;
        debug!(flag = name, source = %source, "flag set");
        self.provenance.insert(name.to_string(), source);
        Ok(())
    }

    fn set_value(&mut self, name: &str, raw: &str) -> Result<(), FlagError> {
        let flag = self
            .flags
            .get_mut(name)
            .ok_or_else(|| FlagError::NoSuchFlag(name.to_string()))?;
        flag.value
            .set(raw)
            .map_err(|source| FlagError::InvalidValue {
                flag: name.to_string(),
                value: raw.to_string(),
                source,
            })?;
        self.actual.insert(name.to_string());
        Ok(())
    }

    /// Where the named flag's value came from, once parsed.
    pub fn provenance(&self, name: &str) -> Option<&Source> {
        self.provenance.get(name)
    }

    pub fn provenance_map(&self) -> &BTreeMap<String, Source> {
        &self.provenance
    }

    /// Visit every flag in lexicographical order, stopping at the first error.
    pub fn visit_all<E>(&self, mut f: impl FnMut(&Flag) -> Result<(), E>) -> Result<(), E> {
        for flag in self.flags.values() {
            f(flag)?;
        }
        Ok(())
    }

    /// Visit the flags that have been set, stopping at the first error.
    pub fn visit<E>(&self, mut f: impl FnMut(&Flag) -> Result<(), E>) -> Result<(), E> {
        for flag in self.flags.values() {
            if self.actual.contains(&flag.name) {
                f(flag)?;
            }
        }
        Ok(())
    }

    /// Visit the flags that have not been set yet, stopping at the first error.
    pub fn visit_remaining<E>(&self, mut f: impl FnMut(&Flag) -> Result<(), E>) -> Result<(), E> {
        for flag in self.flags.values() {
            if !self.actual.contains(&flag.name) {
                f(flag)?;
            }
        }
        Ok(())
    }

    /// Like [`visit_remaining`](Self::visit_remaining), but the callback gets
    /// the set itself so it can call [`set`](Self::set).
    ///
    /// The unset flags are collected when the call starts, so a flag the
    /// callback sets along the way is still visited if it was unset then.
    pub fn visit_remaining_mut<E>(
        &mut self,
        mut f: impl FnMut(&mut FlagSet, &str) -> Result<(), E>,
    ) -> Result<(), E> {
        for name in self.remaining() {
            f(self, &name)?;
        }
        Ok(())
    }

    /// Names of the flags not set yet, in lexicographical order.
    pub fn remaining(&self) -> Vec<String> {
        self.flags
            .keys()
            .filter(|name| !self.actual.contains(*name))
            .cloned()
            .collect()
    }

    /// Number of flags that have been set.
    pub fn n_flag(&self) -> usize {
        self.actual.len()
    }

    /// The i'th positional argument left after parsing, or `""`.
    pub fn arg(&self, i: usize) -> &str {
        self.args.get(i).map(String::as_str).unwrap_or("")
    }

    pub fn n_arg(&self) -> usize {
        self.args.len()
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn parsed(&self) -> bool {
        self.parsed
    }

    /// Resolve every flag: `args` first, then each pass in order.
    ///
    /// `args` should not include the program name. Failures are handled per
    /// the set's [`ErrorHandling`]; under
    /// [`ContinueOnError`](ErrorHandling::ContinueOnError) the error is
    /// returned unchanged, so [`FlagError::Help`] can be told apart from
    /// genuine failures. A bad command line is also printed to the
    /// [`output`](Self::output) with the usage message, whatever the policy.
    ///
    /// A set resolves once. Calling `parse` again fails with
    /// [`FlagError::AlreadyParsed`] and changes nothing.
    pub fn parse<I, S>(&mut self, args: I, passes: &[&dyn Pass]) -> Result<(), FlagError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if self.parsed {
            let err = FlagError::AlreadyParsed(self.name.clone());
            return self.fail(err, false);
        }
        self.parsed = true;

        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        if let Err(err) = self.parse_args(args) {
            return self.fail(err, true);
        }

        for (i, pass) in passes.iter().enumerate() {
            debug!(pass = i, remaining = self.remaining().len(), "running secondary pass");
            if let Err(err) = pass.apply(self) {
                debug!(pass = i, error = %err, "secondary pass failed");
                return self.fail(err, false);
            }
        }
        Ok(())
    }

    fn parse_args(&mut self, args: Vec<String>) -> Result<(), FlagError> {
        let tokens = self.tokenizer.tokenize(self, args)?;
        for binding in &tokens.bindings {
            trace!(flag = %binding.name, value = %binding.value, "binding command-line flag");
            self.set_value(&binding.name, &binding.value)?;
        }
        self.args = tokens.positional;

        for name in self.flags.keys() {
            self.provenance.insert(name.clone(), Source::DEFAULT);
        }
        for name in &self.actual {
            self.provenance.insert(name.clone(), Source::FLAGS);
        }
        debug!(
            set = %self.name,
            bound = self.actual.len(),
            positional = self.args.len(),
            "command line parsed"
        );
        Ok(())
    }

    /// Apply the error policy. Command-line failures (`show_usage`) print the
    /// error and the usage under every policy; other failures print only
    /// before exiting.
    fn fail(&mut self, err: FlagError, show_usage: bool) -> Result<(), FlagError> {
        if show_usage || self.error_handling == ErrorHandling::ExitOnError {
            self.report_failure(&err, show_usage);
        }
        match self.error_handling {
            ErrorHandling::ContinueOnError => Err(err),
            ErrorHandling::ExitOnError => std::process::exit(err.exit_code()),
            ErrorHandling::PanicOnError => panic!("{err}"),
        }
    }

    fn report_failure(&mut self, err: &FlagError, show_usage: bool) {
        let mut buf = Vec::new();
        if !matches!(err, FlagError::Help) {
            let _ = writeln!(buf, "{err}");
        }
        if show_usage {
            let _ = self.write_usage(&mut buf);
        }
        let _ = self.output().write_all(&buf);
    }

    /// Where usage and reports go. Standard error unless replaced.
    pub fn set_output(&mut self, output: impl Write + 'static) {
        self.output = Some(Box::new(output));
    }

    pub fn output(&mut self) -> &mut dyn Write {
        let output = self
            .output
            .get_or_insert_with(|| Box::new(io::stderr()) as Box<dyn Write>);
        &mut **output
    }

    /// Replace the usage message printed by [`usage`](Self::usage).
    pub fn set_usage<F>(&mut self, usage: F)
    where
        F: Fn(&FlagSet, &mut dyn Write) -> io::Result<()> + 'static,
    {
        self.usage = Some(Box::new(usage));
    }

    /// Write the usage message into `w`.
    ///
    /// A message installed with [`set_usage`](Self::set_usage) wins, then the
    /// tokenizer's own, then the single-dash listing.
    pub fn write_usage(&self, w: &mut dyn Write) -> io::Result<()> {
        if let Some(usage) = &self.usage {
            return usage(self, w);
        }
        match self.tokenizer.write_usage(self, w) {
            Some(result) => result,
            None => report::default_usage(self, w),
        }
    }

    /// Print the usage message to the output.
    pub fn usage(&mut self) {
        let mut buf = Vec::new();
        let _ = self.write_usage(&mut buf);
        let _ = self.output().write_all(&buf);
    }

    /// Write one usage entry per flag into `w`.
    pub fn write_defaults(&self, w: &mut dyn Write) -> io::Result<()> {
        report::write_defaults(self, w)
    }

    pub fn print_defaults(&mut self) {
        let mut buf = Vec::new();
        let _ = self.write_defaults(&mut buf);
        let _ = self.output().write_all(&buf);
    }

    /// Write every flag's current value and its source into `w`.
    pub fn write_values(&self, w: &mut dyn Write) -> io::Result<()> {
        report::write_values(self, w)
    }

    /// Print the provenance report to the output. Meant for troubleshooting
    /// how values propagated through the chain.
    pub fn print_values(&mut self) {
        let mut buf = Vec::new();
        let _ = self.write_values(&mut buf);
        let _ = self.output().write_all(&buf);
    }
}
