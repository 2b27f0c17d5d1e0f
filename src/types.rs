use std::borrow::Cow;
use std::fmt;
use std::path::PathBuf;

use crate::value::Handle;

/// Identifies who set the value of a flag.
///
/// The two standard tags are [`Source::DEFAULT`] and [`Source::FLAGS`]; every
/// secondary pass picks its own, such as `env: APP_PORT` or
/// `file: /etc/app.json`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Source(Cow<'static, str>);

impl Source {
    /// The flag still holds its declared default.
    pub const DEFAULT: Source = Source(Cow::Borrowed("default"));
    /// The flag was given on the command line.
    pub const FLAGS: Source = Source(Cow::Borrowed("flags"));

    pub fn new(tag: impl Into<Cow<'static, str>>) -> Self {
        Source(tag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for Source {
    fn from(tag: &'static str) -> Self {
        Source(Cow::Borrowed(tag))
    }
}

impl From<String> for Source {
    fn from(tag: String) -> Self {
        Source(Cow::Owned(tag))
    }
}

/// How [`FlagSet::parse`](crate::FlagSet::parse) behaves when resolution fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorHandling {
    /// Return the error to the caller.
    #[default]
    ContinueOnError,
    /// Exit the process: status 0 when help was requested, 2 otherwise.
    ExitOnError,
    /// Panic with the error message.
    PanicOnError,
}

/// Where a secondary pass finds its file.
///
/// `Flag` reads the path just in time from a string flag, so an earlier link
/// of the chain (typically the command line) can choose the file.
#[derive(Debug, Clone)]
pub enum PathSpec {
    Static(PathBuf),
    Flag(Handle<String>),
}

impl PathSpec {
    /// The path as of now.
    pub fn resolve(&self) -> PathBuf {
        match self {
            PathSpec::Static(path) => path.clone(),
            PathSpec::Flag(handle) => PathBuf::from(handle.get()),
        }
    }
}

impl From<&str> for PathSpec {
    fn from(path: &str) -> Self {
        PathSpec::Static(PathBuf::from(path))
    }
}

impl From<String> for PathSpec {
    fn from(path: String) -> Self {
        PathSpec::Static(PathBuf::from(path))
    }
}

impl From<PathBuf> for PathSpec {
    fn from(path: PathBuf) -> Self {
        PathSpec::Static(path)
    }
}

impl From<&std::path::Path> for PathSpec {
    fn from(path: &std::path::Path) -> Self {
        PathSpec::Static(path.to_path_buf())
    }
}

impl From<Handle<String>> for PathSpec {
    fn from(handle: Handle<String>) -> Self {
        PathSpec::Flag(handle)
    }
}

impl From<&Handle<String>> for PathSpec {
    fn from(handle: &Handle<String>) -> Self {
        PathSpec::Flag(handle.clone())
    }
}
