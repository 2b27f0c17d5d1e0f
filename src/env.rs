//! Environment variables as a secondary source.
//!
//! Each flag still unset when the pass runs is mapped to a variable name
//! (`PREFIX_NAME` by default, uppercased with every character outside
//! `[A-Za-z0-9_]` replaced by `_`). The process environment is consulted
//! first, then the optional `.env` file.
//!
//! ```ignore
//! let mut set = FlagSet::new("app", ErrorHandling::ExitOnError);
//! let config = set.add("config", values::string(".env"), "`path` to a .env file");
//! let peers = set.add("peer", values::strings::<&str>(&[]), "peer address");
//! let env = EnvParser::new()
//!     .prefix("APP")
//!     .mapper(default_mapper(Some(",")))
//!     .dotenv(&config, true);
//! set.parse(std::env::args().skip(1), &[&env])?;
//! ```

use std::collections::HashMap;
use std::path::Path;

use tracing::debug;

use crate::error::FlagError;
use crate::set::{FlagSet, Pass};
use crate::types::{PathSpec, Source};

/// Maps a (prefixed) flag name to a variable name and, for list flags, the
/// separator to split its value on.
pub type Mapper = Box<dyn Fn(&str) -> (String, Option<String>)>;

/// Looks a variable up, returning `None` when it is not defined.
pub type Lookup = Box<dyn Fn(&str) -> Option<String>>;

/// The stock mapper. With a `separator`, every value is split on it and each
/// piece is set in turn, so list flags receive one element per piece.
pub fn default_mapper(separator: Option<&str>) -> impl Fn(&str) -> (String, Option<String>) + use<> {
    let separator = separator.map(str::to_string);
    move |name: &str| (env_name(name), separator.clone())
}

fn env_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect()
}

struct DotEnv {
    path: PathSpec,
    optional: bool,
}

/// A [`Pass`] reading flags from environment variables.
pub struct EnvParser {
    prefix: String,
    mapper: Mapper,
    lookup: Lookup,
    dotenv: Option<DotEnv>,
}

impl Default for EnvParser {
    fn default() -> Self {
        EnvParser {
            prefix: String::new(),
            mapper: Box::new(default_mapper(None)),
            lookup: Box::new(|name: &str| std::env::var(name).ok()),
            dotenv: None,
        }
    }
}

impl EnvParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepend `prefix` and an underscore to every flag name before mapping.
    pub fn prefix(mut self, prefix: &str) -> Self {
        self.prefix = format!("{prefix}_");
        self
    }

    pub fn mapper<F>(mut self, mapper: F) -> Self
    where
        F: Fn(&str) -> (String, Option<String>) + 'static,
    {
        self.mapper = Box::new(mapper);
        self
    }

    /// Replace the process environment, mostly for tests.
    pub fn lookup<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + 'static,
    {
        self.lookup = Box::new(lookup);
        self
    }

    /// Also read variables from a `.env` file. Real environment variables win
    /// over the file.
    ///
    /// The path is resolved when the pass runs, so it may come from a flag
    /// set earlier in the chain. A missing file is an error unless `optional`.
    pub fn dotenv(mut self, path: impl Into<PathSpec>, optional: bool) -> Self {
        self.dotenv = Some(DotEnv {
            path: path.into(),
            optional,
        });
        self
    }

    fn apply_var(
        &self,
        set: &mut FlagSet,
        flag: &str,
        file: Option<&(String, HashMap<String, String>)>,
    ) -> Result<(), FlagError> {
        let (var, separator) = (self.mapper)(&format!("{}{}", self.prefix, flag));

        let (raw, source) = match (self.lookup)(&var) {
            Some(raw) => (raw, Source::from(format!("env: {var}"))),
            None => {
                let Some((path, vars)) = file else {
                    return Ok(());
                };
                let Some(raw) = vars.get(&var) else {
                    return Ok(());
                };
                (raw.clone(), Source::from(format!("envfile[{path}]: {var}")))
            }
        };

        match separator.as_deref() {
            Some(sep) if !sep.is_empty() => {
                for piece in raw.split(sep) {
                    set.set(source.clone(), flag, piece)?;
                }
            }
            _ => set.set(source, flag, &raw)?,
        }
        Ok(())
    }
}

impl Pass for EnvParser {
    fn apply(&self, set: &mut FlagSet) -> Result<(), FlagError> {
        let file = match &self.dotenv {
            Some(dotenv) => {
                let path = dotenv.path.resolve();
                read_dotenv(&path, dotenv.optional)?
                    .map(|vars| (path.display().to_string(), vars))
            }
            None => None,
        };
        debug!(prefix = %self.prefix, dotenv = file.is_some(), "reading environment");

        set.visit_remaining_mut(|set, flag| self.apply_var(set, flag, file.as_ref()))
    }
}

fn read_dotenv(path: &Path, optional: bool) -> Result<Option<HashMap<String, String>>, FlagError> {
    let env_file_error = |source: dotenvy::Error| FlagError::EnvFile {
        path: path.to_path_buf(),
        source,
    };

    let iter = match dotenvy::from_path_iter(path) {
        Ok(iter) => iter,
        Err(err) if optional && err.not_found() => {
            debug!(path = %path.display(), "optional .env file not found");
            return Ok(None);
        }
        Err(err) => return Err(env_file_error(err)),
    };

    let mut vars = HashMap::new();
    for item in iter {
        let (key, value) = item.map_err(env_file_error)?;
        vars.insert(key, value);
    }
    Ok(Some(vars))
}
