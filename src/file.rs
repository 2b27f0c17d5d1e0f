//! Structured config files as a secondary source.
//!
//! The file is decoded into a generic tree by the decoder registered for its
//! extension, then every flag still unset is looked up by key path
//! (`db.pool_size` walks into the `db` table). Scalars are stringified and
//! fed to the flag's setter; arrays are flattened and fed one element at a
//! time, so list flags receive every element.
//!
//! Files are read from the local filesystem unless another source is given
//! with [`FileParser::reader`].
//!
//! ```ignore
//! let config = set.add("config", values::string("app.toml"), "config `file`");
//! let file = FileParser::new(&config, Mux::standard()).ignore_missing();
//! set.parse(std::env::args().skip(1), &[&file])?;
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::io;
use std::path::Path;

use serde_json::Value as Tree;
use tracing::debug;

use crate::error::{BoxError, FlagError};
use crate::set::{FlagSet, Pass};
use crate::types::{PathSpec, Source};

/// Separates the segments of a [`KeyPath`].
pub const KEY_PATH_SEPARATOR: char = '.';

/// A dot-separated path into the decoded file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyPath(String);

impl KeyPath {
    pub fn new(path: impl Into<String>) -> Self {
        KeyPath(path.into())
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split(KEY_PATH_SEPARATOR)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for KeyPath {
    fn from(path: &str) -> Self {
        KeyPath(path.to_string())
    }
}

impl From<String> for KeyPath {
    fn from(path: String) -> Self {
        KeyPath(path)
    }
}

/// Turns raw file contents into a tree.
pub type Decoder = fn(&[u8]) -> Result<Tree, BoxError>;

pub fn decode_json(data: &[u8]) -> Result<Tree, BoxError> {
    Ok(serde_json::from_slice(data)?)
}

pub fn decode_toml(data: &[u8]) -> Result<Tree, BoxError> {
    let text = std::str::from_utf8(data)?;
    Ok(toml::from_str(text)?)
}

pub fn decode_yaml(data: &[u8]) -> Result<Tree, BoxError> {
    Ok(serde_yaml::from_slice(data)?)
}

/// Picks a [`Decoder`] by file extension, dot included (`.json`).
#[derive(Debug, Clone, Default)]
pub struct Mux {
    decoders: BTreeMap<String, Decoder>,
}

impl Mux {
    pub fn new() -> Self {
        Self::default()
    }

    /// `.json`, `.toml`, `.yaml` and `.yml`.
    pub fn standard() -> Self {
        Mux::new()
            .with(".json", decode_json)
            .with(".toml", decode_toml)
            .with(".yaml", decode_yaml)
            .with(".yml", decode_yaml)
    }

    pub fn with(mut self, ext: &str, decoder: Decoder) -> Self {
        self.decoders.insert(ext.to_string(), decoder);
        self
    }

    pub fn get(&self, ext: &str) -> Option<Decoder> {
        self.decoders.get(ext).copied()
    }

    pub fn extensions(&self) -> Vec<String> {
        self.decoders.keys().cloned().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.decoders.is_empty()
    }
}

/// Maps a flag name to the key path holding its value.
pub type Mapper = Box<dyn Fn(&str) -> KeyPath>;

/// Loads the raw bytes of the file at a path.
pub type Reader = Box<dyn Fn(&Path) -> io::Result<Vec<u8>>>;

/// A [`Pass`] reading flags from a JSON, TOML or YAML file.
pub struct FileParser {
    path: PathSpec,
    mux: Mux,
    mapper: Mapper,
    reader: Reader,
    ignore_missing: bool,
}

impl FileParser {
    /// # Panics
    ///
    /// Panics if `mux` has no decoders.
    pub fn new(path: impl Into<PathSpec>, mux: Mux) -> Self {
        if mux.is_empty() {
            panic!("file: mux cannot be empty");
        }
        FileParser {
            path: path.into(),
            mux,
            mapper: Box::new(|name: &str| KeyPath::from(name)),
            reader: Box::new(|path: &Path| std::fs::read(path)),
            ignore_missing: false,
        }
    }

    /// Read files through `reader` instead of the local filesystem.
    ///
    /// An [`io::ErrorKind::NotFound`] error counts as a missing file.
    pub fn reader<F>(mut self, reader: F) -> Self
    where
        F: Fn(&Path) -> io::Result<Vec<u8>> + 'static,
    {
        self.reader = Box::new(reader);
        self
    }

    pub fn mapper<F>(mut self, mapper: F) -> Self
    where
        F: Fn(&str) -> KeyPath + 'static,
    {
        self.mapper = Box::new(mapper);
        self
    }

    /// Treat a file that does not exist as empty.
    pub fn ignore_missing(mut self) -> Self {
        self.ignore_missing = true;
        self
    }

    fn decode(&self, path: &Path) -> Result<Option<Tree>, FlagError> {
        let data = match (self.reader)(path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound && self.ignore_missing => {
                debug!(path = %path.display(), "config file not found, skipping");
                return Ok(None);
            }
            Err(e) => {
                return Err(FlagError::Io {
                    path: path.to_path_buf(),
                    source: e,
                });
            }
        };

        let ext = path
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default();
        let decoder = self
            .mux
            .get(&ext)
            .ok_or_else(|| FlagError::UnsupportedExtension {
                ext,
                available: self.mux.extensions(),
            })?;

        let decode_error = |source: BoxError| FlagError::Decode {
            path: path.to_path_buf(),
            source,
        };
        let tree = decoder(&data).map_err(decode_error)?;
        match tree {
            Tree::Object(_) => Ok(Some(tree)),
            // An empty YAML document decodes to null.
            Tree::Null => Ok(Some(Tree::Object(Default::default()))),
            _ => Err(decode_error("top-level value is not a table".into())),
        }
    }
}

impl Pass for FileParser {
    fn apply(&self, set: &mut FlagSet) -> Result<(), FlagError> {
        let path = self.path.resolve();
        let Some(tree) = self.decode(&path)? else {
            return Ok(());
        };
        debug!(path = %path.display(), "reading config file");

        let source = Source::from(format!("file: {}", path.display()));
        set.visit_remaining_mut(|set, flag| {
            let key = (self.mapper)(flag);
            let Some(node) = find(&tree, &key) else {
                return Ok(());
            };

            let mut raw = Vec::new();
            stringify(node, &mut raw).map_err(|reason| FlagError::InvalidPathValue {
                key: key.to_string(),
                reason,
            })?;
            for value in raw {
                set.set(source.clone(), flag, &value)?;
            }
            Ok(())
        })
    }
}

/// The node at `key`, or `None` if any segment is missing or null.
fn find<'a>(root: &'a Tree, key: &KeyPath) -> Option<&'a Tree> {
    let mut node = root;
    for segment in key.segments() {
        node = node.as_object()?.get(segment)?;
    }
    (!node.is_null()).then_some(node)
}

fn stringify(node: &Tree, out: &mut Vec<String>) -> Result<(), String> {
    match node {
        Tree::Null => {}
        Tree::Bool(b) => out.push(b.to_string()),
        Tree::Number(n) => {
            if let Some(i) = n.as_i64() {
                out.push(i.to_string());
            } else if let Some(u) = n.as_u64() {
                out.push(u.to_string());
            } else if let Some(f) = n.as_f64() {
                out.push(f.to_string());
            }
        }
        Tree::String(s) => out.push(s.clone()),
        Tree::Array(items) => {
            for item in items {
                stringify(item, out)?;
            }
        }
        Tree::Object(_) => return Err("unsupported type \"object\"".to_string()),
    }
    Ok(())
}
