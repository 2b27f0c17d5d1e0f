use std::path::PathBuf;

use thiserror::Error;

/// Error returned by value setters and parsers. Kept boxed so a flag's own
/// parse error (`ParseIntError`, `url::ParseError`, ...) survives untouched as
/// the [`source`](std::error::Error::source) of [`FlagError::InvalidValue`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum FlagError {
    #[error("flag: help requested")]
    Help,

    #[error("flag provided but not defined: -{0}")]
    UnknownFlag(String),

    #[error("bad flag syntax: {0}")]
    BadSyntax(String),

    #[error("flag needs an argument: -{0}")]
    MissingValue(String),

    #[error("invalid value {value:?} for flag -{flag}: {source}")]
    InvalidValue {
        flag: String,
        value: String,
        source: BoxError,
    },

    #[error("no such flag -{0}")]
    NoSuchFlag(String),

    #[error("flag set {0:?} has already been parsed")]
    AlreadyParsed(String),

    #[error("{0}")]
    Tokenizer(String),

    #[error("env: unable to parse env file {}: {source}", .path.display())]
    EnvFile {
        path: PathBuf,
        source: dotenvy::Error,
    },

    #[error("file: failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("file: unsupported extension {ext:?}, must be one of: {}", .available.join(", "))]
    UnsupportedExtension { ext: String, available: Vec<String> },

    #[error("file: unable to decode {}: {source}", .path.display())]
    Decode { path: PathBuf, source: BoxError },

    #[error("file: invalid value for path {key:?}: {reason}")]
    InvalidPathValue { key: String, reason: String },

    #[error(transparent)]
    Other(BoxError),
}

impl FlagError {
    /// Wrap an arbitrary error raised by a caller-supplied pass.
    pub fn other<E: Into<BoxError>>(err: E) -> Self {
        FlagError::Other(err.into())
    }

    /// Exit status used by [`ErrorHandling::ExitOnError`](crate::ErrorHandling::ExitOnError).
    pub fn exit_code(&self) -> i32 {
        match self {
            FlagError::Help => 0,
            _ => 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn unknown_flag_formats_correctly() {
        let err = FlagError::UnknownFlag("notaflag".into());
        assert_eq!(err.to_string(), "flag provided but not defined: -notaflag");
    }

    #[test]
    fn invalid_value_keeps_setter_error_as_source() {
        let parse_err = "x".parse::<i32>().unwrap_err();
        let err = FlagError::InvalidValue {
            flag: "port".into(),
            value: "x".into(),
            source: Box::new(parse_err.clone()),
        };
        assert!(err.to_string().contains("\"x\""));
        assert!(err.to_string().contains("-port"));
        let source = err.source().unwrap();
        assert_eq!(
            source.downcast_ref::<std::num::ParseIntError>(),
            Some(&parse_err)
        );
    }

    #[test]
    fn unsupported_extension_lists_available() {
        let err = FlagError::UnsupportedExtension {
            ext: ".ini".into(),
            available: vec![".json".into(), ".toml".into()],
        };
        let msg = err.to_string();
        assert!(msg.contains(".ini"));
        assert!(msg.contains(".json, .toml"));
    }

    #[test]
    fn exit_codes() {
        assert_eq!(FlagError::Help.exit_code(), 0);
        assert_eq!(FlagError::UnknownFlag("x".into()).exit_code(), 2);
    }
}
