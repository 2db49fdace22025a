use std::path::PathBuf;
use thiserror::Error;

use crate::binding::PropertyType;

/// Errors produced while loading and binding property files.
///
/// Every variant aborts the current resolution pass. Slots written before the
/// failure keep their values.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("cannot load properties file '{0}': file not found")]
    FileNotFound(String),

    #[error("failed to read properties file '{file}': {source}")]
    ReadError {
        file: String,
        source: std::io::Error,
    },

    #[error("failed to parse properties file '{file}' at line {line}: {message}")]
    Parse {
        file: String,
        line: usize,
        message: String,
    },

    #[error(
        "configuration is insufficient: file '{file}' is missing a required property named '{key}'"
    )]
    InsufficientConfiguration { file: String, key: String },

    #[error("property '{key}' in '{file}' has value '{raw}' which is not a valid {target}")]
    Conversion {
        file: String,
        key: String,
        raw: String,
        target: PropertyType,
    },

    #[error("cannot write property '{key}' into its slot: {reason}")]
    SlotWrite { key: String, reason: String },

    #[error("failed to parse binding schema: {0}")]
    Schema(#[source] toml::de::Error),

    #[error("failed to read binding schema '{path}': {source}")]
    SchemaRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to deserialize resolved values: {0}")]
    Deserialize(#[source] toml::de::Error),
}
