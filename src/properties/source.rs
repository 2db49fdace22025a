//! Where property files come from.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use tracing::debug;

use crate::ConfigError;

/// Resolves a logical file name to its text.
///
/// Returns `Ok(None)` when the resource does not exist; the caller turns that
/// into [`ConfigError::FileNotFound`]. Errors are reserved for resources that
/// exist but cannot be read.
pub trait ResourceResolver: std::fmt::Debug {
    fn open(&self, name: &str) -> Result<Option<String>, ConfigError>;
}

impl<R: ResourceResolver + ?Sized> ResourceResolver for Rc<R> {
    fn open(&self, name: &str) -> Result<Option<String>, ConfigError> {
        (**self).open(name)
    }
}

impl<R: ResourceResolver + ?Sized> ResourceResolver for Box<R> {
    fn open(&self, name: &str) -> Result<Option<String>, ConfigError> {
        (**self).open(name)
    }
}

/// Resource names are relative: a leading `/` is ignored by every resolver, so
/// `"/config.properties"` and `"config.properties"` are the same resource.
fn resource_name(name: &str) -> &str {
    name.trim_start_matches('/')
}

/// Decodes file bytes as UTF-8, falling back to ISO-8859-1 for legacy files.
fn decode(name: &str, bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => {
            debug!(file = name, "not valid UTF-8, decoding as ISO-8859-1");
            e.into_bytes().into_iter().map(char::from).collect()
        }
    }
}

/// Resolves names relative to a resource root directory.
///
/// Files are read as UTF-8; files that are not valid UTF-8 are decoded as
/// ISO-8859-1.
#[derive(Debug, Clone)]
pub struct DirResolver {
    root: PathBuf,
}

impl DirResolver {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }
}

impl ResourceResolver for DirResolver {
    fn open(&self, name: &str) -> Result<Option<String>, ConfigError> {
        let path = self.root.join(resource_name(name));
        match std::fs::read(&path) {
            Ok(bytes) => Ok(Some(decode(name, bytes))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ConfigError::ReadError {
                file: name.to_string(),
                source: e,
            }),
        }
    }
}

/// Serves property files held in memory, e.g. bundled with `include_str!`.
///
/// ```
/// use propbind::MemoryResolver;
///
/// let resources = MemoryResolver::new()
///     .with_file("config.properties", "name=demo\n");
/// # let _ = resources;
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryResolver {
    files: HashMap<String, String>,
}

impl MemoryResolver {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_file(mut self, name: impl Into<String>, contents: impl Into<String>) -> Self {
        self.insert(name, contents);
        self
    }

    /// Adds or replaces a file.
    pub fn insert(&mut self, name: impl Into<String>, contents: impl Into<String>) {
        let name = name.into();
        self.files.insert(resource_name(&name).to_string(), contents.into());
    }
}

impl ResourceResolver for MemoryResolver {
    fn open(&self, name: &str) -> Result<Option<String>, ConfigError> {
        Ok(self.files.get(resource_name(name)).cloned())
    }
}
