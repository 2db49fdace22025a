use std::collections::HashMap;
use std::rc::Rc;

use tracing::{debug, trace};

use super::{parse, PropertyFile, ResourceResolver};
use crate::ConfigError;

/// Loads property files by logical name, at most once each.
///
/// A cache belongs to a single resolution pass and is never invalidated while
/// it lives. Independent passes use independent caches.
#[derive(Debug)]
pub struct FileCache<'r> {
    resolver: &'r dyn ResourceResolver,
    files: HashMap<String, Rc<PropertyFile>>,
}

impl<'r> FileCache<'r> {
    pub fn new(resolver: &'r dyn ResourceResolver) -> Self {
        Self {
            resolver,
            files: HashMap::new(),
        }
    }

    /// Returns the named file, loading and parsing it on first request.
    pub fn get(&mut self, name: &str) -> Result<Rc<PropertyFile>, ConfigError> {
        if let Some(file) = self.files.get(name) {
            trace!(file = name, "properties file cache hit");
            return Ok(Rc::clone(file));
        }

        let text = self
            .resolver
            .open(name)?
            .ok_or_else(|| ConfigError::FileNotFound(name.to_string()))?;
        let file = parse(&text).map_err(|e| ConfigError::Parse {
            file: name.to_string(),
            line: e.line,
            message: e.message,
        })?;

        debug!(file = name, entries = file.len(), "loaded properties file");
        let file = Rc::new(file);
        self.files.insert(name.to_string(), Rc::clone(&file));
        Ok(file)
    }

    /// Number of files loaded so far.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
