//! Property files: the key/value text format, where files come from, and the
//! per-pass cache that loads each file once.

mod cache;
mod parser;
mod source;

use std::collections::HashMap;

pub use cache::FileCache;
pub use parser::{parse, ParseError};
pub use source::{DirResolver, MemoryResolver, ResourceResolver};

/// File a binding reads from when it names none.
pub const DEFAULT_FILE: &str = "config.properties";

/// The parsed contents of one properties file.
///
/// Keys are unique; when a file repeats a key, the last occurrence wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyFile {
    entries: HashMap<String, String>,
}

impl PropertyFile {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn insert(&mut self, key: String, value: String) {
        self.entries.insert(key, value);
    }
}
