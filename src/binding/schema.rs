//! Bindings declared in a TOML document instead of code.
//!
//! ```toml
//! [[binding]]
//! slot = "server.port"        # optional, defaults to `key`
//! key = "port"
//! file = "server.properties"  # optional, defaults to config.properties
//! required = true             # optional
//! type = "int"                # string | int | boolean | float | double
//! default = ""                # optional
//! ```
//!
//! Resolving a [`BindingSet`] yields [`ResolvedValues`], which can be
//! deserialized into any serde type. Dotted slot names nest into tables.

use std::collections::BTreeMap;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use toml::Table;
use tracing::{debug, instrument};

use super::resolve::resolve;
use super::{BindingDescriptor, PropertyType, Value};
use crate::properties::{FileCache, ResourceResolver};
use crate::ConfigError;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SchemaDocument {
    #[serde(default, rename = "binding")]
    bindings: Vec<SchemaEntry>,
}

/// One `[[binding]]` table. Misspelled fields are rejected rather than
/// silently falling back to their defaults.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SchemaEntry {
    slot: Option<String>,
    key: String,
    file: Option<String>,
    #[serde(default)]
    required: bool,
    #[serde(default, rename = "type")]
    kind: PropertyType,
    #[serde(default)]
    default: String,
}

impl SchemaEntry {
    fn into_binding(self) -> (String, BindingDescriptor) {
        let mut descriptor = BindingDescriptor::new(self.key)
            .required(self.required)
            .kind(self.kind)
            .default_value(self.default);
        if let Some(file) = self.file {
            descriptor = descriptor.file(file);
        }
        let slot = self.slot.unwrap_or_else(|| descriptor.key().to_string());
        (slot, descriptor)
    }
}

/// An ordered list of named slots and the descriptors that fill them.
#[derive(Debug, Clone, Default)]
pub struct BindingSet {
    bindings: Vec<(String, BindingDescriptor)>,
}

impl BindingSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a binding schema from TOML text.
    pub fn from_toml_str(schema: &str) -> Result<Self, ConfigError> {
        let document: SchemaDocument = toml::from_str(schema).map_err(ConfigError::Schema)?;
        let bindings = document
            .bindings
            .into_iter()
            .map(SchemaEntry::into_binding)
            .collect();
        Ok(Self { bindings })
    }

    /// Reads and parses a binding schema file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let schema = std::fs::read_to_string(path).map_err(|e| ConfigError::SchemaRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml_str(&schema)
    }

    /// Appends a binding for `slot`.
    #[must_use]
    pub fn with_binding(mut self, slot: impl Into<String>, descriptor: BindingDescriptor) -> Self {
        self.bindings.push((slot.into(), descriptor));
        self
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Slot names and descriptors, in resolution order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BindingDescriptor)> {
        self.bindings.iter().map(|(slot, d)| (slot.as_str(), d))
    }

    /// Runs one resolution pass, stopping at the first failing binding.
    #[instrument(level = "debug", skip_all, fields(bindings = self.bindings.len()))]
    pub fn resolve(&self, resolver: &dyn ResourceResolver) -> Result<ResolvedValues, ConfigError> {
        let mut cache = FileCache::new(resolver);
        let mut resolved = ResolvedValues::default();

        for (slot, descriptor) in &self.bindings {
            let value = resolve(&mut cache, descriptor)?;
            resolved
                .write(slot, value)
                .map_err(|reason| ConfigError::SlotWrite {
                    key: descriptor.key().to_string(),
                    reason,
                })?;
        }

        debug!(files = cache.len(), "binding set resolved");
        Ok(resolved)
    }
}

/// Values produced by resolving a [`BindingSet`], keyed by slot name.
///
/// Each slot can be written once per pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedValues {
    values: BTreeMap<String, Value>,
    table: Table,
}

impl ResolvedValues {
    pub fn get(&self, slot: &str) -> Option<&Value> {
        self.values.get(slot)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over slots in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(slot, v)| (slot.as_str(), v))
    }

    /// Deserializes the resolved slots into `T`.
    ///
    /// Dotted slot names such as `server.port` become nested fields.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, ConfigError> {
        let value = toml::Value::Table(self.table.clone());
        value.try_into().map_err(ConfigError::Deserialize)
    }

    fn write(&mut self, slot: &str, value: Value) -> Result<(), String> {
        let path: Vec<&str> = slot.split('.').collect();
        if path.iter().any(|p| p.is_empty()) {
            return Err(format!("invalid slot name '{slot}'"));
        }

        insert_at_path(&mut self.table, &path, toml::Value::from(value.clone()))
            .map_err(|conflict| format!("slot '{slot}' conflicts with '{conflict}'"))?;
        self.values.insert(slot.to_string(), value);
        Ok(())
    }
}

/// Inserts `value` at `path`, creating intermediate tables.
///
/// Refuses to overwrite an existing entry or to nest beneath a scalar; the
/// error names the path prefix already taken.
fn insert_at_path(table: &mut Table, path: &[&str], value: toml::Value) -> Result<(), String> {
    let Some((first, rest)) = path.split_first() else {
        return Ok(());
    };

    if rest.is_empty() {
        if table.contains_key(*first) {
            return Err((*first).to_string());
        }
        table.insert((*first).to_string(), value);
        return Ok(());
    }

    let nested = table
        .entry((*first).to_string())
        .or_insert(toml::Value::Table(Table::new()));
    match nested {
        toml::Value::Table(nested) => insert_at_path(nested, rest, value)
            .map_err(|conflict| format!("{first}.{conflict}")),
        _ => Err((*first).to_string()),
    }
}
