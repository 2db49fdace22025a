use std::fmt;

use serde::Deserialize;

use crate::properties::DEFAULT_FILE;

/// Target type a raw property string is converted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    #[default]
    String,
    Int,
    Boolean,
    Float,
    Double,
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PropertyType::String => "string",
            PropertyType::Int => "int",
            PropertyType::Boolean => "boolean",
            PropertyType::Float => "float",
            PropertyType::Double => "double",
        })
    }
}

/// Describes where a slot's value comes from and how it is interpreted.
///
/// Built with [`BindingDescriptor::new`] and the consuming setters below; the
/// descriptor cannot be changed once registered.
///
/// ```
/// use propbind::{BindingDescriptor, PropertyType};
///
/// let port = BindingDescriptor::new("port")
///     .file("server.properties")
///     .kind(PropertyType::Int)
///     .default_value("8080");
///
/// assert_eq!(port.key(), "port");
/// assert!(!port.is_required());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingDescriptor {
    key: String,
    file: String,
    required: bool,
    kind: PropertyType,
    default_value: String,
}

impl BindingDescriptor {
    /// Creates a descriptor for `key` in [`DEFAULT_FILE`], optional, typed as a string
    /// and defaulting to the empty string.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            file: DEFAULT_FILE.to_string(),
            required: false,
            kind: PropertyType::String,
            default_value: String::new(),
        }
    }

    /// Sets the logical name of the properties file the key is read from.
    #[must_use]
    pub fn file(mut self, file: impl Into<String>) -> Self {
        self.file = file.into();
        self
    }

    /// Marks the key as required. A missing required key fails the pass and the
    /// default value is ignored.
    #[must_use]
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    #[must_use]
    pub fn kind(mut self, kind: PropertyType) -> Self {
        self.kind = kind;
        self
    }

    /// Raw string used when an optional key is absent. It is converted like a
    /// value read from the file.
    #[must_use]
    pub fn default_value(mut self, default_value: impl Into<String>) -> Self {
        self.default_value = default_value.into();
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn source_file(&self) -> &str {
        &self.file
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn property_type(&self) -> PropertyType {
        self.kind
    }

    pub fn raw_default(&self) -> &str {
        &self.default_value
    }
}
