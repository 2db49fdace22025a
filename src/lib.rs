//! Load values from `.properties` files into typed configuration slots.
//!
//! Bindings are registered on a [`PropertyLoader`] (or declared in a TOML
//! [`BindingSet`]). A resolution pass reads each referenced file once, applies
//! required/default rules, converts values and writes them into their slots.

pub mod binding;
mod error;
pub mod properties;

pub use binding::{
    convert, BindingDescriptor, BindingSet, ConversionError, FromValue, PropertyLoader,
    PropertyType, ResolvedValues, Value,
};
pub use error::ConfigError;
pub use properties::{
    DirResolver, FileCache, MemoryResolver, PropertyFile, ResourceResolver, DEFAULT_FILE,
};
