//! Binding property keys to typed slots.

mod conversion;
mod descriptor;
mod loader;
mod resolve;
mod schema;
mod slot;

pub use conversion::{convert, ConversionError, Value};
pub use descriptor::{BindingDescriptor, PropertyType};
pub use loader::PropertyLoader;
pub use schema::{BindingSet, ResolvedValues};
pub use slot::FromValue;
