use tracing::debug;

use super::{convert, BindingDescriptor, Value};
use crate::properties::FileCache;
use crate::ConfigError;

/// Resolves one descriptor to its converted value.
///
/// Looks the key up in the descriptor's file, falls back to the default for
/// optional keys and fails for required ones.
pub(crate) fn resolve(
    cache: &mut FileCache<'_>,
    descriptor: &BindingDescriptor,
) -> Result<Value, ConfigError> {
    let file_name = descriptor.source_file();
    let file = cache.get(file_name)?;

    let raw = match file.get(descriptor.key()) {
        Some(raw) => raw,
        None if descriptor.is_required() => {
            return Err(ConfigError::InsufficientConfiguration {
                file: file_name.to_string(),
                key: descriptor.key().to_string(),
            });
        }
        None => {
            debug!(
                file = file_name,
                key = descriptor.key(),
                "property not provided, using default"
            );
            descriptor.raw_default()
        }
    };

    convert(raw, descriptor.property_type()).map_err(|e| ConfigError::Conversion {
        file: file_name.to_string(),
        key: descriptor.key().to_string(),
        raw: e.raw,
        target: e.target,
    })
}
