use std::any::type_name;
use std::fmt;
use std::path::Path;

use tracing::{debug, instrument};

use super::resolve::resolve;
use super::{BindingDescriptor, FromValue, Value};
use crate::properties::{DirResolver, FileCache, ResourceResolver};
use crate::ConfigError;

type Setter<T> = Box<dyn Fn(&mut T, Value) -> Result<(), String>>;

struct Binding<T> {
    descriptor: BindingDescriptor,
    setter: Setter<T>,
}

/// Builder that binds property keys to fields of a configuration struct `T`.
///
/// Each binding pairs a [`BindingDescriptor`] with a setter. Bindings are
/// resolved in registration order, and every file is read at most once per
/// pass no matter how many bindings use it.
///
/// ## Failure
///
/// A pass stops at the first failing binding. Bindings applied before it stay
/// applied: [`load_into`](Self::load_into) leaves the target partially filled,
/// so treat any error as "configuration not fully applied".
///
/// ## Example
///
/// ```
/// use propbind::{BindingDescriptor, MemoryResolver, PropertyLoader, PropertyType};
///
/// #[derive(Debug, Default)]
/// struct AppConfig {
///     name: String,
///     port: i32,
///     debug: bool,
/// }
///
/// let resources = MemoryResolver::new()
///     .with_file("config.properties", "name=demo\nport=8080\n");
///
/// let config: AppConfig = PropertyLoader::builder()
///     .with_resolver(resources)
///     .bind(BindingDescriptor::new("name"), |c: &mut AppConfig, v| c.name = v)
///     .bind(
///         BindingDescriptor::new("port").kind(PropertyType::Int).required(true),
///         |c: &mut AppConfig, v| c.port = v,
///     )
///     .bind(
///         BindingDescriptor::new("debug").kind(PropertyType::Boolean),
///         |c: &mut AppConfig, v| c.debug = v,
///     )
///     .load()?;
///
/// assert_eq!(config.name, "demo");
/// assert_eq!(config.port, 8080);
/// assert!(!config.debug);
/// # Ok::<(), propbind::ConfigError>(())
/// ```
#[must_use = "loaders do nothing until .load() is called"]
pub struct PropertyLoader<T> {
    resolver: Box<dyn ResourceResolver>,
    bindings: Vec<Binding<T>>,
}

impl<T> Default for PropertyLoader<T> {
    fn default() -> Self {
        Self {
            resolver: Box::new(DirResolver::new(".")),
            bindings: Vec::new(),
        }
    }
}

impl<T> fmt::Debug for PropertyLoader<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyLoader")
            .field("resolver", &self.resolver)
            .field("bindings", &self.descriptors().collect::<Vec<_>>())
            .finish()
    }
}

impl<T> PropertyLoader<T> {
    /// Creates a loader that reads files relative to the working directory.
    pub fn builder() -> Self {
        Self::default()
    }

    /// Reads property files through `resolver`.
    pub fn with_resolver(mut self, resolver: impl ResourceResolver + 'static) -> Self {
        self.resolver = Box::new(resolver);
        self
    }

    /// Reads property files relative to `root`.
    pub fn with_resource_root(self, root: impl AsRef<Path>) -> Self {
        self.with_resolver(DirResolver::new(root))
    }

    /// Binds `descriptor` to a slot of type `V`.
    ///
    /// `V` must match the descriptor's [`PropertyType`](super::PropertyType)
    /// (`String`, `i32`, `bool`, `f32`, `f64`), or be [`Value`] to accept
    /// any type. A mismatch fails the pass with [`ConfigError::SlotWrite`].
    pub fn bind<V, F>(self, descriptor: BindingDescriptor, setter: F) -> Self
    where
        V: FromValue + 'static,
        F: Fn(&mut T, V) + 'static,
    {
        self.try_bind(descriptor, move |target: &mut T, value: V| {
            setter(target, value);
            Ok(())
        })
    }

    /// Binds `descriptor` to a slot that may refuse the write.
    ///
    /// Returning `Err(reason)` from the setter fails the pass with
    /// [`ConfigError::SlotWrite`].
    pub fn try_bind<V, F>(mut self, descriptor: BindingDescriptor, setter: F) -> Self
    where
        V: FromValue + 'static,
        F: Fn(&mut T, V) -> Result<(), String> + 'static,
    {
        let setter: Setter<T> = Box::new(move |target: &mut T, value: Value| {
            let found = value.kind();
            let typed = V::from_value(value).map_err(|_| {
                format!("slot of type {} cannot hold a {found} value", type_name::<V>())
            })?;
            setter(target, typed)
        });
        self.bindings.push(Binding { descriptor, setter });
        self
    }

    /// Registered descriptors, in resolution order.
    pub fn descriptors(&self) -> impl Iterator<Item = &BindingDescriptor> {
        self.bindings.iter().map(|b| &b.descriptor)
    }

    /// Runs one resolution pass, writing every binding into `target`.
    #[instrument(level = "debug", skip_all, fields(bindings = self.bindings.len()))]
    pub fn load_into(&self, target: &mut T) -> Result<(), ConfigError> {
        let mut cache = FileCache::new(self.resolver.as_ref());

        for binding in &self.bindings {
            let value = resolve(&mut cache, &binding.descriptor)?;
            (binding.setter)(target, value).map_err(|reason| ConfigError::SlotWrite {
                key: binding.descriptor.key().to_string(),
                reason,
            })?;
        }

        debug!(files = cache.len(), "configuration applied");
        Ok(())
    }

    /// Runs one resolution pass into a fresh `T::default()` and returns it.
    pub fn load(&self) -> Result<T, ConfigError>
    where
        T: Default,
    {
        let mut target = T::default();
        self.load_into(&mut target)?;
        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MemoryResolver, PropertyType};
    use std::cell::Cell;
    use std::rc::Rc;

    #[derive(Debug, Default, PartialEq)]
    struct TestConfig {
        some_value: String,
        another_value: String,
        int_value: i32,
        from_another_file: String,
        not_provided: String,
    }

    #[derive(Debug)]
    struct CountingResolver {
        inner: MemoryResolver,
        opened: Cell<usize>,
    }

    impl ResourceResolver for CountingResolver {
        fn open(&self, name: &str) -> Result<Option<String>, ConfigError> {
            self.opened.set(self.opened.get() + 1);
            self.inner.open(name)
        }
    }

    fn resources() -> MemoryResolver {
        MemoryResolver::new()
            .with_file(
                "config.properties",
                "someValue=someValue\nanotherValue=anotherValue\nintValue=123\n",
            )
            .with_file("another.properties", "fromAnotherFile=fromAnotherFile\n")
    }

    #[test]
    fn test_string_bindings() {
        let config: TestConfig = PropertyLoader::builder()
            .with_resolver(resources())
            .bind(BindingDescriptor::new("someValue"), |c: &mut TestConfig, v| {
                c.some_value = v
            })
            .bind(BindingDescriptor::new("anotherValue"), |c: &mut TestConfig, v| {
                c.another_value = v
            })
            .load()
            .unwrap();

        assert_eq!(config.some_value, "someValue");
        assert_eq!(config.another_value, "anotherValue");
    }

    #[test]
    fn test_required_int_binding() {
        let config: TestConfig = PropertyLoader::builder()
            .with_resolver(resources())
            .bind(
                BindingDescriptor::new("intValue")
                    .kind(PropertyType::Int)
                    .required(true),
                |c: &mut TestConfig, v| c.int_value = v,
            )
            .load()
            .unwrap();

        assert_eq!(config.int_value, 123);
    }

    #[test]
    fn test_binding_from_another_file() {
        let resolver = Rc::new(CountingResolver {
            inner: resources(),
            opened: Cell::new(0),
        });

        let config: TestConfig = PropertyLoader::builder()
            .with_resolver(Rc::clone(&resolver))
            .bind(BindingDescriptor::new("someValue"), |c: &mut TestConfig, v| {
                c.some_value = v
            })
            .bind(
                BindingDescriptor::new("fromAnotherFile")
                    .file("another.properties")
                    .required(true),
                |c: &mut TestConfig, v| c.from_another_file = v,
            )
            .bind(BindingDescriptor::new("anotherValue"), |c: &mut TestConfig, v| {
                c.another_value = v
            })
            .load()
            .unwrap();

        assert_eq!(config.from_another_file, "fromAnotherFile");
        assert_eq!(config.another_value, "anotherValue");
        assert_eq!(resolver.opened.get(), 2);
    }

    #[test]
    fn test_each_pass_uses_fresh_cache() {
        let resolver = Rc::new(CountingResolver {
            inner: resources(),
            opened: Cell::new(0),
        });
        let loader = PropertyLoader::builder()
            .with_resolver(Rc::clone(&resolver))
            .bind(BindingDescriptor::new("someValue"), |c: &mut TestConfig, v| {
                c.some_value = v
            })
            .bind(BindingDescriptor::new("anotherValue"), |c: &mut TestConfig, v| {
                c.another_value = v
            });

        loader.load().unwrap();
        loader.load().unwrap();
        assert_eq!(resolver.opened.get(), 2);
    }

    #[test]
    fn test_missing_optional_gets_default() {
        let config: TestConfig = PropertyLoader::builder()
            .with_resolver(resources())
            .bind(
                BindingDescriptor::new("notProvided").default_value("fallback"),
                |c: &mut TestConfig, v| c.not_provided = v,
            )
            .bind(
                BindingDescriptor::new("missingInt")
                    .kind(PropertyType::Int)
                    .default_value("-1"),
                |c: &mut TestConfig, v| c.int_value = v,
            )
            .load()
            .unwrap();

        assert_eq!(config.not_provided, "fallback");
        assert_eq!(config.int_value, -1);
    }

    #[test]
    fn test_missing_required_fails_fast() {
        let loader = PropertyLoader::builder()
            .with_resolver(resources())
            .bind(BindingDescriptor::new("someValue"), |c: &mut TestConfig, v| {
                c.some_value = v
            })
            .bind(
                BindingDescriptor::new("notProvided").required(true),
                |c: &mut TestConfig, v| c.not_provided = v,
            )
            .bind(BindingDescriptor::new("anotherValue"), |c: &mut TestConfig, v| {
                c.another_value = v
            });

        let mut config = TestConfig::default();
        let result = loader.load_into(&mut config);

        assert!(matches!(
            result,
            Err(ConfigError::InsufficientConfiguration { file, key })
                if file == "config.properties" && key == "notProvided"
        ));
        // Earlier bindings stay applied, later ones never run
        assert_eq!(config.some_value, "someValue");
        assert_eq!(config.another_value, "");
    }

    #[test]
    fn test_missing_file() {
        let result = PropertyLoader::builder()
            .with_resolver(resources())
            .bind(
                BindingDescriptor::new("x").file("absent.properties"),
                |c: &mut TestConfig, v| c.some_value = v,
            )
            .load();

        assert!(matches!(result, Err(ConfigError::FileNotFound(name)) if name == "absent.properties"));
    }

    #[test]
    fn test_slot_type_mismatch() {
        let result = PropertyLoader::builder()
            .with_resolver(resources())
            .bind(BindingDescriptor::new("intValue"), |c: &mut TestConfig, v: i32| {
                c.int_value = v
            })
            .load();

        assert!(matches!(result, Err(ConfigError::SlotWrite { key, .. }) if key == "intValue"));
    }

    #[test]
    fn test_rejected_write_halts_pass() {
        let loader = PropertyLoader::builder()
            .with_resolver(resources())
            .try_bind(
                BindingDescriptor::new("someValue"),
                |_: &mut TestConfig, _: String| Err("slot is read-only".to_string()),
            )
            .bind(BindingDescriptor::new("anotherValue"), |c: &mut TestConfig, v| {
                c.another_value = v
            });

        let mut config = TestConfig::default();
        match loader.load_into(&mut config) {
            Err(ConfigError::SlotWrite { key, reason }) => {
                assert_eq!(key, "someValue");
                assert_eq!(reason, "slot is read-only");
            }
            other => panic!("expected slot write error, got {other:?}"),
        }
        assert_eq!(config.another_value, "");
    }

    #[test]
    fn test_value_slot_accepts_any_type() {
        let seen = Rc::new(Cell::new(0));
        let counter = Rc::clone(&seen);

        PropertyLoader::builder()
            .with_resolver(resources())
            .bind(
                BindingDescriptor::new("intValue").kind(PropertyType::Int),
                move |_: &mut TestConfig, v: Value| {
                    if v == Value::Int(123) {
                        counter.set(counter.get() + 1);
                    }
                },
            )
            .load()
            .unwrap();

        assert_eq!(seen.get(), 1);
    }

    #[test]
    fn test_resource_root() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("config.properties"), "someValue=from disk\n").unwrap();

        let config: TestConfig = PropertyLoader::builder()
            .with_resource_root(dir.path())
            .bind(BindingDescriptor::new("someValue"), |c: &mut TestConfig, v| {
                c.some_value = v
            })
            .load()
            .unwrap();

        assert_eq!(config.some_value, "from disk");
    }

    #[test]
    fn test_descriptors_in_registration_order() {
        let loader = PropertyLoader::builder()
            .bind(BindingDescriptor::new("b"), |c: &mut TestConfig, v| c.some_value = v)
            .bind(BindingDescriptor::new("a"), |c: &mut TestConfig, v| c.another_value = v);

        let keys: Vec<_> = loader.descriptors().map(BindingDescriptor::key).collect();
        assert_eq!(keys, ["b", "a"]);
    }
}
