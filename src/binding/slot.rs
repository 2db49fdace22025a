use super::Value;

/// Rust types a converted [`Value`] can be written into.
///
/// A slot whose type does not match the binding's declared
/// [`PropertyType`](super::PropertyType) rejects the write; the value is handed
/// back unchanged.
pub trait FromValue: Sized {
    fn from_value(value: Value) -> Result<Self, Value>;
}

impl FromValue for Value {
    fn from_value(value: Value) -> Result<Self, Value> {
        Ok(value)
    }
}

macro_rules! impl_from_value {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl FromValue for $ty {
                fn from_value(value: Value) -> Result<Self, Value> {
                    match value {
                        Value::$variant(v) => Ok(v),
                        other => Err(other),
                    }
                }
            }
        )*
    };
}

impl_from_value! {
    String => String,
    i32 => Int,
    bool => Boolean,
    f32 => Float,
    f64 => Double,
}
