//! Dynamic values passed to and returned from stored computations.
//!
//! The registry never calls a computation itself. A consumer (generated
//! bindings, a test, a manifest preview) packs arguments into [`CallArgs`],
//! invokes the computation and receives a [`Value`].

use std::any::Any;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::{BaseType, CallError, DataType};

/// A dynamically typed value.
///
/// Class and handle values travel as `Object`; everything else has a
/// dedicated variant.
pub enum Value {
    Void,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Str(String),
    Path(PathBuf),
    Seq(Vec<Value>),
    Object(Box<dyn Any + Send>),
}

impl Value {
    /// Box a native object.
    pub fn object<T: Any + Send>(value: T) -> Self {
        Value::Object(Box::new(value))
    }

    /// Get a human-readable name for this value's variant.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Void => "void",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::UInt(_) => "uint",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::Path(_) => "path",
            Value::Seq(_) => "sequence",
            Value::Object(_) => "object",
        }
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Value::Object(obj) => obj.downcast_ref(),
            _ => None,
        }
    }

    pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        match self {
            Value::Object(obj) => obj.downcast_mut(),
            _ => None,
        }
    }

    /// Flatten a sequence of numbers to `f64`s.
    pub fn as_floats(&self) -> Option<Vec<f64>> {
        match self {
            Value::Seq(items) => items
                .iter()
                .map(|v| match v {
                    Value::Float(f) => Some(*f),
                    Value::Int(i) => Some(*i as f64),
                    Value::UInt(u) => Some(*u as f64),
                    _ => None,
                })
                .collect(),
            _ => None,
        }
    }

    /// Flatten a sequence of unsigned integers.
    pub fn as_uints(&self) -> Option<Vec<u64>> {
        match self {
            Value::Seq(items) => items
                .iter()
                .map(|v| match v {
                    Value::UInt(u) => Some(*u),
                    _ => None,
                })
                .collect(),
            _ => None,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Void => write!(f, "Void"),
            Value::Bool(b) => write!(f, "Bool({b})"),
            Value::Int(i) => write!(f, "Int({i})"),
            Value::UInt(u) => write!(f, "UInt({u})"),
            Value::Float(x) => write!(f, "Float({x})"),
            Value::Str(s) => write!(f, "Str({s:?})"),
            Value::Path(p) => write!(f, "Path({p:?})"),
            Value::Seq(items) => f.debug_list().entries(items).finish(),
            Value::Object(_) => f.debug_struct("Object").finish_non_exhaustive(),
        }
    }
}

// ============================================================================
// NativeValue
// ============================================================================

/// A Rust type with a registry-side semantic type.
///
/// The associated `data_type()` is what a synthesized method declares as its
/// return type, so `Vec<f32>` declares `std::vector<float>` whatever the
/// closure computes internally.
pub trait NativeValue: Sized + 'static {
    fn data_type() -> DataType;
    fn into_value(self) -> Value;
}

macro_rules! impl_native_primitive {
    ($ty:ty, $base:expr, $variant:ident as $conv:ty) => {
        impl NativeValue for $ty {
            fn data_type() -> DataType {
                DataType::simple($base)
            }

            fn into_value(self) -> Value {
                Value::$variant(self as $conv)
            }
        }
    };
}

impl_native_primitive!(i32, BaseType::Int32, Int as i64);
impl_native_primitive!(u32, BaseType::UInt32, UInt as u64);
impl_native_primitive!(u64, BaseType::UInt64, UInt as u64);
impl_native_primitive!(usize, BaseType::UInt64, UInt as u64);
impl_native_primitive!(f32, BaseType::Float32, Float as f64);
impl_native_primitive!(f64, BaseType::Float64, Float as f64);

impl NativeValue for () {
    fn data_type() -> DataType {
        DataType::void()
    }

    fn into_value(self) -> Value {
        Value::Void
    }
}

impl NativeValue for bool {
    fn data_type() -> DataType {
        DataType::simple(BaseType::Bool)
    }

    fn into_value(self) -> Value {
        Value::Bool(self)
    }
}

impl NativeValue for String {
    fn data_type() -> DataType {
        DataType::simple(BaseType::String)
    }

    fn into_value(self) -> Value {
        Value::Str(self)
    }
}

impl NativeValue for PathBuf {
    fn data_type() -> DataType {
        DataType::simple(BaseType::Path)
    }

    fn into_value(self) -> Value {
        Value::Path(self)
    }
}

impl<T: NativeValue> NativeValue for Vec<T> {
    fn data_type() -> DataType {
        DataType::sequence(T::data_type())
    }

    fn into_value(self) -> Value {
        Value::Seq(self.into_iter().map(NativeValue::into_value).collect())
    }
}

/// Implement [`NativeValue`] for a class or handle type by native path.
///
/// ```ignore
/// impl_native_object!(SurfaceMesh, "pmp::SurfaceMesh");
/// ```
#[macro_export]
macro_rules! impl_native_object {
    ($ty:ty, $native:expr) => {
        impl $crate::NativeValue for $ty {
            fn data_type() -> $crate::DataType {
                $crate::DataType::named($native)
            }

            fn into_value(self) -> $crate::Value {
                $crate::Value::object(self)
            }
        }
    };
}

// ============================================================================
// CallArgs
// ============================================================================

/// Arguments of a computation call. Index 0 is the receiver for methods.
#[derive(Debug, Default)]
pub struct CallArgs {
    values: Vec<Value>,
}

impl CallArgs {
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn slot(&self, index: usize) -> Result<&Value, CallError> {
        self.values.get(index).ok_or(CallError::ArgumentCount {
            expected: index + 1,
            got: self.values.len(),
        })
    }

    /// Borrow argument `index` as a native object.
    pub fn object<T: Any>(&self, index: usize) -> Result<&T, CallError> {
        let value = self.slot(index)?;
        value.downcast_ref().ok_or(CallError::ArgumentType {
            index,
            expected: std::any::type_name::<T>(),
            got: value.type_name(),
        })
    }

    /// Mutably borrow argument `index` as a native object.
    pub fn object_mut<T: Any>(&mut self, index: usize) -> Result<&mut T, CallError> {
        let got = self.values.len();
        let value = self
            .values
            .get_mut(index)
            .ok_or(CallError::ArgumentCount {
                expected: index + 1,
                got,
            })?;
        let type_name = value.type_name();
        value.downcast_mut().ok_or(CallError::ArgumentType {
            index,
            expected: std::any::type_name::<T>(),
            got: type_name,
        })
    }

    /// Argument `index` as a filesystem path; strings are accepted too.
    pub fn path(&self, index: usize) -> Result<&Path, CallError> {
        match self.slot(index)? {
            Value::Path(p) => Ok(p),
            Value::Str(s) => Ok(Path::new(s)),
            other => Err(CallError::ArgumentType {
                index,
                expected: "path",
                got: other.type_name(),
            }),
        }
    }

    /// Give back the (possibly mutated) argument values.
    pub fn into_values(self) -> Vec<Value> {
        self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Marker(u32);
    impl_native_object!(Marker, "test::Marker");

    #[test]
    fn vec_declares_sequence() {
        assert_eq!(<Vec<f32>>::data_type().to_string(), "std::vector<float>");
        assert_eq!(<Vec<u32>>::data_type().to_string(), "std::vector<unsigned int>");
        assert!(<Vec<f32>>::data_type().is_numeric_sequence());
    }

    #[test]
    fn into_value_widens_numbers() {
        let value = vec![1.5f32, 2.0].into_value();
        assert_eq!(value.as_floats(), Some(vec![1.5, 2.0]));
        assert_eq!(vec![3u32, 4].into_value().as_uints(), Some(vec![3, 4]));
    }

    #[test]
    fn object_round_trip_through_args() {
        assert_eq!(Marker::data_type(), DataType::named("test::Marker"));

        let mut args = CallArgs::new(vec![Marker(7).into_value(), Value::Str("a.obj".into())]);
        assert_eq!(args.object::<Marker>(0).unwrap(), &Marker(7));
        args.object_mut::<Marker>(0).unwrap().0 = 9;
        assert_eq!(args.object::<Marker>(0).unwrap(), &Marker(9));
        assert_eq!(args.path(1).unwrap(), Path::new("a.obj"));
    }

    #[test]
    fn wrong_argument_type_is_reported() {
        let args = CallArgs::new(vec![Value::Bool(true)]);
        match args.object::<Marker>(0) {
            Err(CallError::ArgumentType { index, got, .. }) => {
                assert_eq!(index, 0);
                assert_eq!(got, "bool");
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(
            args.path(3),
            Err(CallError::ArgumentCount { expected: 4, got: 1 })
        ));
    }
}
