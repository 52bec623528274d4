//! How a generator reaches a field, method or function.

use std::fmt;
use std::sync::Arc;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::{CallArgs, CallError, Value};

/// Trait for deferred computations.
///
/// Implemented for every closure of the right shape, so registration code
/// passes closures directly.
pub trait Compute {
    fn compute(&self, args: &mut CallArgs) -> Result<Value, CallError>;
}

impl<F> Compute for F
where
    F: Fn(&mut CallArgs) -> Result<Value, CallError>,
{
    fn compute(&self, args: &mut CallArgs) -> Result<Value, CallError> {
        (self)(args)
    }
}

/// A type-erased, shareable computation.
///
/// Registration only stores it; consumers invoke it with [`Computation::call`].
#[derive(Clone)]
pub struct Computation {
    inner: Arc<dyn Compute + Send + Sync>,
}

impl Computation {
    pub fn new<F>(f: F) -> Self
    where
        F: Compute + Send + Sync + 'static,
    {
        Self { inner: Arc::new(f) }
    }

    pub fn call(&self, args: &mut CallArgs) -> Result<Value, CallError> {
        self.inner.compute(args)
    }
}

impl fmt::Debug for Computation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Computation").finish_non_exhaustive()
    }
}

/// The binding target recorded for a member or function.
#[derive(Debug, Clone)]
pub enum Accessor {
    /// A native item, by path; generated code calls or reads it directly.
    Symbol(String),
    /// An inline computation supplied at the declaration site.
    Computation(Computation),
}

impl Accessor {
    pub fn symbol(&self) -> Option<&str> {
        match self {
            Accessor::Symbol(path) => Some(path),
            Accessor::Computation(_) => None,
        }
    }

    pub fn computation(&self) -> Option<&Computation> {
        match self {
            Accessor::Computation(c) => Some(c),
            Accessor::Symbol(_) => None,
        }
    }

    pub fn is_synthesized(&self) -> bool {
        matches!(self, Accessor::Computation(_))
    }
}

impl PartialEq for Accessor {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Accessor::Symbol(a), Accessor::Symbol(b)) => a == b,
            (Accessor::Computation(a), Accessor::Computation(b)) => Arc::ptr_eq(&a.inner, &b.inner),
            _ => false,
        }
    }
}

impl Serialize for Accessor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        match self {
            Accessor::Symbol(path) => map.serialize_entry("symbol", path)?,
            Accessor::Computation(_) => map.serialize_entry("synthesized", &true)?,
        }
        map.end()
    }
}
