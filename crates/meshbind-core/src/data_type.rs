//! DataType - the semantic type of a parameter, return value or field.
//!
//! A `DataType` is the registry's view of a native type: a base type plus the
//! `const` qualifier and the reference kind. It is deliberately smaller than
//! the native type system; pointers and templates other than `std::vector`
//! have no representation.
//!
//! # Example
//!
//! ```
//! use meshbind_core::{BaseType, DataType};
//!
//! // const pmp::SurfaceMesh&
//! let mesh = DataType::named("pmp::SurfaceMesh").into_const().into_ref();
//! assert_eq!(mesh.to_string(), "const pmp::SurfaceMesh&");
//!
//! // std::vector<float>
//! let buffer = DataType::sequence(DataType::simple(BaseType::Float32));
//! assert!(buffer.is_numeric_sequence());
//! ```

use std::fmt::{self, Display, Formatter};

use serde::Serialize;

/// Reference kind of a parameter or return type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Reference {
    /// Passed by value.
    #[default]
    None,
    /// `T&`
    Lvalue,
    /// `T&&`
    Rvalue,
}

impl Display for Reference {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Reference::None => Ok(()),
            Reference::Lvalue => write!(f, "&"),
            Reference::Rvalue => write!(f, "&&"),
        }
    }
}

/// The base of a semantic type, without qualifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "of")]
pub enum BaseType {
    Void,
    Bool,
    Int32,
    UInt32,
    UInt64,
    Float32,
    Float64,
    String,
    /// `std::filesystem::path`
    Path,
    /// `std::vector<T>`
    Sequence(Box<DataType>),
    /// A class, handle or opaque type, by native path.
    Named(String),
}

impl BaseType {
    /// Whether this is one of the numeric primitives.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            BaseType::Int32
                | BaseType::UInt32
                | BaseType::UInt64
                | BaseType::Float32
                | BaseType::Float64
        )
    }

    /// Resolve a well-known native spelling to its base type.
    ///
    /// Returns `None` for anything that is not a primitive or a known alias;
    /// the caller treats those as named types.
    pub fn from_native_name(name: &str) -> Option<BaseType> {
        let base = match name {
            "void" => BaseType::Void,
            "bool" => BaseType::Bool,
            "int" | "int32_t" => BaseType::Int32,
            "unsigned" | "unsigned int" | "uint32_t" | "pmp::IndexType" => BaseType::UInt32,
            "size_t" | "std::size_t" | "uint64_t" => BaseType::UInt64,
            "float" | "pmp::Scalar" => BaseType::Float32,
            "double" => BaseType::Float64,
            "std::string" => BaseType::String,
            "std::filesystem::path" => BaseType::Path,
            _ => return None,
        };
        Some(base)
    }
}

impl Display for BaseType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            BaseType::Void => write!(f, "void"),
            BaseType::Bool => write!(f, "bool"),
            BaseType::Int32 => write!(f, "int"),
            BaseType::UInt32 => write!(f, "unsigned int"),
            BaseType::UInt64 => write!(f, "size_t"),
            BaseType::Float32 => write!(f, "float"),
            BaseType::Float64 => write!(f, "double"),
            BaseType::String => write!(f, "std::string"),
            BaseType::Path => write!(f, "std::filesystem::path"),
            BaseType::Sequence(inner) => write!(f, "std::vector<{inner}>"),
            BaseType::Named(name) => write!(f, "{name}"),
        }
    }
}

/// A complete semantic type including qualifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct DataType {
    pub base: BaseType,
    pub is_const: bool,
    pub reference: Reference,
}

impl DataType {
    /// An unqualified by-value type.
    pub fn simple(base: BaseType) -> Self {
        Self {
            base,
            is_const: false,
            reference: Reference::None,
        }
    }

    /// `void`
    pub fn void() -> Self {
        Self::simple(BaseType::Void)
    }

    /// A named (class, handle or opaque) type.
    pub fn named(native: impl Into<String>) -> Self {
        Self::simple(BaseType::Named(native.into()))
    }

    /// `std::vector<T>`
    pub fn sequence(element: DataType) -> Self {
        Self::simple(BaseType::Sequence(Box::new(element)))
    }

    pub fn into_const(mut self) -> Self {
        self.is_const = true;
        self
    }

    pub fn into_ref(mut self) -> Self {
        self.reference = Reference::Lvalue;
        self
    }

    pub fn is_void(&self) -> bool {
        self.base == BaseType::Void && self.reference == Reference::None
    }

    /// A sequence whose elements are numeric primitives.
    pub fn is_numeric_sequence(&self) -> bool {
        match &self.base {
            BaseType::Sequence(inner) => inner.base.is_numeric(),
            _ => false,
        }
    }

    /// Every named type this type mentions, including sequence elements.
    pub fn named_types(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_named(&mut out);
        out
    }

    fn collect_named<'a>(&'a self, out: &mut Vec<&'a str>) {
        match &self.base {
            BaseType::Named(name) => out.push(name),
            BaseType::Sequence(inner) => inner.collect_named(out),
            _ => {}
        }
    }
}

impl Display for DataType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.is_const {
            write!(f, "const ")?;
        }
        write!(f, "{}{}", self.base, self.reference)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_native_spelling() {
        let path = DataType::simple(BaseType::Path).into_const().into_ref();
        assert_eq!(path.to_string(), "const std::filesystem::path&");

        let seq = DataType::sequence(DataType::simple(BaseType::UInt32));
        assert_eq!(seq.to_string(), "std::vector<unsigned int>");
    }

    #[test]
    fn aliases_resolve_to_primitives() {
        assert_eq!(BaseType::from_native_name("pmp::Scalar"), Some(BaseType::Float32));
        assert_eq!(BaseType::from_native_name("pmp::IndexType"), Some(BaseType::UInt32));
        assert_eq!(BaseType::from_native_name("pmp::Vertex"), None);
    }

    #[test]
    fn named_types_walks_sequences() {
        let ty = DataType::sequence(DataType::named("pmp::Face"));
        assert_eq!(ty.named_types(), vec!["pmp::Face"]);
        assert!(!ty.is_numeric_sequence());
        assert!(DataType::simple(BaseType::Bool).named_types().is_empty());
    }

    #[test]
    fn void_reference_is_not_void() {
        assert!(DataType::void().is_void());
        assert!(!DataType::void().into_ref().is_void());
    }
}
