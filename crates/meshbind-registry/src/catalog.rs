//! NativeCatalog - the declared interface of the wrapped library.
//!
//! The catalog records what the wrapped library offers, by native signature:
//! free functions (several overloads may share a name), and per class its
//! constructors, fields and methods. Registration consults it to turn a bare
//! symbol into a signature, and to decide whether that symbol is ambiguous.
//!
//! # Example
//!
//! ```
//! use meshbind_registry::NativeCatalog;
//!
//! let mut catalog = NativeCatalog::new();
//! catalog.declare_function("void pmp::triangulate(pmp::SurfaceMesh& mesh)").unwrap();
//! catalog.declare_function("void pmp::triangulate(pmp::SurfaceMesh& mesh, pmp::Face f)").unwrap();
//! catalog
//!     .declare_class("pmp::IOFlags")
//!     .constructor("()").unwrap()
//!     .field("bool use_binary").unwrap();
//!
//! assert_eq!(catalog.function_overloads("pmp::triangulate").len(), 2);
//! assert!(catalog.field("pmp::IOFlags", "use_binary").is_some());
//! ```

use rustc_hash::FxHashMap;

use meshbind_core::decl::{parse_declaration, parse_field, parse_params};
use meshbind_core::{DataType, FieldAccess, Param, RegistrationError, Signature, exposed_name};

/// A field as the native class declares it.
#[derive(Debug, Clone, PartialEq)]
pub struct NativeField {
    pub data_type: DataType,
    pub access: FieldAccess,
}

/// Members of one native class.
#[derive(Debug, Clone, Default)]
pub struct NativeClass {
    pub constructors: Vec<Vec<Param>>,
    pub fields: FxHashMap<String, NativeField>,
    pub methods: FxHashMap<String, Vec<Signature>>,
}

impl NativeClass {
    pub fn method_overloads(&self, name: &str) -> &[Signature] {
        self.methods.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has_constructor(&self, params: &[Param]) -> bool {
        self.constructors.iter().any(|c| c.as_slice() == params)
    }
}

/// Symbol table of the wrapped library.
#[derive(Debug, Clone, Default)]
pub struct NativeCatalog {
    functions: FxHashMap<String, Vec<Signature>>,
    classes: FxHashMap<String, NativeClass>,
}

impl NativeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a free function, e.g. `void pmp::decimate(pmp::SurfaceMesh& mesh, unsigned int n)`.
    ///
    /// Declaring the same path again with another signature adds an overload.
    pub fn declare_function(&mut self, decl: &str) -> Result<&mut Self, RegistrationError> {
        let parsed = parse_declaration(decl)?;
        let name = parsed.name.ok_or_else(|| RegistrationError::InvalidDeclaration {
            decl: decl.to_string(),
            offset: 0,
            message: "a function declaration needs a name".to_string(),
        })?;
        self.functions.entry(name).or_default().push(parsed.signature);
        Ok(self)
    }

    /// Start or continue declaring the members of a class.
    pub fn declare_class(&mut self, native: &str) -> ClassDecl<'_> {
        ClassDecl {
            class: self.classes.entry(native.to_string()).or_default(),
        }
    }

    /// Every overload declared for a free function.
    pub fn function_overloads(&self, path: &str) -> &[Signature] {
        self.functions.get(path).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn class(&self, native: &str) -> Option<&NativeClass> {
        self.classes.get(native)
    }

    /// Every overload of a member function, looked up by `Class::member` path.
    pub fn method_overloads(&self, symbol: &str) -> &[Signature] {
        split_member(symbol)
            .and_then(|(class, member)| self.classes.get(class).map(|c| c.method_overloads(member)))
            .unwrap_or(&[])
    }

    /// A field, looked up by class path and field name.
    pub fn field(&self, class: &str, name: &str) -> Option<&NativeField> {
        self.classes.get(class)?.fields.get(name)
    }

    pub fn function_count(&self) -> usize {
        self.functions.len()
    }

    pub fn class_count(&self) -> usize {
        self.classes.len()
    }
}

/// Split `pmp::SurfaceMesh::add_vertex` into (`pmp::SurfaceMesh`, `add_vertex`).
pub fn split_member(symbol: &str) -> Option<(&str, &str)> {
    symbol.rsplit_once("::")
}

/// Member declarations for one class.
pub struct ClassDecl<'c> {
    class: &'c mut NativeClass,
}

impl<'c> ClassDecl<'c> {
    /// Declare a constructor by parameter list, `(float, float, float)`.
    pub fn constructor(self, params: &str) -> Result<Self, RegistrationError> {
        let params = parse_params(params)?;
        self.class.constructors.push(params);
        Ok(self)
    }

    /// Declare a field, `bool use_binary`; a `const` field is read-only.
    pub fn field(self, decl: &str) -> Result<Self, RegistrationError> {
        let (name, mut data_type) = parse_field(decl)?;
        let access = if data_type.is_const {
            FieldAccess::ReadOnly
        } else {
            FieldAccess::ReadWrite
        };
        data_type.is_const = false;
        self.class
            .fields
            .insert(name, NativeField { data_type, access });
        Ok(self)
    }

    /// Declare a method, `pmp::Vertex add_vertex(const pmp::Point& p)`.
    pub fn method(self, decl: &str) -> Result<Self, RegistrationError> {
        let parsed = parse_declaration(decl)?;
        let name = parsed.name.ok_or_else(|| RegistrationError::InvalidDeclaration {
            decl: decl.to_string(),
            offset: 0,
            message: "a method declaration needs a name".to_string(),
        })?;
        self.class
            .methods
            .entry(exposed_name(&name).to_string())
            .or_default()
            .push(parsed.signature);
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meshbind_core::BaseType;

    #[test]
    fn overloads_accumulate() {
        let mut catalog = NativeCatalog::new();
        catalog
            .declare_function("pmp::Point pmp::centroid(const pmp::SurfaceMesh& mesh)")
            .unwrap()
            .declare_function("pmp::Point pmp::centroid(const pmp::SurfaceMesh& mesh, pmp::Face f)")
            .unwrap();
        assert_eq!(catalog.function_overloads("pmp::centroid").len(), 2);
        assert!(catalog.function_overloads("pmp::volume").is_empty());
        assert_eq!(catalog.function_count(), 1);
    }

    #[test]
    fn unnamed_function_is_rejected() {
        let mut catalog = NativeCatalog::new();
        let err = catalog.declare_function("void (*)(int)").unwrap_err();
        assert!(matches!(err, RegistrationError::InvalidDeclaration { .. }));
    }

    #[test]
    fn methods_are_found_by_member_path() {
        let mut catalog = NativeCatalog::new();
        catalog
            .declare_class("pmp::SurfaceMesh")
            .method("size_t n_vertices() const")
            .unwrap()
            .method("pmp::Vertex add_vertex(const pmp::Point& p)")
            .unwrap();

        let overloads = catalog.method_overloads("pmp::SurfaceMesh::n_vertices");
        assert_eq!(overloads.len(), 1);
        assert!(overloads[0].is_const);
        assert_eq!(overloads[0].return_type, DataType::simple(BaseType::UInt64));
        assert!(catalog.method_overloads("pmp::SurfaceMesh::n_faces").is_empty());
        assert!(catalog.method_overloads("n_faces").is_empty());
    }

    #[test]
    fn const_fields_are_read_only() {
        let mut catalog = NativeCatalog::new();
        catalog
            .declare_class("pmp::IOFlags")
            .field("bool use_binary")
            .unwrap()
            .field("const int version")
            .unwrap();

        assert_eq!(
            catalog.field("pmp::IOFlags", "use_binary").unwrap().access,
            FieldAccess::ReadWrite
        );
        let version = catalog.field("pmp::IOFlags", "version").unwrap();
        assert_eq!(version.access, FieldAccess::ReadOnly);
        assert!(!version.data_type.is_const);
    }

    #[test]
    fn constructors_compare_by_type() {
        let mut catalog = NativeCatalog::new();
        catalog
            .declare_class("pmp::Point")
            .constructor("()")
            .unwrap()
            .constructor("(float x, float y, float z)")
            .unwrap();

        let class = catalog.class("pmp::Point").unwrap();
        let params = parse_params("(float, float, float)").unwrap();
        assert!(class.has_constructor(&params));
        assert!(class.has_constructor(&[]));
        assert!(!class.has_constructor(&parse_params("(double)").unwrap()));
    }
}
