//! Descriptors - the stored records of reflected types and functions.
//!
//! A [`TypeDescriptor`] holds everything a generator needs to expose one
//! native class: its constructors in declaration order, its fields and its
//! methods. A [`FunctionDescriptor`] describes one free function. Both are
//! built during the registration phase and never change afterwards.

use serde::Serialize;

use crate::{Accessor, DataType, Param, RegistrationError, Signature};

/// Exposed name derived from a native path: the last `::` segment.
///
/// ```
/// assert_eq!(meshbind_core::exposed_name("pmp::SurfaceMesh"), "SurfaceMesh");
/// assert_eq!(meshbind_core::exposed_name("copy_mesh"), "copy_mesh");
/// ```
pub fn exposed_name(native: &str) -> &str {
    native.rsplit("::").next().unwrap_or(native)
}

/// What kind of type a descriptor stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    /// A full class with members.
    Class,
    /// A small identifier value returned by mutating operations.
    Handle,
    /// An external type known only by name.
    Opaque,
}

/// Read/write capability of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldAccess {
    ReadOnly,
    ReadWrite,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConstructorDescriptor {
    pub params: Vec<Param>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDescriptor {
    pub name: String,
    /// Native path of the owning type.
    pub owner: String,
    pub data_type: DataType,
    pub access: FieldAccess,
    pub accessor: Accessor,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MethodDescriptor {
    pub name: String,
    pub signature: Signature,
    pub accessor: Accessor,
}

/// Registry record for one reflected type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeDescriptor {
    /// Exposed name, unique within the registry.
    pub name: String,
    /// Native path in the wrapped library.
    pub native: String,
    pub kind: TypeKind,
    pub constructors: Vec<ConstructorDescriptor>,
    pub fields: Vec<FieldDescriptor>,
    pub methods: Vec<MethodDescriptor>,
}

impl TypeDescriptor {
    pub fn new(name: impl Into<String>, native: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            native: native.into(),
            kind,
            constructors: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
        }
    }

    /// A class exposed under its natural name.
    pub fn class(native: &str) -> Self {
        Self::new(exposed_name(native), native, TypeKind::Class)
    }

    /// A handle type with its default constructor.
    pub fn handle(native: &str) -> Self {
        let mut ty = Self::new(exposed_name(native), native, TypeKind::Handle);
        ty.constructors.push(ConstructorDescriptor { params: Vec::new() });
        ty
    }

    pub fn opaque(native: &str) -> Self {
        Self::new(exposed_name(native), native, TypeKind::Opaque)
    }

    // ==========================================================================
    // Members
    // ==========================================================================

    pub fn add_constructor(&mut self, params: Vec<Param>) -> Result<(), RegistrationError> {
        if self.constructors.iter().any(|c| c.params == params) {
            return Err(RegistrationError::DuplicateMethod {
                type_name: self.name.clone(),
                method: "constructor".to_string(),
                signature: param_list(&params),
            });
        }
        self.constructors.push(ConstructorDescriptor { params });
        Ok(())
    }

    pub fn add_field(&mut self, field: FieldDescriptor) -> Result<(), RegistrationError> {
        if self.field(&field.name).is_some() {
            return Err(RegistrationError::DuplicateField {
                type_name: self.name.clone(),
                field: field.name,
            });
        }
        self.fields.push(field);
        Ok(())
    }

    /// Add a method; the same name may repeat with a different signature.
    pub fn add_method(&mut self, method: MethodDescriptor) -> Result<(), RegistrationError> {
        let duplicate = self
            .methods
            .iter()
            .any(|m| m.name == method.name && m.signature == method.signature);
        if duplicate {
            return Err(RegistrationError::DuplicateMethod {
                type_name: self.name.clone(),
                method: method.name,
                signature: method.signature.pointer_spelling(),
            });
        }
        self.methods.push(method);
        Ok(())
    }

    // ==========================================================================
    // Queries
    // ==========================================================================

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// All signatures registered under a method name.
    pub fn methods_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a MethodDescriptor> {
        self.methods.iter().filter(move |m| m.name == name)
    }

    /// The first method with this name.
    pub fn method(&self, name: &str) -> Option<&MethodDescriptor> {
        self.methods.iter().find(|m| m.name == name)
    }

    pub fn has_default_constructor(&self) -> bool {
        self.constructors.iter().any(|c| c.params.is_empty())
    }

    /// Every `(member, named type)` reference held by this descriptor.
    pub fn type_references(&self) -> Vec<(String, &str)> {
        let mut refs = Vec::new();
        for ctor in &self.constructors {
            for param in &ctor.params {
                for ty in param.data_type.named_types() {
                    refs.push((format!("{}::{}", self.name, self.name), ty));
                }
            }
        }
        for field in &self.fields {
            for ty in field.data_type.named_types() {
                refs.push((format!("{}::{}", self.name, field.name), ty));
            }
        }
        for method in &self.methods {
            for ty in method.signature.named_types() {
                refs.push((format!("{}::{}", self.name, method.name), ty));
            }
        }
        refs
    }
}

fn param_list(params: &[Param]) -> String {
    params
        .iter()
        .map(|p| p.data_type.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Registry record for one free function.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionDescriptor {
    /// Exposed name, possibly an alias of the natural name.
    pub name: String,
    /// Native path of the function.
    pub native: String,
    pub signature: Signature,
    pub accessor: Accessor,
}

impl FunctionDescriptor {
    /// A native function exposed under its natural name.
    pub fn native(native: &str, signature: Signature) -> Self {
        Self {
            name: exposed_name(native).to_string(),
            native: native.to_string(),
            signature,
            accessor: Accessor::Symbol(native.to_string()),
        }
    }

    /// Expose under a different name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn type_references(&self) -> impl Iterator<Item = &str> {
        self.signature.named_types()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BaseType;

    fn counter(name: &str, is_const: bool) -> MethodDescriptor {
        MethodDescriptor {
            name: name.to_string(),
            signature: Signature::new(vec![], DataType::simple(BaseType::UInt64)).with_const(is_const),
            accessor: Accessor::Symbol(format!("pmp::SurfaceMesh::{name}")),
        }
    }

    #[test]
    fn handle_has_default_constructor() {
        let vertex = TypeDescriptor::handle("pmp::Vertex");
        assert_eq!(vertex.name, "Vertex");
        assert_eq!(vertex.kind, TypeKind::Handle);
        assert!(vertex.has_default_constructor());
    }

    #[test]
    fn same_method_name_needs_distinct_signature() {
        let mut mesh = TypeDescriptor::class("pmp::SurfaceMesh");
        mesh.add_method(counter("n_vertices", true)).unwrap();
        mesh.add_method(counter("n_vertices", false)).unwrap();
        assert_eq!(mesh.methods_named("n_vertices").count(), 2);

        let err = mesh.add_method(counter("n_vertices", true)).unwrap_err();
        assert!(matches!(err, RegistrationError::DuplicateMethod { .. }));
    }

    #[test]
    fn duplicate_constructor_and_field() {
        let mut point = TypeDescriptor::class("pmp::Point");
        point.add_constructor(vec![]).unwrap();
        assert!(point.add_constructor(vec![]).is_err());

        let field = FieldDescriptor {
            name: "x".into(),
            owner: "pmp::Point".into(),
            data_type: DataType::simple(BaseType::Float32),
            access: FieldAccess::ReadWrite,
            accessor: Accessor::Symbol("pmp::Point::x".into()),
        };
        point.add_field(field.clone()).unwrap();
        let err = point.add_field(field).unwrap_err();
        assert_eq!(
            err,
            RegistrationError::DuplicateField {
                type_name: "Point".into(),
                field: "x".into()
            }
        );
    }

    #[test]
    fn type_references_name_the_member() {
        let mut mesh = TypeDescriptor::class("pmp::SurfaceMesh");
        mesh.add_method(MethodDescriptor {
            name: "add_vertex".into(),
            signature: Signature::new(
                vec![Param::new(DataType::named("pmp::Point").into_const().into_ref())],
                DataType::named("pmp::Vertex"),
            ),
            accessor: Accessor::Symbol("pmp::SurfaceMesh::add_vertex".into()),
        })
        .unwrap();

        let refs = mesh.type_references();
        assert_eq!(
            refs,
            vec![
                ("SurfaceMesh::add_vertex".to_string(), "pmp::Point"),
                ("SurfaceMesh::add_vertex".to_string(), "pmp::Vertex"),
            ]
        );
    }

    #[test]
    fn aliased_function_keeps_native_symbol() {
        let sig = Signature::new(vec![], DataType::void());
        let f = FunctionDescriptor::native("pmp::triangulate", sig).with_name("triangulate_face");
        assert_eq!(f.name, "triangulate_face");
        assert_eq!(f.accessor.symbol(), Some("pmp::triangulate"));
    }
}
