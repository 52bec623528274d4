//! Fluent registration API.
//!
//! [`Registrar`] pairs a [`Registry`] with the wrapped library's
//! [`NativeCatalog`] and offers the declaration surface: classes through
//! [`ClassBuilder`], free functions by symbol, and overloaded functions by
//! explicit function-pointer signature.
//!
//! # Example
//!
//! ```
//! use meshbind_registry::{NativeCatalog, Registrar, Registry};
//!
//! let mut catalog = NativeCatalog::new();
//! catalog.declare_class("pmp::Vertex").constructor("()").unwrap();
//! catalog
//!     .declare_class("pmp::SurfaceMesh")
//!     .constructor("()").unwrap()
//!     .method("pmp::Vertex add_vertex(const pmp::Point& p)").unwrap();
//! catalog.declare_class("pmp::Point").constructor("()").unwrap();
//! catalog.declare_function("void pmp::triangulate(pmp::SurfaceMesh& mesh)").unwrap();
//! catalog.declare_function("void pmp::triangulate(pmp::SurfaceMesh& mesh, pmp::Face f)").unwrap();
//! catalog.declare_class("pmp::Face").constructor("()").unwrap();
//!
//! let mut registry = Registry::new();
//! let mut reg = Registrar::new(&mut registry, &catalog);
//! reg.register_handle("pmp::Vertex").unwrap();
//! reg.register_handle("pmp::Face").unwrap();
//! reg.register_class("pmp::Point").unwrap().constructor("()").unwrap().build().unwrap();
//! reg.register_class("pmp::SurfaceMesh")
//!     .unwrap()
//!     .constructor("()").unwrap()
//!     .method("add_vertex", "pmp::SurfaceMesh::add_vertex").unwrap()
//!     .build()
//!     .unwrap();
//! reg.register_overloaded_function("pmp::triangulate", "void (*)(pmp::SurfaceMesh&)").unwrap();
//! reg.register_overloaded_function_as(
//!     "pmp::triangulate",
//!     "triangulate_face",
//!     "void (*)(pmp::SurfaceMesh&, pmp::Face)",
//! ).unwrap();
//!
//! assert_eq!(registry.lookup_function("triangulate_face")[0].signature.param_count(), 2);
//! ```

use log::debug;

use meshbind_core::decl::{parse_declaration, parse_params, parse_signature};
use meshbind_core::{
    Accessor, CallArgs, CallError, Computation, DataType, FieldDescriptor, FunctionDescriptor,
    MethodDescriptor, NativeValue, RegistrationError, Signature, TypeDescriptor, TypeKind, Value,
    exposed_name,
};

use crate::catalog::split_member;
use crate::{NativeCatalog, Registry};

/// Pick one overload, either the only one or the one matching `wanted`.
fn select_overload(
    name: &str,
    overloads: &[Signature],
    wanted: Option<&Signature>,
) -> Result<Signature, RegistrationError> {
    if overloads.is_empty() {
        return Err(RegistrationError::UnknownSymbol(name.to_string()));
    }
    match wanted {
        None if overloads.len() == 1 => Ok(overloads[0].clone()),
        None => Err(RegistrationError::AmbiguousOverload {
            name: name.to_string(),
            candidates: overloads.iter().map(Signature::pointer_spelling).collect(),
        }),
        Some(wanted) => overloads
            .iter()
            .find(|sig| *sig == wanted)
            .cloned()
            .ok_or_else(|| RegistrationError::NoMatchingOverload {
                name: name.to_string(),
                signature: wanted.pointer_spelling(),
            }),
    }
}

/// Entry point for declaring types and functions.
pub struct Registrar<'r> {
    registry: &'r mut Registry,
    catalog: &'r NativeCatalog,
}

impl<'r> Registrar<'r> {
    pub fn new(registry: &'r mut Registry, catalog: &'r NativeCatalog) -> Self {
        Self { registry, catalog }
    }

    pub fn registry(&self) -> &Registry {
        self.registry
    }

    // ==========================================================================
    // Types
    // ==========================================================================

    /// Begin declaring a class exposed under its natural name.
    pub fn register_class(&mut self, native: &str) -> Result<ClassBuilder<'_>, RegistrationError> {
        self.register_class_as(native, exposed_name(native))
    }

    /// Begin declaring a class under an explicit exposed name.
    ///
    /// Fails straight away when the name is taken.
    pub fn register_class_as(
        &mut self,
        native: &str,
        name: &str,
    ) -> Result<ClassBuilder<'_>, RegistrationError> {
        if self.registry.is_sealed() {
            return Err(RegistrationError::Sealed(name.to_string()));
        }
        if self.registry.contains_type(name) {
            return Err(RegistrationError::DuplicateType(name.to_string()));
        }
        Ok(ClassBuilder {
            registry: &mut *self.registry,
            catalog: self.catalog,
            descriptor: TypeDescriptor::new(name, native, TypeKind::Class),
        })
    }

    /// Declare a handle type with its default constructor.
    pub fn register_handle(&mut self, native: &str) -> Result<(), RegistrationError> {
        self.register_class(native)?
            .kind(TypeKind::Handle)
            .constructor("()")?
            .build()
    }

    /// Declare an external type known only by name.
    pub fn register_opaque(&mut self, native: &str) -> Result<(), RegistrationError> {
        self.registry.register_opaque(native)
    }

    // ==========================================================================
    // Functions
    // ==========================================================================

    /// Register a non-overloaded native function under its natural name.
    pub fn register_function(&mut self, symbol: &str) -> Result<(), RegistrationError> {
        let signature = select_overload(symbol, self.catalog.function_overloads(symbol), None)?;
        self.registry
            .register_function(FunctionDescriptor::native(symbol, signature))
    }

    /// Register one overload, chosen by a function-pointer signature such as
    /// `void (*)(pmp::SurfaceMesh&)`.
    pub fn register_overloaded_function(
        &mut self,
        symbol: &str,
        signature: &str,
    ) -> Result<(), RegistrationError> {
        self.register_overloaded_function_as(symbol, exposed_name(symbol), signature)
    }

    /// Register one overload under an alternate exposed name.
    pub fn register_overloaded_function_as(
        &mut self,
        symbol: &str,
        name: &str,
        signature: &str,
    ) -> Result<(), RegistrationError> {
        let wanted = parse_signature(signature)?;
        let signature =
            select_overload(symbol, self.catalog.function_overloads(symbol), Some(&wanted))?;
        self.registry
            .register_function(FunctionDescriptor::native(symbol, signature).with_name(name))
    }

    /// Register a free function implemented by a computation.
    ///
    /// The declaration names the function and fixes its signature, e.g.
    /// `pmp::SurfaceMesh copy_mesh(const pmp::SurfaceMesh& src)`.
    pub fn register_native_function<F>(&mut self, decl: &str, f: F) -> Result<(), RegistrationError>
    where
        F: Fn(&mut CallArgs) -> Result<Value, CallError> + Send + Sync + 'static,
    {
        let parsed = parse_declaration(decl)?;
        let native = parsed.name.ok_or_else(|| RegistrationError::InvalidDeclaration {
            decl: decl.to_string(),
            offset: 0,
            message: "a function declaration needs a name".to_string(),
        })?;
        self.registry.register_function(FunctionDescriptor {
            name: exposed_name(&native).to_string(),
            native,
            signature: parsed.signature,
            accessor: Accessor::Computation(Computation::new(f)),
        })
    }
}

/// Builder for one class declaration.
///
/// Created by [`Registrar::register_class`]. Each call returns the builder;
/// nothing reaches the registry until [`ClassBuilder::build`].
pub struct ClassBuilder<'a> {
    registry: &'a mut Registry,
    catalog: &'a NativeCatalog,
    descriptor: TypeDescriptor,
}

impl<'a> ClassBuilder<'a> {
    /// Override the type kind (classes are the default).
    pub fn kind(mut self, kind: TypeKind) -> Self {
        self.descriptor.kind = kind;
        self
    }

    /// Fail unless every named type in `signature` is registered or is this type.
    fn check_types(&self, member: &str, signature: &Signature) -> Result<(), RegistrationError> {
        for type_name in signature.named_types() {
            if type_name != self.descriptor.native
                && self.registry.lookup_native_type(type_name).is_none()
            {
                return Err(RegistrationError::UnknownType {
                    owner: format!("{}::{}", self.descriptor.name, member),
                    type_name: type_name.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Fail unless `owner` is the native class being declared.
    fn check_owner(&self, member: &str, owner: &str) -> Result<(), RegistrationError> {
        if owner != self.descriptor.native {
            return Err(RegistrationError::ForeignMember {
                type_name: self.descriptor.name.clone(),
                member: member.to_string(),
                owner: owner.to_string(),
            });
        }
        Ok(())
    }

    /// Resolve `symbol` to its member name, checking it belongs to this class.
    fn own_member<'s>(&self, symbol: &'s str) -> Result<&'s str, RegistrationError> {
        let (class, member) = split_member(symbol)
            .ok_or_else(|| RegistrationError::UnknownSymbol(symbol.to_string()))?;
        self.check_owner(symbol, class)?;
        Ok(member)
    }

    /// Add a constructor by parameter list, `()` or `(float, float, float)`.
    ///
    /// When the catalog declares this class, the list must match one of its
    /// native constructors.
    pub fn constructor(mut self, params: &str) -> Result<Self, RegistrationError> {
        let params = parse_params(params)?;
        if let Some(class) = self.catalog.class(&self.descriptor.native) {
            if !class.has_constructor(&params) {
                return Err(RegistrationError::NoMatchingConstructor {
                    type_name: self.descriptor.name.clone(),
                    params: params
                        .iter()
                        .map(|p| p.data_type.to_string())
                        .collect::<Vec<_>>()
                        .join(", "),
                });
            }
        }
        self.check_types(
            &self.descriptor.name,
            &Signature::new(params.clone(), DataType::void()),
        )?;
        self.descriptor.add_constructor(params)?;
        Ok(self)
    }

    /// Expose a native field; type and access come from the catalog.
    pub fn field(mut self, name: &str, symbol: &str) -> Result<Self, RegistrationError> {
        let catalog = self.catalog;
        let member = self.own_member(symbol)?;
        let native = catalog
            .field(&self.descriptor.native, member)
            .ok_or_else(|| RegistrationError::UnknownSymbol(symbol.to_string()))?;

        self.check_types(name, &Signature::new(vec![], native.data_type.clone()))?;
        self.descriptor.add_field(FieldDescriptor {
            name: name.to_string(),
            owner: self.descriptor.native.clone(),
            data_type: native.data_type.clone(),
            access: native.access,
            accessor: Accessor::Symbol(symbol.to_string()),
        })?;
        debug!("  field {}::{name} -> {symbol}", self.descriptor.name);
        Ok(self)
    }

    /// Expose a non-overloaded native method.
    pub fn method(self, name: &str, symbol: &str) -> Result<Self, RegistrationError> {
        self.own_member(symbol)?;
        let signature = select_overload(symbol, self.catalog.method_overloads(symbol), None)?;
        self.push_method(name, signature, Accessor::Symbol(symbol.to_string()))
    }

    /// Expose one overload of a native method, chosen by signature.
    ///
    /// Both the plain shape `bool (*)() const` and the member-pointer shape
    /// `bool (pmp::SurfaceMesh::*)() const` are accepted; the class of a
    /// member pointer must be this one.
    pub fn overloaded_method(
        self,
        name: &str,
        symbol: &str,
        signature: &str,
    ) -> Result<Self, RegistrationError> {
        self.own_member(symbol)?;
        let parsed = parse_declaration(signature)?;
        if let Some(owner) = &parsed.owner {
            self.check_owner(symbol, owner)?;
        }
        let wanted = parsed.signature;
        let signature =
            select_overload(symbol, self.catalog.method_overloads(symbol), Some(&wanted))?;
        self.push_method(name, signature, Accessor::Symbol(symbol.to_string()))
    }

    /// Add a synthesized read-only method backed by a closure.
    ///
    /// `R` is the declared return type; the closure must produce exactly an
    /// `R`. The closure runs when a consumer calls the method, never here.
    pub fn lambda_method_const<R, S>(
        self,
        name: &str,
        f: impl Fn(&S) -> R + Send + Sync + 'static,
    ) -> Result<Self, RegistrationError>
    where
        R: NativeValue,
        S: NativeValue,
    {
        self.check_receiver::<S>(name)?;
        let computation = Computation::new(
            move |args: &mut CallArgs| -> Result<Value, CallError> {
                let receiver = args.object::<S>(0)?;
                Ok(f(receiver).into_value())
            },
        );
        let signature = Signature::new(vec![], R::data_type()).with_const(true);
        self.push_method(name, signature, Accessor::Computation(computation))
    }

    /// Add a synthesized method that may mutate its receiver.
    pub fn lambda_method<R, S>(
        self,
        name: &str,
        f: impl Fn(&mut S) -> R + Send + Sync + 'static,
    ) -> Result<Self, RegistrationError>
    where
        R: NativeValue,
        S: NativeValue,
    {
        self.check_receiver::<S>(name)?;
        let computation = Computation::new(
            move |args: &mut CallArgs| -> Result<Value, CallError> {
                let receiver = args.object_mut::<S>(0)?;
                Ok(f(receiver).into_value())
            },
        );
        let signature = Signature::new(vec![], R::data_type());
        self.push_method(name, signature, Accessor::Computation(computation))
    }

    fn check_receiver<S: NativeValue>(&self, method: &str) -> Result<(), RegistrationError> {
        let receiver = S::data_type();
        if receiver != DataType::named(self.descriptor.native.as_str()) {
            return Err(RegistrationError::ReceiverMismatch {
                type_name: self.descriptor.name.clone(),
                method: method.to_string(),
                receiver: receiver.to_string(),
            });
        }
        Ok(())
    }

    fn push_method(
        mut self,
        name: &str,
        signature: Signature,
        accessor: Accessor,
    ) -> Result<Self, RegistrationError> {
        self.check_types(name, &signature)?;
        debug!(
            "  method {}::{name} {}",
            self.descriptor.name,
            signature.pointer_spelling()
        );
        self.descriptor.add_method(MethodDescriptor {
            name: name.to_string(),
            signature,
            accessor,
        })?;
        Ok(self)
    }

    /// Commit the declaration to the registry.
    pub fn build(self) -> Result<(), RegistrationError> {
        self.registry.register_type(self.descriptor)
    }
}
