//! Registry - the catalog of reflected types and functions.
//!
//! This module provides [`Registry`], the store every registration call
//! writes to and the generator reads from.
//!
//! # Storage Model
//!
//! - **Types**: `TypeDescriptor`s in declaration order, indexed by exposed
//!   name and by native path.
//! - **Functions**: `FunctionDescriptor`s in declaration order, indexed by
//!   exposed name. One descriptor per exposed name; overloads of a native
//!   name are exposed under distinct aliases.
//!
//! # Phases
//!
//! The registry is populated single-threaded during the registration phase
//! and is read-only afterwards. [`Registry::seal`] marks the boundary: any
//! registration after it fails with [`RegistrationError::Sealed`]. The
//! process-wide instance lives in [`crate::global`].
//!
//! # Example
//!
//! ```
//! use meshbind_core::TypeDescriptor;
//! use meshbind_registry::Registry;
//!
//! let mut registry = Registry::new();
//! registry.register_type(TypeDescriptor::handle("pmp::Vertex")).unwrap();
//!
//! assert!(registry.lookup_type("Vertex").is_some());
//! assert!(registry.lookup_function("decimate").is_empty());
//! ```

use log::debug;
use rustc_hash::FxHashMap;
use serde::Serialize;

use meshbind_core::{
    BaseType, DataType, FunctionDescriptor, RegistrationError, TypeDescriptor,
};

/// Catalog of reflected types and functions.
#[derive(Debug, Default, Serialize)]
pub struct Registry {
    types: Vec<TypeDescriptor>,
    functions: Vec<FunctionDescriptor>,

    /// Exposed type name -> index into `types`.
    #[serde(skip)]
    type_index: FxHashMap<String, usize>,
    /// Native type path -> index into `types`.
    #[serde(skip)]
    native_index: FxHashMap<String, usize>,
    /// Exposed function name -> index into `functions`.
    #[serde(skip)]
    function_index: FxHashMap<String, usize>,

    #[serde(skip)]
    sealed: bool,
}

impl Registry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    // ==========================================================================
    // Registration
    // ==========================================================================

    fn ensure_open(&self, name: &str) -> Result<(), RegistrationError> {
        if self.sealed {
            Err(RegistrationError::Sealed(name.to_string()))
        } else {
            Ok(())
        }
    }

    /// Register a type descriptor.
    ///
    /// Fails if the exposed name or the native path is already taken, or if
    /// any member refers to a type that is neither registered nor the type
    /// itself.
    pub fn register_type(&mut self, descriptor: TypeDescriptor) -> Result<(), RegistrationError> {
        self.ensure_open(&descriptor.name)?;

        if self.type_index.contains_key(&descriptor.name) {
            return Err(RegistrationError::DuplicateType(descriptor.name));
        }
        if let Some(&idx) = self.native_index.get(&descriptor.native) {
            return Err(RegistrationError::DuplicateNativeType {
                native: descriptor.native,
                existing: self.types[idx].name.clone(),
            });
        }

        for (owner, type_name) in descriptor.type_references() {
            if type_name != descriptor.native && !self.native_index.contains_key(type_name) {
                return Err(RegistrationError::UnknownType {
                    owner,
                    type_name: type_name.to_string(),
                });
            }
        }

        debug!(
            "registered {:?} '{}' ({}): {} constructors, {} fields, {} methods",
            descriptor.kind,
            descriptor.name,
            descriptor.native,
            descriptor.constructors.len(),
            descriptor.fields.len(),
            descriptor.methods.len()
        );

        let idx = self.types.len();
        self.type_index.insert(descriptor.name.clone(), idx);
        self.native_index.insert(descriptor.native.clone(), idx);
        self.types.push(descriptor);
        Ok(())
    }

    /// Declare an external type known only by its native path.
    pub fn register_opaque(&mut self, native: &str) -> Result<(), RegistrationError> {
        self.register_type(TypeDescriptor::opaque(native))
    }

    /// Register a free function under its exposed name.
    pub fn register_function(
        &mut self,
        descriptor: FunctionDescriptor,
    ) -> Result<(), RegistrationError> {
        self.ensure_open(&descriptor.name)?;

        if self.function_index.contains_key(&descriptor.name) {
            return Err(RegistrationError::DuplicateFunction(descriptor.name));
        }
        if let Some(type_name) = descriptor
            .type_references()
            .find(|t| !self.native_index.contains_key(*t))
        {
            return Err(RegistrationError::UnknownType {
                owner: descriptor.name.clone(),
                type_name: type_name.to_string(),
            });
        }

        debug!(
            "registered function '{}' -> {} {}",
            descriptor.name,
            descriptor.native,
            descriptor.signature.pointer_spelling()
        );

        self.function_index
            .insert(descriptor.name.clone(), self.functions.len());
        self.functions.push(descriptor);
        Ok(())
    }

    /// End the registration phase.
    pub fn seal(&mut self) {
        self.sealed = true;
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    // ==========================================================================
    // Lookup
    // ==========================================================================

    /// Get a type by exposed name.
    pub fn lookup_type(&self, name: &str) -> Option<&TypeDescriptor> {
        self.type_index.get(name).map(|&idx| &self.types[idx])
    }

    /// Get a type by native path.
    pub fn lookup_native_type(&self, native: &str) -> Option<&TypeDescriptor> {
        self.native_index.get(native).map(|&idx| &self.types[idx])
    }

    /// Check if a type exists by exposed name.
    pub fn contains_type(&self, name: &str) -> bool {
        self.type_index.contains_key(name)
    }

    /// Get the functions exposed under `name`; empty when absent.
    pub fn lookup_function(&self, name: &str) -> &[FunctionDescriptor] {
        match self.function_index.get(name) {
            Some(&idx) => std::slice::from_ref(&self.functions[idx]),
            None => &[],
        }
    }

    /// Resolve the descriptor a named data type refers to.
    pub fn resolve(&self, data_type: &DataType) -> Option<&TypeDescriptor> {
        match &data_type.base {
            BaseType::Named(native) => self.lookup_native_type(native),
            _ => None,
        }
    }

    /// All types in declaration order.
    pub fn types(&self) -> impl Iterator<Item = &TypeDescriptor> {
        self.types.iter()
    }

    /// All functions in declaration order.
    pub fn functions(&self) -> impl Iterator<Item = &FunctionDescriptor> {
        self.functions.iter()
    }

    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    pub fn function_count(&self) -> usize {
        self.functions.len()
    }

    // ==========================================================================
    // Validation
    // ==========================================================================

    /// Check that every named type referenced anywhere is registered.
    ///
    /// Registration already enforces this per descriptor; the generator calls
    /// it once more before reading, and gets every violation at once.
    pub fn validate(&self) -> Result<(), Vec<RegistrationError>> {
        let mut errors = Vec::new();

        for ty in &self.types {
            for (owner, type_name) in ty.type_references() {
                if !self.native_index.contains_key(type_name) {
                    errors.push(RegistrationError::UnknownType {
                        owner,
                        type_name: type_name.to_string(),
                    });
                }
            }
        }
        for func in &self.functions {
            for type_name in func.type_references() {
                if !self.native_index.contains_key(type_name) {
                    errors.push(RegistrationError::UnknownType {
                        owner: func.name.clone(),
                        type_name: type_name.to_string(),
                    });
                }
            }
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}
