//! Core data model for meshbind.
//!
//! This crate holds everything the registry stores and the generator reads:
//!
//! - [`DataType`] / [`Signature`]: semantic types of parameters, returns and fields
//! - [`decl`]: the declaration-string parser used to spell native signatures
//! - [`TypeDescriptor`] / [`FunctionDescriptor`]: the stored records
//! - [`Accessor`] / [`Computation`]: what a generator binds a member to
//! - [`Value`] / [`CallArgs`]: the dynamic values computations work on
//! - [`RegistrationError`] / [`CallError`]

mod accessor;
mod data_type;
pub mod decl;
mod descriptor;
mod error;
mod signature;
mod value;

pub use accessor::{Accessor, Compute, Computation};
pub use data_type::{BaseType, DataType, Reference};
pub use descriptor::{
    ConstructorDescriptor, FieldAccess, FieldDescriptor, FunctionDescriptor, MethodDescriptor,
    TypeDescriptor, TypeKind, exposed_name,
};
pub use error::{CallError, RegistrationError};
pub use signature::{Param, Signature};
pub use value::{CallArgs, NativeValue, Value};
