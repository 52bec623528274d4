//! Registry and registration API for meshbind.
//!
//! - [`Registry`]: descriptor storage with lookup, sealing and validation
//! - [`GlobalRegistry`]: the process-wide instance behind [`Registry::instance`]
//! - [`NativeCatalog`]: the wrapped library's declared symbols
//! - [`Registrar`] / [`ClassBuilder`]: the fluent declaration surface

mod builder;
mod catalog;
mod global;
mod registry;

pub use builder::{ClassBuilder, Registrar};
pub use catalog::{ClassDecl, NativeCatalog, NativeClass, NativeField, split_member};
pub use global::GlobalRegistry;
pub use registry::Registry;

// Re-export the data model so downstream crates need one import path.
pub use meshbind_core::*;
