//! meshbind: reflection registration for the PMP surface-mesh library.
//!
//! The crate declares the library's handle types, classes, fields,
//! constructors, methods and free functions into the process-wide
//! [`Registry`], then hands the sealed registry to a [`Generator`].
//!
//! ```no_run
//! use meshbind::{Generator, ManifestGenerator, Registry, register_all};
//!
//! register_all().unwrap();
//! let global = Registry::instance();
//! global.seal();
//!
//! let args: Vec<String> = std::env::args().collect();
//! let code = ManifestGenerator::new().run(&global.read(), &args);
//! std::process::exit(code);
//! ```

pub mod generator;
pub mod registration;

pub use generator::{GeneratorError, Generator, ManifestGenerator};
pub use registration::{register_all, register_into};

pub use meshbind_registry::{Registrar, Registry};
