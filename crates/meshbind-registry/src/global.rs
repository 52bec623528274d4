//! The process-wide registry instance.
//!
//! Exactly one [`GlobalRegistry`] exists per process. It is built on first
//! access and lives until exit. The lock exists because a Rust static must be
//! `Sync`; the registration and generator phases never overlap, so it is
//! never contended.
//!
//! ```
//! use meshbind_core::TypeDescriptor;
//! use meshbind_registry::Registry;
//!
//! let global = Registry::instance();
//! global
//!     .register(|registry| registry.register_type(TypeDescriptor::handle("doc::Marker")))
//!     .unwrap();
//! assert!(global.read().lookup_type("Marker").is_some());
//! ```

use lazy_static::lazy_static;
use log::info;
use parking_lot::{MappedRwLockReadGuard, RwLock, RwLockReadGuard};

use meshbind_core::RegistrationError;

use crate::Registry;

lazy_static! {
    static ref INSTANCE: GlobalRegistry = GlobalRegistry::new();
}

/// The shared registry, split into a write phase and a read phase.
pub struct GlobalRegistry {
    inner: RwLock<State>,
}

struct State {
    registry: Registry,
    // set once a `register_once` closure has succeeded
    populated: bool,
}

impl GlobalRegistry {
    fn new() -> Self {
        Self {
            inner: RwLock::new(State {
                registry: Registry::new(),
                populated: false,
            }),
        }
    }

    /// Run a registration closure with exclusive access.
    ///
    /// Code running inside the closure must use the `&mut Registry` it is
    /// given rather than calling `register` again; `Registry::instance()`
    /// itself is always safe to call.
    pub fn register<R>(
        &self,
        f: impl FnOnce(&mut Registry) -> Result<R, RegistrationError>,
    ) -> Result<R, RegistrationError> {
        let mut state = self.inner.write();
        f(&mut state.registry)
    }

    /// Run `f` unless an earlier `register_once` call already succeeded.
    ///
    /// Returns `Ok(false)` without calling `f` when the registry is already
    /// populated. A failed `f` leaves the instance unpopulated.
    pub fn register_once(
        &self,
        f: impl FnOnce(&mut Registry) -> Result<(), RegistrationError>,
    ) -> Result<bool, RegistrationError> {
        let mut state = self.inner.write();
        if state.populated {
            return Ok(false);
        }
        f(&mut state.registry)?;
        state.populated = true;
        Ok(true)
    }

    pub fn is_populated(&self) -> bool {
        self.inner.read().populated
    }

    /// End the registration phase. Idempotent.
    pub fn seal(&self) {
        let mut state = self.inner.write();
        let registry = &mut state.registry;
        if !registry.is_sealed() {
            registry.seal();
            info!(
                "registry sealed with {} types and {} functions",
                registry.type_count(),
                registry.function_count()
            );
        }
    }

    pub fn is_sealed(&self) -> bool {
        self.inner.read().registry.is_sealed()
    }

    /// Shared read access for the generator phase.
    pub fn read(&self) -> MappedRwLockReadGuard<'_, Registry> {
        RwLockReadGuard::map(self.inner.read(), |state| &state.registry)
    }
}

impl Registry {
    /// The process-wide instance, constructed on first call.
    pub fn instance() -> &'static GlobalRegistry {
        &INSTANCE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instance_is_a_singleton() {
        let a = Registry::instance() as *const GlobalRegistry;
        let b = Registry::instance() as *const GlobalRegistry;
        assert_eq!(a, b);
    }

    #[test]
    fn instance_is_reachable_during_registration() {
        use meshbind_core::TypeDescriptor;

        Registry::instance()
            .register(|registry| {
                // nested access only hands out the static
                let nested = Registry::instance() as *const GlobalRegistry;
                assert!(!nested.is_null());
                registry.register_type(TypeDescriptor::handle("global_test::Token"))
            })
            .unwrap();
        assert!(Registry::instance().read().lookup_type("Token").is_some());
    }

    #[test]
    fn register_once_runs_a_single_time() {
        use meshbind_core::TypeDescriptor;

        let global = Registry::instance();
        let failed = global.register_once(|_| Err(RegistrationError::UnknownSymbol("x".into())));
        assert!(failed.is_err());
        assert!(!global.is_populated());

        let first = global
            .register_once(|registry| registry.register_type(TypeDescriptor::handle("once::A")))
            .unwrap();
        assert!(first);
        assert!(global.is_populated());

        let second = global
            .register_once(|registry| registry.register_type(TypeDescriptor::handle("once::A")))
            .unwrap();
        assert!(!second);
        assert_eq!(
            global.read().types().filter(|t| t.name == "A").count(),
            1
        );
    }
}
