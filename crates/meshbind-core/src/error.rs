//! Error types for registration and deferred computations.
//!
//! ```text
//! RegistrationError - structural errors raised while the registry is populated
//! CallError         - failures of a stored computation when a consumer invokes it
//! ```
//!
//! Registration errors are programmer errors. They are detected once at
//! process start and are never retried; the driver aborts before the
//! generator runs.

use thiserror::Error;

// ============================================================================
// Registration Errors
// ============================================================================

/// Errors raised while declaring types and functions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    /// A type with this exposed name already exists.
    #[error("duplicate type: {0}")]
    DuplicateType(String),

    /// A type with this native path is already registered under another name.
    #[error("native type '{native}' already registered as '{existing}'")]
    DuplicateNativeType {
        /// The native path.
        native: String,
        /// The exposed name it was first registered under.
        existing: String,
    },

    /// A function with this exposed name already exists.
    #[error("duplicate function: {0}")]
    DuplicateFunction(String),

    /// A method with the same name and signature already exists on the type.
    #[error("duplicate method '{method}' with signature {signature} on type '{type_name}'")]
    DuplicateMethod {
        type_name: String,
        method: String,
        signature: String,
    },

    /// A field with this name already exists on the type.
    #[error("duplicate field '{field}' on type '{type_name}'")]
    DuplicateField { type_name: String, field: String },

    /// A descriptor refers to a type that is not registered.
    #[error("'{owner}' refers to unregistered type '{type_name}'")]
    UnknownType {
        /// The type, member or function holding the reference.
        owner: String,
        /// The native path that could not be resolved.
        type_name: String,
    },

    /// The native library does not declare this symbol.
    #[error("unknown native symbol: {0}")]
    UnknownSymbol(String),

    /// The symbol is overloaded and no explicit signature was given.
    #[error("'{name}' is overloaded, an explicit signature is required (candidates: {})", candidates.join("; "))]
    AmbiguousOverload {
        name: String,
        /// Every overload, spelled as a function-pointer type.
        candidates: Vec<String>,
    },

    /// No overload matches the explicit signature.
    #[error("no overload of '{name}' matches {signature}")]
    NoMatchingOverload { name: String, signature: String },

    /// The native class declares no constructor with these parameters.
    #[error("type '{type_name}' has no constructor ({params})")]
    NoMatchingConstructor { type_name: String, params: String },

    /// A synthesized method's receiver is not the type being declared.
    #[error("method '{method}' on '{type_name}' takes a receiver of type '{receiver}'")]
    ReceiverMismatch {
        type_name: String,
        method: String,
        receiver: String,
    },

    /// A member symbol or member-pointer signature names another class.
    #[error("member '{member}' of '{owner}' cannot be exposed on '{type_name}'")]
    ForeignMember {
        type_name: String,
        member: String,
        owner: String,
    },

    /// A declaration string could not be parsed.
    #[error("invalid declaration '{decl}' at offset {offset}: {message}")]
    InvalidDeclaration {
        decl: String,
        offset: usize,
        message: String,
    },

    /// The registration phase has ended.
    #[error("registry is sealed, cannot register '{0}'")]
    Sealed(String),
}

impl RegistrationError {
    /// The name of the offending type, function or declaration.
    pub fn subject(&self) -> &str {
        match self {
            RegistrationError::DuplicateType(name)
            | RegistrationError::DuplicateFunction(name)
            | RegistrationError::UnknownSymbol(name)
            | RegistrationError::Sealed(name) => name,
            RegistrationError::DuplicateNativeType { native, .. } => native,
            RegistrationError::DuplicateMethod { method, .. } => method,
            RegistrationError::DuplicateField { field, .. } => field,
            RegistrationError::UnknownType { type_name, .. } => type_name,
            RegistrationError::AmbiguousOverload { name, .. }
            | RegistrationError::NoMatchingOverload { name, .. } => name,
            RegistrationError::NoMatchingConstructor { type_name, .. } => type_name,
            RegistrationError::ReceiverMismatch { method, .. } => method,
            RegistrationError::ForeignMember { member, .. } => member,
            RegistrationError::InvalidDeclaration { decl, .. } => decl,
        }
    }
}

// ============================================================================
// Call Errors
// ============================================================================

/// Errors raised when a stored computation is invoked.
#[derive(Debug, Error)]
pub enum CallError {
    /// Fewer arguments than the computation reads.
    #[error("expected at least {expected} arguments, got {got}")]
    ArgumentCount { expected: usize, got: usize },

    /// An argument had an unexpected dynamic type.
    #[error("argument {index}: expected {expected}, got {got}")]
    ArgumentType {
        index: usize,
        expected: &'static str,
        got: &'static str,
    },

    /// The computation itself failed.
    #[error("{0}")]
    Failed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ambiguous_overload_lists_candidates() {
        let err = RegistrationError::AmbiguousOverload {
            name: "pmp::triangulate".into(),
            candidates: vec![
                "void (*)(pmp::SurfaceMesh&)".into(),
                "void (*)(pmp::SurfaceMesh&, pmp::Face)".into(),
            ],
        };
        let msg = err.to_string();
        assert!(msg.contains("pmp::triangulate"));
        assert!(msg.contains("void (*)(pmp::SurfaceMesh&, pmp::Face)"));
        assert_eq!(err.subject(), "pmp::triangulate");
    }

    #[test]
    fn unknown_type_names_both_sides() {
        let err = RegistrationError::UnknownType {
            owner: "SurfaceMesh::add_vertex".into(),
            type_name: "pmp::Vertex".into(),
        };
        assert_eq!(
            err.to_string(),
            "'SurfaceMesh::add_vertex' refers to unregistered type 'pmp::Vertex'"
        );
    }
}
