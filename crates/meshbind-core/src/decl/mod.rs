//! Declaration strings.
//!
//! Native signatures are written the way the wrapped library spells them and
//! parsed into [`Signature`]s and [`DataType`]s:
//!
//! ```text
//! void pmp::triangulate(pmp::SurfaceMesh& mesh, pmp::Face f)   named function
//! void (*)(pmp::SurfaceMesh&)                                 function pointer
//! bool (pmp::SurfaceMesh::*)() const                          member pointer
//! (float, float, float)                                       parameter list
//! const bool use_binary                                       field
//! ```
//!
//! The pointer shapes are how a declarer selects one overload of a native
//! name; parameter names and default values are accepted anywhere and kept
//! for documentation.

mod lexer;
mod parser;

use crate::{DataType, Param, RegistrationError, Signature};
use parser::Parser;

/// A parse failure inside a declaration, before it is attached to the text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclError {
    pub offset: usize,
    pub message: String,
}

impl DeclError {
    fn into_registration(self, decl: &str) -> RegistrationError {
        RegistrationError::InvalidDeclaration {
            decl: decl.to_string(),
            offset: self.offset,
            message: self.message,
        }
    }
}

/// A parsed callable declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    /// Declared name, absent for pointer shapes.
    pub name: Option<String>,
    /// Owning class of a member-function-pointer shape.
    pub owner: Option<String>,
    pub signature: Signature,
}

fn run<T>(
    decl: &str,
    f: impl FnOnce(&mut Parser<'_>) -> Result<T, DeclError>,
) -> Result<T, RegistrationError> {
    let parse = || {
        let mut parser = Parser::new(decl)?;
        let value = f(&mut parser)?;
        parser.expect_end()?;
        Ok(value)
    };
    parse().map_err(|e: DeclError| e.into_registration(decl))
}

/// Parse a function, method or pointer-shaped declaration.
pub fn parse_declaration(decl: &str) -> Result<Declaration, RegistrationError> {
    run(decl, |p| p.declaration())
}

/// Parse a signature, discarding any declared name.
pub fn parse_signature(decl: &str) -> Result<Signature, RegistrationError> {
    parse_declaration(decl).map(|d| d.signature)
}

/// Parse a parenthesised parameter list.
pub fn parse_params(decl: &str) -> Result<Vec<Param>, RegistrationError> {
    run(decl, |p| p.params())
}

/// Parse a field declaration, `type name`.
pub fn parse_field(decl: &str) -> Result<(String, DataType), RegistrationError> {
    run(decl, |p| p.field())
}

/// Parse a lone type.
pub fn parse_type(decl: &str) -> Result<DataType, RegistrationError> {
    run(decl, |p| p.data_type())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BaseType, Reference};

    #[test]
    fn named_function() {
        let decl =
            parse_declaration("void pmp::triangulate(pmp::SurfaceMesh& mesh, pmp::Face f)").unwrap();
        assert_eq!(decl.name.as_deref(), Some("pmp::triangulate"));
        assert_eq!(decl.owner, None);
        assert_eq!(decl.signature.param_count(), 2);
        assert_eq!(
            decl.signature.params[0].data_type,
            DataType::named("pmp::SurfaceMesh").into_ref()
        );
        assert_eq!(decl.signature.params[1].name.as_deref(), Some("f"));
        assert!(decl.signature.return_type.is_void());
    }

    #[test]
    fn function_pointer_matches_named_form() {
        let pointer = parse_signature("void (*)(pmp::SurfaceMesh &, pmp::Face)").unwrap();
        let named = parse_signature("void triangulate(pmp::SurfaceMesh& mesh, pmp::Face f)").unwrap();
        assert_eq!(pointer, named);
    }

    #[test]
    fn member_pointer_with_const() {
        let decl = parse_declaration("bool (pmp::SurfaceMesh::*)() const").unwrap();
        assert_eq!(decl.owner.as_deref(), Some("pmp::SurfaceMesh"));
        assert!(decl.signature.is_const);
        assert_eq!(decl.signature.return_type, DataType::simple(BaseType::Bool));
    }

    #[test]
    fn defaults_are_kept_verbatim() {
        let sig = parse_signature(
            "void curvature(pmp::SurfaceMesh& mesh, pmp::Curvature c = pmp::Curvature::mean, \
             int smoothing_steps = 0, float eps = -1e-5f)",
        )
        .unwrap();
        let defaults: Vec<_> = sig.params.iter().map(|p| p.default.as_deref()).collect();
        assert_eq!(
            defaults,
            vec![None, Some("pmp::Curvature::mean"), Some("0"), Some("-1e-5f")]
        );
        assert_eq!(sig.required_params(), 1);
    }

    #[test]
    fn vector_and_aliases() {
        let ty = parse_type("std::vector<pmp::Scalar>").unwrap();
        assert!(ty.is_numeric_sequence());
        assert_eq!(ty.to_string(), "std::vector<float>");

        let ty = parse_type("const std::filesystem::path&").unwrap();
        assert_eq!(ty.base, BaseType::Path);
        assert!(ty.is_const);
        assert_eq!(ty.reference, Reference::Lvalue);
    }

    #[test]
    fn east_const_and_unsigned() {
        let ty = parse_type("pmp::Point const&").unwrap();
        assert!(ty.is_const);
        assert_eq!(parse_type("unsigned int").unwrap().base, BaseType::UInt32);
        assert_eq!(parse_type("unsigned").unwrap().base, BaseType::UInt32);
    }

    #[test]
    fn params_and_fields() {
        let params = parse_params("(float, float, float)").unwrap();
        assert_eq!(params.len(), 3);
        assert!(parse_params("()").unwrap().is_empty());
        assert!(parse_params("(void)").unwrap().is_empty());

        let (name, ty) = parse_field("const bool use_binary").unwrap();
        assert_eq!(name, "use_binary");
        assert!(ty.is_const);
    }

    #[test]
    fn rejects_pointers() {
        let err = parse_type("pmp::SurfaceMesh*").unwrap_err();
        match err {
            RegistrationError::InvalidDeclaration { offset, message, .. } => {
                assert_eq!(offset, 16);
                assert!(message.contains("pointer"));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn rejects_unsupported_templates() {
        assert!(parse_type("std::map<int, float>").is_err());
    }

    #[test]
    fn rejects_trailing_input() {
        let err = parse_signature("void f() extra").unwrap_err();
        assert_eq!(err.subject(), "void f() extra");
    }

    #[test]
    fn rejects_unterminated_params() {
        assert!(parse_signature("void f(int").is_err());
    }
}
