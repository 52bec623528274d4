//! Callable signatures.

use std::fmt::{self, Display, Formatter};

use serde::Serialize;

use crate::DataType;

/// A single parameter of a callable.
///
/// Only `data_type` takes part in signature comparison; the name and the
/// default value are carried through for generated documentation.
#[derive(Debug, Clone, Serialize)]
pub struct Param {
    pub data_type: DataType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

impl Param {
    pub fn new(data_type: DataType) -> Self {
        Self {
            data_type,
            name: None,
            default: None,
        }
    }

    pub fn named(data_type: DataType, name: impl Into<String>) -> Self {
        Self {
            data_type,
            name: Some(name.into()),
            default: None,
        }
    }
}

impl PartialEq for Param {
    fn eq(&self, other: &Self) -> bool {
        self.data_type == other.data_type
    }
}

impl Eq for Param {}

impl Display for Param {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.data_type)?;
        if let Some(name) = &self.name {
            write!(f, " {name}")?;
        }
        if let Some(default) = &self.default {
            write!(f, " = {default}")?;
        }
        Ok(())
    }
}

/// Parameter and return types of a function or method.
///
/// `is_const` is only meaningful for methods (a `const` member function).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Signature {
    pub params: Vec<Param>,
    pub return_type: DataType,
    pub is_const: bool,
}

impl Signature {
    pub fn new(params: Vec<Param>, return_type: DataType) -> Self {
        Self {
            params,
            return_type,
            is_const: false,
        }
    }

    pub fn with_const(mut self, is_const: bool) -> Self {
        self.is_const = is_const;
        self
    }

    pub fn param_count(&self) -> usize {
        self.params.len()
    }

    /// Number of parameters without a default value.
    pub fn required_params(&self) -> usize {
        self.params.iter().filter(|p| p.default.is_none()).count()
    }

    /// Every named type mentioned by the parameters and the return type.
    pub fn named_types(&self) -> impl Iterator<Item = &str> {
        self.params
            .iter()
            .flat_map(|p| p.data_type.named_types())
            .chain(self.return_type.named_types())
    }

    /// The signature spelled as a function-pointer type, `R (*)(A, B)`.
    pub fn pointer_spelling(&self) -> String {
        let params: Vec<String> = self.params.iter().map(|p| p.data_type.to_string()).collect();
        let mut out = format!("{} (*)({})", self.return_type, params.join(", "));
        if self.is_const {
            out.push_str(" const");
        }
        out
    }
}

impl Display for Signature {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} (", self.return_type)?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{param}")?;
        }
        write!(f, ")")?;
        if self.is_const {
            write!(f, " const")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BaseType;

    fn mesh_ref() -> DataType {
        DataType::named("pmp::SurfaceMesh").into_ref()
    }

    #[test]
    fn param_names_do_not_affect_equality() {
        let a = Signature::new(vec![Param::named(mesh_ref(), "mesh")], DataType::void());
        let b = Signature::new(vec![Param::new(mesh_ref())], DataType::void());
        assert_eq!(a, b);
    }

    #[test]
    fn constness_affects_equality() {
        let a = Signature::new(vec![], DataType::simple(BaseType::Bool));
        let b = a.clone().with_const(true);
        assert_ne!(a, b);
    }

    #[test]
    fn required_params_skips_defaults() {
        let mut iterations = Param::named(DataType::simple(BaseType::Int32), "iterations");
        iterations.default = Some("10".into());
        let sig = Signature::new(vec![Param::new(mesh_ref()), iterations], DataType::void());
        assert_eq!(sig.param_count(), 2);
        assert_eq!(sig.required_params(), 1);
        assert_eq!(sig.to_string(), "void (pmp::SurfaceMesh&, int iterations = 10)");
    }

    #[test]
    fn pointer_spelling() {
        let sig = Signature::new(
            vec![Param::new(mesh_ref()), Param::new(DataType::named("pmp::Face"))],
            DataType::void(),
        );
        assert_eq!(sig.pointer_spelling(), "void (*)(pmp::SurfaceMesh&, pmp::Face)");
    }
}
