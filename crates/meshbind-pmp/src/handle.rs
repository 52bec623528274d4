//! Handle types: small index wrappers that identify mesh elements.
//!
//! A handle is only meaningful together with the mesh that issued it. The
//! default handle is invalid, as in the wrapped library.

use meshbind_core::impl_native_object;

/// Index type of every handle.
pub type IndexType = u32;

const INVALID: IndexType = IndexType::MAX;

macro_rules! make_handle_type {
    ($name:ident, $short:expr, $native:expr) => {
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(IndexType);

        impl $name {
            pub fn new(idx: IndexType) -> Self {
                $name(idx)
            }

            pub fn idx(&self) -> IndexType {
                self.0
            }

            pub fn is_valid(&self) -> bool {
                self.0 != INVALID
            }

            pub(crate) fn index(&self) -> usize {
                self.0 as usize
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $name(INVALID)
            }
        }

        impl From<usize> for $name {
            fn from(raw: usize) -> Self {
                assert!(raw < INVALID as usize, "handle index out of range");
                $name(raw as IndexType)
            }
        }

        impl ::std::fmt::Debug for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                if self.is_valid() {
                    write!(f, "{}{}", $short, self.0)
                } else {
                    write!(f, "{}-", $short)
                }
            }
        }

        impl_native_object!($name, $native);
    };
}

make_handle_type!(Vertex, "V", "pmp::Vertex");
make_handle_type!(Halfedge, "H", "pmp::Halfedge");
make_handle_type!(Edge, "E", "pmp::Edge");
make_handle_type!(Face, "F", "pmp::Face");

#[cfg(test)]
mod tests {
    use super::*;
    use meshbind_core::{DataType, NativeValue};

    #[test]
    fn default_handle_is_invalid() {
        assert!(!Vertex::default().is_valid());
        assert!(Vertex::new(0).is_valid());
        assert_eq!(format!("{:?}", Face::from(3)), "F3");
        assert_eq!(format!("{:?}", Edge::default()), "E-");
    }

    #[test]
    fn handles_declare_their_native_type() {
        assert_eq!(Vertex::data_type(), DataType::named("pmp::Vertex"));
        assert_eq!(Halfedge::data_type(), DataType::named("pmp::Halfedge"));
    }
}
