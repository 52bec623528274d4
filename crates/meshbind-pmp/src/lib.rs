//! The PMP surface-mesh library as seen by the registration driver.
//!
//! This crate provides the Rust side of the wrapped library's stable
//! interface: handle types, [`Point`], [`BoundingBox`], [`IOFlags`], the
//! [`SurfaceMesh`] value surface that synthesized methods compute from,
//! mesh reading, the [`copy_mesh`] and [`load_mesh`] adapters, and the
//! [`catalog`] of native symbols that registration resolves against.

mod adapters;
mod catalog;
mod error;
mod handle;
pub mod io;
mod surface_mesh;
mod types;

pub use adapters::{copy_mesh, load_mesh};
pub use catalog::catalog;
pub use error::MeshError;
pub use handle::{Edge, Face, Halfedge, IndexType, Vertex};
pub use surface_mesh::SurfaceMesh;
pub use types::{BoundingBox, IOFlags, Point, Scalar};
