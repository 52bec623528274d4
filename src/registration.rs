//! Registration driver: declares the PMP library into a registry.
//!
//! Declaration order matters. Handle types and value types come first so
//! that every method and function referring to them resolves; the mesh
//! class follows, then the free functions.

use log::{info, warn};

use meshbind_core::{CallError, RegistrationError, Value};
use meshbind_pmp::{SurfaceMesh, copy_mesh, load_mesh};
use meshbind_registry::{Registrar, Registry};

const HANDLES: &[&str] = &["pmp::Vertex", "pmp::Face", "pmp::Edge", "pmp::Halfedge"];

const IO_FLAGS: &[&str] = &[
    "use_binary",
    "use_vertex_normals",
    "use_vertex_colors",
    "use_vertex_texcoords",
    "use_face_normals",
    "use_face_colors",
];

/// Functions with a single native overload, registered by symbol.
const FUNCTIONS: &[&str] = &[
    "pmp::decimate",
    "pmp::explicit_smoothing",
    "pmp::implicit_smoothing",
    "pmp::uniform_remeshing",
    "pmp::adaptive_remeshing",
    "pmp::loop_subdivision",
    "pmp::catmull_clark_subdivision",
    "pmp::quad_tri_subdivision",
    "pmp::vertex_normals",
    "pmp::face_normals",
    "pmp::detect_features",
    "pmp::clear_features",
    "pmp::fill_hole",
    "pmp::curvature",
    "pmp::tetrahedron",
    "pmp::hexahedron",
    "pmp::octahedron",
    "pmp::dodecahedron",
    "pmp::icosahedron",
    "pmp::uv_sphere",
    "pmp::plane",
    "pmp::cone",
    "pmp::cylinder",
    "pmp::torus",
    "pmp::harmonic_parameterization",
    "pmp::lscm_parameterization",
    "pmp::bounds",
    "pmp::surface_area",
    "pmp::volume",
    "pmp::flip_faces",
];

/// Declare every exposed type and function into `registry`.
///
/// Calling this twice on the same registry fails with
/// [`RegistrationError::DuplicateType`] for the first handle type.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn register_into(registry: &mut Registry) -> Result<(), RegistrationError> {
    let catalog = meshbind_pmp::catalog()?;
    let mut reg = Registrar::new(registry, &catalog);

    register_types(&mut reg)?;
    register_surface_mesh(&mut reg)?;
    register_functions(&mut reg)?;
    register_adapters(&mut reg)?;

    info!(
        "registered {} types and {} functions",
        reg.registry().type_count(),
        reg.registry().function_count()
    );
    Ok(())
}

/// Populate the process-wide registry. Later calls do nothing.
pub fn register_all() -> Result<(), RegistrationError> {
    if !Registry::instance().register_once(register_into)? {
        warn!("register_all called again; registry already populated");
    }
    Ok(())
}

fn register_types(reg: &mut Registrar<'_>) -> Result<(), RegistrationError> {
    // handles first: SurfaceMesh methods return them
    for handle in HANDLES {
        reg.register_handle(handle)?;
    }

    let mut io_flags = reg.register_class("pmp::IOFlags")?.constructor("()")?;
    for field in IO_FLAGS {
        io_flags = io_flags.field(field, &format!("pmp::IOFlags::{field}"))?;
    }
    io_flags.build()?;

    reg.register_class("pmp::Point")?
        .constructor("()")?
        .constructor("(float, float, float)")?
        .build()?;

    reg.register_class("pmp::BoundingBox")?
        .constructor("()")?
        .method("min", "pmp::BoundingBox::min")?
        .method("max", "pmp::BoundingBox::max")?
        .method("center", "pmp::BoundingBox::center")?
        .method("size", "pmp::BoundingBox::size")?
        .method("is_empty", "pmp::BoundingBox::is_empty")?
        .build()?;

    // enums passed by value to the algorithms
    reg.register_opaque("pmp::BoundaryHandling")?;
    reg.register_opaque("pmp::Curvature")?;
    Ok(())
}

fn register_surface_mesh(reg: &mut Registrar<'_>) -> Result<(), RegistrationError> {
    reg.register_class("pmp::SurfaceMesh")?
        .constructor("()")?
        .constructor("(const pmp::SurfaceMesh&)")?
        // topology
        .method("add_vertex", "pmp::SurfaceMesh::add_vertex")?
        .method("add_triangle", "pmp::SurfaceMesh::add_triangle")?
        .method("add_quad", "pmp::SurfaceMesh::add_quad")?
        .method("delete_vertex", "pmp::SurfaceMesh::delete_vertex")?
        .method("delete_face", "pmp::SurfaceMesh::delete_face")?
        // counts
        .method("n_vertices", "pmp::SurfaceMesh::n_vertices")?
        .method("n_edges", "pmp::SurfaceMesh::n_edges")?
        .method("n_faces", "pmp::SurfaceMesh::n_faces")?
        .method("n_halfedges", "pmp::SurfaceMesh::n_halfedges")?
        // queries
        .method("is_empty", "pmp::SurfaceMesh::is_empty")?
        .method("is_triangle_mesh", "pmp::SurfaceMesh::is_triangle_mesh")?
        .method("is_quad_mesh", "pmp::SurfaceMesh::is_quad_mesh")?
        .overloaded_method(
            "is_valid_vertex",
            "pmp::SurfaceMesh::is_valid",
            "bool (pmp::SurfaceMesh::*)(pmp::Vertex) const",
        )?
        .overloaded_method(
            "is_valid_face",
            "pmp::SurfaceMesh::is_valid",
            "bool (pmp::SurfaceMesh::*)(pmp::Face) const",
        )?
        // memory management
        .method("clear", "pmp::SurfaceMesh::clear")?
        .method("reserve", "pmp::SurfaceMesh::reserve")?
        .method("has_garbage", "pmp::SurfaceMesh::has_garbage")?
        .method("garbage_collection", "pmp::SurfaceMesh::garbage_collection")?
        // flat arrays for consumers that upload to a renderer
        .lambda_method_const::<Vec<f32>, SurfaceMesh>("vertices", |mesh| {
            let mut positions = Vec::with_capacity(mesh.n_vertices() * 3);
            for v in mesh.vertices() {
                let p = mesh.position(v);
                positions.extend_from_slice(&[p[0], p[1], p[2]]);
            }
            positions
        })?
        .lambda_method::<Vec<u32>, SurfaceMesh>("indices", |mesh| {
            let mut indices = Vec::with_capacity(mesh.n_faces() * 3);
            for f in mesh.faces() {
                indices.extend(mesh.face_vertices(f).iter().map(|v| v.idx()));
            }
            indices
        })?
        .build()
}

fn register_functions(reg: &mut Registrar<'_>) -> Result<(), RegistrationError> {
    for symbol in FUNCTIONS {
        reg.register_function(symbol)?;
    }

    reg.register_overloaded_function("pmp::triangulate", "void (*)(pmp::SurfaceMesh&)")?;
    reg.register_overloaded_function_as(
        "pmp::triangulate",
        "triangulate_face",
        "void (*)(pmp::SurfaceMesh&, pmp::Face)",
    )?;
    reg.register_overloaded_function("pmp::centroid", "pmp::Point (*)(const pmp::SurfaceMesh&)")?;
    reg.register_overloaded_function(
        "pmp::read",
        "void (*)(pmp::SurfaceMesh&, const std::filesystem::path&)",
    )?;
    reg.register_overloaded_function(
        "pmp::write",
        "void (*)(const pmp::SurfaceMesh&, const std::filesystem::path&, const pmp::IOFlags&)",
    )?;
    Ok(())
}

fn register_adapters(reg: &mut Registrar<'_>) -> Result<(), RegistrationError> {
    reg.register_native_function(
        "void load_mesh(pmp::SurfaceMesh& mesh, const std::filesystem::path& filepath)",
        |args| {
            let path = args.path(1)?.to_path_buf();
            let mesh = args.object_mut::<SurfaceMesh>(0)?;
            load_mesh(mesh, &path).map_err(|err| CallError::Failed(err.to_string()))?;
            Ok(Value::Void)
        },
    )?;

    reg.register_native_function(
        "pmp::SurfaceMesh copy_mesh(const pmp::SurfaceMesh& src)",
        |args| {
            let src = args.object::<SurfaceMesh>(0)?;
            Ok(Value::object(copy_mesh(src)))
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use meshbind_core::{BaseType, DataType, TypeKind};

    fn populated() -> Registry {
        let mut registry = Registry::new();
        register_into(&mut registry).unwrap();
        registry
    }

    #[test]
    fn registry_validates() {
        let registry = populated();
        assert!(registry.validate().is_ok());
        assert_eq!(registry.type_count(), 10);
    }

    #[test]
    fn handles_come_first() {
        let registry = populated();
        let names: Vec<&str> = registry.types().take(4).map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["Vertex", "Face", "Edge", "Halfedge"]);
        assert!(
            registry
                .types()
                .take(4)
                .all(|t| t.kind == TypeKind::Handle && t.has_default_constructor())
        );
    }

    #[test]
    fn io_flags_fields() {
        let registry = populated();
        let flags = registry.lookup_type("IOFlags").unwrap();
        assert_eq!(flags.fields.len(), 6);
        for field in &flags.fields {
            assert_eq!(field.data_type, DataType::simple(BaseType::Bool));
        }
    }

    #[test]
    fn opaque_enums_have_no_members() {
        let registry = populated();
        let curvature = registry.lookup_type("Curvature").unwrap();
        assert_eq!(curvature.kind, TypeKind::Opaque);
        assert!(curvature.methods.is_empty());
    }

    #[test]
    fn surface_mesh_is_valid_overloads() {
        let registry = populated();
        let mesh = registry.lookup_type("SurfaceMesh").unwrap();
        let vertex = mesh.method("is_valid_vertex").unwrap();
        assert_eq!(
            vertex.signature.params[0].data_type,
            DataType::named("pmp::Vertex")
        );
        assert!(mesh.method("is_valid_face").is_some());
        assert!(mesh.method("is_valid").is_none());
    }

    #[test]
    fn second_registration_into_same_registry_fails() {
        let mut registry = populated();
        assert_eq!(
            register_into(&mut registry).unwrap_err(),
            RegistrationError::DuplicateType("Vertex".into())
        );
    }
}
