//! Declared interface of the PMP library.
//!
//! Every symbol the registration driver refers to is listed here with its
//! native signature, overloads included. Default arguments are kept as
//! written in the library headers.

use meshbind_core::RegistrationError;
use meshbind_registry::NativeCatalog;

const HANDLES: &[&str] = &["pmp::Vertex", "pmp::Halfedge", "pmp::Edge", "pmp::Face"];

const FUNCTIONS: &[&str] = &[
    // decimation
    "void pmp::decimate(pmp::SurfaceMesh& mesh, unsigned int n_vertices, \
     pmp::Scalar aspect_ratio = 0.0, pmp::Scalar edge_length = 0.0, \
     unsigned int max_valence = 0, pmp::Scalar normal_deviation = 0.0, \
     pmp::Scalar hausdorff_error = 0.0, pmp::Scalar seam_threshold = 1e-2, \
     pmp::Scalar seam_angle_deviation = 1)",
    // smoothing
    "void pmp::explicit_smoothing(pmp::SurfaceMesh& mesh, unsigned int iterations = 10, \
     bool use_uniform_laplace = false)",
    "void pmp::implicit_smoothing(pmp::SurfaceMesh& mesh, pmp::Scalar timestep = 0.001, \
     unsigned int iterations = 1, bool use_uniform_laplace = false, bool rescale = true)",
    // remeshing
    "void pmp::uniform_remeshing(pmp::SurfaceMesh& mesh, pmp::Scalar edge_length, \
     unsigned int iterations = 10, bool use_projection = true)",
    "void pmp::adaptive_remeshing(pmp::SurfaceMesh& mesh, pmp::Scalar min_edge_length, \
     pmp::Scalar max_edge_length, pmp::Scalar approx_error, unsigned int iterations = 10, \
     bool use_projection = true)",
    // subdivision
    "void pmp::loop_subdivision(pmp::SurfaceMesh& mesh, \
     pmp::BoundaryHandling boundary_handling = pmp::BoundaryHandling::Interpolate)",
    "void pmp::catmull_clark_subdivision(pmp::SurfaceMesh& mesh, \
     pmp::BoundaryHandling boundary_handling = pmp::BoundaryHandling::Interpolate)",
    "void pmp::quad_tri_subdivision(pmp::SurfaceMesh& mesh, \
     pmp::BoundaryHandling boundary_handling = pmp::BoundaryHandling::Interpolate)",
    // normals
    "void pmp::vertex_normals(pmp::SurfaceMesh& mesh)",
    "void pmp::face_normals(pmp::SurfaceMesh& mesh)",
    // features
    "size_t pmp::detect_features(pmp::SurfaceMesh& mesh, pmp::Scalar angle)",
    "void pmp::clear_features(pmp::SurfaceMesh& mesh)",
    // hole filling
    "void pmp::fill_hole(pmp::SurfaceMesh& mesh, pmp::Halfedge h)",
    // curvature
    "void pmp::curvature(pmp::SurfaceMesh& mesh, pmp::Curvature c = pmp::Curvature::Mean, \
     int smoothing_steps = 0, bool use_tensor = false, bool use_two_ring = false)",
    // shapes
    "pmp::SurfaceMesh pmp::tetrahedron()",
    "pmp::SurfaceMesh pmp::hexahedron()",
    "pmp::SurfaceMesh pmp::octahedron()",
    "pmp::SurfaceMesh pmp::dodecahedron()",
    "pmp::SurfaceMesh pmp::icosahedron()",
    "pmp::SurfaceMesh pmp::uv_sphere(const pmp::Point& center = pmp::Point(0, 0, 0), \
     pmp::Scalar radius = 1.0, size_t n_slices = 15, size_t n_stacks = 15)",
    "pmp::SurfaceMesh pmp::plane(size_t resolution = 4)",
    "pmp::SurfaceMesh pmp::cone(size_t n_subdivisions = 30, pmp::Scalar radius = 1.0, \
     pmp::Scalar height = 2.5)",
    "pmp::SurfaceMesh pmp::cylinder(size_t n_subdivisions = 30, pmp::Scalar radius = 1.0, \
     pmp::Scalar height = 2.5)",
    "pmp::SurfaceMesh pmp::torus(size_t radial_resolution = 20, size_t tubular_resolution = 40, \
     pmp::Scalar radius = 1.0, pmp::Scalar thickness = 0.4)",
    // parameterization
    "void pmp::harmonic_parameterization(pmp::SurfaceMesh& mesh, bool use_uniform_weights = false)",
    "void pmp::lscm_parameterization(pmp::SurfaceMesh& mesh)",
    // utilities
    "pmp::BoundingBox pmp::bounds(const pmp::SurfaceMesh& mesh)",
    "pmp::Scalar pmp::surface_area(const pmp::SurfaceMesh& mesh)",
    "pmp::Scalar pmp::volume(const pmp::SurfaceMesh& mesh)",
    "void pmp::flip_faces(pmp::SurfaceMesh& mesh)",
    "pmp::Point pmp::centroid(const pmp::SurfaceMesh& mesh)",
    "pmp::Point pmp::centroid(const pmp::SurfaceMesh& mesh, pmp::Face f)",
    // triangulation
    "void pmp::triangulate(pmp::SurfaceMesh& mesh)",
    "void pmp::triangulate(pmp::SurfaceMesh& mesh, pmp::Face f)",
    // io
    "void pmp::read(pmp::SurfaceMesh& mesh, const std::filesystem::path& file)",
    "void pmp::write(const pmp::SurfaceMesh& mesh, const std::filesystem::path& file, \
     const pmp::IOFlags& flags = pmp::IOFlags())",
];

/// Build the catalog of PMP symbols.
pub fn catalog() -> Result<NativeCatalog, RegistrationError> {
    let mut catalog = NativeCatalog::new();

    for handle in HANDLES {
        catalog
            .declare_class(handle)
            .constructor("()")?
            .constructor("(pmp::IndexType idx)")?
            .method("pmp::IndexType idx() const")?
            .method("bool is_valid() const")?;
    }

    catalog
        .declare_class("pmp::IOFlags")
        .constructor("()")?
        .field("bool use_binary")?
        .field("bool use_vertex_normals")?
        .field("bool use_vertex_colors")?
        .field("bool use_vertex_texcoords")?
        .field("bool use_face_normals")?
        .field("bool use_face_colors")?;

    catalog
        .declare_class("pmp::Point")
        .constructor("()")?
        .constructor("(pmp::Scalar x, pmp::Scalar y, pmp::Scalar z)")?;

    catalog
        .declare_class("pmp::BoundingBox")
        .constructor("()")?
        .constructor("(const pmp::Point& min, const pmp::Point& max)")?
        .method("pmp::Point& min()")?
        .method("pmp::Point& max()")?
        .method("pmp::Point center() const")?
        .method("pmp::Scalar size() const")?
        .method("bool is_empty() const")?;

    catalog
        .declare_class("pmp::SurfaceMesh")
        .constructor("()")?
        .constructor("(const pmp::SurfaceMesh& rhs)")?
        .method("pmp::Vertex add_vertex(const pmp::Point& p)")?
        .method("pmp::Face add_triangle(pmp::Vertex v0, pmp::Vertex v1, pmp::Vertex v2)")?
        .method("pmp::Face add_quad(pmp::Vertex v0, pmp::Vertex v1, pmp::Vertex v2, pmp::Vertex v3)")?
        .method("pmp::Face add_face(const std::vector<pmp::Vertex>& vertices)")?
        .method("size_t n_vertices() const")?
        .method("size_t n_edges() const")?
        .method("size_t n_faces() const")?
        .method("size_t n_halfedges() const")?
        .method("bool is_empty() const")?
        .method("bool is_triangle_mesh() const")?
        .method("bool is_quad_mesh() const")?
        .method("bool is_valid(pmp::Vertex v) const")?
        .method("bool is_valid(pmp::Halfedge h) const")?
        .method("bool is_valid(pmp::Edge e) const")?
        .method("bool is_valid(pmp::Face f) const")?
        .method("void delete_vertex(pmp::Vertex v)")?
        .method("void delete_face(pmp::Face f)")?
        .method("bool has_garbage() const")?
        .method("void clear()")?
        .method("void reserve(size_t nvertices, size_t nedges, size_t nfaces)")?
        .method("void garbage_collection()")?
        .method("const pmp::Point& position(pmp::Vertex v) const")?;

    for decl in FUNCTIONS {
        catalog.declare_function(decl)?;
    }

    Ok(catalog)
}
