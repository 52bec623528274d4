use std::path::PathBuf;

use meshbind::{Registry, register_into};
use meshbind_core::{CallArgs, CallError, Value};
use meshbind_pmp::SurfaceMesh;

const TETRAHEDRON_OFF: &str = "OFF\n4 4 6\n\
0 0 0\n1 0 0\n0 1 0\n0 0 1\n\
3 0 2 1\n3 0 1 3\n3 1 2 3\n3 0 3 2\n";

fn populated() -> Registry {
    let mut registry = Registry::new();
    register_into(&mut registry).unwrap();
    registry
}

#[test]
fn test_load_mesh_runs_through_registry() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tetra.off");
    std::fs::write(&path, TETRAHEDRON_OFF).unwrap();

    let registry = populated();
    let load = &registry.lookup_function("load_mesh")[0];
    assert!(load.accessor.is_synthesized());
    assert_eq!(load.signature.param_count(), 2);

    let mut args = CallArgs::new(vec![Value::object(SurfaceMesh::new()), Value::Path(path)]);
    let out = load.accessor.computation().unwrap().call(&mut args).unwrap();
    assert!(matches!(out, Value::Void));

    let values = args.into_values();
    let mesh = values[0].downcast_ref::<SurfaceMesh>().unwrap();
    assert_eq!(mesh.n_vertices(), 4);
    assert_eq!(mesh.n_faces(), 4);
    assert!(mesh.is_triangle_mesh());
}

#[test]
fn test_load_mesh_reports_unsupported_format() {
    let registry = populated();
    let load = &registry.lookup_function("load_mesh")[0];
    let mut args = CallArgs::new(vec![
        Value::object(SurfaceMesh::new()),
        Value::Path(PathBuf::from("mesh.stl")),
    ]);
    let err = load.accessor.computation().unwrap().call(&mut args).unwrap_err();
    match err {
        CallError::Failed(message) => assert!(message.contains("unsupported"), "{message}"),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_copy_mesh_is_deep() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tetra.off");
    std::fs::write(&path, TETRAHEDRON_OFF).unwrap();
    let mut src = SurfaceMesh::new();
    meshbind_pmp::load_mesh(&mut src, &path).unwrap();

    let registry = populated();
    let copy = &registry.lookup_function("copy_mesh")[0];
    let mut args = CallArgs::new(vec![Value::object(src)]);
    let out = copy.accessor.computation().unwrap().call(&mut args).unwrap();

    let mut copied = match out {
        Value::Object(obj) => *obj.downcast::<SurfaceMesh>().unwrap(),
        other => panic!("unexpected {other:?}"),
    };
    copied.clear();
    assert!(copied.is_empty());
    assert_eq!(args.object::<SurfaceMesh>(0).unwrap().n_faces(), 4);
}

#[test]
fn test_adapter_argument_type_checked() {
    let registry = populated();
    let copy = &registry.lookup_function("copy_mesh")[0];
    let mut args = CallArgs::new(vec![Value::Int(3)]);
    let err = copy.accessor.computation().unwrap().call(&mut args).unwrap_err();
    assert!(matches!(err, CallError::ArgumentType { index: 0, .. }));
}
