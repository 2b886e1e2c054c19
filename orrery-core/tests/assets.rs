use std::path::Path;

use orrery_core::obj::load_obj_data;
use orrery_core::{load_obj, Scene, SceneConfig};

fn workspace_root() -> &'static Path {
    Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/.."))
}

#[test]
fn test_bundled_sun_mesh() {
    let path = workspace_root().join("assets/sun.obj");
    let data = load_obj_data(&path).unwrap();
    assert_eq!(data.face_count(), 168);

    let mesh = data.expand();
    assert_eq!(mesh.len(), 504);
    assert_eq!(mesh.triangle_count(), 168);
    for position in mesh.positions() {
        assert!((position.coords.norm() - 10.0).abs() < 1e-3);
    }
    for normal in mesh.normals() {
        assert!((normal.norm() - 1.0).abs() < 1e-3);
    }

    let indexed = data.indexed();
    assert_eq!(indexed.indices.len(), 504);
    assert_eq!(indexed.triangle_count(), 168);
    assert!(indexed.vertices.len() < 504);
}

#[test]
fn test_bundled_planet_mesh() {
    let mesh = load_obj(workspace_root().join("assets/planet.obj")).unwrap();
    assert_eq!(mesh.triangle_count(), 168);
    assert!(mesh
        .positions()
        .iter()
        .all(|p| (p.coords.norm() - 4.0).abs() < 1e-3));
}

#[test]
fn test_sample_scene_matches_defaults() {
    let root = workspace_root();
    let config = SceneConfig::load(root.join("scene.ron")).unwrap();
    assert_eq!(config, SceneConfig::default());
    assert_eq!(Scene::new(&config), Scene::default());

    let meshes = config.mesh_paths_relative_to(root);
    assert!(meshes.star.is_file());
    assert!(meshes.orbiter.is_file());
}
