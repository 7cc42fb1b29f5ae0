/// Loads mesh files into a [`Scene`]
use std::fs;
use std::path::Path;

use crate::bounds::BoundingBox;
use crate::error::LoadError;
use crate::format::{self, RawMesh};
use crate::geometry::{DisplayListCompiler, TriangleBatch, Vertex};
use crate::scene::{Batch, RenderMode, Scene};

/// Read `path` and append its geometry to `scene`.
///
/// Returns the number of triangles in the file. On error the scene is left
/// exactly as it was.
pub fn load_mesh(scene: &mut Scene, path: impl AsRef<Path>) -> Result<usize, LoadError> {
    let path = path.as_ref();
    let data = fs::read(path).map_err(|e| LoadError::io(path, e))?;
    load_mesh_bytes(scene, path, &data)
}

/// Same as [`load_mesh`] for data already in memory. `path` is only used to
/// label errors and log lines.
pub fn load_mesh_bytes(
    scene: &mut Scene,
    path: impl AsRef<Path>,
    data: &[u8],
) -> Result<usize, LoadError> {
    let path = path.as_ref();
    let raw = format::parse_mesh(data).map_err(|reason| LoadError::malformed(path, reason))?;

    if raw.trailing > 0 {
        log::warn!(
            "{}: ignoring {} trailing bytes after {} records",
            path.display(),
            raw.trailing,
            raw.count()
        );
    }

    let (batch, bounds) = build_batch(&raw, scene.mode(), scene.list_limit());
    let triangles = batch.triangle_count();

    match &batch {
        Batch::Raw(_) => log::debug!(
            "{}: {} vertices packed for immediate mode",
            path.display(),
            raw.count()
        ),
        Batch::Compiled { lists, .. } => log::debug!(
            "{}: {} vertices compiled into {} display list(s)",
            path.display(),
            raw.count(),
            lists.len()
        ),
    }

    scene.append(batch, &bounds);
    Ok(triangles)
}

/// Walk the records once, widening the bounds and packing or compiling
/// each vertex depending on the mode. The reserved fourth float is dropped.
fn build_batch(raw: &RawMesh, mode: RenderMode, list_limit: usize) -> (Batch, BoundingBox) {
    let mut bounds = BoundingBox::empty();
    let records = raw.vertices.iter().zip(&raw.normals);

    let batch = match mode {
        RenderMode::Immediate => {
            let mut packed = TriangleBatch::with_capacity(raw.count());
            for (v, n) in records {
                bounds.include(v[0], v[1], v[2]);
                packed.push([v[0], v[1], v[2]], [n[0], n[1], n[2]]);
            }
            Batch::Raw(packed)
        }
        RenderMode::DisplayLists => {
            let mut compiler = DisplayListCompiler::with_limit(list_limit);
            for (i, (v, n)) in records.enumerate() {
                bounds.include(v[0], v[1], v[2]);
                compiler.push(i, Vertex::new(v[0], v[1], v[2], n[0], n[1], n[2]));
            }
            Batch::Compiled {
                count: raw.count(),
                lists: compiler.finish(),
            }
        }
    };

    (batch, bounds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::encode_mesh;
    use nalgebra::Point3;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const UP: [f32; 4] = [0.0, 0.0, 1.0, 0.0];

    fn one_triangle() -> Vec<u8> {
        let vertices = [[0.0, 0.0, 0.0, 7.0], [1.0, 0.0, 0.0, 7.0], [0.0, 1.0, 0.0, 7.0]];
        encode_mesh(&vertices, &[UP; 3])
    }

    fn shifted_triangle() -> Vec<u8> {
        let vertices = [[-2.0, 0.5, 1.0, 0.0], [3.0, 0.5, 1.0, 0.0], [0.0, -4.0, 2.0, 0.0]];
        encode_mesh(&vertices, &[UP; 3])
    }

    /// A strip of `triangles` triangles with distinct positions and normals
    fn strip(triangles: usize) -> Vec<u8> {
        let n = triangles * 3;
        let vertices: Vec<[f32; 4]> = (0..n).map(|i| [i as f32, (i % 3) as f32, -(i as f32), 0.0]).collect();
        let normals: Vec<[f32; 4]> = (0..n).map(|i| [0.0, 1.0, i as f32, 0.0]).collect();
        encode_mesh(&vertices, &normals)
    }

    fn write_temp(data: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(data).unwrap();
        file.flush().unwrap();
        file
    }

    fn submitted(scene: &Scene) -> Vec<Vertex> {
        scene
            .batches()
            .iter()
            .flat_map(|batch| -> Vec<Vertex> {
                match batch {
                    Batch::Raw(raw) => raw.iter().collect(),
                    Batch::Compiled { lists, .. } => lists
                        .iter()
                        .flat_map(|list| list.vertices().iter().copied())
                        .collect(),
                }
            })
            .collect()
    }

    #[test]
    fn test_load_single_triangle_file() {
        let file = write_temp(&one_triangle());
        let mut scene = Scene::new(RenderMode::Immediate);

        let triangles = load_mesh(&mut scene, file.path()).unwrap();
        assert_eq!(triangles, 1);
        assert_eq!(scene.total_triangles(), 1);

        let bounds = scene.bounds();
        assert_eq!(bounds.min, Point3::new(0.0, 0.0, 0.0));
        assert_eq!(bounds.max, Point3::new(1.0, 1.0, 0.0));

        match scene.batches().iter().next().unwrap() {
            Batch::Raw(raw) => {
                assert_eq!(raw.vertices, vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0]);
                assert_eq!(raw.normals.len(), 9);
            }
            other => panic!("expected a packed batch, got {:?}", other),
        }
    }

    #[test]
    fn test_two_files_accumulate() {
        for mode in [RenderMode::Immediate, RenderMode::DisplayLists] {
            let mut scene = Scene::new(mode);
            load_mesh_bytes(&mut scene, "a.bin", &one_triangle()).unwrap();
            load_mesh_bytes(&mut scene, "b.bin", &shifted_triangle()).unwrap();

            assert_eq!(scene.batches().len(), 2);
            assert_eq!(scene.total_triangles(), 2);
            assert_eq!(scene.bounds().min, Point3::new(-2.0, -4.0, 0.0));
            assert_eq!(scene.bounds().max, Point3::new(3.0, 1.0, 2.0));
        }
    }

    #[test]
    fn test_bounds_are_ordered_after_load() {
        let mut scene = Scene::new(RenderMode::Immediate);
        load_mesh_bytes(&mut scene, "strip.bin", &strip(20)).unwrap();
        let bounds = scene.bounds();
        assert!(bounds.min.x <= bounds.max.x);
        assert!(bounds.min.y <= bounds.max.y);
        assert!(bounds.min.z <= bounds.max.z);
    }

    #[test]
    fn test_modes_visit_same_vertices() {
        let data = strip(40);
        let mut immediate = Scene::new(RenderMode::Immediate);
        let mut compiled = Scene::with_list_limit(RenderMode::DisplayLists, 7);
        load_mesh_bytes(&mut immediate, "strip.bin", &data).unwrap();
        load_mesh_bytes(&mut compiled, "strip.bin", &data).unwrap();

        assert_eq!(submitted(&immediate), submitted(&compiled));
        assert_eq!(immediate.bounds(), compiled.bounds());
        assert_eq!(immediate.total_triangles(), compiled.total_triangles());
    }

    #[test]
    fn test_display_list_chunks_per_file() {
        let limit = 6;
        for (triangles, expected_lists) in [(1, 1), (2, 1), (3, 2)] {
            let mut scene = Scene::with_list_limit(RenderMode::DisplayLists, limit);
            load_mesh_bytes(&mut scene, "strip.bin", &strip(triangles)).unwrap();
            match scene.batches().iter().next().unwrap() {
                Batch::Compiled { count, lists } => {
                    assert_eq!(*count, triangles * 3);
                    assert_eq!(lists.len(), expected_lists, "{} vertices", triangles * 3);
                }
                other => panic!("expected compiled batch, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_chunking_restarts_for_each_file() {
        let mut scene = Scene::with_list_limit(RenderMode::DisplayLists, 6);
        load_mesh_bytes(&mut scene, "a.bin", &strip(1)).unwrap();
        load_mesh_bytes(&mut scene, "b.bin", &strip(1)).unwrap();
        for batch in scene.batches() {
            if let Batch::Compiled { lists, .. } = batch {
                assert_eq!(lists.len(), 1);
                assert_eq!(lists[0].len(), 3);
            }
        }
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.bin");
        let mut scene = Scene::new(RenderMode::Immediate);

        let err = load_mesh(&mut scene, &path).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
        assert!(err.to_string().contains("missing.bin"));
        assert!(scene.batches().is_empty());
    }

    #[test]
    fn test_malformed_file_leaves_scene_untouched() {
        let mut scene = Scene::new(RenderMode::Immediate);
        load_mesh_bytes(&mut scene, "good.bin", &one_triangle()).unwrap();

        let mut bad = shifted_triangle();
        bad.truncate(bad.len() - 8);
        let err = load_mesh_bytes(&mut scene, "bad.bin", &bad).unwrap_err();

        assert!(matches!(err, LoadError::Malformed { .. }));
        assert_eq!(err.path(), Path::new("bad.bin"));
        assert_eq!(scene.batches().len(), 1);
        assert_eq!(scene.bounds().max, Point3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_empty_file_adds_empty_batch() {
        let mut scene = Scene::new(RenderMode::Immediate);
        let triangles = load_mesh_bytes(&mut scene, "empty.bin", &0i32.to_le_bytes()).unwrap();
        assert_eq!(triangles, 0);
        assert_eq!(scene.batches().len(), 1);
        assert!(scene.bounds().is_empty());
    }
}
