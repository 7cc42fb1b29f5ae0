/// Geometry containers produced by the mesh loader
use nalgebra::{Point3, Vector3};

/// Upper bound on the number of vertices compiled into one display list
pub const MAX_DISPLAY_LIST_SIZE: usize = 999_999;

/// Round a requested list size down to whole triangles, at least one.
///
/// Each list is replayed as its own triangle scope, so a list boundary must
/// never split a triangle.
pub fn whole_triangle_limit(limit: usize) -> usize {
    (limit / 3 * 3).max(3)
}

/// A vertex position paired with its normal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Point3<f32>,
    pub normal: Vector3<f32>,
}

impl Vertex {
    pub fn new(x: f32, y: f32, z: f32, nx: f32, ny: f32, nz: f32) -> Self {
        Self {
            position: Point3::new(x, y, z),
            normal: Vector3::new(nx, ny, nz),
        }
    }
}

/// Packed vertices and normals for immediate-mode submission.
///
/// Both arrays use a stride of 3 floats and are parallel: index `i` of
/// `vertices` and `normals` describe the same vertex.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriangleBatch {
    pub count: usize,
    pub vertices: Vec<f32>,
    pub normals: Vec<f32>,
}

impl TriangleBatch {
    pub fn with_capacity(count: usize) -> Self {
        Self {
            count: 0,
            vertices: Vec::with_capacity(3 * count),
            normals: Vec::with_capacity(3 * count),
        }
    }

    pub fn push(&mut self, position: [f32; 3], normal: [f32; 3]) {
        self.vertices.extend_from_slice(&position);
        self.normals.extend_from_slice(&normal);
        self.count += 1;
    }

    pub fn triangle_count(&self) -> usize {
        self.count / 3
    }

    /// Walk the parallel arrays in submission order
    pub fn iter(&self) -> impl Iterator<Item = Vertex> + '_ {
        self.vertices
            .chunks_exact(3)
            .zip(self.normals.chunks_exact(3))
            .map(|(v, n)| Vertex::new(v[0], v[1], v[2], n[0], n[1], n[2]))
    }
}

/// A precompiled, immutable run of triangle vertices
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayList {
    vertices: Box<[Vertex]>,
}

impl DisplayList {
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Complete triangles; a trailing partial triangle is never yielded
    pub fn triangles(&self) -> impl Iterator<Item = &[Vertex]> + '_ {
        self.vertices.chunks_exact(3)
    }
}

/// Splits a stream of vertices into display lists of bounded size.
///
/// The first list is open from construction. When the running index reaches
/// a non-zero multiple of the limit the open list is sealed and the
/// triggering vertex starts the next one.
pub struct DisplayListCompiler {
    limit: usize,
    current: Vec<Vertex>,
    finished: Vec<DisplayList>,
}

impl DisplayListCompiler {
    pub fn new() -> Self {
        Self::with_limit(MAX_DISPLAY_LIST_SIZE)
    }

    pub fn with_limit(limit: usize) -> Self {
        let limit = whole_triangle_limit(limit);
        Self {
            limit,
            current: Vec::new(),
            finished: Vec::new(),
        }
    }

    /// Append the vertex at position `index` of the file being compiled
    pub fn push(&mut self, index: usize, vertex: Vertex) {
        if index > 0 && index % self.limit == 0 {
            self.seal();
        }
        self.current.push(vertex);
    }

    fn seal(&mut self) {
        let vertices = std::mem::take(&mut self.current).into_boxed_slice();
        self.finished.push(DisplayList { vertices });
    }

    /// Seal the open list and hand back everything compiled so far
    pub fn finish(mut self) -> Vec<DisplayList> {
        self.seal();
        self.finished
    }
}

impl Default for DisplayListCompiler {
    fn default() -> Self {
        Self::new()
    }
}
