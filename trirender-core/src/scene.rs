/// Loaded geometry, its bounds, and the render mode they were loaded for
use crate::bounds::BoundingBox;
use crate::geometry::{whole_triangle_limit, DisplayList, TriangleBatch, MAX_DISPLAY_LIST_SIZE};

/// How geometry is kept in memory and replayed each frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// Keep packed arrays and submit every vertex each frame
    #[default]
    Immediate,
    /// Compile vertices into display lists at load time and replay those
    DisplayLists,
}

/// Geometry loaded from one file
#[derive(Debug, Clone, PartialEq)]
pub enum Batch {
    Raw(TriangleBatch),
    Compiled {
        /// Vertex count declared by the file
        count: usize,
        lists: Vec<DisplayList>,
    },
}

impl Batch {
    pub fn vertex_count(&self) -> usize {
        match self {
            Batch::Raw(batch) => batch.count,
            Batch::Compiled { count, .. } => *count,
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.vertex_count() / 3
    }
}

/// Append-only sequence of batches in load order
#[derive(Debug, Clone, Default)]
pub struct BatchStore {
    entries: Vec<Batch>,
}

impl BatchStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, batch: Batch) {
        self.entries.push(batch);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Batch> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_triangles(&self) -> usize {
        self.entries.iter().map(Batch::triangle_count).sum()
    }
}

impl<'a> IntoIterator for &'a BatchStore {
    type Item = &'a Batch;
    type IntoIter = std::slice::Iter<'a, Batch>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Everything the renderer reads: created before the first load, filled by
/// the loader, then only borrowed while frames are drawn.
#[derive(Debug, Clone)]
pub struct Scene {
    mode: RenderMode,
    list_limit: usize,
    bounds: BoundingBox,
    batches: BatchStore,
}

impl Scene {
    pub fn new(mode: RenderMode) -> Self {
        Self::with_list_limit(mode, MAX_DISPLAY_LIST_SIZE)
    }

    /// Like [`Scene::new`] with a custom display list size limit, rounded
    /// down to a multiple of three vertices
    pub fn with_list_limit(mode: RenderMode, list_limit: usize) -> Self {
        Self {
            mode,
            list_limit: whole_triangle_limit(list_limit),
            bounds: BoundingBox::empty(),
            batches: BatchStore::new(),
        }
    }

    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    pub fn list_limit(&self) -> usize {
        self.list_limit
    }

    pub fn bounds(&self) -> &BoundingBox {
        &self.bounds
    }

    pub fn batches(&self) -> &BatchStore {
        &self.batches
    }

    pub fn total_triangles(&self) -> usize {
        self.batches.total_triangles()
    }

    /// Record a fully loaded file. `bounds` covers only that file's vertices.
    pub(crate) fn append(&mut self, batch: Batch, bounds: &BoundingBox) {
        self.bounds.union(bounds);
        self.batches.push(batch);
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(RenderMode::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_scene_is_empty() {
        let scene = Scene::new(RenderMode::DisplayLists);
        assert_eq!(scene.mode(), RenderMode::DisplayLists);
        assert_eq!(scene.list_limit(), MAX_DISPLAY_LIST_SIZE);
        assert!(scene.bounds().is_empty());
        assert!(scene.batches().is_empty());
        assert_eq!(scene.total_triangles(), 0);
    }

    #[test]
    fn test_total_triangles_counts_both_kinds() {
        let mut store = BatchStore::new();
        let mut raw = TriangleBatch::with_capacity(6);
        for _ in 0..6 {
            raw.push([0.0; 3], [0.0, 0.0, 1.0]);
        }
        store.push(Batch::Raw(raw));
        store.push(Batch::Compiled {
            count: 9,
            lists: Vec::new(),
        });

        assert_eq!(store.len(), 2);
        assert_eq!(store.total_triangles(), 5);
        let counts: Vec<usize> = store.iter().map(Batch::vertex_count).collect();
        assert_eq!(counts, vec![6, 9]);
    }

    #[test]
    fn test_list_limit_is_clamped_to_whole_triangles() {
        let scene = Scene::with_list_limit(RenderMode::DisplayLists, 0);
        assert_eq!(scene.list_limit(), 3);
        let scene = Scene::with_list_limit(RenderMode::DisplayLists, 7);
        assert_eq!(scene.list_limit(), 6);
    }
}
