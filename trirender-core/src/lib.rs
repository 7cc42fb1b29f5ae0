/// trirender core library - mesh loading, bounds and frame rendering
///
/// This library loads raw triangle files into a [`Scene`], tracks the bounds
/// of everything loaded and drives a spinning orthographic camera against
/// any host that implements [`DrawTarget`].

pub mod bounds;
pub mod error;
pub mod format;
pub mod frame;
pub mod geometry;
pub mod loader;
pub mod projection;
pub mod scene;
pub mod transform;

// Re-export commonly used types
pub use bounds::BoundingBox;
pub use error::LoadError;
pub use frame::{DrawTarget, FrameRenderer, ViewState};
pub use geometry::{DisplayList, TriangleBatch, Vertex, MAX_DISPLAY_LIST_SIZE};
pub use loader::{load_mesh, load_mesh_bytes};
pub use projection::OrthoCamera;
pub use scene::{Batch, BatchStore, RenderMode, Scene};
pub use transform::{RotationState, Transform};
