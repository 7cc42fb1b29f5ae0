/// Per-frame camera setup and geometry replay
use nalgebra::{Matrix4, Point3, Vector3};

use crate::geometry::DisplayList;
use crate::projection::OrthoCamera;
use crate::scene::{Batch, RenderMode, Scene};
use crate::transform::RotationState;

/// Degrees added to the rotation after every frame
pub const DEGREES_PER_FRAME: f32 = 1.0;

/// The drawing surface a host provides.
///
/// Calls arrive in the order of an immediate-mode pipeline: clear, set the
/// matrices, submit triangles, present.
pub trait DrawTarget {
    fn clear(&mut self);

    fn set_projection(&mut self, projection: &Matrix4<f32>);

    fn set_model_view(&mut self, model_view: &Matrix4<f32>);

    /// Open a triangle scope; every three submitted vertices form a triangle
    fn begin_triangles(&mut self);

    fn submit(&mut self, normal: &Vector3<f32>, position: &Point3<f32>);

    fn end_triangles(&mut self);

    /// Replay a compiled list. Targets with a faster path for prepared
    /// vertices override this.
    fn call_list(&mut self, list: &DisplayList) {
        self.begin_triangles();
        for vertex in list.vertices() {
            self.submit(&vertex.normal, &vertex.position);
        }
        self.end_triangles();
    }

    /// Swap the back buffer to the front
    fn present(&mut self);
}

/// Rotation and zoom of the viewer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewState {
    pub rotation: RotationState,
    pub zoom: f32,
}

impl ViewState {
    pub fn new(zoom: f32) -> Self {
        Self {
            rotation: RotationState::zero(),
            zoom,
        }
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(1.0)
    }
}

/// Draws the scene from a camera that turns one degree per frame
#[derive(Debug, Clone, Default)]
pub struct FrameRenderer {
    view: ViewState,
    frames: u64,
}

impl FrameRenderer {
    pub fn new(zoom: f32) -> Self {
        Self {
            view: ViewState::new(zoom),
            frames: 0,
        }
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    /// Number of frames rendered so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Render one frame of `scene` into `target` and advance the rotation.
    ///
    /// When the scene cannot be framed (nothing loaded, or no extent on any
    /// axis) the frame is cleared and presented without geometry.
    pub fn render_frame<T: DrawTarget + ?Sized>(&mut self, scene: &Scene, target: &mut T) {
        target.clear();

        match OrthoCamera::framing(scene.bounds(), self.view.zoom) {
            Some(camera) => {
                target.set_projection(&camera.projection_matrix());
                target.set_model_view(&camera.view_matrix(&self.view.rotation));
                match scene.mode() {
                    RenderMode::DisplayLists => replay_lists(scene, target),
                    RenderMode::Immediate => replay_arrays(scene, target),
                }
            }
            None => log::trace!("frame {}: nothing to frame", self.frames),
        }

        target.present();

        self.view.rotation.rotate(DEGREES_PER_FRAME);
        self.frames += 1;
    }
}

fn replay_lists<T: DrawTarget + ?Sized>(scene: &Scene, target: &mut T) {
    for batch in scene.batches() {
        if let Batch::Compiled { lists, .. } = batch {
            for list in lists {
                target.call_list(list);
            }
        }
    }
}

fn replay_arrays<T: DrawTarget + ?Sized>(scene: &Scene, target: &mut T) {
    for batch in scene.batches() {
        if let Batch::Raw(raw) = batch {
            target.begin_triangles();
            for vertex in raw.iter() {
                target.submit(&vertex.normal, &vertex.position);
            }
            target.end_triangles();
        }
    }
}
