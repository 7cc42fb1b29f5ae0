/// Orthographic camera that frames the scene bounds
use nalgebra::{Matrix4, Point3};

use crate::bounds::BoundingBox;
use crate::transform::{RotationState, Transform};

/// Cube-shaped orthographic viewing volume centred on the geometry.
///
/// The half-width of the cube is the X span of the bounds on every axis, so
/// tall or deep scenes can poke out of the view. That coupling is intended.
/// Geometry lying flat in the YZ plane falls back to its largest extent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrthoCamera {
    pub size: f32,
    pub center: Point3<f32>,
    pub zoom: f32,
}

impl OrthoCamera {
    /// Frame `bounds`, or `None` when there is nothing to frame: the bounds
    /// are still empty or every extent is zero or not finite.
    pub fn framing(bounds: &BoundingBox, zoom: f32) -> Option<Self> {
        if bounds.is_empty() {
            return None;
        }
        let usable = |span: f32| span.is_finite() && span > 0.0;
        let size = bounds.x_span();
        let size = if usable(size) {
            size
        } else {
            let extent = bounds.extent();
            extent.y.max(extent.z)
        };
        if !usable(size) {
            return None;
        }
        Some(Self {
            size,
            center: bounds.center(),
            zoom,
        })
    }

    /// `scale(zoom) * ortho(-size, size, -size, size, -size, size)` with
    /// OpenGL clip conventions.
    pub fn projection_matrix(&self) -> Matrix4<f32> {
        let s = self.size;
        let ortho = Matrix4::new_orthographic(-s, s, -s, s, -s, s);
        Transform::scale_matrix(self.zoom, self.zoom, self.zoom) * ortho
    }

    /// Spin about the fixed axis, after moving the bounds centre to the origin
    pub fn view_matrix(&self, rotation: &RotationState) -> Matrix4<f32> {
        let c = self.center;
        Transform::spin_matrix(rotation) * Transform::translation_matrix(-c.x, -c.y, -c.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_bounds() -> BoundingBox {
        let mut bounds = BoundingBox::empty();
        bounds.include(0.0, 0.0, 0.0);
        bounds.include(1.0, 1.0, 0.0);
        bounds
    }

    #[test]
    fn test_empty_bounds_cannot_be_framed() {
        assert!(OrthoCamera::framing(&BoundingBox::empty(), 1.0).is_none());
    }

    #[test]
    fn test_flat_x_span_uses_largest_extent() {
        let mut bounds = BoundingBox::empty();
        bounds.include(2.0, 0.0, 0.0);
        bounds.include(2.0, 5.0, 1.0);
        let camera = OrthoCamera::framing(&bounds, 1.0).unwrap();
        assert_eq!(camera.size, 5.0);
        assert_eq!(camera.center, Point3::new(2.0, 2.5, 0.5));

        let mvp = camera.projection_matrix() * camera.view_matrix(&RotationState::zero());
        let top = mvp.transform_point(&Point3::new(2.0, 5.0, 0.5));
        assert!((top.y - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_single_point_cannot_be_framed() {
        let mut bounds = BoundingBox::empty();
        bounds.include(1.0, 1.0, 1.0);
        assert!(OrthoCamera::framing(&bounds, 1.0).is_none());
    }

    #[test]
    fn test_center_maps_to_origin() {
        let camera = OrthoCamera::framing(&unit_bounds(), 1.0).unwrap();
        assert_eq!(camera.size, 1.0);
        assert_eq!(camera.center, Point3::new(0.5, 0.5, 0.0));

        let mvp = camera.projection_matrix() * camera.view_matrix(&RotationState::new(37.0));
        let p = mvp.transform_point(&camera.center);
        assert!(p.coords.norm() < 1e-6);
    }

    #[test]
    fn test_x_span_fills_half_the_view() {
        let camera = OrthoCamera::framing(&unit_bounds(), 1.0).unwrap();
        let mvp = camera.projection_matrix() * camera.view_matrix(&RotationState::zero());
        let right = mvp.transform_point(&Point3::new(1.0, 0.5, 0.0));
        assert!((right.x - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_zoom_scales_clip_space() {
        let camera = OrthoCamera::framing(&unit_bounds(), 2.0).unwrap();
        let mvp = camera.projection_matrix() * camera.view_matrix(&RotationState::zero());
        let right = mvp.transform_point(&Point3::new(1.0, 0.5, 0.0));
        assert!((right.x - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_depth_follows_gl_convention() {
        let mut bounds = BoundingBox::empty();
        bounds.include(-1.0, -1.0, -1.0);
        bounds.include(1.0, 1.0, 1.0);
        let camera = OrthoCamera::framing(&bounds, 1.0).unwrap();
        let mvp = camera.projection_matrix() * camera.view_matrix(&RotationState::zero());

        // Points nearer the viewer (larger eye z) get smaller depth
        let near = mvp.transform_point(&Point3::new(0.0, 0.0, 1.0));
        let far = mvp.transform_point(&Point3::new(0.0, 0.0, -1.0));
        assert!(near.z < far.z);
        assert!((near.z + 0.5).abs() < 1e-6);
    }
}
