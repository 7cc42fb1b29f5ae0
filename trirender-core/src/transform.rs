/// 3D transformation matrices and rotation state
use nalgebra::{Matrix4, Rotation3, Unit, Vector3};

/// Axis the camera spins around. Passed unnormalized; the rotation
/// primitive normalizes it the same way `glRotatef` does.
pub const SPIN_AXIS: [f32; 3] = [0.0, 1.0, 1.0];

/// Rotation angle in degrees, advanced once per frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationState {
    pub angle: f32,
}

impl RotationState {
    pub fn new(angle: f32) -> Self {
        Self { angle }
    }

    pub fn zero() -> Self {
        Self { angle: 0.0 }
    }

    /// Rotate by `degrees`. The angle keeps growing; it is never wrapped.
    pub fn rotate(&mut self, degrees: f32) {
        self.angle += degrees;
    }
}

impl Default for RotationState {
    fn default() -> Self {
        Self::zero()
    }
}

/// Transform builder for 3D transformations
pub struct Transform;

impl Transform {
    /// Rotation of `degrees` about `axis`. A zero axis yields the identity.
    pub fn rotation_matrix(degrees: f32, axis: &Vector3<f32>) -> Matrix4<f32> {
        match Unit::try_new(*axis, f32::EPSILON) {
            Some(axis) => Rotation3::from_axis_angle(&axis, degrees.to_radians()).to_homogeneous(),
            None => Matrix4::identity(),
        }
    }

    /// Rotation of the spinning camera for the given state
    pub fn spin_matrix(rotation: &RotationState) -> Matrix4<f32> {
        Self::rotation_matrix(rotation.angle, &Vector3::from(SPIN_AXIS))
    }

    /// Create a translation matrix
    pub fn translation_matrix(x: f32, y: f32, z: f32) -> Matrix4<f32> {
        Matrix4::new_translation(&Vector3::new(x, y, z))
    }

    /// Create a scale matrix
    pub fn scale_matrix(sx: f32, sy: f32, sz: f32) -> Matrix4<f32> {
        Matrix4::new_nonuniform_scaling(&Vector3::new(sx, sy, sz))
    }

    /// Combine a projection with a model-view matrix
    pub fn mvp_matrix(model_view: &Matrix4<f32>, projection: &Matrix4<f32>) -> Matrix4<f32> {
        projection * model_view
    }
}
