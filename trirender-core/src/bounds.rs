/// Axis-aligned bounding box accumulated over every loaded vertex
use nalgebra::{Point3, Vector3};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: Point3<f32>,
    pub max: Point3<f32>,
}

impl BoundingBox {
    /// The degenerate box: `min` at +inf, `max` at -inf, so the first
    /// included point becomes both corners.
    pub fn empty() -> Self {
        Self {
            min: Point3::new(f32::INFINITY, f32::INFINITY, f32::INFINITY),
            max: Point3::new(f32::NEG_INFINITY, f32::NEG_INFINITY, f32::NEG_INFINITY),
        }
    }

    /// True until at least one point has been included
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    pub fn include(&mut self, x: f32, y: f32, z: f32) {
        self.min.x = self.min.x.min(x);
        self.min.y = self.min.y.min(y);
        self.min.z = self.min.z.min(z);
        self.max.x = self.max.x.max(x);
        self.max.y = self.max.y.max(y);
        self.max.z = self.max.z.max(z);
    }

    /// Widen this box so it also covers `other`, axis by axis. An axis that
    /// never saw a finite value in `other` leaves this box unchanged on it.
    pub fn union(&mut self, other: &BoundingBox) {
        self.min.x = self.min.x.min(other.min.x);
        self.min.y = self.min.y.min(other.min.y);
        self.min.z = self.min.z.min(other.min.z);
        self.max.x = self.max.x.max(other.max.x);
        self.max.y = self.max.y.max(other.max.y);
        self.max.z = self.max.z.max(other.max.z);
    }

    pub fn center(&self) -> Point3<f32> {
        Point3::from((self.min.coords + self.max.coords) / 2.0)
    }

    pub fn extent(&self) -> Vector3<f32> {
        self.max - self.min
    }

    /// Width along X. The camera frames the scene with this span alone.
    pub fn x_span(&self) -> f32 {
        self.max.x - self.min.x
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::empty()
    }
}
