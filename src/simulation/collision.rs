//! Axis-aligned bounding boxes
//!
//! World-space bounds are recomputed from the scene graph every frame; an
//! `Aabb` value is only ever valid for the frame that produced it. The
//! overlap test is closed-interval, so touching boxes count as
//! intersecting.

use cgmath::{Matrix4, Point3, Transform, Vector3};

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vector3<f32>,
    pub max: Vector3<f32>,
}

impl Aabb {
    /// Inverted box, ready to expand.
    pub const EMPTY: Self = Self {
        min: Vector3 {
            x: f32::INFINITY,
            y: f32::INFINITY,
            z: f32::INFINITY,
        },
        max: Vector3 {
            x: f32::NEG_INFINITY,
            y: f32::NEG_INFINITY,
            z: f32::NEG_INFINITY,
        },
    };

    pub const fn new(min: Vector3<f32>, max: Vector3<f32>) -> Self {
        Self { min, max }
    }

    pub fn from_center_size(center: Vector3<f32>, size: Vector3<f32>) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.max.x < self.min.x || self.max.y < self.min.y || self.max.z < self.min.z
    }

    pub fn center(&self) -> Vector3<f32> {
        (self.min + self.max) * 0.5
    }

    /// Grows the box to contain `point`.
    pub fn expand_by_point(&mut self, point: Vector3<f32>) {
        self.min.x = self.min.x.min(point.x);
        self.min.y = self.min.y.min(point.y);
        self.min.z = self.min.z.min(point.z);
        self.max.x = self.max.x.max(point.x);
        self.max.y = self.max.y.max(point.y);
        self.max.z = self.max.z.max(point.z);
    }

    /// Grows the box to contain another box.
    pub fn union(&mut self, other: &Aabb) {
        if other.is_empty() {
            return;
        }
        self.expand_by_point(other.min);
        self.expand_by_point(other.max);
    }

    /// The axis-aligned bounds of this box under `matrix`, computed from
    /// the eight transformed corners.
    pub fn transformed(&self, matrix: &Matrix4<f32>) -> Aabb {
        if self.is_empty() {
            return *self;
        }
        let mut result = Aabb::EMPTY;
        for i in 0..8 {
            let corner = Point3::new(
                if i & 1 == 0 { self.min.x } else { self.max.x },
                if i & 2 == 0 { self.min.y } else { self.max.y },
                if i & 4 == 0 { self.min.z } else { self.max.z },
            );
            let p = matrix.transform_point(corner);
            result.expand_by_point(Vector3::new(p.x, p.y, p.z));
        }
        result
    }

    /// Closed-interval overlap test; touching faces intersect.
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit() -> Aabb {
        Aabb::new(Vector3::new(0.0, 0.0, 0.0), Vector3::new(1.0, 1.0, 1.0))
    }

    #[test]
    fn test_intersects_overlapping_boxes() {
        let a = unit();
        let b = Aabb::new(Vector3::new(0.5, 0.5, 0.5), Vector3::new(2.0, 2.0, 2.0));
        assert!(a.intersects(&b));
    }

    #[test]
    fn test_intersects_disjoint_boxes() {
        let a = unit();
        let b = Aabb::new(Vector3::new(2.0, 2.0, 2.0), Vector3::new(3.0, 3.0, 3.0));
        assert!(!a.intersects(&b));
    }

    #[test]
    fn test_intersects_is_symmetric() {
        let pairs = [
            (unit(), Aabb::new(Vector3::new(0.5, 0.5, 0.5), Vector3::new(2.0, 2.0, 2.0))),
            (unit(), Aabb::new(Vector3::new(2.0, 2.0, 2.0), Vector3::new(3.0, 3.0, 3.0))),
            (unit(), Aabb::new(Vector3::new(1.0, 0.0, 0.0), Vector3::new(2.0, 1.0, 1.0))),
        ];
        for (a, b) in pairs {
            assert_eq!(a.intersects(&b), b.intersects(&a));
        }
    }

    #[test]
    fn test_touching_faces_intersect() {
        let a = unit();
        let b = Aabb::new(Vector3::new(1.0, 0.0, 0.0), Vector3::new(2.0, 1.0, 1.0));
        assert!(a.intersects(&b));
    }

    #[test]
    fn test_transformed_by_translation() {
        let a = unit();
        let shifted = a.transformed(&Matrix4::from_translation(Vector3::new(2.0, 0.0, -1.0)));
        assert_eq!(shifted.min, Vector3::new(2.0, 0.0, -1.0));
        assert_eq!(shifted.max, Vector3::new(3.0, 1.0, 0.0));
    }

    #[test]
    fn test_transformed_by_rotation_stays_aligned() {
        use cgmath::Deg;
        let a = Aabb::from_center_size(Vector3::new(0.0, 0.0, 0.0), Vector3::new(2.0, 2.0, 2.0));
        let rotated = a.transformed(&Matrix4::from_angle_y(Deg(45.0)));
        // A 45-degree yaw widens the footprint to sqrt(2) half-extents.
        let expected = 2.0f32.sqrt();
        assert!((rotated.max.x - expected).abs() < 1e-5);
        assert!((rotated.max.z - expected).abs() < 1e-5);
        assert!((rotated.max.y - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_union_and_empty() {
        let mut a = Aabb::EMPTY;
        assert!(a.is_empty());
        a.union(&unit());
        a.union(&Aabb::new(Vector3::new(-1.0, 0.0, 0.0), Vector3::new(0.0, 1.0, 1.0)));
        assert_eq!(a.min, Vector3::new(-1.0, 0.0, 0.0));
        assert_eq!(a.max, Vector3::new(1.0, 1.0, 1.0));
    }
}
