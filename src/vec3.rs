//! Small 3-vector helper shared by telemetry, commands, and kinematics.
//!
//! Kept as a hand-rolled newtype rather than a general linear-algebra
//! dependency, in keeping with the rest of this crate's numeric helpers.

use serde::{Deserialize, Serialize};

/// A point or direction in 3-D space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn dot(&self, other: &Vec3) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn norm(&self) -> f64 {
        self.dot(self).sqrt()
    }

    pub fn normalize(&self) -> Vec3 {
        let n = self.norm();
        if n <= f64::EPSILON {
            Vec3::ZERO
        } else {
            Vec3::new(self.x / n, self.y / n, self.z / n)
        }
    }

    pub fn sub(&self, other: &Vec3) -> Vec3 {
        Vec3::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }

    pub fn scale(&self, factor: f64) -> Vec3 {
        Vec3::new(self.x * factor, self.y * factor, self.z * factor)
    }

    pub fn centroid(points: &[Vec3]) -> Vec3 {
        if points.is_empty() {
            return Vec3::ZERO;
        }
        let sum = points.iter().fold(Vec3::ZERO, |acc, p| {
            Vec3::new(acc.x + p.x, acc.y + p.y, acc.z + p.z)
        });
        sum.scale(1.0 / points.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn dot_product() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);
        assert_eq!(a.dot(&b), 32.0);
    }

    #[test]
    fn norm_of_unit_vector() {
        let v = Vec3::new(3.0, 4.0, 0.0);
        assert_eq!(v.norm(), 5.0);
    }

    #[test]
    fn normalize_zero_vector_is_zero() {
        let v = Vec3::ZERO;
        assert_eq!(v.normalize(), Vec3::ZERO);
    }

    #[test]
    fn normalize_preserves_direction() {
        let v = Vec3::new(0.0, 10.0, 0.0);
        let n = v.normalize();
        assert_eq!(n, Vec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn centroid_of_points() {
        let points = vec![Vec3::new(0.0, 0.0, 0.0), Vec3::new(2.0, 2.0, 2.0)];
        let c = Vec3::centroid(&points);
        assert_eq!(c, Vec3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn centroid_of_empty_is_zero() {
        assert_eq!(Vec3::centroid(&[]), Vec3::ZERO);
    }
}
