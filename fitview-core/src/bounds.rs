//! Axis-aligned bounds and the bounding volume consumed by framing

use nalgebra::{Point3, Vector3};

use crate::geometry::Mesh;

/// Center and diagonal length of a model's axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingVolume {
    pub center: Point3<f32>,
    pub diagonal_length: f32,
}

impl BoundingVolume {
    pub fn new(center: Point3<f32>, diagonal_length: f32) -> Self {
        Self {
            center,
            diagonal_length,
        }
    }
}

/// Axis-aligned bounding box accumulated from points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Point3<f32>,
    pub max: Point3<f32>,
}

impl Aabb {
    /// A box containing nothing; extending it with a point yields that point
    pub fn empty() -> Self {
        Self {
            min: Point3::new(f32::INFINITY, f32::INFINITY, f32::INFINITY),
            max: Point3::new(f32::NEG_INFINITY, f32::NEG_INFINITY, f32::NEG_INFINITY),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    pub fn extend(&mut self, point: &Point3<f32>) {
        self.min = self.min.inf(point);
        self.max = self.max.sup(point);
    }

    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point3<f32>>) -> Self {
        let mut aabb = Self::empty();
        for point in points {
            aabb.extend(point);
        }
        aabb
    }

    /// Bounds of every vertex across a set of meshes
    pub fn from_meshes<'a>(meshes: impl IntoIterator<Item = &'a Mesh>) -> Self {
        let mut aabb = Self::empty();
        for mesh in meshes {
            for point in mesh.positions() {
                aabb.extend(point);
            }
        }
        aabb
    }

    /// Width, height and depth; zero for an empty box
    pub fn size(&self) -> Vector3<f32> {
        if self.is_empty() {
            return Vector3::zeros();
        }
        self.max - self.min
    }

    pub fn center(&self) -> Point3<f32> {
        if self.is_empty() {
            return Point3::origin();
        }
        nalgebra::center(&self.min, &self.max)
    }

    /// Center plus Euclidean length of the size vector, `None` when empty
    pub fn bounding_volume(&self) -> Option<BoundingVolume> {
        if self.is_empty() {
            return None;
        }
        Some(BoundingVolume::new(self.center(), self.size().norm()))
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_empty_box_has_no_volume() {
        let aabb = Aabb::empty();
        assert!(aabb.is_empty());
        assert_eq!(aabb.size(), Vector3::zeros());
        assert!(aabb.bounding_volume().is_none());
    }

    #[test]
    fn test_single_point_has_zero_diagonal() {
        let aabb = Aabb::from_points(&[Point3::new(1.0, 2.0, 3.0)]);
        let volume = aabb.bounding_volume().unwrap();
        assert_eq!(volume.center, Point3::new(1.0, 2.0, 3.0));
        assert_eq!(volume.diagonal_length, 0.0);
    }

    #[test]
    fn test_center_and_diagonal() {
        let aabb = Aabb::from_points(&[
            Point3::new(-1.0, 0.0, -2.0),
            Point3::new(1.0, 4.0, 2.0),
            Point3::new(0.0, 2.0, 0.0),
        ]);
        assert_eq!(aabb.size(), Vector3::new(2.0, 4.0, 4.0));
        let volume = aabb.bounding_volume().unwrap();
        assert_eq!(volume.center, Point3::new(0.0, 2.0, 0.0));
        assert_relative_eq!(volume.diagonal_length, 6.0);
    }

    #[test]
    fn test_from_meshes_spans_all_meshes() {
        let small = Mesh::cube(2.0);
        let mut offset = Mesh::cube(2.0);
        for triangle in &mut offset.triangles {
            for vertex in &mut triangle.vertices {
                vertex.position.y += 10.0;
            }
        }
        let aabb = Aabb::from_meshes([&small, &offset]);
        assert_eq!(aabb.min, Point3::new(-1.0, -1.0, -1.0));
        assert_eq!(aabb.max, Point3::new(1.0, 11.0, 1.0));
    }
}
