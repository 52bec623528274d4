//! Value types of the wrapped library.

use std::ops::{Deref, DerefMut};

use cgmath::{EuclideanSpace, MetricSpace, Point3};

use meshbind_core::impl_native_object;

/// Scalar type used for coordinates.
pub type Scalar = f32;

/// A 3D point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point(pub Point3<Scalar>);

impl Point {
    pub fn new(x: Scalar, y: Scalar, z: Scalar) -> Self {
        Point(Point3::new(x, y, z))
    }

    /// Component-wise minimum.
    pub fn min(self, other: Point) -> Point {
        Point::new(self.x.min(other.x), self.y.min(other.y), self.z.min(other.z))
    }

    /// Component-wise maximum.
    pub fn max(self, other: Point) -> Point {
        Point::new(self.x.max(other.x), self.y.max(other.y), self.z.max(other.z))
    }
}

impl Deref for Point {
    type Target = Point3<Scalar>;

    fn deref(&self) -> &Point3<Scalar> {
        &self.0
    }
}

impl DerefMut for Point {
    fn deref_mut(&mut self) -> &mut Point3<Scalar> {
        &mut self.0
    }
}

impl From<Point3<Scalar>> for Point {
    fn from(p: Point3<Scalar>) -> Self {
        Point(p)
    }
}

impl_native_object!(Point, "pmp::Point");

/// Axis-aligned bounding box. Empty until a point is added.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    min: Point,
    max: Point,
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self {
            min: Point::new(Scalar::MAX, Scalar::MAX, Scalar::MAX),
            max: Point::new(-Scalar::MAX, -Scalar::MAX, -Scalar::MAX),
        }
    }
}

impl BoundingBox {
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point>) -> Self {
        let mut bb = Self::default();
        for p in points {
            bb.add_point(p);
        }
        bb
    }

    pub fn add_point(&mut self, p: &Point) {
        self.min = self.min.min(*p);
        self.max = self.max.max(*p);
    }

    pub fn min(&self) -> Point {
        self.min
    }

    pub fn max(&self) -> Point {
        self.max
    }

    pub fn center(&self) -> Point {
        Point(self.min.0.midpoint(self.max.0))
    }

    /// Length of the diagonal; zero when empty.
    pub fn size(&self) -> Scalar {
        if self.is_empty() {
            0.0
        } else {
            self.min.0.distance(self.max.0)
        }
    }

    pub fn is_empty(&self) -> bool {
        (0..3).any(|i| self.max[i] < self.min[i])
    }
}

impl_native_object!(BoundingBox, "pmp::BoundingBox");

/// Options for writing meshes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IOFlags {
    pub use_binary: bool,
    pub use_vertex_normals: bool,
    pub use_vertex_colors: bool,
    pub use_vertex_texcoords: bool,
    pub use_face_normals: bool,
    pub use_face_colors: bool,
}

impl_native_object!(IOFlags, "pmp::IOFlags");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounding_box_grows_with_points() {
        let mut bb = BoundingBox::default();
        assert!(bb.is_empty());
        assert_eq!(bb.size(), 0.0);

        bb.add_point(&Point::new(0.0, 0.0, 0.0));
        bb.add_point(&Point::new(2.0, 0.0, 0.0));
        assert!(!bb.is_empty());
        assert_eq!(bb.center(), Point::new(1.0, 0.0, 0.0));
        assert_eq!(bb.size(), 2.0);
        assert_eq!(bb.min(), Point::new(0.0, 0.0, 0.0));
        assert_eq!(bb.max(), Point::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn diagonal_of_unit_cube() {
        let bb = BoundingBox::from_points(&[Point::new(0.0, 0.0, 0.0), Point::new(1.0, 1.0, 1.0)]);
        assert!((bb.size() - 3.0_f32.sqrt()).abs() < 1e-6);
        assert_eq!(bb.center().x, 0.5);
    }

    #[test]
    fn io_flags_default_to_off() {
        let flags = IOFlags::default();
        assert!(!flags.use_binary && !flags.use_face_colors);
    }
}
