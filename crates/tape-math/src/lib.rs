#![warn(missing_docs)]

//! Geometry primitives for the scaled tape measure tool.
//!
//! Thin wrappers around nalgebra: points, vectors, affine transforms,
//! infinite lines and planes, axis-aligned boxes and the model axis
//! triad. Model space lengths are in inches, the host's internal unit.

use nalgebra::{Matrix3, Matrix4, Unit, Vector3, Vector4};

/// A point in model space.
pub type Point3 = nalgebra::Point3<f64>;

/// A vector in model space.
pub type Vec3 = Vector3<f64>;

/// A unit (normalized) direction vector.
pub type Dir3 = Unit<Vector3<f64>>;

/// A 4x4 affine local-to-world transformation.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// The underlying 4x4 matrix.
    pub matrix: Matrix4<f64>,
}

impl Transform {
    /// Identity transform.
    pub fn identity() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }

    /// Translation by `(dx, dy, dz)`.
    pub fn translation(dx: f64, dy: f64, dz: f64) -> Self {
        Self {
            matrix: Matrix4::new_translation(&Vec3::new(dx, dy, dz)),
        }
    }

    /// Non-uniform scale by `(sx, sy, sz)`.
    pub fn scale(sx: f64, sy: f64, sz: f64) -> Self {
        Self {
            matrix: Matrix4::new_nonuniform_scaling(&Vec3::new(sx, sy, sz)),
        }
    }

    /// Rotation about the Z axis by `angle` radians.
    pub fn rotation_z(angle: f64) -> Self {
        Self {
            matrix: Matrix4::new_rotation(Vec3::new(0.0, 0.0, angle)),
        }
    }

    /// Build a transform from a column-major 16 element array, the layout
    /// hosts hand over for instance transformations.
    pub fn from_column_slice(values: &[f64; 16]) -> Self {
        Self {
            matrix: Matrix4::from_column_slice(values),
        }
    }

    /// Compose: `self * other`, i.e. `other` is applied first.
    pub fn then(&self, other: &Transform) -> Self {
        Self {
            matrix: self.matrix * other.matrix,
        }
    }

    /// Transform a point.
    pub fn apply_point(&self, p: &Point3) -> Point3 {
        let v = self.matrix * Vector4::new(p.x, p.y, p.z, 1.0);
        Point3::new(v.x, v.y, v.z)
    }

    /// Transform a direction vector (translation is ignored).
    pub fn apply_vec(&self, v: &Vec3) -> Vec3 {
        self.linear_part() * v
    }

    /// Transform a surface normal with the inverse transpose of the linear
    /// part. Plain vector transformation is wrong under non-uniform scale or
    /// shear. The result is not normalized.
    ///
    /// Returns `None` for a degenerate (non-invertible) transform.
    pub fn apply_normal(&self, n: &Vec3) -> Option<Vec3> {
        self.linear_part()
            .try_inverse()
            .map(|inv| inv.transpose() * n)
    }

    /// Upper-left 3x3 block.
    pub fn linear_part(&self) -> Matrix3<f64> {
        self.matrix.fixed_view::<3, 3>(0, 0).into_owned()
    }

    /// Inverse of this transform, if it exists.
    pub fn inverse(&self) -> Option<Self> {
        self.matrix.try_inverse().map(|matrix| Self { matrix })
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

/// Tolerances for "exactly on" geometric tests.
#[derive(Debug, Clone, Copy)]
pub struct Tolerance {
    /// Linear distance tolerance in inches.
    pub linear: f64,
    /// Angular tolerance in radians (compared against the sine of the angle).
    pub angular: f64,
}

impl Tolerance {
    /// The host's modeling tolerance: a thousandth of an inch.
    pub const DEFAULT: Self = Self {
        linear: 1e-3,
        angular: 1e-6,
    };

    /// Check if two points are coincident within tolerance.
    pub fn points_equal(&self, a: &Point3, b: &Point3) -> bool {
        (a - b).norm() < self.linear
    }

    /// Check if a scalar distance is effectively zero.
    pub fn is_zero(&self, d: f64) -> bool {
        d.abs() < self.linear
    }

    /// Check if two directions are parallel (same or opposite sense).
    pub fn parallel(&self, a: &Vec3, b: &Vec3) -> bool {
        let (la, lb) = (a.norm(), b.norm());
        if la == 0.0 || lb == 0.0 {
            return false;
        }
        a.cross(b).norm() / (la * lb) < self.angular
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// An infinite line through `origin` along `direction`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    /// A point on the line.
    pub origin: Point3,
    /// Unit direction.
    pub direction: Dir3,
}

impl Line {
    /// Line through `origin` along `direction`. `None` for a zero direction.
    pub fn new(origin: Point3, direction: Vec3) -> Option<Self> {
        Dir3::try_new(direction, f64::EPSILON).map(|direction| Self { origin, direction })
    }

    /// Line through two points. `None` when the points coincide.
    pub fn through(a: Point3, b: Point3) -> Option<Self> {
        Self::new(a, b - a)
    }

    /// Closest point on the line to `p`.
    pub fn project(&self, p: &Point3) -> Point3 {
        let d = self.direction.as_ref();
        self.origin + d * (p - self.origin).dot(d)
    }

    /// Distance from `p` to the line.
    pub fn distance(&self, p: &Point3) -> f64 {
        (p - self.project(p)).norm()
    }

    /// Whether `p` lies on the line within tolerance.
    pub fn contains(&self, p: &Point3, tol: &Tolerance) -> bool {
        tol.is_zero(self.distance(p))
    }
}

/// An infinite plane through `origin` with unit `normal`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    /// A point on the plane.
    pub origin: Point3,
    /// Unit normal.
    pub normal: Dir3,
}

impl Plane {
    /// Plane through `origin` with the given normal. `None` for a zero normal.
    pub fn new(origin: Point3, normal: Vec3) -> Option<Self> {
        Dir3::try_new(normal, f64::EPSILON).map(|normal| Self { origin, normal })
    }

    /// Signed distance from `p` to the plane, positive on the normal side.
    pub fn signed_distance(&self, p: &Point3) -> f64 {
        (p - self.origin).dot(self.normal.as_ref())
    }

    /// Orthogonal projection of `p` onto the plane.
    pub fn project(&self, p: &Point3) -> Point3 {
        p - self.normal.as_ref() * self.signed_distance(p)
    }

    /// Whether `p` lies on the plane within tolerance.
    pub fn contains(&self, p: &Point3, tol: &Tolerance) -> bool {
        tol.is_zero(self.signed_distance(p))
    }
}

/// Axis-aligned bounding box. A fresh box is empty until a point is added.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Minimum corner.
    pub min: Point3,
    /// Maximum corner.
    pub max: Point3,
}

impl BoundingBox {
    /// An empty box.
    pub fn empty() -> Self {
        Self {
            min: Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            max: Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    /// Smallest box containing all `points`.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point3>) -> Self {
        let mut bb = Self::empty();
        for p in points {
            bb.add(p);
        }
        bb
    }

    /// Whether no point has been added.
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x
    }

    /// Grow the box to contain `p`.
    pub fn add(&mut self, p: &Point3) {
        self.min = self.min.inf(p);
        self.max = self.max.sup(p);
    }

    /// Grow the box to contain `other`.
    pub fn union(&mut self, other: &BoundingBox) {
        if !other.is_empty() {
            self.add(&other.min);
            self.add(&other.max);
        }
    }

    /// Extent along X.
    pub fn width(&self) -> f64 {
        self.extent(0)
    }

    /// Extent along Y.
    pub fn depth(&self) -> f64 {
        self.extent(1)
    }

    /// Extent along Z.
    pub fn height(&self) -> f64 {
        self.extent(2)
    }

    fn extent(&self, i: usize) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.max[i] - self.min[i]
        }
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::empty()
    }
}

/// One of the three model axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Red axis.
    X,
    /// Green axis.
    Y,
    /// Blue axis.
    Z,
}

impl Axis {
    /// All axes in X, Y, Z order.
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];
}

/// The model's axis triad: an origin and three orthogonal directions.
///
/// The triad can be moved and rotated by the user, so it is not assumed to
/// coincide with world coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Axes {
    /// Origin of the triad.
    pub origin: Point3,
    /// X direction.
    pub x: Dir3,
    /// Y direction.
    pub y: Dir3,
    /// Z direction.
    pub z: Dir3,
}

impl Axes {
    /// World-aligned axes at the world origin.
    pub fn world() -> Self {
        Self {
            origin: Point3::origin(),
            x: Vec3::x_axis(),
            y: Vec3::y_axis(),
            z: Vec3::z_axis(),
        }
    }

    /// Direction of `axis`.
    pub fn direction(&self, axis: Axis) -> Dir3 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    /// The infinite line along `axis` through the triad origin.
    pub fn line(&self, axis: Axis) -> Line {
        Line {
            origin: self.origin,
            direction: self.direction(axis),
        }
    }

    /// The axis `v` is parallel to, if any.
    pub fn parallel_axis(&self, v: &Vec3, tol: &Tolerance) -> Option<Axis> {
        Axis::ALL
            .into_iter()
            .find(|&axis| tol.parallel(v, self.direction(axis).as_ref()))
    }
}

impl Default for Axes {
    fn default() -> Self {
        Self::world()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    #[test]
    fn test_translation_leaves_vectors_alone() {
        let t = Transform::translation(10.0, 20.0, 30.0);
        let p = t.apply_point(&Point3::new(1.0, 2.0, 3.0));
        assert_relative_eq!(p.x, 11.0);
        assert_relative_eq!(p.y, 22.0);
        assert_relative_eq!(p.z, 33.0);
        let v = t.apply_vec(&Vec3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(v.x, 1.0);
        assert_relative_eq!(v.y, 0.0);
    }

    #[test]
    fn test_rotation_z_90() {
        let t = Transform::rotation_z(PI / 2.0);
        let p = t.apply_point(&Point3::new(1.0, 0.0, 0.0));
        assert!(p.x.abs() < 1e-12);
        assert_relative_eq!(p.y, 1.0);
    }

    #[test]
    fn test_compose_applies_right_hand_side_first() {
        let translate = Transform::translation(1.0, 0.0, 0.0);
        let scale = Transform::scale(2.0, 2.0, 2.0);
        let p = scale.then(&translate).apply_point(&Point3::origin());
        assert_relative_eq!(p.x, 2.0);
    }

    #[test]
    fn test_normal_under_nonuniform_scale_stays_perpendicular() {
        // A 45 degree slanted plane, squashed along X.
        let t = Transform::scale(4.0, 1.0, 1.0);
        let tangent = Vec3::new(1.0, -1.0, 0.0);
        let normal = Vec3::new(1.0, 1.0, 0.0);

        let moved_tangent = t.apply_vec(&tangent);
        let plain = t.apply_vec(&normal);
        let proper = t.apply_normal(&normal).unwrap();

        assert!(moved_tangent.dot(&plain).abs() > 1.0);
        assert!(moved_tangent.dot(&proper).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_transform_has_no_normal_transform() {
        let t = Transform::scale(1.0, 0.0, 1.0);
        assert!(t.apply_normal(&Vec3::z()).is_none());
        assert!(t.inverse().is_none());
    }

    #[test]
    fn test_inverse_roundtrip() {
        let t = Transform::translation(1.0, 2.0, 3.0).then(&Transform::rotation_z(0.3));
        let inv = t.inverse().unwrap();
        let p = Point3::new(5.0, 6.0, 7.0);
        let back = inv.apply_point(&t.apply_point(&p));
        assert!((back - p).norm() < 1e-12);
    }

    #[test]
    fn test_line_contains_and_project() {
        let tol = Tolerance::DEFAULT;
        let line = Line::through(Point3::new(0.0, 0.0, 0.0), Point3::new(2.0, 0.0, 0.0)).unwrap();
        assert!(line.contains(&Point3::new(-7.0, 0.0, 0.0), &tol));
        assert!(!line.contains(&Point3::new(1.0, 0.01, 0.0), &tol));
        let p = line.project(&Point3::new(3.0, 4.0, 5.0));
        assert_relative_eq!(p.x, 3.0);
        assert_relative_eq!(p.y, 0.0);
        assert!(Line::through(Point3::origin(), Point3::origin()).is_none());
    }

    #[test]
    fn test_plane_projection() {
        let plane = Plane::new(Point3::origin(), Vec3::new(1.0, 0.0, 0.0)).unwrap();
        let p = plane.project(&Point3::new(2.0, 3.0, 4.0));
        assert_relative_eq!(p.x, 0.0);
        assert_relative_eq!(p.y, 3.0);
        assert_relative_eq!(p.z, 4.0);
        assert!(plane.contains(&p, &Tolerance::DEFAULT));
        assert!(Plane::new(Point3::origin(), Vec3::zeros()).is_none());
    }

    #[test]
    fn test_bounding_box_extents() {
        let mut bb = BoundingBox::empty();
        assert!(bb.is_empty());
        assert_eq!(bb.width(), 0.0);
        bb.add(&Point3::new(1.0, 2.0, 3.0));
        bb.add(&Point3::new(4.0, 0.0, 10.0));
        assert_relative_eq!(bb.width(), 3.0);
        assert_relative_eq!(bb.depth(), 2.0);
        assert_relative_eq!(bb.height(), 7.0);

        let mut other = BoundingBox::empty();
        other.union(&bb);
        assert_eq!(other, bb);
    }

    #[test]
    fn test_parallel_axis() {
        let axes = Axes::world();
        let tol = Tolerance::DEFAULT;
        assert_eq!(axes.parallel_axis(&Vec3::new(0.0, -3.0, 0.0), &tol), Some(Axis::Y));
        assert_eq!(axes.parallel_axis(&Vec3::new(1.0, 1.0, 0.0), &tol), None);
        assert_eq!(axes.parallel_axis(&Vec3::zeros(), &tol), None);
    }
}
