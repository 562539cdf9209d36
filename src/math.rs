pub type Real = f32;
pub type Point = na::Point3<Real>;
pub type Vector = na::Vector3<Real>;
pub type Rotation = na::UnitQuaternion<Real>;
pub type Isometry = na::Isometry3<Real>;
pub type Translation = na::Translation3<Real>;

/// A half-line starting at `origin`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Ray {
    pub origin: Point,
    /// Unit direction.
    pub dir: Vector,
}

impl Ray {
    pub fn new(origin: Point, dir: Vector) -> Self {
        let dir = dir.try_normalize(Real::EPSILON).unwrap_or_else(Vector::z);
        Self { origin, dir }
    }

    pub fn point_at(&self, distance: Real) -> Point {
        self.origin + self.dir * distance
    }
}

/// The direction the stylus points toward, in its local frame.
pub fn forward() -> Vector {
    Vector::z()
}

/// Rotation looking along `dir` with the given `up`, keeping the local `+Z` as the forward axis.
pub fn look_rotation(dir: &Vector, up: &Vector) -> Rotation {
    if dir.norm_squared() <= Real::EPSILON {
        return Rotation::identity();
    }

    Rotation::face_towards(dir, up)
}
