use crate::math::{self, Isometry, Point, Ray, Real, Rotation, Vector};

pub use self::laser::LaserStylus;
pub use self::simulator::{CameraRay, StylusSimulator, StylusSimulatorMode};
pub use self::wand::WandStylus;

mod laser;
mod simulator;
mod wand;

/// Where the stylus is this frame, and the stylus-local point that acts as its tip.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct StylusPose {
    pub pose: Isometry,
    pub hot_spot: Vector,
}

impl Default for StylusPose {
    fn default() -> Self {
        Self {
            pose: Isometry::identity(),
            hot_spot: Vector::zeros(),
        }
    }
}

impl StylusPose {
    pub fn position(&self) -> Point {
        self.pose.translation.vector.into()
    }

    pub fn rotation(&self) -> Rotation {
        self.pose.rotation
    }

    pub fn forward(&self) -> Vector {
        self.pose.rotation * math::forward()
    }

    pub fn hot_spot_world(&self) -> Point {
        self.pose * Point::from(self.hot_spot)
    }

    /// Probe length: the rotated hot spot length, unbounded when the hot spot sits at the origin.
    pub fn cast_length(&self) -> Real {
        let length = (self.pose.rotation * self.hot_spot).norm();
        if length <= Real::EPSILON {
            Real::INFINITY
        } else {
            length
        }
    }

    pub fn ray(&self) -> Ray {
        Ray::new(self.position(), self.forward())
    }

    pub fn to_local(&self, point: &Point) -> Point {
        self.pose.inverse_transform_point(point)
    }
}

/// Stylus-specific reactions to hover and drag.
pub trait StylusShape<O> {
    /// Stylus-local tip of the stylus.
    fn hot_spot(&self) -> Vector;

    fn on_hover_begin(&mut self, _stylus: &StylusPose, _object: O, _point: &Point) {}
    fn on_hover_stay(&mut self, _stylus: &StylusPose, _object: O, _point: &Point) {}
    fn on_hover_end(&mut self, _stylus: &StylusPose, _object: O) {}
    fn on_drag_begin(&mut self, _object: O) {}
    fn on_drag_end(&mut self, _objects: &[O]) {}
    /// Grows or shrinks adjustable styluses. Both flags may be set at once.
    fn update_length(&mut self, _dt: Real, _lengthen: bool, _shorten: bool) {}
}

/// A bare stylus with its tip at the tracked position.
#[derive(Copy, Clone, Debug, Default)]
pub struct PointStylus;

impl<O> StylusShape<O> for PointStylus {
    fn hot_spot(&self) -> Vector {
        Vector::zeros()
    }
}
