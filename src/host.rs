//! Capabilities the host engine provides to the interaction core.

use crate::layers::{Layer, LayerMask};
use crate::math::{Isometry, Point, Ray, Real, Vector};
use std::fmt::Debug;
use std::hash::Hash;

/// One intersection between the stylus probe and a collidable object.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CandidateHit<O> {
    pub object: O,
    pub point: Point,
    /// Distance along the probe ray.
    pub distance: Real,
}

/// An oriented box, used by the selection volume.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct VolumeBounds {
    pub pose: Isometry,
    pub half_extents: Vector,
}

impl VolumeBounds {
    pub fn contains_point(&self, point: &Point) -> bool {
        let local = self.pose.inverse_transform_point(point);
        local.x.abs() <= self.half_extents.x
            && local.y.abs() <= self.half_extents.y
            && local.z.abs() <= self.half_extents.z
    }
}

/// How the simulation moves a body.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyType {
    #[default]
    Dynamic,
    Fixed,
    KinematicPositionBased,
    KinematicVelocityBased,
}

impl BodyType {
    pub fn is_dynamic(self) -> bool {
        self == Self::Dynamic
    }

    pub fn is_kinematic(self) -> bool {
        matches!(
            self,
            Self::KinematicPositionBased | Self::KinematicVelocityBased
        )
    }
}

/// Saved tuning of a physical body, restored verbatim after a physical drag.
#[derive(Copy, Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BodyProperties {
    pub linear_damping: Real,
    pub angular_damping: Real,
    pub body_type: BodyType,
    pub gravity_scale: Real,
    /// Total constraint solver iterations used for this body.
    pub solver_iterations: usize,
}

impl BodyProperties {
    /// Tuning applied to a body while the user drags it physically.
    pub fn dragging() -> Self {
        Self {
            linear_damping: 10.0,
            angular_damping: 10.0,
            body_type: BodyType::Dynamic,
            gravity_scale: 0.0,
            solver_iterations: 12,
        }
    }
}

impl Default for BodyProperties {
    fn default() -> Self {
        Self {
            linear_damping: 0.0,
            angular_damping: 0.05,
            body_type: BodyType::Dynamic,
            gravity_scale: 1.0,
            solver_iterations: 4,
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Velocity {
    pub linear: Vector,
    pub angular: Vector,
}

/// Read-only geometric queries on the host scene.
pub trait SceneQuery {
    type Object: Copy + Eq + Hash + Debug;

    /// Every object intersecting `ray` within `max_distance` whose layer is in `mask`, in any order.
    fn cast_ray(
        &self,
        ray: &Ray,
        max_distance: Real,
        mask: LayerMask,
    ) -> Vec<CandidateHit<Self::Object>>;
    fn layer(&self, object: Self::Object) -> Option<Layer>;
    fn parent(&self, object: Self::Object) -> Option<Self::Object>;
    fn has_body(&self, object: Self::Object) -> bool;

    /// Collidables overlapping `volume`. Hosts that report overlaps through
    /// [`crate::StylusInteraction::on_overlap_begin`] instead return `None`.
    fn intersect_volume(
        &self,
        _volume: &VolumeBounds,
        _mask: LayerMask,
    ) -> Option<Vec<Self::Object>> {
        None
    }
}

/// Mutable access to poses and physical bodies.
pub trait InteractionHost: SceneQuery {
    type Constraint;

    fn pose(&self, object: Self::Object) -> Option<Isometry>;
    fn set_pose(&mut self, object: Self::Object, pose: &Isometry);
    /// Called once per tick, before anything else, with the current stylus pose.
    fn set_stylus_pose(&mut self, _pose: &Isometry) {}

    /// `None` if `object` has no physical body.
    fn body_properties(&self, object: Self::Object) -> Option<BodyProperties>;
    /// Gives `object` a physical body with the given properties, replacing any existing one.
    fn install_body(&mut self, object: Self::Object, properties: &BodyProperties);
    fn remove_body(&mut self, object: Self::Object);
    /// `object` and its descendants that currently carry a physical body.
    fn nested_bodies(&self, object: Self::Object) -> Vec<Self::Object>;
    fn velocity(&self, object: Self::Object) -> Option<Velocity>;
    fn set_velocity(&mut self, object: Self::Object, velocity: &Velocity);

    /// Ties `object` to the stylus with a spring anchored at the world-space point `anchor`.
    fn create_constraint(
        &mut self,
        object: Self::Object,
        anchor: &Point,
    ) -> Option<Self::Constraint>;
    fn remove_constraint(&mut self, constraint: Self::Constraint);
}
