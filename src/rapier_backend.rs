//! An [`InteractionHost`] backed by the rapier3d physics sets.

use crate::config::SpringParameters;
use crate::host::{
    BodyProperties, BodyType, CandidateHit, InteractionHost, SceneQuery, Velocity, VolumeBounds,
};
use crate::layers::{Layer, LayerMask};
use crate::math::{Isometry, Point, Ray, Real, Vector};
use rapier::dynamics::{
    CCDSolver, ImpulseJointHandle, ImpulseJointSet, IntegrationParameters, IslandManager,
    MultibodyJointSet, RigidBody, RigidBodyBuilder, RigidBodyHandle, RigidBodySet, RigidBodyType,
    SpringJointBuilder,
};
use rapier::crossbeam::channel::Receiver;
use rapier::geometry::{
    Collider, ColliderHandle, ColliderSet, CollisionEvent, DefaultBroadPhase, Group,
    InteractionGroups, NarrowPhase,
};
use rapier::parry::query;
use rapier::parry::shape::Cuboid;
use rapier::pipeline::{ChannelEventCollector, PhysicsPipeline};
use std::collections::HashSet;

/// A body or a collider of the rapier sets.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SceneObject {
    Body(RigidBodyHandle),
    Collider(ColliderHandle),
}

fn body_type_from_rapier(body_type: RigidBodyType) -> BodyType {
    match body_type {
        RigidBodyType::Dynamic => BodyType::Dynamic,
        RigidBodyType::Fixed => BodyType::Fixed,
        RigidBodyType::KinematicPositionBased => BodyType::KinematicPositionBased,
        RigidBodyType::KinematicVelocityBased => BodyType::KinematicVelocityBased,
    }
}

fn body_type_to_rapier(body_type: BodyType) -> RigidBodyType {
    match body_type {
        BodyType::Dynamic => RigidBodyType::Dynamic,
        BodyType::Fixed => RigidBodyType::Fixed,
        BodyType::KinematicPositionBased => RigidBodyType::KinematicPositionBased,
        BodyType::KinematicVelocityBased => RigidBodyType::KinematicVelocityBased,
    }
}

/// Collision groups placing a collider on a single layer, colliding with everything.
pub fn layer_groups(layer: Layer) -> InteractionGroups {
    InteractionGroups::new(
        Group::from_bits_truncate(LayerMask::from_layer(layer).bits()),
        Group::ALL,
    )
}

pub struct RapierScene {
    pub gravity: Vector,
    pub params: IntegrationParameters,
    pub islands: IslandManager,
    pub broad_phase: DefaultBroadPhase,
    pub narrow_phase: NarrowPhase,
    pub bodies: RigidBodySet,
    pub colliders: ColliderSet,
    pub impulse_joints: ImpulseJointSet,
    pub multibody_joints: MultibodyJointSet,
    pub ccd_solver: CCDSolver,
    pub physics_pipeline: PhysicsPipeline,
    pub spring: SpringParameters,
    stylus_body: RigidBodyHandle,
    stylus_pose: Isometry,
    // Bodies taken away by `remove_body`, waiting for `install_body`.
    suspended: HashSet<RigidBodyHandle>,
    events: ChannelEventCollector,
    collision_events: Receiver<CollisionEvent>,
    contact_starts: Vec<(SceneObject, SceneObject)>,
}

impl Default for RapierScene {
    fn default() -> Self {
        Self::new(SpringParameters::default())
    }
}

impl RapierScene {
    pub fn new(spring: SpringParameters) -> Self {
        let mut bodies = RigidBodySet::new();
        let stylus_body = bodies.insert(RigidBodyBuilder::kinematic_position_based());
        let (coll_events_snd, coll_events_rcv) = rapier::crossbeam::channel::unbounded();
        // Contact force events are never enabled on our colliders.
        let (force_events_snd, _) = rapier::crossbeam::channel::unbounded();

        Self {
            gravity: Vector::y() * (-9.81),
            params: IntegrationParameters::default(),
            islands: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies,
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            physics_pipeline: PhysicsPipeline::new(),
            spring,
            stylus_body,
            stylus_pose: Isometry::identity(),
            suspended: HashSet::new(),
            events: ChannelEventCollector::new(coll_events_snd, force_events_snd),
            collision_events: coll_events_rcv,
            contact_starts: vec![],
        }
    }

    /// The kinematic body following the stylus, used as the second end of drag springs.
    pub fn stylus_body(&self) -> RigidBodyHandle {
        self.stylus_body
    }

    pub fn insert_body(&mut self, body: impl Into<RigidBody>, collider: impl Into<Collider>) -> RigidBodyHandle {
        let handle = self.bodies.insert(body);
        self.colliders
            .insert_with_parent(collider, handle, &mut self.bodies);
        handle
    }

    /// Pairs of objects that started touching during the last [`Self::step`]. Colliders attached to
    /// a body are reported as that body. Only colliders with
    /// [`rapier::pipeline::ActiveEvents::COLLISION_EVENTS`] take part.
    pub fn contact_starts(&self) -> &[(SceneObject, SceneObject)] {
        &self.contact_starts
    }

    pub fn step(&mut self, dt: Real) {
        self.contact_starts.clear();
        if dt <= 0.0 {
            return;
        }

        self.params.dt = dt;
        self.physics_pipeline.step(
            &self.gravity,
            &self.params,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            None,
            &(),
            &self.events,
        );

        while let Ok(event) = self.collision_events.try_recv() {
            if event.started() {
                let pair = (
                    self.owner(event.collider1()),
                    self.owner(event.collider2()),
                );
                self.contact_starts.push(pair);
            }
        }
    }

    fn owner(&self, collider: ColliderHandle) -> SceneObject {
        self.colliders
            .get(collider)
            .and_then(|c| c.parent())
            .map(SceneObject::Body)
            .unwrap_or(SceneObject::Collider(collider))
    }

    fn live_body(&self, handle: RigidBodyHandle) -> Option<&RigidBody> {
        if self.suspended.contains(&handle) {
            None
        } else {
            self.bodies.get(handle)
        }
    }

    fn collider_layer(collider: &Collider) -> Option<Layer> {
        let bits = collider.collision_groups().memberships.bits();
        (bits != 0).then(|| bits.trailing_zeros())
    }
}

impl SceneQuery for RapierScene {
    type Object = SceneObject;

    fn cast_ray(
        &self,
        ray: &Ray,
        max_distance: Real,
        mask: LayerMask,
    ) -> Vec<CandidateHit<SceneObject>> {
        let parry_ray = query::Ray::new(ray.origin, ray.dir);
        let max_toi = if max_distance.is_finite() {
            max_distance
        } else {
            Real::MAX
        };

        self.colliders
            .iter()
            .filter(|(_, collider)| mask.intersects(collider.collision_groups().memberships.bits()))
            .filter_map(|(handle, collider)| {
                let toi = collider
                    .shape()
                    .cast_ray(collider.position(), &parry_ray, max_toi, true)?;
                Some(CandidateHit {
                    object: SceneObject::Collider(handle),
                    point: ray.point_at(toi),
                    distance: toi,
                })
            })
            .collect()
    }

    fn layer(&self, object: SceneObject) -> Option<Layer> {
        match object {
            SceneObject::Collider(handle) => Self::collider_layer(self.colliders.get(handle)?),
            SceneObject::Body(handle) => {
                let first = *self.bodies.get(handle)?.colliders().first()?;
                Self::collider_layer(self.colliders.get(first)?)
            }
        }
    }

    fn parent(&self, object: SceneObject) -> Option<SceneObject> {
        match object {
            SceneObject::Collider(handle) => {
                self.colliders.get(handle)?.parent().map(SceneObject::Body)
            }
            SceneObject::Body(_) => None,
        }
    }

    fn has_body(&self, object: SceneObject) -> bool {
        match object {
            SceneObject::Body(handle) => self.live_body(handle).is_some(),
            SceneObject::Collider(_) => false,
        }
    }

    fn intersect_volume(&self, volume: &VolumeBounds, mask: LayerMask) -> Option<Vec<SceneObject>> {
        let cuboid = Cuboid::new(volume.half_extents);
        let result: Vec<_> = self
            .colliders
            .iter()
            .filter(|(_, collider)| mask.intersects(collider.collision_groups().memberships.bits()))
            .filter(|(_, collider)| {
                query::intersection_test(&volume.pose, &cuboid, collider.position(), collider.shape())
                    .unwrap_or(false)
            })
            .map(|(handle, _)| SceneObject::Collider(handle))
            .collect();
        Some(result)
    }
}

impl InteractionHost for RapierScene {
    type Constraint = ImpulseJointHandle;

    fn pose(&self, object: SceneObject) -> Option<Isometry> {
        match object {
            SceneObject::Body(handle) => self.bodies.get(handle).map(|body| *body.position()),
            SceneObject::Collider(handle) => {
                self.colliders.get(handle).map(|collider| *collider.position())
            }
        }
    }

    fn set_pose(&mut self, object: SceneObject, pose: &Isometry) {
        let (handle, pose) = match object {
            SceneObject::Body(handle) => (handle, *pose),
            SceneObject::Collider(handle) => {
                let Some(collider) = self.colliders.get(handle) else {
                    return;
                };
                let Some(parent) = collider.parent() else {
                    // Free colliders are moved directly.
                    if let Some(collider) = self.colliders.get_mut(handle) {
                        collider.set_position(*pose);
                    }
                    return;
                };
                let relative = collider
                    .position_wrt_parent()
                    .copied()
                    .unwrap_or_else(Isometry::identity);
                (parent, pose * relative.inverse())
            }
        };

        if let Some(body) = self.bodies.get_mut(handle) {
            body.set_position(pose, true);
            body.set_linvel(Vector::zeros(), false);
            body.set_angvel(Vector::zeros(), false);
        }
    }

    fn set_stylus_pose(&mut self, pose: &Isometry) {
        self.stylus_pose = *pose;
        if let Some(body) = self.bodies.get_mut(self.stylus_body) {
            body.set_next_kinematic_position(*pose);
        }
    }

    fn body_properties(&self, object: SceneObject) -> Option<BodyProperties> {
        let SceneObject::Body(handle) = object else {
            return None;
        };
        let body = self.live_body(handle)?;
        Some(BodyProperties {
            linear_damping: body.linear_damping(),
            angular_damping: body.angular_damping(),
            body_type: body_type_from_rapier(body.body_type()),
            gravity_scale: body.gravity_scale(),
            solver_iterations: self.params.num_solver_iterations.get()
                + body.additional_solver_iterations(),
        })
    }

    fn install_body(&mut self, object: SceneObject, properties: &BodyProperties) {
        let SceneObject::Body(handle) = object else {
            log::warn!("Cannot give a physical body to {:?}", object);
            return;
        };
        // Rapier counts iterations on top of the global ones.
        let additional_iterations = properties
            .solver_iterations
            .saturating_sub(self.params.num_solver_iterations.get());
        let Some(body) = self.bodies.get_mut(handle) else {
            return;
        };

        body.set_body_type(body_type_to_rapier(properties.body_type), true);
        body.set_linear_damping(properties.linear_damping);
        body.set_angular_damping(properties.angular_damping);
        body.set_gravity_scale(properties.gravity_scale, true);
        body.set_additional_solver_iterations(additional_iterations);
        self.suspended.remove(&handle);
    }

    fn remove_body(&mut self, object: SceneObject) {
        if let SceneObject::Body(handle) = object {
            if self.bodies.contains(handle) {
                self.suspended.insert(handle);
            }
        }
    }

    fn nested_bodies(&self, object: SceneObject) -> Vec<SceneObject> {
        match object {
            SceneObject::Body(handle) if self.live_body(handle).is_some() => vec![object],
            _ => vec![],
        }
    }

    fn velocity(&self, object: SceneObject) -> Option<Velocity> {
        let SceneObject::Body(handle) = object else {
            return None;
        };
        let body = self.bodies.get(handle)?;
        Some(Velocity {
            linear: *body.linvel(),
            angular: *body.angvel(),
        })
    }

    fn set_velocity(&mut self, object: SceneObject, velocity: &Velocity) {
        if let SceneObject::Body(handle) = object {
            if let Some(body) = self.bodies.get_mut(handle) {
                body.set_linvel(velocity.linear, true);
                body.set_angvel(velocity.angular, true);
            }
        }
    }

    fn create_constraint(&mut self, object: SceneObject, anchor: &Point) -> Option<ImpulseJointHandle> {
        let SceneObject::Body(handle) = object else {
            return None;
        };
        let body_pose = *self.bodies.get(handle)?.position();

        let joint = SpringJointBuilder::new(
            self.spring.rest_length,
            self.spring.stiffness,
            self.spring.damping,
        )
        .local_anchor1(body_pose.inverse_transform_point(anchor))
        .local_anchor2(self.stylus_pose.inverse_transform_point(anchor))
        .build();

        Some(
            self.impulse_joints
                .insert(handle, self.stylus_body, joint, true),
        )
    }

    fn remove_constraint(&mut self, constraint: ImpulseJointHandle) {
        self.impulse_joints.remove(constraint, true);
    }
}
