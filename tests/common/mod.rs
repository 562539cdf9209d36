#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};
use zstylus::math::{Isometry, Point, Ray, Real, Vector};
use zstylus::{
    BodyProperties, CandidateHit, FrameInputs, InteractionConfig, InteractionEvent,
    InteractionHost, Layer, LayerMask, Modifiers, SceneQuery, StylusInteraction, Velocity,
};

pub const UI_LAYER: Layer = 5;

#[derive(Clone, Debug)]
pub struct MockObject {
    pub pose: Isometry,
    pub layer: Layer,
    pub parent: Option<u32>,
    pub body: Option<BodyProperties>,
    pub velocity: Velocity,
}

/// An in-memory scene whose probe results are scripted by the test.
#[derive(Default)]
pub struct MockScene {
    pub objects: BTreeMap<u32, MockObject>,
    /// Returned by every ray cast, filtered by layer.
    pub hits: Vec<CandidateHit<u32>>,
    pub constraints: HashMap<usize, (u32, Point)>,
    next_constraint: usize,
    pub stylus_pose: Option<Isometry>,
}

impl MockScene {
    pub fn add(&mut self, id: u32, position: Vector, layer: Layer, parent: Option<u32>, body: bool) {
        self.objects.insert(
            id,
            MockObject {
                pose: Isometry::translation(position.x, position.y, position.z),
                layer,
                parent,
                body: body.then(BodyProperties::default),
                velocity: Velocity::default(),
            },
        );
    }

    pub fn add_body(&mut self, id: u32, position: Vector) {
        self.add(id, position, 0, None, true);
    }

    /// Makes the probe hit `id` (or nothing) from now on.
    pub fn point_at(&mut self, id: Option<u32>) {
        let ids: Vec<_> = id.into_iter().collect();
        self.point_at_all(&ids);
    }

    /// Makes the probe hit every object of `ids` at its origin, in the given order.
    pub fn point_at_all(&mut self, ids: &[u32]) {
        self.hits = ids
            .iter()
            .map(|id| {
                let point: Point = self.objects[id].pose.translation.vector.into();
                CandidateHit {
                    object: *id,
                    point,
                    distance: point.coords.norm(),
                }
            })
            .collect();
    }

    pub fn position(&self, id: u32) -> Vector {
        self.objects[&id].pose.translation.vector
    }

    pub fn properties(&self, id: u32) -> Option<BodyProperties> {
        self.objects[&id].body
    }
}

impl SceneQuery for MockScene {
    type Object = u32;

    fn cast_ray(&self, _ray: &Ray, _max_distance: Real, mask: LayerMask) -> Vec<CandidateHit<u32>> {
        self.hits
            .iter()
            .filter(|hit| {
                self.objects
                    .get(&hit.object)
                    .map_or(false, |o| mask.contains(o.layer))
            })
            .copied()
            .collect()
    }

    fn layer(&self, object: u32) -> Option<Layer> {
        self.objects.get(&object).map(|o| o.layer)
    }

    fn parent(&self, object: u32) -> Option<u32> {
        self.objects.get(&object)?.parent
    }

    fn has_body(&self, object: u32) -> bool {
        self.objects
            .get(&object)
            .map_or(false, |o| o.body.is_some())
    }
}

impl InteractionHost for MockScene {
    type Constraint = usize;

    fn pose(&self, object: u32) -> Option<Isometry> {
        self.objects.get(&object).map(|o| o.pose)
    }

    fn set_pose(&mut self, object: u32, pose: &Isometry) {
        if let Some(o) = self.objects.get_mut(&object) {
            o.pose = *pose;
        }
    }

    fn set_stylus_pose(&mut self, pose: &Isometry) {
        self.stylus_pose = Some(*pose);
    }

    fn body_properties(&self, object: u32) -> Option<BodyProperties> {
        self.objects.get(&object)?.body
    }

    fn install_body(&mut self, object: u32, properties: &BodyProperties) {
        if let Some(o) = self.objects.get_mut(&object) {
            o.body = Some(*properties);
        }
    }

    fn remove_body(&mut self, object: u32) {
        if let Some(o) = self.objects.get_mut(&object) {
            o.body = None;
        }
    }

    fn nested_bodies(&self, object: u32) -> Vec<u32> {
        let is_descendant = |mut id: u32| loop {
            if id == object {
                return true;
            }
            match self.objects.get(&id).and_then(|o| o.parent) {
                Some(parent) => id = parent,
                None => return false,
            }
        };

        self.objects
            .iter()
            .filter(|(id, o)| o.body.is_some() && is_descendant(**id))
            .map(|(id, _)| *id)
            .collect()
    }

    fn velocity(&self, object: u32) -> Option<Velocity> {
        self.objects.get(&object).map(|o| o.velocity)
    }

    fn set_velocity(&mut self, object: u32, velocity: &Velocity) {
        if let Some(o) = self.objects.get_mut(&object) {
            o.velocity = *velocity;
        }
    }

    fn create_constraint(&mut self, object: u32, anchor: &Point) -> Option<usize> {
        self.objects.get(&object)?;
        let handle = self.next_constraint;
        self.next_constraint += 1;
        self.constraints.insert(handle, (object, *anchor));
        Some(handle)
    }

    fn remove_constraint(&mut self, constraint: usize) {
        self.constraints.remove(&constraint);
    }
}

pub fn config() -> InteractionConfig {
    InteractionConfig {
        ui_layer: UI_LAYER,
        ..Default::default()
    }
}

pub fn frame(position: Vector, pressed: bool, modifiers: Modifiers) -> FrameInputs {
    FrameInputs {
        stylus_pose: Isometry::translation(position.x, position.y, position.z),
        buttons: vec![pressed],
        modifiers,
    }
}

/// Ticks once and returns the non-stay events as `(name, object)` pairs.
pub fn tick(
    interaction: &mut StylusInteraction<MockScene>,
    scene: &mut MockScene,
    inputs: &FrameInputs,
) -> Vec<(&'static str, u32)> {
    interaction.tick(scene, 1.0 / 60.0, inputs);
    interaction
        .events()
        .iter()
        .filter(|e| !matches!(e, InteractionEvent::HoverStay { .. }))
        .map(|e| (e.name(), e.object()))
        .collect()
}
