//! Scripted stylus sessions played against a rapier scene.

use crate::config::InteractionConfig;
use crate::events::InteractionEvent;
use crate::haptics::{BodyHaptics, Haptics, ImpactResponse, VibrationPattern};
use crate::host::BodyType;
use crate::interaction::{FrameInputs, Modifiers, StylusInteraction};
use crate::layers::Layer;
use crate::math::{Isometry, Point, Real, Vector};
use crate::rapier_backend::{layer_groups, RapierScene, SceneObject};
use crate::stylus::{
    CameraRay, LaserStylus, PointStylus, StylusShape, StylusSimulator, StylusSimulatorMode,
    WandStylus,
};
use anyhow::{bail, Context};
use rapier::dynamics::{RigidBodyBuilder, RigidBodyHandle};
use rapier::geometry::ColliderBuilder;
use rapier::pipeline::ActiveEvents;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

pub const DEFAULT_FRAME_DT: Real = 1.0 / 60.0;

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ShapeSpec {
    Ball { radius: Real },
    Cuboid { half_extents: [Real; 3] },
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BodySpec {
    pub name: String,
    pub shape: ShapeSpec,
    pub position: [Real; 3],
    /// Axis-angle rotation.
    #[serde(default)]
    pub rotation: Option<[Real; 3]>,
    #[serde(default)]
    pub layer: Layer,
    #[serde(default)]
    pub body_type: BodyType,
    /// Makes the body vibrate the stylus when it rolls or hits something.
    #[serde(default)]
    pub haptics: Option<ImpactResponse>,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StylusChoice {
    #[default]
    Point,
    Laser {
        initial_length: Real,
        tip_length: Real,
        base_length: Real,
    },
    Wand {
        length: Real,
    },
}

impl StylusChoice {
    pub fn build(&self) -> Box<dyn StylusShape<SceneObject>> {
        match *self {
            Self::Point => Box::new(PointStylus),
            Self::Laser {
                initial_length,
                tip_length,
                base_length,
            } => Box::new(LaserStylus::new(initial_length, tip_length, base_length)),
            Self::Wand { length } => Box::new(WandStylus::new(length)),
        }
    }
}

fn default_camera_up() -> [Real; 3] {
    [0.0, 1.0, 0.0]
}

fn default_camera_scale() -> Real {
    1.0
}

fn default_cursor_dir() -> [Real; 3] {
    [0.0, 0.0, 1.0]
}

/// Mouse emulation of the stylus, used by frames carrying [`MouseSpec`] input.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SimulatorSpec {
    pub mode: StylusSimulatorMode,
    #[serde(default)]
    pub camera_position: [Real; 3],
    #[serde(default = "default_camera_up")]
    pub camera_up: [Real; 3],
    #[serde(default = "default_camera_scale")]
    pub camera_scale: Real,
}

impl SimulatorSpec {
    fn camera_ray(&self, mouse: &MouseSpec) -> CameraRay {
        CameraRay {
            origin: Point::from(self.camera_position),
            dir: Vector::from(mouse.cursor_dir),
            camera_position: Point::from(self.camera_position),
            camera_up: Vector::from(self.camera_up),
            camera_scale: self.camera_scale,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MouseSpec {
    /// Cursor motion in pixels.
    #[serde(default)]
    pub delta: [Real; 2],
    #[serde(default)]
    pub wheel: Real,
    /// Direction of the camera ray through the cursor.
    #[serde(default = "default_cursor_dir")]
    pub cursor_dir: [Real; 3],
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FrameSpec {
    /// Ignored when the frame carries mouse input and the script has a simulator.
    #[serde(default)]
    pub position: [Real; 3],
    #[serde(default)]
    pub rotation: Option<[Real; 3]>,
    #[serde(default)]
    pub buttons: Vec<bool>,
    #[serde(default)]
    pub additive: bool,
    #[serde(default)]
    pub mode_toggle: bool,
    #[serde(default)]
    pub dt: Option<Real>,
    #[serde(default)]
    pub mouse: Option<MouseSpec>,
    /// Wand length adjustment, see [`StylusShape::update_length`].
    #[serde(default)]
    pub lengthen: bool,
    #[serde(default)]
    pub shorten: bool,
}

impl FrameSpec {
    pub fn inputs(&self) -> FrameInputs {
        let mut modifiers = Modifiers::empty();
        modifiers.set(Modifiers::ADDITIVE, self.additive);
        modifiers.set(Modifiers::MODE_TOGGLE, self.mode_toggle);

        FrameInputs {
            stylus_pose: pose(self.position, self.rotation),
            buttons: self.buttons.clone(),
            modifiers,
        }
    }
}

fn default_gravity() -> [Real; 3] {
    [0.0, -9.81, 0.0]
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ReplayScript {
    /// Partial configuration, applied over the base configuration key by key.
    #[serde(default)]
    pub config: Option<serde_json::Value>,
    #[serde(default = "default_gravity")]
    pub gravity: [Real; 3],
    pub bodies: Vec<BodySpec>,
    #[serde(default)]
    pub stylus: StylusChoice,
    #[serde(default)]
    pub simulator: Option<SimulatorSpec>,
    pub frames: Vec<FrameSpec>,
}

impl ReplayScript {
    pub fn from_json_str(json: &str) -> anyhow::Result<Self> {
        serde_json::from_str(json).context("invalid replay script")
    }

    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read replay script {}", path.display()))?;
        Self::from_json_str(&json).with_context(|| format!("while loading {}", path.display()))
    }

    /// `base` with the script's own configuration block applied on top.
    pub fn layered_config(&self, base: &InteractionConfig) -> anyhow::Result<InteractionConfig> {
        let Some(patch) = &self.config else {
            return Ok(base.clone());
        };
        let serde_json::Value::Object(patch) = patch else {
            bail!("the replay `config` block must be a JSON object");
        };

        let mut merged = serde_json::to_value(base)?;
        if let serde_json::Value::Object(fields) = &mut merged {
            for (key, value) in patch {
                fields.insert(key.clone(), value.clone());
            }
        }

        serde_json::from_value(merged).context("invalid replay `config` block")
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ReplayEvent {
    pub kind: String,
    pub object: String,
}

#[derive(Copy, Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum HapticCommand {
    Vibrate { pattern: VibrationPattern },
    Stop,
}

#[derive(Default)]
struct HapticLog(Vec<HapticCommand>);

impl Haptics for HapticLog {
    fn vibrate(&mut self, pattern: VibrationPattern) {
        self.0.push(HapticCommand::Vibrate { pattern });
    }

    fn stop(&mut self) {
        self.0.push(HapticCommand::Stop);
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ReplayRecord {
    pub frame: usize,
    pub events: Vec<ReplayEvent>,
    pub selection: Vec<String>,
    pub positions: BTreeMap<String, [Real; 3]>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub haptics: Vec<HapticCommand>,
}

fn pose(position: [Real; 3], rotation: Option<[Real; 3]>) -> Isometry {
    Isometry::new(
        Vector::from(position),
        rotation.map(Vector::from).unwrap_or_else(Vector::zeros),
    )
}

fn build_scene<'a>(
    script: &'a ReplayScript,
    config: &InteractionConfig,
) -> anyhow::Result<(RapierScene, Vec<(RigidBodyHandle, &'a BodySpec)>)> {
    let mut scene = RapierScene::new(config.spring);
    scene.gravity = Vector::from(script.gravity);
    let mut handles: Vec<(RigidBodyHandle, &BodySpec)> = vec![];

    for spec in &script.bodies {
        if handles.iter().any(|(_, other)| other.name == spec.name) {
            bail!("duplicate body name `{}`", spec.name);
        }

        let collider = match &spec.shape {
            ShapeSpec::Ball { radius } if *radius > 0.0 => ColliderBuilder::ball(*radius),
            ShapeSpec::Cuboid { half_extents } if half_extents.iter().all(|e| *e > 0.0) => {
                ColliderBuilder::cuboid(half_extents[0], half_extents[1], half_extents[2])
            }
            shape => bail!("body `{}` has a degenerate shape {:?}", spec.name, shape),
        };

        let body = match spec.body_type {
            BodyType::Dynamic => RigidBodyBuilder::dynamic(),
            BodyType::Fixed => RigidBodyBuilder::fixed(),
            BodyType::KinematicPositionBased => RigidBodyBuilder::kinematic_position_based(),
            BodyType::KinematicVelocityBased => RigidBodyBuilder::kinematic_velocity_based(),
        };
        let mut collider = collider.collision_groups(layer_groups(spec.layer));
        if spec.haptics.is_some() {
            collider = collider.active_events(ActiveEvents::COLLISION_EVENTS);
        }

        let handle = scene.insert_body(body.position(pose(spec.position, spec.rotation)), collider);
        handles.push((handle, spec));
    }

    Ok((scene, handles))
}

fn object_name(
    scene: &RapierScene,
    names: &HashMap<RigidBodyHandle, String>,
    object: SceneObject,
) -> String {
    let body = match object {
        SceneObject::Body(handle) => Some(handle),
        SceneObject::Collider(handle) => scene.colliders.get(handle).and_then(|c| c.parent()),
    };

    body.and_then(|handle| names.get(&handle).cloned())
        .unwrap_or_else(|| format!("{:?}", object))
}

/// Plays every frame of `script`, stepping the physics after each interaction tick.
pub fn run_replay(
    script: &ReplayScript,
    config: &InteractionConfig,
) -> anyhow::Result<Vec<ReplayRecord>> {
    let (mut scene, bodies) = build_scene(script, config)?;
    let names: HashMap<_, _> = bodies
        .iter()
        .map(|(handle, spec)| (*handle, spec.name.clone()))
        .collect();
    let mut interaction =
        StylusInteraction::<RapierScene>::new(config.clone()).with_shape(script.stylus.build());

    let mut haptics = BodyHaptics::<SceneObject, _>::new(HapticLog::default());
    for (handle, spec) in &bodies {
        if let Some(response) = spec.haptics {
            haptics.watch(SceneObject::Body(*handle), response);
        }
    }

    let mut simulator = script
        .simulator
        .as_ref()
        .map(|spec| (StylusSimulator::new(spec.mode), spec));
    let mut stylus_pose = Isometry::identity();

    log::info!(
        "Replaying {} frames over {} bodies",
        script.frames.len(),
        script.bodies.len()
    );

    let mut records = Vec::with_capacity(script.frames.len());
    for (frame, spec) in script.frames.iter().enumerate() {
        let dt = spec.dt.unwrap_or(DEFAULT_FRAME_DT);
        let mut inputs = spec.inputs();
        match (&mut simulator, &spec.mouse) {
            (Some((simulator, simulator_spec)), Some(mouse)) => {
                let camera = simulator_spec.camera_ray(mouse);
                simulator.apply(&mut stylus_pose, mouse.delta, mouse.wheel, &camera);
                inputs.stylus_pose = stylus_pose;
            }
            _ => stylus_pose = inputs.stylus_pose,
        }

        interaction
            .shape_mut()
            .update_length(dt, spec.lengthen, spec.shorten);
        interaction.tick(&mut scene, dt, &inputs);
        scene.step(dt);
        haptics.update(&scene, scene.contact_starts());

        let events = interaction
            .events()
            .iter()
            .filter(|event| !matches!(event, InteractionEvent::HoverStay { .. }))
            .map(|event| ReplayEvent {
                kind: event.name().to_string(),
                object: object_name(&scene, &names, event.object()),
            })
            .collect();

        let mut selection: Vec<_> = interaction
            .selection()
            .iter()
            .map(|object| object_name(&scene, &names, object))
            .collect();
        selection.sort();

        let positions = names
            .iter()
            .filter_map(|(handle, name)| {
                let translation = scene.bodies.get(*handle)?.translation();
                Some((name.clone(), [translation.x, translation.y, translation.z]))
            })
            .collect();

        records.push(ReplayRecord {
            frame,
            events,
            selection,
            positions,
            haptics: std::mem::take(&mut haptics.device_mut().0),
        });
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drag::DragMode;

    #[test]
    fn script_config_overrides_only_its_keys() {
        let script = ReplayScript::from_json_str(
            r#"{
                "config": { "drag_mode": "physical" },
                "bodies": [],
                "frames": []
            }"#,
        )
        .unwrap();

        let base = InteractionConfig {
            min_drag_distance: 0.2,
            ..Default::default()
        };
        let config = script.layered_config(&base).unwrap();
        assert_eq!(config.drag_mode, DragMode::Physical);
        assert_eq!(config.min_drag_distance, 0.2);
    }

    #[test]
    fn non_object_config_is_rejected() {
        let script =
            ReplayScript::from_json_str(r#"{ "config": 3, "bodies": [], "frames": [] }"#).unwrap();
        assert!(script.layered_config(&InteractionConfig::default()).is_err());
    }

    #[test]
    fn degenerate_and_duplicate_bodies_are_errors() {
        let degenerate = ReplayScript::from_json_str(
            r#"{
                "bodies": [{ "name": "a", "shape": { "type": "ball", "radius": 0.0 }, "position": [0, 0, 0] }],
                "frames": []
            }"#,
        )
        .unwrap();
        assert!(run_replay(&degenerate, &InteractionConfig::default()).is_err());

        let duplicate = ReplayScript::from_json_str(
            r#"{
                "bodies": [
                    { "name": "a", "shape": { "type": "ball", "radius": 1.0 }, "position": [0, 0, 0] },
                    { "name": "a", "shape": { "type": "ball", "radius": 1.0 }, "position": [3, 0, 0] }
                ],
                "frames": []
            }"#,
        )
        .unwrap();
        assert!(run_replay(&duplicate, &InteractionConfig::default()).is_err());
    }
}
