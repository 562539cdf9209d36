mod common;

use approx::assert_relative_eq;
use common::{config, frame, tick, MockScene, UI_LAYER};
use zstylus::math::{Isometry, Point, Rotation, Vector};
use zstylus::{BodyProperties, DragMode, FrameInputs, InteractionConfig, Modifiers, StylusInteraction};

const A: u32 = 1;
const B: u32 = 2;
const UI: u32 = 3;
const CHILD: u32 = 4;

fn at(x: f32, y: f32, z: f32, pressed: bool, modifiers: Modifiers) -> FrameInputs {
    frame(Vector::new(x, y, z), pressed, modifiers)
}

fn physical_config() -> InteractionConfig {
    InteractionConfig {
        drag_mode: DragMode::Physical,
        ..config()
    }
}

#[test]
fn multi_object_drag_keeps_relative_offsets() {
    let mut scene = MockScene::default();
    scene.add_body(A, Vector::new(1.0, 0.0, 0.0));
    scene.add_body(B, Vector::new(0.0, 1.0, 0.0));
    let mut interaction = StylusInteraction::<MockScene>::new(config());

    interaction.select(A);
    interaction.select(B);
    scene.point_at(Some(A));
    tick(&mut interaction, &mut scene, &at(0.0, 0.0, 0.0, false, Modifiers::empty()));

    // Additive press keeps B selected and drags both.
    let mut events = tick(&mut interaction, &mut scene, &at(0.0, 0.0, 0.0, true, Modifiers::ADDITIVE));
    events.sort();
    assert_eq!(events, vec![("drag_begin", A), ("drag_begin", B)]);
    assert!(interaction.is_dragging());
    assert_eq!(interaction.drag().focus_objects().last(), Some(&A));

    tick(&mut interaction, &mut scene, &at(5.0, 5.0, 5.0, true, Modifiers::ADDITIVE));
    assert_relative_eq!(scene.position(A), Vector::new(6.0, 5.0, 5.0));
    assert_relative_eq!(scene.position(B), Vector::new(5.0, 6.0, 5.0));

    let mut events = tick(&mut interaction, &mut scene, &at(5.0, 5.0, 5.0, false, Modifiers::ADDITIVE));
    events.sort();
    assert_eq!(events, vec![("drag_end", A), ("drag_end", B)]);
    assert!(!interaction.is_dragging());
    assert_eq!(interaction.selection().sorted(), vec![A, B]);

    // Released objects no longer follow the stylus.
    tick(&mut interaction, &mut scene, &at(0.0, 0.0, 0.0, false, Modifiers::empty()));
    assert_relative_eq!(scene.position(A), Vector::new(6.0, 5.0, 5.0));
}

#[test]
fn dragged_objects_orbit_with_stylus_rotation() {
    let mut scene = MockScene::default();
    scene.add_body(A, Vector::new(1.0, 0.0, 0.0));
    let mut interaction = StylusInteraction::<MockScene>::new(config());

    scene.point_at(Some(A));
    tick(&mut interaction, &mut scene, &at(0.0, 0.0, 0.0, false, Modifiers::empty()));
    tick(&mut interaction, &mut scene, &at(0.0, 0.0, 0.0, true, Modifiers::empty()));

    let rotation = Rotation::from_axis_angle(&Vector::y_axis(), std::f32::consts::FRAC_PI_2);
    let inputs = FrameInputs {
        stylus_pose: Isometry::from_parts(Vector::zeros().into(), rotation),
        buttons: vec![true],
        modifiers: Modifiers::empty(),
    };
    tick(&mut interaction, &mut scene, &inputs);

    let pose = scene.objects[&A].pose;
    assert_relative_eq!(pose.translation.vector, Vector::new(0.0, 0.0, -1.0), epsilon = 1.0e-6);
    assert_relative_eq!(pose.rotation, rotation, epsilon = 1.0e-6);
}

#[test]
fn drag_without_eligible_objects_is_a_no_op() {
    let mut scene = MockScene::default();
    scene.add(UI, Vector::new(0.0, 0.0, 1.0), UI_LAYER, None, false);
    let mut interaction = StylusInteraction::<MockScene>::new(config());

    // Nothing hovered.
    tick(&mut interaction, &mut scene, &at(0.0, 0.0, 0.0, true, Modifiers::empty()));
    assert!(!interaction.is_dragging());
    tick(&mut interaction, &mut scene, &at(0.0, 0.0, 0.0, false, Modifiers::empty()));

    // UI hovered: the press clears the selection and the UI object never joins it.
    scene.point_at(Some(UI));
    tick(&mut interaction, &mut scene, &at(0.0, 0.0, 0.0, false, Modifiers::empty()));
    let events = tick(&mut interaction, &mut scene, &at(0.0, 0.0, 0.0, true, Modifiers::empty()));
    assert!(events.iter().all(|(name, _)| !name.starts_with("drag")));
    assert!(!interaction.is_dragging());

    let events = tick(&mut interaction, &mut scene, &at(0.0, 0.0, 0.0, false, Modifiers::empty()));
    assert!(events.is_empty());
}

#[test]
fn ui_selection_members_are_never_dragged() {
    let mut scene = MockScene::default();
    scene.add_body(A, Vector::new(1.0, 0.0, 0.0));
    scene.add(UI, Vector::new(0.0, 0.0, 1.0), UI_LAYER, None, false);
    let mut interaction = StylusInteraction::<MockScene>::new(config());

    interaction.select(UI);
    scene.point_at(Some(A));
    tick(&mut interaction, &mut scene, &at(0.0, 0.0, 0.0, false, Modifiers::empty()));
    tick(&mut interaction, &mut scene, &at(0.0, 0.0, 0.0, true, Modifiers::ADDITIVE));

    assert_eq!(interaction.drag().focus_objects(), &[A]);
}

#[test]
fn physical_drag_swaps_and_restores_bodies() {
    let mut scene = MockScene::default();
    scene.add_body(A, Vector::new(0.0, 0.0, 2.0));
    scene.add(CHILD, Vector::new(0.0, 0.5, 2.0), 0, Some(A), true);
    let original = scene.properties(A);
    let mut interaction = StylusInteraction::<MockScene>::new(physical_config());

    scene.point_at(Some(A));
    tick(&mut interaction, &mut scene, &at(0.0, 0.0, 0.0, false, Modifiers::empty()));
    let events = tick(&mut interaction, &mut scene, &at(0.0, 0.0, 0.0, true, Modifiers::empty()));

    assert_eq!(
        events,
        vec![("selected", A), ("drag_begin", A), ("hover_end", A)]
    );
    assert_eq!(scene.properties(A), Some(BodyProperties::dragging()));
    assert_eq!(scene.properties(CHILD), None);
    assert_eq!(interaction.drag().physical().saved_properties(CHILD), original.as_ref());

    let anchors: Vec<_> = scene.constraints.values().copied().collect();
    assert_eq!(anchors, vec![(A, Point::new(0.0, 0.0, 2.0))]);

    // Physical drags leave the motion to the host.
    tick(&mut interaction, &mut scene, &at(3.0, 0.0, 0.0, true, Modifiers::empty()));
    assert_relative_eq!(scene.position(A), Vector::new(0.0, 0.0, 2.0));

    let events = tick(&mut interaction, &mut scene, &at(3.0, 0.0, 0.0, false, Modifiers::empty()));
    assert!(events.contains(&("drag_end", A)));
    assert_eq!(scene.properties(A), original);
    assert_eq!(scene.properties(CHILD), original);
    assert!(scene.constraints.is_empty());
    assert!(!interaction.drag().physical().is_active());
}

#[test]
fn mode_toggle_mid_drag_keeps_poses() {
    let mut scene = MockScene::default();
    scene.add_body(A, Vector::new(1.0, 0.0, 0.0));
    let mut interaction = StylusInteraction::<MockScene>::new(config());

    scene.point_at(Some(A));
    tick(&mut interaction, &mut scene, &at(0.0, 0.0, 0.0, false, Modifiers::empty()));
    tick(&mut interaction, &mut scene, &at(0.0, 0.0, 0.0, true, Modifiers::empty()));
    tick(&mut interaction, &mut scene, &at(0.0, 0.0, 1.0, true, Modifiers::empty()));
    assert_relative_eq!(scene.position(A), Vector::new(1.0, 0.0, 1.0));

    // Kinematic -> physical: the object stays put and the spring anchors at the moved contact point.
    let events = tick(&mut interaction, &mut scene, &at(0.0, 0.0, 1.0, true, Modifiers::MODE_TOGGLE));
    assert_eq!(interaction.drag_mode(), DragMode::Physical);
    assert!(events.contains(&("hover_end", A)));
    assert_relative_eq!(scene.position(A), Vector::new(1.0, 0.0, 1.0));
    assert_eq!(scene.properties(A), Some(BodyProperties::dragging()));
    let (_, anchor) = *scene.constraints.values().next().unwrap();
    assert_relative_eq!(anchor, Point::new(1.0, 0.0, 1.0));

    // The simulation moves the object a bit.
    scene.objects.get_mut(&A).unwrap().pose = Isometry::translation(1.5, 0.0, 1.0);

    // Physical -> kinematic resumes from where the physics left the object.
    tick(&mut interaction, &mut scene, &at(0.0, 0.0, 1.0, true, Modifiers::empty()));
    assert_eq!(interaction.drag_mode(), DragMode::Kinematic);
    assert_relative_eq!(scene.position(A), Vector::new(1.5, 0.0, 1.0));
    assert_eq!(scene.properties(A), Some(BodyProperties::default()));
    assert!(scene.constraints.is_empty());

    tick(&mut interaction, &mut scene, &at(0.0, 0.0, 2.0, true, Modifiers::empty()));
    assert_relative_eq!(scene.position(A), Vector::new(1.5, 0.0, 2.0));
}

#[test]
fn mode_toggle_without_drag_only_changes_mode() {
    let mut scene = MockScene::default();
    scene.add_body(A, Vector::new(1.0, 0.0, 0.0));
    let mut interaction = StylusInteraction::<MockScene>::new(config());

    scene.point_at(Some(A));
    tick(&mut interaction, &mut scene, &at(0.0, 0.0, 0.0, false, Modifiers::empty()));
    let events = tick(&mut interaction, &mut scene, &at(0.0, 0.0, 0.0, false, Modifiers::MODE_TOGGLE));
    assert!(events.is_empty());
    assert_eq!(interaction.drag_mode(), DragMode::Physical);
    assert_eq!(interaction.hovered(), Some(A));
    assert!(scene.constraints.is_empty());
}
