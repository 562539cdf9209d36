//! The per-frame driver tying buttons, hover, selection and drag together.

use crate::config::InteractionConfig;
use crate::drag::{DragController, DragMode};
use crate::events::{EventBus, InteractionEvent, InteractionListener, Notifier};
use crate::host::InteractionHost;
use crate::math::{Isometry, Point, Real};
use crate::selection::stylus::{resolve_target, ButtonTracker, ClickSelection, HoverQueue, HoverResolver};
use crate::selection::{find_rigid_body, ObjectRelation, SelectionSet, SelectionVolume, VolumeFilter};
use crate::stylus::{PointStylus, StylusPose, StylusShape};

bitflags::bitflags! {
    /// Keyboard modifiers held during a frame.
    #[derive(Default)]
    pub struct Modifiers: u32 {
        /// Add to the selection instead of replacing it, or toggle an object off.
        const ADDITIVE = 1 << 0;
        /// Use the drag mode opposite to the configured one.
        const MODE_TOGGLE = 1 << 1;
    }
}

/// Raw inputs sampled by the host for one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameInputs {
    pub stylus_pose: Isometry,
    pub buttons: Vec<bool>,
    pub modifiers: Modifiers,
}

impl Default for FrameInputs {
    fn default() -> Self {
        Self {
            stylus_pose: Isometry::identity(),
            buttons: Vec::new(),
            modifiers: Modifiers::empty(),
        }
    }
}

pub struct StylusInteraction<H: InteractionHost> {
    config: InteractionConfig,
    stylus: StylusPose,
    shape: Box<dyn StylusShape<H::Object>>,
    relation: ObjectRelation<H>,
    buttons: ButtonTracker,
    hover_queue: HoverQueue<H::Object>,
    hover: HoverResolver<H::Object>,
    selection: SelectionSet<H::Object>,
    click: ClickSelection,
    volume: SelectionVolume<H::Object>,
    drag: DragController<H>,
    events: EventBus<H::Object>,
}

impl<H: InteractionHost + 'static> StylusInteraction<H> {
    pub fn new(config: InteractionConfig) -> Self {
        Self {
            buttons: ButtonTracker::new(config.num_buttons),
            drag: DragController::new(config.drag_mode),
            config,
            stylus: StylusPose::default(),
            shape: Box::new(PointStylus),
            relation: Box::new(find_rigid_body::<H>),
            hover_queue: HoverQueue::default(),
            hover: HoverResolver::default(),
            selection: SelectionSet::default(),
            click: ClickSelection::default(),
            volume: SelectionVolume::default(),
            events: EventBus::default(),
        }
    }
}

impl<H: InteractionHost> StylusInteraction<H> {
    pub fn with_shape(mut self, shape: Box<dyn StylusShape<H::Object>>) -> Self {
        self.shape = shape;
        self
    }

    /// Replaces the collidable-to-owner mapping used for hover and the selection volume.
    pub fn with_relation(mut self, relation: ObjectRelation<H>) -> Self {
        self.relation = relation;
        self
    }

    pub fn subscribe(&mut self, listener: Box<dyn InteractionListener<H::Object>>) {
        self.events.subscribe(listener);
    }

    pub fn shape_mut(&mut self) -> &mut dyn StylusShape<H::Object> {
        &mut *self.shape
    }

    pub fn config(&self) -> &InteractionConfig {
        &self.config
    }

    pub fn stylus(&self) -> &StylusPose {
        &self.stylus
    }

    pub fn hovered(&self) -> Option<H::Object> {
        self.hover.hovered()
    }

    pub fn hover_point(&self) -> Point {
        self.hover.point()
    }

    pub fn hover_queue(&self) -> &HoverQueue<H::Object> {
        &self.hover_queue
    }

    pub fn selection(&self) -> &SelectionSet<H::Object> {
        &self.selection
    }

    pub fn is_selected(&self, object: H::Object) -> bool {
        self.selection.contains(object)
    }

    pub fn selection_volume(&self) -> &SelectionVolume<H::Object> {
        &self.volume
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    pub fn drag_mode(&self) -> DragMode {
        self.drag.mode()
    }

    pub fn drag(&self) -> &DragController<H> {
        &self.drag
    }

    /// Events fired during the last tick, in firing order.
    pub fn events(&self) -> &[InteractionEvent<H::Object>] {
        self.events.frame_events()
    }

    /// Adds `object` to the selection. The change is notified on the next tick.
    pub fn select(&mut self, object: H::Object) {
        self.selection.insert(object);
    }

    pub fn deselect(&mut self, object: H::Object) {
        self.selection.remove(object);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Reports a collidable entering the selection volume.
    pub fn on_overlap_begin(&mut self, host: &H, collidable: H::Object) {
        let filter = self.volume_filter();
        self.volume.overlap_begin(
            host,
            collidable,
            &*self.relation,
            filter,
            &mut self.selection,
        );
    }

    /// Reports a collidable leaving the selection volume.
    pub fn on_overlap_end(&mut self, collidable: H::Object) {
        self.volume.overlap_end(collidable, &mut self.selection);
    }

    /// Runs one frame of stylus interaction.
    pub fn tick(&mut self, host: &mut H, dt: Real, inputs: &FrameInputs) {
        self.events.begin_frame();

        self.stylus = StylusPose {
            pose: inputs.stylus_pose,
            hot_spot: self.shape.hot_spot(),
        };
        host.set_stylus_pose(&self.stylus.pose);
        self.buttons.update(&inputs.buttons);

        let additive = inputs.modifiers.contains(Modifiers::ADDITIVE);
        let desired_mode = if inputs.modifiers.contains(Modifiers::MODE_TOGGLE) {
            self.config.drag_mode.toggled()
        } else {
            self.config.drag_mode
        };

        self.update_hover(host);
        self.update_selection(host, additive);
        self.selection.notify_changes(&mut self.events);
        self.update_drag(host, desired_mode);

        self.events.end_frame(dt);
    }

    fn volume_filter(&self) -> VolumeFilter {
        VolumeFilter {
            mask: self.config.layer_mask,
            ui_layer: self.config.ui_layer,
        }
    }

    fn is_ui(&self, host: &H, object: H::Object) -> bool {
        host.layer(object) == Some(self.config.ui_layer)
    }

    fn update_hover(&mut self, host: &H) {
        self.hover_queue
            .update(host, &self.stylus, self.config.hover_mask());
        let hit = self.hover_queue.first();
        let target = resolve_target(host, hit, self.config.ui_layer, &*self.relation);
        log::trace!("Hover candidates: {}", self.hover_queue.hits().len());

        let mut notifier = Notifier::new(&self.stylus, &mut self.events, &mut *self.shape);
        self.hover.update(hit, target, &mut notifier);
    }

    fn update_selection(&mut self, host: &H, additive: bool) {
        let button = self.config.select_button;
        let hovered = self.hover.hovered();
        let hovered_is_ui = hovered.map_or(false, |o| self.is_ui(host, o));
        let position = self.stylus.position();

        if self.buttons.went_down(button) {
            self.click.on_button_down(
                &mut self.selection,
                hovered,
                hovered_is_ui,
                additive,
                position,
            );

            if hovered.is_none() {
                self.volume
                    .begin(&self.stylus, self.config.axis_aligned_volume);
            }
        } else if self.buttons.is_down(button) {
            self.click.on_button_held(additive);
        }

        if self.volume.is_active() {
            let filter = self.volume_filter();
            self.volume.update(&self.stylus);
            self.volume
                .sync_overlaps(host, &*self.relation, filter, &mut self.selection);
        }

        if self.buttons.went_up(button) {
            if self.click.on_button_up(
                &mut self.selection,
                hovered,
                hovered_is_ui,
                additive,
                position,
                self.config.min_drag_distance,
            ) {
                log::debug!("Toggled {:?} off the selection", hovered);
            }
            self.volume.end();
        }
    }

    fn update_drag(&mut self, host: &mut H, desired_mode: DragMode) {
        let button = self.config.drag_button;

        if self.drag.set_mode(
            host,
            desired_mode,
            &self.stylus,
            &self.config.dragging_body,
        ) {
            self.clear_hover();
        }

        if self.buttons.went_down(button) {
            if let Some(hovered) = self.hover.hovered() {
                let mut objects: Vec<_> = self
                    .selection
                    .iter()
                    .filter(|o| *o != hovered && !self.is_ui(host, *o))
                    .collect();
                // The hovered object is reported last to the stylus shape.
                if self.selection.contains(hovered) && !self.is_ui(host, hovered) {
                    objects.push(hovered);
                }

                let contact_point = self.hover.point();
                let mut notifier =
                    Notifier::new(&self.stylus, &mut self.events, &mut *self.shape);
                let physical = self.drag.begin(
                    host,
                    objects,
                    contact_point,
                    &self.config.dragging_body,
                    &mut notifier,
                );

                if physical {
                    self.hover.set_hovered(None, &mut notifier);
                }
            }
        }

        if self.buttons.went_up(button) {
            let mut notifier = Notifier::new(&self.stylus, &mut self.events, &mut *self.shape);
            self.drag.end(host, &mut notifier);
        }

        self.drag.update(host, &self.stylus);
    }

    fn clear_hover(&mut self) {
        let mut notifier = Notifier::new(&self.stylus, &mut self.events, &mut *self.shape);
        self.hover.set_hovered(None, &mut notifier);
    }
}
