use crate::events::{InteractionEvent, Notifier};
use crate::host::{BodyProperties, InteractionHost};
use crate::math::Point;
use crate::stylus::StylusPose;
use std::collections::HashMap;

pub use self::kinematic::Grip;
pub use self::physical::PhysicalDrag;

mod kinematic;
mod physical;

#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    serde::Serialize,
    serde::Deserialize,
    strum_macros::Display,
    strum_macros::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DragMode {
    /// Dragged objects copy the stylus motion directly.
    #[default]
    Kinematic,
    /// Dragged objects are pulled toward the stylus by a spring.
    Physical,
}

impl DragMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::Kinematic => Self::Physical,
            Self::Physical => Self::Kinematic,
        }
    }
}

/// Drags the selected objects along with the stylus.
pub struct DragController<H: InteractionHost> {
    mode: DragMode,
    /// Contact point at drag start, in the stylus frame.
    contact_local: Point,
    focus: Vec<H::Object>,
    grips: HashMap<H::Object, Grip>,
    physical: PhysicalDrag<H>,
}

impl<H: InteractionHost> Default for DragController<H> {
    fn default() -> Self {
        Self::new(DragMode::Kinematic)
    }
}

impl<H: InteractionHost> DragController<H> {
    pub fn new(mode: DragMode) -> Self {
        Self {
            mode,
            contact_local: Point::origin(),
            focus: Vec::new(),
            grips: HashMap::new(),
            physical: PhysicalDrag::default(),
        }
    }

    pub fn mode(&self) -> DragMode {
        self.mode
    }

    pub fn is_dragging(&self) -> bool {
        !self.focus.is_empty()
    }

    pub fn focus_objects(&self) -> &[H::Object] {
        &self.focus
    }

    pub fn grip(&self, object: H::Object) -> Option<&Grip> {
        self.grips.get(&object)
    }

    pub fn physical(&self) -> &PhysicalDrag<H> {
        &self.physical
    }

    /// Contact point of the current drag, following the stylus.
    pub fn anchor(&self, stylus: &StylusPose) -> Point {
        stylus.pose * self.contact_local
    }

    /// Starts dragging `objects`. Objects whose pose is unknown are skipped.
    ///
    /// Returns `true` if the drag started physically, in which case the hover target must be
    /// cleared.
    pub fn begin(
        &mut self,
        host: &mut H,
        objects: impl IntoIterator<Item = H::Object>,
        contact_point: Point,
        dragging_body: &BodyProperties,
        notifier: &mut Notifier<H::Object>,
    ) -> bool {
        if self.is_dragging() {
            return false;
        }

        let stylus = notifier.stylus;
        self.contact_local = stylus.to_local(&contact_point);

        for object in objects {
            if self.grips.contains_key(&object) {
                continue;
            }

            if let Some(pose) = host.pose(object) {
                // Save the relative transform from the stylus to the focus object.
                self.grips.insert(object, Grip::capture(&stylus.pose, &pose));
                self.focus.push(object);
                notifier.events.emit(InteractionEvent::DragBegin(object));
            }
        }

        let Some(last) = self.focus.last().copied() else {
            return false;
        };

        log::debug!("{} drag started on {:?}", self.mode, self.focus);
        notifier.shape.on_drag_begin(last);

        if self.mode == DragMode::Physical {
            let anchor = self.anchor(stylus);
            self.physical
                .begin(host, &self.focus, &anchor, dragging_body);
            true
        } else {
            false
        }
    }

    pub fn end(&mut self, host: &mut H, notifier: &mut Notifier<H::Object>) {
        if !self.is_dragging() {
            return;
        }

        if self.mode == DragMode::Physical {
            self.physical.end(host, &self.focus);
        }

        for object in &self.focus {
            notifier.events.emit(InteractionEvent::DragEnd(*object));
        }
        notifier.shape.on_drag_end(&self.focus);

        log::debug!("{} drag ended on {:?}", self.mode, self.focus);
        self.focus.clear();
        self.grips.clear();
    }

    /// Switches drag mode, tearing down and rebuilding the drag state if a drag is in progress.
    ///
    /// Returns `true` if a drag switched to physical, in which case the hover target must be
    /// cleared.
    pub fn set_mode(
        &mut self,
        host: &mut H,
        mode: DragMode,
        stylus: &StylusPose,
        dragging_body: &BodyProperties,
    ) -> bool {
        if mode == self.mode {
            return false;
        }

        log::debug!("Drag mode {} -> {}", self.mode, mode);
        self.mode = mode;

        if !self.is_dragging() {
            return false;
        }

        match mode {
            DragMode::Physical => {
                let anchor = self.anchor(stylus);
                self.physical
                    .begin(host, &self.focus, &anchor, dragging_body);
                true
            }
            DragMode::Kinematic => {
                self.physical.end(host, &self.focus);
                // Resume from wherever the physics left the objects.
                for object in &self.focus {
                    if let Some(pose) = host.pose(*object) {
                        self.grips
                            .insert(*object, Grip::capture(&stylus.pose, &pose));
                    }
                }
                false
            }
        }
    }

    /// Moves the dragged objects with the stylus. Physical drags are left to the host simulation.
    pub fn update(&self, host: &mut H, stylus: &StylusPose) {
        if self.mode != DragMode::Kinematic {
            return;
        }

        for object in &self.focus {
            if let Some(grip) = self.grips.get(object) {
                host.set_pose(*object, &grip.apply(&stylus.pose));
            }
        }
    }
}
