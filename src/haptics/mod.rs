use crate::events::{InteractionEvent, InteractionListener};
use crate::math::Real;

pub use self::body::{BodyHaptics, HapticCue, ImpactResponse};
pub use self::pattern::VibrationPattern;

mod body;
mod pattern;

/// The stylus vibration motor.
pub trait Haptics {
    fn vibrate(&mut self, pattern: VibrationPattern);
    fn stop(&mut self) {}
}

/// Intensity (see [`VibrationPattern::from_intensity`]) played for each kind of event. 0 is silent.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RumbleIntensities {
    pub hover: u32,
    pub unhover: u32,
    pub select: u32,
    pub deselect: u32,
    pub drag_begin: u32,
    pub drag_end: u32,
}

/// Shakes the stylus when objects are hovered, selected, or dragged.
///
/// A request arriving while a pattern is still playing is dropped.
pub struct Rumbler<D> {
    device: D,
    intensities: RumbleIntensities,
    remaining: Option<Real>,
}

impl<D: Haptics> Rumbler<D> {
    pub fn new(device: D, intensities: RumbleIntensities) -> Self {
        Self {
            device,
            intensities,
            remaining: None,
        }
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn is_vibrating(&self) -> bool {
        self.remaining.is_some()
    }

    pub fn shake(&mut self, intensity: u32) {
        if self.is_vibrating() {
            return;
        }

        if let Some(pattern) = VibrationPattern::from_intensity(intensity) {
            log::trace!("Stylus vibration {:?}", pattern);
            self.device.vibrate(pattern);
            self.remaining = Some(pattern.duration());
        }
    }

    pub fn stop(&mut self) {
        self.device.stop();
        self.remaining = None;
    }

    fn intensity_for<O>(&self, event: &InteractionEvent<O>) -> u32 {
        match event {
            InteractionEvent::HoverBegin { .. } => self.intensities.hover,
            InteractionEvent::HoverEnd { .. } => self.intensities.unhover,
            InteractionEvent::Selected(_) => self.intensities.select,
            InteractionEvent::Deselected(_) => self.intensities.deselect,
            InteractionEvent::DragBegin(_) => self.intensities.drag_begin,
            InteractionEvent::DragEnd(_) => self.intensities.drag_end,
            InteractionEvent::HoverStay { .. } => 0,
        }
    }
}

impl<O, D: Haptics> InteractionListener<O> for Rumbler<D> {
    fn on_event(&mut self, event: &InteractionEvent<O>) {
        let intensity = self.intensity_for(event);
        self.shake(intensity);
    }

    fn on_frame(&mut self, dt: Real) {
        if let Some(remaining) = &mut self.remaining {
            *remaining -= dt;
            if *remaining <= 0.0 {
                self.remaining = None;
            }
        }
    }
}
