use super::{Haptics, VibrationPattern};
use crate::host::InteractionHost;
use crate::math::{Real, Vector};
use std::collections::HashMap;
use std::hash::Hash;

/// Vibrations felt through simulated bodies.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HapticCue {
    Hover,
    /// Loops until the body stops rolling.
    Roll,
    Bump,
    Impact,
    HardImpact,
}

impl HapticCue {
    pub fn pattern(self) -> VibrationPattern {
        match self {
            Self::Hover => VibrationPattern::new(0.1, 0.1, 0),
            Self::Roll => VibrationPattern::new(0.1, 0.1, -1),
            Self::Bump => VibrationPattern::new(0.15, 0.15, 0),
            Self::Impact => VibrationPattern::new(0.2, 0.2, 0),
            Self::HardImpact => VibrationPattern::new(0.3, 0.3, 0),
        }
    }

    /// Grades a contact by the vertical velocity of the body after it: falling fast or bouncing up
    /// is hard, falling slowly or resting is an impact, anything else a bump.
    pub fn from_vertical_velocity(vertical_velocity: Real) -> Self {
        if vertical_velocity <= -3.0 || vertical_velocity >= 1.0 {
            Self::HardImpact
        } else if vertical_velocity <= -2.0 || vertical_velocity >= 0.0 {
            Self::Impact
        } else {
            Self::Bump
        }
    }
}

/// What a watched body plays when it starts touching something.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImpactResponse {
    /// The same cue for every contact.
    Constant(HapticCue),
    /// Graded with [`HapticCue::from_vertical_velocity`].
    #[default]
    Graded,
}

#[derive(Copy, Clone, Debug)]
struct WatchedBody {
    response: ImpactResponse,
    rolling: bool,
}

/// Plays a looping vibration while a watched body rolls, and a short one when it hits something.
///
/// A body rolls while it moves horizontally without any vertical motion.
pub struct BodyHaptics<O, D> {
    device: D,
    watched: HashMap<O, WatchedBody>,
    /// Speeds below this are considered zero.
    pub rest_threshold: Real,
}

impl<O: Copy + Eq + Hash, D: Haptics> BodyHaptics<O, D> {
    pub fn new(device: D) -> Self {
        Self {
            device,
            watched: HashMap::new(),
            rest_threshold: 1.0e-3,
        }
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    pub fn watch(&mut self, object: O, response: ImpactResponse) {
        self.watched.insert(
            object,
            WatchedBody {
                response,
                rolling: false,
            },
        );
    }

    pub fn unwatch(&mut self, object: O) {
        if let Some(watched) = self.watched.remove(&object) {
            if watched.rolling {
                self.device.stop();
            }
        }
    }

    pub fn is_rolling(&self, object: O) -> bool {
        self.watched.get(&object).map_or(false, |w| w.rolling)
    }

    pub fn play(&mut self, cue: HapticCue) {
        log::trace!("Body haptic cue {:?}", cue);
        self.device.vibrate(cue.pattern());
    }

    /// Starts or stops the roll vibration from the current velocity of `object`.
    pub fn update_motion(&mut self, object: O, linvel: &Vector) {
        let threshold = self.rest_threshold;
        let Some(watched) = self.watched.get_mut(&object) else {
            return;
        };

        let moving = linvel.x.abs() > threshold || linvel.z.abs() > threshold;
        let rolling = moving && linvel.y.abs() <= threshold;

        if rolling && !watched.rolling {
            watched.rolling = true;
            self.play(HapticCue::Roll);
        } else if !rolling && watched.rolling {
            watched.rolling = false;
            self.device.stop();
        }
    }

    /// `object` started touching something while moving at `linvel`.
    pub fn on_contact_begin(&mut self, object: O, linvel: &Vector) {
        let Some(watched) = self.watched.get(&object) else {
            return;
        };

        let cue = match watched.response {
            ImpactResponse::Constant(cue) => cue,
            ImpactResponse::Graded => HapticCue::from_vertical_velocity(linvel.y),
        };
        self.play(cue);
    }

    /// Feeds the velocities of every watched body, then the contacts that started this step.
    pub fn update<H: InteractionHost<Object = O>>(&mut self, host: &H, contact_starts: &[(O, O)]) {
        let objects: Vec<_> = self.watched.keys().copied().collect();
        for object in objects {
            let linvel = host.velocity(object).unwrap_or_default().linear;
            self.update_motion(object, &linvel);
        }

        for (a, b) in contact_starts {
            for object in [*a, *b] {
                if self.watched.contains_key(&object) {
                    let linvel = host.velocity(object).unwrap_or_default().linear;
                    self.on_contact_begin(object, &linvel);
                }
            }
        }
    }
}
