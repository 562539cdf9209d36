use crate::math::Real;

/// A vibration burst: `on_period` seconds on, `off_period` seconds off, played `repeat_count + 1`
/// times. A negative repeat count loops until stopped.
#[derive(Copy, Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct VibrationPattern {
    pub on_period: Real,
    pub off_period: Real,
    pub repeat_count: i32,
}

impl VibrationPattern {
    pub fn new(on_period: Real, off_period: Real, repeat_count: i32) -> Self {
        Self {
            on_period,
            off_period,
            repeat_count,
        }
    }

    /// The standard pattern table, from a light tick (1) to long buzzes (9). Intensities above 9
    /// produce a single buzz of `0.1 * intensity` seconds. 0 is silent.
    pub fn from_intensity(intensity: u32) -> Option<Self> {
        let pattern = match intensity {
            0 => return None,
            1 => Self::new(0.032, 0.128, 0),
            2 => Self::new(0.032, 0.064, 0),
            3 => Self::new(0.032, 0.064, 1),
            4 => Self::new(0.064, 0.128, 0),
            5 => Self::new(0.64, 0.064, 0),
            6 => Self::new(0.64, 0.064, 1),
            7 => Self::new(0.128, 0.256, 0),
            8 => Self::new(0.128, 0.128, 0),
            9 => Self::new(0.128, 0.128, 1),
            _ => Self::new(0.1 * intensity as Real, 0.0, 0),
        };
        Some(pattern)
    }

    pub fn loops(&self) -> bool {
        self.repeat_count < 0
    }

    /// Total play time in seconds, infinite for looping patterns.
    pub fn duration(&self) -> Real {
        if self.loops() {
            Real::INFINITY
        } else {
            (self.on_period + self.off_period) * (self.repeat_count + 1) as Real
        }
    }
}
