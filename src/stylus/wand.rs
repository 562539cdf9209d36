use super::StylusShape;
use crate::math::{Real, Vector};

/// A fixed-length wand whose length the user can adjust.
#[derive(Copy, Clone, Debug)]
pub struct WandStylus {
    pub hot_spot: Vector,
    /// Relative growth per second while lengthening or shortening.
    pub scale_increment: Real,
}

impl WandStylus {
    pub fn new(length: Real) -> Self {
        Self {
            hot_spot: Vector::new(0.0, 0.0, length),
            scale_increment: 1.0,
        }
    }

    pub fn length(&self) -> Real {
        self.hot_spot.norm()
    }

    pub fn scale_length_by(&mut self, factor: Real) {
        self.hot_spot *= factor;
    }

    pub fn update(&mut self, dt: Real, lengthen: bool, shorten: bool) {
        let factor = 1.0 + dt * self.scale_increment;
        if lengthen {
            self.scale_length_by(factor);
        }
        if shorten {
            self.scale_length_by(1.0 / factor);
        }
    }
}

impl Default for WandStylus {
    fn default() -> Self {
        Self::new(0.1)
    }
}

impl<O> StylusShape<O> for WandStylus {
    fn hot_spot(&self) -> Vector {
        self.hot_spot
    }

    fn update_length(&mut self, dt: Real, lengthen: bool, shorten: bool) {
        self.update(dt, lengthen, shorten);
    }
}
