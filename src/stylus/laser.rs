use super::{StylusPose, StylusShape};
use crate::math::{Point, Real, Vector};

/// A laser that stretches to whatever it hovers.
///
/// The probe is unbounded. The visible tip is hidden until the laser touches something, then sits at
/// the contact point, never closer than the combined tip and base lengths.
#[derive(Copy, Clone, Debug)]
pub struct LaserStylus {
    pub initial_length: Real,
    pub tip_length: Real,
    pub base_length: Real,
    tip_distance: Real,
    tip_visible: bool,
}

impl LaserStylus {
    pub fn new(initial_length: Real, tip_length: Real, base_length: Real) -> Self {
        let initial_length = initial_length.max(tip_length + base_length);
        Self {
            initial_length,
            tip_length,
            base_length,
            tip_distance: initial_length,
            tip_visible: false,
        }
    }

    /// Distance from the stylus origin to the tip, along the forward axis.
    pub fn tip_distance(&self) -> Real {
        self.tip_distance
    }

    pub fn beam_length(&self) -> Real {
        self.tip_distance - self.tip_length - self.base_length
    }

    pub fn tip_visible(&self) -> bool {
        self.tip_visible
    }
}

impl Default for LaserStylus {
    fn default() -> Self {
        Self::new(1.0, 0.0, 0.0)
    }
}

impl<O> StylusShape<O> for LaserStylus {
    fn hot_spot(&self) -> Vector {
        Vector::zeros()
    }

    fn on_hover_begin(&mut self, _stylus: &StylusPose, _object: O, _point: &Point) {
        self.tip_visible = true;
    }

    fn on_hover_stay(&mut self, stylus: &StylusPose, _object: O, point: &Point) {
        let local_z = stylus.to_local(point).z;
        self.tip_distance = local_z.max(self.tip_length + self.base_length);
    }

    fn on_hover_end(&mut self, _stylus: &StylusPose, _object: O) {
        self.tip_distance = self.initial_length;
        self.tip_visible = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn laser_stretches_to_hover_point_and_back() {
        let stylus = StylusPose::default();
        let mut laser = LaserStylus::new(1.0, 0.1, 0.2);

        assert!(!laser.tip_visible());
        StylusShape::<u32>::on_hover_begin(&mut laser, &stylus, 7, &Point::new(0.0, 0.0, 4.0));
        StylusShape::<u32>::on_hover_stay(&mut laser, &stylus, 7, &Point::new(0.0, 0.0, 4.0));
        assert!(laser.tip_visible());
        assert_eq!(laser.tip_distance(), 4.0);
        assert!((laser.beam_length() - 3.7).abs() < 1.0e-6);

        // Contacts behind the base clamp to the tip and base lengths.
        StylusShape::<u32>::on_hover_stay(&mut laser, &stylus, 7, &Point::new(0.0, 0.0, -1.0));
        assert!((laser.tip_distance() - 0.3).abs() < 1.0e-6);

        StylusShape::<u32>::on_hover_end(&mut laser, &stylus, 7);
        assert!(!laser.tip_visible());
        assert_eq!(laser.tip_distance(), 1.0);
    }

    #[test]
    fn initial_length_covers_tip_and_base() {
        let laser = LaserStylus::new(0.1, 0.5, 0.5);
        assert_eq!(laser.initial_length, 1.0);
        assert_eq!(laser.beam_length(), 0.0);
    }
}
