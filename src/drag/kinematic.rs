use crate::math::{Isometry, Rotation, Translation, Vector};

/// Pose of a dragged object relative to the stylus, captured when the drag starts.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Grip {
    /// Object position minus stylus position, in the stylus frame.
    pub offset: Vector,
    pub rotation: Rotation,
}

impl Grip {
    pub fn capture(stylus: &Isometry, object: &Isometry) -> Self {
        let inv_rotation = stylus.rotation.inverse();
        Self {
            offset: inv_rotation * (object.translation.vector - stylus.translation.vector),
            rotation: inv_rotation * object.rotation,
        }
    }

    /// World pose of the gripped object for the given stylus pose.
    pub fn apply(&self, stylus: &Isometry) -> Isometry {
        Isometry::from_parts(
            Translation::from(stylus.translation.vector + stylus.rotation * self.offset),
            stylus.rotation * self.rotation,
        )
    }
}
