use crate::math::{self, Isometry, Point, Real, Rotation, Vector};

/// How mouse input drives the stylus when no tracker is available.
#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    PartialEq,
    Eq,
    serde::Serialize,
    serde::Deserialize,
    strum_macros::Display,
    strum_macros::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StylusSimulatorMode {
    #[default]
    None,
    /// Position on the camera ray through the cursor, looking along that ray.
    Projection,
    /// Position on the camera ray through the cursor, keeping the current rotation.
    Position,
    /// Mouse motion rotates the stylus in place.
    Rotation,
}

/// The camera ray through the cursor.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CameraRay {
    pub origin: Point,
    pub dir: Vector,
    pub camera_position: Point,
    pub camera_up: Vector,
    /// Uniform scale of the camera transform.
    pub camera_scale: Real,
}

#[derive(Copy, Clone, Debug)]
pub struct StylusSimulator {
    pub mode: StylusSimulatorMode,
    wheel: Real,
}

impl Default for StylusSimulator {
    fn default() -> Self {
        Self::new(StylusSimulatorMode::None)
    }
}

impl StylusSimulator {
    pub fn new(mode: StylusSimulatorMode) -> Self {
        Self { mode, wheel: 0.01 }
    }

    pub fn wheel_total(&self) -> Real {
        self.wheel
    }

    /// Moves `pose` according to this frame's mouse motion (pixels) and wheel delta.
    pub fn apply(
        &mut self,
        pose: &mut Isometry,
        mouse_delta: [Real; 2],
        wheel_delta: Real,
        camera: &CameraRay,
    ) {
        if mouse_delta == [0.0, 0.0] && wheel_delta == 0.0 {
            return;
        }

        match self.mode {
            StylusSimulatorMode::None => {}
            StylusSimulatorMode::Projection | StylusSimulatorMode::Position => {
                // Only accumulate the wheel here, rotation would otherwise add a Z translation.
                self.wheel += wheel_delta;
                let dir = camera.dir.try_normalize(Real::EPSILON).unwrap_or_else(math::forward);
                let point = camera.origin + dir * (0.5 * self.wheel * camera.camera_scale);
                pose.translation.vector = point.coords;

                if self.mode == StylusSimulatorMode::Projection {
                    let look = (camera.origin + dir) - camera.camera_position;
                    pose.rotation = math::look_rotation(&look, &camera.camera_up);
                }
            }
            StylusSimulatorMode::Rotation => {
                let yaw = (0.1 * mouse_delta[0]).to_radians();
                let pitch = (-0.1 * mouse_delta[1]).to_radians();
                let roll = (-1000.0 * wheel_delta).to_radians();
                let delta = Rotation::from_axis_angle(&Vector::y_axis(), yaw)
                    * Rotation::from_axis_angle(&Vector::x_axis(), pitch)
                    * Rotation::from_axis_angle(&Vector::z_axis(), roll);
                pose.rotation *= delta;
            }
        }
    }
}
