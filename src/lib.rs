//! Stylus hover, selection and drag interactions for stereoscopic desktop VR.

extern crate nalgebra as na;
#[cfg(feature = "dim3")]
pub extern crate rapier3d as rapier;

#[cfg(feature = "dim3")]
pub use rapier::parry;

pub use crate::config::{InteractionConfig, SpringParameters};
pub use crate::drag::DragMode;
pub use crate::events::{EventBus, InteractionEvent, InteractionListener};
pub use crate::host::{
    BodyProperties, BodyType, CandidateHit, InteractionHost, SceneQuery, Velocity,
    VolumeBounds,
};
pub use crate::interaction::{FrameInputs, Modifiers, StylusInteraction};
pub use crate::layers::{Layer, LayerMask};

pub mod config;
pub mod drag;
pub mod events;
pub mod haptics;
pub mod host;
pub mod interaction;
pub mod layers;
pub mod math;
pub mod selection;
pub mod stylus;

#[cfg(feature = "dim3")]
pub mod rapier_backend;
#[cfg(feature = "dim3")]
pub mod replay;
