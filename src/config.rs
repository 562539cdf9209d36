use crate::drag::DragMode;
use crate::haptics::RumbleIntensities;
use crate::host::BodyProperties;
use crate::layers::{Layer, LayerMask, DEFAULT_UI_LAYER};
use crate::math::Real;
use anyhow::Context;
use std::path::Path;

/// Spring tying a physically dragged body to the stylus.
#[derive(Copy, Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SpringParameters {
    pub rest_length: Real,
    pub stiffness: Real,
    pub damping: Real,
}

impl Default for SpringParameters {
    fn default() -> Self {
        Self {
            rest_length: 0.0,
            stiffness: 100.0,
            damping: 100.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    /// Layers considered for hover and selection. The UI layer is always added.
    pub layer_mask: LayerMask,
    pub ui_layer: Layer,
    /// Minimum stylus travel between press and release for the gesture to count as a drag.
    pub min_drag_distance: Real,
    pub num_buttons: usize,
    pub select_button: usize,
    pub drag_button: usize,
    /// Drag mode used while the mode-toggle modifier is released.
    pub drag_mode: DragMode,
    pub dragging_body: BodyProperties,
    pub spring: SpringParameters,
    /// Whether the selection volume follows world axes rather than the stylus orientation.
    pub axis_aligned_volume: bool,
    pub rumble: RumbleIntensities,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            layer_mask: LayerMask::default(),
            ui_layer: DEFAULT_UI_LAYER,
            min_drag_distance: 0.01,
            num_buttons: 3,
            select_button: 0,
            drag_button: 0,
            drag_mode: DragMode::Kinematic,
            dragging_body: BodyProperties::dragging(),
            spring: SpringParameters::default(),
            axis_aligned_volume: true,
            rumble: RumbleIntensities::default(),
        }
    }
}

impl InteractionConfig {
    pub fn from_json_str(json: &str) -> anyhow::Result<Self> {
        serde_json::from_str(json).context("invalid interaction configuration")
    }

    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read configuration {}", path.display()))?;
        Self::from_json_str(&json).with_context(|| format!("while loading {}", path.display()))
    }

    /// The mask actually used for probing: `layer_mask` plus the UI layer.
    pub fn hover_mask(&self) -> LayerMask {
        self.layer_mask.with_layer(self.ui_layer)
    }
}
