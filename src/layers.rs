/// Index of an object layer, `0..32`.
pub type Layer = u32;

pub const DEFAULT_LAYER: Layer = 0;
/// Objects on this layer can be hovered but never selected or dragged.
pub const DEFAULT_UI_LAYER: Layer = 5;

/// A bitmask of layers eligible for stylus interaction.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct LayerMask(pub u32);

impl LayerMask {
    pub const NONE: Self = Self(0);
    pub const ALL: Self = Self(u32::MAX);

    pub fn from_layer(layer: Layer) -> Self {
        Self::NONE.with_layer(layer)
    }

    pub fn with_layer(self, layer: Layer) -> Self {
        if layer < 32 {
            Self(self.0 | (1 << layer))
        } else {
            self
        }
    }

    pub fn contains(self, layer: Layer) -> bool {
        layer < 32 && self.0 & (1 << layer) != 0
    }

    pub fn intersects(self, bits: u32) -> bool {
        self.0 & bits != 0
    }

    pub fn bits(self) -> u32 {
        self.0
    }
}

impl Default for LayerMask {
    fn default() -> Self {
        Self::from_layer(DEFAULT_LAYER)
    }
}
