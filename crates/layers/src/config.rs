use serde::{Deserialize, Serialize};

use crate::symbology::VectorStyle;

#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct LayerId(pub u64);

/// Resolved per-layer 3D rendering options.
///
/// The viewer resolves these from its layer settings and hands the finished
/// struct to the sync layer; nothing downstream reaches back into a shared
/// settings registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorLayerConfig {
    /// Render ellipse geometries as 3D ellipsoids instead of flat shapes.
    #[serde(default)]
    pub show_ellipsoids: bool,
    /// Draw a vertical reference line from an elevated ellipse's center to
    /// the ground.
    #[serde(default)]
    pub show_ground_reference: bool,
    /// Fallback style for features without one of their own.
    #[serde(default)]
    pub style: VectorStyle,
}

impl Default for VectorLayerConfig {
    fn default() -> Self {
        Self {
            show_ellipsoids: false,
            show_ground_reference: false,
            style: VectorStyle::default(),
        }
    }
}

#[derive(Debug)]
pub enum LayerConfigError {
    Parse(serde_json::Error),
}

impl std::fmt::Display for LayerConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LayerConfigError::Parse(e) => write!(f, "failed to parse layer config: {e}"),
        }
    }
}

impl std::error::Error for LayerConfigError {}

impl VectorLayerConfig {
    pub fn from_json_str(payload: &str) -> Result<Self, LayerConfigError> {
        serde_json::from_str(payload).map_err(LayerConfigError::Parse)
    }
}
