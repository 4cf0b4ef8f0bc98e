use serde::{Deserialize, Serialize};

/// Line appearance. Dash lengths are in pixels, on/off alternating,
/// starting with an "on" run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub color: [f32; 4],
    pub width_px: f32,
    #[serde(default)]
    pub dash: Option<Vec<f32>>,
}

impl Default for Stroke {
    fn default() -> Self {
        Self {
            color: [1.0, 1.0, 1.0, 1.0],
            width_px: 2.0,
            dash: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fill {
    pub color: [f32; 4],
}

impl Default for Fill {
    fn default() -> Self {
        Self {
            color: [1.0, 1.0, 1.0, 0.25],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MarkerShape {
    Circle,
    Icon { src: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub shape: MarkerShape,
    pub radius_px: f32,
    pub color: [f32; 4],
}

impl Default for Marker {
    fn default() -> Self {
        Self {
            shape: MarkerShape::Circle,
            radius_px: 3.0,
            color: [1.0, 1.0, 1.0, 1.0],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    pub text: String,
    pub font_size_px: f32,
    pub color: [f32; 4],
    pub halo_color: [f32; 4],
    pub halo_width_px: f32,
}

impl TextStyle {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            font_size_px: 14.0,
            color: [1.0, 1.0, 1.0, 1.0],
            halo_color: [0.0, 0.0, 0.0, 0.85],
            halo_width_px: 2.0,
        }
    }
}

/// The renderable appearance of one feature. Styles are plain values; the
/// sync layer compares fields against what a primitive was built with to
/// decide between in-place mutation and a rebuild.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorStyle {
    #[serde(default)]
    pub stroke: Option<Stroke>,
    #[serde(default)]
    pub fill: Option<Fill>,
    #[serde(default)]
    pub marker: Option<Marker>,
    #[serde(default)]
    pub text: Option<TextStyle>,
}

impl Default for VectorStyle {
    fn default() -> Self {
        Self {
            stroke: Some(Stroke::default()),
            fill: None,
            marker: Some(Marker::default()),
            text: None,
        }
    }
}
