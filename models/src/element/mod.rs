pub mod builder;

use serde::{Deserialize, Serialize};

/// One shape on the canvas, reduced to the fields the worker reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhiteboardElement {
    pub id: String,
    /// Shape kind as named by the drawing surface (`rectangle`, `arrow`, `text`, ...).
    #[serde(rename = "type")]
    pub kind: String,
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Vertices relative to (`x`, `y`) for lines, arrows and freehand strokes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<Vec<[f64; 2]>>,
}
