use crate::WhiteboardElement;

use serde::{Deserialize, Serialize};

/// Current canvas contents for one component, with an optional rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WhiteboardUpdate {
    pub component_id: String,
    pub elements: Vec<WhiteboardElement>,
    /// Base64-encoded image of the canvas.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screenshot: Option<String>,
}
