use crate::{ComponentStatus, WhiteboardElement};

use serde::{Deserialize, Serialize};

/// Everything the worker gets to look at when generating code.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeGenContext {
    pub whiteboard_elements: Vec<WhiteboardElement>,
    pub files: Vec<String>,
    /// Components generated earlier in the same session.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_ids: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeGenRequest {
    pub prompt: String,
    pub context: CodeGenContext,
    pub component_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeGenResponse {
    pub component_id: String,
    pub code: String,
    pub spec_file: String,
    pub status: ComponentStatus,
}
