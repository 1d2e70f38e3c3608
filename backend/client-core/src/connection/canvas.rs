use super::{Canvas, Client};
use crate::monitor::WhiteboardPublisher;

use models::{CodeGenContext, CodeGenRequest, WhiteboardElement, WhiteboardUpdate};

impl Client<Canvas> {
    pub fn send_whiteboard_update(
        &self,
        component_id: &str,
        elements: Vec<WhiteboardElement>,
        screenshot: Option<String>,
    ) {
        self.send(WhiteboardUpdate {
            component_id: component_id.to_string(),
            elements,
            screenshot,
        });
    }

    pub fn request_code_generation(
        &self,
        prompt: &str,
        context: CodeGenContext,
        component_id: &str,
    ) {
        self.send(CodeGenRequest {
            prompt: prompt.to_string(),
            context,
            component_id: component_id.to_string(),
        });
    }
}

impl WhiteboardPublisher for Client<Canvas> {
    fn publish_whiteboard(
        &self,
        component_id: &str,
        elements: Vec<WhiteboardElement>,
        screenshot: Option<String>,
    ) {
        self.send_whiteboard_update(component_id, elements, screenshot);
    }
}
