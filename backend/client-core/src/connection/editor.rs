use super::{Client, Editor};

use models::{ClusterCheckRequest, ComponentStatus, FileOperation, StatusUpdate};

impl Client<Editor> {
    /// List files under `path`, or the workspace root when `None`.
    pub fn list_files(&self, path: Option<&str>) {
        self.send(FileOperation::list(path.map(str::to_owned)));
    }

    pub fn read_file(&self, path: &str) {
        self.send(FileOperation::read(path));
    }

    pub fn create_file(&self, path: &str, content: &str) {
        self.send(FileOperation::create(path, content));
    }

    pub fn update_file(&self, path: &str, content: &str) {
        self.send(FileOperation::update(path, content));
    }

    pub fn delete_file(&self, path: &str) {
        self.send(FileOperation::delete(path));
    }

    pub fn search_files(&self, query: &str) {
        self.send(FileOperation::search(query));
    }

    pub fn request_cluster_check(&self, component_id: &str, spec_file: &str) {
        self.send(ClusterCheckRequest {
            component_id: component_id.to_string(),
            spec_file: spec_file.to_string(),
        });
    }

    pub fn send_status_update(
        &self,
        component_id: &str,
        status: ComponentStatus,
        message: Option<&str>,
    ) {
        let update = StatusUpdate::new(component_id, status);
        self.send(match message {
            Some(message) => update.with_message(message),
            None => update,
        });
    }
}
