use crate::cli::Credentials;
use crate::commands::{Context, establish, log_lifecycle, wait_for_shutdown};
use crate::error::BridgeError;

use client_core::{CanvasClient, Monitor};
use models::WhiteboardElement;

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use log::{debug, info, warn};

/// Reads the canvas from a JSON file, falling back to the last good read while
/// the file is missing or half-written.
#[derive(Debug, Clone)]
pub struct ElementFile {
    path: PathBuf,
    last_good: Arc<Mutex<Vec<WhiteboardElement>>>,
}

impl ElementFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            last_good: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn read(&self) -> Vec<WhiteboardElement> {
        let mut last_good = self.last_good.lock().unwrap_or_else(PoisonError::into_inner);
        match read_elements(&self.path) {
            Ok(elements) => {
                *last_good = elements.clone();
                elements
            }
            Err(reason) => {
                debug!("Keeping previous canvas: {reason}");
                last_good.clone()
            }
        }
    }
}

fn read_elements(path: &Path) -> Result<Vec<WhiteboardElement>, String> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    serde_json::from_str(&contents).map_err(|e| format!("cannot parse {}: {e}", path.display()))
}

/// Screenshot accessor: the trimmed file contents, or nothing.
pub fn read_screenshot(path: Option<&Path>) -> Option<String> {
    let path = path?;
    match std::fs::read_to_string(path) {
        Ok(contents) => Some(contents.trim().to_string()).filter(|s| !s.is_empty()),
        Err(e) => {
            warn!("Sending update without screenshot: {e}");
            None
        }
    }
}

pub async fn run(
    context: &Context,
    file: &Path,
    component_id: &str,
    screenshot: Option<PathBuf>,
    interval_ms: Option<u64>,
    credentials: &Credentials,
) -> Result<(), BridgeError> {
    let client: CanvasClient = context.client()?;
    log_lifecycle(&client);
    establish(&client, credentials).await?;

    let elements = ElementFile::new(file);
    let interval =
        Duration::from_millis(interval_ms.unwrap_or(context.config.monitor.interval_ms));
    let mut monitor = Monitor::new(
        client.clone(),
        move || elements.read(),
        move || read_screenshot(screenshot.as_deref()),
    )
    .with_interval(interval);

    monitor.start(component_id);
    info!("Watching {} for {component_id}; Ctrl-C to stop", file.display());
    wait_for_shutdown(None).await?;

    monitor.stop();
    client.disconnect();
    Ok(())
}
