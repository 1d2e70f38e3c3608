use crate::{CANVAS_SOCKET_PATH, EDITOR_SOCKET_PATH};

use models::ClientRole;

/// Compile-time selector for which socket path a client dials and which
/// convenience operations it exposes.
pub trait Role: Send + Sync + 'static {
    const ROLE: ClientRole;
    const SOCKET_PATH: &'static str;
}

/// Code-editor extension surface.
#[derive(Debug)]
pub enum Editor {}

/// Whiteboard surface.
#[derive(Debug)]
pub enum Canvas {}

impl Role for Editor {
    const ROLE: ClientRole = ClientRole::Editor;
    const SOCKET_PATH: &'static str = EDITOR_SOCKET_PATH;
}

impl Role for Canvas {
    const ROLE: ClientRole = ClientRole::Canvas;
    const SOCKET_PATH: &'static str = CANVAS_SOCKET_PATH;
}
