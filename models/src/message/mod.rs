//! Frames exchanged with the worker, plus a verbatim catch-all for the rest.

pub mod clients;
pub mod cluster;
pub mod codegen;
pub mod file_operation;
pub mod status;
pub mod whiteboard;

use crate::ModelError;
use clients::ConnectedClients;
use cluster::{ClusterCheckRequest, ClusterCheckResponse};
use codegen::{CodeGenRequest, CodeGenResponse};
use file_operation::FileOperation;
use status::StatusUpdate;
use whiteboard::WhiteboardUpdate;

use common::ErrorLocation;

use std::fmt;
use std::panic::Location;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const AUTH_TYPE: &str = "auth";
pub const FILE_OPERATION_TYPE: &str = "fileOperation";
pub const WHITEBOARD_UPDATE_TYPE: &str = "whiteboardUpdate";
pub const STATUS_UPDATE_TYPE: &str = "statusUpdate";
pub const CODE_GEN_REQUEST_TYPE: &str = "codeGenRequest";
pub const CODE_GEN_RESPONSE_TYPE: &str = "codeGenResponse";
pub const CLUSTER_CHECK_REQUEST_TYPE: &str = "clusterCheckRequest";
pub const CLUSTER_CHECK_RESPONSE_TYPE: &str = "clusterCheckResponse";
pub const CONNECTED_CLIENTS_TYPE: &str = "connectedClients";
/// Reported by [`Message::kind`] for a catch-all frame with no string `type`.
pub const UNKNOWN_TYPE: &str = "unknown";

/// One frame on the socket.
///
/// Serialized as a flat JSON object whose `type` field selects the variant;
/// the payload's own fields sit next to it. Well-formed frames that fit none
/// of the typed variants decode as [`Message::Other`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Message {
    Auth(Auth),
    FileOperation(FileOperation),
    WhiteboardUpdate(WhiteboardUpdate),
    StatusUpdate(StatusUpdate),
    CodeGenRequest(CodeGenRequest),
    CodeGenResponse(CodeGenResponse),
    ClusterCheckRequest(ClusterCheckRequest),
    ClusterCheckResponse(ClusterCheckResponse),
    ConnectedClients(ConnectedClients),
    /// Any other JSON frame, untouched.
    #[serde(skip)]
    Other(Value),
}

impl Message {
    /// The handshake frame carrying the session token.
    pub fn auth(token: impl Into<String>) -> Self {
        Message::Auth(Auth {
            token: token.into(),
        })
    }

    /// Wire discriminator, as written in the `type` field.
    pub fn kind(&self) -> &str {
        match self {
            Message::Auth(_) => AUTH_TYPE,
            Message::FileOperation(_) => FILE_OPERATION_TYPE,
            Message::WhiteboardUpdate(_) => WHITEBOARD_UPDATE_TYPE,
            Message::StatusUpdate(_) => STATUS_UPDATE_TYPE,
            Message::CodeGenRequest(_) => CODE_GEN_REQUEST_TYPE,
            Message::CodeGenResponse(_) => CODE_GEN_RESPONSE_TYPE,
            Message::ClusterCheckRequest(_) => CLUSTER_CHECK_REQUEST_TYPE,
            Message::ClusterCheckResponse(_) => CLUSTER_CHECK_RESPONSE_TYPE,
            Message::ConnectedClients(_) => CONNECTED_CLIENTS_TYPE,
            Message::Other(value) => value
                .get("type")
                .and_then(Value::as_str)
                .unwrap_or(UNKNOWN_TYPE),
        }
    }

    /// Serialize into the JSON text of one frame.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Serialization`] if a payload holds a value JSON
    /// cannot represent.
    #[track_caller]
    pub fn to_frame(&self) -> Result<String, ModelError> {
        let encoded = match self {
            Message::Other(value) => serde_json::to_string(value),
            typed => serde_json::to_string(typed),
        };
        encoded.map_err(|e| ModelError::Serialization {
            message: format!("Failed to encode {} frame: {e}", self.kind()),
            location: ErrorLocation::from(Location::caller()),
        })
    }

    /// Parse the JSON text of one inbound frame.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Parse`] only when `frame` is not JSON. Valid JSON
    /// with an unknown `type` or an unexpected payload becomes [`Message::Other`].
    #[track_caller]
    pub fn from_frame(frame: &str) -> Result<Self, ModelError> {
        if let Ok(message) = serde_json::from_str::<Message>(frame) {
            return Ok(message);
        }
        serde_json::from_str::<Value>(frame)
            .map(Message::Other)
            .map_err(|e| ModelError::Parse {
                message: format!("Invalid frame: {e}"),
                location: ErrorLocation::from(Location::caller()),
            })
    }
}

/// Session handshake; always the first frame written on a socket.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct Auth {
    pub token: String,
}

impl fmt::Debug for Auth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Auth").field("token", &"[REDACTED]").finish()
    }
}

impl From<FileOperation> for Message {
    fn from(payload: FileOperation) -> Self {
        Message::FileOperation(payload)
    }
}

impl From<WhiteboardUpdate> for Message {
    fn from(payload: WhiteboardUpdate) -> Self {
        Message::WhiteboardUpdate(payload)
    }
}

impl From<StatusUpdate> for Message {
    fn from(payload: StatusUpdate) -> Self {
        Message::StatusUpdate(payload)
    }
}

impl From<CodeGenRequest> for Message {
    fn from(payload: CodeGenRequest) -> Self {
        Message::CodeGenRequest(payload)
    }
}

impl From<CodeGenResponse> for Message {
    fn from(payload: CodeGenResponse) -> Self {
        Message::CodeGenResponse(payload)
    }
}

impl From<ClusterCheckRequest> for Message {
    fn from(payload: ClusterCheckRequest) -> Self {
        Message::ClusterCheckRequest(payload)
    }
}

impl From<ClusterCheckResponse> for Message {
    fn from(payload: ClusterCheckResponse) -> Self {
        Message::ClusterCheckResponse(payload)
    }
}

impl From<ConnectedClients> for Message {
    fn from(payload: ConnectedClients) -> Self {
        Message::ConnectedClients(payload)
    }
}
