//! Wire protocol models for the bridge.
//!
//! This crate contains pure data structures: the closed set of JSON messages
//! exchanged with the worker over the websocket, the canvas element shape, and
//! the credential endpoint's response body. Models carry no connection logic;
//! `client-core` owns everything that moves them around.
//!
//! Every frame is one JSON object with a `type` discriminator:
//!
//! ```
//! use models::{Message, StatusUpdate, ComponentStatus};
//!
//! let message = Message::from(StatusUpdate::new("button-1", ComponentStatus::Ready));
//! let frame = message.to_frame().unwrap();
//! assert!(frame.starts_with(r#"{"type":"statusUpdate""#));
//! ```

pub mod element;
pub mod error;
pub mod message;
pub mod session;

pub use element::WhiteboardElement;
pub use element::builder::WhiteboardElementBuilder;
pub use error::ModelError;
pub use message::Message;
pub use message::clients::{ClientRole, ConnectedClients};
pub use message::cluster::{ClusterCheckRequest, ClusterCheckResponse};
pub use message::codegen::{CodeGenContext, CodeGenRequest, CodeGenResponse};
pub use message::file_operation::{FileOperation, FileOperationKind};
pub use message::status::{ComponentStatus, StatusUpdate};
pub use message::whiteboard::WhiteboardUpdate;
pub use message::Auth;
pub use session::SessionGrant;

#[cfg(test)]
mod tests;
