use crate::ErrorLocation;

use thiserror::Error as ThisError;

/// Raised when something tries to put a [`RedactedSecret`](crate::RedactedSecret)
/// through a serializer.
#[derive(Debug, ThisError)]
pub enum SecretError {
    #[error("Secret Error: refusing to serialize a redacted {length}-byte secret, call expose() {location}")]
    SerializationRefused {
        length: usize,
        location: ErrorLocation,
    },
}
