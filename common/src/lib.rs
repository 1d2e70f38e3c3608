//! Cross-cutting primitives shared by every crate in the bridge workspace.
//!
//! ## Architecture
//!
//! - **common** (this crate): error location tracking, HTTP status helpers, secret handling
//! - **models**: wire protocol data structures
//! - **client-core**: session, connection and publishing logic
//! - **bridge**: command-line host wiring everything together

pub mod error;
pub mod http_status;
pub mod redacted_secret;

pub use error::error_location::ErrorLocation;
pub use error::secret_error::SecretError;
pub use http_status::HttpStatusCode;
pub use redacted_secret::RedactedSecret;

#[cfg(test)]
mod tests;
