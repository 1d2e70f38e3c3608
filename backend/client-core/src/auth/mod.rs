//! Username/password exchange for a short-lived session token.

mod token;

pub use token::SessionToken;

use crate::AUTH_ENDPOINT;
use crate::error::auth::AuthError;

use common::{ErrorLocation, HttpStatusCode, RedactedSecret};
use models::SessionGrant;

use std::panic::Location;

use log::{debug, info, warn};
use reqwest::header::CONTENT_TYPE;
use url::Url;

/// Append `suffix` to the path of `base`, keeping any prefix the base carries.
pub(crate) fn join_path(base: &Url, suffix: &str) -> Url {
    let mut url = base.clone();
    let path = format!("{}{}", base.path().trim_end_matches('/'), suffix);
    url.set_path(&path);
    url
}

/// HTTP(S) address of the credential endpoint for a websocket base address.
///
/// `ws` maps to `http` and `wss` to `https`; host, port and path prefix are kept.
#[track_caller]
pub fn credential_url(base_url: &Url) -> Result<Url, AuthError> {
    let scheme = match base_url.scheme() {
        "ws" | "http" => "http",
        "wss" | "https" => "https",
        other => {
            return Err(AuthError::UrlParse {
                message: format!("Unsupported scheme for credential exchange: {other}"),
                location: ErrorLocation::from(Location::caller()),
            });
        }
    };

    let mut url = join_path(base_url, AUTH_ENDPOINT);
    url.set_scheme(scheme).map_err(|()| AuthError::UrlParse {
        message: format!("Cannot rewrite {base_url} to {scheme}"),
        location: ErrorLocation::from(Location::caller()),
    })?;
    Ok(url)
}

/// POST basic credentials to the credential endpoint and decode the grant.
pub async fn exchange_credentials(
    http: &reqwest::Client,
    base_url: &Url,
    username: &str,
    password: &RedactedSecret,
) -> Result<SessionGrant, AuthError> {
    let url = credential_url(base_url)?;
    debug!("Exchanging credentials for {username} at {url}");

    let response = http
        .post(url)
        .basic_auth(username, Some(password.expose()))
        .header(CONTENT_TYPE, "application/json")
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        // The body is best effort; an unreadable one falls back to the reason phrase.
        let body = response.text().await.unwrap_or_default();
        let message = match body.trim() {
            "" => status.canonical_reason().unwrap_or("Unknown").to_string(),
            text => text.to_string(),
        };
        warn!("Credential exchange rejected: {} {message}", status.as_u16());
        return Err(AuthError::AuthenticationFailed {
            status: HttpStatusCode(status.as_u16()),
            message,
            location: ErrorLocation::from(Location::caller()),
        });
    }

    let body = response.text().await?;
    let grant: SessionGrant = serde_json::from_str(&body)?;
    info!("Session granted for {username}, expires at {}", grant.expires_at);
    Ok(grant)
}
