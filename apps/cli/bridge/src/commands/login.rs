use crate::cli::Credentials;
use crate::commands::Context;
use crate::error::BridgeError;

use client_core::EditorClient;

use log::info;

/// Exchange credentials and print the token as shell assignments.
pub async fn run(context: &Context, credentials: &Credentials) -> Result<(), BridgeError> {
    let (Some(username), Some(password)) = (&credentials.username, &credentials.password) else {
        return Err(BridgeError::bridge("login needs --username and --password"));
    };

    let client: EditorClient = context.client()?;
    let token = client.authenticate(username, password).await?;
    info!("Logged in as {username}");

    println!("BRIDGE_SESSION_TOKEN={}", token.expose());
    if let Some(expires_at) = token.expires_at() {
        println!("BRIDGE_SESSION_EXPIRES_AT={expires_at}");
    }
    Ok(())
}
