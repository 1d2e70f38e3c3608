use crate::cli::{Credentials, RoleArg};
use crate::commands::{Context, establish, log_lifecycle, print_messages, wait_for_shutdown};
use crate::error::BridgeError;

use client_core::connection::{Canvas, Editor, Role};
use client_core::Client;

use log::info;

pub async fn run(
    context: &Context,
    role: RoleArg,
    credentials: &Credentials,
) -> Result<(), BridgeError> {
    match role {
        RoleArg::Editor => listen(context.client::<Editor>()?, credentials).await,
        RoleArg::Canvas => listen(context.client::<Canvas>()?, credentials).await,
    }
}

async fn listen<R: Role>(client: Client<R>, credentials: &Credentials) -> Result<(), BridgeError> {
    log_lifecycle(&client);
    print_messages(&client);
    establish(&client, credentials).await?;

    info!("Listening on {}; Ctrl-C to stop", client.socket_url());
    wait_for_shutdown(None).await?;

    client.disconnect();
    Ok(())
}
