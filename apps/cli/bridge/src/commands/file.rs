use crate::cli::{Credentials, FileCommand};
use crate::commands::{Context, establish, log_lifecycle, print_messages, wait_for_shutdown};
use crate::error::BridgeError;

use client_core::EditorClient;

use std::time::Duration;

/// Route a parsed file command to the matching editor operation.
pub fn dispatch(client: &EditorClient, operation: &FileCommand) {
    match operation {
        FileCommand::List { path } => client.list_files(path.as_deref()),
        FileCommand::Read { path } => client.read_file(path),
        FileCommand::Create { path, content } => client.create_file(path, content),
        FileCommand::Update { path, content } => client.update_file(path, content),
        FileCommand::Delete { path } => client.delete_file(path),
        FileCommand::Search { query } => client.search_files(query),
    }
}

pub async fn run(
    context: &Context,
    operation: &FileCommand,
    wait_secs: Option<u64>,
    credentials: &Credentials,
) -> Result<(), BridgeError> {
    let client: EditorClient = context.client()?;
    log_lifecycle(&client);
    print_messages(&client);

    // Queued until the socket has authenticated.
    dispatch(&client, operation);
    establish(&client, credentials).await?;

    wait_for_shutdown(wait_secs.map(Duration::from_secs)).await?;
    client.disconnect();
    Ok(())
}
