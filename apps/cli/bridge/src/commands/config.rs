use crate::cli::ConfigCommand;
use crate::commands::Context;
use crate::error::BridgeError;

use client_core::ClientConfig;

use log::info;

pub fn run(context: &Context, command: ConfigCommand) -> Result<(), BridgeError> {
    let path = ClientConfig::file_path(&context.config_dir);
    match command {
        ConfigCommand::Init => {
            if path.exists() {
                info!("{} already exists; leaving it untouched", path.display());
            } else {
                ClientConfig::default().save(&context.config_dir)?;
            }
            println!("{}", path.display());
        }
        ConfigCommand::Show => {
            let rendered = toml::to_string_pretty(&context.config)
                .map_err(|e| BridgeError::bridge(format!("Failed to render config: {e}")))?;
            println!("# {}", path.display());
            print!("{rendered}");
        }
    }
    Ok(())
}
