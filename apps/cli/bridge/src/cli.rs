use common::RedactedSecret;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(
    name = "bridge",
    about = "Connect an editor or canvas to the code-generation worker"
)]
pub struct Cli {
    /// Websocket base address; overrides `server.base_url` from the config file.
    #[arg(long, env = "BRIDGE_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// Directory holding bridge.toml. Defaults to the per-user config directory.
    #[arg(long, env = "BRIDGE_CONFIG_DIR", global = true)]
    pub config_dir: Option<PathBuf>,

    /// Also write logs to `{log_dir}/bridge.log`.
    #[arg(long, env = "BRIDGE_LOG_DIR", global = true)]
    pub log_dir: Option<PathBuf>,

    /// Log at debug level (twice for trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug, Clone, Default)]
pub struct Credentials {
    #[arg(long, env = "BRIDGE_USERNAME")]
    pub username: Option<String>,

    #[arg(long, env = "BRIDGE_PASSWORD", hide_env_values = true)]
    pub password: Option<RedactedSecret>,

    /// Use an existing session token instead of logging in.
    #[arg(long, env = "BRIDGE_SESSION_TOKEN", hide_env_values = true)]
    pub session_token: Option<RedactedSecret>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleArg {
    Editor,
    Canvas,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Exchange username and password for a session token and print it.
    Login {
        #[command(flatten)]
        credentials: Credentials,
    },

    /// Connect as a role and print every inbound message as one JSON line.
    Listen {
        #[arg(long, value_enum, default_value = "editor")]
        role: RoleArg,

        #[command(flatten)]
        credentials: Credentials,
    },

    /// Send one file operation as the editor and print responses.
    File {
        #[command(subcommand)]
        operation: FileCommand,

        /// Stop after this many seconds instead of waiting for Ctrl-C.
        #[arg(long)]
        wait_secs: Option<u64>,

        #[command(flatten)]
        credentials: Credentials,
    },

    /// Publish a canvas from a JSON file whenever its elements change.
    Watch {
        /// JSON array of whiteboard elements.
        #[arg(long)]
        file: PathBuf,

        #[arg(long)]
        component_id: String,

        /// File containing a base64 screenshot sent with each update.
        #[arg(long)]
        screenshot: Option<PathBuf>,

        /// Poll interval; defaults to `monitor.interval_ms` from the config file.
        #[arg(long)]
        interval_ms: Option<u64>,

        #[command(flatten)]
        credentials: Credentials,
    },

    /// Manage bridge.toml.
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum FileCommand {
    List { path: Option<String> },
    Read { path: String },
    Create { path: String, content: String },
    Update { path: String, content: String },
    Delete { path: String },
    Search { query: String },
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigCommand {
    /// Write a default bridge.toml if none exists.
    Init,
    /// Print the effective configuration and where it came from.
    Show,
}
