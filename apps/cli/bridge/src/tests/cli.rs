use crate::cli::{Cli, Command, ConfigCommand, FileCommand, RoleArg};

use clap::Parser;

/// **VALUE**: Listen defaults to the editor role.
///
/// **BUG THIS CATCHES**: A default that silently attaches to the canvas socket.
#[test]
fn given_listen_without_role_when_parsed_then_defaults_to_editor() {
    // GIVEN / WHEN
    let cli = Cli::try_parse_from(["bridge", "listen", "--session-token", "tok"]).unwrap();

    // THEN
    match cli.command {
        Command::Listen { role, credentials } => {
            assert_eq!(role, RoleArg::Editor);
            assert_eq!(
                credentials.session_token.as_ref().map(|t| t.expose()),
                Some("tok")
            );
        }
        other => panic!("Expected listen, got {other:?}"),
    }
}

#[test]
fn given_file_create_when_parsed_then_carries_path_and_content() {
    let cli = Cli::try_parse_from([
        "bridge",
        "file",
        "--wait-secs",
        "3",
        "create",
        "src/App.tsx",
        "export {}",
    ])
    .unwrap();

    match cli.command {
        Command::File {
            operation,
            wait_secs,
            ..
        } => {
            assert_eq!(
                operation,
                FileCommand::Create {
                    path: "src/App.tsx".to_string(),
                    content: "export {}".to_string(),
                }
            );
            assert_eq!(wait_secs, Some(3));
        }
        other => panic!("Expected file, got {other:?}"),
    }
}

/// **BUG THIS CATCHES**: Passwords leaking through `Debug` of parsed arguments, which
/// end up in debug logs.
#[test]
fn given_password_argument_when_debug_formatted_then_password_is_redacted() {
    // GIVEN: A login with a password
    let cli = Cli::try_parse_from([
        "bridge",
        "login",
        "--username",
        "alice",
        "--password",
        "hunter2",
    ])
    .unwrap();

    // WHEN
    let rendered = format!("{cli:?}");

    // THEN
    assert!(rendered.contains("alice"));
    assert!(!rendered.contains("hunter2"));
}

#[test]
fn given_global_flags_after_subcommand_when_parsed_then_accepted() {
    let cli = Cli::try_parse_from([
        "bridge",
        "config",
        "show",
        "--base-url",
        "ws://10.0.0.1:9000",
        "-vv",
    ])
    .unwrap();

    assert_eq!(cli.base_url.as_deref(), Some("ws://10.0.0.1:9000"));
    assert_eq!(cli.verbose, 2);
    assert!(matches!(
        cli.command,
        Command::Config {
            command: ConfigCommand::Show
        }
    ));
}

#[test]
fn given_unknown_role_when_parsed_then_rejected() {
    assert!(Cli::try_parse_from(["bridge", "listen", "--role", "terminal"]).is_err());
}
