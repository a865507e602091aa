//! Argument parsing for the orgsel CLI.

use std::path::PathBuf;

use clap::Parser;

use orgsel::cli::args::{Cli, Commands, ConfigCommands};
use orgsel::domain::ToggleEvent;

#[test]
fn given_signed_paths_when_parsing_toggle_then_events_in_order() {
    let cli = Cli::try_parse_from([
        "orgsel",
        "toggle",
        "-s",
        "+Organisation A/Team A/Employee 1",
        "-Organisation A/Team A/Employee 1",
    ])
    .unwrap();

    match cli.command {
        Some(Commands::Toggle {
            file,
            selected_only,
            events,
        }) => {
            assert!(file.is_none());
            assert!(selected_only);
            assert_eq!(
                events,
                vec![
                    ToggleEvent::select("Organisation A/Team A/Employee 1"),
                    ToggleEvent::unselect("Organisation A/Team A/Employee 1"),
                ]
            );
        }
        other => panic!("expected toggle, got {other:?}"),
    }
}

#[test]
fn given_unsigned_event_when_parsing_toggle_then_rejected() {
    let result = Cli::try_parse_from(["orgsel", "toggle", "Organisation A"]);
    assert!(result.is_err());
}

#[test]
fn given_no_events_when_parsing_toggle_then_rejected() {
    let result = Cli::try_parse_from(["orgsel", "toggle", "--file", "org.toml"]);
    assert!(result.is_err());
}

#[test]
fn given_global_flags_when_parsing_then_available_after_subcommand() {
    let cli = Cli::try_parse_from(["orgsel", "show", "-dd", "-C", "/tmp/hr", "-f", "org.toml"])
        .unwrap();

    assert_eq!(cli.debug, 2);
    assert_eq!(cli.config_dir, Some(PathBuf::from("/tmp/hr")));
    assert!(matches!(
        cli.command,
        Some(Commands::Show { file: Some(ref f) }) if f == &PathBuf::from("org.toml")
    ));
}

#[test]
fn given_config_init_global_when_parsing_then_flag_set() {
    let cli = Cli::try_parse_from(["orgsel", "config", "init", "--global"]).unwrap();

    assert!(matches!(
        cli.command,
        Some(Commands::Config {
            command: ConfigCommands::Init { global: true }
        })
    ));
}
