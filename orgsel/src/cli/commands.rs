//! Command dispatch

use std::io;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use itertools::Itertools;
use tracing::{debug, instrument};

use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::{ItemTree, SelectionSync, ToggleEvent};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;
use crate::tree_traits::TreeNodeConvert;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Show { file }) => {
            let (container, _) = build_container(cli)?;
            _show(&container, file.as_deref())
        }
        Some(Commands::Toggle {
            file,
            selected_only,
            events,
        }) => {
            let (container, _) = build_container(cli)?;
            _toggle(&container, file.as_deref(), events, *selected_only)
        }
        Some(Commands::Config { command }) => {
            let (container, config_dir) = build_container(cli)?;
            match command {
                ConfigCommands::Show => _config_show(&container),
                ConfigCommands::Init { global } => _config_init(&container, &config_dir, *global),
                ConfigCommands::Path => _config_path(&config_dir),
            }
        }
        // needs no settings, so a broken config cannot block it
        Some(Commands::Completion { shell }) => _completion(*shell),
        None => {
            Cli::command()
                .print_help()
                .map_err(|e| InfraError::io("print help", e))?;
            Ok(())
        }
    }
}

fn build_container(cli: &Cli) -> CliResult<(ServiceContainer, PathBuf)> {
    let config_dir = resolve_config_dir(cli.config_dir.as_deref())?;
    let settings = Settings::load(Some(&config_dir))?;
    Ok((ServiceContainer::new(settings), config_dir))
}

fn resolve_config_dir(config_dir: Option<&Path>) -> CliResult<PathBuf> {
    match config_dir {
        Some(dir) => Ok(dir.to_path_buf()),
        None => std::env::current_dir()
            .map_err(|e| InfraError::io("get current directory", e).into()),
    }
}

/// `--file` wins over the configured `tree_file`; neither means demo.
fn load_tree(container: &ServiceContainer, file: Option<&Path>) -> CliResult<ItemTree> {
    let path = file.or(container.settings.tree_file.as_deref());
    Ok(container.tree_service.load_or_demo(path)?)
}

#[instrument(skip(container))]
fn _show(container: &ServiceContainer, file: Option<&Path>) -> CliResult<()> {
    let tree = load_tree(container, file)?;
    debug!("show: {} nodes", tree.len());
    output::info(&tree.to_tree_string(&container.settings.title));
    Ok(())
}

#[instrument(skip(container))]
fn _toggle(
    container: &ServiceContainer,
    file: Option<&Path>,
    events: &[ToggleEvent],
    selected_only: bool,
) -> CliResult<()> {
    let tree = load_tree(container, file)?;
    let mut sync = SelectionSync::new(tree);
    let result = container.tree_service.replay(&mut sync, events)?;
    debug!("toggle: applied {} events", result.applied.len());

    if selected_only {
        if !result.selected.is_empty() {
            output::info(&result.selected.iter().join("\n"));
        }
        return Ok(());
    }

    output::info(&sync.tree().to_tree_string(&container.settings.title));
    output::header(&format!("Selected ({})", result.selected.len()));
    for path in &result.selected {
        output::detail(path);
    }
    Ok(())
}

#[instrument(skip(container))]
fn _config_show(container: &ServiceContainer) -> CliResult<()> {
    output::info(&container.settings.to_toml()?);
    Ok(())
}

#[instrument(skip(container))]
fn _config_init(container: &ServiceContainer, config_dir: &Path, global: bool) -> CliResult<()> {
    let path = if global {
        global_config_path()
            .ok_or_else(|| CliError::Usage("cannot determine global config directory".into()))?
    } else {
        local_config_path(config_dir)
    };

    if container.fs.exists(&path) {
        return Err(CliError::Usage(format!(
            "config already exists: {}",
            path.display()
        )));
    }

    container
        .fs
        .ensure_parent(&path)
        .map_err(|e| InfraError::io(format!("create directory for {}", path.display()), e))?;
    container
        .fs
        .write(&path, &Settings::template())
        .map_err(|e| InfraError::io(format!("write {}", path.display()), e))?;

    output::success(&format!("Created {}", path.display()));
    Ok(())
}

#[instrument]
fn _config_path(config_dir: &Path) -> CliResult<()> {
    let describe = |path: &Path| {
        let marker = if path.exists() { "" } else { " (not found)" };
        format!("{}{}", path.display(), marker)
    };

    match global_config_path() {
        Some(global) => output::action("global", &describe(&global)),
        None => output::action("global", "unavailable"),
    }
    output::action("local", &describe(&local_config_path(config_dir)));
    Ok(())
}

fn _completion(shell: Shell) -> CliResult<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    fn broken_config_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        std::fs::write(local_config_path(dir.path()), "title = [").unwrap();
        dir
    }

    #[test]
    fn given_broken_local_config_when_completion_then_succeeds_without_settings() {
        let dir = broken_config_dir();
        let cli = Cli::try_parse_from([
            "orgsel",
            "-C",
            dir.path().to_str().unwrap(),
            "completion",
            "bash",
        ])
        .unwrap();

        assert!(execute_command(&cli).is_ok());
    }

    #[test]
    fn given_broken_local_config_when_show_then_config_error() {
        let dir = broken_config_dir();
        let cli =
            Cli::try_parse_from(["orgsel", "-C", dir.path().to_str().unwrap(), "show"]).unwrap();

        let err = execute_command(&cli).unwrap_err();

        assert_eq!(err.exit_code(), crate::exitcode::CONFIG);
    }
}
