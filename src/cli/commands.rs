//! Command handlers

use std::io;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use tracing::{debug, instrument};

use crate::application::{ApplicationError, IoResultExt, PlanTreeConvert};
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_dir, global_config_path, local_config_path, Settings};
use crate::domain::{schema, DomainError, ElementKind};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::traits::{FileSystem, RealFileSystem};
use crate::util::path::default_output_path;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let project_dir = resolve_project_dir(cli.project_dir.as_deref())?;

    match &cli.command {
        Some(Commands::Build { plan, output }) => {
            cmd_build(&container(&project_dir)?, plan, output.as_deref())
        }
        Some(Commands::Check { plan }) => cmd_check(&container(&project_dir)?, plan),
        Some(Commands::Print { plan }) => cmd_print(&container(&project_dir)?, plan),
        Some(Commands::Tree { plan }) => cmd_tree(&container(&project_dir)?, plan),
        Some(Commands::Schema { kind }) => cmd_schema(kind.as_deref()),
        Some(Commands::Config { command }) => cmd_config(command, &project_dir),
        Some(Commands::Completion { shell }) => {
            cmd_completion(*shell);
            Ok(())
        }
        None => {
            Cli::command()
                .print_help()
                .map_err(|e| CliError::Usage(e.to_string()))?;
            Ok(())
        }
    }
}

fn resolve_project_dir(dir: Option<&Path>) -> CliResult<PathBuf> {
    match dir {
        Some(d) if !d.is_dir() => Err(CliError::InvalidArgs(format!(
            "project directory does not exist: {}",
            d.display()
        ))),
        Some(d) => Ok(d.to_path_buf()),
        None => std::env::current_dir().map_err(|e| {
            CliError::Application(ApplicationError::InputFailure {
                context: "current directory".to_string(),
                source: e,
            })
        }),
    }
}

fn container(project_dir: &Path) -> CliResult<ServiceContainer> {
    let settings = Settings::load(Some(project_dir))?;
    debug!("settings: {:?}", settings);
    Ok(ServiceContainer::new(settings))
}

// ============================================================
// Plan commands
// ============================================================

#[instrument(skip(container))]
fn cmd_build(container: &ServiceContainer, plan: &Path, target: Option<&Path>) -> CliResult<()> {
    let target = match target {
        Some(path) => path.to_path_buf(),
        None => default_output_path(plan, container.settings.output_dir.as_deref()),
    };

    let built = container.plans.build_file(plan, &target)?;
    output::action(
        "Built",
        &output::plan_summary(
            &target.display(),
            built.thread_group_count(),
            built.element_count(),
        ),
    );
    Ok(())
}

#[instrument(skip(container))]
fn cmd_check(container: &ServiceContainer, plan: &Path) -> CliResult<()> {
    let root = container.plans.load(plan)?;
    let built = container.plans.build(root)?;
    output::success(&output::plan_summary(
        &plan.display(),
        built.thread_group_count(),
        built.element_count(),
    ));
    Ok(())
}

#[instrument(skip(container))]
fn cmd_print(container: &ServiceContainer, plan: &Path) -> CliResult<()> {
    let root = container.plans.load(plan)?;
    let built = container.plans.build(root)?;
    output::document(&container.plans.render(&built));
    Ok(())
}

#[instrument(skip(container))]
fn cmd_tree(container: &ServiceContainer, plan: &Path) -> CliResult<()> {
    let root = container.plans.load(plan)?;
    let built = container.plans.build(root)?;
    output::info(&built.to_tree_string());
    Ok(())
}

#[instrument]
fn cmd_schema(kind: Option<&str>) -> CliResult<()> {
    let Some(id) = kind else {
        output::header("Element kinds:");
        for kind in ElementKind::ALL {
            output::detail(&format!("{:<18} {}", kind.id(), kind.display_name()));
        }
        return Ok(());
    };

    let kind: ElementKind = id
        .parse()
        .map_err(|e: DomainError| CliError::InvalidArgs(e.to_string()))?;

    output::header(&format!("{} [{}]", kind.display_name(), kind.id()));
    for spec in schema::specs(kind) {
        let presence = if spec.required {
            "required".to_string()
        } else {
            format!("default: {}", spec.default)
        };
        output::detail(&format!(
            "{:<22} {:<5} {:<24} {}",
            spec.name,
            spec.ty.name(),
            presence,
            spec.help
        ));
    }
    Ok(())
}

// ============================================================
// Config commands
// ============================================================

fn cmd_config(cmd: &ConfigCommands, project_dir: &Path) -> CliResult<()> {
    match cmd {
        ConfigCommands::Show => {
            let settings = Settings::load(Some(project_dir))?;
            output::info(&settings.to_toml()?);
            Ok(())
        }
        ConfigCommands::Init { global, force } => cmd_config_init(*global, *force, project_dir),
        ConfigCommands::Path => {
            output::header("Config paths:");
            match global_config_path() {
                Some(path) => output::detail(&format!(
                    "Global: {} {}",
                    path.display(),
                    exists_marker(&path)
                )),
                None => output::detail("Global: (no config directory on this platform)"),
            }
            let local = local_config_path(project_dir);
            output::detail(&format!(
                "Local:  {} {}",
                local.display(),
                exists_marker(&local)
            ));
            Ok(())
        }
    }
}

fn exists_marker(path: &Path) -> &'static str {
    if path.exists() {
        "(exists)"
    } else {
        "(not found)"
    }
}

#[instrument]
fn cmd_config_init(global: bool, force: bool, project_dir: &Path) -> CliResult<()> {
    let path = if global {
        let dir = global_config_dir().ok_or_else(|| {
            CliError::Usage("cannot determine global config directory".to_string())
        })?;
        dir.join("jmxplan.toml")
    } else {
        local_config_path(project_dir)
    };

    let fs = RealFileSystem;
    if fs.exists(&path) && !force {
        return Err(CliError::Usage(format!(
            "config already exists: {} (use --force to overwrite)",
            path.display()
        )));
    }

    write_config(&fs, &path)?;
    output::action("Created", &path.display());
    Ok(())
}

fn write_config(fs: &dyn FileSystem, path: &Path) -> CliResult<()> {
    fs.ensure_parent(path)
        .with_path_context("config directory of", path)?;
    fs.write_atomic(path, &Settings::template())
        .with_path_context("config file", path)?;
    Ok(())
}

// ============================================================
// Completion
// ============================================================

fn cmd_completion(shell: clap_complete::Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, name, &mut io::stdout());
}
