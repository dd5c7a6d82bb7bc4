// src/cli.rs
use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::{ffi::OsString, path::PathBuf, process::ExitCode};

use crate::{commands, infra::t};

/// What the user asked for on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliArgs {
    /// `--lang`, if given. Overrides the matrix file's `language`.
    pub language: Option<String>,
    /// `--config`, if given.
    pub config: Option<PathBuf>,
    pub command: CliCommand,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliCommand {
    Run,
    Init { non_interactive: bool, force: bool },
}

/// Pre-parses the command line arguments to find the language setting.
/// This allows i18n to be initialized before the full CLI is built.
/// It looks for a `--lang <VALUE>` or `--lang=<VALUE>` argument.
fn pre_parse_language(args: &[OsString]) -> Option<String> {
    let args: Vec<String> = args
        .iter()
        .map(|a| a.to_string_lossy().into_owned())
        .collect();
    if let Some(pos) = args.iter().position(|arg| arg == "--lang") {
        return args.get(pos + 1).cloned();
    }
    args.iter()
        .find_map(|arg| arg.strip_prefix("--lang=").map(str::to_string))
}

pub fn build_cli() -> Command {
    Command::new("build-matrix")
        .version(env!("CARGO_PKG_VERSION"))
        .about(t!("cli.about").to_string())
        .arg(
            Arg::new("lang")
                .long("lang")
                .help(t!("cli.lang").to_string())
                .value_name("LANGUAGE")
                .global(true)
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .help(t!("cli.config").to_string())
                .value_name("CONFIG")
                .value_parser(clap::value_parser!(PathBuf))
                .global(true)
                .action(ArgAction::Set),
        )
        .subcommand(Command::new("run").about(t!("cli.cmd_run").to_string()))
        .subcommand(
            Command::new("init")
                .about(t!("cli.cmd_init").to_string())
                .arg(
                    Arg::new("non-interactive")
                        .long("non-interactive")
                        .help(t!("cli.non_interactive").to_string())
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("force")
                        .short('f')
                        .long("force")
                        .help(t!("cli.force").to_string())
                        .action(ArgAction::SetTrue),
                ),
        )
}

fn args_from_matches(matches: &ArgMatches) -> CliArgs {
    let command = match matches.subcommand() {
        Some(("init", init_matches)) => CliCommand::Init {
            non_interactive: init_matches.get_flag("non-interactive"),
            force: init_matches.get_flag("force"),
        },
        // `run` is also what happens when no subcommand is given.
        _ => CliCommand::Run,
    };

    // Global args are visible from the subcommand's matches too.
    let scoped = matches.subcommand().map(|(_, m)| m).unwrap_or(matches);
    CliArgs {
        language: scoped.get_one::<String>("lang").cloned(),
        config: scoped.get_one::<PathBuf>("config").cloned(),
        command,
    }
}

/// Parses arguments from any iterator, localizing help text first.
pub fn try_parse_from<I, T>(args: I) -> Result<CliArgs, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
    crate::init_locale(pre_parse_language(&args).as_deref());
    let matches = build_cli().try_get_matches_from(args)?;
    Ok(args_from_matches(&matches))
}

/// Parses the process arguments, exiting with clap's usage message on error.
pub fn parse_args() -> CliArgs {
    try_parse_from(std::env::args_os()).unwrap_or_else(|e| e.exit())
}

/// Dispatches to the selected command.
pub async fn process_command(args: CliArgs) -> Result<ExitCode> {
    match args.command {
        CliCommand::Run => {
            commands::run::execute(args.config.as_deref(), args.language.as_deref()).await
        }
        CliCommand::Init {
            non_interactive,
            force,
        } => {
            commands::init::run_init_wizard(args.config.as_deref(), non_interactive, force)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
