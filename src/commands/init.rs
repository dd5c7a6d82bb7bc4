//! # Init Command Module / 初始化命令模块
//!
//! Creates a `BuildMatrix.toml`, either straight from the built-in matrix
//! (`--non-interactive`) or through a short interactive wizard.

use anyhow::{Context, Result};
use colored::*;
use dialoguer::{Confirm, Input, theme::ColorfulTheme};
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::config::{BuildMatrix, BuildSpec, DEFAULT_CONFIG_FILE};
use crate::infra::t;

const HEADER: &str = "# Build matrix: every [[specs]] entry compiles `source` once and runs the result.\n\n";

/// Runs the `init` command.
///
/// # Arguments
/// * `output` - Where to write the file; `BuildMatrix.toml` when `None`
/// * `non_interactive` - Write the built-in matrix without prompting
/// * `force` - Overwrite an existing file without asking
pub fn run_init_wizard(output: Option<&Path>, non_interactive: bool, force: bool) -> Result<()> {
    let config_path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
    let theme = ColorfulTheme::default();

    if !non_interactive {
        println!("\n{}", t!("init.welcome").cyan().bold());
        println!("{}", t!("init.description"));
    }

    if config_path.exists() && !force {
        if non_interactive {
            println!("{}", t!("init.file_exists", path = config_path.display()).red());
            println!("{}", t!("init.use_force").yellow());
            return Ok(());
        }
        let confirmation = Confirm::with_theme(&theme)
            .with_prompt(t!("init.overwrite_prompt", path = config_path.display()).to_string())
            .default(false)
            .interact()
            .context(t!("init.confirmation_failed").to_string())?;
        if !confirmation {
            println!("{}", t!("init.aborted"));
            return Ok(());
        }
    }

    let matrix = if non_interactive {
        BuildMatrix::default()
    } else {
        prompt_matrix(&theme)?
    };

    write_config(&config_path, &matrix)
}

/// Asks for the source, the shared flags and one or more specifications.
fn prompt_matrix(theme: &ColorfulTheme) -> Result<BuildMatrix> {
    let defaults = BuildMatrix::default();

    let source: String = Input::with_theme(theme)
        .with_prompt(t!("init.source_prompt").to_string())
        .default(defaults.source.to_string_lossy().into_owned())
        .interact_text()?;
    let shared_flags: String = Input::with_theme(theme)
        .with_prompt(t!("init.shared_flags_prompt").to_string())
        .default(defaults.shared_flags.clone())
        .allow_empty(true)
        .interact_text()?;

    let mut specs = Vec::new();
    loop {
        let compiler: String = Input::with_theme(theme)
            .with_prompt(t!("init.compiler_prompt").to_string())
            .default("clang".to_string())
            .interact_text()?;
        let arch: String = Input::with_theme(theme)
            .with_prompt(t!("init.arch_prompt").to_string())
            .default(std::env::consts::ARCH.to_string())
            .interact_text()?;
        let flags: String = Input::with_theme(theme)
            .with_prompt(t!("init.flags_prompt").to_string())
            .allow_empty(true)
            .interact_text()?;
        specs.push(BuildSpec::new(compiler, arch, flags));

        let another = Confirm::with_theme(theme)
            .with_prompt(t!("init.add_another_prompt").to_string())
            .default(false)
            .interact()
            .context(t!("init.confirmation_failed").to_string())?;
        if !another {
            break;
        }
    }

    Ok(BuildMatrix {
        source: PathBuf::from(source),
        shared_flags,
        specs,
        ..defaults
    })
}

/// Validates `matrix` and writes it as TOML to `path`.
pub fn write_config(path: &Path, matrix: &BuildMatrix) -> Result<()> {
    matrix.validate()?;
    let body = toml::to_string_pretty(matrix).context(t!("init.serialize_failed").to_string())?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| t!("init.write_failed", path = path.display()).to_string())?;
    }
    fs::write(path, format!("{HEADER}{body}"))
        .with_context(|| t!("init.write_failed", path = path.display()).to_string())?;

    println!("{}", t!("init.success", path = path.display()).green());
    Ok(())
}
