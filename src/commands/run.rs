//! # Run Command Module / 运行命令模块
//!
//! Implements the `run` command: resolve the build matrix, then build,
//! execute and clean up every specification in it.
//!
//! 实现 `run` 命令：解析构建矩阵，然后构建、执行并清理其中的每个规格。

use anyhow::Result;
use colored::*;
use std::io;
use std::path::Path;
use std::process::ExitCode;

use crate::{
    core::{config::BuildMatrix, runner::MatrixRunner},
    infra::{command::SystemRunner, t},
};

/// Executes the run command.
///
/// # Arguments
/// * `config` - Explicit matrix file, if one was given on the command line
/// * `language` - Language requested with `--lang`; takes precedence over the matrix file
///
/// # Returns
/// The process exit code: success only if every specification built and ran cleanly.
pub async fn execute(config: Option<&Path>, language: Option<&str>) -> Result<ExitCode> {
    let (matrix, config_path) = BuildMatrix::resolve(config)?;

    if language.is_none() {
        if let Some(configured) = matrix.language.as_deref() {
            crate::init_locale(Some(configured));
        }
    }

    match &config_path {
        Some(path) => println!("{}", t!("config.loaded", path = path.display()).cyan()),
        None => println!("{}", t!("config.using_defaults").cyan()),
    }

    let processes = SystemRunner::new(matrix.timeout());
    let mut runner = MatrixRunner::new(&matrix, processes, io::stdout());
    let status = runner.run().await?;

    Ok(ExitCode::from(status))
}
