//! # File System Operations Module / 文件系统操作模块
//!
//! Creating the build output directory and tearing it down again.

use anyhow::{Context, Result};
use std::fs;
use std::io;
use std::path::Path;

use crate::infra::t;

/// Creates `path` (and any parents). An existing directory is fine.
pub fn ensure_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path)
        .with_context(|| t!("run.build_dir_failed", path = path.display()).to_string())
}

/// Recursively removes `path`. A path that does not exist is not an error.
pub fn remove_dir_if_exists(path: &Path) -> io::Result<()> {
    match fs::remove_dir_all(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}
