//! # Build Matrix Library / 构建矩阵库
//!
//! This library provides the core functionality for the `build-matrix` tool,
//! a small harness that compiles one source file with every combination of
//! compiler, target architecture and flags in a matrix, runs each resulting
//! binary, and reports which combinations passed.
//!
//! 此库为 `build-matrix` 工具提供核心功能：使用矩阵中每一种编译器、目标架构与编译选项的组合
//! 编译同一个源文件，运行生成的程序，并报告每个组合是否通过。
//!
//! ## Modules / 模块
//!
//! - `core` - Matrix configuration, outcome models and the three-phase runner
//! - `infra` - Process execution and file system helpers
//! - `reporting` - Colored console status lines and the closing summary
//! - `cli` / `commands` - Command-line interface and the `run` / `init` commands

pub mod cli;
pub mod commands;
pub mod core;
pub mod infra;
pub mod reporting;

pub use core::config::{BuildMatrix, BuildSpec};
pub use core::models::{Outcome, SpecOutcomes};
pub use core::runner::MatrixRunner;

rust_i18n::i18n!("locales", fallback = "en");

/// Picks the locale the runner should speak and activates it.
///
/// An explicit `requested` language wins; otherwise the system locale is
/// used. The full locale (e.g. "zh-CN") is tried first, then just the
/// language part (e.g. "en" from "en-US"), finally falling back to "en".
/// Returns the locale that was activated.
pub fn init_locale(requested: Option<&str>) -> String {
    let locale = requested
        .map(str::to_string)
        .or_else(sys_locale::get_locale)
        .unwrap_or_else(|| "en".to_string());
    let available = rust_i18n::available_locales!();

    let lang = if available.contains(&locale.as_str()) {
        locale.as_str()
    } else {
        locale
            .split('-')
            .next()
            .filter(|code| available.contains(code))
            .unwrap_or("en")
    };

    rust_i18n::set_locale(lang);
    lang.to_string()
}
