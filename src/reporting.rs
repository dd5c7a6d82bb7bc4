//! # Reporting Module / 报告模块
//!
//! Colored console output: per-specification status lines, build failure
//! messages and the closing summary.

pub mod console;

pub use console::{colorize, status_line};
