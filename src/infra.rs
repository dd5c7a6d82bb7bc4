//! # Infrastructure Module / 基础设施模块
//!
//! Process execution and file system helpers used by the matrix runner.

pub mod command;
pub mod fs;

// Re-export i18n functions for easier access
pub use rust_i18n::t;
