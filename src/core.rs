//! # Core Module / 核心模块
//!
//! This module contains the core functionality of the build matrix:
//! the configuration, the outcome models and the three-phase runner.

pub mod config;
pub mod models;
pub mod runner;

// Re-exports
pub use config::{BuildMatrix, BuildSpec};
pub use models::{Outcome, SpecOutcomes};
pub use runner::MatrixRunner;
