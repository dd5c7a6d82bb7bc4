//! # Commands Module
//!
//! The subcommands exposed by the CLI.

pub mod init;
pub mod run;
