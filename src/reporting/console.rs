//! # Console Reporting Module / 控制台报告模块
//!
//! Formats what the runner prints. Status lines look like
//!
//! ```text
//! clang/x86_64/-O0 OK
//! gcc/i386/-O2,-g FAIL
//! ```
//!
//! with the descriptor in amber, `OK` in bold green and `FAIL` in bold red.

use colored::*;

use crate::core::config::BuildSpec;
use crate::core::models::{SpecOutcomes, Tone};
use crate::infra::t;

/// Styles `text` for the console according to `tone`.
pub fn colorize(text: &str, tone: Tone) -> ColoredString {
    match tone {
        Tone::Ok => text.green().bold(),
        Tone::Fail => text.red().bold(),
        Tone::Neutral => text.yellow(),
    }
}

/// The line printed for a specification whose artifact was run.
pub fn status_line(spec: &BuildSpec, success: bool) -> String {
    let status = if success {
        colorize("OK", Tone::Ok)
    } else {
        colorize("FAIL", Tone::Fail)
    };
    format!("{} {}", colorize(&spec.descriptor(), Tone::Neutral), status)
}

/// The message printed when a specification fails to compile.
pub fn build_failure_line(spec: &BuildSpec) -> String {
    colorize(
        &t!("run.build_failed", id = spec.output_id()),
        Tone::Fail,
    )
    .to_string()
}

/// One-line verdict printed after cleanup.
pub fn summary_line(outcomes: &SpecOutcomes) -> String {
    let total = outcomes.len();
    let failed = outcomes.failed_count();
    if failed == 0 {
        colorize(&t!("run.all_passed", total = total), Tone::Ok).to_string()
    } else {
        colorize(
            &t!("run.some_failed", failed = failed, total = total),
            Tone::Fail,
        )
        .to_string()
    }
}
