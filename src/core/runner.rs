//! # Matrix Runner Module / 矩阵运行器模块
//!
//! Drives a build matrix through its three strictly sequential phases:
//!
//! 1. **Build** - compile the source once per specification.
//! 2. **Execute** - run every artifact that built and print a status line.
//! 3. **Cleanup** - remove the build directory and settle the exit status.
//!
//! Build and execution failures are recorded as data in [`SpecOutcomes`];
//! only environmental problems (the build directory cannot be created, the
//! console cannot be written) surface as errors.
//!
//! 按顺序执行构建、执行、清理三个阶段。构建与执行失败作为数据记录在
//! [`SpecOutcomes`] 中，只有环境问题才会作为错误返回。

use anyhow::Result;
use std::io::Write;

use crate::{
    core::{
        config::{BuildMatrix, BuildSpec},
        models::{SpecOutcomes, Tone},
    },
    infra::{
        command::{Invocation, ProcessRunner, ProcessStatus},
        fs, t,
    },
    reporting::console::{build_failure_line, colorize, status_line, summary_line},
};

pub struct MatrixRunner<'a, P, W> {
    matrix: &'a BuildMatrix,
    processes: P,
    out: W,
}

impl<'a, P, W> MatrixRunner<'a, P, W>
where
    P: ProcessRunner,
    W: Write,
{
    pub fn new(matrix: &'a BuildMatrix, processes: P, out: W) -> Self {
        Self {
            matrix,
            processes,
            out,
        }
    }

    /// Gives back the output sink, e.g. to inspect what a test run printed.
    pub fn into_output(self) -> W {
        self.out
    }

    /// Runs build, execute and cleanup in order and returns the exit status.
    pub async fn run(&mut self) -> Result<u8> {
        let mut outcomes = self.build().await?;
        self.execute(&mut outcomes).await?;
        self.cleanup(&outcomes)
    }

    /// The compiler command line for `spec`:
    /// `<compiler> <arch_flag> <arch> <shared flags> <flags> -o <artifact> <source>`.
    pub fn compile_invocation(&self, spec: &BuildSpec) -> Result<Invocation> {
        let artifact = self.matrix.artifact_path(spec);
        Ok(Invocation::new(spec.compiler.as_str())
            .arg(self.matrix.arch_flag.as_str())
            .arg(spec.arch.as_str())
            .args(self.matrix.shared_flag_args()?)
            .args(spec.flag_args()?)
            .arg("-o")
            .arg(artifact.to_string_lossy())
            .arg(self.matrix.source.to_string_lossy()))
    }

    /// Compiles every specification, whatever happened to the previous ones.
    pub async fn build(&mut self) -> Result<SpecOutcomes> {
        let matrix = self.matrix;
        fs::ensure_dir(&matrix.build_dir)?;

        let mut outcomes = SpecOutcomes::new(matrix.specs.len());
        for (index, spec) in matrix.specs.iter().enumerate() {
            let invocation = self.compile_invocation(spec)?;
            let result = self.processes.run(&invocation).await;
            let success = matches!(&result, Ok(status) if status.success());
            outcomes.record_build(index, success);

            if !success {
                writeln!(self.out, "{}", build_failure_line(spec))?;
                self.report_process_problem(&invocation, &result)?;
            }
        }
        Ok(outcomes)
    }

    /// Runs each artifact that built. Specifications that failed to build are
    /// skipped without a status line.
    pub async fn execute(&mut self, outcomes: &mut SpecOutcomes) -> Result<()> {
        let matrix = self.matrix;
        for (index, spec) in matrix.specs.iter().enumerate() {
            if outcomes.get(index).is_failed() {
                continue;
            }

            let artifact = matrix.artifact_path(spec);
            let invocation = Invocation::new(artifact.to_string_lossy());
            let result = self.processes.run(&invocation).await;
            let success = matches!(&result, Ok(status) if status.success());
            outcomes.record_execute(index, success);

            match &result {
                Ok(status) if !status.timed_out => {
                    let relayed = status.output.trim_end();
                    if !relayed.is_empty() {
                        writeln!(self.out, "{}", relayed)?;
                    }
                }
                _ => self.report_process_problem(&invocation, &result)?,
            }
            writeln!(self.out, "{}", status_line(spec, outcomes.get(index).is_succeeded()))?;
        }
        Ok(())
    }

    /// Removes the build directory and returns the exit status: 0 if every
    /// specification succeeded, 1 otherwise. A directory that cannot be
    /// removed also yields 1.
    pub fn cleanup(&mut self, outcomes: &SpecOutcomes) -> Result<u8> {
        let matrix = self.matrix;
        let build_dir = &matrix.build_dir;
        let removed = match fs::remove_dir_if_exists(build_dir) {
            Ok(()) => true,
            Err(e) => {
                writeln!(
                    self.out,
                    "{}",
                    colorize(
                        &t!("run.cleanup_failed", path = build_dir.display(), error = e),
                        Tone::Fail
                    )
                )?;
                false
            }
        };

        // A run whose build directory survived has not passed, whatever the outcomes say.
        if outcomes.is_empty() {
            writeln!(self.out, "{}", t!("run.no_specs"))?;
        } else if removed || !outcomes.all_succeeded() {
            writeln!(self.out, "{}", summary_line(outcomes))?;
        }

        Ok(if removed { outcomes.exit_status() } else { 1 })
    }

    fn report_process_problem(
        &mut self,
        invocation: &Invocation,
        result: &std::io::Result<ProcessStatus>,
    ) -> Result<()> {
        match result {
            Err(e) => {
                writeln!(
                    self.out,
                    "{}",
                    t!("run.spawn_failed", program = &invocation.program, error = e)
                )?;
            }
            Ok(status) if status.timed_out => {
                let secs = self.matrix.timeout_secs.unwrap_or_default();
                writeln!(
                    self.out,
                    "{}",
                    t!("run.timeout", program = &invocation.program, secs = secs)
                )?;
            }
            Ok(status) => {
                let output = status.output.trim_end();
                if !output.is_empty() {
                    writeln!(self.out, "{}", output)?;
                }
            }
        }
        Ok(())
    }
}
