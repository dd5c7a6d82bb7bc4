//! # Data Models Module / 数据模型模块
//!
//! Outcome tracking for a matrix run. Specifications themselves are never
//! mutated; each run keeps a separate `SpecOutcomes` table indexed by the
//! specification's position in the matrix.

use std::process::ExitCode;

/// The state of a single specification within one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Outcome {
    /// Not built yet.
    #[default]
    Pending,
    Succeeded,
    Failed,
}

impl Outcome {
    pub fn is_failed(self) -> bool {
        self == Outcome::Failed
    }

    pub fn is_succeeded(self) -> bool {
        self == Outcome::Succeeded
    }
}

/// How a piece of console text should be styled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Ok,
    Fail,
    Neutral,
}

/// Per-run outcome table, one slot per specification.
///
/// A slot moves from `Pending` once after the build phase and at most once
/// more after the execute phase. The execute phase can only turn a success
/// into a failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecOutcomes {
    outcomes: Vec<Outcome>,
}

impl SpecOutcomes {
    pub fn new(len: usize) -> Self {
        Self {
            outcomes: vec![Outcome::Pending; len],
        }
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn get(&self, index: usize) -> Outcome {
        self.outcomes.get(index).copied().unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = Outcome> + '_ {
        self.outcomes.iter().copied()
    }

    /// Records the result of compiling specification `index`.
    pub fn record_build(&mut self, index: usize, success: bool) {
        if let Some(slot) = self.outcomes.get_mut(index) {
            if *slot == Outcome::Pending {
                *slot = if success {
                    Outcome::Succeeded
                } else {
                    Outcome::Failed
                };
            }
        }
    }

    /// Records the result of running specification `index`'s artifact.
    /// A failed run downgrades the slot; a successful one leaves it alone.
    pub fn record_execute(&mut self, index: usize, success: bool) {
        if let Some(slot) = self.outcomes.get_mut(index) {
            if !success {
                *slot = Outcome::Failed;
            }
        }
    }

    /// Number of specifications that did not end up succeeded.
    /// Anything still pending counts as a failure.
    pub fn failed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.is_succeeded()).count()
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed_count() == 0
    }

    /// 0 when every specification succeeded, 1 otherwise.
    pub fn exit_status(&self) -> u8 {
        if self.all_succeeded() { 0 } else { 1 }
    }

    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.exit_status())
    }
}
