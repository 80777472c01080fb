//! Application service — ordered step execution.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use anyhow::Result;

use crate::application::ports::ProgressReporter;
use crate::domain::{Step, StepError, StepKind};

/// Performs the work behind one [`StepKind`].
#[allow(async_fn_in_trait)]
pub trait StepExecutor {
    async fn execute(&mut self, kind: StepKind) -> Result<()>;
}

/// What a completed run did.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Names of the steps that succeeded, in order.
    pub completed: Vec<&'static str>,
    /// `(step, message)` for each non-fatal step that failed.
    pub warnings: Vec<(&'static str, String)>,
}

/// Execute `steps` strictly in order.
///
/// A failing fatal step stops the run immediately; no later step starts.
/// A failing non-fatal step is reported as a warning and the run continues.
///
/// # Errors
///
/// Returns [`StepError::Fatal`] carrying the first fatal failure.
pub async fn run_steps(
    steps: &[Step],
    executor: &mut impl StepExecutor,
    reporter: &impl ProgressReporter,
) -> Result<RunReport, StepError> {
    let mut report = RunReport::default();
    let total = steps.len();

    for (index, step) in steps.iter().enumerate() {
        reporter.step(&format!("[{}/{total}] {}...", index + 1, step.name));
        tracing::info!(step = step.name, fatal = step.fatal, "starting step");

        match executor.execute(step.kind).await {
            Ok(()) => {
                reporter.success(step.name);
                report.completed.push(step.name);
            }
            Err(cause) if step.fatal => {
                tracing::error!(step = step.name, error = %format!("{cause:#}"), "fatal step failed");
                return Err(StepError::Fatal {
                    step: step.name,
                    cause,
                });
            }
            Err(cause) => {
                let message = format!("{cause:#}");
                tracing::warn!(step = step.name, error = %message, "non-fatal step failed");
                reporter.warn(&format!("{} skipped: {message}", step.name));
                report.warnings.push((step.name, message));
            }
        }
    }

    Ok(report)
}
