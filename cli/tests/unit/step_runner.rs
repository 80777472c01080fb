//! Step runner ordering and fatal/non-fatal semantics.

#![allow(clippy::expect_used)]

use anyhow::Result;
use kiosk_setup::application::{StepExecutor, run_steps};
use kiosk_setup::domain::{
    PlanOptions, Step, StepKind, ValidationError, orchestration_table,
};

use crate::mocks::RecordingReporter;

/// Executes nothing; fails the listed kinds.
struct Scripted {
    failing: Vec<StepKind>,
    executed: Vec<StepKind>,
}

impl Scripted {
    fn new(failing: Vec<StepKind>) -> Self {
        Self {
            failing,
            executed: Vec::new(),
        }
    }
}

impl StepExecutor for Scripted {
    async fn execute(&mut self, kind: StepKind) -> Result<()> {
        self.executed.push(kind);
        if !self.failing.contains(&kind) {
            return Ok(());
        }
        match kind {
            StepKind::Preflight => Err(ValidationError::InsufficientDiskSpace {
                available_gb: 2,
                required_gb: 10,
            }
            .into()),
            _ => anyhow::bail!("OPENAI_API_KEY rejected (HTTP 401)"),
        }
    }
}

fn full_table() -> Vec<Step> {
    orchestration_table(PlanOptions {
        kiosk: true,
        validate_keys: true,
    })
}

#[tokio::test]
async fn all_steps_run_in_table_order() {
    let steps = full_table();
    let mut exec = Scripted::new(vec![]);
    let reporter = RecordingReporter::default();

    let report = run_steps(&steps, &mut exec, &reporter).await.expect("ok");

    let expected: Vec<_> = steps.iter().map(|s| s.kind).collect();
    assert_eq!(exec.executed, expected);
    assert_eq!(report.completed.len(), steps.len());
    assert!(report.warnings.is_empty());
}

#[tokio::test]
async fn fatal_failure_aborts_with_typed_cause_and_runs_nothing_after() {
    let steps = full_table();
    let mut exec = Scripted::new(vec![StepKind::Preflight]);
    let reporter = RecordingReporter::default();

    let err = run_steps(&steps, &mut exec, &reporter)
        .await
        .expect_err("must abort");

    assert_eq!(err.step(), "preflight checks");
    assert_eq!(
        err.cause().downcast_ref::<ValidationError>(),
        Some(&ValidationError::InsufficientDiskSpace {
            available_gb: 2,
            required_gb: 10
        })
    );
    assert_eq!(exec.executed, vec![StepKind::Preflight]);
    assert!(err.to_string().contains("Insufficient disk space"));
}

#[tokio::test]
async fn non_fatal_failure_warns_and_run_completes() {
    let steps = full_table();
    let mut exec = Scripted::new(vec![StepKind::ValidateApiKeys]);
    let reporter = RecordingReporter::default();

    let report = run_steps(&steps, &mut exec, &reporter)
        .await
        .expect("non-fatal failure must not abort");

    assert_eq!(report.completed.len(), steps.len() - 1);
    assert_eq!(report.warnings.len(), 1);
    assert_eq!(report.warnings[0].0, "API key validation");
    assert!(
        reporter
            .warnings()
            .iter()
            .any(|w| w.contains("HTTP 401"))
    );
}

#[tokio::test]
async fn non_fatal_failure_in_the_middle_does_not_stop_later_steps() {
    let steps = [
        Step::fatal("one", StepKind::Preflight),
        Step::non_fatal("two", StepKind::ValidateApiKeys),
        Step::fatal("three", StepKind::Verify),
    ];
    let mut exec = Scripted::new(vec![StepKind::ValidateApiKeys]);

    let report = run_steps(&steps, &mut exec, &RecordingReporter::default())
        .await
        .expect("ok");

    assert_eq!(report.completed, vec!["one", "three"]);
    assert_eq!(
        exec.executed,
        vec![StepKind::Preflight, StepKind::ValidateApiKeys, StepKind::Verify]
    );
}
