//! Application layer — port trait definitions and use-case orchestration.
//!
//! This module depends only on `crate::domain` — never on `crate::infra`
//! or `crate::output`.

pub mod ports;
pub mod services;

pub use ports::{
    CommandRunner, ExecContext, Fetcher, HostProbe, HttpProbe, LocalFs, ProgressReporter,
    SecretPrompt, TemplateSource,
};
pub use services::provision::{ProvisionSummary, Provisioner};
pub use services::step_runner::{RunReport, StepExecutor, run_steps};
