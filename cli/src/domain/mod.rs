//! Domain layer — pure provisioning logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::application`,
//! `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod artifacts;
pub mod config;
pub mod error;
pub mod plan;
pub mod preflight;
pub mod retry;
pub mod secret;
pub mod template;
pub mod verify;

pub use config::ProvisionConfig;
pub use error::{
    ArtifactError, DownloadError, ServiceTimeout, StepError, ValidationError, VerificationError,
};
pub use plan::{PlanOptions, Step, StepKind, orchestration_table};
pub use preflight::{DiskStage, HostInfo};
pub use retry::RetryPolicy;
