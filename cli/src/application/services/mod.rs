//! Application services — use-case orchestration.
//!
//! Each service module implements a single provisioning stage by composing
//! domain logic with port trait calls. Services import only from
//! `crate::domain` and `crate::application::ports` — never from
//! `crate::infra` or `crate::output`.

pub mod api_keys;
pub mod artifacts;
pub mod deploy;
pub mod engine;
pub mod kiosk;
pub mod preflight;
pub mod provision;
pub mod retry;
pub mod secrets;
pub mod step_runner;
pub mod verify;
