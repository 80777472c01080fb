//! Infrastructure layer — concrete implementations of application port traits.
//!
//! This module contains all I/O-performing code: process execution,
//! filesystem access, host probing, HTTP, terminal prompts and the embedded
//! templates.
//!
//! Imports from `crate::domain` and `crate::application::ports` are allowed.
//! Imports from `crate::output` are forbidden.

pub mod assets;
pub mod command_runner;
pub mod config;
pub mod fs;
pub mod host;
pub mod network;
pub mod prompt;
