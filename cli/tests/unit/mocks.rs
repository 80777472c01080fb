//! Shared port doubles for unit tests.
//!
//! Each double records what it was asked to do so tests can assert on the
//! exact sequence of external effects.

#![allow(dead_code, clippy::expect_used)]

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Output};
use std::time::Duration;

use anyhow::Result;
use kiosk_setup::application::ports::{
    CommandRunner, ExecContext, Fetcher, HostProbe, HttpProbe, ProgressReporter, SecretPrompt,
};
use kiosk_setup::domain::RetryPolicy;
use kiosk_setup::domain::preflight::HostInfo;
use tokio::time::Instant;

use crate::helpers::{exit_status, ok_output};

// ── Command runner ────────────────────────────────────────────────────────────

/// One recorded invocation.
#[derive(Debug, Clone)]
pub struct Call {
    /// `program arg1 arg2 ...`
    pub line: String,
    pub ctx: ExecContext,
}

/// Records every command and answers from a prefix-matched script.
/// Unscripted commands succeed with empty output.
#[derive(Default)]
pub struct RecordingRunner {
    script: Vec<(String, Output)>,
    pub calls: RefCell<Vec<Call>>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer commands starting with `prefix` with `output`. First match wins.
    pub fn on(mut self, prefix: &str, output: Output) -> Self {
        self.script.push((prefix.to_string(), output));
        self
    }

    pub fn lines(&self) -> Vec<String> {
        self.calls.borrow().iter().map(|c| c.line.clone()).collect()
    }

    pub fn called(&self, line: &str) -> bool {
        self.calls.borrow().iter().any(|c| c.line == line)
    }

    pub fn position(&self, line: &str) -> Option<usize> {
        self.calls.borrow().iter().position(|c| c.line == line)
    }

    fn answer(&self, ctx: &ExecContext, program: &str, args: &[&str]) -> Output {
        let line = std::iter::once(program)
            .chain(args.iter().copied())
            .collect::<Vec<_>>()
            .join(" ");
        self.calls.borrow_mut().push(Call {
            line: line.clone(),
            ctx: ctx.clone(),
        });
        self.script
            .iter()
            .find(|(prefix, _)| line.starts_with(prefix.as_str()))
            .map_or_else(|| ok_output(b""), |(_, out)| out.clone())
    }
}

impl CommandRunner for RecordingRunner {
    async fn run(&self, ctx: &ExecContext, program: &str, args: &[&str]) -> Result<Output> {
        Ok(self.answer(ctx, program, args))
    }

    async fn run_with_timeout(
        &self,
        ctx: &ExecContext,
        program: &str,
        args: &[&str],
        _: Duration,
    ) -> Result<Output> {
        Ok(self.answer(ctx, program, args))
    }

    async fn run_status(
        &self,
        ctx: &ExecContext,
        program: &str,
        args: &[&str],
    ) -> Result<ExitStatus> {
        Ok(self.answer(ctx, program, args).status)
    }
}

/// Reports `systemctl is-active` as active once `after` has elapsed on the
/// tokio clock.
pub struct ActiveAfter {
    pub start: Instant,
    pub after: Option<Duration>,
    pub checks: Cell<u32>,
}

impl ActiveAfter {
    pub fn new(after: Option<Duration>) -> Self {
        Self {
            start: Instant::now(),
            after,
            checks: Cell::new(0),
        }
    }
}

impl CommandRunner for ActiveAfter {
    async fn run(&self, _: &ExecContext, program: &str, args: &[&str]) -> Result<Output> {
        assert_eq!(program, "systemctl");
        assert_eq!(args[0], "is-active");
        self.checks.set(self.checks.get() + 1);
        let active = self.after.is_some_and(|d| self.start.elapsed() >= d);
        Ok(Output {
            status: exit_status(i32::from(!active) * 3),
            stdout: Vec::new(),
            stderr: Vec::new(),
        })
    }

    async fn run_with_timeout(
        &self,
        ctx: &ExecContext,
        program: &str,
        args: &[&str],
        _: Duration,
    ) -> Result<Output> {
        self.run(ctx, program, args).await
    }

    async fn run_status(&self, _: &ExecContext, _: &str, _: &[&str]) -> Result<ExitStatus> {
        anyhow::bail!("run_status not expected in this test")
    }
}

// ── Host ──────────────────────────────────────────────────────────────────────

/// Fixed host facts; counts probes.
pub struct StubHost {
    pub info: HostInfo,
    pub root: bool,
    pub executables: Vec<&'static str>,
    pub probes: Cell<u32>,
}

impl StubHost {
    pub fn new(info: HostInfo) -> Self {
        Self {
            info,
            root: true,
            executables: vec!["chromium-browser"],
            probes: Cell::new(0),
        }
    }
}

impl HostProbe for StubHost {
    async fn host_info(&self) -> Result<HostInfo> {
        self.probes.set(self.probes.get() + 1);
        Ok(self.info.clone())
    }

    async fn is_root(&self) -> Result<bool> {
        Ok(self.root)
    }

    fn find_executable(&self, name: &str) -> Option<PathBuf> {
        self.executables
            .contains(&name)
            .then(|| PathBuf::from("/usr/bin").join(name))
    }
}

// ── Network ───────────────────────────────────────────────────────────────────

/// Fails the first `fail_first` attempts, then succeeds.
pub struct StubFetcher {
    pub fail_first: u32,
    pub attempts: Cell<u32>,
}

impl StubFetcher {
    pub fn failing(fail_first: u32) -> Self {
        Self {
            fail_first,
            attempts: Cell::new(0),
        }
    }

    pub fn always_failing() -> Self {
        Self::failing(u32::MAX)
    }
}

impl Fetcher for StubFetcher {
    async fn fetch(&self, url: &str, _: &Path, _: &RetryPolicy) -> Result<()> {
        let n = self.attempts.get() + 1;
        self.attempts.set(n);
        if n <= self.fail_first {
            anyhow::bail!("connection to {url} reset (attempt {n})");
        }
        Ok(())
    }
}

/// Answers every GET with `status`; records URLs and bearer tokens.
pub struct StubHttp {
    pub status: u16,
    pub requests: RefCell<Vec<(String, Option<String>)>>,
    pub fetcher: StubFetcher,
}

impl StubHttp {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            requests: RefCell::default(),
            fetcher: StubFetcher::failing(0),
        }
    }
}

impl HttpProbe for StubHttp {
    async fn get_status(&self, url: &str, bearer: Option<&str>) -> Result<u16> {
        self.requests
            .borrow_mut()
            .push((url.to_string(), bearer.map(str::to_string)));
        Ok(self.status)
    }
}

impl Fetcher for StubHttp {
    async fn fetch(&self, url: &str, dest: &Path, policy: &RetryPolicy) -> Result<()> {
        self.fetcher.fetch(url, dest, policy).await
    }
}

// ── Prompt ────────────────────────────────────────────────────────────────────

/// Returns canned answers in order and counts prompts.
pub struct ScriptedPrompt {
    answers: RefCell<VecDeque<String>>,
    pub prompts: Cell<u32>,
}

impl ScriptedPrompt {
    pub fn new(answers: &[&str]) -> Self {
        Self {
            answers: RefCell::new(answers.iter().map(|a| (*a).to_string()).collect()),
            prompts: Cell::new(0),
        }
    }
}

impl SecretPrompt for ScriptedPrompt {
    fn prompt_secret(&self, _: &str) -> Result<String> {
        self.prompts.set(self.prompts.get() + 1);
        self.answers
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| anyhow::anyhow!("no scripted answer left"))
    }
}

// ── Reporter ──────────────────────────────────────────────────────────────────

/// Records every event as `"<kind>: <message>"`.
#[derive(Default)]
pub struct RecordingReporter {
    pub events: RefCell<Vec<String>>,
}

impl RecordingReporter {
    pub fn warnings(&self) -> Vec<String> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| e.strip_prefix("warn: ").map(str::to_string))
            .collect()
    }
}

impl ProgressReporter for RecordingReporter {
    fn step(&self, message: &str) {
        self.events.borrow_mut().push(format!("step: {message}"));
    }
    fn success(&self, message: &str) {
        self.events.borrow_mut().push(format!("success: {message}"));
    }
    fn warn(&self, message: &str) {
        self.events.borrow_mut().push(format!("warn: {message}"));
    }
}
