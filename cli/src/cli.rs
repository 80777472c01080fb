//! CLI argument parsing with clap derive, and the provisioning entry point.

use anyhow::{Context, Result};
use clap::Parser;

use crate::application::{ProvisionSummary, Provisioner, RunReport, run_steps};
use crate::domain::verify::HealthOutcome;
use crate::domain::{PlanOptions, ProvisionConfig, orchestration_table};
use crate::infra::assets::EmbeddedTemplates;
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::config;
use crate::infra::fs::LocalFs;
use crate::infra::host::SystemHost;
use crate::infra::network::UreqClient;
use crate::infra::prompt::TerminalPrompt;
use crate::output::{OutputContext, TerminalReporter};

/// First-boot provisioning for single-board kiosk devices.
///
/// Validates the host, collects API keys, installs the container engine,
/// builds and starts the application stack, registers it with systemd and
/// sets up the kiosk browser session. Settings are read from `KIOSK_*`
/// environment variables. Must run as root.
#[derive(Parser)]
#[command(name = "kiosk-setup", version)]
pub struct Cli {
    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR", value_parser = clap::builder::FalseyValueParser::new())]
    pub no_color: bool,
}

impl Cli {
    /// Run the full provisioning sequence.
    ///
    /// # Errors
    ///
    /// Returns the configuration error or the first fatal step failure.
    pub async fn run(&self, out: &OutputContext) -> Result<()> {
        let cfg = config::load_from_env()?;
        out.header(&format!("kiosk-setup: provisioning {}", cfg.app_name));

        let runner = TokioCommandRunner::default();
        let host = SystemHost::new(&runner);
        let net = UreqClient;
        let prompt = TerminalPrompt;
        let fs = LocalFs;
        let templates = EmbeddedTemplates;
        let reporter = TerminalReporter::new(out);

        let steps = orchestration_table(PlanOptions {
            kiosk: cfg.kiosk,
            validate_keys: cfg.validate_keys,
        });
        let mut provisioner = Provisioner::new(
            &runner, &host, &net, &prompt, &fs, &templates, &reporter, &cfg,
        );

        let report = run_steps(&steps, &mut provisioner, &reporter)
            .await
            .context("provisioning aborted")?;
        let summary = provisioner.into_summary();
        drop(reporter);

        print_summary(out, &cfg, &report, &summary);
        Ok(())
    }
}

fn print_summary(
    out: &OutputContext,
    cfg: &ProvisionConfig,
    report: &RunReport,
    summary: &ProvisionSummary,
) {
    println!();
    out.header("Provisioning complete");
    let url = summary
        .app_url
        .clone()
        .unwrap_or_else(|| cfg.default_base_url());
    out.kv("app url", &url);
    out.kv("project", &cfg.project_dir.display().to_string());
    out.kv("user", cfg.user());
    out.kv("steps", &report.completed.len().to_string());
    if let Some(verification) = &summary.verification {
        let health = match &verification.health {
            HealthOutcome::Healthy { status } => format!("healthy (HTTP {status})"),
            HealthOutcome::Unhealthy { reason } => format!("not yet healthy ({reason})"),
        };
        out.kv("health", &health);
    }
    out.kv("finished", &chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string());
    for (step, message) in &report.warnings {
        out.warn(&format!("{step}: {message}"));
    }
    if cfg.kiosk {
        out.success("reboot to start the kiosk display");
    }
}
