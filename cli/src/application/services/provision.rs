//! Application service — the first-boot provisioning use-case.
//!
//! Binds every [`StepKind`] to the service that implements it and carries
//! the values later steps need from earlier ones.

use std::path::PathBuf;

use anyhow::Result;

use crate::application::ports::{
    CommandRunner, ExecContext, Fetcher, HostProbe, HttpProbe, LocalFs, ProgressReporter,
    SecretPrompt, TemplateSource,
};
use crate::application::services::artifacts::ArtifactWriter;
use crate::application::services::secrets::EnvFileOutcome;
use crate::application::services::step_runner::StepExecutor;
use crate::application::services::{
    api_keys, deploy, engine, kiosk, preflight, secrets, verify,
};
use crate::domain::secret::{SECRETS, SecretSpec};
use crate::domain::verify::VerificationReport;
use crate::domain::{ProvisionConfig, RetryPolicy, StepKind};

/// Values produced along the way, reported once the run is over.
#[derive(Debug, Default)]
pub struct ProvisionSummary {
    pub app_url: Option<String>,
    pub env_file: Option<EnvFileOutcome>,
    pub artifacts: Vec<PathBuf>,
    pub verification: Option<VerificationReport>,
}

/// Executes provisioning steps against injected ports.
pub struct Provisioner<'a, R, H, N, P, F, T, Rep> {
    pub runner: &'a R,
    pub host: &'a H,
    /// Downloads and HTTP probes.
    pub net: &'a N,
    pub prompt: &'a P,
    pub fs: &'a F,
    pub templates: &'a T,
    pub reporter: &'a Rep,
    pub config: &'a ProvisionConfig,
    pub retry: RetryPolicy,
    pub secrets: &'a [SecretSpec],
    summary: ProvisionSummary,
}

impl<'a, R, H, N, P, F, T, Rep> Provisioner<'a, R, H, N, P, F, T, Rep>
where
    R: CommandRunner,
    H: HostProbe,
    N: Fetcher + HttpProbe,
    P: SecretPrompt,
    F: LocalFs,
    T: TemplateSource,
    Rep: ProgressReporter,
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        runner: &'a R,
        host: &'a H,
        net: &'a N,
        prompt: &'a P,
        fs: &'a F,
        templates: &'a T,
        reporter: &'a Rep,
        config: &'a ProvisionConfig,
    ) -> Self {
        Self {
            runner,
            host,
            net,
            prompt,
            fs,
            templates,
            reporter,
            config,
            retry: RetryPolicy::default(),
            secrets: SECRETS,
            summary: ProvisionSummary::default(),
        }
    }

    /// What the run has produced so far.
    #[must_use]
    pub fn summary(&self) -> &ProvisionSummary {
        &self.summary
    }

    #[must_use]
    pub fn into_summary(self) -> ProvisionSummary {
        self.summary
    }

    fn ctx(&self) -> ExecContext {
        ExecContext::new(&self.config.project_dir)
    }

    fn app_url(&self) -> String {
        self.summary
            .app_url
            .clone()
            .unwrap_or_else(|| self.config.default_base_url())
    }

    fn writer(&self) -> ArtifactWriter<'a, T, F> {
        ArtifactWriter::new(self.templates, self.fs)
    }
}

impl<R, H, N, P, F, T, Rep> StepExecutor for Provisioner<'_, R, H, N, P, F, T, Rep>
where
    R: CommandRunner,
    H: HostProbe,
    N: Fetcher + HttpProbe,
    P: SecretPrompt,
    F: LocalFs,
    T: TemplateSource,
    Rep: ProgressReporter,
{
    async fn execute(&mut self, kind: StepKind) -> Result<()> {
        let cfg = self.config;
        let ctx = self.ctx();
        match kind {
            StepKind::Preflight => {
                preflight::run_preflight(self.host, self.fs, self.reporter, &cfg.project_dir).await
            }
            StepKind::CollectSecrets => {
                let outcome = secrets::collect_secrets(
                    self.fs,
                    self.prompt,
                    self.reporter,
                    &cfg.project_dir,
                    self.secrets,
                )?;
                self.summary.env_file = Some(outcome);
                Ok(())
            }
            StepKind::PrepareConfig => {
                let url = secrets::prepare_config(
                    self.fs,
                    self.reporter,
                    &cfg.project_dir,
                    &cfg.default_base_url(),
                )?;
                tracing::info!(app_url = %url, "application URL resolved");
                self.summary.app_url = Some(url);
                Ok(())
            }
            StepKind::InstallPackages => {
                engine::install_packages(self.runner, self.reporter, &ctx, cfg.kiosk).await
            }
            StepKind::InstallContainerEngine => {
                engine::install_container_engine(
                    self.runner,
                    self.net,
                    self.reporter,
                    &ctx,
                    cfg.user(),
                    &self.retry,
                )
                .await
            }
            StepKind::GenerateArtifacts => {
                let written = self.writer().generate_build_artifacts(cfg, self.reporter)?;
                self.summary.artifacts.extend(written);
                Ok(())
            }
            StepKind::BuildImage => {
                deploy::build_image(self.runner, self.host, self.reporter, &ctx).await
            }
            StepKind::LaunchCompose => deploy::launch_compose(self.runner, &ctx).await,
            StepKind::RegisterServices => {
                let writer = self.writer();
                deploy::register_services(self.runner, &writer, self.fs, self.reporter, &ctx, cfg)
                    .await
            }
            StepKind::Verify => {
                let report = verify::verify(
                    self.runner,
                    self.net,
                    self.host,
                    self.reporter,
                    &ctx,
                    &self.app_url(),
                    &cfg.health_path,
                )
                .await?;
                self.summary.verification = Some(report);
                Ok(())
            }
            StepKind::ConfigureKiosk => {
                let writer = self.writer();
                let written = kiosk::configure_kiosk(
                    self.runner,
                    self.host,
                    &writer,
                    self.reporter,
                    &ctx,
                    cfg,
                    &self.app_url(),
                )
                .await?;
                self.summary.artifacts.extend(written);
                Ok(())
            }
            StepKind::ValidateApiKeys => {
                api_keys::validate_api_keys(
                    self.fs,
                    self.net,
                    self.reporter,
                    &cfg.project_dir,
                    self.secrets,
                )
                .await
            }
        }
    }
}
